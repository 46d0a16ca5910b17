mod common;

use common::mock_sdk::MockSdk;
use common::{CREATOR_ID, EXPIRY, host_state, init_logging, summary_orchestrator, test_config};
use poll_action::config::Config;
use poll_action::error::ApiError;
use poll_action::models::{ActionStatus, Visibility};
use poll_action::progress::ProgressState;
use poll_action::summary::view::{self, DialogKind, DownloadKind, MenuAction, SummaryInput, SummaryPage};
use poll_action::summary::{Operation, SummaryOrchestrator};
use std::sync::Arc;

const HOUR_MS: i64 = 60 * 60 * 1000;

async fn send(orchestrator: &SummaryOrchestrator, input: SummaryInput) {
    let actions = orchestrator.store().read(|s| view::actions_for(s, input));
    orchestrator.dispatch_all(actions).await;
}

async fn opened(config: &Config) -> (Arc<MockSdk>, SummaryOrchestrator) {
    init_logging();
    let sdk = Arc::new(MockSdk::new(host_state(CREATOR_ID, Visibility::All)));
    let orchestrator = summary_orchestrator(sdk.clone(), config);
    send(&orchestrator, SummaryInput::Mounted).await;
    (sdk, orchestrator)
}

fn slot(orchestrator: &SummaryOrchestrator, operation: Operation) -> ProgressState {
    orchestrator.store().read(|s| s.progress_status.get(operation))
}

fn open_dialogs(orchestrator: &SummaryOrchestrator) -> Vec<view::DialogView> {
    match view::render_page(&orchestrator.store().snapshot()) {
        SummaryPage::Main(main) => main.dialogs,
        other => panic!("expected the main page, got {:?}", other),
    }
}

#[tokio::test]
async fn stale_close_refreshes_the_poll() {
    let (sdk, orchestrator) = opened(&test_config()).await;
    // Someone else edited the poll after it was loaded.
    sdk.with_state(|s| s.action.as_mut().unwrap().version = 2);

    send(&orchestrator, SummaryInput::MenuSelected(MenuAction::ClosePoll)).await;
    send(&orchestrator, SummaryInput::DialogConfirmed(DialogKind::ClosePoll)).await;

    assert_eq!(slot(&orchestrator, Operation::CloseActionInstance), ProgressState::Failed);
    assert_eq!(
        orchestrator
            .store()
            .read(|s| s.action_instance.as_ref().map(|a| a.version)),
        Some(2)
    );
    assert_eq!(sdk.calls("get_action"), 2);
    assert!(!sdk.view_closed());
    let dialogs = open_dialogs(&orchestrator);
    assert_eq!(dialogs.len(), 1);
    assert_eq!(dialogs[0].error.as_deref(), Some("Something went wrong"));

    // The retry carries the refreshed version.
    send(&orchestrator, SummaryInput::DialogConfirmed(DialogKind::ClosePoll)).await;
    assert_eq!(slot(&orchestrator, Operation::CloseActionInstance), ProgressState::Completed);
    assert!(sdk.view_closed());
    let host_action = sdk.with_state(|s| s.action.clone().unwrap());
    assert_eq!(host_action.status, ActionStatus::Closed);
    assert_eq!(host_action.version, 3);
    assert!(!orchestrator.store().read(|s| s.is_poll_close_alert_open));
}

#[tokio::test]
async fn reopening_a_dialog_clears_its_error() {
    let (sdk, orchestrator) = opened(&test_config()).await;
    sdk.fail("update_action", ApiError::internal("busy"));
    send(&orchestrator, SummaryInput::MenuSelected(MenuAction::ClosePoll)).await;
    send(&orchestrator, SummaryInput::DialogConfirmed(DialogKind::ClosePoll)).await;
    send(&orchestrator, SummaryInput::DialogCancelled(DialogKind::ClosePoll)).await;
    assert!(open_dialogs(&orchestrator).is_empty());

    send(&orchestrator, SummaryInput::MenuSelected(MenuAction::ClosePoll)).await;

    assert_eq!(slot(&orchestrator, Operation::CloseActionInstance), ProgressState::NotStarted);
    assert_eq!(open_dialogs(&orchestrator)[0].error, None);
}

#[tokio::test]
async fn delete_closes_the_view() {
    let (sdk, orchestrator) = opened(&test_config()).await;

    send(&orchestrator, SummaryInput::MenuSelected(MenuAction::DeletePoll)).await;
    assert_eq!(open_dialogs(&orchestrator)[0].kind, DialogKind::DeletePoll);
    send(&orchestrator, SummaryInput::DialogConfirmed(DialogKind::DeletePoll)).await;

    assert_eq!(slot(&orchestrator, Operation::DeleteActionInstance), ProgressState::Completed);
    assert!(sdk.view_closed());
    assert!(sdk.with_state(|s| s.action.is_none()));
}

#[tokio::test]
async fn failed_delete_reports_on_its_own_dialog() {
    let (sdk, orchestrator) = opened(&test_config()).await;
    sdk.fail("delete_action", ApiError::internal("busy"));

    send(&orchestrator, SummaryInput::MenuSelected(MenuAction::DeletePoll)).await;
    send(&orchestrator, SummaryInput::DialogConfirmed(DialogKind::DeletePoll)).await;

    assert_eq!(slot(&orchestrator, Operation::DeleteActionInstance), ProgressState::Failed);
    assert_eq!(slot(&orchestrator, Operation::CloseActionInstance), ProgressState::NotStarted);
    assert!(!sdk.view_closed());
    let dialogs = open_dialogs(&orchestrator);
    assert_eq!(dialogs[0].kind, DialogKind::DeletePoll);
    assert!(dialogs[0].error.is_some());
}

#[tokio::test]
async fn close_of_a_vanished_poll_shows_deleted_page() {
    let (sdk, orchestrator) = opened(&test_config()).await;
    sdk.with_state(|s| s.action = None);

    send(&orchestrator, SummaryInput::MenuSelected(MenuAction::ClosePoll)).await;
    send(&orchestrator, SummaryInput::DialogConfirmed(DialogKind::ClosePoll)).await;

    assert!(orchestrator.store().read(|s| s.is_action_deleted));
    assert!(matches!(
        view::render_page(&orchestrator.store().snapshot()),
        SummaryPage::Deleted(_)
    ));
}

#[tokio::test]
async fn due_date_change_refetches_the_poll() {
    let (sdk, orchestrator) = opened(&test_config()).await;

    send(&orchestrator, SummaryInput::MenuSelected(MenuAction::ChangeDueDate)).await;
    let dialog = open_dialogs(&orchestrator).remove(0);
    assert_eq!(dialog.due_date, Some(EXPIRY));
    assert!(dialog.confirm.disabled);

    send(&orchestrator, SummaryInput::DueDatePicked(EXPIRY + 2 * HOUR_MS)).await;
    assert!(!open_dialogs(&orchestrator)[0].confirm.disabled);
    send(&orchestrator, SummaryInput::DialogConfirmed(DialogKind::ChangeDueDate)).await;

    assert_eq!(slot(&orchestrator, Operation::UpdateActionInstance), ProgressState::Completed);
    let update = sdk.with_state(|s| s.updates[0].clone());
    assert_eq!(update.expiry_time, Some(EXPIRY + 2 * HOUR_MS));
    assert_eq!(update.status, None);
    assert_eq!(sdk.calls("get_action"), 2);
    let snapshot = orchestrator.store().snapshot();
    assert!(!snapshot.is_change_expiry_alert_open);
    let action = snapshot.action_instance.unwrap();
    assert_eq!(action.expiry_time, EXPIRY + 2 * HOUR_MS);
    assert_eq!(action.version, 2);
    assert!(!sdk.view_closed());
}

#[tokio::test]
async fn csv_download_is_named_after_the_question() {
    let (sdk, orchestrator) = opened(&test_config()).await;

    send(&orchestrator, SummaryInput::Download(DownloadKind::Responses)).await;

    assert_eq!(slot(&orchestrator, Operation::DownloadData), ProgressState::Completed);
    assert_eq!(
        sdk.with_state(|s| s.downloads.clone()),
        vec!["Poll result - Lunch_".to_string()]
    );
}

#[tokio::test]
async fn failed_csv_download_marks_slot() {
    let (sdk, orchestrator) = opened(&test_config()).await;
    sdk.fail("download_results", ApiError::internal("disk full"));

    send(&orchestrator, SummaryInput::Download(DownloadKind::Responses)).await;

    assert_eq!(slot(&orchestrator, Operation::DownloadData), ProgressState::Failed);
    // Download failures never take the page down.
    assert!(matches!(
        view::render_page(&orchestrator.store().snapshot()),
        SummaryPage::Main(_)
    ));
}

#[tokio::test]
async fn image_download_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        export_dir: dir.path().to_path_buf(),
        ..test_config()
    };
    let (_sdk, orchestrator) = opened(&config).await;

    send(&orchestrator, SummaryInput::Download(DownloadKind::Image)).await;

    assert_eq!(slot(&orchestrator, Operation::DownloadData), ProgressState::Completed);
    let path = dir.path().join("Poll result - Lunch_.png");
    assert!(path.exists());
    let (width, _) = image::image_dimensions(&path).unwrap();
    assert_eq!(width, 480);
}

#[tokio::test]
async fn downloads_survive_a_title_with_a_slash() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        export_dir: dir.path().to_path_buf(),
        ..test_config()
    };
    let mut state = host_state(CREATOR_ID, Visibility::All);
    if let Some(action) = state.action.as_mut() {
        action.data_table.columns[0].display_name = "Yes/No?".to_string();
    }
    let sdk = Arc::new(MockSdk::new(state));
    let orchestrator = summary_orchestrator(sdk.clone(), &config);
    send(&orchestrator, SummaryInput::Mounted).await;

    send(&orchestrator, SummaryInput::Download(DownloadKind::Image)).await;
    assert_eq!(slot(&orchestrator, Operation::DownloadData), ProgressState::Completed);
    assert!(dir.path().join("Poll result - Yes_No_.png").exists());

    send(&orchestrator, SummaryInput::Download(DownloadKind::Responses)).await;
    assert_eq!(slot(&orchestrator, Operation::DownloadData), ProgressState::Completed);
    assert_eq!(
        sdk.with_state(|s| s.downloads.clone()),
        vec!["Poll result - Yes_No_".to_string()]
    );
}

#[tokio::test]
async fn delete_completes_even_if_the_view_stays_open() {
    let (sdk, orchestrator) = opened(&test_config()).await;
    sdk.fail("close_view", ApiError::internal("view busy"));

    send(&orchestrator, SummaryInput::MenuSelected(MenuAction::DeletePoll)).await;
    send(&orchestrator, SummaryInput::DialogConfirmed(DialogKind::DeletePoll)).await;

    assert_eq!(slot(&orchestrator, Operation::DeleteActionInstance), ProgressState::Completed);
    assert_eq!(sdk.calls("close_view"), 1);
    assert!(!sdk.view_closed());
    assert!(!orchestrator.store().read(|s| s.is_delete_poll_alert_open));
}
