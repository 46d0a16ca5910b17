use chrono::Utc;
use log::{debug, error, info, warn};
use poll_action::config::{Config, Flow};
use poll_action::creation::view::{self as creation_view, CreationInput};
use poll_action::creation::{CreationOrchestrator, CreationStore};
use poll_action::datetime::now_millis;
use poll_action::progress::ProgressState;
use poll_action::render;
use poll_action::sdk::{SdkClient, SqliteHost};
use poll_action::store::Store;
use poll_action::summary::view::{self as summary_view, DialogKind, DownloadKind, MenuAction, SummaryInput};
use poll_action::summary::{SummaryOrchestrator, SummaryStore};
use std::sync::Arc;

const HOUR_MS: i64 = 60 * 60 * 1000;

async fn send_creation(orchestrator: &CreationOrchestrator, input: CreationInput) {
    let actions = orchestrator
        .store()
        .read(|s| creation_view::actions_for(s, input));
    orchestrator.dispatch_all(actions).await;
}

async fn send_summary(orchestrator: &SummaryOrchestrator, input: SummaryInput) {
    let actions = orchestrator
        .store()
        .read(|s| summary_view::actions_for(s, input));
    orchestrator.dispatch_all(actions).await;
}

async fn run_creation(config: &Config, sdk: SdkClient) {
    let store = Arc::new(Store::new(CreationStore::new(Utc::now(), config)));
    store.subscribe(|s: &CreationStore| {
        debug!("creation: progress {:?}, sending {}", s.progress, s.sending)
    });
    let orchestrator = CreationOrchestrator::new(store, sdk);

    send_creation(&orchestrator, CreationInput::Mounted).await;
    send_creation(&orchestrator, CreationInput::TitleChanged(config.draft.title.clone())).await;
    for (index, choice) in config.draft.choices.iter().enumerate() {
        if index >= 2 {
            send_creation(&orchestrator, CreationInput::ChoiceAdded).await;
        }
        send_creation(
            &orchestrator,
            CreationInput::ChoiceChanged {
                index,
                text: choice.clone(),
            },
        )
        .await;
    }
    send_creation(&orchestrator, CreationInput::VisibilitySelected(config.draft.visibility)).await;
    send_creation(&orchestrator, CreationInput::Submit).await;

    let snapshot = orchestrator.store().snapshot();
    println!("{}", render::creation(&creation_view::render(&snapshot, now_millis())));
}

async fn run_command(orchestrator: &SummaryOrchestrator, command: &str) {
    let store = orchestrator.store();
    match command {
        "responders" => {
            send_summary(orchestrator, SummaryInput::OpenResponders).await;
            // Scroll to the bottom until every page is in.
            while store.read(|s| s.progress_status.action_instance_rows == ProgressState::Partial) {
                let last = store.read(|s| s.action_instance_rows.len().saturating_sub(1));
                send_summary(orchestrator, SummaryInput::ResponderRowRendered(last)).await;
            }
        }
        "non-responders" => send_summary(orchestrator, SummaryInput::OpenNonResponders).await,
        "close" => {
            send_summary(orchestrator, SummaryInput::MenuSelected(MenuAction::ClosePoll)).await;
            send_summary(orchestrator, SummaryInput::DialogConfirmed(DialogKind::ClosePoll)).await;
        }
        "delete" => {
            send_summary(orchestrator, SummaryInput::MenuSelected(MenuAction::DeletePoll)).await;
            send_summary(orchestrator, SummaryInput::DialogConfirmed(DialogKind::DeletePoll)).await;
        }
        "download" => send_summary(orchestrator, SummaryInput::Download(DownloadKind::Responses)).await,
        "snapshot" => send_summary(orchestrator, SummaryInput::Download(DownloadKind::Image)).await,
        // Recorded before the view opened.
        vote if vote.starts_with("vote:") => {}
        other => match other.strip_prefix("extend:").map(|hours| hours.parse::<i64>()) {
            Some(Ok(hours)) => {
                let Some(expiry) = store.read(|s| s.action_instance.as_ref().map(|a| a.expiry_time)) else {
                    warn!("Poll is not loaded, cannot change its due date");
                    return;
                };
                send_summary(orchestrator, SummaryInput::MenuSelected(MenuAction::ChangeDueDate)).await;
                send_summary(orchestrator, SummaryInput::DueDatePicked(expiry + hours * HOUR_MS)).await;
                send_summary(orchestrator, SummaryInput::DialogConfirmed(DialogKind::ChangeDueDate)).await;
            }
            _ => warn!("Unknown command {:?}", other),
        },
    }
}

async fn run_summary(config: &Config, host: &SqliteHost, sdk: SdkClient) {
    let store = Arc::new(Store::new(SummaryStore::new(Utc::now(), config)));
    store.subscribe(|s: &SummaryStore| {
        debug!(
            "summary: view {:?}, rows {}, deleted {}",
            s.current_view,
            s.action_instance_rows.len(),
            s.is_action_deleted
        )
    });
    let orchestrator = SummaryOrchestrator::new(store, sdk, config);

    send_summary(&orchestrator, SummaryInput::Mounted).await;
    if let Some(command) = &config.command {
        run_command(&orchestrator, command.trim()).await;
    }

    if host.view_closed() {
        info!("The host closed the summary view");
        return;
    }
    let snapshot = orchestrator.store().snapshot();
    println!("{}", render::summary(&summary_view::render_page(&snapshot)));
}

async fn submit_vote(config: &Config, host: &SqliteHost) {
    let Some(choice) = config.command.as_deref().and_then(|c| c.trim().strip_prefix("vote:")) else {
        return;
    };
    let Some(action_id) = config.action_id.as_deref() else { return };
    match host.submit_response(action_id, &config.user_id, choice).await {
        Ok(row) => info!("Recorded response {} for {}", row.id, config.user_id),
        Err(e) => error!("Failed to record response: {}", e),
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    // Initialize the local host
    let host = match SqliteHost::connect(&config.database_url, config.host_session()).await {
        Ok(host) => Arc::new(host),
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return;
        }
    };
    if let Err(e) = host
        .add_member(&config.subscription_id, &config.user_id, &config.user_name)
        .await
    {
        error!("Failed to register {}: {}", config.user_id, e);
        return;
    }

    let sdk = SdkClient::new(host.clone());
    match config.flow {
        Flow::Creation => run_creation(&config, sdk).await,
        Flow::Summary => {
            submit_vote(&config, &host).await;
            run_summary(&config, &host, sdk).await;
        }
    }
}
