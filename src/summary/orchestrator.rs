use crate::config::Config;
use crate::error::ApiError;
use crate::localization::Localizer;
use crate::models::{ActionContext, ActionStatus, ActionUpdateInfo, RowFilter, SubscriptionMember};
use crate::progress::ProgressState;
use crate::sdk::SdkClient;
use crate::store::Store;
use crate::summary::actions::SummaryAction;
use crate::summary::export::{draw_results, result_file_name, save_results_image};
use crate::summary::store::{Operation, SummaryStore};
use crate::summary::view::{is_page_ready, option_results, percent};
use log::{error, info, warn};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct SummaryOrchestrator {
    store: Arc<Store<SummaryStore>>,
    sdk: SdkClient,
    page_size: usize,
    export_dir: PathBuf,
    file_name_max_length: usize,
}

impl SummaryOrchestrator {
    pub fn new(store: Arc<Store<SummaryStore>>, sdk: SdkClient, config: &Config) -> Self {
        Self {
            store,
            sdk,
            page_size: config.page_size,
            export_dir: config.export_dir.clone(),
            file_name_max_length: config.file_name_max_length,
        }
    }

    pub fn store(&self) -> &Arc<Store<SummaryStore>> {
        &self.store
    }

    pub async fn dispatch(&self, action: SummaryAction) {
        self.store.apply(&action);
        match action {
            SummaryAction::Initialize => self.initialize().await,
            SummaryAction::FetchUserDetails(user_ids) => self.fetch_user_details(user_ids).await,
            SummaryAction::FetchLocalization => self.fetch_localization().await,
            SummaryAction::FetchMyResponse => self.fetch_my_response().await,
            SummaryAction::FetchMemberCount => self.fetch_member_count().await,
            SummaryAction::FetchActionInstanceRows {
                should_fetch_user_details,
            } => self.fetch_action_instance_rows(should_fetch_user_details).await,
            SummaryAction::FetchNonResponders => self.fetch_non_responders().await,
            SummaryAction::FetchActionInstance { update_progress_state } => {
                self.fetch_action_instance(update_progress_state).await
            }
            SummaryAction::FetchActionInstanceSummary { update_progress_state } => {
                self.fetch_action_instance_summary(update_progress_state).await
            }
            SummaryAction::UpdateDueDate(due_date) => self.update_due_date(due_date).await,
            SummaryAction::ClosePoll => self.close_poll().await,
            SummaryAction::DeletePoll => self.delete_poll().await,
            SummaryAction::DownloadCsv => self.download_csv().await,
            SummaryAction::DownloadImage => self.download_image().await,
            _ => {}
        }
    }

    pub async fn dispatch_all(&self, actions: Vec<SummaryAction>) {
        for action in actions {
            self.dispatch(action).await;
        }
    }

    fn set_progress(&self, operation: Operation, state: ProgressState) {
        self.store.dispatch(SummaryAction::progress(operation, state));
    }

    fn start(&self, operation: Operation, guard: impl FnOnce(ProgressState) -> bool) -> bool {
        self.store.dispatch_if(
            |s| guard(s.progress_status.get(operation)),
            SummaryAction::progress(operation, ProgressState::InProgress),
        )
    }

    fn handle_error_response(&self, error: &ApiError) {
        if error.is_not_found() {
            self.store.dispatch(SummaryAction::SetIsActionDeleted(true));
        }
    }

    fn handle_error(&self, error: &ApiError, operation: Operation) {
        self.handle_error_response(error);
        self.set_progress(operation, ProgressState::Failed);
    }

    fn context(&self) -> Option<ActionContext> {
        let context = self.store.read(|s| s.context.clone());
        if context.is_none() {
            warn!("No host context yet; initialize the summary first");
        }
        context
    }

    async fn initialize(&self) {
        if !self.start(Operation::CurrentContext, ProgressState::can_start_once) {
            return;
        }

        let context = match self.sdk.get_context().await {
            Ok(context) => context,
            Err(e) => {
                self.handle_error(&e, Operation::CurrentContext);
                self.sdk.hide_loading_indicator();
                return;
            }
        };
        let user_id = context.user_id.clone();
        self.store.dispatch(SummaryAction::SetContext(context));
        self.set_progress(Operation::CurrentContext, ProgressState::Completed);

        tokio::join!(
            self.fetch_localization(),
            self.fetch_user_details(vec![user_id]),
            self.fetch_action_instance(true),
            self.fetch_action_instance_summary(true),
            self.fetch_my_response(),
            self.fetch_member_count(),
        );

        if !self.store.read(is_page_ready) {
            info!("Summary page opened with missing data");
        }
        self.sdk.hide_loading_indicator();
    }

    async fn fetch_localization(&self) {
        if !self.start(Operation::Localization, ProgressState::can_start_once) {
            return;
        }
        match self.sdk.get_localized_strings().await {
            Ok(strings) => {
                self.store
                    .dispatch(SummaryAction::SetStrings(Localizer::from_strings(strings)));
                self.set_progress(Operation::Localization, ProgressState::Completed);
            }
            Err(e) => self.handle_error(&e, Operation::Localization),
        }
    }

    async fn fetch_my_response(&self) {
        let Some(context) = self.context() else { return };
        if !self.start(Operation::MyRow, ProgressState::can_start_once) {
            return;
        }
        match self
            .sdk
            .get_data_rows(&context.action_id, RowFilter::Mine, None, 1)
            .await
        {
            Ok(page) => {
                self.store
                    .dispatch(SummaryAction::UpdateMyRow(page.rows.into_iter().next()));
                self.set_progress(Operation::MyRow, ProgressState::Completed);
            }
            Err(e) => self.handle_error(&e, Operation::MyRow),
        }
    }

    async fn fetch_member_count(&self) {
        let Some(context) = self.context() else { return };
        if !self.start(Operation::MemberCount, ProgressState::can_start_once) {
            return;
        }
        match self.sdk.get_member_count(&context.subscription).await {
            Ok(count) => {
                self.store.dispatch(SummaryAction::UpdateMemberCount(count));
                self.set_progress(Operation::MemberCount, ProgressState::Completed);
            }
            Err(e) => self.handle_error(&e, Operation::MemberCount),
        }
    }

    // A silent fetch (`update_progress_state == false`) leaves the slot
    // untouched, which keeps the current page on screen.
    async fn fetch_action_instance(&self, update_progress_state: bool) {
        let Some(context) = self.context() else { return };
        let started = if update_progress_state {
            self.start(Operation::ActionInstance, |state| !state.is_in_progress())
        } else {
            self.store
                .read(|s| !s.progress_status.action_instance.is_in_progress())
        };
        if !started {
            return;
        }

        match self.sdk.get_action(&context.action_id).await {
            Ok(action) => {
                self.store.dispatch(SummaryAction::UpdateActionInstance(action));
                if update_progress_state {
                    self.set_progress(Operation::ActionInstance, ProgressState::Completed);
                }
                self.fetch_action_instance_rows(false).await;
            }
            Err(e) => {
                self.handle_error_response(&e);
                if update_progress_state {
                    self.set_progress(Operation::ActionInstance, ProgressState::Failed);
                }
            }
        }
    }

    async fn fetch_action_instance_summary(&self, update_progress_state: bool) {
        let Some(context) = self.context() else { return };
        let started = if update_progress_state {
            self.start(Operation::ActionInstanceSummary, |state| !state.is_in_progress())
        } else {
            self.store
                .read(|s| !s.progress_status.action_instance_summary.is_in_progress())
        };
        if !started {
            return;
        }

        match self.sdk.get_rows_summary(&context.action_id, true).await {
            Ok(summary) => {
                self.store
                    .dispatch(SummaryAction::UpdateActionInstanceSummary(summary));
                if update_progress_state {
                    self.set_progress(Operation::ActionInstanceSummary, ProgressState::Completed);
                }
            }
            Err(e) => {
                self.handle_error_response(&e);
                if update_progress_state {
                    self.set_progress(Operation::ActionInstanceSummary, ProgressState::Failed);
                }
            }
        }
    }

    async fn fetch_action_instance_rows(&self, should_fetch_user_details: bool) {
        let Some(context) = self.context() else { return };
        let started = self.store.dispatch_if(
            |s| {
                s.can_current_user_view_results() && s.progress_status.action_instance_rows.can_fetch_more()
            },
            SummaryAction::progress(Operation::ActionInstanceRows, ProgressState::InProgress),
        );
        if !started {
            return;
        }

        let token = self.store.read(|s| s.continuation_token.clone());
        let page = match self
            .sdk
            .get_data_rows(&context.action_id, RowFilter::All, token.as_deref(), self.page_size)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                self.handle_error(&e, Operation::ActionInstanceRows);
                return;
            }
        };

        let creators: Vec<String> = page.rows.iter().map(|row| row.creator_id.clone()).collect();
        self.store.dispatch(SummaryAction::AddActionInstanceRows(page.rows));
        match page.continuation_token {
            Some(token) => {
                self.store
                    .dispatch(SummaryAction::UpdateContinuationToken(Some(token)));
                self.set_progress(Operation::ActionInstanceRows, ProgressState::Partial);
            }
            None => self.set_progress(Operation::ActionInstanceRows, ProgressState::Completed),
        }

        if should_fetch_user_details {
            self.fetch_user_details(creators).await;
        }
    }

    async fn fetch_user_details(&self, user_ids: Vec<String>) {
        let Some(context) = self.context() else { return };
        let mut seen = HashSet::new();
        let pending: Vec<String> = self.store.read(|s| {
            user_ids
                .into_iter()
                .filter(|id| s.user_display_name(id).is_none())
                .filter(|id| seen.insert(id.clone()))
                .collect()
        });
        if pending.is_empty() {
            return;
        }

        match self.sdk.get_members(&context.subscription, &pending).await {
            Ok(lookup) => {
                self.store
                    .dispatch(SummaryAction::UpdateUserProfileInfo(lookup.members));
                if !lookup.ids_not_found.is_empty() {
                    self.store.dispatch(SummaryAction::UpdateUserProfileInfo(unknown_members(
                        lookup.ids_not_found,
                    )));
                }
            }
            Err(e) => {
                self.handle_error_response(&e);
                self.store
                    .dispatch(SummaryAction::UpdateUserProfileInfo(unknown_members(pending)));
            }
        }
    }

    async fn fetch_non_responders(&self) {
        let Some(context) = self.context() else { return };
        if !self.start(Operation::NonResponders, ProgressState::can_start_once) {
            return;
        }
        match self
            .sdk
            .get_non_responders(&context.action_id, &context.subscription.id)
            .await
        {
            Ok(members) => {
                self.store
                    .dispatch(SummaryAction::UpdateUserProfileInfo(members.clone()));
                self.store.dispatch(SummaryAction::UpdateNonResponders(members));
                self.set_progress(Operation::NonResponders, ProgressState::Completed);
            }
            Err(e) => self.handle_error(&e, Operation::NonResponders),
        }
    }

    fn update_info(&self, status: Option<ActionStatus>, expiry_time: Option<i64>) -> Option<ActionUpdateInfo> {
        self.store.read(|s| {
            s.action_instance.as_ref().map(|action| ActionUpdateInfo {
                id: action.id.clone(),
                version: action.version,
                status,
                expiry_time,
            })
        })
    }

    // Marks `operation` failed and quietly reloads the poll definition so
    // the next attempt carries a fresh version.
    async fn fail_and_refresh(&self, operation: Operation) {
        self.set_progress(operation, ProgressState::Failed);
        self.fetch_action_instance(false).await;
    }

    async fn close_poll(&self) {
        if !self.start(Operation::CloseActionInstance, |state| !state.is_in_progress()) {
            return;
        }
        let Some(info) = self.update_info(Some(ActionStatus::Closed), None) else {
            self.fail_and_refresh(Operation::CloseActionInstance).await;
            return;
        };

        match self.sdk.update_action(&info).await {
            Ok(true) => {
                self.store.dispatch(SummaryAction::PollCloseAlertOpen(false));
                self.set_progress(Operation::CloseActionInstance, ProgressState::Completed);
                self.close_view().await;
            }
            Ok(false) => {
                error!("closePoll failed, Error: not success");
                self.fail_and_refresh(Operation::CloseActionInstance).await;
            }
            Err(e) => {
                self.handle_error_response(&e);
                self.fail_and_refresh(Operation::CloseActionInstance).await;
            }
        }
    }

    async fn close_view(&self) {
        if let Err(e) = self.sdk.close_view().await {
            warn!("View stayed open after the poll change: {}", e.message);
        }
    }

    async fn delete_poll(&self) {
        let Some(context) = self.context() else { return };
        if !self.start(Operation::DeleteActionInstance, |state| !state.is_in_progress()) {
            return;
        }

        match self.sdk.delete_action(&context.action_id).await {
            Ok(true) => {
                self.store.dispatch(SummaryAction::PollDeleteAlertOpen(false));
                self.set_progress(Operation::DeleteActionInstance, ProgressState::Completed);
                self.close_view().await;
            }
            Ok(false) => {
                error!("deletePoll failed, Error: not success");
                self.fail_and_refresh(Operation::DeleteActionInstance).await;
            }
            Err(e) => {
                self.handle_error_response(&e);
                self.fail_and_refresh(Operation::DeleteActionInstance).await;
            }
        }
    }

    async fn update_due_date(&self, due_date: i64) {
        if !self.start(Operation::UpdateActionInstance, |state| !state.is_in_progress()) {
            return;
        }
        let Some(info) = self.update_info(None, Some(due_date)) else {
            self.fail_and_refresh(Operation::UpdateActionInstance).await;
            return;
        };

        match self.sdk.update_action(&info).await {
            Ok(true) => {
                self.set_progress(Operation::UpdateActionInstance, ProgressState::Completed);
                self.store
                    .dispatch(SummaryAction::PollExpiryChangeAlertOpen(false));
                self.fetch_action_instance(false).await;
            }
            Ok(false) => {
                error!("updateDueDate failed, Error: not success");
                self.fail_and_refresh(Operation::UpdateActionInstance).await;
            }
            Err(e) => {
                self.handle_error_response(&e);
                self.fail_and_refresh(Operation::UpdateActionInstance).await;
            }
        }
    }

    fn file_name(&self) -> String {
        self.store.read(|s| {
            result_file_name(
                &s.strings,
                s.question_title().unwrap_or_default(),
                self.file_name_max_length,
            )
        })
    }

    async fn download_csv(&self) {
        let Some(context) = self.context() else { return };
        if !self.start(Operation::DownloadData, |state| !state.is_in_progress()) {
            return;
        }
        let file_name = self.file_name();
        match self.sdk.download_results(&context.action_id, &file_name).await {
            Ok(()) => self.set_progress(Operation::DownloadData, ProgressState::Completed),
            Err(e) => self.handle_error(&e, Operation::DownloadData),
        }
    }

    async fn download_image(&self) {
        if !self.start(Operation::DownloadData, |state| !state.is_in_progress()) {
            return;
        }
        let snapshot = self.store.snapshot();
        let Some(options) = option_results(&snapshot) else {
            warn!("Results are not loaded yet, nothing to export");
            self.set_progress(Operation::DownloadData, ProgressState::Failed);
            return;
        };

        let row_count = snapshot.action_summary.as_ref().map_or(0, |summary| summary.row_count);
        let member_count = snapshot.member_count.unwrap_or(0);
        let participation = percent(row_count, member_count);
        let theme = snapshot.context.as_ref().map(|c| c.theme).unwrap_or_default();
        let image = draw_results(participation, &options, theme);

        match save_results_image(&image, &self.export_dir, &self.file_name()) {
            Ok(path) => {
                info!("Saved results image to {}", path.display());
                self.set_progress(Operation::DownloadData, ProgressState::Completed);
            }
            Err(e) => {
                error!("Results image export failed: {}", e);
                self.set_progress(Operation::DownloadData, ProgressState::Failed);
            }
        }
    }
}

fn unknown_members(ids: Vec<String>) -> Vec<SubscriptionMember> {
    ids.into_iter()
        .map(|id| SubscriptionMember { id, display_name: None })
        .collect()
}
