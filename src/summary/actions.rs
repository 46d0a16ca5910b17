use crate::localization::Localizer;
use crate::models::{Action, ActionContext, DataRow, RowsSummary, SubscriptionMember};
use crate::progress::ProgressState;
use crate::store::ActionName;
use crate::summary::store::{Operation, ViewType};

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryAction {
    // Orchestrated
    Initialize,
    FetchUserDetails(Vec<String>),
    FetchLocalization,
    FetchMyResponse,
    FetchMemberCount,
    FetchActionInstanceRows { should_fetch_user_details: bool },
    FetchNonResponders,
    FetchActionInstance { update_progress_state: bool },
    FetchActionInstanceSummary { update_progress_state: bool },
    UpdateDueDate(i64),
    ClosePoll,
    DeletePoll,
    DownloadCsv,
    DownloadImage,

    // Store updates
    SetProgressStatus { operation: Operation, state: ProgressState },
    SetContext(ActionContext),
    SetStrings(Localizer),
    UpdateMyRow(Option<DataRow>),
    PollCloseAlertOpen(bool),
    PollExpiryChangeAlertOpen(bool),
    PollDeleteAlertOpen(bool),
    SetDueDate(i64),
    ShowMoreOptions(bool),
    SetCurrentView(ViewType),
    AddActionInstanceRows(Vec<DataRow>),
    UpdateContinuationToken(Option<String>),
    UpdateUserProfileInfo(Vec<SubscriptionMember>),
    UpdateMemberCount(u64),
    GoBack,
    UpdateNonResponders(Vec<SubscriptionMember>),
    SetIsActionDeleted(bool),
    UpdateActionInstance(Action),
    UpdateActionInstanceSummary(RowsSummary),
}

impl SummaryAction {
    pub fn progress(operation: Operation, state: ProgressState) -> Self {
        SummaryAction::SetProgressStatus { operation, state }
    }
}

impl ActionName for SummaryAction {
    fn name(&self) -> &'static str {
        match self {
            SummaryAction::Initialize => "initialize",
            SummaryAction::FetchUserDetails(_) => "fetchUserDetails",
            SummaryAction::FetchLocalization => "fetchLocalization",
            SummaryAction::FetchMyResponse => "fetchMyResponse",
            SummaryAction::FetchMemberCount => "fetchMemberCount",
            SummaryAction::FetchActionInstanceRows { .. } => "fetchActionInstanceRows",
            SummaryAction::FetchNonResponders => "fetchNonResponders",
            SummaryAction::FetchActionInstance { .. } => "fetchActionInstance",
            SummaryAction::FetchActionInstanceSummary { .. } => "fetchActionInstanceSummary",
            SummaryAction::UpdateDueDate(_) => "updateDueDate",
            SummaryAction::ClosePoll => "closePoll",
            SummaryAction::DeletePoll => "deletePoll",
            SummaryAction::DownloadCsv => "downloadCSV",
            SummaryAction::DownloadImage => "downloadImage",
            SummaryAction::SetProgressStatus { .. } => "setProgressStatus",
            SummaryAction::SetContext(_) => "setContext",
            SummaryAction::SetStrings(_) => "setStrings",
            SummaryAction::UpdateMyRow(_) => "updateMyRow",
            SummaryAction::PollCloseAlertOpen(_) => "pollCloseAlertOpen",
            SummaryAction::PollExpiryChangeAlertOpen(_) => "pollExpiryChangeAlertOpen",
            SummaryAction::PollDeleteAlertOpen(_) => "pollDeleteAlertOpen",
            SummaryAction::SetDueDate(_) => "setDueDate",
            SummaryAction::ShowMoreOptions(_) => "showMoreOptions",
            SummaryAction::SetCurrentView(_) => "setCurrentView",
            SummaryAction::AddActionInstanceRows(_) => "actionInstanceRow",
            SummaryAction::UpdateContinuationToken(_) => "updateContinuationToken",
            SummaryAction::UpdateUserProfileInfo(_) => "updateUserProfileInfo",
            SummaryAction::UpdateMemberCount(_) => "updateMemberCount",
            SummaryAction::GoBack => "goBack",
            SummaryAction::UpdateNonResponders(_) => "updateNonResponders",
            SummaryAction::SetIsActionDeleted(_) => "setIsActionDeleted",
            SummaryAction::UpdateActionInstance(_) => "updateActionInstance",
            SummaryAction::UpdateActionInstanceSummary(_) => "updateActionInstanceSummary",
        }
    }
}
