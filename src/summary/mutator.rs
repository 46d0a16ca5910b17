use crate::store::Mutate;
use crate::summary::actions::SummaryAction;
use crate::summary::store::{SummaryStore, ViewType};

impl Mutate for SummaryStore {
    type Action = SummaryAction;

    fn mutate(&mut self, action: &SummaryAction) {
        match action {
            SummaryAction::SetProgressStatus { operation, state } => {
                self.progress_status.set(*operation, *state)
            }
            SummaryAction::SetContext(context) => self.context = Some(context.clone()),
            SummaryAction::SetStrings(strings) => self.strings = strings.clone(),
            SummaryAction::UpdateMyRow(row) => self.my_row = row.clone(),
            SummaryAction::PollCloseAlertOpen(open) => self.is_poll_close_alert_open = *open,
            SummaryAction::PollExpiryChangeAlertOpen(open) => self.is_change_expiry_alert_open = *open,
            SummaryAction::PollDeleteAlertOpen(open) => self.is_delete_poll_alert_open = *open,
            SummaryAction::SetDueDate(date) => self.due_date = *date,
            SummaryAction::ShowMoreOptions(show) => self.show_more_options = *show,
            SummaryAction::SetCurrentView(view) => self.current_view = *view,
            SummaryAction::AddActionInstanceRows(rows) => {
                self.action_instance_rows.extend(rows.iter().cloned())
            }
            SummaryAction::UpdateContinuationToken(token) => self.continuation_token = token.clone(),
            SummaryAction::UpdateUserProfileInfo(members) => {
                for member in members {
                    self.user_profile.insert(member.id.clone(), member.clone());
                }
            }
            SummaryAction::UpdateMemberCount(count) => self.member_count = Some(*count),
            SummaryAction::GoBack => {
                if self.current_view != ViewType::Main {
                    self.current_view = ViewType::Main;
                }
            }
            SummaryAction::UpdateNonResponders(members) => {
                let mut sorted = members.clone();
                // Ordinal comparison; a missing name sorts first.
                sorted.sort_by(|a, b| a.display_name.cmp(&b.display_name));
                self.non_responders = Some(sorted);
            }
            SummaryAction::SetIsActionDeleted(deleted) => self.is_action_deleted = *deleted,
            SummaryAction::UpdateActionInstance(action) => {
                self.due_date = action.expiry_time;
                self.action_instance = Some(action.clone());
            }
            SummaryAction::UpdateActionInstanceSummary(summary) => {
                self.action_summary = Some(summary.clone())
            }
            SummaryAction::Initialize
            | SummaryAction::FetchUserDetails(_)
            | SummaryAction::FetchLocalization
            | SummaryAction::FetchMyResponse
            | SummaryAction::FetchMemberCount
            | SummaryAction::FetchActionInstanceRows { .. }
            | SummaryAction::FetchNonResponders
            | SummaryAction::FetchActionInstance { .. }
            | SummaryAction::FetchActionInstanceSummary { .. }
            | SummaryAction::UpdateDueDate(_)
            | SummaryAction::ClosePoll
            | SummaryAction::DeletePoll
            | SummaryAction::DownloadCsv
            | SummaryAction::DownloadImage => {}
        }
    }
}
