use crate::config::Config;
use crate::datetime::default_expiry;
use crate::localization::Localizer;
use crate::models::{Action, ActionContext, DataRow, RowsSummary, SubscriptionMember, Visibility};
use crate::progress::ProgressState;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewType {
    #[default]
    Main,
    ResponderView,
    NonResponderView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CurrentContext,
    Localization,
    ActionInstance,
    ActionInstanceSummary,
    MemberCount,
    NonResponders,
    ActionInstanceRows,
    MyRow,
    DownloadData,
    CloseActionInstance,
    DeleteActionInstance,
    UpdateActionInstance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressStatus {
    pub current_context: ProgressState,
    pub localization: ProgressState,
    pub action_instance: ProgressState,
    pub action_instance_summary: ProgressState,
    pub member_count: ProgressState,
    pub non_responders: ProgressState,
    pub action_instance_rows: ProgressState,
    pub my_row: ProgressState,
    pub download_data: ProgressState,
    pub close_action_instance: ProgressState,
    pub delete_action_instance: ProgressState,
    pub update_action_instance: ProgressState,
}

impl ProgressStatus {
    fn slot_mut(&mut self, operation: Operation) -> &mut ProgressState {
        match operation {
            Operation::CurrentContext => &mut self.current_context,
            Operation::Localization => &mut self.localization,
            Operation::ActionInstance => &mut self.action_instance,
            Operation::ActionInstanceSummary => &mut self.action_instance_summary,
            Operation::MemberCount => &mut self.member_count,
            Operation::NonResponders => &mut self.non_responders,
            Operation::ActionInstanceRows => &mut self.action_instance_rows,
            Operation::MyRow => &mut self.my_row,
            Operation::DownloadData => &mut self.download_data,
            Operation::CloseActionInstance => &mut self.close_action_instance,
            Operation::DeleteActionInstance => &mut self.delete_action_instance,
            Operation::UpdateActionInstance => &mut self.update_action_instance,
        }
    }

    pub fn get(&self, operation: Operation) -> ProgressState {
        match operation {
            Operation::CurrentContext => self.current_context,
            Operation::Localization => self.localization,
            Operation::ActionInstance => self.action_instance,
            Operation::ActionInstanceSummary => self.action_instance_summary,
            Operation::MemberCount => self.member_count,
            Operation::NonResponders => self.non_responders,
            Operation::ActionInstanceRows => self.action_instance_rows,
            Operation::MyRow => self.my_row,
            Operation::DownloadData => self.download_data,
            Operation::CloseActionInstance => self.close_action_instance,
            Operation::DeleteActionInstance => self.delete_action_instance,
            Operation::UpdateActionInstance => self.update_action_instance,
        }
    }

    pub fn set(&mut self, operation: Operation, state: ProgressState) {
        *self.slot_mut(operation) = state;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStore {
    pub context: Option<ActionContext>,
    pub strings: Localizer,
    pub action_instance: Option<Action>,
    pub action_summary: Option<RowsSummary>,
    pub due_date: i64,
    pub current_view: ViewType,
    pub continuation_token: Option<String>,
    pub action_instance_rows: Vec<DataRow>,
    pub my_row: Option<DataRow>,
    // A member without a display name is pending or unknown to the host.
    pub user_profile: HashMap<String, SubscriptionMember>,
    pub non_responders: Option<Vec<SubscriptionMember>>,
    pub member_count: Option<u64>,
    pub show_more_options: bool,
    pub is_poll_close_alert_open: bool,
    pub is_change_expiry_alert_open: bool,
    pub is_delete_poll_alert_open: bool,
    pub progress_status: ProgressStatus,
    pub is_action_deleted: bool,
    pub row_fetch_threshold: usize,
}

impl SummaryStore {
    pub fn new(now: DateTime<Utc>, config: &Config) -> Self {
        Self {
            context: None,
            strings: Localizer::english(),
            action_instance: None,
            action_summary: None,
            due_date: default_expiry(now, config.default_active_days).timestamp_millis(),
            current_view: ViewType::Main,
            continuation_token: None,
            action_instance_rows: Vec::new(),
            my_row: None,
            user_profile: HashMap::new(),
            non_responders: None,
            member_count: None,
            show_more_options: false,
            is_poll_close_alert_open: false,
            is_change_expiry_alert_open: false,
            is_delete_poll_alert_open: false,
            progress_status: ProgressStatus::default(),
            is_action_deleted: false,
            row_fetch_threshold: config.row_fetch_threshold,
        }
    }

    pub fn is_current_user_creator(&self) -> bool {
        match (&self.action_instance, &self.context) {
            (Some(action), Some(context)) => action.creator_id == context.user_id,
            _ => false,
        }
    }

    pub fn is_poll_active(&self) -> bool {
        self.action_instance
            .as_ref()
            .is_some_and(|action| action.is_active())
    }

    pub fn can_current_user_view_results(&self) -> bool {
        match &self.action_instance {
            Some(action) => {
                action.data_table.rows_visibility == Visibility::All || self.is_current_user_creator()
            }
            None => false,
        }
    }

    pub fn question_title(&self) -> Option<&str> {
        self.action_instance.as_ref().map(|action| action.title())
    }

    pub fn user_display_name(&self, user_id: &str) -> Option<&str> {
        self.user_profile
            .get(user_id)
            .and_then(|member| member.display_name.as_deref())
    }
}
