//! Scriptable in-memory host for orchestrator tests.

#![allow(dead_code)]

use async_trait::async_trait;
use poll_action::error::ApiError;
use poll_action::models::{
    Action, ActionContext, ActionUpdateInfo, DataRow, DataRowsPage, MembersLookup, RowFilter,
    RowsSummary, Subscription, SubscriptionMember,
};
use poll_action::sdk::ActionSdk;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Host-side data and what the views asked for.
#[derive(Debug, Default)]
pub struct MockState {
    pub context: ActionContext,
    pub action: Option<Action>,
    pub summary: RowsSummary,
    /// Served front to back by `get_data_rows(All)`.
    pub row_pages: VecDeque<DataRowsPage>,
    pub my_row: Option<DataRow>,
    /// Member id to display name.
    pub members: HashMap<String, String>,
    pub member_count: u64,
    pub non_responders: Vec<SubscriptionMember>,
    pub strings: HashMap<String, String>,
    /// Calls named here fail until the entry is removed.
    pub failures: HashMap<&'static str, ApiError>,

    pub created: Vec<Action>,
    pub updates: Vec<ActionUpdateInfo>,
    pub downloads: Vec<String>,
    pub row_tokens: Vec<Option<String>>,
    pub member_requests: Vec<Vec<String>>,
}

#[derive(Default)]
pub struct MockSdk {
    pub state: Mutex<MockState>,
    calls: Mutex<HashMap<&'static str, usize>>,
    /// When set, `get_data_rows(All)` waits for a permit before answering.
    pub row_gate: Option<Arc<Notify>>,
    view_closed: AtomicBool,
    loading_hidden: AtomicBool,
}

impl MockSdk {
    pub fn new(state: MockState) -> Self {
        Self {
            state: Mutex::new(state),
            ..Default::default()
        }
    }

    pub fn with_row_gate(mut self, gate: Arc<Notify>) -> Self {
        self.row_gate = Some(gate);
        self
    }

    pub fn calls(&self, name: &str) -> usize {
        self.calls.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    pub fn fail(&self, name: &'static str, error: ApiError) {
        self.state.lock().unwrap().failures.insert(name, error);
    }

    pub fn recover(&self, name: &'static str) {
        self.state.lock().unwrap().failures.remove(name);
    }

    pub fn view_closed(&self) -> bool {
        self.view_closed.load(Ordering::SeqCst)
    }

    pub fn loading_hidden(&self) -> bool {
        self.loading_hidden.load(Ordering::SeqCst)
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    fn record(&self, name: &'static str) -> Result<(), ApiError> {
        *self.calls.lock().unwrap().entry(name).or_insert(0) += 1;
        match self.state.lock().unwrap().failures.get(name) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn current_action(&self) -> Result<Action, ApiError> {
        self.state
            .lock()
            .unwrap()
            .action
            .clone()
            .ok_or_else(|| ApiError::not_found("action not found"))
    }
}

#[async_trait]
impl ActionSdk for MockSdk {
    async fn get_context(&self) -> Result<ActionContext, ApiError> {
        self.record("get_context")?;
        Ok(self.state.lock().unwrap().context.clone())
    }

    async fn create_action(&self, action: &Action) -> Result<(), ApiError> {
        self.record("create_action")?;
        self.state.lock().unwrap().created.push(action.clone());
        Ok(())
    }

    async fn get_action(&self, _action_id: &str) -> Result<Action, ApiError> {
        self.record("get_action")?;
        self.current_action()
    }

    async fn update_action(&self, info: &ActionUpdateInfo) -> Result<bool, ApiError> {
        self.record("update_action")?;
        let mut state = self.state.lock().unwrap();
        state.updates.push(info.clone());
        let Some(action) = state.action.as_mut() else {
            return Err(ApiError::not_found("action not found"));
        };
        if action.version != info.version {
            return Ok(false);
        }
        action.version += 1;
        if let Some(status) = info.status {
            action.status = status;
        }
        if let Some(expiry_time) = info.expiry_time {
            action.expiry_time = expiry_time;
        }
        Ok(true)
    }

    async fn delete_action(&self, _action_id: &str) -> Result<bool, ApiError> {
        self.record("delete_action")?;
        Ok(self.state.lock().unwrap().action.take().is_some())
    }

    async fn get_data_rows(
        &self,
        _action_id: &str,
        filter: RowFilter,
        continuation_token: Option<&str>,
        _page_size: usize,
    ) -> Result<DataRowsPage, ApiError> {
        if filter == RowFilter::Mine {
            self.record("get_my_row")?;
            let my_row = self.state.lock().unwrap().my_row.clone();
            return Ok(DataRowsPage {
                rows: my_row.into_iter().collect(),
                continuation_token: None,
            });
        }

        self.record("get_data_rows")?;
        if let Some(gate) = &self.row_gate {
            gate.notified().await;
        }
        let mut state = self.state.lock().unwrap();
        state.row_tokens.push(continuation_token.map(str::to_string));
        Ok(state.row_pages.pop_front().unwrap_or_default())
    }

    async fn get_rows_summary(&self, _action_id: &str, _add_default_aggregates: bool) -> Result<RowsSummary, ApiError> {
        self.record("get_rows_summary")?;
        Ok(self.state.lock().unwrap().summary.clone())
    }

    async fn get_member_count(&self, _subscription: &Subscription) -> Result<u64, ApiError> {
        self.record("get_member_count")?;
        Ok(self.state.lock().unwrap().member_count)
    }

    async fn get_members(&self, _subscription: &Subscription, user_ids: &[String]) -> Result<MembersLookup, ApiError> {
        self.record("get_members")?;
        let mut state = self.state.lock().unwrap();
        state.member_requests.push(user_ids.to_vec());
        let mut lookup = MembersLookup::default();
        for id in user_ids {
            match state.members.get(id) {
                Some(name) => lookup.members.push(SubscriptionMember {
                    id: id.clone(),
                    display_name: Some(name.clone()),
                }),
                None => lookup.ids_not_found.push(id.clone()),
            }
        }
        Ok(lookup)
    }

    async fn get_non_responders(&self, _action_id: &str, _subscription_id: &str) -> Result<Vec<SubscriptionMember>, ApiError> {
        self.record("get_non_responders")?;
        Ok(self.state.lock().unwrap().non_responders.clone())
    }

    async fn download_results(&self, _action_id: &str, file_name: &str) -> Result<(), ApiError> {
        self.record("download_results")?;
        self.state.lock().unwrap().downloads.push(file_name.to_string());
        Ok(())
    }

    async fn get_localized_strings(&self) -> Result<HashMap<String, String>, ApiError> {
        self.record("get_localized_strings")?;
        Ok(self.state.lock().unwrap().strings.clone())
    }

    async fn close_view(&self) -> Result<(), ApiError> {
        self.record("close_view")?;
        self.view_closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn hide_loading_indicator(&self) {
        self.loading_hidden.store(true, Ordering::SeqCst);
    }
}
