pub mod sqlite;

use crate::error::ApiError;
use crate::models::{
    Action, ActionContext, ActionUpdateInfo, DataRowsPage, MembersLookup, RowFilter, RowsSummary,
    Subscription, SubscriptionMember,
};
use async_trait::async_trait;
use log::{error, info};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

pub use sqlite::SqliteHost;

#[async_trait]
pub trait ActionSdk: Send + Sync {
    async fn get_context(&self) -> Result<ActionContext, ApiError>;

    async fn create_action(&self, action: &Action) -> Result<(), ApiError>;

    async fn get_action(&self, action_id: &str) -> Result<Action, ApiError>;

    // `Ok(false)` means the host rejected the update, e.g. a stale version.
    async fn update_action(&self, info: &ActionUpdateInfo) -> Result<bool, ApiError>;

    async fn delete_action(&self, action_id: &str) -> Result<bool, ApiError>;

    async fn get_data_rows(
        &self,
        action_id: &str,
        filter: RowFilter,
        continuation_token: Option<&str>,
        page_size: usize,
    ) -> Result<DataRowsPage, ApiError>;

    async fn get_rows_summary(
        &self,
        action_id: &str,
        add_default_aggregates: bool,
    ) -> Result<RowsSummary, ApiError>;

    async fn get_member_count(&self, subscription: &Subscription) -> Result<u64, ApiError>;

    async fn get_members(
        &self,
        subscription: &Subscription,
        user_ids: &[String],
    ) -> Result<MembersLookup, ApiError>;

    async fn get_non_responders(
        &self,
        action_id: &str,
        subscription_id: &str,
    ) -> Result<Vec<SubscriptionMember>, ApiError>;

    async fn download_results(&self, action_id: &str, file_name: &str) -> Result<(), ApiError>;

    async fn get_localized_strings(&self) -> Result<HashMap<String, String>, ApiError>;

    async fn close_view(&self) -> Result<(), ApiError>;

    fn hide_loading_indicator(&self);
}

#[derive(Clone)]
pub struct SdkClient {
    inner: Arc<dyn ActionSdk>,
}

fn logged<T: Debug>(name: &str, request: impl Debug, result: Result<T, ApiError>) -> Result<T, ApiError> {
    match &result {
        Ok(response) => info!("{} success - Request: {:?} Response: {:?}", name, request, response),
        Err(e) => error!("{} failed, Error: {}", name, e),
    }
    result
}

impl SdkClient {
    pub fn new(inner: Arc<dyn ActionSdk>) -> Self {
        Self { inner }
    }

    pub async fn get_context(&self) -> Result<ActionContext, ApiError> {
        logged("getContext", (), self.inner.get_context().await)
    }

    pub async fn create_action(&self, action: &Action) -> Result<(), ApiError> {
        logged("createAction", &action.id, self.inner.create_action(action).await)
    }

    pub async fn get_action(&self, action_id: &str) -> Result<Action, ApiError> {
        logged("getAction", action_id, self.inner.get_action(action_id).await)
    }

    pub async fn update_action(&self, info: &ActionUpdateInfo) -> Result<bool, ApiError> {
        logged("updateAction", info, self.inner.update_action(info).await)
    }

    pub async fn delete_action(&self, action_id: &str) -> Result<bool, ApiError> {
        logged("deleteAction", action_id, self.inner.delete_action(action_id).await)
    }

    pub async fn get_data_rows(
        &self,
        action_id: &str,
        filter: RowFilter,
        continuation_token: Option<&str>,
        page_size: usize,
    ) -> Result<DataRowsPage, ApiError> {
        let result = self
            .inner
            .get_data_rows(action_id, filter, continuation_token, page_size)
            .await;
        match &result {
            Ok(page) => info!(
                "getDataRows success - action {} filter {:?} token {:?}: {} row(s), next token {:?}",
                action_id,
                filter,
                continuation_token,
                page.rows.len(),
                page.continuation_token
            ),
            Err(e) => error!("getDataRows failed, Error: {}", e),
        }
        result
    }

    pub async fn get_rows_summary(&self, action_id: &str, add_default_aggregates: bool) -> Result<RowsSummary, ApiError> {
        logged(
            "getRowsSummary",
            action_id,
            self.inner.get_rows_summary(action_id, add_default_aggregates).await,
        )
    }

    pub async fn get_member_count(&self, subscription: &Subscription) -> Result<u64, ApiError> {
        logged("getMemberCount", subscription, self.inner.get_member_count(subscription).await)
    }

    pub async fn get_members(&self, subscription: &Subscription, user_ids: &[String]) -> Result<MembersLookup, ApiError> {
        logged("getMembers", user_ids, self.inner.get_members(subscription, user_ids).await)
    }

    pub async fn get_non_responders(
        &self,
        action_id: &str,
        subscription_id: &str,
    ) -> Result<Vec<SubscriptionMember>, ApiError> {
        logged(
            "getNonResponders",
            (action_id, subscription_id),
            self.inner.get_non_responders(action_id, subscription_id).await,
        )
    }

    pub async fn download_results(&self, action_id: &str, file_name: &str) -> Result<(), ApiError> {
        logged(
            "downloadResults",
            (action_id, file_name),
            self.inner.download_results(action_id, file_name).await,
        )
    }

    pub async fn get_localized_strings(&self) -> Result<HashMap<String, String>, ApiError> {
        let result = self.inner.get_localized_strings().await;
        match &result {
            Ok(strings) => info!("getLocalizedStrings success - {} string(s)", strings.len()),
            Err(e) => error!("getLocalizedStrings failed, Error: {}", e),
        }
        result
    }

    pub async fn close_view(&self) -> Result<(), ApiError> {
        logged("closeView", (), self.inner.close_view().await)
    }

    pub fn hide_loading_indicator(&self) {
        self.inner.hide_loading_indicator();
    }
}
