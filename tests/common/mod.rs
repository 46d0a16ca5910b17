//! Shared fixtures for the flow tests.

#![allow(dead_code, unused_imports)]

pub mod mock_sdk;

use chrono::{TimeZone, Utc};
use mock_sdk::{MockSdk, MockState};
use poll_action::config::Config;
use poll_action::creation::{CreationOrchestrator, CreationStore};
use poll_action::models::{
    Action, ActionContext, DataRow, DataRowsPage, RowsSummary, Subscription, SubscriptionMember,
    Visibility,
};
use poll_action::sdk::SdkClient;
use poll_action::store::Store;
use poll_action::summary::{SummaryOrchestrator, SummaryStore};
use std::collections::HashMap;
use std::sync::Arc;

pub const ACTION_ID: &str = "action-1";
pub const CREATOR_ID: &str = "creator";
pub const VOTER_ID: &str = "voter";
/// 2026-06-01 12:00 UTC.
pub const EXPIRY: i64 = 1_780_315_200_000;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn context_for(user_id: &str) -> ActionContext {
    ActionContext {
        action_id: ACTION_ID.to_string(),
        action_package_id: "poll".to_string(),
        user_id: user_id.to_string(),
        locale: "en-US".to_string(),
        subscription: Subscription {
            id: "team-1".to_string(),
        },
        ..Default::default()
    }
}

/// Active "Lunch?" poll by `CREATOR_ID` with choices Pizza ("0") and Sushi ("1").
pub fn poll(visibility: Visibility) -> Action {
    let mut action = Action::new_poll(
        "Lunch?".to_string(),
        vec!["Pizza".to_string(), "Sushi".to_string()],
        visibility,
        EXPIRY,
    );
    action.id = ACTION_ID.to_string();
    action.creator_id = CREATOR_ID.to_string();
    action.version = 1;
    action
}

pub fn vote(row_id: &str, creator_id: &str, option: &str) -> DataRow {
    DataRow {
        id: row_id.to_string(),
        creator_id: creator_id.to_string(),
        update_time: EXPIRY - 60_000,
        column_values: HashMap::from([("0".to_string(), option.to_string())]),
    }
}

pub fn page(rows: Vec<DataRow>, token: Option<&str>) -> DataRowsPage {
    DataRowsPage {
        rows,
        continuation_token: token.map(str::to_string),
    }
}

/// `counts` holds (option name, votes).
pub fn summary(counts: &[(&str, u64)]) -> RowsSummary {
    let map: HashMap<&str, u64> = counts.iter().copied().collect();
    RowsSummary {
        row_count: counts.iter().map(|(_, count)| count).sum(),
        default_aggregates: HashMap::from([(
            "0".to_string(),
            serde_json::to_string(&map).unwrap(),
        )]),
    }
}

pub fn member(id: &str, name: Option<&str>) -> SubscriptionMember {
    SubscriptionMember {
        id: id.to_string(),
        display_name: name.map(str::to_string),
    }
}

/// Host state for `user_id` looking at an open "Lunch?" poll.
pub fn host_state(user_id: &str, visibility: Visibility) -> MockState {
    MockState {
        context: context_for(user_id),
        action: Some(poll(visibility)),
        summary: summary(&[("0", 3), ("1", 1)]),
        member_count: 8,
        members: HashMap::from([
            (CREATOR_ID.to_string(), "Casey".to_string()),
            (VOTER_ID.to_string(), "Val".to_string()),
        ]),
        ..Default::default()
    }
}

pub fn test_config() -> Config {
    Config {
        page_size: 2,
        ..Config::default()
    }
}

pub fn summary_orchestrator(sdk: Arc<MockSdk>, config: &Config) -> SummaryOrchestrator {
    let store = Arc::new(Store::new(SummaryStore::new(
        Utc.with_ymd_and_hms(2026, 5, 20, 9, 0, 0).unwrap(),
        config,
    )));
    SummaryOrchestrator::new(store, SdkClient::new(sdk), config)
}

pub fn creation_orchestrator(sdk: Arc<MockSdk>) -> CreationOrchestrator {
    let store = Arc::new(Store::new(CreationStore::new(
        Utc.with_ymd_and_hms(2026, 5, 20, 9, 0, 0).unwrap(),
        &Config::default(),
    )));
    CreationOrchestrator::new(store, SdkClient::new(sdk))
}
