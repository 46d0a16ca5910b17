use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub const LOCALE_PROPERTY: &str = "Locale";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    All,
    Sender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActionStatus {
    #[default]
    Active,
    Expired,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Default,
    Dark,
    Contrast,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionContext {
    pub action_id: String,
    pub action_package_id: String,
    pub user_id: String,
    pub locale: String,
    pub theme: Theme,
    pub subscription: Subscription,
    pub last_session_data: Option<SessionDraft>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDraft {
    pub action: Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColumnValueType {
    #[default]
    SingleOption,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnOption {
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataColumn {
    pub name: String,
    pub display_name: String,
    pub value_type: ColumnValueType,
    pub options: Vec<ColumnOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTable {
    pub name: String,
    pub columns: Vec<DataColumn>,
    pub rows_visibility: Visibility,
    pub rows_editable: bool,
    pub can_user_add_multiple_rows: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionProperty {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub action_package_id: String,
    pub display_name: String,
    pub creator_id: String,
    pub version: i64,
    pub status: ActionStatus,
    pub expiry_time: i64,
    pub create_time: i64,
    pub update_time: i64,
    pub data_table: DataTable,
    pub custom_properties: Vec<ActionProperty>,
}

impl Action {
    pub fn new_poll(
        question: String,
        choices: Vec<String>,
        rows_visibility: Visibility,
        expiry_time: i64,
    ) -> Self {
        let options = choices
            .into_iter()
            .enumerate()
            .map(|(index, display_name)| ColumnOption {
                name: index.to_string(),
                display_name,
            })
            .collect();

        Self {
            id: String::new(),
            action_package_id: String::new(),
            display_name: "Poll".to_string(),
            creator_id: String::new(),
            version: 0,
            status: ActionStatus::Active,
            expiry_time,
            create_time: 0,
            update_time: 0,
            data_table: DataTable {
                name: String::new(),
                columns: vec![DataColumn {
                    name: "0".to_string(),
                    display_name: question,
                    value_type: ColumnValueType::SingleOption,
                    options,
                }],
                rows_visibility,
                rows_editable: true,
                can_user_add_multiple_rows: false,
            },
            custom_properties: Vec::new(),
        }
    }

    pub fn prepare_for_creation(&mut self, context: &ActionContext, now: i64) {
        if self.id.is_empty() {
            self.id = Uuid::new_v4().to_string();
            self.create_time = now;
        }
        self.update_time = now;
        self.creator_id = context.user_id.clone();
        self.action_package_id = context.action_package_id.clone();
        if self.version == 0 {
            self.version = 1;
        }

        let has_locale = self
            .custom_properties
            .iter()
            .any(|property| property.name == LOCALE_PROPERTY);
        if !has_locale {
            self.custom_properties.push(ActionProperty {
                name: LOCALE_PROPERTY.to_string(),
                value: context.locale.clone(),
            });
        }
    }

    pub fn question(&self) -> Option<&DataColumn> {
        self.data_table.columns.first()
    }

    pub fn title(&self) -> &str {
        self.question().map(|column| column.display_name.as_str()).unwrap_or("")
    }

    pub fn choices(&self) -> &[ColumnOption] {
        self.question().map(|column| column.options.as_slice()).unwrap_or(&[])
    }

    pub fn choice_display_name(&self, option_name: &str) -> Option<&str> {
        self.choices()
            .iter()
            .find(|option| option.name == option_name)
            .map(|option| option.display_name.as_str())
    }

    pub fn is_active(&self) -> bool {
        self.status == ActionStatus::Active
    }
}

// Partial update; `version` must match the stored version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionUpdateInfo {
    pub id: String,
    pub version: i64,
    pub status: Option<ActionStatus>,
    pub expiry_time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRow {
    pub id: String,
    pub creator_id: String,
    pub update_time: i64,
    // Column name to value; for the poll column the value is the option name.
    pub column_values: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFilter {
    All,
    Mine,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataRowsPage {
    pub rows: Vec<DataRow>,
    pub continuation_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RowsSummary {
    pub row_count: u64,
    // Column name to a JSON-encoded map of option name to count.
    pub default_aggregates: HashMap<String, String>,
}

impl RowsSummary {
    pub fn option_counts(&self, column_name: &str) -> Result<HashMap<String, u64>, serde_json::Error> {
        match self.default_aggregates.get(column_name) {
            Some(encoded) => serde_json::from_str(encoded),
            None => Ok(HashMap::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionMember {
    pub id: String,
    // `None` while unresolved or when the host could not find the member.
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MembersLookup {
    pub members: Vec<SubscriptionMember>,
    pub ids_not_found: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_poll_names_choices_by_position() {
        let action = Action::new_poll(
            "Lunch?".to_string(),
            vec!["Pizza".to_string(), "Sushi".to_string()],
            Visibility::Sender,
            42,
        );
        assert_eq!(action.title(), "Lunch?");
        assert_eq!(action.choice_display_name("1"), Some("Sushi"));
        assert_eq!(action.data_table.rows_visibility, Visibility::Sender);
        assert!(action.data_table.rows_editable);
    }

    #[test]
    fn prepare_for_creation_adds_locale_once() {
        let context = ActionContext {
            user_id: "u1".to_string(),
            locale: "en-US".to_string(),
            action_package_id: "pkg".to_string(),
            ..Default::default()
        };
        let mut action = Action::new_poll("Q".to_string(), vec![], Visibility::All, 0);
        action.prepare_for_creation(&context, 1_000);
        action.prepare_for_creation(&context, 2_000);

        assert!(!action.id.is_empty());
        assert_eq!(action.create_time, 1_000);
        assert_eq!(action.update_time, 2_000);
        assert_eq!(action.version, 1);
        assert_eq!(action.creator_id, "u1");
        assert_eq!(action.custom_properties.len(), 1);
        assert_eq!(action.custom_properties[0].value, "en-US");
    }

    #[test]
    fn option_counts_decodes_aggregate_json() {
        let mut summary = RowsSummary::default();
        summary
            .default_aggregates
            .insert("0".to_string(), r#"{"0":3,"1":1}"#.to_string());
        let counts = summary.option_counts("0").unwrap();
        assert_eq!(counts.get("0"), Some(&3));
        assert!(summary.option_counts("other").unwrap().is_empty());
    }
}
