use crate::datetime::{format_date, now_millis};
use crate::error::{ApiError, HostError};
use crate::models::{
    Action, ActionContext, ActionStatus, ActionUpdateInfo, DataRow, DataRowsPage, MembersLookup,
    RowFilter, RowsSummary, Subscription, SubscriptionMember, Theme,
};
use crate::sdk::ActionSdk;
use async_trait::async_trait;
use log::{debug, info};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, migrate::MigrateDatabase};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct HostSession {
    pub action_id: String,
    pub action_package_id: String,
    pub user_id: String,
    pub locale: String,
    pub theme: Theme,
    pub subscription_id: String,
    pub export_dir: PathBuf,
}

pub struct SqliteHost {
    pool: SqlitePool,
    session: HostSession,
    view_closed: AtomicBool,
}

fn status_to_str(status: ActionStatus) -> &'static str {
    match status {
        ActionStatus::Active => "active",
        ActionStatus::Expired => "expired",
        ActionStatus::Closed => "closed",
    }
}

fn status_from_str(status: &str) -> ActionStatus {
    match status {
        "closed" => ActionStatus::Closed,
        "expired" => ActionStatus::Expired,
        _ => ActionStatus::Active,
    }
}

fn data_row(row: &SqliteRow) -> Result<DataRow, HostError> {
    Ok(DataRow {
        id: row.try_get("id")?,
        creator_id: row.try_get("creator_id")?,
        update_time: row.try_get("update_time")?,
        column_values: serde_json::from_str(&row.try_get::<String, _>("column_values")?)?,
    })
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

impl SqliteHost {
    pub async fn connect(db_url: &str, session: HostSession) -> Result<Self, HostError> {
        if !db_url.contains(":memory:") && !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            Sqlite::create_database(db_url).await?;
        }

        // In-memory databases are per connection.
        let max_connections = if db_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(db_url)
            .await?;

        Self::init_schema(&pool).await?;

        Ok(Self {
            pool,
            session,
            view_closed: AtomicBool::new(false),
        })
    }

    pub fn view_closed(&self) -> bool {
        self.view_closed.load(Ordering::SeqCst)
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), HostError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS actions (
                id TEXT PRIMARY KEY,
                creator_id TEXT NOT NULL,
                version INTEGER NOT NULL,
                status TEXT NOT NULL,
                expiry_time INTEGER NOT NULL,
                update_time INTEGER NOT NULL,
                body TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS data_rows (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                action_id TEXT NOT NULL,
                creator_id TEXT NOT NULL,
                update_time INTEGER NOT NULL,
                column_values TEXT NOT NULL,
                FOREIGN KEY (action_id) REFERENCES actions(id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS members (
                subscription_id TEXT NOT NULL,
                id TEXT NOT NULL,
                display_name TEXT NOT NULL,
                PRIMARY KEY (subscription_id, id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn require_action(&self, action_id: &str) -> Result<(), HostError> {
        let exists = sqlx::query("SELECT 1 FROM actions WHERE id = ?")
            .bind(action_id)
            .fetch_optional(&self.pool)
            .await?
            .is_some();
        if exists {
            Ok(())
        } else {
            Err(HostError::ActionNotFound(action_id.to_string()))
        }
    }

    pub async fn insert_action(&self, action: &Action) -> Result<(), HostError> {
        sqlx::query(
            r#"
            INSERT INTO actions (id, creator_id, version, status, expiry_time, update_time, body)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&action.id)
        .bind(&action.creator_id)
        .bind(action.version)
        .bind(status_to_str(action.status))
        .bind(action.expiry_time)
        .bind(action.update_time)
        .bind(serde_json::to_string(action)?)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn load_action(&self, action_id: &str) -> Result<Action, HostError> {
        let row = sqlx::query(
            r#"
            SELECT version, status, expiry_time, update_time, body
            FROM actions
            WHERE id = ?
            "#,
        )
        .bind(action_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| HostError::ActionNotFound(action_id.to_string()))?;

        // Columns hold the mutable fields; the body keeps the rest.
        let mut action: Action = serde_json::from_str(&row.try_get::<String, _>("body")?)?;
        action.version = row.try_get("version")?;
        action.status = status_from_str(&row.try_get::<String, _>("status")?);
        action.expiry_time = row.try_get("expiry_time")?;
        action.update_time = row.try_get("update_time")?;
        Ok(action)
    }

    pub async fn apply_update(&self, info: &ActionUpdateInfo) -> Result<bool, HostError> {
        let current = self.load_action(&info.id).await?;
        if current.version != info.version {
            info!(
                "Rejecting update of {}: version {} is stale (current {})",
                info.id, info.version, current.version
            );
            return Ok(false);
        }

        let status = info.status.unwrap_or(current.status);
        let expiry_time = info.expiry_time.unwrap_or(current.expiry_time);
        let result = sqlx::query(
            r#"
            UPDATE actions
            SET version = version + 1, status = ?, expiry_time = ?, update_time = ?
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(status_to_str(status))
        .bind(expiry_time)
        .bind(now_millis())
        .bind(&info.id)
        .bind(info.version)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn remove_action(&self, action_id: &str) -> Result<bool, HostError> {
        self.require_action(action_id).await?;
        sqlx::query("DELETE FROM data_rows WHERE action_id = ?")
            .bind(action_id)
            .execute(&self.pool)
            .await?;
        let result = sqlx::query("DELETE FROM actions WHERE id = ?")
            .bind(action_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn add_member(&self, subscription_id: &str, user_id: &str, display_name: &str) -> Result<(), HostError> {
        sqlx::query(
            r#"
            INSERT INTO members (subscription_id, id, display_name)
            VALUES (?, ?, ?)
            ON CONFLICT(subscription_id, id)
            DO UPDATE SET display_name = excluded.display_name
            "#,
        )
        .bind(subscription_id)
        .bind(user_id)
        .bind(display_name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn submit_response(&self, action_id: &str, user_id: &str, option_name: &str) -> Result<DataRow, HostError> {
        let action = self.load_action(action_id).await?;
        let column_name = action
            .question()
            .map(|column| column.name.clone())
            .unwrap_or_else(|| "0".to_string());

        let mut column_values = HashMap::new();
        column_values.insert(column_name, option_name.to_string());
        let row = DataRow {
            id: uuid::Uuid::new_v4().to_string(),
            creator_id: user_id.to_string(),
            update_time: now_millis(),
            column_values,
        };

        if !action.data_table.can_user_add_multiple_rows {
            sqlx::query("DELETE FROM data_rows WHERE action_id = ? AND creator_id = ?")
                .bind(action_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO data_rows (id, action_id, creator_id, update_time, column_values)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(action_id)
        .bind(&row.creator_id)
        .bind(row.update_time)
        .bind(serde_json::to_string(&row.column_values)?)
        .execute(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn rows_page(
        &self,
        action_id: &str,
        creator_id: Option<&str>,
        continuation_token: Option<&str>,
        page_size: usize,
    ) -> Result<DataRowsPage, HostError> {
        self.require_action(action_id).await?;

        let offset = match continuation_token {
            Some(token) => token
                .parse::<i64>()
                .map_err(|_| HostError::InvalidToken(token.to_string()))?,
            None => 0,
        };
        let page_size = page_size.max(1) as i64;

        // One extra row tells whether another page exists.
        let rows = sqlx::query(
            r#"
            SELECT id, creator_id, update_time, column_values
            FROM data_rows
            WHERE action_id = ? AND (? IS NULL OR creator_id = ?)
            ORDER BY seq
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(action_id)
        .bind(creator_id)
        .bind(creator_id)
        .bind(page_size + 1)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let has_more = rows.len() as i64 > page_size;
        let mut page = Vec::with_capacity(rows.len());
        for row in rows.iter().take(page_size as usize) {
            page.push(data_row(row)?);
        }

        Ok(DataRowsPage {
            rows: page,
            continuation_token: has_more.then(|| (offset + page_size).to_string()),
        })
    }

    async fn all_rows(&self, action_id: &str) -> Result<Vec<DataRow>, HostError> {
        self.require_action(action_id).await?;
        let rows = sqlx::query(
            r#"
            SELECT id, creator_id, update_time, column_values
            FROM data_rows
            WHERE action_id = ?
            ORDER BY seq
            "#,
        )
        .bind(action_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(data_row).collect()
    }

    pub async fn summary(&self, action_id: &str, add_default_aggregates: bool) -> Result<RowsSummary, HostError> {
        let action = self.load_action(action_id).await?;
        let all = self.all_rows(action_id).await?;

        let mut summary = RowsSummary {
            row_count: all.len() as u64,
            default_aggregates: HashMap::new(),
        };

        if add_default_aggregates {
            if let Some(column) = action.question() {
                let mut counts: HashMap<String, u64> = HashMap::new();
                for row in &all {
                    if let Some(choice) = row.column_values.get(&column.name) {
                        *counts.entry(choice.clone()).or_insert(0) += 1;
                    }
                }
                summary
                    .default_aggregates
                    .insert(column.name.clone(), serde_json::to_string(&counts)?);
            }
        }

        Ok(summary)
    }

    pub async fn members(&self, subscription_id: &str) -> Result<Vec<SubscriptionMember>, HostError> {
        let members = sqlx::query(
            r#"
            SELECT id, display_name
            FROM members
            WHERE subscription_id = ?
            ORDER BY id
            "#,
        )
        .bind(subscription_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|row| {
            Ok(SubscriptionMember {
                id: row.try_get("id")?,
                display_name: Some(row.try_get("display_name")?),
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;
        Ok(members)
    }

    pub async fn non_responders(&self, action_id: &str, subscription_id: &str) -> Result<Vec<SubscriptionMember>, HostError> {
        let rows = self.all_rows(action_id).await?;
        let responded: HashSet<String> = rows.into_iter().map(|row| row.creator_id).collect();
        let members = self.members(subscription_id).await?;
        Ok(members
            .into_iter()
            .filter(|member| !responded.contains(&member.id))
            .collect())
    }

    pub async fn write_results_csv(&self, action_id: &str, file_name: &str) -> Result<PathBuf, HostError> {
        let action = self.load_action(action_id).await?;
        let rows = self.all_rows(action_id).await?;
        let names: HashMap<String, String> = self
            .members(&self.session.subscription_id)
            .await?
            .into_iter()
            .filter_map(|member| member.display_name.map(|name| (member.id, name)))
            .collect();
        let column_name = action.question().map(|column| column.name.clone()).unwrap_or_default();

        let mut csv = String::from("Responder,Response,Time\n");
        for row in &rows {
            let name = names.get(&row.creator_id).map(String::as_str).unwrap_or(&row.creator_id);
            let choice = row
                .column_values
                .get(&column_name)
                .and_then(|option| action.choice_display_name(option))
                .unwrap_or("");
            csv.push_str(&format!(
                "{},{},{}\n",
                csv_field(name),
                csv_field(choice),
                csv_field(&format_date(row.update_time))
            ));
        }

        tokio::fs::create_dir_all(&self.session.export_dir).await?;
        let path = self.session.export_dir.join(format!("{file_name}.csv"));
        tokio::fs::write(&path, csv).await?;
        Ok(path)
    }
}

#[async_trait]
impl ActionSdk for SqliteHost {
    async fn get_context(&self) -> Result<ActionContext, ApiError> {
        Ok(ActionContext {
            action_id: self.session.action_id.clone(),
            action_package_id: self.session.action_package_id.clone(),
            user_id: self.session.user_id.clone(),
            locale: self.session.locale.clone(),
            theme: self.session.theme,
            subscription: Subscription {
                id: self.session.subscription_id.clone(),
            },
            last_session_data: None,
        })
    }

    async fn create_action(&self, action: &Action) -> Result<(), ApiError> {
        Ok(self.insert_action(action).await?)
    }

    async fn get_action(&self, action_id: &str) -> Result<Action, ApiError> {
        let mut action = self.load_action(action_id).await?;
        if action.is_active() && action.expiry_time <= now_millis() {
            action.status = ActionStatus::Expired;
        }
        Ok(action)
    }

    async fn update_action(&self, info: &ActionUpdateInfo) -> Result<bool, ApiError> {
        Ok(self.apply_update(info).await?)
    }

    async fn delete_action(&self, action_id: &str) -> Result<bool, ApiError> {
        Ok(self.remove_action(action_id).await?)
    }

    async fn get_data_rows(
        &self,
        action_id: &str,
        filter: RowFilter,
        continuation_token: Option<&str>,
        page_size: usize,
    ) -> Result<DataRowsPage, ApiError> {
        let creator = match filter {
            RowFilter::All => None,
            RowFilter::Mine => Some(self.session.user_id.as_str()),
        };
        Ok(self.rows_page(action_id, creator, continuation_token, page_size).await?)
    }

    async fn get_rows_summary(&self, action_id: &str, add_default_aggregates: bool) -> Result<RowsSummary, ApiError> {
        Ok(self.summary(action_id, add_default_aggregates).await?)
    }

    async fn get_member_count(&self, subscription: &Subscription) -> Result<u64, ApiError> {
        Ok(self.members(&subscription.id).await?.len() as u64)
    }

    async fn get_members(&self, subscription: &Subscription, user_ids: &[String]) -> Result<MembersLookup, ApiError> {
        let known: HashMap<String, SubscriptionMember> = self
            .members(&subscription.id)
            .await?
            .into_iter()
            .map(|member| (member.id.clone(), member))
            .collect();

        let mut lookup = MembersLookup::default();
        for id in user_ids {
            match known.get(id) {
                Some(member) => lookup.members.push(member.clone()),
                None => lookup.ids_not_found.push(id.clone()),
            }
        }
        Ok(lookup)
    }

    async fn get_non_responders(&self, action_id: &str, subscription_id: &str) -> Result<Vec<SubscriptionMember>, ApiError> {
        Ok(self.non_responders(action_id, subscription_id).await?)
    }

    async fn download_results(&self, action_id: &str, file_name: &str) -> Result<(), ApiError> {
        let path = self.write_results_csv(action_id, file_name).await?;
        info!("Results written to {}", path.display());
        Ok(())
    }

    async fn get_localized_strings(&self) -> Result<HashMap<String, String>, ApiError> {
        // The bundled table already covers the local host's only locale.
        Ok(HashMap::new())
    }

    async fn close_view(&self) -> Result<(), ApiError> {
        self.view_closed.store(true, Ordering::SeqCst);
        info!("View closed");
        Ok(())
    }

    fn hide_loading_indicator(&self) {
        debug!("Loading indicator hidden");
    }
}
