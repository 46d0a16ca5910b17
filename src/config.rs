use crate::models::{Theme, Visibility};
use crate::sdk::sqlite::HostSession;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 30;
pub const DEFAULT_ROW_FETCH_THRESHOLD: usize = 5;
pub const DEFAULT_MAX_OPTIONS: usize = 10;
pub const DEFAULT_ACTIVE_DAYS: i64 = 7;
pub const POLL_TITLE_MAX_LENGTH: usize = 4000;
pub const POLL_CHOICE_MAX_LENGTH: usize = 4000;
pub const RESULT_FILE_NAME_MAX_LENGTH: usize = 50;
// Due date edits closer than this to the current expiry are ignored.
pub const MIN_DUE_DATE_CHANGE_SECS: i64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
    #[error("{0} must be set")]
    Missing(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Summary,
    Creation,
}

impl FromStr for Flow {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "summary" => Ok(Flow::Summary),
            "creation" | "create" => Ok(Flow::Creation),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub choices: Vec<String>,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub user_id: String,
    pub user_name: String,
    pub action_id: Option<String>,
    pub action_package_id: String,
    pub subscription_id: String,
    pub locale: String,
    pub theme: Theme,
    pub export_dir: PathBuf,
    pub page_size: usize,
    pub row_fetch_threshold: usize,
    pub max_options: usize,
    pub default_active_days: i64,
    pub file_name_max_length: usize,
    pub flow: Flow,
    pub draft: Draft,
    pub command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:poll_action.db".to_string(),
            user_id: "local-user".to_string(),
            user_name: "Local User".to_string(),
            action_id: None,
            action_package_id: "poll".to_string(),
            subscription_id: "local-team".to_string(),
            locale: "en-US".to_string(),
            theme: Theme::Default,
            export_dir: PathBuf::from("exports"),
            page_size: DEFAULT_PAGE_SIZE,
            row_fetch_threshold: DEFAULT_ROW_FETCH_THRESHOLD,
            max_options: DEFAULT_MAX_OPTIONS,
            default_active_days: DEFAULT_ACTIVE_DAYS,
            file_name_max_length: RESULT_FILE_NAME_MAX_LENGTH,
            flow: Flow::default(),
            draft: Draft::default(),
            command: None,
        }
    }
}

fn parse_number(key: &'static str, value: String) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(user_id) = lookup("POLL_USER_ID") {
            config.user_id = user_id;
        }
        if let Some(user_name) = lookup("POLL_USER_NAME") {
            config.user_name = user_name;
        }
        config.action_id = lookup("POLL_ACTION_ID").filter(|id| !id.trim().is_empty());
        if let Some(subscription_id) = lookup("POLL_SUBSCRIPTION_ID") {
            config.subscription_id = subscription_id;
        }
        if let Some(locale) = lookup("POLL_LOCALE") {
            config.locale = locale;
        }
        if let Some(theme) = lookup("POLL_THEME") {
            config.theme = match theme.to_ascii_lowercase().as_str() {
                "default" | "light" => Theme::Default,
                "dark" => Theme::Dark,
                "contrast" => Theme::Contrast,
                _ => return Err(ConfigError::Invalid { key: "POLL_THEME", value: theme }),
            };
        }
        if let Some(dir) = lookup("POLL_EXPORT_DIR") {
            config.export_dir = PathBuf::from(dir);
        }
        if let Some(page_size) = lookup("POLL_PAGE_SIZE") {
            config.page_size = parse_number("POLL_PAGE_SIZE", page_size)?;
        }
        if let Some(max_options) = lookup("POLL_MAX_OPTIONS") {
            let max_options = parse_number("POLL_MAX_OPTIONS", max_options)?;
            if max_options < 2 {
                return Err(ConfigError::Invalid {
                    key: "POLL_MAX_OPTIONS",
                    value: max_options.to_string(),
                });
            }
            config.max_options = max_options;
        }

        if let Some(flow) = lookup("POLL_VIEW") {
            config.flow = flow
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "POLL_VIEW", value: flow })?;
        }
        if let Some(title) = lookup("POLL_TITLE") {
            config.draft.title = title;
        }
        if let Some(choices) = lookup("POLL_CHOICES") {
            config.draft.choices = choices.split(',').map(|choice| choice.to_string()).collect();
        }
        if let Some(visibility) = lookup("POLL_VISIBILITY") {
            config.draft.visibility = match visibility.to_ascii_lowercase().as_str() {
                "all" | "everyone" => Visibility::All,
                "sender" | "creator" => Visibility::Sender,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "POLL_VISIBILITY",
                        value: visibility,
                    });
                }
            };
        }
        config.command = lookup("POLL_COMMAND").filter(|command| !command.trim().is_empty());

        if config.flow == Flow::Summary && config.action_id.is_none() {
            return Err(ConfigError::Missing("POLL_ACTION_ID"));
        }

        Ok(config)
    }

    pub fn host_session(&self) -> HostSession {
        HostSession {
            action_id: self.action_id.clone().unwrap_or_default(),
            action_package_id: self.action_package_id.clone(),
            user_id: self.user_id.clone(),
            locale: self.locale.clone(),
            theme: self.theme,
            subscription_id: self.subscription_id.clone(),
            export_dir: self.export_dir.clone(),
        }
    }
}
