use crate::config::Config;
use crate::datetime::default_expiry;
use crate::localization::Localizer;
use crate::models::{ActionContext, Visibility};
use crate::progress::ProgressState;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Main,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub result_visibility: Visibility,
    pub due_date: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreationStore {
    pub context: Option<ActionContext>,
    pub strings: Localizer,
    pub progress: ProgressState,
    pub title: String,
    pub max_options: usize,
    // Always between 2 and `max_options` entries.
    pub choices: Vec<String>,
    pub settings: PollSettings,
    pub should_validate: bool,
    pub sending: bool,
    pub current_page: Page,
}

impl CreationStore {
    pub fn new(now: DateTime<Utc>, config: &Config) -> Self {
        Self {
            context: None,
            strings: Localizer::english(),
            progress: ProgressState::NotStarted,
            title: String::new(),
            max_options: config.max_options.max(2),
            choices: vec![String::new(), String::new()],
            settings: PollSettings {
                result_visibility: Visibility::All,
                due_date: default_expiry(now, config.default_active_days).timestamp_millis(),
            },
            should_validate: false,
            sending: false,
            current_page: Page::Main,
        }
    }

    pub fn can_add_choice(&self) -> bool {
        self.choices.len() < self.max_options
    }

    pub fn can_delete_choice(&self) -> bool {
        self.choices.len() > 2
    }
}
