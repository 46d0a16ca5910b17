use crate::config::{POLL_CHOICE_MAX_LENGTH, POLL_TITLE_MAX_LENGTH};
use crate::creation::actions::CreationAction;
use crate::creation::settings::settings_summary;
use crate::creation::store::{CreationStore, Page, PollSettings};
use crate::creation::validation::{FocusTarget, validate};
use crate::datetime::format_date;
use crate::localization::is_rtl;
use crate::models::Visibility;
use crate::progress::ProgressState;
use crate::view::{ButtonView, ErrorView, truncate_chars};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub value: String,
    pub placeholder: String,
    pub error: Option<String>,
    pub max_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceField {
    pub field: TextField,
    pub delete_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainPage {
    pub title: TextField,
    pub choices: Vec<ChoiceField>,
    pub add_choice: Option<String>,
    pub settings_label: String,
    pub settings_summary: String,
    pub next: ButtonView,
    pub focus: Option<FocusTarget>,
    pub announcement: Option<String>,
    pub rtl: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioOption {
    pub label: String,
    pub value: Visibility,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsPage {
    pub due_by_label: String,
    pub due_date: i64,
    pub due_date_text: String,
    pub visibility_label: String,
    pub visibility_options: Vec<RadioOption>,
    pub back: String,
    pub rtl: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationView {
    Loading,
    Error(ErrorView),
    Main(MainPage),
    Settings(SettingsPage),
}

pub fn render(store: &CreationStore, now_ms: i64) -> CreationView {
    match store.progress {
        ProgressState::NotStarted | ProgressState::InProgress => return CreationView::Loading,
        ProgressState::Failed => return CreationView::Error(ErrorView::generic(&store.strings)),
        ProgressState::Partial | ProgressState::Completed => {}
    }

    let rtl = store
        .context
        .as_ref()
        .map(|context| is_rtl(&context.locale))
        .unwrap_or(false);

    match store.current_page {
        Page::Main => CreationView::Main(main_page(store, now_ms, rtl)),
        Page::Settings => CreationView::Settings(settings_page(store, rtl)),
    }
}

fn main_page(store: &CreationStore, now_ms: i64, rtl: bool) -> MainPage {
    let strings = &store.strings;
    let report = validate(&store.title, &store.choices);
    let show_errors = store.should_validate;

    let title = TextField {
        value: store.title.clone(),
        placeholder: strings.get("PollTitlePlaceholder"),
        error: (show_errors && report.title_blank).then(|| strings.get("TitleBlankError")),
        max_length: POLL_TITLE_MAX_LENGTH,
    };

    let choices = store
        .choices
        .iter()
        .enumerate()
        .map(|(index, choice)| {
            let blank = report.blank_choices.get(index).copied().unwrap_or(false);
            ChoiceField {
                field: TextField {
                    value: choice.clone(),
                    placeholder: strings.format("Choice", &[&(index + 1)]),
                    error: (show_errors && blank).then(|| strings.get("BlankChoiceError")),
                    max_length: POLL_CHOICE_MAX_LENGTH,
                },
                delete_label: store
                    .can_delete_choice()
                    .then(|| strings.format("DeleteChoiceX", &[&(index + 1)])),
            }
        })
        .collect();

    let (focus, announcement) = if show_errors {
        let focus = report.first_invalid();
        let announcement = match focus {
            Some(FocusTarget::Title) => Some(strings.get("TitleBlankError")),
            Some(FocusTarget::Choice(_)) => Some(strings.get("BlankChoiceError")),
            None => None,
        };
        (focus, announcement)
    } else {
        (None, None)
    };

    let mut next = ButtonView::new(strings.get("Next"));
    next.loading = store.sending;
    next.disabled = store.sending;

    MainPage {
        title,
        choices,
        add_choice: store.can_add_choice().then(|| strings.get("AddChoice")),
        settings_label: strings.get("Settings"),
        settings_summary: settings_summary(&store.settings, strings, now_ms),
        next,
        focus,
        announcement,
        rtl,
    }
}

fn settings_page(store: &CreationStore, rtl: bool) -> SettingsPage {
    let strings = &store.strings;
    let option = |label: &str, value: Visibility| RadioOption {
        label: strings.get(label),
        value,
        checked: store.settings.result_visibility == value,
    };

    SettingsPage {
        due_by_label: strings.get("dueBy"),
        due_date: store.settings.due_date,
        due_date_text: format_date(store.settings.due_date),
        visibility_label: strings.get("resultsVisibleTo"),
        visibility_options: vec![
            option("resultsVisibleToAll", Visibility::All),
            option("resultsVisibleToSender", Visibility::Sender),
        ],
        back: strings.get("Back"),
        rtl,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationInput {
    Mounted,
    TitleChanged(String),
    ChoiceChanged { index: usize, text: String },
    ChoiceDeleted(usize),
    ChoiceAdded,
    DueDateSelected(i64),
    VisibilitySelected(Visibility),
    OpenSettings,
    CloseSettings,
    Submit,
}

pub fn actions_for(store: &CreationStore, input: CreationInput) -> Vec<CreationAction> {
    let settings = store.settings;
    match input {
        CreationInput::Mounted => vec![CreationAction::Initialize],
        CreationInput::TitleChanged(title) => vec![
            CreationAction::UpdateTitle(truncate_chars(&title, POLL_TITLE_MAX_LENGTH)),
            CreationAction::ShouldValidateUi(false),
        ],
        CreationInput::ChoiceChanged { index, text } => vec![
            CreationAction::UpdateChoiceText {
                index,
                text: truncate_chars(&text, POLL_CHOICE_MAX_LENGTH),
            },
            CreationAction::ShouldValidateUi(false),
        ],
        CreationInput::ChoiceDeleted(index) => vec![
            CreationAction::DeleteChoice { index },
            CreationAction::ShouldValidateUi(false),
        ],
        CreationInput::ChoiceAdded => vec![
            CreationAction::AddChoice,
            CreationAction::ShouldValidateUi(false),
        ],
        CreationInput::DueDateSelected(due_date) => {
            vec![CreationAction::UpdateSettings(PollSettings { due_date, ..settings })]
        }
        CreationInput::VisibilitySelected(result_visibility) => {
            vec![CreationAction::UpdateSettings(PollSettings {
                result_visibility,
                ..settings
            })]
        }
        CreationInput::OpenSettings => vec![CreationAction::GoToPage(Page::Settings)],
        CreationInput::CloseSettings => vec![CreationAction::GoToPage(Page::Main)],
        CreationInput::Submit => vec![CreationAction::CallActionInstanceCreationApi],
    }
}
