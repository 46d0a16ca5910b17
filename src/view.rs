use crate::localization::Localizer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub title: String,
    pub subtitle: Option<String>,
    pub button: String,
}

impl ErrorView {
    pub fn generic(strings: &Localizer) -> Self {
        Self {
            title: strings.get("GenericError"),
            subtitle: None,
            button: strings.get("Close"),
        }
    }

    pub fn deleted(strings: &Localizer) -> Self {
        Self {
            title: strings.get("PollDeletedError"),
            subtitle: Some(strings.get("PollDeletedErrorDescription")),
            button: strings.get("Close"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub label: String,
    pub disabled: bool,
    pub loading: bool,
}

impl ButtonView {
    pub fn new(label: String) -> Self {
        Self {
            label,
            disabled: false,
            loading: false,
        }
    }
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
