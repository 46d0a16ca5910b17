use lazy_static::lazy_static;
use log::warn;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

const ENGLISH_STRINGS: &str = include_str!("../strings/en.json");

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{(\d+)\}").expect("placeholder pattern is valid");
    static ref ENGLISH: Arc<HashMap<String, String>> = Arc::new(parse_table(ENGLISH_STRINGS));
}

fn parse_table(raw: &str) -> HashMap<String, String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Failed to parse bundled strings: {}", e);
        HashMap::new()
    })
}

// Localized string table. Lookups fall back to the bundled English table,
// then to the key itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Localizer {
    strings: Arc<HashMap<String, String>>,
}

impl Default for Localizer {
    fn default() -> Self {
        Self::english()
    }
}

impl Localizer {
    pub fn english() -> Self {
        Self {
            strings: Arc::clone(&ENGLISH),
        }
    }

    pub fn from_strings(strings: HashMap<String, String>) -> Self {
        Self {
            strings: Arc::new(strings),
        }
    }

    pub fn get(&self, key: &str) -> String {
        self.format(key, &[])
    }

    pub fn format(&self, key: &str, args: &[&dyn Display]) -> String {
        let template = self
            .strings
            .get(key)
            .or_else(|| ENGLISH.get(key))
            .map(String::as_str)
            .unwrap_or(key);

        if args.is_empty() {
            return template.to_string();
        }

        PLACEHOLDER
            .replace_all(template, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| args.get(index))
                    .map(|arg| arg.to_string())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

pub fn is_rtl(locale: &str) -> bool {
    let language = locale.split('-').next().unwrap_or("");
    matches!(language, "ar" | "he" | "fl")
}
