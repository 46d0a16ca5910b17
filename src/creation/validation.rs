#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Title,
    Choice(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub title_blank: bool,
    pub too_few_choices: bool,
    // One entry per choice, `true` where the choice is blank.
    pub blank_choices: Vec<bool>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        !self.title_blank && !self.too_few_choices && !self.blank_choices.iter().any(|blank| *blank)
    }

    pub fn first_invalid(&self) -> Option<FocusTarget> {
        if self.title_blank {
            return Some(FocusTarget::Title);
        }
        if let Some(index) = self.blank_choices.iter().position(|blank| *blank) {
            return Some(FocusTarget::Choice(index));
        }
        if self.too_few_choices {
            return Some(FocusTarget::Choice(self.blank_choices.len()));
        }
        None
    }
}

pub fn validate(title: &str, choices: &[String]) -> ValidationReport {
    ValidationReport {
        title_blank: title.trim().is_empty(),
        too_few_choices: choices.len() < 2,
        blank_choices: choices.iter().map(|choice| choice.trim().is_empty()).collect(),
    }
}
