#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressState {
    #[default]
    NotStarted,
    InProgress,
    // More pages are available.
    Partial,
    Completed,
    Failed,
}

impl ProgressState {
    pub fn is_in_progress(self) -> bool {
        self == ProgressState::InProgress
    }

    pub fn is_completed(self) -> bool {
        self == ProgressState::Completed
    }

    pub fn is_failed(self) -> bool {
        self == ProgressState::Failed
    }

    pub fn can_start_once(self) -> bool {
        matches!(self, ProgressState::NotStarted | ProgressState::Failed)
    }

    pub fn can_fetch_more(self) -> bool {
        matches!(
            self,
            ProgressState::NotStarted | ProgressState::Partial | ProgressState::Failed
        )
    }
}
