use crate::creation::store::{Page, PollSettings};
use crate::localization::Localizer;
use crate::models::ActionContext;
use crate::progress::ProgressState;
use crate::store::ActionName;

#[derive(Debug, Clone, PartialEq)]
pub enum CreationAction {
    Initialize,
    SetContext(ActionContext),
    SetStrings(Localizer),
    AddChoice,
    DeleteChoice { index: usize },
    UpdateChoiceText { index: usize, text: String },
    UpdateTitle(String),
    UpdateSettings(PollSettings),
    ShouldValidateUi(bool),
    SetSendingFlag(bool),
    SetProgressState(ProgressState),
    GoToPage(Page),
    CallActionInstanceCreationApi,
}

impl ActionName for CreationAction {
    fn name(&self) -> &'static str {
        match self {
            CreationAction::Initialize => "initialize",
            CreationAction::SetContext(_) => "setContext",
            CreationAction::SetStrings(_) => "setStrings",
            CreationAction::AddChoice => "addChoice",
            CreationAction::DeleteChoice { .. } => "deleteChoice",
            CreationAction::UpdateChoiceText { .. } => "updateChoiceText",
            CreationAction::UpdateTitle(_) => "updateTitle",
            CreationAction::UpdateSettings(_) => "updateSettings",
            CreationAction::ShouldValidateUi(_) => "shouldValidateUI",
            CreationAction::SetSendingFlag(_) => "setSendingFlag",
            CreationAction::SetProgressState(_) => "setProgressState",
            CreationAction::GoToPage(_) => "goToPage",
            CreationAction::CallActionInstanceCreationApi => "callActionInstanceCreationAPI",
        }
    }
}
