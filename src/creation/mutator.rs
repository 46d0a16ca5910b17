use crate::creation::actions::CreationAction;
use crate::creation::store::CreationStore;
use crate::models::ActionContext;
use crate::store::Mutate;

impl Mutate for CreationStore {
    type Action = CreationAction;

    fn mutate(&mut self, action: &CreationAction) {
        match action {
            CreationAction::SetContext(context) => self.set_context(context),
            CreationAction::SetStrings(strings) => self.strings = strings.clone(),
            CreationAction::AddChoice => {
                if self.can_add_choice() {
                    self.choices.push(String::new());
                }
            }
            CreationAction::DeleteChoice { index } => {
                if self.can_delete_choice() && *index < self.choices.len() {
                    self.choices.remove(*index);
                }
            }
            CreationAction::UpdateChoiceText { index, text } => {
                if let Some(choice) = self.choices.get_mut(*index) {
                    *choice = text.clone();
                }
            }
            CreationAction::UpdateTitle(title) => self.title = title.clone(),
            CreationAction::UpdateSettings(settings) => self.settings = *settings,
            CreationAction::ShouldValidateUi(should_validate) => self.should_validate = *should_validate,
            CreationAction::SetSendingFlag(sending) => self.sending = *sending,
            CreationAction::SetProgressState(state) => self.progress = *state,
            CreationAction::GoToPage(page) => self.current_page = *page,
            CreationAction::Initialize | CreationAction::CallActionInstanceCreationApi => {}
        }
    }
}

impl CreationStore {
    // Restores a draft carried over from an earlier session.
    fn set_context(&mut self, context: &ActionContext) {
        self.context = Some(context.clone());
        let Some(draft) = &context.last_session_data else {
            return;
        };

        let action = &draft.action;
        self.title = action.title().to_string();
        let mut choices: Vec<String> = action
            .choices()
            .iter()
            .take(self.max_options)
            .map(|option| option.display_name.clone())
            .collect();
        while choices.len() < 2 {
            choices.push(String::new());
        }
        self.choices = choices;
        self.settings.result_visibility = action.data_table.rows_visibility;
        self.settings.due_date = action.expiry_time;
    }
}
