use crate::creation::actions::CreationAction;
use crate::creation::store::CreationStore;
use crate::creation::validation::validate;
use crate::datetime::now_millis;
use crate::localization::Localizer;
use crate::models::Action;
use crate::progress::ProgressState;
use crate::sdk::SdkClient;
use crate::store::Store;
use log::{error, info, warn};
use std::sync::Arc;

#[derive(Clone)]
pub struct CreationOrchestrator {
    store: Arc<Store<CreationStore>>,
    sdk: SdkClient,
}

impl CreationOrchestrator {
    pub fn new(store: Arc<Store<CreationStore>>, sdk: SdkClient) -> Self {
        Self { store, sdk }
    }

    pub fn store(&self) -> &Arc<Store<CreationStore>> {
        &self.store
    }

    pub async fn dispatch(&self, action: CreationAction) {
        self.store.apply(&action);
        match action {
            CreationAction::Initialize => self.initialize().await,
            CreationAction::CallActionInstanceCreationApi => self.create_action_instance().await,
            _ => {}
        }
    }

    pub async fn dispatch_all(&self, actions: Vec<CreationAction>) {
        for action in actions {
            self.dispatch(action).await;
        }
    }

    async fn initialize(&self) {
        let started = self.store.dispatch_if(
            |s| s.progress.can_start_once(),
            CreationAction::SetProgressState(ProgressState::InProgress),
        );
        if !started {
            return;
        }

        let context = match self.sdk.get_context().await {
            Ok(context) => context,
            Err(_) => {
                self.store
                    .dispatch(CreationAction::SetProgressState(ProgressState::Failed));
                return;
            }
        };
        self.store.dispatch(CreationAction::SetContext(context));

        match self.sdk.get_localized_strings().await {
            Ok(strings) => {
                self.store
                    .dispatch(CreationAction::SetStrings(Localizer::from_strings(strings)));
                self.store
                    .dispatch(CreationAction::SetProgressState(ProgressState::Completed));
                self.sdk.hide_loading_indicator();
            }
            Err(_) => self
                .store
                .dispatch(CreationAction::SetProgressState(ProgressState::Failed)),
        }
    }

    async fn create_action_instance(&self) {
        if self.store.read(|s| s.sending) {
            warn!("Poll submit ignored, a submit is already in flight");
            return;
        }

        let title = self.store.read(|s| s.title.trim().to_string());
        self.store.dispatch(CreationAction::UpdateTitle(title));
        let choices = self.store.read(|s| s.choices.clone());
        for (index, choice) in choices.iter().enumerate() {
            let trimmed = choice.trim();
            if trimmed.len() != choice.len() {
                self.store.dispatch(CreationAction::UpdateChoiceText {
                    index,
                    text: trimmed.to_string(),
                });
            }
        }

        let snapshot = self.store.snapshot();
        let report = validate(&snapshot.title, &snapshot.choices);
        if !report.is_valid() {
            info!("Poll is incomplete, focusing {:?}", report.first_invalid());
            self.store.dispatch(CreationAction::ShouldValidateUi(true));
            return;
        }

        if !self
            .store
            .dispatch_if(|s| !s.sending, CreationAction::SetSendingFlag(true))
        {
            return;
        }

        let Some(context) = snapshot.context.as_ref() else {
            error!("Cannot create a poll without a host context");
            self.store.dispatch(CreationAction::SetSendingFlag(false));
            return;
        };

        let mut action = Action::new_poll(
            snapshot.title.clone(),
            snapshot.choices.clone(),
            snapshot.settings.result_visibility,
            snapshot.settings.due_date,
        );
        // Empty unless the host reserved an id.
        action.id = context.action_id.clone();
        action.prepare_for_creation(context, now_millis());

        match self.sdk.create_action(&action).await {
            Ok(()) => info!("Created poll {}", action.id),
            Err(e) => {
                error!("Poll creation failed: {}", e);
                self.store.dispatch(CreationAction::SetSendingFlag(false));
            }
        }
    }
}
