use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::client::{Backend, BackendError};
use crate::api::{ChatResponse, ModelUpdateResponse, ModelsResponse};
use crate::core::app::App;
use crate::core::constants::DEFAULT_MODEL;
use crate::core::controller::ModelSessionController;
use crate::core::transcript::Transcript;

/// A call observed by [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    ListModels,
    SetModel(String),
    SendChat { message: String, model_name: String },
}

/// Backend double answering from per-operation queues of scripted results.
/// Calls with nothing scripted fail with a network error.
#[derive(Default)]
pub struct MockBackend {
    models: Mutex<VecDeque<Result<ModelsResponse, BackendError>>>,
    switches: Mutex<VecDeque<Result<ModelUpdateResponse, BackendError>>>,
    chats: Mutex<VecDeque<Result<ChatResponse, BackendError>>>,
    calls: Mutex<Vec<BackendCall>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_models(self, result: Result<ModelsResponse, BackendError>) -> Self {
        self.models.lock().unwrap().push_back(result);
        self
    }

    pub fn with_switch(self, result: Result<ModelUpdateResponse, BackendError>) -> Self {
        self.switches.lock().unwrap().push_back(result);
        self
    }

    pub fn with_chat(self, result: Result<ChatResponse, BackendError>) -> Self {
        self.chats.lock().unwrap().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next<T>(queue: &Mutex<VecDeque<Result<T, BackendError>>>) -> Result<T, BackendError> {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Network("no scripted response".to_string())))
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn list_models(&self) -> Result<ModelsResponse, BackendError> {
        self.record(BackendCall::ListModels);
        Self::next(&self.models)
    }

    async fn set_model(&self, model_name: &str) -> Result<ModelUpdateResponse, BackendError> {
        self.record(BackendCall::SetModel(model_name.to_string()));
        Self::next(&self.switches)
    }

    async fn send_chat(
        &self,
        message: &str,
        model_name: &str,
    ) -> Result<ChatResponse, BackendError> {
        self.record(BackendCall::SendChat {
            message: message.to_string(),
            model_name: model_name.to_string(),
        });
        Self::next(&self.chats)
    }
}

/// Interactive app over a fresh [`MockBackend`], seeded with the greeting and
/// a two-model catalog.
pub fn create_test_app() -> (App, Arc<MockBackend>) {
    let backend = Arc::new(MockBackend::new());
    let mut controller = ModelSessionController::new(backend.clone(), DEFAULT_MODEL);
    controller.apply_model_catalog(Ok(ModelsResponse {
        available_models: vec![DEFAULT_MODEL.to_string(), "mixtral-8x7b".to_string()],
        current_model: DEFAULT_MODEL.to_string(),
    }));
    let app = App::new(Transcript::with_greeting(DEFAULT_MODEL), controller);
    (app, backend)
}
