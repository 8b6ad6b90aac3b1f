//! Model-session controller.
//!
//! Owns which model is believed active, which models exist and the state of
//! any model switch, and mediates every call into the [`Backend`]. Each
//! request is split into a synchronous `begin_*` step, a [`Backend`] dispatch
//! that may run on another task, and a synchronous `complete_*` step that
//! applies the result. The async `send`/`request_model_change` helpers run
//! all three in sequence.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use super::constants::{
    model_switched_notice, CHAT_FALLBACK_MESSAGE, MODEL_SWITCH_FAILED_MESSAGE,
};
use super::model_switch::{ModelSwitchStatus, SwitchEvent};
use super::transcript::Transcript;
use crate::api::client::{Backend, BackendError};
use crate::api::{ChatResponse, ModelUpdateResponse, ModelsResponse};

/// How the chat-send gate and the model-switch gate relate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestPolicy {
    /// Each gate only blocks its own kind of request; a send and a switch may
    /// be in flight together and complete in either order.
    #[default]
    Independent,
    /// One shared busy gate: nothing starts while anything is in flight.
    Exclusive,
}

impl RequestPolicy {
    pub fn from_exclusive(exclusive: bool) -> Self {
        if exclusive {
            RequestPolicy::Exclusive
        } else {
            RequestPolicy::Independent
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub current_model: String,
    pub available_models: Vec<String>,
    pub model_switch: ModelSwitchStatus,
    pub selector_open: bool,
}

impl SessionState {
    pub fn new(default_model: impl Into<String>) -> Self {
        Self {
            current_model: default_model.into(),
            available_models: Vec::new(),
            model_switch: ModelSwitchStatus::Idle,
            selector_open: false,
        }
    }
}

/// Why a send was not issued. Nothing is appended in any of these cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejected {
    EmptyInput,
    Pending,
    SwitchInProgress,
}

impl fmt::Display for SendRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendRejected::EmptyInput => write!(f, "message is empty"),
            SendRejected::Pending => write!(f, "a message is already being answered"),
            SendRejected::SwitchInProgress => write!(f, "a model switch is in progress"),
        }
    }
}

impl StdError for SendRejected {}

/// Why a model switch was not issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchRejected {
    InProgress,
    ChatPending,
}

impl fmt::Display for SwitchRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchRejected::InProgress => write!(f, "a model switch is already in progress"),
            SwitchRejected::ChatPending => write!(f, "a message is still being answered"),
        }
    }
}

impl StdError for SwitchRejected {}

/// An issued chat send awaiting its backend result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTicket {
    message: String,
    model: String,
}

impl SendTicket {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Model that was active when the send was issued.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn dispatch(&self, backend: &dyn Backend) -> Result<ChatResponse, BackendError> {
        backend.send_chat(&self.message, &self.model).await
    }
}

/// An issued model switch awaiting its backend result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchTicket {
    target: String,
}

impl SwitchTicket {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub async fn dispatch(
        &self,
        backend: &dyn Backend,
    ) -> Result<ModelUpdateResponse, BackendError> {
        backend.set_model(&self.target).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchStart {
    /// Target is already active; the selector was closed and nothing was sent.
    AlreadyCurrent,
    Started(SwitchTicket),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The backend answered. `drifted` is set when it reported a model other
    /// than the one believed active.
    Replied { model: String, drifted: bool },
    /// The fallback message was appended instead.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched { model: String },
    Failed,
}

pub struct ModelSessionController {
    backend: Arc<dyn Backend>,
    state: SessionState,
    policy: RequestPolicy,
}

impl ModelSessionController {
    pub fn new(backend: Arc<dyn Backend>, default_model: impl Into<String>) -> Self {
        Self {
            backend,
            state: SessionState::new(default_model),
            policy: RequestPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RequestPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Shared handle for dispatching tickets from spawned tasks.
    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn policy(&self) -> RequestPolicy {
        self.policy
    }

    pub fn current_model(&self) -> &str {
        &self.state.current_model
    }

    pub fn available_models(&self) -> &[String] {
        &self.state.available_models
    }

    pub fn model_switch(&self) -> &ModelSwitchStatus {
        &self.state.model_switch
    }

    pub fn selector_open(&self) -> bool {
        self.state.selector_open
    }

    pub fn open_selector(&mut self) {
        if !self.state.model_switch.in_progress() {
            self.state.selector_open = true;
        }
    }

    pub fn close_selector(&mut self) {
        self.state.selector_open = false;
    }

    /// Picker button: ignored while a switch is in flight.
    pub fn toggle_selector(&mut self) {
        if self.state.model_switch.in_progress() {
            return;
        }
        self.state.selector_open = !self.state.selector_open;
    }

    /// Best-effort startup fetch of the model catalog.
    pub async fn initialize(&mut self) -> bool {
        let result = self.backend.list_models().await;
        self.apply_model_catalog(result)
    }

    /// Apply a `list_models` result. Failures are logged and leave the
    /// defaults in place. Returns whether the catalog was adopted.
    pub fn apply_model_catalog(&mut self, result: Result<ModelsResponse, BackendError>) -> bool {
        match result {
            Ok(catalog) => {
                info!(
                    current = %catalog.current_model,
                    count = catalog.available_models.len(),
                    "model catalog loaded"
                );
                self.state.available_models = catalog.available_models;
                self.state.current_model = catalog.current_model;
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch models; keeping defaults");
                false
            }
        }
    }

    /// Record the user message and mark the transcript pending.
    pub fn begin_send(
        &mut self,
        text: &str,
        transcript: &mut Transcript,
    ) -> Result<SendTicket, SendRejected> {
        if text.trim().is_empty() {
            return Err(SendRejected::EmptyInput);
        }
        if transcript.is_pending() {
            return Err(SendRejected::Pending);
        }
        if self.policy == RequestPolicy::Exclusive && self.state.model_switch.in_progress() {
            return Err(SendRejected::SwitchInProgress);
        }

        let model = self.state.current_model.clone();
        transcript
            .append_user_message(text, Some(model.clone()))
            .ok_or(SendRejected::EmptyInput)?;
        transcript.set_pending(true);

        Ok(SendTicket {
            message: text.to_string(),
            model,
        })
    }

    /// Apply the backend result of a send. Always clears the pending flag.
    pub fn complete_send(
        &mut self,
        ticket: SendTicket,
        result: Result<ChatResponse, BackendError>,
        transcript: &mut Transcript,
    ) -> SendOutcome {
        let outcome = match result {
            Ok(reply) => {
                let drifted = reply.current_model != self.state.current_model;
                if drifted {
                    info!(
                        from = %self.state.current_model,
                        to = %reply.current_model,
                        "backend reported a different model; adopting it"
                    );
                    self.state.current_model = reply.current_model.clone();
                }
                transcript.append_assistant_message(reply.response, Some(reply.current_model.clone()));
                SendOutcome::Replied {
                    model: reply.current_model,
                    drifted,
                }
            }
            Err(err) => {
                error!(error = %err, model = %ticket.model, "chat request failed");
                transcript.append_assistant_message(CHAT_FALLBACK_MESSAGE, Some(ticket.model));
                SendOutcome::Failed
            }
        };
        transcript.set_pending(false);
        outcome
    }

    pub async fn send(
        &mut self,
        text: &str,
        transcript: &mut Transcript,
    ) -> Result<SendOutcome, SendRejected> {
        let ticket = self.begin_send(text, transcript)?;
        let result = ticket.dispatch(self.backend.as_ref()).await;
        Ok(self.complete_send(ticket, result, transcript))
    }

    /// Start switching to `target`, unless it is already active.
    pub fn begin_model_change(
        &mut self,
        target: &str,
        transcript: &Transcript,
    ) -> Result<SwitchStart, SwitchRejected> {
        if target == self.state.current_model {
            self.close_selector();
            return Ok(SwitchStart::AlreadyCurrent);
        }
        if self.state.model_switch.in_progress() {
            return Err(SwitchRejected::InProgress);
        }
        if self.policy == RequestPolicy::Exclusive && transcript.is_pending() {
            return Err(SwitchRejected::ChatPending);
        }

        self.transition(SwitchEvent::Started);
        Ok(SwitchStart::Started(SwitchTicket {
            target: target.to_string(),
        }))
    }

    /// Apply the backend result of a switch. The backend's confirmed model is
    /// authoritative, not the requested one.
    pub fn complete_model_change(
        &mut self,
        ticket: SwitchTicket,
        result: Result<ModelUpdateResponse, BackendError>,
        transcript: &mut Transcript,
    ) -> SwitchOutcome {
        match result {
            Ok(confirmed) => {
                if confirmed.current_model != ticket.target {
                    warn!(
                        requested = %ticket.target,
                        confirmed = %confirmed.current_model,
                        "backend confirmed a different model than requested"
                    );
                }
                info!(model = %confirmed.current_model, "model switched");
                self.state.current_model = confirmed.current_model.clone();
                if !confirmed.available_models.is_empty() {
                    self.state.available_models = confirmed.available_models;
                }
                transcript.append_assistant_message(
                    model_switched_notice(&confirmed.current_model),
                    Some(confirmed.current_model.clone()),
                );
                self.transition(SwitchEvent::Succeeded);
                self.close_selector();
                SwitchOutcome::Switched {
                    model: confirmed.current_model,
                }
            }
            Err(err) => {
                error!(error = %err, target = %ticket.target, "model switch failed");
                self.transition(SwitchEvent::Failed(MODEL_SWITCH_FAILED_MESSAGE.to_string()));
                SwitchOutcome::Failed
            }
        }
    }

    pub async fn request_model_change(
        &mut self,
        target: &str,
        transcript: &mut Transcript,
    ) -> Result<Option<SwitchOutcome>, SwitchRejected> {
        match self.begin_model_change(target, transcript)? {
            SwitchStart::AlreadyCurrent => Ok(None),
            SwitchStart::Started(ticket) => {
                let result = ticket.dispatch(self.backend.as_ref()).await;
                Ok(Some(self.complete_model_change(ticket, result, transcript)))
            }
        }
    }

    fn transition(&mut self, event: SwitchEvent) {
        let status = std::mem::take(&mut self.state.model_switch);
        self.state.model_switch = status.apply(event);
    }
}
