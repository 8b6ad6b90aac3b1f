//! Lifecycle of a model-switch request as a finite state value.

/// What the picker shows about the most recent switch attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModelSwitchStatus {
    #[default]
    Idle,
    Switching,
    /// Last attempt failed; the message stays until the next attempt starts.
    Failed(String),
}

/// Inputs to [`ModelSwitchStatus::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchEvent {
    Started,
    Succeeded,
    Failed(String),
}

impl ModelSwitchStatus {
    /// Pure transition function.
    pub fn apply(self, event: SwitchEvent) -> Self {
        match event {
            SwitchEvent::Started => ModelSwitchStatus::Switching,
            SwitchEvent::Succeeded => ModelSwitchStatus::Idle,
            SwitchEvent::Failed(message) => ModelSwitchStatus::Failed(message),
        }
    }

    pub fn in_progress(&self) -> bool {
        matches!(self, ModelSwitchStatus::Switching)
    }

    pub fn last_error(&self) -> Option<&str> {
        match self {
            ModelSwitchStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}
