//! Interactive session state: the transcript and controller plus the bits of
//! terminal UI state (input line, picker cursor, scroll) that key handling
//! mutates.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::client::BackendError;
use crate::api::{ChatResponse, ModelUpdateResponse, ModelsResponse};
use crate::core::controller::{
    ModelSessionController, SendOutcome, SendRejected, SendTicket, SwitchOutcome, SwitchStart,
    SwitchTicket,
};
use crate::core::transcript::Transcript;
use crate::ui::picker::PickerState;

const PAGE_SCROLL_LINES: u16 = 10;

/// Work the event loop must start on behalf of a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Send(SendTicket),
    SwitchModel(SwitchTicket),
}

pub struct App {
    pub transcript: Transcript,
    pub controller: ModelSessionController,
    pub input: String,
    pub picker: Option<PickerState>,
    /// Lines scrolled up from the newest message.
    pub scroll_offset: u16,
    max_scroll: u16,
    /// Short hint shown in the input title, cleared on the next key press.
    pub status: Option<String>,
}

impl App {
    pub fn new(transcript: Transcript, controller: ModelSessionController) -> Self {
        Self {
            transcript,
            controller,
            input: String::new(),
            picker: None,
            scroll_offset: 0,
            max_scroll: 0,
            status: None,
        }
    }

    /// Typing still works while locked; only submission is refused.
    pub fn input_locked(&self) -> bool {
        self.transcript.is_pending() || self.controller.model_switch().in_progress()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(AppAction::Quit);
        }
        self.status = None;

        if self.controller.selector_open() {
            return self.handle_picker_key(key);
        }

        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Tab => {
                self.toggle_model_picker();
                None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                None
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Up => {
                self.scroll_up(1);
                None
            }
            KeyCode::Down => {
                self.scroll_down(1);
                None
            }
            KeyCode::PageUp => {
                self.scroll_up(PAGE_SCROLL_LINES);
                None
            }
            KeyCode::PageDown => {
                self.scroll_down(PAGE_SCROLL_LINES);
                None
            }
            _ => None,
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        match key.code {
            KeyCode::Esc | KeyCode::Tab => {
                self.toggle_model_picker();
                None
            }
            KeyCode::Up => {
                if let Some(picker) = self.picker.as_mut() {
                    picker.move_up();
                }
                None
            }
            KeyCode::Down => {
                if let Some(picker) = self.picker.as_mut() {
                    picker.move_down();
                }
                None
            }
            KeyCode::Enter => self.confirm_picker_selection(),
            _ => None,
        }
    }

    /// Submit the input line. The line is kept when the send is refused.
    pub fn submit(&mut self) -> Option<AppAction> {
        if self.controller.model_switch().in_progress() {
            self.status = Some("Switching models...".to_string());
            return None;
        }
        match self.controller.begin_send(&self.input, &mut self.transcript) {
            Ok(ticket) => {
                self.input.clear();
                self.scroll_to_bottom();
                Some(AppAction::Send(ticket))
            }
            Err(SendRejected::EmptyInput) => None,
            Err(rejected) => {
                self.status = Some(rejected.to_string());
                None
            }
        }
    }

    pub fn toggle_model_picker(&mut self) {
        self.controller.toggle_selector();
        self.sync_picker();
    }

    fn sync_picker(&mut self) {
        if !self.controller.selector_open() {
            self.picker = None;
            return;
        }
        let keep_selection = self.picker.as_ref().and_then(|p| p.selected_id().map(str::to_owned));
        let mut picker = PickerState::for_models(
            self.controller.available_models(),
            self.controller.current_model(),
        );
        if let Some(id) = keep_selection {
            if let Some(index) = picker.items.iter().position(|item| item.id == id) {
                picker.selected = index;
            }
        }
        self.picker = Some(picker);
    }

    pub fn confirm_picker_selection(&mut self) -> Option<AppAction> {
        let target = self.picker.as_ref()?.selected_id()?.to_string();
        let action = match self.controller.begin_model_change(&target, &self.transcript) {
            Ok(SwitchStart::AlreadyCurrent) => None,
            Ok(SwitchStart::Started(ticket)) => Some(AppAction::SwitchModel(ticket)),
            Err(rejected) => {
                self.status = Some(rejected.to_string());
                None
            }
        };
        self.sync_picker();
        action
    }

    pub fn apply_model_catalog(&mut self, result: Result<ModelsResponse, BackendError>) {
        self.controller.apply_model_catalog(result);
        self.sync_picker();
    }

    pub fn apply_chat_result(
        &mut self,
        ticket: SendTicket,
        result: Result<ChatResponse, BackendError>,
    ) -> SendOutcome {
        let outcome = self
            .controller
            .complete_send(ticket, result, &mut self.transcript);
        self.scroll_to_bottom();
        outcome
    }

    pub fn apply_switch_result(
        &mut self,
        ticket: SwitchTicket,
        result: Result<ModelUpdateResponse, BackendError>,
    ) -> SwitchOutcome {
        let outcome =
            self.controller
                .complete_model_change(ticket, result, &mut self.transcript);
        self.sync_picker();
        if matches!(outcome, SwitchOutcome::Switched { .. }) {
            self.scroll_to_bottom();
        }
        outcome
    }

    /// Upper bound for `scroll_offset`, recomputed from the layout each frame.
    pub fn set_max_scroll(&mut self, max: u16) {
        self.max_scroll = max;
        self.scroll_offset = self.scroll_offset.min(max);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(self.max_scroll);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{DEFAULT_MODEL, MODEL_SWITCH_FAILED_MESSAGE};
    use crate::utils::test_utils::create_test_app;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn reply(text: &str) -> Result<ChatResponse, BackendError> {
        Ok(ChatResponse {
            response: text.to_string(),
            current_model: DEFAULT_MODEL.to_string(),
        })
    }

    #[test]
    fn ctrl_c_quits() {
        let (mut app, _) = create_test_app();
        let action = app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(action, Some(AppAction::Quit));
    }

    #[test]
    fn enter_issues_send_and_clears_input() {
        let (mut app, _) = create_test_app();
        type_text(&mut app, "I feel anxious today");

        let action = app.handle_key(key(KeyCode::Enter));

        let Some(AppAction::Send(ticket)) = action else {
            panic!("expected a send, got {action:?}");
        };
        assert_eq!(ticket.message(), "I feel anxious today");
        assert_eq!(ticket.model(), DEFAULT_MODEL);
        assert!(app.input.is_empty());
        assert!(app.transcript.is_pending());
        assert_eq!(app.transcript.len(), 2);
    }

    #[test]
    fn blank_enter_does_nothing() {
        let (mut app, backend) = create_test_app();
        type_text(&mut app, "   ");
        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
        assert_eq!(app.transcript.len(), 1);
        assert!(!app.transcript.is_pending());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn submission_is_refused_while_pending() {
        let (mut app, _) = create_test_app();
        type_text(&mut app, "first");
        let Some(AppAction::Send(ticket)) = app.handle_key(key(KeyCode::Enter)) else {
            panic!("expected a send");
        };

        type_text(&mut app, "second");
        assert!(app.input_locked());
        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
        assert_eq!(app.input, "second");
        assert!(app.status.is_some());

        app.apply_chat_result(ticket, reply("ok"));
        assert!(!app.input_locked());
        assert!(matches!(
            app.handle_key(key(KeyCode::Enter)),
            Some(AppAction::Send(_))
        ));
    }

    #[test]
    fn tab_opens_picker_on_current_model() {
        let (mut app, _) = create_test_app();
        app.handle_key(key(KeyCode::Tab));

        assert!(app.controller.selector_open());
        let picker = app.picker.as_ref().expect("picker open");
        assert_eq!(picker.selected_id(), Some(DEFAULT_MODEL));

        app.handle_key(key(KeyCode::Esc));
        assert!(!app.controller.selector_open());
        assert!(app.picker.is_none());
    }

    #[test]
    fn choosing_current_model_just_closes_picker() {
        let (mut app, backend) = create_test_app();
        app.handle_key(key(KeyCode::Tab));

        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
        assert!(app.picker.is_none());
        assert_eq!(app.transcript.len(), 1);
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn choosing_other_model_starts_switch() {
        let (mut app, _) = create_test_app();
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Down));

        let action = app.handle_key(key(KeyCode::Enter));
        let Some(AppAction::SwitchModel(ticket)) = action else {
            panic!("expected a switch, got {action:?}");
        };
        assert_eq!(ticket.target(), "mixtral-8x7b");
        assert!(app.controller.model_switch().in_progress());
        assert!(app.input_locked());

        app.apply_switch_result(
            ticket,
            Ok(ModelUpdateResponse {
                current_model: "mixtral-8x7b".into(),
                available_models: Vec::new(),
            }),
        );
        assert_eq!(app.controller.current_model(), "mixtral-8x7b");
        assert!(app.picker.is_none());
        assert_eq!(app.transcript.len(), 2);
    }

    #[test]
    fn failed_switch_keeps_picker_open_with_error() {
        let (mut app, _) = create_test_app();
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Down));
        let Some(AppAction::SwitchModel(ticket)) = app.handle_key(key(KeyCode::Enter)) else {
            panic!("expected a switch");
        };

        app.apply_switch_result(ticket, Err(BackendError::Network("down".into())));

        assert!(app.picker.is_some());
        assert_eq!(
            app.controller.model_switch().last_error(),
            Some(MODEL_SWITCH_FAILED_MESSAGE)
        );
        assert_eq!(app.controller.current_model(), DEFAULT_MODEL);
        assert!(!app.input_locked());
    }

    #[test]
    fn typing_during_switch_is_kept_but_not_sent() {
        let (mut app, _) = create_test_app();
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Esc));
        // Picker toggling is ignored mid-switch, so keys still go to the picker.
        assert!(app.controller.selector_open());
        assert_eq!(app.submit(), None);
        assert_eq!(app.transcript.len(), 1);
    }

    #[test]
    fn scrolling_saturates_at_bottom() {
        let (mut app, _) = create_test_app();
        app.set_max_scroll(50);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.scroll_offset, 0);
        app.handle_key(key(KeyCode::PageUp));
        assert_eq!(app.scroll_offset, PAGE_SCROLL_LINES);
        app.handle_key(key(KeyCode::Up));
        app.handle_key(key(KeyCode::PageDown));
        assert_eq!(app.scroll_offset, 1);
    }

    #[test]
    fn scrolling_up_stops_at_max_scroll() {
        let (mut app, _) = create_test_app();
        app.handle_key(key(KeyCode::PageUp));
        assert_eq!(app.scroll_offset, 0);

        app.set_max_scroll(3);
        app.handle_key(key(KeyCode::PageUp));
        app.handle_key(key(KeyCode::PageUp));
        assert_eq!(app.scroll_offset, 3);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.scroll_offset, 2);

        app.set_max_scroll(1);
        assert_eq!(app.scroll_offset, 1);
        app.handle_key(key(KeyCode::PageDown));
        assert_eq!(app.scroll_offset, 0);
    }
}
