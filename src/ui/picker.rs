#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerState {
    pub title: String,
    pub items: Vec<PickerItem>,
    pub selected: usize,
}

impl PickerState {
    pub fn new<T: Into<String>>(title: T, items: Vec<PickerItem>, selected: usize) -> Self {
        Self {
            title: title.into(),
            items,
            selected,
        }
    }

    /// Model picker with the active model preselected.
    pub fn for_models(models: &[String], current: &str) -> Self {
        let items: Vec<PickerItem> = models
            .iter()
            .map(|model| PickerItem {
                id: model.clone(),
                label: model.clone(),
            })
            .collect();
        let selected = items
            .iter()
            .position(|item| item.id == current)
            .unwrap_or(0);
        Self::new("Select AI Model", items, selected)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.items.get(self.selected).map(|i| i.id.as_str())
    }

    pub fn move_up(&mut self) {
        if !self.items.is_empty() {
            if self.selected == 0 {
                self.selected = self.items.len() - 1;
            } else {
                self.selected -= 1;
            }
        }
    }

    pub fn move_down(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn models() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into()]
    }

    #[test]
    fn preselects_current_model() {
        let picker = PickerState::for_models(&models(), "b");
        assert_eq!(picker.selected_id(), Some("b"));
    }

    #[test]
    fn unknown_current_selects_first() {
        let picker = PickerState::for_models(&models(), "zzz");
        assert_eq!(picker.selected_id(), Some("a"));
    }

    #[test]
    fn movement_wraps_around() {
        let mut picker = PickerState::for_models(&models(), "a");
        picker.move_up();
        assert_eq!(picker.selected_id(), Some("c"));
        picker.move_down();
        assert_eq!(picker.selected_id(), Some("a"));
    }

    #[test]
    fn empty_picker_has_no_selection() {
        let mut picker = PickerState::for_models(&[], "a");
        picker.move_down();
        picker.move_up();
        assert_eq!(picker.selected_id(), None);
    }
}
