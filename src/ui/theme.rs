use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Chat message styles
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_name_style: Style,
    pub assistant_text_style: Style,
    pub meta_style: Style,
    pub thinking_style: Style,

    // Chrome
    pub title_style: Style,
    pub input_border_style: Style,
    pub input_text_style: Style,
    pub disclaimer_style: Style,

    // Model picker
    pub picker_selected_style: Style,
    pub picker_badge_style: Style,
    pub error_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            assistant_name_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::White),
            meta_style: Style::default().fg(Color::DarkGray),
            thinking_style: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),

            title_style: Style::default()
                .fg(Color::White)
                .bg(Color::Indexed(55))
                .add_modifier(Modifier::BOLD),
            input_border_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
            disclaimer_style: Style::default().fg(Color::DarkGray),

            picker_selected_style: Style::default().add_modifier(Modifier::REVERSED),
            picker_badge_style: Style::default().fg(Color::Magenta),
            error_style: Style::default().fg(Color::Red),
        }
    }

    pub fn light() -> Self {
        Theme {
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            assistant_name_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            assistant_text_style: Style::default().fg(Color::Black),
            meta_style: Style::default().fg(Color::Gray),
            thinking_style: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            title_style: Style::default()
                .fg(Color::White)
                .bg(Color::Indexed(61))
                .add_modifier(Modifier::BOLD),
            input_border_style: Style::default().fg(Color::Black),
            input_text_style: Style::default().fg(Color::Black),
            disclaimer_style: Style::default().fg(Color::Gray),

            picker_selected_style: Style::default().add_modifier(Modifier::REVERSED),
            picker_badge_style: Style::default().fg(Color::Magenta),
            error_style: Style::default().fg(Color::Red),
        }
    }

    /// Built-in theme by name; unknown names fall back to the dark theme.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(|n| n.to_ascii_lowercase()).as_deref() {
            Some("light") => Theme::light(),
            _ => Theme::dark_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(
            Theme::from_name(Some("LIGHT")).input_text_style,
            Theme::light().input_text_style
        );
    }

    #[test]
    fn unknown_or_missing_names_use_dark() {
        let dark = Theme::dark_default().input_text_style;
        assert_eq!(Theme::from_name(None).input_text_style, dark);
        assert_eq!(Theme::from_name(Some("solarized")).input_text_style, dark);
    }
}
