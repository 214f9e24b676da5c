use ratatui::style::Color;

/// Display classification driving the color of state tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    #[default]
    None,
    Primary,
    Success,
    Danger,
}

impl Intent {
    pub fn color(self) -> Color {
        match self {
            Intent::None => Color::Gray,
            Intent::Primary => Color::Blue,
            Intent::Success => Color::Green,
            Intent::Danger => Color::Red,
        }
    }
}

/// Maps a lifecycle state to its intent. Unknown states are neutral.
pub fn classify(state: &str) -> Intent {
    match state {
        "STARTED" => Intent::Primary,
        "COMPLETED" => Intent::Success,
        "FAILED" => Intent::Danger,
        _ => Intent::None,
    }
}
