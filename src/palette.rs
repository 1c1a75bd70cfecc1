//! Color palette and styling for report output.

use owo_colors::{OwoColorize, Style};

/// Style for skill ids in drift lists.
pub fn skill_name() -> Style {
    Style::new().cyan().bold()
}

/// Style for section headings like "=== Sync Results ===".
pub fn heading() -> Style {
    Style::new().white().bold()
}

/// Style for labels like "Dry run:" or "Skills added:".
pub fn label() -> Style {
    Style::new().blue()
}

/// Style for drift list headings.
pub fn warning_heading() -> Style {
    Style::new().yellow().bold()
}

/// Style for warning text.
pub fn warning() -> Style {
    Style::new().yellow()
}

/// Apply a style when color is enabled.
fn styled(text: &str, style: Style, use_color: bool) -> String {
    if use_color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Format a skill id with styling.
pub fn fmt_skill_name(name: &str, use_color: bool) -> String {
    styled(name, skill_name(), use_color)
}

/// Format a section heading with styling.
pub fn fmt_heading(text: &str, use_color: bool) -> String {
    styled(text, heading(), use_color)
}

/// Format a label with styling.
pub fn fmt_label(text: &str, use_color: bool) -> String {
    styled(text, label(), use_color)
}

/// Format a warning heading with styling.
pub fn fmt_warning_heading(text: &str, use_color: bool) -> String {
    styled(text, warning_heading(), use_color)
}

/// Format warning text with styling.
pub fn fmt_warning(text: &str, use_color: bool) -> String {
    styled(text, warning(), use_color)
}
