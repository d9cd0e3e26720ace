use crate::theme::Theme;
use crate::util::sanitize::{sanitize_for_terminal, truncate};

const ICON: &str = "📰";

/// App bar: icon plus title. Wide terminals get the spaced-out, upper-cased
/// title; narrow ones get it plain.
pub fn render(title: &str, theme: &Theme, width: usize) -> Vec<String> {
    let title = sanitize_for_terminal(title);
    // icon is two columns wide, plus the gap
    let room = width.saturating_sub(4);
    let text = if width < theme.compact_below as usize {
        truncate(&title, room)
    } else {
        let spaced = title
            .to_uppercase()
            .chars()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        truncate(&spaced, room)
    };
    vec![
        format!("{}  {}", ICON, theme.primary().bold().apply_to(text)),
        theme.primary().apply_to("━".repeat(width)).to_string(),
    ]
}
