use regex::Regex;
use std::sync::OnceLock;

fn ansi_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    // CSI (ESC[ ... cmd) and OSC (ESC] ... BEL/ST) sequences
    RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;?]*[ -/]*[@-~]|\x1B\][^\x07\x1B]*(?:\x07|\x1B\\)").ok())
        .as_ref()
}

/// Strip escape sequences and control characters from server-provided text
/// and fold all whitespace runs into single spaces.
pub fn sanitize_for_terminal(s: &str) -> String {
    let no_ansi = match ansi_re() {
        Some(re) => re.replace_all(s, ""),
        None => s.into(),
    };
    let cleaned: String = no_ansi
        .chars()
        .map(|ch| if ch.is_whitespace() { ' ' } else { ch })
        .filter(|ch| !ch.is_control())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut to `max` characters, marking the cut with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}

/// Greedy word wrap into at most `max_lines` lines of `width` characters.
/// Whatever does not fit is folded into the last line and truncated.
pub fn wrap(s: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    if width == 0 || max_lines == 0 {
        return lines;
    }
    let mut current = String::new();
    for word in s.split_whitespace() {
        let len = current.chars().count();
        if current.is_empty() {
            current.push_str(word);
        } else if len + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.len() > max_lines {
        let rest = lines.split_off(max_lines - 1).join(" ");
        lines.push(rest);
    }
    lines.into_iter().map(|l| truncate(&l, width)).collect()
}
