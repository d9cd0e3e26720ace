use crate::news::Article;
use crate::theme::Theme;
use crate::util::sanitize::{sanitize_for_terminal, truncate, wrap};
use console::{measure_text_width, Style};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;

const READ_MORE: &str = "[Read More]";
const DESCRIPTION_LINES: usize = 2;

/// `2024-03-05T09:30:00Z` -> `March 5, 2024, 09:30 AM`. Unparseable input
/// is shown as-is.
pub fn format_date(raw: &str) -> String {
    let fmt = format_description!(
        "[month repr:long] [day padding:none], [year], [hour repr:12]:[minute] [period]"
    );
    OffsetDateTime::parse(raw.trim(), &Rfc3339)
        .ok()
        .and_then(|dt| dt.format(fmt).ok())
        .unwrap_or_else(|| sanitize_for_terminal(raw))
}

/// Draw one article as a bordered box `width` columns wide.
pub fn render(article: &Article, theme: &Theme, width: usize, selected: bool) -> Vec<String> {
    let border = theme.border();
    let frame = if selected { theme.primary().bold() } else { Style::new().dim() };
    let inner = width.saturating_sub(4);

    let mut rows: Vec<(String, Style)> = Vec::new();
    let title = sanitize_for_terminal(&article.title);
    let title = if title.is_empty() { "(untitled)".to_string() } else { title };
    rows.push((truncate(&title, inner), Style::new().bold()));
    for line in wrap(&sanitize_for_terminal(&article.description), inner, DESCRIPTION_LINES) {
        rows.push((line, Style::new()));
    }
    if let Some(img) = article.image() {
        let img = sanitize_for_terminal(img);
        rows.push((truncate(&format!("🖼 {}", img), inner), Style::new().dim()));
    }

    let mut lines = Vec::with_capacity(rows.len() + 3);
    let rule: String = std::iter::repeat_n(border.horizontal, width.saturating_sub(2)).collect();
    lines.push(frame.apply_to(format!("{}{}{}", border.top_left, rule, border.top_right)).to_string());
    for (text, style) in rows {
        lines.push(boxed(&text, style, inner, border.vertical, &frame));
    }
    lines.push(meta_row(article, theme, inner, selected, border.vertical, &frame));
    lines.push(frame.apply_to(format!("{}{}{}", border.bottom_left, rule, border.bottom_right)).to_string());
    lines
}

fn boxed(text: &str, style: Style, inner: usize, vertical: char, frame: &Style) -> String {
    let pad = inner.saturating_sub(measure_text_width(text));
    format!(
        "{} {}{} {}",
        frame.apply_to(vertical),
        style.apply_to(text),
        " ".repeat(pad),
        frame.apply_to(vertical)
    )
}

/// `source • date` on the left, the link action on the right.
fn meta_row(
    article: &Article,
    theme: &Theme,
    inner: usize,
    selected: bool,
    vertical: char,
    frame: &Style,
) -> String {
    let source = sanitize_for_terminal(&article.source);
    let date = format_date(&article.published_at);
    let meta = match (source.is_empty(), date.is_empty()) {
        (false, false) => format!("{} • {}", source, date),
        (false, true) => source,
        (true, _) => date,
    };
    let tag = sanitize_for_terminal(&article.category);
    let meta = match (tag.is_empty(), meta.is_empty()) {
        (true, _) => meta,
        (false, true) => format!("#{}", tag),
        (false, false) => format!("#{} · {}", tag, meta),
    };
    let room = inner.saturating_sub(READ_MORE.len() + 1);
    let meta = truncate(&meta, room);
    let pad = inner.saturating_sub(measure_text_width(&meta) + READ_MORE.len());
    let action = if selected { theme.chip_active() } else { theme.primary() };
    format!(
        "{} {}{}{} {}",
        frame.apply_to(vertical),
        Style::new().dim().apply_to(meta),
        " ".repeat(pad),
        action.apply_to(READ_MORE),
        frame.apply_to(vertical)
    )
}
