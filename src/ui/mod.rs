pub mod card;
pub mod header;

use crate::news::{Category, FeedState, FeedView, Phase};
use crate::theme::Theme;
use crate::util::sanitize::wrap;
use anyhow::Result;
use console::{measure_text_width, Key, Style, Term};

const HEADING: &str = "Unbiased News Feed";
const HELP: &str = "↑/↓ select · ←/→ category · 0-8 pick · Enter open · r reload · q quit";
const MIN_WIDTH: usize = 24;

pub enum Action {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    PrevCategory,
    NextCategory,
    PickCategory(usize),
    Open,
    Reload,
    Quit,
    Ignore,
}

pub fn action_for(key: Key) -> Action {
    match key {
        Key::ArrowUp | Key::Char('k') => Action::Up,
        Key::ArrowDown | Key::Char('j') => Action::Down,
        Key::PageUp => Action::PageUp,
        Key::PageDown | Key::Char(' ') => Action::PageDown,
        Key::Home => Action::Home,
        Key::End => Action::End,
        Key::ArrowLeft | Key::BackTab => Action::PrevCategory,
        Key::ArrowRight | Key::Tab => Action::NextCategory,
        Key::Char(c @ '0'..='8') => Action::PickCategory(c as usize - '0' as usize),
        Key::Enter | Key::Char('o') | Key::Char('O') => Action::Open,
        Key::Char('r') | Key::Char('R') => Action::Reload,
        Key::Char('q') | Key::Char('Q') | Key::Escape => Action::Quit,
        _ => Action::Ignore,
    }
}

/// Scroll position over the card list, in cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub top: usize,
    pub selected: usize,
}

impl Viewport {
    /// One past the last card that fits in `avail` rows starting at `top`.
    /// The first card is always shown, even if it has to be clipped.
    pub fn visible_end(&self, heights: &[usize], avail: usize) -> usize {
        let mut used = 0;
        let mut end = self.top;
        while end < heights.len() {
            if end > self.top && used + heights[end] > avail {
                break;
            }
            used += heights[end];
            end += 1;
        }
        end
    }

    pub fn scroll_into_view(&mut self, heights: &[usize], avail: usize) {
        if heights.is_empty() {
            *self = Viewport::default();
            return;
        }
        self.selected = self.selected.min(heights.len() - 1);
        if self.selected < self.top {
            self.top = self.selected;
        }
        while self.top < self.selected && self.selected >= self.visible_end(heights, avail) {
            self.top += 1;
        }
    }

    pub fn move_by(&mut self, delta: isize, len: usize) {
        let max = len.saturating_sub(1) as isize;
        self.selected = (self.selected as isize + delta).clamp(0, max) as usize;
    }
}

pub struct Frame {
    pub lines: Vec<String>,
    /// The last accumulated card is on screen.
    pub last_card_visible: bool,
    pub cards_on_screen: usize,
}

/// Lay out the whole screen for `state`.
pub fn render(
    title: &str,
    theme: &Theme,
    state: &FeedState,
    viewport: &mut Viewport,
    notice: Option<&str>,
    (width, height): (usize, usize),
) -> Frame {
    let width = width.max(MIN_WIDTH);
    let mut top = header::render(title, theme, width);
    top.push(Style::new().bold().apply_to(HEADING).to_string());
    top.extend(chip_rows(state.category(), theme, width));
    if let Some(err) = state.error() {
        for line in wrap(err, width.saturating_sub(2), 3) {
            top.push(theme.error().apply_to(format!("✖ {}", line)).to_string());
        }
    }
    top.push(String::new());

    let footer = vec![status_line(state, theme, notice), Style::new().dim().apply_to(HELP).to_string()];
    // Chrome never pushes the footer off a short screen.
    top.truncate(height.saturating_sub(footer.len()));

    let cards: Vec<Vec<String>> = state
        .articles()
        .iter()
        .enumerate()
        .map(|(i, a)| card::render(a, theme, width, i == viewport.selected))
        .collect();
    let heights: Vec<usize> = cards.iter().map(Vec::len).collect();
    let avail = height.saturating_sub(top.len() + footer.len());
    viewport.scroll_into_view(&heights, avail);
    let end = if avail == 0 { viewport.top } else { viewport.visible_end(&heights, avail) };

    let mut lines = top;
    let mut body: Vec<String> = cards[viewport.top..end].iter().flatten().cloned().collect();
    body.truncate(avail);
    let filler = avail.saturating_sub(body.len());
    lines.extend(body);
    lines.extend(std::iter::repeat_n(String::new(), filler));
    lines.extend(footer);
    lines.truncate(height);

    Frame {
        lines,
        last_card_visible: !cards.is_empty() && end == cards.len(),
        cards_on_screen: end - viewport.top,
    }
}

fn chip_rows(active: Option<Category>, theme: &Theme, width: usize) -> Vec<String> {
    let active = Category::chip_index(active);
    let labels = std::iter::once("All".to_string()).chain(Category::ALL.iter().map(|c| c.label()));
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut used = 0;
    for (i, label) in labels.enumerate() {
        let chip = format!(" {} ", label);
        let w = measure_text_width(&chip);
        if used > 0 && used + 1 + w > width {
            rows.push(std::mem::take(&mut row));
            used = 0;
        }
        if used > 0 {
            row.push(' ');
            used += 1;
        }
        let style = if i == active { theme.chip_active() } else { theme.chip_idle() };
        row.push_str(&style.apply_to(chip).to_string());
        used += w;
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

fn status_line(state: &FeedState, theme: &Theme, notice: Option<&str>) -> String {
    if let Some(n) = notice {
        return theme.accent().apply_to(n).to_string();
    }
    let n = state.articles().len();
    let text = match state.phase() {
        Phase::Loading { page } => format!("⟳ Loading page {}…", page),
        Phase::Idle => String::new(),
        Phase::Loaded { .. } if n == 0 => "No articles in this category.".to_string(),
        Phase::Loaded { .. } if state.has_more() => format!("{} articles · page {}", n, state.page()),
        Phase::Loaded { .. } => format!("{} articles · end of feed", n),
        Phase::Failed => format!("{} articles · press r to retry", n),
    };
    theme.accent().apply_to(text).to_string()
}

/// The terminal side of the feed: draws frames and reads keys.
pub struct TermView {
    term: Term,
    title: String,
    theme: Theme,
    pub viewport: Viewport,
    notice: Option<String>,
    last_card_visible: bool,
    cards_on_screen: usize,
}

impl TermView {
    pub fn new(term: Term, title: String, theme: Theme) -> Self {
        Self {
            term,
            title,
            theme,
            viewport: Viewport::default(),
            notice: None,
            last_card_visible: false,
            cards_on_screen: 0,
        }
    }

    pub fn draw(&mut self, state: &FeedState) -> Result<()> {
        let (rows, cols) = self.term.size();
        let frame = render(
            &self.title,
            &self.theme,
            state,
            &mut self.viewport,
            self.notice.as_deref(),
            (cols as usize, rows as usize),
        );
        self.last_card_visible = frame.last_card_visible;
        self.cards_on_screen = frame.cards_on_screen;
        self.term.clear_screen()?;
        self.term.write_str(&frame.lines.join("\n"))?;
        self.term.flush()?;
        Ok(())
    }

    pub fn last_card_visible(&self) -> bool {
        self.last_card_visible
    }

    pub fn page_step(&self) -> isize {
        self.cards_on_screen.max(1) as isize
    }

    /// One-shot message shown in the status line until the next key.
    pub fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
    }

    pub fn read_key(&self) -> Result<Key> {
        Ok(self.term.read_key()?)
    }

    pub fn enter(&self) {
        let _ = self.term.hide_cursor();
    }

    pub fn leave(&self) {
        let _ = self.term.clear_screen();
        let _ = self.term.show_cursor();
    }
}

impl FeedView for TermView {
    fn show(&mut self, state: &FeedState) {
        if let Err(e) = self.draw(state) {
            tracing::warn!(error = %e, "failed to draw feed");
        }
    }
}
