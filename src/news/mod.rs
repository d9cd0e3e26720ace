mod controller;
mod fetch;
mod model;

pub use controller::{FeedController, FeedState, FeedView, Phase};
pub use fetch::{HttpLoader, PageLoader};
pub use model::{Article, Category};

use crate::config::RuntimeConfig;
use crate::open_url::open_url;
use crate::ui::{self, Action, TermView};
use anyhow::Result;
use console::Term;

/// Run the feed screen until the user quits.
pub async fn run(cfg: &RuntimeConfig, category: Option<Category>) -> Result<()> {
    let loader = HttpLoader::new(&cfg.api_url)?;
    tracing::info!(endpoint = %loader.endpoint(), "starting feed");

    let mut view = TermView::new(Term::stdout(), cfg.title.clone(), cfg.theme.clone());
    let mut feed = FeedController::new(loader, category);
    view.enter();
    let result = event_loop(cfg, &mut feed, &mut view).await;
    view.leave();
    result
}

async fn event_loop<L: PageLoader>(
    cfg: &RuntimeConfig,
    feed: &mut FeedController<L>,
    view: &mut TermView,
) -> Result<()> {
    feed.initial_load(view).await;
    loop {
        view.draw(feed.state())?;
        if next_page_due(view.last_card_visible(), feed) {
            feed.last_card_visible(view).await;
            continue;
        }

        let key = view.read_key()?;
        view.set_notice(None);
        let len = feed.state().articles().len();
        let step = view.page_step();
        match ui::action_for(key) {
            Action::Up => view.viewport.move_by(-1, len),
            Action::Down => view.viewport.move_by(1, len),
            Action::PageUp => view.viewport.move_by(-step, len),
            Action::PageDown => view.viewport.move_by(step, len),
            Action::Home => view.viewport.selected = 0,
            Action::End => view.viewport.selected = len.saturating_sub(1),
            Action::PrevCategory => {
                let target = cycle_category(feed.state().category(), -1);
                switch_category(feed, view, target).await;
            }
            Action::NextCategory => {
                let target = cycle_category(feed.state().category(), 1);
                switch_category(feed, view, target).await;
            }
            Action::PickCategory(idx) => {
                switch_category(feed, view, Category::from_chip_index(idx)).await;
            }
            Action::Reload => {
                let current = feed.state().category();
                switch_category(feed, view, current).await;
            }
            Action::Open => open_selected(cfg, feed.state(), view),
            Action::Quit => break,
            Action::Ignore => {}
        }
    }
    Ok(())
}

/// The visibility trigger: the last card was drawn and the feed can grow.
fn next_page_due<L: PageLoader>(last_card_visible: bool, feed: &FeedController<L>) -> bool {
    last_card_visible && feed.wants_next_page()
}

async fn switch_category<L: PageLoader>(
    feed: &mut FeedController<L>,
    view: &mut TermView,
    category: Option<Category>,
) {
    view.viewport = ui::Viewport::default();
    feed.select_category(category, view).await;
}

/// Step through the chip row (All, then each category), wrapping around.
fn cycle_category(current: Option<Category>, step: isize) -> Option<Category> {
    let chips = (Category::ALL.len() + 1) as isize;
    let idx = (Category::chip_index(current) as isize + step).rem_euclid(chips);
    Category::from_chip_index(idx as usize)
}

fn open_selected(cfg: &RuntimeConfig, state: &FeedState, view: &mut TermView) {
    let Some(article) = state.articles().get(view.viewport.selected) else {
        return;
    };
    if article.url.trim().is_empty() {
        view.set_notice(Some("This article has no link.".to_string()));
        return;
    }
    tracing::info!(url = %article.url, "opening article");
    if let Err(e) = open_url(&article.url, cfg.open_command.as_deref()) {
        tracing::warn!(error = %e, "failed to open article");
        view.set_notice(Some(format!("Could not open link: {}", e)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use async_trait::async_trait;

    /// Serves three short articles for any page.
    struct Fixed;

    #[async_trait]
    impl PageLoader for Fixed {
        async fn load(&self, _: Option<Category>, page: u32) -> Result<model::FeedPage, fetch::FetchError> {
            let articles = (1..=3)
                .map(|i| Article {
                    title: format!("p{} story {}", page, i),
                    description: "Short summary".into(),
                    source: "Wire".into(),
                    ..Article::default()
                })
                .collect();
            Ok(model::FeedPage { articles, total_pages: 3, current_page: page, page_size: 3, total_count: 9 })
        }
    }

    struct Quiet;

    impl FeedView for Quiet {
        fn show(&mut self, _: &FeedState) {}
    }

    fn last_visible(feed: &FeedController<Fixed>, vp: &mut ui::Viewport, height: usize) -> bool {
        ui::render("News", &Theme::default(), feed.state(), vp, None, (80, height)).last_card_visible
    }

    #[tokio::test]
    async fn tall_screen_pages_until_ceiling() {
        let mut feed = FeedController::new(Fixed, None);
        feed.initial_load(&mut Quiet).await;
        let mut vp = ui::Viewport::default();

        let mut fetched = 1;
        while next_page_due(last_visible(&feed, &mut vp, 80), &feed) {
            assert!(feed.last_card_visible(&mut Quiet).await);
            fetched += 1;
        }
        assert_eq!(fetched, 3);
        assert_eq!(feed.state().articles().len(), 9);
        assert!(last_visible(&feed, &mut vp, 80));
        assert!(!next_page_due(true, &feed));
    }

    #[tokio::test]
    async fn short_screen_waits_for_scroll() {
        let mut feed = FeedController::new(Fixed, None);
        feed.initial_load(&mut Quiet).await;
        let mut vp = ui::Viewport::default();

        assert!(!next_page_due(last_visible(&feed, &mut vp, 15), &feed));
        vp.move_by(2, feed.state().articles().len());
        assert!(next_page_due(last_visible(&feed, &mut vp, 15), &feed));
    }

    #[test]
    fn cycling_wraps_through_all() {
        assert_eq!(cycle_category(None, 1), Some(Category::General));
        assert_eq!(cycle_category(None, -1), Some(Category::Health));
        assert_eq!(cycle_category(Some(Category::Health), 1), None);
        assert_eq!(cycle_category(Some(Category::Politics), -1), Some(Category::General));
    }
}
