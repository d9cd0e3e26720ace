//! Paginated feed state machine.
//!
//! The controller owns the selected category, the page counter and the
//! accumulated list. It is driven by three inputs: the initial load, a
//! category change, and the visibility trigger fired when the last card is
//! on screen. Fetching goes through a [`PageLoader`]; every transition is
//! pushed to a [`FeedView`] so the screen can show the loading state while
//! a request is outstanding.

use super::fetch::{FetchError, PageLoader};
use super::model::{Article, Category, FeedPage};

/// Hard ceiling on pages per category. The server's `totalPages` is not
/// consulted.
pub const MAX_PAGES: u32 = 3;

pub const FETCH_ERROR_MESSAGE: &str =
    "Failed to fetch news articles. Please check if the backend server is running.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading { page: u32 },
    Loaded { has_more: bool },
    Failed,
}

#[derive(Debug, Clone)]
pub struct FeedState {
    category: Option<Category>,
    page: u32,
    articles: Vec<Article>,
    has_more: bool,
    loading: bool,
    error: Option<String>,
    fetched: bool,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            category: None,
            page: 1,
            articles: Vec::new(),
            has_more: true,
            loading: false,
            error: None,
            fetched: false,
        }
    }
}

impl FeedState {
    /// A page-1 success with `articles`, for exercising renderers.
    #[cfg(test)]
    pub fn loaded(articles: Vec<Article>) -> Self {
        Self { articles, fetched: true, ..Self::default() }
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading { page: self.page }
        } else if !self.fetched {
            Phase::Idle
        } else if self.error.is_some() {
            Phase::Failed
        } else {
            Phase::Loaded { has_more: self.has_more }
        }
    }

    fn reset(&mut self, category: Option<Category>) {
        self.category = category;
        self.page = 1;
        self.articles.clear();
    }

    fn apply(&mut self, page: u32, result: Result<FeedPage, FetchError>) {
        self.fetched = true;
        self.loading = false;
        match result {
            Ok(FeedPage { articles, total_count, total_pages, current_page, page_size }) => {
                let count = articles.len();
                if page == 1 {
                    self.articles = articles;
                } else {
                    self.articles.extend(articles);
                }
                self.has_more = page < MAX_PAGES;
                self.error = None;
                if total_pages != 0 && total_pages != MAX_PAGES {
                    tracing::warn!(
                        server_total_pages = total_pages,
                        ceiling = MAX_PAGES,
                        "server page count differs from client ceiling"
                    );
                }
                tracing::info!(
                    page,
                    count,
                    total = self.articles.len(),
                    server_page = current_page,
                    server_page_size = page_size,
                    server_total_count = total_count,
                    "page loaded"
                );
            }
            Err(err) => {
                tracing::error!(page, error = %err, "error fetching news");
                self.error = Some(FETCH_ERROR_MESSAGE.to_string());
            }
        }
    }
}

/// Receives the feed state whenever a fetch starts or finishes.
pub trait FeedView {
    fn show(&mut self, state: &FeedState);
}

pub struct FeedController<L> {
    loader: L,
    state: FeedState,
}

impl<L: PageLoader> FeedController<L> {
    pub fn new(loader: L, category: Option<Category>) -> Self {
        let state = FeedState { category, ..FeedState::default() };
        Self { loader, state }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    /// Fetch page 1 of whatever category is selected.
    pub async fn initial_load<V: FeedView>(&mut self, view: &mut V) {
        self.fetch(1, view).await;
    }

    /// Switch category. Always resets, even when `category` is already active.
    pub async fn select_category<V: FeedView>(&mut self, category: Option<Category>, view: &mut V) {
        tracing::debug!(from = ?self.state.category, to = ?category, "category change");
        self.state.reset(category);
        self.fetch(1, view).await;
    }

    /// Called when the last rendered card is visible. Only a `Loaded` feed
    /// with more pages moves on; a failed page stays put until the category
    /// is selected again. Returns whether a new page was requested.
    pub async fn last_card_visible<V: FeedView>(&mut self, view: &mut V) -> bool {
        if !self.wants_next_page() {
            tracing::debug!(phase = ?self.state.phase(), "visibility trigger ignored");
            return false;
        }
        let next = self.state.page + 1;
        self.fetch(next, view).await;
        true
    }

    pub fn wants_next_page(&self) -> bool {
        self.state.phase() == (Phase::Loaded { has_more: true }) && !self.state.articles.is_empty()
    }

    async fn fetch<V: FeedView>(&mut self, page: u32, view: &mut V) {
        self.state.page = page;
        self.state.loading = true;
        view.show(&self.state);

        let category = self.state.category;
        tracing::info!(category = category.map(|c| c.as_str()).unwrap_or("all"), page, "fetching news");
        let result = self.loader.load(category, page).await;
        self.state.apply(page, result);
        view.show(&self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn article(tag: &str) -> Article {
        Article {
            title: tag.to_string(),
            url: format!("https://example.com/{}", tag),
            ..Article::default()
        }
    }

    fn page_of(prefix: &str, page: u32) -> FeedPage {
        FeedPage {
            articles: (1..=3).map(|i| article(&format!("{}-{}-{}", prefix, page, i))).collect(),
            total_count: 9,
            total_pages: 3,
            current_page: page,
            page_size: 3,
        }
    }

    /// Replays queued outcomes and records each request.
    #[derive(Default)]
    struct Scripted {
        outcomes: Mutex<VecDeque<Result<FeedPage, ()>>>,
        calls: Mutex<Vec<(Option<Category>, u32)>>,
    }

    impl Scripted {
        fn push_ok(&self, p: FeedPage) {
            self.outcomes.lock().unwrap().push_back(Ok(p));
        }

        fn push_err(&self) {
            self.outcomes.lock().unwrap().push_back(Err(()));
        }

        fn calls(&self) -> Vec<(Option<Category>, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageLoader for &Scripted {
        async fn load(&self, category: Option<Category>, page: u32) -> Result<FeedPage, FetchError> {
            self.calls.lock().unwrap().push((category, page));
            match self.outcomes.lock().unwrap().pop_front() {
                Some(Ok(p)) => Ok(p),
                _ => Err(FetchError::Status(reqwest::StatusCode::BAD_GATEWAY)),
            }
        }
    }

    /// Snapshot of (phase, article count) at every transition.
    #[derive(Default)]
    struct Recorder(Vec<(Phase, usize)>);

    impl FeedView for Recorder {
        fn show(&mut self, state: &FeedState) {
            self.0.push((state.phase(), state.articles().len()));
        }
    }

    fn titles(s: &FeedState) -> Vec<&str> {
        s.articles().iter().map(|a| a.title.as_str()).collect()
    }

    #[tokio::test]
    async fn starts_idle_with_page_one() {
        let loader = Scripted::default();
        let ctl = FeedController::new(&loader, None);
        assert_eq!(ctl.state().phase(), Phase::Idle);
        assert_eq!(ctl.state().page(), 1);
        assert!(ctl.state().has_more());
    }

    #[tokio::test]
    async fn paginates_tech_up_to_ceiling() {
        let loader = Scripted::default();
        for p in 1..=3 {
            loader.push_ok(page_of("tech", p));
        }
        let mut view = Recorder::default();
        let mut ctl = FeedController::new(&loader, None);
        ctl.select_category(Some(Category::Tech), &mut view).await;
        assert_eq!(ctl.state().articles().len(), 3);
        assert_eq!(ctl.state().phase(), Phase::Loaded { has_more: true });

        assert!(ctl.last_card_visible(&mut view).await);
        assert_eq!(ctl.state().articles().len(), 6);
        assert_eq!(ctl.state().page(), 2);

        assert!(ctl.last_card_visible(&mut view).await);
        assert_eq!(ctl.state().articles().len(), 9);
        assert_eq!(ctl.state().phase(), Phase::Loaded { has_more: false });
        assert_eq!(
            &titles(ctl.state())[..4],
            &["tech-1-1", "tech-1-2", "tech-1-3", "tech-2-1"]
        );

        assert!(!ctl.last_card_visible(&mut view).await);
        assert!(!ctl.last_card_visible(&mut view).await);
        assert_eq!(
            loader.calls(),
            vec![(Some(Category::Tech), 1), (Some(Category::Tech), 2), (Some(Category::Tech), 3)]
        );
    }

    #[tokio::test]
    async fn has_more_ignores_server_total_pages() {
        let loader = Scripted::default();
        let mut one_page = page_of("all", 1);
        one_page.total_pages = 1;
        loader.push_ok(one_page);
        let mut view = Recorder::default();
        let mut ctl = FeedController::new(&loader, None);
        ctl.initial_load(&mut view).await;
        assert!(ctl.state().has_more());
    }

    #[tokio::test]
    async fn initial_failure_shows_message_and_keeps_list_empty() {
        let loader = Scripted::default();
        loader.push_err();
        let mut view = Recorder::default();
        let mut ctl = FeedController::new(&loader, None);
        ctl.initial_load(&mut view).await;
        let s = ctl.state();
        assert_eq!(s.error(), Some(FETCH_ERROR_MESSAGE));
        assert!(s.articles().is_empty());
        assert!(!matches!(s.phase(), Phase::Loading { .. }));
        assert_eq!(s.phase(), Phase::Failed);
        assert_eq!(loader.calls(), vec![(None, 1)]);
        // Nothing on screen, so no trigger.
        assert!(!ctl.last_card_visible(&mut view).await);
    }

    #[tokio::test]
    async fn failed_page_keeps_prior_results() {
        let loader = Scripted::default();
        loader.push_ok(page_of("all", 1));
        loader.push_err();
        let mut view = Recorder::default();
        let mut ctl = FeedController::new(&loader, None);
        ctl.initial_load(&mut view).await;
        assert!(ctl.last_card_visible(&mut view).await);
        let s = ctl.state();
        assert_eq!(s.articles().len(), 3);
        assert!(s.error().is_some_and(|e| !e.is_empty()));
        assert_eq!(s.page(), 2);
        assert!(s.has_more());
        assert_eq!(s.phase(), Phase::Failed);

        assert!(!ctl.last_card_visible(&mut view).await);
        assert_eq!(loader.calls().len(), 2);
    }

    #[tokio::test]
    async fn success_clears_previous_error() {
        let loader = Scripted::default();
        loader.push_err();
        loader.push_ok(page_of("all", 1));
        let mut view = Recorder::default();
        let mut ctl = FeedController::new(&loader, None);
        ctl.initial_load(&mut view).await;
        assert!(ctl.state().error().is_some());
        ctl.select_category(None, &mut view).await;
        assert_eq!(ctl.state().error(), None);
        assert_eq!(ctl.state().articles().len(), 3);
    }

    #[tokio::test]
    async fn category_change_resets_without_leaking() {
        let loader = Scripted::default();
        loader.push_ok(page_of("all", 1));
        loader.push_ok(page_of("all", 2));
        loader.push_ok(page_of("sports", 1));
        let mut view = Recorder::default();
        let mut ctl = FeedController::new(&loader, None);
        ctl.initial_load(&mut view).await;
        ctl.last_card_visible(&mut view).await;
        assert_eq!(ctl.state().articles().len(), 6);

        ctl.select_category(Some(Category::Sports), &mut view).await;
        let s = ctl.state();
        assert_eq!(s.page(), 1);
        assert_eq!(s.category(), Some(Category::Sports));
        assert_eq!(titles(s), vec!["sports-1-1", "sports-1-2", "sports-1-3"]);
    }

    #[tokio::test]
    async fn category_change_shows_empty_loading_state_first() {
        let loader = Scripted::default();
        loader.push_ok(page_of("all", 1));
        loader.push_ok(page_of("politics", 1));
        let mut view = Recorder::default();
        let mut ctl = FeedController::new(&loader, None);
        ctl.initial_load(&mut view).await;
        view.0.clear();

        ctl.select_category(Some(Category::Politics), &mut view).await;
        assert_eq!(
            view.0,
            vec![
                (Phase::Loading { page: 1 }, 0),
                (Phase::Loaded { has_more: true }, 3)
            ]
        );
    }

    #[tokio::test]
    async fn category_change_clears_list_even_when_fetch_fails() {
        let loader = Scripted::default();
        loader.push_ok(page_of("all", 1));
        loader.push_err();
        let mut view = Recorder::default();
        let mut ctl = FeedController::new(&loader, None);
        ctl.initial_load(&mut view).await;
        ctl.select_category(Some(Category::Health), &mut view).await;
        assert!(ctl.state().articles().is_empty());
        assert_eq!(ctl.state().page(), 1);
        assert!(ctl.state().error().is_some());
    }

    #[tokio::test]
    async fn reselecting_same_category_refetches_page_one() {
        let loader = Scripted::default();
        loader.push_ok(page_of("biz", 1));
        loader.push_ok(page_of("biz", 2));
        loader.push_ok(page_of("biz", 1));
        let mut view = Recorder::default();
        let mut ctl = FeedController::new(&loader, Some(Category::Business));
        ctl.initial_load(&mut view).await;
        ctl.last_card_visible(&mut view).await;
        ctl.select_category(Some(Category::Business), &mut view).await;
        assert_eq!(ctl.state().articles().len(), 3);
        assert_eq!(
            loader.calls(),
            vec![
                (Some(Category::Business), 1),
                (Some(Category::Business), 2),
                (Some(Category::Business), 1)
            ]
        );
    }

    #[tokio::test]
    async fn duplicates_across_pages_are_kept() {
        let loader = Scripted::default();
        loader.push_ok(page_of("dup", 1));
        loader.push_ok(page_of("dup", 1));
        let mut view = Recorder::default();
        let mut ctl = FeedController::new(&loader, None);
        ctl.initial_load(&mut view).await;
        ctl.last_card_visible(&mut view).await;
        let t = titles(ctl.state());
        assert_eq!(t.len(), 6);
        assert_eq!(t[0], t[3]);
    }
}
