//! Dashboard controller
//!
//! Owns the navigation state of one dashboard session: which page is shown,
//! its title, the highlighted sidebar item, sidebar/modal visibility and the
//! rendered page body. Pages are rendered by the [`ViewRegistry`]; a failed
//! render leaves the inline error panel in place of the page.

use stanshare_client::{HttpTransport, ScoreThresholds, StanShareClient};

use crate::error::{DashboardError, Result};
use crate::markup::{self, error_panel, ShellParts, SETTINGS_MODAL};
use crate::session::{Session, SessionStore, UserInfo, LOGOUT_KEYS};
use crate::views::{title_for, PageId, ViewContext, ViewRegistry};

/// Where the browser goes after logout
pub const LOGIN_PAGE: &str = "login.html";

const NOTIFICATIONS_MESSAGE: &str = "No new notifications at this time.";

/// Visible dashboard state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    pub current_page: PageId,
    pub page_title: String,
    pub active_nav: String,
    pub sidebar_open: bool,
    pub open_modals: Vec<String>,
    pub content: String,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            current_page: PageId::Overview,
            page_title: PageId::Overview.title().to_string(),
            active_nav: PageId::Overview.nav_key().to_string(),
            sidebar_open: false,
            open_modals: Vec::new(),
            content: String::new(),
        }
    }
}

pub struct DashboardController<T: HttpTransport> {
    session: Session,
    user: UserInfo,
    client: StanShareClient<T>,
    registry: ViewRegistry<T>,
    thresholds: ScoreThresholds,
    state: DashboardState,
}

impl<T: HttpTransport> DashboardController<T> {
    /// Build the controller and show the overview.
    ///
    /// A stored API URL in the session takes precedence over the client's.
    pub async fn new(session: Session, client: StanShareClient<T>, registry: ViewRegistry<T>) -> Self {
        let client = match session.api_url.as_deref() {
            Some(url) => client.with_base_url(url),
            None => client,
        };

        let mut controller = Self {
            user: session.user_info(),
            session,
            client,
            registry,
            thresholds: ScoreThresholds::default(),
            state: DashboardState::default(),
        };

        if let Err(e) = controller.load_dashboard().await {
            tracing::warn!(error = %e, "Overview failed to render");
        }
        controller
    }

    /// Colour thresholds used by score-coloured views
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: ScoreThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn client(&self) -> &StanShareClient<T> {
        &self.client
    }

    pub fn user_info(&self) -> &UserInfo {
        &self.user
    }

    pub async fn load_dashboard(&mut self) -> Result<()> {
        self.update_page_title(PageId::Overview.title());
        self.set_active_nav_item(PageId::Overview.nav_key());
        self.show(PageId::Overview).await
    }

    /// Navigate to a page by name, e.g. `funds.html`.
    ///
    /// On failure the content becomes the error panel and the error is
    /// returned as well.
    pub async fn load_page(&mut self, name: &str) -> Result<()> {
        self.update_page_title(title_for(name));

        match PageId::from_name(name) {
            Some(page) => {
                self.set_active_nav_item(page.nav_key());
                self.show(page).await
            }
            None => {
                let err = DashboardError::UnknownPage(name.to_string());
                self.state.content = error_panel(&err.to_string());
                Err(err)
            }
        }
    }

    async fn show(&mut self, page: PageId) -> Result<()> {
        self.state.current_page = page;

        let Some(view) = self.registry.get(page) else {
            let err = DashboardError::UnknownPage(page.file_name().to_string());
            self.state.content = error_panel(&err.to_string());
            return Err(err);
        };

        let ctx = ViewContext {
            client: &self.client,
            session: &self.session,
            thresholds: &self.thresholds,
        };

        match view.render(&ctx).await {
            Ok(content) => {
                self.state.content = content;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%page, error = %e, "Page failed to load");
                self.state.content = error_panel(&e.to_string());
                Err(e)
            }
        }
    }

    pub fn update_page_title(&mut self, title: &str) {
        self.state.page_title = title.to_string();
    }

    pub fn set_active_nav_item(&mut self, nav: &str) {
        self.state.active_nav = nav.to_string();
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.state.sidebar_open = !self.state.sidebar_open;
        self.state.sidebar_open
    }

    pub fn show_settings(&mut self) {
        self.open_modal(SETTINGS_MODAL);
    }

    fn open_modal(&mut self, id: &str) {
        if !self.state.open_modals.iter().any(|m| m == id) {
            self.state.open_modals.push(id.to_string());
        }
    }

    pub fn close_modal(&mut self, id: &str) {
        self.state.open_modals.retain(|m| m != id);
    }

    pub fn close_all_modals(&mut self) {
        self.state.open_modals.clear();
    }

    /// Keyboard handling: Escape closes every modal
    pub fn handle_key(&mut self, key: &str) {
        if key == "Escape" {
            self.close_all_modals();
        }
    }

    /// Clear the stored identity and return the page to redirect to
    pub fn logout(&mut self, store: &mut dyn SessionStore) -> Result<&'static str> {
        for key in LOGOUT_KEYS {
            store.remove(key)?;
        }

        // The stored API URL survives logout
        self.session = Session {
            api_url: self.session.api_url.take(),
            ..Session::default()
        };
        self.user = self.session.user_info();
        // Rendered pages may still show the old identity
        self.state.content.clear();
        self.close_all_modals();
        tracing::info!("Logged out");
        Ok(LOGIN_PAGE)
    }

    /// Uses the stored name, not the guest display name
    pub fn profile_message(&self) -> String {
        format!("Logged in as: {}", self.session.user_name.as_deref().unwrap_or("User"))
    }

    pub fn notifications_message(&self) -> &'static str {
        NOTIFICATIONS_MESSAGE
    }

    /// Full HTML document for the current state
    pub fn render_shell(&self) -> String {
        markup::render_shell(&ShellParts {
            page_title: &self.state.page_title,
            active_nav: &self.state.active_nav,
            user: &self.user,
            sidebar_open: self.state.sidebar_open,
            open_modals: &self.state.open_modals,
            content: &self.state.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryStore, KEY_API_URL, KEY_AUTH_TOKEN, KEY_USER_NAME};
    use serde_json::json;
    use stanshare_client::{ClientConfig, HttpResponse, MockTransport};

    async fn controller(session: Session, mock: &MockTransport) -> DashboardController<MockTransport> {
        let client = StanShareClient::with_transport(&ClientConfig::default(), mock.clone());
        DashboardController::new(session, client, ViewRegistry::standard()).await
    }

    #[tokio::test]
    async fn test_init_shows_overview() {
        let mock = MockTransport::new();
        let ctrl = controller(Session::guest(), &mock).await;

        let state = ctrl.state();
        assert_eq!(state.current_page, PageId::Overview);
        assert_eq!(state.page_title, "Dashboard");
        assert_eq!(state.active_nav, "dashboard");
        assert!(state.content.contains("Welcome to StanShareAI Dashboard"));
        assert_eq!(ctrl.user_info().name, "Guest User");
        assert_eq!(ctrl.client().base_url(), "http://localhost:5000");
    }

    #[tokio::test]
    async fn test_session_api_url_wins() {
        let mut store = MemoryStore::new();
        store.set(KEY_API_URL, "https://edgar.example.org").unwrap();
        let mock = MockTransport::new();
        mock.add_json("GET /api/funds", json!([]));

        let mut ctrl = controller(Session::load(&store), &mock).await;
        assert_eq!(ctrl.client().base_url(), "https://edgar.example.org");

        ctrl.load_page("funds.html").await.unwrap();
        assert!(mock.calls()[0].url().starts_with("https://edgar.example.org/api/funds"));
    }

    #[tokio::test]
    async fn test_load_page_sets_title_and_nav() {
        let mock = MockTransport::new();
        mock.add_json("GET /api/funds", json!({"funds": [{"name": "Alpha"}], "total": 1}));
        let mut ctrl = controller(Session::default(), &mock).await;

        ctrl.load_page("funds.html").await.unwrap();
        let state = ctrl.state();
        assert_eq!(state.current_page, PageId::Funds);
        assert_eq!(state.page_title, "Browse Funds");
        assert_eq!(state.active_nav, "funds");
        assert!(state.content.contains("Alpha"));

        ctrl.load_page("extraction.html").await.unwrap();
        assert_eq!(ctrl.state().page_title, "Extract Funds");
    }

    #[tokio::test]
    async fn test_failed_page_shows_error_panel() {
        let mock = MockTransport::new();
        mock.add_response(
            "GET /api/funds",
            Ok(HttpResponse::new(500, r#"{"error": "Funds table locked"}"#)),
        );
        let mut ctrl = controller(Session::default(), &mock).await;

        let err = ctrl.load_page("funds.html").await.unwrap_err();
        assert_eq!(err.to_string(), "Funds table locked");
        assert_eq!(ctrl.state().page_title, "Browse Funds");
        assert!(ctrl.state().content.contains("Error loading page"));
        assert!(ctrl.state().content.contains("Funds table locked"));
    }

    #[tokio::test]
    async fn test_unknown_page() {
        let mock = MockTransport::new();
        let mut ctrl = controller(Session::default(), &mock).await;

        let err = ctrl.load_page("reports.html").await.unwrap_err();
        assert!(matches!(err, DashboardError::UnknownPage(_)));
        assert_eq!(ctrl.state().page_title, "Dashboard");
        assert!(ctrl.state().content.contains("Unknown page: reports.html"));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unregistered_view() {
        let mock = MockTransport::new();
        let client = StanShareClient::with_transport(&ClientConfig::default(), mock.clone());
        let mut ctrl = DashboardController::new(Session::default(), client, ViewRegistry::new()).await;

        assert!(ctrl.state().content.contains("Error loading page"));
        assert!(ctrl.load_page("funds.html").await.is_err());
    }

    #[tokio::test]
    async fn test_sidebar_and_modals() {
        let mock = MockTransport::new();
        let mut ctrl = controller(Session::default(), &mock).await;

        assert!(ctrl.toggle_sidebar());
        assert!(!ctrl.toggle_sidebar());

        ctrl.show_settings();
        ctrl.show_settings();
        assert_eq!(ctrl.state().open_modals, vec![SETTINGS_MODAL.to_string()]);
        assert!(ctrl.render_shell().contains(r#"class="modal active" id="settingsModal""#));

        ctrl.close_modal(SETTINGS_MODAL);
        assert!(ctrl.state().open_modals.is_empty());

        ctrl.show_settings();
        ctrl.handle_key("Enter");
        assert_eq!(ctrl.state().open_modals.len(), 1);
        ctrl.handle_key("Escape");
        assert!(ctrl.state().open_modals.is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_identity() {
        let mut store = MemoryStore::new();
        store.set(KEY_USER_NAME, "robin").unwrap();
        store.set(KEY_AUTH_TOKEN, "secret").unwrap();
        store.set(KEY_API_URL, "http://localhost:5000").unwrap();

        let mock = MockTransport::new();
        let mut ctrl = controller(Session::load(&store), &mock).await;
        assert_eq!(ctrl.profile_message(), "Logged in as: robin");
        assert_eq!(ctrl.notifications_message(), "No new notifications at this time.");

        assert_eq!(ctrl.logout(&mut store).unwrap(), "login.html");
        assert_eq!(store.get(KEY_USER_NAME), None);
        assert_eq!(store.get(KEY_AUTH_TOKEN), None);
        // The API URL survives logout
        assert_eq!(store.get(KEY_API_URL).as_deref(), Some("http://localhost:5000"));

        // The controller forgets the identity as well
        assert_eq!(ctrl.session().user_name, None);
        assert_eq!(ctrl.session().api_url.as_deref(), Some("http://localhost:5000"));
        assert_eq!(ctrl.user_info().name, "User");
        assert_eq!(ctrl.profile_message(), "Logged in as: User");
        let html = ctrl.render_shell();
        assert!(!html.contains("robin"));
        assert!(html.contains("user@example.com"));
    }

    #[tokio::test]
    async fn test_shell_reflects_state() {
        let mock = MockTransport::new();
        mock.add_json("GET /api/annotations", json!([]));
        mock.add_json("GET /api/quality/stats", json!({}));
        let mut ctrl = controller(Session::default(), &mock).await;

        ctrl.load_page("annotations.html").await.unwrap();
        let html = ctrl.render_shell();
        assert!(html.contains("<title>StanShareAI - Quality Dashboard</title>"));
        assert!(html.contains(r#"class="nav-item active" data-page="annotations.html""#));
        assert!(html.contains("No annotations to review."));
    }
}
