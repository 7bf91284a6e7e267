//! Dashboard page facade.
//!
//! Trimmed to what the login regression needs: load confirmation, the
//! welcome message, and logout.

use super::{ElementMap, Page};
use crate::config::HarnessConfig;
use crate::locator::Locator;
use crate::result::RevisarResult;
use crate::session::SessionDriver;

/// Base path of the dashboard page
pub const DASHBOARD_PATH: &str = "/user/dashboard";

const WELCOME: &str = "welcome";
const USER_MENU: &str = "user_menu";
const LOGOUT: &str = "logout";

/// Page object for the authenticated dashboard
#[derive(Debug)]
pub struct DashboardPage<'d, D: SessionDriver + ?Sized> {
    page: Page<'d, D>,
}

impl<'d, D: SessionDriver + ?Sized> DashboardPage<'d, D> {
    /// Create a dashboard page with the default element map.
    #[must_use]
    pub fn new(driver: &'d D, config: &'d HarnessConfig) -> Self {
        Self::with_elements(driver, config, Self::default_elements())
    }

    /// Create a dashboard page with an explicit element map.
    #[must_use]
    pub fn with_elements(driver: &'d D, config: &'d HarnessConfig, elements: ElementMap) -> Self {
        Self {
            page: Page::new(driver, config, DASHBOARD_PATH, elements),
        }
    }

    /// The element map matching the production dashboard markup.
    #[must_use]
    pub fn default_elements() -> ElementMap {
        ElementMap::new()
            .with(WELCOME, Locator::css(".welcome-message"))
            .with(USER_MENU, Locator::css(".user-menu"))
            .with(LOGOUT, Locator::link_text("Logout"))
    }

    /// Navigate to the dashboard (anonymous sessions get bounced by the app).
    pub fn open(&self) -> RevisarResult<()> {
        self.page.open()
    }

    /// Log the user out via the user menu.
    ///
    /// The logout entry only exists once the menu is open, so each click is
    /// bracketed by a hard wait and a fresh resolution.
    pub fn click_logout(&self) -> RevisarResult<()> {
        self.page.wait_for_displayed(USER_MENU)?;
        self.page.click(USER_MENU)?;
        self.page.wait_for_displayed(LOGOUT)?;
        self.page.click(LOGOUT)
    }

    // Soft queries

    /// Whether the dashboard rendered its welcome header in the window.
    #[must_use]
    pub fn is_dashboard_loaded(&self) -> bool {
        self.page.soft_displayed(WELCOME)
    }

    /// The welcome message, empty when the dashboard is not up.
    #[must_use]
    pub fn welcome_message(&self) -> String {
        self.page.soft_text(WELCOME)
    }

    /// Whether a user menu is present, i.e. someone is signed in.
    #[must_use]
    pub fn is_user_logged_in(&self) -> bool {
        self.page.soft_displayed(USER_MENU)
    }

    /// Current page URL
    pub fn current_url(&self) -> RevisarResult<String> {
        self.page.current_url()
    }
}
