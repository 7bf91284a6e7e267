//! Page Object layer.
//!
//! A page object is a stateless facade over one logical page: it owns no
//! element handles, only a base path and a mapping from semantic element
//! names to locators, injected at construction. Every domain action
//! resolves the elements it needs on demand and discards the handles
//! afterwards, so no component ever holds a reference across a wait,
//! a navigation, or a DOM mutation.
//!
//! Two method classes with different fault contracts:
//!
//! - **Actions** (`login`, `click_logout`, ...) propagate element and
//!   timeout faults to the caller as hard failures.
//! - **Soft queries** (`is_login_successful`, `error_message`, ...) run the
//!   wait engine on a bounded window and convert *any* fault into a default
//!   negative value at exactly one point, [`Page::soft`]. They never raise.
//!   Callers use them to probe transient UI state without retry logic of
//!   their own.

mod dashboard;
mod login;

pub use dashboard::DashboardPage;
pub use login::LoginPage;

use crate::config::HarnessConfig;
use crate::locator::{ElementRef, Locator};
use crate::result::{RevisarError, RevisarResult};
use crate::session::{Resolver, SessionDriver};
use crate::wait::Wait;
use std::collections::BTreeMap;

/// Mapping from semantic element name to locator.
///
/// Injected into each page object at construction; the explicit map is the
/// whole binding story; nothing is discovered by scanning or reflection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementMap {
    entries: BTreeMap<String, Locator>,
}

impl ElementMap {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named locator, builder-style
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, locator: Locator) -> Self {
        self.insert(name, locator);
        self
    }

    /// Add a named locator
    pub fn insert(&mut self, name: impl Into<String>, locator: Locator) {
        let _ = self.entries.insert(name.into(), locator);
    }

    /// Look up a locator by semantic name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Locator> {
        self.entries.get(name)
    }

    /// All registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Number of registered elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Base facade composing resolver, wait engine, and raw element actions.
///
/// Concrete pages ([`LoginPage`], [`DashboardPage`]) wrap one of these and
/// express domain actions in terms of its helpers.
#[derive(Debug)]
pub struct Page<'d, D: SessionDriver + ?Sized> {
    driver: &'d D,
    config: &'d HarnessConfig,
    path: String,
    elements: ElementMap,
}

impl<'d, D: SessionDriver + ?Sized> Page<'d, D> {
    /// Create a page bound to a session for its lifetime.
    #[must_use]
    pub fn new(
        driver: &'d D,
        config: &'d HarnessConfig,
        path: impl Into<String>,
        elements: ElementMap,
    ) -> Self {
        Self {
            driver,
            config,
            path: path.into(),
            elements,
        }
    }

    /// The session this page is bound to
    #[must_use]
    pub fn driver(&self) -> &'d D {
        self.driver
    }

    /// The harness configuration in effect
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        self.config
    }

    /// The page's base path
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Locator registered under a semantic name
    pub fn locator(&self, name: &str) -> RevisarResult<&Locator> {
        self.elements
            .get(name)
            .ok_or_else(|| RevisarError::UnknownElement {
                name: name.to_string(),
            })
    }

    /// Resolve a named element to a live handle, with one immediate lookup.
    pub fn resolve(&self, name: &str) -> RevisarResult<ElementRef> {
        let locator = self.locator(name)?;
        Resolver::new(self.driver).resolve(locator)
    }

    /// Navigate the session to this page's base path.
    pub fn open(&self) -> RevisarResult<()> {
        self.driver.navigate(&self.config.url_for(&self.path))
    }

    /// Click a named element.
    pub fn click(&self, name: &str) -> RevisarResult<()> {
        let element = self.resolve(name)?;
        self.driver.click(&element)
    }

    /// Clear a named input, then type into it.
    ///
    /// Clearing mutates the DOM, so the handle is discarded and the element
    /// re-resolved before typing.
    pub fn fill(&self, name: &str, text: &str) -> RevisarResult<()> {
        let element = self.resolve(name)?;
        self.driver.clear(&element)?;
        let element = self.resolve(name)?;
        self.driver.type_text(&element, text)
    }

    /// Drive a checkbox to the desired state.
    ///
    /// Idempotent: clicks only when the current state differs, so setting
    /// an already-checked box never unchecks it.
    pub fn set_checked(&self, name: &str, desired: bool) -> RevisarResult<()> {
        let element = self.resolve(name)?;
        if self.driver.is_selected(&element)? != desired {
            self.driver.click(&element)?;
        }
        Ok(())
    }

    /// Text content of a named element.
    pub fn text_of(&self, name: &str) -> RevisarResult<String> {
        let element = self.resolve(name)?;
        self.driver.text(&element)
    }

    /// Whether a named element is currently displayed.
    pub fn displayed(&self, name: &str) -> RevisarResult<bool> {
        let element = self.resolve(name)?;
        self.driver.is_displayed(&element)
    }

    /// Whether a named element is currently selected.
    pub fn selected(&self, name: &str) -> RevisarResult<bool> {
        let element = self.resolve(name)?;
        self.driver.is_selected(&element)
    }

    /// Current page title
    pub fn title(&self) -> RevisarResult<String> {
        self.driver.title()
    }

    /// Current page URL
    pub fn current_url(&self) -> RevisarResult<String> {
        self.driver.current_url()
    }

    /// Hard-wait until a named element is displayed.
    ///
    /// Re-resolves on every poll. The handles probed along the way are
    /// discarded when the wait completes; callers re-resolve before acting.
    pub fn wait_for_displayed(&self, name: &str) -> RevisarResult<()> {
        let locator = self.locator(name)?.clone();
        let resolver = Resolver::new(self.driver);
        Wait::new(self.config.hard_wait()).until(|| {
            let element = resolver.resolve(&locator)?;
            Ok(self.driver.is_displayed(&element)?.then_some(()))
        })
    }

    /// Hard-wait until the current URL contains a fragment.
    pub fn wait_for_url_contains(&self, fragment: &str) -> RevisarResult<()> {
        Wait::new(self.config.hard_wait())
            .until(|| Ok(self.driver.current_url()?.contains(fragment).then_some(())))
    }

    /// The soft-query boundary.
    ///
    /// Runs `probe` under the wait engine on the bounded soft window and
    /// converts any fault (not found, timeout, even a dead session) into
    /// `default`. This is the only place in the crate where faults are
    /// swallowed; every soft query on every page funnels through it.
    pub fn soft<T, F>(&self, default: T, probe: F) -> T
    where
        F: FnMut() -> RevisarResult<Option<T>>,
    {
        Wait::new(self.config.soft_wait())
            .until(probe)
            .unwrap_or(default)
    }

    /// Soft query: text of a named element, empty string when absent.
    pub fn soft_text(&self, name: &str) -> String {
        self.soft(String::new(), || {
            let element = self.resolve(name)?;
            Ok(Some(self.driver.text(&element)?))
        })
    }

    /// Soft query: whether a named element becomes displayed in the window.
    pub fn soft_displayed(&self, name: &str) -> bool {
        self.soft(false, || {
            let element = self.resolve(name)?;
            Ok(self.driver.is_displayed(&element)?.then_some(true))
        })
    }

    /// Soft query: whether the URL gains a fragment within the window.
    pub fn soft_url_contains(&self, fragment: &str) -> bool {
        self.soft(false, || {
            Ok(self.driver.current_url()?.contains(fragment).then_some(true))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSession;

    fn config() -> HarnessConfig {
        HarnessConfig::new()
            .with_wait_timeout(500)
            .with_soft_timeout(100)
            .with_poll_interval(10)
    }

    fn page<'d>(session: &'d MockSession, config: &'d HarnessConfig) -> Page<'d, MockSession> {
        let elements = ElementMap::new()
            .with("email", Locator::id("email"))
            .with("password", Locator::id("password"))
            .with("submit", Locator::css("button[type='submit']"))
            .with("remember", Locator::id("remember"))
            .with("error_alert", Locator::css(".alert-danger"));
        Page::new(session, config, "/login", elements)
    }

    mod element_map_tests {
        use super::*;

        #[test]
        fn test_with_and_get() {
            let map = ElementMap::new()
                .with("email", Locator::id("email"))
                .with("submit", Locator::css("button[type='submit']"));
            assert_eq!(map.len(), 2);
            assert_eq!(map.get("email"), Some(&Locator::id("email")));
            assert!(map.get("missing").is_none());
        }

        #[test]
        fn test_names_sorted() {
            let map = ElementMap::new()
                .with("zeta", Locator::id("z"))
                .with("alpha", Locator::id("a"));
            assert_eq!(map.names(), vec!["alpha", "zeta"]);
        }
    }

    mod page_tests {
        use super::*;

        #[test]
        fn test_unknown_name_is_an_error() {
            let config = config();
            let session = MockSession::secure_docs();
            let page = page(&session, &config);
            assert!(matches!(
                page.resolve("nonexistent"),
                Err(RevisarError::UnknownElement { .. })
            ));
        }

        #[test]
        fn test_open_navigates_to_base_path() {
            let config = config();
            let session = MockSession::secure_docs();
            let page = page(&session, &config);
            page.open().unwrap();
            assert!(page.current_url().unwrap().ends_with("/login"));
        }

        #[test]
        fn test_fill_rewrites_value_across_mutations() {
            let config = config();
            let session = MockSession::secure_docs();
            let page = page(&session, &config);
            page.open().unwrap();
            page.fill("email", "first@example.com").unwrap();
            page.fill("email", "second@example.com").unwrap();
            assert_eq!(page.text_of("email").unwrap(), "second@example.com");
        }

        #[test]
        fn test_set_checked_is_idempotent() {
            let config = config();
            let session = MockSession::secure_docs();
            let page = page(&session, &config);
            page.open().unwrap();

            page.set_checked("remember", true).unwrap();
            assert!(session.remember_checked());
            // Second set with the same target must not toggle back.
            page.set_checked("remember", true).unwrap();
            assert!(session.remember_checked());
            page.set_checked("remember", false).unwrap();
            assert!(!session.remember_checked());
        }

        #[test]
        fn test_action_propagates_element_not_found() {
            let config = config();
            let session = MockSession::secure_docs();
            let page = page(&session, &config);
            page.open().unwrap();
            // No error alert rendered yet: hard access fails terminally.
            assert!(matches!(
                page.click("error_alert"),
                Err(RevisarError::ElementNotFound { .. })
            ));
        }
    }

    mod soft_query_tests {
        use super::*;
        use std::time::Duration;

        #[test]
        fn test_soft_returns_default_on_absence() {
            let config = config();
            let session = MockSession::secure_docs();
            let page = page(&session, &config);
            page.open().unwrap();
            assert_eq!(page.soft_text("error_alert"), "");
            assert!(!page.soft_displayed("error_alert"));
        }

        #[test]
        fn test_soft_never_raises_on_dead_session() {
            let config = config();
            let session = MockSession::secure_docs();
            let page = page(&session, &config);
            page.open().unwrap();
            session.poison("session terminated");
            assert_eq!(page.soft_text("email"), "");
            assert!(!page.soft_url_contains("/login"));
        }

        #[test]
        fn test_soft_picks_up_late_rendered_element() {
            let config = HarnessConfig::new()
                .with_soft_timeout(400)
                .with_poll_interval(10);
            let session = MockSession::secure_docs().with_latency(Duration::from_millis(50));
            let page = page(&session, &config);
            page.open().unwrap();
            page.fill("email", "wrong@example.com").unwrap();
            page.fill("password", "Wrong123!").unwrap();
            page.click("submit").unwrap();

            // The alert renders 50ms after submit; the soft window covers it.
            assert!(page.soft_text("error_alert").contains("Invalid credentials"));
        }
    }
}
