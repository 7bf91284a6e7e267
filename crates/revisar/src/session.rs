//! Browser session capability trait and the locator resolver.
//!
//! The harness never talks to a concrete transport. Everything it needs
//! from a browser is the [`SessionDriver`] capability set; swapping the
//! implementation (WebDriver, CDP, an in-memory double) never touches the
//! core. One driver instance is one session: a single-writer resource with
//! one logical control path.

use crate::locator::{ElementRef, Locator};
use crate::result::RevisarResult;

/// Capability set the harness requires from a browser session.
///
/// Element-level calls take the [`ElementRef`] a prior
/// [`find_element`](SessionDriver::find_element) returned. Implementations
/// are free to reject handles that predate a navigation or DOM mutation
/// with an interaction error; callers re-resolve instead of retrying the
/// handle.
pub trait SessionDriver {
    /// Navigate the session to an absolute URL.
    fn navigate(&self, url: &str) -> RevisarResult<()>;

    /// Look up the first element matching `locator` in the current page.
    ///
    /// # Errors
    ///
    /// Returns [`RevisarError::ElementNotFound`](crate::RevisarError::ElementNotFound)
    /// if zero elements match at call time.
    fn find_element(&self, locator: &Locator) -> RevisarResult<ElementRef>;

    /// Click an element.
    fn click(&self, element: &ElementRef) -> RevisarResult<()>;

    /// Type text into an element.
    fn type_text(&self, element: &ElementRef, text: &str) -> RevisarResult<()>;

    /// Clear an input element's value.
    fn clear(&self, element: &ElementRef) -> RevisarResult<()>;

    /// Whether the element is currently rendered visible.
    fn is_displayed(&self, element: &ElementRef) -> RevisarResult<bool>;

    /// Whether the element (checkbox, radio, option) is selected.
    fn is_selected(&self, element: &ElementRef) -> RevisarResult<bool>;

    /// Visible text content of the element.
    fn text(&self, element: &ElementRef) -> RevisarResult<String>;

    /// URL of the current page.
    fn current_url(&self) -> RevisarResult<String>;

    /// Title of the current page.
    fn title(&self) -> RevisarResult<String>;
}

/// On-demand locator resolution against a live session.
///
/// `resolve` performs exactly one immediate lookup and keeps no memory
/// between calls: every call re-queries the session. That statelessness
/// is what lets the wait engine retry lookups safely: a resolver inside a
/// poll loop sees the page as it is *now*, never a cached handle.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'d, D: SessionDriver + ?Sized> {
    driver: &'d D,
}

impl<'d, D: SessionDriver + ?Sized> Resolver<'d, D> {
    /// Create a resolver over a session.
    #[must_use]
    pub fn new(driver: &'d D) -> Self {
        Self { driver }
    }

    /// Resolve a locator to a live element handle.
    ///
    /// No retry: zero matches fail immediately with `ElementNotFound`.
    /// Callers that want to tolerate rendering latency wrap this call in
    /// the wait engine.
    pub fn resolve(&self, locator: &Locator) -> RevisarResult<ElementRef> {
        self.driver.find_element(locator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSession;

    #[test]
    fn test_resolver_is_uncached() {
        let session = MockSession::secure_docs();
        session.navigate("http://localhost:8000/login").unwrap();
        let resolver = Resolver::new(&session);

        let first = resolver.resolve(&Locator::id("email")).unwrap();
        // Mutating the page invalidates outstanding handles; a fresh
        // resolve must return a usable one.
        session.type_text(&first, "a@b.c").unwrap();
        let second = resolver.resolve(&Locator::id("email")).unwrap();
        assert!(second.epoch > first.epoch);
        assert!(session.text(&second).is_ok());
    }

    #[test]
    fn test_resolver_does_not_retry() {
        let session = MockSession::secure_docs();
        session.navigate("http://localhost:8000/login").unwrap();
        let resolver = Resolver::new(&session);

        let missing = resolver.resolve(&Locator::css(".no-such-node"));
        assert!(matches!(
            missing,
            Err(crate::RevisarError::ElementNotFound { .. })
        ));
        assert_eq!(session.lookup_count(), 2);
    }
}
