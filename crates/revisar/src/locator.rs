//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a *description* of zero or more elements on a rendered
//! page: a lookup strategy plus a value. Resolving one against a live
//! session yields an [`ElementRef`], a transient handle that is only good
//! until the next wait, navigation, or DOM-mutating action; after that it
//! must be treated as stale and re-resolved.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lookup strategy for locating elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// CSS selector (e.g. `button[type='submit']`)
    Css,
    /// Element id attribute
    Id,
    /// Exact anchor text
    LinkText,
    /// Form control name attribute
    Name,
    /// XPath expression
    XPath,
}

impl Strategy {
    /// Short tag used in diagnostics
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Id => "id",
            Self::LinkText => "link",
            Self::Name => "name",
            Self::XPath => "xpath",
        }
    }
}

/// A (strategy, value) description identifying elements on a page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    /// Lookup strategy
    pub strategy: Strategy,
    /// Strategy-specific selector value
    pub value: String,
}

impl Locator {
    /// Create a locator with an explicit strategy
    #[must_use]
    pub fn new(strategy: Strategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Create a CSS selector locator
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Strategy::Css, selector)
    }

    /// Create an id locator
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::new(Strategy::Id, id)
    }

    /// Create a link-text locator
    #[must_use]
    pub fn link_text(text: impl Into<String>) -> Self {
        Self::new(Strategy::LinkText, text)
    }

    /// Create a name-attribute locator
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::new(Strategy::Name, name)
    }

    /// Create an XPath locator
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, expr)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy.as_str(), self.value)
    }
}

/// A live handle to the element a locator matched at resolution time.
///
/// The handle is owned by the call that requested it. It is never cached:
/// after any wait completes, any navigation occurs, or any action that may
/// have mutated the DOM runs, the handle is a Stale Reference and the
/// driver is free to reject it with an interaction error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef {
    /// Locator the handle was resolved from
    pub locator: Locator,
    /// Driver-issued node identifier
    pub handle: u64,
    /// Page epoch at resolution time; drivers bump it on every mutation
    pub epoch: u64,
}

impl ElementRef {
    /// Create a handle as issued by a driver
    #[must_use]
    pub fn new(locator: Locator, handle: u64, epoch: u64) -> Self {
        Self {
            locator,
            handle,
            epoch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod strategy_tests {
        use super::*;

        #[test]
        fn test_strategy_tags() {
            assert_eq!(Strategy::Css.as_str(), "css");
            assert_eq!(Strategy::Id.as_str(), "id");
            assert_eq!(Strategy::LinkText.as_str(), "link");
            assert_eq!(Strategy::Name.as_str(), "name");
            assert_eq!(Strategy::XPath.as_str(), "xpath");
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_constructors() {
            assert_eq!(Locator::css("button").strategy, Strategy::Css);
            assert_eq!(Locator::id("email").strategy, Strategy::Id);
            assert_eq!(Locator::link_text("Register").strategy, Strategy::LinkText);
            assert_eq!(Locator::name("language").strategy, Strategy::Name);
            assert_eq!(Locator::xpath("//button").strategy, Strategy::XPath);
        }

        #[test]
        fn test_display() {
            let locator = Locator::css(".alert-danger");
            assert_eq!(locator.to_string(), "css=.alert-danger");

            let locator = Locator::id("password");
            assert_eq!(locator.to_string(), "id=password");
        }

        #[test]
        fn test_equality() {
            assert_eq!(Locator::id("email"), Locator::id("email"));
            assert_ne!(Locator::id("email"), Locator::css("email"));
        }
    }

    mod element_ref_tests {
        use super::*;

        #[test]
        fn test_element_ref_fields() {
            let element = ElementRef::new(Locator::id("email"), 7, 3);
            assert_eq!(element.handle, 7);
            assert_eq!(element.epoch, 3);
            assert_eq!(element.locator, Locator::id("email"));
        }
    }
}
