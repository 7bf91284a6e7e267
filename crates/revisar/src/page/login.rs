//! Login page facade.
//!
//! Domain actions and queries over the application's `/login` page. The
//! default element map mirrors the production markup; an alternate map can
//! be injected for variant deployments.

use super::{ElementMap, Page};
use crate::config::HarnessConfig;
use crate::locator::Locator;
use crate::result::RevisarResult;
use crate::session::SessionDriver;

/// Base path of the login page
pub const LOGIN_PATH: &str = "/login";

const EMAIL: &str = "email";
const PASSWORD: &str = "password";
const SUBMIT: &str = "submit";
const REMEMBER: &str = "remember";
const REGISTER_LINK: &str = "register_link";
const FORGOT_PASSWORD_LINK: &str = "forgot_password_link";
const ERROR_ALERT: &str = "error_alert";
const SUCCESS_ALERT: &str = "success_alert";
const WEBAUTHN_BUTTON: &str = "webauthn_button";

/// Page object for the login page
#[derive(Debug)]
pub struct LoginPage<'d, D: SessionDriver + ?Sized> {
    page: Page<'d, D>,
}

impl<'d, D: SessionDriver + ?Sized> LoginPage<'d, D> {
    /// Create a login page with the default element map.
    #[must_use]
    pub fn new(driver: &'d D, config: &'d HarnessConfig) -> Self {
        Self::with_elements(driver, config, Self::default_elements())
    }

    /// Create a login page with an explicit element map.
    #[must_use]
    pub fn with_elements(driver: &'d D, config: &'d HarnessConfig, elements: ElementMap) -> Self {
        Self {
            page: Page::new(driver, config, LOGIN_PATH, elements),
        }
    }

    /// The element map matching the production login markup.
    #[must_use]
    pub fn default_elements() -> ElementMap {
        ElementMap::new()
            .with(EMAIL, Locator::id("email"))
            .with(PASSWORD, Locator::id("password"))
            .with(SUBMIT, Locator::css("button[type='submit']"))
            .with(REMEMBER, Locator::id("remember"))
            .with(REGISTER_LINK, Locator::link_text("Register"))
            .with(FORGOT_PASSWORD_LINK, Locator::link_text("Forgot Your Password?"))
            .with(ERROR_ALERT, Locator::css(".alert-danger"))
            .with(SUCCESS_ALERT, Locator::css(".alert-success"))
            .with("email_error", Locator::css("#email + .error-message"))
            .with("password_error", Locator::css("#password + .error-message"))
            .with(WEBAUTHN_BUTTON, Locator::id("webauthn-login-btn"))
    }

    /// Navigate to the login page and wait for the form to render.
    pub fn open(&self) -> RevisarResult<()> {
        self.page.open()?;
        self.page.wait_for_displayed(EMAIL)
    }

    // Authentication actions

    /// Fill credentials and submit.
    pub fn login(&self, email: &str, password: &str) -> RevisarResult<()> {
        self.page.fill(EMAIL, email)?;
        self.page.fill(PASSWORD, password)?;
        self.page.click(SUBMIT)
    }

    /// Fill credentials, check remember-me, and submit.
    ///
    /// The checkbox is driven to the checked state, not toggled: logging in
    /// twice with remember-me never unchecks it.
    pub fn login_with_remember_me(&self, email: &str, password: &str) -> RevisarResult<()> {
        self.page.fill(EMAIL, email)?;
        self.page.fill(PASSWORD, password)?;
        self.page.set_checked(REMEMBER, true)?;
        self.page.click(SUBMIT)
    }

    /// Submit the form with both fields left empty.
    pub fn attempt_login_with_empty_fields(&self) -> RevisarResult<()> {
        self.page.click(SUBMIT)
    }

    /// Follow the registration link.
    pub fn click_register_link(&self) -> RevisarResult<()> {
        self.page.click(REGISTER_LINK)
    }

    /// Follow the password-reset link.
    pub fn click_forgot_password_link(&self) -> RevisarResult<()> {
        self.page.click(FORGOT_PASSWORD_LINK)
    }

    // Soft queries: never raise; absence reads as a negative default.

    /// Whether the session reached the dashboard within the soft window.
    #[must_use]
    pub fn is_login_successful(&self) -> bool {
        self.page.soft_url_contains("/dashboard")
    }

    /// Error banner text, empty when none appears.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.page.soft_text(ERROR_ALERT)
    }

    /// Success banner text (e.g. the logout flash), empty when none appears.
    #[must_use]
    pub fn success_message(&self) -> String {
        self.page.soft_text(SUCCESS_ALERT)
    }

    /// Whether any field-level validation error is displayed.
    #[must_use]
    pub fn has_validation_errors(&self) -> bool {
        self.page.soft(false, || {
            let email = self.field_error_displayed("email")?;
            let password = self.field_error_displayed("password")?;
            Ok((email || password).then_some(true))
        })
    }

    /// Validation error text for a field (`"email"`, `"password"`),
    /// empty when the field shows none.
    #[must_use]
    pub fn field_validation_error(&self, field: &str) -> String {
        self.page.soft_text(&format!("{field}_error"))
    }

    /// Whether the WebAuthn login option is offered.
    #[must_use]
    pub fn is_webauthn_available(&self) -> bool {
        self.page.soft_displayed(WEBAUTHN_BUTTON)
    }

    fn field_error_displayed(&self, field: &str) -> RevisarResult<bool> {
        match self.page.displayed(&format!("{field}_error")) {
            Ok(displayed) => Ok(displayed),
            Err(e) if e.is_transient() => Ok(false),
            Err(e) => Err(e),
        }
    }

    // Passthroughs

    /// Current page title
    pub fn title(&self) -> RevisarResult<String> {
        self.page.title()
    }

    /// Current page URL
    pub fn current_url(&self) -> RevisarResult<String> {
        self.page.current_url()
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

    #[test]
    fn test_valid_login_lands_on_dashboard() {
        let config = config();
        let session = MockSession::secure_docs();
        let login = LoginPage::new(&session, &config);
        login.open().unwrap();
        login.login("testuser@example.com", "TestPass123!").unwrap();

        assert!(login.is_login_successful());
        assert!(session.current_url().unwrap().ends_with("/user/dashboard"));
    }

    #[test]
    fn test_invalid_login_reports_error_and_stays() {
        let config = config();
        let session = MockSession::secure_docs();
        let login = LoginPage::new(&session, &config);
        login.open().unwrap();
        login
            .login("nonexistent@example.com", "ValidPass123!")
            .unwrap();

        assert!(!login.is_login_successful());
        assert!(login.error_message().contains("Invalid credentials"));
        assert!(login.current_url().unwrap().ends_with("/login"));
    }

    #[test]
    fn test_empty_fields_surface_validation_errors() {
        let config = config();
        let session = MockSession::secure_docs();
        let login = LoginPage::new(&session, &config);
        login.open().unwrap();
        login.attempt_login_with_empty_fields().unwrap();

        assert!(!login.is_login_successful());
        assert!(login.has_validation_errors());
        assert!(login.field_validation_error("email").contains("required"));
        assert!(login.field_validation_error("password").contains("required"));
    }

    #[test]
    fn test_remember_me_login_is_idempotent_on_checkbox() {
        let config = config();
        let session = MockSession::secure_docs();
        let login = LoginPage::new(&session, &config);
        login.open().unwrap();

        // Pre-check the box the way a returning visitor's browser might.
        let page = Page::new(
            &session,
            &config,
            LOGIN_PATH,
            ElementMap::new().with("remember", Locator::id("remember")),
        );
        page.set_checked("remember", true).unwrap();

        login
            .login_with_remember_me("testuser@example.com", "TestPass123!")
            .unwrap();
        assert!(session.remember_checked());
        assert!(login.is_login_successful());
    }

    #[test]
    fn test_navigation_links() {
        let config = config();
        let session = MockSession::secure_docs();
        let login = LoginPage::new(&session, &config);
        login.open().unwrap();
        login.click_register_link().unwrap();
        assert!(login.current_url().unwrap().contains("/register"));
        assert_eq!(login.title().unwrap(), "Register - SecureDocs");

        login.open().unwrap();
        login.click_forgot_password_link().unwrap();
        assert!(login.current_url().unwrap().contains("/forgot-password"));
        assert_eq!(login.title().unwrap(), "Reset Password - SecureDocs");
    }

    #[test]
    fn test_soft_queries_never_raise() {
        let config = config();
        let session = MockSession::secure_docs();
        let login = LoginPage::new(&session, &config);
        login.open().unwrap();

        // Nothing rendered: all defaults, no panics, no errors.
        assert!(!login.is_login_successful());
        assert_eq!(login.error_message(), "");
        assert_eq!(login.success_message(), "");
        assert!(!login.has_validation_errors());
        assert_eq!(login.field_validation_error("email"), "");
        assert!(!login.is_webauthn_available());
    }

    #[test]
    fn test_webauthn_probe_sees_configured_button() {
        let config = config();
        let session = MockSession::secure_docs().with_webauthn();
        let login = LoginPage::new(&session, &config);
        login.open().unwrap();
        assert!(login.is_webauthn_available());
    }
}
