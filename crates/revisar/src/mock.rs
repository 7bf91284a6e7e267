//! In-memory session double for browserless testing.
//!
//! [`MockSession`] models the SecureDocs login and dashboard pages well
//! enough to drive the whole harness without a browser: credentials are
//! checked on submit, alerts and validation errors appear, logout flashes
//! a message. Two properties make it a useful stand-in rather than a stub:
//!
//! - **Render latency.** Elements produced by an action (alerts, the
//!   dashboard welcome message, menu entries) only become findable after a
//!   configurable delay, so waits are exercised for real.
//! - **Stale handles.** Every DOM-mutating call bumps a page epoch, and
//!   element calls carrying an older epoch are rejected as stale, so any
//!   code path that caches an [`ElementRef`] across a mutation fails loudly.

use crate::locator::{ElementRef, Locator, Strategy};
use crate::result::{RevisarError, RevisarResult};
use crate::session::SessionDriver;
use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

const LOGIN_PATH: &str = "/login";
const DASHBOARD_PATH: &str = "/user/dashboard";
const REGISTER_PATH: &str = "/register";
const FORGOT_PATH: &str = "/forgot-password";

/// Elements the mock knows how to serve, keyed off (page, locator)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Elem {
    EmailField,
    PasswordField,
    SubmitButton,
    RememberCheckbox,
    RegisterLink,
    ForgotPasswordLink,
    ErrorAlert,
    SuccessAlert,
    EmailError,
    PasswordError,
    WebAuthnButton,
    Welcome,
    UserMenu,
    LogoutLink,
}

#[derive(Debug)]
struct State {
    current_path: String,
    epoch: u64,
    next_handle: u64,

    email_value: String,
    password_value: String,
    remember_checked: bool,
    logged_in: bool,
    user_menu_open: bool,

    error_alert: Option<(String, Instant)>,
    success_alert: Option<(String, Instant)>,
    field_errors_at: Option<Instant>,
    page_ready_at: Option<Instant>,
    menu_ready_at: Option<Instant>,

    poisoned: Option<String>,
}

/// Scripted in-memory implementation of [`SessionDriver`]
#[derive(Debug)]
pub struct MockSession {
    state: RefCell<State>,
    base_url: String,
    latency: Duration,
    valid_email: String,
    valid_password: String,
    user_name: String,
    webauthn_available: bool,
    lookups: Cell<u64>,
}

impl MockSession {
    /// A session against the canonical SecureDocs fixture account.
    #[must_use]
    pub fn secure_docs() -> Self {
        Self {
            state: RefCell::new(State {
                current_path: String::new(),
                epoch: 0,
                next_handle: 0,
                email_value: String::new(),
                password_value: String::new(),
                remember_checked: false,
                logged_in: false,
                user_menu_open: false,
                error_alert: None,
                success_alert: None,
                field_errors_at: None,
                page_ready_at: None,
                menu_ready_at: None,
                poisoned: None,
            }),
            base_url: "http://localhost:8000".to_string(),
            latency: Duration::ZERO,
            valid_email: "testuser@example.com".to_string(),
            valid_password: "TestPass123!".to_string(),
            user_name: "Test User".to_string(),
            webauthn_available: false,
            lookups: Cell::new(0),
        }
    }

    /// Delay between an action and the visibility of what it rendered.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make the WebAuthn login button present on the login page.
    #[must_use]
    pub fn with_webauthn(mut self) -> Self {
        self.webauthn_available = true;
        self
    }

    /// Kill the session: every subsequent call fails with `SessionError`.
    pub fn poison(&self, message: impl Into<String>) {
        self.state.borrow_mut().poisoned = Some(message.into());
    }

    /// Number of `find_element` calls served so far.
    #[must_use]
    pub fn lookup_count(&self) -> u64 {
        self.lookups.get()
    }

    /// Whether the mock believes a user is authenticated.
    #[must_use]
    pub fn logged_in(&self) -> bool {
        self.state.borrow().logged_in
    }

    /// Whether the remember-me checkbox is currently checked.
    #[must_use]
    pub fn remember_checked(&self) -> bool {
        self.state.borrow().remember_checked
    }

    fn check_alive(&self) -> RevisarResult<()> {
        match &self.state.borrow().poisoned {
            Some(message) => Err(RevisarError::session(message.clone())),
            None => Ok(()),
        }
    }

    fn check_fresh(&self, element: &ElementRef) -> RevisarResult<()> {
        if element.epoch != self.state.borrow().epoch {
            return Err(RevisarError::Interaction {
                locator: element.locator.to_string(),
                message: "stale element reference".to_string(),
            });
        }
        Ok(())
    }

    fn ready(at: Option<Instant>) -> bool {
        at.is_some_and(|t| Instant::now() >= t)
    }

    fn element_at(&self, state: &State, locator: &Locator) -> Option<Elem> {
        match state.current_path.as_str() {
            LOGIN_PATH => match (locator.strategy, locator.value.as_str()) {
                (Strategy::Id, "email") => Some(Elem::EmailField),
                (Strategy::Id, "password") => Some(Elem::PasswordField),
                (Strategy::Css, "button[type='submit']") => Some(Elem::SubmitButton),
                (Strategy::Id, "remember") => Some(Elem::RememberCheckbox),
                (Strategy::LinkText, "Register") => Some(Elem::RegisterLink),
                (Strategy::LinkText, "Forgot Your Password?") => {
                    Some(Elem::ForgotPasswordLink)
                }
                (Strategy::Css, ".alert-danger")
                    if Self::ready(state.error_alert.as_ref().map(|(_, t)| *t)) =>
                {
                    Some(Elem::ErrorAlert)
                }
                (Strategy::Css, ".alert-success")
                    if Self::ready(state.success_alert.as_ref().map(|(_, t)| *t)) =>
                {
                    Some(Elem::SuccessAlert)
                }
                (Strategy::Css, "#email + .error-message")
                    if Self::ready(state.field_errors_at) && state.email_value.is_empty() =>
                {
                    Some(Elem::EmailError)
                }
                (Strategy::Css, "#password + .error-message")
                    if Self::ready(state.field_errors_at)
                        && state.password_value.is_empty() =>
                {
                    Some(Elem::PasswordError)
                }
                (Strategy::Id, "webauthn-login-btn") if self.webauthn_available => {
                    Some(Elem::WebAuthnButton)
                }
                _ => None,
            },
            DASHBOARD_PATH => match (locator.strategy, locator.value.as_str()) {
                (Strategy::Css, ".welcome-message") if Self::ready(state.page_ready_at) => {
                    Some(Elem::Welcome)
                }
                (Strategy::Css, ".user-menu") if Self::ready(state.page_ready_at) => {
                    Some(Elem::UserMenu)
                }
                (Strategy::LinkText, "Logout")
                    if state.user_menu_open && Self::ready(state.menu_ready_at) =>
                {
                    Some(Elem::LogoutLink)
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn submit(&self, state: &mut State) {
        let now = Instant::now();
        state.error_alert = None;
        state.field_errors_at = None;

        if state.email_value.is_empty() || state.password_value.is_empty() {
            state.field_errors_at = Some(now + self.latency);
        } else if state.email_value == self.valid_email
            && state.password_value == self.valid_password
        {
            state.logged_in = true;
            state.current_path = DASHBOARD_PATH.to_string();
            state.page_ready_at = Some(now + self.latency);
            state.user_menu_open = false;
            state.success_alert = None;
        } else {
            state.error_alert = Some(("Invalid credentials.".to_string(), now + self.latency));
        }
    }

    fn logout(&self, state: &mut State) {
        let now = Instant::now();
        state.logged_in = false;
        state.user_menu_open = false;
        state.current_path = LOGIN_PATH.to_string();
        state.email_value.clear();
        state.password_value.clear();
        state.success_alert = Some((
            "You have been logged out.".to_string(),
            now + self.latency,
        ));
    }
}

impl SessionDriver for MockSession {
    fn navigate(&self, url: &str) -> RevisarResult<()> {
        self.check_alive()?;
        let mut state = self.state.borrow_mut();
        let path = url
            .strip_prefix(&self.base_url)
            .unwrap_or(url)
            .trim_end_matches('/');
        let path = if path.is_empty() { "/" } else { path };

        // Auth middleware: the dashboard bounces anonymous visitors.
        state.current_path = if path == DASHBOARD_PATH && !state.logged_in {
            LOGIN_PATH.to_string()
        } else {
            path.to_string()
        };
        state.epoch += 1;
        state.user_menu_open = false;
        // A navigation is a fresh page load: form state and one-shot
        // alerts do not survive it.
        state.email_value.clear();
        state.password_value.clear();
        state.remember_checked = false;
        state.error_alert = None;
        state.success_alert = None;
        state.field_errors_at = None;
        if state.current_path == DASHBOARD_PATH {
            state.page_ready_at = Some(Instant::now() + self.latency);
        }
        Ok(())
    }

    fn find_element(&self, locator: &Locator) -> RevisarResult<ElementRef> {
        self.check_alive()?;
        self.lookups.set(self.lookups.get() + 1);
        let mut state = self.state.borrow_mut();
        match self.element_at(&state, locator) {
            Some(_) => {
                state.next_handle += 1;
                Ok(ElementRef::new(
                    locator.clone(),
                    state.next_handle,
                    state.epoch,
                ))
            }
            None => Err(RevisarError::ElementNotFound {
                locator: locator.to_string(),
            }),
        }
    }

    fn click(&self, element: &ElementRef) -> RevisarResult<()> {
        self.check_alive()?;
        self.check_fresh(element)?;
        let mut state = self.state.borrow_mut();
        let target = self
            .element_at(&state, &element.locator)
            .ok_or_else(|| RevisarError::ElementNotFound {
                locator: element.locator.to_string(),
            })?;
        state.epoch += 1;
        match target {
            Elem::SubmitButton => self.submit(&mut state),
            Elem::RememberCheckbox => state.remember_checked = !state.remember_checked,
            Elem::RegisterLink => state.current_path = REGISTER_PATH.to_string(),
            Elem::ForgotPasswordLink => state.current_path = FORGOT_PATH.to_string(),
            Elem::UserMenu => {
                state.user_menu_open = true;
                state.menu_ready_at = Some(Instant::now() + self.latency);
            }
            Elem::LogoutLink => self.logout(&mut state),
            Elem::WebAuthnButton => {}
            other => {
                return Err(RevisarError::Interaction {
                    locator: element.locator.to_string(),
                    message: format!("{other:?} is not clickable"),
                })
            }
        }
        Ok(())
    }

    fn type_text(&self, element: &ElementRef, text: &str) -> RevisarResult<()> {
        self.check_alive()?;
        self.check_fresh(element)?;
        let mut state = self.state.borrow_mut();
        let target = self
            .element_at(&state, &element.locator)
            .ok_or_else(|| RevisarError::ElementNotFound {
                locator: element.locator.to_string(),
            })?;
        state.epoch += 1;
        match target {
            Elem::EmailField => state.email_value.push_str(text),
            Elem::PasswordField => state.password_value.push_str(text),
            _ => {
                return Err(RevisarError::Interaction {
                    locator: element.locator.to_string(),
                    message: "element does not accept text input".to_string(),
                })
            }
        }
        Ok(())
    }

    fn clear(&self, element: &ElementRef) -> RevisarResult<()> {
        self.check_alive()?;
        self.check_fresh(element)?;
        let mut state = self.state.borrow_mut();
        let target = self
            .element_at(&state, &element.locator)
            .ok_or_else(|| RevisarError::ElementNotFound {
                locator: element.locator.to_string(),
            })?;
        state.epoch += 1;
        match target {
            Elem::EmailField => state.email_value.clear(),
            Elem::PasswordField => state.password_value.clear(),
            _ => {
                return Err(RevisarError::Interaction {
                    locator: element.locator.to_string(),
                    message: "element cannot be cleared".to_string(),
                })
            }
        }
        Ok(())
    }

    fn is_displayed(&self, element: &ElementRef) -> RevisarResult<bool> {
        self.check_alive()?;
        self.check_fresh(element)?;
        let state = self.state.borrow();
        Ok(self.element_at(&state, &element.locator).is_some())
    }

    fn is_selected(&self, element: &ElementRef) -> RevisarResult<bool> {
        self.check_alive()?;
        self.check_fresh(element)?;
        let state = self.state.borrow();
        match self.element_at(&state, &element.locator) {
            Some(Elem::RememberCheckbox) => Ok(state.remember_checked),
            Some(_) => Ok(false),
            None => Err(RevisarError::ElementNotFound {
                locator: element.locator.to_string(),
            }),
        }
    }

    fn text(&self, element: &ElementRef) -> RevisarResult<String> {
        self.check_alive()?;
        self.check_fresh(element)?;
        let state = self.state.borrow();
        let target = self
            .element_at(&state, &element.locator)
            .ok_or_else(|| RevisarError::ElementNotFound {
                locator: element.locator.to_string(),
            })?;
        Ok(match target {
            Elem::Welcome => format!("Welcome, {}", self.user_name),
            Elem::ErrorAlert => state
                .error_alert
                .as_ref()
                .map(|(m, _)| m.clone())
                .unwrap_or_default(),
            Elem::SuccessAlert => state
                .success_alert
                .as_ref()
                .map(|(m, _)| m.clone())
                .unwrap_or_default(),
            Elem::EmailError => "The email field is required.".to_string(),
            Elem::PasswordError => "The password field is required.".to_string(),
            Elem::EmailField => state.email_value.clone(),
            Elem::PasswordField => state.password_value.clone(),
            Elem::RegisterLink => "Register".to_string(),
            Elem::ForgotPasswordLink => "Forgot Your Password?".to_string(),
            Elem::LogoutLink => "Logout".to_string(),
            _ => String::new(),
        })
    }

    fn current_url(&self) -> RevisarResult<String> {
        self.check_alive()?;
        let state = self.state.borrow();
        Ok(format!("{}{}", self.base_url, state.current_path))
    }

    fn title(&self) -> RevisarResult<String> {
        self.check_alive()?;
        let state = self.state.borrow();
        Ok(match state.current_path.as_str() {
            LOGIN_PATH => "Login - SecureDocs".to_string(),
            DASHBOARD_PATH => "Dashboard - SecureDocs".to_string(),
            REGISTER_PATH => "Register - SecureDocs".to_string(),
            FORGOT_PATH => "Reset Password - SecureDocs".to_string(),
            other => format!("SecureDocs - {other}"),
        })
    }
}
