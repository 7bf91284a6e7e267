//! Revisar: browser-driven regression harness for web login flows.
//!
//! Two mechanisms make UI regression testing reliable, and this crate is
//! built around exactly those two:
//!
//! - a **synchronization layer** that masks the asynchronous, eventually-
//!   consistent nature of a rendered page behind deterministic wait
//!   semantics (locator resolution, wait engine, page objects), and
//! - a **test orchestration layer** that sequences interdependent,
//!   data-parameterized cases and aggregates their outcomes (dependency
//!   graph, priority ordering, fan-out, result sinks).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Orchestrator ─► Page Objects ─► { Resolver, Wait } ─► Session   │
//! │       ▲                                                  │       │
//! │       └────────── statuses / faults / text ◄─────────────┘       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The browser itself stays behind the [`SessionDriver`] trait; the crate
//! ships an in-memory [`mock::MockSession`] so every layer is testable
//! without one.
//!
//! # Example
//!
//! ```
//! use revisar::{
//!     ensure, HarnessConfig, LoginPage, MemorySink, Orchestrator, TestCase,
//! };
//! use revisar::mock::MockSession;
//!
//! let config = HarnessConfig::new()
//!     .with_soft_timeout(200)
//!     .with_poll_interval(10);
//! let mut orchestrator = Orchestrator::new(config).with_name("smoke");
//! orchestrator
//!     .register(
//!         TestCase::builder("AUTH_001")
//!             .priority(1)
//!             .group("smoke")
//!             .body(|ctx| {
//!                 let login = LoginPage::new(ctx.driver, ctx.config);
//!                 login.open()?;
//!                 login.login("testuser@example.com", "TestPass123!")?;
//!                 ensure(login.is_login_successful(), "login should succeed")
//!             })
//!             .build(),
//!     )
//!     .unwrap();
//!
//! let session = MockSession::secure_docs();
//! let mut sink = MemorySink::new();
//! let run = orchestrator.run(&session, &mut sink).unwrap();
//! assert!(run.all_passed());
//! ```

#![warn(missing_docs)]

mod assertion;
mod case;
mod config;
mod data;
mod locator;
mod orchestrator;
mod page;
mod report;
mod result;
mod session;
mod wait;

/// In-memory session double for browserless testing
pub mod mock;

pub use assertion::{ensure, ensure_contains, ensure_eq, ensure_not};
pub use case::{CaseBody, CaseCx, TestCase, TestCaseBuilder, TestStatus};
pub use config::{
    HarnessConfig, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_SOFT_TIMEOUT_MS,
};
pub use data::{DataProvider, InvalidLogin, StaticData, ValidUser};
pub use locator::{ElementRef, Locator, Strategy};
pub use orchestrator::{Hook, Orchestrator};
pub use page::{DashboardPage, ElementMap, LoginPage, Page};
pub use report::{ExecutionRecord, MemorySink, ResultSink, TestRun, TracingSink};
pub use result::{RevisarError, RevisarResult};
pub use session::{Resolver, SessionDriver};
pub use wait::{
    wait_until, Wait, WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};
