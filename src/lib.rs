//! # switchback
//!
//! A small, regex-backed HTTP request router: given an incoming method and
//! path, it selects a registered handler, extracts path parameters, and
//! invokes it.
//!
//! ## Architecture
//!
//! - **[`pattern`]** - route template compilation (`/users/{id}` →
//!   anchored regex) and positional parameter extraction
//! - **[`router`]** - ordered, method-keyed route tables, registration,
//!   mounting, and the dispatch engine
//! - **[`method`]** - effective-method resolution (`HEAD` → `GET`,
//!   `X-HTTP-Method-Override` on `POST`)
//! - **[`handler`]** - direct-closure and `"Controller@method"` handler
//!   references, resolved through an injectable controller registry
//! - **[`transport`]** - the boundary trait to the HTTP layer, plus a
//!   CGI-style environment-backed implementation
//! - **[`error`]** - registration and handler-resolution errors
//!
//! Dispatch order is fixed: every matching before-middleware route runs
//! first, then the first matching primary route; when nothing matches, the
//! not-found handler (or a generic `404` status line) fires instead.
//! Registration order is match-priority order.
//!
//! ## Quick Start
//!
//! ```
//! use switchback::{CgiTransport, Router};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut router = Router::new();
//!     router.before(["GET", "POST"], "/{_}", |_: &[String]| {
//!         // runs ahead of every matching primary route
//!     })?;
//!     router.get("/users/{id}", |params: &[String]| {
//!         println!("user {}", params[0]);
//!     })?;
//!
//!     let mut request = CgiTransport::from_vars([
//!         ("REQUEST_METHOD", "GET"),
//!         ("REQUEST_URI", "/users/42"),
//!         ("SCRIPT_NAME", "/index.cgi"),
//!     ])?;
//!     assert!(router.run(&mut request));
//!     Ok(())
//! }
//! ```
//!
//! ## Lifecycle
//!
//! Build then serve: registration (`add`, `before`, `mount`, the setters)
//! runs once at startup and mutates the router; dispatch ([`Router::run`])
//! borrows it immutably and may proceed concurrently from several threads.
//! The router never catches handler panics; handler failure is the
//! application's concern.

pub mod error;
pub mod handler;
pub mod method;
pub mod pattern;
pub mod router;
pub mod transport;

pub use error::{HandlerError, RouteError};
pub use handler::{Controller, ControllerRegistry, Handler, HandlerFn};
pub use method::{effective_method, METHOD_OVERRIDE_HEADER};
pub use pattern::{ParamVec, PathPattern, MAX_INLINE_PARAMS};
pub use router::{Router, SUPPORTED_METHODS};
pub use transport::{CgiTransport, Transport};
