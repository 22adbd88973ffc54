//! # Router Module
//!
//! Ordered, method-keyed route tables and the dispatch engine that walks
//! them.
//!
//! ## Overview
//!
//! The router holds two independent tables, one for primary routes and
//! one for before-middleware routes, each mapping an HTTP method to the
//! routes registered for it, in registration order. Registration order *is* the
//! match-priority order: dispatch walks a method's list front to back,
//! running every matching middleware entry but only the first matching
//! primary route.
//!
//! ## Two phases
//!
//! 1. **Build**: `add`/`before` (and the verb shorthands) compile each
//!    template eagerly and append immutable entries; `mount` scopes nested
//!    registrations under a shared prefix. Run this once, at startup.
//! 2. **Serve**: [`Router::run`] resolves the effective method and URI,
//!    dispatches, and reports whether any primary route matched. Dispatch
//!    borrows the router immutably, so a built router may be shared across
//!    threads.

mod core;
mod dispatch;

pub use core::{Router, SUPPORTED_METHODS};
