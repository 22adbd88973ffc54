//! Handler references and controller resolution.
//!
//! A route's handler is either a direct closure or a `"Controller@method"`
//! string spec. String specs are resolved at dispatch time through a
//! [`ControllerRegistry`], an explicit name-to-constructor mapping the
//! application fills in, rather than any ambient runtime lookup.
//! Resolution failures are reported as errors, never silently dropped.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::HandlerError;

/// A shared route handler closure, called with positional parameters.
pub type HandlerFn = Arc<dyn Fn(&[String]) + Send + Sync>;

/// A reference to the code that handles a matched route.
///
/// Cloning is cheap: the callable case shares one `Arc`'d closure.
#[derive(Clone)]
pub enum Handler {
    /// A direct closure, invoked with the extracted parameter list.
    Callable(HandlerFn),
    /// A named controller method, resolved through the registry at dispatch
    /// time. The controller name is qualified with the router's configured
    /// namespace, when one is set.
    Named {
        /// Unqualified controller name (left of the `@`)
        controller: String,
        /// Method name (right of the `@`)
        method: String,
    },
}

impl Handler {
    /// Wrap a closure as a handler.
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&[String]) + Send + Sync + 'static,
    {
        Handler::Callable(Arc::new(f))
    }

    /// Parse a `"Controller@method"` spec.
    ///
    /// The spec is split once on the first `@`; both halves must be
    /// non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::InvalidSpec`] for anything else, so a typo'd
    /// spec fails at registration rather than dispatch.
    pub fn named(spec: &str) -> Result<Self, HandlerError> {
        match spec.split_once('@') {
            Some((controller, method)) if !controller.is_empty() && !method.is_empty() => {
                Ok(Handler::Named {
                    controller: controller.to_string(),
                    method: method.to_string(),
                })
            }
            _ => Err(HandlerError::InvalidSpec {
                spec: spec.to_string(),
            }),
        }
    }
}

impl<F> From<F> for Handler
where
    F: Fn(&[String]) + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Handler::callable(f)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Handler::Callable(a), Handler::Callable(b)) => Arc::ptr_eq(a, b),
            (
                Handler::Named { controller: c1, method: m1 },
                Handler::Named { controller: c2, method: m2 },
            ) => c1 == c2 && m1 == m2,
            _ => false,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Callable(_) => f.write_str("Handler::Callable(..)"),
            Handler::Named { controller, method } => {
                write!(f, "Handler::Named({controller}@{method})")
            }
        }
    }
}

/// A controller type whose methods are dispatched by name.
///
/// Implementations return [`HandlerError::UnknownMethod`] for names they do
/// not handle; the registry then falls back to class-level functions
/// registered under the same controller name.
pub trait Controller: Send + Sync {
    /// Dispatch `method` on this instance with positional parameters.
    fn call(&self, method: &str, params: &[String]) -> Result<(), HandlerError>;
}

type Constructor = Arc<dyn Fn() -> Box<dyn Controller> + Send + Sync>;

/// Maps controller names to constructors and class-level functions.
///
/// Invoking a named handler constructs a fresh controller instance and
/// calls the method on it; if the instance reports the method unknown (or
/// no constructor is registered), a class-level function registered under
/// the same name is tried before giving up.
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    constructors: HashMap<String, Constructor>,
    functions: HashMap<String, HashMap<String, HandlerFn>>,
}

impl ControllerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a controller constructor under `controller`.
    ///
    /// Registering the same name again replaces the previous constructor.
    pub fn register<F>(&mut self, controller: &str, constructor: F)
    where
        F: Fn() -> Box<dyn Controller> + Send + Sync + 'static,
    {
        self.constructors
            .insert(controller.to_string(), Arc::new(constructor));
    }

    /// Register a class-level function under `controller` / `method`.
    ///
    /// These are the fallback when no instance method answers to the name,
    /// and work without any constructor being registered.
    pub fn register_fn<F>(&mut self, controller: &str, method: &str, f: F)
    where
        F: Fn(&[String]) + Send + Sync + 'static,
    {
        self.functions
            .entry(controller.to_string())
            .or_default()
            .insert(method.to_string(), Arc::new(f));
    }

    /// Resolve and invoke `controller@method` with `params`.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::UnknownController`] when nothing is
    /// registered under the name, or [`HandlerError::UnknownMethod`] when
    /// neither the instance nor the class-level table resolves the method.
    pub fn invoke(
        &self,
        controller: &str,
        method: &str,
        params: &[String],
    ) -> Result<(), HandlerError> {
        let functions = self.functions.get(controller);
        if let Some(constructor) = self.constructors.get(controller) {
            match constructor().call(method, params) {
                Err(HandlerError::UnknownMethod { .. }) => {}
                result => return result,
            }
        } else if functions.is_none() {
            return Err(HandlerError::UnknownController {
                controller: controller.to_string(),
            });
        }
        match functions.and_then(|methods| methods.get(method)) {
            Some(f) => {
                f(params);
                Ok(())
            }
            None => Err(HandlerError::UnknownMethod {
                controller: controller.to_string(),
                method: method.to_string(),
            }),
        }
    }
}
