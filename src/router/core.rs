use std::collections::HashMap;

use http::Method;
use tracing::debug;

use crate::error::RouteError;
use crate::handler::{ControllerRegistry, Handler};
use crate::method;
use crate::pattern::PathPattern;

/// Methods covered by [`Router::all`] and [`Router::before_all`].
pub const SUPPORTED_METHODS: [&str; 7] =
    ["GET", "POST", "PUT", "DELETE", "OPTIONS", "PATCH", "HEAD"];

/// One registered route: a compiled template and the handler it selects.
///
/// Entries are immutable once registered and live as long as the router.
#[derive(Debug, Clone)]
pub(crate) struct RouteEntry {
    pub(crate) pattern: PathPattern,
    pub(crate) handler: Handler,
}

/// The route registry and dispatch engine.
///
/// # Example
///
/// ```
/// use switchback::Router;
///
/// # fn main() -> Result<(), switchback::RouteError> {
/// let mut router = Router::new();
/// router.get("/users/{id}", |params: &[String]| {
///     println!("user {}", params[0]);
/// })?;
/// router.mount("/api", |r| {
///     r.get("/health", |_: &[String]| println!("ok"))
/// })?;
/// # Ok(())
/// # }
/// ```
pub struct Router {
    /// Primary routes; first match wins.
    pub(crate) routes: HashMap<Method, Vec<RouteEntry>>,
    /// Before-middleware routes; every match runs.
    pub(crate) before_routes: HashMap<Method, Vec<RouteEntry>>,
    /// Active mount prefix. Build-phase state only.
    base_route: String,
    pub(crate) not_found: Option<Handler>,
    pub(crate) namespace: String,
    pub(crate) base_path: Option<String>,
    pub(crate) registry: ControllerRegistry,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create an empty router.
    #[must_use]
    pub fn new() -> Self {
        Router {
            routes: HashMap::new(),
            before_routes: HashMap::new(),
            base_route: String::new(),
            not_found: None,
            namespace: String::new(),
            base_path: None,
            registry: ControllerRegistry::new(),
        }
    }

    /// Register a primary route for each of `methods`.
    ///
    /// Method names are upper-cased; any valid HTTP token is accepted. The
    /// template is prefixed with the active mount prefix and
    /// slash-normalized before compilation.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when the template does not compile or a
    /// method name is not a valid token; nothing is registered in that
    /// case.
    pub fn add<M, H>(&mut self, methods: M, pattern: &str, handler: H) -> Result<(), RouteError>
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
        H: Into<Handler>,
    {
        self.register(false, methods, pattern, handler.into())
    }

    /// Register a before-middleware route for each of `methods`.
    ///
    /// Identical to [`add`], but the entry lands in the middleware table:
    /// every matching middleware entry runs on dispatch, not just the
    /// first.
    ///
    /// # Errors
    ///
    /// Same conditions as [`add`].
    ///
    /// [`add`]: Router::add
    pub fn before<M, H>(&mut self, methods: M, pattern: &str, handler: H) -> Result<(), RouteError>
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
        H: Into<Handler>,
    {
        self.register(true, methods, pattern, handler.into())
    }

    /// Shorthand for a `GET` route.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Router::add`].
    pub fn get<H: Into<Handler>>(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
        self.add(["GET"], pattern, handler)
    }

    /// Shorthand for a `POST` route.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Router::add`].
    pub fn post<H: Into<Handler>>(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
        self.add(["POST"], pattern, handler)
    }

    /// Shorthand for a `PUT` route.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Router::add`].
    pub fn put<H: Into<Handler>>(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
        self.add(["PUT"], pattern, handler)
    }

    /// Shorthand for a `PATCH` route.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Router::add`].
    pub fn patch<H: Into<Handler>>(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
        self.add(["PATCH"], pattern, handler)
    }

    /// Shorthand for a `DELETE` route.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Router::add`].
    pub fn delete<H: Into<Handler>>(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
        self.add(["DELETE"], pattern, handler)
    }

    /// Shorthand for an `OPTIONS` route.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Router::add`].
    pub fn options<H: Into<Handler>>(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
        self.add(["OPTIONS"], pattern, handler)
    }

    /// Register a primary route for the whole supported method set.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Router::add`].
    pub fn all<H: Into<Handler>>(&mut self, pattern: &str, handler: H) -> Result<(), RouteError> {
        self.add(SUPPORTED_METHODS, pattern, handler)
    }

    /// Register a before-middleware route for the whole supported method set.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Router::add`].
    pub fn before_all<H: Into<Handler>>(
        &mut self,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        self.before(SUPPORTED_METHODS, pattern, handler)
    }

    /// Run `register` with `prefix` appended to the active mount prefix.
    ///
    /// Routes registered inside the closure inherit the prefix; the prior
    /// prefix is restored when the closure returns, so mounts nest to any
    /// depth. The closure's return value is passed through, which lets
    /// fallible registration compose:
    ///
    /// ```
    /// # use switchback::Router;
    /// # fn main() -> Result<(), switchback::RouteError> {
    /// # let mut router = Router::new();
    /// router.mount("/api", |r| {
    ///     r.get("/users", |_: &[String]| {})?;
    ///     r.mount("/v2", |r| r.get("/users", |_: &[String]| {}))
    /// })?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn mount<F, T>(&mut self, prefix: &str, register: F) -> T
    where
        F: FnOnce(&mut Self) -> T,
    {
        let saved = self.base_route.clone();
        self.base_route.push_str(prefix);
        let result = register(self);
        self.base_route = saved;
        result
    }

    /// Set the handler invoked (with no parameters) when no primary route
    /// matches. Replaces any previous not-found handler.
    pub fn set_404<H: Into<Handler>>(&mut self, handler: H) {
        self.not_found = Some(handler.into());
    }

    /// Set the default namespace prepended to named controller lookups
    /// (`namespace::Controller`).
    pub fn set_namespace(&mut self, namespace: &str) {
        self.namespace = namespace.to_string();
    }

    /// The configured controller namespace, empty when unset.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Explicitly set (or with `None`, reset) the base path stripped from
    /// incoming URIs. When unset, the base path is derived from the
    /// transport's script path.
    pub fn set_base_path<P: Into<String>>(&mut self, path: Option<P>) {
        self.base_path = path.map(Into::into);
    }

    /// Shared access to the controller registry.
    #[must_use]
    pub fn registry(&self) -> &ControllerRegistry {
        &self.registry
    }

    /// Mutable access to the controller registry, for registering
    /// controllers and class-level functions during the build phase.
    pub fn registry_mut(&mut self) -> &mut ControllerRegistry {
        &mut self.registry
    }

    fn register<M>(
        &mut self,
        middleware: bool,
        methods: M,
        pattern: &str,
        handler: Handler,
    ) -> Result<(), RouteError>
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
    {
        let methods = methods
            .into_iter()
            .map(|m| method::normalize(m.as_ref()))
            .collect::<Result<Vec<Method>, RouteError>>()?;
        let template = self.prefixed(pattern);
        let compiled = PathPattern::compile(&template)?;

        let table = if middleware {
            &mut self.before_routes
        } else {
            &mut self.routes
        };
        for method in methods {
            debug!(
                method = %method,
                pattern = %compiled.as_str(),
                middleware = middleware,
                "route registered"
            );
            table.entry(method).or_default().push(RouteEntry {
                pattern: compiled.clone(),
                handler: handler.clone(),
            });
        }
        Ok(())
    }

    /// Join the active mount prefix and `pattern`, normalizing slashes:
    /// the pattern's own edge slashes are trimmed, and inside a mount the
    /// trailing slash is stripped so `/api` + `/` stays `/api`.
    fn prefixed(&self, pattern: &str) -> String {
        let joined = format!("{}/{}", self.base_route, pattern.trim_matches('/'));
        if self.base_route.is_empty() {
            joined
        } else {
            joined.trim_end_matches('/').to_string()
        }
    }
}
