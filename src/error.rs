use std::fmt;

/// Registration error.
///
/// Returned by the registration API (`add`, `before`, the verb shorthands)
/// when a route cannot be stored. Registration is atomic per call: on error
/// nothing is appended to any table.
#[derive(Debug)]
pub enum RouteError {
    /// The route template did not compile to a valid match expression.
    ///
    /// Templates are interpreted as regular expressions after placeholder
    /// substitution, so a stray `(` or malformed class surfaces here.
    InvalidPattern {
        /// The full (mount-prefixed, slash-normalized) template
        pattern: String,
        /// The underlying regex compilation error
        source: regex::Error,
    },
    /// A method name that is not a valid HTTP token (e.g. contains spaces).
    InvalidMethod {
        /// The rejected method name as given by the caller
        method: String,
    },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::InvalidPattern { pattern, source } => {
                write!(f, "route pattern '{}' is not a valid match expression: {}", pattern, source)
            }
            RouteError::InvalidMethod { method } => {
                write!(f, "'{}' is not a valid HTTP method token", method)
            }
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouteError::InvalidPattern { source, .. } => Some(source),
            RouteError::InvalidMethod { .. } => None,
        }
    }
}

/// Handler reference and resolution error.
///
/// `InvalidSpec` surfaces at construction time ([`Handler::named`]); the
/// other variants surface at dispatch time when a named handler cannot be
/// resolved through the controller registry.
///
/// [`Handler::named`]: crate::handler::Handler::named
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// A handler spec string without both a controller and a method half.
    InvalidSpec {
        /// The rejected spec string
        spec: String,
    },
    /// No constructor or class-level function is registered under this name.
    UnknownController {
        /// The qualified controller name that was looked up
        controller: String,
    },
    /// The controller exists but neither an instance method nor a
    /// class-level function answers to this name.
    UnknownMethod {
        /// The qualified controller name
        controller: String,
        /// The method that failed to resolve
        method: String,
    },
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::InvalidSpec { spec } => {
                write!(f, "handler spec '{}' is not of the form 'Controller@method'", spec)
            }
            HandlerError::UnknownController { controller } => {
                write!(f, "no controller registered under '{}'", controller)
            }
            HandlerError::UnknownMethod { controller, method } => {
                write!(f, "controller '{}' has no method '{}'", controller, method)
            }
        }
    }
}

impl std::error::Error for HandlerError {}
