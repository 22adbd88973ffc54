//! Effective request method resolution.
//!
//! Route tables are keyed by the *effective* method, which is not always the
//! method on the wire: `HEAD` requests are dispatched against the `GET`
//! table (the transport buffers and discards the body), and `POST` requests
//! may carry an `X-HTTP-Method-Override` header naming the method a
//! proxy-restricted client actually meant.

use http::Method;

use crate::error::RouteError;

/// Header consulted for `POST` method overrides.
pub const METHOD_OVERRIDE_HEADER: &str = "X-HTTP-Method-Override";

/// The only methods an override header may select.
///
/// The comparison is exact: a lowercase `put` does not override.
const OVERRIDE_METHODS: [&str; 3] = ["PUT", "DELETE", "PATCH"];

/// Parse a method name into an [`http::Method`], upper-casing first.
///
/// Any valid HTTP token is accepted, standard or not; there is no fixed
/// method allowlist.
pub(crate) fn normalize(name: &str) -> Result<Method, RouteError> {
    let upper = name.to_ascii_uppercase();
    Method::from_bytes(upper.as_bytes()).map_err(|_| RouteError::InvalidMethod {
        method: name.to_string(),
    })
}

/// Compute the method to dispatch against.
///
/// * raw `HEAD` resolves to `GET`;
/// * raw `POST` with an override header valued exactly `PUT`, `DELETE`, or
///   `PATCH` resolves to the override;
/// * anything else resolves to itself, upper-cased.
///
/// `override_value` is the looked-up value of [`METHOD_OVERRIDE_HEADER`],
/// if present. Header *name* lookup is the transport's concern and is
/// case-insensitive; the *value* comparison here is case-sensitive.
///
/// # Errors
///
/// Returns [`RouteError::InvalidMethod`] when the raw method is not a valid
/// HTTP token; the dispatcher treats such a request as matching nothing.
pub fn effective_method(raw: &str, override_value: Option<&str>) -> Result<Method, RouteError> {
    let raw = raw.to_ascii_uppercase();
    match raw.as_str() {
        "HEAD" => Ok(Method::GET),
        "POST" => match override_value {
            Some(value) if OVERRIDE_METHODS.contains(&value) => normalize(value),
            _ => Ok(Method::POST),
        },
        _ => normalize(&raw),
    }
}

#[cfg(test)]
mod tests {
    use super::effective_method;
    use http::Method;

    #[test]
    fn test_head_resolves_to_get() {
        assert_eq!(effective_method("HEAD", None).unwrap(), Method::GET);
    }

    #[test]
    fn test_post_override_put() {
        assert_eq!(effective_method("POST", Some("PUT")).unwrap(), Method::PUT);
    }

    #[test]
    fn test_post_override_delete_and_patch() {
        assert_eq!(effective_method("POST", Some("DELETE")).unwrap(), Method::DELETE);
        assert_eq!(effective_method("POST", Some("PATCH")).unwrap(), Method::PATCH);
    }

    #[test]
    fn test_post_override_rejects_other_methods() {
        assert_eq!(effective_method("POST", Some("GET")).unwrap(), Method::POST);
        assert_eq!(effective_method("POST", Some("TRACE")).unwrap(), Method::POST);
    }

    #[test]
    fn test_override_value_is_case_sensitive() {
        assert_eq!(effective_method("POST", Some("put")).unwrap(), Method::POST);
    }

    #[test]
    fn test_override_ignored_for_non_post() {
        assert_eq!(effective_method("GET", Some("PUT")).unwrap(), Method::GET);
    }

    #[test]
    fn test_raw_method_is_upper_cased() {
        assert_eq!(effective_method("get", None).unwrap(), Method::GET);
        assert_eq!(effective_method("head", None).unwrap(), Method::GET);
    }

    #[test]
    fn test_custom_method_token() {
        assert_eq!(effective_method("FETCH", None).unwrap().as_str(), "FETCH");
    }

    #[test]
    fn test_invalid_method_token() {
        assert!(effective_method("NOT A TOKEN", None).is_err());
    }
}
