//! Route template compilation and positional parameter extraction.
//!
//! A template like `/users/{id}` is translated into the anchored regex
//! `^/users/(.*?)$`: every `/{name}` placeholder becomes a non-greedy
//! wildcard capture. Placeholder names are discarded: captures are
//! reported positionally, in template order. Because only the placeholders
//! are rewritten, the rest of the template flows into the match expression
//! verbatim, so routes may also embed raw regex fragments such as
//! `/movies/(\d+)`.

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;

use crate::error::RouteError;

/// Maximum number of path parameters before heap allocation.
///
/// Most routes have well under 8 placeholders, so extraction stays off the
/// heap in the common case.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated positional parameter storage.
pub type ParamVec = SmallVec<[String; MAX_INLINE_PARAMS]>;

/// Matches a `/{name}` placeholder segment within a route template.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\{(.*?)\}").expect("placeholder regex failed to compile"));

/// A compiled route template.
///
/// Holds the original template text alongside its compiled, fully anchored
/// regex. Compilation happens once, at registration time; matching and
/// extraction reuse the compiled expression.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    regex: Regex,
}

impl PathPattern {
    /// Compile a route template into a matchable pattern.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidPattern`] when the template (after
    /// placeholder substitution) is not a valid regular expression.
    pub fn compile(template: &str) -> Result<Self, RouteError> {
        let translated = PLACEHOLDER.replace_all(template, "/(.*?)");
        let anchored = format!("^{translated}$");
        let regex = Regex::new(&anchored).map_err(|source| RouteError::InvalidPattern {
            pattern: template.to_string(),
            source,
        })?;
        Ok(PathPattern {
            raw: template.to_string(),
            regex,
        })
    }

    /// The original template text, as registered.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the whole `uri` matches this pattern.
    #[must_use]
    pub fn matches(&self, uri: &str) -> bool {
        self.regex.is_match(uri)
    }

    /// Match `uri` against this pattern and extract positional parameters.
    ///
    /// Returns `None` when the URI does not match. On a match, each capture
    /// yields one value: the captured text, clipped at the following
    /// capture's start offset and trimmed of leading/trailing slashes. An
    /// empty captured region yields an empty string.
    #[must_use]
    pub fn extract(&self, uri: &str) -> Option<ParamVec> {
        let caps = self.regex.captures(uri)?;
        let mut params = ParamVec::new();
        for idx in 1..caps.len() {
            let Some(cap) = caps.get(idx) else {
                // a non-participating group (raw-regex alternation)
                params.push(String::new());
                continue;
            };
            let next_start = (idx + 1..caps.len()).find_map(|n| caps.get(n)).map(|m| m.start());
            let end = match next_start {
                Some(next) => cap.end().min(next.max(cap.start())),
                None => cap.end(),
            };
            params.push(uri[cap.start()..end].trim_matches('/').to_string());
        }
        Some(params)
    }
}

#[cfg(test)]
mod tests {
    use super::PathPattern;

    fn compile(template: &str) -> PathPattern {
        PathPattern::compile(template).expect("template should compile")
    }

    #[test]
    fn test_root_pattern() {
        let pattern = compile("/");
        assert!(pattern.matches("/"));
        assert!(!pattern.matches("/x"));
    }

    #[test]
    fn test_static_pattern_is_anchored() {
        let pattern = compile("/about/system");
        assert!(pattern.matches("/about/system"));
        assert!(!pattern.matches("/about"));
        assert!(!pattern.matches("/about/system/extra"));
        assert!(!pattern.matches("/prefix/about/system"));
    }

    #[test]
    fn test_single_placeholder() {
        let pattern = compile("/users/{id}");
        let params = pattern.extract("/users/42").expect("should match");
        assert_eq!(params.as_slice(), ["42"]);
    }

    #[test]
    fn test_placeholder_requires_separator() {
        let pattern = compile("/users/{id}");
        assert!(pattern.extract("/users").is_none());
    }

    #[test]
    fn test_two_placeholders_positional_order() {
        let pattern = compile("/users/{id}/posts/{postId}");
        let params = pattern.extract("/users/42/posts/7").expect("should match");
        assert_eq!(params.as_slice(), ["42", "7"]);
    }

    #[test]
    fn test_adjacent_placeholders() {
        let pattern = compile("/{a}/{b}");
        let params = pattern.extract("/x/y").expect("should match");
        assert_eq!(params.as_slice(), ["x", "y"]);
    }

    #[test]
    fn test_empty_capture_yields_empty_string() {
        let pattern = compile("/users/{id}");
        let params = pattern.extract("/users/").expect("should match");
        assert_eq!(params.as_slice(), [""]);
    }

    #[test]
    fn test_trailing_placeholder_spans_segments() {
        let pattern = compile("/files/{path}");
        let params = pattern.extract("/files/a/b/c").expect("should match");
        assert_eq!(params.as_slice(), ["a/b/c"]);
    }

    #[test]
    fn test_raw_regex_template() {
        let pattern = compile(r"/movies/(\d+)");
        let params = pattern.extract("/movies/123").expect("should match");
        assert_eq!(params.as_slice(), ["123"]);
        assert!(pattern.extract("/movies/abc").is_none());
    }

    #[test]
    fn test_invalid_template_reports_error() {
        let result = PathPattern::compile("/broken/(unclosed");
        assert!(result.is_err());
    }
}
