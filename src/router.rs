//! Ordered, regex-matched request router.
//!
//! A [`RouteTable`] is a list of [`Rule`]s scanned in registration order.
//! The first rule whose method is equal to the request method and whose
//! pattern matches the path wins. There is no longest-match or specificity
//! ranking: order is the whole precedence story.
//!
//! # Matching
//!
//! Each pattern is compiled as `pattern + "$"`. It is anchored at the end of
//! the path but **not** at the start, so the regex may begin matching
//! anywhere in the path:
//!
//! | pattern            | path                 | matches |
//! |--------------------|----------------------|---------|
//! | `/userstories/\d`  | `/userstories/1`     | yes     |
//! | `/userstories/\d`  | `/userstories/42`    | no      |
//! | `/userstories`     | `/api/userstories`   | yes     |
//! | `/userstories\d`   | `/userstories/a`     | no      |
//!
//! Prefix `^` yourself if a rule must cover the whole path.
//!
//! The Perl classes `\d`, `\w`, `\s`, their negations, and `\b` are
//! ASCII-only: `/userstories/\d` does not accept `/userstories/٣`.
// TODO: decide with the consumers whether patterns should be implicitly
// start-anchored; flipping it changes which paths every existing rule accepts.

use std::fmt;

use regex::Regex;
use tracing::debug;

use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};

/// One `(method, pattern, handler)` registration. Immutable once built.
pub struct Rule {
    method: String,
    source: String,
    pattern: Regex,
    handler: BoxedHandler,
}

impl Rule {
    fn compile(pattern: &str, method: &str, handler: BoxedHandler) -> Result<Self, Error> {
        let anchored = format!("{}$", ascii_classes(pattern));
        let compiled = Regex::new(&anchored).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(Self {
            method: method.to_owned(),
            source: pattern.to_owned(),
            pattern: compiled,
            handler,
        })
    }

    pub fn method(&self) -> &str { &self.method }

    /// The pattern as it was registered, without the appended `$`.
    pub fn pattern(&self) -> &str { &self.source }

    pub fn handler(&self) -> &BoxedHandler { &self.handler }

    /// Exact, case-sensitive method equality and an end-anchored search of
    /// the path.
    pub fn matches(&self, method: &str, path: &str) -> bool {
        self.method == method && self.pattern.is_match(path)
    }
}

/// Rewrites the Perl classes `\d \w \s` (and their negations) and the word
/// boundaries `\b \B` to their ASCII forms, so `\d` never accepts a non-ASCII
/// digit. Everything else, `.` and `\p{..}` included, stays Unicode-aware.
fn ascii_classes(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('d') => out.push_str("[0-9]"),
            Some('D') => out.push_str("[^0-9]"),
            Some('w') => out.push_str("[0-9A-Za-z_]"),
            Some('W') => out.push_str("[^0-9A-Za-z_]"),
            Some('s') => out.push_str(r"[\t\n\f\r ]"),
            Some('S') => out.push_str(r"[^\t\n\f\r ]"),
            Some('b') => out.push_str(r"(?-u:\b)"),
            Some('B') => out.push_str(r"(?-u:\B)"),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("method", &self.method)
            .field("pattern", &self.source)
            .finish_non_exhaustive()
    }
}

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve),
/// which shares it read-only with every connection. The table is append-only:
/// there is no way to remove or replace a rule.
///
/// ```rust
/// use backlog::{Request, Response, RouteTable};
///
/// # async fn open(_: Request) -> Response { Response::text("") }
/// # async fn add(_: Request) -> Response { Response::text("") }
/// # async fn update(_: Request) -> Response { Response::text("") }
/// let table = RouteTable::new()
///     .register("/userstories/open", "GET",  open)
///     .register("/userstories",      "POST", add)
///     .register(r"/userstories/\d+", "PUT",  update);
///
/// assert!(table.resolve("PUT", "/userstories/42").is_some());
/// assert!(table.resolve("DELETE", "/userstories/42").is_none());
/// ```
#[derive(Default)]
pub struct RouteTable {
    rules: Vec<Rule>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule. Returns `self` for chaining.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid regular expression. A bad pattern is
    /// a configuration error and must stop startup, not surface per request.
    /// Use [`try_register`](Self::try_register) to handle it yourself.
    pub fn register(mut self, pattern: &str, method: &str, handler: impl Handler) -> Self {
        if let Err(e) = self.try_register(pattern, method, handler) {
            panic!("{e}");
        }
        self
    }

    /// Appends a rule, reporting a pattern that fails to compile instead of
    /// panicking. On error the table is left unchanged.
    pub fn try_register(
        &mut self,
        pattern: &str,
        method: &str,
        handler: impl Handler,
    ) -> Result<&mut Self, Error> {
        let rule = Rule::compile(pattern, method, handler.into_boxed_handler())?;
        debug!(method, pattern, position = self.rules.len(), "route registered");
        self.rules.push(rule);
        Ok(self)
    }

    /// Returns the handler of the first rule matching `method` and `path`, or
    /// `None` when no rule matches (always the case for an empty table).
    pub fn resolve(&self, method: &str, path: &str) -> Option<&BoxedHandler> {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(Rule::handler)
    }

    /// Rules in registration order.
    pub fn rules(&self) -> &[Rule] { &self.rules }

    pub fn len(&self) -> usize { self.rules.len() }

    pub fn is_empty(&self) -> bool { self.rules.is_empty() }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.rules).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;

    fn tagged(tag: &'static str) -> impl Handler {
        move |_req: Request| async move { tag }
    }

    /// Runs the resolved handler and returns its body, or `None` on no match.
    async fn hit(table: &RouteTable, method: &str, path: &str) -> Option<String> {
        let handler = table.resolve(method, path)?;
        let resp = handler.call(Request::new(method, path)).await;
        Some(String::from_utf8(resp.body().to_vec()).unwrap())
    }

    #[tokio::test]
    async fn empty_table_never_matches() {
        let table = RouteTable::new();
        assert!(table.is_empty());
        for (method, path) in [("GET", "/"), ("POST", "/userstories"), ("", "")] {
            assert!(hit(&table, method, path).await.is_none());
        }
    }

    #[tokio::test]
    async fn single_rule_matches_method_and_path() {
        let table = RouteTable::new().register("/userstories", "GET", tagged("h"));
        assert_eq!(hit(&table, "GET", "/userstories").await.as_deref(), Some("h"));
        assert!(hit(&table, "GET", "/userstories/1").await.is_none());
        assert!(hit(&table, "GET", "/other").await.is_none());
    }

    #[tokio::test]
    async fn method_mismatch_is_no_match() {
        let table = RouteTable::new().register("/userstories", "GET", tagged("h"));
        assert!(hit(&table, "POST", "/userstories").await.is_none());
        assert!(hit(&table, "get", "/userstories").await.is_none());
    }

    #[tokio::test]
    async fn first_registered_rule_wins() {
        let table = RouteTable::new()
            .register(r"/userstories/\d", "GET", tagged("first"))
            .register(r"/userstories/1", "GET", tagged("second"));
        assert_eq!(hit(&table, "GET", "/userstories/1").await.as_deref(), Some("first"));
        assert_eq!(hit(&table, "GET", "/userstories/2").await.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn duplicate_rule_is_kept_but_unreachable() {
        let table = RouteTable::new()
            .register("/userstories", "POST", tagged("first"))
            .register("/userstories", "POST", tagged("second"));
        assert_eq!(table.len(), 2);
        assert_eq!(hit(&table, "POST", "/userstories").await.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn digit_pattern_matches_single_digit_id() {
        let table = RouteTable::new().register(r"/userstories/\d", "GET", tagged("h"));
        assert_eq!(hit(&table, "GET", "/userstories/1").await.as_deref(), Some("h"));
    }

    #[tokio::test]
    async fn missing_slash_pattern_does_not_match() {
        let table = RouteTable::new().register(r"/userstories\d", "POST", tagged("h"));
        assert!(hit(&table, "POST", "/userstories/a").await.is_none());
    }

    #[tokio::test]
    async fn pattern_is_end_anchored_only() {
        let table = RouteTable::new().register("/userstories", "GET", tagged("h"));
        assert_eq!(hit(&table, "GET", "/api/v1/userstories").await.as_deref(), Some("h"));
        assert!(hit(&table, "GET", "/userstories/").await.is_none());
    }

    #[tokio::test]
    async fn single_digit_pattern_rejects_multi_digit_id() {
        let table = RouteTable::new().register(r"/userstories/\d", "PUT", tagged("h"));
        assert!(hit(&table, "PUT", "/userstories/42").await.is_none());

        let table = RouteTable::new().register(r"/userstories/\d+", "PUT", tagged("h"));
        assert_eq!(hit(&table, "PUT", "/userstories/42").await.as_deref(), Some("h"));
    }

    #[tokio::test]
    async fn digit_class_is_ascii_only() {
        let table = RouteTable::new().register(r"/userstories/\d", "PUT", tagged("h"));
        assert_eq!(hit(&table, "PUT", "/userstories/3").await.as_deref(), Some("h"));
        assert!(hit(&table, "PUT", "/userstories/\u{0663}").await.is_none());
        assert!(hit(&table, "PUT", "/userstories/\u{FF13}").await.is_none());
    }

    #[tokio::test]
    async fn word_and_space_classes_are_ascii_only() {
        let table = RouteTable::new()
            .register(r"/tags/\w+", "GET", tagged("word"))
            .register(r"/notes/\S+", "GET", tagged("non-space"));
        assert_eq!(hit(&table, "GET", "/tags/open_1").await.as_deref(), Some("word"));
        assert!(hit(&table, "GET", "/tags/caf\u{e9}").await.is_none());
        assert_eq!(hit(&table, "GET", "/notes/caf\u{e9}").await.as_deref(), Some("non-space"));
        assert!(hit(&table, "GET", "/notes/a b").await.is_none());
    }

    #[tokio::test]
    async fn dot_and_unicode_literals_still_match_characters() {
        let table = RouteTable::new()
            .register("/stories/.", "GET", tagged("dot"))
            .register("/caf\u{e9}", "GET", tagged("literal"));
        assert_eq!(hit(&table, "GET", "/stories/\u{0663}").await.as_deref(), Some("dot"));
        assert_eq!(hit(&table, "GET", "/caf\u{e9}").await.as_deref(), Some("literal"));
    }

    #[test]
    fn perl_classes_are_rewritten_to_ascii() {
        assert_eq!(ascii_classes(r"/a/\d+"), "/a/[0-9]+");
        assert_eq!(ascii_classes(r"[\d_]\W"), "[[0-9]_][^0-9A-Za-z_]");
        assert_eq!(ascii_classes(r"\bx\.\p{L}\\d"), r"(?-u:\b)x\.\p{L}\\d");
    }

    #[tokio::test]
    async fn explicit_start_anchor_is_honoured() {
        let table = RouteTable::new().register("^/userstories", "GET", tagged("h"));
        assert!(hit(&table, "GET", "/api/userstories").await.is_none());
        assert_eq!(hit(&table, "GET", "/userstories").await.as_deref(), Some("h"));
    }

    #[tokio::test]
    async fn backlog_routes_resolve_by_method() {
        let table = RouteTable::new()
            .register("/userstories/open", "GET", tagged("h1"))
            .register("/userstories", "POST", tagged("h2"))
            .register(r"/userstories/\d", "PUT", tagged("h3"));

        assert_eq!(hit(&table, "GET", "/userstories/open").await.as_deref(), Some("h1"));
        assert_eq!(hit(&table, "POST", "/userstories").await.as_deref(), Some("h2"));
        assert_eq!(hit(&table, "PUT", "/userstories/4").await.as_deref(), Some("h3"));
        assert!(hit(&table, "DELETE", "/userstories/4").await.is_none());
        assert!(hit(&table, "DELETE", "/userstories/42").await.is_none());
    }

    #[tokio::test]
    async fn resolve_is_idempotent() {
        let table = RouteTable::new()
            .register("/a", "GET", tagged("a"))
            .register("/b", "GET", tagged("b"));
        for _ in 0..3 {
            assert_eq!(hit(&table, "GET", "/b").await.as_deref(), Some("b"));
            assert!(hit(&table, "GET", "/c").await.is_none());
        }
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn resolve_returns_the_stored_handler() {
        let table = RouteTable::new()
            .register("/a", "GET", tagged("a"))
            .register("/b", "GET", tagged("b"));
        let resolved = table.resolve("GET", "/b").unwrap();
        assert!(std::ptr::addr_eq(
            std::sync::Arc::as_ptr(resolved),
            std::sync::Arc::as_ptr(table.rules()[1].handler()),
        ));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let mut table = RouteTable::new();
        let err = table.try_register("/userstories/(", "GET", tagged("h")).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { ref pattern, .. } if pattern == "/userstories/("));
        assert!(table.is_empty());
    }

    #[test]
    #[should_panic(expected = "invalid route pattern `[`")]
    fn invalid_pattern_panics_on_register() {
        let _ = RouteTable::new().register("[", "GET", tagged("h"));
    }

    #[test]
    fn rules_keep_registration_order() {
        let table = RouteTable::new()
            .register("/x", "GET", tagged("x"))
            .register(r"/y/\d", "PUT", tagged("y"));
        let rules: Vec<_> = table.rules().iter().map(|r| (r.method(), r.pattern())).collect();
        assert_eq!(rules, [("GET", "/x"), ("PUT", r"/y/\d")]);
    }

    #[test]
    fn table_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RouteTable>();
    }
}
