//! Dotted-path algebra.
//!
//! Pure string functions shared by storage keys and identity labels.
//! A path is a sequence of non-empty segments joined by [`SEPARATOR`];
//! the empty path denotes "this node".

/// The single hierarchy separator.
pub const SEPARATOR: char = '.';

/// Join two paths with [`SEPARATOR`].
///
/// The empty path is absorbed: `join("", p) == p` and `join(p, "") == p`.
pub fn join(p1: &str, p2: &str) -> String {
    if p1.is_empty() {
        return p2.to_owned();
    }
    if p2.is_empty() {
        return p1.to_owned();
    }
    let mut out = String::with_capacity(p1.len() + 1 + p2.len());
    out.push_str(p1);
    out.push(SEPARATOR);
    out.push_str(p2);
    out
}

/// True iff `p` is a single non-empty segment.
pub fn is_simple(p: &str) -> bool {
    !p.is_empty() && !p.contains(SEPARATOR)
}

/// First segment of `p`, or all of `p` when it has no separator.
pub fn split_first(p: &str) -> &str {
    match p.find(SEPARATOR) {
        Some(pos) => &p[..pos],
        None => p,
    }
}

/// Prefix that every strict descendant key of `scope` starts with.
///
/// Only meaningful for a non-empty `scope`; the root has no such prefix.
pub(crate) fn descendant_prefix(scope: &str) -> String {
    let mut prefix = String::with_capacity(scope.len() + 1);
    prefix.push_str(scope);
    prefix.push(SEPARATOR);
    prefix
}

/// Key relative to `scope`.
///
/// Returns `Some("")` for the scope node itself, the remainder for a strict
/// descendant, and `None` for anything else (including siblings that merely
/// share a textual prefix, like `"ab.c"` under `"a"`).
pub fn strip_scope<'k>(scope: &str, key: &'k str) -> Option<&'k str> {
    if scope.is_empty() {
        return Some(key);
    }
    let rest = key.strip_prefix(scope)?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix(SEPARATOR)
}
