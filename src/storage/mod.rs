//! # Property Store
//!
//! The single owner of every [`Record`]. Records live in one ordered map
//! keyed by full dotted path, so a subtree is a contiguous key range and
//! enumeration is a range scan rather than a tree walk.
//!
//! ## Locking
//!
//! One mutex guards the whole map. Every view operation takes it once,
//! does a bounded amount of map work, and releases it. Nothing is atomic
//! across two calls: a `get` followed by a `set` can interleave with other
//! threads' writes.
//!
//! Reads take the same exclusive lock as writes because a read of a missing
//! path inserts an undefined record.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::model::{path, Record, ToProp};
use crate::view::{ConstRef, Ref};

/// The shared inner state every view points at.
pub(crate) struct TreeInner {
    records: Mutex<BTreeMap<String, Record>>,
}

impl TreeInner {
    pub(crate) fn lock(&self) -> parking_lot::MutexGuard<'_, BTreeMap<String, Record>> {
        self.records.lock()
    }
}

/// Record at `full_path`, inserting an undefined one if absent.
///
/// Callers hold the lock; the returned reference must not outlive it.
pub(crate) fn record_mut(
    records: &mut BTreeMap<String, Record>,
    full_path: String,
) -> &mut Record {
    records.entry(full_path).or_default()
}

/// Keys in the subtree rooted at `scope`, relative to it, in key order.
///
/// The scope's own record is reported as `""`. With an empty scope every
/// key is reported verbatim.
pub(crate) fn scan_subtree(
    records: &BTreeMap<String, Record>,
    scope: &str,
    include_undefined: bool,
) -> Vec<String> {
    let wanted = |r: &Record| include_undefined || r.is_defined();

    if scope.is_empty() {
        return records
            .iter()
            .filter(|(_, r)| wanted(r))
            .map(|(k, _)| k.clone())
            .collect();
    }

    let mut out = Vec::new();
    if records.get(scope).is_some_and(|r| wanted(r)) {
        out.push(String::new());
    }

    // Keys sharing `scope.` are contiguous, but keys such as `scope-x` sort
    // between `scope` and `scope.`, so the scan starts at the dotted prefix.
    let prefix = path::descendant_prefix(scope);
    for (key, record) in records.range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded)) {
        let Some(rel) = path::strip_scope(scope, key) else { break };
        if wanted(record) {
            out.push(rel.to_owned());
        }
    }
    out
}

/// A thread-safe hierarchical property store.
///
/// `PropTree` is a cheap handle; clones share the same records. Views
/// obtained from [`PropTree::root`] keep the records alive on their own.
#[derive(Clone)]
pub struct PropTree {
    inner: Arc<TreeInner>,
}

impl PropTree {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TreeInner { records: Mutex::new(BTreeMap::new()) }),
        }
    }

    /// Write view at the root, labelled `id`.
    pub fn root(&self, id: &str) -> Ref {
        Ref::new(Arc::clone(&self.inner), String::new(), id.to_owned())
    }

    /// Read-only view at the root, labelled `id`.
    pub fn const_root(&self, id: &str) -> ConstRef {
        ConstRef::new(Arc::clone(&self.inner), String::new(), id.to_owned())
    }

    /// Drop every record.
    ///
    /// Only the map itself is guarded; callers that rely on particular keys
    /// existing across calls must serialize `clear` with those callers.
    pub fn clear(&self) {
        let mut records = self.inner.lock();
        let dropped = records.len();
        records.clear();
        tracing::debug!(dropped, "property tree cleared");
    }

    /// Number of materialized records, defined or not.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Whether `self` and `other` share the same records.
    pub fn same_tree(&self, other: &PropTree) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn from_inner(inner: Arc<TreeInner>) -> Self {
        Self { inner }
    }
}

impl Default for PropTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PropTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropTree").field("records", &self.len()).finish()
    }
}

/// Seed a tree from `(path, value)` pairs. Values that fail to convert
/// become undefined records, as with [`Ref::set`].
impl<K, V> Extend<(K, V)> for PropTree
where
    K: AsRef<str>,
    V: ToProp,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        let converted: Vec<(String, Option<String>)> = iter
            .into_iter()
            .map(|(key, value)| (key.as_ref().to_owned(), value.to_prop()))
            .collect();

        let mut failed = Vec::new();
        {
            let mut records = self.inner.lock();
            for (key, text) in converted {
                let record = record_mut(&mut records, key.clone());
                if !record.set_text(text) {
                    failed.push(key);
                }
            }
        }
        for key in failed {
            tracing::trace!(path = %key, "value has no text form, property left undefined");
        }
    }
}

impl<K, V> FromIterator<(K, V)> for PropTree
where
    K: AsRef<str>,
    V: ToProp,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = PropTree::new();
        tree.extend(iter);
        tree
    }
}
