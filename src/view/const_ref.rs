//! Read-only view.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::model::{path, FromProp, Lookup, Record};
use crate::storage::{self, PropTree, TreeInner};
use crate::{Error, Result};

/// A read-only handle onto a subtree of a [`PropTree`].
///
/// Carries two independent labels: the path prefix every relative path is
/// resolved against, and an identity used only for diagnostics. Views with
/// the same path and different identities address the same records.
#[derive(Clone)]
pub struct ConstRef {
    pub(crate) owner: Arc<TreeInner>,
    pub(crate) self_path: String,
    pub(crate) self_id: String,
}

impl ConstRef {
    pub(crate) fn new(owner: Arc<TreeInner>, self_path: String, self_id: String) -> Self {
        Self { owner, self_path, self_id }
    }

    /// Path prefix of this view; empty at the root.
    pub fn path(&self) -> &str {
        &self.self_path
    }

    /// Identity label of this view.
    pub fn id(&self) -> &str {
        &self.self_id
    }

    /// Handle to the tree this view reads from.
    pub fn tree(&self) -> PropTree {
        PropTree::from_inner(Arc::clone(&self.owner))
    }

    /// Store key that `path` resolves to under this view.
    pub fn full_path(&self, path: &str) -> String {
        path::join(&self.self_path, path)
    }

    // ========================================================================
    // Typed reads
    // ========================================================================

    /// Copy of the record at `path`.
    pub fn get_record(&self, path: &str) -> Record {
        let mut records = self.owner.lock();
        storage::record_mut(&mut records, self.full_path(path)).clone()
    }

    /// Read `path` as `T`, telling undefined apart from malformed.
    ///
    /// The text is parsed on a copy after the lock is released, so a
    /// `FromProp` impl may read the tree itself.
    pub fn lookup<T: FromProp>(&self, path: &str) -> Lookup<T> {
        self.get_record(path).get_as()
    }

    /// `None` when `path` is undefined or does not convert to `T`.
    pub fn get_optional<T: FromProp>(&self, path: &str) -> Option<T> {
        self.lookup(path).ok()
    }

    /// `default` when `path` is undefined or does not convert to `T`.
    pub fn get_or<T: FromProp>(&self, path: &str, default: T) -> T {
        self.lookup(path).unwrap_or(default)
    }

    /// Strict read.
    ///
    /// Fails with [`Error::UndefinedProperty`] or [`Error::BadFormat`], both
    /// carrying the fully resolved path.
    pub fn get<T: FromProp>(&self, path: &str) -> Result<T> {
        match self.lookup(path) {
            Lookup::Value(v) => Ok(v),
            Lookup::Malformed => Err(Error::BadFormat {
                path: self.full_path(path),
                type_name: T::type_name(),
            }),
            Lookup::Undefined => Err(Error::UndefinedProperty { path: self.full_path(path) }),
        }
    }

    /// [`ConstRef::get_or`] on this view's own node.
    pub fn value_or<T: FromProp>(&self, default: T) -> T {
        self.get_or("", default)
    }

    /// [`ConstRef::get_optional`] on this view's own node.
    pub fn value_optional<T: FromProp>(&self) -> Option<T> {
        self.get_optional("")
    }

    /// [`ConstRef::get`] on this view's own node.
    pub fn value<T: FromProp>(&self) -> Result<T> {
        self.get("")
    }

    // ========================================================================
    // Enumeration
    // ========================================================================

    /// Every key below this view, relative to it, in key order.
    ///
    /// The view's own node appears as `""` when it qualifies. Holds the lock
    /// for the whole scan, so the result is a consistent snapshot.
    pub fn list_keys_recursive(&self, include_undefined: bool) -> Vec<String> {
        let records = self.owner.lock();
        storage::scan_subtree(&records, &self.self_path, include_undefined)
    }

    /// Names of the immediate children of this view, each once, in name order.
    pub fn list_keys(&self, include_undefined: bool) -> Vec<String> {
        // A child's descendants are contiguous in key order, but the child's
        // own key is not: `a-b` sorts between `a` and `a.x`. Adjacent
        // de-duplication alone would report `a` twice.
        let names: BTreeSet<String> = self
            .list_keys_recursive(include_undefined)
            .iter()
            .map(|key| path::split_first(key))
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect();
        names.into_iter().collect()
    }

    // ========================================================================
    // Re-scoping
    // ========================================================================

    /// View rooted at `path` below this one, with the same identity.
    pub fn subtree(&self, path: &str) -> ConstRef {
        ConstRef::new(Arc::clone(&self.owner), self.full_path(path), self.self_id.clone())
    }

    /// View rooted at `path`, with identity extended by `sub_id`.
    pub fn subtree_for_sub_id(&self, path: &str, sub_id: &str) -> ConstRef {
        let mut r = self.subtree(path);
        r.self_id = path::join(&self.self_id, sub_id);
        r
    }

    /// Same records, identity extended by `sub_id`.
    pub fn reidfy(&self, sub_id: &str) -> ConstRef {
        let mut r = self.clone();
        r.self_id = path::join(&self.self_id, sub_id);
        r
    }
}

impl fmt::Debug for ConstRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstRef")
            .field("path", &self.self_path)
            .field("id", &self.self_id)
            .finish()
    }
}
