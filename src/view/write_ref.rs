//! Read-write view.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::model::{PathMeta, Record, ToProp};
use crate::storage::{self, TreeInner};

use super::ConstRef;

/// A read-write handle onto a subtree of a [`PropTree`](crate::PropTree).
///
/// Dereferences to [`ConstRef`], so every read operation is available.
/// Setters never fail: a value with no textual form leaves the record
/// undefined, and the problem surfaces on the next strict read.
#[derive(Clone)]
pub struct Ref {
    base: ConstRef,
}

impl Ref {
    pub(crate) fn new(owner: Arc<TreeInner>, self_path: String, self_id: String) -> Self {
        Self { base: ConstRef::new(owner, self_path, self_id) }
    }

    /// Read-only copy of this view.
    pub fn as_const(&self) -> ConstRef {
        self.base.clone()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Overwrite the record at `path` wholesale, provenance included.
    pub fn set_record(&self, path: &str, record: Record) {
        let full = self.full_path(path);
        let mut records = self.base.owner.lock();
        *storage::record_mut(&mut records, full) = record;
    }

    /// Store `value` at `path`. Existing provenance is kept.
    pub fn set<T: ToProp>(&self, path: &str, value: T) {
        let full = self.full_path(path);
        let text = value.to_prop();
        let converted = {
            let mut records = self.base.owner.lock();
            storage::record_mut(&mut records, full.clone()).set_text(text)
        };
        if !converted {
            self.log_conversion_failure(&full);
        }
    }

    /// Store `value` at `path` and record where it came from.
    pub fn set_with_meta<T: ToProp>(&self, path: &str, value: T, meta: PathMeta) {
        let full = self.full_path(path);
        let text = value.to_prop();
        let converted = {
            let mut records = self.base.owner.lock();
            let record = storage::record_mut(&mut records, full.clone());
            record.set_path_meta(meta);
            record.set_text(text)
        };
        if !converted {
            self.log_conversion_failure(&full);
        }
    }

    /// Mark `path` undefined. Its text stays but is no longer readable.
    pub fn undefine(&self, path: &str) {
        let full = self.full_path(path);
        let mut records = self.base.owner.lock();
        storage::record_mut(&mut records, full).undefine();
    }

    /// Store `value` at this view's own node.
    pub fn set_value<T: ToProp>(&self, value: T) {
        let text = value.to_prop();
        let converted = {
            let mut records = self.base.owner.lock();
            storage::record_mut(&mut records, self.base.self_path.clone()).set_text(text)
        };
        if !converted {
            self.log_conversion_failure(&self.base.self_path);
        }
    }

    fn log_conversion_failure(&self, full_path: &str) {
        tracing::trace!(
            id = %self.base.self_id,
            path = %full_path,
            "value has no text form, property left undefined"
        );
    }

    // ========================================================================
    // Re-scoping
    // ========================================================================

    /// Write view rooted at `path` below this one, with the same identity.
    pub fn subtree(&self, path: &str) -> Ref {
        Self { base: self.base.subtree(path) }
    }

    /// Write view rooted at `path`, with identity extended by `sub_id`.
    pub fn subtree_for_sub_id(&self, path: &str, sub_id: &str) -> Ref {
        Self { base: self.base.subtree_for_sub_id(path, sub_id) }
    }

    /// Same records, identity extended by `sub_id`.
    pub fn reidfy(&self, sub_id: &str) -> Ref {
        Self { base: self.base.reidfy(sub_id) }
    }
}

impl Deref for Ref {
    type Target = ConstRef;

    fn deref(&self) -> &ConstRef {
        &self.base
    }
}

impl From<Ref> for ConstRef {
    fn from(r: Ref) -> Self {
        r.base
    }
}

impl fmt::Debug for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ref")
            .field("path", &self.base.self_path)
            .field("id", &self.base.self_id)
            .finish()
    }
}
