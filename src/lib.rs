//! # proptree: Thread-safe Hierarchical Property Store
//!
//! A string-keyed property registry addressed by dotted paths
//! (`"server.port"`), shared by many threads in a long-running process.
//! Components read configuration, publish status values, and enumerate the
//! children of a namespace without any coordination layer of their own.
//!
//! ## Design Principles
//!
//! 1. **Flat map, not a node graph**: the hierarchy is key-prefix structure
//!    over one ordered map, so a subtree is a contiguous key range
//! 2. **Text storage, typed access**: every value is stored as text and
//!    converted through [`ToProp`] / [`FromProp`] at the accessor
//! 3. **Views own nothing**: [`ConstRef`] and [`Ref`] are a shared store
//!    handle plus a path prefix and an identity label, cheap to clone and
//!    send across threads
//! 4. **One lock, one call**: every accessor is atomic on its own; nothing
//!    is atomic across calls
//!
//! ## Quick Start
//!
//! ```rust
//! use proptree::PropTree;
//!
//! # fn example() -> proptree::Result<()> {
//! let tree = PropTree::new();
//! let root = tree.root("app");
//!
//! let server = root.subtree("server");
//! server.set("port", 8080u16);
//! server.set("host", "localhost");
//!
//! assert_eq!(server.get::<u16>("port")?, 8080);
//! assert_eq!(root.get_or("server.workers", 4u32), 4);
//! assert_eq!(root.list_keys(false), vec!["server"]);
//! assert_eq!(server.list_keys(false), vec!["host", "port"]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Views
//!
//! | Operation | `ConstRef` | `Ref` |
//! |-----------|:----------:|:-----:|
//! | `get`, `get_or`, `get_optional`, `lookup`, `value*` | ✓ | ✓ |
//! | `list_keys`, `list_keys_recursive` | ✓ | ✓ |
//! | `subtree`, `subtree_for_sub_id`, `reidfy` | ✓ | ✓ |
//! | `set`, `set_with_meta`, `set_record`, `undefine`, `set_value` | | ✓ |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod storage;
pub mod view;
pub mod actor;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Record, PathMeta, Lookup, INVALID_VALUE,
    ToProp, FromProp, Json,
    SEPARATOR,
};

// ============================================================================
// Re-exports: Store and views
// ============================================================================

pub use storage::PropTree;
pub use view::{ConstRef, Ref};

// ============================================================================
// Re-exports: Workers
// ============================================================================

pub use actor::{Actor, Worker};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Undefined property: {path}")]
    UndefinedProperty { path: String },

    #[error("Bad format for {type_name} property: {path}")]
    BadFormat { path: String, type_name: &'static str },

    #[error("Actor '{name}' is already running")]
    WorkerAlreadyRunning { name: String },

    #[error("Actor '{name}' panicked: {message}")]
    WorkerPanicked { name: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Resolved property path for property errors.
    pub fn property_path(&self) -> Option<&str> {
        match self {
            Error::UndefinedProperty { path } | Error::BadFormat { path, .. } => Some(path),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
