//! # Property Model
//!
//! Pure data shared by the store and its views: dotted-path algebra, the
//! stored [`Record`], and the string conversions behind typed access.
//!
//! Design rule: no locks and no shared state here.

pub mod path;
pub mod record;
pub mod convert;

pub use path::{join, is_simple, split_first, strip_scope, SEPARATOR};
pub use record::{Record, PathMeta, Lookup, INVALID_VALUE};
pub use convert::{ToProp, FromProp, Json};
