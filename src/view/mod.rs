//! # Views
//!
//! Lightweight handles scoping accessor calls to a subtree.
//!
//! | View | Capability |
//! |------|------------|
//! | [`ConstRef`] | typed reads, enumeration, re-scoping |
//! | [`Ref`] | everything `ConstRef` does, plus writes |
//!
//! A view holds a shared handle to the store and two strings; cloning one
//! never copies records. Each call re-resolves its path and re-takes the
//! store lock, so no record reference outlives a single call.

pub mod const_ref;
pub mod write_ref;

pub use const_ref::ConstRef;
pub use write_ref::Ref;
