//! Record: the stored unit behind one dotted path.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::convert::FromProp;

/// Placeholder text stored when a setter's conversion fails.
pub const INVALID_VALUE: &str = "<invalid>";

/// Provenance of a value: where it was read from, and the directory that
/// relative filesystem paths inside it should be resolved against.
///
/// The store carries it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMeta {
    pub origin: Option<String>,
    pub base_dir: Option<PathBuf>,
}

impl PathMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Resolve `p` against `base_dir`. Absolute paths and missing base
    /// directories leave `p` as is.
    pub fn resolve(&self, p: impl AsRef<Path>) -> PathBuf {
        let p = p.as_ref();
        match &self.base_dir {
            Some(base) if p.is_relative() => base.join(p),
            _ => p.to_path_buf(),
        }
    }
}

/// Outcome of reading a record as `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// Defined and converted.
    Value(T),
    /// Defined, but the text does not convert to `T`.
    Malformed,
    /// Never set, or undefined since.
    Undefined,
}

impl<T> Lookup<T> {
    /// Whether the record held a value, regardless of whether it converted.
    pub fn is_defined(&self) -> bool {
        !matches!(self, Lookup::Undefined)
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Lookup::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        self.ok().unwrap_or(default)
    }
}

/// One stored property.
///
/// `value` is only meaningful while `defined` is set; an undefined record
/// keeps its last text, and readers must not look at it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    value: String,
    defined: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path_meta: Option<PathMeta>,
}

impl Record {
    /// An undefined record.
    pub fn new() -> Self {
        Self::default()
    }

    /// A defined record holding `value`.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self { value: value.into(), defined: true, path_meta: None }
    }

    pub fn with_meta(mut self, meta: PathMeta) -> Self {
        self.path_meta = Some(meta);
        self
    }

    /// Raw text. Check [`Record::is_defined`] first.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_defined(&self) -> bool {
        self.defined
    }

    pub fn path_meta(&self) -> Option<&PathMeta> {
        self.path_meta.as_ref()
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.defined = true;
    }

    pub fn set_value_with_meta(&mut self, value: impl Into<String>, meta: PathMeta) {
        self.set_value(value);
        self.set_path_meta(meta);
    }

    pub fn set_path_meta(&mut self, meta: PathMeta) {
        self.path_meta = Some(meta);
    }

    pub fn undefine(&mut self) {
        self.defined = false;
    }

    pub fn get_as<T: FromProp>(&self) -> Lookup<T> {
        if !self.defined {
            return Lookup::Undefined;
        }
        match T::from_prop(&self.value) {
            Some(v) => Lookup::Value(v),
            None => Lookup::Malformed,
        }
    }

    /// Store the outcome of a [`ToProp`](super::ToProp) conversion. `None`
    /// leaves the record undefined, holding [`INVALID_VALUE`]. Returns
    /// whether a text was stored.
    pub fn set_text(&mut self, text: Option<String>) -> bool {
        match text {
            Some(text) => {
                self.set_value(text);
                true
            }
            None => {
                self.value = INVALID_VALUE.to_owned();
                self.defined = false;
                false
            }
        }
    }
}
