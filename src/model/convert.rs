//! Bidirectional string conversion for stored values.
//!
//! Every record holds text. A type is usable with the typed accessors iff it
//! converts both ways: [`ToProp`] on write, [`FromProp`] on read. Failure is
//! reported as `None` on both sides and never panics.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// Conversion from a value to its stored text.
pub trait ToProp {
    /// `None` when the value has no textual form.
    fn to_prop(&self) -> Option<String>;
}

/// Conversion from stored text back to a value.
pub trait FromProp: Sized {
    /// `None` when `text` is not a valid rendering of `Self`.
    fn from_prop(text: &str) -> Option<Self>;

    /// Human-readable type name used in bad-format errors.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<T: ToProp + ?Sized> ToProp for &T {
    fn to_prop(&self) -> Option<String> {
        (**self).to_prop()
    }
}

// ============================================================================
// Text
// ============================================================================

impl ToProp for str {
    fn to_prop(&self) -> Option<String> { Some(self.to_owned()) }
}

impl ToProp for String {
    fn to_prop(&self) -> Option<String> { Some(self.clone()) }
}

impl FromProp for String {
    fn from_prop(text: &str) -> Option<Self> { Some(text.to_owned()) }
    fn type_name() -> &'static str { "string" }
}

impl ToProp for char {
    fn to_prop(&self) -> Option<String> { Some(self.to_string()) }
}

impl FromProp for char {
    fn from_prop(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
    fn type_name() -> &'static str { "char" }
}

// ============================================================================
// Booleans
// ============================================================================

impl ToProp for bool {
    fn to_prop(&self) -> Option<String> { Some(self.to_string()) }
}

/// Accepts `true`/`false` and the numeric forms `1`/`0`.
impl FromProp for bool {
    fn from_prop(text: &str) -> Option<Self> {
        match text.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
    fn type_name() -> &'static str { "bool" }
}

// ============================================================================
// Numbers
// ============================================================================

macro_rules! numeric_prop {
    ($($t:ty),* $(,)?) => {$(
        impl ToProp for $t {
            fn to_prop(&self) -> Option<String> { Some(self.to_string()) }
        }

        impl FromProp for $t {
            fn from_prop(text: &str) -> Option<Self> { text.trim().parse().ok() }
            fn type_name() -> &'static str { stringify!($t) }
        }
    )*};
}

numeric_prop!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

// ============================================================================
// Temporal
// ============================================================================

impl ToProp for DateTime<Utc> {
    fn to_prop(&self) -> Option<String> { Some(self.to_rfc3339()) }
}

/// RFC 3339; offsets other than UTC are normalized.
impl FromProp for DateTime<Utc> {
    fn from_prop(text: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(text.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
    fn type_name() -> &'static str { "datetime" }
}

impl ToProp for NaiveDate {
    fn to_prop(&self) -> Option<String> { Some(self.format("%Y-%m-%d").to_string()) }
}

impl FromProp for NaiveDate {
    fn from_prop(text: &str) -> Option<Self> {
        NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
    }
    fn type_name() -> &'static str { "date" }
}

impl ToProp for NaiveTime {
    fn to_prop(&self) -> Option<String> { Some(self.to_string()) }
}

impl FromProp for NaiveTime {
    fn from_prop(text: &str) -> Option<Self> { text.trim().parse().ok() }
    fn type_name() -> &'static str { "time" }
}

// ============================================================================
// Structured values
// ============================================================================

/// Stores any serde type as JSON text.
///
/// ```
/// use proptree::{Json, PropTree};
///
/// let tree = PropTree::new();
/// let root = tree.root("app");
/// root.set("workers.ports", Json(vec![8080u16, 8081]));
/// let Json(ports): Json<Vec<u16>> = root.get("workers.ports").unwrap();
/// assert_eq!(ports, vec![8080, 8081]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Serialize> ToProp for Json<T> {
    fn to_prop(&self) -> Option<String> {
        serde_json::to_string(&self.0).ok()
    }
}

impl<T: DeserializeOwned> FromProp for Json<T> {
    fn from_prop(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok().map(Json)
    }
    fn type_name() -> &'static str { "json" }
}
