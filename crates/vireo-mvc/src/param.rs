//! Coercion of path segments into typed action parameters.
//!
//! Route matching hands actions their parameters as strings. Each action
//! parameter type decides whether a segment is acceptable; a single
//! rejection makes the whole action fail to match, so the caller can try a
//! different action instead.

use std::fmt;
use std::ops::Deref;
use std::sync::OnceLock;

use regex::Regex;

/// A type an action parameter can be declared as.
///
/// | Type | Accepted segments |
/// |------|-------------------|
/// | integers | canonical form only: `"10"`, `"-3"`; not `"020"` or `"+20"` |
/// | `f32`, `f64` | numeric strings with a finite value |
/// | `bool` | exactly `"true"` or `"false"` |
/// | `String`, [`Segment`] | anything |
/// | `Option<T>` | as `T`; may also be omitted |
pub trait ActionParam: Sized {
    /// Converts a supplied segment, or `None` if it does not fit.
    fn from_segment(segment: &str) -> Option<Self>;

    /// Value used when the segment is not supplied.
    ///
    /// `None` means the parameter is required.
    fn missing() -> Option<Self> {
        None
    }
}

macro_rules! impl_int_param {
    ($($ty:ty),*) => {
        $(
            impl ActionParam for $ty {
                fn from_segment(segment: &str) -> Option<Self> {
                    let value: $ty = segment.parse().ok()?;
                    (value.to_string() == segment).then_some(value)
                }
            }
        )*
    };
}

impl_int_param!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

fn numeric_grammar() -> Option<&'static Regex> {
    static NUMERIC: OnceLock<Option<Regex>> = OnceLock::new();
    NUMERIC
        .get_or_init(|| {
            Regex::new(
                r"^[ \t\n\r\x0B\x0C]*[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?[ \t\n\r\x0B\x0C]*$",
            )
            .ok()
        })
        .as_ref()
}

macro_rules! impl_float_param {
    ($($ty:ty),*) => {
        $(
            impl ActionParam for $ty {
                fn from_segment(segment: &str) -> Option<Self> {
                    if !numeric_grammar().is_some_and(|re| re.is_match(segment)) {
                        return None;
                    }
                    let value: $ty = segment.trim().parse().ok()?;
                    value.is_finite().then_some(value)
                }
            }
        )*
    };
}

impl_float_param!(f32, f64);

impl ActionParam for bool {
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

impl ActionParam for String {
    fn from_segment(segment: &str) -> Option<Self> {
        Some(segment.to_string())
    }
}

impl<T: ActionParam> ActionParam for Option<T> {
    fn from_segment(segment: &str) -> Option<Self> {
        T::from_segment(segment).map(Some)
    }

    fn missing() -> Option<Self> {
        Some(None)
    }
}

/// An untyped parameter: the segment exactly as matched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Segment(String);

impl Segment {
    /// Returns the raw segment.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwraps the segment.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl ActionParam for Segment {
    fn from_segment(segment: &str) -> Option<Self> {
        Some(Self(segment.to_string()))
    }
}

impl Deref for Segment {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
