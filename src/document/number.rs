//! Numeric payload for document nodes
//!
//! Preserves the magnitude of every primitive Rust integer width and keeps
//! floats finite. Equality and serialization both go through the canonical
//! decimal text of the literal, so an integer and a float are equal exactly
//! when their canonical text matches: `5i64` and `5.0f64` both render `5`
//! and compare equal, while `5i64` and `5.5f64` do not.

use std::fmt;

use crate::error::{DocumentError, DocumentResult};

/// An arbitrary-width, finite numeric literal.
#[derive(Debug, Clone, Copy)]
pub struct JsonNumber {
    repr: Repr,
}

#[derive(Debug, Clone, Copy)]
enum Repr {
    PosInt(u128),
    NegInt(i128),
    Float(f64),
}

impl JsonNumber {
    /// Build a number from a float, rejecting NaN and infinities.
    pub fn from_f64(value: f64) -> DocumentResult<Self> {
        if !value.is_finite() {
            return Err(DocumentError::non_finite(value));
        }
        Ok(Self {
            repr: Repr::Float(value),
        })
    }

    /// Build a number from a single-precision float, rejecting NaN and
    /// infinities. The payload is widened to f64 without loss.
    pub fn from_f32(value: f32) -> DocumentResult<Self> {
        Self::from_f64(f64::from(value))
    }

    /// Whether the payload is an integer literal (as opposed to a float).
    pub fn is_integer(&self) -> bool {
        !matches!(self.repr, Repr::Float(_))
    }

    /// Canonical decimal text of the literal. This is both the serialized
    /// form and the basis of equality.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl serde::Serialize for JsonNumber {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.repr {
            Repr::PosInt(v) => serializer.serialize_u128(v),
            Repr::NegInt(v) => serializer.serialize_i128(v),
            Repr::Float(v) => serializer.serialize_f64(v),
        }
    }
}

impl fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            Repr::PosInt(v) => write!(f, "{}", v),
            Repr::NegInt(v) => write!(f, "{}", v),
            Repr::Float(v) => write!(f, "{}", v),
        }
    }
}

impl PartialEq for JsonNumber {
    fn eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::PosInt(a), Repr::PosInt(b)) => a == b,
            (Repr::NegInt(a), Repr::NegInt(b)) => a == b,
            // NegInt is negative by construction, so it never equals PosInt.
            (Repr::PosInt(_), Repr::NegInt(_)) | (Repr::NegInt(_), Repr::PosInt(_)) => false,
            // A float is involved: fall back to canonical text, which also
            // distinguishes -0 from 0.
            _ => self.canonical() == other.canonical(),
        }
    }
}

// NaN is rejected at construction, so equality is total.
impl Eq for JsonNumber {}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for JsonNumber {
                fn from(value: $ty) -> Self {
                    Self { repr: Repr::PosInt(value as u128) }
                }
            }
        )*
    };
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for JsonNumber {
                fn from(value: $ty) -> Self {
                    let value = value as i128;
                    if value >= 0 {
                        Self { repr: Repr::PosInt(value as u128) }
                    } else {
                        Self { repr: Repr::NegInt(value) }
                    }
                }
            }
        )*
    };
}

impl_from_unsigned!(u8, u16, u32, u64, u128, usize);
impl_from_signed!(i8, i16, i32, i64, i128, isize);
