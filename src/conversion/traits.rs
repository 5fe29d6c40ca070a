//! `ToJson` implementations for the standard mapping table
//!
//! Scalars, text, optionals, ordered sequences, sets, keyed maps,
//! `serde_json::Value`, and the pointer/wrapper pass-throughs. Shared
//! pointers (`Rc`, `Arc`) are the one place cycle tracking happens: in safe
//! Rust only shared-pointer graphs can be circular, so their
//! implementations mark the allocation in flight for the duration of the
//! pointee's conversion.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;

use crate::conversion::engine::{Converter, ToJson};
use crate::document::NodeId;
use crate::error::{ConversionError, ConversionResult};

impl ToJson for bool {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        conv.boolean(*self)
    }
}

macro_rules! impl_to_json_for_integers {
    ($($ty:ty),*) => {
        $(
            impl ToJson for $ty {
                fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
                    conv.number(*self)
                }
            }
        )*
    };
}

impl_to_json_for_integers!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl ToJson for f32 {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        conv.float(f64::from(*self))
    }
}

impl ToJson for f64 {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        conv.float(*self)
    }
}

impl ToJson for char {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        let mut buffer = [0u8; 4];
        conv.string(self.encode_utf8(&mut buffer))
    }
}

impl ToJson for str {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        conv.string(self)
    }
}

impl ToJson for String {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        conv.string(self)
    }
}

/// Absence maps to Null.
impl<T: ToJson> ToJson for Option<T> {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        match self {
            Some(value) => value.to_json(conv),
            None => conv.null(),
        }
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        self.as_slice().to_json(conv)
    }
}

impl<T: ToJson> ToJson for [T] {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        conv.sequence(self.iter().map(|element| element as &dyn ToJson))
    }
}

impl<T: ToJson, const N: usize> ToJson for [T; N] {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        self.as_slice().to_json(conv)
    }
}

macro_rules! impl_to_json_for_tuples {
    ($(($($name:ident : $index:tt),+))*) => {
        $(
            impl<$($name: ToJson),+> ToJson for ($($name,)+) {
                fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
                    let elements = [$(&self.$index as &dyn ToJson),+];
                    conv.sequence(elements)
                }
            }
        )*
    };
}

impl_to_json_for_tuples! {
    (A:0)
    (A:0, B:1)
    (A:0, B:1, C:2)
    (A:0, B:1, C:2, D:3)
}

/// Sets convert to Arrays in their iteration order. For `HashSet` that
/// order is not guaranteed stable from run to run.
impl<T: ToJson, S> ToJson for HashSet<T, S> {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        conv.sequence(self.iter().map(|element| element as &dyn ToJson))
    }
}

impl<T: ToJson> ToJson for BTreeSet<T> {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        conv.sequence(self.iter().map(|element| element as &dyn ToJson))
    }
}

/// Maps convert to Objects in their iteration order; keys must convert to
/// strings.
impl<K: ToJson, V: ToJson, S> ToJson for HashMap<K, V, S> {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        conv.map_entries(
            self.iter()
                .map(|(key, value)| (key as &dyn ToJson, value as &dyn ToJson)),
        )
    }
}

impl<K: ToJson, V: ToJson> ToJson for BTreeMap<K, V> {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        conv.map_entries(
            self.iter()
                .map(|(key, value)| (key as &dyn ToJson, value as &dyn ToJson)),
        )
    }
}

impl<T: ToJson + ?Sized> ToJson for &T {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        (**self).to_json(conv)
    }
}

impl<T: ToJson + ?Sized> ToJson for Box<T> {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        (**self).to_json(conv)
    }
}

impl<T: ToJson + ?Sized> ToJson for Rc<T> {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        let identity = Rc::as_ptr(self).cast::<()>() as usize;
        conv.tracked(identity, std::any::type_name::<T>(), |conv| {
            (**self).to_json(conv)
        })
    }
}

impl<T: ToJson + ?Sized> ToJson for Arc<T> {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        let identity = Arc::as_ptr(self).cast::<()>() as usize;
        conv.tracked(identity, std::any::type_name::<T>(), |conv| {
            (**self).to_json(conv)
        })
    }
}

impl<T: ToJson> ToJson for RefCell<T> {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        self.borrow().to_json(conv)
    }
}

impl ToJson for serde_json::Value {
    fn to_json(&self, conv: &mut Converter) -> ConversionResult<NodeId> {
        match self {
            serde_json::Value::Null => conv.null(),
            serde_json::Value::Bool(value) => conv.boolean(*value),
            serde_json::Value::Number(number) => {
                if let Some(value) = number.as_i64() {
                    conv.number(value)
                } else if let Some(value) = number.as_u64() {
                    conv.number(value)
                } else {
                    match number.as_f64() {
                        Some(value) => conv.float(value),
                        None => Err(ConversionError::unsupported("serde_json::Number")),
                    }
                }
            }
            serde_json::Value::String(value) => conv.string(value),
            serde_json::Value::Array(values) => {
                conv.sequence(values.iter().map(|value| value as &dyn ToJson))
            }
            // The preserve_order feature keeps entries in JSON insertion
            // order here.
            serde_json::Value::Object(map) => conv.map_entries(
                map.iter()
                    .map(|(key, value)| (key as &dyn ToJson, value as &dyn ToJson)),
            ),
        }
    }
}
