//! Serde shape probing.
//!
//! `T::deserialize` reveals the shape of `T` through the first
//! `Deserializer` method it calls: a derived struct with named fields calls
//! `deserialize_struct`, a `HashMap` calls `deserialize_map`, an `i32` calls
//! `deserialize_i32`, and so on. [`probe_shape`] drives `T::deserialize`
//! against a deserializer that answers every call with an error naming the
//! method, so no value is ever built.

use serde::de::{self, Deserializer, Visitor};
use serde::forward_to_deserialize_any;
use std::fmt;

/// The serde data-model shape of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A struct with named fields.
    Struct {
        /// Number of declared fields.
        fields: usize,
    },
    /// `struct Unit;`
    UnitStruct,
    /// `struct Wrapper(Inner);`
    NewtypeStruct,
    /// `struct Pair(A, B);`
    TupleStruct,
    /// A tuple.
    Tuple,
    /// A sequence such as `Vec<T>`.
    Seq,
    /// A map such as `HashMap<K, V>`, or a struct using `#[serde(flatten)]`.
    Map,
    /// An enum.
    Enum,
    /// An `Option<T>`.
    Option,
    /// `()`.
    Unit,
    /// A scalar, or a self-describing type that asks for `deserialize_any`.
    Other,
}

impl Shape {
    /// Returns `true` for structs with named fields.
    #[must_use]
    pub const fn is_struct(self) -> bool {
        matches!(self, Shape::Struct { .. })
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Struct { fields } => write!(f, "struct with {fields} named fields"),
            Shape::UnitStruct => f.write_str("unit struct"),
            Shape::NewtypeStruct => f.write_str("newtype struct"),
            Shape::TupleStruct => f.write_str("tuple struct"),
            Shape::Tuple => f.write_str("tuple"),
            Shape::Seq => f.write_str("sequence"),
            Shape::Map => f.write_str("map"),
            Shape::Enum => f.write_str("enum"),
            Shape::Option => f.write_str("option"),
            Shape::Unit => f.write_str("unit"),
            Shape::Other => f.write_str("scalar or self-describing value"),
        }
    }
}

/// Reports the serde shape of `T` without constructing a value.
///
/// # Example
///
/// ```
/// use serde::Deserialize;
/// use stowdb_codec::{probe_shape, Shape};
///
/// #[derive(Deserialize)]
/// struct User { name: String, age: u32 }
///
/// assert_eq!(probe_shape::<User>(), Shape::Struct { fields: 2 });
/// assert_eq!(probe_shape::<u64>(), Shape::Other);
/// assert_eq!(probe_shape::<Vec<User>>(), Shape::Seq);
/// ```
#[must_use]
pub fn probe_shape<T: de::DeserializeOwned>() -> Shape {
    match T::deserialize(ShapeProbe) {
        Err(Probed::Found(shape)) => shape,
        Err(Probed::Custom(_)) | Ok(_) => Shape::Other,
    }
}

#[derive(Debug)]
enum Probed {
    Found(Shape),
    Custom(String),
}

impl fmt::Display for Probed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probed::Found(shape) => write!(f, "probed {shape}"),
            Probed::Custom(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for Probed {}

impl de::Error for Probed {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Probed::Custom(msg.to_string())
    }
}

struct ShapeProbe;

impl<'de> Deserializer<'de> for ShapeProbe {
    type Error = Probed;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Probed> {
        Err(Probed::Found(Shape::Other))
    }

    fn deserialize_option<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Probed> {
        Err(Probed::Found(Shape::Option))
    }

    fn deserialize_unit<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Probed> {
        Err(Probed::Found(Shape::Unit))
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _visitor: V,
    ) -> Result<V::Value, Probed> {
        Err(Probed::Found(Shape::UnitStruct))
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _visitor: V,
    ) -> Result<V::Value, Probed> {
        Err(Probed::Found(Shape::NewtypeStruct))
    }

    fn deserialize_seq<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Probed> {
        Err(Probed::Found(Shape::Seq))
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value, Probed> {
        Err(Probed::Found(Shape::Tuple))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value, Probed> {
        Err(Probed::Found(Shape::TupleStruct))
    }

    fn deserialize_map<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Probed> {
        Err(Probed::Found(Shape::Map))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Probed> {
        Err(Probed::Found(Shape::Struct {
            fields: fields.len(),
        }))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Probed> {
        Err(Probed::Found(Shape::Enum))
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf identifier ignored_any
    }
}
