//! Serde serialization into [`Value`].
//!
//! Every `T: Serialize` is first converted to a [`Value`] by
//! [`ValueSerializer`]; the [`Writer`](crate::Writer) then renders that value in
//! the chosen dialect. Most users go through the crate-root functions:
//!
//! ```rust
//! use serde::Serialize;
//! use serde_textplist::{to_string_with_options, Dialect, WriteOptions};
//!
//! #[derive(Serialize)]
//! struct Window { title: String, width: u32 }
//!
//! let window = Window { title: "Main".to_string(), width: 640 };
//! let options = WriteOptions::new().with_dialect(Dialect::OpenStep);
//! let text = to_string_with_options(&window, &options).unwrap();
//! assert_eq!(text, "{\n\t\"title\" = \"Main\";\n\t\"width\" = 640;\n}");
//! ```
//!
//! ## Mapping
//!
//! - integers fit `Int`; a `u64` above `i64::MAX` becomes `Real`
//! - `&[u8]` via `serialize_bytes` becomes `Data` (use `serde_bytes` on fields)
//! - `None`, `()` and unit structs become `Null`
//! - enum variants with content become one-entry dictionaries `{ Variant = ...; }`
//! - [`Uid`] and dates held in a [`Value`] pass through unchanged
//! - map keys must serialize as strings (or chars); other keys are skipped or
//!   rejected depending on `skip_non_string_keys`

use crate::value::{DATE_TOKEN, UID_TOKEN};
use crate::{Error, PlistMap, Result, Uid, Value};
use chrono::DateTime;
use serde::ser::{self, Serialize};

/// Serializer whose output is a [`Value`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueSerializer {
    skip_non_string_keys: bool,
}

impl ValueSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop map entries whose key is not a string instead of failing.
    #[must_use]
    pub fn with_skip_non_string_keys(mut self, skip: bool) -> Self {
        self.skip_non_string_keys = skip;
        self
    }

    fn to_value<T: Serialize + ?Sized>(self, value: &T) -> Result<Value> {
        value.serialize(self)
    }
}

pub struct SerializeVec {
    ser: ValueSerializer,
    items: Vec<Value>,
}

pub struct SerializeTupleVariant {
    ser: ValueSerializer,
    variant: &'static str,
    items: Vec<Value>,
}

pub struct SerializeDict {
    ser: ValueSerializer,
    map: PlistMap,
    next_key: Option<String>,
    skip_value: bool,
}

pub struct SerializeStructVariant {
    ser: ValueSerializer,
    variant: &'static str,
    map: PlistMap,
}

fn single_entry(key: &str, value: Value) -> Value {
    let mut map = PlistMap::with_capacity(1);
    map.insert(key.to_string(), value);
    Value::Dict(map)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeDict;
    type SerializeStruct = SerializeDict;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        match i64::try_from(v) {
            Ok(i) => Ok(Value::Int(i)),
            Err(_) => Ok(Value::Real(v as f64)),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Real(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Real(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Data(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let inner = value.serialize(self)?;
        match (name, inner) {
            (UID_TOKEN, Value::Int(i)) => u64::try_from(i)
                .map(|uid| Value::Uid(Uid::new(uid)))
                .map_err(|_| Error::custom(format!("UID out of range: {}", i))),
            (UID_TOKEN, other) => Err(Error::custom(format!(
                "UID above i64::MAX cannot pass through serde ({})",
                other.kind()
            ))),
            (DATE_TOKEN, Value::String(s)) => DateTime::parse_from_rfc3339(&s)
                .map(Value::Date)
                .map_err(|e| Error::custom(format!("invalid date '{}': {}", s, e))),
            (_, inner) => Ok(inner),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(single_entry(variant, self.to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec {
            ser: self,
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            ser: self,
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeDict> {
        Ok(SerializeDict {
            ser: self,
            map: PlistMap::with_capacity(len.unwrap_or(0)),
            next_key: None,
            skip_value: false,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeDict> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            ser: self,
            variant,
            map: PlistMap::with_capacity(len),
        })
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(self.ser.to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(self.ser.to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(single_entry(self.variant, Value::Array(self.items)))
    }
}

impl ser::SerializeMap for SerializeDict {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match self.ser.to_value(key)? {
            Value::String(s) => {
                self.next_key = Some(s);
                self.skip_value = false;
                Ok(())
            }
            other if self.ser.skip_non_string_keys => {
                log::trace!("skipping entry with {} key", other.kind());
                self.next_key = None;
                self.skip_value = true;
                Ok(())
            }
            other => Err(Error::key_type(other.kind())),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if self.skip_value {
            self.skip_value = false;
            return Ok(());
        }
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, self.ser.to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Dict(self.map))
    }
}

impl ser::SerializeStruct for SerializeDict {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), self.ser.to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Dict(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), self.ser.to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(single_entry(self.variant, Value::Dict(self.map)))
    }
}
