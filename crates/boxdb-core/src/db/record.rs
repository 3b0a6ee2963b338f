use crate::{error::InternalError, model::Property, value::Value};
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// RawRow
///
/// Opaque encoded record exchanged with the engine.
/// Only the entity-access façade and the engine ever look inside.
///

#[derive(Clone, Debug, Deref, Eq, PartialEq)]
pub struct RawRow(Vec<u8>);

impl RawRow {
    #[must_use]
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

///
/// Record
///
/// Decoded row: property id → value. Properties absent from the map read
/// as `Value::Null`.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Record {
    values: BTreeMap<u32, Value>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter used by `EntityKind::to_record` implementations.
    #[must_use]
    pub fn with(mut self, property: &Property, value: impl Into<Value>) -> Self {
        self.set(property, value);
        self
    }

    pub fn set(&mut self, property: &Property, value: impl Into<Value>) {
        self.values.insert(property.id, value.into());
    }

    #[must_use]
    pub fn get(&self, property: &Property) -> &Value {
        self.get_by_id(property.id)
    }

    #[must_use]
    pub fn get_by_id(&self, id: u32) -> &Value {
        const NULL: &Value = &Value::Null;
        self.values.get(&id).unwrap_or(NULL)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Value)> {
        self.values.iter().map(|(id, v)| (*id, v))
    }

    /// Read an id-typed property; null reads as 0 (unset).
    pub fn read_id(&self, property: &Property) -> Result<u64, InternalError> {
        match self.get(property) {
            Value::Null => Ok(0),
            Value::Int(v) => Ok(v.cast_unsigned()),
            other => Err(mismatch(property, "id", other)),
        }
    }

    pub fn read_int(&self, property: &Property) -> Result<Option<i64>, InternalError> {
        match self.get(property) {
            Value::Null => Ok(None),
            Value::Int(v) => Ok(Some(*v)),
            other => Err(mismatch(property, "int", other)),
        }
    }

    pub fn read_bool(&self, property: &Property) -> Result<Option<bool>, InternalError> {
        match self.get(property) {
            Value::Null => Ok(None),
            Value::Bool(v) => Ok(Some(*v)),
            other => Err(mismatch(property, "bool", other)),
        }
    }

    pub fn read_float(&self, property: &Property) -> Result<Option<f64>, InternalError> {
        match self.get(property) {
            Value::Null => Ok(None),
            Value::Float(v) => Ok(Some(*v)),
            other => Err(mismatch(property, "float", other)),
        }
    }

    pub fn read_text(&self, property: &Property) -> Result<Option<String>, InternalError> {
        match self.get(property) {
            Value::Null => Ok(None),
            Value::Text(v) => Ok(Some(v.clone())),
            other => Err(mismatch(property, "text", other)),
        }
    }

    /// Encode into the engine's row format.
    pub fn encode(&self) -> Result<RawRow, InternalError> {
        serde_cbor::to_vec(self)
            .map(RawRow)
            .map_err(|err| InternalError::serialize_internal(format!("record encode: {err}")))
    }

    /// Decode a row produced by `encode`.
    pub fn decode(row: &RawRow) -> Result<Self, InternalError> {
        serde_cbor::from_slice(row.as_slice())
            .map_err(|err| InternalError::serialize_corruption(format!("record decode: {err}")))
    }
}

fn mismatch(property: &Property, expected: &str, found: &Value) -> InternalError {
    InternalError::serialize_corruption(format!(
        "property '{property}' expected {expected}, found {}",
        found.type_label()
    ))
}
