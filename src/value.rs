//! Composite value model.
//!
//! A composite value is the schema node the generator turns into code. Untyped
//! JSON input is classified into exactly one [`ValueKind`] by a fixed, ordered
//! predicate chain (see [`CompositeValue::from_json`]); everything downstream
//! matches exhaustively on the resulting enum.

use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::fmt;

use crate::error::{GenerateError, Result};

pub const TAG_KEY: &str = "type";
pub const TAG_VARIABLE: &str = "variable";
pub const TAG_EXPRESSION: &str = "JSExpression";
pub const TAG_FUNCTION: &str = "JSFunction";
pub const TAG_SLOT: &str = "JSSlot";
pub const TAG_DATA_SOURCE: &str = "DataSource";
pub const TAG_I18N: &str = "i18n";

// ═══════════════════════════════════════════════════════════════════════════════
// VALUE KIND
// ═══════════════════════════════════════════════════════════════════════════════

/// Discriminant of [`CompositeValue`]; also the key under which hooks are registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Undefined,
    Null,
    Array,
    Variable,
    Expression,
    Function,
    Slot,
    DataSource,
    Object,
    String,
    Number,
    Boolean,
}

impl ValueKind {
    /// Kinds in classification order.
    pub const ALL: [ValueKind; 12] = [
        ValueKind::Undefined,
        ValueKind::Null,
        ValueKind::Array,
        ValueKind::Variable,
        ValueKind::Expression,
        ValueKind::Function,
        ValueKind::Slot,
        ValueKind::DataSource,
        ValueKind::Object,
        ValueKind::String,
        ValueKind::Number,
        ValueKind::Boolean,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Undefined => "undefined",
            ValueKind::Null => "null",
            ValueKind::Array => "array",
            ValueKind::Variable => "variable",
            ValueKind::Expression => "expression",
            ValueKind::Function => "function",
            ValueKind::Slot => "slot",
            ValueKind::DataSource => "dataSource",
            ValueKind::Object => "object",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
        }
    }

    pub fn from_name(name: &str) -> Option<ValueKind> {
        ValueKind::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TAGGED PAYLOADS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsExpression {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsFunction {
    pub value: String,
}

/// Child content descriptor. `value` is the node schema (or list of nodes)
/// and is only ever interpreted by a [`crate::NodeGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct JsSlot {
    pub title: Option<String>,
    pub params: Option<Vec<String>>,
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceRef {
    pub id: String,
}

/// Deprecated `{ type: "variable" }` node. `value` is the design-time mock and
/// never reaches generated code.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyVariable {
    pub value: Value,
    pub variable: String,
}

pub type CompositeObject = IndexMap<String, CompositeValue>;

// ═══════════════════════════════════════════════════════════════════════════════
// COMPOSITE VALUE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum CompositeValue {
    Undefined,
    Null,
    Array(Vec<CompositeValue>),
    Variable(LegacyVariable),
    Expression(JsExpression),
    Function(JsFunction),
    Slot(JsSlot),
    DataSource(DataSourceRef),
    Object(CompositeObject),
    String(String),
    Number(f64),
    Bool(bool),
}

impl CompositeValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            CompositeValue::Undefined => ValueKind::Undefined,
            CompositeValue::Null => ValueKind::Null,
            CompositeValue::Array(_) => ValueKind::Array,
            CompositeValue::Variable(_) => ValueKind::Variable,
            CompositeValue::Expression(_) => ValueKind::Expression,
            CompositeValue::Function(_) => ValueKind::Function,
            CompositeValue::Slot(_) => ValueKind::Slot,
            CompositeValue::DataSource(_) => ValueKind::DataSource,
            CompositeValue::Object(_) => ValueKind::Object,
            CompositeValue::String(_) => ValueKind::String,
            CompositeValue::Number(_) => ValueKind::Number,
            CompositeValue::Bool(_) => ValueKind::Boolean,
        }
    }

    pub fn expression(code: impl Into<String>) -> Self {
        CompositeValue::Expression(JsExpression { value: code.into() })
    }

    pub fn function(code: impl Into<String>) -> Self {
        CompositeValue::Function(JsFunction { value: code.into() })
    }

    pub fn data_source(id: impl Into<String>) -> Self {
        CompositeValue::DataSource(DataSourceRef { id: id.into() })
    }

    pub fn variable(name: impl Into<String>) -> Self {
        CompositeValue::Variable(LegacyVariable {
            value: Value::Null,
            variable: name.into(),
        })
    }

    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, CompositeValue)>,
    {
        CompositeValue::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Classify untyped JSON into a composite value.
    ///
    /// The predicate order mirrors the dispatcher: null, array, the tagged
    /// kinds (`variable`, `JSExpression`, `JSFunction`, `JSSlot`,
    /// `DataSource`), generic object, then string, number, boolean. A tagged
    /// object missing its required fields is rejected rather than falling
    /// through to the generic-object branch.
    pub fn from_json(raw: &Value) -> Result<Self> {
        match raw {
            Value::Null => Ok(CompositeValue::Null),
            Value::Array(items) => items
                .iter()
                .map(CompositeValue::from_json)
                .collect::<Result<Vec<_>>>()
                .map(CompositeValue::Array),
            Value::Object(map) => classify_object(map),
            Value::String(s) => Ok(CompositeValue::String(s.clone())),
            Value::Number(n) => n.as_f64().map(CompositeValue::Number).ok_or_else(|| {
                GenerateError::classification(format!("number `{}` is not representable", n))
            }),
            Value::Bool(b) => Ok(CompositeValue::Bool(*b)),
        }
    }

    /// Plain-data view of the value, following `JSON.stringify` rules:
    /// `undefined` yields `None` (dropped from objects, `null` inside arrays)
    /// and non-finite numbers become `null`.
    pub fn to_json(&self) -> Option<Value> {
        let json = match self {
            CompositeValue::Undefined => return None,
            CompositeValue::Null => Value::Null,
            CompositeValue::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| item.to_json().unwrap_or(Value::Null))
                    .collect(),
            ),
            CompositeValue::Variable(v) => tagged(
                TAG_VARIABLE,
                [
                    ("value", v.value.clone()),
                    ("variable", Value::String(v.variable.clone())),
                ],
            ),
            CompositeValue::Expression(e) => {
                tagged(TAG_EXPRESSION, [("value", Value::String(e.value.clone()))])
            }
            CompositeValue::Function(f) => {
                tagged(TAG_FUNCTION, [("value", Value::String(f.value.clone()))])
            }
            CompositeValue::Slot(slot) => {
                let mut map = Map::new();
                map.insert(TAG_KEY.to_string(), Value::String(TAG_SLOT.to_string()));
                if let Some(title) = &slot.title {
                    map.insert("title".to_string(), Value::String(title.clone()));
                }
                if let Some(params) = &slot.params {
                    map.insert(
                        "params".to_string(),
                        Value::Array(params.iter().cloned().map(Value::String).collect()),
                    );
                }
                if let Some(value) = &slot.value {
                    map.insert("value".to_string(), value.clone());
                }
                Value::Object(map)
            }
            CompositeValue::DataSource(ds) => {
                tagged(TAG_DATA_SOURCE, [("id", Value::String(ds.id.clone()))])
            }
            CompositeValue::Object(map) => Value::Object(
                map.iter()
                    .filter_map(|(k, v)| v.to_json().map(|json| (k.clone(), json)))
                    .collect(),
            ),
            CompositeValue::String(s) => Value::String(s.clone()),
            CompositeValue::Number(n) => Number::from_f64(*n).map_or(Value::Null, Value::Number),
            CompositeValue::Bool(b) => Value::Bool(*b),
        };
        Some(json)
    }

    pub fn as_object(&self) -> Option<&CompositeObject> {
        match self {
            CompositeValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// `true` for an object whose discriminator key is `"i18n"`.
    pub fn is_i18n(&self) -> bool {
        self.as_object().is_some_and(is_i18n_object)
    }
}

pub(crate) fn is_i18n_object(map: &CompositeObject) -> bool {
    matches!(map.get(TAG_KEY), Some(CompositeValue::String(tag)) if tag == TAG_I18N)
}

fn tagged<const N: usize>(tag: &str, fields: [(&str, Value); N]) -> Value {
    let mut map = Map::new();
    map.insert(TAG_KEY.to_string(), Value::String(tag.to_string()));
    for (key, value) in fields {
        map.insert(key.to_string(), value);
    }
    Value::Object(map)
}

fn required_str<'a>(map: &'a Map<String, Value>, tag: &str, field: &str) -> Result<&'a str> {
    map.get(field).and_then(Value::as_str).ok_or_else(|| {
        GenerateError::classification(format!("{} without string `{}`", tag, field))
    })
}

fn classify_object(map: &Map<String, Value>) -> Result<CompositeValue> {
    let tag = map.get(TAG_KEY).and_then(Value::as_str);

    if tag == Some(TAG_VARIABLE) {
        return Ok(CompositeValue::Variable(LegacyVariable {
            value: map.get("value").cloned().unwrap_or(Value::Null),
            variable: required_str(map, TAG_VARIABLE, "variable")?.to_string(),
        }));
    }

    if tag == Some(TAG_EXPRESSION) {
        return Ok(CompositeValue::expression(required_str(
            map,
            TAG_EXPRESSION,
            "value",
        )?));
    }

    if tag == Some(TAG_FUNCTION) {
        return Ok(CompositeValue::function(required_str(
            map,
            TAG_FUNCTION,
            "value",
        )?));
    }

    if tag == Some(TAG_SLOT) {
        let params = match map.get("params") {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => Some(
                items
                    .iter()
                    .map(|p| {
                        p.as_str().map(str::to_string).ok_or_else(|| {
                            GenerateError::classification("JSSlot `params` must be strings")
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            Some(_) => {
                return Err(GenerateError::classification(
                    "JSSlot `params` must be an array",
                ))
            }
        };
        return Ok(CompositeValue::Slot(JsSlot {
            title: map.get("title").and_then(Value::as_str).map(str::to_string),
            params,
            value: map.get("value").filter(|v| !v.is_null()).cloned(),
        }));
    }

    if tag == Some(TAG_DATA_SOURCE) {
        return Ok(CompositeValue::data_source(required_str(
            map,
            TAG_DATA_SOURCE,
            "id",
        )?));
    }

    map.iter()
        .map(|(k, v)| Ok((k.clone(), CompositeValue::from_json(v)?)))
        .collect::<Result<CompositeObject>>()
        .map(CompositeValue::Object)
}

impl TryFrom<&Value> for CompositeValue {
    type Error = GenerateError;

    fn try_from(raw: &Value) -> Result<Self> {
        CompositeValue::from_json(raw)
    }
}

impl TryFrom<Value> for CompositeValue {
    type Error = GenerateError;

    fn try_from(raw: Value) -> Result<Self> {
        CompositeValue::from_json(&raw)
    }
}

impl From<&str> for CompositeValue {
    fn from(s: &str) -> Self {
        CompositeValue::String(s.to_string())
    }
}

impl From<String> for CompositeValue {
    fn from(s: String) -> Self {
        CompositeValue::String(s)
    }
}

impl From<f64> for CompositeValue {
    fn from(n: f64) -> Self {
        CompositeValue::Number(n)
    }
}

impl From<i64> for CompositeValue {
    fn from(n: i64) -> Self {
        CompositeValue::Number(n as f64)
    }
}

impl From<bool> for CompositeValue {
    fn from(b: bool) -> Self {
        CompositeValue::Bool(b)
    }
}

impl From<Vec<CompositeValue>> for CompositeValue {
    fn from(items: Vec<CompositeValue>) -> Self {
        CompositeValue::Array(items)
    }
}

impl Serialize for CompositeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().unwrap_or(Value::Null).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CompositeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        CompositeValue::from_json(&raw).map_err(de::Error::custom)
    }
}
