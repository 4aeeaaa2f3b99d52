//! DynamoDB value-tagged JSON
//!
//! Table exports (`aws dynamodb scan`, and `srcmig dump-table`) wrap every
//! attribute in a single-key object naming its type:
//!
//! ```json
//! {"Items": [{"account_id": {"S": "u1"}, "disabled": {"BOOL": false}}]}
//! ```
//!
//! This module decodes those items into plain JSON, and encodes SDK
//! attribute values back into the tagged form.

use crate::etl::{Extractor, Loader, Transformer};
use aws_sdk_dynamodb::types::AttributeValue;
use base64::Engine;
use eyre::{Context, Result};
use serde_json::{Map, Number, Value, json};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DynamoJsonError {
    #[error("expected a single-key type-tagged attribute, found {0}")]
    NotTagged(String),
    #[error("unknown attribute type tag '{0}'")]
    UnknownTag(String),
    #[error("'{tag}' attribute holds {found}, expected {expected}")]
    WrongShape {
        tag: String,
        expected: &'static str,
        found: String,
    },
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("integer '{0}' does not fit in 64 bits")]
    IntegerOutOfRange(String),
    #[error("item must be a JSON object of attributes, found {0}")]
    NotAnItem(String),
    #[error("attribute '{0}' has a type this tool cannot encode")]
    Unsupported(String),
}

fn shape(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(_) => "a number".to_string(),
        Value::String(_) => "a string".to_string(),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}

fn wrong_shape(tag: &str, expected: &'static str, found: &Value) -> DynamoJsonError {
    DynamoJsonError::WrongShape {
        tag: tag.to_string(),
        expected,
        found: shape(found),
    }
}

/// Parse a DynamoDB number string: integer when it is one, float otherwise
///
/// Integers wider than 64 bits are an error rather than a rounded float.
pub fn parse_number(raw: &str) -> Result<Value, DynamoJsonError> {
    let trimmed = raw.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Ok(Value::Number(i.into()));
    }
    if let Ok(u) = trimmed.parse::<u64>() {
        return Ok(Value::Number(u.into()));
    }
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DynamoJsonError::IntegerOutOfRange(raw.to_string()));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| DynamoJsonError::InvalidNumber(raw.to_string()))
}

fn expect_str<'a>(tag: &str, value: &'a Value) -> Result<&'a str, DynamoJsonError> {
    value.as_str().ok_or_else(|| wrong_shape(tag, "a string", value))
}

fn expect_array<'a>(tag: &str, value: &'a Value) -> Result<&'a Vec<Value>, DynamoJsonError> {
    value
        .as_array()
        .ok_or_else(|| wrong_shape(tag, "an array", value))
}

/// Decode one type-tagged attribute value into plain JSON
pub fn decode_value(tagged: &Value) -> Result<Value, DynamoJsonError> {
    let (tag, inner) = match tagged.as_object() {
        Some(obj) if obj.len() == 1 => obj.iter().next().ok_or_else(|| {
            DynamoJsonError::NotTagged(tagged.to_string())
        })?,
        _ => return Err(DynamoJsonError::NotTagged(tagged.to_string())),
    };

    match tag.as_str() {
        "S" | "B" => Ok(Value::String(expect_str(tag, inner)?.to_string())),
        "N" => parse_number(expect_str(tag, inner)?),
        "BOOL" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| wrong_shape(tag, "a boolean", inner)),
        "NULL" => Ok(Value::Null),
        "M" => {
            let obj = inner
                .as_object()
                .ok_or_else(|| wrong_shape(tag, "an object", inner))?;
            decode_map(obj).map(Value::Object)
        }
        "L" => expect_array(tag, inner)?
            .iter()
            .map(decode_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        "SS" | "BS" => expect_array(tag, inner)?
            .iter()
            .map(|v| expect_str(tag, v).map(|s| Value::String(s.to_string())))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        "NS" => expect_array(tag, inner)?
            .iter()
            .map(|v| expect_str(tag, v).and_then(parse_number))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Err(DynamoJsonError::UnknownTag(other.to_string())),
    }
}

fn decode_map(obj: &Map<String, Value>) -> Result<Map<String, Value>, DynamoJsonError> {
    obj.iter()
        .map(|(key, tagged)| decode_value(tagged).map(|v| (key.clone(), v)))
        .collect()
}

/// Decode a whole item (attribute name → tagged value) into a plain JSON object
pub fn decode_item(item: &Value) -> Result<Value, DynamoJsonError> {
    let obj = item
        .as_object()
        .ok_or_else(|| DynamoJsonError::NotAnItem(shape(item)))?;
    decode_map(obj).map(Value::Object)
}

/// Encode an SDK attribute value into its type-tagged JSON form
pub fn encode_value(value: &AttributeValue) -> Result<Value, DynamoJsonError> {
    let b64 = |bytes: &[u8]| base64::engine::general_purpose::STANDARD.encode(bytes);

    Ok(match value {
        AttributeValue::S(s) => json!({"S": s}),
        AttributeValue::N(n) => json!({"N": n}),
        AttributeValue::Bool(b) => json!({"BOOL": b}),
        AttributeValue::Null(_) => json!({"NULL": true}),
        AttributeValue::B(blob) => json!({"B": b64(blob.as_ref())}),
        AttributeValue::Ss(set) => json!({"SS": set}),
        AttributeValue::Ns(set) => json!({"NS": set}),
        AttributeValue::Bs(set) => {
            let encoded: Vec<String> = set.iter().map(|blob| b64(blob.as_ref())).collect();
            json!({"BS": encoded})
        }
        AttributeValue::L(list) => {
            let encoded = list.iter().map(encode_value).collect::<Result<Vec<_>, _>>()?;
            json!({"L": encoded})
        }
        AttributeValue::M(map) => json!({"M": encode_item(map)?}),
        other => return Err(DynamoJsonError::Unsupported(format!("{:?}", other))),
    })
}

/// Encode an SDK item into a type-tagged JSON object
pub fn encode_item(item: &HashMap<String, AttributeValue>) -> Result<Value, DynamoJsonError> {
    item.iter()
        .map(|(key, value)| encode_value(value).map(|v| (key.clone(), v)))
        .collect::<Result<Map<_, _>, _>>()
        .map(Value::Object)
}

/// Read the tagged items out of a table export (`{"Items": [...]}`)
pub struct DynamoExportReader {
    path: PathBuf,
}

impl DynamoExportReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read the raw (still tagged) items
    pub fn read(&self) -> Result<Vec<Value>> {
        let mut export: Value = super::read_json(&self.path)?;

        match export.get_mut("Items").map(Value::take) {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => eyre::bail!(
                "'Items' in {} is {}, expected an array",
                self.path.display(),
                shape(&other)
            ),
            None => eyre::bail!("Table export {} has no 'Items' array", self.path.display()),
        }
    }
}

impl Extractor for DynamoExportReader {
    type Item = Value;

    async fn extract(&self) -> Result<Vec<Self::Item>> {
        self.read()
    }
}

/// Write tagged items as a table export document
pub struct DynamoExportWriter {
    path: PathBuf,
}

impl DynamoExportWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Loader for DynamoExportWriter {
    type Item = Value;

    async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
        let count = items.len();
        let export = json!({
            "Items": items,
            "Count": count,
            "ScannedCount": count,
        });
        super::write_json(&self.path, &export)?;
        Ok(count)
    }
}

/// Transformer turning tagged items into plain JSON records
#[derive(Default)]
pub struct DynamoJsonDecoder;

impl DynamoJsonDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for DynamoJsonDecoder {
    type Input = Value;
    type Output = Value;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        decode_item(&input).with_context(|| "Failed to decode DynamoDB item")
    }
}
