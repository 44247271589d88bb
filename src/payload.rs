//! Rule payload codec
//!
//! Turns the opaque payload of a [`Rule`](crate::rule::Rule) into typed
//! parameters, and a configured [`RuleLevel`] into an advice [`Status`].
//! Decoding is total-or-fail: missing fields, wrong types, unknown fields and
//! invalid patterns are configuration errors, never silently defaulted.

use crate::advice::Status;
use crate::error::AdvisorError;
use crate::rule::{PayloadKind, RuleLevel, RuleType};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Default maximum identifier length for naming rules
pub const DEFAULT_NAMING_MAX_LENGTH: i64 = 64;

/// `{"number": int}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NumberTypeRulePayload {
    pub number: i64,
}

/// `{"list": [string]}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StringArrayTypeRulePayload {
    pub list: Vec<String>,
}

/// `{"value": bool}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BooleanTypeRulePayload {
    pub value: bool,
}

/// `{"format": regex, "maxLength": int}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct NamingRulePayload {
    pub format: String,
    #[serde(default = "default_max_length")]
    pub max_length: i64,
}

fn default_max_length() -> i64 {
    DEFAULT_NAMING_MAX_LENGTH
}

/// Compiled naming convention
#[derive(Debug, Clone)]
pub struct NamingFormat {
    pub format: Regex,
    pub max_length: usize,
}

/// Decoded payload handed to advisors
#[derive(Debug, Clone, Default)]
pub enum RulePayload {
    #[default]
    None,
    Number(NumberTypeRulePayload),
    StringArray(StringArrayTypeRulePayload),
    Naming(NamingFormat),
}

impl RulePayload {
    /// Numeric threshold of a number payload
    pub fn number(&self) -> Result<i64, AdvisorError> {
        match self {
            RulePayload::Number(p) => Ok(p.number),
            other => Err(mismatch("number", other)),
        }
    }

    /// Entries of a string-array payload
    pub fn string_list(&self) -> Result<&[String], AdvisorError> {
        match self {
            RulePayload::StringArray(p) => Ok(&p.list),
            other => Err(mismatch("string array", other)),
        }
    }

    /// Compiled naming convention
    pub fn naming(&self) -> Result<&NamingFormat, AdvisorError> {
        match self {
            RulePayload::Naming(n) => Ok(n),
            other => Err(mismatch("naming", other)),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            RulePayload::None => "empty",
            RulePayload::Number(_) => "number",
            RulePayload::StringArray(_) => "string array",
            RulePayload::Naming(_) => "naming",
        }
    }
}

fn mismatch(expected: &str, actual: &RulePayload) -> AdvisorError {
    AdvisorError::config(format!(
        "expected {} payload, got {} payload",
        expected,
        actual.kind_name()
    ))
}

/// Map a configured rule level to an advice status
pub fn decode_level(level: RuleLevel) -> Result<Status, AdvisorError> {
    match level {
        RuleLevel::Error => Ok(Status::Error),
        RuleLevel::Warning => Ok(Status::Warning),
        RuleLevel::Info => Ok(Status::Success),
        RuleLevel::Disabled | RuleLevel::LevelUnspecified => Err(AdvisorError::config(format!(
            "rule level {} has no advice status",
            level
        ))),
    }
}

/// Decode `{"number": int}`
pub fn decode_number_payload(
    raw: &serde_json::Value,
) -> Result<NumberTypeRulePayload, AdvisorError> {
    decode(raw, "number")
}

/// Decode `{"list": [string]}`
pub fn decode_string_array_payload(
    raw: &serde_json::Value,
) -> Result<StringArrayTypeRulePayload, AdvisorError> {
    decode(raw, "string array")
}

/// Decode `{"value": bool}`
pub fn decode_boolean_payload(
    raw: &serde_json::Value,
) -> Result<BooleanTypeRulePayload, AdvisorError> {
    decode(raw, "boolean")
}

/// Decode `{"format": regex, "maxLength": int}` and compile the pattern
pub fn decode_naming_payload(raw: &serde_json::Value) -> Result<NamingFormat, AdvisorError> {
    let payload: NamingRulePayload = decode(raw, "naming")?;
    let format = Regex::new(&payload.format).map_err(|e| {
        AdvisorError::config(format!("invalid naming format {:?}: {}", payload.format, e))
    })?;
    let max_length = usize::try_from(payload.max_length).map_err(|_| {
        AdvisorError::config(format!(
            "naming maxLength must not be negative, got {}",
            payload.max_length
        ))
    })?;
    Ok(NamingFormat { format, max_length })
}

/// Decode the payload of a rule according to its rule type
pub fn decode_payload(
    rule_type: RuleType,
    raw: &serde_json::Value,
) -> Result<RulePayload, AdvisorError> {
    match rule_type.payload_kind() {
        PayloadKind::None => Ok(RulePayload::None),
        PayloadKind::Number => decode_number_payload(raw).map(RulePayload::Number),
        PayloadKind::StringArray => decode_string_array_payload(raw).map(RulePayload::StringArray),
        PayloadKind::Naming => decode_naming_payload(raw).map(RulePayload::Naming),
    }
}

fn decode<T: DeserializeOwned>(raw: &serde_json::Value, kind: &str) -> Result<T, AdvisorError> {
    let result = match raw {
        // Payloads stored as JSON text
        serde_json::Value::String(text) => serde_json::from_str(text),
        serde_json::Value::Null => {
            return Err(AdvisorError::config(format!("missing {} payload", kind)))
        }
        value => T::deserialize(value),
    };
    result.map_err(|e| AdvisorError::config(format!("failed to decode {} payload: {}", kind, e)))
}
