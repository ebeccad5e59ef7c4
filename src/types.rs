//! Column types and the type caster collaborator.
//!
//! A [`TypeCaster`] answers "what type is column `x` of this table?". The answer
//! picks the attribute kind, formats literals for the database, and decides
//! whether a value can be bound to the column at all.

use std::collections::HashMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

use crate::ast::{Sign, Value};
use crate::error::{ArelError, ArelResult};
use crate::transpiler::Dialect;

/// Default integer width in bytes.
const DEFAULT_INTEGER_LIMIT: u8 = 4;

/// Database column type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    String,
    Text,
    /// Integer of `limit` bytes (4 when unset)
    Integer { limit: Option<u8> },
    Float,
    /// Decimal rounded to `scale` places
    Decimal { scale: Option<u32> },
    Date,
    Time,
    DateTime,
    Boolean,
    Json,
    Undefined,
}

impl ColumnType {
    pub fn integer() -> Self {
        ColumnType::Integer { limit: None }
    }

    /// Convert a value into the form the database expects for this column.
    pub fn cast(&self, value: &Value) -> Value {
        if value.is_null() {
            return Value::Null;
        }
        match self {
            ColumnType::String | ColumnType::Text => match value {
                Value::Bool(true) => Value::String("t".to_string()),
                Value::Bool(false) => Value::String("f".to_string()),
                Value::String(_) => value.clone(),
                other => Value::String(other.to_string()),
            },
            ColumnType::Integer { .. } => cast_integer(value),
            ColumnType::Float => match value {
                Value::Int(n) => Value::Float(*n as f64),
                Value::Decimal(d) => d.to_f64().map_or(Value::Null, Value::Float),
                Value::Bool(b) => Value::Float(if *b { 1.0 } else { 0.0 }),
                Value::String(s) => s.trim().parse::<f64>().map_or(Value::Null, Value::Float),
                other => other.clone(),
            },
            ColumnType::Decimal { scale } => {
                let decimal = match value {
                    Value::Int(n) => Some(Decimal::from(*n)),
                    Value::Float(f) => Decimal::from_f64(*f),
                    Value::Decimal(d) => Some(*d),
                    Value::String(s) => s.trim().parse::<Decimal>().ok(),
                    Value::Bool(b) => Some(Decimal::from(*b as i64)),
                    _ => None,
                };
                match (decimal, scale) {
                    (Some(d), Some(scale)) => Value::Decimal(d.round_dp(*scale)),
                    (Some(d), None) => Value::Decimal(d),
                    (None, _) => match value {
                        Value::Float(_) => value.clone(),
                        _ => Value::Null,
                    },
                }
            }
            ColumnType::Boolean => match value {
                Value::Bool(_) => value.clone(),
                Value::Int(n) => Value::Bool(*n != 0),
                Value::String(s) => cast_boolean(s),
                other => other.clone(),
            },
            ColumnType::Date => match value {
                Value::DateTime(dt) => Value::Date(dt.date()),
                Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .map_or(Value::Null, Value::Date),
                other => other.clone(),
            },
            ColumnType::DateTime => match value {
                Value::Date(d) => d.and_hms_opt(0, 0, 0).map_or(Value::Null, Value::DateTime),
                Value::String(s) => parse_datetime(s.trim()).map_or(Value::Null, Value::DateTime),
                other => other.clone(),
            },
            ColumnType::Time => match value {
                Value::DateTime(dt) => Value::Time(dt.time()),
                Value::String(s) => parse_time(s.trim()).map_or(Value::Null, Value::Time),
                other => other.clone(),
            },
            ColumnType::Json => match value {
                Value::Json(j) => Value::String(j.to_string()),
                Value::String(s) => Value::String(serde_json::Value::String(s.clone()).to_string()),
                Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Decimal(_) => {
                    Value::String(value.to_string())
                }
                other => Value::String(serde_json::Value::String(other.to_string()).to_string()),
            },
            ColumnType::Undefined => value.clone(),
        }
    }

    /// The direction in which `value` overflows this column, if it does.
    pub fn unboundable(&self, value: &Value) -> Option<Sign> {
        let ColumnType::Integer { limit } = self else {
            return None;
        };
        let bits = u32::from(limit.unwrap_or(DEFAULT_INTEGER_LIMIT)).clamp(1, 8) * 8;
        let max = 1u64 << (bits - 1);
        match self.cast(value) {
            Value::Int(n) if i128::from(n) >= i128::from(max) => Some(Sign::Positive),
            Value::Int(n) if i128::from(n) < -i128::from(max) => Some(Sign::Negative),
            Value::Int(_) => None,
            Value::Decimal(d) if d >= Decimal::from(max) => Some(Sign::Positive),
            Value::Decimal(d) if d < -Decimal::from(max) => Some(Sign::Negative),
            _ => None,
        }
    }
}

fn cast_integer(value: &Value) -> Value {
    match value {
        Value::Int(_) => value.clone(),
        Value::Bool(b) => Value::Int(*b as i64),
        Value::Float(f) if f.is_finite() => Value::Int(f.trunc() as i64),
        Value::Decimal(d) => d.trunc().to_i64().map_or(Value::Decimal(d.trunc()), Value::Int),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<i64>() {
                Value::Int(n)
            } else if let Ok(d) = s.parse::<Decimal>() {
                cast_integer(&Value::Decimal(d))
            } else {
                Value::Null
            }
        }
        other => other.clone(),
    }
}

fn cast_boolean(s: &str) -> Value {
    match s.trim().to_ascii_lowercase().as_str() {
        "" => Value::Null,
        "f" | "false" | "0" | "off" | "no" | "n" => Value::Bool(false),
        _ => Value::Bool(true),
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// Resolves column types for a relation.
pub trait TypeCaster: Send + Sync + fmt::Debug {
    /// Column type of `name`, `None` when the column is unknown.
    fn type_for_attribute(&self, name: &str) -> Option<ColumnType>;

    fn type_cast_for_database(&self, name: &str, value: &Value) -> Value {
        match self.type_for_attribute(name) {
            Some(column_type) => column_type.cast(value),
            None => value.clone(),
        }
    }

    /// Real column name behind an attribute alias.
    fn column_alias(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Type caster backed by a static column map.
#[derive(Debug, Clone, Default)]
pub struct SchemaTypeCaster {
    columns: HashMap<String, ColumnType>,
    aliases: HashMap<String, String>,
}

impl SchemaTypeCaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.columns.insert(name.into(), column_type);
        self
    }

    pub fn alias_attribute(mut self, alias: impl Into<String>, column: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), column.into());
        self
    }
}

impl TypeCaster for SchemaTypeCaster {
    fn type_for_attribute(&self, name: &str) -> Option<ColumnType> {
        self.columns.get(name).cloned()
    }

    fn column_alias(&self, name: &str) -> Option<String> {
        self.aliases.get(name).cloned()
    }
}

#[derive(Debug, Clone)]
struct Registration {
    name: String,
    column_type: ColumnType,
    adapter: Option<Dialect>,
    override_: Option<bool>,
}

impl Registration {
    fn matches(&self, name: &str, adapter: Option<Dialect>) -> bool {
        self.name == name && (self.adapter.is_none() || self.adapter == adapter)
    }

    fn priority(&self) -> u8 {
        let mut priority = match self.override_ {
            Some(true) => 4,
            _ => 0,
        };
        if self.adapter.is_some() {
            priority |= 1;
        }
        priority
    }

    fn priority_except_adapter(&self) -> u8 {
        self.priority() & 0b110
    }

    fn conflicts_with(&self, other: &Registration) -> bool {
        if self.name != other.name || self.priority_except_adapter() != other.priority_except_adapter() {
            return false;
        }
        if self.adapter == other.adapter {
            return true;
        }
        (self.override_.is_none() && other.adapter.is_some())
            || (self.adapter.is_some() && other.override_.is_none())
    }
}

/// Named column types, optionally scoped to one adapter.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    registrations: Vec<Registration>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`.
    ///
    /// `override_` follows three states: `Some(true)` wins over every other
    /// registration, `Some(false)` yields to adapter-specific ones, and `None`
    /// conflicts with any registration for the same name at the same priority.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        column_type: ColumnType,
        adapter: Option<Dialect>,
        override_: Option<bool>,
    ) -> ArelResult<()> {
        let registration = Registration {
            name: name.into(),
            column_type,
            adapter,
            override_,
        };
        if let Some(existing) = self
            .registrations
            .iter()
            .find(|r| r.conflicts_with(&registration) || registration.conflicts_with(r))
        {
            let adapter = registration
                .adapter
                .or(existing.adapter)
                .map_or_else(|| "all adapters".to_string(), |a| format!("{:?}", a));
            return Err(ArelError::TypeConflict {
                name: registration.name,
                adapter,
            });
        }
        self.registrations.push(registration);
        Ok(())
    }

    /// Highest priority registration of `name` visible to `adapter`.
    pub fn lookup(&self, name: &str, adapter: Option<Dialect>) -> Option<&ColumnType> {
        self.registrations
            .iter()
            .filter(|r| r.matches(name, adapter))
            .max_by_key(|r| r.priority())
            .map(|r| &r.column_type)
    }
}
