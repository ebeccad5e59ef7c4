use std::hash::{Hash, Hasher};
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ast::{Attribute, Node, SqlLiteral, Table, TableAlias};

/// A primitive value that must be quoted before it reaches SQL text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    /// JSON document, quoted as its text form
    Json(serde_json::Value),
}

/// Direction of an infinite or unboundable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Positive,
    Negative,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The sign of an infinite float, `None` for every finite value.
    pub fn infinity(&self) -> Option<Sign> {
        match self {
            Value::Float(f) if f.is_infinite() => Some(if *f > 0.0 {
                Sign::Positive
            } else {
                Sign::Negative
            }),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Json(a), Value::Json(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Decimal(d) => d.hash(state),
            Value::String(s) => s.hash(state),
            Value::Date(d) => d.hash(state),
            Value::Time(t) => t.hash(state),
            Value::DateTime(dt) => dt.hash(state),
            Value::Json(j) => j.to_string().hash(state),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{:?}", n),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.f")),
            Value::Json(j) => write!(f, "{}", j),
        }
    }
}

macro_rules! value_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    Decimal => Decimal,
    String => String,
    &str => String,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    serde_json::Value => Json,
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => Value::Int(n),
            Err(_) => Value::Decimal(Decimal::from(n)),
        }
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt.naive_utc())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// Anything that can stand on the right-hand side of a predicate.
///
/// Plain values are quoted (and type cast when the left side is an
/// attribute); nodes pass through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    Node(Node),
}

macro_rules! operand_from_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Operand {
                fn from(v: $t) -> Self {
                    Operand::Value(v.into())
                }
            }
        )*
    };
}

operand_from_value!(
    Value,
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    Decimal,
    String,
    &String,
    &str,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    DateTime<Utc>,
    serde_json::Value,
);

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(opt: Option<T>) -> Self {
        Operand::Value(opt.into())
    }
}

impl From<Node> for Operand {
    fn from(node: Node) -> Self {
        Operand::Node(node)
    }
}

impl From<Attribute> for Operand {
    fn from(attr: Attribute) -> Self {
        Operand::Node(Node::Attribute(attr))
    }
}

impl From<&Attribute> for Operand {
    fn from(attr: &Attribute) -> Self {
        Operand::Node(Node::Attribute(attr.clone()))
    }
}

impl From<SqlLiteral> for Operand {
    fn from(lit: SqlLiteral) -> Self {
        Operand::Node(Node::SqlLiteral(lit))
    }
}

impl From<Table> for Operand {
    fn from(table: Table) -> Self {
        Operand::Node(Node::Table(table))
    }
}

impl From<TableAlias> for Operand {
    fn from(alias: TableAlias) -> Self {
        Operand::Node(Node::TableAlias(alias))
    }
}

/// A range of values with optionally open ends.
///
/// A `Value::Null` bound is open-ended, and so is an infinite float.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SqlRange {
    pub begin: Value,
    pub end: Value,
    pub exclude_end: bool,
}

impl SqlRange {
    pub fn new(begin: impl Into<Value>, end: impl Into<Value>, exclude_end: bool) -> Self {
        Self {
            begin: begin.into(),
            end: end.into(),
            exclude_end,
        }
    }

    /// `begin..=end`
    pub fn inclusive(begin: impl Into<Value>, end: impl Into<Value>) -> Self {
        Self::new(begin, end, false)
    }

    /// `begin..end`
    pub fn exclusive(begin: impl Into<Value>, end: impl Into<Value>) -> Self {
        Self::new(begin, end, true)
    }
}

impl<T: Into<Value>> From<Range<T>> for SqlRange {
    fn from(r: Range<T>) -> Self {
        Self::exclusive(r.start, r.end)
    }
}

impl<T: Into<Value>> From<RangeInclusive<T>> for SqlRange {
    fn from(r: RangeInclusive<T>) -> Self {
        let (begin, end) = r.into_inner();
        Self::inclusive(begin, end)
    }
}

impl<T: Into<Value>> From<RangeFrom<T>> for SqlRange {
    fn from(r: RangeFrom<T>) -> Self {
        Self::inclusive(r.start, Value::Null)
    }
}

impl<T: Into<Value>> From<RangeTo<T>> for SqlRange {
    fn from(r: RangeTo<T>) -> Self {
        Self::exclusive(Value::Null, r.end)
    }
}

impl<T: Into<Value>> From<RangeToInclusive<T>> for SqlRange {
    fn from(r: RangeToInclusive<T>) -> Self {
        Self::inclusive(Value::Null, r.end)
    }
}

impl From<RangeFull> for SqlRange {
    fn from(_: RangeFull) -> Self {
        Self::inclusive(Value::Null, Value::Null)
    }
}
