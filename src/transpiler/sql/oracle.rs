use crate::ast::Value;
use crate::transpiler::Dialect;
use crate::transpiler::traits::{DistinctFromStyle, Paging, SqlGenerator};

pub struct OracleGenerator;

impl SqlGenerator for OracleGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    fn placeholder(&self, index: usize) -> String {
        // Oracle uses :1, :2, etc. (1-based index)
        format!(":{}", index)
    }

    fn bool_literal(&self, val: bool) -> String {
        // No BOOLEAN type in Oracle SQL
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn bool_predicate(&self, val: bool) -> &'static str {
        if val { "1=1" } else { "1=0" }
    }

    fn quote_value(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => self.bool_literal(*b),
            Value::Date(_) => format!("DATE {}", self.quote_string(&value.to_string())),
            Value::DateTime(_) => format!("TIMESTAMP {}", self.quote_string(&value.to_string())),
            Value::String(s) => self.quote_string(s),
            Value::Json(j) => self.quote_string(&j.to_string()),
            Value::Int(n) => n.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Float(f) if f.is_finite() => format!("{:?}", f),
            Value::Float(f) if f.is_nan() => "BINARY_DOUBLE_NAN".to_string(),
            Value::Float(f) if *f > 0.0 => "BINARY_DOUBLE_INFINITY".to_string(),
            Value::Float(_) => "-BINARY_DOUBLE_INFINITY".to_string(),
            Value::Time(_) => self.quote_string(&value.to_string()),
        }
    }

    fn paging(&self) -> Paging {
        Paging::OffsetFetch
    }

    fn lowers_case_insensitive_match(&self) -> bool {
        true
    }

    fn distinct_from_style(&self) -> DistinctFromStyle {
        DistinctFromStyle::Decode
    }
}
