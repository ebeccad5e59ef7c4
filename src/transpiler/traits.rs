//! Dialect hooks consulted by the visitor.

use crate::ast::Value;
use crate::transpiler::Dialect;

/// Where LIMIT and OFFSET go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paging {
    /// `LIMIT n OFFSET m`
    LimitOffset,
    /// `OFFSET m ROWS FETCH FIRST n ROWS ONLY`
    OffsetFetch,
}

/// How IS [NOT] DISTINCT FROM is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistinctFromStyle {
    /// `a IS DISTINCT FROM b`
    Infix,
    /// `a <=> b`
    NullSafeEquals,
    /// `a IS NOT b`
    Is,
    /// `DECODE(a, b, 0, 1) = 1`
    Decode,
    /// `CASE WHEN a = b OR (a IS NULL AND b IS NULL) THEN 0 ELSE 1 END = 1`
    CaseWhen,
}

/// How string concatenation is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcatStyle {
    /// `a || b`
    Operator,
    /// `CONCAT(a, b)`
    Function,
}

/// Quote an identifier with `quote`, doubling embedded quote characters.
pub fn quote_with(name: &str, quote: char) -> String {
    let mut doubled = String::with_capacity(2);
    doubled.push(quote);
    doubled.push(quote);
    format!("{q}{}{q}", name.replace(quote, &doubled), q = quote)
}

/// Trait for dialect-specific SQL generation.
pub trait SqlGenerator: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Quote an identifier (column name).
    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '"')
    }

    /// Quote a table name; `schema.table` is quoted part by part.
    fn quote_table_name(&self, name: &str) -> String {
        name.split('.')
            .map(|part| self.quote_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quote a string literal.
    fn quote_string(&self, s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }

    /// Generate the parameter placeholder (e.g., $1, ?, :1) for a given index.
    fn placeholder(&self, index: usize) -> String;

    /// Get the boolean literal (TRUE/FALSE vs 1/0).
    fn bool_literal(&self, val: bool) -> String;

    /// Rendering of the `True`/`False` predicate nodes.
    fn bool_predicate(&self, val: bool) -> &'static str {
        if val { "TRUE" } else { "FALSE" }
    }

    /// Quote a value for inline use. The only place literals enter the SQL text.
    fn quote_value(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => self.bool_literal(*b),
            Value::Int(n) => n.to_string(),
            Value::Float(f) if f.is_nan() => self.quote_string("NaN"),
            Value::Float(f) if f.is_infinite() => {
                self.quote_string(if *f > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Value::Float(f) => format!("{:?}", f),
            Value::Decimal(d) => d.to_string(),
            Value::String(s) => self.quote_string(s),
            Value::Date(_) | Value::Time(_) | Value::DateTime(_) => {
                self.quote_string(&value.to_string())
            }
            Value::Json(j) => self.quote_string(&j.to_string()),
        }
    }

    fn paging(&self) -> Paging {
        Paging::LimitOffset
    }

    /// LIMIT rendered when only an OFFSET was given, for engines that need one.
    fn offset_only_limit(&self) -> Option<&'static str> {
        None
    }

    fn supports_lock(&self) -> bool {
        true
    }

    fn supports_returning(&self) -> bool {
        false
    }

    fn supports_distinct_on(&self) -> bool {
        false
    }

    fn supports_grouping_sets(&self) -> bool {
        false
    }

    /// Whether `NULLS FIRST`/`NULLS LAST` exist; otherwise emulated.
    fn native_nulls_ordering(&self) -> bool {
        true
    }

    /// Whether SELECTs inside UNION/INTERSECT/EXCEPT get parentheses.
    fn wraps_compound_selects(&self) -> bool {
        true
    }

    /// Pattern match operator.
    fn like_operator(&self, _case_sensitive: bool) -> &'static str {
        "LIKE"
    }

    /// Case-insensitive matches wrap both sides in `LOWER()`.
    fn lowers_case_insensitive_match(&self) -> bool {
        false
    }

    /// Regular expression operator, `None` when unsupported.
    fn regexp_operator(&self, _case_sensitive: bool, _negated: bool) -> Option<&'static str> {
        None
    }

    fn distinct_from_style(&self) -> DistinctFromStyle {
        DistinctFromStyle::CaseWhen
    }

    fn concat_style(&self) -> ConcatStyle {
        ConcatStyle::Operator
    }

    /// UPDATE/DELETE keep ORDER BY and LIMIT inline unless a subselect is unavoidable.
    fn inline_mutation_clauses(&self) -> bool {
        false
    }

    /// Keyword before each row of a VALUES table.
    fn values_row_prefix(&self) -> &'static str {
        ""
    }
}
