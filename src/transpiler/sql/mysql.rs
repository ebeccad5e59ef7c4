use crate::transpiler::Dialect;
use crate::transpiler::traits::{ConcatStyle, DistinctFromStyle, SqlGenerator, quote_with};

/// MySQL Generator.
pub struct MysqlGenerator;

impl SqlGenerator for MysqlGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::MySQL
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_with(name, '`')
    }

    fn quote_string(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('\'');
        for c in s.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                '\0' => out.push_str("\\0"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\x1a' => out.push_str("\\Z"),
                c => out.push(c),
            }
        }
        out.push('\'');
        out
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn offset_only_limit(&self) -> Option<&'static str> {
        // Largest unsigned BIGINT: MySQL has no OFFSET without LIMIT
        Some("18446744073709551615")
    }

    fn native_nulls_ordering(&self) -> bool {
        false
    }

    fn like_operator(&self, case_sensitive: bool) -> &'static str {
        if case_sensitive { "LIKE BINARY" } else { "LIKE" }
    }

    fn regexp_operator(&self, _case_sensitive: bool, negated: bool) -> Option<&'static str> {
        Some(if negated { "NOT REGEXP" } else { "REGEXP" })
    }

    fn distinct_from_style(&self) -> DistinctFromStyle {
        DistinctFromStyle::NullSafeEquals
    }

    fn concat_style(&self) -> ConcatStyle {
        ConcatStyle::Function
    }

    fn inline_mutation_clauses(&self) -> bool {
        true
    }

    fn values_row_prefix(&self) -> &'static str {
        "ROW"
    }
}
