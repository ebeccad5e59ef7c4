use crate::transpiler::Dialect;
use crate::transpiler::traits::{DistinctFromStyle, SqlGenerator};

/// PostgreSQL Generator.
pub struct PostgresGenerator;

impl SqlGenerator for PostgresGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "TRUE".to_string() } else { "FALSE".to_string() }
    }

    fn supports_returning(&self) -> bool {
        true
    }

    fn supports_distinct_on(&self) -> bool {
        true
    }

    fn supports_grouping_sets(&self) -> bool {
        true
    }

    fn like_operator(&self, case_sensitive: bool) -> &'static str {
        if case_sensitive { "LIKE" } else { "ILIKE" }
    }

    fn regexp_operator(&self, case_sensitive: bool, negated: bool) -> Option<&'static str> {
        Some(match (case_sensitive, negated) {
            (true, false) => "~",
            (false, false) => "~*",
            (true, true) => "!~",
            (false, true) => "!~*",
        })
    }

    fn distinct_from_style(&self) -> DistinctFromStyle {
        DistinctFromStyle::Infix
    }
}
