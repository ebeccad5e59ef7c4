use crate::transpiler::Dialect;
use crate::transpiler::traits::{DistinctFromStyle, SqlGenerator};

pub struct SqliteGenerator;

impl SqlGenerator for SqliteGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::SQLite
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn bool_literal(&self, val: bool) -> String {
        if val {
            "1".to_string()
        } else {
            "0".to_string()
        }
    }

    fn offset_only_limit(&self) -> Option<&'static str> {
        Some("-1")
    }

    fn supports_lock(&self) -> bool {
        false
    }

    fn supports_returning(&self) -> bool {
        true
    }

    fn wraps_compound_selects(&self) -> bool {
        false
    }

    fn distinct_from_style(&self) -> DistinctFromStyle {
        DistinctFromStyle::Is
    }
}
