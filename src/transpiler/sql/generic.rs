use crate::transpiler::Dialect;
use crate::transpiler::traits::SqlGenerator;

/// Baseline generator: double-quoted identifiers, `?` binds, LIMIT/OFFSET.
pub struct GenericGenerator;

impl SqlGenerator for GenericGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Generic
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "TRUE".to_string() } else { "FALSE".to_string() }
    }
}
