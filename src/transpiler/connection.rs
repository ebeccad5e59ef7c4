//! The connection collaborator: quoting and dialect lookup.

use crate::ast::Value;
use crate::config::ConnectionConfig;
use crate::transpiler::Dialect;
use crate::transpiler::traits::SqlGenerator;

/// What the visitor needs from a database connection.
///
/// Implement this to plug in a live adapter; [`DialectConnection`] covers the
/// offline case.
pub trait Connection: Send + Sync {
    fn dialect(&self) -> Dialect;

    fn generator(&self) -> &dyn SqlGenerator;

    /// Quote a value for inline use.
    fn quote(&self, value: &Value) -> String {
        self.generator().quote_value(value)
    }

    fn quote_table_name(&self, name: &str) -> String {
        self.generator().quote_table_name(name)
    }

    fn quote_column_name(&self, name: &str) -> String {
        self.generator().quote_identifier(name)
    }

    /// Whether binds stay out of line as placeholders.
    fn prepared_statements(&self) -> bool {
        true
    }
}

/// A connection that only knows its dialect.
pub struct DialectConnection {
    dialect: Dialect,
    generator: Box<dyn SqlGenerator>,
    prepared_statements: bool,
}

impl DialectConnection {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            generator: dialect.generator(),
            prepared_statements: true,
        }
    }

    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self::new(config.dialect).with_prepared_statements(config.prepared_statements)
    }

    pub fn with_prepared_statements(mut self, enabled: bool) -> Self {
        self.prepared_statements = enabled;
        self
    }
}

impl Default for DialectConnection {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

impl std::fmt::Debug for DialectConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialectConnection")
            .field("dialect", &self.dialect)
            .field("prepared_statements", &self.prepared_statements)
            .finish()
    }
}

impl Connection for DialectConnection {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn generator(&self) -> &dyn SqlGenerator {
        self.generator.as_ref()
    }

    fn prepared_statements(&self) -> bool {
        self.prepared_statements
    }
}
