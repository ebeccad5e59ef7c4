//! Output sinks for the visitor.
//!
//! A collector receives SQL fragments in order plus every bind value. What it
//! does with a bind decides whether the result is a prepared statement or a
//! fully inlined string.

use crate::ast::Value;
use crate::transpiler::connection::Connection;

pub trait Collector {
    fn push(&mut self, sql: &str);

    fn add_bind(&mut self, value: &Value, conn: &dyn Connection);
}

/// SQL text with dialect placeholders for binds.
#[derive(Debug, Default)]
pub struct SqlString {
    sql: String,
    bind_index: usize,
}

impl SqlString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.sql
    }

    pub fn into_string(self) -> String {
        self.sql
    }
}

impl Collector for SqlString {
    fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    fn add_bind(&mut self, _value: &Value, conn: &dyn Connection) {
        self.bind_index += 1;
        let placeholder = conn.generator().placeholder(self.bind_index);
        self.sql.push_str(&placeholder);
    }
}

/// Placeholders in the text, values kept alongside.
#[derive(Debug, Default)]
pub struct BindCollector {
    sql: SqlString,
    binds: Vec<Value>,
}

impl BindCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binds(&self) -> &[Value] {
        &self.binds
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql.into_string(), self.binds)
    }
}

impl Collector for BindCollector {
    fn push(&mut self, sql: &str) {
        self.sql.push(sql);
    }

    fn add_bind(&mut self, value: &Value, conn: &dyn Connection) {
        self.binds.push(value.clone());
        self.sql.add_bind(value, conn);
    }
}

/// Binds quoted inline.
#[derive(Debug, Default)]
pub struct SubstituteBinds {
    sql: String,
}

impl SubstituteBinds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_string(self) -> String {
        self.sql
    }
}

impl Collector for SubstituteBinds {
    fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    fn add_bind(&mut self, value: &Value, conn: &dyn Connection) {
        let quoted = conn.quote(value);
        self.sql.push_str(&quoted);
    }
}
