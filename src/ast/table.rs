//! Relations and the attributes bound to them.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::builders::build_quoted;
use crate::ast::{Node, Operand, Value};
use crate::types::{ColumnType, TypeCaster};

/// A named relation.
///
/// Equality compares name and alias; the hash covers the name only.
#[derive(Clone, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub table_alias: Option<String>,
    #[serde(skip)]
    type_caster: Option<Arc<dyn TypeCaster>>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_alias: None,
            type_caster: None,
        }
    }

    /// Render as `"name" "alias"`. An alias equal to the name is dropped.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        self.table_alias = (alias != self.name).then_some(alias);
        self
    }

    pub fn with_type_caster(mut self, caster: Arc<dyn TypeCaster>) -> Self {
        self.type_caster = Some(caster);
        self
    }

    /// Attribute `name` of this table, resolving attribute aliases first.
    pub fn attr(&self, name: &str) -> Attribute {
        let name = self
            .type_caster
            .as_ref()
            .and_then(|caster| caster.column_alias(name))
            .unwrap_or_else(|| name.to_string());
        let kind = self
            .type_for_attribute(&name)
            .map_or(AttributeKind::Undefined, |t| AttributeKind::for_column(&t));
        Attribute {
            relation: Box::new(Node::Table(self.clone())),
            name,
            kind,
        }
    }

    /// `"name" "name_2"`, the conventional self-join alias.
    pub fn alias(&self) -> TableAlias {
        self.alias_named(format!("{}_2", self.name))
    }

    pub fn alias_named(&self, name: impl Into<String>) -> TableAlias {
        TableAlias::new(Node::Table(self.clone()), name)
    }

    pub fn type_caster(&self) -> Option<&Arc<dyn TypeCaster>> {
        self.type_caster.as_ref()
    }

    pub fn able_to_type_cast(&self) -> bool {
        self.type_caster.is_some()
    }

    pub fn type_for_attribute(&self, name: &str) -> Option<ColumnType> {
        self.type_caster.as_ref()?.type_for_attribute(name)
    }

    pub fn type_cast_for_database(&self, name: &str, value: &Value) -> Value {
        match &self.type_caster {
            Some(caster) => caster.type_cast_for_database(name, value),
            None => value.clone(),
        }
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("table_alias", &self.table_alias)
            .field("type_caster", &self.type_caster.is_some())
            .finish()
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.table_alias == other.table_alias
    }
}

impl Eq for Table {}

impl Hash for Table {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Alias left out so self-joined parents keep a stable hash
        self.name.hash(state);
    }
}

/// `relation "name"`: an aliased table or derived table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableAlias {
    pub relation: Box<Node>,
    pub name: String,
}

impl TableAlias {
    pub fn new(relation: impl Into<Node>, name: impl Into<String>) -> Self {
        Self {
            relation: Box::new(relation.into()),
            name: name.into(),
        }
    }

    /// Attribute `name` of the alias. Attribute aliases of an underlying
    /// table resolve the same way as on the table.
    pub fn attr(&self, name: &str) -> Attribute {
        let name = match self.relation.as_ref() {
            Node::Table(table) => table.type_caster().and_then(|caster| caster.column_alias(name)),
            _ => None,
        }
        .unwrap_or_else(|| name.to_string());
        let kind = self
            .type_for_attribute(&name)
            .map_or(AttributeKind::Undefined, |t| AttributeKind::for_column(&t));
        Attribute {
            relation: Box::new(Node::TableAlias(self.clone())),
            name,
            kind,
        }
    }

    /// Name of the underlying table, or the alias for derived tables.
    pub fn table_name(&self) -> &str {
        match self.relation.as_ref() {
            Node::Table(table) => &table.name,
            _ => &self.name,
        }
    }

    pub fn able_to_type_cast(&self) -> bool {
        matches!(self.relation.as_ref(), Node::Table(t) if t.able_to_type_cast())
    }

    pub fn type_for_attribute(&self, name: &str) -> Option<ColumnType> {
        match self.relation.as_ref() {
            Node::Table(table) => table.type_for_attribute(name),
            _ => None,
        }
    }
}

/// An inline `VALUES` relation: `(VALUES (..), (..)) "name" ("a", "b")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValuesTable {
    pub rows: Vec<Vec<Node>>,
    pub name: String,
    pub columns: Vec<String>,
}

impl ValuesTable {
    pub fn new<R, V>(name: impl Into<String>, rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = V>,
        V: Into<Operand>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|v| build_quoted(v, None)).collect())
            .collect();
        Self {
            rows,
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn attr(&self, name: &str) -> Attribute {
        Attribute {
            relation: Box::new(Node::ValuesTable(Box::new(self.clone()))),
            name: name.to_string(),
            kind: AttributeKind::Undefined,
        }
    }
}

/// Attribute flavour chosen from the column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AttributeKind {
    String,
    Integer,
    Float,
    Decimal,
    Time,
    Boolean,
    #[default]
    Undefined,
}

impl AttributeKind {
    pub fn for_column(column_type: &ColumnType) -> Self {
        match column_type {
            ColumnType::String | ColumnType::Text => AttributeKind::String,
            ColumnType::Integer { .. } => AttributeKind::Integer,
            ColumnType::Float => AttributeKind::Float,
            ColumnType::Decimal { .. } => AttributeKind::Decimal,
            ColumnType::Date | ColumnType::Time | ColumnType::DateTime => AttributeKind::Time,
            ColumnType::Boolean => AttributeKind::Boolean,
            ColumnType::Json | ColumnType::Undefined => AttributeKind::Undefined,
        }
    }
}

/// A column of a specific relation instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub relation: Box<Node>,
    pub name: String,
    pub kind: AttributeKind,
}

impl Attribute {
    pub fn new(relation: impl Into<Node>, name: impl Into<String>) -> Self {
        Self {
            relation: Box::new(relation.into()),
            name: name.into(),
            kind: AttributeKind::Undefined,
        }
    }

    /// Table name or alias used to qualify the column, if any.
    pub fn qualifier(&self) -> Option<&str> {
        match self.relation.as_ref() {
            Node::Table(table) => Some(table.table_alias.as_deref().unwrap_or(&table.name)),
            Node::TableAlias(alias) => Some(&alias.name),
            Node::ValuesTable(values) => Some(&values.name),
            _ => None,
        }
    }

    pub fn column_type(&self) -> Option<ColumnType> {
        match self.relation.as_ref() {
            Node::Table(table) => table.type_for_attribute(&self.name),
            Node::TableAlias(alias) => alias.type_for_attribute(&self.name),
            _ => None,
        }
    }

    pub fn able_to_type_cast(&self) -> bool {
        match self.relation.as_ref() {
            Node::Table(table) => table.able_to_type_cast(),
            Node::TableAlias(alias) => alias.able_to_type_cast(),
            _ => false,
        }
    }

    pub fn type_cast_for_database(&self, value: &Value) -> Value {
        match self.column_type() {
            Some(column_type) => column_type.cast(value),
            None => value.clone(),
        }
    }

    /// `LOWER(attr)`
    pub fn lower(&self) -> Node {
        crate::ast::builders::named_function("LOWER", [Node::Attribute(self.clone())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transpiler::ToSql;
    use crate::types::SchemaTypeCaster;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_table_equality_includes_alias() {
        let a = Table::new("users");
        let b = Table::new("users").with_alias("u");
        assert_ne!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_eq!(a, Table::new("users"));
    }

    #[test]
    fn test_alias_equal_to_name_is_dropped() {
        assert_eq!(Table::new("users").with_alias("users").table_alias, None);
    }

    #[test]
    fn test_default_alias_name() {
        let alias = Table::new("users").alias();
        assert_eq!(alias.name, "users_2");
        assert_eq!(alias.table_name(), "users");
        assert_eq!(alias.attr("id").qualifier(), Some("users_2"));
    }

    #[test]
    fn test_attribute_kind_from_type_caster() {
        let caster = SchemaTypeCaster::new()
            .column("id", ColumnType::integer())
            .column("name", ColumnType::String)
            .alias_attribute("login", "name");
        let users = Table::new("users").with_type_caster(Arc::new(caster));
        assert_eq!(users.attr("id").kind, AttributeKind::Integer);
        assert_eq!(users.attr("other").kind, AttributeKind::Undefined);

        let login = users.attr("login");
        assert_eq!(login.name, "name");
        assert_eq!(login.kind, AttributeKind::String);
        assert!(login.able_to_type_cast());
        assert_eq!(users.alias().attr("id").kind, AttributeKind::Integer);
    }

    #[test]
    fn test_alias_resolves_attribute_aliases() {
        let caster = SchemaTypeCaster::new()
            .column("name", ColumnType::String)
            .alias_attribute("login", "name");
        let users = Table::new("users").with_type_caster(Arc::new(caster));
        let login = users.alias().attr("login");
        assert_eq!(login.name, "name");
        assert_eq!(login.kind, AttributeKind::String);
        assert_eq!(
            login.eq("x").to_sql().unwrap(),
            r#""users_2"."name" = 'x'"#
        );
    }

    #[test]
    fn test_attribute_equality_is_per_relation() {
        let users = Table::new("users");
        assert_eq!(users.attr("id"), users.attr("id"));
        assert_ne!(users.attr("id"), users.alias().attr("id"));
    }
}
