//! Dialect generators.

pub mod generic;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod sqlite;
