//! Transpiler test modules.
//!
//! Tests are organized by category:
//! - `core`: SELECT, INSERT, UPDATE and DELETE through the managers
//! - `dialects`: quoting, paging and operator differences per dialect
//! - `features`: CTEs, compound queries, windows, binds and raw SQL

mod dialects;
mod features;
