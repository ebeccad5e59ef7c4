//! DML (Data Manipulation Language) SQL generation.
//!
//! Statement level rendering for SELECT, INSERT, UPDATE and DELETE, written as
//! `impl Visitor` blocks so the node visitor stays one exhaustive match.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;
