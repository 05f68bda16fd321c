//! Browser storage adapters.

pub mod indexed_db;
