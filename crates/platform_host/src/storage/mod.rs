//! Persistence contracts and adapters.

pub mod kv;
