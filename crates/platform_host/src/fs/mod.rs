//! Hierarchical virtual file system persisted through a [`KeyValueStore`](crate::KeyValueStore).

pub mod error;
pub mod observable;
pub mod observer;
pub mod path;
pub mod service;
pub mod types;
