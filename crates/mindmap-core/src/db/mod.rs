//! Database layer for persisted preferences

mod connection;
mod migrations;

pub use connection::Database;
