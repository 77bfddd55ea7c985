//! SQLite connection and schema management for the calendar store.

mod connection;
mod schema;

pub use connection::Database;
