// Service module exports

pub mod database;
pub mod settings;
pub mod store;
