//! Database layer: schema creation, migrations, and shared models

pub mod init;
pub mod migrations;
pub mod models;

pub use init::{init_database, init_memory_database};
pub use migrations::{get_schema_version, run_migrations, CURRENT_SCHEMA_VERSION};
pub use models::*;
