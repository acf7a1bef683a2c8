//! SQLite layer behind [`crate::store::sqlite::SqliteStore`].
//!
//! ```no_run
//! use gitbrowser_core::database::Database;
//!
//! let db = Database::open("gitbrowser-core.db").expect("failed to open database");
//! let rows: i64 = db
//!     .connection()
//!     .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
//!     .expect("kv_store exists after migrations");
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
