pub mod connection;
mod matches;
pub mod setup;
mod store;
mod teams;
mod tournaments;

pub use connection::{DbConn, DbPool, create_pool, get_connection};
pub use store::SqliteStore;
