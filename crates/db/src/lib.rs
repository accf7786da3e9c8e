pub mod connection;
pub mod migrations;
pub mod store;

pub use connection::{connect, DbPool};
pub use store::SqlCartStore;
