pub mod connection;
pub mod documents;
pub mod resets;
pub mod users;

pub use connection::{init_db, Database};
pub use documents::SqliteDocumentStore;
