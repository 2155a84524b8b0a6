pub mod errors;
pub mod types;

pub use errors::{MigrationError, Result, ResultExt};
pub use types::Content;
