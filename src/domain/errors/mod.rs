//! Domain error types.

mod fetch_error;
mod materialize_error;

pub use fetch_error::FetchError;
pub use materialize_error::MaterializeError;
