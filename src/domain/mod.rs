//! Domain layer with the document model, errors and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{Document, Element, EmojiMap, NodeData, NodeId};
pub use errors::{FetchError, MaterializeError};
pub use ports::{ImageFetchPort, ImageMaterializerPort, NodeFilter};
