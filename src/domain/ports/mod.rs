mod image_fetch_port;
mod image_materializer_port;
mod node_filter_port;

pub use image_fetch_port::ImageFetchPort;
pub use image_materializer_port::ImageMaterializerPort;
pub use node_filter_port::NodeFilter;
