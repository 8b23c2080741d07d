//! Image handling infrastructure.
//!
//! This module provides:
//! - Source fetching from files, URLs and inline data URIs
//! - Rasterisation of fetched images into PNG data URIs

pub mod fetcher;
pub mod materializer;

pub use fetcher::{FetcherConfig, SourceFetcher, decode_data_uri};
pub use materializer::{EMPTY_SURFACE_URI, RasterMaterializer, rasterize};
