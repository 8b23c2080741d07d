//! Renders image sources into self-contained PNG data URIs.

use std::io::Cursor;
use std::sync::Arc;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use image::{DynamicImage, GenericImage, ImageFormat, RgbaImage};
use tracing::{debug, warn};

use crate::domain::errors::MaterializeError;
use crate::domain::ports::{ImageFetchPort, ImageMaterializerPort};

/// Data URI produced for a surface with no pixels.
pub const EMPTY_SURFACE_URI: &str = "data:,";

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Materializes images by decoding them and re-encoding as PNG.
///
/// The result never references the original source, so it can be shown in
/// a context that blocks all further fetches.
pub struct RasterMaterializer {
    fetcher: Arc<dyn ImageFetchPort>,
}

impl std::fmt::Debug for RasterMaterializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterMaterializer").finish_non_exhaustive()
    }
}

impl RasterMaterializer {
    /// Creates a materializer reading sources through `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn ImageFetchPort>) -> Self {
        Self { fetcher }
    }

    /// Fetches, decodes and renders one source.
    ///
    /// # Errors
    /// Returns error if the source cannot be fetched, decoded or encoded.
    pub async fn render(&self, source: &str) -> Result<String, MaterializeError> {
        let bytes = self.fetcher.fetch(source).await?;

        tokio::task::spawn_blocking(move || rasterize(&bytes))
            .await
            .map_err(|e| MaterializeError::Task(format!("Render task panicked: {e}")))?
    }
}

#[async_trait::async_trait]
impl ImageMaterializerPort for RasterMaterializer {
    async fn materialize(&self, source: &str) -> String {
        match self.render(source).await {
            Ok(uri) => {
                debug!(source, bytes = uri.len(), "Materialized emoji image");
                uri
            }
            Err(e) => {
                warn!(source, error = %e, "Failed to materialize emoji image");
                String::new()
            }
        }
    }
}

/// Draws encoded image bytes onto a surface of their natural size and
/// returns the surface as a PNG data URI.
///
/// # Errors
/// Returns error if the bytes are not a supported image or encoding fails.
pub fn rasterize(bytes: &[u8]) -> Result<String, MaterializeError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| MaterializeError::Decode(e.to_string()))?;
    render_surface(&decoded)
}

fn render_surface(decoded: &DynamicImage) -> Result<String, MaterializeError> {
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Ok(EMPTY_SURFACE_URI.to_string());
    }

    let mut surface = RgbaImage::new(width, height);
    surface
        .copy_from(&decoded.to_rgba8(), 0, 0)
        .map_err(|e| MaterializeError::Render(e.to_string()))?;

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(surface)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| MaterializeError::Encode(e.to_string()))?;

    Ok(format!("{PNG_DATA_URI_PREFIX}{}", BASE64_STANDARD.encode(&png)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockImageFetcher;
    use crate::infrastructure::image::fetcher::{FetcherConfig, SourceFetcher};
    use image::Rgba;

    fn decode_uri(uri: &str) -> DynamicImage {
        let payload = uri
            .strip_prefix(PNG_DATA_URI_PREFIX)
            .expect("png data uri prefix");
        let png = BASE64_STANDARD.decode(payload).expect("valid base64");
        image::load_from_memory_with_format(&png, ImageFormat::Png).expect("valid png")
    }

    fn encoded(image: &RgbaImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image.clone())
            .write_to(&mut Cursor::new(&mut bytes), format)
            .expect("encode fixture");
        bytes
    }

    #[tokio::test]
    async fn test_materializes_file_at_natural_size() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        RgbaImage::from_pixel(3, 2, Rgba([255, 0, 0, 255])).save(dir.path().join("cat.png"))?;
        let fetcher = SourceFetcher::new(FetcherConfig {
            timeout_secs: 2,
            base_dir: Some(dir.path().to_path_buf()),
        })?;
        let materializer = RasterMaterializer::new(Arc::new(fetcher));

        let uri = materializer.materialize("cat.png").await;

        let image = decode_uri(&uri);
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.to_rgba8().get_pixel(2, 1), &Rgba([255, 0, 0, 255]));
        Ok(())
    }

    #[tokio::test]
    async fn test_preserves_transparency() {
        let mut source = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
        source.put_pixel(1, 0, Rgba([10, 20, 30, 128]));
        let fetcher = MockImageFetcher::new().with_image("a.png", encoded(&source, ImageFormat::Png));
        let materializer = RasterMaterializer::new(Arc::new(fetcher));

        let image = decode_uri(&materializer.materialize("a.png").await).to_rgba8();

        assert_eq!(image.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
        assert_eq!(image.get_pixel(1, 0), &Rgba([10, 20, 30, 128]));
    }

    #[tokio::test]
    async fn test_reencodes_other_formats_as_png() {
        let source = RgbaImage::from_pixel(4, 4, Rgba([0, 128, 0, 255]));
        let gif = encoded(&source, ImageFormat::Gif);
        let fetcher = MockImageFetcher::new().with_image("party.gif", gif);
        let materializer = RasterMaterializer::new(Arc::new(fetcher));

        let uri = materializer.materialize("party.gif").await;

        assert!(uri.starts_with(PNG_DATA_URI_PREFIX));
        let image = decode_uri(&uri);
        assert_eq!((image.width(), image.height()), (4, 4));
    }

    #[test]
    fn test_zero_area_image_renders_empty_surface() {
        let empty = DynamicImage::new_rgba8(0, 3);

        assert_eq!(render_surface(&empty).unwrap(), EMPTY_SURFACE_URI);
        assert_eq!(
            render_surface(&DynamicImage::new_rgba8(5, 0)).unwrap(),
            "data:,"
        );
    }

    #[tokio::test]
    async fn test_missing_source_resolves_to_empty_string() {
        let materializer = RasterMaterializer::new(Arc::new(MockImageFetcher::new()));
        assert_eq!(materializer.materialize("missing.png").await, "");
    }

    #[tokio::test]
    async fn test_undecodable_bytes_resolve_to_empty_string() {
        let fetcher = MockImageFetcher::new().with_image("bad.png", b"not an image".to_vec());
        let materializer = RasterMaterializer::new(Arc::new(fetcher));

        assert_eq!(materializer.materialize("bad.png").await, "");
        assert!(matches!(
            materializer.render("bad.png").await,
            Err(MaterializeError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_inline_data_uri_source() -> Result<(), Box<dyn std::error::Error>> {
        let source = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255]));
        let inline = format!(
            "data:image/png;base64,{}",
            BASE64_STANDARD.encode(encoded(&source, ImageFormat::Png))
        );
        let materializer = RasterMaterializer::new(Arc::new(SourceFetcher::new(
            FetcherConfig::default(),
        )?));

        let image = decode_uri(&materializer.materialize(&inline).await).to_rgba8();
        assert_eq!(image.get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
        Ok(())
    }
}
