//! Image normalization applied to every stored upload.
//!
//! Every entity that carries an image (projects, project gallery images,
//! staff, people, publications, board members, gallery images, news) passes
//! the uploaded bytes through [`normalize`] before anything is written.
//!
//! | Step | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` with guessed format and [`SourceLimits`] |
//! | **Flatten** | `DynamicImage::to_rgb8` (alpha and palettes dropped) |
//! | **Downscale** | `DynamicImage::resize_exact` with `Lanczos3`, never upscales |
//! | **Encode → JPEG** | `JpegEncoder::new_with_quality` (85) |
//! | **Encode → PNG** | `PngEncoder` with `CompressionType::Best` + adaptive filtering |
//! | **Encode → WebP** | `webp::Encoder` lossy (85) |
//! | **Encode → other** | `DynamicImage::write_to` in the decoded format |
//!
//! The output format is chosen from the *filename extension*, not from the
//! sniffed content, so a PNG uploaded as `photo.jpg` is stored as a JPEG.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader, Limits};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest width or height of any stored image.
pub const MAX_DIMENSION: u32 = 1200;

/// Quality used for lossy JPEG output.
pub const JPEG_QUALITY: u8 = 85;

/// Quality used for lossy WebP output.
pub const WEBP_QUALITY: f32 = 85.0;

/// Default cap on the decoded width/height of an upload.
pub const DEFAULT_MAX_SOURCE_DIMENSION: u32 = 10_000;

/// Default cap on the raw upload size (20 MiB).
pub const DEFAULT_MAX_SOURCE_BYTES: usize = 20 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The bytes are not an image encoding the decoder recognizes.
    #[error("{0}")]
    Decode(String),

    /// The upload exceeds the configured byte or pixel bounds.
    #[error("Image exceeds upload limits: {0}")]
    TooLarge(String),

    #[error("Failed to encode {format}: {reason}")]
    Encode {
        format: &'static str,
        reason: String,
    },
}

impl From<MediaError> for CoreError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Decode(msg) => CoreError::Decode(msg),
            MediaError::TooLarge(msg) => CoreError::Validation(msg),
            MediaError::Encode { .. } => CoreError::Internal(err.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload + limits
// ---------------------------------------------------------------------------

/// An image payload together with the name it was uploaded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl MediaPayload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// `true` when no image was actually supplied.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercased file extension, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}

/// Bounds checked before (and during) decode so a single upload cannot
/// consume unbounded CPU or memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLimits {
    pub max_bytes: usize,
    pub max_dimension: u32,
}

impl Default for SourceLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_SOURCE_BYTES,
            max_dimension: DEFAULT_MAX_SOURCE_DIMENSION,
        }
    }
}

// ---------------------------------------------------------------------------
// Output encoding
// ---------------------------------------------------------------------------

/// Encoding chosen for the normalized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEncoding {
    Jpeg,
    Png,
    WebP,
    /// Re-encode in whatever format the decoder detected.
    Native(ImageFormat),
}

impl OutputEncoding {
    /// Pick the encoding from the upload's filename extension, falling back
    /// to the decoded format for anything unrecognized.
    pub fn for_filename(filename: &str, native: ImageFormat) -> Self {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("jpg" | "jpeg") => Self::Jpeg,
            Some("png") => Self::Png,
            Some("webp") => Self::WebP,
            _ => Self::Native(native),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
            Self::Native(_) => "native",
        }
    }
}

// ---------------------------------------------------------------------------
// Dimension math
// ---------------------------------------------------------------------------

/// Fit `(width, height)` inside a `max` x `max` box, preserving aspect ratio.
///
/// Never upscales: dimensions already inside the box are returned as-is.
/// Neither output dimension is ever 0.
pub fn bounded_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }

    if width >= height {
        let h = (height as f64 * max as f64 / width as f64).round() as u32;
        (max, h.max(1))
    } else {
        let w = (width as f64 * max as f64 / height as f64).round() as u32;
        (w.max(1), max)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize an upload with the default [`SourceLimits`].
pub fn normalize(payload: MediaPayload) -> Result<MediaPayload, MediaError> {
    normalize_with_limits(payload, &SourceLimits::default())
}

/// Decode, flatten to RGB, bound to [`MAX_DIMENSION`] and re-encode.
///
/// An empty payload is returned untouched. Images already inside the box are
/// still re-encoded so every stored file gets the same quality pass.
pub fn normalize_with_limits(
    payload: MediaPayload,
    limits: &SourceLimits,
) -> Result<MediaPayload, MediaError> {
    if payload.is_empty() {
        return Ok(payload);
    }

    if payload.bytes.len() > limits.max_bytes {
        return Err(MediaError::TooLarge(format!(
            "{} bytes exceeds the {} byte limit",
            payload.bytes.len(),
            limits.max_bytes
        )));
    }

    let (decoded, native) = decode(&payload.bytes, limits)?;
    let source_dims = (decoded.width(), decoded.height());

    let flattened = flatten(decoded);
    let bounded = downscale(flattened, MAX_DIMENSION);
    let encoding = OutputEncoding::for_filename(&payload.filename, native);
    let bytes = encode(&bounded, encoding)?;

    tracing::debug!(
        filename = %payload.filename,
        source_width = source_dims.0,
        source_height = source_dims.1,
        width = bounded.width(),
        height = bounded.height(),
        encoding = encoding.label(),
        bytes = bytes.len(),
        "Normalized image"
    );

    Ok(MediaPayload {
        filename: payload.filename,
        bytes,
    })
}

fn decode(bytes: &[u8], limits: &SourceLimits) -> Result<(DynamicImage, ImageFormat), MediaError> {
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| MediaError::Decode(e.to_string()))?;

    let native = reader
        .format()
        .ok_or_else(|| MediaError::Decode("Unrecognized image encoding".into()))?;

    let mut decode_limits = Limits::default();
    decode_limits.max_image_width = Some(limits.max_dimension);
    decode_limits.max_image_height = Some(limits.max_dimension);
    reader.limits(decode_limits);

    let image = reader.decode().map_err(|e| match e {
        ImageError::Limits(limit) => MediaError::TooLarge(limit.to_string()),
        other => MediaError::Decode(other.to_string()),
    })?;

    Ok((image, native))
}

/// Drop alpha / palette / grayscale variants down to plain 8-bit RGB.
fn flatten(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb8(_) => image,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

fn downscale(image: DynamicImage, max: u32) -> DynamicImage {
    let (width, height) = bounded_dimensions(image.width(), image.height(), max);
    if (width, height) == (image.width(), image.height()) {
        return image;
    }
    image.resize_exact(width, height, FilterType::Lanczos3)
}

fn encode(image: &DynamicImage, encoding: OutputEncoding) -> Result<Vec<u8>, MediaError> {
    let encode_err = |reason: String| MediaError::Encode {
        format: encoding.label(),
        reason,
    };

    let mut buf = Vec::new();
    match encoding {
        OutputEncoding::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
            image
                .write_with_encoder(encoder)
                .map_err(|e| encode_err(e.to_string()))?;
        }
        OutputEncoding::Png => {
            let encoder = PngEncoder::new_with_quality(
                &mut buf,
                CompressionType::Best,
                PngFilterType::Adaptive,
            );
            image
                .write_with_encoder(encoder)
                .map_err(|e| encode_err(e.to_string()))?;
        }
        OutputEncoding::WebP => {
            let encoder =
                webp::Encoder::from_image(image).map_err(|e| encode_err(e.to_string()))?;
            buf = encoder.encode(WEBP_QUALITY).to_vec();
        }
        OutputEncoding::Native(format) => {
            image
                .write_to(&mut Cursor::new(&mut buf), format)
                .map_err(|e| encode_err(e.to_string()))?;
        }
    }
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Inspection
// ---------------------------------------------------------------------------

/// Basic facts about an encoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub format: ImageFormat,
}

/// Decode `bytes` and report dimensions, channel count and format.
pub fn inspect(bytes: &[u8]) -> Result<ImageInfo, MediaError> {
    let format = image::guess_format(bytes).map_err(|e| MediaError::Decode(e.to_string()))?;
    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| MediaError::Decode(e.to_string()))?;
    Ok(ImageInfo {
        width: image.width(),
        height: image.height(),
        channels: image.color().channel_count(),
        format,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    fn translucent_rgba(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 64, 100])
        }))
    }

    fn encode_as(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Vec::new();
        image.write_to(&mut Cursor::new(&mut buf), format).unwrap();
        buf
    }

    // -- bounded_dimensions --------------------------------------------------

    #[test]
    fn bounded_landscape() {
        assert_eq!(bounded_dimensions(2400, 1600, 1200), (1200, 800));
    }

    #[test]
    fn bounded_portrait() {
        assert_eq!(bounded_dimensions(1000, 3000, 1200), (400, 1200));
    }

    #[test]
    fn bounded_never_upscales() {
        assert_eq!(bounded_dimensions(640, 480, 1200), (640, 480));
        assert_eq!(bounded_dimensions(1200, 1200, 1200), (1200, 1200));
    }

    #[test]
    fn bounded_extreme_ratio_keeps_one_pixel() {
        assert_eq!(bounded_dimensions(10_000, 2, 1200), (1200, 1));
    }

    // -- OutputEncoding ------------------------------------------------------

    #[test]
    fn encoding_from_extension() {
        let native = ImageFormat::Gif;
        assert_eq!(OutputEncoding::for_filename("a.jpg", native), OutputEncoding::Jpeg);
        assert_eq!(OutputEncoding::for_filename("a.JPEG", native), OutputEncoding::Jpeg);
        assert_eq!(OutputEncoding::for_filename("a.png", native), OutputEncoding::Png);
        assert_eq!(OutputEncoding::for_filename("a.webp", native), OutputEncoding::WebP);
        assert_eq!(
            OutputEncoding::for_filename("a.gif", native),
            OutputEncoding::Native(ImageFormat::Gif)
        );
        assert_eq!(
            OutputEncoding::for_filename("no_extension", ImageFormat::Png),
            OutputEncoding::Native(ImageFormat::Png)
        );
    }

    // -- normalize -----------------------------------------------------------

    #[test]
    fn empty_payload_is_noop() {
        let payload = MediaPayload::new("empty.jpg", Vec::new());
        let out = normalize(payload.clone()).unwrap();
        assert_eq!(out, payload);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let payload = MediaPayload::new("broken.jpg", b"definitely not an image".to_vec());
        assert_matches!(normalize(payload), Err(MediaError::Decode(_)));
    }

    #[test]
    fn decode_error_maps_to_core_decode() {
        let err = normalize(MediaPayload::new("x.png", vec![1, 2, 3, 4])).unwrap_err();
        assert_matches!(CoreError::from(err), CoreError::Decode(_));
    }

    #[test]
    fn large_jpeg_is_bounded() {
        let source = encode_as(&gradient_rgb(3000, 1500), ImageFormat::Jpeg);
        let out = normalize(MediaPayload::new("site.jpg", source)).unwrap();

        let info = inspect(&out.bytes).unwrap();
        assert_eq!((info.width, info.height), (1200, 600));
        assert_eq!(info.channels, 3);
        assert_eq!(info.format, ImageFormat::Jpeg);
        assert_eq!(out.filename, "site.jpg");
    }

    #[test]
    fn png_with_alpha_is_flattened_and_bounded() {
        let source = encode_as(&translucent_rgba(1300, 2600), ImageFormat::Png);
        let out = normalize(MediaPayload::new("logo.png", source)).unwrap();

        let info = inspect(&out.bytes).unwrap();
        assert_eq!((info.width, info.height), (600, 1200));
        assert_eq!(info.channels, 3);
        assert_eq!(info.format, ImageFormat::Png);
    }

    #[test]
    fn webp_is_reencoded_lossy_without_alpha() {
        let source = encode_as(&translucent_rgba(1600, 400), ImageFormat::WebP);
        let out = normalize(MediaPayload::new("banner.webp", source)).unwrap();

        let info = inspect(&out.bytes).unwrap();
        assert_eq!((info.width, info.height), (1200, 300));
        assert_eq!(info.channels, 3);
        assert_eq!(info.format, ImageFormat::WebP);
    }

    #[test]
    fn gif_keeps_native_format_and_drops_transparency() {
        let source = encode_as(&translucent_rgba(1250, 40), ImageFormat::Gif);
        let out = normalize(MediaPayload::new("anim.gif", source)).unwrap();

        let info = inspect(&out.bytes).unwrap();
        assert_eq!((info.width, info.height), (1200, 38));
        assert_eq!(info.format, ImageFormat::Gif);

        // The GIF decoder always yields RGBA; every pixel must be opaque.
        let decoded = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
        assert!(decoded.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn gif_uploaded_as_jpg_becomes_three_channel_jpeg() {
        let source = encode_as(&translucent_rgba(200, 100), ImageFormat::Gif);
        let out = normalize(MediaPayload::new("renamed.jpg", source)).unwrap();

        let info = inspect(&out.bytes).unwrap();
        assert_eq!(info.format, ImageFormat::Jpeg);
        assert_eq!(info.channels, 3);
        assert_eq!((info.width, info.height), (200, 100));
    }

    #[test]
    fn small_image_is_still_reencoded() {
        let source = encode_as(&gradient_rgb(64, 48), ImageFormat::Png);
        let out = normalize(MediaPayload::new("thumb.jpg", source.clone())).unwrap();

        assert_ne!(out.bytes, source);
        let info = inspect(&out.bytes).unwrap();
        assert_eq!(info.format, ImageFormat::Jpeg);
        assert_eq!((info.width, info.height), (64, 48));
    }

    #[test]
    fn renormalizing_jpeg_is_visually_stable() {
        let source = encode_as(&gradient_rgb(2000, 1000), ImageFormat::Jpeg);
        let once = normalize(MediaPayload::new("a.jpg", source)).unwrap();
        let twice = normalize(once.clone()).unwrap();

        let first = inspect(&once.bytes).unwrap();
        let second = inspect(&twice.bytes).unwrap();
        assert_eq!((first.width, first.height), (second.width, second.height));
        assert_eq!(first.channels, second.channels);
        assert_eq!(first.format, second.format);
    }

    #[test]
    fn oversized_payload_rejected_before_decode() {
        let limits = SourceLimits {
            max_bytes: 16,
            max_dimension: DEFAULT_MAX_SOURCE_DIMENSION,
        };
        let payload = MediaPayload::new("big.jpg", vec![0u8; 17]);
        assert_matches!(
            normalize_with_limits(payload, &limits),
            Err(MediaError::TooLarge(_))
        );
    }

    #[test]
    fn oversized_dimensions_rejected() {
        let limits = SourceLimits {
            max_bytes: DEFAULT_MAX_SOURCE_BYTES,
            max_dimension: 100,
        };
        let source = encode_as(&gradient_rgb(200, 50), ImageFormat::Png);
        assert_matches!(
            normalize_with_limits(MediaPayload::new("wide.png", source), &limits),
            Err(MediaError::TooLarge(_))
        );
    }

    #[test]
    fn payload_extension_is_lowercased() {
        assert_eq!(
            MediaPayload::new("Photo.JPG", vec![1]).extension().as_deref(),
            Some("jpg")
        );
        assert_eq!(MediaPayload::new("README", vec![1]).extension(), None);
    }
}
