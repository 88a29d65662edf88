//! Recipe photo normalization.
//!
//! Uploaded photos are decoded, turned upright, flattened to RGB, shrunk to fit
//! a bounding box, re-encoded as JPEG and stored as base64 text in the recipe
//! row. Every failure here degrades to "no photo" instead of failing the save.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, Rgb, RgbImage};

use crate::error::{PhotoError, PhotoUnavailable};
use crate::types::EncodedPhoto;

/// Allowed image formats for recipe photos.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum upload size for photos (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Longest edge of a stored photo, in pixels.
pub const MAX_PHOTO_DIMENSION: u32 = 500;

/// JPEG quality used when re-encoding.
pub const PHOTO_JPEG_QUALITY: u8 = 60;

const DIMENSION_RANGE: (u32, u32) = (500, 800);
const QUALITY_RANGE: (u8, u8) = (50, 80);

/// Knobs for [`normalize_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoSettings {
    pub max_dimension: u32,
    pub quality: u8,
}

impl PhotoSettings {
    /// Build settings, clamping the bound to 500..=800 px and the quality to 50..=80.
    pub fn new(max_dimension: u32, quality: u8) -> Self {
        Self {
            max_dimension: max_dimension.clamp(DIMENSION_RANGE.0, DIMENSION_RANGE.1),
            quality: quality.clamp(QUALITY_RANGE.0, QUALITY_RANGE.1),
        }
    }
}

impl Default for PhotoSettings {
    fn default() -> Self {
        Self {
            max_dimension: MAX_PHOTO_DIMENSION,
            quality: PHOTO_JPEG_QUALITY,
        }
    }
}

/// Result of running an upload through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PhotoOutcome {
    /// Nothing was uploaded.
    Absent,
    Encoded(EncodedPhoto),
    /// Something was uploaded but it can't be stored; the recipe is saved without it.
    Unprocessable(PhotoError),
}

impl PhotoOutcome {
    pub fn into_photo(self) -> Option<EncodedPhoto> {
        match self {
            PhotoOutcome::Encoded(photo) => Some(photo),
            PhotoOutcome::Absent | PhotoOutcome::Unprocessable(_) => None,
        }
    }
}

/// Normalize an optional upload with the default settings.
pub fn normalize(raw: Option<&[u8]>) -> PhotoOutcome {
    normalize_with(&PhotoSettings::default(), raw)
}

/// Normalize an optional upload. Never fails: bad input becomes
/// [`PhotoOutcome::Unprocessable`].
pub fn normalize_with(settings: &PhotoSettings, raw: Option<&[u8]>) -> PhotoOutcome {
    let Some(data) = raw else {
        return PhotoOutcome::Absent;
    };

    match encode_photo(settings, data) {
        Ok(photo) => PhotoOutcome::Encoded(photo),
        Err(e) => {
            tracing::warn!(size = data.len(), error = %e, "Discarding unprocessable photo");
            PhotoOutcome::Unprocessable(e)
        }
    }
}

/// Validate image data: check format is allowed and detect content type.
///
/// Returns the content type on success (e.g., "image/jpeg").
pub fn validate_image(data: &[u8]) -> Result<String, PhotoError> {
    let format = detect_format(data)?;
    Ok(format.to_mime_type().to_string())
}

/// Run the full pipeline on uploaded bytes:
/// 1. Decode, honoring any EXIF orientation
/// 2. Flatten alpha onto white
/// 3. Shrink to fit `max_dimension` (never enlarge)
/// 4. Encode as JPEG at `quality`, then base64
pub fn encode_photo(settings: &PhotoSettings, data: &[u8]) -> Result<EncodedPhoto, PhotoError> {
    if data.is_empty() {
        return Err(PhotoError::Empty);
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(PhotoError::TooLarge {
            size: data.len(),
            max: MAX_FILE_SIZE,
        });
    }

    let img = decode_upright(data)?;
    let rgb = flatten_onto_white(img);
    let rgb = shrink_to_fit(rgb, settings.max_dimension);

    let mut jpeg = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, settings.quality))
        .map_err(|e| PhotoError::Encode(e.to_string()))?;

    tracing::debug!(
        width = rgb.width(),
        height = rgb.height(),
        jpeg_bytes = jpeg.len(),
        "Normalized photo"
    );

    Ok(EncodedPhoto::new(STANDARD.encode(&jpeg)))
}

/// Turn a stored photo back into JPEG bytes for display.
pub fn denormalize(photo: Option<&EncodedPhoto>) -> Result<Vec<u8>, PhotoUnavailable> {
    let Some(photo) = photo else {
        return Err(PhotoUnavailable::NoPhoto);
    };

    let bytes = STANDARD.decode(photo.as_str().trim()).map_err(|e| {
        tracing::warn!(error = %e, "Stored photo is not valid base64");
        PhotoUnavailable::Corrupt(e.to_string())
    })?;

    if bytes.is_empty() {
        return Err(PhotoUnavailable::Corrupt("empty payload".to_string()));
    }

    Ok(bytes)
}

fn detect_format(data: &[u8]) -> Result<ImageFormat, PhotoError> {
    let format = image::guess_format(data).map_err(|_| PhotoError::UnknownFormat)?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(PhotoError::UnsupportedFormat(format!("{:?}", format)));
    }

    Ok(format)
}

fn decode_upright(data: &[u8]) -> Result<DynamicImage, PhotoError> {
    let format = detect_format(data)?;

    let mut decoder = ImageReader::with_format(Cursor::new(data), format)
        .into_decoder()
        .map_err(|e| PhotoError::Decode(e.to_string()))?;

    // Missing or unreadable EXIF just means "already upright"
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);

    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| PhotoError::Decode(e.to_string()))?;
    img.apply_orientation(orientation);

    Ok(img)
}

/// JPEG has no alpha channel, so composite transparent pixels onto white.
fn flatten_onto_white(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }

    let rgba = img.into_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u16::from(a);
        let blend = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        rgb.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }

    rgb
}

fn shrink_to_fit(rgb: RgbImage, max_dimension: u32) -> RgbImage {
    if rgb.width() <= max_dimension && rgb.height() <= max_dimension {
        return rgb;
    }

    // thumbnail() preserves aspect ratio, fitting within the given dimensions
    DynamicImage::ImageRgb8(rgb)
        .thumbnail(max_dimension, max_dimension)
        .into_rgb8()
}
