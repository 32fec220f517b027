//! Perceptual image fingerprints (average hash).
//!
//! The image is reduced to an 8x8 grayscale thumbnail; each bit of the
//! 64-bit fingerprint records whether the corresponding pixel is brighter
//! than the thumbnail's mean. Lossless re-encodings of the same picture
//! therefore hash identically, while visually distinct pictures almost
//! always differ.

use std::fmt;

use image::imageops::FilterType;

use crate::error::CoreError;

/// Thumbnail edge length; `HASH_SIZE * HASH_SIZE` bits per fingerprint.
pub const HASH_SIZE: u32 = 8;

/// MIME type assumed when the format cannot be sniffed.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// 64-bit average-hash fingerprint of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageFingerprint(u64);

impl ImageFingerprint {
    pub fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    /// Fixed-width lowercase hex form, used as a storage key.
    pub fn to_hex(self) -> String {
        format!("{:016x}", self.0)
    }

    /// Number of differing bits between two fingerprints.
    pub fn distance(self, other: Self) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

impl fmt::Display for ImageFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Compute the average-hash fingerprint of encoded image bytes.
///
/// Fails with [`CoreError::Decode`] when the bytes are not a supported image.
pub fn compute(image_bytes: &[u8]) -> Result<ImageFingerprint, CoreError> {
    let img = image::load_from_memory(image_bytes)
        .map_err(|e| CoreError::Decode(format!("Failed to decode image: {e}")))?;

    let thumb = img
        .grayscale()
        .resize_exact(HASH_SIZE, HASH_SIZE, FilterType::Lanczos3)
        .to_luma8();

    let pixels: Vec<u64> = thumb.pixels().map(|p| u64::from(p.0[0])).collect();
    let sum: u64 = pixels.iter().sum();
    let len = pixels.len() as u64;

    // `p > mean` compared as `p * len > sum` to stay in integers.
    let bits = pixels
        .iter()
        .fold(0u64, |acc, &p| (acc << 1) | u64::from(p * len > sum));

    Ok(ImageFingerprint(bits))
}

/// Sniff the MIME type of encoded image bytes, falling back to JPEG.
pub fn detect_mime(image_bytes: &[u8]) -> &'static str {
    image::guess_format(image_bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or(DEFAULT_MIME_TYPE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
