// crates/coverpick-media/src/still.rs
//
// Raster sizing and JPEG encoding shared by the sampler and the cover
// capture thread. Pure byte work, no FFmpeg types.

use anyhow::Result;

/// Stills are rasterized at native size divided by this.
pub const RASTER_DIVISOR: u32 = 4;

/// Quality for every encoded still.
pub const JPEG_QUALITY: u8 = 85;

/// Output dimensions for a still of a `native_w x native_h` source:
/// a quarter of native, rounded down to even (the scaler wants even),
/// never below 2.
#[inline]
pub fn raster_dims(native_w: u32, native_h: u32) -> (u32, u32) {
    (
        ((native_w / RASTER_DIVISOR) & !1).max(2),
        ((native_h / RASTER_DIVISOR) & !1).max(2),
    )
}

/// JPEG-encode an RGBA buffer. The alpha channel is dropped first; decoded
/// video is opaque, and JPEG has no alpha anyway.
pub fn encode_jpeg(rgba: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        anyhow::bail!("rgba buffer is {} bytes, expected {expected} for {width}x{height}", rgba.len());
    }

    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for px in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
    }

    let mut out = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    encoder.encode(&rgb, width, height, image::ExtendedColorType::Rgb8)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_dims_quarter_and_even() {
        assert_eq!(raster_dims(1920, 1080), (480, 270));
        // 650/4 = 162 (even), 366/4 = 91 -> 90.
        assert_eq!(raster_dims(650, 366), (162, 90));
    }

    #[test]
    fn raster_dims_never_collapse() {
        assert_eq!(raster_dims(4, 4), (2, 2));
        assert_eq!(raster_dims(0, 0), (2, 2));
    }

    #[test]
    fn encode_produces_jpeg_magic() {
        let (w, h) = (8u32, 4u32);
        let rgba = vec![128u8; (w * h * 4) as usize];
        let jpeg = encode_jpeg(&rgba, w, h).unwrap();
        assert!(jpeg.len() > 2);
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "missing JPEG SOI marker");
    }

    #[test]
    fn encode_rejects_short_buffer() {
        assert!(encode_jpeg(&[0u8; 10], 8, 4).is_err());
    }
}
