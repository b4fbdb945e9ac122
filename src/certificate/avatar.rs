use futures::future::BoxFuture;
use futures::FutureExt;
use image::RgbaImage;
use std::time::Duration;

use super::error::CertificateError;

/// Default time an avatar gets to decode before the render gives up
pub const DEFAULT_AVATAR_TIMEOUT: Duration = Duration::from_secs(10);

/// Turns raw uploaded bytes into a bitmap.
///
/// Decoding is the renderer's only suspension point, so implementations
/// return a future instead of blocking.
pub trait AvatarDecoder {
    fn decode(&self, bytes: Vec<u8>) -> BoxFuture<'static, Result<RgbaImage, CertificateError>>;
}

/// Decodes with the `image` crate on tokio's blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageAvatarDecoder;

impl AvatarDecoder for ImageAvatarDecoder {
    fn decode(&self, bytes: Vec<u8>) -> BoxFuture<'static, Result<RgbaImage, CertificateError>> {
        async move {
            let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
                .await
                .map_err(|e| CertificateError::AvatarDecode(e.to_string()))?
                .map_err(|e| CertificateError::AvatarDecode(e.to_string()))?;
            tracing::debug!(width = decoded.width(), height = decoded.height(), "avatar decoded");
            Ok(decoded.to_rgba8())
        }
        .boxed()
    }
}

/// Run `decoder` on `bytes`, failing with `AvatarTimeout` after `limit`.
pub async fn decode_with_timeout<D: AvatarDecoder + ?Sized>(
    decoder: &D,
    bytes: Vec<u8>,
    limit: Duration,
) -> Result<RgbaImage, CertificateError> {
    match tokio::time::timeout(limit, decoder.decode(bytes)).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout = ?limit, "avatar decode timed out");
            Err(CertificateError::AvatarTimeout(limit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    struct StalledDecoder;

    impl AvatarDecoder for StalledDecoder {
        fn decode(&self, _bytes: Vec<u8>) -> BoxFuture<'static, Result<RgbaImage, CertificateError>> {
            futures::future::pending().boxed()
        }
    }

    #[tokio::test]
    async fn test_decode_png() {
        let image = decode_with_timeout(&ImageAvatarDecoder, png_bytes(7, 5), DEFAULT_AVATAR_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(image.dimensions(), (7, 5));
        assert_eq!(*image.get_pixel(3, 3), Rgba([10, 20, 30, 255]));
    }

    #[tokio::test]
    async fn test_garbage_bytes_fail_to_decode() {
        let result = decode_with_timeout(&ImageAvatarDecoder, b"definitely not an image".to_vec(), DEFAULT_AVATAR_TIMEOUT).await;
        assert!(matches!(result, Err(CertificateError::AvatarDecode(_))));
    }

    #[tokio::test]
    async fn test_stalled_decode_times_out() {
        let limit = Duration::from_millis(20);
        let result = decode_with_timeout(&StalledDecoder, Vec::new(), limit).await;
        assert!(matches!(result, Err(CertificateError::AvatarTimeout(d)) if d == limit));
    }
}
