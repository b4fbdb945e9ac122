use chrono::Local;
use std::sync::Arc;
use std::time::Duration;

use super::avatar::{decode_with_timeout, AvatarDecoder, DEFAULT_AVATAR_TIMEOUT};
use super::error::CertificateError;
use super::layout::{format_issue_date, portrait_layer, text_layer, CANVAS_HEIGHT, CANVAS_WIDTH};
use super::surface::{replay, Surface, SurfaceProvider};
use super::{certificate_stem, CertificateRequest, RenderedCertificate};

/// Draws certificates onto surfaces handed out by `P`, decoding avatars with `D`.
pub struct CertificateRenderer<P, D> {
    provider: P,
    decoder: D,
    avatar_timeout: Duration,
}

impl<P: SurfaceProvider, D: AvatarDecoder> CertificateRenderer<P, D> {
    pub fn new(provider: P, decoder: D) -> Self {
        Self {
            provider,
            decoder,
            avatar_timeout: DEFAULT_AVATAR_TIMEOUT,
        }
    }

    pub fn with_avatar_timeout(mut self, timeout: Duration) -> Self {
        self.avatar_timeout = timeout;
        self
    }

    /// Render a certificate issued today.
    pub async fn render(&self, request: CertificateRequest) -> Result<RenderedCertificate, CertificateError> {
        let issued_on = format_issue_date(&Local::now());
        self.render_issued_on(request, &issued_on).await
    }

    /// Render with an explicit, already formatted issue date.
    ///
    /// Text and frame are drawn first. Only when an avatar is present does the
    /// render wait, for the decode, before drawing the portrait; without one
    /// the returned future completes on its first poll.
    pub async fn render_issued_on(
        &self,
        request: CertificateRequest,
        issued_on: &str,
    ) -> Result<RenderedCertificate, CertificateError> {
        let CertificateRequest {
            name,
            score_label,
            avatar,
        } = request;

        let mut surface = self.provider.acquire(CANVAS_WIDTH, CANVAS_HEIGHT)?;
        replay(&mut surface, &text_layer(&name, &score_label, issued_on))?;

        if let Some(bytes) = avatar {
            let image = decode_with_timeout(&self.decoder, bytes, self.avatar_timeout).await?;
            replay(&mut surface, &portrait_layer(Arc::new(image)))?;
        }

        let data = surface.finish()?;
        let filename = format!("{}.{}", certificate_stem(&name), self.provider.extension());
        tracing::info!(%filename, bytes = data.len(), "certificate rendered");

        Ok(RenderedCertificate { filename, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certificate::avatar::ImageAvatarDecoder;
    use crate::certificate::layout::DrawCommand;
    use crate::certificate::surface::{RecordingProvider, RecordingSurface};
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(12, 12, Rgba([200, 100, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    fn plan_lines(cert: &RenderedCertificate) -> Vec<String> {
        String::from_utf8(cert.data.clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Fails the render when a surface is requested
    struct UnavailableProvider;

    impl SurfaceProvider for UnavailableProvider {
        type Surface = RecordingSurface;

        fn acquire(&self, _width: u32, _height: u32) -> Result<RecordingSurface, CertificateError> {
            Err(CertificateError::SurfaceUnavailable("no canvas".to_string()))
        }

        fn extension(&self) -> &'static str {
            "png"
        }
    }

    struct PendingDecoder;

    impl AvatarDecoder for PendingDecoder {
        fn decode(&self, _bytes: Vec<u8>) -> BoxFuture<'static, Result<RgbaImage, CertificateError>> {
            futures::future::pending().boxed()
        }
    }

    #[test]
    fn test_render_without_avatar_does_not_suspend() {
        let renderer = CertificateRenderer::new(RecordingProvider, ImageAvatarDecoder);
        let request = CertificateRequest::new("   ", "0.0 cm");

        let cert = renderer
            .render_issued_on(request, "16 octombrie 2026")
            .now_or_never()
            .expect("render should complete without suspending")
            .unwrap();

        assert_eq!(cert.filename, "certificat-stangometru-anonim.txt");
        let lines = plan_lines(&cert);
        assert_eq!(lines[0], "canvas 1200x850");
        assert!(lines.iter().all(|l| !l.starts_with("circular_image")));
        assert!(lines.last().unwrap().contains("Data emiterii: 16 octombrie 2026"));
    }

    #[tokio::test]
    async fn test_render_with_avatar_draws_portrait_last() {
        let renderer = CertificateRenderer::new(RecordingProvider, ImageAvatarDecoder);
        let request = CertificateRequest::new("Ana Pop", "+12.5 cm").with_avatar(png_bytes());

        let cert = renderer.render_issued_on(request, "05 martie 2026").await.unwrap();

        assert_eq!(cert.filename, "certificat-stangometru-ana-pop.txt");
        let lines = plan_lines(&cert);
        let n = lines.len();
        assert_eq!(lines[n - 2], "circular_image 520,610 160 from 12x12");
        assert_eq!(lines[n - 1], "stroke_circle 600,690 r80 #8b0000 w4");
        assert!(lines[n - 3].contains("Data emiterii"));
        assert!(lines.iter().any(|l| l.contains("Scor obținut: +12.5 cm")));
    }

    #[tokio::test]
    async fn test_stalled_avatar_times_out() {
        let renderer = CertificateRenderer::new(RecordingProvider, PendingDecoder)
            .with_avatar_timeout(Duration::from_millis(20));
        let request = CertificateRequest::new("Ana", "+1.0 cm").with_avatar(vec![1, 2, 3]);

        let result = renderer.render_issued_on(request, "01 mai 2026").await;
        assert!(matches!(result, Err(CertificateError::AvatarTimeout(_))));
    }

    #[tokio::test]
    async fn test_bad_avatar_aborts_render() {
        let renderer = CertificateRenderer::new(RecordingProvider, ImageAvatarDecoder);
        let request = CertificateRequest::new("Ana", "+1.0 cm").with_avatar(b"nope".to_vec());

        let result = renderer.render_issued_on(request, "01 mai 2026").await;
        assert!(matches!(result, Err(CertificateError::AvatarDecode(_))));
    }

    #[test]
    fn test_unavailable_surface_aborts() {
        let renderer = CertificateRenderer::new(UnavailableProvider, ImageAvatarDecoder);
        let result = renderer
            .render_issued_on(CertificateRequest::new("Ana", "0.0 cm"), "01 mai 2026")
            .now_or_never()
            .unwrap();
        assert!(matches!(result, Err(CertificateError::SurfaceUnavailable(_))));
    }

    #[test]
    fn test_layout_replays_on_recording_surface() {
        let mut surface = RecordingSurface::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        replay(&mut surface, &text_layer("Ion", "-3.0 cm", "10 mai 2026")).unwrap();
        let names: Vec<&str> = surface
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } if text == "Ion" => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["Ion"]);
    }
}
