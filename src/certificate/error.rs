use std::time::Duration;

/// Everything that can abort a certificate render.
///
/// Any of these discards the drawing surface; nothing is written to disk.
#[derive(Debug, thiserror::Error)]
pub enum CertificateError {
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("failed to draw certificate: {0}")]
    Draw(String),

    #[error("failed to decode avatar image: {0}")]
    AvatarDecode(String),

    #[error("avatar image did not load within {}", humantime::format_duration(*.0))]
    AvatarTimeout(Duration),

    #[error("failed to encode certificate: {0}")]
    Encode(String),
}
