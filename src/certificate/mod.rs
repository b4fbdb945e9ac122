//! Certificate synthesis: layout as draw commands, surfaces to replay them
//! on, and delivery of the finished file.

pub mod avatar;
pub mod error;
pub mod layout;
pub mod raster;
pub mod renderer;
pub mod surface;

pub use avatar::{AvatarDecoder, ImageAvatarDecoder, DEFAULT_AVATAR_TIMEOUT};
pub use error::CertificateError;
pub use layout::{format_issue_date, DrawCommand};
pub use raster::{FontPaths, RasterProvider};
pub use renderer::CertificateRenderer;
pub use surface::{RecordingProvider, Surface, SurfaceProvider};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The one message users see when a certificate cannot be produced
pub const FAILURE_NOTICE: &str = "A apărut o eroare la generarea certificatului.";

const FILENAME_PREFIX: &str = "certificat-stangometru";
const ANONYMOUS: &str = "anonim";

/// Input of one render call.
#[derive(Debug, Clone)]
pub struct CertificateRequest {
    /// Trimmed display name
    pub name: String,
    /// Pre-formatted score, e.g. "+12.5 cm"
    pub score_label: String,
    /// Raw bytes of the uploaded image, decoded during the render
    pub avatar: Option<Vec<u8>>,
}

impl CertificateRequest {
    pub fn new(name: &str, score_label: impl Into<String>) -> Self {
        Self {
            name: name.trim().to_string(),
            score_label: score_label.into(),
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, bytes: Vec<u8>) -> Self {
        self.avatar = Some(bytes);
        self
    }
}

/// A finished certificate, not yet written anywhere.
#[derive(Debug, Clone)]
pub struct RenderedCertificate {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Filename-safe form of a display name: lowercase, whitespace runs become
/// "-", anything other than letters, digits, "-" and "_" is dropped.
/// Falls back to "anonim" when nothing is left.
pub fn name_slug(name: &str) -> String {
    let mut slug = String::new();
    for c in name.trim().chars() {
        if c.is_whitespace() || c == '-' {
            if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        } else if c.is_alphanumeric() || c == '_' {
            slug.extend(c.to_lowercase());
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        ANONYMOUS.to_string()
    } else {
        slug.to_string()
    }
}

/// Filename without extension, e.g. "certificat-stangometru-ana-pop"
pub fn certificate_stem(name: &str) -> String {
    format!("{}-{}", FILENAME_PREFIX, name_slug(name))
}

/// PNG filename for a certificate issued to `name`
pub fn certificate_filename(name: &str) -> String {
    format!("{}.png", certificate_stem(name))
}

/// Write a rendered certificate into `dir`, atomically.
///
/// The target only appears once the full file is written.
pub fn save_certificate(certificate: &RenderedCertificate, dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory at {}", dir.display()))?;
    }

    let path = dir.join(&certificate.filename);
    let mut file = AtomicWriteFile::open(&path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(&certificate.data)
        .with_context(|| format!("Failed to write certificate to {}", path.display()))?;
    file.commit().context("Failed to save certificate")?;

    tracing::info!(path = %path.display(), "certificate saved");
    Ok(path)
}
