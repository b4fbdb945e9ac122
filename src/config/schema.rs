use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::certificate::FontPaths;

/// Top-level configuration.
///
/// Example YAML:
/// ```yaml
/// content:
///   questions: ./test.json
///   results: ./results.json
/// certificate:
///   output_dir: ~/Downloads
///   avatar_timeout: 10s
///   fonts:
///     regular: /usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf
///     bold: /usr/share/fonts/truetype/dejavu/DejaVuSerif-Bold.ttf
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub content: ContentConfig,

    #[serde(default)]
    pub certificate: CertificateConfig,
}

/// Where the question set and result table live
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    #[serde(default = "default_questions_path")]
    pub questions: PathBuf,

    #[serde(default = "default_results_path")]
    pub results: PathBuf,
}

fn default_questions_path() -> PathBuf {
    PathBuf::from("test.json")
}

fn default_results_path() -> PathBuf {
    PathBuf::from("results.json")
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            questions: default_questions_path(),
            results: default_results_path(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CertificateConfig {
    /// Directory certificates are saved into (default: current directory)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// How long an avatar may take to decode, humantime format ("10s", "500ms")
    #[serde(default = "default_avatar_timeout")]
    pub avatar_timeout: String,

    #[serde(default)]
    pub fonts: FontPaths,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_avatar_timeout() -> String {
    "10s".to_string()
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            avatar_timeout: default_avatar_timeout(),
            fonts: FontPaths::default(),
        }
    }
}
