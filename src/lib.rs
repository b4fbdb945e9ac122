pub mod browser;
pub mod certificate;
pub mod config;
pub mod content;
pub mod output;
pub mod quiz;
pub mod resolver;
pub mod results;
pub mod scoring;
pub mod telemetry;
