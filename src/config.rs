//! Configuration management for Easel
//!
//! Configuration is loaded once at startup from a YAML file. The file
//! path comes from `EASEL_CONFIG` (default `config.yaml`); see
//! `config.example.yaml` for the format.

use std::env;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Default config file path when `EASEL_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream image-generation API settings
    pub api: ApiConfig,

    /// UI variants; the built-in pair is used when the file names none
    #[serde(default = "default_variants")]
    pub variants: Vec<VariantConfig>,

    /// Enable debug endpoints (development only)
    #[serde(default)]
    pub debug_enabled: bool,
}

/// Listen address settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Upstream API endpoint and credential
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Full URL of the generation endpoint
    pub endpoint: String,
    /// Bearer credential passed through on every generation request
    pub key: String,
    /// Timeout for the generation POST, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Timeout for fetching a located image URL, in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

/// One UI variant: a page plus its upstream request dialect.
///
/// Variants only differ in wire field names, option lists, and labels;
/// they all share the same page template and generation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantConfig {
    /// URL-safe identifier, unique across variants
    pub name: String,
    /// Page title shown in the UI
    pub title: String,
    /// Wire field names for the fixed payload fields
    #[serde(default)]
    pub fields: FieldNames,
    /// Model options offered by the page
    pub models: Vec<String>,
    /// Preselected model; first of `models` when unset
    #[serde(default)]
    pub default_model: Option<String>,
    /// Additional dropdowns, copied verbatim into the payload
    #[serde(default)]
    pub selectors: Vec<SelectorConfig>,
}

/// Wire names for the payload fields every variant carries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldNames {
    #[serde(default = "default_model_field")]
    pub model: String,
    #[serde(default = "default_prompt_field")]
    pub prompt: String,
    #[serde(default = "default_images_field")]
    pub images: String,
}

/// A variant-specific dropdown and the payload field it feeds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Wire field name in the upstream payload
    pub field: String,
    /// Label shown next to the dropdown
    pub label: String,
    /// Values offered; free-form strings, not validated as an enum
    pub options: Vec<String>,
    /// Preselected value; first of `options` when unset
    #[serde(default)]
    pub default: Option<String>,
}

impl Config {
    /// Load configuration from the YAML file named by `EASEL_CONFIG`,
    /// falling back to `config.yaml`.
    pub fn load() -> Result<Self> {
        let path = env::var("EASEL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_path(Path::new(&path))
    }

    /// Load and validate configuration from a specific file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| {
            format!(
                "Config file not found: {}. Copy config.example.yaml and fill in your API settings",
                path.display()
            )
        })?;
        let config: Config = serde_yaml::from_str(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the server cannot meaningfully run with.
    pub fn validate(&self) -> Result<()> {
        if self.api.endpoint.trim().is_empty() {
            bail!("api.endpoint must be set");
        }
        if self.api.key.trim().is_empty() {
            bail!("api.key must be set");
        }
        if self.variants.is_empty() {
            bail!("at least one variant must be configured");
        }
        for variant in &self.variants {
            if variant.models.is_empty() {
                bail!("variant '{}' must list at least one model", variant.name);
            }
        }
        let mut names: Vec<&str> = self.variants.iter().map(|v| v.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        if names.len() != self.variants.len() {
            bail!("variant names must be unique");
        }
        Ok(())
    }

    /// Look up a variant by name.
    pub fn variant(&self, name: &str) -> Option<&VariantConfig> {
        self.variants.iter().find(|v| v.name == name)
    }
}

impl VariantConfig {
    /// The model preselected by the page and used when a request names none.
    pub fn default_model(&self) -> &str {
        self.default_model
            .as_deref()
            .unwrap_or_else(|| self.models[0].as_str())
    }
}

impl SelectorConfig {
    /// The value used when a request does not pick one.
    pub fn default_option(&self) -> Option<&str> {
        self.default
            .as_deref()
            .or_else(|| self.options.first().map(String::as_str))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            model: default_model_field(),
            prompt: default_prompt_field(),
            images: default_images_field(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    90
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_model_field() -> String {
    "model".to_string()
}

fn default_prompt_field() -> String {
    "prompt".to_string()
}

fn default_images_field() -> String {
    "urls".to_string()
}

/// The two built-in variants, mirroring the upstream dialects most
/// relay providers expose.
pub fn default_variants() -> Vec<VariantConfig> {
    vec![
        VariantConfig {
            name: "studio".to_string(),
            title: "Image Studio".to_string(),
            fields: FieldNames::default(),
            models: vec![
                "nano-banana-fast".to_string(),
                "nano-banana".to_string(),
                "nano-banana-pro".to_string(),
            ],
            default_model: None,
            selectors: vec![
                SelectorConfig {
                    field: "aspectRatio".to_string(),
                    label: "Aspect ratio".to_string(),
                    options: [
                        "auto", "1:1", "16:9", "9:16", "4:3", "3:4", "3:2", "2:3", "5:4", "4:5",
                        "21:9",
                    ]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                    default: None,
                },
                SelectorConfig {
                    field: "imageSize".to_string(),
                    label: "Image size".to_string(),
                    options: vec!["1K".to_string(), "2K".to_string(), "4K".to_string()],
                    default: None,
                },
            ],
        },
        VariantConfig {
            name: "stylize".to_string(),
            title: "Style Lab".to_string(),
            fields: FieldNames {
                model: "model".to_string(),
                prompt: "prompt".to_string(),
                images: "reference_images".to_string(),
            },
            models: vec!["seedream-4".to_string(), "flux-kontext".to_string()],
            default_model: None,
            selectors: vec![
                SelectorConfig {
                    field: "output_format".to_string(),
                    label: "Output format".to_string(),
                    options: vec!["png".to_string(), "jpeg".to_string(), "webp".to_string()],
                    default: None,
                },
                SelectorConfig {
                    field: "style".to_string(),
                    label: "Style".to_string(),
                    options: vec![
                        "natural".to_string(),
                        "vivid".to_string(),
                        "anime".to_string(),
                        "sketch".to_string(),
                    ],
                    default: None,
                },
            ],
        },
    ]
}
