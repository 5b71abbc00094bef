//! Runtime configuration.
//!
//! Loaded from an optional TOML file, then overridden by `MIU_` prefixed
//! environment variables using `__` for nesting, e.g.
//! `MIU_AUDIO__COMPRESSED_EXTENSION=mp3`.
//!
//! ```toml
//! resource_root = "resources"
//! prefer_accelerated = true
//! accelerated_threads = 4
//! default_interval_ms = 100
//! cache_capacity = 0
//!
//! [audio]
//! compressed_extension = "ogg"
//! lossless_extensions = ["wav"]
//! ```

use std::{path::Path, path::PathBuf, time::Duration};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Asset pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
	/// Directory the filesystem fetcher reads from
	pub resource_root: PathBuf,
	/// Use the parallel ASF decoder when its runtime comes up
	pub prefer_accelerated: bool,
	/// Worker threads for the parallel decoder, `0` picks one per core
	pub accelerated_threads: usize,
	/// Frame interval for animations that declare none
	pub default_interval_ms: u64,
	/// Maximum decoded animations kept, `0` keeps everything
	pub cache_capacity: usize,
	/// Audio settings
	pub audio: AudioConfig,
}

impl Default for AssetConfig {
	fn default() -> Self {
		Self {
			resource_root: PathBuf::from("resources"),
			prefer_accelerated: true,
			accelerated_threads: 0,
			default_interval_ms: miu_types::file::asf::constants::DEFAULT_INTERVAL_MS,
			cache_capacity: 0,
			audio: AudioConfig::default(),
		}
	}
}

/// Plain audio lookup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
	/// Extension of the compressed sibling tried first
	pub compressed_extension: String,
	/// Extensions that trigger the compressed-sibling lookup
	pub lossless_extensions: Vec<String>,
}

impl Default for AudioConfig {
	fn default() -> Self {
		Self {
			compressed_extension: "ogg".to_string(),
			lossless_extensions: vec!["wav".to_string()],
		}
	}
}

impl AssetConfig {
	/// Loads the configuration from `path` (if given and present) and the environment.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be parsed or a value has the wrong type.
	pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
		let mut builder = Config::builder();
		if let Some(path) = path {
			builder = builder.add_source(File::from(path).required(false));
		}
		builder.add_source(Self::environment(None)).build()?.try_deserialize()
	}

	/// Parses a TOML document, without environment overrides.
	///
	/// # Errors
	///
	/// Returns an error if the document is invalid.
	pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
		Config::builder()
			.add_source(File::from_str(source, FileFormat::Toml))
			.build()?
			.try_deserialize()
	}

	fn environment(vars: Option<config::Map<String, String>>) -> Environment {
		Environment::with_prefix("MIU")
			.prefix_separator("_")
			.separator("__")
			.list_separator(",")
			.with_list_parse_key("audio.lossless_extensions")
			.try_parsing(true)
			.source(vars)
	}

	/// Effective default frame interval.
	pub fn default_interval(&self) -> Duration {
		Duration::from_millis(self.default_interval_ms)
	}
}
