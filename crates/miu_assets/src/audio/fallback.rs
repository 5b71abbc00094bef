use std::{fmt, io::Cursor, sync::Arc};

use bytes::Bytes;
use log::{debug, warn};
use miu_types::file::{DecodeError, FileType};
use miu_vfs::{ResourceFetcher, extension, normalize_path, replace_extension};

use crate::{AssetError, AudioConfig};

/// Signature at the start of every Ogg page
const OGG_MAGIC: &[u8; 4] = b"OggS";

/// A located plain audio file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainAudio {
	/// Canonical path the bytes were read from
	pub url: String,
	/// `true` if the compressed sibling failed and the requested path was used
	pub used_fallback: bool,
	/// File contents
	pub bytes: Bytes,
}

/// Locates plain (non-XNB) audio, preferring compressed siblings.
///
/// A request for a lossless file first tries the sibling with the compressed
/// extension (`hit.wav` tries `hit.ogg`). If that cannot be fetched or is not
/// a valid file, the requested path is tried once more and its outcome is
/// final. Other requests are fetched once, as given.
pub struct AudioFormatFallback {
	fetcher: Arc<dyn ResourceFetcher>,
	config: AudioConfig,
}

impl AudioFormatFallback {
	/// Creates a resolver reading through `fetcher`.
	pub fn new(fetcher: Arc<dyn ResourceFetcher>, config: AudioConfig) -> Self {
		Self {
			fetcher,
			config,
		}
	}

	/// Returns the bytes to play for `path`.
	///
	/// # Errors
	///
	/// Returns the failure of the last path tried.
	pub async fn resolve(&self, path: &str) -> Result<PlainAudio, AssetError> {
		let requested = normalize_path(path);

		if self.is_lossless(&requested) {
			let compressed = replace_extension(&requested, &self.config.compressed_extension);
			match self.load(&compressed).await {
				Ok(bytes) => {
					return Ok(PlainAudio {
						url: compressed,
						used_fallback: false,
						bytes,
					});
				}
				Err(e) => warn!("{compressed} unavailable ({e}), falling back to {requested}"),
			}

			let bytes = self.load(&requested).await?;
			return Ok(PlainAudio {
				url: requested,
				used_fallback: true,
				bytes,
			});
		}

		let bytes = self.load(&requested).await?;
		Ok(PlainAudio {
			url: requested,
			used_fallback: false,
			bytes,
		})
	}

	fn is_lossless(&self, path: &str) -> bool {
		extension(path).is_some_and(|ext| {
			self.config.lossless_extensions.iter().any(|lossless| lossless.eq_ignore_ascii_case(ext))
		})
	}

	async fn load(&self, path: &str) -> Result<Bytes, AssetError> {
		let bytes = self.fetcher.fetch(path).await?;
		validate(path, &bytes).map_err(|e| AssetError::decode(path, e))?;
		debug!("loaded {path} ({} bytes)", bytes.len());
		Ok(bytes)
	}
}

impl fmt::Debug for AudioFormatFallback {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AudioFormatFallback").field("config", &self.config).finish_non_exhaustive()
	}
}

/// Checks that the bytes look like the container their extension names.
///
/// Unknown extensions pass unchecked.
fn validate(path: &str, bytes: &[u8]) -> Result<(), DecodeError> {
	match extension(path).map(str::to_ascii_lowercase).as_deref() {
		Some("ogg") => {
			if bytes.len() < OGG_MAGIC.len() {
				return Err(DecodeError::insufficient_data(FileType::Ogg, OGG_MAGIC.len(), bytes.len()));
			}
			if &bytes[..4] != OGG_MAGIC {
				return Err(DecodeError::InvalidMagic {
					file_type: FileType::Ogg,
					expected: OGG_MAGIC.to_vec(),
					actual: bytes[..4].to_vec(),
				});
			}
			Ok(())
		}
		Some("wav") => hound::WavReader::new(Cursor::new(bytes))
			.map(|_| ())
			.map_err(|e| DecodeError::invalid_header(FileType::Wav, "riff", e.to_string())),
		_ => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use miu_vfs::MemoryFetcher;

	use super::*;

	fn wav() -> Vec<u8> {
		let spec = hound::WavSpec {
			channels: 1,
			sample_rate: 8000,
			bits_per_sample: 16,
			sample_format: hound::SampleFormat::Int,
		};
		let mut cursor = Cursor::new(Vec::new());
		let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
		writer.write_sample(0i16).unwrap();
		writer.finalize().unwrap();
		cursor.into_inner()
	}

	#[test]
	fn test_validate() {
		assert!(validate("a.ogg", b"OggS\0\x02").is_ok());
		assert!(matches!(validate("a.ogg", b"RIFF"), Err(DecodeError::InvalidMagic { .. })));
		assert!(validate("a.ogg", b"Og").is_err());
		assert!(validate("a.wav", &wav()).is_ok());
		assert!(validate("a.WAV", b"not a wav file").is_err());
		assert!(validate("a.mp3", b"").is_ok());
	}

	#[tokio::test]
	async fn test_custom_extensions() {
		let fetcher = Arc::new(MemoryFetcher::new());
		fetcher.insert("music/theme.mp3", Bytes::from_static(b"ID3"));
		let config = AudioConfig {
			compressed_extension: "mp3".to_string(),
			lossless_extensions: vec!["flac".to_string()],
		};
		let fallback = AudioFormatFallback::new(fetcher.clone(), config);

		let audio = fallback.resolve("Music/Theme.FLAC").await.unwrap();
		assert_eq!(audio.url, "music/theme.mp3");
		assert!(!audio.used_fallback);
		assert_eq!(fetcher.total_requests(), 1);
	}
}
