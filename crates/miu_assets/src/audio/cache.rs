use std::{fmt, sync::Arc};

use log::debug;
use miu_types::file::{XnbAudioContainer, xnb};
use miu_vfs::{ResourceFetcher, normalize_path};

use crate::{
	AssetError,
	loader::{SharedLoader, run_blocking},
};

/// Canonical path to parsed XNB SoundEffect cache.
///
/// Same guarantees as [`DecodeCache`](crate::DecodeCache): one parse per
/// path at a time, shared results, failures not cached.
pub struct AudioCache {
	fetcher: Arc<dyn ResourceFetcher>,
	loader: SharedLoader<XnbAudioContainer>,
}

impl AudioCache {
	/// Creates an unbounded cache reading through `fetcher`.
	pub fn new(fetcher: Arc<dyn ResourceFetcher>) -> Self {
		Self {
			fetcher,
			loader: SharedLoader::new(0),
		}
	}

	/// Returns the sound effect at `path`, fetching and parsing it if needed.
	///
	/// # Errors
	///
	/// Returns [`AssetError::Fetch`] or [`AssetError::Decode`].
	pub async fn get(&self, path: &str) -> Result<Arc<XnbAudioContainer>, AssetError> {
		let key = normalize_path(path);
		let fetcher = Arc::clone(&self.fetcher);

		self.loader
			.get_or_load(&key, move |key| async move {
				let data = fetcher.fetch(&key).await?;
				let audio = run_blocking(&key, move || xnb::parse(&data))
					.await?
					.map_err(|e| AssetError::decode(&key, e))?;
				debug!("parsed {key}: {audio}");
				Ok(audio)
			})
			.await
	}

	/// Returns `true` if a parsed sound effect is cached for `path`.
	pub fn contains(&self, path: &str) -> bool {
		self.loader.contains(&normalize_path(path))
	}

	/// Number of cached sound effects.
	pub fn len(&self) -> usize {
		self.loader.len()
	}

	/// Returns `true` if nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Drops every cached sound effect.
	pub fn clear(&self) {
		self.loader.clear();
	}
}

impl fmt::Debug for AudioCache {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AudioCache").field("len", &self.len()).finish_non_exhaustive()
	}
}
