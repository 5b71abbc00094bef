use std::{fmt, ops::Deref, sync::Arc};

use log::{debug, info};
use miu_types::file::{AsfAsset, AsfDecode};
use miu_vfs::{ResourceFetcher, normalize_path};

use super::{FrameSurfaceCache, Surface};
use crate::{
	AssetError,
	loader::{SharedLoader, run_blocking},
};

/// A decoded animation as held by the [`DecodeCache`].
///
/// Dereferences to the underlying [`AsfAsset`]. Shared read-only between all
/// consumers; RGBA surfaces are derived lazily and memoized here.
#[derive(Debug)]
pub struct DecodedAnimation {
	path: String,
	asset: AsfAsset,
	surfaces: FrameSurfaceCache,
}

impl DecodedAnimation {
	/// Wraps a decoded asset.
	pub fn new(path: impl Into<String>, asset: AsfAsset) -> Self {
		let surfaces = FrameSurfaceCache::new(asset.frames().len());
		Self {
			path: path.into(),
			asset,
			surfaces,
		}
	}

	/// Canonical path the animation was loaded from.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// The decoded asset.
	pub fn asset(&self) -> &AsfAsset {
		&self.asset
	}

	/// RGBA surface for frame `index`, or `None` if out of range.
	pub fn surface(&self, index: usize) -> Option<Surface> {
		self.surfaces.get_surface(&self.asset, index)
	}

	/// The per-frame surface cache.
	pub fn surfaces(&self) -> &FrameSurfaceCache {
		&self.surfaces
	}
}

impl Deref for DecodedAnimation {
	type Target = AsfAsset;

	fn deref(&self) -> &Self::Target {
		&self.asset
	}
}

/// Canonical path to decoded animation cache.
///
/// For any path there is at most one fetch+decode running at a time, and all
/// callers observe the same [`Arc`]. Failures are reported to the callers
/// waiting at the time and are not cached, so a later call retries.
pub struct DecodeCache {
	fetcher: Arc<dyn ResourceFetcher>,
	decoder: Arc<dyn AsfDecode>,
	loader: SharedLoader<DecodedAnimation>,
}

impl DecodeCache {
	/// Creates a cache keeping at most `capacity` animations (`0` for no limit).
	pub fn new(fetcher: Arc<dyn ResourceFetcher>, decoder: Arc<dyn AsfDecode>, capacity: usize) -> Self {
		Self {
			fetcher,
			decoder,
			loader: SharedLoader::new(capacity),
		}
	}

	/// Returns the animation at `path`, fetching and decoding it if needed.
	///
	/// # Errors
	///
	/// Returns [`AssetError::Fetch`] if the bytes cannot be retrieved and
	/// [`AssetError::Decode`] if they are not a valid ASF file.
	pub async fn get(&self, path: &str) -> Result<Arc<DecodedAnimation>, AssetError> {
		let key = normalize_path(path);
		let fetcher = Arc::clone(&self.fetcher);
		let decoder = Arc::clone(&self.decoder);

		self.loader
			.get_or_load(&key, move |key| async move {
				let data = fetcher.fetch(&key).await?;
				let name = decoder.name();
				let asset = run_blocking(&key, move || decoder.decode(&data))
					.await?
					.map_err(|e| AssetError::decode(&key, e))?;
				debug!("decoded {key} with {name} decoder: {asset}");
				Ok(DecodedAnimation::new(key, asset))
			})
			.await
	}

	/// Returns the cached animation at `path` without loading it.
	pub fn cached(&self, path: &str) -> Option<Arc<DecodedAnimation>> {
		self.loader.cached(&normalize_path(path))
	}

	/// Returns `true` if a decoded animation is cached for `path`.
	pub fn contains(&self, path: &str) -> bool {
		self.loader.contains(&normalize_path(path))
	}

	/// Number of cached animations.
	pub fn len(&self) -> usize {
		self.loader.len()
	}

	/// Returns `true` if nothing is cached.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Number of decodes currently running.
	pub fn in_flight_len(&self) -> usize {
		self.loader.in_flight_len()
	}

	/// Name of the decoder in use.
	pub fn decoder_name(&self) -> &'static str {
		self.decoder.name()
	}

	/// Drops every cached animation.
	///
	/// Animations still referenced by consumers stay alive until released.
	pub fn clear(&self) {
		info!("clearing {} cached animations", self.len());
		self.loader.clear();
	}
}

impl fmt::Debug for DecodeCache {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DecodeCache")
			.field("decoder", &self.decoder.name())
			.field("len", &self.len())
			.field("in_flight", &self.in_flight_len())
			.finish_non_exhaustive()
	}
}
