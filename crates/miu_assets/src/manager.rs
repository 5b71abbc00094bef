use std::sync::Arc;

use log::info;
use miu_types::file::{AcceleratedRuntime, RuntimeInitError};
use miu_vfs::{FsFetcher, ResourceFetcher};

use crate::{
	AnimationInstance, AnimationOptions, AssetConfig, AssetError, AudioBufferBridge, AudioCache,
	AudioFormatFallback, DecodeCache, DecodedAnimation, MultiPathResolver, PlainAudio,
	PlaybackBuffer, Resolved, Surface, select_decoder,
};

/// Entry point of the asset pipeline.
///
/// Owns the caches and the decoder choice; everything handed out is either
/// shared and immutable (animations, sound effects) or owned by the caller
/// (animation instances, playback buffers).
///
/// # Examples
///
/// ```no_run
/// use std::time::Instant;
///
/// use miu_assets::{AnimationOptions, AssetConfig, AssetManager};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let manager = AssetManager::from_config(AssetConfig::default());
/// let animation = manager.load_animation("asf/effect/fire.asf").await?;
///
/// let mut instance = manager.create_animation_instance(&animation, AnimationOptions::looping());
/// instance.play(Instant::now());
/// // once per presented frame:
/// instance.tick(Instant::now());
/// let _surface = instance.current_surface();
/// # Ok(())
/// # }
/// ```
pub struct AssetManager {
	config: AssetConfig,
	runtime: Arc<AcceleratedRuntime>,
	animations: DecodeCache,
	audio: AudioCache,
	plain_audio: AudioFormatFallback,
}

impl AssetManager {
	/// Creates a manager reading through `fetcher`.
	///
	/// The decoder is chosen here: with `prefer_accelerated` the parallel
	/// runtime is brought up, falling back to the pure decoder on failure.
	pub fn new(fetcher: Arc<dyn ResourceFetcher>, config: AssetConfig) -> Self {
		let runtime = Arc::new(AcceleratedRuntime::new(config.accelerated_threads));
		let decoder = select_decoder(&runtime, config.prefer_accelerated);
		info!(
			"asset manager ready: {} decoder, cache capacity {}",
			decoder.name(),
			if config.cache_capacity == 0 { "unbounded".to_string() } else { config.cache_capacity.to_string() }
		);

		Self {
			animations: DecodeCache::new(Arc::clone(&fetcher), decoder, config.cache_capacity),
			audio: AudioCache::new(Arc::clone(&fetcher)),
			plain_audio: AudioFormatFallback::new(fetcher, config.audio.clone()),
			runtime,
			config,
		}
	}

	/// Creates a manager reading from `config.resource_root` on disk.
	pub fn from_config(config: AssetConfig) -> Self {
		let fetcher = Arc::new(FsFetcher::new(config.resource_root.clone()));
		Self::new(fetcher, config)
	}

	/// Brings the accelerated runtime up.
	///
	/// Idempotent. The decoder picked at construction is kept either way.
	///
	/// # Errors
	///
	/// Returns [`RuntimeInitError`] if the runtime cannot start.
	pub fn init_runtime(&self) -> Result<(), RuntimeInitError> {
		self.runtime.init()
	}

	/// Loads (or returns the cached) animation at `path`.
	///
	/// # Errors
	///
	/// See [`DecodeCache::get`].
	pub async fn load_animation(&self, path: &str) -> Result<Arc<DecodedAnimation>, AssetError> {
		self.animations.get(path).await
	}

	/// Loads the first of `paths` that decodes.
	///
	/// # Errors
	///
	/// See [`MultiPathResolver::resolve`].
	pub async fn load_animation_any<S: AsRef<str>>(&self, paths: &[S]) -> Result<Resolved, AssetError> {
		MultiPathResolver::new(&self.animations).resolve(paths).await
	}

	/// Creates an idle playback cursor over `animation`.
	pub fn create_animation_instance(
		&self,
		animation: &Arc<DecodedAnimation>,
		options: AnimationOptions,
	) -> AnimationInstance {
		AnimationInstance::new(Arc::clone(animation), options, self.config.default_interval())
	}

	/// RGBA surface of frame `index`, or `None` if out of range.
	pub fn get_surface(&self, animation: &DecodedAnimation, index: usize) -> Option<Surface> {
		animation.surface(index)
	}

	/// Loads the XNB sound effect at `path` and returns a stopped buffer over it.
	///
	/// # Errors
	///
	/// See [`AudioCache::get`].
	pub async fn load_audio(&self, path: &str) -> Result<PlaybackBuffer, AssetError> {
		let container = self.audio.get(path).await?;
		Ok(AudioBufferBridge::to_playable(&container))
	}

	/// Locates plain audio, preferring the compressed sibling.
	///
	/// # Errors
	///
	/// See [`AudioFormatFallback::resolve`].
	pub async fn resolve_plain_audio(&self, path: &str) -> Result<PlainAudio, AssetError> {
		self.plain_audio.resolve(path).await
	}

	/// Drops every cached animation and sound effect.
	pub fn clear_cache(&self) {
		self.animations.clear();
		self.audio.clear();
	}

	/// The animation cache.
	pub fn animations(&self) -> &DecodeCache {
		&self.animations
	}

	/// The sound effect cache.
	pub fn audio(&self) -> &AudioCache {
		&self.audio
	}

	/// Active configuration.
	pub fn config(&self) -> &AssetConfig {
		&self.config
	}
}

impl std::fmt::Debug for AssetManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AssetManager")
			.field("animations", &self.animations)
			.field("audio", &self.audio)
			.field("runtime_ready", &self.runtime.is_ready())
			.finish_non_exhaustive()
	}
}
