//! Asynchronous asset pipeline for `miu2d-rs`.
//!
//! Sits between a [`ResourceFetcher`](miu_vfs::ResourceFetcher) and the game
//! client: fetches raw bytes, decodes them once per canonical path, shares the
//! result between every consumer and hands out per-consumer playback state.
//!
//! - [`DecodeCache`]: de-duplicated, cached ASF decodes
//! - [`FrameSurfaceCache`]: lazily derived RGBA surfaces per frame
//! - [`AnimationInstance`]: per-consumer frame scheduling
//! - [`MultiPathResolver`]: first-success lookup over candidate paths
//! - [`AudioBufferBridge`] and [`AudioFormatFallback`]: audio playback and plain audio lookup
//! - [`AssetManager`]: the facade tying them together

pub mod animation;
pub mod audio;
mod config;
mod decoder;
mod error;
mod loader;
mod manager;
mod resolver;

pub use animation::{
	AnimationInstance, AnimationOptions, DecodeCache, DecodedAnimation, FrameSurfaceCache,
	PlaybackState, Surface,
};
pub use audio::{
	AudioBufferBridge, AudioCache, AudioFormatFallback, BufferState, PlainAudio, PlaybackBuffer,
};
pub use config::{AssetConfig, AudioConfig};
pub use decoder::select_decoder;
pub use error::AssetError;
pub use manager::AssetManager;
pub use resolver::{MultiPathResolver, Resolved};
