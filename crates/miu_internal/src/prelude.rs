//! Prelude module for `miu_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use miu_internal::prelude::*;
//!
//! let data = AsfBuilder::new(1, 1).palette(&[[0, 0, 0, 255]]).frame(vec![0, 255]).build().unwrap();
//! let asset = PureDecoder.decode(&data).unwrap();
//! assert_eq!(asset.frame_count(), 1);
//!
//! assert_eq!(normalize_path("ASF\\Effect.ASF"), "asf/effect.asf");
//! ```

// Re-export everything from miu_types::prelude
#[doc(inline)]
pub use miu_types::prelude::*;

#[doc(inline)]
pub use miu_vfs::{FetchError, FsFetcher, MemoryFetcher, ResourceFetcher, normalize_path};

#[doc(inline)]
pub use miu_assets::{
	AnimationInstance, AnimationOptions, AssetConfig, AssetError, AssetManager, AudioBufferBridge,
	AudioFormatFallback, BufferState, DecodeCache, DecodedAnimation, MultiPathResolver, PlainAudio,
	PlaybackBuffer, PlaybackState, Resolved, Surface,
};
