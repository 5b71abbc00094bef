//! Sprite animation loading and playback.

mod cache;
mod scheduler;
mod surface;

pub use cache::{DecodeCache, DecodedAnimation};
pub use scheduler::{AnimationInstance, AnimationOptions, PlaybackState};
pub use surface::{FrameSurfaceCache, Surface};
