//! Audio loading and playback buffers.
//!
//! Two paths exist: XNB SoundEffects are parsed into shared
//! [`XnbAudioContainer`](miu_types::file::XnbAudioContainer)s and played
//! through [`PlaybackBuffer`]s, while plain audio files are located through
//! [`AudioFormatFallback`] and handed to the host as bytes.

mod bridge;
mod cache;
mod fallback;

pub use bridge::{AudioBufferBridge, BufferState, PlaybackBuffer};
pub use cache::AudioCache;
pub use fallback::{AudioFormatFallback, PlainAudio};
