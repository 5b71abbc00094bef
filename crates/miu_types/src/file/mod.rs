//! File type support for `miu2d-rs` project.

mod error;

pub mod asf;
pub mod xnb;

// Re-export unified error types
pub use error::{DecodeError, FileType, RuntimeInitError};

// Re-export main file types
pub use asf::{
	AcceleratedDecoder, AcceleratedRuntime, AsfAsset, AsfBuilder, AsfDecode, AsfHeader,
	FrameRecord, Palette, PureDecoder,
};
pub use xnb::{PcmFormat, SampleEncoding, WaveFormat, XnbAudioContainer, XnbBuilder};
