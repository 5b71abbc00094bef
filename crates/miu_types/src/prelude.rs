//! Prelude module for `miu_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use miu_types::prelude::*;
//!
//! let decoder = PureDecoder;
//! assert_eq!(decoder.name(), "pure");
//! ```

#[doc(inline)]
pub use crate::file::{
	// ASF types
	AcceleratedDecoder,
	AcceleratedRuntime,
	AsfAsset,
	AsfBuilder,
	AsfDecode,
	AsfHeader,
	// Errors
	DecodeError,
	FileType,
	FrameRecord,
	Palette,
	PcmFormat,
	PureDecoder,
	RuntimeInitError,
	SampleEncoding,
	// XNB types
	XnbAudioContainer,
	XnbBuilder,
};

// Re-export the format modules for advanced usage
#[doc(inline)]
pub use crate::file::{asf, xnb};
