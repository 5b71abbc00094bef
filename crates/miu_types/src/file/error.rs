//! Error types for asset decoding.

use std::fmt::Display;

use thiserror::Error;

/// Container formats a [`DecodeError`] can originate from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// `.ASF` sprite-sheet animation
	Asf,
	/// `.XNB` content package
	Xnb,
	/// RIFF `.WAV` audio
	Wav,
	/// Ogg `.OGG` audio
	Ogg,
}

impl Display for FileType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			FileType::Asf => write!(f, "ASF"),
			FileType::Xnb => write!(f, "XNB"),
			FileType::Wav => write!(f, "WAV"),
			FileType::Ogg => write!(f, "OGG"),
		}
	}
}

/// Errors raised while decoding a malformed, truncated or unsupported asset.
///
/// Decode errors are plain values: they are cheap to clone so that a single
/// failed decode can be reported to every consumer waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
	/// Not enough data to parse
	#[error("{file_type}: insufficient data, expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Format being decoded
		file_type: FileType,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Signature bytes do not match the format
	#[error("{file_type}: invalid signature {actual:02X?}, expected {expected:02X?}")]
	InvalidMagic {
		/// Format being decoded
		file_type: FileType,
		/// Expected signature
		expected: Vec<u8>,
		/// Signature found in the data
		actual: Vec<u8>,
	},

	/// A header field holds a value the format does not allow
	#[error("{file_type}: invalid header field `{field}`: {message}")]
	InvalidHeader {
		/// Format being decoded
		file_type: FileType,
		/// Name of the offending field
		field: &'static str,
		/// Description of the problem
		message: String,
	},

	/// The declared frame table does not agree with the data
	#[error("{file_type}: inconsistent frame table: {message}")]
	InconsistentFrameTable {
		/// Format being decoded
		file_type: FileType,
		/// Description of the inconsistency
		message: String,
	},

	/// Unsupported container version
	#[error("{file_type}: unsupported version {version}")]
	UnsupportedVersion {
		/// Format being decoded
		file_type: FileType,
		/// Version found in the data
		version: u8,
	},

	/// The payload is compressed with an algorithm we cannot expand
	#[error("{file_type}: unsupported compression `{compression}`")]
	UnsupportedCompression {
		/// Format being decoded
		file_type: FileType,
		/// Compression name
		compression: &'static str,
	},

	/// The embedded content is not an audio payload we understand
	#[error("{file_type}: unsupported content reader `{reader}`")]
	UnsupportedReader {
		/// Format being decoded
		file_type: FileType,
		/// Reader type name found in the data
		reader: String,
	},

	/// The sample encoding is not supported
	#[error("{file_type}: unsupported sample encoding (format tag 0x{format_tag:04X}, {bits_per_sample} bits)")]
	UnsupportedEncoding {
		/// Format being decoded
		file_type: FileType,
		/// `WAVEFORMATEX` format tag
		format_tag: u16,
		/// Declared bits per sample
		bits_per_sample: u16,
	},

	/// Compressed payload failed to expand
	#[error("{file_type}: decompression failed: {message}")]
	Decompression {
		/// Format being decoded
		file_type: FileType,
		/// Underlying error message
		message: String,
	},
}

impl DecodeError {
	/// Creates an [`DecodeError::InsufficientData`] error.
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Creates an [`DecodeError::InconsistentFrameTable`] error.
	pub fn frame_table(file_type: FileType, message: impl Into<String>) -> Self {
		Self::InconsistentFrameTable {
			file_type,
			message: message.into(),
		}
	}

	/// Creates an [`DecodeError::InvalidHeader`] error.
	pub fn invalid_header(
		file_type: FileType,
		field: &'static str,
		message: impl Into<String>,
	) -> Self {
		Self::InvalidHeader {
			file_type,
			field,
			message: message.into(),
		}
	}

	/// Returns the format the error originated from.
	pub fn file_type(&self) -> FileType {
		match self {
			Self::InsufficientData {
				file_type,
				..
			}
			| Self::InvalidMagic {
				file_type,
				..
			}
			| Self::InvalidHeader {
				file_type,
				..
			}
			| Self::InconsistentFrameTable {
				file_type,
				..
			}
			| Self::UnsupportedVersion {
				file_type,
				..
			}
			| Self::UnsupportedCompression {
				file_type,
				..
			}
			| Self::UnsupportedReader {
				file_type,
				..
			}
			| Self::UnsupportedEncoding {
				file_type,
				..
			}
			| Self::Decompression {
				file_type,
				..
			} => *file_type,
		}
	}
}

/// The accelerated decode runtime could not be brought up.
///
/// Recoverable: callers fall back to the pure decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("accelerated runtime failed to initialize: {message}")]
pub struct RuntimeInitError {
	/// Underlying error message
	pub message: String,
}

impl RuntimeInitError {
	/// Creates a new runtime init error.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_messages_are_readable() {
		let err = DecodeError::insufficient_data(FileType::Xnb, 10, 4);
		assert_eq!(err.to_string(), "XNB: insufficient data, expected 10 bytes, got 4 bytes");
		assert_eq!(err.file_type(), FileType::Xnb);

		let err = DecodeError::UnsupportedVersion {
			file_type: FileType::Xnb,
			version: 9,
		};
		assert_eq!(err.to_string(), "XNB: unsupported version 9");
	}
}
