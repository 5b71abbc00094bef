use miu_types::file::DecodeError;
use miu_vfs::FetchError;
use thiserror::Error;

/// Errors surfaced by the asset pipeline.
///
/// Cloneable: one failed load is reported to every consumer awaiting it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
	/// The raw bytes could not be retrieved
	#[error(transparent)]
	Fetch(#[from] FetchError),

	/// The bytes were retrieved but are not a valid asset
	#[error("failed to decode {path}: {source}")]
	Decode {
		/// Canonical path of the asset
		path: String,
		/// Decoder failure
		#[source]
		source: DecodeError,
	},

	/// The worker running the load panicked or was shut down
	#[error("loading {path} was interrupted: {reason}")]
	Interrupted {
		/// Canonical path of the asset
		path: String,
		/// Why the worker stopped
		reason: String,
	},

	/// Every candidate path failed
	#[error("all {attempts} candidate paths failed{}", .last.as_ref().map(|e| format!(", last error: {e}")).unwrap_or_default())]
	AllCandidatesFailed {
		/// Number of candidates tried
		attempts: usize,
		/// Failure of the last candidate, `None` for an empty candidate list
		last: Option<Box<AssetError>>,
	},
}

impl AssetError {
	/// Creates an [`AssetError::Decode`] error.
	pub fn decode(path: impl Into<String>, source: DecodeError) -> Self {
		Self::Decode {
			path: path.into(),
			source,
		}
	}

	/// Returns `true` if the asset does not exist at all.
	pub fn is_not_found(&self) -> bool {
		match self {
			Self::Fetch(e) => e.is_not_found(),
			Self::AllCandidatesFailed {
				last,
				..
			} => last.as_ref().is_some_and(|e| e.is_not_found()),
			Self::Decode {
				..
			}
			| Self::Interrupted {
				..
			} => false,
		}
	}
}
