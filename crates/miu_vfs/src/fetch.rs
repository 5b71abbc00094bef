use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Errors raised while retrieving raw resource bytes.
///
/// Cloneable so a single failed fetch can be reported to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
	/// No resource exists at the path
	#[error("resource not found: {path}")]
	NotFound {
		/// Requested path
		path: String,
	},

	/// The resource exists but could not be read
	#[error("failed to read {path}: {message}")]
	Io {
		/// Requested path
		path: String,
		/// Underlying error message
		message: String,
	},

	/// The path cannot be mapped onto the resource store
	#[error("invalid resource path `{path}`: {reason}")]
	InvalidPath {
		/// Requested path
		path: String,
		/// Why the path was refused
		reason: &'static str,
	},
}

impl FetchError {
	/// Returns the path the error refers to.
	pub fn path(&self) -> &str {
		match self {
			Self::NotFound {
				path,
			}
			| Self::Io {
				path,
				..
			}
			| Self::InvalidPath {
				path,
				..
			} => path,
		}
	}

	/// Returns `true` if the resource does not exist.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound { .. })
	}
}

/// Source of raw resource bytes.
///
/// Paths passed in are already canonical (see [`normalize_path`](crate::normalize_path)).
/// Implementations must be safe to call concurrently.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
	/// Retrieves the full contents of the resource at `path`.
	async fn fetch(&self, path: &str) -> Result<Bytes, FetchError>;
}
