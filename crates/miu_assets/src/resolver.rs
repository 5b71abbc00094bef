use std::sync::Arc;

use log::debug;

use crate::{AssetError, DecodeCache, DecodedAnimation};

/// Result of [`MultiPathResolver::resolve`].
#[derive(Debug, Clone)]
pub struct Resolved {
	/// The decoded animation
	pub animation: Arc<DecodedAnimation>,
	/// The candidate that succeeded, as it was passed in
	pub resolved_path: String,
}

/// Tries candidate paths in order until one decodes.
///
/// Legacy resource tables name the same logical sprite under more than one
/// directory convention. Candidates are tried one at a time, so the common
/// first-candidate hit costs a single fetch.
#[derive(Debug, Clone, Copy)]
pub struct MultiPathResolver<'a> {
	cache: &'a DecodeCache,
}

impl<'a> MultiPathResolver<'a> {
	/// Creates a resolver loading through `cache`.
	pub fn new(cache: &'a DecodeCache) -> Self {
		Self {
			cache,
		}
	}

	/// Returns the first candidate that loads.
	///
	/// # Errors
	///
	/// Returns [`AssetError::AllCandidatesFailed`] carrying the last failure
	/// when no candidate loads, or no failure for an empty list.
	pub async fn resolve<S: AsRef<str>>(&self, candidates: &[S]) -> Result<Resolved, AssetError> {
		let mut last = None;
		for candidate in candidates {
			let candidate = candidate.as_ref();
			match self.cache.get(candidate).await {
				Ok(animation) => {
					return Ok(Resolved {
						animation,
						resolved_path: candidate.to_string(),
					});
				}
				Err(e) => {
					debug!("candidate {candidate} failed: {e}");
					last = Some(e);
				}
			}
		}

		Err(AssetError::AllCandidatesFailed {
			attempts: candidates.len(),
			last: last.map(Box::new),
		})
	}
}
