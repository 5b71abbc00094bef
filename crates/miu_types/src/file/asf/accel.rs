//! Parallel ASF decoding.
//!
//! The accelerated path parses the header and frame table exactly like
//! [`PureDecoder`](super::PureDecoder) and then expands frames concurrently
//! on a dedicated `rayon` thread pool. The pool is owned by an
//! [`AcceleratedRuntime`], which must be bootstrapped before decoders can be
//! handed out.

use std::sync::Arc;

use log::info;
use parking_lot::Mutex;
use rayon::prelude::*;

use super::{AsfAsset, AsfDecode, Layout};
use crate::file::{DecodeError, RuntimeInitError};

/// Owner of the thread pool backing [`AcceleratedDecoder`].
///
/// Bootstrapping is idempotent: once the pool is up, later calls to
/// [`AcceleratedRuntime::init`] return immediately. A failed bootstrap leaves
/// the runtime uninitialized, so a later call may try again.
#[derive(Debug)]
pub struct AcceleratedRuntime {
	threads: usize,
	pool: Mutex<Option<Arc<rayon::ThreadPool>>>,
}

impl AcceleratedRuntime {
	/// Creates a runtime that will use `threads` workers; `0` lets `rayon` decide.
	pub fn new(threads: usize) -> Self {
		Self {
			threads,
			pool: Mutex::new(None),
		}
	}

	/// Brings the thread pool up if it is not running yet.
	///
	/// # Errors
	///
	/// Returns [`RuntimeInitError`] if the pool cannot be created.
	pub fn init(&self) -> Result<(), RuntimeInitError> {
		let mut pool = self.pool.lock();
		if pool.is_some() {
			return Ok(());
		}

		let built = rayon::ThreadPoolBuilder::new()
			.num_threads(self.threads)
			.thread_name(|index| format!("miu-asf-{index}"))
			.build()
			.map_err(|e| RuntimeInitError::new(e.to_string()))?;

		info!("accelerated ASF runtime ready with {} threads", built.current_num_threads());
		*pool = Some(Arc::new(built));
		Ok(())
	}

	/// Returns `true` once [`AcceleratedRuntime::init`] has succeeded.
	pub fn is_ready(&self) -> bool {
		self.pool.lock().is_some()
	}

	/// Returns a decoder bound to this runtime, bootstrapping it if needed.
	///
	/// # Errors
	///
	/// Returns [`RuntimeInitError`] if the runtime cannot be brought up.
	pub fn decoder(&self) -> Result<AcceleratedDecoder, RuntimeInitError> {
		self.init()?;
		let pool = self.pool.lock().clone().ok_or_else(|| RuntimeInitError::new("pool missing"))?;
		Ok(AcceleratedDecoder {
			pool,
		})
	}
}

impl Default for AcceleratedRuntime {
	fn default() -> Self {
		Self::new(0)
	}
}

/// ASF decoder that expands frames in parallel.
#[derive(Debug, Clone)]
pub struct AcceleratedDecoder {
	pool: Arc<rayon::ThreadPool>,
}

impl AcceleratedDecoder {
	/// Number of worker threads in the backing pool.
	pub fn threads(&self) -> usize {
		self.pool.current_num_threads()
	}
}

impl AsfDecode for AcceleratedDecoder {
	fn name(&self) -> &'static str {
		"accelerated"
	}

	fn decode(&self, data: &[u8]) -> Result<AsfAsset, DecodeError> {
		let layout = Layout::parse(data)?;
		let frames = self
			.pool
			.install(|| layout.spans.par_iter().map(|span| layout.decode_frame(data, *span)).collect());
		Ok(layout.into_asset(frames))
	}
}
