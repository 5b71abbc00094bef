//! Keyed, de-duplicated asynchronous loading.
//!
//! A [`SharedLoader`] guarantees that at most one load per key is running at
//! any time and that every caller asking for the key while it runs observes
//! the very same result. Successful values are cached; failures are not.
//!
//! Loads run as their own `tokio` tasks, so they finish even when every
//! caller has stopped waiting. Callers must therefore be inside a `tokio`
//! runtime.

use std::{collections::HashMap, future::Future, num::NonZeroUsize, sync::Arc};

use futures::{
	FutureExt,
	future::{BoxFuture, Shared},
};
use log::{trace, warn};
use lru::LruCache;
use parking_lot::Mutex;

use crate::AssetError;

type SharedLoad<V> = Shared<BoxFuture<'static, Result<Arc<V>, AssetError>>>;

struct LoaderState<V> {
	entries: LruCache<String, Arc<V>>,
	in_flight: HashMap<String, SharedLoad<V>>,
	/// Bumped by `clear`; loads started before a clear do not populate the cache
	generation: u64,
}

/// Cache plus in-flight registry for values of type `V`.
pub(crate) struct SharedLoader<V> {
	state: Arc<Mutex<LoaderState<V>>>,
}

impl<V: Send + Sync + 'static> SharedLoader<V> {
	/// Creates a loader keeping at most `capacity` values, `0` for no limit.
	pub fn new(capacity: usize) -> Self {
		let entries = match NonZeroUsize::new(capacity) {
			Some(capacity) => LruCache::new(capacity),
			None => LruCache::unbounded(),
		};
		Self {
			state: Arc::new(Mutex::new(LoaderState {
				entries,
				in_flight: HashMap::new(),
				generation: 0,
			})),
		}
	}

	/// Returns the cached value for `key`, if any.
	pub fn cached(&self, key: &str) -> Option<Arc<V>> {
		self.state.lock().entries.get(key).cloned()
	}

	pub fn contains(&self, key: &str) -> bool {
		self.state.lock().entries.contains(key)
	}

	pub fn len(&self) -> usize {
		self.state.lock().entries.len()
	}

	pub fn in_flight_len(&self) -> usize {
		self.state.lock().in_flight.len()
	}

	/// Drops every cached value and forgets running loads.
	///
	/// Callers already awaiting a load still receive its result.
	pub fn clear(&self) {
		let mut state = self.state.lock();
		state.entries.clear();
		state.in_flight.clear();
		state.generation += 1;
	}

	/// Returns the value for `key`, running `load` only if the key is neither
	/// cached nor already loading.
	///
	/// The load runs detached from any single caller: dropping the returned
	/// future only stops this caller from observing it. The load stays
	/// registered and is driven by whichever caller awaits the key next.
	pub async fn get_or_load<F, Fut>(&self, key: &str, load: F) -> Result<Arc<V>, AssetError>
	where
		F: FnOnce(String) -> Fut,
		Fut: Future<Output = Result<V, AssetError>> + Send + 'static,
	{
		let pending = {
			let mut state = self.state.lock();
			if let Some(value) = state.entries.get(key) {
				return Ok(Arc::clone(value));
			}
			match state.in_flight.get(key) {
				Some(pending) => {
					trace!("joining in-flight load of {key}");
					pending.clone()
				}
				None => {
					let pending = self.start(key.to_string(), state.generation, load(key.to_string()));
					state.in_flight.insert(key.to_string(), pending.clone());
					pending
				}
			}
		};

		pending.await
	}

	fn start<Fut>(&self, key: String, generation: u64, load: Fut) -> SharedLoad<V>
	where
		Fut: Future<Output = Result<V, AssetError>> + Send + 'static,
	{
		let state = Arc::clone(&self.state);
		let task_key = key.clone();
		let task = tokio::spawn(async move {
			let result = load.await.map(Arc::new);

			let mut state = state.lock();
			if state.generation == generation {
				state.in_flight.remove(&task_key);
				if let Ok(value) = &result {
					state.entries.put(task_key, Arc::clone(value));
				}
			}
			result
		});

		async move {
			task.await.unwrap_or_else(|e| {
				warn!("load of {key} did not finish: {e}");
				Err(AssetError::Interrupted {
					path: key,
					reason: e.to_string(),
				})
			})
		}
		.boxed()
		.shared()
	}
}

/// Runs the CPU-bound step of a load on the blocking thread pool.
///
/// Keeps decoding off the executor threads that drive rendering and other
/// loads.
pub(crate) async fn run_blocking<T, F>(key: &str, work: F) -> Result<T, AssetError>
where
	T: Send + 'static,
	F: FnOnce() -> T + Send + 'static,
{
	tokio::task::spawn_blocking(work).await.map_err(|e| AssetError::Interrupted {
		path: key.to_string(),
		reason: e.to_string(),
	})
}
