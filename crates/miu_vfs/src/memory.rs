use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::{Mutex, RwLock};

use crate::{FetchError, ResourceFetcher, normalize_path};

/// In-memory resource store.
///
/// Keys are canonicalized on insert and lookup. Every request is recorded,
/// which makes the fetcher handy for asserting how often a path was read.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
	entries: RwLock<HashMap<String, Bytes>>,
	requests: Mutex<Vec<String>>,
	latency: Option<Duration>,
}

impl MemoryFetcher {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Delays every fetch by `latency`.
	pub fn with_latency(mut self, latency: Duration) -> Self {
		self.latency = Some(latency);
		self
	}

	/// Adds or replaces a resource.
	pub fn insert(&self, path: &str, data: impl Into<Bytes>) {
		self.entries.write().insert(normalize_path(path), data.into());
	}

	/// Removes a resource, returning its bytes.
	pub fn remove(&self, path: &str) -> Option<Bytes> {
		self.entries.write().remove(&normalize_path(path))
	}

	/// Every path requested so far, in order.
	pub fn requests(&self) -> Vec<String> {
		self.requests.lock().clone()
	}

	/// Number of times `path` was requested.
	pub fn request_count(&self, path: &str) -> usize {
		let path = normalize_path(path);
		self.requests.lock().iter().filter(|p| **p == path).count()
	}

	/// Total number of requests.
	pub fn total_requests(&self) -> usize {
		self.requests.lock().len()
	}
}

#[async_trait]
impl ResourceFetcher for MemoryFetcher {
	async fn fetch(&self, path: &str) -> Result<Bytes, FetchError> {
		let path = normalize_path(path);
		self.requests.lock().push(path.clone());

		match self.latency {
			Some(latency) => tokio::time::sleep(latency).await,
			None => tokio::task::yield_now().await,
		}

		self.entries.read().get(&path).cloned().ok_or(FetchError::NotFound {
			path,
		})
	}
}
