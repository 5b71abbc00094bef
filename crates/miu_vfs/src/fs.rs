use std::{
	io,
	path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use bytes::Bytes;
use log::trace;

use crate::{FetchError, ResourceFetcher};

/// Reads resources from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsFetcher {
	root: PathBuf,
}

impl FsFetcher {
	/// Creates a fetcher rooted at `root`.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			root: root.into(),
		}
	}

	/// Directory resources are resolved against.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Maps a game path onto the filesystem, refusing anything that would
	/// leave the root.
	pub fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
		let relative = Path::new(path);
		let mut resolved = self.root.clone();
		for component in relative.components() {
			match component {
				Component::Normal(part) => resolved.push(part),
				Component::CurDir => {}
				Component::ParentDir => {
					return Err(FetchError::InvalidPath {
						path: path.to_string(),
						reason: "parent directory segments are not allowed",
					});
				}
				Component::RootDir | Component::Prefix(_) => {
					return Err(FetchError::InvalidPath {
						path: path.to_string(),
						reason: "absolute paths are not allowed",
					});
				}
			}
		}
		Ok(resolved)
	}
}

#[async_trait]
impl ResourceFetcher for FsFetcher {
	async fn fetch(&self, path: &str) -> Result<Bytes, FetchError> {
		let file = self.resolve(path)?;
		trace!("reading {}", file.display());
		match tokio::fs::read(&file).await {
			Ok(data) => Ok(Bytes::from(data)),
			Err(e) if e.kind() == io::ErrorKind::NotFound => Err(FetchError::NotFound {
				path: path.to_string(),
			}),
			Err(e) => Err(FetchError::Io {
				path: path.to_string(),
				message: e.to_string(),
			}),
		}
	}
}
