use std::sync::{
	Arc, OnceLock,
	atomic::{AtomicUsize, Ordering},
};

use image::RgbaImage;
use log::{trace, warn};
use miu_types::file::AsfAsset;

/// Render-ready RGBA frame, shared by every consumer of the animation.
pub type Surface = Arc<RgbaImage>;

/// Lazily converted RGBA surfaces for the frames of one animation.
///
/// A frame is converted the first time it is asked for and never again;
/// concurrent first requests wait for a single conversion.
#[derive(Debug)]
pub struct FrameSurfaceCache {
	slots: Vec<OnceLock<Option<Surface>>>,
	conversions: AtomicUsize,
}

impl FrameSurfaceCache {
	/// Creates an empty cache for `frame_count` frames.
	pub fn new(frame_count: usize) -> Self {
		Self {
			slots: (0..frame_count).map(|_| OnceLock::new()).collect(),
			conversions: AtomicUsize::new(0),
		}
	}

	/// Returns the surface of frame `index`, converting it on first use.
	///
	/// Out-of-range indices return `None`.
	pub fn get_surface(&self, asset: &AsfAsset, index: usize) -> Option<Surface> {
		let slot = self.slots.get(index)?;
		slot.get_or_init(|| self.convert(asset, index)).clone()
	}

	fn convert(&self, asset: &AsfAsset, index: usize) -> Option<Surface> {
		self.conversions.fetch_add(1, Ordering::Relaxed);
		let frame = asset.frame(index)?;
		trace!("converting frame {index} ({}x{})", frame.width(), frame.height());
		match RgbaImage::from_raw(frame.width(), frame.height(), frame.to_rgba(asset.palette())) {
			Some(image) => Some(Arc::new(image)),
			None => {
				warn!("frame {index} does not fill a {}x{} surface", frame.width(), frame.height());
				None
			}
		}
	}

	/// Number of frames converted so far.
	pub fn conversions(&self) -> usize {
		self.conversions.load(Ordering::Relaxed)
	}

	/// Number of frames this cache covers.
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	/// Returns `true` if the animation has no frames.
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}
}
