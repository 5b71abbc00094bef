#![allow(dead_code)]

use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
		mpsc,
	},
	time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use miu_assets::{AssetConfig, DecodeCache};
use miu_types::file::{AsfAsset, AsfBuilder, AsfDecode, DecodeError, FileType, PureDecoder, XnbBuilder};
use miu_vfs::{FetchError, MemoryFetcher, ResourceFetcher};
use tokio::sync::watch;

/// A sprite sheet with `frames` 4x2 frames split over `directions` facings.
pub fn sprite(frames: usize, directions: u32) -> Vec<u8> {
	let palette: Vec<[u8; 4]> = (0..16u8).map(|i| [i * 16, 255 - i * 16, i, 255]).collect();
	let mut builder = AsfBuilder::new(4, 2).directions(directions).interval(100).palette(&palette);
	for frame in 0..frames {
		let pixels = (0..8).flat_map(|i| [((i + frame) % 16) as u8, if i % 3 == 0 { 0 } else { 255 }]).collect();
		builder = builder.frame(pixels);
	}
	builder.build().expect("valid sprite")
}

/// A mono 8 kHz SoundEffect.
pub fn sound(samples: &[i16]) -> Vec<u8> {
	XnbBuilder::pcm16(8000, 1, samples).build().expect("valid sound")
}

/// A minimal valid WAV file.
pub fn wav() -> Vec<u8> {
	let spec = hound::WavSpec {
		channels: 1,
		sample_rate: 8000,
		bits_per_sample: 16,
		sample_format: hound::SampleFormat::Int,
	};
	let mut cursor = std::io::Cursor::new(Vec::new());
	let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav header");
	writer.write_sample(0i16).expect("wav sample");
	writer.finalize().expect("wav finalize");
	cursor.into_inner()
}

/// Test configuration: pure decoder, no capacity limit.
pub fn config() -> AssetConfig {
	AssetConfig {
		prefer_accelerated: false,
		..AssetConfig::default()
	}
}

/// Pure decoder that counts its invocations.
#[derive(Debug, Default)]
pub struct CountingDecoder {
	calls: AtomicUsize,
}

impl CountingDecoder {
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl AsfDecode for CountingDecoder {
	fn name(&self) -> &'static str {
		"counting"
	}

	fn decode(&self, data: &[u8]) -> Result<AsfAsset, DecodeError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		PureDecoder.decode(data)
	}
}

/// Decoder that blocks its thread until released, like a decode of a huge sheet.
pub struct HeldDecoder {
	release: parking_lot::Mutex<mpsc::Receiver<()>>,
}

impl HeldDecoder {
	pub fn new() -> (mpsc::Sender<()>, Self) {
		let (tx, rx) = mpsc::channel();
		(
			tx,
			Self {
				release: parking_lot::Mutex::new(rx),
			},
		)
	}
}

impl AsfDecode for HeldDecoder {
	fn name(&self) -> &'static str {
		"held"
	}

	fn decode(&self, data: &[u8]) -> Result<AsfAsset, DecodeError> {
		// Only a task running beside this decode can release it
		if self.release.lock().recv_timeout(Duration::from_secs(5)).is_err() {
			return Err(DecodeError::invalid_header(FileType::Asf, "release", "decoder was never released"));
		}
		PureDecoder.decode(data)
	}
}

/// Fetcher that holds every request until the gate is opened.
pub struct GatedFetcher {
	pub inner: MemoryFetcher,
	gate: watch::Sender<bool>,
}

impl GatedFetcher {
	pub fn new() -> Self {
		Self {
			inner: MemoryFetcher::new(),
			gate: watch::Sender::new(false),
		}
	}

	pub fn open(&self) {
		self.gate.send_replace(true);
	}
}

#[async_trait]
impl ResourceFetcher for GatedFetcher {
	async fn fetch(&self, path: &str) -> Result<Bytes, FetchError> {
		let mut rx = self.gate.subscribe();
		// the sender lives as long as self, so this only fails if the gate is dropped
		let _ = rx.wait_for(|open| *open).await;
		self.inner.fetch(path).await
	}
}

/// A decode cache over an in-memory store with a counting decoder.
pub fn counting_cache() -> (Arc<MemoryFetcher>, Arc<CountingDecoder>, DecodeCache) {
	let fetcher = Arc::new(MemoryFetcher::new());
	let decoder = Arc::new(CountingDecoder::default());
	let cache = DecodeCache::new(fetcher.clone(), decoder.clone(), 0);
	(fetcher, decoder, cache)
}
