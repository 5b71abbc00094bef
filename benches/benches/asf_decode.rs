//! Benchmark suite for ASF sprite decoding
//!
//! Compares the sequential and the thread-pool decoder on synthetic sprite
//! sheets and measures header parsing and RGBA expansion on their own.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench asf_decode

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use miu_benches::{generate_test_asf_data, sizes};
use miu_types::file::asf::{AcceleratedRuntime, AsfDecode, AsfHeader, PureDecoder};
use std::hint::black_box;

/// Benchmark both decoders across sprite sizes
fn bench_decoders(c: &mut Criterion) {
	let mut group = c.benchmark_group("asf_decode");

	let runtime = AcceleratedRuntime::default();
	let accelerated = match runtime.decoder() {
		Ok(decoder) => Some(decoder),
		Err(e) => {
			eprintln!("Warning: accelerated runtime unavailable: {e}");
			None
		}
	};

	for (name, (width, height)) in [("small", sizes::SMALL), ("medium", sizes::MEDIUM), ("large", sizes::LARGE)] {
		let data = generate_test_asf_data(width, height, sizes::FRAMES_PER_DIRECTION, sizes::DIRECTIONS);
		let pixels = u64::from(width * height * sizes::FRAMES_PER_DIRECTION * sizes::DIRECTIONS);
		group.throughput(Throughput::Elements(pixels));

		group.bench_with_input(BenchmarkId::new("pure", name), &data, |b, data| {
			b.iter(|| black_box(PureDecoder.decode(black_box(data))));
		});

		if let Some(decoder) = &accelerated {
			group.bench_with_input(BenchmarkId::new("accelerated", name), &data, |b, data| {
				b.iter(|| black_box(decoder.decode(black_box(data))));
			});
		}
	}

	group.finish();
}

/// Benchmark header parsing separately
fn bench_header_parsing(c: &mut Criterion) {
	let mut group = c.benchmark_group("asf_header");

	let (width, height) = sizes::MEDIUM;
	let data = generate_test_asf_data(width, height, sizes::FRAMES_PER_DIRECTION, sizes::DIRECTIONS);

	group.bench_function("parse_header", |b| {
		b.iter(|| black_box(AsfHeader::from_bytes(black_box(&data))));
	});

	group.finish();
}

/// Benchmark palette expansion of decoded frames to RGBA
fn bench_rgba_expansion(c: &mut Criterion) {
	let mut group = c.benchmark_group("asf_rgba");

	for (name, (width, height)) in [("medium", sizes::MEDIUM), ("large", sizes::LARGE)] {
		let data = generate_test_asf_data(width, height, 1, 1);
		let Ok(asset) = PureDecoder.decode(&data) else {
			eprintln!("Warning: could not decode {name} fixture");
			continue;
		};

		group.throughput(Throughput::Elements(u64::from(width * height)));
		group.bench_with_input(BenchmarkId::new("frame_rgba", name), &asset, |b, asset| {
			b.iter(|| black_box(asset.frame_rgba(black_box(0))));
		});
	}

	group.finish();
}

criterion_group!(benches, bench_decoders, bench_header_parsing, bench_rgba_expansion);
criterion_main!(benches);
