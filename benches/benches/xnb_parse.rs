//! Benchmark suite for XNB sound effect parsing
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml --bench xnb_parse

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use miu_benches::{generate_test_xnb_ms_adpcm, generate_test_xnb_pcm};
use miu_types::file::xnb;
use std::hint::black_box;

/// Benchmark parsing of PCM and ADPCM payloads
fn bench_parse(c: &mut Criterion) {
	let mut group = c.benchmark_group("xnb_parse");

	// One second of 44.1 kHz stereo
	let pcm = generate_test_xnb_pcm(44100, 2, 44100);
	group.throughput(Throughput::Bytes(pcm.len() as u64));
	group.bench_with_input(BenchmarkId::new("pcm16", "1s_stereo"), &pcm, |b, data| {
		b.iter(|| black_box(xnb::parse(black_box(data))));
	});

	// About two seconds of 22 kHz mono
	let adpcm = generate_test_xnb_ms_adpcm(22050, 44);
	group.throughput(Throughput::Bytes(adpcm.len() as u64));
	group.bench_with_input(BenchmarkId::new("ms_adpcm", "2s_mono"), &adpcm, |b, data| {
		b.iter(|| black_box(xnb::parse(black_box(data))));
	});

	group.finish();
}

/// Benchmark WAV export of a parsed sound
fn bench_wav_export(c: &mut Criterion) {
	let mut group = c.benchmark_group("xnb_wav");

	let Ok(sound) = xnb::parse(&generate_test_xnb_pcm(44100, 2, 44100)) else {
		eprintln!("Warning: could not parse PCM fixture");
		return;
	};

	group.bench_function("to_wav_bytes", |b| {
		b.iter(|| black_box(black_box(&sound).to_wav_bytes()));
	});

	group.finish();
}

criterion_group!(benches, bench_parse, bench_wav_export);
criterion_main!(benches);
