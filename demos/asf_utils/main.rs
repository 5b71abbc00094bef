//! ASF / XNB asset utility.
//!
//! Provides four subcommands:
//! - `inspect`: print the header and per-direction frame statistics of one `.ASF` file.
//! - `export`: write every frame of an `.ASF` file as a PNG image.
//! - `validate`: decode every `.ASF` and `.XNB` file under a directory.
//! - `xnb`: describe one `.XNB` sound effect and optionally convert it to WAV.

use std::{
	fs,
	path::{Path, PathBuf},
	time::Instant,
};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use miu2d_rs::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Inspect(opts) => run_inspect(opts),
		Command::Export(opts) => run_export(opts),
		Command::Validate(opts) => run_validate(opts),
		Command::Xnb(opts) => run_xnb(opts),
	}
}

#[derive(Parser)]
#[command(name = "asf_utils")]
#[command(author = "miu2d-rs project")]
#[command(version)]
#[command(about = "Inspect, export and validate Miu2D sprite and sound assets", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Print header and frame statistics of a single .ASF file
	Inspect(InspectArgs),
	/// Export the frames of a .ASF file as PNG images
	Export(ExportArgs),
	/// Decode every .ASF and .XNB file under a directory
	Validate(ValidateArgs),
	/// Describe a .XNB sound effect
	Xnb(XnbArgs),
}

#[derive(Args)]
struct InspectArgs {
	/// Path to a single .ASF file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Print the report as JSON
	#[arg(long, default_value_t = false)]
	json: bool,
}

#[derive(Args)]
struct ExportArgs {
	/// Path to a single .ASF file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Output directory, created if missing
	#[arg(short, long, value_name = "DIR", default_value = "asf_export")]
	output: PathBuf,

	/// Only export the frames of this direction
	#[arg(short, long, value_name = "DIRECTION")]
	direction: Option<u32>,
}

#[derive(Args)]
struct ValidateArgs {
	/// Directory containing game resources
	#[arg(short = 'd', long, value_name = "DIR", default_value = "resources")]
	root: PathBuf,

	/// Recurse into sub-directories while scanning
	#[arg(short, long, default_value_t = false)]
	recursive: bool,

	/// Decode sprites on the parallel decoder
	#[arg(short, long, default_value_t = false)]
	accelerated: bool,

	/// Exit with an error when any file fails to decode
	#[arg(long, default_value_t = false)]
	fail_on_error: bool,
}

#[derive(Args)]
struct XnbArgs {
	/// Path to a single .XNB file
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Convert the sound effect to a 16-bit PCM WAV file
	#[arg(short, long, value_name = "FILE")]
	wav: Option<PathBuf>,
}

#[derive(Serialize)]
struct InspectReport {
	file: String,
	file_size: usize,
	signature: String,
	header: AsfHeader,
	directions: Vec<DirectionReport>,
}

#[derive(Serialize)]
struct DirectionReport {
	direction: u32,
	frames: usize,
	opaque_pixels: usize,
}

fn run_inspect(args: InspectArgs) -> Result<()> {
	let bytes = fs::read(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
	let asset = PureDecoder.decode(&bytes).with_context(|| format!("Failed to decode {}", args.file.display()))?;

	let report = InspectReport {
		file: args.file.display().to_string(),
		file_size: bytes.len(),
		signature: hex::encode(&bytes[..asf::constants::SIGNATURE_BLOCK_SIZE.min(bytes.len())]),
		header: *asset.header(),
		directions: (0..asset.directions())
			.map(|direction| {
				let frames = asset.direction_frames(direction);
				DirectionReport {
					direction,
					frames: frames.len(),
					opaque_pixels: frames.iter().map(FrameRecord::opaque_pixel_count).sum(),
				}
			})
			.collect(),
	};

	if args.json {
		println!("{}", serde_json::to_string_pretty(&report)?);
		return Ok(());
	}

	println!("File: {} (size: {} bytes)", report.file, report.file_size);
	println!("Signature: {}", report.signature);
	println!("{asset}");
	println!(
		"Interval: {} ms declared, {} ms effective",
		asset.declared_interval(),
		asset.interval().as_millis()
	);
	for direction in &report.directions {
		println!(
			"  direction {}: {} frames, {} opaque pixels",
			direction.direction, direction.frames, direction.opaque_pixels
		);
	}
	Ok(())
}

fn run_export(args: ExportArgs) -> Result<()> {
	let bytes = fs::read(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
	let asset = PureDecoder.decode(&bytes).with_context(|| format!("Failed to decode {}", args.file.display()))?;

	let per_direction = asset.frames_per_direction() as usize;
	let frames: Vec<usize> = match args.direction {
		Some(direction) if direction >= asset.directions() => {
			bail!("Direction {direction} is out of range, the file has {}", asset.directions())
		}
		Some(direction) => {
			let start = direction as usize * per_direction;
			(start..start + per_direction).collect()
		}
		None => (0..asset.frame_count() as usize).collect(),
	};

	fs::create_dir_all(&args.output)
		.with_context(|| format!("Failed to create {}", args.output.display()))?;
	let stem = args.file.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();

	for index in frames {
		let Some(rgba) = asset.frame_rgba(index) else {
			continue;
		};
		let image = image::RgbaImage::from_raw(asset.width(), asset.height(), rgba)
			.context("Frame buffer does not match the frame size")?;
		let path = args.output.join(format!("{stem}_{index:03}.png"));
		image.save(&path).with_context(|| format!("Failed to write {}", path.display()))?;
		info!("wrote {}", path.display());
	}
	Ok(())
}

#[derive(Default)]
struct ScanTotals {
	sprites: usize,
	sounds: usize,
	failed: usize,
	skipped: usize,
	frames: usize,
	sample_frames: usize,
}

fn run_validate(args: ValidateArgs) -> Result<()> {
	if !args.root.is_dir() {
		bail!("{} is not a directory", args.root.display());
	}

	let runtime = AcceleratedRuntime::default();
	let decoder: Box<dyn AsfDecode> = if args.accelerated {
		Box::new(runtime.decoder()?)
	} else {
		Box::new(PureDecoder)
	};

	let started = Instant::now();
	let mut totals = ScanTotals::default();
	for path in collect_files(&args.root, args.recursive) {
		let ext = path.extension().map(|e| e.to_string_lossy().to_ascii_lowercase()).unwrap_or_default();
		let bytes = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
		match ext.as_str() {
			"asf" => match decoder.decode(&bytes) {
				Ok(asset) => {
					totals.sprites += 1;
					totals.frames += asset.frame_count() as usize;
				}
				Err(err) => {
					totals.failed += 1;
					println!("[ERR] {} - {err}", path.display());
				}
			},
			"xnb" => match xnb::parse(&bytes) {
				Ok(sound) => {
					totals.sounds += 1;
					totals.sample_frames += sound.frame_count();
				}
				Err(err) => {
					totals.failed += 1;
					println!("[ERR] {} - {err}", path.display());
				}
			},
			_ => totals.skipped += 1,
		}
	}

	println!(
		"\nSummary: sprites={} ({} frames) | sounds={} ({} sample frames) | failed={} skipped={} | {} decoder, {:.2}s",
		totals.sprites,
		totals.frames,
		totals.sounds,
		totals.sample_frames,
		totals.failed,
		totals.skipped,
		decoder.name(),
		started.elapsed().as_secs_f64()
	);

	if args.fail_on_error && totals.failed > 0 {
		bail!("{} files failed to decode", totals.failed);
	}
	Ok(())
}

fn collect_files(root: &Path, recursive: bool) -> Vec<PathBuf> {
	let max_depth = if recursive {
		usize::MAX
	} else {
		1
	};
	let mut files = Vec::new();

	for entry in WalkDir::new(root).max_depth(max_depth).follow_links(false) {
		let entry = match entry {
			Ok(entry) => entry,
			Err(err) => {
				warn!("{err}");
				continue;
			}
		};

		if entry.file_type().is_file() {
			files.push(entry.into_path());
		}
	}

	files.sort();
	files
}

fn run_xnb(args: XnbArgs) -> Result<()> {
	let bytes = fs::read(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
	let sound = xnb::parse(&bytes).with_context(|| format!("Failed to parse {}", args.file.display()))?;

	println!("File: {} (size: {} bytes)", args.file.display(), bytes.len());
	println!("{sound}");
	let (loop_start, loop_length) = sound.loop_region();
	println!("Declared duration: {} ms", sound.declared_duration_ms());
	println!("Loop region: start={loop_start} length={loop_length}");

	if let Some(output) = args.wav {
		let mut file = fs::File::create(&output).with_context(|| format!("Failed to create {}", output.display()))?;
		sound.write_wav(&mut file).with_context(|| format!("Failed to write {}", output.display()))?;
		info!("wrote {}", output.display());
	}
	Ok(())
}
