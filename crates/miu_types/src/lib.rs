//! This crate provides the binary asset formats used by the `miu2d-rs` project.
//!
//! # File Formats
//!
//! - **ASF**: Palette-indexed, RLE compressed sprite-sheet animations with one or more facings
//! - **XNB**: XNA content packages, here carrying `SoundEffect` audio payloads
//!
//! Everything in this crate is synchronous and free of I/O policy: callers hand in
//! the complete file contents and get a fully decoded, immutable value back.
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use miu_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("asf/character/npc001_st.asf")?;
//! let asset = PureDecoder.decode(&data)?;
//! println!("{}x{}, {} frames", asset.width(), asset.height(), asset.frame_count());
//!
//! let sound = xnb::parse(&std::fs::read("sound/click.xnb")?)?;
//! println!("{} Hz", sound.format().sample_rate);
//! # Ok(())
//! # }
//! ```

pub mod file;

/// `use miu_types::prelude::*;` to import commonly used items.
pub mod prelude;
