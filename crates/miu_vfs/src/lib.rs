//! Resource access for `miu2d-rs`.
//!
//! Assets are addressed by game-relative paths such as
//! `asf/character/npc01.asf`. This crate canonicalizes those paths and
//! abstracts where the bytes come from behind [`ResourceFetcher`], so the
//! decode and cache layers never touch the filesystem or network directly.

mod fetch;
mod fs;
mod memory;
mod path;

pub use fetch::{FetchError, ResourceFetcher};
pub use fs::FsFetcher;
pub use memory::MemoryFetcher;
pub use path::{extension, normalize_path, replace_extension};
