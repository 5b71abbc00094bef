//! Game path canonicalization.
//!
//! Legacy resource tables mix `\` and `/`, upper and lower case, and
//! sometimes carry a leading slash. Every cache in the workspace keys by the
//! canonical form produced here.

/// Returns the canonical form of a game path.
///
/// Lowercases, converts `\` to `/`, strips leading slashes and collapses
/// empty and `.` segments. `..` segments are kept; fetchers decide whether
/// they are allowed.
///
/// # Examples
///
/// ```
/// use miu_vfs::normalize_path;
///
/// assert_eq!(normalize_path("\\ASF\\Character\\NPC01.ASF"), "asf/character/npc01.asf");
/// assert_eq!(normalize_path("/asf//./npc01.asf"), "asf/npc01.asf");
/// ```
pub fn normalize_path(path: &str) -> String {
	let lowered = path.to_lowercase().replace('\\', "/");
	lowered.split('/').filter(|segment| !segment.is_empty() && *segment != ".").collect::<Vec<_>>().join("/")
}

/// Returns the extension of the last path segment, without the dot.
pub fn extension(path: &str) -> Option<&str> {
	let name = path.rsplit(['/', '\\']).next()?;
	let (stem, ext) = name.rsplit_once('.')?;
	if stem.is_empty() || ext.is_empty() {
		return None;
	}
	Some(ext)
}

/// Replaces the extension of the last path segment.
///
/// Paths without an extension get `new_extension` appended.
pub fn replace_extension(path: &str, new_extension: &str) -> String {
	let new_extension = new_extension.trim_start_matches('.');
	match extension(path) {
		Some(ext) => format!("{}{new_extension}", &path[..path.len() - ext.len()]),
		None => format!("{path}.{new_extension}"),
	}
}
