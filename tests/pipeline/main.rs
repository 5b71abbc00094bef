//! End-to-end checks of the asset pipeline against resources on disk

use std::{
	path::{Path, PathBuf},
	time::{Duration, Instant},
};

use miu2d_rs::prelude::*;

mod audio;

/// Creates an empty resource root unique to this test
fn resource_root(name: &str) -> PathBuf {
	let root = std::env::temp_dir().join(format!("miu2d_pipeline_{name}_{}", std::process::id()));
	let _ = std::fs::remove_dir_all(&root);
	std::fs::create_dir_all(&root).unwrap();
	root
}

fn write(root: &Path, path: &str, data: &[u8]) {
	let target = root.join(path);
	std::fs::create_dir_all(target.parent().unwrap()).unwrap();
	std::fs::write(target, data).unwrap();
}

/// Two facings of three 2x2 frames each
fn walk_cycle() -> Vec<u8> {
	let palette = [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]];
	let mut builder = AsfBuilder::new(2, 2).directions(2).interval(50).anchor(1, 2).palette(&palette);
	for frame in 0..6u8 {
		builder = builder.frame(vec![frame % 3, 255, 0, 0, 1, 255, 2, 128]);
	}
	builder.build().unwrap()
}

fn manager(root: &Path) -> AssetManager {
	AssetManager::from_config(AssetConfig {
		resource_root: root.to_path_buf(),
		prefer_accelerated: false,
		..AssetConfig::default()
	})
}

#[test_log::test(tokio::test)]
async fn test_animation_from_disk() {
	let root = resource_root("animation");
	write(&root, "asf/character/walk.asf", &walk_cycle());
	let manager = manager(&root);

	// Game tables use Windows separators and mixed case
	let animation = manager.load_animation("ASF\\Character\\Walk.ASF").await.unwrap();
	assert_eq!(animation.path(), "asf/character/walk.asf");
	assert_eq!(animation.directions(), 2);
	assert_eq!(animation.anchor(), (1, 2));

	let surface = manager.get_surface(&animation, 0).unwrap();
	assert_eq!(surface.dimensions(), (2, 2));
	assert_eq!(surface.get_pixel(0, 0).0, [255, 0, 0, 255]);
	assert_eq!(surface.get_pixel(1, 0).0[3], 0);
	assert!(manager.get_surface(&animation, 6).is_none());

	let mut instance =
		manager.create_animation_instance(&animation, AnimationOptions::looping().with_direction(1));
	let start = Instant::now();
	instance.play(start);
	assert_eq!(instance.current_frame(), 3);
	assert!(instance.tick(start + Duration::from_millis(50)));
	assert_eq!(instance.current_frame(), 4);
	assert!(instance.tick(start + Duration::from_millis(100)));
	assert!(instance.tick(start + Duration::from_millis(150)));
	assert_eq!(instance.current_frame(), 3);

	std::fs::remove_dir_all(&root).unwrap();
}

#[test_log::test(tokio::test)]
async fn test_candidates_on_disk() {
	let root = resource_root("candidates");
	write(&root, "asf/effect/fire.asf", &walk_cycle());
	write(&root, "asf/broken.asf", b"not a sprite");
	let manager = manager(&root);

	let resolved = manager
		.load_animation_any(&["asf/missing.asf", "asf/broken.asf", "asf/effect/fire.asf"])
		.await
		.unwrap();
	assert_eq!(resolved.resolved_path, "asf/effect/fire.asf");

	let err = manager.load_animation_any(&["asf/missing.asf", "../escape.asf"]).await.unwrap_err();
	match err {
		AssetError::AllCandidatesFailed {
			attempts,
			last,
		} => {
			assert_eq!(attempts, 2);
			assert!(matches!(
				last.as_deref(),
				Some(AssetError::Fetch(FetchError::InvalidPath { .. }))
			));
		}
		other => panic!("unexpected error: {other}"),
	}

	std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn test_config_file_drives_manager() {
	let root = resource_root("config");
	let config = AssetConfig::from_toml(&format!(
		r#"
resource_root = "{}"
prefer_accelerated = false
default_interval_ms = 75

[audio]
compressed_extension = "mp3"
"#,
		root.display().to_string().replace('\\', "/")
	))
	.unwrap();

	let manager = AssetManager::from_config(config);
	assert_eq!(manager.config().default_interval(), Duration::from_millis(75));
	assert_eq!(manager.config().audio.compressed_extension, "mp3");
	assert_eq!(manager.animations().decoder_name(), "pure");

	std::fs::remove_dir_all(&root).unwrap();
}
