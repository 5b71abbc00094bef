mod common;

use std::{
	sync::Arc,
	time::{Duration, Instant},
};

use bytes::Bytes;
use common::{config, sound, sprite, wav};
use miu_assets::{AnimationOptions, AssetConfig, AssetError, AssetManager, BufferState, PlaybackState};
use miu_vfs::MemoryFetcher;

fn manager() -> (Arc<MemoryFetcher>, AssetManager) {
	let fetcher = Arc::new(MemoryFetcher::new());
	let manager = AssetManager::new(fetcher.clone(), config());
	(fetcher, manager)
}

#[test_log::test(tokio::test)]
async fn resolver_stops_at_first_success() {
	let (fetcher, manager) = manager();
	fetcher.insert("asf/character/hero.asf", sprite(4, 1));
	fetcher.insert("asf/interlude/hero.asf", sprite(2, 1));

	let resolved = manager
		.load_animation_any(&["asf/npc/Hero.asf", "ASF/Character/Hero.asf", "asf/interlude/hero.asf"])
		.await
		.unwrap();
	assert_eq!(resolved.resolved_path, "ASF/Character/Hero.asf");
	assert_eq!(resolved.animation.frame_count(), 4);
	assert_eq!(fetcher.requests(), vec!["asf/npc/hero.asf", "asf/character/hero.asf"]);
}

#[test_log::test(tokio::test)]
async fn resolver_reports_last_failure() {
	let (fetcher, manager) = manager();
	fetcher.insert("asf/b.asf", b"garbage".to_vec());

	let err = manager.load_animation_any(&["asf/a.asf", "asf/b.asf"]).await.unwrap_err();
	match err {
		AssetError::AllCandidatesFailed {
			attempts,
			last: Some(last),
		} => {
			assert_eq!(attempts, 2);
			assert!(matches!(*last, AssetError::Decode { ref path, .. } if path == "asf/b.asf"));
		}
		other => panic!("unexpected error: {other}"),
	}

	let empty: [&str; 0] = [];
	let err = manager.load_animation_any(&empty).await.unwrap_err();
	assert_eq!(
		err,
		AssetError::AllCandidatesFailed {
			attempts: 0,
			last: None
		}
	);
	assert_eq!(fetcher.total_requests(), 2);
}

#[test_log::test(tokio::test)]
async fn instances_share_surfaces() {
	let (fetcher, manager) = manager();
	fetcher.insert("asf/effect/fire.asf", sprite(4, 1));
	let animation = manager.load_animation("asf/effect/fire.asf").await.unwrap();

	let start = Instant::now();
	let mut a = manager.create_animation_instance(&animation, AnimationOptions::looping());
	let mut b = manager.create_animation_instance(&animation, AnimationOptions::default());
	a.play(start);
	b.play(start);

	let first = a.current_surface().unwrap();
	let second = b.current_surface().unwrap();
	assert!(Arc::ptr_eq(&first, &second));
	assert!(Arc::ptr_eq(&first, &manager.get_surface(&animation, 0).unwrap()));
	assert_eq!(animation.surfaces().conversions(), 1);
	assert!(manager.get_surface(&animation, 4).is_none());

	a.tick(start + Duration::from_millis(100));
	assert_eq!(a.current_frame(), 1);
	assert_eq!(b.state(), PlaybackState::Playing);
	drop(b);
	assert_eq!(a.animation().frame_count(), 4);
}

#[test_log::test(tokio::test)]
async fn default_interval_comes_from_config() {
	let fetcher = Arc::new(MemoryFetcher::new());
	let data = miu_types::file::AsfBuilder::new(1, 1)
		.interval(0)
		.palette(&[[0, 0, 0, 255]])
		.frame(vec![0, 255])
		.build()
		.unwrap();
	fetcher.insert("asf/still.asf", data);
	let manager = AssetManager::new(
		fetcher,
		AssetConfig {
			default_interval_ms: 40,
			..config()
		},
	);

	let animation = manager.load_animation("asf/still.asf").await.unwrap();
	let instance = manager.create_animation_instance(&animation, AnimationOptions::default());
	assert_eq!(instance.interval(), Duration::from_millis(40));
}

#[test_log::test(tokio::test)]
async fn audio_buffers_share_one_container() {
	let (fetcher, manager) = manager();
	fetcher.insert("sound/hit.xnb", sound(&[8192; 800]));

	let (a, b) = tokio::join!(manager.load_audio("sound/hit.xnb"), manager.load_audio("Sound\\Hit.xnb"));
	let (mut a, b) = (a.unwrap(), b.unwrap());
	assert!(Arc::ptr_eq(a.container(), b.container()));
	assert_eq!(fetcher.total_requests(), 1);
	assert_eq!(a.duration(), Duration::from_millis(100));

	a.play();
	let mut out = [0.0f32; 400];
	assert_eq!(a.read(&mut out), 400);
	assert_eq!(out[0], 0.25);
	assert_eq!(a.position(), Duration::from_millis(50));
	assert_eq!(b.state(), BufferState::Stopped);
	assert_eq!(b.position(), Duration::ZERO);
}

#[test_log::test(tokio::test)]
async fn invalid_audio_is_a_decode_error() {
	let (fetcher, manager) = manager();
	fetcher.insert("sound/bad.xnb", b"XNBw".to_vec());

	let err = manager.load_audio("sound/bad.xnb").await.unwrap_err();
	assert!(matches!(err, AssetError::Decode { .. }));
	assert!(!err.to_string().is_empty());
	assert!(!manager.audio().contains("sound/bad.xnb"));
}

#[test_log::test(tokio::test)]
async fn plain_audio_prefers_compressed_sibling() {
	let (fetcher, manager) = manager();
	fetcher.insert("sound/hit.ogg", Bytes::from_static(b"OggS\0\x02rest"));
	fetcher.insert("sound/hit.wav", wav());

	let audio = manager.resolve_plain_audio("Sound/Hit.wav").await.unwrap();
	assert_eq!(audio.url, "sound/hit.ogg");
	assert!(!audio.used_fallback);
	assert_eq!(fetcher.requests(), vec!["sound/hit.ogg"]);
}

#[test_log::test(tokio::test)]
async fn plain_audio_falls_back_once() {
	let (fetcher, manager) = manager();
	fetcher.insert("sound/hit.wav", wav());

	let audio = manager.resolve_plain_audio("sound/hit.wav").await.unwrap();
	assert_eq!(audio.url, "sound/hit.wav");
	assert!(audio.used_fallback);
	assert_eq!(fetcher.requests(), vec!["sound/hit.ogg", "sound/hit.wav"]);
}

#[test_log::test(tokio::test)]
async fn plain_audio_falls_back_on_invalid_sibling() {
	let (fetcher, manager) = manager();
	fetcher.insert("sound/hit.ogg", Bytes::from_static(b"<html>404</html>"));
	fetcher.insert("sound/hit.wav", wav());

	let audio = manager.resolve_plain_audio("sound/hit.wav").await.unwrap();
	assert!(audio.used_fallback);
	assert_eq!(fetcher.total_requests(), 2);
}

#[test_log::test(tokio::test)]
async fn plain_audio_makes_at_most_two_attempts() {
	let (fetcher, manager) = manager();

	let err = manager.resolve_plain_audio("sound/missing.wav").await.unwrap_err();
	assert!(err.is_not_found());
	assert_eq!(fetcher.requests(), vec!["sound/missing.ogg", "sound/missing.wav"]);

	let err = manager.resolve_plain_audio("music/theme.ogg").await.unwrap_err();
	assert!(err.is_not_found());
	assert_eq!(fetcher.request_count("music/theme.ogg"), 1);
	assert_eq!(fetcher.total_requests(), 3);
}

#[test_log::test(tokio::test)]
async fn clear_cache_forces_reload() {
	let (fetcher, manager) = manager();
	fetcher.insert("asf/a.asf", sprite(1, 1));
	fetcher.insert("sound/a.xnb", sound(&[0; 8]));

	let before = manager.load_animation("asf/a.asf").await.unwrap();
	manager.load_audio("sound/a.xnb").await.unwrap();
	manager.clear_cache();
	assert!(manager.animations().is_empty());
	assert!(manager.audio().is_empty());

	let after = manager.load_animation("asf/a.asf").await.unwrap();
	assert!(!Arc::ptr_eq(&before, &after));
	assert_eq!(before.frames(), after.frames());
	assert_eq!(fetcher.request_count("asf/a.asf"), 2);
}

#[test_log::test(tokio::test)]
async fn accelerated_manager_matches_pure() {
	let fetcher = Arc::new(MemoryFetcher::new());
	fetcher.insert("asf/sheet.asf", sprite(16, 4));

	let accelerated = AssetManager::new(
		fetcher.clone(),
		AssetConfig {
			prefer_accelerated: true,
			accelerated_threads: 2,
			..AssetConfig::default()
		},
	);
	accelerated.init_runtime().unwrap();
	assert_eq!(accelerated.animations().decoder_name(), "accelerated");

	let pure = AssetManager::new(fetcher, config());
	assert_eq!(pure.animations().decoder_name(), "pure");

	let a = accelerated.load_animation("asf/sheet.asf").await.unwrap();
	let b = pure.load_animation("asf/sheet.asf").await.unwrap();
	assert_eq!(a.asset(), b.asset());
	assert_eq!(a.direction_frames(3).len(), 4);
}
