use std::io::Cursor;

use miu2d_rs::prelude::*;

use crate::{manager, resource_root, write};

fn ogg() -> Vec<u8> {
	let mut data = b"OggS".to_vec();
	data.extend_from_slice(&[0; 24]);
	data
}

#[test_log::test(tokio::test)]
async fn test_sound_effect_from_disk() {
	let root = resource_root("sound");
	let samples: Vec<i16> = (0..800).map(|i| (i * 40 - 16000) as i16).collect();
	write(
		&root,
		"content/sound/hit.xnb",
		&XnbBuilder::pcm16(8000, 1, &samples).lz4(true).build().unwrap(),
	);
	let manager = manager(&root);

	let mut buffer = manager.load_audio("Content/Sound/Hit.xnb").await.unwrap();
	assert_eq!(buffer.state(), BufferState::Stopped);
	assert_eq!(buffer.duration(), std::time::Duration::from_millis(100));

	buffer.play();
	let played: Vec<f32> = buffer.by_ref().collect();
	assert_eq!(played.len(), samples.len());
	assert_eq!(played[0], -16000.0 / 32768.0);
	assert_eq!(buffer.state(), BufferState::Stopped);

	// The shared container exports the same samples as WAV
	let wav = buffer.container().to_wav_bytes().unwrap();
	let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
	let exported: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
	assert_eq!(exported, samples);

	std::fs::remove_dir_all(&root).unwrap();
}

#[test_log::test(tokio::test)]
async fn test_plain_audio_from_disk() {
	let root = resource_root("plain");
	write(&root, "music/theme.ogg", &ogg());
	write(&root, "music/menu.wav", &[0; 8]);
	let manager = manager(&root);

	let theme = manager.resolve_plain_audio("Music\\Theme.WAV").await.unwrap();
	assert_eq!(theme.url, "music/theme.ogg");
	assert!(!theme.used_fallback);

	// No sibling and an unreadable wav: the requested path's failure is final
	let err = manager.resolve_plain_audio("music/menu.wav").await.unwrap_err();
	assert!(matches!(err, AssetError::Decode { .. }));

	std::fs::remove_dir_all(&root).unwrap();
}
