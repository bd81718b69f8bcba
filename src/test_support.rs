use std::fs;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use tempfile::TempDir;

use crate::corpus::{Emotion, Speaker};

/// A minimal ESD tree: every speaker has an empty transcript and an empty
/// directory per emotion.
pub struct EsdFixture {
    dir: TempDir,
}

impl EsdFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        for speaker in Speaker::ALL {
            for emotion in Emotion::ALL {
                fs::create_dir_all(speaker.emotion_dir(dir.path(), emotion)).unwrap();
            }
            fs::write(speaker.transcript_path(dir.path()), "").unwrap();
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn transcript(&self, speaker: Speaker, rows: &[(&str, &str, &str)]) {
        let body: String = rows
            .iter()
            .map(|(id, text, label)| format!("{}\t{}\t{}\n", id, text, label))
            .collect();
        fs::write(speaker.transcript_path(self.path()), body).unwrap();
    }

    pub fn audio(&self, speaker: Speaker, emotion: Emotion, name: &str, bytes: &[u8]) {
        let path = speaker.emotion_dir(self.path(), emotion).join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }

    /// Writes a short 16-bit mono tone.
    pub fn sine_wav(&self, speaker: Speaker, emotion: Emotion, name: &str, sample_rate: u32) {
        let path = speaker.emotion_dir(self.path(), emotion).join(name);
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for i in 0..sample_rate / 10 {
            let t = i as f32 / sample_rate as f32;
            let v = (t * 220.0 * std::f32::consts::TAU).sin() * 8000.0;
            writer.write_sample(v as i16).unwrap();
        }
        writer.finalize().unwrap();
    }
}
