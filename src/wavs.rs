use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::audio_input::{resample_wav, wav_sample_rate};
use crate::corpus::{CollisionPolicy, Collisions, Emotion, Speaker};
use crate::error::{Error, Result};

pub const WAVS_DIR: &str = "wavs";

#[derive(Debug, Clone, Copy, Default)]
pub struct AudioOptions {
    pub collision: CollisionPolicy,
    /// Resample `.wav` files to this rate instead of copying them verbatim
    pub sample_rate: Option<u32>,
}

#[derive(Debug)]
pub struct AudioSummary {
    pub dir: PathBuf,
    pub copied: usize,
    pub resampled: usize,
    pub collisions: usize,
}

#[derive(Debug)]
struct CopyJob {
    source: PathBuf,
    name: OsString,
}

/// Collects every file below each `<speaker>/<emotion>` directory, in speaker
/// then emotion order. Fails before anything is copied if a directory is
/// missing or, under `CollisionPolicy::Error`, if two files share a name.
fn plan_copies(esd_dir: &Path, policy: CollisionPolicy) -> Result<(Vec<CopyJob>, usize)> {
    let mut jobs = Vec::new();
    let mut names = Collisions::new(policy, "file");
    for speaker in Speaker::ALL {
        for emotion in Emotion::ALL {
            let dir = speaker.emotion_dir(esd_dir, emotion);
            if !dir.is_dir() {
                return Err(Error::missing_input(dir));
            }
            let mut files = Vec::new();
            collect_files(&dir, &mut files)?;
            debug!("{}: {} files", dir.display(), files.len());

            for source in files {
                let Some(name) = source.file_name().map(OsString::from) else {
                    continue;
                };
                names.claim(&name.to_string_lossy(), source.display().to_string())?;
                jobs.push(CopyJob { source, name });
            }
        }
    }
    Ok((jobs, names.count()))
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    for path in entries {
        if path.is_dir() {
            collect_files(&path, files)?;
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("wav"))
}

/// Copies the audio of every speaker and emotion into the flat directory
/// `<output_dir>/wavs`. Existing files in it are kept; same-named files are
/// replaced, last copied wins.
pub fn consolidate_audio(
    esd_dir: &Path,
    output_dir: &Path,
    options: AudioOptions,
) -> Result<AudioSummary> {
    let (jobs, collisions) = plan_copies(esd_dir, options.collision)?;

    let wavs_dir = output_dir.join(WAVS_DIR);
    fs::create_dir_all(&wavs_dir)?;

    let mut resampled = 0;
    for job in &jobs {
        let target = wavs_dir.join(&job.name);
        match options.sample_rate {
            Some(hz) if is_wav(&job.source) && wav_sample_rate(&job.source)? != hz => {
                resample_wav(&job.source, &target, hz)?;
                resampled += 1;
            }
            _ => {
                fs::copy(&job.source, &target)?;
            }
        }
    }

    let summary = AudioSummary {
        dir: wavs_dir,
        copied: jobs.len(),
        resampled,
        collisions,
    };
    info!(
        "Copied {} files to {} ({} resampled, {} name collisions)",
        summary.copied,
        summary.dir.display(),
        summary.resampled,
        summary.collisions
    );
    Ok(summary)
}
