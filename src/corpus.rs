//! Fixed layout of the ESD corpus: the English speakers, the retained emotions
//! and how name collisions between them are reported.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::warn;

use crate::error::{Error, Result};

/// English speakers of ESD, in read order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Speaker {
    S0011,
    S0012,
    S0013,
    S0014,
    S0015,
    S0016,
    S0017,
    S0018,
    S0019,
    S0020,
}

impl Speaker {
    pub const ALL: [Speaker; 10] = [
        Speaker::S0011,
        Speaker::S0012,
        Speaker::S0013,
        Speaker::S0014,
        Speaker::S0015,
        Speaker::S0016,
        Speaker::S0017,
        Speaker::S0018,
        Speaker::S0019,
        Speaker::S0020,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Speaker::S0011 => "0011",
            Speaker::S0012 => "0012",
            Speaker::S0013 => "0013",
            Speaker::S0014 => "0014",
            Speaker::S0015 => "0015",
            Speaker::S0016 => "0016",
            Speaker::S0017 => "0017",
            Speaker::S0018 => "0018",
            Speaker::S0019 => "0019",
            Speaker::S0020 => "0020",
        }
    }

    /// `<esd_dir>/<speaker>`
    pub fn dir(self, esd_dir: &Path) -> PathBuf {
        esd_dir.join(self.id())
    }

    /// `<esd_dir>/<speaker>/<speaker>.txt`
    pub fn transcript_path(self, esd_dir: &Path) -> PathBuf {
        self.dir(esd_dir).join(self.id()).with_extension("txt")
    }

    /// `<esd_dir>/<speaker>/<emotion>`
    pub fn emotion_dir(self, esd_dir: &Path, emotion: Emotion) -> PathBuf {
        self.dir(esd_dir).join(emotion.label())
    }
}

/// Emotion labels kept in the consolidated corpus. The order of `ALL` is the
/// block order of `metadata.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Angry,
    Happy,
    Neutral,
    Sad,
    Surprise,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Angry,
        Emotion::Happy,
        Emotion::Neutral,
        Emotion::Sad,
        Emotion::Surprise,
    ];

    /// Label as written in the transcripts and used as directory name.
    pub fn label(self) -> &'static str {
        match self {
            Emotion::Angry => "Angry",
            Emotion::Happy => "Happy",
            Emotion::Neutral => "Neutral",
            Emotion::Sad => "Sad",
            Emotion::Surprise => "Surprise",
        }
    }

    /// Upper-case tag prepended to the transcript text.
    pub fn tag(self) -> &'static str {
        match self {
            Emotion::Angry => "ANGRY",
            Emotion::Happy => "HAPPY",
            Emotion::Neutral => "NEUTRAL",
            Emotion::Sad => "SAD",
            Emotion::Surprise => "SURPRISE",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.label() == label)
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// What to do when two sources of one run land on the same output name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CollisionPolicy {
    /// Last one wins, silently
    Overwrite,
    /// Last one wins, with a warning
    #[default]
    Warn,
    /// Abort the run
    Error,
}

/// Remembers which source claimed each output name during a run.
pub struct Collisions {
    policy: CollisionPolicy,
    kind: &'static str,
    seen: HashMap<String, String>,
    count: usize,
}

impl Collisions {
    pub fn new(policy: CollisionPolicy, kind: &'static str) -> Self {
        Self {
            policy,
            kind,
            seen: HashMap::new(),
            count: 0,
        }
    }

    /// Records `name` as produced by `source`, applying the policy if it was
    /// already claimed.
    pub fn claim(&mut self, name: &str, source: impl Into<String>) -> Result<()> {
        let source = source.into();
        let Some(previous) = self.seen.insert(name.to_owned(), source.clone()) else {
            return Ok(());
        };
        self.count += 1;
        match self.policy {
            CollisionPolicy::Overwrite => Ok(()),
            CollisionPolicy::Warn => {
                warn!("{}", self.describe(name, &previous, &source));
                Ok(())
            }
            CollisionPolicy::Error => Err(Error::Collision {
                name: name.to_owned(),
                first: previous,
                second: source,
            }),
        }
    }

    fn describe(&self, name: &str, previous: &str, source: &str) -> String {
        format!(
            "duplicate {} `{}` in {}, also claimed by {}",
            self.kind, name, source, previous
        )
    }

    pub fn count(&self) -> usize {
        self.count
    }
}
