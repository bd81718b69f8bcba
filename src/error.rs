use std::path::PathBuf;

/// Errors raised while reformatting the corpus.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A per-speaker transcript or a speaker/emotion audio directory is absent
    #[error("missing input: {}", path.display())]
    MissingInput { path: PathBuf },

    /// A transcript row that does not carry id, text and label
    #[error("malformed row at {}:{line}: expected 3 tab-separated fields, got {fields}", path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        fields: usize,
    },

    /// Two sources of one run map onto the same output name
    #[error("collision on `{name}`: {first} and {second}")]
    Collision {
        name: String,
        first: String,
        second: String,
    },

    /// WAV layout the resampler cannot handle
    #[error("unsupported audio in {}: {reason}", path.display())]
    Audio { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Wav(#[from] hound::Error),
}

impl Error {
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        Self::MissingInput { path: path.into() }
    }

    pub fn audio(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Audio {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
