use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::corpus::{CollisionPolicy, Collisions, Emotion, Speaker};
use crate::error::{Error, Result};

pub const METADATA_FILE: &str = "metadata.csv";

/// One row of a speaker transcript: `id \t text \t label`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRecord {
    pub utterance_id: String,
    pub text: String,
    pub label: String,
}

/// One row of `metadata.csv`. The emotion is kept for reporting only, it is
/// not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedEntry {
    pub utterance_id: String,
    pub text: String,
    pub emotion: Emotion,
}

#[derive(Debug)]
pub struct MetadataSummary {
    pub path: PathBuf,
    /// Rows written per emotion, indexed by `Emotion::index`
    pub per_emotion: [usize; 5],
    /// Rows dropped for a label outside the retained set
    pub dropped: usize,
    pub duplicate_ids: usize,
}

impl MetadataSummary {
    pub fn written(&self) -> usize {
        self.per_emotion.iter().sum()
    }
}

/// Keeps the rows labelled with a retained emotion, tags their text with
/// `[EMOTION]` and groups them by emotion in `Emotion::ALL` order. Rows keep
/// their read order inside each group.
pub fn consolidate_records<I>(records: I) -> Vec<ConsolidatedEntry>
where
    I: IntoIterator<Item = TranscriptRecord>,
{
    let mut blocks: [Vec<ConsolidatedEntry>; 5] = Default::default();
    for record in records {
        let Some(emotion) = Emotion::from_label(&record.label) else {
            continue;
        };
        blocks[emotion.index()].push(ConsolidatedEntry {
            text: format!("[{}] {}", emotion.tag(), record.text),
            utterance_id: record.utterance_id,
            emotion,
        });
    }
    blocks.into_iter().flatten().collect()
}

/// Reads a headerless, tab-separated speaker transcript.
pub fn read_transcript(path: &Path) -> Result<Vec<TranscriptRecord>> {
    if !path.is_file() {
        return Err(Error::missing_input(path));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .flexible(true)
        .from_path(path)?;

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.len() < 3 {
            return Err(Error::MalformedRow {
                path: path.to_path_buf(),
                line: record.position().map_or(0, |p| p.line()),
                fields: record.len(),
            });
        }
        records.push(TranscriptRecord {
            utterance_id: record[0].trim_start_matches('\u{feff}').to_owned(),
            text: record[1].to_owned(),
            label: record[2].to_owned(),
        });
    }
    Ok(records)
}

/// Writes `id|text` rows without header. The rows go to a temporary sibling
/// first so a failed write never leaves a truncated `metadata.csv`.
pub fn write_metadata(path: &Path, entries: &[ConsolidatedEntry]) -> Result<()> {
    let tmp = path.with_extension("csv.tmp");
    if let Err(err) = write_rows(&tmp, entries) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn write_rows(path: &Path, entries: &[ConsolidatedEntry]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(b'|')
        .from_path(path)?;
    for entry in entries {
        wtr.write_record([entry.utterance_id.as_str(), entry.text.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Merges every speaker transcript of `esd_dir` into `<output_dir>/metadata.csv`.
///
/// All transcripts are read before the output directory is touched, so a
/// missing or malformed transcript leaves the destination as it was.
pub fn consolidate_metadata(
    esd_dir: &Path,
    output_dir: &Path,
    policy: CollisionPolicy,
) -> Result<MetadataSummary> {
    let mut records = Vec::new();
    let mut ids = Collisions::new(policy, "utterance id");
    for speaker in Speaker::ALL {
        let path = speaker.transcript_path(esd_dir);
        let speaker_records = read_transcript(&path)?;
        debug!("{}: {} rows", path.display(), speaker_records.len());

        for record in &speaker_records {
            if Emotion::from_label(&record.label).is_some() {
                ids.claim(&record.utterance_id, path.display().to_string())?;
            }
        }
        records.extend(speaker_records);
    }

    let total = records.len();
    let entries = consolidate_records(records);

    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(METADATA_FILE);
    write_metadata(&path, &entries)?;

    let mut per_emotion = [0usize; 5];
    for entry in &entries {
        per_emotion[entry.emotion.index()] += 1;
    }
    let summary = MetadataSummary {
        path,
        per_emotion,
        dropped: total - entries.len(),
        duplicate_ids: ids.count(),
    };

    for emotion in Emotion::ALL {
        info!("{:>8}: {} rows", emotion, summary.per_emotion[emotion.index()]);
    }
    info!(
        "Wrote {} rows to {} ({} dropped, {} duplicate ids)",
        summary.written(),
        summary.path.display(),
        summary.dropped,
        summary.duplicate_ids
    );
    Ok(summary)
}
