use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::blob::{AudioBlob, AudioFormat};

/// Metadata for one exported answer
#[derive(Debug, Clone)]
pub struct ExportMetadata {
    /// Question index (0-indexed)
    pub question_index: usize,
    /// File path of the export
    pub file_path: PathBuf,
    /// Bytes written
    pub bytes: usize,
    pub format: AudioFormat,
    /// Known only for WAV exports
    pub duration_seconds: Option<f64>,
}

/// Download name for a recorded answer: `answer_q<n>_<unix millis>.<ext>`,
/// with `n` the 1-based question number.
pub fn download_filename(question_index: usize, timestamp_ms: i64, extension: &str) -> String {
    format!(
        "answer_q{}_{}.{}",
        question_index + 1,
        timestamp_ms,
        extension
    )
}

/// Writes recorded answers to disk
pub struct RecordingExporter {
    output_dir: PathBuf,
}

impl RecordingExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).context("Failed to create recordings directory")?;

        info!("Recording exporter writing to {}", output_dir.display());

        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn save(&self, question_index: usize, blob: &AudioBlob) -> Result<ExportMetadata> {
        let filename = download_filename(
            question_index,
            Utc::now().timestamp_millis(),
            blob.extension(),
        );
        let file_path = self.output_dir.join(filename);

        fs::write(&file_path, blob.bytes())
            .with_context(|| format!("Failed to write recording: {:?}", file_path))?;

        let metadata = ExportMetadata {
            question_index,
            file_path,
            bytes: blob.bytes().len(),
            format: blob.format(),
            duration_seconds: blob.as_wav().map(|wav| wav.duration_seconds()),
        };

        info!(
            "Saved answer for question {} to {} ({} bytes)",
            question_index + 1,
            metadata.file_path.display(),
            metadata.bytes
        );

        Ok(metadata)
    }

    /// Export every recording in question order
    pub fn save_all<'a>(
        &self,
        recordings: impl IntoIterator<Item = (usize, &'a AudioBlob)>,
    ) -> Result<Vec<ExportMetadata>> {
        let mut saved: Vec<ExportMetadata> = recordings
            .into_iter()
            .map(|(idx, blob)| self.save(idx, blob))
            .collect::<Result<_>>()?;
        saved.sort_by_key(|m| m.question_index);
        Ok(saved)
    }
}
