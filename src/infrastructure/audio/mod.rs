use crate::domain::tts::{AudioFormat, TtsError};
use chrono::Utc;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Writes synthesized audio into the output directory.
///
/// File names combine a UTC timestamp with a random suffix, so concurrent
/// requests sharing the directory cannot collide. A failure here is fatal to
/// the request: switching providers cannot fix a local filesystem problem.
#[derive(Debug, Clone)]
pub struct AudioSink {
    output_dir: PathBuf,
}

impl AudioSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `bytes` to a fresh file with the extension for `format`,
    /// creating the output directory if absent. Returns the full path.
    pub fn save(&self, bytes: &[u8], format: AudioFormat) -> Result<PathBuf, TtsError> {
        std::fs::create_dir_all(&self.output_dir)?;

        let file_name = format!(
            "newscast-{}-{}.{}",
            Utc::now().format("%Y%m%dT%H%M%SZ"),
            Uuid::new_v4().simple(),
            format.extension()
        );
        let path = self.output_dir.join(file_name);

        std::fs::write(&path, bytes)?;

        tracing::info!(
            path = %path.display(),
            size_bytes = bytes.len(),
            "Audio file written"
        );

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("newscast-sink-test-{}", Uuid::new_v4().simple()))
    }

    #[test]
    fn test_save_writes_file_with_format_extension() {
        let dir = temp_dir();
        let sink = AudioSink::new(&dir);

        let path = sink.save(b"fake mp3 bytes", AudioFormat::Mp3).unwrap();

        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mp3"));
        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = temp_dir().join("nested").join("deeper");
        let sink = AudioSink::new(&dir);

        let path = sink.save(b"wav", AudioFormat::Wav).unwrap();
        assert!(path.exists());

        std::fs::remove_dir_all(path.parent().unwrap().parent().unwrap().parent().unwrap())
            .unwrap();
    }

    #[test]
    fn test_save_generates_distinct_paths() {
        let dir = temp_dir();
        let sink = AudioSink::new(&dir);

        let first = sink.save(b"a", AudioFormat::Ogg).unwrap();
        let second = sink.save(b"b", AudioFormat::Ogg).unwrap();
        assert_ne!(first, second);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_surfaces_io_failure() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        // A regular file where the output directory should be
        let blocker = dir.join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let sink = AudioSink::new(&blocker);
        let err = sink.save(b"audio", AudioFormat::Mp3).unwrap_err();
        assert!(matches!(err, TtsError::Io(_)));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
