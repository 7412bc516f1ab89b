use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Locations of the detection and recognition models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    detection: PathBuf,
    recognition: PathBuf,
}

impl ModelPaths {
    pub fn new(detection: impl AsRef<Path>, recognition: impl AsRef<Path>) -> Self {
        Self {
            detection: detection.as_ref().to_path_buf(),
            recognition: recognition.as_ref().to_path_buf(),
        }
    }

    /// Conventional file names inside a models directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(
            dir.join("text-detection.rten"),
            dir.join("text-recognition.rten"),
        )
    }

    pub fn detection(&self) -> &Path {
        &self.detection
    }

    pub fn recognition(&self) -> &Path {
        &self.recognition
    }

    /// Fail early with both paths named when a model file is absent.
    pub fn ensure_present(&self) -> Result<()> {
        let missing: Vec<String> = [&self.detection, &self.recognition]
            .into_iter()
            .filter(|p| !p.is_file())
            .map(|p| p.display().to_string())
            .collect();
        if !missing.is_empty() {
            bail!("OCR model file(s) not found: {}", missing.join(", "));
        }
        Ok(())
    }
}
