//! Configuration for locating the per-script model files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::script::Script;

/// File-system locations of the four trained models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelPaths {
    /// Thai model file.
    pub thai: PathBuf,
    /// Lao model file.
    pub lao: PathBuf,
    /// Burmese model file.
    pub burmese: PathBuf,
    /// Khmer model file.
    pub khmer: PathBuf,
}

impl ModelPaths {
    /// Conventional layout: `<dir>/<script>.seab` for each script.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let file = |script: Script| dir.join(format!("{}.seab", script.name()));
        Self {
            thai: file(Script::Thai),
            lao: file(Script::Lao),
            burmese: file(Script::Burmese),
            khmer: file(Script::Khmer),
        }
    }

    /// The path registered for a script.
    pub fn get(&self, script: Script) -> &Path {
        match script {
            Script::Thai => &self.thai,
            Script::Lao => &self.lao,
            Script::Burmese => &self.burmese,
            Script::Khmer => &self.khmer,
        }
    }
}

impl Default for ModelPaths {
    fn default() -> Self {
        Self::from_dir("models")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dir_convention() {
        let paths = ModelPaths::from_dir("/opt/models");
        assert_eq!(paths.thai, PathBuf::from("/opt/models/thai.seab"));
        assert_eq!(paths.get(Script::Khmer), Path::new("/opt/models/khmer.seab"));
    }

    #[test]
    fn test_default() {
        let paths = ModelPaths::default();
        assert_eq!(paths.lao, PathBuf::from("models/lao.seab"));
    }
}
