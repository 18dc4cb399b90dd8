//! Artifact loading

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{Classifier, ClassifierFacade, ForestClassifier, LabelTable, RandomForest};
use crate::error::AssessmentError;

/// Default file name of the forest artifact
pub const DEFAULT_MODEL_FILE: &str = "sleep_model.json";

/// Default file name of the target label table
pub const DEFAULT_LABEL_ENCODER_FILE: &str = "label_encoder.json";

/// Default file name of the occupation label table
pub const DEFAULT_OCCUPATION_ENCODER_FILE: &str = "occupation_encoder.json";

/// Locations of the model artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub label_encoder: PathBuf,
    /// Optional; the layout without occupation is used when absent
    pub occupation_encoder: Option<PathBuf>,
}

impl ArtifactPaths {
    pub fn new(model: impl Into<PathBuf>, label_encoder: impl Into<PathBuf>) -> Self {
        Self {
            model: model.into(),
            label_encoder: label_encoder.into(),
            occupation_encoder: None,
        }
    }

    /// Default file names inside a model directory
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(DEFAULT_MODEL_FILE),
            label_encoder: dir.join(DEFAULT_LABEL_ENCODER_FILE),
            occupation_encoder: Some(dir.join(DEFAULT_OCCUPATION_ENCODER_FILE)),
        }
    }

    pub fn with_occupation_encoder(mut self, path: impl Into<PathBuf>) -> Self {
        self.occupation_encoder = Some(path.into());
        self
    }
}

/// Read a file, mapping "not found" to `None`
fn read_optional(path: &Path) -> Result<Option<String>, AssessmentError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(AssessmentError::ArtifactRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Prefix configuration errors with the offending file
fn in_file(path: &Path, err: AssessmentError) -> AssessmentError {
    match err {
        AssessmentError::Configuration(msg) => {
            AssessmentError::Configuration(format!("{}: {msg}", path.display()))
        }
        other => other,
    }
}

pub(super) fn load(paths: &ArtifactPaths) -> Result<ClassifierFacade, AssessmentError> {
    let Some(model_json) = read_optional(&paths.model)? else {
        tracing::warn!(path = %paths.model.display(), "model artifact not found");
        return Ok(ClassifierFacade::unavailable(format!(
            "model file {} not found",
            paths.model.display()
        )));
    };
    let Some(labels_json) = read_optional(&paths.label_encoder)? else {
        tracing::warn!(path = %paths.label_encoder.display(), "label encoder not found");
        return Ok(ClassifierFacade::unavailable(format!(
            "label encoder {} not found",
            paths.label_encoder.display()
        )));
    };

    let forest = RandomForest::from_json(&model_json).map_err(|e| in_file(&paths.model, e))?;
    let targets =
        LabelTable::from_json(&labels_json).map_err(|e| in_file(&paths.label_encoder, e))?;

    let occupations = match &paths.occupation_encoder {
        Some(path) => match read_optional(path)? {
            Some(json) => Some(Arc::new(
                LabelTable::from_json(&json).map_err(|e| in_file(path, e))?,
            )),
            None => {
                tracing::debug!(path = %path.display(), "no occupation encoder");
                None
            }
        },
        None => None,
    };

    let classifier = ForestClassifier::new(forest, &targets).map_err(|e| in_file(&paths.model, e))?;

    tracing::info!(
        trees = classifier.forest().tree_count(),
        layout = ?classifier.layout(),
        occupation_encoder = occupations.is_some(),
        "loaded sleep model"
    );

    ClassifierFacade::from_classifier(Arc::new(classifier), occupations)
}
