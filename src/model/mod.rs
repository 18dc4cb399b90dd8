//! Classifier facade
//!
//! The trained model is an opaque artifact produced offline. This module
//! loads it once, checks that its shape matches one of the feature layouts,
//! and exposes a single read-only inference call behind the `Classifier`
//! trait so the rule and scoring layers can be exercised with a stub.
//!
//! Missing artifact files are not an error: the facade comes up
//! "unavailable" and callers skip inference. Corrupt artifacts are.

mod forest;
mod label;
mod loader;

pub use forest::{DecisionTree, RandomForest, FOREST_FORMAT};
pub use label::LabelTable;
pub use loader::{
    ArtifactPaths, DEFAULT_LABEL_ENCODER_FILE, DEFAULT_MODEL_FILE, DEFAULT_OCCUPATION_ENCODER_FILE,
};

use std::sync::Arc;

use crate::encoder::CategoricalEncoder;
use crate::error::AssessmentError;
use crate::features::{FeatureLayout, FeatureVector};
use crate::types::SleepDisorder;

/// Inference capability over a fixed feature layout
pub trait Classifier: Send + Sync {
    /// Predict the raw sleep disorder label for one feature vector
    fn predict(&self, features: &FeatureVector) -> Result<SleepDisorder, AssessmentError>;

    /// Layout the classifier was trained on
    fn layout(&self) -> FeatureLayout;

    /// Column importances, if the artifact carries them
    fn importances(&self) -> Option<&[f64]> {
        None
    }
}

/// Random forest plus the decoded target labels
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    forest: RandomForest,
    labels: Vec<SleepDisorder>,
    layout: FeatureLayout,
}

impl ForestClassifier {
    /// Pair a forest with its target label table and resolve the layout.
    ///
    /// Fails when the label table does not decode to known labels, when the
    /// class counts disagree, or when the forest's declared columns match
    /// neither layout.
    pub fn new(forest: RandomForest, targets: &LabelTable) -> Result<Self, AssessmentError> {
        // Fields are public, so the forest may not have come from `from_json`
        forest.check()?;

        let labels = targets
            .classes()
            .iter()
            .map(|class| {
                SleepDisorder::from_label(class).ok_or_else(|| {
                    AssessmentError::Configuration(format!("unknown target class '{class}'"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if labels.len() != forest.n_classes {
            return Err(AssessmentError::Configuration(format!(
                "label encoder has {} classes, forest predicts {}",
                labels.len(),
                forest.n_classes
            )));
        }

        let layout = match &forest.feature_names {
            Some(names) => FeatureLayout::from_columns(names).ok_or_else(|| {
                AssessmentError::Configuration(format!(
                    "forest columns {names:?} match no known feature layout"
                ))
            })?,
            None => FeatureLayout::from_count(forest.n_features).ok_or_else(|| {
                AssessmentError::Configuration(format!(
                    "forest expects {} features, no known layout has that many",
                    forest.n_features
                ))
            })?,
        };

        Ok(Self {
            forest,
            labels,
            layout,
        })
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }
}

impl Classifier for ForestClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<SleepDisorder, AssessmentError> {
        if features.layout() != self.layout {
            return Err(AssessmentError::Configuration(format!(
                "feature vector uses {:?} layout, classifier expects {:?}",
                features.layout(),
                self.layout
            )));
        }
        let class = self.forest.predict(features.values())?;
        // `new` checked that labels.len() == n_classes
        Ok(self.labels[class])
    }

    fn layout(&self) -> FeatureLayout {
        self.layout
    }

    fn importances(&self) -> Option<&[f64]> {
        self.forest.feature_importances.as_deref()
    }
}

#[derive(Clone)]
enum ModelState {
    Ready(Arc<dyn Classifier>),
    Unavailable(String),
}

/// Loaded classifier and the encoder matching its layout.
///
/// Cloning is cheap; clones share the same read-only model.
#[derive(Clone)]
pub struct ClassifierFacade {
    state: ModelState,
    encoder: CategoricalEncoder,
}

impl std::fmt::Debug for ClassifierFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("ClassifierFacade");
        match &self.state {
            ModelState::Ready(classifier) => s.field("layout", &classifier.layout()),
            ModelState::Unavailable(reason) => s.field("unavailable", reason),
        };
        s.field("encodes_occupation", &self.encoder.encodes_occupation())
            .finish()
    }
}

impl ClassifierFacade {
    /// Load artifacts from disk.
    ///
    /// Returns an unavailable facade when the model or target label file is
    /// missing, and `AssessmentError::Configuration` when a file exists but
    /// is corrupt or does not fit the feature layout.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, AssessmentError> {
        loader::load(paths)
    }

    /// Wrap an already constructed classifier
    pub fn from_classifier(
        classifier: Arc<dyn Classifier>,
        occupations: Option<Arc<LabelTable>>,
    ) -> Result<Self, AssessmentError> {
        let layout = classifier.layout();
        let encoder = match (layout.includes_occupation(), occupations) {
            (true, Some(table)) => CategoricalEncoder::with_occupations(table),
            (true, None) => {
                return Err(AssessmentError::Configuration(
                    "classifier uses the occupation column but no occupation encoder is loaded"
                        .to_string(),
                ))
            }
            (false, Some(_)) => {
                tracing::warn!("occupation encoder loaded but classifier has no occupation column, ignoring it");
                CategoricalEncoder::new()
            }
            (false, None) => CategoricalEncoder::new(),
        };

        Ok(Self {
            state: ModelState::Ready(classifier),
            encoder,
        })
    }

    /// Facade with no model; every `predict` reports unavailable
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: ModelState::Unavailable(reason.into()),
            encoder: CategoricalEncoder::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, ModelState::Ready(_))
    }

    /// Reason the model is unavailable, if it is
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.state {
            ModelState::Ready(_) => None,
            ModelState::Unavailable(reason) => Some(reason),
        }
    }

    /// Layout of the loaded model
    pub fn layout(&self) -> Option<FeatureLayout> {
        match &self.state {
            ModelState::Ready(classifier) => Some(classifier.layout()),
            ModelState::Unavailable(_) => None,
        }
    }

    /// Encoder matching the loaded layout
    pub fn encoder(&self) -> &CategoricalEncoder {
        &self.encoder
    }

    /// Predict the raw label for a feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<SleepDisorder, AssessmentError> {
        match &self.state {
            ModelState::Ready(classifier) => classifier.predict(features),
            ModelState::Unavailable(reason) => {
                Err(AssessmentError::ModelUnavailable(reason.clone()))
            }
        }
    }

    /// (column, importance) pairs, most important first
    pub fn importances(&self) -> Option<Vec<(&'static str, f64)>> {
        let ModelState::Ready(classifier) = &self.state else {
            return None;
        };
        let importances = classifier.importances()?;

        let mut ranked: Vec<(&'static str, f64)> = classifier
            .layout()
            .columns()
            .iter()
            .copied()
            .zip(importances.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        Some(ranked)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::encoder::CategoricalEncoder;
    use crate::features::{FeatureVectorBuilder, OCCUPATION_COLUMNS, STANDARD_COLUMNS};
    use crate::profile::sample_profile;
    use serde_json::json;

    /// Classifier that always returns the same label
    pub(crate) struct FixedClassifier {
        pub label: SleepDisorder,
        pub layout: FeatureLayout,
    }

    impl Classifier for FixedClassifier {
        fn predict(&self, _features: &FeatureVector) -> Result<SleepDisorder, AssessmentError> {
            Ok(self.label)
        }

        fn layout(&self) -> FeatureLayout {
            self.layout
        }
    }

    pub(crate) fn fixed_facade(label: SleepDisorder) -> ClassifierFacade {
        ClassifierFacade::from_classifier(
            Arc::new(FixedClassifier {
                label,
                layout: FeatureLayout::Standard,
            }),
            None,
        )
        .unwrap()
    }

    pub(crate) fn targets() -> LabelTable {
        LabelTable::new(vec![
            "Healthy".to_string(),
            "Insomnia".to_string(),
            "Sleep Apnea".to_string(),
        ])
        .unwrap()
    }

    /// Forest over the standard layout: sleep duration <= 6.0 votes Insomnia,
    /// otherwise Healthy
    pub(crate) fn duration_forest(names: bool) -> RandomForest {
        let mut artifact = json!({
            "format": FOREST_FORMAT,
            "n_features": 11,
            "n_classes": 3,
            "feature_importances": [0.02, 0.08, 0.30, 0.15, 0.05, 0.12, 0.10, 0.06, 0.04, 0.05, 0.03],
            "trees": [super::forest::tests::stump(2, 6.0, 1, 0, 3)]
        });
        if names {
            artifact["feature_names"] = json!(STANDARD_COLUMNS);
        }
        RandomForest::from_json(&artifact.to_string()).unwrap()
    }

    #[test]
    fn test_forest_classifier_predicts_label() {
        let classifier = ForestClassifier::new(duration_forest(true), &targets()).unwrap();
        assert_eq!(classifier.layout(), FeatureLayout::Standard);

        let mut profile = sample_profile();
        let encoded = CategoricalEncoder::new().encode(&profile);
        let vector = FeatureVectorBuilder::build(&profile, &encoded, FeatureLayout::Standard);
        assert_eq!(classifier.predict(&vector).unwrap(), SleepDisorder::Healthy);

        profile.sleep_duration = 5.5;
        let vector = FeatureVectorBuilder::build(&profile, &encoded, FeatureLayout::Standard);
        assert_eq!(classifier.predict(&vector).unwrap(), SleepDisorder::Insomnia);
    }

    #[test]
    fn test_layout_from_count_without_names() {
        let classifier = ForestClassifier::new(duration_forest(false), &targets()).unwrap();
        assert_eq!(classifier.layout(), FeatureLayout::Standard);
    }

    #[test]
    fn test_mismatched_columns_are_configuration_error() {
        let mut forest = duration_forest(true);
        let mut names: Vec<String> = STANDARD_COLUMNS.iter().map(|s| s.to_string()).collect();
        names.reverse();
        forest.feature_names = Some(names);

        let err = ForestClassifier::new(forest, &targets()).unwrap_err();
        assert!(matches!(err, AssessmentError::Configuration(_)));
    }

    #[test]
    fn test_unchecked_forest_is_rejected() {
        // Leaf with four class weights in a three-class forest, built without `from_json`
        let mut tree = super::forest::tests::stump(2, 6.0, 1, 0, 3);
        tree["value"][2] = json!([0.0, 0.0, 0.0, 1.0]);
        let artifact = json!({
            "format": FOREST_FORMAT,
            "n_features": 11,
            "n_classes": 3,
            "trees": [tree]
        });
        let forest: RandomForest = serde_json::from_value(artifact).unwrap();

        let err = ForestClassifier::new(forest, &targets()).unwrap_err();
        assert!(matches!(err, AssessmentError::Configuration(_)));
    }

    #[test]
    fn test_forest_modified_after_load_is_rejected() {
        let mut forest = duration_forest(true);
        forest.trees[0].feature[0] = 40;

        let err = ForestClassifier::new(forest, &targets()).unwrap_err();
        assert!(err.to_string().contains("feature 40"));
    }

    #[test]
    fn test_class_count_mismatch_is_configuration_error() {
        let two = LabelTable::new(vec!["Healthy".to_string(), "Insomnia".to_string()]).unwrap();
        assert!(ForestClassifier::new(duration_forest(true), &two).is_err());
    }

    #[test]
    fn test_unknown_target_class_is_configuration_error() {
        let odd = LabelTable::new(vec![
            "Healthy".to_string(),
            "Insomnia".to_string(),
            "Narcolepsy".to_string(),
        ])
        .unwrap();
        assert!(ForestClassifier::new(duration_forest(true), &odd).is_err());
    }

    #[test]
    fn test_wrong_layout_vector_is_rejected_at_call_time() {
        let classifier = ForestClassifier::new(duration_forest(true), &targets()).unwrap();
        let profile = sample_profile();
        let encoded = CategoricalEncoder::new().encode(&profile);
        let vector =
            FeatureVectorBuilder::build(&profile, &encoded, FeatureLayout::WithOccupation);

        assert!(classifier.predict(&vector).is_err());
    }

    #[test]
    fn test_occupation_layout_requires_occupation_table() {
        let classifier = Arc::new(FixedClassifier {
            label: SleepDisorder::Healthy,
            layout: FeatureLayout::WithOccupation,
        });
        let err = ClassifierFacade::from_classifier(classifier, None).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_standard_layout_ignores_occupation_table() {
        let table = Arc::new(
            LabelTable::new(OCCUPATION_COLUMNS.iter().map(|s| s.to_string()).collect()).unwrap(),
        );
        let facade = ClassifierFacade::from_classifier(
            Arc::new(FixedClassifier {
                label: SleepDisorder::Healthy,
                layout: FeatureLayout::Standard,
            }),
            Some(table),
        )
        .unwrap();
        assert!(!facade.encoder().encodes_occupation());
    }

    #[test]
    fn test_unavailable_facade() {
        let facade = ClassifierFacade::unavailable("model file missing");
        assert!(!facade.is_available());
        assert_eq!(facade.layout(), None);

        let profile = sample_profile();
        let encoded = facade.encoder().encode(&profile);
        let vector = FeatureVectorBuilder::build(&profile, &encoded, FeatureLayout::Standard);
        assert!(matches!(
            facade.predict(&vector),
            Err(AssessmentError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_importances_ranked() {
        let classifier = ForestClassifier::new(duration_forest(true), &targets()).unwrap();
        let facade = ClassifierFacade::from_classifier(Arc::new(classifier), None).unwrap();

        let ranked = facade.importances().unwrap();
        assert_eq!(ranked.len(), 11);
        assert_eq!(ranked[0], ("Sleep Duration", 0.30));
        assert_eq!(ranked[1].0, "Quality of Sleep");
    }

    #[test]
    fn test_stub_has_no_importances() {
        assert!(fixed_facade(SleepDisorder::Healthy).importances().is_none());
    }
}
