//! Pipeline orchestration
//!
//! This module provides the public API for a single risk assessment. It runs
//! every stage for one profile:
//!
//! 1. CategoricalEncoder - Map sex, BMI and occupation to model codes
//! 2. FeatureVectorBuilder - Assemble the ordered feature record
//! 3. ClassifierFacade - Raw label from the loaded model
//! 4. OverrideEngine - Clinical override rules and risk score
//! 5. score / recommend - Independent of the model
//! 6. ReportGenerator - Text report when a label exists
//!
//! Per-request problems never abort the run; they are logged and recorded as
//! flags on the returned `Assessment`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::encoder::EncodingWarning;
use crate::error::AssessmentError;
use crate::features::FeatureVectorBuilder;
use crate::model::{ArtifactPaths, ClassifierFacade};
use crate::profile::HealthProfile;
use crate::recommend::recommend;
use crate::report::ReportGenerator;
use crate::rules::OverrideEngine;
use crate::score::{score, SleepScore};
use crate::types::{Assessment, AssessmentFlag, AssessmentResult, SleepDisorder};

/// Caller-held assessment context.
///
/// Owns the loaded classifier; clone it or wrap it in an `Arc` to share
/// across threads.
#[derive(Debug, Clone)]
pub struct AssessmentPipeline {
    classifier: ClassifierFacade,
}

impl AssessmentPipeline {
    pub fn new(classifier: ClassifierFacade) -> Self {
        Self { classifier }
    }

    /// Load artifacts and build a pipeline
    pub fn from_paths(paths: &ArtifactPaths) -> Result<Self, AssessmentError> {
        Ok(Self::new(ClassifierFacade::load(paths)?))
    }

    pub fn classifier(&self) -> &ClassifierFacade {
        &self.classifier
    }

    /// Assess a profile, timestamped now
    pub fn assess(&self, profile: &HealthProfile) -> Assessment {
        self.assess_at(profile, Utc::now())
    }

    /// Assess a profile with an explicit timestamp
    pub fn assess_at(&self, profile: &HealthProfile, at: DateTime<Utc>) -> Assessment {
        let mut flags = Vec::new();

        let result = self.classify(profile, &mut flags);
        let sleep_score = score(
            profile.sleep_duration,
            profile.sleep_quality,
            profile.stress_level,
            profile.physical_activity,
            profile.heart_rate,
        );
        let recommendations = recommend(
            profile.sleep_duration,
            profile.sleep_quality,
            profile.stress_level,
            profile.physical_activity,
            profile.bmi_category,
            profile.heart_rate,
        );

        let report = result.as_ref().map(|result| {
            ReportGenerator::generate(profile, result, Some(&sleep_score), &recommendations, at)
        });

        Assessment {
            id: Uuid::new_v4(),
            assessed_at: at,
            profile: profile.clone(),
            result,
            sleep_score,
            recommendations,
            report,
            flags,
        }
    }

    /// Range-check the profile first and reject it instead of assessing
    /// out-of-range values
    pub fn assess_validated(&self, profile: &HealthProfile) -> Result<Assessment, AssessmentError> {
        if let Err(errors) = profile.validate() {
            let detail = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AssessmentError::InvalidProfile(detail));
        }
        Ok(self.assess(profile))
    }

    /// Parse a profile from JSON, assess it and serialize the assessment
    pub fn assess_json(&self, profile_json: &str) -> Result<String, AssessmentError> {
        let profile: HealthProfile = serde_json::from_str(profile_json)?;
        let assessment = self.assess(&profile);
        Ok(serde_json::to_string(&assessment)?)
    }

    fn classify(
        &self,
        profile: &HealthProfile,
        flags: &mut Vec<AssessmentFlag>,
    ) -> Option<AssessmentResult> {
        let Some(layout) = self.classifier.layout() else {
            tracing::debug!(
                reason = self.classifier.unavailable_reason().unwrap_or_default(),
                "skipping inference"
            );
            flags.push(AssessmentFlag::ModelUnavailable);
            return None;
        };

        let encoded = self.classifier.encoder().encode(profile);
        if encoded
            .warnings
            .iter()
            .any(|w| matches!(w, EncodingWarning::UnknownOccupation(_)))
        {
            flags.push(AssessmentFlag::UnknownOccupation);
        }

        let features = FeatureVectorBuilder::build(profile, &encoded, layout);
        let raw = match self.classifier.predict(&features) {
            Ok(label) => label,
            Err(AssessmentError::ModelUnavailable(reason)) => {
                tracing::warn!(%reason, "model unavailable");
                flags.push(AssessmentFlag::ModelUnavailable);
                return None;
            }
            Err(e) => {
                tracing::error!(error = %e, "inference failed");
                flags.push(AssessmentFlag::InferenceFailed);
                return None;
            }
        };

        let result = OverrideEngine::assess(raw, profile);
        if result.override_rule.is_some() {
            flags.push(AssessmentFlag::RuleOverride);
        }
        Some(result)
    }

    /// Compare the current profile against adjusted habits
    pub fn simulate(&self, profile: &HealthProfile, what_if: &WhatIf) -> Simulation {
        let at = Utc::now();
        let current = self.assess_at(profile, at);
        let simulated = self.assess_at(&what_if.apply(profile), at);
        Simulation::compare(current, simulated)
    }
}

/// Habit adjustments for a what-if run; unset fields keep the current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WhatIf {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_activity: Option<u32>,
}

impl WhatIf {
    pub fn is_empty(&self) -> bool {
        self.sleep_duration.is_none()
            && self.sleep_quality.is_none()
            && self.stress_level.is_none()
            && self.physical_activity.is_none()
    }

    /// Adjusted copy of `profile`
    pub fn apply(&self, profile: &HealthProfile) -> HealthProfile {
        HealthProfile {
            sleep_duration: self.sleep_duration.unwrap_or(profile.sleep_duration),
            sleep_quality: self.sleep_quality.unwrap_or(profile.sleep_quality),
            stress_level: self.stress_level.unwrap_or(profile.stress_level),
            physical_activity: self.physical_activity.unwrap_or(profile.physical_activity),
            ..profile.clone()
        }
    }
}

/// Interpretation of a score change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    GreatImprovement,
    PositiveChange,
    Decline,
    MinimalChange,
}

impl Verdict {
    pub fn from_delta(delta: i16) -> Self {
        if delta > 10 {
            Verdict::GreatImprovement
        } else if delta > 0 {
            Verdict::PositiveChange
        } else if delta < -10 {
            Verdict::Decline
        } else {
            Verdict::MinimalChange
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::GreatImprovement => {
                "Great improvement! These changes could significantly boost your sleep health."
            }
            Verdict::PositiveChange => {
                "Positive change. These adjustments would help improve your sleep."
            }
            Verdict::Decline => "Decline detected. These changes could worsen your sleep health.",
            Verdict::MinimalChange => {
                "Minimal change. Try adjusting other factors for better results."
            }
        }
    }
}

/// Outcome of a what-if run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    pub current: Assessment,
    pub simulated: Assessment,
    /// Simulated minus current sleep score
    pub score_delta: i16,
    pub verdict: Verdict,
}

impl Simulation {
    fn compare(current: Assessment, simulated: Assessment) -> Self {
        let score_delta =
            i16::from(simulated.sleep_score.value) - i16::from(current.sleep_score.value);
        Self {
            current,
            simulated,
            score_delta,
            verdict: Verdict::from_delta(score_delta),
        }
    }

    pub fn current_score(&self) -> &SleepScore {
        &self.current.sleep_score
    }

    pub fn simulated_score(&self) -> &SleepScore {
        &self.simulated.sleep_score
    }

    pub fn current_label(&self) -> Option<SleepDisorder> {
        self.current.result.as_ref().map(|r| r.label)
    }

    pub fn simulated_label(&self) -> Option<SleepDisorder> {
        self.simulated.result.as_ref().map(|r| r.label)
    }

    /// True when both labels exist and differ
    pub fn label_changed(&self) -> bool {
        matches!(
            (self.current_label(), self.simulated_label()),
            (Some(a), Some(b)) if a != b
        )
    }
}
