//! Core types for the assessment pipeline
//!
//! This module defines the data that flows out of each stage: the sleep
//! disorder label, the resolved assessment result, and the flags attached to
//! an assessment when a stage had to fall back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::profile::HealthProfile;
use crate::recommend::RecommendationSet;
use crate::report::Report;
use crate::rules::OverrideRule;
use crate::score::SleepScore;

/// Sleep disorder class predicted by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SleepDisorder {
    Healthy,
    Insomnia,
    #[serde(rename = "Sleep Apnea")]
    SleepApnea,
}

impl SleepDisorder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SleepDisorder::Healthy => "Healthy",
            SleepDisorder::Insomnia => "Insomnia",
            SleepDisorder::SleepApnea => "Sleep Apnea",
        }
    }

    /// Parse a class name as written by the target label encoder.
    ///
    /// The training data records "no disorder" as "None"; it maps to Healthy.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Healthy" | "None" => Some(SleepDisorder::Healthy),
            "Insomnia" => Some(SleepDisorder::Insomnia),
            "Sleep Apnea" => Some(SleepDisorder::SleepApnea),
            _ => None,
        }
    }

    /// One-line clinical summary shown next to the label
    pub fn summary(&self) -> &'static str {
        match self {
            SleepDisorder::Healthy => "Patient shows no signs of sleep disorders.",
            SleepDisorder::Insomnia => "Symptoms consistent with Insomnia. Monitor sleep hygiene.",
            SleepDisorder::SleepApnea => {
                "High probability of Sleep Apnea. Clinical consultation recommended."
            }
        }
    }
}

impl fmt::Display for SleepDisorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final label and risk score for one assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Label after the override rules
    pub label: SleepDisorder,
    /// Fixed severity for the final label (0-100)
    pub risk_score: u8,
    /// Label the classifier produced before overrides
    pub raw_label: SleepDisorder,
    /// Rule that replaced the raw label, if any
    pub override_rule: Option<OverrideRule>,
}

/// Flag indicating a stage fell back or changed the model output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentFlag {
    /// Occupation missing from the training label table, encoded as 0
    UnknownOccupation,
    /// Classifier artifacts absent; no label was produced
    ModelUnavailable,
    /// Classifier rejected the feature vector at call time
    InferenceFailed,
    /// An override rule replaced the classifier label
    RuleOverride,
}

/// Complete output of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: Uuid,
    pub assessed_at: DateTime<Utc>,
    pub profile: HealthProfile,
    /// Absent when the classifier is unavailable
    pub result: Option<AssessmentResult>,
    pub sleep_score: SleepScore,
    pub recommendations: RecommendationSet,
    /// Absent when there is no result to report
    pub report: Option<Report>,
    pub flags: Vec<AssessmentFlag>,
}

impl Assessment {
    pub fn has_flag(&self, flag: &AssessmentFlag) -> bool {
        self.flags.contains(flag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parsing() {
        assert_eq!(SleepDisorder::from_label("None"), Some(SleepDisorder::Healthy));
        assert_eq!(
            SleepDisorder::from_label("Sleep Apnea"),
            Some(SleepDisorder::SleepApnea)
        );
        assert_eq!(SleepDisorder::from_label("Narcolepsy"), None);
    }

    #[test]
    fn test_label_serializes_with_display_name() {
        let json = serde_json::to_string(&SleepDisorder::SleepApnea).unwrap();
        assert_eq!(json, "\"Sleep Apnea\"");
    }

    #[test]
    fn test_flags_serialize_snake_case() {
        let json = serde_json::to_string(&AssessmentFlag::UnknownOccupation).unwrap();
        assert_eq!(json, "\"unknown_occupation\"");
    }
}
