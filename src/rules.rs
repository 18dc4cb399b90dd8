//! Clinical override rules
//!
//! A statistical prediction can contradict hard clinical thresholds. The
//! rules below are evaluated in order on top of the classifier output and
//! the first match wins:
//!
//! 1. sleep duration < 5.0 h → Insomnia
//! 2. sleep duration > 10.0 h → Sleep Apnea
//! 3. stress ≥ 9 and sleep quality ≤ 3 → Insomnia
//! 4. heart rate > 100 or < 50 bpm, with a Healthy raw label → Sleep Apnea
//!
//! Otherwise the raw label stands. Nothing here depends on the model.

use serde::{Deserialize, Serialize};

use crate::profile::HealthProfile;
use crate::types::{AssessmentResult, SleepDisorder};

/// Risk score attached to a final label; a fixed table, not a probability
pub fn risk_score(label: SleepDisorder) -> u8 {
    match label {
        SleepDisorder::Healthy => 15,
        SleepDisorder::Insomnia => 65,
        SleepDisorder::SleepApnea => 92,
    }
}

/// Override rule that replaced a classifier label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideRule {
    ShortSleep,
    LongSleep,
    StressedPoorSleep,
    AbnormalHeartRate,
}

impl OverrideRule {
    /// Rules in evaluation order
    pub const ORDER: [OverrideRule; 4] = [
        OverrideRule::ShortSleep,
        OverrideRule::LongSleep,
        OverrideRule::StressedPoorSleep,
        OverrideRule::AbnormalHeartRate,
    ];

    /// Label forced by this rule, or `None` when its condition does not hold
    fn apply(&self, raw: SleepDisorder, profile: &HealthProfile) -> Option<SleepDisorder> {
        match self {
            OverrideRule::ShortSleep => {
                (profile.sleep_duration < 5.0).then_some(SleepDisorder::Insomnia)
            }
            OverrideRule::LongSleep => {
                (profile.sleep_duration > 10.0).then_some(SleepDisorder::SleepApnea)
            }
            OverrideRule::StressedPoorSleep => (profile.stress_level >= 9
                && profile.sleep_quality <= 3)
                .then_some(SleepDisorder::Insomnia),
            OverrideRule::AbnormalHeartRate => {
                let abnormal = profile.heart_rate > 100 || profile.heart_rate < 50;
                (abnormal && raw == SleepDisorder::Healthy).then_some(SleepDisorder::SleepApnea)
            }
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OverrideRule::ShortSleep => "sleep duration below 5 hours",
            OverrideRule::LongSleep => "sleep duration above 10 hours",
            OverrideRule::StressedPoorSleep => "stress of 9 or more with sleep quality of 3 or less",
            OverrideRule::AbnormalHeartRate => "resting heart rate outside 50-100 bpm",
        }
    }
}

/// Outcome of rule evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub label: SleepDisorder,
    pub rule: Option<OverrideRule>,
}

/// Ordered, short-circuiting override rule set
pub struct OverrideEngine;

impl OverrideEngine {
    /// Resolve the final label for a raw classifier label
    pub fn resolve(raw: SleepDisorder, profile: &HealthProfile) -> Resolution {
        for rule in OverrideRule::ORDER {
            if let Some(label) = rule.apply(raw, profile) {
                return Resolution {
                    label,
                    rule: Some(rule),
                };
            }
        }

        Resolution {
            label: raw,
            rule: None,
        }
    }

    /// Resolve and attach the risk score
    pub fn assess(raw: SleepDisorder, profile: &HealthProfile) -> AssessmentResult {
        let resolution = Self::resolve(raw, profile);

        // A rule can fire and still land on the raw label (e.g. rule 1 when
        // the model already said Insomnia); only real changes are overrides.
        let override_rule = resolution.rule.filter(|_| resolution.label != raw);
        if let Some(rule) = override_rule {
            tracing::info!(
                raw = raw.as_str(),
                label = resolution.label.as_str(),
                rule = ?rule,
                "override rule replaced classifier label"
            );
        }

        AssessmentResult {
            label: resolution.label,
            risk_score: risk_score(resolution.label),
            raw_label: raw,
            override_rule,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::sample_profile;

    const ALL: [SleepDisorder; 3] = [
        SleepDisorder::Healthy,
        SleepDisorder::Insomnia,
        SleepDisorder::SleepApnea,
    ];

    #[test]
    fn test_short_sleep_always_insomnia() {
        let mut profile = sample_profile();
        for duration in [0.0, 2.5, 4.0, 4.99] {
            profile.sleep_duration = duration;
            // Even with other rules' conditions present
            profile.heart_rate = 110;
            for raw in ALL {
                let resolution = OverrideEngine::resolve(raw, &profile);
                assert_eq!(resolution.label, SleepDisorder::Insomnia);
                assert_eq!(resolution.rule, Some(OverrideRule::ShortSleep));
            }
        }
    }

    #[test]
    fn test_long_sleep_always_apnea() {
        let mut profile = sample_profile();
        profile.stress_level = 10;
        profile.sleep_quality = 1;
        for duration in [10.01, 11.0, 12.0] {
            profile.sleep_duration = duration;
            for raw in ALL {
                assert_eq!(
                    OverrideEngine::resolve(raw, &profile).label,
                    SleepDisorder::SleepApnea
                );
            }
        }
    }

    #[test]
    fn test_boundaries_do_not_fire() {
        let mut profile = sample_profile();
        profile.sleep_duration = 5.0;
        assert_eq!(
            OverrideEngine::resolve(SleepDisorder::Healthy, &profile).rule,
            None
        );

        profile.sleep_duration = 10.0;
        assert_eq!(
            OverrideEngine::resolve(SleepDisorder::Healthy, &profile).rule,
            None
        );
    }

    #[test]
    fn test_stress_and_poor_quality() {
        let mut profile = sample_profile();
        profile.stress_level = 9;
        profile.sleep_quality = 3;
        let resolution = OverrideEngine::resolve(SleepDisorder::SleepApnea, &profile);
        assert_eq!(resolution.label, SleepDisorder::Insomnia);

        profile.sleep_quality = 4;
        let resolution = OverrideEngine::resolve(SleepDisorder::SleepApnea, &profile);
        assert_eq!(resolution.label, SleepDisorder::SleepApnea);
        assert_eq!(resolution.rule, None);
    }

    #[test]
    fn test_abnormal_heart_rate_only_overrides_healthy() {
        let mut profile = sample_profile();
        for hr in [45, 101] {
            profile.heart_rate = hr;
            assert_eq!(
                OverrideEngine::resolve(SleepDisorder::Healthy, &profile).label,
                SleepDisorder::SleepApnea
            );
            assert_eq!(
                OverrideEngine::resolve(SleepDisorder::Insomnia, &profile).label,
                SleepDisorder::Insomnia
            );
        }

        for hr in [50, 100] {
            profile.heart_rate = hr;
            assert_eq!(
                OverrideEngine::resolve(SleepDisorder::Healthy, &profile).label,
                SleepDisorder::Healthy
            );
        }
    }

    #[test]
    fn test_first_match_wins() {
        let mut profile = sample_profile();
        profile.sleep_duration = 11.0;
        profile.stress_level = 10;
        profile.sleep_quality = 2;
        profile.heart_rate = 120;

        let resolution = OverrideEngine::resolve(SleepDisorder::Healthy, &profile);
        assert_eq!(resolution.rule, Some(OverrideRule::LongSleep));
    }

    #[test]
    fn test_risk_table() {
        assert_eq!(risk_score(SleepDisorder::Healthy), 15);
        assert_eq!(risk_score(SleepDisorder::Insomnia), 65);
        assert_eq!(risk_score(SleepDisorder::SleepApnea), 92);
    }

    #[test]
    fn test_assess_records_only_real_overrides() {
        let mut profile = sample_profile();
        profile.sleep_duration = 4.0;

        let unchanged = OverrideEngine::assess(SleepDisorder::Insomnia, &profile);
        assert_eq!(unchanged.override_rule, None);
        assert_eq!(unchanged.risk_score, 65);

        let changed = OverrideEngine::assess(SleepDisorder::Healthy, &profile);
        assert_eq!(changed.label, SleepDisorder::Insomnia);
        assert_eq!(changed.raw_label, SleepDisorder::Healthy);
        assert_eq!(changed.override_rule, Some(OverrideRule::ShortSleep));
    }
}
