//! Plain-text health report
//!
//! The report is a pure function of its inputs and the supplied timestamp;
//! generating twice with the same arguments yields identical text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::profile::HealthProfile;
use crate::recommend::RecommendationSet;
use crate::score::SleepScore;
use crate::types::AssessmentResult;

const TITLE: &str = "SLEEP HEALTH ANALYSIS REPORT";
const RULE: &str = "----------------------------------------";

/// Generated report document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Suggested download name, e.g. `Sleep_Health_Report_20240131.txt`
    pub fn file_name(&self) -> String {
        format!("Sleep_Health_Report_{}.txt", self.generated_at.format("%Y%m%d"))
    }
}

/// Remove on-screen emphasis: `**` markers and a leading emoji
pub fn strip_markup(text: &str) -> String {
    let text = text.replace("**", "");
    text.trim_start_matches(|c: char| !c.is_ascii() || c.is_whitespace())
        .to_string()
}

/// Deterministic report renderer
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn generate(
        profile: &HealthProfile,
        result: &AssessmentResult,
        sleep_score: Option<&SleepScore>,
        recommendations: &RecommendationSet,
        timestamp: DateTime<Utc>,
    ) -> Report {
        let mut lines = vec![
            TITLE.to_string(),
            format!("Date: {}", timestamp.format("%Y-%m-%d %H:%M:%S")),
            RULE.to_string(),
            "USER PROFILE:".to_string(),
            format!("- Gender: {}", profile.sex),
            format!("- Age: {}", profile.age),
            format!("- Occupation: {}", profile.occupation),
            format!("- BMI Category: {}", profile.bmi_category),
            // Debug keeps every entered digit, and "7.0" rather than "7"
            format!("- Sleep Duration: {:?} hrs", profile.sleep_duration),
            format!("- Sleep Quality: {}/10", profile.sleep_quality),
            format!("- Stress Level: {}/10", profile.stress_level),
            format!("- Physical Activity: {} mins/day", profile.physical_activity),
            format!("- Heart Rate: {} bpm", profile.heart_rate),
            format!("- Daily Steps: {}", profile.daily_steps),
            format!("- Blood Pressure: {}", profile.blood_pressure()),
            RULE.to_string(),
            "ANALYSIS RESULT:".to_string(),
            format!("Prediction: {}", result.label),
            format!("Risk Level: {}/100", result.risk_score),
        ];
        if let Some(score) = sleep_score {
            lines.push(format!("Sleep Score: {}/100 ({})", score.value, score.band));
        }
        lines.push(RULE.to_string());

        lines.push("RECOMMENDATIONS:".to_string());
        lines.extend(
            recommendations
                .iter()
                .map(|item| format!("- {}", strip_markup(&item.markup()))),
        );

        let text = lines.join("\n") + "\n";

        Report {
            text,
            generated_at: timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::sample_profile;
    use crate::recommend::{recommend, Recommendation};
    use crate::rules::risk_score;
    use crate::score::score;
    use crate::types::SleepDisorder;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn healthy_result() -> AssessmentResult {
        AssessmentResult {
            label: SleepDisorder::Healthy,
            risk_score: risk_score(SleepDisorder::Healthy),
            raw_label: SleepDisorder::Healthy,
            override_rule: None,
        }
    }

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 31, 21, 5, 9).unwrap()
    }

    #[test]
    fn test_reference_report() {
        let profile = sample_profile();
        let recs = recommend(7.5, 8, 3, 45, profile.bmi_category, 65);
        let sleep = score(7.5, 8, 3, 45, 65);

        let report =
            ReportGenerator::generate(&profile, &healthy_result(), Some(&sleep), &recs, timestamp());

        let expected = "\
SLEEP HEALTH ANALYSIS REPORT
Date: 2024-01-31 21:05:09
----------------------------------------
USER PROFILE:
- Gender: Male
- Age: 35
- Occupation: Software Engineer
- BMI Category: Normal
- Sleep Duration: 7.5 hrs
- Sleep Quality: 8/10
- Stress Level: 3/10
- Physical Activity: 45 mins/day
- Heart Rate: 65 bpm
- Daily Steps: 8000
- Blood Pressure: 120/80
----------------------------------------
ANALYSIS RESULT:
Prediction: Healthy
Risk Level: 15/100
Sleep Score: 89/100 (Good)
----------------------------------------
RECOMMENDATIONS:
- Keep it up!: Your habits seem conducive to good sleep health.
";
        assert_eq!(report.text, expected);
        assert_eq!(report.file_name(), "Sleep_Health_Report_20240131.txt");
    }

    #[test]
    fn test_deterministic() {
        let profile = sample_profile();
        let recs = recommend(4.0, 3, 9, 10, profile.bmi_category, 95);

        let a = ReportGenerator::generate(&profile, &healthy_result(), None, &recs, timestamp());
        let b = ReportGenerator::generate(&profile, &healthy_result(), None, &recs, timestamp());
        assert_eq!(a, b);
        assert!(!a.text.contains("Sleep Score"));
    }

    #[test]
    fn test_recommendations_have_no_markup() {
        let profile = sample_profile();
        let recs = recommend(4.0, 3, 9, 10, profile.bmi_category, 95);
        let report = ReportGenerator::generate(&profile, &healthy_result(), None, &recs, timestamp());

        assert!(!report.text.contains("**"));
        assert!(report.text.is_ascii());
        assert!(report.text.contains("- Increase Sleep Duration: Aim for at least 7 hours"));
    }

    #[test]
    fn test_sleep_duration_is_not_rounded() {
        let mut profile = sample_profile();
        profile.sleep_duration = 4.96;
        let result = AssessmentResult {
            label: SleepDisorder::Insomnia,
            risk_score: risk_score(SleepDisorder::Insomnia),
            raw_label: SleepDisorder::Healthy,
            override_rule: Some(crate::rules::OverrideRule::ShortSleep),
        };
        let recs = recommend(4.96, 8, 3, 45, profile.bmi_category, 65);

        let report = ReportGenerator::generate(&profile, &result, None, &recs, timestamp());
        assert!(report.text.contains("- Sleep Duration: 4.96 hrs\n"));

        profile.sleep_duration = 7.0;
        let report = ReportGenerator::generate(&profile, &result, None, &recs, timestamp());
        assert!(report.text.contains("- Sleep Duration: 7.0 hrs\n"));
    }

    #[test]
    fn test_strip_markup_matches_plain_form() {
        for item in [
            Recommendation::IncreaseSleep,
            Recommendation::RegulateSleep,
            Recommendation::SleepHygiene,
            Recommendation::ManageStress,
            Recommendation::GetMoving,
            Recommendation::WatchWeight,
            Recommendation::MonitorHeartRate,
            Recommendation::KeepItUp,
        ] {
            assert_eq!(strip_markup(&item.markup()), item.plain());
        }
    }
}
