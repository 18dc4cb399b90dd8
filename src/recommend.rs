//! Lifestyle recommendations
//!
//! Each check is independent; a profile can trigger any number of them. When
//! none fires, the set holds a single affirmation so it is never empty.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::profile::BmiCategory;

/// Advisory item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    IncreaseSleep,
    RegulateSleep,
    SleepHygiene,
    ManageStress,
    GetMoving,
    WatchWeight,
    MonitorHeartRate,
    KeepItUp,
}

impl Recommendation {
    pub fn title(&self) -> &'static str {
        match self {
            Recommendation::IncreaseSleep => "Increase Sleep Duration",
            Recommendation::RegulateSleep => "Regulate Sleep Pattern",
            Recommendation::SleepHygiene => "Improve Sleep Hygiene",
            Recommendation::ManageStress => "Manage Stress",
            Recommendation::GetMoving => "Get Moving",
            Recommendation::WatchWeight => "Watch Your Weight",
            Recommendation::MonitorHeartRate => "Monitor Heart Rate",
            Recommendation::KeepItUp => "Keep it up!",
        }
    }

    pub fn body(&self) -> &'static str {
        match self {
            Recommendation::IncreaseSleep => {
                "Aim for at least 7 hours of sleep. Consistent lack of sleep increases health risks."
            }
            Recommendation::RegulateSleep => {
                "Oversleeping can sometimes indicate underlying issues. Try to stick to a consistent 7-8 hour schedule."
            }
            Recommendation::SleepHygiene => {
                "Your sleep quality is low. Avoid screens before bed, keep your room cool, and limit caffeine."
            }
            Recommendation::ManageStress => {
                "High stress negatively impacts sleep. Consider meditation, deep breathing exercises, or yoga."
            }
            Recommendation::GetMoving => {
                "Regular physical activity (at least 30 mins/day) promotes deeper sleep."
            }
            Recommendation::WatchWeight => {
                "Maintaining a healthy weight can significantly reduce the risk of sleep apnea and insomnia."
            }
            Recommendation::MonitorHeartRate => {
                "Your resting heart rate is slightly high. Regular cardio and stress reduction can help."
            }
            Recommendation::KeepItUp => "Your habits seem conducive to good sleep health.",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Recommendation::IncreaseSleep => "⚠️",
            Recommendation::RegulateSleep => "ℹ️",
            Recommendation::SleepHygiene => "🌙",
            Recommendation::ManageStress => "🧘",
            Recommendation::GetMoving => "🏃",
            Recommendation::WatchWeight => "🍎",
            Recommendation::MonitorHeartRate => "❤️",
            Recommendation::KeepItUp => "✅",
        }
    }

    /// On-screen form: `<emoji> **Title**: body`
    pub fn markup(&self) -> String {
        format!("{} **{}**: {}", self.emoji(), self.title(), self.body())
    }

    /// Plain-text form: `Title: body`
    pub fn plain(&self) -> String {
        format!("{}: {}", self.title(), self.body())
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.body())
    }
}

/// Ordered, non-empty list of recommendations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Recommendation>", into = "Vec<Recommendation>")]
pub struct RecommendationSet {
    items: Vec<Recommendation>,
}

impl RecommendationSet {
    pub fn items(&self) -> &[Recommendation] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: Recommendation) -> bool {
        self.items.contains(&item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recommendation> {
        self.items.iter()
    }

    pub fn markup_lines(&self) -> Vec<String> {
        self.items.iter().map(Recommendation::markup).collect()
    }
}

impl TryFrom<Vec<Recommendation>> for RecommendationSet {
    type Error = &'static str;

    fn try_from(items: Vec<Recommendation>) -> Result<Self, Self::Error> {
        if items.is_empty() {
            return Err("recommendation set cannot be empty");
        }
        Ok(Self { items })
    }
}

impl From<RecommendationSet> for Vec<Recommendation> {
    fn from(set: RecommendationSet) -> Self {
        set.items
    }
}

impl<'a> IntoIterator for &'a RecommendationSet {
    type Item = &'a Recommendation;
    type IntoIter = std::slice::Iter<'a, Recommendation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Evaluate every check in order
pub fn recommend(
    duration: f64,
    quality: u32,
    stress: u32,
    activity: u32,
    bmi: BmiCategory,
    heart_rate: u32,
) -> RecommendationSet {
    let mut items = Vec::new();

    if duration < 6.0 {
        items.push(Recommendation::IncreaseSleep);
    } else if duration > 9.0 {
        items.push(Recommendation::RegulateSleep);
    }
    if quality < 6 {
        items.push(Recommendation::SleepHygiene);
    }
    if stress > 6 {
        items.push(Recommendation::ManageStress);
    }
    if activity < 30 {
        items.push(Recommendation::GetMoving);
    }
    if bmi != BmiCategory::Normal {
        items.push(Recommendation::WatchWeight);
    }
    if heart_rate > 80 {
        items.push(Recommendation::MonitorHeartRate);
    }

    if items.is_empty() {
        items.push(Recommendation::KeepItUp);
    }

    RecommendationSet { items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reference_profile_gets_affirmation_only() {
        let set = recommend(7.5, 8, 3, 45, BmiCategory::Normal, 65);
        assert_eq!(set.items(), &[Recommendation::KeepItUp]);
    }

    #[test]
    fn test_all_checks_fire_in_order() {
        let set = recommend(4.0, 3, 9, 10, BmiCategory::Obese, 95);
        assert_eq!(
            set.items(),
            &[
                Recommendation::IncreaseSleep,
                Recommendation::SleepHygiene,
                Recommendation::ManageStress,
                Recommendation::GetMoving,
                Recommendation::WatchWeight,
                Recommendation::MonitorHeartRate,
            ]
        );
    }

    #[test]
    fn test_oversleep() {
        let set = recommend(9.5, 8, 3, 45, BmiCategory::Normal, 65);
        assert_eq!(set.items(), &[Recommendation::RegulateSleep]);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let set = recommend(6.0, 6, 6, 30, BmiCategory::Normal, 80);
        assert_eq!(set.items(), &[Recommendation::KeepItUp]);
    }

    #[test]
    fn test_never_empty() {
        for duration in [0.0, 5.9, 6.0, 9.0, 9.1, 12.0] {
            for quality in 1..=10 {
                for stress in 1..=10 {
                    for bmi in [BmiCategory::Normal, BmiCategory::Overweight] {
                        let set = recommend(duration, quality, stress, 20, bmi, 70);
                        assert!(!set.is_empty());
                    }
                }
            }
        }
    }

    #[test]
    fn test_markup_and_plain_forms() {
        let item = Recommendation::ManageStress;
        assert_eq!(
            item.markup(),
            "🧘 **Manage Stress**: High stress negatively impacts sleep. Consider meditation, deep breathing exercises, or yoga."
        );
        assert!(!item.plain().contains("**"));
        assert!(item.plain().starts_with("Manage Stress: "));
    }

    #[test]
    fn test_empty_set_rejected_on_deserialize() {
        assert!(serde_json::from_str::<RecommendationSet>("[]").is_err());
        let set: RecommendationSet = serde_json::from_str(r#"["get_moving"]"#).unwrap();
        assert!(set.contains(Recommendation::GetMoving));
    }
}
