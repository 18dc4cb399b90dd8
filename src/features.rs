//! Feature vector construction
//!
//! This module assembles the ordered numeric record fed to the classifier.
//! Two layouts exist depending on whether the deployed forest was trained
//! with the Occupation column:
//!
//! ```text
//! Gender, Age, [Occupation], Sleep Duration, Quality of Sleep,
//! Physical Activity Level, Stress Level, BMI Category, Heart Rate,
//! Daily Steps, BP_Systolic, BP_Diastolic
//! ```

use serde::{Deserialize, Serialize};

use crate::encoder::{EncodedCategoricals, DEFAULT_OCCUPATION_CODE};
use crate::profile::HealthProfile;

/// Column names of the layout without occupation
pub const STANDARD_COLUMNS: [&str; 11] = [
    "Gender",
    "Age",
    "Sleep Duration",
    "Quality of Sleep",
    "Physical Activity Level",
    "Stress Level",
    "BMI Category",
    "Heart Rate",
    "Daily Steps",
    "BP_Systolic",
    "BP_Diastolic",
];

/// Column names of the layout with occupation
pub const OCCUPATION_COLUMNS: [&str; 12] = [
    "Gender",
    "Age",
    "Occupation",
    "Sleep Duration",
    "Quality of Sleep",
    "Physical Activity Level",
    "Stress Level",
    "BMI Category",
    "Heart Rate",
    "Daily Steps",
    "BP_Systolic",
    "BP_Diastolic",
];

/// Column layout a forest artifact was trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureLayout {
    Standard,
    WithOccupation,
}

impl FeatureLayout {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            FeatureLayout::Standard => &STANDARD_COLUMNS,
            FeatureLayout::WithOccupation => &OCCUPATION_COLUMNS,
        }
    }

    pub fn len(&self) -> usize {
        self.columns().len()
    }

    pub fn includes_occupation(&self) -> bool {
        matches!(self, FeatureLayout::WithOccupation)
    }

    /// Match declared column names exactly, order included
    pub fn from_columns<S: AsRef<str>>(names: &[S]) -> Option<Self> {
        [FeatureLayout::Standard, FeatureLayout::WithOccupation]
            .into_iter()
            .find(|layout| {
                let columns = layout.columns();
                columns.len() == names.len()
                    && columns.iter().zip(names).all(|(c, n)| *c == n.as_ref())
            })
    }

    /// Infer the layout from a bare column count
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            n if n == STANDARD_COLUMNS.len() => Some(FeatureLayout::Standard),
            n if n == OCCUPATION_COLUMNS.len() => Some(FeatureLayout::WithOccupation),
            _ => None,
        }
    }
}

/// Ordered numeric feature record
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    layout: FeatureLayout,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named column
    pub fn get(&self, column: &str) -> Option<f64> {
        self.layout
            .columns()
            .iter()
            .position(|c| *c == column)
            .and_then(|i| self.values.get(i).copied())
    }

    /// (column, value) pairs in layout order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.layout.columns().iter().copied().zip(self.values.iter().copied())
    }
}

/// Builder for feature vectors
pub struct FeatureVectorBuilder;

impl FeatureVectorBuilder {
    /// Build the feature vector for `layout` from a profile and its codes
    pub fn build(
        profile: &HealthProfile,
        encoded: &EncodedCategoricals,
        layout: FeatureLayout,
    ) -> FeatureVector {
        let mut values = Vec::with_capacity(layout.len());

        values.push(f64::from(encoded.sex));
        values.push(f64::from(profile.age));

        if layout.includes_occupation() {
            let code = encoded.occupation.unwrap_or(DEFAULT_OCCUPATION_CODE);
            values.push(f64::from(code));
        }

        values.push(profile.sleep_duration);
        values.push(f64::from(profile.sleep_quality));
        values.push(f64::from(profile.physical_activity));
        values.push(f64::from(profile.stress_level));
        values.push(f64::from(encoded.bmi_category));
        values.push(f64::from(profile.heart_rate));
        values.push(f64::from(profile.daily_steps));
        values.push(f64::from(profile.bp_systolic));
        values.push(f64::from(profile.bp_diastolic));

        debug_assert_eq!(values.len(), layout.len());

        FeatureVector { layout, values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::CategoricalEncoder;
    use crate::profile::sample_profile;
    use pretty_assertions::assert_eq;

    fn encoded_with_occupation(code: u32) -> EncodedCategoricals {
        EncodedCategoricals {
            sex: 1,
            bmi_category: 2,
            occupation: Some(code),
            warnings: vec![],
        }
    }

    #[test]
    fn test_standard_layout_order() {
        let profile = sample_profile();
        let encoded = CategoricalEncoder::new().encode(&profile);
        let vector = FeatureVectorBuilder::build(&profile, &encoded, FeatureLayout::Standard);

        assert_eq!(
            vector.values(),
            &[0.0, 35.0, 7.5, 8.0, 45.0, 3.0, 0.0, 65.0, 8000.0, 120.0, 80.0]
        );
        assert_eq!(vector.get("Occupation"), None);
    }

    #[test]
    fn test_occupation_layout_inserts_third_column() {
        let profile = sample_profile();
        let vector = FeatureVectorBuilder::build(
            &profile,
            &encoded_with_occupation(9),
            FeatureLayout::WithOccupation,
        );

        assert_eq!(vector.len(), 12);
        assert_eq!(vector.values()[2], 9.0);
        assert_eq!(vector.get("BMI Category"), Some(2.0));
        assert_eq!(vector.get("BP_Diastolic"), Some(80.0));
    }

    #[test]
    fn test_missing_occupation_code_uses_default() {
        let profile = sample_profile();
        let encoded = CategoricalEncoder::new().encode(&profile);
        let vector =
            FeatureVectorBuilder::build(&profile, &encoded, FeatureLayout::WithOccupation);

        assert_eq!(vector.get("Occupation"), Some(0.0));
    }

    #[test]
    fn test_layout_detection() {
        let names: Vec<String> = OCCUPATION_COLUMNS.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            FeatureLayout::from_columns(&names),
            Some(FeatureLayout::WithOccupation)
        );

        let mut swapped = names.clone();
        swapped.swap(0, 1);
        assert_eq!(FeatureLayout::from_columns(&swapped), None);

        assert_eq!(FeatureLayout::from_count(11), Some(FeatureLayout::Standard));
        assert_eq!(FeatureLayout::from_count(10), None);
    }
}
