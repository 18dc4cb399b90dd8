//! Health profile input
//!
//! A `HealthProfile` is the immutable record of one assessment request. It is
//! created fresh per request and never mutated by the pipeline; the what-if
//! simulator derives adjusted copies instead.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Biological sex as collected by the intake form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// BMI category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    /// "Normal Weight" appears in the training data for the same category
    #[serde(alias = "Normal Weight")]
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Occupation offered by the intake form
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Occupation {
    #[serde(rename = "Software Engineer")]
    SoftwareEngineer,
    Doctor,
    #[serde(rename = "Sales Representative")]
    SalesRepresentative,
    Teacher,
    Nurse,
    Engineer,
    Accountant,
    Scientist,
    Lawyer,
    Salesperson,
    Manager,
    Student,
    #[default]
    Other,
    /// Free-text occupation outside the form's list
    #[serde(untagged)]
    Unlisted(String),
}

impl Occupation {
    /// Occupations selectable on the intake form, in display order
    pub const LISTED: [Occupation; 13] = [
        Occupation::SoftwareEngineer,
        Occupation::Doctor,
        Occupation::SalesRepresentative,
        Occupation::Teacher,
        Occupation::Nurse,
        Occupation::Engineer,
        Occupation::Accountant,
        Occupation::Scientist,
        Occupation::Lawyer,
        Occupation::Salesperson,
        Occupation::Manager,
        Occupation::Student,
        Occupation::Other,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Occupation::SoftwareEngineer => "Software Engineer",
            Occupation::Doctor => "Doctor",
            Occupation::SalesRepresentative => "Sales Representative",
            Occupation::Teacher => "Teacher",
            Occupation::Nurse => "Nurse",
            Occupation::Engineer => "Engineer",
            Occupation::Accountant => "Accountant",
            Occupation::Scientist => "Scientist",
            Occupation::Lawyer => "Lawyer",
            Occupation::Salesperson => "Salesperson",
            Occupation::Manager => "Manager",
            Occupation::Student => "Student",
            Occupation::Other => "Other",
            Occupation::Unlisted(name) => name.as_str(),
        }
    }

    /// Parse a display name, keeping unknown names as `Unlisted`
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        Self::LISTED
            .iter()
            .find(|o| o.as_str() == trimmed)
            .cloned()
            .unwrap_or_else(|| Occupation::Unlisted(trimmed.to_string()))
    }
}

impl fmt::Display for Occupation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported health metrics for a single assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthProfile {
    pub sex: Sex,
    /// Age in years (10-100)
    pub age: u32,
    #[serde(default)]
    pub occupation: Occupation,
    pub bmi_category: BmiCategory,
    /// Sleep duration in hours (0.0-12.0)
    pub sleep_duration: f64,
    /// Quality of sleep (1-10)
    pub sleep_quality: u32,
    /// Physical activity in minutes per day (0-120)
    pub physical_activity: u32,
    /// Daily steps (0-20000)
    pub daily_steps: u32,
    /// Stress level (1-10)
    pub stress_level: u32,
    /// Resting heart rate in bpm (40-120)
    pub heart_rate: u32,
    /// Systolic blood pressure in mmHg (80-200)
    pub bp_systolic: u32,
    /// Diastolic blood pressure in mmHg (50-130)
    pub bp_diastolic: u32,
}

impl HealthProfile {
    /// Check every field against its documented range.
    ///
    /// The pipeline never calls this itself; rejecting out-of-range input is
    /// the caller's job.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        check_range(&mut errors, "age", f64::from(self.age), 10.0, 100.0);
        check_range(&mut errors, "sleep_duration", self.sleep_duration, 0.0, 12.0);
        check_range(&mut errors, "sleep_quality", f64::from(self.sleep_quality), 1.0, 10.0);
        check_range(
            &mut errors,
            "physical_activity",
            f64::from(self.physical_activity),
            0.0,
            120.0,
        );
        check_range(&mut errors, "daily_steps", f64::from(self.daily_steps), 0.0, 20000.0);
        check_range(&mut errors, "stress_level", f64::from(self.stress_level), 1.0, 10.0);
        check_range(&mut errors, "heart_rate", f64::from(self.heart_rate), 40.0, 120.0);
        check_range(&mut errors, "bp_systolic", f64::from(self.bp_systolic), 80.0, 200.0);
        check_range(&mut errors, "bp_diastolic", f64::from(self.bp_diastolic), 50.0, 130.0);

        if let Occupation::Unlisted(name) = &self.occupation {
            if name.is_empty() {
                errors.push(ValidationError::EmptyOccupation);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Blood pressure in the conventional "systolic/diastolic" notation
    pub fn blood_pressure(&self) -> String {
        format!("{}/{}", self.bp_systolic, self.bp_diastolic)
    }
}

fn check_range(errors: &mut Vec<ValidationError>, field: &'static str, value: f64, min: f64, max: f64) {
    // NaN fails `contains`, which is what we want
    if !(min..=max).contains(&value) {
        errors.push(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
}

/// Validation errors for health profiles
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("occupation must not be empty")]
    EmptyOccupation,
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { field, .. } => field,
            ValidationError::EmptyOccupation => "occupation",
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_profile() -> HealthProfile {
    HealthProfile {
        sex: Sex::Male,
        age: 35,
        occupation: Occupation::SoftwareEngineer,
        bmi_category: BmiCategory::Normal,
        sleep_duration: 7.5,
        sleep_quality: 8,
        physical_activity: 45,
        daily_steps: 8000,
        stress_level: 3,
        heart_rate: 65,
        bp_systolic: 120,
        bp_diastolic: 80,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_profile() {
        let json = r#"{
            "sex": "Female",
            "age": 42,
            "occupation": "Sales Representative",
            "bmi_category": "Normal Weight",
            "sleep_duration": 6.2,
            "sleep_quality": 5,
            "physical_activity": 30,
            "daily_steps": 7000,
            "stress_level": 7,
            "heart_rate": 78,
            "bp_systolic": 130,
            "bp_diastolic": 85
        }"#;

        let profile: HealthProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.sex, Sex::Female);
        assert_eq!(profile.occupation, Occupation::SalesRepresentative);
        assert_eq!(profile.bmi_category, BmiCategory::Normal);
        assert_eq!(profile.blood_pressure(), "130/85");
    }

    #[test]
    fn test_unlisted_occupation_round_trips_as_plain_string() {
        let mut profile = sample_profile();
        profile.occupation = Occupation::Unlisted("Astronaut".to_string());

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["occupation"], "Astronaut");

        let parsed: HealthProfile = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.occupation, Occupation::Unlisted("Astronaut".to_string()));
    }

    #[test]
    fn test_missing_occupation_defaults_to_other() {
        let mut json = serde_json::to_value(sample_profile()).unwrap();
        json.as_object_mut().unwrap().remove("occupation");

        let parsed: HealthProfile = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.occupation, Occupation::Other);
    }

    #[test]
    fn test_occupation_from_name() {
        assert_eq!(Occupation::from_name(" Nurse "), Occupation::Nurse);
        assert_eq!(
            Occupation::from_name("Pilot"),
            Occupation::Unlisted("Pilot".to_string())
        );
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample_profile().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_every_bad_field() {
        let mut profile = sample_profile();
        profile.age = 7;
        profile.sleep_duration = f64::NAN;
        profile.heart_rate = 150;

        let errors = profile.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["age", "sleep_duration", "heart_rate"]);
    }
}
