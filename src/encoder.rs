//! Categorical encoding
//!
//! This module maps the categorical fields of a health profile to the numeric
//! codes the classifier was trained on:
//! - Sex: Male = 0, Female = 1
//! - BMI category: Normal = 0, Overweight = 1, Obese = 2
//! - Occupation: index in the training-time label table
//!
//! Encoding never fails. An occupation the table has not seen falls back to
//! `DEFAULT_OCCUPATION_CODE` and is reported as a warning.

use std::sync::Arc;

use crate::model::LabelTable;
use crate::profile::{BmiCategory, HealthProfile, Sex};

/// Code used for occupations absent from the label table
pub const DEFAULT_OCCUPATION_CODE: u32 = 0;

/// Non-fatal issue found while encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingWarning {
    /// Occupation not present in the training label table
    UnknownOccupation(String),
}

/// Numeric codes for the categorical profile fields
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedCategoricals {
    pub sex: u32,
    pub bmi_category: u32,
    /// Present only when an occupation table is loaded
    pub occupation: Option<u32>,
    pub warnings: Vec<EncodingWarning>,
}

/// Encoder for sex, BMI category and occupation
#[derive(Debug, Clone, Default)]
pub struct CategoricalEncoder {
    occupations: Option<Arc<LabelTable>>,
}

impl CategoricalEncoder {
    /// Create an encoder without an occupation table
    pub fn new() -> Self {
        Self { occupations: None }
    }

    /// Create an encoder that also encodes occupation
    pub fn with_occupations(table: Arc<LabelTable>) -> Self {
        Self {
            occupations: Some(table),
        }
    }

    /// Whether occupation codes will be produced
    pub fn encodes_occupation(&self) -> bool {
        self.occupations.is_some()
    }

    /// Encode the categorical fields of a profile
    pub fn encode(&self, profile: &HealthProfile) -> EncodedCategoricals {
        let mut warnings = Vec::new();

        let occupation = self.occupations.as_ref().map(|table| {
            let name = profile.occupation.as_str();
            match table.code_of(name) {
                Some(code) => code,
                None => {
                    tracing::warn!(
                        occupation = name,
                        default_code = DEFAULT_OCCUPATION_CODE,
                        "occupation not in training label table, using default code"
                    );
                    warnings.push(EncodingWarning::UnknownOccupation(name.to_string()));
                    DEFAULT_OCCUPATION_CODE
                }
            }
        });

        EncodedCategoricals {
            sex: encode_sex(profile.sex),
            bmi_category: encode_bmi(profile.bmi_category),
            occupation,
            warnings,
        }
    }
}

pub fn encode_sex(sex: Sex) -> u32 {
    match sex {
        Sex::Male => 0,
        Sex::Female => 1,
    }
}

pub fn encode_bmi(category: BmiCategory) -> u32 {
    match category {
        BmiCategory::Normal => 0,
        BmiCategory::Overweight => 1,
        BmiCategory::Obese => 2,
    }
}
