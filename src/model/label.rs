//! Label tables written by the training script's label encoders

use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;

/// Ordered class list; a class's code is its index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelTable {
    classes: Vec<String>,
}

impl LabelTable {
    /// Create a table, rejecting empty or duplicated class lists
    pub fn new(classes: Vec<String>) -> Result<Self, AssessmentError> {
        let table = Self { classes };
        table.check()?;
        Ok(table)
    }

    pub fn from_json(json: &str) -> Result<Self, AssessmentError> {
        let table: LabelTable = serde_json::from_str(json)
            .map_err(|e| AssessmentError::Configuration(format!("invalid label table: {e}")))?;
        table.check()?;
        Ok(table)
    }

    fn check(&self) -> Result<(), AssessmentError> {
        if self.classes.is_empty() {
            return Err(AssessmentError::Configuration(
                "label table has no classes".to_string(),
            ));
        }
        for (i, class) in self.classes.iter().enumerate() {
            if self.classes[..i].contains(class) {
                return Err(AssessmentError::Configuration(format!(
                    "label table lists '{class}' twice"
                )));
            }
        }
        Ok(())
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Code for a class name
    pub fn code_of(&self, name: &str) -> Option<u32> {
        self.classes
            .iter()
            .position(|c| c == name)
            .and_then(|i| u32::try_from(i).ok())
    }

    /// Class name for a code
    pub fn label_of(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }
}
