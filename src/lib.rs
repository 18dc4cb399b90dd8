//! Sleep Risk - Sleep-disorder risk assessment from self-reported health metrics
//!
//! A profile flows through a deterministic pipeline: categorical encoding →
//! feature vector → random forest classifier → clinical override rules →
//! risk score, alongside a composite sleep score, lifestyle recommendations
//! and a plain-text report.
//!
//! ## Modules
//!
//! - **Model**: Load the exported forest and label tables, run inference
//! - **Rules**: Override the classifier where clinical thresholds are crossed
//! - **Pipeline**: Run every stage for one profile, plus what-if simulation
//!
//! ```ignore
//! let pipeline = AssessmentPipeline::from_paths(&ArtifactPaths::from_dir("models"))?;
//! let assessment = pipeline.assess(&profile);
//! ```

pub mod encoder;
pub mod error;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod profile;
pub mod recommend;
pub mod report;
pub mod rules;
pub mod score;
pub mod types;

pub use error::AssessmentError;
pub use model::{ArtifactPaths, Classifier, ClassifierFacade};
pub use pipeline::{AssessmentPipeline, Simulation, Verdict, WhatIf};
pub use profile::{BmiCategory, HealthProfile, Occupation, Sex, ValidationError};
pub use recommend::{recommend, Recommendation, RecommendationSet};
pub use report::{Report, ReportGenerator};
pub use rules::{risk_score, OverrideEngine, OverrideRule};
pub use score::{score, ScoreBand, SleepScore};
pub use types::{Assessment, AssessmentFlag, AssessmentResult, SleepDisorder};

/// Crate version, reported by the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name embedded in CLI output
pub const PRODUCER_NAME: &str = "sleep-risk";
