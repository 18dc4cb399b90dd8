//! Composite sleep score
//!
//! Five weighted components summing to at most 100:
//!
//! | Component     | Max | Rule                                              |
//! |---------------|-----|---------------------------------------------------|
//! | duration      | 30  | 30 in 7..=9 h, 20 in 6..7 or (9, 10] h, else 10   |
//! | quality       | 25  | quality / 10 * 25                                 |
//! | stress        | 20  | (10 - stress) / 10 * 20                           |
//! | activity      | 15  | 15 at 30+ min/day, else linear                    |
//! | heart rate    | 10  | 10 in 60..=80 bpm, else 10 - abs(hr - 70) / 5     |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Score at or above which the band is `Good`
pub const GOOD_THRESHOLD: u8 = 70;

/// Qualitative band of a sleep score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Good,
    NeedsImprovement,
}

impl ScoreBand {
    pub fn for_value(value: u8) -> Self {
        if value >= GOOD_THRESHOLD {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsImprovement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreBand::Good => "Good",
            ScoreBand::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrounded component contributions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub duration: f64,
    pub quality: f64,
    pub stress: f64,
    pub activity: f64,
    pub heart_rate: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.duration + self.quality + self.stress + self.activity + self.heart_rate
    }
}

/// Sleep score in 0..=100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepScore {
    pub value: u8,
    pub band: ScoreBand,
    pub breakdown: ScoreBreakdown,
}

fn duration_points(hours: f64) -> f64 {
    if (7.0..=9.0).contains(&hours) {
        30.0
    } else if (6.0..7.0).contains(&hours) || (hours > 9.0 && hours <= 10.0) {
        20.0
    } else {
        10.0
    }
}

fn activity_points(minutes: u32) -> f64 {
    if minutes >= 30 {
        15.0
    } else {
        f64::from(minutes) / 30.0 * 15.0
    }
}

fn heart_rate_points(bpm: u32) -> f64 {
    if (60..=80).contains(&bpm) {
        10.0
    } else {
        let distance = (f64::from(bpm) - 70.0).abs();
        (10.0 - distance / 5.0).max(0.0)
    }
}

/// Component breakdown without rounding
pub fn breakdown(
    duration: f64,
    quality: u32,
    stress: u32,
    activity: u32,
    heart_rate: u32,
) -> ScoreBreakdown {
    ScoreBreakdown {
        duration: duration_points(duration),
        quality: f64::from(quality) / 10.0 * 25.0,
        stress: (10.0 - f64::from(stress)) / 10.0 * 20.0,
        activity: activity_points(activity),
        heart_rate: heart_rate_points(heart_rate),
    }
}

/// Compute the sleep score
///
/// The total is rounded half-to-even and clamped to 0..=100, so inputs
/// outside the documented ranges still yield a valid score.
pub fn score(duration: f64, quality: u32, stress: u32, activity: u32, heart_rate: u32) -> SleepScore {
    let breakdown = breakdown(duration, quality, stress, activity, heart_rate);
    let total = breakdown.total();
    let value = if total.is_nan() {
        0
    } else {
        total.round_ties_even().clamp(0.0, 100.0) as u8
    };

    SleepScore {
        value,
        band: ScoreBand::for_value(value),
        breakdown,
    }
}
