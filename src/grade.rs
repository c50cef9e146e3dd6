//! # Grades
//!
//! SSL Labs letter grades and the fixed severity table used to compare them.
//!
//! | Grade        | Severity |
//! |--------------|----------|
//! | `A+` `A` `A-`| 1        |
//! | `B`          | 2        |
//! | `C`          | 3        |
//! | `D`          | 4        |
//! | `E`          | 5        |
//! | `F` `T` `M`  | 6        |
//!
//! ```rust
//! use ssllabs::{CheckStatus, Grade, Thresholds};
//!
//! let thresholds = Thresholds::new(Grade::B, Grade::D);
//! assert_eq!(thresholds.evaluate(Grade::A), CheckStatus::Ok);
//! assert_eq!(thresholds.evaluate(Grade::C), CheckStatus::Warning);
//! assert_eq!(thresholds.evaluate(Grade::T), CheckStatus::Critical);
//! ```
use std::{fmt, str::FromStr};

use crate::CheckStatus;

/// SSL Labs Grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    /// A+
    APlus,
    /// A
    A,
    /// A-
    AMinus,
    /// B
    B,
    /// C
    C,
    /// D
    D,
    /// E
    E,
    /// F
    F,
    /// Certificate not trusted
    T,
    /// Certificate name mismatch
    M,
}

/// Grade string not present in the severity table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown grade `{0}` (expected one of A+, A, A-, B, C, D, E, F, T, M)")]
pub struct GradeParseError(pub String);

impl Grade {
    /// All grades, best first
    pub const ALL: [Grade; 10] = [
        Grade::APlus,
        Grade::A,
        Grade::AMinus,
        Grade::B,
        Grade::C,
        Grade::D,
        Grade::E,
        Grade::F,
        Grade::T,
        Grade::M,
    ];

    /// Severity rank of the grade, from 1 (best) to 6 (worst)
    pub const fn severity(&self) -> u8 {
        match self {
            Grade::APlus | Grade::A | Grade::AMinus => 1,
            Grade::B => 2,
            Grade::C => 3,
            Grade::D => 4,
            Grade::E => 5,
            Grade::F | Grade::T | Grade::M => 6,
        }
    }

    /// Grade as reported by SSL Labs
    pub const fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
            Grade::T => "T",
            Grade::M => "M",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = GradeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Grade::ALL
            .into_iter()
            .find(|grade| grade.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| GradeParseError(value.to_string()))
    }
}

/// Warning and Critical thresholds
///
/// A grade whose severity meets or exceeds a threshold's severity is at least
/// as bad as that threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Warning threshold
    pub warning: Grade,
    /// Critical threshold
    pub critical: Grade,
}

impl Thresholds {
    /// New Thresholds
    pub fn new(warning: Grade, critical: Grade) -> Self {
        Self { warning, critical }
    }

    /// The warning threshold is worse than the critical one, so WARNING can never be reported
    pub fn is_inverted(&self) -> bool {
        self.warning.severity() > self.critical.severity()
    }

    /// Map a grade to a monitoring status (critical is checked first)
    pub fn evaluate(&self, grade: Grade) -> CheckStatus {
        if grade.severity() >= self.critical.severity() {
            CheckStatus::Critical
        } else if grade.severity() >= self.warning.severity() {
            CheckStatus::Warning
        } else {
            CheckStatus::Ok
        }
    }
}
