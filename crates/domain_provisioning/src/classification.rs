//! Risk classification tiers and credit-risk stages

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProvisioningError;

/// Risk classification assigned to a credit operation by its operation type
///
/// Ordered by severity: C1 is the lowest risk, C5 the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassificationRisk {
    C1,
    C2,
    C3,
    C4,
    C5,
}

impl ClassificationRisk {
    /// All tiers in ascending severity
    pub const ALL: [ClassificationRisk; 5] = [
        ClassificationRisk::C1,
        ClassificationRisk::C2,
        ClassificationRisk::C3,
        ClassificationRisk::C4,
        ClassificationRisk::C5,
    ];

    /// Position of the tier in per-classification arrays
    pub fn index(self) -> usize {
        match self {
            ClassificationRisk::C1 => 0,
            ClassificationRisk::C2 => 1,
            ClassificationRisk::C3 => 2,
            ClassificationRisk::C4 => 3,
            ClassificationRisk::C5 => 4,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ClassificationRisk::C1 => "C1",
            ClassificationRisk::C2 => "C2",
            ClassificationRisk::C3 => "C3",
            ClassificationRisk::C4 => "C4",
            ClassificationRisk::C5 => "C5",
        }
    }

    /// True for the lower-risk tiers C1 and C2
    pub fn is_low_risk(&self) -> bool {
        matches!(self, ClassificationRisk::C1 | ClassificationRisk::C2)
    }
}

impl fmt::Display for ClassificationRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for ClassificationRisk {
    type Err = ProvisioningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C1" => Ok(ClassificationRisk::C1),
            "C2" => Ok(ClassificationRisk::C2),
            "C3" => Ok(ClassificationRisk::C3),
            "C4" => Ok(ClassificationRisk::C4),
            "C5" => Ok(ClassificationRisk::C5),
            other => Err(ProvisioningError::validation(format!(
                "Unknown risk classification: {}",
                other
            ))),
        }
    }
}

/// Credit-deterioration stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskStage {
    /// Performing, up to 30 days overdue
    Stage1,
    /// Significant increase in credit risk, 31 to 90 days overdue
    Stage2,
    /// Credit-impaired, more than 90 days overdue
    Stage3,
}

impl RiskStage {
    /// Stage number as disclosed (1, 2 or 3)
    pub fn number(&self) -> u8 {
        match self {
            RiskStage::Stage1 => 1,
            RiskStage::Stage2 => 2,
            RiskStage::Stage3 => 3,
        }
    }

    /// Row of stage-indexed matrices
    pub fn index(self) -> usize {
        usize::from(self.number() - 1)
    }
}

impl fmt::Display for RiskStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stage {}", self.number())
    }
}
