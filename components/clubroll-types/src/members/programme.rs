use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Study programme a member is enrolled in.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Programme {
    /// Computer Science & Engineering.
    Cse,
    /// Computer Science & Cyber Security.
    Ccs,
    /// Electronics and Communication Engineering.
    Ece,
    /// Avionics.
    Avi,
}

impl Programme {
    /// All programmes in the order they are offered in forms.
    pub const ALL: [Programme; 4] = [
        Programme::Cse,
        Programme::Ccs,
        Programme::Ece,
        Programme::Avi,
    ];

    /// Short tag that is stored in the database and submitted by forms.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Cse => "CSE",
            Self::Ccs => "CCS",
            Self::Ece => "ECE",
            Self::Avi => "AVI",
        }
    }

    /// Constant middle part of the roll numbers issued for the programme, e.g. `22BECSE44`.
    pub fn roll_format(&self) -> &'static str {
        match self {
            Self::Cse => "BECSE",
            Self::Ccs => "BECCS",
            Self::Ece => "BEECE",
            Self::Avi => "BEAVI",
        }
    }

    /// Human readable name of the programme.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cse => "Computer Science & Engineering",
            Self::Ccs => "Computer Science & Cyber Security",
            Self::Ece => "Electronics and Communication Engineering",
            Self::Avi => "Avionics",
        }
    }
}

impl fmt::Display for Programme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Programme {
    type Err = String;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|programme| programme.tag() == tag)
            .ok_or_else(|| format!("Unknown programme '{tag}'."))
    }
}
