use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Semester a member is currently in, always within `1..=8`.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct Semester(u8);

impl Semester {
    pub const FIRST: Semester = Semester(1);
    pub const LAST: Semester = Semester(8);

    /// Creates a semester if the number is within the allowed range.
    pub fn new(number: u8) -> Option<Self> {
        (Self::FIRST.0..=Self::LAST.0)
            .contains(&number)
            .then_some(Self(number))
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    /// Only students in the final semester can graduate.
    pub fn is_final(&self) -> bool {
        *self == Self::LAST
    }

    /// Iterates over all semesters, used to populate form choices.
    pub fn all() -> impl Iterator<Item = Semester> {
        (Self::FIRST.0..=Self::LAST.0).map(Semester)
    }

    /// Display label, e.g. "2nd Semester".
    pub fn label(&self) -> String {
        let suffix = match self.0 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        };
        format!("{}{suffix} Semester", self.0)
    }
}

impl TryFrom<u8> for Semester {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Self::new(number).ok_or_else(|| format!("Semester must be between 1 and 8, got {number}."))
    }
}

impl From<Semester> for u8 {
    fn from(semester: Semester) -> Self {
        semester.0
    }
}

impl FromStr for Semester {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<u8>()
            .map_err(|_| format!("Semester must be a number, got '{value}'."))
            .and_then(Semester::try_from)
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Semester;
    use std::str::FromStr;

    #[test]
    fn respects_range() {
        assert!(Semester::new(0).is_none());
        assert!(Semester::new(9).is_none());
        assert_eq!(Semester::all().count(), 8);
        assert!(Semester::new(8).unwrap().is_final());
        assert!(!Semester::new(7).unwrap().is_final());
    }

    #[test]
    fn can_parse() {
        assert_eq!(Semester::from_str(" 4 "), Ok(Semester::new(4).unwrap()));
        assert_eq!(
            Semester::from_str("nine"),
            Err("Semester must be a number, got 'nine'.".to_string())
        );
        assert_eq!(
            Semester::from_str("9"),
            Err("Semester must be between 1 and 8, got 9.".to_string())
        );
    }

    #[test]
    fn labels() {
        let labels = Semester::all().map(|s| s.label()).collect::<Vec<_>>();
        assert_eq!(labels[0], "1st Semester");
        assert_eq!(labels[1], "2nd Semester");
        assert_eq!(labels[2], "3rd Semester");
        assert_eq!(labels[7], "8th Semester");
    }

    #[test]
    fn serialization() -> anyhow::Result<()> {
        assert_eq!(serde_json::to_string(&Semester::new(3).unwrap())?, "3");
        assert!(serde_json::from_str::<Semester>("0").is_err());

        Ok(())
    }
}
