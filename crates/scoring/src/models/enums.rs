use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    #[default]
    Unknown,
    FirstClaim,
    SecondClaim,
    Honorary,
}

/// Age groups are mutually exclusive for a given snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    #[default]
    Undefined,
    Juvenile,
    Junior,
    Senior,
    Veteran,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RideStatus {
    #[default]
    Undefined,
    Valid,
    Dns,
    Dnf,
    Dq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum League {
    #[default]
    Undefined,
    Premier,
    League1,
    League2,
    League3,
    League4,
}

impl League {
    pub const ALL: [League; 5] = [
        League::Premier,
        League::League1,
        League::League2,
        League::League3,
        League::League4,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            League::Undefined => "Undefined",
            League::Premier => "Premier",
            League::League1 => "League 1",
            League::League2 => "League 2",
            League::League3 => "League 3",
            League::League4 => "League 4",
        }
    }

    /// Short code used in standings identifiers.
    pub fn code(&self) -> &'static str {
        match self {
            League::Undefined => "undefined",
            League::Premier => "premier",
            League::League1 => "league-1",
            League::League2 => "league-2",
            League::League3 => "league-3",
            League::League4 => "league-4",
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Parses the league column as it appears in membership exports.
///
/// # Examples
///
/// ```
/// use scoring::models::League;
///
/// assert_eq!("prem".parse::<League>().unwrap(), League::Premier);
/// assert_eq!(" 3 ".parse::<League>().unwrap(), League::League3);
/// assert_eq!("".parse::<League>().unwrap(), League::Undefined);
/// ```
impl FromStr for League {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" => Ok(League::Undefined),
            "prem" | "premier" => Ok(League::Premier),
            "1" => Ok(League::League1),
            "2" => Ok(League::League2),
            "3" => Ok(League::League3),
            "4" => Ok(League::League4),
            other => Err(format!("Unknown league value '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_league_parse_rejects_unknown_values() {
        assert!("5".parse::<League>().is_err());
        assert_eq!("PREMIER".parse::<League>().unwrap(), League::Premier);
    }

    #[test]
    fn test_league_display_names() {
        assert_eq!(League::Premier.to_string(), "Premier");
        assert_eq!(League::League2.to_string(), "League 2");
    }

    #[test]
    fn test_ride_status_serializes_uppercase() {
        let json = serde_json::to_string(&RideStatus::Dnf).unwrap();
        assert_eq!(json, "\"DNF\"");
    }
}
