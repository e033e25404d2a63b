//! Property categories the site prints ahead of the room counts.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of property a listing describes.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyType {
    House,
    Unit,
    Townhouse,
    Apartment,
    Villa,
    Duplex,
    /// Vacant land. Shares its keyword prefix with the "Land size" line.
    Land,
}

impl PropertyType {
    /// Every property type, in the order the site's keywords are checked.
    pub const ALL: [PropertyType; 7] = [
        PropertyType::House,
        PropertyType::Unit,
        PropertyType::Townhouse,
        PropertyType::Apartment,
        PropertyType::Villa,
        PropertyType::Duplex,
        PropertyType::Land,
    ];

    /// The word the site uses for this type.
    pub fn keyword(self) -> &'static str {
        match self {
            PropertyType::House => "House",
            PropertyType::Unit => "Unit",
            PropertyType::Townhouse => "Townhouse",
            PropertyType::Apartment => "Apartment",
            PropertyType::Villa => "Villa",
            PropertyType::Duplex => "Duplex",
            PropertyType::Land => "Land",
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

impl FromStr for PropertyType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .into_iter()
            .find(|t| t.keyword() == s)
            .ok_or(())
    }
}
