//! Station identifiers.

use std::fmt;
use std::str::FromStr;

use questline_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Identity of a station: the owning location's name and a 1-based index.
///
/// Rendered as `"<location>-<index>"`. Location names may themselves contain
/// dashes, so parsing splits on the last one (`Plov-Center-1` belongs to
/// `Plov-Center`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationId {
    location: String,
    index: u32,
}

impl StationId {
    /// Creates a station id for the `index`-th station of `location`.
    #[must_use]
    pub fn new(location: impl Into<String>, index: u32) -> Self {
        Self {
            location: location.into(),
            index,
        }
    }

    /// Name of the location this station belongs to.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// 1-based index of the station within its location.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.location, self.index)
    }
}

impl FromStr for StationId {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let invalid = || DomainError::InvalidStationId(raw.to_owned());

        let (location, index) = raw.rsplit_once('-').ok_or_else(invalid)?;
        if location.is_empty() {
            return Err(invalid());
        }
        let index: u32 = index.parse().map_err(|_| invalid())?;
        if index == 0 {
            return Err(invalid());
        }

        Ok(Self::new(location, index))
    }
}

impl TryFrom<String> for StationId {
    type Error = DomainError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<StationId> for String {
    fn from(id: StationId) -> Self {
        id.to_string()
    }
}
