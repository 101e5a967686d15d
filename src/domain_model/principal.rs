use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identifier of an authenticated subject.
///
/// Zero is reserved as the "nobody" sentinel and never identifies a
/// validated principal.
#[derive(
    Debug, Default, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PrincipalId(pub i64);

impl PrincipalId {
    pub const NONE: PrincipalId = PrincipalId(0);

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PrincipalId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(PrincipalId)
    }
}

impl From<i64> for PrincipalId {
    fn from(id: i64) -> Self {
        PrincipalId(id)
    }
}
