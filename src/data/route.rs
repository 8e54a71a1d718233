use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Route of administration.
///
/// Only [`Route::Iv`] selects the intravenous bolus path; every other route is
/// treated as extravascular (first-order absorption into the central compartment).
/// Routes without a dedicated variant are kept as [`Route::Other`] so that a
/// route-specific bioavailability can still be declared for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Route {
    /// Intravenous bolus
    Iv,
    /// Oral
    #[default]
    Oral,
    /// Intramuscular
    Intramuscular,
    /// Subcutaneous
    Subcutaneous,
    /// Any other route, stored as its normalized (trimmed, lowercase) token
    Other(String),
}

impl Route {
    /// Normalized token for this route, as used in `bioavailability_<token>` keys.
    pub fn token(&self) -> &str {
        match self {
            Route::Iv => "iv",
            Route::Oral => "oral",
            Route::Intramuscular => "im",
            Route::Subcutaneous => "sc",
            Route::Other(token) => token,
        }
    }

    pub fn is_intravenous(&self) -> bool {
        matches!(self, Route::Iv)
    }

    /// Parse a free-form route string. Never fails: unknown tokens become [`Route::Other`].
    pub fn parse(raw: &str) -> Self {
        let token = raw.trim().to_lowercase();
        match token.as_str() {
            "iv" => Route::Iv,
            "oral" => Route::Oral,
            "im" => Route::Intramuscular,
            "sc" => Route::Subcutaneous,
            _ => Route::Other(token),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for Route {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Route::parse(s))
    }
}

impl From<String> for Route {
    fn from(s: String) -> Self {
        Route::parse(&s)
    }
}

impl From<Route> for String {
    fn from(route: Route) -> Self {
        route.token().to_string()
    }
}
