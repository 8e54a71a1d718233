use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::route::Route;

/// Value used when neither the route nor the oral route declares a bioavailability.
pub const DEFAULT_BIOAVAILABILITY: f64 = 1.0;

/// Fraction of an administered dose that reaches the systemic circulation, per route.
///
/// Lookup order for a route is fixed: the route's own entry, then the oral entry,
/// then the fallback (1.0 unless overridden).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bioavailability {
    by_route: HashMap<Route, f64>,
    fallback: f64,
}

impl Default for Bioavailability {
    fn default() -> Self {
        Self {
            by_route: HashMap::new(),
            fallback: DEFAULT_BIOAVAILABILITY,
        }
    }
}

impl Bioavailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the value used when no route-specific or oral entry exists.
    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Declare the bioavailability for a route, returning the builder.
    pub fn with(mut self, route: Route, fraction: f64) -> Self {
        self.insert(route, fraction);
        self
    }

    pub fn insert(&mut self, route: Route, fraction: f64) {
        self.by_route.insert(route, fraction);
    }

    /// Explicitly declared value for a route, without any fallback.
    pub fn declared(&self, route: &Route) -> Option<f64> {
        self.by_route.get(route).copied()
    }

    /// Resolve the bioavailability for a route: route → oral → fallback.
    pub fn resolve(&self, route: &Route) -> f64 {
        self.declared(route)
            .or_else(|| self.declared(&Route::Oral))
            .unwrap_or(self.fallback)
    }

    pub fn is_empty(&self) -> bool {
        self.by_route.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_specific_value_wins() {
        let f = Bioavailability::new()
            .with(Route::Oral, 0.6)
            .with(Route::Intramuscular, 0.9);
        assert_eq!(f.resolve(&Route::Intramuscular), 0.9);
    }

    #[test]
    fn unknown_route_falls_back_to_oral() {
        let f = Bioavailability::new().with(Route::Oral, 0.6);
        assert_eq!(f.resolve(&Route::parse("subcutaneous")), 0.6);
        assert_eq!(f.resolve(&Route::Iv), 0.6);
    }

    #[test]
    fn empty_map_falls_back_to_one() {
        let f = Bioavailability::new();
        assert_eq!(f.resolve(&Route::parse("rectal")), 1.0);
        assert!(f.is_empty());
    }

    #[test]
    fn custom_fallback() {
        let f = Bioavailability::new().with_fallback(0.5);
        assert_eq!(f.resolve(&Route::Oral), 0.5);
    }
}
