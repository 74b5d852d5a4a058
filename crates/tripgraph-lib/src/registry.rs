use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::GeoPoint;

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Dense handle for a location inside a [`LocationRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LocationId(usize);

impl LocationId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// A named city with its country label and coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub position: GeoPoint,
}

impl Location {
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            position: GeoPoint::new(lat, lon),
        }
    }
}

/// How the registry treats a name that is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`Error::DuplicateLocation`] and keep the existing entry.
    #[default]
    Reject,
    /// Replace the existing entry in place; its [`LocationId`] is preserved.
    Overwrite,
}

/// Set of known locations keyed by unique, case-sensitive name.
#[derive(Debug, Clone, Default)]
pub struct LocationRegistry {
    locations: Vec<Location>,
    name_to_id: HashMap<String, LocationId>,
    policy: DuplicatePolicy,
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Insert a location, applying the registry's duplicate policy.
    pub fn add_location(
        &mut self,
        name: &str,
        country: &str,
        lat: f64,
        lon: f64,
    ) -> Result<LocationId> {
        self.insert(Location::new(name, country, lat, lon))
    }

    /// Insert a pre-built location, applying the registry's duplicate policy.
    pub fn insert(&mut self, location: Location) -> Result<LocationId> {
        if let Some(&existing) = self.name_to_id.get(&location.name) {
            return match self.policy {
                DuplicatePolicy::Reject => Err(Error::DuplicateLocation {
                    name: location.name,
                }),
                DuplicatePolicy::Overwrite => {
                    debug!(name = %location.name, id = %existing, "overwriting location");
                    self.locations[existing.0] = location;
                    Ok(existing)
                }
            };
        }

        let id = LocationId(self.locations.len());
        self.name_to_id.insert(location.name.clone(), id);
        self.locations.push(location);
        Ok(id)
    }

    /// Lookup a location identifier by its case-sensitive name.
    pub fn id_by_name(&self, name: &str) -> Option<LocationId> {
        self.name_to_id.get(name).copied()
    }

    pub fn get(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id.0)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Location> {
        self.id_by_name(name).and_then(|id| self.get(id))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_to_id.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Iterate over every location together with its identifier.
    pub fn iter(&self) -> impl Iterator<Item = (LocationId, &Location)> {
        self.locations
            .iter()
            .enumerate()
            .map(|(index, location)| (LocationId(index), location))
    }

    /// Return up to `limit` known names that look like `name`, best match first.
    pub fn fuzzy_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .locations
            .iter()
            .map(|location| {
                let score = strsim::jaro_winkler(&needle, &location.name.to_lowercase());
                (score, location.name.as_str())
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, name)| name.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_lookup() {
        let mut registry = LocationRegistry::new();
        let paris = registry
            .add_location("Paris", "France", 48.8566, 2.3522)
            .unwrap();
        let rome = registry
            .add_location("Rome", "Italy", 41.9028, 12.4964)
            .unwrap();

        assert_ne!(paris, rome);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.id_by_name("Rome"), Some(rome));
        assert_eq!(registry.get(paris).unwrap().country, "France");
        assert!(registry.get_by_name("rome").is_none(), "names are case-sensitive");
    }

    #[test]
    fn reject_policy_keeps_first_entry() {
        let mut registry = LocationRegistry::new();
        registry.add_location("Lima", "Peru", -12.05, -77.04).unwrap();
        let err = registry
            .add_location("Lima", "Ohio", 40.74, -84.1)
            .expect_err("duplicate rejected");

        assert!(matches!(err, Error::DuplicateLocation { ref name } if name == "Lima"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get_by_name("Lima").unwrap().country, "Peru");
    }

    #[test]
    fn overwrite_policy_replaces_in_place() {
        let mut registry = LocationRegistry::with_policy(DuplicatePolicy::Overwrite);
        let first = registry.add_location("Lima", "Peru", -12.05, -77.04).unwrap();
        let second = registry.add_location("Lima", "Ohio", 40.74, -84.1).unwrap();

        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(first).unwrap().country, "Ohio");
    }

    #[test]
    fn fuzzy_matches_suggest_close_names() {
        let mut registry = LocationRegistry::new();
        for name in ["Berlin", "Bern", "Bergen", "Tokyo"] {
            registry.add_location(name, "", 0.0, 0.0).unwrap();
        }

        let matches = registry.fuzzy_matches("Berlim", 3);
        assert_eq!(matches.first().map(String::as_str), Some("Berlin"));
        assert!(!matches.contains(&"Tokyo".to_string()));
        assert!(matches.len() <= 3);
    }

    #[test]
    fn iter_yields_dense_ids() {
        let mut registry = LocationRegistry::new();
        registry.add_location("A", "", 0.0, 0.0).unwrap();
        registry.add_location("B", "", 0.0, 0.0).unwrap();

        let ids: Vec<usize> = registry.iter().map(|(id, _)| id.index()).collect();
        assert_eq!(ids, vec![0, 1]);
    }
}
