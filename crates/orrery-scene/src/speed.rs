//! Per-planet orbital speed multipliers.

use crate::body::BodyId;

/// Multiplier used for every body that has not been given one.
pub const DEFAULT_MULTIPLIER: f32 = 1.0;
/// Smallest multiplier the controls offer.
pub const SPEED_MIN: f32 = 0.1;
/// Largest multiplier the controls offer.
pub const SPEED_MAX: f32 = 5.0;
/// Control increment.
pub const SPEED_STEP: f32 = 0.1;

/// Outcome of a [`SpeedRegistry::set_all`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeedUpdate {
    /// Entries that were stored.
    pub applied: usize,
    /// Names that matched no planet.
    pub unknown: Vec<String>,
    /// Known planets whose value was rejected (not positive or non-finite).
    pub rejected: Vec<BodyId>,
}

/// Mapping from planet to speed multiplier.
///
/// The registry only ever holds the eight planets. Range limits belong to the
/// controls; the registry accepts any finite, positive value.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedRegistry {
    multipliers: [f32; 8],
}

impl Default for SpeedRegistry {
    fn default() -> Self {
        Self {
            multipliers: [DEFAULT_MULTIPLIER; 8],
        }
    }
}

impl SpeedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole mapping.
    ///
    /// Planets missing from `mapping` revert to [`DEFAULT_MULTIPLIER`]. Unknown
    /// names and invalid values are skipped. A non-empty mapping in which no
    /// name is recognized leaves the registry untouched.
    pub fn set_all<I, K>(&mut self, mapping: I) -> SpeedUpdate
    where
        I: IntoIterator<Item = (K, f32)>,
        K: AsRef<str>,
    {
        let mut next = [DEFAULT_MULTIPLIER; 8];
        let mut update = SpeedUpdate::default();
        let mut recognized = false;
        let mut seen_any = false;

        for (name, value) in mapping {
            seen_any = true;
            let name = name.as_ref();
            let Some(id) = BodyId::from_name(name) else {
                tracing::debug!(name, "ignoring speed for unknown body");
                update.unknown.push(name.to_string());
                continue;
            };
            recognized = true;
            if !value.is_finite() || value <= 0.0 {
                tracing::warn!(body = %id, value, "ignoring invalid speed multiplier");
                update.rejected.push(id);
                continue;
            }
            next[id.index()] = value;
            update.applied += 1;
        }

        if seen_any && !recognized {
            return update;
        }
        self.multipliers = next;
        update
    }

    /// Multiplier for `id`.
    pub fn get(&self, id: BodyId) -> f32 {
        self.multipliers[id.index()]
    }

    /// Multiplier for a planet name; unknown names report the default.
    pub fn get_named(&self, name: &str) -> f32 {
        BodyId::from_name(name).map_or(DEFAULT_MULTIPLIER, |id| self.get(id))
    }

    /// All multipliers in orbital order.
    pub fn snapshot(&self) -> [(BodyId, f32); 8] {
        BodyId::ALL.map(|id| (id, self.get(id)))
    }

    /// Revert every planet to [`DEFAULT_MULTIPLIER`].
    pub fn reset(&mut self) {
        self.multipliers = [DEFAULT_MULTIPLIER; 8];
    }
}

/// Clamp a control value to the offered range and snap it to the step grid.
pub fn clamp_to_controls(value: f32) -> f32 {
    // SPEED_STEP is one decimal place.
    ((value * 10.0).round() / 10.0).clamp(SPEED_MIN, SPEED_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_to_one() {
        let registry = SpeedRegistry::new();
        for id in BodyId::ALL {
            assert_eq!(registry.get(id), 1.0);
        }
        assert_eq!(registry.get_named("pluto"), 1.0);
    }

    #[test]
    fn test_set_all_is_full_replace() {
        let mut registry = SpeedRegistry::new();
        registry.set_all([("mars", 2.0), ("earth", 0.5)]);
        assert_eq!(registry.get(BodyId::Mars), 2.0);

        let update = registry.set_all([("earth", 3.0)]);
        assert_eq!(update.applied, 1);
        assert_eq!(registry.get(BodyId::Earth), 3.0);
        assert_eq!(registry.get(BodyId::Mars), 1.0, "mars was absent and reverts");
    }

    #[test]
    fn test_empty_mapping_resets() {
        let mut registry = SpeedRegistry::new();
        registry.set_all([("venus", 4.0)]);
        registry.set_all(HashMap::<String, f32>::new());
        assert_eq!(registry, SpeedRegistry::new());
    }

    #[test]
    fn test_unknown_names_do_not_mutate() {
        let mut registry = SpeedRegistry::new();
        registry.set_all([("saturn", 2.0)]);
        let before = registry.clone();

        let update = registry.set_all([("pluto", 3.0), ("vulcan", 0.2)]);
        assert_eq!(registry, before);
        assert_eq!(update.unknown, vec!["pluto".to_string(), "vulcan".to_string()]);
        assert_eq!(update.applied, 0);
    }

    #[test]
    fn test_unknown_names_skipped_alongside_known() {
        let mut registry = SpeedRegistry::new();
        let update = registry.set_all([("pluto", 3.0), ("uranus", 0.3)]);
        assert_eq!(update.applied, 1);
        assert_eq!(registry.get(BodyId::Uranus), 0.3);
        assert_eq!(registry.get_named("pluto"), 1.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut registry = SpeedRegistry::new();
        let update = registry.set_all([("mars", f32::NAN), ("venus", -1.0), ("earth", 0.0)]);
        assert_eq!(update.rejected, vec![BodyId::Mars, BodyId::Venus, BodyId::Earth]);
        assert_eq!(registry.get(BodyId::Mars), 1.0);
        assert_eq!(registry.get(BodyId::Venus), 1.0);
        assert_eq!(registry.get(BodyId::Earth), 1.0);
    }

    #[test]
    fn test_zero_multiplier_reverts_to_default() {
        let mut registry = SpeedRegistry::new();
        registry.set_all([("earth", 2.5)]);
        let update = registry.set_all([("earth", 0.0), ("mars", 0.3)]);
        assert_eq!(update.applied, 1);
        assert_eq!(update.rejected, vec![BodyId::Earth]);
        assert_eq!(registry.get(BodyId::Earth), DEFAULT_MULTIPLIER);
        assert_eq!(registry.get(BodyId::Mars), 0.3);
    }

    #[test]
    fn test_snapshot_order() {
        let mut registry = SpeedRegistry::new();
        registry.set_all([("neptune", 5.0)]);
        let snapshot = registry.snapshot();
        assert_eq!(snapshot[0], (BodyId::Mercury, 1.0));
        assert_eq!(snapshot[7], (BodyId::Neptune, 5.0));
    }

    #[test]
    fn test_clamp_to_controls() {
        assert_eq!(clamp_to_controls(0.0), SPEED_MIN);
        assert_eq!(clamp_to_controls(9.0), SPEED_MAX);
        assert_eq!(clamp_to_controls(1.0 + SPEED_STEP * 3.0), 1.3);
        assert_eq!(clamp_to_controls(2.04), 2.0);
    }
}
