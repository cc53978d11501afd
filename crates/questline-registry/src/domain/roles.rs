//! Caller roles and caretaker coverage.

use questline_core::identity::Identity;
use serde::Serialize;

use super::ids::StationId;

/// What an identity is allowed to do, resolved once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", content = "station", rename_all = "snake_case")]
pub enum Role {
    /// Override authority over the whole registry.
    Admin,
    /// Responsible for accepting and advancing teams at one station.
    Caretaker(StationId),
    /// Not known to the registry.
    Unknown,
}

/// Up to two caretakers registered against one station.
///
/// Always two slots so callers can notify both recipients uniformly;
/// unfilled slots are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CaretakerPair([Option<Identity>; 2]);

impl CaretakerPair {
    /// Builds a pair from the first two identities yielded.
    pub fn collect<'a>(identities: impl IntoIterator<Item = &'a Identity>) -> Self {
        let mut slots: [Option<Identity>; 2] = [None, None];
        for (slot, identity) in slots.iter_mut().zip(identities) {
            *slot = Some(identity.clone());
        }
        Self(slots)
    }

    /// Both slots, filled or not.
    #[must_use]
    pub fn slots(&self) -> &[Option<Identity>; 2] {
        &self.0
    }

    /// Filled slots only.
    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.0.iter().flatten()
    }

    /// Whether no caretaker covers the station.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_keeps_two_slots_with_sentinel() {
        let one = Identity::new("1");

        let pair = CaretakerPair::collect([&one]);

        assert_eq!(pair.slots(), &[Some(one.clone()), None]);
        assert_eq!(pair.iter().count(), 1);
    }

    #[test]
    fn test_pair_ignores_identities_beyond_two() {
        let ids = [Identity::new("1"), Identity::new("2"), Identity::new("3")];

        let pair = CaretakerPair::collect(ids.iter());

        assert_eq!(pair.iter().count(), 2);
        assert!(!pair.is_empty());
    }

    #[test]
    fn test_role_serializes_with_station() {
        let role = Role::Caretaker(StationId::new("A", 1));

        let json = serde_json::to_value(&role).unwrap();

        assert_eq!(json, serde_json::json!({"role": "caretaker", "station": "A-1"}));
    }
}
