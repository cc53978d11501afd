//! Teams: participants routed through the locations they still have to visit.

/// A registered team.
///
/// `to_visit` and `visited` are disjoint ordered sets of location names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    name: String,
    to_visit: Vec<String>,
    visited: Vec<String>,
}

impl Team {
    /// Creates a team that still has to visit every location in `locations`.
    #[must_use]
    pub fn new(name: impl Into<String>, locations: impl IntoIterator<Item = String>) -> Self {
        let mut to_visit: Vec<String> = Vec::new();
        for location in locations {
            if !to_visit.contains(&location) {
                to_visit.push(location);
            }
        }
        Self {
            name: name.into(),
            to_visit,
            visited: Vec::new(),
        }
    }

    /// Rebuilds a team from persisted lists. Returns `None` if a location
    /// appears twice or in both lists.
    pub(crate) fn restore(name: String, to_visit: Vec<String>, visited: Vec<String>) -> Option<Self> {
        let mut seen: Vec<&String> = Vec::with_capacity(to_visit.len() + visited.len());
        for location in to_visit.iter().chain(&visited) {
            if seen.contains(&location) {
                return None;
            }
            seen.push(location);
        }
        Some(Self {
            name,
            to_visit,
            visited,
        })
    }

    /// The team name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Locations not yet visited, in order.
    #[must_use]
    pub fn to_visit(&self) -> &[String] {
        &self.to_visit
    }

    /// Locations already visited, in the order they were visited.
    #[must_use]
    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    /// Whether the team still has to visit `location`.
    #[must_use]
    pub fn needs(&self, location: &str) -> bool {
        self.to_visit.iter().any(|l| l == location)
    }

    /// Whether the team has nothing left to visit.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.to_visit.is_empty()
    }

    /// Whether any location other than `location` remains to be visited.
    #[must_use]
    pub fn has_remaining_besides(&self, location: &str) -> bool {
        self.to_visit.iter().any(|l| l != location)
    }

    /// Moves `location` from `to_visit` to `visited`. Only a location still
    /// to be visited is recorded, so an admin removal is never undone here.
    /// Returns whether anything changed.
    pub(crate) fn mark_visited(&mut self, location: &str) -> bool {
        if !self.remove_to_visit(location) {
            return false;
        }
        self.visited.push(location.to_owned());
        true
    }

    /// Adds `location` to `to_visit`; re-opens it if it was visited.
    /// No-op if already present.
    pub(crate) fn add_to_visit(&mut self, location: &str) -> bool {
        if self.needs(location) {
            return false;
        }
        self.visited.retain(|l| l != location);
        self.to_visit.push(location.to_owned());
        true
    }

    /// Removes `location` from `to_visit`. No-op if absent.
    pub(crate) fn remove_to_visit(&mut self, location: &str) -> bool {
        let before = self.to_visit.len();
        self.to_visit.retain(|l| l != location);
        self.to_visit.len() != before
    }
}
