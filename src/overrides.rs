use std::collections::{BTreeMap, HashSet};
use std::hash::{Hash, Hasher};

use crate::model::Point;

/// User-pinned node positions. Kept apart from computed layout so a relayout can
/// always tell a pinned node from a computed one.
#[derive(Clone, Debug, Default, PartialEq, Hash)]
pub struct PositionOverrides {
    positions: BTreeMap<String, PinnedPoint>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PinnedPoint(Point);

impl Hash for PinnedPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.x.to_bits());
        state.write_u64(self.0.y.to_bits());
    }
}

impl PositionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node_id: &str) -> Option<Point> {
        self.positions.get(node_id).map(|pinned| pinned.0)
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.positions.contains_key(node_id)
    }

    pub fn set(&mut self, node_id: impl Into<String>, position: Point) {
        self.positions.insert(node_id.into(), PinnedPoint(position));
    }

    pub fn remove(&mut self, node_id: &str) -> Option<Point> {
        self.positions.remove(node_id).map(|pinned| pinned.0)
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Drops pins for nodes outside `known`. Returns how many were removed.
    pub fn retain_known(&mut self, known: &HashSet<&str>) -> usize {
        let before = self.positions.len();
        self.positions.retain(|id, _| known.contains(id.as_str()));
        before - self.positions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
        self.positions.iter().map(|(id, pinned)| (id.as_str(), pinned.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::fingerprint;

    #[test]
    fn pins_replace_and_prune() {
        let mut overrides = PositionOverrides::new();
        overrides.set("a", Point::new(1.0, 2.0));
        overrides.set("b", Point::new(3.0, 4.0));
        overrides.set("a", Point::new(5.0, 6.0));
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides.get("a"), Some(Point::new(5.0, 6.0)));

        let known: HashSet<&str> = ["a"].into_iter().collect();
        assert_eq!(overrides.retain_known(&known), 1);
        assert!(!overrides.contains("b"));
    }

    #[test]
    fn fingerprint_follows_contents() {
        let mut left = PositionOverrides::new();
        let mut right = PositionOverrides::new();
        left.set("a", Point::new(1.0, 2.0));
        right.set("a", Point::new(1.0, 2.0));
        assert_eq!(fingerprint(&left), fingerprint(&right));

        right.set("a", Point::new(1.0, 2.5));
        assert_ne!(fingerprint(&left), fingerprint(&right));
    }
}
