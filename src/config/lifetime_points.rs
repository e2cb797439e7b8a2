//! Named lifetime-point tracks (faults → points, or speed-point based).

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::{arb_double, ArbVersion};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigLifetimePoints {
    /// Track name; empty is the default track.
    pub name: String,
    /// When set, the award is the run's speed points instead of `points`.
    pub use_speed_pts: bool,
    pub points: f64,
    pub faults: f64,
}

impl ConfigLifetimePoints {
    pub fn new(name: impl Into<String>, points: f64, faults: f64) -> Self {
        Self {
            name: name.into(),
            use_speed_pts: false,
            points,
            faults,
        }
    }

    pub fn new_speed(name: impl Into<String>, faults: f64) -> Self {
        Self {
            name: name.into(),
            use_speed_pts: true,
            points: 0.0,
            faults,
        }
    }

    pub fn load(
        tree: &ElementNode,
        version: ArbVersion,
        _cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        let mut item = Self::default();
        if version < ArbVersion::new(14, 4) {
            if tree.name() != TREE_LIFETIME_POINTS_LEGACY {
                return Err(ArbError::MissingElement(
                    TREE_LIFETIME_POINTS_LEGACY.to_string(),
                ));
            }
            // Points was required before 14.4.
            item.points = tree.req_attrib::<f64>(ATTRIB_LIFETIME_POINTS_POINTS)?;
        } else {
            if tree.name() != TREE_LIFETIME_POINTS {
                return Err(ArbError::MissingElement(TREE_LIFETIME_POINTS.to_string()));
            }
            // An empty name is the default track.
            tree.opt_attrib(ATTRIB_LIFETIME_POINTS_NAME, &mut item.name)?;
            tree.opt_attrib(ATTRIB_LIFETIME_POINTS_SPEEDPTS, &mut item.use_speed_pts)?;
            tree.opt_attrib(ATTRIB_LIFETIME_POINTS_POINTS, &mut item.points)?;
        }
        item.faults = tree.req_attrib::<f64>(ATTRIB_LIFETIME_POINTS_FAULTS)?;
        Ok(item)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_LIFETIME_POINTS);
        if !self.name.is_empty() {
            node.add_attrib(ATTRIB_LIFETIME_POINTS_NAME, self.name.clone());
        }
        node.add_attrib_bool(ATTRIB_LIFETIME_POINTS_SPEEDPTS, self.use_speed_pts);
        if !self.use_speed_pts {
            node.add_attrib_double(ATTRIB_LIFETIME_POINTS_POINTS, self.points, 0);
        }
        node.add_attrib_double(ATTRIB_LIFETIME_POINTS_FAULTS, self.faults, 0);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigLifetimePointsList(pub Vec<ConfigLifetimePoints>);

impl Deref for ConfigLifetimePointsList {
    type Target = Vec<ConfigLifetimePoints>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigLifetimePointsList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ConfigLifetimePointsList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0.push(ConfigLifetimePoints::load(tree, version, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn sort(&mut self) {
        self.0.sort_by(|a, b| {
            a.name.cmp(&b.name).then(
                a.faults
                    .partial_cmp(&b.faults)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
        });
    }

    /// Award for `faults` on the named track; the first row in the
    /// sorted list whose allowance covers the faults wins.
    pub fn get_lifetime_points(&self, name: &str, faults: f64, speed_pts: i16) -> f64 {
        for row in &self.0 {
            if row.name == name && faults <= row.faults {
                return if row.use_speed_pts {
                    f64::from(speed_pts)
                } else {
                    row.points
                };
            }
        }
        0.0
    }

    pub fn find(&self, name: &str, faults: f64) -> Option<&ConfigLifetimePoints> {
        self.0
            .iter()
            .find(|r| r.name == name && arb_double::equal(r.faults, faults))
    }

    pub fn add(&mut self, name: &str, use_speed_pts: bool, points: f64, faults: f64) -> bool {
        if self.find(name, faults).is_some() {
            return false;
        }
        self.0.push(if use_speed_pts {
            ConfigLifetimePoints::new_speed(name, faults)
        } else {
            ConfigLifetimePoints::new(name, points, faults)
        });
        self.sort();
        true
    }

    pub fn delete(&mut self, name: &str, faults: f64) -> bool {
        match self
            .0
            .iter()
            .position(|r| r.name == name && arb_double::equal(r.faults, faults))
        {
            Some(i) => {
                self.0.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn rename_track(&mut self, old_name: &str, new_name: &str) -> usize {
        let mut count = 0;
        for row in &mut self.0 {
            if row.name == old_name {
                row.name = new_name.to_string();
                count += 1;
            }
        }
        if count > 0 {
            self.sort();
        }
        count
    }

    pub fn delete_track(&mut self, name: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|r| r.name != name);
        before - self.0.len()
    }

    /// True when any row awards points (directly or via speed points).
    pub fn has_points(&self) -> bool {
        self.0.iter().any(|r| r.use_speed_pts || r.points > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_tracks_are_independent() {
        let mut list = ConfigLifetimePointsList::default();
        assert!(list.add("", false, 5.0, 0.0));
        assert!(list.add("ADCH", false, 10.0, 0.0));
        assert!(!list.add("ADCH", false, 7.0, 0.0));
        assert_eq!(list.get_lifetime_points("", 0.0, 0), 5.0);
        assert_eq!(list.get_lifetime_points("ADCH", 0.0, 0), 10.0);
        assert_eq!(list.get_lifetime_points("missing", 0.0, 0), 0.0);
    }

    #[test]
    fn speed_based_rows_award_speed_points() {
        let mut list = ConfigLifetimePointsList::default();
        assert!(list.add("speed", true, 0.0, 5.0));
        assert_eq!(list.get_lifetime_points("speed", 3.0, 7), 7.0);
        assert_eq!(list.get_lifetime_points("speed", 6.0, 7), 0.0);
    }
}
