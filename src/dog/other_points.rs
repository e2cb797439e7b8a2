//! Non-titling point credits attached to a run's placement (NADAC
//! bonus points, breed-club awards and the like).

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::config::Config;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::ArbVersion;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogRunOtherPoints {
    pub name: String,
    pub points: f64,
}

impl DogRunOtherPoints {
    pub fn load(
        tree: &ElementNode,
        config: &Config,
        _version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_PLACEMENT_OTHERPOINTS {
            return Err(ArbError::MissingElement(
                TREE_PLACEMENT_OTHERPOINTS.to_string(),
            ));
        }
        let mut other = Self::default();
        other.name = tree.req_attrib::<String>(ATTRIB_PLACEMENT_OTHERPOINTS_NAME)?;
        if other.name.is_empty() {
            let err = ArbError::missing(
                TREE_PLACEMENT_OTHERPOINTS,
                ATTRIB_PLACEMENT_OTHERPOINTS_NAME,
            );
            cb.log_message(&err.to_string());
            return Err(err);
        }
        if config.other_points.find(&other.name).is_none() {
            let err = ArbError::invalid(
                TREE_PLACEMENT_OTHERPOINTS,
                ATTRIB_PLACEMENT_OTHERPOINTS_NAME,
                format!("unknown other points '{}'", other.name),
            );
            cb.log_message(&err.to_string());
            return Err(err);
        }
        other.points = tree.req_attrib::<f64>(ATTRIB_PLACEMENT_OTHERPOINTS_POINTS)?;
        Ok(other)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_PLACEMENT_OTHERPOINTS);
        node.add_attrib(ATTRIB_PLACEMENT_OTHERPOINTS_NAME, self.name.clone());
        node.add_attrib_double(ATTRIB_PLACEMENT_OTHERPOINTS_POINTS, self.points, 2);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogRunOtherPointsList(pub Vec<DogRunOtherPoints>);

impl Deref for DogRunOtherPointsList {
    type Target = Vec<DogRunOtherPoints>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DogRunOtherPointsList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl DogRunOtherPointsList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        config: &Config,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0
            .push(DogRunOtherPoints::load(tree, config, version, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn add_other_points(&mut self, other: DogRunOtherPoints) {
        self.0.push(other);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::ErrorLog;

    fn config() -> Config {
        let mut config = Config::default();
        config.other_points.add(crate::config::other_points::ConfigOtherPoints {
            name: "Versatility".to_string(),
            ..Default::default()
        });
        config
    }

    #[test]
    fn unknown_names_are_rejected() {
        let mut node = ElementNode::new(TREE_PLACEMENT_OTHERPOINTS);
        node.add_attrib(ATTRIB_PLACEMENT_OTHERPOINTS_NAME, "Bogus");
        node.add_attrib(ATTRIB_PLACEMENT_OTHERPOINTS_POINTS, "5");
        let mut log = ErrorLog::new();
        assert!(
            DogRunOtherPoints::load(&node, &config(), ArbVersion::new(15, 3), &mut log).is_err()
        );
        assert!(!log.messages.is_empty());
    }

    #[test]
    fn points_round_trip() {
        let mut node = ElementNode::new(TREE_PLACEMENT_OTHERPOINTS);
        node.add_attrib(ATTRIB_PLACEMENT_OTHERPOINTS_NAME, "Versatility");
        node.add_attrib(ATTRIB_PLACEMENT_OTHERPOINTS_POINTS, "12.5");
        let mut log = ErrorLog::new();
        let other =
            DogRunOtherPoints::load(&node, &config(), ArbVersion::new(15, 3), &mut log).unwrap();
        assert_eq!(other.points, 12.5);

        let mut parent = ElementNode::new("Test");
        other.save(&mut parent);
        let saved = parent.find_element_node(TREE_PLACEMENT_OTHERPOINTS).unwrap();
        assert_eq!(saved.raw_attrib(ATTRIB_PLACEMENT_OTHERPOINTS_POINTS), Some("12.5"));
    }
}
