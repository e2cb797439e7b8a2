//! "Other points" categories a venue tracks outside titling points.

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;

/// How accumulated other-points are tallied for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OtherPointsTally {
    #[default]
    All,
    AllByEvent,
    Level,
    LevelByEvent,
}

impl OtherPointsTally {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtherPointsTally::All => "All",
            OtherPointsTally::AllByEvent => "AllByEvent",
            OtherPointsTally::Level => "Level",
            OtherPointsTally::LevelByEvent => "LevelByEvent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "All" => Some(OtherPointsTally::All),
            "AllByEvent" => Some(OtherPointsTally::AllByEvent),
            "Level" => Some(OtherPointsTally::Level),
            "LevelByEvent" => Some(OtherPointsTally::LevelByEvent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigOtherPoints {
    pub name: String,
    pub tally: OtherPointsTally,
    pub description: String,
    pub default_points: f64,
}

impl ConfigOtherPoints {
    pub fn load(tree: &ElementNode, _cb: &mut dyn ErrorCallback) -> ArbResult<Self> {
        if tree.name() != TREE_OTHERPTS {
            return Err(ArbError::MissingElement(TREE_OTHERPTS.to_string()));
        }
        let mut item = Self::default();
        item.name = tree.req_attrib::<String>(ATTRIB_OTHERPTS_NAME)?;
        if item.name.is_empty() {
            return Err(ArbError::missing(TREE_OTHERPTS, ATTRIB_OTHERPTS_NAME));
        }
        let count = tree.req_attrib::<String>(ATTRIB_OTHERPTS_COUNT)?;
        item.tally = OtherPointsTally::parse(&count).ok_or_else(|| {
            ArbError::invalid(
                TREE_OTHERPTS,
                ATTRIB_OTHERPTS_COUNT,
                "must be one of: All, AllByEvent, Level, LevelByEvent",
            )
        })?;
        tree.opt_attrib(ATTRIB_OTHERPTS_DEFAULT, &mut item.default_points)?;
        item.description = tree.value();
        Ok(item)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_OTHERPTS);
        node.add_attrib(ATTRIB_OTHERPTS_NAME, self.name.clone());
        node.add_attrib(ATTRIB_OTHERPTS_COUNT, self.tally.as_str());
        if self.default_points != 0.0 {
            node.add_attrib_double(ATTRIB_OTHERPTS_DEFAULT, self.default_points, 2);
        }
        if !self.description.is_empty() {
            node.set_value(self.description.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigOtherPointsList(pub Vec<ConfigOtherPoints>);

impl Deref for ConfigOtherPointsList {
    type Target = Vec<ConfigOtherPoints>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigOtherPointsList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ConfigOtherPointsList {
    pub fn load(&mut self, tree: &ElementNode, cb: &mut dyn ErrorCallback) -> ArbResult<()> {
        self.0.push(ConfigOtherPoints::load(tree, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn verify(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn find(&self, name: &str) -> Option<&ConfigOtherPoints> {
        self.0.iter().find(|o| o.name == name)
    }

    pub fn add(&mut self, item: ConfigOtherPoints) -> bool {
        if item.name.is_empty() || self.verify(&item.name) {
            return false;
        }
        self.0.push(item);
        true
    }

    pub fn delete(&mut self, name: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|o| o.name != name);
        self.0.len() != before
    }
}
