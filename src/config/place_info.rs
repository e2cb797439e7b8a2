//! Placement-keyed value tables: speed-point multipliers and
//! placement-point awards share the same element shape.

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::arb_double;

/// One place → value row. `must_q` only matters for speed multipliers.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigPlaceInfo {
    pub place: i16,
    pub value: f64,
    pub must_q: bool,
}

impl ConfigPlaceInfo {
    pub fn new(place: i16, value: f64, must_q: bool) -> Self {
        Self {
            place,
            value,
            must_q,
        }
    }

    pub fn load(tree: &ElementNode, _cb: &mut dyn ErrorCallback) -> ArbResult<Self> {
        if tree.name() != TREE_PLACE_INFO {
            return Err(ArbError::MissingElement(TREE_PLACE_INFO.to_string()));
        }
        let place = tree.req_attrib::<i16>(ATTRIB_PLACE_INFO_PLACE)?;
        let value = tree.req_attrib::<f64>(ATTRIB_PLACE_INFO_VALUE)?;
        let mut must_q = true;
        tree.opt_attrib(ATTRIB_PLACE_INFO_MUSTQ, &mut must_q)?;
        Ok(Self {
            place,
            value,
            must_q,
        })
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_PLACE_INFO);
        node.add_attrib_short(ATTRIB_PLACE_INFO_PLACE, self.place);
        node.add_attrib_double(ATTRIB_PLACE_INFO_VALUE, self.value, 2);
        node.add_attrib_bool(ATTRIB_PLACE_INFO_MUSTQ, self.must_q);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigPlaceInfoList(pub Vec<ConfigPlaceInfo>);

impl Deref for ConfigPlaceInfoList {
    type Target = Vec<ConfigPlaceInfo>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigPlaceInfoList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ConfigPlaceInfoList {
    pub fn load(&mut self, tree: &ElementNode, cb: &mut dyn ErrorCallback) -> ArbResult<()> {
        self.0.push(ConfigPlaceInfo::load(tree, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn sort(&mut self) {
        self.0.sort_by_key(|p| p.place);
    }

    /// Exact place match, falling back to the place-0 wildcard entry.
    pub fn get_value(&self, place: i16) -> Option<f64> {
        self.0
            .iter()
            .find(|p| p.place == place)
            .or_else(|| self.0.iter().find(|p| p.place == 0))
            .map(|p| p.value)
    }

    pub fn find(&self, place: i16) -> Option<&ConfigPlaceInfo> {
        self.0.iter().find(|p| p.place == place)
    }

    pub fn add(&mut self, place: i16, value: f64, must_q: bool) -> bool {
        if self.find(place).is_some() {
            return false;
        }
        self.0.push(ConfigPlaceInfo::new(place, value, must_q));
        self.sort();
        true
    }

    pub fn delete(&mut self, place: i16) -> bool {
        let before = self.0.len();
        self.0.retain(|p| p.place != place);
        self.0.len() != before
    }
}

impl std::fmt::Display for ConfigPlaceInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: x{}", self.place, arb_double::to_string(self.value, 2))
    }
}
