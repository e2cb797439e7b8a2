//! Fault-type name list (free-form strings a venue recognizes).

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFault {
    pub name: String,
}

impl ConfigFault {
    pub fn load(tree: &ElementNode, _cb: &mut dyn ErrorCallback) -> ArbResult<Self> {
        if tree.name() != TREE_FAULTTYPE {
            return Err(ArbError::MissingElement(TREE_FAULTTYPE.to_string()));
        }
        let name = tree.value();
        if name.is_empty() {
            return Err(ArbError::invalid(TREE_FAULTTYPE, "", "fault name is empty"));
        }
        Ok(Self { name })
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_FAULTTYPE);
        node.set_value(self.name.clone());
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFaultList(pub Vec<ConfigFault>);

impl Deref for ConfigFaultList {
    type Target = Vec<ConfigFault>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigFaultList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ConfigFaultList {
    pub fn load(&mut self, tree: &ElementNode, cb: &mut dyn ErrorCallback) -> ArbResult<()> {
        self.0.push(ConfigFault::load(tree, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn find(&self, name: &str) -> Option<&ConfigFault> {
        self.0.iter().find(|f| f.name == name)
    }

    pub fn add(&mut self, name: &str) -> bool {
        if name.is_empty() || self.find(name).is_some() {
            return false;
        }
        self.0.push(ConfigFault {
            name: name.to_string(),
        });
        true
    }

    pub fn delete(&mut self, name: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|f| f.name != name);
        self.0.len() != before
    }
}
