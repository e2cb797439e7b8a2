//! Named lifetime tracks declared per venue (14.4+ file format).

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigLifetimeName {
    /// Empty is the venue's default (unnamed) lifetime track.
    pub name: String,
}

impl ConfigLifetimeName {
    pub fn load(tree: &ElementNode, _cb: &mut dyn ErrorCallback) -> ArbResult<Self> {
        if tree.name() != TREE_LIFETIME_NAME {
            return Err(ArbError::MissingElement(TREE_LIFETIME_NAME.to_string()));
        }
        let mut name = String::new();
        tree.opt_attrib(ATTRIB_LIFETIME_NAME_NAME, &mut name)?;
        Ok(Self { name })
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_LIFETIME_NAME);
        if !self.name.is_empty() {
            node.add_attrib(ATTRIB_LIFETIME_NAME_NAME, self.name.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigLifetimeNameList(pub Vec<ConfigLifetimeName>);

impl Deref for ConfigLifetimeNameList {
    type Target = Vec<ConfigLifetimeName>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigLifetimeNameList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ConfigLifetimeNameList {
    pub fn load(&mut self, tree: &ElementNode, cb: &mut dyn ErrorCallback) -> ArbResult<()> {
        self.0.push(ConfigLifetimeName::load(tree, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn sort(&mut self) {
        self.0.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub fn find(&self, name: &str) -> Option<&ConfigLifetimeName> {
        self.0.iter().find(|n| n.name == name)
    }

    pub fn add(&mut self, name: &str) -> bool {
        if self.find(name).is_some() {
            return false;
        }
        self.0.push(ConfigLifetimeName {
            name: name.to_string(),
        });
        self.sort();
        true
    }

    pub fn rename(&mut self, old_name: &str, new_name: &str) -> usize {
        let mut count = 0;
        for item in &mut self.0 {
            if item.name == old_name {
                item.name = new_name.to_string();
                count += 1;
            }
        }
        count
    }

    pub fn delete(&mut self, name: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|n| n.name != name);
        before - self.0.len()
    }
}
