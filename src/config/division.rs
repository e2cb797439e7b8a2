//! Divisions a venue offers (Regular, Preferred, Veterans) and their
//! levels.

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::config::event::ConfigEventList;
use crate::config::level::ConfigLevelList;
use crate::config::title::ConfigTitleList;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::messages;
use crate::schema::*;
use crate::types::ArbVersion;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigDivision {
    pub name: String,
    pub short_name: String,
    pub levels: ConfigLevelList,
}

impl ConfigDivision {
    /// Loads a division. Pre-12.0 files nested titles under the
    /// division; those are hoisted into `venue_titles`.
    pub fn load(
        tree: &ElementNode,
        venue_titles: &mut ConfigTitleList,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_DIVISION {
            return Err(ArbError::MissingElement(TREE_DIVISION.to_string()));
        }
        let mut div = Self::default();
        div.name = tree.req_attrib::<String>(ATTRIB_DIVISION_NAME)?;
        if div.name.is_empty() {
            return Err(ArbError::missing(TREE_DIVISION, ATTRIB_DIVISION_NAME));
        }
        tree.opt_attrib(ATTRIB_DIVISION_SHORTNAME, &mut div.short_name)?;
        for element in tree.nodes() {
            if element.name() == TREE_LEVEL {
                // Ignore any errors.
                if let Err(e) = div.levels.load(element, cb) {
                    cb.log_message(&e.to_string());
                }
            } else if element.name() == TREE_TITLES && version < ArbVersion::new(12, 0) {
                if let Err(e) = venue_titles.load(element, version, cb, true) {
                    cb.log_message(&e.to_string());
                }
            }
        }
        Ok(div)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_DIVISION);
        node.add_attrib(ATTRIB_DIVISION_NAME, self.name.clone());
        if !self.short_name.is_empty() {
            node.add_attrib(ATTRIB_DIVISION_SHORTNAME, self.short_name.clone());
        }
        self.levels.save(node);
    }

    /// Merge level changes from `new` (same division name).
    pub fn update(&mut self, indent: usize, new: &ConfigDivision, info: &mut String) -> bool {
        let indent_name = "   ".repeat(indent.saturating_sub(1));
        let indent_buffer = format!("{indent_name}   ");

        let mut changes = false;
        let mut local = String::new();

        if self.short_name != new.short_name {
            changes = true;
            self.short_name = new.short_name.clone();
        }

        // A different order alone lands here too.
        if self.levels != new.levels {
            let mut detail = String::new();
            let (mut changed, mut added, mut skipped) = (0, 0, 0);
            for level in new.levels.iter() {
                match self.levels.find_level_mut(&level.name) {
                    Some(existing) => {
                        if existing == level {
                            skipped += 1;
                        } else if existing.update(indent + 1, level, &mut detail) {
                            changed += 1;
                        }
                    }
                    None => {
                        added += 1;
                        if let Some(mine) = self.levels.add_level(&level.name) {
                            *mine = level.clone();
                        }
                        detail.push_str(&indent_buffer);
                        detail.push('+');
                        detail.push_str(&level.name);
                        detail.push('\n');
                    }
                }
            }
            self.levels.reorder_by(&new.levels);
            // Only report counts when something was added or changed.
            local.push_str(&indent_buffer);
            if added > 0 || changed > 0 {
                local.push_str(&messages::update_levels(added, changed, skipped));
                local.push('\n');
                local.push_str(&detail);
            } else {
                local.push_str(&messages::update_levels_reordered());
                local.push('\n');
            }
        }

        if !local.is_empty() {
            changes = true;
            info.push_str(&format!("{indent_name}-{}\n{local}", self.name));
        }
        changes
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigDivisionList(pub Vec<ConfigDivision>);

impl Deref for ConfigDivisionList {
    type Target = Vec<ConfigDivision>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigDivisionList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ConfigDivisionList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        venue_titles: &mut ConfigTitleList,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0
            .push(ConfigDivision::load(tree, venue_titles, version, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn reorder_by(&mut self, other: &ConfigDivisionList) {
        if self.0 == other.0 {
            return;
        }
        let mut reordered = Vec::with_capacity(self.0.len());
        for want in &other.0 {
            if let Some(i) = self.0.iter().position(|d| d.name == want.name) {
                reordered.push(self.0.remove(i));
            }
        }
        reordered.append(&mut self.0);
        self.0 = reordered;
    }

    /// Checks a division/level pair. A wildcard division needs only
    /// one division carrying the level.
    pub fn verify_level(&self, div: &str, level: &str) -> bool {
        let wildcard = div == WILDCARD_DIVISION;
        for d in &self.0 {
            if wildcard || d.name == div {
                let verified = d.levels.verify_level(level, true);
                if !wildcard || verified {
                    return verified;
                }
            }
        }
        false
    }

    pub fn find_division(&self, div: &str) -> Option<&ConfigDivision> {
        self.0.iter().find(|d| d.name == div)
    }

    pub fn find_division_mut(&mut self, div: &str) -> Option<&mut ConfigDivision> {
        self.0.iter_mut().find(|d| d.name == div)
    }

    pub fn add_division(&mut self, div: &str) -> Option<&mut ConfigDivision> {
        if div.is_empty() || self.find_division(div).is_some() {
            return None;
        }
        self.0.push(ConfigDivision {
            name: div.to_string(),
            ..ConfigDivision::default()
        });
        self.0.last_mut()
    }

    /// Deletes a division and scrubs it from the venue's events.
    pub fn delete_division(&mut self, div: &str, events: &mut ConfigEventList) -> bool {
        match self.0.iter().position(|d| d.name == div) {
            Some(i) => {
                events.delete_division(div);
                self.0.remove(i);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn division(name: &str, levels: &[&str]) -> ConfigDivision {
        let mut d = ConfigDivision {
            name: name.to_string(),
            ..ConfigDivision::default()
        };
        for level in levels {
            d.levels.add_level(level);
        }
        d
    }

    #[test]
    fn verify_level_supports_wildcard_division() {
        let list = ConfigDivisionList(vec![
            division("Regular", &["Novice", "Open"]),
            division("Preferred", &["Excellent"]),
        ]);
        assert!(list.verify_level("Regular", "Novice"));
        assert!(!list.verify_level("Preferred", "Novice"));
        assert!(list.verify_level(WILDCARD_DIVISION, "Excellent"));
        assert!(list.verify_level("Regular", WILDCARD_LEVEL));
        assert!(!list.verify_level(WILDCARD_DIVISION, "Masters"));
    }

    #[test]
    fn update_adds_missing_levels() {
        let mut old = division("Regular", &["Novice"]);
        let new = division("Regular", &["Novice", "Open"]);
        let mut info = String::new();
        assert!(old.update(1, &new, &mut info));
        assert!(old.levels.find_level("Open").is_some());
        assert!(info.contains("Levels: 1 added, 0 updated, 1 identical"));
    }
}
