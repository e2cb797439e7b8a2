//! Levels within a division, optionally split into named sublevels.
//!
//! Level names and sublevel names share one namespace inside a
//! division: a title or run always records the most specific name
//! (the sublevel when one exists, otherwise the level).

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::config::event::ConfigEventList;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::messages;
use crate::schema::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigSubLevel {
    pub name: String,
    pub short_name: String,
}

impl ConfigSubLevel {
    pub fn load(tree: &ElementNode, _cb: &mut dyn ErrorCallback) -> ArbResult<Self> {
        if tree.name() != TREE_SUBLEVEL {
            return Err(ArbError::MissingElement(TREE_SUBLEVEL.to_string()));
        }
        let name = tree.req_attrib::<String>(ATTRIB_SUBLEVEL_NAME)?;
        if name.is_empty() {
            return Err(ArbError::missing(TREE_SUBLEVEL, ATTRIB_SUBLEVEL_NAME));
        }
        let mut short_name = String::new();
        tree.opt_attrib(ATTRIB_SUBLEVEL_SHORTNAME, &mut short_name)?;
        Ok(Self { name, short_name })
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_SUBLEVEL);
        node.add_attrib(ATTRIB_SUBLEVEL_NAME, self.name.clone());
        if !self.short_name.is_empty() {
            node.add_attrib(ATTRIB_SUBLEVEL_SHORTNAME, self.short_name.clone());
        }
    }

    /// Merge in changes from `new` (same name). Appends a change line
    /// to `info` and returns true when anything changed.
    pub fn update(&mut self, indent: usize, new: &ConfigSubLevel, info: &mut String) -> bool {
        if self.name != new.name {
            return false;
        }
        if self.short_name != new.short_name {
            self.short_name = new.short_name.clone();
            let mut line = "   ".repeat(indent.saturating_sub(1));
            line.push('-');
            line.push_str(&self.name);
            line.push('\n');
            info.push_str(&line);
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigSubLevelList(pub Vec<ConfigSubLevel>);

impl Deref for ConfigSubLevelList {
    type Target = Vec<ConfigSubLevel>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigSubLevelList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ConfigSubLevelList {
    pub fn load(&mut self, tree: &ElementNode, cb: &mut dyn ErrorCallback) -> ArbResult<()> {
        self.0.push(ConfigSubLevel::load(tree, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    /// Reorder to match `other`; unknown entries keep their relative
    /// order at the end.
    pub fn reorder_by(&mut self, other: &ConfigSubLevelList) {
        if self.0 == other.0 {
            return;
        }
        let mut reordered = Vec::with_capacity(self.0.len());
        for want in &other.0 {
            if let Some(i) = self.0.iter().position(|s| s.name == want.name) {
                reordered.push(self.0.remove(i));
            }
        }
        reordered.append(&mut self.0);
        self.0 = reordered;
    }

    pub fn find_sub_level(&self, name: &str) -> Option<&ConfigSubLevel> {
        self.0.iter().find(|s| s.name == name)
    }

    pub fn find_sub_level_mut(&mut self, name: &str) -> Option<&mut ConfigSubLevel> {
        self.0.iter_mut().find(|s| s.name == name)
    }

    pub fn add_sub_level(&mut self, name: &str) -> bool {
        if name.is_empty() || self.find_sub_level(name).is_some() {
            return false;
        }
        self.0.push(ConfigSubLevel {
            name: name.to_string(),
            short_name: String::new(),
        });
        true
    }

    pub fn delete_sub_level(&mut self, name: &str) -> bool {
        match self.0.iter().position(|s| s.name == name) {
            Some(i) => {
                self.0.remove(i);
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigLevel {
    pub name: String,
    pub short_name: String,
    pub sub_levels: ConfigSubLevelList,
}

impl ConfigLevel {
    pub fn load(tree: &ElementNode, cb: &mut dyn ErrorCallback) -> ArbResult<Self> {
        if tree.name() != TREE_LEVEL {
            return Err(ArbError::MissingElement(TREE_LEVEL.to_string()));
        }
        let mut level = Self::default();
        level.name = tree.req_attrib::<String>(ATTRIB_LEVEL_NAME)?;
        if level.name.is_empty() {
            return Err(ArbError::missing(TREE_LEVEL, ATTRIB_LEVEL_NAME));
        }
        tree.opt_attrib(ATTRIB_LEVEL_SHORTNAME, &mut level.short_name)?;
        for child in tree.nodes() {
            if child.name() == TREE_SUBLEVEL {
                // Ignore any errors.
                if let Err(e) = level.sub_levels.load(child, cb) {
                    cb.log_message(&e.to_string());
                }
            }
        }
        Ok(level)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_LEVEL);
        node.add_attrib(ATTRIB_LEVEL_NAME, self.name.clone());
        if !self.short_name.is_empty() {
            node.add_attrib(ATTRIB_LEVEL_SHORTNAME, self.short_name.clone());
        }
        self.sub_levels.save(node);
    }

    /// Merge sublevel changes from `new` (same level name), appending
    /// an indented change report to `info`.
    pub fn update(&mut self, indent: usize, new: &ConfigLevel, info: &mut String) -> bool {
        if self.name != new.name {
            return false;
        }
        let indent_name = "   ".repeat(indent.saturating_sub(1));
        let indent_buffer = format!("{indent_name}   ");

        let mut changes = false;
        let mut local = String::new();

        if self.short_name != new.short_name {
            changes = true;
            self.short_name = new.short_name.clone();
        }

        // A different order alone lands here too.
        if self.sub_levels != new.sub_levels {
            let mut detail = String::new();
            let (mut changed, mut added, mut skipped) = (0, 0, 0);
            for sub in new.sub_levels.iter() {
                match self.sub_levels.find_sub_level_mut(&sub.name) {
                    Some(existing) => {
                        if existing == sub {
                            skipped += 1;
                        } else if existing.update(indent + 1, sub, &mut detail) {
                            changed += 1;
                        }
                    }
                    None => {
                        added += 1;
                        self.sub_levels.add_sub_level(&sub.name);
                        if let Some(mine) = self.sub_levels.find_sub_level_mut(&sub.name) {
                            mine.short_name = sub.short_name.clone();
                        }
                        detail.push_str(&indent_buffer);
                        detail.push('+');
                        detail.push_str(&sub.name);
                        detail.push('\n');
                    }
                }
            }
            self.sub_levels.reorder_by(&new.sub_levels);
            local.push_str(&indent_buffer);
            if added > 0 || changed > 0 {
                local.push_str(&messages::update_sublevels(added, changed, skipped));
                local.push('\n');
                local.push_str(&detail);
            } else {
                local.push_str(&messages::update_sublevels_reordered());
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
pub struct ConfigLevelList(pub Vec<ConfigLevel>);

impl Deref for ConfigLevelList {
    type Target = Vec<ConfigLevel>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigLevelList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ConfigLevelList {
    pub fn load(&mut self, tree: &ElementNode, cb: &mut dyn ErrorCallback) -> ArbResult<()> {
        self.0.push(ConfigLevel::load(tree, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn reorder_by(&mut self, other: &ConfigLevelList) {
        if self.0 == other.0 {
            return;
        }
        let mut reordered = Vec::with_capacity(self.0.len());
        for want in &other.0 {
            if let Some(i) = self.0.iter().position(|l| l.name == want.name) {
                reordered.push(self.0.remove(i));
            }
        }
        reordered.append(&mut self.0);
        self.0 = reordered;
    }

    /// Checks a level name. Wildcards are only valid in scoring methods.
    pub fn verify_level(&self, name: &str, allow_wildcard: bool) -> bool {
        if allow_wildcard && name == WILDCARD_LEVEL {
            return true;
        }
        self.0.iter().any(|l| l.name == name)
    }

    pub fn find_level(&self, name: &str) -> Option<&ConfigLevel> {
        self.0.iter().find(|l| l.name == name)
    }

    pub fn find_level_mut(&mut self, name: &str) -> Option<&mut ConfigLevel> {
        self.0.iter_mut().find(|l| l.name == name)
    }

    /// Finds the level owning a recorded (leaf) name: the sublevel
    /// name when the level has sublevels, otherwise the level name.
    pub fn find_sub_level(&self, name: &str) -> Option<&ConfigLevel> {
        self.0.iter().find(|l| {
            if l.sub_levels.is_empty() {
                l.name == name
            } else {
                l.sub_levels.find_sub_level(name).is_some()
            }
        })
    }

    /// Leaf names must stay unique across levels and sublevels.
    pub fn add_level(&mut self, name: &str) -> Option<&mut ConfigLevel> {
        if name.is_empty() || self.find_sub_level(name).is_some() {
            return None;
        }
        self.0.push(ConfigLevel {
            name: name.to_string(),
            ..ConfigLevel::default()
        });
        self.0.last_mut()
    }

    /// Deletes a level and scrubs it from the division's events.
    /// Events only record level names, never sublevel names.
    pub fn delete_level(&mut self, div: &str, name: &str, events: &mut ConfigEventList) -> bool {
        match self.0.iter().position(|l| l.name == name) {
            Some(i) => {
                events.delete_level(div, name);
                self.0.remove(i);
                true
            }
            None => false,
        }
    }

    /// Deletes a sublevel. When the parent level becomes a leaf its
    /// own name re-enters the leaf namespace; on a clash the level is
    /// auto-renamed by appending "?" until unique, and
    /// `level_modified` reports that this happened.
    pub fn delete_sub_level(&mut self, name: &str, level_modified: &mut bool) -> bool {
        *level_modified = false;
        let mut target: Option<usize> = None;
        for (i, level) in self.0.iter().enumerate() {
            if level.sub_levels.find_sub_level(name).is_some() {
                target = Some(i);
                break;
            }
        }
        let Some(i) = target else {
            return false;
        };
        if self.0[i].sub_levels.len() == 1 {
            let mut new_name = self.0[i].name.clone();
            while self.find_sub_level(&new_name).is_some() {
                *level_modified = true;
                new_name.push('?');
                self.0[i].name = new_name.clone();
            }
        }
        self.0[i].sub_levels.delete_sub_level(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::ErrorLog;

    fn levels(spec: &[(&str, &[&str])]) -> ConfigLevelList {
        let mut list = ConfigLevelList::default();
        for (name, subs) in spec {
            let level = list.add_level(name).unwrap();
            for sub in *subs {
                assert!(level.sub_levels.add_sub_level(sub));
            }
        }
        list
    }

    #[test]
    fn leaf_names_resolve_to_owning_level() {
        let list = levels(&[("Novice", &["A", "B"]), ("Open", &[])]);
        assert_eq!(list.find_sub_level("A").map(|l| l.name.as_str()), Some("Novice"));
        assert_eq!(list.find_sub_level("Open").map(|l| l.name.as_str()), Some("Open"));
        // A level with sublevels is not itself a leaf.
        assert!(list.find_sub_level("Novice").is_none());
    }

    #[test]
    fn add_level_rejects_leaf_collisions() {
        let mut list = levels(&[("Novice", &["A", "B"])]);
        assert!(list.add_level("A").is_none());
        assert!(list.add_level("Novice").is_some());
    }

    #[test]
    fn deleting_last_sublevel_auto_renames_on_clash() {
        // "level1" is a valid level name while it has sublevels, even
        // though another level's sublevel is also called "level1".
        let mut list = levels(&[("level1", &["sub1"]), ("level2", &["sub2", "level1"])]);
        let mut modified = false;
        assert!(list.delete_sub_level("sub1", &mut modified));
        assert!(modified);
        assert_eq!(list.0[0].name, "level1?");
        assert!(list.find_sub_level("level1?").is_some());
    }

    #[test]
    fn deleting_sublevel_without_clash_keeps_level_name() {
        let mut list = levels(&[("Novice", &["A", "B"])]);
        let mut modified = false;
        assert!(list.delete_sub_level("A", &mut modified));
        assert!(!modified);
        assert_eq!(list.0[0].sub_levels.len(), 1);
    }

    #[test]
    fn load_requires_a_name() {
        let mut node = ElementNode::new(TREE_LEVEL);
        let mut log = ErrorLog::new();
        assert!(ConfigLevel::load(&node, &mut log).is_err());
        node.add_attrib(ATTRIB_LEVEL_NAME, "Masters");
        assert!(ConfigLevel::load(&node, &mut log).is_ok());
    }

    #[test]
    fn update_reports_added_and_reordered_sublevels() {
        let mut old = levels(&[("Novice", &["A"])]);
        let new = levels(&[("Novice", &["B", "A"])]);
        let mut info = String::new();
        assert!(old.0[0].update(1, &new.0[0], &mut info));
        assert_eq!(old.0[0].sub_levels.0, new.0[0].sub_levels.0);
        assert!(info.contains("Sublevels: 1 added, 0 updated, 1 identical"));
        assert!(info.contains("+B"));
    }
}
