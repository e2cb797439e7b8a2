//! Events a venue runs (Standard, Jumpers, Gamblers) and their
//! per-division/level scoring methods.

use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::config::division::ConfigDivisionList;
use crate::config::scoring::{ConfigScoring, ConfigScoringList};
use crate::date::ArbDate;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::messages;
use crate::schema::*;
use crate::types::ArbVersion;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigEvent {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub has_partner: bool,
    pub scorings: ConfigScoringList,
}

impl ConfigEvent {
    pub fn load(
        tree: &ElementNode,
        divisions: &ConfigDivisionList,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_EVENT {
            return Err(ArbError::MissingElement(TREE_EVENT.to_string()));
        }
        let mut event = Self::default();
        event.name = tree.req_attrib::<String>(ATTRIB_EVENT_NAME)?;
        if event.name.is_empty() {
            return Err(ArbError::missing(TREE_EVENT, ATTRIB_EVENT_NAME));
        }
        tree.opt_attrib(ATTRIB_EVENT_SHORTNAME, &mut event.short_name)?;
        tree.opt_attrib(ATTRIB_EVENT_HASPARTNER, &mut event.has_partner)?;
        // Table and subname data lived on the event before 15.0; now
        // each scoring method carries its own.
        let mut table = false;
        let mut has_sub_names = false;
        if version < ArbVersion::new(15, 0) {
            tree.opt_attrib("hasTable", &mut table)?;
            tree.opt_attrib("hasSubNames", &mut has_sub_names)?;
        }
        let mut sub_names: BTreeSet<String> = BTreeSet::new();
        for element in tree.nodes() {
            if element.name() == TREE_EVENT_DESC {
                event.description = element.value();
            } else if element.name() == TREE_SCORING {
                // Ignore any errors.
                if let Err(e) = event.scorings.load(element, divisions, version, cb) {
                    cb.log_message(&e.to_string());
                }
            } else if version < ArbVersion::new(15, 0) && element.name() == TREE_EVENT_SUBNAME {
                sub_names.insert(element.value());
            }
        }
        if version < ArbVersion::new(15, 0) && (table || has_sub_names) {
            for scoring in event.scorings.iter_mut() {
                scoring.has_table = table;
                scoring.has_sub_names = has_sub_names;
                scoring.sub_names = sub_names.clone();
            }
        }
        Ok(event)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_EVENT);
        node.add_attrib(ATTRIB_EVENT_NAME, self.name.clone());
        if !self.description.is_empty() {
            let desc = node.add_element_node(TREE_EVENT_DESC);
            desc.set_value(self.description.clone());
        }
        if !self.short_name.is_empty() {
            node.add_attrib(ATTRIB_EVENT_SHORTNAME, self.short_name.clone());
        }
        if self.has_partner {
            node.add_attrib_bool(ATTRIB_EVENT_HASPARTNER, self.has_partner);
        }
        self.scorings.save(node);
    }

    /// Whether any of the event's scoring methods include a table.
    pub fn has_table(&self) -> bool {
        self.scorings.iter().any(|s| s.has_table)
    }

    pub fn verify_event(&self, division: &str, level: &str, date: ArbDate) -> bool {
        self.scorings.verify_event(division, level, date)
    }

    pub fn find_event(&self, division: &str, level: &str, date: ArbDate) -> Option<&ConfigScoring> {
        self.scorings.find_event(division, level, date)
    }

    /// Merge changes from `new` (same event name). The new scoring
    /// methods replace the old wholesale; this can invalidate runs
    /// recorded under rules that disappeared, which the caller's run
    /// re-resolution pass cleans up.
    pub fn update(&mut self, indent: usize, new: &ConfigEvent, info: &mut String) -> bool {
        let indent_buffer = "   ".repeat(indent.saturating_sub(1)) + "   ";

        let mut changes = false;
        if self.short_name != new.short_name {
            changes = true;
            self.short_name = new.short_name.clone();
        }
        if self.description != new.description {
            changes = true;
            self.description = new.description.clone();
        }
        if self.has_partner != new.has_partner {
            changes = true;
            self.has_partner = new.has_partner;
        }
        // A different order alone lands here too.
        if self.scorings != new.scorings {
            let (mut added, mut deleted, mut changed, mut skipped) = (0, 0, 0, 0);
            for mine in self.scorings.iter() {
                match new
                    .scorings
                    .iter()
                    .find(|s| s.division == mine.division && s.level == mine.level)
                {
                    Some(theirs) => {
                        if mine == theirs {
                            skipped += 1;
                        } else {
                            changed += 1;
                        }
                    }
                    None => deleted += 1,
                }
            }
            for theirs in new.scorings.iter() {
                if !self
                    .scorings
                    .iter()
                    .any(|s| s.division == theirs.division && s.level == theirs.level)
                {
                    added += 1;
                }
            }
            self.scorings = new.scorings.clone();
            if added > 0 || deleted > 0 || changed > 0 {
                changes = true;
                info.push_str(&indent_buffer);
                info.push_str(&self.name);
                info.push_str(&messages::update_rules(added, deleted, changed, skipped));
                info.push('\n');
            }
        }
        changes
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigEventList(pub Vec<ConfigEvent>);

impl Deref for ConfigEventList {
    type Target = Vec<ConfigEvent>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigEventList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ConfigEventList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        divisions: &ConfigDivisionList,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0.push(ConfigEvent::load(tree, divisions, version, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn reorder_by(&mut self, other: &ConfigEventList) {
        if self.0 == other.0 {
            return;
        }
        let mut reordered = Vec::with_capacity(self.0.len());
        for want in &other.0 {
            if let Some(i) = self.0.iter().position(|e| e.name == want.name) {
                reordered.push(self.0.remove(i));
            }
        }
        reordered.append(&mut self.0);
        self.0 = reordered;
    }

    pub fn verify_event(&self, event: &str, division: &str, level: &str, date: ArbDate) -> bool {
        match self.find_event(event) {
            Some(e) => e.verify_event(division, level, date),
            None => false,
        }
    }

    pub fn find_event(&self, event: &str) -> Option<&ConfigEvent> {
        self.0.iter().find(|e| e.name == event)
    }

    pub fn find_event_mut(&mut self, event: &str) -> Option<&mut ConfigEvent> {
        self.0.iter_mut().find(|e| e.name == event)
    }

    /// Resolve an event name to its scoring method for a
    /// division/level/date.
    pub fn find_event_scoring(
        &self,
        event: &str,
        division: &str,
        level: &str,
        date: ArbDate,
    ) -> Option<(&ConfigEvent, &ConfigScoring)> {
        let e = self.find_event(event)?;
        let scoring = e.find_event(division, level, date)?;
        Some((e, scoring))
    }

    pub fn add_event(&mut self, event: ConfigEvent) -> bool {
        if event.name.is_empty() || self.find_event(&event.name).is_some() {
            return false;
        }
        self.0.push(event);
        true
    }

    pub fn delete_event(&mut self, event: &str) -> bool {
        match self.0.iter().position(|e| e.name == event) {
            Some(i) => {
                self.0.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn rename_event(&mut self, old_name: &str, new_name: &str) -> usize {
        let mut count = 0;
        for e in &mut self.0 {
            if e.name == old_name {
                e.name = new_name.to_string();
                count += 1;
            }
        }
        count
    }

    pub fn rename_division(&mut self, old_div: &str, new_div: &str) -> usize {
        let mut count = 0;
        for e in &mut self.0 {
            for s in e.scorings.iter_mut() {
                if s.division == old_div {
                    count += 1;
                    s.division = new_div.to_string();
                }
            }
        }
        count
    }

    pub fn delete_division(&mut self, div: &str) -> usize {
        let mut count = 0;
        for e in &mut self.0 {
            let before = e.scorings.len();
            e.scorings.retain(|s| s.division != div);
            count += before - e.scorings.len();
        }
        count
    }

    pub fn rename_level(&mut self, old_div: &str, old_level: &str, new_level: &str) -> usize {
        let mut count = 0;
        for e in &mut self.0 {
            for s in e.scorings.iter_mut() {
                if s.level == old_level
                    && (s.division == WILDCARD_DIVISION || s.division == old_div)
                {
                    count += 1;
                    s.level = new_level.to_string();
                }
            }
        }
        count
    }

    pub fn delete_level(&mut self, div: &str, level: &str) -> usize {
        let mut count = 0;
        for e in &mut self.0 {
            let before = e.scorings.len();
            e.scorings.retain(|s| {
                !(s.level == level && (s.division == WILDCARD_DIVISION || s.division == div))
            });
            count += before - e.scorings.len();
        }
        count
    }

    pub fn rename_lifetime_name(&mut self, old_name: &str, new_name: &str) -> usize {
        let mut count = 0;
        for e in &mut self.0 {
            for s in e.scorings.iter_mut() {
                count += s.life_points.rename_track(old_name, new_name);
            }
        }
        count
    }

    pub fn delete_lifetime_name(&mut self, name: &str) -> usize {
        let mut count = 0;
        for e in &mut self.0 {
            for s in e.scorings.iter_mut() {
                count += s.life_points.delete_track(name);
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::scoring::ScoringStyle;

    fn event_with(scorings: Vec<(&str, &str)>) -> ConfigEvent {
        let mut e = ConfigEvent {
            name: "Standard".to_string(),
            ..ConfigEvent::default()
        };
        for (div, level) in scorings {
            let s = e.scorings.add_scoring();
            s.division = div.to_string();
            s.level = level.to_string();
            s.style = ScoringStyle::FaultsThenTime;
        }
        e
    }

    #[test]
    fn update_replaces_rules_and_counts_the_diff() {
        let mut old = event_with(vec![("Open", "Novice"), ("Open", "Masters")]);
        let mut new = event_with(vec![("Open", "Novice"), ("Open", "Excellent")]);
        if let Some(s) = new.scorings.iter_mut().next() {
            s.super_q = true;
        }
        let mut info = String::new();
        assert!(old.update(1, &new, &mut info));
        assert_eq!(old.scorings, new.scorings);
        assert!(info.contains("Standard"));
        assert!(info.contains("1 added, 1 deleted, 1 updated, 0 identical"));
    }

    #[test]
    fn level_edits_honor_wildcard_division() {
        let mut list = ConfigEventList::default();
        assert!(list.add_event(event_with(vec![(WILDCARD_DIVISION, "Novice")])));
        assert_eq!(list.rename_level("Open", "Novice", "Beginner"), 1);
        assert_eq!(list.delete_level("Open", "Beginner"), 1);
    }

    #[test]
    fn duplicate_event_names_are_rejected() {
        let mut list = ConfigEventList::default();
        assert!(list.add_event(event_with(vec![])));
        assert!(!list.add_event(event_with(vec![])));
        assert!(list.delete_event("Standard"));
        assert!(!list.delete_event("Standard"));
    }
}
