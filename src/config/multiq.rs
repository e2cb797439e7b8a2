//! Multiple-Q definitions: sets of events that together earn an award
//! (AKC's QQ, USDAA's Triple Q) when all are qualified on one day.

use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::config::division::ConfigDivisionList;
use crate::config::event::ConfigEventList;
use crate::date::ArbDate;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;

/// One required leg: a division/level/event triple. Levels here are
/// recorded level names, not sublevels.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct MultiQItem {
    pub division: String,
    pub level: String,
    pub event: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigMultiQ {
    pub name: String,
    pub short_name: String,
    pub valid_from: ArbDate,
    pub valid_to: ArbDate,
    pub items: BTreeSet<MultiQItem>,
}

/// A run projected down to the fields a multi-Q match needs. `index`
/// is the caller's handle back to the real run.
#[derive(Debug, Clone, Copy)]
pub struct MultiQMatchRun<'a> {
    pub index: usize,
    pub date: ArbDate,
    pub division: &'a str,
    pub level: &'a str,
    pub event: &'a str,
}

impl ConfigMultiQ {
    fn in_range(&self, date: ArbDate) -> bool {
        !((self.valid_from.is_valid() && date < self.valid_from)
            || (self.valid_to.is_valid() && date > self.valid_to))
    }

    pub fn load(
        tree: &ElementNode,
        divisions: &ConfigDivisionList,
        events: &ConfigEventList,
        _version: crate::types::ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_MULTIQ {
            return Err(ArbError::MissingElement(TREE_MULTIQ.to_string()));
        }
        let mut multiq = Self::default();
        multiq.name = tree.req_attrib::<String>(ATTRIB_MULTIQ_NAME)?;
        multiq.short_name = tree.req_attrib::<String>(ATTRIB_MULTIQ_SHORTNAME)?;
        tree.opt_attrib(ATTRIB_MULTIQ_VALID_FROM, &mut multiq.valid_from)?;
        tree.opt_attrib(ATTRIB_MULTIQ_VALID_TO, &mut multiq.valid_to)?;
        for element in tree.nodes() {
            if element.name() != TREE_MULTIQ_ITEM {
                continue;
            }
            let mut item = MultiQItem::default();
            item.division = element.req_attrib::<String>(ATTRIB_MULTIQ_ITEM_DIV)?;
            if item.division.is_empty() {
                return Err(ArbError::missing(TREE_MULTIQ_ITEM, ATTRIB_MULTIQ_ITEM_DIV));
            }
            item.level = element.req_attrib::<String>(ATTRIB_MULTIQ_ITEM_LEVEL)?;
            if item.level.is_empty() {
                return Err(ArbError::missing(TREE_MULTIQ_ITEM, ATTRIB_MULTIQ_ITEM_LEVEL));
            }
            item.event = element.req_attrib::<String>(ATTRIB_MULTIQ_ITEM_EVENT)?;
            if item.event.is_empty() {
                return Err(ArbError::missing(TREE_MULTIQ_ITEM, ATTRIB_MULTIQ_ITEM_EVENT));
            }
            // Verify against the venue; the recorded name may be a
            // sublevel, events want the level.
            let Some(div) = divisions.find_division(&item.division) else {
                let msg = format!("invalid division: {}", item.division);
                cb.log_message(&msg);
                return Err(ArbError::invalid(
                    TREE_MULTIQ_ITEM,
                    ATTRIB_MULTIQ_ITEM_DIV,
                    &msg,
                ));
            };
            let Some(level) = div.levels.find_sub_level(&item.level) else {
                let msg = format!("invalid level: {}/{}", item.division, item.level);
                cb.log_message(&msg);
                return Err(ArbError::invalid(
                    TREE_MULTIQ_ITEM,
                    ATTRIB_MULTIQ_ITEM_LEVEL,
                    &msg,
                ));
            };
            let level_name = level.name.clone();
            if !events.verify_event(&item.event, &item.division, &level_name, ArbDate::invalid()) {
                let msg = format!(
                    "invalid event: {}/{}/{}",
                    item.division, item.level, item.event
                );
                cb.log_message(&msg);
                return Err(ArbError::invalid(
                    TREE_MULTIQ_ITEM,
                    ATTRIB_MULTIQ_ITEM_EVENT,
                    &msg,
                ));
            }
            multiq.items.insert(item);
        }
        Ok(multiq)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_MULTIQ);
        node.add_attrib(ATTRIB_MULTIQ_NAME, self.name.clone());
        node.add_attrib(ATTRIB_MULTIQ_SHORTNAME, self.short_name.clone());
        if self.valid_from.is_valid() {
            node.add_attrib_date(ATTRIB_MULTIQ_VALID_FROM, self.valid_from);
        }
        if self.valid_to.is_valid() {
            node.add_attrib_date(ATTRIB_MULTIQ_VALID_TO, self.valid_to);
        }
        for item in &self.items {
            let child = node.add_element_node(TREE_MULTIQ_ITEM);
            child.add_attrib(ATTRIB_MULTIQ_ITEM_DIV, item.division.clone());
            child.add_attrib(ATTRIB_MULTIQ_ITEM_LEVEL, item.level.clone());
            child.add_attrib(ATTRIB_MULTIQ_ITEM_EVENT, item.event.clone());
        }
    }

    /// Tries to satisfy every leg from `runs` (one day's qualified
    /// runs). On success returns the indices of the runs that earned
    /// the award. A run can only count toward one definition.
    pub fn match_runs(&self, runs: &[MultiQMatchRun]) -> Option<Vec<usize>> {
        if runs.len() < self.items.len() {
            return None;
        }
        let mut covered = vec![false; self.items.len()];
        for run in runs {
            if !self.in_range(run.date) {
                continue;
            }
            for (idx, item) in self.items.iter().enumerate() {
                if item.division == run.division
                    && item.level == run.level
                    && item.event == run.event
                {
                    covered[idx] = true;
                }
            }
        }
        if !covered.iter().all(|c| *c) {
            return None;
        }
        let mut matched = Vec::new();
        for run in runs {
            if !self.in_range(run.date) {
                continue;
            }
            let hits = self.items.iter().any(|item| {
                item.division == run.division && item.level == run.level && item.event == run.event
            });
            if hits {
                matched.push(run.index);
            }
        }
        Some(matched)
    }

    pub fn rename_division(&mut self, old_div: &str, new_div: &str) -> usize {
        if old_div == new_div {
            return 0;
        }
        self.rewrite(|item| {
            if item.division == old_div {
                item.division = new_div.to_string();
                true
            } else {
                false
            }
        })
    }

    pub fn delete_division(&mut self, div: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|i| i.division != div);
        before - self.items.len()
    }

    pub fn rename_level(&mut self, div: &str, old_level: &str, new_level: &str) -> usize {
        if old_level == new_level {
            return 0;
        }
        self.rewrite(|item| {
            if item.division == div && item.level == old_level {
                item.level = new_level.to_string();
                true
            } else {
                false
            }
        })
    }

    pub fn delete_level(&mut self, level: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|i| i.level != level);
        before - self.items.len()
    }

    pub fn rename_event(&mut self, old_event: &str, new_event: &str) -> usize {
        if old_event == new_event {
            return 0;
        }
        self.rewrite(|item| {
            if item.event == old_event {
                item.event = new_event.to_string();
                true
            } else {
                false
            }
        })
    }

    pub fn delete_event(&mut self, event: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|i| i.event != event);
        before - self.items.len()
    }

    fn rewrite(&mut self, mut f: impl FnMut(&mut MultiQItem) -> bool) -> usize {
        let mut count = 0;
        let mut rebuilt = BTreeSet::new();
        for mut item in std::mem::take(&mut self.items) {
            if f(&mut item) {
                count += 1;
            }
            rebuilt.insert(item);
        }
        self.items = rebuilt;
        count
    }

    pub fn add_item(&mut self, div: &str, level: &str, event: &str) -> bool {
        if div.is_empty() || level.is_empty() || event.is_empty() {
            return false;
        }
        self.items.insert(MultiQItem {
            division: div.to_string(),
            level: level.to_string(),
            event: event.to_string(),
        })
    }

    pub fn remove_item(&mut self, div: &str, level: &str, event: &str) -> bool {
        self.items.remove(&MultiQItem {
            division: div.to_string(),
            level: level.to_string(),
            event: event.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigMultiQList(pub Vec<ConfigMultiQ>);

impl Deref for ConfigMultiQList {
    type Target = Vec<ConfigMultiQ>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigMultiQList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ConfigMultiQList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        divisions: &ConfigDivisionList,
        events: &ConfigEventList,
        version: crate::types::ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0
            .push(ConfigMultiQ::load(tree, divisions, events, version, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn find_multiq(&self, name: &str, use_short_name: bool) -> Option<&ConfigMultiQ> {
        self.0.iter().find(|m| {
            if use_short_name {
                m.short_name == name
            } else {
                m.name == name
            }
        })
    }

    pub fn find_multiq_mut(&mut self, name: &str) -> Option<&mut ConfigMultiQ> {
        self.0.iter_mut().find(|m| m.name == name)
    }

    pub fn find_equivalent(&self, multiq: &ConfigMultiQ) -> Option<&ConfigMultiQ> {
        self.0.iter().find(|m| *m == multiq)
    }

    pub fn add_multiq(&mut self, multiq: ConfigMultiQ) -> bool {
        if multiq.name.is_empty() || self.find_multiq(&multiq.name, false).is_some() {
            return false;
        }
        self.0.push(multiq);
        true
    }

    pub fn delete_multiq(&mut self, name: &str) -> bool {
        match self.0.iter().position(|m| m.name == name) {
            Some(i) => {
                self.0.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn rename_division(&mut self, old_div: &str, new_div: &str) -> usize {
        self.0
            .iter_mut()
            .map(|m| m.rename_division(old_div, new_div))
            .sum()
    }

    pub fn delete_division(&mut self, div: &str) -> usize {
        self.0.iter_mut().map(|m| m.delete_division(div)).sum()
    }

    pub fn rename_level(&mut self, div: &str, old_level: &str, new_level: &str) -> usize {
        self.0
            .iter_mut()
            .map(|m| m.rename_level(div, old_level, new_level))
            .sum()
    }

    pub fn delete_level(&mut self, level: &str) -> usize {
        self.0.iter_mut().map(|m| m.delete_level(level)).sum()
    }

    pub fn rename_event(&mut self, old_event: &str, new_event: &str) -> usize {
        self.0
            .iter_mut()
            .map(|m| m.rename_event(old_event, new_event))
            .sum()
    }

    pub fn delete_event(&mut self, event: &str) -> usize {
        self.0.iter_mut().map(|m| m.delete_event(event)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qq() -> ConfigMultiQ {
        let mut m = ConfigMultiQ {
            name: "Double Q".to_string(),
            short_name: "QQ".to_string(),
            ..ConfigMultiQ::default()
        };
        assert!(m.add_item("Regular", "Excellent", "Standard"));
        assert!(m.add_item("Regular", "Excellent", "JWW"));
        m
    }

    fn run<'a>(index: usize, event: &'a str) -> MultiQMatchRun<'a> {
        MultiQMatchRun {
            index,
            date: ArbDate::new(2024, 6, 1),
            division: "Regular",
            level: "Excellent",
            event,
        }
    }

    #[test]
    fn match_requires_every_leg() {
        let m = qq();
        assert!(m.match_runs(&[run(0, "Standard")]).is_none());
        let matched = m.match_runs(&[run(0, "Standard"), run(1, "JWW")]);
        assert_eq!(matched, Some(vec![0, 1]));
    }

    #[test]
    fn unrelated_runs_are_ignored() {
        let m = qq();
        let matched = m.match_runs(&[run(0, "Standard"), run(1, "FAST"), run(2, "JWW")]);
        assert_eq!(matched, Some(vec![0, 2]));
    }

    #[test]
    fn runs_outside_validity_do_not_count() {
        let mut m = qq();
        m.valid_from = ArbDate::new(2025, 1, 1);
        assert!(m.match_runs(&[run(0, "Standard"), run(1, "JWW")]).is_none());
    }

    #[test]
    fn renames_rekey_items() {
        let mut m = qq();
        assert_eq!(m.rename_event("JWW", "Jumpers"), 1);
        assert!(m
            .items
            .iter()
            .any(|i| i.event == "Jumpers" && i.division == "Regular"));
        assert_eq!(m.rename_level("Regular", "Excellent", "Masters"), 2);
        assert_eq!(m.delete_division("Regular"), 2);
        assert!(m.items.is_empty());
    }
}
