//! The training log: dated practice notes, optionally categorized.

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::date::ArbDate;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::{ArbVersion, Lookup};

#[derive(Debug, Clone, PartialEq)]
pub struct Training {
    pub date: ArbDate,
    pub name: String,
    pub sub_name: String,
    pub note: String,
}

impl Default for Training {
    fn default() -> Self {
        Self {
            date: ArbDate::invalid(),
            name: String::new(),
            sub_name: String::new(),
            note: String::new(),
        }
    }
}

impl Training {
    pub fn load(
        tree: &ElementNode,
        _version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_TRAINING {
            return Err(ArbError::MissingElement(TREE_TRAINING.to_string()));
        }
        let mut entry = Self::default();
        match tree.attrib::<ArbDate>(ATTRIB_TRAINING_DATE) {
            Lookup::Found(date) => entry.date = date,
            Lookup::NotFound => {
                let err = ArbError::missing(TREE_TRAINING, ATTRIB_TRAINING_DATE);
                cb.log_message(&err.to_string());
                return Err(err);
            }
            Lookup::Invalid => {
                let raw = tree.raw_attrib(ATTRIB_TRAINING_DATE).unwrap_or_default();
                let err = ArbError::invalid_date(TREE_TRAINING, ATTRIB_TRAINING_DATE, raw);
                cb.log_message(&err.to_string());
                return Err(err);
            }
        }
        tree.opt_attrib(ATTRIB_TRAINING_NAME, &mut entry.name)?;
        tree.opt_attrib(ATTRIB_TRAINING_SUBNAME, &mut entry.sub_name)?;
        entry.note = tree.value();
        Ok(entry)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_TRAINING);
        node.add_attrib_date(ATTRIB_TRAINING_DATE, self.date);
        if !self.name.is_empty() {
            node.add_attrib(ATTRIB_TRAINING_NAME, self.name.clone());
        }
        if !self.sub_name.is_empty() {
            node.add_attrib(ATTRIB_TRAINING_SUBNAME, self.sub_name.clone());
        }
        if !self.note.is_empty() {
            node.set_value(self.note.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrainingList(pub Vec<Training>);

impl Deref for TrainingList {
    type Target = Vec<Training>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for TrainingList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl TrainingList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0.push(Training::load(tree, version, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn sort(&mut self) {
        if self.0.len() < 2 {
            return;
        }
        self.0.sort_by_key(|t| t.date);
    }

    /// Distinct categories in use, for populating pick lists.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .0
            .iter()
            .filter(|t| !t.name.is_empty())
            .map(|t| t.name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn sub_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .0
            .iter()
            .filter(|t| !t.sub_name.is_empty())
            .map(|t| t.sub_name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    pub fn add_training(&mut self, entry: Training) {
        self.0.push(entry);
    }

    pub fn delete_training(&mut self, entry: &Training) -> bool {
        match self.0.iter().position(|t| t == entry) {
            Some(i) => {
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
    use crate::callbacks::ErrorLog;

    #[test]
    fn date_is_required() {
        let node = ElementNode::new(TREE_TRAINING);
        let mut log = ErrorLog::new();
        assert!(Training::load(&node, ArbVersion::new(15, 3), &mut log).is_err());
    }

    #[test]
    fn entry_round_trips() {
        let entry = Training {
            date: ArbDate::new(2023, 5, 14),
            name: "Weaves".to_string(),
            sub_name: "Entries".to_string(),
            note: "12 poles, offside".to_string(),
        };
        let mut parent = ElementNode::new("Test");
        entry.save(&mut parent);
        let node = parent.find_element_node(TREE_TRAINING).unwrap();
        let mut log = ErrorLog::new();
        let loaded = Training::load(node, ArbVersion::new(15, 3), &mut log).unwrap();
        assert_eq!(loaded, entry);
    }

    #[test]
    fn lists_sort_by_date_and_collect_names() {
        let mut list = TrainingList::default();
        list.add_training(Training {
            date: ArbDate::new(2023, 6, 1),
            name: "Contacts".to_string(),
            ..Training::default()
        });
        list.add_training(Training {
            date: ArbDate::new(2023, 5, 14),
            name: "Weaves".to_string(),
            ..Training::default()
        });
        list.sort();
        assert_eq!(list[0].date, ArbDate::new(2023, 5, 14));
        assert_eq!(list.names(), vec!["Contacts", "Weaves"]);
    }
}
