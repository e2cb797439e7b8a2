//! Registration numbers a dog holds with the various venues.

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::config::venue::ConfigVenueList;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::{ArbVersion, Lookup};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogRegNum {
    pub venue: String,
    pub number: String,
    pub height: String,
    pub received: bool,
    pub note: String,
}

impl DogRegNum {
    pub fn load(
        tree: &ElementNode,
        venues: &ConfigVenueList,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_REG_NUM {
            return Err(ArbError::MissingElement(TREE_REG_NUM.to_string()));
        }
        let mut reg = Self::default();
        reg.venue = tree.req_attrib::<String>(ATTRIB_REG_NUM_VENUE)?;
        if reg.venue.is_empty() {
            let err = ArbError::invalid(TREE_REG_NUM, ATTRIB_REG_NUM_VENUE, "may not be empty");
            cb.log_message(&err.to_string());
            return Err(err);
        }
        // The number moved from the element value to an attribute in
        // file version 9.
        if version == ArbVersion::new(1, 0) {
            reg.number = tree.req_attrib::<String>(ATTRIB_REG_NUM_NUMBER)?;
        } else if version < ArbVersion::new(9, 0) {
            reg.number = tree.value();
        } else {
            reg.number = tree.req_attrib::<String>(ATTRIB_REG_NUM_NUMBER)?;
            reg.note = tree.value();
        }
        tree.opt_attrib(ATTRIB_REG_NUM_HEIGHT, &mut reg.height)?;
        if let Lookup::Invalid = tree.attrib::<bool>(ATTRIB_REG_NUM_RECEIVED) {
            let err = ArbError::invalid_bool(TREE_REG_NUM, ATTRIB_REG_NUM_RECEIVED);
            cb.log_message(&err.to_string());
            return Err(err);
        }
        tree.attrib::<bool>(ATTRIB_REG_NUM_RECEIVED)
            .assign(&mut reg.received);
        if venues.find_venue(&reg.venue).is_none() {
            let err = ArbError::invalid(
                TREE_REG_NUM,
                ATTRIB_REG_NUM_VENUE,
                format!("unknown venue '{}'", reg.venue),
            );
            cb.log_message(&err.to_string());
            return Err(err);
        }
        Ok(reg)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_REG_NUM);
        node.add_attrib(ATTRIB_REG_NUM_VENUE, self.venue.clone());
        node.add_attrib(ATTRIB_REG_NUM_NUMBER, self.number.clone());
        if !self.height.is_empty() {
            node.add_attrib(ATTRIB_REG_NUM_HEIGHT, self.height.clone());
        }
        if self.received {
            node.add_attrib_bool(ATTRIB_REG_NUM_RECEIVED, self.received);
        }
        if !self.note.is_empty() {
            node.set_value(self.note.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogRegNumList(pub Vec<DogRegNum>);

impl Deref for DogRegNumList {
    type Target = Vec<DogRegNum>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DogRegNumList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl DogRegNumList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        venues: &ConfigVenueList,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0.push(DogRegNum::load(tree, venues, version, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn sort(&mut self) {
        self.0.sort_by(|a, b| a.venue.cmp(&b.venue));
    }

    pub fn num_reg_nums_in_venue(&self, venue: &str) -> usize {
        self.0.iter().filter(|r| r.venue == venue).count()
    }

    pub fn rename_venue(&mut self, old_venue: &str, new_venue: &str) -> usize {
        let mut count = 0;
        for reg in self.0.iter_mut().filter(|r| r.venue == old_venue) {
            reg.venue = new_venue.to_string();
            count += 1;
        }
        count
    }

    pub fn delete_venue(&mut self, venue: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|r| r.venue != venue);
        before - self.0.len()
    }

    pub fn find_reg_num(&self, venue: &str) -> Option<&DogRegNum> {
        self.0.iter().find(|r| r.venue == venue)
    }

    pub fn add_reg_num(&mut self, reg: DogRegNum) {
        self.0.push(reg);
    }

    pub fn delete_reg_num(&mut self, venue: &str, number: &str) -> bool {
        match self
            .0
            .iter()
            .position(|r| r.venue == venue && r.number == number)
        {
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
    use crate::config::venue::ConfigVenueList;

    fn venues() -> ConfigVenueList {
        let mut venues = ConfigVenueList::default();
        venues.add_venue("AKC");
        venues.add_venue("USDAA");
        venues
    }

    #[test]
    fn load_rejects_unknown_venues() {
        let mut node = ElementNode::new(TREE_REG_NUM);
        node.add_attrib(ATTRIB_REG_NUM_VENUE, "NADAC");
        node.add_attrib(ATTRIB_REG_NUM_NUMBER, "123");
        let mut log = ErrorLog::new();
        assert!(DogRegNum::load(&node, &venues(), ArbVersion::new(15, 3), &mut log).is_err());
    }

    #[test]
    fn old_files_carry_the_number_as_the_element_value() {
        let mut node = ElementNode::new(TREE_REG_NUM);
        node.add_attrib(ATTRIB_REG_NUM_VENUE, "AKC");
        node.set_value("MX12345");
        let mut log = ErrorLog::new();
        let reg = DogRegNum::load(&node, &venues(), ArbVersion::new(8, 0), &mut log).unwrap();
        assert_eq!(reg.number, "MX12345");
        assert!(reg.note.is_empty());
    }

    #[test]
    fn current_files_keep_the_note_in_the_element_value() {
        let mut node = ElementNode::new(TREE_REG_NUM);
        node.add_attrib(ATTRIB_REG_NUM_VENUE, "AKC");
        node.add_attrib(ATTRIB_REG_NUM_NUMBER, "MX12345");
        node.add_attrib(ATTRIB_REG_NUM_RECEIVED, "y");
        node.set_value("card on file");
        let mut log = ErrorLog::new();
        let reg = DogRegNum::load(&node, &venues(), ArbVersion::new(15, 3), &mut log).unwrap();
        assert_eq!(reg.number, "MX12345");
        assert_eq!(reg.note, "card on file");
        assert!(reg.received);
    }

    #[test]
    fn list_edits_by_venue() {
        let mut list = DogRegNumList::default();
        list.add_reg_num(DogRegNum {
            venue: "AKC".to_string(),
            number: "1".to_string(),
            ..DogRegNum::default()
        });
        list.add_reg_num(DogRegNum {
            venue: "USDAA".to_string(),
            number: "2".to_string(),
            ..DogRegNum::default()
        });
        assert_eq!(list.num_reg_nums_in_venue("AKC"), 1);
        assert_eq!(list.rename_venue("AKC", "AKC2"), 1);
        assert!(list.find_reg_num("AKC2").is_some());
        assert_eq!(list.delete_venue("USDAA"), 1);
        assert!(list.delete_reg_num("AKC2", "1"));
        assert!(list.is_empty());
    }
}
