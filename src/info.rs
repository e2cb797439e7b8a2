//! Free-form comments about clubs, judges, and trial locations.

use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::{ArbVersion, Lookup};

/// The comment categories kept in the Info section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoType {
    Club,
    Judge,
    Location,
}

impl InfoType {
    pub fn tree_name(&self) -> &'static str {
        match self {
            InfoType::Club => TREE_CLUBINFO,
            InfoType::Judge => TREE_JUDGEINFO,
            InfoType::Location => TREE_LOCATIONINFO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfoItem {
    pub name: String,
    pub comment: String,
    pub visible: bool,
}

impl Default for InfoItem {
    fn default() -> Self {
        Self {
            name: String::new(),
            comment: String::new(),
            visible: true,
        }
    }
}

impl InfoItem {
    pub fn load(
        tree: &ElementNode,
        item_name: &str,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != item_name {
            return Err(ArbError::MissingElement(item_name.to_string()));
        }
        let mut item = Self::default();
        match tree.attrib::<String>(ATTRIB_INFO_NAME) {
            Lookup::Found(name) => item.name = name,
            _ => {
                let err = ArbError::missing(item_name, ATTRIB_INFO_NAME);
                cb.log_message(&err.to_string());
                return Err(err);
            }
        }
        if let Lookup::Invalid = tree.attrib::<bool>(ATTRIB_INFO_VISIBLE) {
            let err = ArbError::invalid_bool(item_name, ATTRIB_INFO_VISIBLE);
            cb.log_message(&err.to_string());
            return Err(err);
        }
        tree.attrib::<bool>(ATTRIB_INFO_VISIBLE)
            .assign(&mut item.visible);
        item.comment = tree.value();
        Ok(item)
    }

    pub fn save(&self, parent: &mut ElementNode, item_name: &str) {
        let node = parent.add_element_node(item_name);
        node.add_attrib(ATTRIB_INFO_NAME, self.name.clone());
        if !self.visible {
            node.add_attrib_bool(ATTRIB_INFO_VISIBLE, self.visible);
        }
        if !self.comment.is_empty() {
            node.set_value(self.comment.clone());
        }
    }

    /// An item with nothing but a name carries no information and is
    /// dropped when the list is condensed.
    pub fn has_data(&self) -> bool {
        !self.comment.is_empty() || !self.visible
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InfoItemList(pub Vec<InfoItem>);

impl Deref for InfoItemList {
    type Target = Vec<InfoItem>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for InfoItemList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl InfoItemList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        item_name: &str,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0.push(InfoItem::load(tree, item_name, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode, item_name: &str) {
        for item in &self.0 {
            item.save(parent, item_name);
        }
    }

    pub fn sort(&mut self) {
        if self.0.len() < 2 {
            return;
        }
        self.0.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub fn all_items(&self, visible_only: bool) -> BTreeSet<String> {
        self.0
            .iter()
            .filter(|i| !visible_only || i.visible)
            .map(|i| i.name.clone())
            .collect()
    }

    pub fn find_item(&self, name: &str) -> Option<&InfoItem> {
        self.0.iter().find(|i| i.name == name)
    }

    pub fn find_item_mut(&mut self, name: &str) -> Option<&mut InfoItem> {
        self.0.iter_mut().find(|i| i.name == name)
    }

    pub fn add_item(&mut self, item: InfoItem) -> bool {
        if item.name.is_empty() || self.find_item(&item.name).is_some() {
            return false;
        }
        self.0.push(item);
        true
    }

    pub fn delete_item(&mut self, name: &str) -> bool {
        match self.0.iter().position(|i| i.name == name) {
            Some(i) => {
                self.0.remove(i);
                true
            }
            None => false,
        }
    }

    /// Drops dataless items whose names are not in `keep`.
    pub fn condense(&mut self, keep: &BTreeSet<String>) {
        self.0.retain(|i| i.has_data() || keep.contains(&i.name));
    }
}

/// The Info section of a document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Info {
    pub clubs: InfoItemList,
    pub judges: InfoItemList,
    pub locations: InfoItemList,
}

impl Info {
    pub fn get(&self, kind: InfoType) -> &InfoItemList {
        match kind {
            InfoType::Club => &self.clubs,
            InfoType::Judge => &self.judges,
            InfoType::Location => &self.locations,
        }
    }

    pub fn get_mut(&mut self, kind: InfoType) -> &mut InfoItemList {
        match kind {
            InfoType::Club => &mut self.clubs,
            InfoType::Judge => &mut self.judges,
            InfoType::Location => &mut self.locations,
        }
    }

    pub fn load(
        &mut self,
        tree: &ElementNode,
        _version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        if tree.name() != TREE_INFO {
            return Err(ArbError::MissingElement(TREE_INFO.to_string()));
        }
        for element in tree.nodes() {
            // A bad item doesn't lose the section.
            let result = match element.name() {
                TREE_CLUBINFO => self.clubs.load(element, TREE_CLUBINFO, cb),
                TREE_JUDGEINFO => self.judges.load(element, TREE_JUDGEINFO, cb),
                TREE_LOCATIONINFO => self.locations.load(element, TREE_LOCATIONINFO, cb),
                _ => Ok(()),
            };
            if let Err(e) = result {
                cb.log_message(&e.to_string());
            }
        }
        self.clubs.sort();
        self.judges.sort();
        self.locations.sort();
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        if self.clubs.is_empty() && self.judges.is_empty() && self.locations.is_empty() {
            return;
        }
        let node = parent.add_element_node(TREE_INFO);
        for kind in [InfoType::Club, InfoType::Judge, InfoType::Location] {
            self.get(kind).save(node, kind.tree_name());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::ErrorLog;

    #[test]
    fn name_is_required() {
        let tree = ElementNode::new(TREE_JUDGEINFO);
        let mut log = ErrorLog::new();
        assert!(InfoItem::load(&tree, TREE_JUDGEINFO, &mut log).is_err());
    }

    #[test]
    fn section_round_trips() {
        let mut tree = ElementNode::new(TREE_INFO);
        {
            let judge = tree.add_element_node(TREE_JUDGEINFO);
            judge.add_attrib(ATTRIB_INFO_NAME, "Pat Smith");
            judge.set_value("Generous with refusals");
        }
        {
            let club = tree.add_element_node(TREE_CLUBINFO);
            club.add_attrib(ATTRIB_INFO_NAME, "Bay Team");
            club.add_attrib(ATTRIB_INFO_VISIBLE, "n");
        }
        let mut info = Info::default();
        let mut log = ErrorLog::new();
        info.load(&tree, ArbVersion::new(15, 3), &mut log).unwrap();
        assert_eq!(info.judges[0].comment, "Generous with refusals");
        assert!(!info.clubs[0].visible);
        assert_eq!(info.judges.all_items(true).len(), 1);
        assert!(info.clubs.all_items(true).is_empty());

        let mut parent = ElementNode::new("Test");
        info.save(&mut parent);
        let saved = parent.find_element_node(TREE_INFO).unwrap();
        let mut reloaded = Info::default();
        reloaded
            .load(saved, ArbVersion::new(15, 3), &mut log)
            .unwrap();
        assert_eq!(reloaded, info);
    }

    #[test]
    fn bad_items_do_not_lose_the_section() {
        let mut tree = ElementNode::new(TREE_INFO);
        tree.add_element_node(TREE_CLUBINFO);
        {
            let club = tree.add_element_node(TREE_CLUBINFO);
            club.add_attrib(ATTRIB_INFO_NAME, "Bay Team");
        }
        let mut info = Info::default();
        let mut log = ErrorLog::new();
        info.load(&tree, ArbVersion::new(15, 3), &mut log).unwrap();
        assert_eq!(info.clubs.len(), 1);
        assert!(!log.messages.is_empty());
    }

    #[test]
    fn condense_keeps_referenced_names() {
        let mut list = InfoItemList::default();
        list.add_item(InfoItem {
            name: "Empty".to_string(),
            ..InfoItem::default()
        });
        list.add_item(InfoItem {
            name: "Commented".to_string(),
            comment: "note".to_string(),
            ..InfoItem::default()
        });
        let keep: BTreeSet<String> = ["Empty".to_string()].into();
        list.condense(&keep);
        assert_eq!(list.len(), 2);
        list.condense(&BTreeSet::new());
        assert_eq!(list.len(), 1);
    }
}
