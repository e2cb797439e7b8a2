//! Free-form notes recorded with a run: the faults called on course
//! and a general comment.

use crate::callbacks::ErrorCallback;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::ArbVersion;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogNotes {
    pub faults: Vec<String>,
    pub note: String,
}

impl DogNotes {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        _version: ArbVersion,
        _cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        if tree.name() != TREE_NOTES {
            return Err(ArbError::MissingElement(TREE_NOTES.to_string()));
        }
        for element in tree.nodes() {
            if element.name() == TREE_FAULTS {
                self.faults.push(element.value());
            } else if element.name() == TREE_OTHER {
                self.note = element.value();
            }
        }
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        if self.faults.is_empty() && self.note.is_empty() {
            return;
        }
        let node = parent.add_element_node(TREE_NOTES);
        for fault in &self.faults {
            if !fault.is_empty() {
                let element = node.add_element_node(TREE_FAULTS);
                element.set_value(fault.clone());
            }
        }
        if !self.note.is_empty() {
            let element = node.add_element_node(TREE_OTHER);
            element.set_value(self.note.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::ErrorLog;

    #[test]
    fn empty_notes_save_nothing() {
        let notes = DogNotes::default();
        let mut parent = ElementNode::new("Test");
        notes.save(&mut parent);
        assert!(parent.find_element_node(TREE_NOTES).is_none());
    }

    #[test]
    fn faults_and_comment_round_trip() {
        let notes = DogNotes {
            faults: vec!["Bar down".to_string(), "Refusal".to_string()],
            note: "Windy day".to_string(),
        };
        let mut parent = ElementNode::new("Test");
        notes.save(&mut parent);
        let node = parent.find_element_node(TREE_NOTES).unwrap();

        let mut loaded = DogNotes::default();
        let mut log = ErrorLog::new();
        loaded.load(node, ArbVersion::new(15, 3), &mut log).unwrap();
        assert_eq!(loaded, notes);
    }
}
