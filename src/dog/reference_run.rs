//! Reference runs: other dogs' results recorded alongside a run for
//! comparison.

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::{ArbVersion, Q};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogReferenceRun {
    pub q: Q,
    pub place: i16,
    pub name: String,
    pub height: String,
    pub breed: String,
    pub time: f64,
    /// Free-form: a score, faults, or whatever the scribe sheet showed.
    pub score: String,
    pub note: String,
}

impl DogReferenceRun {
    pub fn load(
        tree: &ElementNode,
        _version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_REF_RUN {
            return Err(ArbError::MissingElement(TREE_REF_RUN.to_string()));
        }
        let mut run = Self::default();
        let raw = tree
            .raw_attrib(ATTRIB_REF_RUN_Q)
            .ok_or_else(|| ArbError::missing(TREE_REF_RUN, ATTRIB_REF_RUN_Q))?;
        run.q = match Q::parse(raw) {
            Some(q) => q,
            None => {
                let err = ArbError::invalid(
                    TREE_REF_RUN,
                    ATTRIB_REF_RUN_Q,
                    format!("unknown qualifying result '{raw}'"),
                );
                cb.log_message(&err.to_string());
                return Err(err);
            }
        };
        tree.opt_attrib(ATTRIB_REF_RUN_TIME, &mut run.time)?;
        tree.opt_attrib(ATTRIB_REF_RUN_PLACE, &mut run.place)?;
        tree.opt_attrib(ATTRIB_REF_RUN_HEIGHT, &mut run.height)?;
        for element in tree.nodes() {
            match element.name() {
                TREE_REF_NAME => run.name = element.value(),
                TREE_REF_BREED => run.breed = element.value(),
                TREE_REF_SCORE => run.score = element.value(),
                TREE_REF_NOTE => run.note = element.value(),
                _ => {}
            }
        }
        Ok(run)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_REF_RUN);
        node.add_attrib(ATTRIB_REF_RUN_Q, self.q.as_str());
        node.add_attrib_short(ATTRIB_REF_RUN_PLACE, self.place);
        if !self.height.is_empty() {
            node.add_attrib(ATTRIB_REF_RUN_HEIGHT, self.height.clone());
        }
        node.add_attrib_double(ATTRIB_REF_RUN_TIME, self.time, 2);
        if !self.name.is_empty() {
            node.add_element_node(TREE_REF_NAME).set_value(self.name.clone());
        }
        if !self.breed.is_empty() {
            node.add_element_node(TREE_REF_BREED)
                .set_value(self.breed.clone());
        }
        if !self.score.is_empty() {
            node.add_element_node(TREE_REF_SCORE)
                .set_value(self.score.clone());
        }
        if !self.note.is_empty() {
            node.add_element_node(TREE_REF_NOTE).set_value(self.note.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogReferenceRunList(pub Vec<DogReferenceRun>);

impl Deref for DogReferenceRunList {
    type Target = Vec<DogReferenceRun>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DogReferenceRunList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl DogReferenceRunList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0.push(DogReferenceRun::load(tree, version, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn add_reference_run(&mut self, run: DogReferenceRun) {
        self.0.push(run);
    }

    pub fn delete_reference_run(&mut self, run: &DogReferenceRun) -> bool {
        match self.0.iter().position(|r| r == run) {
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

    fn tree(q: &str) -> ElementNode {
        let mut node = ElementNode::new(TREE_REF_RUN);
        node.add_attrib(ATTRIB_REF_RUN_Q, q);
        node.add_attrib(ATTRIB_REF_RUN_TIME, "28.42");
        node.add_attrib(ATTRIB_REF_RUN_PLACE, "2");
        let name = node.add_element_node(TREE_REF_NAME);
        name.set_value("Rio");
        node
    }

    #[test]
    fn load_requires_a_known_q() {
        let mut log = ErrorLog::new();
        let run =
            DogReferenceRun::load(&tree("Q"), ArbVersion::new(15, 3), &mut log).unwrap();
        assert_eq!(run.q, Q::Q);
        assert_eq!(run.place, 2);
        assert_eq!(run.name, "Rio");
        assert!(DogReferenceRun::load(&tree("maybe"), ArbVersion::new(15, 3), &mut log).is_err());
    }

    #[test]
    fn save_skips_empty_fields() {
        let run = DogReferenceRun {
            q: Q::Nq,
            place: 4,
            time: 31.0,
            ..DogReferenceRun::default()
        };
        let mut parent = ElementNode::new("Run");
        run.save(&mut parent);
        let node = parent.find_element_node(TREE_REF_RUN).unwrap();
        assert_eq!(node.raw_attrib(ATTRIB_REF_RUN_Q), Some("NQ"));
        assert_eq!(node.raw_attrib(ATTRIB_REF_RUN_HEIGHT), None);
        assert_eq!(node.element_count(), 0);
    }

    #[test]
    fn delete_removes_first_equal_entry() {
        let mut list = DogReferenceRunList::default();
        let run = DogReferenceRun {
            q: Q::Q,
            name: "Tess".to_string(),
            ..DogReferenceRun::default()
        };
        list.add_reference_run(run.clone());
        assert!(list.delete_reference_run(&run));
        assert!(!list.delete_reference_run(&run));
    }
}
