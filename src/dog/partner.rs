//! Partners on a pairs/team run.

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::ArbVersion;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogRunPartner {
    pub handler: String,
    pub dog: String,
    pub reg_num: String,
}

impl DogRunPartner {
    pub fn load(
        tree: &ElementNode,
        _version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_PARTNER {
            return Err(ArbError::MissingElement(TREE_PARTNER.to_string()));
        }
        let mut partner = Self::default();
        partner.handler = tree.req_attrib::<String>(ATTRIB_PARTNER_HANDLER)?;
        if partner.handler.is_empty() {
            let err = ArbError::missing(TREE_PARTNER, ATTRIB_PARTNER_HANDLER);
            cb.log_message(&err.to_string());
            return Err(err);
        }
        partner.dog = tree.req_attrib::<String>(ATTRIB_PARTNER_DOG)?;
        if partner.dog.is_empty() {
            let err = ArbError::missing(TREE_PARTNER, ATTRIB_PARTNER_DOG);
            cb.log_message(&err.to_string());
            return Err(err);
        }
        tree.opt_attrib(ATTRIB_PARTNER_REGNUM, &mut partner.reg_num)?;
        Ok(partner)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_PARTNER);
        node.add_attrib(ATTRIB_PARTNER_HANDLER, self.handler.clone());
        node.add_attrib(ATTRIB_PARTNER_DOG, self.dog.clone());
        if !self.reg_num.is_empty() {
            node.add_attrib(ATTRIB_PARTNER_REGNUM, self.reg_num.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogRunPartnerList(pub Vec<DogRunPartner>);

impl Deref for DogRunPartnerList {
    type Target = Vec<DogRunPartner>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DogRunPartnerList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl DogRunPartnerList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0.push(DogRunPartner::load(tree, version, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn add_partner(&mut self, partner: DogRunPartner) {
        self.0.push(partner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::ErrorLog;

    #[test]
    fn handler_and_dog_are_required() {
        let mut node = ElementNode::new(TREE_PARTNER);
        node.add_attrib(ATTRIB_PARTNER_HANDLER, "Sam");
        let mut log = ErrorLog::new();
        assert!(DogRunPartner::load(&node, ArbVersion::new(15, 3), &mut log).is_err());

        node.add_attrib(ATTRIB_PARTNER_DOG, "Rex");
        let partner = DogRunPartner::load(&node, ArbVersion::new(15, 3), &mut log).unwrap();
        assert_eq!(partner.dog, "Rex");
        assert!(partner.reg_num.is_empty());
    }

    #[test]
    fn reg_num_saves_only_when_set() {
        let partner = DogRunPartner {
            handler: "Sam".to_string(),
            dog: "Rex".to_string(),
            reg_num: String::new(),
        };
        let mut parent = ElementNode::new("Test");
        partner.save(&mut parent);
        let node = parent.find_element_node(TREE_PARTNER).unwrap();
        assert!(node.raw_attrib(ATTRIB_PARTNER_REGNUM).is_none());
    }
}
