//! Calendar plugin sites: search-URL templates for importing trial
//! calendars from the web.

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigCalSite {
    pub name: String,
    pub description: String,
    /// Search URL template with `!L!` and `!V!` placeholders.
    pub search_url: String,
    pub help_url: String,
    /// Location code to display name.
    pub locations: BTreeMap<String, String>,
    /// Site venue code to configured venue name.
    pub venues: BTreeMap<String, String>,
}

impl ConfigCalSite {
    pub fn load(tree: &ElementNode, _cb: &mut dyn ErrorCallback) -> ArbResult<Self> {
        if tree.name() != TREE_CALSITE {
            return Err(ArbError::MissingElement(TREE_CALSITE.to_string()));
        }
        let mut site = Self::default();
        site.name = tree.req_attrib::<String>(ATTRIB_CALSITE_NAME)?;
        site.search_url = tree.req_attrib::<String>(ATTRIB_CALSITE_SEARCH)?;
        tree.opt_attrib(ATTRIB_CALSITE_HELP, &mut site.help_url)?;
        for element in tree.nodes() {
            if element.name() == TREE_CALSITE_DESC {
                site.description = element.value();
            } else if element.name() == TREE_LOCCODE {
                if let Some(code) = element.raw_attrib(ATTRIB_LOCCODE_CODE) {
                    if !code.is_empty() {
                        let code = code.to_string();
                        let mut loc_name = String::new();
                        element.opt_attrib(ATTRIB_LOCCODE_NAME, &mut loc_name)?;
                        site.locations.insert(code, loc_name);
                    }
                }
            } else if element.name() == TREE_VENUECODE {
                if let Some(code) = element.raw_attrib(ATTRIB_VENUECODE_CODE) {
                    if !code.is_empty() {
                        let code = code.to_string();
                        let mut venue = String::new();
                        element.opt_attrib(ATTRIB_VENUECODE_VENUE, &mut venue)?;
                        site.venues.insert(code, venue);
                    }
                }
            }
        }
        Ok(site)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_CALSITE);
        node.add_attrib(ATTRIB_CALSITE_NAME, self.name.clone());
        node.add_attrib(ATTRIB_CALSITE_SEARCH, self.search_url.clone());
        if !self.help_url.is_empty() {
            node.add_attrib(ATTRIB_CALSITE_HELP, self.help_url.clone());
        }
        if !self.description.is_empty() {
            let desc = node.add_element_node(TREE_CALSITE_DESC);
            desc.set_value(self.description.clone());
        }
        for (code, loc_name) in &self.locations {
            let loc = node.add_element_node(TREE_LOCCODE);
            loc.add_attrib(ATTRIB_LOCCODE_CODE, code.clone());
            loc.add_attrib(ATTRIB_LOCCODE_NAME, loc_name.clone());
        }
        for (code, venue) in &self.venues {
            let v = node.add_element_node(TREE_VENUECODE);
            v.add_attrib(ATTRIB_VENUECODE_CODE, code.clone());
            if !venue.is_empty() {
                v.add_attrib(ATTRIB_VENUECODE_VENUE, venue.clone());
            }
        }
    }

    /// Expands the search template for the given location and venue
    /// codes, joined with '+'.
    pub fn formatted_url(&self, loc_codes: &[&str], venue_codes: &[&str]) -> String {
        let mut url = self.search_url.clone();
        if let Some(pos) = url.find("!L!") {
            url.replace_range(pos..pos + 3, &loc_codes.join("+"));
        }
        if let Some(pos) = url.find("!V!") {
            url.replace_range(pos..pos + 3, &venue_codes.join("+"));
        }
        url
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigCalSiteList(pub Vec<ConfigCalSite>);

impl Deref for ConfigCalSiteList {
    type Target = Vec<ConfigCalSite>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigCalSiteList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ConfigCalSiteList {
    pub fn load(&mut self, tree: &ElementNode, cb: &mut dyn ErrorCallback) -> ArbResult<()> {
        self.0.push(ConfigCalSite::load(tree, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn sort(&mut self) {
        self.0.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub fn find_site(&self, name: &str) -> Option<&ConfigCalSite> {
        self.0.iter().find(|s| s.name == name)
    }

    pub fn find_site_mut(&mut self, name: &str) -> Option<&mut ConfigCalSite> {
        self.0.iter_mut().find(|s| s.name == name)
    }

    pub fn add_site(&mut self, site: ConfigCalSite) -> bool {
        if site.name.is_empty() || self.find_site(&site.name).is_some() {
            return false;
        }
        self.0.push(site);
        self.sort();
        true
    }

    pub fn delete_site(&mut self, name: &str) -> bool {
        match self.0.iter().position(|s| s.name == name) {
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

    #[test]
    fn formatted_url_expands_placeholders() {
        let site = ConfigCalSite {
            name: "finder".to_string(),
            search_url: "https://example.com/search?loc=!L!&venue=!V!".to_string(),
            ..ConfigCalSite::default()
        };
        assert_eq!(
            site.formatted_url(&["CA", "OR"], &["AKC"]),
            "https://example.com/search?loc=CA+OR&venue=AKC"
        );
    }

    #[test]
    fn duplicate_sites_are_rejected() {
        let mut list = ConfigCalSiteList::default();
        let site = ConfigCalSite {
            name: "finder".to_string(),
            search_url: "https://example.com".to_string(),
            ..ConfigCalSite::default()
        };
        assert!(list.add_site(site.clone()));
        assert!(!list.add_site(site));
        assert!(list.delete_site("finder"));
        assert!(!list.delete_site("finder"));
    }
}
