//! The configuration section: everything the program knows about
//! sanctioning organizations and their rules, independent of any dog.

pub mod action;
pub mod cal_site;
pub mod division;
pub mod event;
pub mod fault;
pub mod level;
pub mod lifetime_name;
pub mod lifetime_points;
pub mod multiq;
pub mod other_points;
pub mod place_info;
pub mod scoring;
pub mod title;
pub mod title_points;
pub mod venue;

use crate::callbacks::{ConfigHandler, ErrorCallback, ErrorLog};
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::messages;
use crate::schema::*;
use crate::types::{ArbVersion, Lookup};

use action::ConfigActionList;
use cal_site::ConfigCalSiteList;
use fault::ConfigFaultList;
use other_points::ConfigOtherPointsList;
use venue::ConfigVenueList;

/// The full rules configuration carried by a document.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether the program may offer configuration updates for this
    /// document. Saved only when disabled.
    pub update: bool,
    /// Revision number of the shipped configuration this document has
    /// been updated to.
    pub version: i16,
    pub cal_sites: ConfigCalSiteList,
    /// Loaded from incoming configurations, applied during an update,
    /// never saved back.
    pub actions: ConfigActionList,
    pub venues: ConfigVenueList,
    pub faults: ConfigFaultList,
    pub other_points: ConfigOtherPointsList,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            update: true,
            version: 0,
            cal_sites: ConfigCalSiteList::default(),
            actions: ConfigActionList::default(),
            venues: ConfigVenueList::default(),
            faults: ConfigFaultList::default(),
            other_points: ConfigOtherPointsList::default(),
        }
    }
}

// Equality ignores the actions and the update flag.
impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.cal_sites == other.cal_sites
            && self.venues == other.venues
            && self.faults == other.faults
            && self.other_points == other.other_points
    }
}

impl Config {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        if tree.name() != TREE_CONFIG {
            return Err(ArbError::MissingElement(TREE_CONFIG.to_string()));
        }
        if let Lookup::Invalid = tree.attrib::<bool>(ATTRIB_CONFIG_UPDATE) {
            let err = ArbError::invalid_bool(TREE_CONFIG, ATTRIB_CONFIG_UPDATE);
            cb.log_message(&err.to_string());
            return Err(err);
        }
        if let Lookup::Found(update) = tree.attrib::<bool>(ATTRIB_CONFIG_UPDATE) {
            self.update = update;
        }
        tree.opt_attrib(ATTRIB_CONFIG_VERSION, &mut self.version)?;
        for element in tree.nodes() {
            let name = element.name();
            // Ignore errors from individual entries; a bad venue or
            // action should not lose the rest of the configuration.
            let result = match name {
                TREE_ACTION => self.actions.load(element, version, cb),
                TREE_CALSITE => self.cal_sites.load(element, cb),
                TREE_VENUE => {
                    self.venues
                        .load(element, &mut self.faults, &mut self.other_points, version, cb)
                }
                // Faults and other points moved here from the venue in
                // file version 3.
                TREE_FAULTTYPE => self.faults.load(element, cb),
                TREE_OTHERPTS => self.other_points.load(element, cb),
                _ => Ok(()),
            };
            if let Err(e) = result {
                cb.log_message(&e.to_string());
            }
        }
        self.venues.sort();
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_CONFIG);
        if !self.update {
            node.add_attrib_bool(ATTRIB_CONFIG_UPDATE, self.update);
        }
        node.add_attrib_short(ATTRIB_CONFIG_VERSION, self.version);
        // Actions are deliberately not saved; they only matter while
        // merging a configuration.
        self.cal_sites.save(node);
        self.venues.save(node);
        self.faults.save(node);
        self.other_points.save(node);
    }

    /// The factory-default configuration shipped with the program.
    pub fn default_config(handler: &dyn ConfigHandler) -> ArbResult<Self> {
        let tree = handler.load_default_config()?;
        if tree.name() != "DefaultConfig" {
            return Err(ArbError::MissingElement("DefaultConfig".to_string()));
        }
        let mut version = crate::book::current_doc_version();
        tree.opt_attrib(ATTRIB_BOOK_VERSION, &mut version)?;
        let config_tree = tree
            .find_element_node(TREE_CONFIG)
            .ok_or(ArbError::MissingConfig)?;
        let mut config = Self::default();
        let mut log = ErrorLog::tolerant();
        config.load(config_tree, version, &mut log)?;
        Ok(config)
    }

    /// The display name for a title, falling back to the raw name when
    /// the configuration does not know it.
    pub fn title_nice_name(&self, venue: &str, title: &str) -> String {
        match self.venues.find_title(venue, title) {
            Some(t) if !t.long_name.is_empty() => t.long_name.clone(),
            Some(t) => t.name.clone(),
            None => title.to_string(),
        }
    }

    /// Merge `new` into this configuration (update phase after the
    /// actions have run). Returns whether anything changed.
    pub fn update(&mut self, indent: usize, new: &Config, info: &mut String) -> bool {
        let mut changes = 0;

        // Calendar sites are merged by name; existing ones are only
        // removed by an action.
        let (mut added, mut updated, mut skipped) = (0, 0, 0);
        for site in new.cal_sites.iter() {
            match self.cal_sites.find_site_mut(&site.name) {
                Some(existing) => {
                    if existing == site {
                        skipped += 1;
                    } else {
                        updated += 1;
                        *existing = site.clone();
                    }
                }
                None => {
                    added += 1;
                    self.cal_sites.push(site.clone());
                }
            }
        }
        self.cal_sites.sort();
        if added > 0 || updated > 0 {
            changes += added + updated;
            info.push_str(&messages::update_cal_sites(added, updated, skipped));
            info.push('\n');
        }

        // Faults are add-only.
        let (mut added, mut skipped) = (0, 0);
        for fault in new.faults.iter() {
            if self.faults.find(&fault.name).is_none() {
                added += 1;
                changes += 1;
                self.faults.add(&fault.name);
            } else {
                skipped += 1;
            }
        }
        if added > 0 {
            info.push_str(&messages::update_faults(added, skipped));
            info.push('\n');
        }

        // Other points match on name; the rest of the fields follow the
        // incoming definition.
        let (mut added, mut updated, mut skipped) = (0, 0, 0);
        for other in new.other_points.iter() {
            match self.other_points.iter_mut().find(|o| o.name == other.name) {
                Some(existing) => {
                    if *existing == *other {
                        skipped += 1;
                    } else {
                        updated += 1;
                        changes += 1;
                        *existing = other.clone();
                    }
                }
                None => {
                    added += 1;
                    changes += 1;
                    self.other_points.add(other.clone());
                }
            }
        }
        if added > 0 || updated > 0 {
            info.push_str(&messages::update_other_points(added, updated, skipped));
            info.push('\n');
        }

        let (mut added, mut updated, mut skipped) = (0, 0, 0);
        let mut venue_info = String::new();
        for venue in new.venues.iter() {
            match self.venues.find_venue_mut(&venue.name) {
                Some(existing) => {
                    if existing == venue {
                        skipped += 1;
                    } else if existing.update(indent + 1, venue, &mut venue_info) {
                        updated += 1;
                        changes += 1;
                    }
                }
                None => {
                    added += 1;
                    changes += 1;
                    self.venues.add_venue_config(venue.clone());
                    venue_info.push('+');
                    venue_info.push_str(&venue.name);
                    venue_info.push('\n');
                }
            }
        }
        if added > 0 || updated > 0 {
            info.push_str(&messages::update_venues(added, updated, skipped));
            info.push('\n');
        }
        info.push_str(&venue_info);

        // Take the version even without changes so the user is not
        // prompted to update again.
        if self.version < new.version {
            self.version = new.version;
        }
        if changes > 0 {
            self.update = true;
        }
        changes > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::other_points::{ConfigOtherPoints, OtherPointsTally};

    #[test]
    fn update_merges_faults_and_other_points() {
        let mut old = Config::default();
        old.faults.add("Bar down");
        let mut new = Config::default();
        new.faults.add("Bar down");
        new.faults.add("Off course");
        new.other_points.add(ConfigOtherPoints {
            name: "Versatility".to_string(),
            tally: OtherPointsTally::All,
            ..ConfigOtherPoints::default()
        });
        let mut info = String::new();
        assert!(old.update(1, &new, &mut info));
        assert!(old.faults.find("Off course").is_some());
        assert!(info.contains("Faults: 1 added, 1 identical"));
        assert!(info.contains("Other Points: 1 added, 0 updated, 0 identical"));
    }

    #[test]
    fn update_adds_new_venues_and_takes_the_version() {
        let mut old = Config::default();
        old.version = 3;
        let mut new = Config::default();
        new.version = 7;
        new.venues.add_venue("AKC");
        let mut info = String::new();
        assert!(old.update(1, &new, &mut info));
        assert_eq!(old.version, 7);
        assert!(old.venues.find_venue("AKC").is_some());
        assert!(info.contains("Venues: 1 added, 0 updated, 0 identical"));
        assert!(info.contains("+AKC"));
    }

    #[test]
    fn identical_configs_report_no_changes() {
        let mut old = Config::default();
        old.venues.add_venue("AKC");
        let new = old.clone();
        let mut info = String::new();
        assert!(!old.update(1, &new, &mut info));
        assert!(info.is_empty());
    }
}
