//! The clubs hosting a trial. A trial may be co-sanctioned: a
//! secondary club runs under another club's venue and records which
//! venue that is.

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::config::event::ConfigEvent;
use crate::config::scoring::ConfigScoring;
use crate::config::Config;
use crate::date::ArbDate;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::ArbVersion;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogClub {
    pub name: String,
    pub venue: String,
    /// Venue of the club this one cosanctions under. Empty for a main
    /// club.
    pub primary_club_venue: String,
}

impl DogClub {
    pub fn is_cosanctioning(&self) -> bool {
        !self.primary_club_venue.is_empty()
    }

    pub fn load(
        tree: &ElementNode,
        config: &Config,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_CLUB {
            return Err(ArbError::MissingElement(TREE_CLUB.to_string()));
        }
        let mut club = Self::default();
        // 1.0 stored the club name as an attribute.
        if version == ArbVersion::new(1, 0) {
            club.name = tree.req_attrib::<String>("Name")?;
            if club.name.is_empty() {
                let err = ArbError::missing(TREE_CLUB, "Name");
                cb.log_message(&err.to_string());
                return Err(err);
            }
        } else {
            club.name = tree.value();
        }
        club.venue = tree.req_attrib::<String>(ATTRIB_CLUB_VENUE)?;
        if club.venue.is_empty() {
            let err = ArbError::missing(TREE_CLUB, ATTRIB_CLUB_VENUE);
            cb.log_message(&err.to_string());
            return Err(err);
        }
        tree.opt_attrib(ATTRIB_CLUB_PRIMARY, &mut club.primary_club_venue)?;
        if config.venues.find_venue(&club.venue).is_none() {
            let err = ArbError::invalid(
                TREE_CLUB,
                ATTRIB_CLUB_VENUE,
                format!("unknown venue '{}'", club.venue),
            );
            cb.log_message(&err.to_string());
            return Err(err);
        }
        Ok(club)
    }

    /// Resolve the cosanctioning link once the whole club list is
    /// loaded. A dangling link is dropped, not fatal.
    fn post_load(&mut self, main_venues: &[String], cb: &mut dyn ErrorCallback) -> bool {
        if self.primary_club_venue.is_empty() {
            return true;
        }
        if main_venues.iter().any(|v| *v == self.primary_club_venue) {
            true
        } else {
            let err = ArbError::invalid(
                TREE_CLUB,
                ATTRIB_CLUB_PRIMARY,
                format!(
                    "cosanctioning venue '{}' is not in the trial",
                    self.primary_club_venue
                ),
            );
            cb.log_message(&err.to_string());
            self.primary_club_venue.clear();
            false
        }
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_CLUB);
        node.add_attrib(ATTRIB_CLUB_VENUE, self.venue.clone());
        if !self.primary_club_venue.is_empty() {
            node.add_attrib(ATTRIB_CLUB_PRIMARY, self.primary_club_venue.clone());
        }
        if !self.name.is_empty() {
            node.set_value(self.name.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogClubList(pub Vec<DogClub>);

impl Deref for DogClubList {
    type Target = Vec<DogClub>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DogClubList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl DogClubList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        config: &Config,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0.push(DogClub::load(tree, config, version, cb)?);
        Ok(())
    }

    /// Resolve cosanctioning links. Runs after every club in the
    /// trial is loaded; bad links are reported and cleared.
    pub fn post_load(&mut self, cb: &mut dyn ErrorCallback) -> bool {
        let main_venues: Vec<String> = self
            .0
            .iter()
            .filter(|c| !c.is_cosanctioning())
            .map(|c| c.venue.clone())
            .collect();
        let mut ok = true;
        for club in &mut self.0 {
            if !club.post_load(&main_venues, cb) {
                ok = false;
            }
        }
        ok
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    /// The club the trial is filed under.
    pub fn main_club(&self) -> Option<&DogClub> {
        self.0.first()
    }

    /// The main club competing under `venue`, skipping cosanctioning
    /// entries.
    pub fn primary_club(&self, venue: &str) -> Option<&DogClub> {
        if venue.is_empty() {
            return None;
        }
        self.0
            .iter()
            .find(|c| !c.is_cosanctioning() && c.venue == venue)
    }

    /// The secondary club cosanctioning under `club`, if any.
    pub fn find_cosanctioning_club(&self, club: &DogClub) -> Option<&DogClub> {
        if club.is_cosanctioning() {
            return None;
        }
        self.0
            .iter()
            .find(|c| *c != club && c.primary_club_venue == club.venue)
    }

    pub fn find_club_index(&self, club: &DogClub) -> Option<usize> {
        self.0.iter().position(|c| c == club)
    }

    pub fn find_club(&self, name: &str, venue: &str) -> Option<&DogClub> {
        self.0.iter().find(|c| c.name == name && c.venue == venue)
    }

    pub fn find_venue(&self, venue: &str) -> Option<&DogClub> {
        self.0.iter().find(|c| c.venue == venue)
    }

    /// Resolves an event across the clubs' venues in list order. Logs
    /// a diagnostic naming every club when nothing matches.
    pub fn find_event<'a>(
        &self,
        config: &'a Config,
        event: &str,
        division: &str,
        level: &str,
        date: ArbDate,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<(&'a ConfigEvent, &'a ConfigScoring)> {
        for club in &self.0 {
            if let Some(found) = config
                .venues
                .find_event(&club.venue, event, division, level, date)
            {
                return Ok(found);
            }
        }
        let mut msg = format!("unknown event '{event}' ({division}/{level})");
        for club in &self.0 {
            msg.push('\n');
            msg.push_str(&club.name);
            msg.push_str(" [");
            msg.push_str(&club.venue);
            msg.push(']');
        }
        let err = ArbError::invalid(TREE_RUN, ATTRIB_RUN_EVENT, msg);
        cb.log_message(&err.to_string());
        Err(err)
    }

    pub fn add_club(&mut self, name: &str, venue: &str) {
        self.0.push(DogClub {
            name: name.to_string(),
            venue: venue.to_string(),
            primary_club_venue: String::new(),
        });
    }

    pub fn delete_club(&mut self, name: &str, venue: &str) -> bool {
        match self
            .0
            .iter()
            .position(|c| c.name == name && c.venue == venue)
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

    fn config() -> Config {
        let mut config = Config::default();
        config.venues.add_venue("AKC");
        config.venues.add_venue("USDAA");
        config
    }

    #[test]
    fn old_files_store_the_name_as_an_attribute() {
        let mut node = ElementNode::new(TREE_CLUB);
        node.add_attrib("Name", "Bay Team");
        node.add_attrib(ATTRIB_CLUB_VENUE, "USDAA");
        let mut log = ErrorLog::new();
        let club = DogClub::load(&node, &config(), ArbVersion::new(1, 0), &mut log).unwrap();
        assert_eq!(club.name, "Bay Team");

        let mut node = ElementNode::new(TREE_CLUB);
        node.add_attrib(ATTRIB_CLUB_VENUE, "USDAA");
        node.set_value("Bay Team");
        let club = DogClub::load(&node, &config(), ArbVersion::new(15, 3), &mut log).unwrap();
        assert_eq!(club.name, "Bay Team");
    }

    #[test]
    fn dangling_cosanction_links_are_cleared() {
        let mut list = DogClubList::default();
        list.add_club("Club A", "AKC");
        list.add_club("Club B", "USDAA");
        list[1].primary_club_venue = "NADAC".to_string();
        let mut log = ErrorLog::new();
        assert!(!list.post_load(&mut log));
        assert!(!list[1].is_cosanctioning());

        list[1].primary_club_venue = "AKC".to_string();
        assert!(list.post_load(&mut log));
        assert!(list[1].is_cosanctioning());
        let main = list.main_club().unwrap().clone();
        assert_eq!(
            list.find_cosanctioning_club(&main).map(|c| c.venue.as_str()),
            Some("USDAA")
        );
    }

    #[test]
    fn primary_club_skips_cosanctioning_entries() {
        let mut list = DogClubList::default();
        list.add_club("Club A", "AKC");
        list.add_club("Club B", "USDAA");
        list[0].primary_club_venue = "USDAA".to_string();
        assert!(list.primary_club("AKC").is_none());
        assert_eq!(
            list.primary_club("USDAA").map(|c| c.name.as_str()),
            Some("Club B")
        );
    }
}
