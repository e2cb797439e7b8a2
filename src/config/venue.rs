//! A venue (sanctioning organization) and everything it configures:
//! lifetime point tracks, titles, divisions, events, and multiple-Q
//! definitions.

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::config::division::ConfigDivisionList;
use crate::config::event::{ConfigEvent, ConfigEventList};
use crate::config::fault::{ConfigFault, ConfigFaultList};
use crate::config::lifetime_name::ConfigLifetimeNameList;
use crate::config::multiq::{ConfigMultiQ, ConfigMultiQList};
use crate::config::other_points::{ConfigOtherPoints, ConfigOtherPointsList};
use crate::config::scoring::ConfigScoring;
use crate::config::title::{ConfigTitle, ConfigTitleList};
use crate::date::ArbDate;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::messages;
use crate::schema::*;
use crate::types::ArbVersion;

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigVenue {
    pub name: String,
    pub long_name: String,
    pub url: String,
    pub description: String,
    pub lifetime_names: ConfigLifetimeNameList,
    pub icon_index: i32,
    pub titles: ConfigTitleList,
    pub divisions: ConfigDivisionList,
    pub events: ConfigEventList,
    pub multiqs: ConfigMultiQList,
}

impl Default for ConfigVenue {
    fn default() -> Self {
        Self {
            name: String::new(),
            long_name: String::new(),
            url: String::new(),
            description: String::new(),
            lifetime_names: ConfigLifetimeNameList::default(),
            icon_index: -1,
            titles: ConfigTitleList::default(),
            divisions: ConfigDivisionList::default(),
            events: ConfigEventList::default(),
            multiqs: ConfigMultiQList::default(),
        }
    }
}

impl ConfigVenue {
    /// Loads a venue. Pre-3.0 files nested fault types and other-point
    /// definitions under the venue; those are hoisted into the
    /// configuration-level lists passed in.
    pub fn load(
        tree: &ElementNode,
        faults: &mut ConfigFaultList,
        other_points: &mut ConfigOtherPointsList,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_VENUE {
            return Err(ArbError::MissingElement(TREE_VENUE.to_string()));
        }
        let mut venue = Self::default();
        venue.name = tree.req_attrib::<String>(ATTRIB_VENUE_NAME)?;
        if venue.name.is_empty() {
            return Err(ArbError::missing(TREE_VENUE, ATTRIB_VENUE_NAME));
        }
        // Long name added in 10.1, URL in 12.3, icon in 12.5.
        tree.opt_attrib(ATTRIB_VENUE_LONGNAME, &mut venue.long_name)?;
        tree.opt_attrib(ATTRIB_VENUE_URL, &mut venue.url)?;
        tree.opt_attrib(ATTRIB_VENUE_ICON, &mut venue.icon_index)?;
        // A single lifetime track name lived in an attribute from 12.6
        // until 14.4 introduced named tracks as elements.
        let mut add_lifetime = false;
        if version < ArbVersion::new(14, 4) {
            if let Some(lifetime_name) = tree.raw_attrib(ATTRIB_VENUE_LIFETIME_NAME) {
                let lifetime_name = lifetime_name.to_string();
                venue.lifetime_names.add(&lifetime_name);
            }
        }
        for element in tree.nodes() {
            let name = element.name();
            if name == TREE_VENUE_DESC {
                venue.description = element.value();
            } else if name == TREE_LIFETIME_NAME {
                if let Err(e) = venue.lifetime_names.load(element, cb) {
                    cb.log_message(&e.to_string());
                }
            } else if name == TREE_TITLES {
                // Ignore any errors.
                if let Err(e) = venue.titles.load(element, version, cb, false) {
                    cb.log_message(&e.to_string());
                }
            } else if name == TREE_DIVISION {
                if !venue.events.is_empty() {
                    let err = ArbError::invalid(
                        TREE_VENUE,
                        TREE_DIVISION,
                        "division definitions must precede event definitions",
                    );
                    cb.log_message(&err.to_string());
                    return Err(err);
                }
                // Ignore any errors.
                if let Err(e) = venue
                    .divisions
                    .load(element, &mut venue.titles, version, cb)
                {
                    cb.log_message(&e.to_string());
                }
            } else if name == TREE_EVENT {
                // Ignore any errors.
                if let Err(e) = venue.events.load(element, &venue.divisions, version, cb) {
                    cb.log_message(&e.to_string());
                }
                // Lifetime points in an old file imply a default track.
                if version < ArbVersion::new(14, 4) && !add_lifetime {
                    add_lifetime = venue
                        .events
                        .iter()
                        .any(|e| e.scorings.iter().any(|s| !s.life_points.is_empty()));
                }
            } else if name == TREE_MULTIQ {
                // Ignore any errors.
                if let Err(e) =
                    venue
                        .multiqs
                        .load(element, &venue.divisions, &venue.events, version, cb)
                {
                    cb.log_message(&e.to_string());
                }
            }
            if version < ArbVersion::new(3, 0) {
                if name == TREE_FAULTTYPE {
                    // The venue-level lists could repeat a name; the
                    // configuration-level list keeps the first one.
                    match ConfigFault::load(element, cb) {
                        Ok(fault) => {
                            if faults.find(&fault.name).is_none() {
                                faults.push(fault);
                            }
                        }
                        Err(e) => cb.log_message(&e.to_string()),
                    }
                } else if name == TREE_OTHERPTS {
                    match ConfigOtherPoints::load(element, cb) {
                        Ok(item) => {
                            other_points.add(item);
                        }
                        Err(e) => cb.log_message(&e.to_string()),
                    }
                }
            }
        }
        if add_lifetime && venue.lifetime_names.is_empty() {
            venue.lifetime_names.add("");
        }
        // Finish the lifetime-name conversion: point rows written
        // without a track name belong to the venue's only named track.
        if version < ArbVersion::new(14, 4) {
            if venue.lifetime_names.len() == 1 && !venue.lifetime_names[0].name.is_empty() {
                let track = venue.lifetime_names[0].name.clone();
                for event in venue.events.iter_mut() {
                    for scoring in event.scorings.iter_mut() {
                        for life in scoring.life_points.iter_mut() {
                            if life.name.is_empty() {
                                life.name = track.clone();
                            }
                        }
                    }
                }
            }
        }
        // Convert old double Qs into a multiple-Q definition.
        if version < ArbVersion::new(11, 0) {
            let mut multi: Option<ConfigMultiQ> = None;
            for event in venue.events.iter_mut() {
                let event_name = event.name.clone();
                for scoring in event.scorings.iter_mut() {
                    if std::mem::take(&mut scoring.double_q) {
                        let m = multi.get_or_insert_with(|| ConfigMultiQ {
                            name: "Double Q".to_string(),
                            short_name: "QQ".to_string(),
                            ..ConfigMultiQ::default()
                        });
                        m.add_item(&scoring.division, &scoring.level, &event_name);
                    }
                }
            }
            if let Some(m) = multi {
                if m.items.len() > 1 {
                    venue.multiqs.add_multiq(m);
                }
            }
        }
        Ok(venue)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_VENUE);
        node.add_attrib(ATTRIB_VENUE_NAME, self.name.clone());
        if !self.long_name.is_empty() {
            node.add_attrib(ATTRIB_VENUE_LONGNAME, self.long_name.clone());
        }
        if !self.url.is_empty() {
            node.add_attrib(ATTRIB_VENUE_URL, self.url.clone());
        }
        node.add_attrib_long(ATTRIB_VENUE_ICON, self.icon_index);
        if !self.description.is_empty() {
            let desc = node.add_element_node(TREE_VENUE_DESC);
            desc.set_value(self.description.clone());
        }
        self.lifetime_names.save(node);
        self.titles.save(node);
        self.divisions.save(node);
        self.events.save(node);
        self.multiqs.save(node);
    }

    /// Merge changes from `new` (same venue name) and report them.
    pub fn update(&mut self, indent: usize, new: &ConfigVenue, info: &mut String) -> bool {
        if self.name != new.name {
            return false;
        }
        let indent_name = "   ".repeat(indent.saturating_sub(1));
        let indent_buffer = format!("{indent_name}   ");

        let mut changes = false;
        let mut local = String::new();

        if self.long_name != new.long_name {
            changes = true;
            self.long_name = new.long_name.clone();
        }
        if self.url != new.url {
            changes = true;
            self.url = new.url.clone();
        }
        if self.description != new.description {
            changes = true;
            self.description = new.description.clone();
        }
        // Lifetime names are only ever added, never removed here;
        // removals go through configuration actions.
        if self.lifetime_names != new.lifetime_names {
            let (mut added, mut skipped) = (0, 0);
            for name in new.lifetime_names.iter() {
                if self.lifetime_names.find(&name.name).is_none() {
                    added += 1;
                    self.lifetime_names.add(&name.name);
                } else {
                    skipped += 1;
                }
            }
            if added > 0 {
                info.push_str(&messages::update_lifetime_names(added, skipped));
                info.push('\n');
            }
        }
        if self.icon_index != new.icon_index {
            changes = true;
            self.icon_index = new.icon_index;
        }

        // A different order alone lands here too.
        if self.titles != new.titles {
            let (mut changed, mut added, mut skipped) = (0, 0, 0);
            for title in new.titles.iter() {
                match self.titles.find_title_mut(&title.name) {
                    Some(existing) => {
                        if existing == title {
                            skipped += 1;
                        } else {
                            changed += 1;
                            existing.long_name = title.long_name.clone();
                            existing.multiple_start_at = title.multiple_start_at;
                            existing.multiple_increment = title.multiple_increment;
                            existing.multiple_style = title.multiple_style;
                            existing.multiple_separator = title.multiple_separator;
                            existing.prefix = title.prefix.clone();
                            existing.valid_from = title.valid_from;
                            existing.valid_to = title.valid_to;
                            existing.description = title.description.clone();
                        }
                    }
                    None => {
                        added += 1;
                        self.titles.push(title.clone());
                    }
                }
            }
            self.titles.reorder_by(&new.titles);
            // Only report counts when something was added or changed.
            local.push_str(&indent_buffer);
            if added > 0 || changed > 0 {
                local.push_str(&messages::update_titles(added, changed, skipped));
            } else {
                local.push_str(&messages::update_titles_reordered());
            }
            local.push('\n');
        }

        if self.divisions != new.divisions {
            let mut detail = String::new();
            let (mut changed, mut added, mut skipped) = (0, 0, 0);
            for div in new.divisions.iter() {
                match self.divisions.find_division_mut(&div.name) {
                    Some(existing) => {
                        if existing == div {
                            skipped += 1;
                        } else if existing.update(indent + 1, div, &mut detail) {
                            changed += 1;
                        }
                    }
                    None => {
                        added += 1;
                        if let Some(mine) = self.divisions.add_division(&div.name) {
                            *mine = div.clone();
                        }
                        detail.push_str(&indent_buffer);
                        detail.push('+');
                        detail.push_str(&div.name);
                        detail.push('\n');
                    }
                }
            }
            self.divisions.reorder_by(&new.divisions);
            local.push_str(&indent_buffer);
            if added > 0 || changed > 0 {
                local.push_str(&messages::update_divisions(added, changed, skipped));
                local.push('\n');
                local.push_str(&detail);
            } else {
                local.push_str(&messages::update_divisions_reordered());
                local.push('\n');
            }
        }

        if self.events != new.events {
            let mut detail = String::new();
            let (mut changed, mut added, mut skipped) = (0, 0, 0);
            for event in new.events.iter() {
                match self.events.find_event_mut(&event.name) {
                    Some(existing) => {
                        if existing == event {
                            skipped += 1;
                        } else if existing.update(indent + 1, event, &mut detail) {
                            changed += 1;
                        }
                    }
                    None => {
                        added += 1;
                        self.events.add_event(event.clone());
                        detail.push_str(&indent_buffer);
                        detail.push('+');
                        detail.push_str(&event.name);
                        detail.push('\n');
                    }
                }
            }
            self.events.reorder_by(&new.events);
            local.push_str(&indent_buffer);
            if added > 0 || changed > 0 {
                local.push_str(&messages::update_events(added, changed, skipped));
                local.push('\n');
                local.push_str(&detail);
            } else {
                local.push_str(&messages::update_events_reordered());
                local.push('\n');
            }
        }

        // Multiple-Q definitions are replaced wholesale; the diff is
        // keyed on full equality since they have no stable identity.
        if self.multiqs != new.multiqs {
            let (mut added, mut deleted, mut skipped) = (0, 0, 0);
            for mine in self.multiqs.iter() {
                if new.multiqs.iter().any(|m| m == mine) {
                    skipped += 1;
                } else {
                    deleted += 1;
                }
            }
            for theirs in new.multiqs.iter() {
                if !self.multiqs.iter().any(|m| m == theirs) {
                    added += 1;
                }
            }
            self.multiqs = new.multiqs.clone();
            local.push_str(&indent_buffer);
            if added > 0 || deleted > 0 {
                local.push_str(&self.name);
                local.push_str(&messages::update_multiqs(added, deleted, skipped));
            } else {
                local.push_str(&messages::update_multiqs_reordered());
            }
            local.push('\n');
        }

        if !local.is_empty() {
            changes = true;
            info.push_str(&format!("{indent_name}-{}\n{local}", self.name));
        }
        changes
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigVenueList(pub Vec<ConfigVenue>);

impl Deref for ConfigVenueList {
    type Target = Vec<ConfigVenue>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigVenueList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ConfigVenueList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        faults: &mut ConfigFaultList,
        other_points: &mut ConfigOtherPointsList,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0
            .push(ConfigVenue::load(tree, faults, other_points, version, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    /// Case-insensitive sort by venue name.
    pub fn sort(&mut self) {
        if self.0.len() < 2 {
            return;
        }
        self.0
            .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    }

    pub fn verify_multiq(&self, venue: &str, multiq: &str, use_short_name: bool) -> bool {
        match self.find_venue(venue) {
            Some(v) => v.multiqs.find_multiq(multiq, use_short_name).is_some(),
            None => false,
        }
    }

    pub fn verify_level(&self, venue: &str, division: &str, level: &str) -> bool {
        match self.find_venue(venue) {
            Some(v) => v.divisions.verify_level(division, level),
            None => false,
        }
    }

    /// Verifies an event exists for a division/sublevel pair. The
    /// sublevel is translated to its level before the event lookup.
    pub fn verify_event(
        &self,
        venue: &str,
        division: &str,
        level: &str,
        event: &str,
        date: ArbDate,
    ) -> bool {
        let Some(v) = self.find_venue(venue) else {
            return false;
        };
        let Some(div) = v.divisions.find_division(division) else {
            return false;
        };
        match div.levels.find_sub_level(level) {
            Some(l) => v.events.verify_event(event, division, &l.name, date),
            None => false,
        }
    }

    /// Resolves an event to its scoring method. `level` is the true
    /// (sub)level as recorded on a run; all other event lookups take a
    /// level name.
    pub fn find_event(
        &self,
        venue: &str,
        event: &str,
        division: &str,
        level: &str,
        date: ArbDate,
    ) -> Option<(&ConfigEvent, &ConfigScoring)> {
        let v = self.find_venue(venue)?;
        let div = v.divisions.find_division(division)?;
        // Some configurations drop sublevels entirely (NADAC Novice
        // A/B collapsed to Novice), so a miss here is not an error.
        let l = div.levels.find_sub_level(level)?;
        v.events.find_event_scoring(event, division, &l.name, date)
    }

    pub fn find_title_complete_name(
        &self,
        venue: &str,
        name: &str,
        abbrev_first: bool,
    ) -> Option<&ConfigTitle> {
        self.find_venue(venue)?
            .titles
            .find_title_complete_name(name, 0, abbrev_first)
    }

    pub fn find_title(&self, venue: &str, title: &str) -> Option<&ConfigTitle> {
        self.find_venue(venue)?.titles.find_title(title)
    }

    pub fn find_title_mut(&mut self, venue: &str, title: &str) -> Option<&mut ConfigTitle> {
        self.find_venue_mut(venue)?.titles.find_title_mut(title)
    }

    /// Deletes a title from whichever venue defines it.
    pub fn delete_title(&mut self, title: &str) -> bool {
        for venue in &mut self.0 {
            if venue.titles.find_title(title).is_some() {
                return venue.titles.delete_title(title);
            }
        }
        false
    }

    pub fn find_venue(&self, venue: &str) -> Option<&ConfigVenue> {
        self.0.iter().find(|v| v.name == venue)
    }

    pub fn find_venue_mut(&mut self, venue: &str) -> Option<&mut ConfigVenue> {
        self.0.iter_mut().find(|v| v.name == venue)
    }

    pub fn add_venue(&mut self, venue: &str) -> Option<&mut ConfigVenue> {
        if venue.is_empty() || self.find_venue(venue).is_some() {
            return None;
        }
        self.0.push(ConfigVenue {
            name: venue.to_string(),
            ..ConfigVenue::default()
        });
        self.sort();
        self.find_venue_mut(venue)
    }

    pub fn add_venue_config(&mut self, venue: ConfigVenue) -> bool {
        if self.find_venue(&venue.name).is_some() {
            return false;
        }
        self.0.push(venue);
        self.sort();
        true
    }

    pub fn delete_venue(&mut self, venue: &str) -> bool {
        match self.0.iter().position(|v| v.name == venue) {
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
    use crate::config::scoring::ScoringStyle;

    fn venue_with_levels(name: &str) -> ConfigVenue {
        let mut v = ConfigVenue {
            name: name.to_string(),
            ..ConfigVenue::default()
        };
        let div = v.divisions.add_division("Regular").unwrap();
        let level = div.levels.add_level("Novice").unwrap();
        level.sub_levels.add_sub_level("Novice A");
        level.sub_levels.add_sub_level("Novice B");
        let mut event = ConfigEvent {
            name: "Standard".to_string(),
            ..ConfigEvent::default()
        };
        let s = event.scorings.add_scoring();
        s.division = "Regular".to_string();
        s.level = "Novice".to_string();
        s.style = ScoringStyle::FaultsThenTime;
        v.events.add_event(event);
        v
    }

    #[test]
    fn venues_sort_case_insensitively() {
        let mut list = ConfigVenueList::default();
        list.add_venue("usdaa");
        list.add_venue("AKC");
        list.add_venue("NADAC");
        let names: Vec<&str> = list.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["AKC", "NADAC", "usdaa"]);
    }

    #[test]
    fn verify_event_translates_sublevels() {
        let mut list = ConfigVenueList::default();
        assert!(list.add_venue_config(venue_with_levels("AKC")));
        assert!(list.verify_event("AKC", "Regular", "Novice A", "Standard", ArbDate::invalid()));
        assert!(list.verify_event("AKC", "Regular", "Novice", "Standard", ArbDate::invalid()));
        assert!(!list.verify_event("AKC", "Regular", "Open", "Standard", ArbDate::invalid()));
        assert!(!list.verify_event("UKC", "Regular", "Novice A", "Standard", ArbDate::invalid()));
    }

    #[test]
    fn find_event_resolves_scoring_through_sublevel() {
        let mut list = ConfigVenueList::default();
        assert!(list.add_venue_config(venue_with_levels("AKC")));
        let found = list.find_event("AKC", "Standard", "Regular", "Novice B", ArbDate::invalid());
        assert!(found.is_some());
        let (event, scoring) = found.unwrap();
        assert_eq!(event.name, "Standard");
        assert_eq!(scoring.level, "Novice");
    }

    #[test]
    fn update_reports_venue_changes() {
        let mut old = venue_with_levels("AKC");
        let mut new = venue_with_levels("AKC");
        new.long_name = "American Kennel Club".to_string();
        new.titles.add_title("MACH");
        let mut info = String::new();
        assert!(old.update(1, &new, &mut info));
        assert_eq!(old.long_name, "American Kennel Club");
        assert!(old.titles.find_title("MACH").is_some());
        assert!(info.contains("-AKC"));
        assert!(info.contains("Titles: 1 added, 0 updated, 0 identical"));
    }

    #[test]
    fn delete_title_scans_all_venues() {
        let mut list = ConfigVenueList::default();
        list.add_venue("AKC");
        list.add_venue("USDAA");
        if let Some(v) = list.find_venue_mut("USDAA") {
            v.titles.add_title("ADCH");
        }
        assert!(list.delete_title("ADCH"));
        assert!(!list.delete_title("ADCH"));
    }
}
