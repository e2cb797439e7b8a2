//! A dog and everything recorded against it: registrations, titles,
//! pre-existing point credits and the trial history.

pub mod club;
pub mod existing_points;
pub mod notes;
pub mod other_points;
pub mod partner;
pub mod reference_run;
pub mod reg_num;
pub mod run;
pub mod run_scoring;
pub mod title;
pub mod trial;

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::config::venue::ConfigVenue;
use crate::config::Config;
use crate::date::ArbDate;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::{ArbVersion, Lookup};

use existing_points::DogExistingPointsList;
use reg_num::DogRegNumList;
use title::DogTitleList;
use trial::DogTrialList;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dog {
    pub call_name: String,
    pub dob: ArbDate,
    pub deceased: ArbDate,
    pub reg_name: String,
    pub breed: String,
    pub note: String,
    pub existing_points: DogExistingPointsList,
    pub reg_nums: DogRegNumList,
    pub titles: DogTitleList,
    pub trials: DogTrialList,
}

impl Dog {
    fn load_date(
        tree: &ElementNode,
        attrib: &str,
        dest: &mut ArbDate,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        match tree.attrib::<ArbDate>(attrib) {
            Lookup::Found(date) => *dest = date,
            Lookup::NotFound => {}
            Lookup::Invalid => {
                let raw = tree.raw_attrib(attrib).unwrap_or_default();
                let err = ArbError::invalid_date(TREE_DOG, attrib, raw);
                cb.log_message(&err.to_string());
                return Err(err);
            }
        }
        Ok(())
    }

    pub fn load(
        tree: &ElementNode,
        config: &Config,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_DOG {
            return Err(ArbError::MissingElement(TREE_DOG.to_string()));
        }
        let mut dog = Self::default();
        dog.call_name = tree.req_attrib::<String>(ATTRIB_DOG_CALLNAME)?;
        if dog.call_name.is_empty() {
            let err = ArbError::missing(TREE_DOG, ATTRIB_DOG_CALLNAME);
            cb.log_message(&err.to_string());
            return Err(err);
        }
        Self::load_date(tree, ATTRIB_DOG_DOB, &mut dog.dob, cb)?;
        Self::load_date(tree, ATTRIB_DOG_DECEASED, &mut dog.deceased, cb)?;
        for element in tree.nodes() {
            if element.name() == TREE_REGNAME {
                dog.reg_name = element.value();
            } else if element.name() == TREE_BREED {
                dog.breed = element.value();
            } else if element.name() == TREE_NOTE {
                dog.note = element.value();
            } else if element.name() == TREE_EXISTING_PTS {
                // Ignore any errors.
                let _ = dog.existing_points.load(element, config, version, cb);
            } else if element.name() == TREE_REG_NUM {
                let _ = dog.reg_nums.load(element, &config.venues, version, cb);
            } else if element.name() == TREE_TITLE {
                let _ = dog.titles.load(element, &config.venues, version, cb);
            } else if element.name() == TREE_TRIAL {
                let _ = dog.trials.load(element, config, version, cb);
            }
        }
        dog.existing_points.sort();
        dog.reg_nums.sort();
        dog.titles.sort();
        dog.trials.sort(true);
        Ok(dog)
    }

    pub fn save(&self, parent: &mut ElementNode, config: &Config) {
        let node = parent.add_element_node(TREE_DOG);
        node.add_attrib(ATTRIB_DOG_CALLNAME, self.call_name.clone());
        node.add_attrib_date(ATTRIB_DOG_DOB, self.dob);
        if self.deceased.is_valid() {
            node.add_attrib_date(ATTRIB_DOG_DECEASED, self.deceased);
        }
        if !self.reg_name.is_empty() {
            let element = node.add_element_node(TREE_REGNAME);
            element.set_value(self.reg_name.clone());
        }
        if !self.breed.is_empty() {
            let element = node.add_element_node(TREE_BREED);
            element.set_value(self.breed.clone());
        }
        if !self.note.is_empty() {
            let element = node.add_element_node(TREE_NOTE);
            element.set_value(self.note.clone());
        }
        self.existing_points.save(node);
        self.reg_nums.save(node);
        self.titles.save(node);
        self.trials.save(node, config);
    }

    pub fn rename_venue(&mut self, old_venue: &str, new_venue: &str) -> usize {
        self.existing_points.rename_venue(old_venue, new_venue)
            + self.reg_nums.rename_venue(old_venue, new_venue)
            + self.titles.rename_venue(old_venue, new_venue)
            + self.trials.rename_venue(old_venue, new_venue)
    }

    pub fn delete_venue(&mut self, venue: &str) -> usize {
        self.existing_points.delete_venue(venue)
            + self.reg_nums.delete_venue(venue)
            + self.titles.delete_venue(venue)
            + self.trials.delete_venue(venue)
    }

    pub fn rename_division(&mut self, venue: &ConfigVenue, old_div: &str, new_div: &str) -> usize {
        self.existing_points
            .rename_division(&venue.name, old_div, new_div)
            + self.trials.rename_division(venue, old_div, new_div)
    }

    pub fn delete_division(&mut self, config: &Config, venue: &str, division: &str) -> usize {
        self.existing_points.delete_division(venue, division)
            + self.trials.delete_division(config, venue, division)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogList(pub Vec<Dog>);

impl Deref for DogList {
    type Target = Vec<Dog>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DogList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl DogList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        config: &Config,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0.push(Dog::load(tree, config, version, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode, config: &Config) {
        for item in &self.0 {
            item.save(parent, config);
        }
    }

    /// Recompute multi-Q credit on every trial, typically after a
    /// configuration change.
    pub fn set_multi_qs(&mut self, config: &Config) {
        for dog in &mut self.0 {
            for trial in dog.trials.iter_mut() {
                trial.set_multi_qs(config);
            }
        }
    }

    pub fn num_existing_points_in_venue(&self, venue: &str) -> usize {
        self.0
            .iter()
            .map(|d| d.existing_points.num_existing_points_in_venue(venue))
            .sum()
    }

    pub fn num_reg_nums_in_venue(&self, venue: &str) -> usize {
        self.0
            .iter()
            .map(|d| d.reg_nums.num_reg_nums_in_venue(venue))
            .sum()
    }

    pub fn num_titles_in_venue(&self, venue: &str) -> usize {
        self.0
            .iter()
            .map(|d| d.titles.num_titles_in_venue(venue))
            .sum()
    }

    pub fn num_trials_in_venue(&self, venue: &str) -> usize {
        self.0
            .iter()
            .map(|d| d.trials.num_trials_in_venue(venue))
            .sum()
    }

    pub fn rename_venue(&mut self, old_venue: &str, new_venue: &str) -> usize {
        self.0
            .iter_mut()
            .map(|d| d.rename_venue(old_venue, new_venue))
            .sum()
    }

    pub fn delete_venue(&mut self, venue: &str) -> usize {
        self.0.iter_mut().map(|d| d.delete_venue(venue)).sum()
    }

    pub fn num_other_points_in_use(&self, other: &str) -> usize {
        self.0
            .iter()
            .map(|d| {
                d.existing_points.num_other_points_in_use(other)
                    + d.trials.num_other_points_in_use(other)
            })
            .sum()
    }

    pub fn rename_other_points(&mut self, old_other: &str, new_other: &str) -> usize {
        self.0
            .iter_mut()
            .map(|d| {
                d.existing_points.rename_other_points(old_other, new_other)
                    + d.trials.rename_other_points(old_other, new_other)
            })
            .sum()
    }

    pub fn delete_other_points(&mut self, other: &str) -> usize {
        self.0
            .iter_mut()
            .map(|d| {
                d.existing_points.delete_other_points(other) + d.trials.delete_other_points(other)
            })
            .sum()
    }

    pub fn num_multiqs_in_use(&self, venue: &str, multiq: &str) -> usize {
        self.0
            .iter()
            .map(|d| d.existing_points.num_multiqs_in_use(venue, multiq))
            .sum()
    }

    pub fn rename_multiqs(&mut self, venue: &str, old_multiq: &str, new_multiq: &str) -> usize {
        self.0
            .iter_mut()
            .map(|d| d.existing_points.rename_multiqs(venue, old_multiq, new_multiq))
            .sum()
    }

    /// Drop existing-points credit for multi-Qs the venue no longer
    /// defines.
    pub fn delete_multiqs(&mut self, config: &Config, venue: &str) -> usize {
        self.0
            .iter_mut()
            .map(|d| d.existing_points.delete_multiqs(config, venue))
            .sum()
    }

    pub fn num_multi_hosted_trials_in_division(
        &self,
        config: &Config,
        venue: &str,
        division: &str,
    ) -> usize {
        self.0
            .iter()
            .map(|d| {
                d.trials
                    .num_multi_hosted_trials_in_division(config, venue, division)
            })
            .sum()
    }

    pub fn num_existing_points_in_division(&self, venue: &ConfigVenue, division: &str) -> usize {
        self.0
            .iter()
            .map(|d| {
                d.existing_points
                    .num_existing_points_in_division(venue, division)
            })
            .sum()
    }

    pub fn num_runs_in_division(&self, venue: &ConfigVenue, division: &str) -> usize {
        self.0
            .iter()
            .map(|d| d.trials.num_runs_in_division(venue, division))
            .sum()
    }

    pub fn rename_division(&mut self, venue: &ConfigVenue, old_div: &str, new_div: &str) -> usize {
        self.0
            .iter_mut()
            .map(|d| d.rename_division(venue, old_div, new_div))
            .sum()
    }

    pub fn delete_division(&mut self, config: &Config, venue: &str, division: &str) -> usize {
        self.0
            .iter_mut()
            .map(|d| d.delete_division(config, venue, division))
            .sum()
    }

    pub fn num_levels_in_use(&self, venue: &str, division: &str, level: &str) -> usize {
        self.0
            .iter()
            .map(|d| {
                d.existing_points.num_levels_in_use(venue, division, level)
                    + d.trials.num_levels_in_use(venue, division, level)
            })
            .sum()
    }

    pub fn rename_level(
        &mut self,
        venue: &str,
        division: &str,
        old_level: &str,
        new_level: &str,
    ) -> usize {
        self.0
            .iter_mut()
            .map(|d| {
                d.existing_points
                    .rename_level(venue, division, old_level, new_level)
                    + d.trials.rename_level(venue, division, old_level, new_level)
            })
            .sum()
    }

    pub fn delete_level(&mut self, venue: &str, division: &str, level: &str) -> usize {
        self.0
            .iter_mut()
            .map(|d| {
                d.existing_points.delete_level(venue, division, level)
                    + d.trials.delete_level(venue, division, level)
            })
            .sum()
    }

    pub fn num_titles_in_use(&self, venue: &str, title: &str) -> usize {
        self.0
            .iter()
            .map(|d| d.titles.num_titles_in_use(venue, title))
            .sum()
    }

    pub fn rename_title(&mut self, venue: &str, old_title: &str, new_title: &str) -> usize {
        self.0
            .iter_mut()
            .map(|d| d.titles.rename_title(venue, old_title, new_title))
            .sum()
    }

    pub fn delete_title(&mut self, venue: &str, title: &str) -> usize {
        let mut count = 0;
        for dog in &mut self.0 {
            while let Some(found) = dog.titles.find_title(venue, title).cloned() {
                dog.titles.delete_title(&found);
                count += 1;
            }
        }
        count
    }

    pub fn num_events_in_use(&self, venue: &str, event: &str) -> usize {
        self.0
            .iter()
            .map(|d| {
                d.existing_points.num_events_in_use(venue, event)
                    + d.trials.num_events_in_use(venue, event)
            })
            .sum()
    }

    pub fn rename_event(&mut self, venue: &str, old_event: &str, new_event: &str) -> usize {
        self.0
            .iter_mut()
            .map(|d| {
                d.existing_points.rename_event(venue, old_event, new_event)
                    + d.trials.rename_event(venue, old_event, new_event)
            })
            .sum()
    }

    pub fn delete_event(&mut self, venue: &str, event: &str) -> usize {
        self.0
            .iter_mut()
            .map(|d| {
                d.existing_points.delete_event(venue, event) + d.trials.delete_event(venue, event)
            })
            .sum()
    }

    pub fn rename_lifetime_name(&mut self, venue: &str, old_name: &str, new_name: &str) -> usize {
        self.0
            .iter_mut()
            .map(|d| {
                d.existing_points
                    .rename_lifetime_name(venue, old_name, new_name)
            })
            .sum()
    }

    pub fn delete_lifetime_name(&mut self, venue: &str, name: &str) -> usize {
        self.0
            .iter_mut()
            .map(|d| d.existing_points.delete_lifetime_name(venue, name))
            .sum()
    }

    pub fn add_dog(&mut self, dog: Dog) {
        self.0.push(dog);
    }

    pub fn delete_dog(&mut self, dog: &Dog) -> bool {
        match self.0.iter().position(|d| d == dog) {
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
        let venue = config.venues.add_venue("AKC").unwrap();
        venue.divisions.add_division("Regular");
        config
    }

    #[test]
    fn call_name_is_required() {
        let tree = ElementNode::new(TREE_DOG);
        let mut log = ErrorLog::new();
        assert!(Dog::load(&tree, &config(), ArbVersion::new(15, 3), &mut log).is_err());
    }

    #[test]
    fn bad_dates_are_fatal() {
        let mut tree = ElementNode::new(TREE_DOG);
        tree.add_attrib(ATTRIB_DOG_CALLNAME, "Rip");
        tree.add_attrib(ATTRIB_DOG_DOB, "not-a-date");
        let mut log = ErrorLog::new();
        assert!(Dog::load(&tree, &config(), ArbVersion::new(15, 3), &mut log).is_err());
        assert!(!log.messages.is_empty());
    }

    #[test]
    fn dog_round_trips() {
        let config = config();
        let mut tree = ElementNode::new(TREE_DOG);
        tree.add_attrib(ATTRIB_DOG_CALLNAME, "Rip");
        tree.add_attrib(ATTRIB_DOG_DOB, "2018-04-01");
        {
            let breed = tree.add_element_node(TREE_BREED);
            breed.set_value("Border Collie");
        }
        let mut log = ErrorLog::new();
        let dog = Dog::load(&tree, &config, ArbVersion::new(15, 3), &mut log).unwrap();
        assert_eq!(dog.call_name, "Rip");
        assert_eq!(dog.breed, "Border Collie");
        assert!(!dog.deceased.is_valid());

        let mut parent = ElementNode::new("Test");
        dog.save(&mut parent, &config);
        let saved = parent.find_element_node(TREE_DOG).unwrap();
        assert_eq!(saved.raw_attrib(ATTRIB_DOG_DOB), Some("2018-04-01"));
        assert!(saved.raw_attrib(ATTRIB_DOG_DECEASED).is_none());
        let loaded = Dog::load(saved, &config, ArbVersion::new(15, 3), &mut log).unwrap();
        assert_eq!(loaded, dog);
    }
}
