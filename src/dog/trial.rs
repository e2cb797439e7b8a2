//! A trial: the clubs hosting it and the runs entered at it.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::config::venue::ConfigVenue;
use crate::config::Config;
use crate::date::ArbDate;
use crate::dog::club::DogClubList;
use crate::dog::run::DogRunList;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::config::multiq::MultiQMatchRun;
use crate::schema::*;
use crate::types::{ArbVersion, Lookup};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogTrial {
    /// Shown as the trial date while no runs are entered.
    pub default_date: ArbDate,
    pub verified: bool,
    pub location: String,
    pub note: String,
    pub clubs: DogClubList,
    pub runs: DogRunList,
}

impl DogTrial {
    pub fn new(date: ArbDate) -> Self {
        Self {
            default_date: date,
            ..Self::default()
        }
    }

    pub fn generic_name(&self) -> &str {
        &self.location
    }

    pub fn load(
        tree: &ElementNode,
        config: &Config,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_TRIAL {
            return Err(ArbError::MissingElement(TREE_TRIAL.to_string()));
        }
        let mut trial = Self::default();
        tree.opt_attrib(ATTRIB_TRIAL_DEFAULT_DATE, &mut trial.default_date)?;
        if let Lookup::Invalid = tree.attrib::<bool>(ATTRIB_TRIAL_VERIFIED) {
            let err = ArbError::invalid_bool(TREE_TRIAL, ATTRIB_TRIAL_VERIFIED);
            cb.log_message(&err.to_string());
            return Err(err);
        }
        tree.opt_attrib(ATTRIB_TRIAL_VERIFIED, &mut trial.verified)?;
        for element in tree.nodes() {
            if element.name() == TREE_LOCATION {
                trial.location = element.value();
            } else if element.name() == TREE_NOTE {
                trial.note = element.value();
            } else if element.name() == TREE_CLUB {
                // A bad club doesn't lose the trial.
                let _ = trial.clubs.load(element, config, version, cb);
            } else if element.name() == TREE_RUN {
                // Clubs precede runs in well-formed files; a run whose
                // club is missing simply fails to load here.
                let _ = trial.runs.load(element, config, &trial.clubs, version, cb);
            }
        }
        // Old-style cosanctioning: pre-15.0 files flagged nothing, so
        // any secondary club under a different venue is taken to
        // cosanction under the first club. Same-venue pairs were two
        // real clubs splitting one trial.
        if version < ArbVersion::new(15, 0) && trial.clubs.len() > 1 {
            let main_venue = trial.clubs[0].venue.clone();
            for club in trial.clubs.iter_mut().skip(1) {
                if club.venue != main_venue {
                    club.primary_club_venue = main_venue.clone();
                }
            }
        }
        trial.clubs.post_load(cb);
        trial.set_multi_qs(config);
        trial.runs.sort();
        // The default date only survives while the trial has no runs.
        if !trial.runs.is_empty() {
            trial.default_date = trial.runs.start_date();
        }
        Ok(trial)
    }

    pub fn save(&self, parent: &mut ElementNode, config: &Config) {
        let node = parent.add_element_node(TREE_TRIAL);
        if self.default_date.is_valid() && self.runs.is_empty() {
            node.add_attrib_date(ATTRIB_TRIAL_DEFAULT_DATE, self.default_date);
        }
        if self.verified {
            node.add_attrib_bool(ATTRIB_TRIAL_VERIFIED, self.verified);
        }
        if !self.location.is_empty() {
            let element = node.add_element_node(TREE_LOCATION);
            element.set_value(self.location.clone());
        }
        if !self.note.is_empty() {
            let element = node.add_element_node(TREE_NOTE);
            element.set_value(self.note.clone());
        }
        self.clubs.save(node);
        self.runs.save(node, &self.clubs, config);
    }

    /// Recompute which multiple-Q combinations each run satisfies.
    /// Qualified runs are grouped per day and matched against every
    /// multi-Q defined by the venues the clubs compete under.
    pub fn set_multi_qs(&mut self, config: &Config) {
        for run in self.runs.iter_mut() {
            run.clear_multiqs();
        }
        let venues: BTreeSet<&str> = self.clubs.iter().map(|c| c.venue.as_str()).collect();
        let mut by_date: BTreeMap<ArbDate, Vec<usize>> = BTreeMap::new();
        for (i, run) in self.runs.iter().enumerate() {
            if run.q.qualified() {
                by_date.entry(run.date).or_default().push(i);
            }
        }
        let mut additions: Vec<(usize, String)> = Vec::new();
        for venue in venues {
            let Some(venue) = config.venues.find_venue(venue) else {
                continue;
            };
            if venue.multiqs.is_empty() {
                continue;
            }
            for (date, indices) in &by_date {
                if indices.len() < 2 {
                    continue;
                }
                let candidates: Vec<MultiQMatchRun> = indices
                    .iter()
                    .map(|&i| {
                        let run = &self.runs[i];
                        MultiQMatchRun {
                            index: i,
                            date: *date,
                            division: &run.division,
                            level: &run.level,
                            event: &run.event,
                        }
                    })
                    .collect();
                for multiq in venue.multiqs.iter() {
                    if let Some(matched) = multiq.match_runs(&candidates) {
                        for idx in matched {
                            additions.push((idx, multiq.name.clone()));
                        }
                    }
                }
            }
        }
        for (idx, name) in additions {
            self.runs[idx].add_multiq(&name);
        }
    }

    pub fn has_venue(&self, venue: &str) -> bool {
        self.clubs.iter().any(|c| c.venue == venue)
    }

    pub fn start_date(&self) -> ArbDate {
        if self.runs.is_empty() {
            self.default_date
        } else {
            self.runs.start_date()
        }
    }

    pub fn end_date(&self) -> ArbDate {
        if self.runs.is_empty() {
            self.default_date
        } else {
            self.runs.end_date()
        }
    }

    /// Speed points accumulated at this trial for a division/level.
    pub fn speed_points(&self, config: &Config, division: &str, level: &str) -> i16 {
        if self.clubs.is_empty() {
            return 0;
        }
        let mut speed = 0;
        for run in self.runs.iter() {
            if run.division != division || run.level != level {
                continue;
            }
            let Some(club) = run.club(&self.clubs) else {
                continue;
            };
            if let Some((_, scoring)) = config.venues.find_event(
                &club.venue,
                &run.event,
                &run.division,
                &run.level,
                run.date,
            ) {
                speed += run.speed_points(scoring);
            }
        }
        speed
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogTrialList(pub Vec<DogTrial>);

impl Deref for DogTrialList {
    type Target = Vec<DogTrial>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DogTrialList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl DogTrialList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        config: &Config,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0.push(DogTrial::load(tree, config, version, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode, config: &Config) {
        for item in &self.0 {
            item.save(parent, config);
        }
    }

    /// Sort by start date, then location, then the main club. Trials
    /// without a date sort before dated ones.
    pub fn sort(&mut self, descending: bool) {
        if self.0.len() < 2 {
            return;
        }
        self.0.sort_by(|one, two| {
            let d1 = one.start_date();
            let d2 = two.start_date();
            let mut ord = match (d1.is_valid(), d2.is_valid()) {
                (true, true) => d1.cmp(&d2),
                (true, false) => std::cmp::Ordering::Greater,
                (false, true) => std::cmp::Ordering::Less,
                (false, false) => std::cmp::Ordering::Equal,
            };
            if ord == std::cmp::Ordering::Equal {
                ord = one
                    .location
                    .to_lowercase()
                    .cmp(&two.location.to_lowercase());
            }
            if ord == std::cmp::Ordering::Equal {
                let c1 = one.clubs.main_club();
                let c2 = two.clubs.main_club();
                let key = |c: Option<&crate::dog::club::DogClub>| {
                    c.map_or((String::new(), String::new()), |c| {
                        (c.name.to_lowercase(), c.venue.to_lowercase())
                    })
                };
                ord = key(c1).cmp(&key(c2));
            }
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }

    pub fn num_trials_in_venue(&self, venue: &str) -> usize {
        self.0.iter().filter(|t| t.has_venue(venue)).count()
    }

    pub fn rename_venue(&mut self, old_venue: &str, new_venue: &str) -> usize {
        let mut count = 0;
        for trial in &mut self.0 {
            for club in trial.clubs.iter_mut() {
                if club.venue == old_venue {
                    club.venue = new_venue.to_string();
                    count += 1;
                }
            }
        }
        count
    }

    /// Deletes every club under the venue; trials left with no clubs
    /// go with them.
    pub fn delete_venue(&mut self, venue: &str) -> usize {
        let mut count = 0;
        self.0.retain_mut(|trial| {
            let before = trial.clubs.len();
            trial.clubs.retain(|c| c.venue != venue);
            count += before - trial.clubs.len();
            !trial.clubs.is_empty()
        });
        count
    }

    pub fn num_other_points_in_use(&self, name: &str) -> usize {
        self.0
            .iter()
            .flat_map(|t| t.runs.iter())
            .map(|r| r.num_other_points_in_use(name))
            .sum()
    }

    pub fn rename_other_points(&mut self, old_name: &str, new_name: &str) -> usize {
        self.0
            .iter_mut()
            .flat_map(|t| t.runs.iter_mut())
            .map(|r| r.rename_other_points(old_name, new_name))
            .sum()
    }

    pub fn delete_other_points(&mut self, name: &str) -> usize {
        self.0
            .iter_mut()
            .flat_map(|t| t.runs.iter_mut())
            .map(|r| r.delete_other_points(name))
            .sum()
    }

    /// Trials hosted by clubs of several venues where `division` also
    /// exists in one of the other venues. Those trials keep their runs
    /// when the division is deleted from `venue`.
    pub fn num_multi_hosted_trials_in_division(
        &self,
        config: &Config,
        venue: &str,
        division: &str,
    ) -> usize {
        let mut count = 0;
        for trial in &self.0 {
            if trial.clubs.find_venue(venue).is_none() || trial.clubs.len() < 2 {
                continue;
            }
            let venue1 = trial.clubs[1].venue.clone();
            let mut div_count = 0;
            for club in trial.clubs.iter() {
                // All clubs in one venue isn't really multi-hosted.
                if club.venue == venue1 {
                    continue;
                }
                if let Some(v) = config.venues.find_venue(&club.venue) {
                    if v.divisions.find_division(division).is_some() {
                        div_count += 1;
                    }
                }
            }
            if div_count > 0 {
                count += 1;
            }
        }
        count
    }

    pub fn num_runs_in_division(&self, venue: &ConfigVenue, division: &str) -> usize {
        self.0
            .iter()
            .filter(|t| t.clubs.find_venue(&venue.name).is_some())
            .flat_map(|t| t.runs.iter())
            .filter(|r| r.division == division)
            .count()
    }

    pub fn rename_division(
        &mut self,
        venue: &ConfigVenue,
        old_div: &str,
        new_div: &str,
    ) -> usize {
        let mut count = 0;
        for trial in &mut self.0 {
            if trial.clubs.find_venue(&venue.name).is_none() {
                continue;
            }
            for run in trial.runs.iter_mut() {
                if run.division == old_div {
                    run.division = new_div.to_string();
                    count += 1;
                }
            }
        }
        count
    }

    /// Deletes runs recorded in the division, unless another venue in
    /// the trial also defines it. Trials left with no runs are
    /// removed.
    pub fn delete_division(&mut self, config: &Config, venue: &str, division: &str) -> usize {
        let mut count = 0;
        self.0.retain_mut(|trial| {
            if trial.clubs.find_venue(venue).is_some() {
                let mut div_count = 0;
                for club in trial.clubs.iter() {
                    if let Some(v) = config.venues.find_venue(&club.venue) {
                        if v.divisions.find_division(division).is_some() {
                            div_count += 1;
                        }
                    }
                }
                if div_count == 1 {
                    let before = trial.runs.len();
                    trial.runs.retain(|r| r.division != division);
                    count += before - trial.runs.len();
                    return !trial.runs.is_empty();
                }
            }
            true
        });
        count
    }

    pub fn num_levels_in_use(&self, venue: &str, division: &str, level: &str) -> usize {
        self.0
            .iter()
            .filter(|t| t.clubs.find_venue(venue).is_some())
            .flat_map(|t| t.runs.iter())
            .filter(|r| r.division == division && r.level == level)
            .count()
    }

    pub fn rename_level(
        &mut self,
        venue: &str,
        division: &str,
        old_level: &str,
        new_level: &str,
    ) -> usize {
        let mut count = 0;
        for trial in &mut self.0 {
            if trial.clubs.find_venue(venue).is_none() {
                continue;
            }
            for run in trial.runs.iter_mut() {
                if run.division == division && run.level == old_level {
                    run.level = new_level.to_string();
                    count += 1;
                }
            }
        }
        count
    }

    pub fn delete_level(&mut self, venue: &str, division: &str, level: &str) -> usize {
        let mut count = 0;
        self.0.retain_mut(|trial| {
            if trial.clubs.find_venue(venue).is_none() {
                return true;
            }
            let before = trial.runs.len();
            trial
                .runs
                .retain(|r| !(r.division == division && r.level == level));
            count += before - trial.runs.len();
            !trial.runs.is_empty()
        });
        count
    }

    pub fn num_events_in_use(&self, venue: &str, event: &str) -> usize {
        self.0
            .iter()
            .filter(|t| t.clubs.find_venue(venue).is_some())
            .flat_map(|t| t.runs.iter())
            .filter(|r| r.event == event)
            .count()
    }

    pub fn rename_event(&mut self, venue: &str, old_event: &str, new_event: &str) -> usize {
        let mut count = 0;
        for trial in &mut self.0 {
            if trial.clubs.find_venue(venue).is_none() {
                continue;
            }
            for run in trial.runs.iter_mut() {
                if run.event == old_event {
                    run.event = new_event.to_string();
                    count += 1;
                }
            }
        }
        count
    }

    pub fn delete_event(&mut self, venue: &str, event: &str) -> usize {
        let mut count = 0;
        self.0.retain_mut(|trial| {
            if trial.clubs.find_venue(venue).is_none() {
                return true;
            }
            let before = trial.runs.len();
            trial.runs.retain(|r| r.event != event);
            count += before - trial.runs.len();
            !trial.runs.is_empty()
        });
        count
    }

    pub fn add_trial(&mut self, trial: DogTrial) {
        self.0.push(trial);
    }

    pub fn delete_trial(&mut self, trial: &DogTrial) -> bool {
        match self.0.iter().position(|t| t == trial) {
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
    use crate::config::event::ConfigEvent;
    use crate::config::scoring::ScoringStyle;
    use crate::dog::run::DogRun;
    use crate::types::Q;

    fn usdaa_config() -> Config {
        let mut config = Config::default();
        let venue = config.venues.add_venue("USDAA").unwrap();
        let div = venue.divisions.add_division("Championship").unwrap();
        div.levels.add_level("Masters");
        for name in ["Standard", "Jumpers"] {
            let mut event = ConfigEvent {
                name: name.to_string(),
                ..ConfigEvent::default()
            };
            let s = event.scorings.add_scoring();
            s.division = WILDCARD_DIVISION.to_string();
            s.level = WILDCARD_LEVEL.to_string();
            s.style = ScoringStyle::FaultsThenTime;
            venue.events.add_event(event);
        }
        let mut mq = crate::config::multiq::ConfigMultiQ {
            name: "Double Q".to_string(),
            short_name: "QQ".to_string(),
            ..Default::default()
        };
        mq.add_item("Championship", "Masters", "Standard");
        mq.add_item("Championship", "Masters", "Jumpers");
        config
            .venues
            .find_venue_mut("USDAA")
            .unwrap()
            .multiqs
            .add_multiq(mq);
        config
    }

    fn run(date: ArbDate, event: &str, q: Q) -> DogRun {
        DogRun {
            date,
            division: "Championship".to_string(),
            level: "Masters".to_string(),
            event: event.to_string(),
            q,
            ..DogRun::default()
        }
    }

    #[test]
    fn multi_qs_are_recomputed_per_day() {
        let config = usdaa_config();
        let mut trial = DogTrial::default();
        trial.clubs.add_club("Bay Team", "USDAA");
        let day1 = ArbDate::new(2023, 9, 2);
        let day2 = ArbDate::new(2023, 9, 3);
        trial.runs.add_run(run(day1, "Standard", Q::Q));
        trial.runs.add_run(run(day1, "Jumpers", Q::Q));
        trial.runs.add_run(run(day2, "Standard", Q::Q));
        trial.runs.add_run(run(day2, "Jumpers", Q::Nq));
        trial.set_multi_qs(&config);
        assert!(trial.runs[0].multiqs.contains("Double Q"));
        assert!(trial.runs[1].multiqs.contains("Double Q"));
        assert!(trial.runs[2].multiqs.is_empty());
        assert!(trial.runs[3].multiqs.is_empty());
    }

    #[test]
    fn old_files_mark_cross_venue_clubs_as_cosanctioning() {
        let mut config = usdaa_config();
        config.venues.add_venue("NADAC");
        let mut tree = ElementNode::new(TREE_TRIAL);
        {
            let club = tree.add_element_node(TREE_CLUB);
            club.add_attrib(ATTRIB_CLUB_VENUE, "USDAA");
            club.set_value("Club A");
        }
        {
            let club = tree.add_element_node(TREE_CLUB);
            club.add_attrib(ATTRIB_CLUB_VENUE, "NADAC");
            club.set_value("Club B");
        }
        let mut log = ErrorLog::new();
        let trial = DogTrial::load(&tree, &config, ArbVersion::new(14, 5), &mut log).unwrap();
        assert!(!trial.clubs[0].is_cosanctioning());
        assert_eq!(trial.clubs[1].primary_club_venue, "USDAA");

        // Current files record cosanctioning explicitly.
        let trial = DogTrial::load(&tree, &config, ArbVersion::new(15, 3), &mut log).unwrap();
        assert!(!trial.clubs[1].is_cosanctioning());
    }

    #[test]
    fn default_date_follows_the_runs() {
        let config = usdaa_config();
        let mut tree = ElementNode::new(TREE_TRIAL);
        tree.add_attrib(ATTRIB_TRIAL_DEFAULT_DATE, "2023-01-01");
        {
            let club = tree.add_element_node(TREE_CLUB);
            club.add_attrib(ATTRIB_CLUB_VENUE, "USDAA");
            club.set_value("Bay Team");
        }
        {
            let run = tree.add_element_node(TREE_RUN);
            run.add_attrib(ATTRIB_RUN_DATE, "2023-09-02");
            run.add_attrib(ATTRIB_RUN_DIVISION, "Championship");
            run.add_attrib(ATTRIB_RUN_LEVEL, "Masters");
            run.add_attrib(ATTRIB_RUN_EVENT, "Standard");
        }
        let mut log = ErrorLog::new();
        let trial = DogTrial::load(&tree, &config, ArbVersion::new(15, 3), &mut log).unwrap();
        assert_eq!(trial.default_date, ArbDate::new(2023, 9, 2));

        // The stored default date only matters for empty trials.
        let mut parent = ElementNode::new("Test");
        trial.save(&mut parent, &config);
        let node = parent.find_element_node(TREE_TRIAL).unwrap();
        assert!(node.raw_attrib(ATTRIB_TRIAL_DEFAULT_DATE).is_none());
    }

    #[test]
    fn deleting_a_venue_drops_clubless_trials() {
        let mut list = DogTrialList::default();
        let mut trial = DogTrial::default();
        trial.clubs.add_club("Club A", "USDAA");
        list.add_trial(trial);
        let mut both = DogTrial::default();
        both.clubs.add_club("Club A", "USDAA");
        both.clubs.add_club("Club B", "NADAC");
        list.add_trial(both);
        assert_eq!(list.delete_venue("USDAA"), 2);
        assert_eq!(list.len(), 1);
        assert_eq!(list.num_trials_in_venue("NADAC"), 1);
    }
}
