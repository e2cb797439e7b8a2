//! The record book document: calendar, training log, configuration,
//! general info, and the dogs, tied to one XML root.
//!
//! Besides load/save this owns the configuration update algorithm,
//! which reconciles every dog's recorded runs with a newly merged
//! configuration.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::calendar::CalendarList;
use crate::callbacks::{ConfigActionCallback, ConfigHandler, ErrorCallback};
use crate::config::event::ConfigEvent;
use crate::config::Config;
use crate::date::ArbDate;
use crate::dog::run_scoring::RunScoringType;
use crate::dog::DogList;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::info::{Info, InfoType};
use crate::messages;
use crate::schema::*;
use crate::training::TrainingList;
use crate::types::{ArbVersion, Lookup, Q};

/// The newest file format this program reads and the one it writes.
///
/// 15.3 raised the sub-minor on the cosanctioning changes; see the
/// version gates scattered through the entity loaders for the full
/// history.
pub const fn current_doc_version() -> ArbVersion {
    ArbVersion::new(15, 3)
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// One "   date venue event division/level" change-report line.
fn run_line(date: ArbDate, venue: &str, event: &str, division: &str, level: &str) -> String {
    format!("   {} {venue} {event} {division}/{level}\n", date.iso())
}

/// A complete record book.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AgilityRecordBook {
    pub calendar: CalendarList,
    pub training: TrainingList,
    pub config: Config,
    pub info: Info,
    pub dogs: DogList,
}

impl AgilityRecordBook {
    /// An empty book carrying the factory-default configuration.
    pub fn with_default_config(handler: &dyn ConfigHandler) -> ArbResult<Self> {
        Ok(Self {
            config: Config::default_config(handler)?,
            ..Self::default()
        })
    }

    /// Loads a full document. The configuration loads before any dog so
    /// runs can resolve their events; a dog that fails to load is
    /// skipped, as are bad calendar/training/info entries.
    pub fn load(&mut self, tree: &ElementNode, cb: &mut dyn ErrorCallback) -> ArbResult<()> {
        *self = Self::default();
        if tree.name() != TREE_BOOK {
            let err = ArbError::MissingElement(TREE_BOOK.to_string());
            cb.log_message(&err.to_string());
            return Err(err);
        }

        let version = match tree.attrib::<ArbVersion>(ATTRIB_BOOK_VERSION) {
            Lookup::Found(v) => v,
            Lookup::NotFound => {
                let err = ArbError::missing(TREE_BOOK, ATTRIB_BOOK_VERSION);
                cb.log_message(&err.to_string());
                return Err(err);
            }
            Lookup::Invalid => {
                let raw = tree.raw_attrib(ATTRIB_BOOK_VERSION).unwrap_or("");
                let err = ArbError::UnknownDocVersion(raw.to_string());
                cb.log_message(&err.to_string());
                return Err(err);
            }
        };
        debug!(%version, "loading document");
        if version < ArbVersion::new(1, 0) {
            let err = ArbError::UnknownDocVersion(version.to_string());
            cb.log_message(&err.to_string());
            return Err(err);
        }
        if version > current_doc_version() {
            // A newer minor revision is readable; newer data is lost on
            // the next save, so the caller gets a say.
            if version.major() == current_doc_version().major() {
                let msg = format!(
                    "this file was written by a newer version of the program \
                     (document version {version}); some information may be lost"
                );
                if !cb.on_error(&msg) {
                    return Err(ArbError::Aborted);
                }
            } else {
                let err = ArbError::FutureDocVersion(version.to_string());
                cb.log_message(&err.to_string());
                return Err(err);
            }
        }

        for element in tree.nodes() {
            // Ignore any errors; a bad entry doesn't lose the rest.
            match element.name() {
                TREE_CALENDAR => {
                    let _ = self.calendar.load(element, version, cb);
                }
                TREE_TRAINING => {
                    let _ = self.training.load(element, version, cb);
                }
                _ => {}
            }
        }
        self.calendar.sort();
        self.training.sort();

        let mut config_tree = None;
        for element in tree.nodes() {
            if element.name() == TREE_CONFIG {
                if config_tree.is_some() {
                    let err = ArbError::DuplicateConfig;
                    cb.log_message(&err.to_string());
                    return Err(err);
                }
                config_tree = Some(element);
            }
        }
        let Some(config_tree) = config_tree else {
            let err = ArbError::MissingConfig;
            cb.log_message(&err.to_string());
            return Err(err);
        };
        self.config.load(config_tree, version, cb)?;

        for element in tree.nodes() {
            if element.name() == TREE_DOG {
                // Keep going; load whatever dogs we can.
                let _ = self.dogs.load(element, &self.config, version, cb);
            }
        }

        if let Some(info_tree) = tree.find_element_node(TREE_INFO) {
            let _ = self.info.load(info_tree, version, cb);
        }
        Ok(())
    }

    /// Builds the complete document tree, stamped with the program
    /// version and a save timestamp for other tools to consume.
    pub fn save(&self) -> ElementNode {
        let mut tree = ElementNode::new(TREE_BOOK);
        tree.add_attrib_version(ATTRIB_BOOK_VERSION, current_doc_version());
        tree.add_attrib(ATTRIB_BOOK_PGM_VERSION, env!("CARGO_PKG_VERSION"));
        tree.add_attrib(ATTRIB_BOOK_PLATFORM, std::env::consts::ARCH);
        tree.add_attrib(ATTRIB_BOOK_OS, std::env::consts::OS);
        tree.add_attrib(ATTRIB_BOOK_TIMESTAMP, timestamp());
        self.calendar.save(&mut tree);
        self.training.save(&mut tree);
        self.config.save(&mut tree);
        self.info.save(&mut tree);
        self.dogs.save(&mut tree, &self.config);
        tree
    }

    pub fn load_file(path: &Path, cb: &mut dyn ErrorCallback) -> ArbResult<Self> {
        let tree = ElementNode::load_xml_file(path)?;
        let mut book = Self::default();
        book.load(&tree, cb)?;
        Ok(book)
    }

    pub fn save_file(&self, path: &Path) -> ArbResult<()> {
        self.save().save_xml_file(path)
    }

    /// Merges `config_new` into this book and reconciles every dog
    /// record with the result. Returns whether anything changed.
    ///
    /// The incoming configuration's actions run first (renames and
    /// deletes, vetoable through `cb`), then the structural merge.
    /// After that every run is re-resolved against the new rules:
    /// scoring types are synchronized, stale table/subname data is
    /// cleared, runs whose event no longer exists are deleted, and
    /// multi-Q credit is recomputed.
    pub fn update(
        &mut self,
        indent: usize,
        config_new: &Config,
        info: &mut String,
        cb: &mut dyn ConfigActionCallback,
    ) -> bool {
        let cur_config_version = self.config.version;
        let mut changes = 0;
        if !config_new.actions.is_empty() {
            changes += config_new
                .actions
                .apply(&mut self.config, Some(&mut self.dogs), info, cb);
        }

        let mut changed = false;
        if cb.can_continue() {
            changed = self.config.update(indent, config_new, info);
        }

        // Configuration 24 added 'Team'. Before that, Pairs at the
        // Tournament/Nationals level tracked Team Qs; from v24 on,
        // Pairs is specifically the Relay run, so those old runs are
        // migrated to the new event. Only if the configurations agree
        // this is USDAA with the expected events, though.
        let mut fix_usdaa_pairs = false;
        if cur_config_version <= 23 && config_new.version >= 24 {
            if let (Some(venue), Some(venue_new)) = (
                self.config.venues.find_venue("USDAA"),
                config_new.venues.find_venue("USDAA"),
            ) {
                if let (Some(event), Some(event_new)) = (
                    venue.events.find_event("Pairs"),
                    venue_new.events.find_event("Team"),
                ) {
                    let any_date = ArbDate::invalid();
                    if event.verify_event(WILDCARD_DIVISION, "Nationals", any_date)
                        || event.verify_event(WILDCARD_DIVISION, "Tournament", any_date)
                        || event_new.verify_event(WILDCARD_DIVISION, "Nationals", any_date)
                        || event_new.verify_event(WILDCARD_DIVISION, "Tournament", any_date)
                    {
                        fix_usdaa_pairs = true;
                    }
                }
            }
        }

        // Fix existing runs even if the user cancelled above; the
        // actions that did run may already have orphaned some. First
        // drop existing-points credit for multi-Qs that went away.
        let venue_names: Vec<String> =
            self.config.venues.iter().map(|v| v.name.clone()).collect();
        for venue in &venue_names {
            self.dogs.delete_multiqs(&self.config, venue);
        }

        let mut msg_pairs_runs = String::new();
        let mut msg_del_runs = String::new();
        let mut msg_table = String::new();
        let mut msg_subname = String::new();
        let mut updated_pairs_runs = 0;
        let mut deleted_runs = 0;
        let mut updated_table = 0;
        let mut updated_subname = 0;
        let config = &self.config;
        for dog in self.dogs.iter_mut() {
            // Recurring titles recorded before instance tracking show
            // instance 1 now, and pick up the configured numbering.
            for title in dog.titles.iter_mut() {
                if let Some(config_title) = config.venues.find_title(&title.venue, &title.name) {
                    if title.instance == 0 && config_title.multiple_start_at > 1 {
                        title.instance = 1;
                    }
                    title.start_at = config_title.multiple_start_at;
                    title.show_instance_one = config_title.multiple_on_first;
                    title.increment = config_title.multiple_increment;
                    title.style = config_title.multiple_style;
                    title.separator = config_title.multiple_separator;
                }
            }
            for trial in dog.trials.iter_mut() {
                let mut i = 0;
                while i < trial.runs.len() {
                    let venue = trial.runs[i]
                        .club(&trial.clubs)
                        .map(|c| c.venue.clone())
                        .unwrap_or_default();
                    {
                        let run = &mut trial.runs[i];
                        if fix_usdaa_pairs
                            && venue == "USDAA"
                            && run.event == "Pairs"
                            && (run.level == "Tournament" || run.level == "Nationals")
                        {
                            run.event = "Team".to_string();
                            msg_pairs_runs.push_str(&run_line(
                                run.date,
                                &venue,
                                &run.event,
                                &run.division,
                                &run.level,
                            ));
                            updated_pairs_runs += 1;
                        }
                    }
                    let scoring = {
                        let run = &trial.runs[i];
                        config
                            .venues
                            .find_event(&venue, &run.event, &run.division, &run.level, run.date)
                            .map(|(_, s)| s)
                    };
                    match scoring {
                        Some(scoring) => {
                            let run = &mut trial.runs[i];
                            let style = RunScoringType::from_config_style(scoring.style);
                            if style != run.scoring.scoring_type {
                                run.scoring.scoring_type = style;
                                run.scoring.round_time_faults = scoring.drop_fractions;
                            }
                            if scoring.title_points.is_empty()
                                && scoring.life_points.is_empty()
                                && !run.q.allow_for_non_titling()
                            {
                                // Titling points were removed; the Q no
                                // longer applies.
                                run.q = Q::Na;
                            }
                            if !scoring.has_table && run.scoring.table {
                                run.scoring.table = false;
                                msg_table.push_str(&run_line(
                                    run.date,
                                    &venue,
                                    &run.event,
                                    &run.division,
                                    &run.level,
                                ));
                                updated_table += 1;
                            }
                            if !scoring.has_sub_names && !run.sub_name.is_empty() {
                                run.sub_name.clear();
                                msg_subname.push_str(&run_line(
                                    run.date,
                                    &venue,
                                    &run.event,
                                    &run.division,
                                    &run.level,
                                ));
                                updated_subname += 1;
                            }
                            i += 1;
                        }
                        None => {
                            let run = &trial.runs[i];
                            msg_del_runs.push_str(&run_line(
                                run.date,
                                &venue,
                                &run.event,
                                &run.division,
                                &run.level,
                            ));
                            deleted_runs += 1;
                            trial.runs.remove(i);
                        }
                    }
                }
            }
        }
        if updated_pairs_runs > 0 {
            changes += updated_pairs_runs;
            let msg = messages::update_team_runs(updated_pairs_runs, &msg_pairs_runs);
            info.push('\n');
            info.push_str(&msg);
            info.push('\n');
        }
        if deleted_runs > 0 {
            changes += deleted_runs;
            let msg = messages::warn_deleted_runs(deleted_runs, &msg_del_runs);
            cb.post_delete(&msg);
            info.push('\n');
            info.push_str(&msg);
            info.push('\n');
        }
        if updated_table > 0 {
            changes += updated_table;
            let msg = messages::update_table_runs_detail(updated_table, &msg_table);
            info.push('\n');
            info.push_str(&msg);
            info.push('\n');
        }
        if updated_subname > 0 {
            changes += updated_subname;
            let msg = messages::update_subname_runs(updated_subname, &msg_subname);
            info.push('\n');
            info.push_str(&msg);
            info.push('\n');
        }

        // Configuration 3 moved the table flag from the run's scoring
        // element to the event definition. Runs loaded from files old
        // enough to be ambiguous carry a conversion marker; resolve
        // them against the configured scoring, which also clears the
        // flag on non-table events.
        if cb.can_continue() && cur_config_version <= 2 && config_new.version >= 3 {
            let mut updated = 0;
            let config = &self.config;
            for venue in config.venues.iter() {
                for event in venue.events.iter() {
                    for dog in self.dogs.iter_mut() {
                        for trial in dog.trials.iter_mut() {
                            if trial.clubs.find_venue(&venue.name).is_none() {
                                continue;
                            }
                            for run in trial.runs.iter_mut() {
                                if run.event != event.name || !run.scoring.convert_table {
                                    continue;
                                }
                                let mut level = run.level.clone();
                                if let Some(div) = venue.divisions.find_division(&run.division) {
                                    if let Some(l) = div.levels.find_sub_level(&run.level) {
                                        level = l.name.clone();
                                    }
                                }
                                if let Some(scoring) =
                                    event.find_event(&run.division, &level, run.date)
                                {
                                    if run.scoring.table != scoring.has_table {
                                        updated += 1;
                                        run.scoring.table = scoring.has_table;
                                    }
                                }
                            }
                        }
                    }
                }
            }
            if updated > 0 {
                changes += updated;
                info.push_str(&messages::update_table_runs(updated));
                info.push('\n');
            }
        }

        if changes > 0 || changed {
            changed = true;
            self.dogs.set_multi_qs(&self.config);
        }
        changed
    }

    // ---- name collection for autocompletion and the info editor ----

    /// Club names from the dogs' trials and the calendar, optionally
    /// merged with the info section.
    pub fn all_club_names(&self, use_info: bool, visible_only: bool) -> BTreeSet<String> {
        let mut out: BTreeSet<String> = self
            .dogs
            .iter()
            .flat_map(|d| d.trials.iter())
            .flat_map(|t| t.clubs.iter())
            .filter(|c| !c.name.is_empty())
            .map(|c| c.name.clone())
            .collect();
        out.extend(
            self.calendar
                .iter()
                .filter(|c| !c.club.is_empty())
                .map(|c| c.club.clone()),
        );
        if use_info {
            out.extend(self.info.get(InfoType::Club).all_items(visible_only));
        }
        out
    }

    pub fn all_trial_locations(&self, use_info: bool, visible_only: bool) -> BTreeSet<String> {
        let mut out: BTreeSet<String> = self
            .dogs
            .iter()
            .flat_map(|d| d.trials.iter())
            .filter(|t| !t.location.is_empty())
            .map(|t| t.location.clone())
            .collect();
        out.extend(
            self.calendar
                .iter()
                .filter(|c| !c.location.is_empty())
                .map(|c| c.location.clone()),
        );
        if use_info {
            out.extend(self.info.get(InfoType::Location).all_items(visible_only));
        }
        out
    }

    /// Subnames configured for the event plus any recorded on runs of
    /// it in the venue.
    pub fn all_event_sub_names(&self, venue: &str, event: &ConfigEvent) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        if event.scorings.is_empty() {
            return out;
        }
        for scoring in event.scorings.iter() {
            if scoring.has_sub_names {
                out.extend(scoring.sub_names.iter().cloned());
            }
        }
        for dog in self.dogs.iter() {
            for trial in dog.trials.iter().filter(|t| t.has_venue(venue)) {
                for run in trial.runs.iter() {
                    if run.event == event.name && !run.sub_name.is_empty() {
                        out.insert(run.sub_name.clone());
                    }
                }
            }
        }
        out
    }

    pub fn all_heights(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for run in self.all_runs() {
            if !run.height.is_empty() {
                out.insert(run.height.clone());
            }
            for ref_run in run.ref_runs.iter() {
                if !ref_run.height.is_empty() {
                    out.insert(ref_run.height.clone());
                }
            }
        }
        out
    }

    pub fn all_call_names(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for dog in self.dogs.iter() {
            out.insert(dog.call_name.clone());
        }
        for run in self.all_runs() {
            for ref_run in run.ref_runs.iter() {
                if !ref_run.name.is_empty() {
                    out.insert(ref_run.name.clone());
                }
            }
        }
        out
    }

    pub fn all_breeds(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for dog in self.dogs.iter() {
            if !dog.breed.is_empty() {
                out.insert(dog.breed.clone());
            }
        }
        for run in self.all_runs() {
            for ref_run in run.ref_runs.iter() {
                if !ref_run.breed.is_empty() {
                    out.insert(ref_run.breed.clone());
                }
            }
        }
        out
    }

    pub fn all_judges(&self, use_info: bool, visible_only: bool) -> BTreeSet<String> {
        let mut out: BTreeSet<String> = self
            .all_runs()
            .filter(|r| !r.judge.is_empty())
            .map(|r| r.judge.clone())
            .collect();
        if use_info {
            out.extend(self.info.get(InfoType::Judge).all_items(visible_only));
        }
        out
    }

    pub fn all_handlers(&self) -> BTreeSet<String> {
        self.all_runs()
            .filter(|r| !r.handler.is_empty())
            .map(|r| r.handler.clone())
            .collect()
    }

    /// Partner handlers and partner dogs recorded on team runs.
    pub fn all_partners(&self) -> (BTreeSet<String>, BTreeSet<String>) {
        let mut handlers = BTreeSet::new();
        let mut dogs = BTreeSet::new();
        for run in self.all_runs() {
            for partner in run.partners.iter() {
                if !partner.handler.is_empty() {
                    handlers.insert(partner.handler.clone());
                }
                if !partner.dog.is_empty() {
                    dogs.insert(partner.dog.clone());
                }
            }
        }
        (handlers, dogs)
    }

    /// Configured fault types plus those written free-form on runs.
    pub fn all_fault_types(&self) -> BTreeSet<String> {
        let mut out: BTreeSet<String> = self
            .config
            .faults
            .iter()
            .filter(|f| !f.name.is_empty())
            .map(|f| f.name.clone())
            .collect();
        for run in self.all_runs() {
            out.extend(run.notes.faults.iter().filter(|f| !f.is_empty()).cloned());
        }
        out
    }

    fn all_runs(&self) -> impl Iterator<Item = &crate::dog::run::DogRun> {
        self.dogs
            .iter()
            .flat_map(|d| d.trials.iter())
            .flat_map(|t| t.runs.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::{AcceptAllActions, ErrorLog};

    fn empty_doc(version: &str) -> ElementNode {
        let mut tree = ElementNode::new(TREE_BOOK);
        tree.add_attrib(ATTRIB_BOOK_VERSION, version);
        tree.add_element_node(TREE_CONFIG);
        tree
    }

    #[test]
    fn load_rejects_a_foreign_root() {
        let mut book = AgilityRecordBook::default();
        let mut log = ErrorLog::new();
        let tree = ElementNode::new("SomethingElse");
        assert!(book.load(&tree, &mut log).is_err());
    }

    #[test]
    fn version_gate_distinguishes_minor_and_major() {
        let mut book = AgilityRecordBook::default();

        // Same major, newer minor: the caller decides.
        let mut log = ErrorLog::new();
        let result = book.load(&empty_doc("15.9"), &mut log);
        assert!(matches!(result, Err(ArbError::Aborted)));
        let mut log = ErrorLog::tolerant();
        assert!(book.load(&empty_doc("15.9"), &mut log).is_ok());

        // Newer major: hard failure.
        let mut log = ErrorLog::tolerant();
        let result = book.load(&empty_doc("16.0"), &mut log);
        assert!(matches!(result, Err(ArbError::FutureDocVersion(_))));

        // Pre-1.0 never existed.
        let mut log = ErrorLog::tolerant();
        let result = book.load(&empty_doc("0.9"), &mut log);
        assert!(matches!(result, Err(ArbError::UnknownDocVersion(_))));
    }

    #[test]
    fn exactly_one_configuration_is_required() {
        let mut book = AgilityRecordBook::default();
        let mut log = ErrorLog::new();

        let mut none = ElementNode::new(TREE_BOOK);
        none.add_attrib(ATTRIB_BOOK_VERSION, "15.3");
        assert!(matches!(
            book.load(&none, &mut log),
            Err(ArbError::MissingConfig)
        ));

        let mut two = empty_doc("15.3");
        two.add_element_node(TREE_CONFIG);
        assert!(matches!(
            book.load(&two, &mut log),
            Err(ArbError::DuplicateConfig)
        ));
    }

    #[test]
    fn save_stamps_the_file_header() {
        let book = AgilityRecordBook::default();
        let tree = book.save();
        assert_eq!(tree.name(), TREE_BOOK);
        assert_eq!(tree.raw_attrib(ATTRIB_BOOK_VERSION), Some("15.3"));
        assert_eq!(
            tree.raw_attrib(ATTRIB_BOOK_PGM_VERSION),
            Some(env!("CARGO_PKG_VERSION"))
        );
        assert!(tree.raw_attrib(ATTRIB_BOOK_TIMESTAMP).is_some());
        assert!(tree.find_element_node(TREE_CONFIG).is_some());
    }

    #[test]
    fn update_with_identical_config_changes_nothing() {
        let mut book = AgilityRecordBook::default();
        book.config.venues.add_venue("AKC");
        let incoming = book.config.clone();
        let mut info = String::new();
        let mut cb = AcceptAllActions::default();
        assert!(!book.update(1, &incoming, &mut info, &mut cb));
        assert!(info.is_empty());
    }

    #[test]
    fn name_collection_spans_dogs_and_calendar() {
        let mut book = AgilityRecordBook::default();
        book.config.venues.add_venue("AKC");
        let mut cal = crate::calendar::Calendar::default();
        cal.club = "Cal Club".to_string();
        cal.location = "Fairgrounds".to_string();
        book.calendar.push(cal);
        let mut dog = crate::dog::Dog::default();
        dog.call_name = "Rex".to_string();
        dog.breed = "Border Collie".to_string();
        let mut trial = crate::dog::trial::DogTrial::default();
        trial.location = "Expo Center".to_string();
        trial.clubs.add_club("Trial Club", "AKC");
        dog.trials.add_trial(trial);
        book.dogs.push(dog);

        let clubs = book.all_club_names(false, false);
        assert!(clubs.contains("Cal Club") && clubs.contains("Trial Club"));
        let locations = book.all_trial_locations(false, false);
        assert!(locations.contains("Fairgrounds") && locations.contains("Expo Center"));
        assert!(book.all_call_names().contains("Rex"));
        assert!(book.all_breeds().contains("Border Collie"));
    }
}
