//! Scoring methods: how an event is scored for a division/level over
//! a validity window, and the titling/lifetime/placement point tables
//! hanging off it.

use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

use tracing::warn;

use crate::callbacks::ErrorCallback;
use crate::config::division::ConfigDivisionList;
use crate::config::lifetime_points::ConfigLifetimePointsList;
use crate::config::place_info::ConfigPlaceInfoList;
use crate::config::title_points::ConfigTitlePointsList;
use crate::date::ArbDate;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::ArbVersion;

const SCORING_TYPE_FT: &str = "FaultsThenTime";
const SCORING_TYPE_FT100: &str = "Faults100ThenTime";
const SCORING_TYPE_FT200: &str = "Faults200ThenTime";
const SCORING_TYPE_OCT: &str = "OCScoreThenTime";
const SCORING_TYPE_ST: &str = "ScoreThenTime";
const SCORING_TYPE_TF: &str = "TimePlusFaults";
const SCORING_TYPE_NP: &str = "TimeNoPlaces";
const SCORING_TYPE_PF: &str = "PassFail";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringStyle {
    #[default]
    Unknown,
    FaultsThenTime,
    Faults100ThenTime,
    Faults200ThenTime,
    OCScoreThenTime,
    ScoreThenTime,
    TimePlusFaults,
    TimeNoPlaces,
    PassFail,
}

impl ScoringStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringStyle::Unknown => "Unknown",
            ScoringStyle::FaultsThenTime => SCORING_TYPE_FT,
            ScoringStyle::Faults100ThenTime => SCORING_TYPE_FT100,
            ScoringStyle::Faults200ThenTime => SCORING_TYPE_FT200,
            ScoringStyle::OCScoreThenTime => SCORING_TYPE_OCT,
            ScoringStyle::ScoreThenTime => SCORING_TYPE_ST,
            ScoringStyle::TimePlusFaults => SCORING_TYPE_TF,
            ScoringStyle::TimeNoPlaces => SCORING_TYPE_NP,
            ScoringStyle::PassFail => SCORING_TYPE_PF,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigScoring {
    pub valid_from: ArbDate,
    pub valid_to: ArbDate,
    pub division: String,
    pub level: String,
    pub style: ScoringStyle,
    pub has_table: bool,
    pub has_sub_names: bool,
    pub sub_names: BTreeSet<String>,
    pub drop_fractions: bool,
    /// Qualifying requires a clean (zero-score) run.
    pub clean_q: bool,
    pub time_faults_under: bool,
    pub time_faults_over: bool,
    /// Title points are looked up with raw course faults rather than
    /// the computed score.
    pub titling_points_raw_faults: bool,
    pub subtract_time_faults: bool,
    pub time_fault_multiplier: i16,
    pub note: String,
    pub opening_pts: i16,
    pub closing_pts: i16,
    pub super_q: bool,
    /// Only read from pre-11.0 files; venues define multi-Qs now.
    pub double_q: bool,
    pub speed_pts: bool,
    pub bonus_title_pts: bool,
    pub place_info: ConfigPlaceInfoList,
    pub title_points: ConfigTitlePointsList,
    pub life_points: ConfigLifetimePointsList,
    pub placements: ConfigPlaceInfoList,
}

impl Default for ConfigScoring {
    fn default() -> Self {
        Self {
            valid_from: ArbDate::invalid(),
            valid_to: ArbDate::invalid(),
            division: String::new(),
            level: String::new(),
            style: ScoringStyle::Unknown,
            has_table: false,
            has_sub_names: false,
            sub_names: BTreeSet::new(),
            drop_fractions: false,
            clean_q: false,
            time_faults_under: false,
            time_faults_over: false,
            titling_points_raw_faults: false,
            subtract_time_faults: false,
            time_fault_multiplier: 1,
            note: String::new(),
            opening_pts: 0,
            closing_pts: 0,
            super_q: false,
            double_q: false,
            speed_pts: false,
            bonus_title_pts: false,
            place_info: ConfigPlaceInfoList::default(),
            title_points: ConfigTitlePointsList::default(),
            life_points: ConfigLifetimePointsList::default(),
            placements: ConfigPlaceInfoList::default(),
        }
    }
}

impl ConfigScoring {
    pub fn is_valid_on(&self, date: ArbDate) -> bool {
        !(date.is_valid()
            && ((self.valid_from.is_valid() && date < self.valid_from)
                || (self.valid_to.is_valid() && date > self.valid_to)))
    }

    pub fn load(
        tree: &ElementNode,
        divisions: &ConfigDivisionList,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_SCORING {
            return Err(ArbError::MissingElement(TREE_SCORING.to_string()));
        }
        let mut scoring = Self::default();
        // Version 8.0 briefly called the start of the window "Date".
        if version == ArbVersion::new(8, 0) {
            tree.opt_attrib("Date", &mut scoring.valid_from)?;
        }
        tree.opt_attrib(ATTRIB_SCORING_VALIDFROM, &mut scoring.valid_from)?;
        tree.opt_attrib(ATTRIB_SCORING_VALIDTO, &mut scoring.valid_to)?;
        scoring.division = tree.req_attrib::<String>(ATTRIB_SCORING_DIVISION)?;
        if scoring.division.is_empty() {
            return Err(ArbError::missing(TREE_SCORING, ATTRIB_SCORING_DIVISION));
        }
        scoring.level = tree.req_attrib::<String>(ATTRIB_SCORING_LEVEL)?;
        if scoring.level.is_empty() {
            return Err(ArbError::missing(TREE_SCORING, ATTRIB_SCORING_LEVEL));
        }
        if !divisions.verify_level(&scoring.division, &scoring.level) {
            let msg = format!("invalid level: {}/{}", scoring.division, scoring.level);
            cb.log_message(&msg);
            return Err(ArbError::invalid(TREE_SCORING, ATTRIB_SCORING_LEVEL, &msg));
        }
        let style = tree.req_attrib::<String>(ATTRIB_SCORING_TYPE)?;
        scoring.style = match style.as_str() {
            SCORING_TYPE_FT => ScoringStyle::FaultsThenTime,
            SCORING_TYPE_FT100 => {
                if version <= ArbVersion::new(3, 0) {
                    scoring.drop_fractions = true;
                }
                ScoringStyle::Faults100ThenTime
            }
            SCORING_TYPE_FT200 => ScoringStyle::Faults200ThenTime,
            SCORING_TYPE_OCT => ScoringStyle::OCScoreThenTime,
            SCORING_TYPE_ST => ScoringStyle::ScoreThenTime,
            SCORING_TYPE_TF => ScoringStyle::TimePlusFaults,
            SCORING_TYPE_NP => ScoringStyle::TimeNoPlaces,
            SCORING_TYPE_PF => ScoringStyle::PassFail,
            other => {
                return Err(ArbError::invalid(
                    TREE_SCORING,
                    ATTRIB_SCORING_TYPE,
                    &format!("unknown scoring type: {other}"),
                ))
            }
        };
        tree.opt_attrib(ATTRIB_SCORING_HAS_TABLE, &mut scoring.has_table)?;
        tree.opt_attrib(ATTRIB_SCORING_HASSUBNAMES, &mut scoring.has_sub_names)?;
        // dropFractions arrived in version 4, but reading it from older
        // hand-edited files is harmless.
        tree.opt_attrib(ATTRIB_SCORING_DROPFRACTIONS, &mut scoring.drop_fractions)?;
        tree.opt_attrib(ATTRIB_SCORING_TIMEFAULTS_CLEAN_Q, &mut scoring.clean_q)?;
        tree.opt_attrib(ATTRIB_SCORING_TIMEFAULTS_UNDER, &mut scoring.time_faults_under)?;
        tree.opt_attrib(ATTRIB_SCORING_TIMEFAULTS_OVER, &mut scoring.time_faults_over)?;
        tree.opt_attrib(
            ATTRIB_SCORING_TIMEFAULTS_TITLING_PTS,
            &mut scoring.titling_points_raw_faults,
        )?;
        tree.opt_attrib(
            ATTRIB_SCORING_SUBTRACT_TIMEFAULTS,
            &mut scoring.subtract_time_faults,
        )?;
        tree.opt_attrib(ATTRIB_SCORING_TF_MULTIPLIER, &mut scoring.time_fault_multiplier)?;
        tree.opt_attrib(ATTRIB_SCORING_SUPERQ, &mut scoring.super_q)?;
        if version < ArbVersion::new(11, 0) {
            tree.opt_attrib("doubleQ", &mut scoring.double_q)?;
        }
        tree.opt_attrib(ATTRIB_SCORING_SPEEDPTS, &mut scoring.speed_pts)?;
        tree.opt_attrib(ATTRIB_SCORING_BONUSPTS, &mut scoring.bonus_title_pts)?;
        if version >= ArbVersion::new(5, 0) {
            if version < ArbVersion::new(10, 1) {
                // Speed points were venue-specific "MACH points" once.
                tree.opt_attrib("machPts", &mut scoring.speed_pts)?;
            }
            if scoring.speed_pts && version < ArbVersion::new(12, 3) {
                scoring.place_info.add(1, 2.0, true);
                scoring.place_info.add(2, 1.5, true);
            }
            tree.opt_attrib(ATTRIB_SCORING_OPENINGPTS, &mut scoring.opening_pts)?;
            tree.opt_attrib(ATTRIB_SCORING_CLOSINGPTS, &mut scoring.closing_pts)?;
            for element in tree.nodes() {
                match element.name() {
                    TREE_NOTE => scoring.note = element.value(),
                    TREE_PLACE_INFO => {
                        scoring.place_info.load(element, cb)?;
                    }
                    TREE_TITLE_POINTS => {
                        scoring
                            .title_points
                            .load(element, version, cb, &mut scoring.life_points)?;
                    }
                    TREE_LIFETIME_POINTS | TREE_LIFETIME_POINTS_LEGACY => {
                        if version >= ArbVersion::new(10, 0) {
                            scoring.life_points.load(element, version, cb)?;
                        }
                    }
                    TREE_PLACEMENTS => {
                        for place in element.nodes() {
                            if place.name() == TREE_PLACE_INFO {
                                scoring.placements.load(place, cb)?;
                            }
                        }
                    }
                    TREE_SCORING_SUBNAME => {
                        scoring.sub_names.insert(element.value());
                    }
                    _ => {}
                }
            }
            scoring.title_points.sort();
            scoring.life_points.sort();
            scoring.placements.sort();
        } else {
            // Migrate pre-5 files: fixed clean/faulted point pairs.
            let pts_when_clean = tree.req_attrib::<i16>("Clean")?;
            if pts_when_clean > 0 {
                scoring.title_points.add(f64::from(pts_when_clean), 0.0);
            }
            let mut faults_allowed: i16 = 0;
            let mut pts_when_not_clean: i16 = 0;
            tree.opt_attrib("FaultsAllowed", &mut faults_allowed)?;
            tree.opt_attrib("WithFaults", &mut pts_when_not_clean)?;
            if faults_allowed > 0 && pts_when_not_clean > 0 {
                scoring
                    .title_points
                    .add(f64::from(pts_when_not_clean), f64::from(faults_allowed));
            }
            if version >= ArbVersion::new(3, 0) {
                scoring.note = tree.value();
            }
        }
        Ok(scoring)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_SCORING);
        if self.valid_from.is_valid() {
            node.add_attrib_date(ATTRIB_SCORING_VALIDFROM, self.valid_from);
        }
        if self.valid_to.is_valid() {
            node.add_attrib_date(ATTRIB_SCORING_VALIDTO, self.valid_to);
        }
        node.add_attrib(ATTRIB_SCORING_DIVISION, self.division.clone());
        node.add_attrib(ATTRIB_SCORING_LEVEL, self.level.clone());
        if self.style == ScoringStyle::Unknown {
            warn!(division = %self.division, level = %self.level, "scoring method has no style");
        } else {
            node.add_attrib(ATTRIB_SCORING_TYPE, self.style.as_str());
        }
        if self.has_table {
            node.add_attrib_bool(ATTRIB_SCORING_HAS_TABLE, self.has_table);
        }
        if self.has_sub_names {
            node.add_attrib_bool(ATTRIB_SCORING_HASSUBNAMES, self.has_sub_names);
            for name in &self.sub_names {
                if !name.is_empty() {
                    let sub = node.add_element_node(TREE_SCORING_SUBNAME);
                    sub.set_value(name.clone());
                }
            }
        }
        if self.drop_fractions {
            node.add_attrib_bool(ATTRIB_SCORING_DROPFRACTIONS, self.drop_fractions);
        }
        if self.clean_q {
            node.add_attrib_bool(ATTRIB_SCORING_TIMEFAULTS_CLEAN_Q, self.clean_q);
        }
        if self.time_faults_under {
            node.add_attrib_bool(ATTRIB_SCORING_TIMEFAULTS_UNDER, self.time_faults_under);
        }
        if self.time_faults_over {
            node.add_attrib_bool(ATTRIB_SCORING_TIMEFAULTS_OVER, self.time_faults_over);
        }
        if self.titling_points_raw_faults {
            node.add_attrib_bool(
                ATTRIB_SCORING_TIMEFAULTS_TITLING_PTS,
                self.titling_points_raw_faults,
            );
        }
        if self.subtract_time_faults {
            node.add_attrib_bool(ATTRIB_SCORING_SUBTRACT_TIMEFAULTS, self.subtract_time_faults);
        }
        // A multiplier of 1 stays implicit so existing files don't all
        // show up as changed.
        if self.time_fault_multiplier >= 0 && self.time_fault_multiplier != 1 {
            node.add_attrib_short(ATTRIB_SCORING_TF_MULTIPLIER, self.time_fault_multiplier);
        }
        if !self.note.is_empty() {
            let note = node.add_element_node(TREE_NOTE);
            note.set_value(self.note.clone());
        }
        if self.opening_pts > 0 {
            node.add_attrib_short(ATTRIB_SCORING_OPENINGPTS, self.opening_pts);
        }
        if self.closing_pts > 0 {
            node.add_attrib_short(ATTRIB_SCORING_CLOSINGPTS, self.closing_pts);
        }
        if self.super_q {
            node.add_attrib_bool(ATTRIB_SCORING_SUPERQ, self.super_q);
        }
        if self.speed_pts {
            node.add_attrib_bool(ATTRIB_SCORING_SPEEDPTS, self.speed_pts);
        }
        if self.bonus_title_pts {
            node.add_attrib_bool(ATTRIB_SCORING_BONUSPTS, self.bonus_title_pts);
        }
        if self.speed_pts {
            self.place_info.save(node);
        }
        self.title_points.save(node);
        self.life_points.save(node);
        if !self.placements.is_empty() {
            let place = node.add_element_node(TREE_PLACEMENTS);
            self.placements.save(place);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigScoringList(pub Vec<ConfigScoring>);

impl Deref for ConfigScoringList {
    type Target = Vec<ConfigScoring>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigScoringList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ConfigScoringList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        divisions: &ConfigDivisionList,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0.push(ConfigScoring::load(tree, divisions, version, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    /// All methods valid for the division/level on a date, with
    /// wildcard fallbacks. An invalid date matches every window, so
    /// the fallbacks also run unconditionally then; otherwise they
    /// only run while nothing matched.
    pub fn find_all_events(
        &self,
        division: &str,
        level: &str,
        date: ArbDate,
        title_points_only: bool,
    ) -> Vec<&ConfigScoring> {
        let mut found: Vec<&ConfigScoring> = Vec::new();
        for scoring in &self.0 {
            if (scoring.division == division
                || scoring.division == WILDCARD_DIVISION
                || division == WILDCARD_DIVISION)
                && (scoring.level == level
                    || scoring.level == WILDCARD_LEVEL
                    || level == WILDCARD_LEVEL)
                && scoring.is_valid_on(date)
            {
                found.push(scoring);
            }
        }
        let fallbacks: [(&str, &str); 3] = [
            (division, WILDCARD_LEVEL),
            (WILDCARD_DIVISION, level),
            (WILDCARD_DIVISION, WILDCARD_LEVEL),
        ];
        for (want_div, want_level) in fallbacks {
            if date.is_valid() && !found.is_empty() {
                break;
            }
            for scoring in &self.0 {
                if scoring.division == want_div
                    && scoring.level == want_level
                    && scoring.is_valid_on(date)
                {
                    if !found.iter().any(|s| std::ptr::eq(*s, scoring)) {
                        found.push(scoring);
                    }
                    break;
                }
            }
        }
        if title_points_only {
            found.retain(|s| !s.title_points.is_empty() || !s.life_points.is_empty());
        }
        found
    }

    /// The single best method for a division/level/date. With a valid
    /// date more than one non-wildcard match means the configuration
    /// has overlapping windows; the first wins.
    pub fn find_event(
        &self,
        division: &str,
        level: &str,
        date: ArbDate,
    ) -> Option<&ConfigScoring> {
        let mut items = self.find_all_events(division, level, date, false);
        if items.is_empty() {
            return None;
        }
        if items.len() > 1 {
            items.retain(|s| s.is_valid_on(date));
            if date.is_valid() {
                let wildcards = items
                    .iter()
                    .filter(|s| s.division == WILDCARD_DIVISION || s.level == WILDCARD_LEVEL)
                    .count();
                if items.len() - wildcards > 1 {
                    warn!("FindEvent: Overlapping date ranges");
                }
            }
        }
        items.first().copied()
    }

    pub fn verify_event(&self, division: &str, level: &str, date: ArbDate) -> bool {
        !self.find_all_events(division, level, date, false).is_empty()
    }

    pub fn add_scoring(&mut self) -> &mut ConfigScoring {
        self.0.push(ConfigScoring {
            division: WILDCARD_DIVISION.to_string(),
            level: WILDCARD_LEVEL.to_string(),
            style: ScoringStyle::FaultsThenTime,
            ..ConfigScoring::default()
        });
        // Just pushed, cannot be empty.
        let last = self.0.len() - 1;
        &mut self.0[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoring(div: &str, level: &str, from: ArbDate, to: ArbDate) -> ConfigScoring {
        ConfigScoring {
            division: div.to_string(),
            level: level.to_string(),
            style: ScoringStyle::FaultsThenTime,
            valid_from: from,
            valid_to: to,
            ..ConfigScoring::default()
        }
    }

    fn list(items: Vec<ConfigScoring>) -> ConfigScoringList {
        ConfigScoringList(items)
    }

    #[test]
    fn exact_match_wins_over_wildcard() {
        let l = list(vec![
            scoring("Open", "Novice", ArbDate::invalid(), ArbDate::invalid()),
            scoring(WILDCARD_DIVISION, WILDCARD_LEVEL, ArbDate::invalid(), ArbDate::invalid()),
        ]);
        let found = l.find_event("Open", "Novice", ArbDate::new(2024, 1, 1));
        assert_eq!(found.map(|s| s.division.as_str()), Some("Open"));
    }

    #[test]
    fn wildcard_fallback_applies_when_nothing_matches() {
        let l = list(vec![
            scoring("Open", WILDCARD_LEVEL, ArbDate::invalid(), ArbDate::invalid()),
        ]);
        assert!(l.verify_event("Open", "Novice", ArbDate::new(2024, 1, 1)));
        assert!(!l.verify_event("Regular", "Novice", ArbDate::new(2024, 1, 1)));
    }

    #[test]
    fn date_window_selects_the_method() {
        let l = list(vec![
            scoring("Open", "Novice", ArbDate::invalid(), ArbDate::new(2019, 12, 31)),
            scoring("Open", "Novice", ArbDate::new(2020, 1, 1), ArbDate::invalid()),
        ]);
        let old = l.find_event("Open", "Novice", ArbDate::new(2019, 6, 1)).unwrap();
        assert_eq!(old.valid_to, ArbDate::new(2019, 12, 31));
        let new = l.find_event("Open", "Novice", ArbDate::new(2021, 6, 1)).unwrap();
        assert_eq!(new.valid_from, ArbDate::new(2020, 1, 1));
    }

    #[test]
    fn invalid_date_returns_all_windows() {
        let l = list(vec![
            scoring("Open", "Novice", ArbDate::invalid(), ArbDate::new(2019, 12, 31)),
            scoring("Open", "Novice", ArbDate::new(2020, 1, 1), ArbDate::invalid()),
        ]);
        let all = l.find_all_events("Open", "Novice", ArbDate::invalid(), false);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn title_points_filter_drops_empty_tables() {
        let mut with_points = scoring("Open", "Novice", ArbDate::invalid(), ArbDate::invalid());
        with_points.title_points.add(5.0, 0.0);
        let without = scoring("Open", "Masters", ArbDate::invalid(), ArbDate::invalid());
        let l = list(vec![with_points, without]);
        assert_eq!(
            l.find_all_events("Open", "Novice", ArbDate::invalid(), true).len(),
            1
        );
        assert!(l
            .find_all_events("Open", "Masters", ArbDate::invalid(), true)
            .is_empty());
    }
}
