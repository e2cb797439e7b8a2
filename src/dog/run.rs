//! A single run at a trial, and the scoring engine that turns its raw
//! numbers into title/lifetime/speed points.

use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::config::scoring::{ConfigScoring, ScoringStyle};
use crate::config::title_points::TitlePointsContext;
use crate::config::Config;
use crate::date::ArbDate;
use crate::dog::club::{DogClub, DogClubList};
use crate::dog::notes::DogNotes;
use crate::dog::other_points::DogRunOtherPointsList;
use crate::dog::partner::DogRunPartnerList;
use crate::dog::reference_run::DogReferenceRunList;
use crate::dog::run_scoring::{DogRunScoring, RunScoringType};
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::{arb_double, ArbVersion, Lookup, Q};

#[derive(Debug, Clone)]
pub struct DogRun {
    pub date: ArbDate,
    /// Index into the owning trial's club list. Zero (the primary
    /// club) unless the run was entered under a co-sanctioning club.
    pub club_index: usize,
    pub division: String,
    pub level: String,
    pub height: String,
    pub event: String,
    pub sub_name: String,
    pub at_home: bool,
    pub conditions: String,
    pub judge: String,
    pub handler: String,
    pub partners: DogRunPartnerList,
    pub scoring: DogRunScoring,
    pub q: Q,
    pub place: i16,
    /// Dogs in class; -1 means not recorded.
    pub in_class: i16,
    /// Dogs that qualified; -1 means not recorded.
    pub dogs_qd: i16,
    pub other_points: DogRunOtherPointsList,
    pub notes: DogNotes,
    pub ref_runs: DogReferenceRunList,
    pub links: BTreeSet<String>,
    /// Names of the multiple-Q combinations this run satisfies.
    /// Recomputed by the owning trial, never persisted.
    pub multiqs: BTreeSet<String>,
}

impl Default for DogRun {
    fn default() -> Self {
        Self {
            date: ArbDate::invalid(),
            club_index: 0,
            division: String::new(),
            level: String::new(),
            height: String::new(),
            event: String::new(),
            sub_name: String::new(),
            at_home: false,
            conditions: String::new(),
            judge: String::new(),
            handler: String::new(),
            partners: DogRunPartnerList::default(),
            scoring: DogRunScoring::default(),
            q: Q::Unk,
            place: 0,
            in_class: -1,
            dogs_qd: -1,
            other_points: DogRunOtherPointsList::default(),
            notes: DogNotes::default(),
            ref_runs: DogReferenceRunList::default(),
            links: BTreeSet::new(),
            multiqs: BTreeSet::new(),
        }
    }
}

// The multi-Q association is derived state, not data.
impl PartialEq for DogRun {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
            && self.club_index == other.club_index
            && self.division == other.division
            && self.level == other.level
            && self.height == other.height
            && self.event == other.event
            && self.sub_name == other.sub_name
            && self.at_home == other.at_home
            && self.conditions == other.conditions
            && self.judge == other.judge
            && self.handler == other.handler
            && self.partners == other.partners
            && self.scoring == other.scoring
            && self.q == other.q
            && self.place == other.place
            && self.in_class == other.in_class
            && self.dogs_qd == other.dogs_qd
            && self.other_points == other.other_points
            && self.notes == other.notes
            && self.ref_runs == other.ref_runs
            && self.links == other.links
    }
}

impl DogRun {
    /// "Division Level Event[ SubName]".
    pub fn name(&self) -> String {
        let mut name = format!("{} {} {}", self.division, self.level, self.event);
        if !self.sub_name.is_empty() {
            name.push(' ');
            name.push_str(&self.sub_name);
        }
        name
    }

    pub fn generic_name(&self) -> String {
        if self.sub_name.is_empty() {
            format!("{} {}", self.date.iso(), self.name())
        } else {
            format!("{} {} {}", self.division, self.level, self.sub_name)
        }
    }

    /// The club the run was entered under.
    pub fn club<'a>(&self, clubs: &'a DogClubList) -> Option<&'a DogClub> {
        clubs.get(self.club_index)
    }

    pub fn load(
        tree: &ElementNode,
        config: &Config,
        clubs: &DogClubList,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_RUN {
            return Err(ArbError::MissingElement(TREE_RUN.to_string()));
        }
        let mut run = Self::default();
        match tree.attrib::<ArbDate>(ATTRIB_RUN_DATE) {
            Lookup::Found(date) => run.date = date,
            Lookup::NotFound => {
                let err = ArbError::missing(TREE_RUN, ATTRIB_RUN_DATE);
                cb.log_message(&err.to_string());
                return Err(err);
            }
            Lookup::Invalid => {
                let raw = tree.raw_attrib(ATTRIB_RUN_DATE).unwrap_or("");
                let err = ArbError::invalid_date(TREE_RUN, ATTRIB_RUN_DATE, raw);
                cb.log_message(&err.to_string());
                return Err(err);
            }
        }

        let mut club_index: i16 = 0;
        let club_lookup = if version >= ArbVersion::new(15, 0) {
            tree.attrib::<i16>(ATTRIB_RUN_CLUB)
        } else {
            Lookup::NotFound
        };
        match club_lookup {
            Lookup::Found(idx) => club_index = idx,
            Lookup::NotFound => {}
            Lookup::Invalid => club_index = -1,
        }
        if club_index < 0 || club_index as usize >= clubs.len() {
            let err = ArbError::invalid(
                TREE_RUN,
                ATTRIB_RUN_CLUB,
                format!("club index {club_index} is out of range"),
            );
            cb.log_message(&err.to_string());
            return Err(err);
        }
        run.club_index = club_index as usize;

        run.division = tree.req_attrib::<String>(ATTRIB_RUN_DIVISION)?;
        if run.division.is_empty() {
            let err = ArbError::missing(TREE_RUN, ATTRIB_RUN_DIVISION);
            cb.log_message(&err.to_string());
            return Err(err);
        }
        run.level = tree.req_attrib::<String>(ATTRIB_RUN_LEVEL)?;
        if run.level.is_empty() {
            let err = ArbError::missing(TREE_RUN, ATTRIB_RUN_LEVEL);
            cb.log_message(&err.to_string());
            return Err(err);
        }
        // Height stopped being required in 8.1.
        tree.opt_attrib(ATTRIB_RUN_HEIGHT, &mut run.height)?;
        tree.opt_attrib(ATTRIB_RUN_EVENT, &mut run.event)?;
        if run.event.is_empty() {
            // A v3.3.3 release could drop the event name on FCAT runs.
            if version < ArbVersion::new(15, 0)
                && run.division == "FCAT"
                && run.level == "FCAT"
            {
                run.event = "FCAT".to_string();
            } else {
                let err = ArbError::missing(TREE_RUN, ATTRIB_RUN_EVENT);
                cb.log_message(&err.to_string());
                return Err(err);
            }
        }
        tree.opt_attrib(ATTRIB_RUN_SUBNAME, &mut run.sub_name)?;
        tree.opt_attrib(ATTRIB_RUN_ATHOME, &mut run.at_home)?;

        // The first club whose venue knows the event wins, so club
        // order matters.
        let (event, event_scoring) =
            clubs.find_event(config, &run.event, &run.division, &run.level, run.date, cb)?;

        for element in tree.nodes() {
            let name = element.name();
            if name == TREE_CONDITIONS {
                run.conditions = element.value();
            } else if name == TREE_JUDGE {
                run.judge = element.value();
            } else if name == TREE_HANDLER {
                run.handler = element.value();
            } else if name == TREE_PARTNER {
                // A bad partner doesn't lose the run.
                let _ = run.partners.load(element, version, cb);
            } else if name == TREE_BY_TIME
                || name == TREE_BY_OPENCLOSE
                || name == TREE_BY_POINTS
                || name == TREE_BY_SPEED
                || name == TREE_BY_PASS
            {
                if let Ok(Some(scoring)) = DogRunScoring::load(
                    config.version,
                    event,
                    event_scoring,
                    element,
                    version,
                    cb,
                ) {
                    run.scoring = scoring;
                }
            } else if name == TREE_PLACEMENT {
                if let Some(attrib) = element.raw_attrib(ATTRIB_PLACEMENT_Q) {
                    match Q::parse(attrib) {
                        Some(q) => run.q = q,
                        None => {
                            let err = ArbError::invalid(
                                TREE_PLACEMENT,
                                ATTRIB_PLACEMENT_Q,
                                format!("unknown Q '{attrib}'"),
                            );
                            cb.log_message(&err.to_string());
                        }
                    }
                }
                element.opt_attrib(ATTRIB_PLACEMENT_PLACE, &mut run.place)?;
                element.opt_attrib(ATTRIB_PLACEMENT_INCLASS, &mut run.in_class)?;
                element.opt_attrib(ATTRIB_PLACEMENT_DOGSQD, &mut run.dogs_qd)?;
                for sub in element.nodes() {
                    if sub.name() == TREE_PLACEMENT_OTHERPOINTS {
                        let _ = run.other_points.load(sub, config, version, cb);
                    }
                }
            } else if name == TREE_NOTES {
                let _ = run.notes.load(element, version, cb);
            } else if name == TREE_REF_RUN {
                let _ = run.ref_runs.load(element, version, cb);
            } else if name == TREE_RUN_LINK {
                run.links.insert(element.value());
            }
        }

        // Strip fields the v3.3.x releases recorded on FCAT runs by
        // mistake.
        if version < ArbVersion::new(15, 1) && run.division == "FCAT" && run.level == "FCAT" {
            run.height.clear();
            run.judge.clear();
            run.handler.clear();
            run.in_class = -1;
            run.dogs_qd = -1;
        }
        Ok(run)
    }

    /// `clubs` is the owning trial's club list; pass `None` when
    /// saving a detached run (clipboard copies), which skips the club
    /// index and the computed placement points.
    pub fn save(&self, parent: &mut ElementNode, clubs: Option<&DogClubList>, config: &Config) {
        let node = parent.add_element_node(TREE_RUN);
        node.add_attrib_date(ATTRIB_RUN_DATE, self.date);
        if clubs.is_some() && self.club_index > 0 {
            node.add_attrib_short(ATTRIB_RUN_CLUB, self.club_index as i16);
        }
        node.add_attrib(ATTRIB_RUN_DIVISION, self.division.clone());
        node.add_attrib(ATTRIB_RUN_LEVEL, self.level.clone());
        node.add_attrib(ATTRIB_RUN_HEIGHT, self.height.clone());
        node.add_attrib(ATTRIB_RUN_EVENT, self.event.clone());
        if !self.sub_name.is_empty() {
            node.add_attrib(ATTRIB_RUN_SUBNAME, self.sub_name.clone());
        }
        if self.at_home {
            node.add_attrib_bool(ATTRIB_RUN_ATHOME, self.at_home);
        }
        if !self.conditions.is_empty() {
            let element = node.add_element_node(TREE_CONDITIONS);
            element.set_value(self.conditions.clone());
        }
        if !self.judge.is_empty() {
            let element = node.add_element_node(TREE_JUDGE);
            element.set_value(self.judge.clone());
        }
        if !self.handler.is_empty() {
            let element = node.add_element_node(TREE_HANDLER);
            element.set_value(self.handler.clone());
        }
        self.partners.save(node);
        self.scoring.save(node);

        if self.place > 0 || self.q != Q::Unk {
            let placement = node.add_element_node(TREE_PLACEMENT);
            placement.add_attrib(ATTRIB_PLACEMENT_Q, self.q.as_str());
            placement.add_attrib_short(ATTRIB_PLACEMENT_PLACE, self.place);
            if self.in_class >= 0 {
                placement.add_attrib_short(ATTRIB_PLACEMENT_INCLASS, self.in_class);
            }
            if self.dogs_qd >= 0 {
                placement.add_attrib_short(ATTRIB_PLACEMENT_DOGSQD, self.dogs_qd);
            }

            // Computed points, written for other programs to consume.
            if let Some(clubs) = clubs {
                let scoring = self.club(clubs).and_then(|club| {
                    config
                        .venues
                        .find_event(&club.venue, &self.event, &self.division, &self.level, self.date)
                        .map(|(_, s)| s)
                });
                if let Some(scoring) = scoring {
                    placement.add_attrib_double(
                        ATTRIB_PLACEMENT_SCORE_PTS,
                        self.score(scoring),
                        2,
                    );
                    if self.q.qualified() {
                        let (title_pts, _) =
                            self.title_points(scoring, self.club(clubs));
                        placement.add_attrib_double(ATTRIB_PLACEMENT_TITLE_PTS, title_pts, 2);
                        if scoring.speed_pts {
                            placement.add_attrib_short(
                                ATTRIB_PLACEMENT_SPEED_PTS,
                                self.speed_points(scoring),
                            );
                        }
                    }
                }
            }

            self.other_points.save(placement);
        }

        self.notes.save(node);
        self.ref_runs.save(node);
        for link in &self.links {
            if !link.is_empty() {
                let element = node.add_element_node(TREE_RUN_LINK);
                element.set_value(link.clone());
            }
        }
    }

    pub fn num_other_points_in_use(&self, name: &str) -> usize {
        self.other_points.iter().filter(|p| p.name == name).count()
    }

    pub fn rename_other_points(&mut self, old_name: &str, new_name: &str) -> usize {
        let mut count = 0;
        for p in self.other_points.iter_mut() {
            if p.name == old_name {
                count += 1;
                p.name = new_name.to_string();
            }
        }
        count
    }

    pub fn delete_other_points(&mut self, name: &str) -> usize {
        let before = self.other_points.len();
        self.other_points.retain(|p| p.name != name);
        before - self.other_points.len()
    }

    /// The raw competition score under the given scoring method.
    pub fn score(&self, scoring: &ConfigScoring) -> f64 {
        match self.scoring.scoring_type {
            RunScoringType::ByTime | RunScoringType::BySpeed => {
                let mut pts = f64::from(self.scoring.course_faults)
                    + self.scoring.time_faults(Some(scoring));
                match scoring.style {
                    ScoringStyle::TimePlusFaults => pts += self.scoring.time,
                    ScoringStyle::Faults100ThenTime => pts = (100.0 - pts).max(0.0),
                    ScoringStyle::Faults200ThenTime => pts = (200.0 - pts).max(0.0),
                    _ => {}
                }
                pts
            }
            RunScoringType::ByOpenClose => {
                let mut pts = f64::from(
                    self.scoring.open_pts + self.scoring.close_pts - self.scoring.course_faults,
                );
                if scoring.subtract_time_faults {
                    pts -= self.scoring.time_faults(Some(scoring));
                }
                pts
            }
            RunScoringType::ByPoints => {
                let mut pts =
                    f64::from(self.scoring.open_pts - self.scoring.course_faults);
                if scoring.subtract_time_faults {
                    pts -= self.scoring.time_faults(Some(scoring));
                }
                pts
            }
            RunScoringType::ByPass | RunScoringType::Unknown => 0.0,
        }
    }

    fn is_tourney(&self, club: Option<&DogClub>) -> bool {
        club.map_or(false, |c| c.venue == "USDAA" && self.level == "Tournament")
    }

    fn points_context(&self, faults: f64, club: Option<&DogClub>) -> TitlePointsContext {
        TitlePointsContext {
            faults,
            time: self.scoring.time,
            sct: self.scoring.sct,
            place: self.place,
            in_class: self.in_class,
            date: self.date,
            is_tourney: self.is_tourney(club),
            is_at_home: self.at_home,
        }
    }

    /// Whether the run's open/close points meet the requirement. A
    /// gamble with no closing requirement counts combined points so
    /// USDAA tournament gambles title correctly.
    fn open_close_met(&self) -> bool {
        (self.scoring.need_open_pts <= self.scoring.open_pts
            && self.scoring.need_close_pts <= self.scoring.close_pts)
            || (self.scoring.need_close_pts == 0
                && self.scoring.need_open_pts <= self.scoring.open_pts + self.scoring.close_pts)
    }

    /// Time faults counted toward titling on point-style runs. When
    /// they would be subtracted from a score that still meets the
    /// requirement, they are forgiven rather than counted twice.
    fn titling_time_faults(&self, scoring: &ConfigScoring, needed: i16) -> f64 {
        let mut time_faults = 0.0;
        if scoring.time_faults_under || scoring.time_faults_over {
            time_faults = self.scoring.time_faults(Some(scoring));
            if time_faults > 0.0
                && scoring.subtract_time_faults
                && f64::from(needed) <= self.score(scoring)
            {
                time_faults = 0.0;
            }
        }
        time_faults
    }

    /// Title points for a qualifying run, and whether it was clean.
    pub fn title_points(&self, scoring: &ConfigScoring, club: Option<&DogClub>) -> (f64, bool) {
        let mut pts = 0.0;
        let mut clean = false;
        let bonus = if scoring.bonus_title_pts {
            self.scoring.bonus_title_pts
        } else {
            0.0
        };
        match self.scoring.scoring_type {
            RunScoringType::Unknown => {}
            RunScoringType::ByTime | RunScoringType::BySpeed => {
                let mut score = f64::from(self.scoring.course_faults)
                    + self.scoring.time_faults(Some(scoring));
                if arb_double::equal(score, 0.0) {
                    clean = true;
                }
                if scoring.style == ScoringStyle::TimePlusFaults {
                    if !(scoring.clean_q && score > 0.0) {
                        // Fold total time over SCT into the faults so a
                        // fixed time-fault allowance works. SCT of 0
                        // leaves the faults alone.
                        if self.scoring.sct > 0.0 {
                            score += self.scoring.time;
                            score -= self.scoring.sct;
                            if score < 0.0 {
                                score = 0.0;
                            }
                        }
                        let mut compute = true;
                        if scoring.titling_points_raw_faults {
                            score = f64::from(self.scoring.course_faults)
                                + self.scoring.time_faults(Some(scoring));
                            // Raw-fault titling implies the run must be
                            // under course time.
                            if self.scoring.time + score > self.scoring.sct {
                                compute = false;
                            }
                        }
                        if compute {
                            pts = scoring
                                .title_points
                                .get_title_points(&self.points_context(score, club))
                                + bonus;
                        }
                    }
                } else {
                    pts = scoring
                        .title_points
                        .get_title_points(&self.points_context(score, club))
                        + bonus;
                }
            }
            RunScoringType::ByOpenClose => {
                if self.open_close_met() {
                    let time_faults = self.titling_time_faults(
                        scoring,
                        self.scoring.need_open_pts + self.scoring.need_close_pts,
                    );
                    clean = true;
                    pts = scoring
                        .title_points
                        .get_title_points(&self.points_context(time_faults, club))
                        + bonus;
                }
            }
            RunScoringType::ByPoints => {
                if self.scoring.need_open_pts <= self.scoring.open_pts {
                    let time_faults =
                        self.titling_time_faults(scoring, self.scoring.need_open_pts);
                    clean = true;
                    pts = scoring
                        .title_points
                        .get_title_points(&self.points_context(time_faults, club))
                        + bonus;
                }
            }
            RunScoringType::ByPass => {
                if self.q.qualified() {
                    pts = scoring
                        .title_points
                        .get_title_points(&self.points_context(0.0, club));
                }
            }
        }
        (pts, clean)
    }

    /// Lifetime points toward a named track. Follows the title-point
    /// branching, except a passing ByPass run does collect the bonus
    /// here.
    pub fn lifetime_points(&self, scoring: &ConfigScoring, lifetime_name: &str) -> f64 {
        let bonus = if scoring.bonus_title_pts {
            self.scoring.bonus_title_pts
        } else {
            0.0
        };
        let speed = self.speed_points(scoring);
        match self.scoring.scoring_type {
            RunScoringType::Unknown => 0.0,
            RunScoringType::ByTime | RunScoringType::BySpeed => {
                let mut score = f64::from(self.scoring.course_faults)
                    + self.scoring.time_faults(Some(scoring));
                if scoring.style == ScoringStyle::TimePlusFaults {
                    if scoring.clean_q && score > 0.0 {
                        return 0.0;
                    }
                    if self.scoring.sct > 0.0 {
                        score += self.scoring.time;
                        score -= self.scoring.sct;
                        if score < 0.0 {
                            score = 0.0;
                        }
                    }
                }
                scoring
                    .life_points
                    .get_lifetime_points(lifetime_name, score, speed)
                    + bonus
            }
            RunScoringType::ByOpenClose => {
                if !self.open_close_met() {
                    return 0.0;
                }
                let time_faults = self.titling_time_faults(
                    scoring,
                    self.scoring.need_open_pts + self.scoring.need_close_pts,
                );
                scoring
                    .life_points
                    .get_lifetime_points(lifetime_name, time_faults, speed)
                    + bonus
            }
            RunScoringType::ByPoints => {
                if self.scoring.need_open_pts > self.scoring.open_pts {
                    return 0.0;
                }
                let time_faults =
                    self.titling_time_faults(scoring, self.scoring.need_open_pts);
                scoring
                    .life_points
                    .get_lifetime_points(lifetime_name, time_faults, speed)
                    + bonus
            }
            RunScoringType::ByPass => {
                if !self.q.qualified() {
                    return 0.0;
                }
                scoring
                    .life_points
                    .get_lifetime_points(lifetime_name, 0.0, speed)
                    + bonus
            }
        }
    }

    /// Speed points: whole seconds under course time, scaled by the
    /// place multiplier when one is configured.
    pub fn speed_points(&self, scoring: &ConfigScoring) -> i16 {
        if !scoring.speed_pts || !self.q.qualified() {
            return 0;
        }
        let time = self.scoring.time;
        let sct = self.scoring.sct;
        if time <= 0.0 || sct <= 0.0 {
            return 0;
        }
        let mut pts = (sct - time) as i16;
        if pts < 0 {
            pts = 0;
        }
        if self.place > 0 {
            // Place 0 is the "everything else" multiplier.
            if let Some(mult) = scoring
                .place_info
                .get_value(self.place)
                .or_else(|| scoring.place_info.get_value(0))
            {
                pts = (f64::from(pts) * mult) as i16;
            }
        }
        pts
    }

    pub fn placement_points(&self, scoring: &ConfigScoring) -> f64 {
        scoring.placements.get_value(self.place).unwrap_or(0.0)
    }

    pub fn clear_multiqs(&mut self) {
        self.multiqs.clear();
    }

    pub fn add_multiq(&mut self, name: &str) {
        self.multiqs.insert(name.to_string());
    }

    pub fn has_link(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    pub fn add_link(&mut self, link: &str) {
        self.links.insert(link.to_string());
    }

    pub fn remove_link(&mut self, link: &str) {
        self.links.remove(link);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogRunList(pub Vec<DogRun>);

impl Deref for DogRunList {
    type Target = Vec<DogRun>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DogRunList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl DogRunList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        config: &Config,
        clubs: &DogClubList,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0.push(DogRun::load(tree, config, clubs, version, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode, clubs: &DogClubList, config: &Config) {
        for item in &self.0 {
            item.save(parent, Some(clubs), config);
        }
    }

    pub fn sort(&mut self) {
        if self.0.len() < 2 {
            return;
        }
        self.0.sort_by_key(|r| r.date);
    }

    pub fn start_date(&self) -> ArbDate {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => first.date.min(last.date),
            _ => ArbDate::invalid(),
        }
    }

    pub fn end_date(&self) -> ArbDate {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => first.date.max(last.date),
            _ => ArbDate::invalid(),
        }
    }

    pub fn add_run(&mut self, run: DogRun) {
        self.0.push(run);
    }

    pub fn delete_run(&mut self, run: &DogRun) -> bool {
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
    use crate::config::event::ConfigEvent;

    fn config() -> Config {
        let mut config = Config::default();
        config.version = 3;
        let venue = config.venues.add_venue("AKC").unwrap();
        let div = venue.divisions.add_division("Regular").unwrap();
        div.levels.add_level("Excellent");
        let mut event = ConfigEvent {
            name: "Standard".to_string(),
            ..ConfigEvent::default()
        };
        let s = event.scorings.add_scoring();
        s.division = WILDCARD_DIVISION.to_string();
        s.level = WILDCARD_LEVEL.to_string();
        s.style = ScoringStyle::FaultsThenTime;
        s.title_points.add(5.0, 0.0);
        s.title_points.add(3.0, 5.0);
        venue.events.add_event(event);
        config
    }

    fn clubs() -> DogClubList {
        let mut clubs = DogClubList::default();
        clubs.add_club("Sample Club", "AKC");
        clubs
    }

    fn run_tree() -> ElementNode {
        let mut tree = ElementNode::new(TREE_RUN);
        tree.add_attrib(ATTRIB_RUN_DATE, "2023-10-14");
        tree.add_attrib(ATTRIB_RUN_DIVISION, "Regular");
        tree.add_attrib(ATTRIB_RUN_LEVEL, "Excellent");
        tree.add_attrib(ATTRIB_RUN_EVENT, "Standard");
        tree
    }

    #[test]
    fn load_requires_a_resolvable_event() {
        let mut tree = run_tree();
        tree.add_attrib(ATTRIB_RUN_EVENT, "Rally");
        let mut log = ErrorLog::new();
        let result = DogRun::load(&tree, &config(), &clubs(), ArbVersion::new(15, 3), &mut log);
        assert!(result.is_err());
        assert!(log.messages.contains("Rally"));
    }

    #[test]
    fn club_index_out_of_range_is_fatal() {
        let mut tree = run_tree();
        tree.add_attrib(ATTRIB_RUN_CLUB, "2");
        let mut log = ErrorLog::new();
        let result = DogRun::load(&tree, &config(), &clubs(), ArbVersion::new(15, 3), &mut log);
        assert!(result.is_err());

        // Pre-15.0 files never carry the attribute; it is ignored.
        let result = DogRun::load(&tree, &config(), &clubs(), ArbVersion::new(14, 5), &mut log);
        assert!(result.is_ok());
    }

    #[test]
    fn fcat_runs_are_repaired() {
        let mut config = config();
        let venue = config.venues.find_venue_mut("AKC").unwrap();
        let div = venue.divisions.add_division("FCAT").unwrap();
        div.levels.add_level("FCAT");
        let mut event = ConfigEvent {
            name: "FCAT".to_string(),
            ..ConfigEvent::default()
        };
        let s = event.scorings.add_scoring();
        s.division = "FCAT".to_string();
        s.level = "FCAT".to_string();
        s.style = ScoringStyle::TimeNoPlaces;
        venue.events.add_event(event);

        let mut tree = ElementNode::new(TREE_RUN);
        tree.add_attrib(ATTRIB_RUN_DATE, "2022-06-01");
        tree.add_attrib(ATTRIB_RUN_DIVISION, "FCAT");
        tree.add_attrib(ATTRIB_RUN_LEVEL, "FCAT");
        tree.add_attrib(ATTRIB_RUN_HEIGHT, "24");
        let mut log = ErrorLog::new();
        let run = DogRun::load(&tree, &config, &clubs(), ArbVersion::new(14, 5), &mut log).unwrap();
        assert_eq!(run.event, "FCAT");
        assert!(run.height.is_empty());
        assert_eq!(run.in_class, -1);
    }

    #[test]
    fn clean_run_earns_full_title_points() {
        let config = config();
        let clubs = clubs();
        let (_, scoring) = clubs
            .find_event(
                &config,
                "Standard",
                "Regular",
                "Excellent",
                ArbDate::new(2023, 10, 14),
                &mut ErrorLog::new(),
            )
            .unwrap();
        let mut run = DogRun {
            date: ArbDate::new(2023, 10, 14),
            division: "Regular".to_string(),
            level: "Excellent".to_string(),
            event: "Standard".to_string(),
            q: Q::Q,
            ..DogRun::default()
        };
        run.scoring.scoring_type = RunScoringType::ByTime;
        run.scoring.sct = 30.0;
        run.scoring.time = 28.5;
        assert_eq!(run.score(scoring), 0.0);
        let (pts, clean) = run.title_points(scoring, clubs.main_club());
        assert_eq!(pts, 5.0);
        assert!(clean);

        run.scoring.course_faults = 5;
        let (pts, clean) = run.title_points(scoring, clubs.main_club());
        assert_eq!(pts, 3.0);
        assert!(!clean);
    }

    #[test]
    fn gamble_with_no_closing_requirement_titles_on_combined_points() {
        let scoring = ConfigScoring {
            style: ScoringStyle::OCScoreThenTime,
            ..ConfigScoring::default()
        };
        let mut with_points = scoring.clone();
        with_points.title_points.add(7.0, 0.0);
        let mut run = DogRun::default();
        run.scoring.scoring_type = RunScoringType::ByOpenClose;
        run.scoring.need_open_pts = 50;
        run.scoring.need_close_pts = 0;
        run.scoring.open_pts = 30;
        run.scoring.close_pts = 25;
        let (pts, clean) = run.title_points(&with_points, None);
        assert_eq!(pts, 7.0);
        assert!(clean);

        run.scoring.need_close_pts = 20;
        let (pts, _) = run.title_points(&with_points, None);
        assert_eq!(pts, 0.0);
    }

    #[test]
    fn speed_points_clamp_and_scale_by_place() {
        let mut scoring = ConfigScoring {
            speed_pts: true,
            ..ConfigScoring::default()
        };
        scoring.place_info.add(1, 2.0, true);
        let mut run = DogRun {
            q: Q::Q,
            place: 1,
            ..DogRun::default()
        };
        run.scoring.sct = 40.0;
        run.scoring.time = 33.4;
        assert_eq!(run.speed_points(&scoring), 12);

        run.scoring.time = 45.0;
        assert_eq!(run.speed_points(&scoring), 0);

        run.place = 3;
        run.scoring.time = 33.4;
        assert_eq!(run.speed_points(&scoring), 6);
    }

    #[test]
    fn placement_writes_computed_points() {
        let config = config();
        let clubs = clubs();
        let mut run = DogRun {
            date: ArbDate::new(2023, 10, 14),
            division: "Regular".to_string(),
            level: "Excellent".to_string(),
            event: "Standard".to_string(),
            q: Q::Q,
            place: 2,
            ..DogRun::default()
        };
        run.scoring.scoring_type = RunScoringType::ByTime;
        run.scoring.sct = 30.0;
        run.scoring.time = 28.5;

        let mut parent = ElementNode::new("Test");
        run.save(&mut parent, Some(&clubs), &config);
        let node = parent.find_element_node(TREE_RUN).unwrap();
        let placement = node.find_element_node(TREE_PLACEMENT).unwrap();
        assert_eq!(placement.raw_attrib(ATTRIB_PLACEMENT_Q), Some("Q"));
        assert_eq!(placement.raw_attrib(ATTRIB_PLACEMENT_TITLE_PTS), Some("5"));
        // Not-recorded counts stay off the file.
        assert!(placement.raw_attrib(ATTRIB_PLACEMENT_INCLASS).is_none());
    }

    #[test]
    fn runs_sort_by_date() {
        let mut list = DogRunList::default();
        let mut a = DogRun::default();
        a.date = ArbDate::new(2023, 10, 15);
        let mut b = DogRun::default();
        b.date = ArbDate::new(2023, 10, 14);
        list.add_run(a);
        list.add_run(b);
        list.sort();
        assert_eq!(list[0].date, ArbDate::new(2023, 10, 14));
        assert_eq!(list.start_date(), ArbDate::new(2023, 10, 14));
        assert_eq!(list.end_date(), ArbDate::new(2023, 10, 15));
    }
}
