//! The raw numbers recorded for a run, shaped by the event's scoring
//! method.

use crate::callbacks::ErrorCallback;
use crate::config::event::ConfigEvent;
use crate::config::scoring::{ConfigScoring, ScoringStyle};
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::{ArbVersion, Lookup};

/// How a run's score is entered, derived from the configured scoring
/// style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunScoringType {
    #[default]
    Unknown,
    ByTime,
    ByOpenClose,
    ByPoints,
    BySpeed,
    ByPass,
}

impl RunScoringType {
    /// The element name this scoring type is stored under.
    pub fn tree_name(&self) -> Option<&'static str> {
        match self {
            RunScoringType::Unknown => None,
            RunScoringType::ByTime => Some(TREE_BY_TIME),
            RunScoringType::ByOpenClose => Some(TREE_BY_OPENCLOSE),
            RunScoringType::ByPoints => Some(TREE_BY_POINTS),
            RunScoringType::BySpeed => Some(TREE_BY_SPEED),
            RunScoringType::ByPass => Some(TREE_BY_PASS),
        }
    }

    pub fn from_config_style(style: ScoringStyle) -> RunScoringType {
        match style {
            ScoringStyle::FaultsThenTime
            | ScoringStyle::Faults100ThenTime
            | ScoringStyle::Faults200ThenTime
            | ScoringStyle::TimePlusFaults => RunScoringType::ByTime,
            ScoringStyle::OCScoreThenTime => RunScoringType::ByOpenClose,
            ScoringStyle::ScoreThenTime => RunScoringType::ByPoints,
            ScoringStyle::TimeNoPlaces => RunScoringType::BySpeed,
            ScoringStyle::PassFail => RunScoringType::ByPass,
            ScoringStyle::Unknown => RunScoringType::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DogRunScoring {
    pub scoring_type: RunScoringType,
    /// Mirrors the scoring method's drop-fractions flag; time faults
    /// are rounded toward the dog's favor when set.
    pub round_time_faults: bool,
    pub sct: f64,
    pub sct2: f64,
    pub yards: f64,
    pub obstacles: i16,
    pub time: f64,
    pub table: bool,
    /// Set while loading pre-8.6 files; the table flag may need fixing
    /// when a version-3 configuration is merged.
    pub convert_table: bool,
    pub course_faults: i16,
    pub need_open_pts: i16,
    pub need_close_pts: i16,
    pub open_pts: i16,
    pub close_pts: i16,
    pub bonus_title_pts: f64,
}

// The conversion marker is transient load state, not data.
impl PartialEq for DogRunScoring {
    fn eq(&self, other: &Self) -> bool {
        self.scoring_type == other.scoring_type
            && self.round_time_faults == other.round_time_faults
            && self.sct == other.sct
            && self.sct2 == other.sct2
            && self.yards == other.yards
            && self.obstacles == other.obstacles
            && self.time == other.time
            && self.table == other.table
            && self.course_faults == other.course_faults
            && self.need_open_pts == other.need_open_pts
            && self.need_close_pts == other.need_close_pts
            && self.open_pts == other.open_pts
            && self.close_pts == other.close_pts
            && self.bonus_title_pts == other.bonus_title_pts
    }
}

impl DogRunScoring {
    /// Loads from one of the per-style scoring elements. Returns
    /// `Ok(None)` when the element does not match the configured
    /// scoring style.
    pub fn load(
        config_version: i16,
        event: &ConfigEvent,
        event_scoring: &ConfigScoring,
        tree: &ElementNode,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Option<Self>> {
        let mut scoring = Self::default();
        scoring.round_time_faults = event_scoring.drop_fractions;
        tree.opt_attrib(ATTRIB_SCORING_TIME, &mut scoring.time)?;
        tree.opt_attrib(ATTRIB_SCORING_FAULTS, &mut scoring.course_faults)?;
        tree.opt_attrib(ATTRIB_SCORING_BONUSPTS_RUN, &mut scoring.bonus_title_pts)?;
        tree.opt_attrib(ATTRIB_SCORING_OBSTACLES, &mut scoring.obstacles)?;
        scoring.scoring_type = RunScoringType::from_config_style(event_scoring.style);
        if scoring.scoring_type.tree_name() != Some(tree.name()) {
            return Ok(None);
        }
        match scoring.scoring_type {
            RunScoringType::ByTime => {
                if version < ArbVersion::new(8, 6) {
                    // 8.4/8.5 stored whether the table counts in YPS.
                    // An explicit "no" means there was a table; anything
                    // else is ambiguous and is resolved when a version-3
                    // configuration is merged.
                    scoring.convert_table = true;
                    if let Lookup::Found(false) = tree.attrib::<bool>("TableInYPS") {
                        scoring.table = true;
                        scoring.convert_table = false;
                    }
                } else {
                    match tree.attrib::<bool>(ATTRIB_SCORING_HAS_TABLE) {
                        Lookup::Found(table) => scoring.table = table,
                        Lookup::NotFound => {}
                        Lookup::Invalid => {
                            // Report but keep the run.
                            let err =
                                ArbError::invalid_bool(tree.name(), ATTRIB_SCORING_HAS_TABLE);
                            cb.log_message(&err.to_string());
                            scoring.table = false;
                        }
                    }
                }
                // Pre-12.6 files could carry a stale table flag on runs
                // whose event has no table.
                if scoring.table
                    && version < ArbVersion::new(12, 6)
                    && config_version >= 3
                    && !event.has_table()
                {
                    scoring.table = false;
                }
                tree.opt_attrib(ATTRIB_SCORING_SCT, &mut scoring.sct)?;
                tree.opt_attrib(ATTRIB_BY_TIME_YARDS, &mut scoring.yards)?;
            }
            RunScoringType::ByOpenClose => {
                tree.opt_attrib(ATTRIB_SCORING_SCT, &mut scoring.sct)?;
                tree.opt_attrib(ATTRIB_SCORING_SCT2, &mut scoring.sct2)?;
                tree.opt_attrib(ATTRIB_BY_OPENCLOSE_NEEDOPEN, &mut scoring.need_open_pts)?;
                tree.opt_attrib(ATTRIB_BY_OPENCLOSE_NEEDCLOSE, &mut scoring.need_close_pts)?;
                tree.opt_attrib(ATTRIB_BY_OPENCLOSE_GOTOPEN, &mut scoring.open_pts)?;
                tree.opt_attrib(ATTRIB_BY_OPENCLOSE_GOTCLOSE, &mut scoring.close_pts)?;
            }
            RunScoringType::ByPoints => {
                tree.opt_attrib(ATTRIB_SCORING_SCT, &mut scoring.sct)?;
                tree.opt_attrib(ATTRIB_BY_POINTS_NEED, &mut scoring.need_open_pts)?;
                tree.opt_attrib(ATTRIB_BY_POINTS_GOT, &mut scoring.open_pts)?;
            }
            RunScoringType::BySpeed => {
                tree.opt_attrib(ATTRIB_SCORING_SCT, &mut scoring.sct)?;
                tree.opt_attrib(ATTRIB_BY_TIME_YARDS, &mut scoring.yards)?;
            }
            RunScoringType::ByPass => {}
            RunScoringType::Unknown => return Ok(None),
        }
        Ok(Some(scoring))
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let Some(name) = self.scoring_type.tree_name() else {
            return;
        };
        let node = parent.add_element_node(name);
        match self.scoring_type {
            RunScoringType::ByTime => {
                if self.table {
                    node.add_attrib_bool(ATTRIB_SCORING_HAS_TABLE, self.table);
                }
                node.add_attrib_short(ATTRIB_SCORING_FAULTS, self.course_faults);
                node.add_attrib_double(ATTRIB_SCORING_TIME, self.time, 2);
                node.add_attrib_double(ATTRIB_SCORING_SCT, self.sct, 2);
                node.add_attrib_double(ATTRIB_BY_TIME_YARDS, self.yards, 2);
            }
            RunScoringType::ByOpenClose => {
                if self.course_faults > 0 {
                    node.add_attrib_short(ATTRIB_SCORING_FAULTS, self.course_faults);
                }
                node.add_attrib_double(ATTRIB_SCORING_TIME, self.time, 2);
                if self.sct > 0.0 {
                    node.add_attrib_double(ATTRIB_SCORING_SCT, self.sct, 2);
                }
                if self.sct2 > 0.0 {
                    node.add_attrib_double(ATTRIB_SCORING_SCT2, self.sct2, 2);
                }
                node.add_attrib_short(ATTRIB_BY_OPENCLOSE_NEEDOPEN, self.need_open_pts);
                node.add_attrib_short(ATTRIB_BY_OPENCLOSE_NEEDCLOSE, self.need_close_pts);
                node.add_attrib_short(ATTRIB_BY_OPENCLOSE_GOTOPEN, self.open_pts);
                node.add_attrib_short(ATTRIB_BY_OPENCLOSE_GOTCLOSE, self.close_pts);
            }
            RunScoringType::ByPoints => {
                if self.course_faults > 0 {
                    node.add_attrib_short(ATTRIB_SCORING_FAULTS, self.course_faults);
                }
                node.add_attrib_double(ATTRIB_SCORING_TIME, self.time, 2);
                if self.sct > 0.0 {
                    node.add_attrib_double(ATTRIB_SCORING_SCT, self.sct, 2);
                }
                node.add_attrib_short(ATTRIB_BY_POINTS_NEED, self.need_open_pts);
                node.add_attrib_short(ATTRIB_BY_POINTS_GOT, self.open_pts);
            }
            RunScoringType::BySpeed => {
                if self.course_faults > 0 {
                    node.add_attrib_short(ATTRIB_SCORING_FAULTS, self.course_faults);
                }
                node.add_attrib_double(ATTRIB_SCORING_TIME, self.time, 2);
                node.add_attrib_double(ATTRIB_SCORING_SCT, self.sct, 2);
                node.add_attrib_double(ATTRIB_BY_TIME_YARDS, self.yards, 2);
            }
            RunScoringType::ByPass => {
                if self.course_faults > 0 {
                    node.add_attrib_short(ATTRIB_SCORING_FAULTS, self.course_faults);
                }
                node.add_attrib_double(ATTRIB_SCORING_TIME, self.time, 2);
            }
            RunScoringType::Unknown => {}
        }
        node.add_attrib_double(ATTRIB_SCORING_BONUSPTS_RUN, self.bonus_title_pts, 2);
        if self.obstacles > 0 {
            node.add_attrib_short(ATTRIB_SCORING_OBSTACLES, self.obstacles);
        }
    }

    /// The slowest yards-per-second that still makes course time.
    pub fn min_yps(&self, table_in_yps: bool) -> Option<f64> {
        if self.scoring_type == RunScoringType::ByTime && self.yards > 0.0 && self.sct > 0.0 {
            let mut t = self.sct;
            if self.table && t > 5.0 && !table_in_yps {
                t -= 5.0;
            }
            Some(self.yards / t)
        } else {
            None
        }
    }

    pub fn yps(&self, table_in_yps: bool) -> Option<f64> {
        self.yps_at(table_in_yps, self.time)
    }

    pub fn yps_at(&self, table_in_yps: bool, time: f64) -> Option<f64> {
        if self.scoring_type == RunScoringType::ByTime && self.yards > 0.0 && time > 0.0 {
            let mut t = time;
            if self.table && t > 5.0 && !table_in_yps {
                t -= 5.0;
            }
            Some(self.yards / t)
        } else {
            None
        }
    }

    /// Obstacles per second. For gamble runs the opening time is used
    /// unless the full run time was requested.
    pub fn obstacles_ps(&self, table_in_yps: bool, run_time_in_ops: bool) -> Option<f64> {
        if self.obstacles > 0 && self.time > 0.0 {
            let mut t = self.time;
            if self.scoring_type == RunScoringType::ByTime
                && self.table
                && t > 5.0
                && !table_in_yps
            {
                t -= 5.0;
            } else if !run_time_in_ops
                && self.scoring_type == RunScoringType::ByOpenClose
                && t > self.sct
                && self.sct2 > 0.0
            {
                t = self.sct;
            }
            Some(f64::from(self.obstacles) / t)
        } else {
            None
        }
    }

    /// Time faults for this run under the given scoring method.
    pub fn time_faults(&self, scoring: Option<&ConfigScoring>) -> f64 {
        let mut time_faults = 0.0;
        if matches!(
            self.scoring_type,
            RunScoringType::ByTime | RunScoringType::ByOpenClose | RunScoringType::ByPoints
        ) {
            let mut time_sct = self.sct;
            let mut add_under = false;
            let mut add_over = self.scoring_type == RunScoringType::ByTime;
            if let Some(scoring) = scoring {
                if self.scoring_type != RunScoringType::ByTime {
                    // Gamble-style events (strategic time gamble, FAST)
                    // fault against the combined opening+closing time.
                    time_sct += self.sct2;
                    add_under = scoring.time_faults_under;
                    add_over = scoring.time_faults_over;
                } else if scoring.style == ScoringStyle::TimePlusFaults {
                    add_under = scoring.time_faults_under;
                    add_over = scoring.time_faults_over;
                }
            }
            if time_sct > 0.0 {
                if add_under {
                    let time = if self.round_time_faults {
                        self.time.ceil()
                    } else {
                        self.time
                    };
                    if time < time_sct {
                        time_faults = time_sct - time;
                    }
                }
                if add_over {
                    let time = if self.round_time_faults {
                        self.time.floor()
                    } else {
                        self.time
                    };
                    if time > time_sct {
                        time_faults = time - time_sct;
                    }
                }
            }
        }
        let multiplier = scoring.map_or(1, |s| s.time_fault_multiplier.max(1));
        time_faults * f64::from(multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::ErrorLog;

    fn by_time_scoring() -> ConfigScoring {
        ConfigScoring {
            style: ScoringStyle::FaultsThenTime,
            ..ConfigScoring::default()
        }
    }

    #[test]
    fn load_skips_mismatched_elements() {
        let mut tree = ElementNode::new(TREE_BY_POINTS);
        tree.add_attrib(ATTRIB_SCORING_TIME, "42.1");
        let mut log = ErrorLog::new();
        let loaded = DogRunScoring::load(
            15,
            &ConfigEvent::default(),
            &by_time_scoring(),
            &tree,
            ArbVersion::new(15, 3),
            &mut log,
        )
        .unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn old_table_in_yps_migrates() {
        let mut tree = ElementNode::new(TREE_BY_TIME);
        tree.add_attrib("TableInYPS", "n");
        let mut log = ErrorLog::new();
        let scoring = DogRunScoring::load(
            2,
            &ConfigEvent::default(),
            &by_time_scoring(),
            &tree,
            ArbVersion::new(8, 5),
            &mut log,
        )
        .unwrap()
        .unwrap();
        assert!(scoring.table);
        assert!(!scoring.convert_table);

        let plain = ElementNode::new(TREE_BY_TIME);
        let scoring = DogRunScoring::load(
            2,
            &ConfigEvent::default(),
            &by_time_scoring(),
            &plain,
            ArbVersion::new(8, 5),
            &mut log,
        )
        .unwrap()
        .unwrap();
        assert!(!scoring.table);
        assert!(scoring.convert_table);
    }

    #[test]
    fn time_faults_over_course_time() {
        let run = DogRunScoring {
            scoring_type: RunScoringType::ByTime,
            sct: 60.0,
            time: 65.3,
            ..DogRunScoring::default()
        };
        assert_eq!(run.time_faults(Some(&by_time_scoring())), 5.300000000000004);

        let rounded = DogRunScoring {
            round_time_faults: true,
            ..run
        };
        assert_eq!(rounded.time_faults(Some(&by_time_scoring())), 5.0);
    }

    #[test]
    fn gamble_runs_fault_against_combined_sct() {
        let scoring = ConfigScoring {
            style: ScoringStyle::OCScoreThenTime,
            time_faults_over: true,
            ..ConfigScoring::default()
        };
        let run = DogRunScoring {
            scoring_type: RunScoringType::ByOpenClose,
            sct: 30.0,
            sct2: 10.0,
            time: 45.0,
            ..DogRunScoring::default()
        };
        assert_eq!(run.time_faults(Some(&scoring)), 5.0);
    }

    #[test]
    fn yps_discounts_the_table() {
        let run = DogRunScoring {
            scoring_type: RunScoringType::ByTime,
            yards: 180.0,
            time: 50.0,
            table: true,
            ..DogRunScoring::default()
        };
        assert_eq!(run.yps(true), Some(3.6));
        assert_eq!(run.yps(false), Some(4.0));
    }
}
