//! Manually entered point credits that pre-date the electronic record.

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::config::level::ConfigLevel;
use crate::config::venue::ConfigVenue;
use crate::config::Config;
use crate::date::ArbDate;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::{ArbVersion, Lookup};

const TYPE_OTHER: &str = "Other";
const TYPE_LIFETIME: &str = "Lifetime";
const TYPE_RUN: &str = "Run";
const TYPE_SPEED: &str = "Speed";
const TYPE_MQ: &str = "MQ";
const TYPE_SQ: &str = "SQ";

/// What kind of points a credit records. Each kind needs a different
/// subset of the venue/division/level/event fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingPointType {
    OtherPoints,
    Lifetime,
    /// Titling points from regular runs; stored as "Run" in the file.
    #[default]
    Title,
    Speed,
    Mq,
    Sq,
}

impl ExistingPointType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExistingPointType::OtherPoints => TYPE_OTHER,
            ExistingPointType::Lifetime => TYPE_LIFETIME,
            ExistingPointType::Title => TYPE_RUN,
            ExistingPointType::Speed => TYPE_SPEED,
            ExistingPointType::Mq => TYPE_MQ,
            ExistingPointType::Sq => TYPE_SQ,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DogExistingPoints {
    pub date: ArbDate,
    pub comment: String,
    pub point_type: ExistingPointType,
    /// Names the other-points category or the lifetime track,
    /// depending on `point_type`.
    pub type_name: String,
    pub venue: String,
    pub multiq: String,
    pub division: String,
    pub level: String,
    pub event: String,
    pub sub_name: String,
    pub points: f64,
}

impl Default for DogExistingPoints {
    fn default() -> Self {
        Self {
            date: ArbDate::invalid(),
            comment: String::new(),
            point_type: ExistingPointType::Title,
            type_name: String::new(),
            venue: String::new(),
            multiq: String::new(),
            division: String::new(),
            level: String::new(),
            event: String::new(),
            sub_name: String::new(),
            points: 0.0,
        }
    }
}

impl DogExistingPoints {
    pub fn load(
        tree: &ElementNode,
        config: &Config,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_EXISTING_PTS {
            return Err(ArbError::MissingElement(TREE_EXISTING_PTS.to_string()));
        }
        let mut pts = Self::default();
        match tree.attrib::<ArbDate>(ATTRIB_EXISTING_PTS_DATE) {
            Lookup::Found(date) => pts.date = date,
            Lookup::NotFound => {}
            Lookup::Invalid => {
                let raw = tree.raw_attrib(ATTRIB_EXISTING_PTS_DATE).unwrap_or("");
                let err = ArbError::invalid_date(TREE_EXISTING_PTS, ATTRIB_EXISTING_PTS_DATE, raw);
                cb.log_message(&err.to_string());
                return Err(err);
            }
        }

        let type_str = tree.req_attrib::<String>(ATTRIB_EXISTING_PTS_TYPE)?;
        if type_str.is_empty() {
            let err = ArbError::missing(TREE_EXISTING_PTS, ATTRIB_EXISTING_PTS_TYPE);
            cb.log_message(&err.to_string());
            return Err(err);
        }
        let mut converted_qq = false;
        pts.point_type = match type_str.as_str() {
            TYPE_OTHER => ExistingPointType::OtherPoints,
            TYPE_LIFETIME => ExistingPointType::Lifetime,
            TYPE_RUN => ExistingPointType::Title,
            TYPE_SPEED => ExistingPointType::Speed,
            TYPE_MQ => ExistingPointType::Mq,
            TYPE_SQ => ExistingPointType::Sq,
            // "Mach" points became "Speed" in 10.1.
            "Mach" if version < ArbVersion::new(10, 1) => ExistingPointType::Speed,
            // "QQ" became the generic multi-Q in 11.0.
            "QQ" if version < ArbVersion::new(11, 0) => {
                converted_qq = true;
                ExistingPointType::Mq
            }
            _ => {
                let err = ArbError::invalid(
                    TREE_EXISTING_PTS,
                    ATTRIB_EXISTING_PTS_TYPE,
                    format!(
                        "must be one of: {TYPE_OTHER}, {TYPE_LIFETIME}, {TYPE_RUN}, \
                         {TYPE_SPEED}, {TYPE_MQ}, {TYPE_SQ}"
                    ),
                );
                cb.log_message(&err.to_string());
                return Err(err);
            }
        };

        if pts.point_type == ExistingPointType::OtherPoints {
            tree.opt_attrib(ATTRIB_EXISTING_PTS_OTHER, &mut pts.type_name)?;
            if pts.type_name.is_empty() {
                let err = ArbError::missing(TREE_EXISTING_PTS, ATTRIB_EXISTING_PTS_OTHER);
                cb.log_message(&err.to_string());
                return Err(err);
            }
            if config.other_points.find(&pts.type_name).is_none() {
                let err = ArbError::invalid(
                    TREE_EXISTING_PTS,
                    ATTRIB_EXISTING_PTS_OTHER,
                    format!("unknown other points '{}'", pts.type_name),
                );
                cb.log_message(&err.to_string());
                return Err(err);
            }
        } else if pts.point_type == ExistingPointType::Lifetime {
            // The lifetime track name shares the "Other" attribute.
            // Pre-14.4 files have no named tracks and omit it.
            tree.opt_attrib(ATTRIB_EXISTING_PTS_OTHER, &mut pts.type_name)?;
        }

        tree.opt_attrib(ATTRIB_EXISTING_PTS_VENUE, &mut pts.venue)?;
        if pts.venue.is_empty() {
            let err = ArbError::missing(TREE_EXISTING_PTS, ATTRIB_EXISTING_PTS_VENUE);
            cb.log_message(&err.to_string());
            return Err(err);
        }
        if config.venues.find_venue(&pts.venue).is_none() {
            let err = ArbError::invalid(
                TREE_EXISTING_PTS,
                ATTRIB_EXISTING_PTS_VENUE,
                format!("unknown venue '{}'", pts.venue),
            );
            cb.log_message(&err.to_string());
            return Err(err);
        }
        if pts.point_type == ExistingPointType::Lifetime {
            let known = match config.venues.find_venue(&pts.venue) {
                Some(v) => {
                    v.lifetime_names.find(&pts.type_name).is_some()
                        || (pts.type_name.is_empty() && v.lifetime_names.is_empty())
                }
                None => false,
            };
            if !known {
                let err = ArbError::invalid(
                    TREE_EXISTING_PTS,
                    ATTRIB_EXISTING_PTS_OTHER,
                    format!("unknown lifetime name '{}'", pts.type_name),
                );
                cb.log_message(&err.to_string());
                return Err(err);
            }
        }

        if pts.point_type == ExistingPointType::Mq {
            if converted_qq {
                // The 11.0 configuration that defines the AKC "Double Q"
                // may not have been merged yet, so fall back to its name.
                pts.multiq = match config.venues.find_venue(&pts.venue) {
                    Some(v) => match v.multiqs.find_multiq("QQ", true) {
                        Some(m) => m.name.clone(),
                        None => "Double Q".to_string(),
                    },
                    None => {
                        let err = ArbError::invalid(
                            TREE_EXISTING_PTS,
                            ATTRIB_EXISTING_PTS_MULTIQ,
                            "unable to convert pre-11.0 double Q points",
                        );
                        cb.log_message(&err.to_string());
                        return Err(err);
                    }
                };
            } else {
                tree.opt_attrib(ATTRIB_EXISTING_PTS_MULTIQ, &mut pts.multiq)?;
                if pts.multiq.is_empty() {
                    let err = ArbError::missing(TREE_EXISTING_PTS, ATTRIB_EXISTING_PTS_MULTIQ);
                    cb.log_message(&err.to_string());
                    return Err(err);
                }
                if !config.venues.verify_multiq(&pts.venue, &pts.multiq, false) {
                    let err = ArbError::invalid(
                        TREE_EXISTING_PTS,
                        ATTRIB_EXISTING_PTS_MULTIQ,
                        format!("unknown multiple Q '{}/{}'", pts.venue, pts.multiq),
                    );
                    cb.log_message(&err.to_string());
                    return Err(err);
                }
            }
        } else {
            tree.opt_attrib(ATTRIB_EXISTING_PTS_DIV, &mut pts.division)?;
            if pts.division.is_empty() {
                let err = ArbError::missing(TREE_EXISTING_PTS, ATTRIB_EXISTING_PTS_DIV);
                cb.log_message(&err.to_string());
                return Err(err);
            }
            tree.opt_attrib(ATTRIB_EXISTING_PTS_LEVEL, &mut pts.level)?;
            if pts.level.is_empty() {
                let err = ArbError::missing(TREE_EXISTING_PTS, ATTRIB_EXISTING_PTS_LEVEL);
                cb.log_message(&err.to_string());
                return Err(err);
            }
        }

        match pts.point_type {
            ExistingPointType::Mq => {}
            ExistingPointType::OtherPoints | ExistingPointType::Title | ExistingPointType::Sq => {
                tree.opt_attrib(ATTRIB_EXISTING_PTS_EVENT, &mut pts.event)?;
                if pts.event.is_empty() {
                    let err = ArbError::missing(TREE_EXISTING_PTS, ATTRIB_EXISTING_PTS_EVENT);
                    cb.log_message(&err.to_string());
                    return Err(err);
                }
                if !config.venues.verify_event(
                    &pts.venue,
                    &pts.division,
                    &pts.level,
                    &pts.event,
                    pts.date,
                ) {
                    let err = ArbError::invalid(
                        TREE_EXISTING_PTS,
                        ATTRIB_EXISTING_PTS_EVENT,
                        format!(
                            "unknown event '{}/{}/{}/{}'",
                            pts.venue, pts.division, pts.level, pts.event
                        ),
                    );
                    cb.log_message(&err.to_string());
                    return Err(err);
                }
                pts.sub_name.clear();
                tree.opt_attrib(ATTRIB_EXISTING_PTS_SUBNAME, &mut pts.sub_name)?;
            }
            ExistingPointType::Lifetime | ExistingPointType::Speed => {
                if !config
                    .venues
                    .verify_level(&pts.venue, &pts.division, &pts.level)
                {
                    let err = ArbError::invalid(
                        TREE_EXISTING_PTS,
                        ATTRIB_EXISTING_PTS_LEVEL,
                        format!(
                            "unknown level '{}/{}/{}'",
                            pts.venue, pts.division, pts.level
                        ),
                    );
                    cb.log_message(&err.to_string());
                    return Err(err);
                }
            }
        }

        tree.opt_attrib(ATTRIB_EXISTING_PTS_POINTS, &mut pts.points)?;
        pts.comment = tree.value();
        Ok(pts)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_EXISTING_PTS);
        node.add_attrib_date(ATTRIB_EXISTING_PTS_DATE, self.date);
        node.add_attrib(ATTRIB_EXISTING_PTS_TYPE, self.point_type.as_str());
        match self.point_type {
            ExistingPointType::OtherPoints => {
                node.add_attrib(ATTRIB_EXISTING_PTS_OTHER, self.type_name.clone());
                node.add_attrib(ATTRIB_EXISTING_PTS_VENUE, self.venue.clone());
                node.add_attrib(ATTRIB_EXISTING_PTS_DIV, self.division.clone());
                node.add_attrib(ATTRIB_EXISTING_PTS_LEVEL, self.level.clone());
                node.add_attrib(ATTRIB_EXISTING_PTS_EVENT, self.event.clone());
            }
            ExistingPointType::Title => {
                node.add_attrib(ATTRIB_EXISTING_PTS_VENUE, self.venue.clone());
                node.add_attrib(ATTRIB_EXISTING_PTS_DIV, self.division.clone());
                node.add_attrib(ATTRIB_EXISTING_PTS_LEVEL, self.level.clone());
                node.add_attrib(ATTRIB_EXISTING_PTS_EVENT, self.event.clone());
                node.add_attrib(ATTRIB_EXISTING_PTS_SUBNAME, self.sub_name.clone());
            }
            ExistingPointType::Lifetime | ExistingPointType::Speed => {
                if self.point_type == ExistingPointType::Lifetime && !self.type_name.is_empty() {
                    node.add_attrib(ATTRIB_EXISTING_PTS_OTHER, self.type_name.clone());
                }
                node.add_attrib(ATTRIB_EXISTING_PTS_VENUE, self.venue.clone());
                node.add_attrib(ATTRIB_EXISTING_PTS_DIV, self.division.clone());
                node.add_attrib(ATTRIB_EXISTING_PTS_LEVEL, self.level.clone());
            }
            ExistingPointType::Mq => {
                node.add_attrib(ATTRIB_EXISTING_PTS_VENUE, self.venue.clone());
                node.add_attrib(ATTRIB_EXISTING_PTS_MULTIQ, self.multiq.clone());
            }
            ExistingPointType::Sq => {
                node.add_attrib(ATTRIB_EXISTING_PTS_VENUE, self.venue.clone());
                node.add_attrib(ATTRIB_EXISTING_PTS_DIV, self.division.clone());
                node.add_attrib(ATTRIB_EXISTING_PTS_LEVEL, self.level.clone());
                node.add_attrib(ATTRIB_EXISTING_PTS_EVENT, self.event.clone());
            }
        }
        node.add_attrib_double(ATTRIB_EXISTING_PTS_POINTS, self.points, 2);
        if !self.comment.is_empty() {
            node.set_value(self.comment.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogExistingPointsList(pub Vec<DogExistingPoints>);

impl Deref for DogExistingPointsList {
    type Target = Vec<DogExistingPoints>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DogExistingPointsList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl DogExistingPointsList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        config: &Config,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0.push(DogExistingPoints::load(tree, config, version, cb)?);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn sort(&mut self) {
        if self.0.len() < 2 {
            return;
        }
        self.0.sort_by(|a, b| {
            a.type_name
                .cmp(&b.type_name)
                .then_with(|| a.venue.cmp(&b.venue))
                .then_with(|| a.event.cmp(&b.event))
                .then_with(|| a.date.cmp(&b.date))
                .then_with(|| a.division.cmp(&b.division))
                .then_with(|| a.level.cmp(&b.level))
        });
    }

    /// Whether the venue has any credits that feed titling totals.
    pub fn has_points(&self, venue: &str) -> bool {
        self.0
            .iter()
            .any(|p| p.point_type != ExistingPointType::OtherPoints && p.venue == venue)
    }

    /// Sums the credits matching the filter. A `None` filter field
    /// matches everything; level matching includes the level's
    /// sublevels.
    #[allow(clippy::too_many_arguments)]
    pub fn existing_points(
        &self,
        point_type: ExistingPointType,
        venue: Option<&str>,
        multiq: Option<&str>,
        division: Option<&str>,
        level: Option<&ConfigLevel>,
        event: Option<&str>,
        date_from: ArbDate,
        date_to: ArbDate,
    ) -> f64 {
        let mut points = 0.0;
        for p in &self.0 {
            if p.point_type != point_type {
                continue;
            }
            if venue.map_or(false, |v| p.venue != v) {
                continue;
            }
            if multiq.map_or(false, |m| p.multiq != m) {
                continue;
            }
            if division.map_or(false, |d| p.division != d) {
                continue;
            }
            if let Some(level) = level {
                if p.level != level.name && level.sub_levels.find_sub_level(&p.level).is_none() {
                    continue;
                }
            }
            if event.map_or(false, |e| p.event != e) {
                continue;
            }
            if (date_from.is_valid() && p.date < date_from)
                || (date_to.is_valid() && p.date > date_to)
            {
                continue;
            }
            points += p.points;
        }
        points
    }

    pub fn num_existing_points_in_venue(&self, venue: &str) -> usize {
        self.0.iter().filter(|p| p.venue == venue).count()
    }

    pub fn rename_venue(&mut self, old_venue: &str, new_venue: &str) -> usize {
        let mut count = 0;
        for p in self.0.iter_mut().filter(|p| p.venue == old_venue) {
            p.venue = new_venue.to_string();
            count += 1;
        }
        count
    }

    pub fn delete_venue(&mut self, venue: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|p| p.venue != venue);
        before - self.0.len()
    }

    pub fn num_existing_points_in_division(&self, venue: &ConfigVenue, division: &str) -> usize {
        self.0
            .iter()
            .filter(|p| p.venue == venue.name && p.division == division)
            .count()
    }

    pub fn rename_division(&mut self, venue: &str, old_div: &str, new_div: &str) -> usize {
        let mut count = 0;
        for p in self
            .0
            .iter_mut()
            .filter(|p| p.venue == venue && p.division == old_div)
        {
            p.division = new_div.to_string();
            count += 1;
        }
        count
    }

    pub fn delete_division(&mut self, venue: &str, division: &str) -> usize {
        let before = self.0.len();
        self.0
            .retain(|p| !(p.venue == venue && p.division == division));
        before - self.0.len()
    }

    pub fn num_levels_in_use(&self, venue: &str, division: &str, level: &str) -> usize {
        self.0
            .iter()
            .filter(|p| p.venue == venue && p.division == division && p.level == level)
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
        for p in self
            .0
            .iter_mut()
            .filter(|p| p.venue == venue && p.division == division && p.level == old_level)
        {
            p.level = new_level.to_string();
            count += 1;
        }
        count
    }

    pub fn delete_level(&mut self, venue: &str, division: &str, level: &str) -> usize {
        let before = self.0.len();
        self.0
            .retain(|p| !(p.venue == venue && p.division == division && p.level == level));
        before - self.0.len()
    }

    pub fn num_events_in_use(&self, venue: &str, event: &str) -> usize {
        self.0
            .iter()
            .filter(|p| p.venue == venue && p.event == event)
            .count()
    }

    pub fn rename_event(&mut self, venue: &str, old_event: &str, new_event: &str) -> usize {
        let mut count = 0;
        for p in self
            .0
            .iter_mut()
            .filter(|p| p.venue == venue && p.event == old_event)
        {
            p.event = new_event.to_string();
            count += 1;
        }
        count
    }

    pub fn delete_event(&mut self, venue: &str, event: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|p| !(p.venue == venue && p.event == event));
        before - self.0.len()
    }

    pub fn num_lifetime_points_in_use(&self, name: &str) -> usize {
        self.0
            .iter()
            .filter(|p| p.point_type == ExistingPointType::Lifetime && p.type_name == name)
            .count()
    }

    pub fn rename_lifetime_name(&mut self, venue: &str, old_name: &str, new_name: &str) -> usize {
        let mut count = 0;
        for p in self.0.iter_mut().filter(|p| {
            p.point_type == ExistingPointType::Lifetime
                && p.venue == venue
                && p.type_name == old_name
        }) {
            p.type_name = new_name.to_string();
            count += 1;
        }
        count
    }

    pub fn delete_lifetime_name(&mut self, venue: &str, name: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|p| {
            !(p.point_type == ExistingPointType::Lifetime
                && p.venue == venue
                && p.type_name == name)
        });
        before - self.0.len()
    }

    pub fn num_other_points_in_use(&self, other: &str) -> usize {
        self.0
            .iter()
            .filter(|p| p.point_type == ExistingPointType::OtherPoints && p.type_name == other)
            .count()
    }

    pub fn rename_other_points(&mut self, old_other: &str, new_other: &str) -> usize {
        let mut count = 0;
        for p in self.0.iter_mut().filter(|p| {
            p.point_type == ExistingPointType::OtherPoints && p.type_name == old_other
        }) {
            p.type_name = new_other.to_string();
            count += 1;
        }
        count
    }

    pub fn delete_other_points(&mut self, other: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|p| {
            !(p.point_type == ExistingPointType::OtherPoints && p.type_name == other)
        });
        before - self.0.len()
    }

    pub fn num_multiqs_in_use(&self, venue: &str, multiq: &str) -> usize {
        self.0
            .iter()
            .filter(|p| {
                p.point_type == ExistingPointType::Mq && p.venue == venue && p.multiq == multiq
            })
            .count()
    }

    pub fn rename_multiqs(&mut self, venue: &str, old_multiq: &str, new_multiq: &str) -> usize {
        let mut count = 0;
        for p in self.0.iter_mut().filter(|p| {
            p.point_type == ExistingPointType::Mq && p.venue == venue && p.multiq == old_multiq
        }) {
            p.multiq = new_multiq.to_string();
            count += 1;
        }
        count
    }

    /// Drops multi-Q credits whose name no longer exists in the venue's
    /// configuration.
    pub fn delete_multiqs(&mut self, config: &Config, venue: &str) -> usize {
        let Some(v) = config.venues.find_venue(venue) else {
            return 0;
        };
        let before = self.0.len();
        self.0.retain(|p| {
            !(p.point_type == ExistingPointType::Mq
                && v.multiqs.find_multiq(&p.multiq, true).is_none())
        });
        before - self.0.len()
    }

    pub fn add_existing_points(&mut self, points: DogExistingPoints) {
        self.0.push(points);
    }

    pub fn delete_existing_points(&mut self, points: &DogExistingPoints) -> bool {
        match self.0.iter().position(|p| p == points) {
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
    use crate::config::scoring::{ConfigScoring, ScoringStyle};

    fn config() -> Config {
        let mut config = Config::default();
        let venue = config.venues.add_venue("AKC").unwrap();
        let div = venue.divisions.add_division("Regular").unwrap();
        div.levels.add_level("Excellent");
        let mut event = ConfigEvent {
            name: "Standard".to_string(),
            ..ConfigEvent::default()
        };
        event.scorings.push(ConfigScoring {
            division: "*".to_string(),
            level: "*".to_string(),
            style: ScoringStyle::FaultsThenTime,
            ..ConfigScoring::default()
        });
        venue.events.add_event(event);
        config
    }

    fn base_tree(type_str: &str) -> ElementNode {
        let mut node = ElementNode::new(TREE_EXISTING_PTS);
        node.add_attrib(ATTRIB_EXISTING_PTS_DATE, "2020-03-14");
        node.add_attrib(ATTRIB_EXISTING_PTS_TYPE, type_str);
        node.add_attrib(ATTRIB_EXISTING_PTS_VENUE, "AKC");
        node.add_attrib(ATTRIB_EXISTING_PTS_DIV, "Regular");
        node.add_attrib(ATTRIB_EXISTING_PTS_LEVEL, "Excellent");
        node.add_attrib(ATTRIB_EXISTING_PTS_EVENT, "Standard");
        node.add_attrib(ATTRIB_EXISTING_PTS_POINTS, "12");
        node
    }

    #[test]
    fn run_credits_verify_the_event() {
        let mut log = ErrorLog::new();
        let pts = DogExistingPoints::load(
            &base_tree("Run"),
            &config(),
            ArbVersion::new(15, 3),
            &mut log,
        )
        .unwrap();
        assert_eq!(pts.point_type, ExistingPointType::Title);
        assert_eq!(pts.points, 12.0);

        let mut bad = base_tree("Run");
        bad.add_attrib(ATTRIB_EXISTING_PTS_EVENT, "Snooker");
        assert!(
            DogExistingPoints::load(&bad, &config(), ArbVersion::new(15, 3), &mut log).is_err()
        );
    }

    #[test]
    fn legacy_type_names_convert() {
        let mut log = ErrorLog::new();
        let pts = DogExistingPoints::load(
            &base_tree("Mach"),
            &config(),
            ArbVersion::new(10, 0),
            &mut log,
        )
        .unwrap();
        assert_eq!(pts.point_type, ExistingPointType::Speed);
        // The same string is an error in newer files.
        assert!(DogExistingPoints::load(
            &base_tree("Mach"),
            &config(),
            ArbVersion::new(10, 1),
            &mut log
        )
        .is_err());
    }

    #[test]
    fn qq_credits_become_double_q() {
        let mut node = ElementNode::new(TREE_EXISTING_PTS);
        node.add_attrib(ATTRIB_EXISTING_PTS_DATE, "2004-01-10");
        node.add_attrib(ATTRIB_EXISTING_PTS_TYPE, "QQ");
        node.add_attrib(ATTRIB_EXISTING_PTS_VENUE, "AKC");
        node.add_attrib(ATTRIB_EXISTING_PTS_POINTS, "3");
        let mut log = ErrorLog::new();
        let pts =
            DogExistingPoints::load(&node, &config(), ArbVersion::new(10, 2), &mut log).unwrap();
        assert_eq!(pts.point_type, ExistingPointType::Mq);
        assert_eq!(pts.multiq, "Double Q");
    }

    #[test]
    fn existing_points_filters_and_sums() {
        let mut list = DogExistingPointsList::default();
        list.add_existing_points(DogExistingPoints {
            date: ArbDate::new(2020, 1, 1),
            point_type: ExistingPointType::Title,
            venue: "AKC".to_string(),
            division: "Regular".to_string(),
            level: "Excellent".to_string(),
            event: "Standard".to_string(),
            points: 10.0,
            ..DogExistingPoints::default()
        });
        list.add_existing_points(DogExistingPoints {
            date: ArbDate::new(2021, 1, 1),
            point_type: ExistingPointType::Title,
            venue: "AKC".to_string(),
            division: "Regular".to_string(),
            level: "Excellent".to_string(),
            event: "Standard".to_string(),
            points: 5.0,
            ..DogExistingPoints::default()
        });
        let total = list.existing_points(
            ExistingPointType::Title,
            Some("AKC"),
            None,
            Some("Regular"),
            None,
            Some("Standard"),
            ArbDate::invalid(),
            ArbDate::invalid(),
        );
        assert_eq!(total, 15.0);
        let bounded = list.existing_points(
            ExistingPointType::Title,
            Some("AKC"),
            None,
            None,
            None,
            None,
            ArbDate::new(2020, 6, 1),
            ArbDate::invalid(),
        );
        assert_eq!(bounded, 5.0);
    }

    #[test]
    fn multiq_credits_follow_configuration_renames() {
        let mut list = DogExistingPointsList::default();
        list.add_existing_points(DogExistingPoints {
            point_type: ExistingPointType::Mq,
            venue: "AKC".to_string(),
            multiq: "Double Q".to_string(),
            points: 4.0,
            ..DogExistingPoints::default()
        });
        assert_eq!(list.num_multiqs_in_use("AKC", "Double Q"), 1);
        assert_eq!(list.rename_multiqs("AKC", "Double Q", "QQ"), 1);
        // The configured venue has no multi-Qs at all, so the credit is
        // dropped.
        assert_eq!(list.delete_multiqs(&config(), "AKC"), 1);
        assert!(list.is_empty());
    }
}
