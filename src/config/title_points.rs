//! Titling-point tables: faults → points rows.

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::config::lifetime_points::ConfigLifetimePointsList;
use crate::date::ArbDate;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::{arb_double, ArbVersion};

/// How a row's points are computed. Only `Normal` is a plain table
/// lookup; the others are venue-specific formulas keyed off the run
/// context and are carried through files without computing points here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointsType {
    #[default]
    Normal,
    T2B,
    Uki,
    Top10Usdaa,
}

impl PointsType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointsType::Normal => "Normal",
            PointsType::T2B => "T2B",
            PointsType::Uki => "UKI",
            PointsType::Top10Usdaa => "Top10USDAA",
        }
    }

    pub fn parse(s: &str) -> PointsType {
        match s {
            "T2B" => PointsType::T2B,
            "UKI" => PointsType::Uki,
            "Top10USDAA" => PointsType::Top10Usdaa,
            _ => PointsType::Normal,
        }
    }
}

/// Everything a point formula may need about the run being scored.
#[derive(Debug, Clone, Copy)]
pub struct TitlePointsContext {
    pub faults: f64,
    pub time: f64,
    pub sct: f64,
    pub place: i16,
    pub in_class: i16,
    pub date: ArbDate,
    pub is_tourney: bool,
    pub is_at_home: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTitlePoints {
    pub points: f64,
    pub faults: f64,
    pub points_type: PointsType,
}

impl ConfigTitlePoints {
    pub fn new(points: f64, faults: f64, points_type: PointsType) -> Self {
        Self {
            points,
            faults,
            points_type,
        }
    }

    /// Compute the points this row awards for a run. Non-Normal types
    /// award nothing here (their formulas are external).
    pub fn compute(&self, _ctx: &TitlePointsContext) -> f64 {
        match self.points_type {
            PointsType::Normal => self.points,
            _ => 0.0,
        }
    }

    /// Loads a row; pre-10.0 files stored lifetime rows inline with a
    /// "LifeTime" flag, which get routed into `lifetime` instead.
    /// Returns None when the row was consumed as a lifetime row.
    pub fn load(
        tree: &ElementNode,
        version: ArbVersion,
        _cb: &mut dyn ErrorCallback,
        lifetime: &mut ConfigLifetimePointsList,
    ) -> ArbResult<Option<Self>> {
        if tree.name() != TREE_TITLE_POINTS {
            return Err(ArbError::MissingElement(TREE_TITLE_POINTS.to_string()));
        }
        let mut points_type = PointsType::Normal;
        if let Some(raw) = tree.raw_attrib(ATTRIB_TITLE_POINTS_TYPE) {
            points_type = PointsType::parse(raw);
        }
        if points_type != PointsType::Normal {
            return Ok(Some(Self::new(0.0, 0.0, points_type)));
        }
        let points = tree.req_attrib::<f64>(ATTRIB_TITLE_POINTS_POINTS)?;
        let faults = tree.req_attrib::<f64>(ATTRIB_TITLE_POINTS_FAULTS)?;
        if version < ArbVersion::new(10, 0) {
            let mut is_lifetime = false;
            tree.opt_attrib("LifeTime", &mut is_lifetime)?;
            if is_lifetime {
                lifetime.add("", false, points, faults);
                return Ok(None);
            }
        }
        Ok(Some(Self::new(points, faults, points_type)))
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_TITLE_POINTS);
        if self.points_type == PointsType::Normal {
            node.add_attrib_double(ATTRIB_TITLE_POINTS_POINTS, self.points, 0);
            node.add_attrib_double(ATTRIB_TITLE_POINTS_FAULTS, self.faults, 0);
        } else {
            node.add_attrib(ATTRIB_TITLE_POINTS_TYPE, self.points_type.as_str());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigTitlePointsList(pub Vec<ConfigTitlePoints>);

impl Deref for ConfigTitlePointsList {
    type Target = Vec<ConfigTitlePoints>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigTitlePointsList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ConfigTitlePointsList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
        lifetime: &mut ConfigLifetimePointsList,
    ) -> ArbResult<()> {
        if let Some(item) = ConfigTitlePoints::load(tree, version, cb, lifetime)? {
            self.0.push(item);
        }
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    /// Rows stay sorted by allowed faults so lookup can take the first
    /// row whose threshold covers the run.
    pub fn sort(&mut self) {
        self.0
            .sort_by(|a, b| a.faults.partial_cmp(&b.faults).unwrap_or(std::cmp::Ordering::Equal));
    }

    pub fn points_type(&self) -> PointsType {
        self.0
            .first()
            .map(|r| r.points_type)
            .unwrap_or(PointsType::Normal)
    }

    /// Points for a run: the first row whose fault allowance covers
    /// `ctx.faults`, or 0 when faulted out of the table.
    pub fn get_title_points(&self, ctx: &TitlePointsContext) -> f64 {
        for row in &self.0 {
            if ctx.faults <= row.faults {
                return row.compute(ctx);
            }
        }
        0.0
    }

    pub fn find(&self, faults: f64) -> Option<&ConfigTitlePoints> {
        self.0.iter().find(|r| arb_double::equal(r.faults, faults))
    }

    /// Rejects duplicate fault thresholds.
    pub fn add(&mut self, points: f64, faults: f64) -> bool {
        if self.find(faults).is_some() {
            return false;
        }
        self.0
            .push(ConfigTitlePoints::new(points, faults, PointsType::Normal));
        self.sort();
        true
    }

    pub fn delete(&mut self, faults: f64) -> bool {
        match self.0.iter().position(|r| arb_double::equal(r.faults, faults)) {
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

    fn table(rows: &[(f64, f64)]) -> ConfigTitlePointsList {
        let mut list = ConfigTitlePointsList::default();
        for (points, faults) in rows {
            assert!(list.add(*points, *faults));
        }
        list
    }

    fn ctx(faults: f64) -> TitlePointsContext {
        TitlePointsContext {
            faults,
            time: 0.0,
            sct: 0.0,
            place: 0,
            in_class: -1,
            date: ArbDate::invalid(),
            is_tourney: false,
            is_at_home: false,
        }
    }

    #[test]
    fn lookup_takes_first_covering_row() {
        let list = table(&[(5.0, 0.0), (3.0, 5.0), (1.0, 10.0)]);
        assert_eq!(list.get_title_points(&ctx(0.0)), 5.0);
        assert_eq!(list.get_title_points(&ctx(4.0)), 3.0);
        assert_eq!(list.get_title_points(&ctx(10.0)), 1.0);
        assert_eq!(list.get_title_points(&ctx(11.0)), 0.0);
    }

    #[test]
    fn duplicate_fault_rows_are_rejected() {
        let mut list = table(&[(5.0, 0.0)]);
        assert!(!list.add(4.0, 0.0));
        assert!(list.delete(0.0));
        assert!(!list.delete(0.0));
    }
}
