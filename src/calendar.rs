//! The calendar cribsheet: upcoming trials, entry deadlines and how
//! far along an entry is.

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::date::ArbDate;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::{ArbVersion, Lookup};

const ENTRY_NOT: &str = "N";
const ENTRY_ENTERED: &str = "E";
const ENTRY_PENDING: &str = "O";
const ENTRY_PLANNING: &str = "P";

const ACCOM_NONE: &str = "N";
const ACCOM_TODO: &str = "T";
const ACCOM_CONFIRMED: &str = "C";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarEntry {
    #[default]
    Not,
    Entered,
    Pending,
    Planning,
}

impl CalendarEntry {
    fn as_str(&self) -> &'static str {
        match self {
            CalendarEntry::Not => ENTRY_NOT,
            CalendarEntry::Entered => ENTRY_ENTERED,
            CalendarEntry::Pending => ENTRY_PENDING,
            CalendarEntry::Planning => ENTRY_PLANNING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Accommodation {
    #[default]
    None,
    Todo,
    Confirmed,
}

impl Accommodation {
    fn as_str(&self) -> &'static str {
        match self {
            Accommodation::None => ACCOM_NONE,
            Accommodation::Todo => ACCOM_TODO,
            Accommodation::Confirmed => ACCOM_CONFIRMED,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calendar {
    pub start_date: ArbDate,
    pub end_date: ArbDate,
    pub opening_date: ArbDate,
    pub draw_date: ArbDate,
    pub closing_date: ArbDate,
    pub tentative: bool,
    pub location: String,
    pub club: String,
    pub venue: String,
    pub entered: CalendarEntry,
    pub accommodations: Accommodation,
    pub confirmation: String,
    pub sec_email: String,
    pub premium_url: String,
    pub online_url: String,
    pub note: String,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            start_date: ArbDate::invalid(),
            end_date: ArbDate::invalid(),
            opening_date: ArbDate::invalid(),
            draw_date: ArbDate::invalid(),
            closing_date: ArbDate::invalid(),
            tentative: false,
            location: String::new(),
            club: String::new(),
            venue: String::new(),
            entered: CalendarEntry::Not,
            accommodations: Accommodation::None,
            confirmation: String::new(),
            sec_email: String::new(),
            premium_url: String::new(),
            online_url: String::new(),
            note: String::new(),
        }
    }
}

impl Calendar {
    pub fn generic_name(&self) -> String {
        format!("{} {}", self.venue, self.location)
    }

    /// Entirely before the given date.
    pub fn is_before(&self, date: ArbDate) -> bool {
        self.end_date.is_valid() && self.end_date < date
    }

    fn load_req_date(
        tree: &ElementNode,
        attrib: &str,
        dest: &mut ArbDate,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        match tree.attrib::<ArbDate>(attrib) {
            Lookup::Found(date) => {
                *dest = date;
                Ok(())
            }
            Lookup::NotFound => {
                let err = ArbError::missing(TREE_CALENDAR, attrib);
                cb.log_message(&err.to_string());
                Err(err)
            }
            Lookup::Invalid => {
                let raw = tree.raw_attrib(attrib).unwrap_or_default();
                let err = ArbError::invalid_date(TREE_CALENDAR, attrib, raw);
                cb.log_message(&err.to_string());
                Err(err)
            }
        }
    }

    fn load_opt_date(
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
                let err = ArbError::invalid_date(TREE_CALENDAR, attrib, raw);
                cb.log_message(&err.to_string());
                return Err(err);
            }
        }
        Ok(())
    }

    pub fn load(
        tree: &ElementNode,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_CALENDAR {
            return Err(ArbError::MissingElement(TREE_CALENDAR.to_string()));
        }
        let mut cal = Self::default();
        Self::load_req_date(tree, ATTRIB_CAL_START, &mut cal.start_date, cb)?;
        Self::load_req_date(tree, ATTRIB_CAL_END, &mut cal.end_date, cb)?;
        Self::load_opt_date(tree, ATTRIB_CAL_OPENING, &mut cal.opening_date, cb)?;
        Self::load_opt_date(tree, ATTRIB_CAL_DRAW, &mut cal.draw_date, cb)?;
        Self::load_opt_date(tree, ATTRIB_CAL_CLOSING, &mut cal.closing_date, cb)?;
        if let Lookup::Invalid = tree.attrib::<bool>(ATTRIB_CAL_MAYBE) {
            let err = ArbError::invalid_bool(TREE_CALENDAR, ATTRIB_CAL_MAYBE);
            cb.log_message(&err.to_string());
            return Err(err);
        }
        tree.opt_attrib(ATTRIB_CAL_MAYBE, &mut cal.tentative)?;
        tree.opt_attrib(ATTRIB_CAL_LOCATION, &mut cal.location)?;
        tree.opt_attrib(ATTRIB_CAL_CLUB, &mut cal.club)?;
        tree.opt_attrib(ATTRIB_CAL_VENUE, &mut cal.venue)?;

        if version == ArbVersion::new(1, 0) {
            // 1.0 had a simple yes/no "PlanOn" flag.
            if let Some(attrib) = tree.raw_attrib("PlanOn") {
                cal.entered = if attrib == "y" {
                    CalendarEntry::Planning
                } else {
                    CalendarEntry::Not
                };
            }
        } else if version >= ArbVersion::new(2, 0) {
            if let Some(attrib) = tree.raw_attrib(ATTRIB_CAL_ENTERED) {
                cal.entered = match attrib {
                    ENTRY_ENTERED => CalendarEntry::Entered,
                    ENTRY_PENDING => CalendarEntry::Pending,
                    ENTRY_PLANNING => CalendarEntry::Planning,
                    ENTRY_NOT => CalendarEntry::Not,
                    _ => {
                        let err = ArbError::invalid(
                            TREE_CALENDAR,
                            ATTRIB_CAL_ENTERED,
                            format!(
                                "must be one of: {ENTRY_ENTERED}, {ENTRY_PENDING}, \
                                 {ENTRY_PLANNING}, {ENTRY_NOT}"
                            ),
                        );
                        cb.log_message(&err.to_string());
                        return Err(err);
                    }
                };
            }
            if let Some(attrib) = tree.raw_attrib(ATTRIB_CAL_ACCOMMODATION) {
                cal.accommodations = match attrib {
                    ACCOM_NONE => Accommodation::None,
                    ACCOM_TODO => Accommodation::Todo,
                    ACCOM_CONFIRMED => Accommodation::Confirmed,
                    _ => {
                        let err = ArbError::invalid(
                            TREE_CALENDAR,
                            ATTRIB_CAL_ACCOMMODATION,
                            format!("must be one of: {ACCOM_NONE}, {ACCOM_TODO}, {ACCOM_CONFIRMED}"),
                        );
                        cb.log_message(&err.to_string());
                        return Err(err);
                    }
                };
            }
            tree.opt_attrib(ATTRIB_CAL_CONFIRMATION, &mut cal.confirmation)?;
        }

        tree.opt_attrib(ATTRIB_CAL_SECEMAIL, &mut cal.sec_email)?;
        tree.opt_attrib(ATTRIB_CAL_PREMIUMURL, &mut cal.premium_url)?;
        tree.opt_attrib(ATTRIB_CAL_ONLINEURL, &mut cal.online_url)?;
        cal.note = tree.value();
        Ok(cal)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_CALENDAR);
        node.add_attrib_date(ATTRIB_CAL_START, self.start_date);
        node.add_attrib_date(ATTRIB_CAL_END, self.end_date);
        if self.opening_date.is_valid() {
            node.add_attrib_date(ATTRIB_CAL_OPENING, self.opening_date);
        }
        if self.draw_date.is_valid() {
            node.add_attrib_date(ATTRIB_CAL_DRAW, self.draw_date);
        }
        if self.closing_date.is_valid() {
            node.add_attrib_date(ATTRIB_CAL_CLOSING, self.closing_date);
        }
        if self.tentative {
            node.add_attrib_bool(ATTRIB_CAL_MAYBE, self.tentative);
        }
        node.add_attrib(ATTRIB_CAL_LOCATION, self.location.clone());
        node.add_attrib(ATTRIB_CAL_CLUB, self.club.clone());
        node.add_attrib(ATTRIB_CAL_VENUE, self.venue.clone());
        node.add_attrib(ATTRIB_CAL_ENTERED, self.entered.as_str());
        node.add_attrib(ATTRIB_CAL_ACCOMMODATION, self.accommodations.as_str());
        if !self.confirmation.is_empty() {
            node.add_attrib(ATTRIB_CAL_CONFIRMATION, self.confirmation.clone());
        }
        if !self.sec_email.is_empty() {
            node.add_attrib(ATTRIB_CAL_SECEMAIL, self.sec_email.clone());
        }
        if !self.premium_url.is_empty() {
            node.add_attrib(ATTRIB_CAL_PREMIUMURL, self.premium_url.clone());
        }
        if !self.online_url.is_empty() {
            node.add_attrib(ATTRIB_CAL_ONLINEURL, self.online_url.clone());
        }
        if !self.note.is_empty() {
            node.set_value(self.note.clone());
        }
    }

    /// Loose matching compares only the dates and hosting info, so a
    /// re-imported entry finds the one it updates.
    pub fn is_match(&self, other: &Calendar, exact: bool) -> bool {
        if exact {
            self == other
        } else {
            self.start_date == other.start_date
                && self.end_date == other.end_date
                && self.venue == other.venue
                && self.club == other.club
        }
    }

    /// Merge non-empty fields from a newer entry. Returns whether
    /// anything changed.
    pub fn update(&mut self, other: &Calendar) -> bool {
        let mut changed = false;
        let mut merge_date = |dest: &mut ArbDate, src: ArbDate| {
            if src.is_valid() && *dest != src {
                *dest = src;
                changed = true;
            }
        };
        merge_date(&mut self.start_date, other.start_date);
        merge_date(&mut self.end_date, other.end_date);
        merge_date(&mut self.opening_date, other.opening_date);
        merge_date(&mut self.draw_date, other.draw_date);
        merge_date(&mut self.closing_date, other.closing_date);
        if self.tentative != other.tentative {
            self.tentative = other.tentative;
            changed = true;
        }
        let mut merge_str = |dest: &mut String, src: &str| {
            if !src.is_empty() && dest != src {
                *dest = src.to_string();
                changed = true;
            }
        };
        merge_str(&mut self.location, &other.location);
        merge_str(&mut self.club, &other.club);
        merge_str(&mut self.venue, &other.venue);
        merge_str(&mut self.sec_email, &other.sec_email);
        merge_str(&mut self.premium_url, &other.premium_url);
        merge_str(&mut self.online_url, &other.online_url);
        merge_str(&mut self.note, &other.note);
        changed
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CalendarList(pub Vec<Calendar>);

impl Deref for CalendarList {
    type Target = Vec<Calendar>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for CalendarList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl CalendarList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0.push(Calendar::load(tree, version, cb)?);
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
        self.0.sort_by_key(|c| c.start_date);
    }

    /// Entries the handler has committed to (entered or pending).
    pub fn all_entered(&self) -> Vec<&Calendar> {
        self.0
            .iter()
            .filter(|c| {
                c.entered == CalendarEntry::Entered || c.entered == CalendarEntry::Pending
            })
            .collect()
    }

    /// Drops entries that finished before the given date.
    pub fn trim_entries(&mut self, date: ArbDate) -> usize {
        if !date.is_valid() {
            return 0;
        }
        let before = self.0.len();
        self.0.retain(|c| !c.is_before(date));
        before - self.0.len()
    }

    pub fn find_calendar(&self, cal: &Calendar, exact: bool) -> Option<&Calendar> {
        self.0.iter().find(|c| c.is_match(cal, exact))
    }

    pub fn add_calendar(&mut self, cal: Calendar) -> bool {
        if !cal.start_date.is_valid() || !cal.end_date.is_valid() {
            return false;
        }
        self.0.push(cal);
        true
    }

    pub fn delete_calendar(&mut self, cal: &Calendar) -> bool {
        match self.0.iter().position(|c| c == cal) {
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

    fn entry(start: ArbDate, end: ArbDate) -> Calendar {
        Calendar {
            start_date: start,
            end_date: end,
            venue: "AKC".to_string(),
            club: "Sample Club".to_string(),
            location: "Fairgrounds".to_string(),
            ..Calendar::default()
        }
    }

    #[test]
    fn start_and_end_dates_are_required() {
        let mut node = ElementNode::new(TREE_CALENDAR);
        node.add_attrib(ATTRIB_CAL_START, "2023-09-02");
        let mut log = ErrorLog::new();
        assert!(Calendar::load(&node, ArbVersion::new(15, 3), &mut log).is_err());
        assert!(!log.messages.is_empty());
    }

    #[test]
    fn version_one_plan_flag_maps_to_planning() {
        let mut node = ElementNode::new(TREE_CALENDAR);
        node.add_attrib(ATTRIB_CAL_START, "2023-09-02");
        node.add_attrib(ATTRIB_CAL_END, "2023-09-03");
        node.add_attrib("PlanOn", "y");
        let mut log = ErrorLog::new();
        let cal = Calendar::load(&node, ArbVersion::new(1, 0), &mut log).unwrap();
        assert_eq!(cal.entered, CalendarEntry::Planning);
    }

    #[test]
    fn entry_round_trips() {
        let mut cal = entry(ArbDate::new(2023, 9, 2), ArbDate::new(2023, 9, 3));
        cal.entered = CalendarEntry::Entered;
        cal.accommodations = Accommodation::Confirmed;
        cal.closing_date = ArbDate::new(2023, 8, 15);
        cal.note = "Bring shade".to_string();

        let mut parent = ElementNode::new("Test");
        cal.save(&mut parent);
        let node = parent.find_element_node(TREE_CALENDAR).unwrap();
        assert!(node.raw_attrib(ATTRIB_CAL_OPENING).is_none());

        let mut log = ErrorLog::new();
        let loaded = Calendar::load(node, ArbVersion::new(15, 3), &mut log).unwrap();
        assert_eq!(loaded, cal);
    }

    #[test]
    fn trim_drops_only_finished_entries() {
        let mut list = CalendarList::default();
        list.add_calendar(entry(ArbDate::new(2023, 9, 2), ArbDate::new(2023, 9, 3)));
        list.add_calendar(entry(ArbDate::new(2023, 10, 7), ArbDate::new(2023, 10, 8)));
        assert_eq!(list.trim_entries(ArbDate::new(2023, 10, 1)), 1);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].start_date, ArbDate::new(2023, 10, 7));
    }

    #[test]
    fn loose_match_ignores_entry_state() {
        let mut list = CalendarList::default();
        let mut cal = entry(ArbDate::new(2023, 9, 2), ArbDate::new(2023, 9, 3));
        cal.entered = CalendarEntry::Entered;
        list.add_calendar(cal);
        let probe = entry(ArbDate::new(2023, 9, 2), ArbDate::new(2023, 9, 3));
        assert!(list.find_calendar(&probe, false).is_some());
        assert!(list.find_calendar(&probe, true).is_none());
    }
}
