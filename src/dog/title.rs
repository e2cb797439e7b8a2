//! Titles a dog has earned.
//!
//! A title carries its own instance-rendering attributes so the display
//! name stays stable even if the configured title changes later.

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::config::title::{
    load_title_separator, load_title_style, save_title_separator, save_title_style,
    title_instance, TitleSeparator, TitleStyle,
};
use crate::config::venue::ConfigVenueList;
use crate::date::ArbDate;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::{ArbVersion, Lookup};

#[derive(Debug, Clone, PartialEq)]
pub struct DogTitle {
    pub date: ArbDate,
    pub venue: String,
    /// The configured title's short name; display names are derived.
    pub name: String,
    pub show_instance_one: bool,
    pub instance: i16,
    pub start_at: i16,
    pub increment: i16,
    pub style: TitleStyle,
    pub separator: TitleSeparator,
    pub received: bool,
    pub hidden: bool,
}

impl Default for DogTitle {
    fn default() -> Self {
        Self {
            date: ArbDate::invalid(),
            venue: String::new(),
            name: String::new(),
            show_instance_one: false,
            instance: 1,
            start_at: 1,
            increment: 1,
            style: TitleStyle::Number,
            separator: TitleSeparator::None,
            received: false,
            hidden: false,
        }
    }
}

impl DogTitle {
    pub fn load(
        tree: &ElementNode,
        venues: &ConfigVenueList,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_TITLE {
            return Err(ArbError::MissingElement(TREE_TITLE.to_string()));
        }
        let mut title = Self::default();
        title.venue = tree.req_attrib::<String>(ATTRIB_TITLE_VENUE)?;
        if title.venue.is_empty() {
            let err = ArbError::missing(TREE_TITLE, ATTRIB_TITLE_VENUE);
            cb.log_message(&err.to_string());
            return Err(err);
        }
        if venues.find_venue(&title.venue).is_none() {
            let err = ArbError::invalid(
                TREE_TITLE,
                ATTRIB_TITLE_VENUE,
                format!("unknown venue '{}'", title.venue),
            );
            cb.log_message(&err.to_string());
            return Err(err);
        }
        title.name = tree.req_attrib::<String>(ATTRIB_TITLE_NAME)?;
        if title.name.is_empty() {
            let err = ArbError::missing(TREE_TITLE, ATTRIB_TITLE_NAME);
            cb.log_message(&err.to_string());
            return Err(err);
        }

        // Hidden must be read before the date.
        tree.opt_attrib(ATTRIB_TITLE_HIDDEN, &mut title.hidden)?;
        match tree.attrib::<ArbDate>(ATTRIB_TITLE_DATE) {
            Lookup::Found(date) => title.date = date,
            Lookup::NotFound => {
                // As of version 8.5 a missing date marks an unearned
                // title that is merely being hidden.
                if version < ArbVersion::new(8, 5) {
                    let err = ArbError::missing(TREE_TITLE, ATTRIB_TITLE_DATE);
                    cb.log_message(&err.to_string());
                    return Err(err);
                }
                title.hidden = true;
            }
            Lookup::Invalid => {
                let raw = tree.raw_attrib(ATTRIB_TITLE_DATE).unwrap_or("");
                let err = ArbError::invalid_date(TREE_TITLE, ATTRIB_TITLE_DATE, raw);
                cb.log_message(&err.to_string());
                return Err(err);
            }
        }

        tree.opt_attrib(ATTRIB_TITLE_INSTANCE_SHOW, &mut title.show_instance_one)?;
        tree.opt_attrib(ATTRIB_TITLE_INSTANCE, &mut title.instance)?;
        if title.instance > 1 {
            title.show_instance_one = true;
        }
        tree.opt_attrib(ATTRIB_TITLE_INSTANCE_STARTAT, &mut title.start_at)?;
        tree.opt_attrib(ATTRIB_TITLE_INSTANCE_INC, &mut title.increment)?;
        title.style = load_title_style(tree, ATTRIB_TITLE_INSTANCE_STYLE, version)?;
        title.separator =
            load_title_separator(tree, ATTRIB_TITLE_INSTANCE_SEP, version, title.style)?;

        if let Lookup::Invalid = tree.attrib::<bool>(ATTRIB_TITLE_RECEIVED) {
            let err = ArbError::invalid_bool(TREE_TITLE, ATTRIB_TITLE_RECEIVED);
            cb.log_message(&err.to_string());
            return Err(err);
        }
        tree.attrib::<bool>(ATTRIB_TITLE_RECEIVED)
            .assign(&mut title.received);

        if venues.find_title(&title.venue, &title.name).is_none() {
            // Recover files that stored the display name instead of the
            // short name.
            let found = venues
                .find_title_complete_name(&title.venue, &title.name, true)
                .or_else(|| venues.find_title_complete_name(&title.venue, &title.name, false));
            match found {
                Some(t) => title.name = t.name.clone(),
                None => {
                    let err = ArbError::invalid(
                        TREE_TITLE,
                        ATTRIB_TITLE_NAME,
                        format!("unknown title '{}/{}'", title.venue, title.name),
                    );
                    cb.log_message(&err.to_string());
                    return Err(err);
                }
            }
        }
        Ok(title)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_TITLE);
        if self.date.is_valid() {
            node.add_attrib_date(ATTRIB_TITLE_DATE, self.date);
            if self.hidden {
                node.add_attrib_bool(ATTRIB_TITLE_HIDDEN, self.hidden);
            }
        } else {
            node.add_attrib_bool(ATTRIB_TITLE_HIDDEN, true);
        }
        node.add_attrib(ATTRIB_TITLE_VENUE, self.venue.clone());
        node.add_attrib(ATTRIB_TITLE_NAME, self.name.clone());
        if self.instance == 1 && self.show_instance_one {
            node.add_attrib_bool(ATTRIB_TITLE_INSTANCE_SHOW, self.show_instance_one);
        }
        if self.instance > 1 {
            node.add_attrib_short(ATTRIB_TITLE_INSTANCE, self.instance);
        }
        if self.start_at != 1 {
            node.add_attrib_short(ATTRIB_TITLE_INSTANCE_STARTAT, self.start_at);
        }
        if self.increment != 1 {
            node.add_attrib_short(ATTRIB_TITLE_INSTANCE_INC, self.increment);
        }
        save_title_style(node, ATTRIB_TITLE_INSTANCE_STYLE, self.style);
        save_title_separator(node, ATTRIB_TITLE_INSTANCE_SEP, self.separator);
        if self.received {
            node.add_attrib_bool(ATTRIB_TITLE_RECEIVED, self.received);
        }
    }

    /// The short name with its instance suffix ("MACH2").
    pub fn generic_name(&self) -> String {
        format!(
            "{}{}",
            self.name,
            title_instance(
                self.show_instance_one,
                self.instance,
                self.start_at,
                self.increment,
                self.style,
                self.separator,
            )
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DogTitleList(pub Vec<DogTitle>);

impl Deref for DogTitleList {
    type Target = Vec<DogTitle>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for DogTitleList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl DogTitleList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        venues: &ConfigVenueList,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0.push(DogTitle::load(tree, venues, version, cb)?);
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
            a.date
                .cmp(&b.date)
                .then_with(|| a.venue.cmp(&b.venue))
                .then_with(|| a.name.cmp(&b.name))
        });
    }

    pub fn num_titles_in_venue(&self, venue: &str) -> usize {
        self.0.iter().filter(|t| t.venue == venue).count()
    }

    /// The earned title with the highest instance, if any.
    pub fn find_title(&self, venue: &str, title: &str) -> Option<&DogTitle> {
        self.0
            .iter()
            .filter(|t| t.venue == venue && t.name == title)
            .max_by_key(|t| t.instance)
    }

    pub fn find_max_instance(&self, venue: &str, title: &str) -> i16 {
        self.0
            .iter()
            .filter(|t| t.venue == venue && t.name == title)
            .map(|t| t.instance)
            .max()
            .unwrap_or(0)
    }

    pub fn rename_venue(&mut self, old_venue: &str, new_venue: &str) -> usize {
        let mut count = 0;
        for title in self.0.iter_mut().filter(|t| t.venue == old_venue) {
            title.venue = new_venue.to_string();
            count += 1;
        }
        count
    }

    pub fn delete_venue(&mut self, venue: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|t| t.venue != venue);
        before - self.0.len()
    }

    pub fn num_titles_in_use(&self, venue: &str, title: &str) -> usize {
        self.0
            .iter()
            .filter(|t| t.venue == venue && t.name == title)
            .count()
    }

    pub fn rename_title(&mut self, venue: &str, old_title: &str, new_title: &str) -> usize {
        let mut count = 0;
        for title in self
            .0
            .iter_mut()
            .filter(|t| t.venue == venue && t.name == old_title)
        {
            title.name = new_title.to_string();
            count += 1;
        }
        count
    }

    pub fn add_title(&mut self, title: DogTitle) {
        self.0.push(title);
        self.sort();
    }

    pub fn delete_title(&mut self, title: &DogTitle) -> bool {
        match self.0.iter().position(|t| t == title) {
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

    fn venues() -> ConfigVenueList {
        let mut venues = ConfigVenueList::default();
        let akc = venues.add_venue("AKC").unwrap();
        let mach = akc.titles.add_title("MACH").unwrap();
        mach.long_name = "Master Agility Champion".to_string();
        mach.multiple_start_at = 1;
        venues
    }

    fn title_tree() -> ElementNode {
        let mut node = ElementNode::new(TREE_TITLE);
        node.add_attrib(ATTRIB_TITLE_VENUE, "AKC");
        node.add_attrib(ATTRIB_TITLE_NAME, "MACH");
        node.add_attrib(ATTRIB_TITLE_DATE, "2023-06-10");
        node
    }

    #[test]
    fn load_verifies_venue_and_title() {
        let mut log = ErrorLog::new();
        let title =
            DogTitle::load(&title_tree(), &venues(), ArbVersion::new(15, 3), &mut log).unwrap();
        assert_eq!(title.name, "MACH");
        assert!(!title.hidden);

        let mut bad = title_tree();
        bad.add_attrib(ATTRIB_TITLE_NAME, "NATCH");
        assert!(DogTitle::load(&bad, &venues(), ArbVersion::new(15, 3), &mut log).is_err());
    }

    #[test]
    fn display_names_resolve_to_the_short_name() {
        let mut node = title_tree();
        node.add_attrib(ATTRIB_TITLE_NAME, "[MACH] Master Agility Champion");
        let mut log = ErrorLog::new();
        let title = DogTitle::load(&node, &venues(), ArbVersion::new(15, 3), &mut log).unwrap();
        assert_eq!(title.name, "MACH");
    }

    #[test]
    fn missing_date_hides_the_title_in_newer_files() {
        let mut node = ElementNode::new(TREE_TITLE);
        node.add_attrib(ATTRIB_TITLE_VENUE, "AKC");
        node.add_attrib(ATTRIB_TITLE_NAME, "MACH");
        let mut log = ErrorLog::new();
        let title = DogTitle::load(&node, &venues(), ArbVersion::new(15, 3), &mut log).unwrap();
        assert!(title.hidden);
        assert!(!title.date.is_valid());
        assert!(DogTitle::load(&node, &venues(), ArbVersion::new(8, 4), &mut log).is_err());
    }

    #[test]
    fn generic_name_appends_the_instance() {
        let title = DogTitle {
            name: "MACH".to_string(),
            instance: 3,
            show_instance_one: true,
            ..DogTitle::default()
        };
        assert_eq!(title.generic_name(), "MACH3");
    }

    #[test]
    fn list_sorts_by_date_then_venue_then_name() {
        let mut list = DogTitleList::default();
        list.add_title(DogTitle {
            date: ArbDate::new(2024, 1, 1),
            venue: "USDAA".to_string(),
            name: "ADCH".to_string(),
            ..DogTitle::default()
        });
        list.add_title(DogTitle {
            date: ArbDate::new(2023, 1, 1),
            venue: "AKC".to_string(),
            name: "MACH".to_string(),
            ..DogTitle::default()
        });
        assert_eq!(list[0].name, "MACH");
        assert_eq!(list.find_max_instance("AKC", "MACH"), 1);
        assert_eq!(list.rename_title("AKC", "MACH", "PACH"), 1);
        assert_eq!(list.num_titles_in_use("AKC", "PACH"), 1);
    }
}
