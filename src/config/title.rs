//! Titles a venue awards, including multiple-instance rendering
//! ("MACH2", "NATCH-III").

use std::ops::{Deref, DerefMut};

use crate::callbacks::ErrorCallback;
use crate::date::ArbDate;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::schema::*;
use crate::types::{ArbVersion, Lookup};

/// How a title instance number is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleStyle {
    None,
    #[default]
    Number,
    Roman,
}

/// Separator between the title name and its instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleSeparator {
    #[default]
    None,
    Space,
    Hyphen,
}

impl TitleSeparator {
    fn as_str(&self) -> &'static str {
        match self {
            TitleSeparator::None => "",
            TitleSeparator::Space => " ",
            TitleSeparator::Hyphen => "-",
        }
    }
}

pub(crate) fn load_title_style(
    tree: &ElementNode,
    attrib: &str,
    version: ArbVersion,
) -> ArbResult<TitleStyle> {
    if version < ArbVersion::new(14, 0) {
        match tree.attrib::<i16>(attrib) {
            Lookup::NotFound => Ok(TitleStyle::Number),
            Lookup::Found(0) => Ok(TitleStyle::Number),
            Lookup::Found(1) => Ok(TitleStyle::Roman),
            Lookup::Found(2) => Ok(TitleStyle::None),
            _ => Err(ArbError::invalid(tree.name(), attrib, "unknown style")),
        }
    } else {
        match tree.raw_attrib(attrib) {
            None => Ok(TitleStyle::Number),
            Some("0") => Ok(TitleStyle::None),
            Some("n") => Ok(TitleStyle::Number),
            Some("r") => Ok(TitleStyle::Roman),
            Some(_) => Err(ArbError::invalid(tree.name(), attrib, "unknown style")),
        }
    }
}

pub(crate) fn save_title_style(node: &mut ElementNode, attrib: &str, style: TitleStyle) {
    // Number is the default and is not written.
    match style {
        TitleStyle::None => {
            node.add_attrib(attrib, "0");
        }
        TitleStyle::Number => {}
        TitleStyle::Roman => {
            node.add_attrib(attrib, "r");
        }
    }
}

pub(crate) fn load_title_separator(
    tree: &ElementNode,
    attrib: &str,
    version: ArbVersion,
    style: TitleStyle,
) -> ArbResult<TitleSeparator> {
    let mut sep = match tree.raw_attrib(attrib) {
        None => TitleSeparator::None,
        Some("n") => TitleSeparator::None,
        Some("s") => TitleSeparator::Space,
        Some("h") => TitleSeparator::Hyphen,
        Some(_) => return Err(ArbError::invalid(tree.name(), attrib, "unknown separator")),
    };
    // Roman titles were always hyphenated before the separator existed.
    if version < ArbVersion::new(14, 0) && style == TitleStyle::Roman {
        sep = TitleSeparator::Hyphen;
    }
    Ok(sep)
}

pub(crate) fn save_title_separator(node: &mut ElementNode, attrib: &str, sep: TitleSeparator) {
    match sep {
        TitleSeparator::None => {}
        TitleSeparator::Space => {
            node.add_attrib(attrib, "s");
        }
        TitleSeparator::Hyphen => {
            node.add_attrib(attrib, "h");
        }
    }
}

pub fn short_to_roman(mut value: i16) -> String {
    const TABLE: [(i16, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (n, digits) in TABLE {
        while value >= n {
            out.push_str(digits);
            value -= n;
        }
    }
    out
}

/// Renders the instance suffix of a title ("2", "-III", " 4").
pub fn title_instance(
    show_instance_one: bool,
    instance: i16,
    start_at: i16,
    increment: i16,
    mut style: TitleStyle,
    sep: TitleSeparator,
) -> String {
    if !(show_instance_one || instance > 1) {
        return String::new();
    }
    // A new (unearned) title has no instance yet, so skip "title0".
    if show_instance_one && instance == 0 {
        style = TitleStyle::None;
    }
    let value = start_at + (instance - 1) * increment;
    match style {
        TitleStyle::None => String::new(),
        TitleStyle::Number => format!("{}{}", sep.as_str(), value),
        TitleStyle::Roman => format!("{}{}", sep.as_str(), short_to_roman(value)),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTitle {
    pub name: String,
    pub long_name: String,
    pub description: String,
    pub prefix: bool,
    pub valid_from: ArbDate,
    pub valid_to: ArbDate,
    /// 0 disables multiple instances.
    pub multiple_start_at: i16,
    pub multiple_increment: i16,
    pub multiple_on_first: bool,
    pub multiple_style: TitleStyle,
    pub multiple_separator: TitleSeparator,
}

impl Default for ConfigTitle {
    fn default() -> Self {
        Self {
            name: String::new(),
            long_name: String::new(),
            description: String::new(),
            prefix: false,
            valid_from: ArbDate::invalid(),
            valid_to: ArbDate::invalid(),
            multiple_start_at: 0,
            multiple_increment: 1,
            multiple_on_first: false,
            multiple_style: TitleStyle::Number,
            multiple_separator: TitleSeparator::None,
        }
    }
}

impl ConfigTitle {
    pub fn is_valid_on(&self, date: ArbDate) -> bool {
        !(date.is_valid()
            && ((self.valid_from.is_valid() && date < self.valid_from)
                || (self.valid_to.is_valid() && date > self.valid_to)))
    }

    pub fn load(
        tree: &ElementNode,
        version: ArbVersion,
        _cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_TITLES {
            return Err(ArbError::MissingElement(TREE_TITLES.to_string()));
        }
        let mut title = Self::default();
        title.name = tree.req_attrib::<String>(ATTRIB_TITLES_NAME)?;
        if title.name.is_empty() {
            return Err(ArbError::missing(TREE_TITLES, ATTRIB_TITLES_NAME));
        }
        tree.opt_attrib(ATTRIB_TITLES_LONGNAME, &mut title.long_name)?;
        title.description = tree.value();
        tree.opt_attrib(ATTRIB_TITLES_PREFIX, &mut title.prefix)?;
        tree.opt_attrib(ATTRIB_TITLES_VALIDFROM, &mut title.valid_from)?;
        tree.opt_attrib(ATTRIB_TITLES_VALIDTO, &mut title.valid_to)?;
        if version < ArbVersion::new(14, 0) {
            // Old files had a tri-state "Multiple" flag.
            if let Lookup::Found(multiple) = tree.attrib::<i16>("Multiple") {
                if multiple == 1 {
                    title.multiple_start_at = 1;
                    title.multiple_on_first = true;
                } else if multiple == 2 {
                    title.multiple_start_at = 1;
                    title.multiple_on_first = false;
                }
            }
        } else {
            tree.opt_attrib(ATTRIB_TITLES_MULTIPLE_STARTAT, &mut title.multiple_start_at)?;
        }
        if title.multiple_start_at > 0 {
            tree.opt_attrib(ATTRIB_TITLES_MULTIPLE_INC, &mut title.multiple_increment)?;
            tree.opt_attrib(ATTRIB_TITLES_MULTIPLE_ONFIRST, &mut title.multiple_on_first)?;
            title.multiple_style = load_title_style(tree, ATTRIB_TITLES_MULTIPLE_STYLE, version)?;
            title.multiple_separator = load_title_separator(
                tree,
                ATTRIB_TITLES_MULTIPLE_SEP,
                version,
                title.multiple_style,
            )?;
        }
        Ok(title)
    }

    pub fn save(&self, parent: &mut ElementNode) {
        let node = parent.add_element_node(TREE_TITLES);
        node.add_attrib(ATTRIB_TITLES_NAME, self.name.clone());
        if !self.long_name.is_empty() {
            node.add_attrib(ATTRIB_TITLES_LONGNAME, self.long_name.clone());
        }
        if !self.description.is_empty() {
            node.set_value(self.description.clone());
        }
        if self.prefix {
            node.add_attrib_bool(ATTRIB_TITLES_PREFIX, self.prefix);
        }
        if self.valid_from.is_valid() {
            node.add_attrib_date(ATTRIB_TITLES_VALIDFROM, self.valid_from);
        }
        if self.valid_to.is_valid() {
            node.add_attrib_date(ATTRIB_TITLES_VALIDTO, self.valid_to);
        }
        if self.multiple_start_at > 0 {
            node.add_attrib_short(ATTRIB_TITLES_MULTIPLE_STARTAT, self.multiple_start_at);
            if self.multiple_increment > 1 {
                node.add_attrib_short(ATTRIB_TITLES_MULTIPLE_INC, self.multiple_increment);
            }
            if self.multiple_on_first {
                node.add_attrib_bool(ATTRIB_TITLES_MULTIPLE_ONFIRST, self.multiple_on_first);
            }
            save_title_style(node, ATTRIB_TITLES_MULTIPLE_STYLE, self.multiple_style);
            save_title_separator(node, ATTRIB_TITLES_MULTIPLE_SEP, self.multiple_separator);
        }
    }

    /// The short name with its instance suffix ("MACH2").
    pub fn title_name(&self, instance: i16) -> String {
        format!(
            "{}{}",
            self.name,
            title_instance(
                if instance < 0 {
                    false
                } else {
                    self.multiple_on_first
                },
                instance,
                self.multiple_start_at,
                self.multiple_increment,
                self.multiple_style,
                self.multiple_separator,
            )
        )
    }

    /// The display name: long name with the abbreviation in brackets,
    /// optionally with the validity range appended.
    pub fn complete_name(&self, instance: i16, abbrev_first: bool, add_dates: bool) -> String {
        let mut suffix = title_instance(
            if instance < 0 {
                false
            } else {
                self.multiple_on_first
            },
            instance,
            self.multiple_start_at,
            self.multiple_increment,
            self.multiple_style,
            self.multiple_separator,
        );
        // Configuration dialogs show repeatable titles as "name+".
        if instance < 0 && self.multiple_start_at > 0 {
            suffix.push('+');
        }
        let mut name = String::new();
        if !self.long_name.is_empty() {
            if abbrev_first {
                name.push_str(&format!("[{}{}] ", self.name, suffix));
            }
            name.push_str(&self.long_name);
            if !abbrev_first {
                name.push_str(&format!(" [{}{}]", self.name, suffix));
            }
        } else {
            name.push_str(&format!("{}{}", self.name, suffix));
        }
        if add_dates {
            let dates = ArbDate::valid_date_string(self.valid_from, self.valid_to);
            if !dates.is_empty() {
                name.push(' ');
                name.push_str(&dates);
            }
        }
        name
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigTitleList(pub Vec<ConfigTitle>);

impl Deref for ConfigTitleList {
    type Target = Vec<ConfigTitle>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigTitleList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ConfigTitleList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
        check_dups: bool,
    ) -> ArbResult<()> {
        let title = ConfigTitle::load(tree, version, cb)?;
        if check_dups && self.find_title(&title.name).is_some() {
            return Err(ArbError::invalid(
                TREE_TITLES,
                ATTRIB_TITLES_NAME,
                "duplicate title",
            ));
        }
        self.0.push(title);
        Ok(())
    }

    pub fn save(&self, parent: &mut ElementNode) {
        for item in &self.0 {
            item.save(parent);
        }
    }

    pub fn reorder_by(&mut self, other: &ConfigTitleList) {
        if self.0 == other.0 {
            return;
        }
        let mut reordered = Vec::with_capacity(self.0.len());
        for want in &other.0 {
            if let Some(i) = self.0.iter().position(|t| t.name == want.name) {
                reordered.push(self.0.remove(i));
            }
        }
        reordered.append(&mut self.0);
        self.0 = reordered;
    }

    pub fn find_title(&self, name: &str) -> Option<&ConfigTitle> {
        self.0.iter().find(|t| t.name == name)
    }

    pub fn find_title_mut(&mut self, name: &str) -> Option<&mut ConfigTitle> {
        self.0.iter_mut().find(|t| t.name == name)
    }

    pub fn find_title_complete_name(
        &self,
        name: &str,
        instance: i16,
        abbrev_first: bool,
    ) -> Option<&ConfigTitle> {
        self.0
            .iter()
            .find(|t| t.complete_name(instance, abbrev_first, false) == name)
    }

    pub fn add_title(&mut self, name: &str) -> Option<&mut ConfigTitle> {
        if name.is_empty() || self.find_title(name).is_some() {
            return None;
        }
        self.0.push(ConfigTitle {
            name: name.to_string(),
            ..ConfigTitle::default()
        });
        self.0.last_mut()
    }

    pub fn delete_title(&mut self, name: &str) -> bool {
        match self.0.iter().position(|t| t.name == name) {
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

    fn mach() -> ConfigTitle {
        ConfigTitle {
            name: "MACH".to_string(),
            long_name: "Master Agility Champion".to_string(),
            multiple_start_at: 1,
            multiple_on_first: false,
            ..ConfigTitle::default()
        }
    }

    #[test]
    fn first_instance_is_silent_unless_requested() {
        let title = mach();
        assert_eq!(title.title_name(1), "MACH");
        assert_eq!(title.title_name(2), "MACH2");
    }

    #[test]
    fn roman_instances_use_separator() {
        let mut title = mach();
        title.multiple_style = TitleStyle::Roman;
        title.multiple_separator = TitleSeparator::Hyphen;
        assert_eq!(title.title_name(4), "MACH-IV");
    }

    #[test]
    fn complete_name_brackets_abbreviation() {
        let title = mach();
        assert_eq!(
            title.complete_name(2, false, false),
            "Master Agility Champion [MACH2]"
        );
        assert_eq!(
            title.complete_name(2, true, false),
            "[MACH2] Master Agility Champion"
        );
    }

    #[test]
    fn validity_window_bounds_are_inclusive() {
        let mut title = mach();
        title.valid_from = ArbDate::new(2010, 1, 1);
        title.valid_to = ArbDate::new(2015, 12, 31);
        assert!(title.is_valid_on(ArbDate::new(2010, 1, 1)));
        assert!(title.is_valid_on(ArbDate::new(2015, 12, 31)));
        assert!(!title.is_valid_on(ArbDate::new(2009, 12, 31)));
        assert!(!title.is_valid_on(ArbDate::new(2016, 1, 1)));
        // An invalid date is always acceptable.
        assert!(title.is_valid_on(ArbDate::invalid()));
    }

    #[test]
    fn roman_numerals() {
        assert_eq!(short_to_roman(4), "IV");
        assert_eq!(short_to_roman(9), "IX");
        assert_eq!(short_to_roman(14), "XIV");
        assert_eq!(short_to_roman(1994), "MCMXCIV");
    }
}
