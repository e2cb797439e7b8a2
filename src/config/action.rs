//! Configuration actions: scripted rename/delete fixups that ship with
//! a newer configuration and patch both the configuration and the dogs
//! recorded against it before the structural merge runs.
//!
//! The 2004 USDAA rules renamed title abbreviations (PG to PG3, PS to
//! PK3); actions exist so an update can carry those renames without
//! stranding earlier records.

use std::ops::{Deref, DerefMut};

use crate::callbacks::{ConfigActionCallback, ErrorCallback};
use crate::config::venue::ConfigVenue;
use crate::config::Config;
use crate::dog::DogList;
use crate::element::ElementNode;
use crate::errors::{ArbError, ArbResult};
use crate::messages;
use crate::schema::*;
use crate::types::ArbVersion;

#[derive(Debug, Clone, PartialEq)]
pub enum ActionVerb {
    DeleteCalPlugin {
        name: String,
    },
    RenameOtherPoints {
        old_name: String,
        new_name: String,
    },
    DeleteOtherPoints {
        name: String,
    },
    RenameVenue {
        old_name: String,
        new_name: String,
    },
    DeleteVenue {
        name: String,
    },
    RenameMultiQ {
        venue: String,
        old_name: String,
        new_name: String,
    },
    DeleteMultiQ {
        venue: String,
        name: String,
    },
    RenameDivision {
        venue: String,
        old_name: String,
        new_name: String,
    },
    DeleteDivision {
        venue: String,
        name: String,
    },
    /// Renames a level when `level` is empty, otherwise the sublevel
    /// `old_name` under the level named `level`.
    RenameLevel {
        venue: String,
        division: String,
        level: String,
        old_name: String,
        new_name: String,
    },
    /// Deletes a level when `level` is empty, otherwise the sublevel
    /// `name` under the level named `level`.
    DeleteLevel {
        venue: String,
        division: String,
        level: String,
        name: String,
    },
    RenameTitle {
        venue: String,
        old_name: String,
        new_name: String,
    },
    /// A non-empty `new_name` turns the deletion into a rename for
    /// titles dogs have already earned.
    DeleteTitle {
        venue: String,
        old_name: String,
        new_name: String,
    },
    RenameEvent {
        venue: String,
        old_name: String,
        new_name: String,
    },
    DeleteEvent {
        venue: String,
        name: String,
    },
    RenameLifetimeName {
        venue: String,
        old_name: String,
        new_name: String,
    },
    DeleteLifetimeName {
        venue: String,
        name: String,
    },
}

/// One scripted fixup. Actions are loaded from a configuration file
/// but never written back.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigAction {
    /// Configuration version this action first shipped in; 0 means the
    /// action always runs.
    pub config_version: i16,
    pub verb: ActionVerb,
}

impl ConfigAction {
    pub fn new(config_version: i16, verb: ActionVerb) -> Self {
        Self {
            config_version,
            verb,
        }
    }

    pub fn load(
        tree: &ElementNode,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<Self> {
        if tree.name() != TREE_ACTION {
            return Err(ArbError::MissingElement(TREE_ACTION.to_string()));
        }
        let verb = tree.req_attrib::<String>(ATTRIB_ACTION_VERB)?;
        if verb.is_empty() {
            return Err(ArbError::missing(TREE_ACTION, ATTRIB_ACTION_VERB));
        }
        // The config version stamp was added in 12.12.
        let mut config_version: i16 = 0;
        if tree.raw_attrib(ATTRIB_ACTION_CONFIG).is_some() || version >= ArbVersion::new(12, 12) {
            config_version = tree.req_attrib::<i16>(ATTRIB_ACTION_CONFIG)?;
        }
        let mut venue = String::new();
        let mut division = String::new();
        let mut old_name = String::new();
        let mut new_name = String::new();
        tree.opt_attrib(ATTRIB_ACTION_VENUE, &mut venue)?;
        tree.opt_attrib(ATTRIB_ACTION_DIVISION, &mut division)?;
        tree.opt_attrib(ATTRIB_ACTION_OLDNAME, &mut old_name)?;
        tree.opt_attrib(ATTRIB_ACTION_NEWNAME, &mut new_name)?;
        let verb = match verb.as_str() {
            ACTION_VERB_DELETE_CALPLUGIN => ActionVerb::DeleteCalPlugin { name: old_name },
            ACTION_VERB_DELETE_TITLE => ActionVerb::DeleteTitle {
                venue,
                old_name,
                new_name,
            },
            ACTION_VERB_RENAME_TITLE => ActionVerb::RenameTitle {
                venue,
                old_name,
                new_name,
            },
            ACTION_VERB_DELETE_EVENT => ActionVerb::DeleteEvent {
                venue,
                name: old_name,
            },
            ACTION_VERB_RENAME_EVENT => ActionVerb::RenameEvent {
                venue,
                old_name,
                new_name,
            },
            ACTION_VERB_RENAME_LEVEL => ActionVerb::RenameLevel {
                venue,
                division,
                level: String::new(),
                old_name,
                new_name,
            },
            ACTION_VERB_RENAME_DIV => ActionVerb::RenameDivision {
                venue,
                old_name,
                new_name,
            },
            ACTION_VERB_RENAME_VENUE => ActionVerb::RenameVenue { old_name, new_name },
            _ => {
                let err = ArbError::invalid(
                    TREE_ACTION,
                    ATTRIB_ACTION_VERB,
                    format!(
                        "must be one of: {ACTION_VERB_DELETE_CALPLUGIN}, \
                         {ACTION_VERB_DELETE_TITLE}, {ACTION_VERB_RENAME_TITLE}, \
                         {ACTION_VERB_DELETE_EVENT}, {ACTION_VERB_RENAME_EVENT}, \
                         {ACTION_VERB_RENAME_LEVEL}, {ACTION_VERB_RENAME_DIV}, \
                         {ACTION_VERB_RENAME_VENUE}"
                    ),
                );
                cb.log_message(&err.to_string());
                return Err(err);
            }
        };
        Ok(Self {
            config_version,
            verb,
        })
    }

    /// Applies this action to the configuration and, when present, the
    /// dogs recorded against it. Appends a report line per change.
    /// Returns whether anything changed.
    pub fn apply(
        &self,
        config: &mut Config,
        mut dogs: Option<&mut DogList>,
        info: &mut String,
        cb: &mut dyn ConfigActionCallback,
    ) -> bool {
        let mut changed = false;
        match &self.verb {
            ActionVerb::DeleteCalPlugin { name } => {
                if config.cal_sites.delete_site(name) {
                    changed = true;
                    info.push_str(&messages::action_delete_calendar_plugin(name));
                    info.push('\n');
                }
            }
            ActionVerb::RenameOtherPoints { old_name, new_name } => {
                if config.other_points.find(old_name).is_some() {
                    changed = true;
                    let count = dogs
                        .as_deref()
                        .map_or(0, |d| d.num_other_points_in_use(old_name));
                    info.push_str(&messages::action_rename_other_points(
                        old_name, new_name, count,
                    ));
                    info.push('\n');
                    if count > 0 {
                        if let Some(d) = dogs.as_deref_mut() {
                            d.rename_other_points(old_name, new_name);
                        }
                    }
                    // If the new name exists, just delete the old.
                    if config.other_points.find(new_name).is_some() {
                        config.other_points.delete(old_name);
                    } else if let Some(item) = config
                        .other_points
                        .iter_mut()
                        .find(|o| &o.name == old_name)
                    {
                        item.name = new_name.clone();
                    }
                }
            }
            ActionVerb::DeleteOtherPoints { name } => {
                if config.other_points.find(name).is_some() {
                    let count = dogs.as_deref().map_or(0, |d| d.num_other_points_in_use(name));
                    if count > 0 {
                        if let Some(d) = dogs.as_deref_mut() {
                            let msg = messages::action_pre_delete_other_points(name, count);
                            cb.pre_delete(&msg);
                            if !cb.can_continue() {
                                return changed;
                            }
                            info.push_str(&msg);
                            info.push('\n');
                            d.delete_other_points(name);
                        }
                    }
                    changed = true;
                    info.push_str(&messages::action_delete_other_points(name));
                    info.push('\n');
                    config.other_points.delete(name);
                }
            }
            ActionVerb::RenameVenue { old_name, new_name } => {
                if config.venues.find_venue(old_name).is_some() {
                    changed = true;
                    let count = dogs.as_deref().map_or(0, |d| {
                        d.num_existing_points_in_venue(old_name)
                            + d.num_reg_nums_in_venue(old_name)
                            + d.num_titles_in_venue(old_name)
                            + d.num_trials_in_venue(old_name)
                    });
                    if count > 0 {
                        if let Some(d) = dogs.as_deref_mut() {
                            d.rename_venue(old_name, new_name);
                        }
                    }
                    info.push_str(&messages::action_rename_venue(old_name, new_name, count));
                    info.push('\n');
                    if config.venues.find_venue(new_name).is_some() {
                        config.venues.delete_venue(old_name);
                    } else if let Some(v) = config.venues.find_venue_mut(old_name) {
                        v.name = new_name.clone();
                    }
                }
            }
            ActionVerb::DeleteVenue { name } => {
                if config.venues.find_venue(name).is_some() {
                    let count = dogs.as_deref().map_or(0, |d| {
                        d.num_existing_points_in_venue(name)
                            + d.num_reg_nums_in_venue(name)
                            + d.num_titles_in_venue(name)
                            + d.num_trials_in_venue(name)
                    });
                    if count > 0 {
                        if let Some(d) = dogs.as_deref_mut() {
                            let msg = messages::action_pre_delete_venue(name, count);
                            cb.pre_delete(&msg);
                            if !cb.can_continue() {
                                return changed;
                            }
                            info.push_str(&msg);
                            info.push('\n');
                            d.delete_venue(name);
                        }
                    }
                    changed = true;
                    info.push_str(&messages::action_delete_venue(name));
                    info.push('\n');
                    config.venues.delete_venue(name);
                }
            }
            ActionVerb::RenameMultiQ {
                venue,
                old_name,
                new_name,
            } => {
                if let Some(v) = config.venues.find_venue(venue) {
                    if v.multiqs.find_multiq(old_name, false).is_some() {
                        changed = true;
                        let count = dogs
                            .as_deref()
                            .map_or(0, |d| d.num_multiqs_in_use(venue, old_name));
                        if count > 0 {
                            if let Some(d) = dogs.as_deref_mut() {
                                d.rename_multiqs(venue, old_name, new_name);
                            }
                        }
                        info.push_str(&messages::action_rename_multiq(
                            venue, old_name, new_name, count,
                        ));
                        info.push('\n');
                        if let Some(v) = config.venues.find_venue_mut(venue) {
                            if v.multiqs.find_multiq(new_name, false).is_some() {
                                v.multiqs.delete_multiq(old_name);
                            } else if let Some(m) = v.multiqs.find_multiq_mut(old_name) {
                                m.name = new_name.clone();
                            }
                        }
                    }
                }
            }
            ActionVerb::DeleteMultiQ { venue, name } => {
                if let Some(v) = config.venues.find_venue(venue) {
                    if v.multiqs.find_multiq(name, false).is_some() {
                        let count = dogs
                            .as_deref()
                            .map_or(0, |d| d.num_multiqs_in_use(venue, name));
                        if count > 0 && dogs.is_some() {
                            let msg = messages::action_pre_delete_multiq(venue, name, count);
                            cb.pre_delete(&msg);
                            if !cb.can_continue() {
                                return changed;
                            }
                            info.push_str(&msg);
                            info.push('\n');
                        }
                        changed = true;
                        info.push_str(&messages::action_delete_multiq(venue, name));
                        info.push('\n');
                        if let Some(v) = config.venues.find_venue_mut(venue) {
                            v.multiqs.delete_multiq(name);
                        }
                        // The multiple Qs earned by dogs are rebuilt at
                        // the very end of the document update.
                    }
                }
            }
            ActionVerb::RenameDivision {
                venue,
                old_name,
                new_name,
            } => {
                let mut found = false;
                let mut count = 0;
                if let Some(v) = config.venues.find_venue(venue) {
                    if v.divisions.find_division(old_name).is_some() {
                        found = true;
                        count = dogs
                            .as_deref()
                            .map_or(0, |d| d.num_runs_in_division(v, old_name));
                        if count > 0 {
                            if let Some(d) = dogs.as_deref_mut() {
                                d.rename_division(v, old_name, new_name);
                            }
                        }
                    }
                }
                if found {
                    changed = true;
                    info.push_str(&messages::action_rename_division(
                        venue, old_name, new_name, count,
                    ));
                    info.push('\n');
                    if let Some(v) = config.venues.find_venue_mut(venue) {
                        if v.divisions.find_division(new_name).is_some() {
                            let ConfigVenue {
                                divisions, events, ..
                            } = v;
                            divisions.delete_division(old_name, events);
                        } else if let Some(div) = v.divisions.find_division_mut(old_name) {
                            div.name = new_name.clone();
                        }
                    }
                }
            }
            ActionVerb::DeleteDivision { venue, name } => {
                let mut found = false;
                let mut count = 0;
                if let Some(v) = config.venues.find_venue(venue) {
                    if v.divisions.find_division(name).is_some() {
                        found = true;
                        count = dogs.as_deref().map_or(0, |d| {
                            d.num_runs_in_division(v, name)
                                + d.num_existing_points_in_division(v, name)
                        });
                    }
                }
                if found {
                    if count > 0 && dogs.is_some() {
                        let msg = messages::action_pre_delete_division(venue, name, count);
                        cb.pre_delete(&msg);
                        if !cb.can_continue() {
                            return changed;
                        }
                        info.push_str(&msg);
                        info.push('\n');
                        if let Some(d) = dogs.as_deref_mut() {
                            d.delete_division(&*config, venue, name);
                        }
                    }
                    changed = true;
                    info.push_str(&messages::action_delete_division(venue, name));
                    info.push('\n');
                    if let Some(v) = config.venues.find_venue_mut(venue) {
                        let ConfigVenue {
                            divisions,
                            events,
                            multiqs,
                            ..
                        } = v;
                        if divisions.delete_division(name, events) {
                            multiqs.delete_division(name);
                        }
                    }
                }
            }
            ActionVerb::RenameLevel {
                venue,
                division,
                level,
                old_name,
                new_name,
            } => {
                let mut leaf = false;
                let mut found = false;
                if let Some(v) = config.venues.find_venue(venue) {
                    if let Some(div) = v.divisions.find_division(division) {
                        if level.is_empty() {
                            if let Some(l) = div.levels.find_level(old_name) {
                                found = true;
                                leaf = l.sub_levels.is_empty();
                            }
                        } else if div.levels.find_level(level).is_some() {
                            found = true;
                            leaf = true;
                        }
                    }
                }
                if found {
                    changed = true;
                    let mut count = 0;
                    // Runs record the leaf name, so only leaf renames
                    // touch the dogs.
                    if leaf {
                        if let Some(d) = dogs.as_deref_mut() {
                            count = d.num_levels_in_use(venue, division, old_name);
                            d.rename_level(venue, division, old_name, new_name);
                        }
                    }
                    info.push_str(&messages::action_rename_level(
                        venue, old_name, new_name, count,
                    ));
                    info.push('\n');
                    if let Some(v) = config.venues.find_venue_mut(venue) {
                        let ConfigVenue {
                            divisions,
                            events,
                            multiqs,
                            ..
                        } = v;
                        // Events only record level names.
                        if level.is_empty() {
                            events.rename_level(division, old_name, new_name);
                        }
                        if leaf {
                            multiqs.rename_level(division, old_name, new_name);
                        }
                        if let Some(div) = divisions.find_division_mut(division) {
                            if level.is_empty() {
                                if div.levels.find_level(new_name).is_some() {
                                    div.levels.delete_level(division, old_name, events);
                                } else if let Some(l) = div.levels.find_level_mut(old_name) {
                                    l.name = new_name.clone();
                                }
                            } else {
                                let clash = div.levels.find_level(level).map_or(false, |p| {
                                    p.sub_levels.find_sub_level(new_name).is_some()
                                });
                                if clash {
                                    let mut modified = false;
                                    div.levels.delete_sub_level(old_name, &mut modified);
                                } else if let Some(parent) = div.levels.find_level_mut(level) {
                                    if let Some(s) =
                                        parent.sub_levels.find_sub_level_mut(old_name)
                                    {
                                        s.name = new_name.clone();
                                    }
                                }
                            }
                        }
                    }
                }
            }
            ActionVerb::DeleteLevel {
                venue,
                division,
                level,
                name,
            } => {
                // Every leaf (sub)level that will disappear.
                let mut leaves: Vec<String> = Vec::new();
                if let Some(v) = config.venues.find_venue(venue) {
                    if let Some(div) = v.divisions.find_division(division) {
                        if level.is_empty() {
                            if let Some(l) = div.levels.find_level(name) {
                                if l.sub_levels.is_empty() {
                                    leaves.push(name.clone());
                                } else {
                                    leaves.extend(l.sub_levels.iter().map(|s| s.name.clone()));
                                }
                            }
                        } else if div.levels.find_level(level).is_some() {
                            leaves.push(name.clone());
                        }
                    }
                }
                if !leaves.is_empty() {
                    let count = dogs.as_deref().map_or(0, |d| {
                        leaves
                            .iter()
                            .map(|l| d.num_levels_in_use(venue, division, l))
                            .sum()
                    });
                    if count > 0 {
                        if let Some(d) = dogs.as_deref_mut() {
                            let msg = messages::action_pre_delete_level(venue, name, count);
                            cb.pre_delete(&msg);
                            if !cb.can_continue() {
                                return changed;
                            }
                            info.push_str(&msg);
                            info.push('\n');
                            for leaf in &leaves {
                                d.delete_level(venue, division, leaf);
                            }
                        }
                    }
                    changed = true;
                    info.push_str(&messages::action_delete_level(venue, name));
                    info.push('\n');
                    if let Some(v) = config.venues.find_venue_mut(venue) {
                        let ConfigVenue {
                            divisions,
                            events,
                            multiqs,
                            ..
                        } = v;
                        if let Some(div) = divisions.find_division_mut(division) {
                            if level.is_empty() {
                                if div.levels.delete_level(division, name, events) {
                                    multiqs.delete_level(name);
                                }
                            } else {
                                // If removing the last sublevel renamed
                                // the parent level, leave the new name.
                                let mut modified = false;
                                if div.levels.delete_sub_level(name, &mut modified) {
                                    multiqs.delete_level(name);
                                }
                            }
                        }
                    }
                }
            }
            ActionVerb::RenameTitle {
                venue,
                old_name,
                new_name,
            } => {
                let found = config
                    .venues
                    .find_venue(venue)
                    .map_or(false, |v| v.titles.find_title(old_name).is_some());
                if found {
                    changed = true;
                    let count = dogs
                        .as_deref()
                        .map_or(0, |d| d.num_titles_in_use(venue, old_name));
                    if count > 0 {
                        if let Some(d) = dogs.as_deref_mut() {
                            d.rename_title(venue, old_name, new_name);
                        }
                    }
                    info.push_str(&messages::action_rename_title(
                        venue, old_name, new_name, count,
                    ));
                    info.push('\n');
                    if let Some(v) = config.venues.find_venue_mut(venue) {
                        if v.titles.find_title(new_name).is_some() {
                            v.titles.delete_title(old_name);
                        } else if let Some(t) = v.titles.find_title_mut(old_name) {
                            t.name = new_name.clone();
                        }
                    }
                }
            }
            ActionVerb::DeleteTitle {
                venue,
                old_name,
                new_name,
            } => {
                let found = config
                    .venues
                    .find_venue(venue)
                    .map_or(false, |v| v.titles.find_title(old_name).is_some());
                if found {
                    let count = dogs
                        .as_deref()
                        .map_or(0, |d| d.num_titles_in_use(venue, old_name));
                    if count > 0 && dogs.is_some() {
                        // A title earned under a broken configuration
                        // (the same title in several divisions) cannot
                        // be told apart; rename or delete all of them.
                        if !new_name.is_empty() {
                            info.push_str(&messages::action_rename_title(
                                venue, old_name, new_name, count,
                            ));
                            info.push('\n');
                            if let Some(d) = dogs.as_deref_mut() {
                                d.rename_title(venue, old_name, new_name);
                            }
                        } else {
                            let msg = messages::action_pre_delete_title(venue, old_name, count);
                            cb.pre_delete(&msg);
                            if !cb.can_continue() {
                                return changed;
                            }
                            info.push_str(&msg);
                            info.push('\n');
                            if config.venues.find_venue(venue).is_some() {
                                if let Some(d) = dogs.as_deref_mut() {
                                    d.delete_title(venue, old_name);
                                }
                            }
                        }
                    }
                    changed = true;
                    info.push_str(&messages::action_delete_title(venue, old_name));
                    info.push('\n');
                    if let Some(v) = config.venues.find_venue_mut(venue) {
                        v.titles.delete_title(old_name);
                    }
                }
            }
            ActionVerb::RenameEvent {
                venue,
                old_name,
                new_name,
            } => {
                let found = config
                    .venues
                    .find_venue(venue)
                    .map_or(false, |v| v.events.find_event(old_name).is_some());
                if found {
                    changed = true;
                    let count = dogs
                        .as_deref()
                        .map_or(0, |d| d.num_events_in_use(venue, old_name));
                    if count > 0 {
                        if let Some(d) = dogs.as_deref_mut() {
                            d.rename_event(venue, old_name, new_name);
                        }
                    }
                    info.push_str(&messages::action_rename_event(
                        venue, old_name, new_name, count,
                    ));
                    info.push('\n');
                    if let Some(v) = config.venues.find_venue_mut(venue) {
                        if v.events.find_event(new_name).is_some() {
                            v.events.delete_event(old_name);
                        } else if let Some(e) = v.events.find_event_mut(old_name) {
                            e.name = new_name.clone();
                        }
                    }
                }
            }
            ActionVerb::DeleteEvent { venue, name } => {
                let found = config
                    .venues
                    .find_venue(venue)
                    .map_or(false, |v| v.events.find_event(name).is_some());
                if found {
                    changed = true;
                    let count = dogs
                        .as_deref()
                        .map_or(0, |d| d.num_events_in_use(venue, name));
                    if count > 0 {
                        if let Some(d) = dogs.as_deref_mut() {
                            let msg = messages::action_pre_delete_event(venue, name, count);
                            cb.pre_delete(&msg);
                            if !cb.can_continue() {
                                return changed;
                            }
                            info.push_str(&msg);
                            info.push('\n');
                            d.delete_event(venue, name);
                        }
                    }
                    info.push_str(&messages::action_delete_event(venue, name));
                    info.push('\n');
                    if let Some(v) = config.venues.find_venue_mut(venue) {
                        v.multiqs.delete_event(name);
                        v.events.delete_event(name);
                    }
                }
            }
            ActionVerb::RenameLifetimeName {
                venue,
                old_name,
                new_name,
            } => {
                if let Some(v) = config.venues.find_venue_mut(venue) {
                    if v.lifetime_names.find(old_name).is_some() {
                        changed = true;
                        v.lifetime_names.rename(old_name, new_name);
                        let event_changes = v.events.rename_lifetime_name(old_name, new_name);
                        info.push_str(&messages::action_rename_lifetime_name(
                            venue,
                            old_name,
                            new_name,
                            event_changes,
                        ));
                        info.push('\n');
                        if let Some(d) = dogs.as_deref_mut() {
                            d.rename_lifetime_name(venue, old_name, new_name);
                        }
                    }
                }
            }
            ActionVerb::DeleteLifetimeName { venue, name } => {
                if let Some(v) = config.venues.find_venue_mut(venue) {
                    if v.lifetime_names.delete(name) > 0 {
                        changed = true;
                        let event_changes = v.events.delete_lifetime_name(name);
                        info.push_str(&messages::action_delete_lifetime_name(
                            venue,
                            name,
                            event_changes,
                        ));
                        info.push('\n');
                        if let Some(d) = dogs.as_deref_mut() {
                            d.delete_lifetime_name(venue, name);
                        }
                    }
                }
            }
        }
        changed
    }

    /// Rewrites a venue/division/sublevel triple the way `apply` would
    /// have renamed it. Used when re-resolving runs after an update.
    pub fn update_names(
        &self,
        config_current: &Config,
        venue: &mut String,
        division: &mut String,
        sub_level: &mut String,
    ) -> bool {
        match &self.verb {
            ActionVerb::RenameVenue { old_name, new_name } => {
                if !venue.is_empty() && venue == old_name {
                    *venue = new_name.clone();
                    return true;
                }
            }
            ActionVerb::RenameDivision {
                venue: action_venue,
                old_name,
                new_name,
            } => {
                if !venue.is_empty()
                    && venue == action_venue
                    && !division.is_empty()
                    && division == old_name
                {
                    *division = new_name.clone();
                    return true;
                }
            }
            ActionVerb::RenameLevel {
                venue: action_venue,
                division: action_div,
                level,
                old_name,
                new_name,
            } => {
                if !venue.is_empty()
                    && venue == action_venue
                    && !division.is_empty()
                    && division == action_div
                    && !sub_level.is_empty()
                {
                    // A level rename only touches runs when the level
                    // has no sublevels (runs record the leaf name).
                    if level.is_empty() {
                        let has_sub_levels = config_current
                            .venues
                            .find_venue(action_venue)
                            .and_then(|v| v.divisions.find_division(action_div))
                            .and_then(|d| d.levels.find_level(old_name))
                            .map_or(false, |l| !l.sub_levels.is_empty());
                        if has_sub_levels {
                            return false;
                        }
                    }
                    if sub_level == old_name {
                        *sub_level = new_name.clone();
                        return true;
                    }
                }
            }
            _ => {}
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigActionList(pub Vec<ConfigAction>);

impl Deref for ConfigActionList {
    type Target = Vec<ConfigAction>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigActionList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl ConfigActionList {
    pub fn load(
        &mut self,
        tree: &ElementNode,
        version: ArbVersion,
        cb: &mut dyn ErrorCallback,
    ) -> ArbResult<()> {
        self.0.push(ConfigAction::load(tree, version, cb)?);
        Ok(())
    }

    /// Runs every applicable action in order. Actions stamped with a
    /// configuration version the current configuration already has are
    /// skipped. Returns the number of actions that changed something.
    pub fn apply(
        &self,
        config: &mut Config,
        mut dogs: Option<&mut DogList>,
        info: &mut String,
        cb: &mut dyn ConfigActionCallback,
    ) -> usize {
        let mut changes = 0;
        for action in &self.0 {
            if action.config_version != 0 && config.version >= action.config_version {
                continue;
            }
            if action.apply(config, dogs.as_deref_mut(), info, cb) {
                changes += 1;
            }
            if !cb.can_continue() {
                break;
            }
        }
        if changes > 0 {
            info.push('\n');
        }
        changes
    }

    /// Applies the rename actions newer than `config_version_pre_update`
    /// to a venue/division/sublevel triple.
    pub fn update_names(
        &self,
        config_version_pre_update: i16,
        config_current: &Config,
        venue: &mut String,
        division: &mut String,
        sub_level: &mut String,
    ) -> bool {
        let before = (venue.clone(), division.clone(), sub_level.clone());
        for action in &self.0 {
            if action.config_version != 0 && config_version_pre_update >= action.config_version {
                continue;
            }
            action.update_names(config_current, venue, division, sub_level);
        }
        before.0 != *venue || before.1 != *division || before.2 != *sub_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::{AcceptAllActions, DenyDeletes};

    fn config_with_venue(name: &str) -> Config {
        let mut config = Config::default();
        let venue = config.venues.add_venue(name).unwrap();
        let div = venue.divisions.add_division("Regular").unwrap();
        div.levels.add_level("Novice");
        config
    }

    #[test]
    fn rename_venue_moves_the_definition() {
        let mut config = config_with_venue("NADAC");
        let action = ConfigAction::new(
            0,
            ActionVerb::RenameVenue {
                old_name: "NADAC".to_string(),
                new_name: "NADAC2".to_string(),
            },
        );
        let mut info = String::new();
        let mut cb = AcceptAllActions::default();
        assert!(action.apply(&mut config, None, &mut info, &mut cb));
        assert!(config.venues.find_venue("NADAC2").is_some());
        assert!(config.venues.find_venue("NADAC").is_none());
        assert!(info.contains("NADAC"));
    }

    #[test]
    fn rename_into_existing_venue_deletes_the_old() {
        let mut config = config_with_venue("NADAC");
        config.venues.add_venue("AKC");
        let action = ConfigAction::new(
            0,
            ActionVerb::RenameVenue {
                old_name: "NADAC".to_string(),
                new_name: "AKC".to_string(),
            },
        );
        let mut info = String::new();
        let mut cb = AcceptAllActions::default();
        assert!(action.apply(&mut config, None, &mut info, &mut cb));
        assert_eq!(config.venues.len(), 1);
    }

    #[test]
    fn stale_actions_are_skipped() {
        let mut config = config_with_venue("NADAC");
        config.version = 5;
        let mut list = ConfigActionList::default();
        list.push(ConfigAction::new(
            3,
            ActionVerb::DeleteVenue {
                name: "NADAC".to_string(),
            },
        ));
        let mut info = String::new();
        let mut cb = AcceptAllActions::default();
        assert_eq!(list.apply(&mut config, None, &mut info, &mut cb), 0);
        assert!(config.venues.find_venue("NADAC").is_some());
    }

    #[test]
    fn veto_stops_the_remaining_actions() {
        let mut config = config_with_venue("NADAC");
        config.venues.add_venue("AKC");
        let mut dogs = DogList::default();
        let mut list = ConfigActionList::default();
        list.push(ConfigAction::new(
            0,
            ActionVerb::DeleteVenue {
                name: "NADAC".to_string(),
            },
        ));
        list.push(ConfigAction::new(
            0,
            ActionVerb::DeleteVenue {
                name: "AKC".to_string(),
            },
        ));
        let mut info = String::new();
        let mut cb = DenyDeletes::default();
        // No dogs use either venue, so nothing triggers the veto and
        // both deletions run.
        assert_eq!(list.apply(&mut config, Some(&mut dogs), &mut info, &mut cb), 2);
    }

    #[test]
    fn rename_level_rewrites_run_names() {
        let config = config_with_venue("NADAC");
        let mut list = ConfigActionList::default();
        list.push(ConfigAction::new(
            0,
            ActionVerb::RenameLevel {
                venue: "NADAC".to_string(),
                division: "Regular".to_string(),
                level: String::new(),
                old_name: "Novice".to_string(),
                new_name: "Beginner".to_string(),
            },
        ));
        let mut venue = "NADAC".to_string();
        let mut division = "Regular".to_string();
        let mut sub_level = "Novice".to_string();
        assert!(list.update_names(0, &config, &mut venue, &mut division, &mut sub_level));
        assert_eq!(sub_level, "Beginner");
    }
}
