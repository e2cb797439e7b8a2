//! User-facing message builders for configuration merges and actions.
//!
//! All the text produced during a configuration update funnels through
//! here so the change reports stay uniform.

fn counts3(what: &str, added: usize, updated: usize, skipped: usize) -> String {
    format!("{what}: {added} added, {updated} updated, {skipped} identical")
}

pub fn update_faults(added: usize, skipped: usize) -> String {
    format!("Faults: {added} added, {skipped} identical")
}

pub fn update_other_points(added: usize, updated: usize, skipped: usize) -> String {
    counts3("Other Points", added, updated, skipped)
}

pub fn update_venues(added: usize, updated: usize, skipped: usize) -> String {
    counts3("Venues", added, updated, skipped)
}

pub fn update_cal_sites(added: usize, updated: usize, skipped: usize) -> String {
    counts3("Calendar Sites", added, updated, skipped)
}

pub fn update_lifetime_names(added: usize, skipped: usize) -> String {
    format!("Lifetime Names: {added} added, {skipped} identical")
}

pub fn update_divisions(added: usize, updated: usize, skipped: usize) -> String {
    counts3("Divisions", added, updated, skipped)
}

pub fn update_divisions_reordered() -> String {
    "Divisions: reordered".to_string()
}

pub fn update_events(added: usize, updated: usize, skipped: usize) -> String {
    counts3("Events", added, updated, skipped)
}

pub fn update_events_reordered() -> String {
    "Events: reordered".to_string()
}

pub fn update_multiqs(added: usize, deleted: usize, skipped: usize) -> String {
    format!("Multiple Qs: {added} added, {deleted} deleted, {skipped} identical")
}

pub fn update_multiqs_reordered() -> String {
    "Multiple Qs: reordered".to_string()
}

pub fn update_levels(added: usize, updated: usize, skipped: usize) -> String {
    counts3("Levels", added, updated, skipped)
}

pub fn update_levels_reordered() -> String {
    "Levels: reordered".to_string()
}

pub fn update_titles(added: usize, updated: usize, skipped: usize) -> String {
    counts3("Titles", added, updated, skipped)
}

pub fn update_titles_reordered() -> String {
    "Titles: reordered".to_string()
}

pub fn update_sublevels(added: usize, updated: usize, skipped: usize) -> String {
    counts3("Sublevels", added, updated, skipped)
}

pub fn update_sublevels_reordered() -> String {
    "Sublevels: reordered".to_string()
}

pub fn update_rules(added: usize, deleted: usize, updated: usize, skipped: usize) -> String {
    format!(" Rules: {added} added, {deleted} deleted, {updated} updated, {skipped} identical")
}

fn rename_suffix(changes: usize) -> String {
    if changes > 0 {
        format!(" ({changes} changes)")
    } else {
        String::new()
    }
}

pub fn action_rename_other_points(old_name: &str, new_name: &str, changes: usize) -> String {
    format!(
        "Renaming Other Points [{old_name}] to [{new_name}]{}",
        rename_suffix(changes)
    )
}

pub fn action_pre_delete_other_points(name: &str, changes: usize) -> String {
    format!("Deleting Other Points [{name}] will remove {changes} entries")
}

pub fn action_delete_other_points(name: &str) -> String {
    format!("Deleting Other Points [{name}]")
}

pub fn action_rename_venue(old_name: &str, new_name: &str, changes: usize) -> String {
    format!(
        "Renaming Venue [{old_name}] to [{new_name}]{}",
        rename_suffix(changes)
    )
}

pub fn action_pre_delete_venue(name: &str, changes: usize) -> String {
    format!("Deleting Venue [{name}] will remove {changes} entries")
}

pub fn action_delete_venue(name: &str) -> String {
    format!("Deleting Venue [{name}]")
}

pub fn action_rename_multiq(venue: &str, old_name: &str, new_name: &str, changes: usize) -> String {
    format!(
        "Renaming {venue} Multiple Q [{old_name}] to [{new_name}]{}",
        rename_suffix(changes)
    )
}

pub fn action_pre_delete_multiq(venue: &str, name: &str, changes: usize) -> String {
    format!("Deleting {venue} Multiple Q [{name}] will remove {changes} entries")
}

pub fn action_delete_multiq(venue: &str, name: &str) -> String {
    format!("Deleting {venue} Multiple Q [{name}]")
}

pub fn action_rename_division(
    venue: &str,
    old_name: &str,
    new_name: &str,
    changes: usize,
) -> String {
    format!(
        "Renaming {venue} Division [{old_name}] to [{new_name}]{}",
        rename_suffix(changes)
    )
}

pub fn action_pre_delete_division(venue: &str, name: &str, changes: usize) -> String {
    format!("Deleting {venue} Division [{name}] will remove {changes} entries")
}

pub fn action_delete_division(venue: &str, name: &str) -> String {
    format!("Deleting {venue} Division [{name}]")
}

pub fn action_rename_level(venue: &str, old_name: &str, new_name: &str, changes: usize) -> String {
    format!(
        "Renaming {venue} Level [{old_name}] to [{new_name}]{}",
        rename_suffix(changes)
    )
}

pub fn action_pre_delete_level(venue: &str, name: &str, changes: usize) -> String {
    format!("Deleting {venue} Level [{name}] will remove {changes} entries")
}

pub fn action_delete_level(venue: &str, name: &str) -> String {
    format!("Deleting {venue} Level [{name}]")
}

pub fn action_rename_title(venue: &str, old_name: &str, new_name: &str, changes: usize) -> String {
    format!(
        "Renaming {venue} Title [{old_name}] to [{new_name}]{}",
        rename_suffix(changes)
    )
}

pub fn action_pre_delete_title(venue: &str, name: &str, changes: usize) -> String {
    format!("Deleting {venue} Title [{name}] will remove {changes} entries")
}

pub fn action_delete_title(venue: &str, name: &str) -> String {
    format!("Deleting {venue} Title [{name}]")
}

pub fn action_rename_event(venue: &str, old_name: &str, new_name: &str, changes: usize) -> String {
    format!(
        "Renaming {venue} Event [{old_name}] to [{new_name}]{}",
        rename_suffix(changes)
    )
}

pub fn action_pre_delete_event(venue: &str, name: &str, changes: usize) -> String {
    format!("Deleting {venue} Event [{name}] will remove {changes} entries")
}

pub fn action_delete_event(venue: &str, name: &str) -> String {
    format!("Deleting {venue} Event [{name}]")
}

pub fn action_rename_lifetime_name(
    venue: &str,
    old_name: &str,
    new_name: &str,
    event_changes: usize,
) -> String {
    if event_changes == 0 {
        format!("Renaming {venue} Lifetime Name [{old_name}] to [{new_name}]")
    } else {
        format!(
            "Renaming {venue} Lifetime Name [{old_name}] to [{new_name}] ({event_changes} event changes)"
        )
    }
}

pub fn action_delete_lifetime_name(venue: &str, name: &str, event_changes: usize) -> String {
    if event_changes == 0 {
        format!("Deleting {venue} Lifetime Name [{name}]")
    } else {
        format!("Deleting {venue} Lifetime Name [{name}] ({event_changes} event changes)")
    }
}

pub fn action_rename_calendar_plugin(old_name: &str, new_name: &str) -> String {
    format!("Renaming calendar plugin [{old_name}] to [{new_name}]")
}

pub fn action_delete_calendar_plugin(name: &str) -> String {
    format!("Deleting calendar plugin [{name}]")
}

pub fn warn_deleted_runs(runs: usize, runs_msg: &str) -> String {
    format!("Deleted {runs} runs that no longer have a configured event:\n{runs_msg}")
}

pub fn update_team_runs(runs: usize, runs_msg: &str) -> String {
    format!("Renamed {runs} runs from Pairs to Team:\n{runs_msg}")
}

pub fn update_table_runs(runs: usize) -> String {
    format!("Updated the table setting on {runs} runs")
}

pub fn update_table_runs_detail(runs: usize, runs_msg: &str) -> String {
    format!("Cleared the table setting on {runs} runs:\n{runs_msg}")
}

pub fn update_subname_runs(runs: usize, runs_msg: &str) -> String {
    format!("Cleared the subname on {runs} runs:\n{runs_msg}")
}
