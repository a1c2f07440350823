//! Display summaries for scope enablement, as the admin tables show them.

use xhub_api::types::{AccessScope, ScopeMap};

/// Allow-lists longer than this collapse to a count.
const INLINE_LIST_MAX: usize = 4;

/// Summarize one access rule for a table cell. `noun` is the plural
/// label for the dimension ("Users", "Projects", "Hardware").
///
/// Rules, in order: enabled admits all ("All Users"); more than
/// [`INLINE_LIST_MAX`] ids collapse to a count ("7 Users Enabled"); an
/// empty list reads "No Users Enabled"; otherwise the sorted ids joined
/// with ", ".
pub fn summarize(rule: &AccessScope, noun: &str) -> String {
    if rule.enabled {
        return format!("All {noun}");
    }
    if rule.ids.len() > INLINE_LIST_MAX {
        return format!("{} {noun} Enabled", rule.ids.len());
    }
    if rule.ids.is_empty() {
        return format!("No {noun} Enabled");
    }
    // BTreeSet iterates sorted.
    rule.ids.iter().cloned().collect::<Vec<_>>().join(", ")
}

/// Summarize a named list the same way the scope cells are rendered;
/// the compute config tables use this for the hardware pairing column.
pub fn summarize_names(all_allowed: bool, names: &[String], noun: &str) -> String {
    if all_allowed {
        return format!("All {noun}");
    }
    if names.len() > INLINE_LIST_MAX {
        return format!("{} {noun} Enabled", names.len());
    }
    if names.is_empty() {
        return format!("No {noun} Enabled");
    }
    let mut sorted = names.to_vec();
    sorted.sort();
    sorted.join(", ")
}

/// Whether the site dimension admits everyone.
pub fn site_enabled(scopes: &ScopeMap) -> bool {
    scopes
        .get(&xhub_api::types::Scope::Site)
        .is_some_and(|rule| rule.enabled)
}

#[cfg(test)]
mod tests {
    use xhub_api::types::Scope;

    use super::*;

    #[test]
    fn enabled_rule_reads_all() {
        let rule = AccessScope::all(Scope::User);
        assert_eq!(summarize(&rule, "Users"), "All Users");
    }

    #[test]
    fn empty_allow_list_reads_none_enabled() {
        let rule = AccessScope::only(Scope::Project, Vec::<String>::new());
        assert_eq!(summarize(&rule, "Projects"), "No Projects Enabled");
    }

    #[test]
    fn short_allow_list_joins_sorted() {
        let rule = AccessScope::only(Scope::User, ["carol", "alice", "bob"]);
        assert_eq!(summarize(&rule, "Users"), "alice, bob, carol");
    }

    #[test]
    fn exactly_four_ids_still_join_inline() {
        let rule = AccessScope::only(Scope::User, ["a", "b", "c", "d"]);
        assert_eq!(summarize(&rule, "Users"), "a, b, c, d");
    }

    #[test]
    fn long_allow_list_collapses_to_count() {
        let rule = AccessScope::only(Scope::User, ["a", "b", "c", "d", "e"]);
        assert_eq!(summarize(&rule, "Users"), "5 Users Enabled");
    }

    #[test]
    fn name_summary_follows_the_same_rules() {
        assert_eq!(summarize_names(true, &[], "Hardware"), "All Hardware");
        assert_eq!(summarize_names(false, &[], "Hardware"), "No Hardware Enabled");

        let few = ["Small".to_owned(), "Large".to_owned()];
        assert_eq!(summarize_names(false, &few, "Hardware"), "Large, Small");
    }

    #[test]
    fn name_summary_collapses_long_lists() {
        let names: Vec<String> = ["a", "b", "c", "d", "e"].map(String::from).to_vec();
        assert_eq!(
            summarize_names(false, &names, "Hardware"),
            "5 Hardware Enabled"
        );
    }
}
