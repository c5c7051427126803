//! Dependency satisfaction checks used by the scheduler.

use std::collections::HashSet;

/// True iff every declared dependency is in `completed`.
pub fn dependencies_satisfied<S: AsRef<str>>(dependencies: &[S], completed: &HashSet<String>) -> bool {
    dependencies.iter().all(|d| completed.contains(d.as_ref()))
}

/// Declared dependencies that are not in `completed`, in declaration order.
pub fn unmet_dependencies<S: AsRef<str>>(
    dependencies: &[S],
    completed: &HashSet<String>,
) -> Vec<String> {
    dependencies
        .iter()
        .map(AsRef::as_ref)
        .filter(|d| !completed.contains(*d))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_dependencies_are_satisfied() {
        let none: [&str; 0] = [];
        assert!(dependencies_satisfied(&none, &HashSet::new()));
    }

    #[test]
    fn all_completed_is_satisfied() {
        assert!(dependencies_satisfied(&["a", "b"], &set(&["a", "b", "c"])));
    }

    #[test]
    fn one_missing_is_not_satisfied() {
        assert!(!dependencies_satisfied(&["a", "z"], &set(&["a", "b"])));
    }

    #[test]
    fn unmet_keeps_declaration_order() {
        let unmet = unmet_dependencies(&["z", "a", "y"], &set(&["a"]));
        assert_eq!(unmet, vec!["z", "y"]);
    }

    #[test]
    fn unmet_is_empty_when_satisfied() {
        let deps = vec!["a".to_string()];
        assert!(unmet_dependencies(&deps, &set(&["a"])).is_empty());
    }
}
