//! Dependency graph for static checks of a command's steps.
//!
//! The scheduler never builds this graph; it scans. The graph exists so
//! configuration errors (unknown names, self-dependencies, cycles) can be
//! reported before anything runs.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use crate::error::{CommanderError, Result};
use crate::steps::Step;

/// Problems found in a command's dependency relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphIssue {
    /// Two steps share a name.
    DuplicateStep { name: String },
    /// A step depends on a name that is not a step of the command.
    UnknownDependency { step: String, dependency: String },
    /// A step lists itself as a dependency.
    SelfDependency { step: String },
    /// Steps depend on each other in a loop. The first name is repeated at
    /// the end of the path.
    Cycle { path: Vec<String> },
}

impl GraphIssue {
    /// Convert into the matching error.
    pub fn into_error(self) -> CommanderError {
        match self {
            GraphIssue::DuplicateStep { name } => CommanderError::InvalidName {
                name,
                reason: "that step already exists".to_string(),
            },
            GraphIssue::UnknownDependency { step, dependency } => {
                CommanderError::UnknownDependency { step, dependency }
            }
            GraphIssue::SelfDependency { step } => CommanderError::CircularDependency {
                cycle: format!("{} -> {}", step, step),
            },
            GraphIssue::Cycle { path } => CommanderError::CircularDependency {
                cycle: path.join(" -> "),
            },
        }
    }
}

impl fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphIssue::DuplicateStep { name } => write!(f, "step '{}' is defined twice", name),
            GraphIssue::UnknownDependency { step, dependency } => {
                write!(f, "step '{}' depends on unknown step '{}'", step, dependency)
            }
            GraphIssue::SelfDependency { step } => write!(f, "step '{}' depends on itself", step),
            GraphIssue::Cycle { path } => write!(f, "dependency cycle: {}", path.join(" -> ")),
        }
    }
}

/// Represents the dependency relationships between steps of one command.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Step names in authoring order.
    order: Vec<String>,
    /// Map of step name to its declared dependencies (unknown names kept).
    dependencies: HashMap<String, Vec<String>>,
    /// Map of step name to steps that depend on it.
    dependents: HashMap<String, Vec<String>>,
    /// Names declared more than once.
    duplicates: Vec<String>,
}

impl DependencyGraph {
    /// Build the graph for a command's steps.
    pub fn from_steps(steps: &[Step]) -> Self {
        let mut graph = Self::default();

        for step in steps {
            if graph.dependencies.contains_key(&step.name) {
                graph.duplicates.push(step.name.clone());
                continue;
            }
            graph.order.push(step.name.clone());
            graph
                .dependencies
                .insert(step.name.clone(), step.dependencies.clone());
            graph.dependents.entry(step.name.clone()).or_default();
        }

        for name in &graph.order {
            for dep in &graph.dependencies[name] {
                if let Some(dependents) = graph.dependents.get_mut(dep) {
                    if !dependents.contains(name) {
                        dependents.push(name.clone());
                    }
                }
            }
        }

        graph
    }

    /// Get the declared dependencies of a step.
    pub fn dependencies_of(&self, step: &str) -> Option<&[String]> {
        self.dependencies.get(step).map(Vec::as_slice)
    }

    /// Get steps that depend on the given step.
    pub fn dependents_of(&self, step: &str) -> Option<&[String]> {
        self.dependents.get(step).map(Vec::as_slice)
    }

    /// Check if a step exists in the graph.
    pub fn contains(&self, step: &str) -> bool {
        self.dependencies.contains_key(step)
    }

    /// Step names in authoring order.
    pub fn steps(&self) -> &[String] {
        &self.order
    }

    /// Get the number of steps in the graph.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Dependencies that name no step, as `(step, dependency)` pairs.
    pub fn unknown_dependencies(&self) -> Vec<(String, String)> {
        self.order
            .iter()
            .flat_map(|step| {
                self.dependencies[step]
                    .iter()
                    .filter(|dep| !self.contains(dep))
                    .map(move |dep| (step.clone(), dep.clone()))
            })
            .collect()
    }

    /// Steps that list themselves as a dependency.
    pub fn self_dependencies(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|step| self.dependencies[*step].contains(step))
            .cloned()
            .collect()
    }

    /// Find a cycle of two or more steps, returning the path if one exists.
    ///
    /// Self-dependencies are reported by [`Self::self_dependencies`] and
    /// ignored here.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Unvisited,
            Visiting,
            Visited,
        }

        fn dfs<'a>(
            node: &'a str,
            graph: &'a DependencyGraph,
            state: &mut HashMap<&'a str, State>,
            path: &mut Vec<String>,
        ) -> Option<Vec<String>> {
            state.insert(node, State::Visiting);
            path.push(node.to_string());

            for dep in &graph.dependencies[node] {
                if dep == node || !graph.contains(dep) {
                    continue;
                }
                match state.get(dep.as_str()) {
                    Some(State::Visiting) => {
                        let start = path.iter().position(|s| s == dep).unwrap_or(0);
                        let mut cycle: Vec<String> = path[start..].to_vec();
                        cycle.push(dep.clone());
                        return Some(cycle);
                    }
                    Some(State::Unvisited) | None => {
                        if let Some(cycle) = dfs(dep, graph, state, path) {
                            return Some(cycle);
                        }
                    }
                    Some(State::Visited) => {}
                }
            }

            path.pop();
            state.insert(node, State::Visited);
            None
        }

        let mut state: HashMap<&str, State> = self
            .order
            .iter()
            .map(|s| (s.as_str(), State::Unvisited))
            .collect();
        let mut path = Vec::new();

        for step in &self.order {
            if state.get(step.as_str()) == Some(&State::Unvisited) {
                if let Some(cycle) = dfs(step, self, &mut state, &mut path) {
                    return Some(cycle);
                }
            }
        }

        None
    }

    /// Returns steps in topological order (dependencies before dependents).
    ///
    /// Ties keep authoring order. Returns an error on the first issue found.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        if let Some(issue) = self.issues().into_iter().next() {
            return Err(issue.into_error());
        }

        let mut in_degree: HashMap<&str, usize> = self
            .order
            .iter()
            .map(|s| (s.as_str(), self.dependencies[s].len()))
            .collect();

        let mut queue: VecDeque<&str> = self
            .order
            .iter()
            .map(String::as_str)
            .filter(|s| in_degree[s] == 0)
            .collect();

        let mut result = Vec::with_capacity(self.order.len());

        while let Some(step) = queue.pop_front() {
            result.push(step.to_string());

            for dependent in &self.dependents[step] {
                if let Some(degree) = in_degree.get_mut(dependent.as_str()) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(dependent.as_str());
                    }
                }
            }
        }

        if result.len() != self.order.len() {
            let remaining: Vec<_> = self
                .order
                .iter()
                .filter(|s| in_degree[s.as_str()] > 0)
                .cloned()
                .collect();
            return Err(CommanderError::CircularDependency {
                cycle: remaining.join(" -> "),
            });
        }

        Ok(result)
    }

    /// Get all transitive dependents of a step.
    pub fn transitive_dependents(&self, step: &str) -> HashSet<String> {
        let mut result = HashSet::new();
        let mut to_visit = vec![step.to_string()];

        while let Some(current) = to_visit.pop() {
            if let Some(dependents) = self.dependents.get(&current) {
                for dep in dependents {
                    if result.insert(dep.clone()) {
                        to_visit.push(dep.clone());
                    }
                }
            }
        }

        result
    }

    /// Every configuration problem in the graph.
    pub fn issues(&self) -> Vec<GraphIssue> {
        let mut issues: Vec<GraphIssue> = self
            .duplicates
            .iter()
            .map(|name| GraphIssue::DuplicateStep { name: name.clone() })
            .collect();

        issues.extend(
            self.unknown_dependencies()
                .into_iter()
                .map(|(step, dependency)| GraphIssue::UnknownDependency { step, dependency }),
        );
        issues.extend(
            self.self_dependencies()
                .into_iter()
                .map(|step| GraphIssue::SelfDependency { step }),
        );
        if let Some(path) = self.find_cycle() {
            issues.push(GraphIssue::Cycle { path });
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(name: &str, deps: &[&str]) -> Step {
        Step::new(name, "true", "/").depends_on(deps.iter().copied())
    }

    #[test]
    fn empty_graph() {
        let graph = DependencyGraph::from_steps(&[]);
        assert!(graph.is_empty());
        assert!(graph.issues().is_empty());
        assert!(graph.topological_order().unwrap().is_empty());
    }

    #[test]
    fn tracks_dependencies_and_dependents() {
        let graph = DependencyGraph::from_steps(&[
            step("fetch", &[]),
            step("build", &["fetch"]),
            step("test", &["fetch"]),
        ]);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.dependencies_of("build").unwrap(), ["fetch"]);
        let dependents = graph.dependents_of("fetch").unwrap();
        assert!(dependents.contains(&"build".to_string()));
        assert!(dependents.contains(&"test".to_string()));
    }

    #[test]
    fn reports_unknown_dependency() {
        let graph = DependencyGraph::from_steps(&[step("alpha", &["zulu"])]);

        assert_eq!(
            graph.issues(),
            vec![GraphIssue::UnknownDependency {
                step: "alpha".into(),
                dependency: "zulu".into()
            }]
        );
        assert!(matches!(
            graph.topological_order(),
            Err(CommanderError::UnknownDependency { .. })
        ));
    }

    #[test]
    fn reports_duplicate_step() {
        let graph = DependencyGraph::from_steps(&[step("alpha", &[]), step("alpha", &[])]);
        assert_eq!(
            graph.issues(),
            vec![GraphIssue::DuplicateStep {
                name: "alpha".into()
            }]
        );
    }

    #[test]
    fn topo_sort_diamond_keeps_authoring_order_for_ties() {
        let graph = DependencyGraph::from_steps(&[
            step("root", &[]),
            step("left", &["root"]),
            step("right", &["root"]),
            step("join", &["left", "right"]),
        ]);

        let order = graph.topological_order().unwrap();
        assert_eq!(order, vec!["root", "left", "right", "join"]);
    }

    #[test]
    fn simple_cycle_returns_path() {
        let graph = DependencyGraph::from_steps(&[step("aaa", &["bbb"]), step("bbb", &["aaa"])]);

        let path = graph.find_cycle().unwrap();
        assert_eq!(path, vec!["aaa", "bbb", "aaa"]);
        assert!(graph.topological_order().is_err());
    }

    #[test]
    fn longer_cycle_returns_full_path() {
        let graph = DependencyGraph::from_steps(&[
            step("aaa", &["ccc"]),
            step("bbb", &["aaa"]),
            step("ccc", &["bbb"]),
        ]);

        let path = graph.find_cycle().unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.first(), path.last());
    }

    #[test]
    fn self_dependency_reported_separately() {
        let graph = DependencyGraph::from_steps(&[step("loop", &["loop"])]);

        assert!(graph.find_cycle().is_none());
        assert_eq!(graph.self_dependencies(), vec!["loop"]);
        assert_eq!(
            graph.issues(),
            vec![GraphIssue::SelfDependency {
                step: "loop".into()
            }]
        );
    }

    #[test]
    fn transitive_dependents_follow_chain() {
        let graph = DependencyGraph::from_steps(&[
            step("aaa", &[]),
            step("bbb", &["aaa"]),
            step("ccc", &["bbb"]),
        ]);

        let deps = graph.transitive_dependents("aaa");
        assert!(deps.contains("bbb"));
        assert!(deps.contains("ccc"));
        assert!(graph.transitive_dependents("ccc").is_empty());
    }

    #[test]
    fn issue_messages() {
        let issue = GraphIssue::Cycle {
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(issue.to_string(), "dependency cycle: a -> b -> a");
        assert!(matches!(
            issue.into_error(),
            CommanderError::CircularDependency { .. }
        ));
    }
}
