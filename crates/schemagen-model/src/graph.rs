//! Aggregation graph traversal
//!
//! Forward edges run from a class to the classes it aggregates.

use std::collections::{HashMap, HashSet, VecDeque};

use schemagen_core::SchemaModel;

/// Class-level aggregation graph
#[derive(Debug, Clone)]
pub struct AggregationGraph {
    /// Forward edges: class -> aggregated classes, declaration order
    targets: HashMap<String, Vec<String>>,

    /// All classes, model order
    nodes: Vec<String>,
}

impl AggregationGraph {
    /// Build the graph from a model
    pub fn from_model(model: &SchemaModel) -> Self {
        let mut targets: HashMap<String, Vec<String>> = HashMap::new();
        let mut nodes = Vec::with_capacity(model.len());

        for class in model.classes() {
            nodes.push(class.name.clone());

            targets.insert(
                class.name.clone(),
                class.aggregation_targets().map(str::to_string).collect(),
            );
        }

        Self { targets, nodes }
    }

    /// Immediate aggregation targets of a class
    pub fn targets(&self, class: &str) -> &[String] {
        self.targets.get(class).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every class reachable from `start`, including `start`, in BFS order
    pub fn reachable_from(&self, start: &str) -> Vec<String> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut result = Vec::new();

        queue.push_back(start.to_string());

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }

            for target in self.targets(&current) {
                if !visited.contains(target) {
                    queue.push_back(target.clone());
                }
            }
            result.push(current);
        }

        result
    }

    /// Classes that cannot be reached from `root`, in model order
    pub fn unreachable_from(&self, root: &str) -> Vec<String> {
        let reachable: HashSet<String> = self.reachable_from(root).into_iter().collect();
        self.nodes
            .iter()
            .filter(|name| !reachable.contains(*name))
            .cloned()
            .collect()
    }

    /// First aggregation cycle reachable from `start`
    ///
    /// The returned path starts and ends with the same class, e.g.
    /// `["A", "B", "A"]`.
    pub fn find_cycle_from(&self, start: &str) -> Option<Vec<String>> {
        let mut path = Vec::new();
        let mut on_path = HashSet::new();
        let mut done = HashSet::new();
        self.visit(start, &mut path, &mut on_path, &mut done)
    }

    fn visit<'g>(
        &'g self,
        class: &'g str,
        path: &mut Vec<&'g str>,
        on_path: &mut HashSet<&'g str>,
        done: &mut HashSet<&'g str>,
    ) -> Option<Vec<String>> {
        if on_path.contains(class) {
            let start = path.iter().position(|c| *c == class).unwrap_or_default();
            let mut cycle: Vec<String> = path[start..].iter().map(|c| c.to_string()).collect();
            cycle.push(class.to_string());
            return Some(cycle);
        }
        if done.contains(class) {
            return None;
        }

        path.push(class);
        on_path.insert(class);

        for target in self.targets(class) {
            if let Some(cycle) = self.visit(target, path, on_path, done) {
                return Some(cycle);
            }
        }

        path.pop();
        on_path.remove(class);
        done.insert(class);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemagen_core::{Aggregation, ClassDef};

    fn model(classes: &[&str], edges: &[(&str, &str)]) -> SchemaModel {
        let mut model = SchemaModel::from_classes(classes.iter().map(|name| ClassDef::new(*name)));
        for (source, target) in edges {
            model.add_aggregation(source, Aggregation::new(*target)).unwrap();
        }
        model
    }

    #[test]
    fn reachability_in_bfs_order() {
        let graph = AggregationGraph::from_model(&model(
            &["BTS", "MGMT", "HWE", "MetricJob", "Orphan"],
            &[("BTS", "MGMT"), ("BTS", "HWE"), ("MGMT", "MetricJob")],
        ));

        assert_eq!(graph.reachable_from("BTS"), vec!["BTS", "MGMT", "HWE", "MetricJob"]);
        assert_eq!(graph.unreachable_from("BTS"), vec!["Orphan"]);
        assert!(graph.targets("Unknown").is_empty());
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let graph = AggregationGraph::from_model(&model(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")],
        ));
        assert_eq!(graph.find_cycle_from("A"), None);
    }

    #[test]
    fn finds_cycle_path() {
        let graph = AggregationGraph::from_model(&model(
            &["A", "B", "C"],
            &[("A", "B"), ("B", "C"), ("C", "B")],
        ));
        assert_eq!(
            graph.find_cycle_from("A"),
            Some(vec!["B".to_string(), "C".to_string(), "B".to_string()])
        );
    }

    #[test]
    fn self_aggregation_is_a_cycle() {
        let graph = AggregationGraph::from_model(&model(&["A"], &[("A", "A")]));
        assert_eq!(
            graph.find_cycle_from("A"),
            Some(vec!["A".to_string(), "A".to_string()])
        );
    }

    #[test]
    fn unreachable_cycle_is_ignored() {
        let graph = AggregationGraph::from_model(&model(
            &["Root", "X", "Y"],
            &[("X", "Y"), ("Y", "X")],
        ));
        assert_eq!(graph.find_cycle_from("Root"), None);
        assert!(graph.find_cycle_from("X").is_some());
    }
}
