//! Activation order
//!
//! A topological sort over `requires` edges. Ties are broken by ascending id
//! so the order is the same on every run. Plugins that wait for `ALL` are
//! sorted separately and placed after everything else.

use std::collections::{BTreeMap, BTreeSet};

use super::descriptor::{PluginDescriptor, PluginId};
use crate::error::{Result, RuntimeError};

/// Compute the order in which `descriptors` are constructed
///
/// Required ids outside the given set are ignored here; missing and
/// disabled dependencies are reported by the registry.
pub fn activation_order<'a, I>(descriptors: I) -> Result<Vec<PluginId>>
where
    I: IntoIterator<Item = &'a PluginDescriptor>,
{
    let nodes: BTreeMap<&PluginId, &PluginDescriptor> =
        descriptors.into_iter().map(|d| (&d.id, d)).collect();

    let (waiters, regular): (BTreeSet<&PluginId>, BTreeSet<&PluginId>) = nodes
        .keys()
        .copied()
        .partition(|id| nodes[*id].waits_for_all());

    // A regular plugin cannot require one that waits for it
    for id in &regular {
        if let Some(waiter) = nodes[*id].required_plugins().find(|dep| waiters.contains(dep)) {
            return Err(RuntimeError::CyclicDependency {
                cycle: vec![(*id).clone(), waiter.clone()],
            });
        }
    }

    let mut order = sort_group(&nodes, &regular)?;
    order.extend(sort_group(&nodes, &waiters)?);
    Ok(order)
}

/// Kahn's algorithm restricted to `group`
fn sort_group(
    nodes: &BTreeMap<&PluginId, &PluginDescriptor>,
    group: &BTreeSet<&PluginId>,
) -> Result<Vec<PluginId>> {
    let deps_in_group = |id: &PluginId| -> Vec<&PluginId> {
        nodes[id]
            .required_plugins()
            .filter(|dep| group.contains(dep))
            .collect()
    };

    let mut pending: BTreeMap<&PluginId, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&PluginId, Vec<&PluginId>> = BTreeMap::new();
    for &id in group {
        let deps = deps_in_group(id);
        pending.insert(id, deps.len());
        for dep in deps {
            let dep = group.get(dep).copied().unwrap_or(dep);
            dependents.entry(dep).or_default().push(id);
        }
    }

    let mut ready: BTreeSet<&PluginId> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(id, _)| *id)
        .collect();
    let mut order = Vec::with_capacity(group.len());

    while let Some(id) = ready.pop_first() {
        pending.remove(id);
        order.push(id.clone());
        for &dependent in dependents.get(id).map(Vec::as_slice).unwrap_or_default() {
            if let Some(count) = pending.get_mut(dependent) {
                *count -= 1;
                if *count == 0 {
                    ready.insert(dependent);
                }
            }
        }
    }

    if pending.is_empty() {
        Ok(order)
    } else {
        let remaining: BTreeSet<&PluginId> = pending.keys().copied().collect();
        Err(RuntimeError::CyclicDependency {
            cycle: find_cycle(nodes, &remaining),
        })
    }
}

/// Walk `requires` edges inside `remaining` until a node repeats
///
/// Every node left over by Kahn's algorithm still has an unsatisfied
/// dependency inside the set, so the walk always closes a cycle. The result
/// lists each member followed by the member it requires.
fn find_cycle(
    nodes: &BTreeMap<&PluginId, &PluginDescriptor>,
    remaining: &BTreeSet<&PluginId>,
) -> Vec<PluginId> {
    let Some(&start) = remaining.first() else {
        return Vec::new();
    };

    let mut path: Vec<&PluginId> = vec![start];
    loop {
        let current = path[path.len() - 1];
        let next = nodes[current]
            .required_plugins()
            .find(|dep| remaining.contains(dep));

        let Some(next) = next else {
            return path.into_iter().cloned().collect();
        };

        if let Some(pos) = path.iter().position(|id| *id == next) {
            return path[pos..].iter().map(|id| (*id).clone()).collect();
        }
        path.push(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::PluginDescriptor;

    struct Empty;

    impl crate::plugin::Plugin for Empty {
        fn title(&self) -> String {
            "empty".to_string()
        }
    }

    fn desc(id: &str, requires: &[&str]) -> PluginDescriptor {
        PluginDescriptor::new(id, || Ok(Empty)).requires(requires.iter().copied())
    }

    fn ids(order: &[PluginId]) -> Vec<&str> {
        order.iter().map(PluginId::as_str).collect()
    }

    #[test]
    fn test_chain_order() {
        let descs = [desc("c", &["b"]), desc("b", &["a"]), desc("a", &[])];
        let order = activation_order(&descs).unwrap();
        assert_eq!(ids(&order), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ties_break_by_id() {
        let descs = [desc("zeta", &[]), desc("alpha", &[]), desc("mid", &[])];
        let order = activation_order(&descs).unwrap();
        assert_eq!(ids(&order), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_diamond() {
        let descs = [
            desc("d", &["b", "c"]),
            desc("c", &["a"]),
            desc("b", &["a"]),
            desc("a", &[]),
        ];
        let order = activation_order(&descs).unwrap();
        assert_eq!(ids(&order), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_all_waiters_go_last() {
        let descs = [
            desc("a", &[]),
            PluginDescriptor::new("layout", || Ok(Empty)).requires_all(),
            desc("z", &[]),
            PluginDescriptor::new("another", || Ok(Empty)).requires_all(),
        ];
        let order = activation_order(&descs).unwrap();
        assert_eq!(ids(&order), vec!["a", "z", "another", "layout"]);
    }

    #[test]
    fn test_two_node_cycle() {
        let descs = [desc("x", &["y"]), desc("y", &["x"])];
        let err = activation_order(&descs).unwrap_err();
        match err {
            RuntimeError::CyclicDependency { cycle } => {
                assert_eq!(ids(&cycle), vec!["x", "y"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cycle_witness_excludes_tail() {
        // "t" hangs off the cycle but is not part of it
        let descs = [
            desc("t", &["p"]),
            desc("p", &["q"]),
            desc("q", &["r"]),
            desc("r", &["p"]),
        ];
        let err = activation_order(&descs).unwrap_err();
        let RuntimeError::CyclicDependency { cycle } = err else {
            panic!("expected a cycle");
        };
        assert_eq!(cycle.len(), 3);
        assert!(!cycle.iter().any(|id| id == "t"));
    }

    #[test]
    fn test_regular_requiring_waiter_is_cycle() {
        let descs = [
            desc("a", &["layout"]),
            PluginDescriptor::new("layout", || Ok(Empty)).requires_all(),
        ];
        assert!(matches!(
            activation_order(&descs),
            Err(RuntimeError::CyclicDependency { .. })
        ));
    }
}
