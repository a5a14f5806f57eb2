//! Differences between two graphs.

use std::collections::BTreeSet;

use crate::app::cloud::RelationKind;
use crate::app::error::FetchError;

use super::resource::{Properties, Resource, ResourceKey};
use super::{Graph, GraphData};

/// Meta key tagging resources with their diff status.
pub const META_DIFF: &str = "diff";
/// Meta key set to `"changed"` on common resources whose bags differ.
pub const META_DIFF_PROPS: &str = "diff-props";

pub const EXTRA: &str = "extra";
pub const MISSING: &str = "missing";
pub const COMMON: &str = "common";
pub const CHANGED: &str = "changed";

#[derive(Debug, Clone)]
pub struct Diff {
    from_graph: Graph,
    to_graph: Graph,
    merged_graph: Graph,
    has_diff: bool,
}

impl Diff {
    /// `from` with its resources absent from `to` tagged "extra".
    pub fn from_graph(&self) -> &Graph {
        &self.from_graph
    }

    /// `to` with its resources absent from `from` tagged "extra".
    pub fn to_graph(&self) -> &Graph {
        &self.to_graph
    }

    /// Union of both, tagged "missing", "extra" or "common", with property deltas.
    pub fn merged_graph(&self) -> &Graph {
        &self.merged_graph
    }

    pub fn has_diff(&self) -> bool {
        self.has_diff
    }
}

/// Keys under `root` (root included). When neither graph holds the root, all keys.
fn scope(data: &GraphData, root: &ResourceKey, root_known: bool) -> Result<BTreeSet<ResourceKey>, FetchError> {
    if !root_known {
        return Ok(data.resources.keys().cloned().collect());
    }
    let mut keys = BTreeSet::new();
    if data.resources.contains_key(root) {
        keys.insert(root.clone());
    }
    data.visit(root, RelationKind::ParentOf, &mut |res: &Resource, _: usize| {
        keys.insert(res.key());
    })?;
    keys.retain(|k| data.resources.contains_key(k));
    Ok(keys)
}

fn tag(data: &mut GraphData, key: &ResourceKey, meta_key: &str, value: &str) {
    if let Some(res) = data.resources.get_mut(key) {
        res.set_meta(meta_key, value);
    }
}

/// Property delta: `-name` for the old value and `+name` for the new one.
fn delta(old: &Properties, new: &Properties) -> Properties {
    let names: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
    let mut out = Properties::new();
    for name in names {
        let (before, after) = (old.get(name), new.get(name));
        if before == after {
            continue;
        }
        if let Some(before) = before {
            out.insert(format!("-{}", name), before.clone());
        }
        if let Some(after) = after {
            out.insert(format!("+{}", name), after.clone());
        }
    }
    out
}

/// Compares the resources under `root` in both graphs.
pub fn diff(from: &Graph, to: &Graph, root: impl Into<ResourceKey>) -> Result<Diff, FetchError> {
    let root = root.into();
    let (mut from_data, mut to_data) = (from.data(), to.data());
    let root_known = from_data.resources.contains_key(&root) || to_data.resources.contains_key(&root);

    let from_keys = scope(&from_data, &root, root_known)?;
    let to_keys = scope(&to_data, &root, root_known)?;

    let mut merged = from_data.clone();
    merged.merge(&to_data);

    let mut has_diff = false;
    for key in from_keys.difference(&to_keys) {
        tag(&mut from_data, key, META_DIFF, EXTRA);
        tag(&mut merged, key, META_DIFF, MISSING);
        has_diff = true;
    }
    for key in to_keys.difference(&from_keys) {
        tag(&mut to_data, key, META_DIFF, EXTRA);
        tag(&mut merged, key, META_DIFF, EXTRA);
        has_diff = true;
    }
    for key in from_keys.intersection(&to_keys) {
        let (Some(old), Some(new)) = (from_data.resources.get(key), to_data.resources.get(key)) else {
            continue;
        };
        let changes = delta(old.properties(), new.properties());
        if let Some(res) = merged.resources.get_mut(key) {
            res.set_meta(META_DIFF, COMMON);
            if !changes.is_empty() {
                has_diff = true;
                res.set_meta(META_DIFF_PROPS, CHANGED);
                let props = res.properties_mut();
                for name in changes.keys() {
                    props.remove(&name[1..]);
                }
                props.extend(changes);
            }
        }
    }

    Ok(Diff {
        from_graph: Graph::from_data(from_data),
        to_graph: Graph::from_data(to_data),
        merged_graph: Graph::from_data(merged),
        has_diff,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cloud::properties::NAME;
    use crate::app::cloud::{PropertyValue, ResourceType};

    fn graph(resources: Vec<Resource>) -> Graph {
        let g = Graph::new();
        g.add_resource(Resource::region("eu-west-1"));
        for res in resources {
            g.add_parent_relation((ResourceType::Region, "eu-west-1"), &res.key());
            g.add_resource(res);
        }
        g
    }

    fn meta(g: &Graph, id: &str, key: &str) -> Option<String> {
        g.get_resource(ResourceType::Instance, id)
            .ok()
            .and_then(|r| r.meta_value(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_diff_marks_missing_extra_and_deltas() {
        let from = graph(vec![
            Resource::new(ResourceType::Instance, "X"),
            Resource::new(ResourceType::Instance, "Y").with(NAME, "a"),
        ]);
        let to = graph(vec![
            Resource::new(ResourceType::Instance, "Y").with(NAME, "b"),
            Resource::new(ResourceType::Instance, "Z"),
        ]);

        let diff = diff(&from, &to, (ResourceType::Region, "eu-west-1")).unwrap();
        assert!(diff.has_diff());

        assert_eq!(meta(diff.from_graph(), "X", META_DIFF).as_deref(), Some(EXTRA));
        assert_eq!(meta(diff.from_graph(), "Y", META_DIFF), None);
        assert_eq!(meta(diff.to_graph(), "Z", META_DIFF).as_deref(), Some(EXTRA));

        let merged = diff.merged_graph();
        assert_eq!(meta(merged, "X", META_DIFF).as_deref(), Some(MISSING));
        assert_eq!(meta(merged, "Z", META_DIFF).as_deref(), Some(EXTRA));
        assert_eq!(meta(merged, "Y", META_DIFF).as_deref(), Some(COMMON));
        assert_eq!(meta(merged, "Y", META_DIFF_PROPS).as_deref(), Some(CHANGED));

        let y = merged.get_resource(ResourceType::Instance, "Y").unwrap();
        assert_eq!(y.property("-Name"), Some(&PropertyValue::from("a")));
        assert_eq!(y.property("+Name"), Some(&PropertyValue::from("b")));
        assert_eq!(y.property(NAME), None);
    }

    #[test]
    fn test_identical_graphs_have_no_diff() {
        let from = graph(vec![Resource::new(ResourceType::Instance, "Y").with(NAME, "a")]);
        let to = graph(vec![Resource::new(ResourceType::Instance, "Y").with(NAME, "a")]);
        let diff = diff(&from, &to, (ResourceType::Region, "eu-west-1")).unwrap();
        assert!(!diff.has_diff());
        assert_eq!(meta(diff.merged_graph(), "Y", META_DIFF).as_deref(), Some(COMMON));
    }

    #[test]
    fn test_unknown_root_compares_everything() {
        let from = Graph::new();
        from.add_resource(Resource::new(ResourceType::Instance, "X"));
        let to = Graph::new();
        let diff = diff(&from, &to, (ResourceType::Region, "nowhere")).unwrap();
        assert!(diff.has_diff());
        assert_eq!(meta(diff.merged_graph(), "X", META_DIFF).as_deref(), Some(MISSING));
    }
}
