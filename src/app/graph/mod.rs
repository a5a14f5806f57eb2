//! The resource graph.
//!
//! A [`Graph`] holds resources keyed by (type, id) and two kinds of stored edges:
//! `parent-of` and `applies-on`. The reverse readings of those edges give the
//! `child-of` and `depending-on` relations. Adding an edge whose endpoint was not
//! fetched inserts a bare placeholder holding only the id; fetching the resource later
//! merges its properties into that placeholder.
//!
//! The graph is internally synchronized: every method takes `&self`, so relation
//! inference can write edges from many tasks while reading a [`Snapshot`].

pub mod diff;
pub mod matchers;
pub mod rdf;
pub mod resource;

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::app::cloud::{PropertyValue, RelationKind, ResourceType};
use crate::app::error::FetchError;

pub use diff::{diff, Diff};
pub use matchers::{Matcher, PropertyMatcher, Query};
pub use rdf::{Object, Triple};
pub use resource::{Properties, Resource, ResourceKey};

type Adjacency = BTreeMap<ResourceKey, BTreeSet<ResourceKey>>;

// ============================================================================
// Graph data
// ============================================================================

#[derive(Debug, Clone, Default)]
pub(crate) struct GraphData {
    resources: BTreeMap<ResourceKey, Resource>,
    children: Adjacency,
    parents: Adjacency,
    applies_on: Adjacency,
    applied_by: Adjacency,
}

fn link(adjacency: &mut Adjacency, from: &ResourceKey, to: &ResourceKey) {
    adjacency.entry(from.clone()).or_default().insert(to.clone());
}

fn neighbours<'a>(adjacency: &'a Adjacency, key: &ResourceKey) -> impl Iterator<Item = &'a ResourceKey> {
    adjacency.get(key).into_iter().flatten()
}

impl GraphData {
    fn add_resource(&mut self, mut res: Resource) {
        let key = res.key();
        for (kind, other) in res.take_relations() {
            match kind {
                RelationKind::ParentOf => self.add_edge(RelationKind::ParentOf, &key, &other),
                RelationKind::ChildOf => self.add_edge(RelationKind::ParentOf, &other, &key),
                RelationKind::AppliesOn => self.add_edge(RelationKind::AppliesOn, &key, &other),
                RelationKind::DependingOn => self.add_edge(RelationKind::AppliesOn, &other, &key),
            }
        }
        match self.resources.get_mut(&key) {
            Some(existing) => existing.merge(res),
            None => {
                self.resources.insert(key, res);
            }
        }
    }

    fn add_edge(&mut self, kind: RelationKind, from: &ResourceKey, to: &ResourceKey) {
        match kind {
            RelationKind::ParentOf => {
                self.ensure(from);
                self.ensure(to);
                link(&mut self.children, from, to);
                link(&mut self.parents, to, from);
            }
            RelationKind::ChildOf => self.add_edge(RelationKind::ParentOf, to, from),
            RelationKind::AppliesOn => {
                self.ensure(from);
                self.ensure(to);
                link(&mut self.applies_on, from, to);
                link(&mut self.applied_by, to, from);
            }
            RelationKind::DependingOn => self.add_edge(RelationKind::AppliesOn, to, from),
        }
    }

    /// Inserts a bare placeholder for an edge endpoint not fetched yet.
    fn ensure(&mut self, key: &ResourceKey) {
        if !self.resources.contains_key(key) {
            self.resources
                .insert(key.clone(), Resource::new(key.kind, key.id.clone()));
        }
    }

    fn adjacency(&self, kind: RelationKind) -> &Adjacency {
        match kind {
            RelationKind::ParentOf => &self.children,
            RelationKind::ChildOf => &self.parents,
            RelationKind::AppliesOn => &self.applies_on,
            RelationKind::DependingOn => &self.applied_by,
        }
    }

    /// Resource held for `key`, or a bare placeholder for a dangling endpoint.
    fn resolve(&self, key: &ResourceKey) -> Resource {
        self.resources
            .get(key)
            .cloned()
            .unwrap_or_else(|| Resource::new(key.kind, key.id.clone()))
    }

    fn get_resource(&self, kind: ResourceType, id: &str) -> Result<Resource, FetchError> {
        self.resources
            .get(&ResourceKey::new(kind, id))
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                kind: kind.to_string(),
                id: id.to_string(),
            })
    }

    fn find_resource(&self, id: &str) -> Result<Option<Resource>, FetchError> {
        let mut found = self.resources.values().filter(|r| r.id() == id);
        match (found.next(), found.next()) {
            (None, _) => Ok(None),
            (Some(res), None) => Ok(Some(res.clone())),
            (Some(_), Some(_)) => Err(FetchError::Invalid(format!(
                "multiple resources with id '{}' found",
                id
            ))),
        }
    }

    fn find(&self, query: &Query) -> Vec<Resource> {
        self.resources
            .values()
            .filter(|r| query.accepts(r))
            .cloned()
            .collect()
    }

    fn find_resources_by_property(&self, name: &str, value: &PropertyValue) -> Vec<Resource> {
        self.resources
            .values()
            .filter(|r| r.property(name) == Some(value))
            .cloned()
            .collect()
    }

    fn get_all_resources(&self, kinds: &[ResourceType]) -> Vec<Resource> {
        self.resources
            .values()
            .filter(|r| kinds.contains(&r.kind()))
            .cloned()
            .collect()
    }

    fn resource_relations(&self, key: &ResourceKey, kind: RelationKind, transitive: bool) -> Vec<Resource> {
        let adjacency = self.adjacency(kind);
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<ResourceKey> = neighbours(adjacency, key).cloned().collect();
        let mut out = Vec::new();
        while let Some(next) = queue.pop_front() {
            if next == *key || !seen.insert(next.clone()) {
                continue;
            }
            if transitive {
                queue.extend(neighbours(adjacency, &next).cloned());
            }
            out.push(self.resolve(&next));
        }
        out
    }

    /// Depth-first walk along `kind` from `root`, excluding the root. Fails on cycles.
    fn visit(
        &self,
        root: &ResourceKey,
        kind: RelationKind,
        each: &mut dyn FnMut(&Resource, usize),
    ) -> Result<(), FetchError> {
        let mut path = vec![root.clone()];
        self.visit_from(root, kind, 1, &mut path, each)
    }

    fn visit_from(
        &self,
        key: &ResourceKey,
        kind: RelationKind,
        depth: usize,
        path: &mut Vec<ResourceKey>,
        each: &mut dyn FnMut(&Resource, usize),
    ) -> Result<(), FetchError> {
        for next in neighbours(self.adjacency(kind), key) {
            if path.contains(next) {
                return Err(FetchError::Invalid(format!(
                    "cycle in {} chain at {}",
                    kind.predicate(),
                    next
                )));
            }
            each(&self.resolve(next), depth);
            path.push(next.clone());
            self.visit_from(next, kind, depth + 1, path, each)?;
            path.pop();
        }
        Ok(())
    }

    fn ancestors(&self, key: &ResourceKey) -> Result<Vec<ResourceKey>, FetchError> {
        let mut out = Vec::new();
        self.visit(key, RelationKind::ChildOf, &mut |res: &Resource, _: usize| {
            out.push(res.key())
        })?;
        Ok(out)
    }

    fn filter(&self, kind: ResourceType, keep: impl Fn(&Resource) -> bool) -> Result<GraphData, FetchError> {
        let mut kept = BTreeSet::new();
        for res in self.resources.values().filter(|r| r.kind() == kind && keep(r)) {
            kept.insert(res.key());
            kept.extend(self.ancestors(&res.key())?);
        }

        let mut filtered = GraphData::default();
        for key in &kept {
            if let Some(res) = self.resources.get(key) {
                filtered.resources.insert(key.clone(), res.clone());
            }
        }
        for (adjacency, kind) in [
            (&self.children, RelationKind::ParentOf),
            (&self.applies_on, RelationKind::AppliesOn),
        ] {
            for (from, targets) in adjacency {
                for to in targets.iter().filter(|to| kept.contains(from) && kept.contains(*to)) {
                    filtered.add_edge(kind, from, to);
                }
            }
        }
        Ok(filtered)
    }

    fn merge(&mut self, other: &GraphData) {
        for res in other.resources.values() {
            self.add_resource(res.clone());
        }
        for (adjacency, kind) in [
            (&other.children, RelationKind::ParentOf),
            (&other.applies_on, RelationKind::AppliesOn),
        ] {
            for (from, targets) in adjacency {
                for to in targets {
                    self.add_edge(kind, from, to);
                }
            }
        }
    }

    fn edges(&self) -> Vec<(RelationKind, ResourceKey, ResourceKey)> {
        let mut out = Vec::new();
        for (adjacency, kind) in [
            (&self.children, RelationKind::ParentOf),
            (&self.applies_on, RelationKind::AppliesOn),
        ] {
            for (from, targets) in adjacency {
                out.extend(targets.iter().map(|to| (kind, from.clone(), to.clone())));
            }
        }
        out
    }
}

// ============================================================================
// Graph
// ============================================================================

#[derive(Debug, Default)]
pub struct Graph {
    data: RwLock<GraphData>,
}

impl Clone for Graph {
    fn clone(&self) -> Self {
        Graph::from_data(self.read().clone())
    }
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_data(data: GraphData) -> Self {
        Graph {
            data: RwLock::new(data),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, GraphData> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, GraphData> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Adds or merges a resource; relations it carries become edges.
    pub fn add_resource(&self, res: Resource) {
        self.write().add_resource(res);
    }

    pub fn add_resources(&self, resources: impl IntoIterator<Item = Resource>) {
        let mut data = self.write();
        for res in resources {
            data.add_resource(res);
        }
    }

    pub fn add_parent_relation(&self, parent: impl Into<ResourceKey>, child: impl Into<ResourceKey>) {
        self.write()
            .add_edge(RelationKind::ParentOf, &parent.into(), &child.into());
    }

    pub fn add_applies_on_relation(&self, src: impl Into<ResourceKey>, dst: impl Into<ResourceKey>) {
        self.write()
            .add_edge(RelationKind::AppliesOn, &src.into(), &dst.into());
    }

    /// Adds an edge of any kind; `ChildOf` and `DependingOn` are stored reversed.
    pub fn add_relation(&self, kind: RelationKind, from: impl Into<ResourceKey>, to: impl Into<ResourceKey>) {
        self.write().add_edge(kind, &from.into(), &to.into());
    }

    pub fn add_graph(&self, other: &Graph) {
        let other = other.read().clone();
        self.write().merge(&other);
    }

    pub fn get_resource(&self, kind: ResourceType, id: &str) -> Result<Resource, FetchError> {
        self.read().get_resource(kind, id)
    }

    pub fn find_resource(&self, id: &str) -> Result<Option<Resource>, FetchError> {
        self.read().find_resource(id)
    }

    pub fn find(&self, query: &Query) -> Vec<Resource> {
        self.read().find(query)
    }

    pub fn find_resources_by_property(&self, name: &str, value: impl Into<PropertyValue>) -> Vec<Resource> {
        self.read().find_resources_by_property(name, &value.into())
    }

    pub fn get_all_resources(&self, kinds: &[ResourceType]) -> Vec<Resource> {
        self.read().get_all_resources(kinds)
    }

    pub fn resources(&self) -> Vec<Resource> {
        self.read().resources.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().resources.is_empty()
    }

    /// Resources reachable from `res` along `kind`, one hop or transitively.
    pub fn resource_relations(
        &self,
        res: impl Into<ResourceKey>,
        kind: RelationKind,
        transitive: bool,
    ) -> Vec<Resource> {
        self.read().resource_relations(&res.into(), kind, transitive)
    }

    /// Resources of the same type sharing a parent with `res`.
    pub fn resource_siblings(&self, res: impl Into<ResourceKey>) -> Vec<Resource> {
        let key = res.into();
        let data = self.read();
        let mut siblings = BTreeSet::new();
        for parent in neighbours(&data.parents, &key) {
            siblings.extend(
                neighbours(&data.children, parent)
                    .filter(|k| k.kind == key.kind && **k != key)
                    .cloned(),
            );
        }
        siblings.iter().map(|k| data.resolve(k)).collect()
    }

    pub fn visit_children(
        &self,
        root: impl Into<ResourceKey>,
        mut each: impl FnMut(&Resource, usize),
    ) -> Result<(), FetchError> {
        self.read().visit(&root.into(), RelationKind::ParentOf, &mut each)
    }

    pub fn visit_parents(
        &self,
        from: impl Into<ResourceKey>,
        mut each: impl FnMut(&Resource, usize),
    ) -> Result<(), FetchError> {
        self.read().visit(&from.into(), RelationKind::ChildOf, &mut each)
    }

    /// First ancestor of `res` with the given type. Fails on a parent cycle.
    pub fn find_ancestor(
        &self,
        res: impl Into<ResourceKey>,
        kind: ResourceType,
    ) -> Result<Option<Resource>, FetchError> {
        let mut found = None;
        self.visit_parents(res, |parent, _| {
            if found.is_none() && parent.kind() == kind {
                found = Some(parent.clone());
            }
        })?;
        Ok(found)
    }

    /// New graph with the resources of `kind` passing all matchers, plus their parents.
    pub fn filter(&self, kind: ResourceType, matchers: &[Matcher]) -> Result<Graph, FetchError> {
        let data = self.read().filter(kind, |r| matchers.iter().all(|m| m.matches(r)))?;
        Ok(Graph::from_data(data))
    }

    /// Same as [`Graph::filter`] with any matcher sufficing. No matcher keeps everything.
    pub fn or_filter(&self, kind: ResourceType, matchers: &[Matcher]) -> Result<Graph, FetchError> {
        let data = self
            .read()
            .filter(kind, |r| matchers.is_empty() || matchers.iter().any(|m| m.matches(r)))?;
        Ok(Graph::from_data(data))
    }

    /// Frozen copy of the current resources and edges.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            data: Arc::new(self.read().clone()),
        }
    }

    pub fn edges(&self) -> Vec<(RelationKind, ResourceKey, ResourceKey)> {
        self.read().edges()
    }

    pub fn triples(&self) -> Vec<Triple> {
        rdf::triples(&self.read())
    }

    pub(crate) fn data(&self) -> GraphData {
        self.read().clone()
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Read-only view of a graph, unaffected by later writes to it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    data: Arc<GraphData>,
}

impl Snapshot {
    pub fn get_resource(&self, kind: ResourceType, id: &str) -> Result<Resource, FetchError> {
        self.data.get_resource(kind, id)
    }

    pub fn find(&self, query: &Query) -> Vec<Resource> {
        self.data.find(query)
    }

    pub fn get_all_resources(&self, kinds: &[ResourceType]) -> Vec<Resource> {
        self.data.get_all_resources(kinds)
    }

    /// Resources of `kind` whose property `name` equals `value`.
    pub fn resolve_by_property(&self, kind: ResourceType, name: &str, value: impl Into<PropertyValue>) -> Vec<Resource> {
        let value = value.into();
        self.data
            .find_resources_by_property(name, &value)
            .into_iter()
            .filter(|r| r.kind() == kind)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.data.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cloud::properties::{ID, NAME, VPC};
    use pretty_assertions::assert_eq;

    fn ids(resources: &[Resource]) -> Vec<String> {
        let mut ids: Vec<String> = resources.iter().map(|r| r.id().to_string()).collect();
        ids.sort();
        ids
    }

    fn sample() -> Graph {
        let g = Graph::new();
        g.add_resources([
            Resource::region("eu-west-1"),
            Resource::new(ResourceType::Vpc, "vpc_1"),
            Resource::new(ResourceType::Vpc, "vpc_2"),
            Resource::new(ResourceType::Subnet, "sub_1").with(VPC, "vpc_1"),
            Resource::new(ResourceType::Subnet, "sub_2").with(VPC, "vpc_2"),
            Resource::new(ResourceType::Instance, "inst_1").with(VPC, "vpc_1"),
            Resource::new(ResourceType::Instance, "inst_2").with(VPC, "vpc_1"),
            Resource::new(ResourceType::SecurityGroup, "sg_1"),
        ]);
        let region = ResourceKey::new(ResourceType::Region, "eu-west-1");
        g.add_parent_relation(&region, (ResourceType::Vpc, "vpc_1"));
        g.add_parent_relation(&region, (ResourceType::Vpc, "vpc_2"));
        g.add_parent_relation((ResourceType::Vpc, "vpc_1"), (ResourceType::Subnet, "sub_1"));
        g.add_parent_relation((ResourceType::Vpc, "vpc_2"), (ResourceType::Subnet, "sub_2"));
        g.add_parent_relation((ResourceType::Subnet, "sub_1"), (ResourceType::Instance, "inst_1"));
        g.add_parent_relation((ResourceType::Subnet, "sub_1"), (ResourceType::Instance, "inst_2"));
        g.add_applies_on_relation((ResourceType::SecurityGroup, "sg_1"), (ResourceType::Instance, "inst_1"));
        g
    }

    #[test]
    fn test_add_resource_is_idempotent_and_merges() {
        let g = Graph::new();
        g.add_resource(Resource::new(ResourceType::Instance, "inst_1").with(NAME, "a"));
        g.add_resource(Resource::new(ResourceType::Instance, "inst_1").with(VPC, "vpc_1"));
        g.add_resource(Resource::new(ResourceType::Instance, "inst_1").with(NAME, "b"));
        assert_eq!(g.len(), 1);
        let res = g.get_resource(ResourceType::Instance, "inst_1").unwrap();
        assert_eq!(res.property_str(NAME), Some("b"));
        assert_eq!(res.property_str(VPC), Some("vpc_1"));
    }

    #[test]
    fn test_get_resource_not_found() {
        let g = sample();
        assert_eq!(
            g.get_resource(ResourceType::Instance, "nope").unwrap_err(),
            FetchError::NotFound {
                kind: "instance".to_string(),
                id: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_relations_one_hop_and_transitive() {
        let g = sample();
        let vpc = ResourceKey::new(ResourceType::Vpc, "vpc_1");
        assert_eq!(ids(&g.resource_relations(&vpc, RelationKind::ParentOf, false)), vec!["sub_1"]);
        assert_eq!(
            ids(&g.resource_relations(&vpc, RelationKind::ParentOf, true)),
            vec!["inst_1", "inst_2", "sub_1"]
        );
        let inst = ResourceKey::new(ResourceType::Instance, "inst_1");
        assert_eq!(
            ids(&g.resource_relations(&inst, RelationKind::ChildOf, true)),
            vec!["eu-west-1", "sub_1", "vpc_1"]
        );
        assert_eq!(ids(&g.resource_relations(&inst, RelationKind::DependingOn, false)), vec!["sg_1"]);
        let sg = ResourceKey::new(ResourceType::SecurityGroup, "sg_1");
        assert_eq!(ids(&g.resource_relations(&sg, RelationKind::AppliesOn, false)), vec!["inst_1"]);
    }

    #[test]
    fn test_dangling_edge_yields_placeholder() {
        let g = Graph::new();
        g.add_resource(Resource::new(ResourceType::Instance, "inst_5"));
        g.add_applies_on_relation((ResourceType::KeyPair, "unexisting_key"), (ResourceType::Instance, "inst_5"));
        let key = g.get_resource(ResourceType::KeyPair, "unexisting_key").unwrap();
        assert_eq!(key.property_str(ID), Some("unexisting_key"));
        let deps = g.resource_relations((ResourceType::Instance, "inst_5"), RelationKind::DependingOn, false);
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].kind(), ResourceType::KeyPair);
        assert_eq!(deps[0].id(), "unexisting_key");
    }

    #[test]
    fn test_filter_keeps_unfetched_parent() {
        let g = Graph::new();
        g.add_resource(Resource::new(ResourceType::Instance, "inst_1").with(VPC, "vpc_9"));
        g.add_parent_relation((ResourceType::Subnet, "sub_9"), (ResourceType::Instance, "inst_1"));
        let filtered = g.filter(ResourceType::Instance, &[]).unwrap();
        assert_eq!(ids(&filtered.get_all_resources(&[ResourceType::Subnet])), vec!["sub_9"]);
        let parents = filtered.resource_relations((ResourceType::Instance, "inst_1"), RelationKind::ChildOf, false);
        assert_eq!(ids(&parents), vec!["sub_9"]);

        g.add_resource(Resource::new(ResourceType::Subnet, "sub_9").with(NAME, "private"));
        let sub = g.get_resource(ResourceType::Subnet, "sub_9").unwrap();
        assert_eq!(sub.property_str(NAME), Some("private"));
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn test_pending_relations_become_edges() {
        let g = Graph::new();
        let mut sub = Resource::new(ResourceType::Subnet, "sub_1");
        sub.add_relation(RelationKind::ChildOf, (ResourceType::Vpc, "vpc_1"));
        sub.add_relation(RelationKind::DependingOn, (ResourceType::RouteTable, "rt_1"));
        g.add_resource(sub);
        let parents = g.resource_relations((ResourceType::Subnet, "sub_1"), RelationKind::ChildOf, false);
        assert_eq!(ids(&parents), vec!["vpc_1"]);
        let appliers = g.resource_relations((ResourceType::Subnet, "sub_1"), RelationKind::DependingOn, false);
        assert_eq!(ids(&appliers), vec!["rt_1"]);
    }

    #[test]
    fn test_filter_keeps_parents_up_to_region() {
        let g = sample();
        let filtered = g
            .filter(ResourceType::Instance, &[Matcher::property(VPC, "vpc_1")])
            .unwrap();
        assert_eq!(
            ids(&filtered.get_all_resources(&[ResourceType::Instance])),
            vec!["inst_1", "inst_2"]
        );
        assert_eq!(ids(&filtered.get_all_resources(&[ResourceType::Subnet])), vec!["sub_1"]);
        assert_eq!(ids(&filtered.get_all_resources(&[ResourceType::Vpc])), vec!["vpc_1"]);
        assert_eq!(ids(&filtered.get_all_resources(&[ResourceType::Region])), vec!["eu-west-1"]);
        assert!(filtered.get_all_resources(&[ResourceType::SecurityGroup]).is_empty());

        let none = g
            .filter(
                ResourceType::Instance,
                &[Matcher::property(VPC, "vpc_1"), Matcher::property(NAME, "x")],
            )
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_or_filter() {
        let g = sample();
        let filtered = g
            .or_filter(
                ResourceType::Subnet,
                &[Matcher::property(VPC, "vpc_1"), Matcher::property(VPC, "vpc_2")],
            )
            .unwrap();
        assert_eq!(ids(&filtered.get_all_resources(&[ResourceType::Subnet])), vec!["sub_1", "sub_2"]);
        assert!(filtered.get_all_resources(&[ResourceType::Instance]).is_empty());
    }

    #[test]
    fn test_snapshot_ignores_later_writes() {
        let g = sample();
        let snap = g.snapshot();
        g.add_resource(Resource::new(ResourceType::Vpc, "vpc_3"));
        assert_eq!(snap.get_all_resources(&[ResourceType::Vpc]).len(), 2);
        assert_eq!(g.get_all_resources(&[ResourceType::Vpc]).len(), 3);
        assert_eq!(
            ids(&snap.resolve_by_property(ResourceType::Instance, VPC, "vpc_1")),
            vec!["inst_1", "inst_2"]
        );
    }

    #[test]
    fn test_visit_children_depths_and_siblings() {
        let g = sample();
        let mut seen = Vec::new();
        g.visit_children((ResourceType::Vpc, "vpc_1"), |res, depth| {
            seen.push((res.id().to_string(), depth))
        })
        .unwrap();
        seen.sort();
        assert_eq!(
            seen,
            vec![
                ("inst_1".to_string(), 2),
                ("inst_2".to_string(), 2),
                ("sub_1".to_string(), 1)
            ]
        );
        assert_eq!(ids(&g.resource_siblings((ResourceType::Instance, "inst_1"))), vec!["inst_2"]);
        assert_eq!(
            g.find_ancestor((ResourceType::Instance, "inst_2"), ResourceType::Vpc)
                .unwrap()
                .map(|r| r.id().to_string()),
            Some("vpc_1".to_string())
        );
    }

    #[test]
    fn test_parent_cycle_is_an_error() {
        let g = Graph::new();
        g.add_parent_relation((ResourceType::Vpc, "a"), (ResourceType::Subnet, "b"));
        g.add_parent_relation((ResourceType::Subnet, "b"), (ResourceType::Vpc, "a"));
        assert!(g.visit_children((ResourceType::Vpc, "a"), |_, _| {}).is_err());
    }

    #[test]
    fn test_find_ancestor_reports_parent_cycle() {
        let g = Graph::new();
        g.add_parent_relation((ResourceType::Vpc, "a"), (ResourceType::Subnet, "b"));
        g.add_parent_relation((ResourceType::Subnet, "b"), (ResourceType::Vpc, "a"));
        g.add_parent_relation((ResourceType::Subnet, "b"), (ResourceType::Instance, "c"));
        assert!(g.find_ancestor((ResourceType::Instance, "c"), ResourceType::Region).is_err());
    }

    #[test]
    fn test_find_resource_by_id() {
        let g = sample();
        assert_eq!(g.find_resource("sub_2").unwrap().map(|r| r.kind()), Some(ResourceType::Subnet));
        assert!(g.find_resource("missing").unwrap().is_none());
        g.add_resource(Resource::new(ResourceType::Instance, "sub_2"));
        assert!(g.find_resource("sub_2").is_err());
    }
}
