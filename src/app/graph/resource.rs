use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::app::cloud::properties::{self, ID};
use crate::app::cloud::{PropertyValue, RelationKind, ResourceType};
use crate::app::error::FetchError;

pub type Properties = BTreeMap<String, PropertyValue>;

/// Identity of a resource: its type and provider id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResourceKey {
    pub kind: ResourceType,
    pub id: String,
}

impl ResourceKey {
    pub fn new(kind: ResourceType, id: impl Into<String>) -> Self {
        ResourceKey { kind, id: id.into() }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.id)
    }
}

impl From<&Resource> for ResourceKey {
    fn from(res: &Resource) -> Self {
        res.key()
    }
}

impl From<&ResourceKey> for ResourceKey {
    fn from(key: &ResourceKey) -> Self {
        key.clone()
    }
}

impl<S: Into<String>> From<(ResourceType, S)> for ResourceKey {
    fn from((kind, id): (ResourceType, S)) -> Self {
        ResourceKey::new(kind, id)
    }
}

/// A typed cloud resource with its property bag.
///
/// Two resources are equal when their type and id are; compare [`Resource::properties`]
/// to check the bags.
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    kind: ResourceType,
    id: String,
    properties: Properties,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    meta: Properties,
    #[serde(skip)]
    relations: Vec<(RelationKind, ResourceKey)>,
}

impl Resource {
    pub fn new(kind: ResourceType, id: impl Into<String>) -> Self {
        let id = id.into();
        let mut properties = Properties::new();
        properties.insert(ID.to_string(), PropertyValue::String(id.clone()));
        Resource {
            kind,
            id,
            properties,
            meta: Properties::new(),
            relations: Vec::new(),
        }
    }

    pub fn region(name: impl Into<String>) -> Self {
        Resource::new(ResourceType::Region, name)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ResourceType {
        self.kind
    }

    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(self.kind, self.id.clone())
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// String value of a property, if present and a string.
    pub fn property_str(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(|v| v.as_str())
    }

    /// Writes a property after checking it against the schema.
    pub fn set_property(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<(), FetchError> {
        let value = value.into();
        properties::check(name, &value)?;
        self.properties.insert(name.to_string(), value);
        Ok(())
    }

    /// Builder-style unchecked write, for assembling expected resources.
    pub fn with(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    pub fn meta(&self) -> &Properties {
        &self.meta
    }

    pub fn meta_value(&self, key: &str) -> Option<&PropertyValue> {
        self.meta.get(key)
    }

    pub fn set_meta(&mut self, key: &str, value: impl Into<PropertyValue>) {
        self.meta.insert(key.to_string(), value.into());
    }

    /// Records a relation that the graph turns into an edge when this resource is added.
    pub fn add_relation(&mut self, kind: RelationKind, other: impl Into<ResourceKey>) {
        self.relations.push((kind, other.into()));
    }

    pub fn relations(&self) -> &[(RelationKind, ResourceKey)] {
        &self.relations
    }

    pub(crate) fn take_relations(&mut self) -> Vec<(RelationKind, ResourceKey)> {
        std::mem::take(&mut self.relations)
    }

    pub fn same(&self, other: &Resource) -> bool {
        self.kind == other.kind && self.id == other.id
    }

    /// Merges `other`'s bag and metadata into this resource; `other` wins per entry.
    pub fn merge(&mut self, other: Resource) {
        self.properties.extend(other.properties);
        self.meta.extend(other.meta);
        self.relations.extend(other.relations);
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Resource {}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.id)
    }
}
