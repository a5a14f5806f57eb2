//! Resource predicates used by graph queries and filters.

use crate::app::cloud::properties::TAGS;
use crate::app::cloud::{PropertyValue, ResourceType};

use super::resource::Resource;

/// Comparison on one property of the bag.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMatcher {
    pub name: String,
    pub value: PropertyValue,
    /// Stringify both sides before comparing.
    pub match_string: bool,
    pub ignore_case: bool,
    /// Substring instead of equality; implies string comparison.
    pub contains: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    Property(PropertyMatcher),
    Tag { key: String, value: String },
    TagKey(String),
    TagValue(String),
    And(Vec<Matcher>),
    Or(Vec<Matcher>),
}

impl Matcher {
    pub fn property(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Matcher::Property(PropertyMatcher {
            name: name.into(),
            value: value.into(),
            match_string: false,
            ignore_case: false,
            contains: false,
        })
    }

    pub fn tag(key: impl Into<String>, value: impl Into<String>) -> Self {
        Matcher::Tag {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn match_string(self) -> Self {
        self.with_property_option(|m| m.match_string = true)
    }

    pub fn ignore_case(self) -> Self {
        self.with_property_option(|m| m.ignore_case = true)
    }

    pub fn contains(self) -> Self {
        self.with_property_option(|m| m.contains = true)
    }

    fn with_property_option(mut self, set: impl FnOnce(&mut PropertyMatcher)) -> Self {
        if let Matcher::Property(ref mut m) = self {
            set(m);
        }
        self
    }

    pub fn matches(&self, res: &Resource) -> bool {
        match self {
            Matcher::Property(m) => m.matches(res),
            Matcher::Tag { key, value } => {
                let wanted = format!("{}={}", key, value);
                tags(res).any(|t| *t == wanted)
            }
            Matcher::TagKey(key) => {
                tags(res).any(|t| t.split_once('=').map(|(k, _)| k == key).unwrap_or(false))
            }
            Matcher::TagValue(value) => {
                tags(res).any(|t| t.split_once('=').map(|(_, v)| v == value).unwrap_or(false))
            }
            Matcher::And(all) => !all.is_empty() && all.iter().all(|m| m.matches(res)),
            Matcher::Or(any) => any.iter().any(|m| m.matches(res)),
        }
    }
}

impl PropertyMatcher {
    fn matches(&self, res: &Resource) -> bool {
        let Some(actual) = res.property(&self.name) else {
            return false;
        };
        if !(self.match_string || self.ignore_case || self.contains) {
            return *actual == self.value;
        }
        let (mut left, mut right) = (actual.to_string(), self.value.to_string());
        if self.ignore_case {
            left = left.to_lowercase();
            right = right.to_lowercase();
        }
        if self.contains {
            left.contains(&right)
        } else {
            left == right
        }
    }
}

fn tags(res: &Resource) -> impl Iterator<Item = &String> {
    res.property(TAGS)
        .and_then(|v| v.as_string_list())
        .unwrap_or(&[])
        .iter()
}

/// Resources of one type, optionally narrowed by a matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub kind: ResourceType,
    pub matcher: Option<Matcher>,
}

impl Query {
    pub fn new(kind: ResourceType) -> Self {
        Query { kind, matcher: None }
    }

    pub fn matching(mut self, matcher: Matcher) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn accepts(&self, res: &Resource) -> bool {
        res.kind() == self.kind && self.matcher.as_ref().map(|m| m.matches(res)).unwrap_or(true)
    }
}
