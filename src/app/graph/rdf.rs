//! Triple export of a graph.
//!
//! Each resource yields a `type` triple, one triple per scalar property (keyed by the
//! property's schema label) and one triple per element of list properties. Edges yield
//! `parent-of` and `applies-on` triples between resource ids. Output is sorted so two
//! equal graphs always serialize identically.

use std::fmt;

use chrono::SecondsFormat;
use serde::Serialize;

use crate::app::cloud::properties;
use crate::app::cloud::PropertyValue;

use super::resource::Resource;
use super::GraphData;

pub const TYPE_PREDICATE: &str = "type";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Object {
    Resource(String),
    Literal { value: String, datatype: String },
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: Object,
}

impl Triple {
    fn literal(subject: &str, predicate: &str, value: String, datatype: &str) -> Self {
        Triple {
            subject: subject.to_string(),
            predicate: predicate.to_string(),
            object: Object::Literal {
                value,
                datatype: datatype.to_string(),
            },
        }
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> <{}> ", self.subject, self.predicate)?;
        match &self.object {
            Object::Resource(id) => write!(f, "<{}> .", id),
            Object::Literal { value, datatype } => {
                write!(f, "\"{}\"^^{} .", escape(value), datatype)
            }
        }
    }
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn property_triples(res: &Resource, name: &str, value: &PropertyValue, out: &mut Vec<Triple>) {
    let id = res.id();
    let predicate = properties::label(name);
    let datatype = value.kind().datatype();
    match value {
        PropertyValue::String(s) => out.push(Triple::literal(id, predicate, s.clone(), datatype)),
        PropertyValue::Int(i) => out.push(Triple::literal(id, predicate, i.to_string(), datatype)),
        PropertyValue::Bool(b) => out.push(Triple::literal(id, predicate, b.to_string(), datatype)),
        PropertyValue::Time(t) => out.push(Triple::literal(
            id,
            predicate,
            t.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            datatype,
        )),
        PropertyValue::StringList(list) => out.extend(
            list.iter()
                .map(|s| Triple::literal(id, predicate, s.clone(), "xsd:string")),
        ),
        PropertyValue::KeyValues(list) => out.extend(
            list.iter()
                .map(|kv| Triple::literal(id, predicate, json(kv), datatype)),
        ),
        PropertyValue::FirewallRules(list) => out.extend(
            list.iter()
                .map(|r| Triple::literal(id, predicate, json(r), datatype)),
        ),
        PropertyValue::Routes(list) => out.extend(
            list.iter()
                .map(|r| Triple::literal(id, predicate, json(r), datatype)),
        ),
        PropertyValue::Grants(list) => out.extend(
            list.iter()
                .map(|g| Triple::literal(id, predicate, json(g), datatype)),
        ),
        PropertyValue::Origins(list) => out.extend(
            list.iter()
                .map(|o| Triple::literal(id, predicate, json(o), datatype)),
        ),
    }
}

pub(crate) fn triples(data: &GraphData) -> Vec<Triple> {
    let mut out = Vec::new();
    for res in data.resources.values() {
        out.push(Triple::literal(
            res.id(),
            TYPE_PREDICATE,
            res.kind().to_string(),
            "xsd:string",
        ));
        for (name, value) in res.properties() {
            property_triples(res, name, value, &mut out);
        }
        for (key, value) in res.meta() {
            out.push(Triple::literal(
                res.id(),
                &format!("meta:{}", key),
                value.to_string(),
                "xsd:string",
            ));
        }
    }
    for (kind, from, to) in data.edges() {
        out.push(Triple {
            subject: from.id,
            predicate: kind.predicate().to_string(),
            object: Object::Resource(to.id),
        });
    }
    out.sort();
    out.dedup();
    out
}

/// One triple per line, N-Triples style.
pub fn to_ntriples(triples: &[Triple]) -> String {
    triples
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
