//! awsgraph - AWS Resource Graph Fetcher
//!
//! awsgraph discovers the live state of an AWS account and materializes it as a typed,
//! navigable in-memory graph of resources and relationships. Consumers query the graph to
//! list resources, compute deltas against earlier snapshots and export triples.
//!
//! # Architecture Overview
//!
//! The crate is layered leaves first:
//!
//! - **Property Model** ([`app::cloud`]): resource types, property names, the typed
//!   [`app::cloud::PropertyValue`] and its firewall/route/grant value objects
//! - **Graph** ([`app::graph`]): resources, relations, matchers, filters, diff and triples
//! - **Converter** ([`app::convert`]): table-driven projection of provider DTOs into resources
//! - **Fetcher** ([`app::fetch`]): concurrent per-type fetch-funcs over a single-flight cache
//! - **Services** ([`app::services`]): per-service adapters running fetch then relation inference
//!
//! ## Key Patterns
//!
//! - **Trait-based providers**: every cloud call goes through an async trait in
//!   [`app::provider`], so a recorded fixture and a real SDK binding are interchangeable
//! - **Partial failure**: conversion and pagination errors are aggregated into
//!   [`app::error::Error`] while the rest of the graph is still returned
//! - **Snapshot-based inference**: relation rules read a frozen snapshot while writing edges
//!   into the live graph
//!
//! # Getting Started
//!
//! Build a [`app::services::ServiceRegistry`] from a [`app::config::Config`] and a provider,
//! then call [`app::services::ServiceRegistry::fetch_all`] with a [`app::fetch::FetchContext`].

#![warn(clippy::all, rust_2018_idioms)]

// Include logging macros first
#[macro_use]
pub mod logging_macros;

pub mod app;
