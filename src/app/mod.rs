//! Core modules for awsgraph.
//!
//! # Module Organization
//!
//! ## Model
//! - [`cloud`] - Resource types, relation kinds, property names and typed property values
//! - [`graph`] - The resource graph: relations, matchers, filters, diff and triple export
//!
//! ## Ingress
//! - [`dto`] - Serde shapes of the provider responses
//! - [`convert`] - Table-driven DTO to resource conversion and value extractors
//! - [`provider`] - Async provider traits and the recorded fixture provider
//!
//! ## Orchestration
//! - [`fetch`] - Fetch-funcs, the single-flight fetch cache and the fetch context
//! - [`services`] - Per-service fetch pipelines, relation inference and the service registry
//!
//! ## Ambient
//! - [`config`] - TOML configuration with per-service and per-type sync toggles
//! - [`error`] - Fetch error kinds and the composite error

pub mod cloud;
pub mod config;
pub mod convert;
pub mod dto;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod provider;
pub mod services;
