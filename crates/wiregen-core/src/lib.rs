//! # wiregen-core
//!
//! Compiles a declarative service-graph description into Go source for a
//! dependency-injection container: a struct of lazily- or eagerly-
//! constructed service slots plus one accessor per service.
//!
//! ## Pipeline
//!
//! 1. [`load::load_description`] reads the YAML document into a
//!    [`Description`].
//! 2. [`ServiceGraph::validate`] rejects unrecognized scopes.
//! 3. [`synthesize::ContainerSynthesizer`] walks the graph in sorted-name
//!    order and assembles a typed [`ast::GoFile`], asking the graph for
//!    each slot type and the [`Expression`] resolver for construction and
//!    property statements.
//! 4. [`emit::render`] serializes the nodes to source text.
//!
//! The generator is single-threaded, synchronous and batch: a run either
//! completes or aborts; no partial output is produced.

pub mod ast;
pub mod emit;
pub mod error;
pub mod expr;
pub mod graph;
pub mod load;
pub mod synthesize;
pub mod types;

pub use error::{Error, Result};
pub use expr::Expression;
pub use graph::{Description, Scope, ServiceDescriptor, ServiceGraph, SlotType};
pub use types::TypeSignature;

/// Validates the description and renders the generated container file for
/// the given target package.
pub fn generate(description: &Description, package: &str) -> Result<String> {
    description.services.validate()?;
    let synthesizer = synthesize::ContainerSynthesizer::new(&description.services, package);
    let file = synthesizer.synthesize()?;
    Ok(emit::render(&file))
}
