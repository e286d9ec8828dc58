//! schemagen engine - artifact generation from a schema model
//!
//! This crate implements:
//! - Document emission (config.xml)
//! - Meta descriptor extraction (meta.json)

pub mod emitter;
pub mod meta;

pub use emitter::{DocumentEmitter, EmitOptions};
pub use meta::{ClassMeta, MetaExtractor, MetaParameter};
