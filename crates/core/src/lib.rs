//! Core library for fagen
//!
//! This crate implements the **Functional Core** of the fagen generator,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The fagen project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`fagen_core`** (this crate): Pure transformation functions over icon metadata
//! - **`fagen`**: Network and filesystem I/O plus orchestration (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! - **Pure functions**: Same input always produces the same output
//! - **Deterministic**: Generated files are byte-for-byte reproducible
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! The one exception is [`icons::parse_extracted`], which walks an already
//! extracted release archive on disk.
//!
//! # Module Organization
//!
//! - [`icons`]: Icon records, GraphQL and `icons.json` wire formats, version parsing
//! - [`reconcile`]: Cross-version reconciliation into common and per-version groups
//! - [`typst`]: Rendering of the icon maps, bindings and gallery as Typst source
//! - [`error`]: Error taxonomy for malformed or missing metadata
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use fagen_core::icons::major_version;
//! use fagen_core::reconcile::reconcile;
//! use fagen_core::typst::{emit_gallery, emit_library};
//!
//! let sets = vec![(major_version("6.7.2")?, icons_6), (major_version("7.0.0")?, icons_7)];
//! let table = reconcile(&sets);
//!
//! let library = emit_library(&table, &versions);
//! let gallery = emit_gallery(&table);
//! ```

pub mod error;
pub mod icons;
pub mod reconcile;
pub mod typst;

pub use error::MetadataError;
