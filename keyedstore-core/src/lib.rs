//! Core types for the keyedstore project.
//!
//! This crate defines everything the mutation engine is parameterized by:
//!
//! - **Keys** ([`key`]) - Key expressions, key values and the [`key::KeyInfo`] abstraction
//! - **Value semantics** ([`value`]) - By-value equality and canonical serialization of BSON values
//! - **Errors** ([`error`]) - Error kinds with stable codes
//! - **Collaborators** ([`merge`], [`id`]) - Patch merging and identifier generation
//! - **Configuration** ([`options`]) - Output-shape options for single operations
//! - **Batches** ([`batch`]) - Batch operation descriptions
//! - **Outcomes** ([`outcome`]) - Success payloads of single operations
//!
//! Records are plain [`bson::Document`]s; the engine itself lives in
//! `keyedstore-memory`.

#[allow(unused_extern_crates)]
extern crate self as keyedstore_core;

pub mod batch;
pub mod error;
pub mod id;
pub mod key;
pub mod merge;
pub mod options;
pub mod outcome;
pub mod value;
