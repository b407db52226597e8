//! Core domain logic for the Biblia data tools.
//!
//! This crate holds the character list builder, seed loading, dataset I/O and
//! the raw dump transform, and ties them into end-to-end file workflows
//! (e.g., [`pipeline::generate_characters`]).

pub mod characters;
pub mod dataset;
pub mod pipeline;
pub mod seeds;
pub mod transform;
