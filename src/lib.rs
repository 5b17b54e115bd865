//! Derivation and reconciliation core of a biomedical specimen metadata
//! catalog: every biospecimen write resolves a `Sample` (grouping
//! biologically equivalent biospecimens by natural key) and a `Container`
//! (the biospecimen's physical instance), and keeps the sample's aggregate
//! volume consistent. Consumed in-process by an external CRUD layer.

pub mod biospecimens;
pub mod common;
pub mod config;
pub mod containers;
pub mod participants;
pub mod samples;

#[cfg(test)]
mod test_helpers;
