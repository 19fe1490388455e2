//! Game variants.
//!
//! Each variant bundles its substitution keys, example transcripts, domain
//! literals and a `get_config` entry point producing a ready
//! [`Configuration`](crate::assembler::Configuration).

pub mod ransomware;

pub use ransomware::RansomwareScenario;
