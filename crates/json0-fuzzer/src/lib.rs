//! Randomized property checks for the json0 engine.
//!
//! [`Fuzzer`] is a seeded PRNG, [`generator`] builds random documents and
//! operations that are valid against them, and [`check`] verifies that a
//! pair of concurrent operations converges, inverts and composes.

pub mod check;
pub mod fuzzer;
pub mod generator;

pub use check::{check_pair, run, Failure};
pub use fuzzer::Fuzzer;
pub use generator::{random_component, random_document, random_op, random_value, Options};
