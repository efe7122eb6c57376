//! Purpose: Shared library crate behind the `whouses` CLI and its tests.
//! Exports: `core` (schema, model, bind, encode, errors), `json`, `synth`, `bench`.
//! Role: Strict who-uses-json-v1 binding plus the throughput harness around it.
//! Invariants: Binding is all-or-nothing; no partial documents escape on failure.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod bench;
pub mod core;
pub mod json;
pub mod synth;
