//! Purpose: JSON decoding boundary shared by the binder, bench harness, and CLI.
//! Exports: `parse` module with the `Decoder` seam and decode-failure helpers.
//! Role: Single seam for parser implementations so callsites avoid ad hoc decode logic.
//! Invariants: Generic trees are `serde_json::Value` regardless of the decoder used.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub mod parse;

pub use parse::{Decoder, SerdeJsonDecoder, SimdJsonDecoder, default_decoders};
