//! Character-level Markov chain text generation library.
//!
//! This crate provides everything needed to turn a raw text corpus into
//! short synthetic passages:
//! - Corpus encoding/decoding into a normalized symbol alphabet
//! - N-gram transition-probability training
//! - Probabilistic generation with corpus-aware trimming and validation
//! - Model persistence (save/load, production artifact lookup)
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Core Markov model, encoding and generation logic.
///
/// This module exposes the high-level model interface while keeping
/// internal cleanup stages private.
pub mod model;

/// Error taxonomy shared by training, generation and persistence.
pub mod error;

/// I/O utilities (artifact listing, path helpers).
///
/// Not exposed
pub(crate) mod io;
