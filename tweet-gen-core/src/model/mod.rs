//! Top-level module for the Markov tweet generation system.
//!
//! This crate provides a character-level n-gram text generator, including:
//! - Corpus normalization (`encoder`)
//! - Corpus family selection (`CorpusType`)
//! - The trained transition-probability model (`MarkovModel`)
//! - Corpus-aware output cleanup (`trimmer`) and acceptance (`validator`)

/// The trained n-gram transition model.
///
/// Handles corpus training, probabilistic character generation,
/// and artifact persistence.
pub mod markov_model;

/// The corpus families the model can be trained on.
///
/// Each family carries its own prompt-selection and trimming rules.
pub mod corpus_type;

/// Corpus normalization into the model's symbol alphabet.
///
/// The encoding is deliberately lossy: only the line-break substitution
/// round-trips through `decode`.
pub mod encoder;

/// Internal cleanup of raw generated text.
///
/// Removes trailing incomplete structure per corpus family.
/// This module is not exposed publicly.
mod trimmer;

/// Internal accept/reject gate applied to trimmed candidates.
///
/// This module is not exposed publicly.
mod validator;
