use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while training, generating or persisting a Markov model.
///
/// # Variants
/// - `ModelNotFound`: no saved artifact exists for a `(model_name, n)` pair.
/// - `InvalidCorpusType`: a corpus type name outside `book`/`lyric`/`tweet`.
/// - `AmbiguousProduction`: the production lookup expects exactly one
///   artifact in the model directory and found zero or several.
/// - `NoStartPrompts`: the model has an empty seed pool, generation cannot
///   be started (typically an empty or too-short corpus).
/// - `RetriesExhausted`: every generation attempt produced text that failed
///   validation.
#[derive(Debug, Error)]
pub enum Error {
	#[error("no saved model named '{model_name}' with {n}-grams")]
	ModelNotFound { model_name: String, n: usize },

	#[error("unsupported corpus type '{0}', expected one of: book, lyric, tweet")]
	InvalidCorpusType(String),

	#[error("expected exactly one production artifact in {}, found {count}", .dir.display())]
	AmbiguousProduction { dir: PathBuf, count: usize },

	#[error("model has no start prompts to seed generation")]
	NoStartPrompts,

	#[error("no valid text produced after {0} attempts")]
	RetriesExhausted(usize),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error("model serialization failed: {0}")]
	Serialization(#[from] postcard::Error),
}
