use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::encoder::LINE_BREAK;

/// The family of text a model is trained on.
///
/// The family governs which separator delimits start prompts, how long a
/// prompt segment has to be to qualify, and how raw generated text is
/// trimmed before validation.
///
/// # Invariants
/// - Parsing accepts exactly `book`, `lyric` and `tweet`; anything else is
///   an `InvalidCorpusType` error, raised before any training happens.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum CorpusType {
	Book,
	Lyric,
	Tweet,
}

impl CorpusType {
	/// Separator used to cut the encoded corpus into candidate prompts.
	///
	/// Books split on sentence terminators; lyrics and tweets carry few
	/// periods, so they split on the encoded line break instead.
	pub(crate) fn prompt_separator(self) -> char {
		match self {
			CorpusType::Book => '.',
			CorpusType::Lyric | CorpusType::Tweet => LINE_BREAK,
		}
	}

	/// Minimum segment length for a candidate prompt to qualify.
	///
	/// Rejects intros, chapter titles and other short fragments.
	pub(crate) fn min_prompt_len(self) -> usize {
		match self {
			CorpusType::Book => 100,
			CorpusType::Lyric | CorpusType::Tweet => 30,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			CorpusType::Book => "book",
			CorpusType::Lyric => "lyric",
			CorpusType::Tweet => "tweet",
		}
	}
}

impl FromStr for CorpusType {
	type Err = Error;

	fn from_str(name: &str) -> Result<Self, Self::Err> {
		match name {
			"book" => Ok(CorpusType::Book),
			"lyric" => Ok(CorpusType::Lyric),
			"tweet" => Ok(CorpusType::Tweet),
			other => Err(Error::InvalidCorpusType(other.to_owned())),
		}
	}
}

impl fmt::Display for CorpusType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
