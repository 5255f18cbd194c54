use std::fs;
use std::path::Path;

use log::info;

use crate::error::BotError;

/// A named raw text corpus loaded from disk.
///
/// Corpora live one per directory: `{corpora_dir}/{corpus_name}/` holds a
/// single `.txt` file with the full raw text. The text is immutable once
/// loaded and is handed to the trainer as-is.
#[derive(Debug)]
pub struct Corpus {
	name: String,
	raw_text: String,
}

impl Corpus {
	/// Loads the corpus named `corpus_name` from `corpora_dir`.
	///
	/// # Errors
	/// `CorpusNotFound` if the corpus directory does not exist or holds
	/// no `.txt` file.
	pub fn load(corpora_dir: &Path, corpus_name: &str) -> Result<Self, BotError> {
		let dir = corpora_dir.join(corpus_name);
		if !dir.is_dir() {
			return Err(BotError::CorpusNotFound(corpus_name.to_owned()));
		}

		for entry in fs::read_dir(dir)? {
			let path = entry?.path();
			if path.is_file() && path.extension() == Some(std::ffi::OsStr::new("txt")) {
				let raw_text = fs::read_to_string(&path)?;
				info!("loaded corpus '{corpus_name}' ({} bytes)", raw_text.len());
				return Ok(Self { name: corpus_name.to_owned(), raw_text });
			}
		}

		Err(BotError::CorpusNotFound(corpus_name.to_owned()))
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn raw_text(&self) -> &str {
		&self.raw_text
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	use tweet_gen_core::model::corpus_type::CorpusType;
	use tweet_gen_core::model::markov_model::MarkovModel;

	fn temp_dir(tag: &str) -> PathBuf {
		let dir = std::env::temp_dir().join(format!("tweet-gen-bot-{tag}-{}", std::process::id()));
		let _ = fs::remove_dir_all(&dir);
		fs::create_dir_all(&dir).unwrap();
		dir
	}

	#[test]
	fn loads_the_txt_file_of_a_corpus_directory() {
		let corpora_dir = temp_dir("corpus-load");
		fs::create_dir(corpora_dir.join("demo")).unwrap();
		fs::write(corpora_dir.join("demo/demo.txt"), "some corpus text\n").unwrap();

		let corpus = Corpus::load(&corpora_dir, "demo").unwrap();
		assert_eq!(corpus.name(), "demo");
		assert_eq!(corpus.raw_text(), "some corpus text\n");
	}

	#[test]
	fn missing_corpus_reports_not_found() {
		let corpora_dir = temp_dir("corpus-missing");
		let err = Corpus::load(&corpora_dir, "does-not-exist").unwrap_err();
		assert!(matches!(err, BotError::CorpusNotFound(name) if name == "does-not-exist"));
	}

	#[test]
	fn directory_without_txt_reports_not_found() {
		let corpora_dir = temp_dir("corpus-no-txt");
		fs::create_dir(corpora_dir.join("empty")).unwrap();
		fs::write(corpora_dir.join("empty/notes.md"), "not a corpus").unwrap();

		let err = Corpus::load(&corpora_dir, "empty").unwrap_err();
		assert!(matches!(err, BotError::CorpusNotFound(name) if name == "empty"));
	}

	/// End-to-end training flow: corpus from disk, trained and promoted to
	/// production, then generated from.
	#[test]
	fn corpus_trains_a_production_model() {
		let corpora_dir = temp_dir("corpus-train");
		let models_dir = temp_dir("corpus-train-models");
		fs::create_dir(corpora_dir.join("song")).unwrap();
		let line = "abcdefghijklmnopqrstuvwxyz0123456789+-*=";
		fs::write(corpora_dir.join("song/song.txt"), format!("{line}\n").repeat(30)).unwrap();

		let corpus = Corpus::load(&corpora_dir, "song").unwrap();
		MarkovModel::fit(corpus.name(), corpus.raw_text(), 3, CorpusType::Lyric, true, true, &models_dir)
			.unwrap();

		let model = MarkovModel::load_production(&models_dir, "song").unwrap();
		let text = model.generate(120).unwrap();
		assert!(text.chars().count() >= 60);
	}
}
