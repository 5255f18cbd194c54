use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, info};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::io;
use crate::model::corpus_type::CorpusType;
use crate::model::encoder;
use crate::model::trimmer;
use crate::model::validator;

/// How many start prompts to collect from a corpus at most.
///
/// The more prompt options, the more varied the generated text.
const MAX_START_PROMPTS: usize = 100;

/// How many generation attempts to make before giving up on a model whose
/// output keeps failing validation.
const MAX_GENERATION_ATTEMPTS: usize = 50;

/// Keys observed this many times or fewer are reported as sparse.
const SPARSE_KEY_THRESHOLD: usize = 3;

/// A character-level n-gram Markov model.
///
/// Stores, for every n-character window observed in the encoded corpus,
/// the conditional probability of each following character, plus a pool
/// of corpus segments whose prefixes seed generation.
///
/// # Responsibilities
/// - Train the transition-probability table from a raw corpus
/// - Generate validated tweet-length text by walking the table
/// - Persist and reload trained artifacts
///
/// # Invariants
/// - Every key in `transition_table` is exactly `n` characters long
/// - Every distribution is non-empty and sums to 1.0 (within float tolerance)
/// - Every start prompt qualified against the corpus family's minimum length
/// - The model is read-only once trained or loaded
#[derive(Serialize, Deserialize, Debug)]
pub struct MarkovModel {
	model_name: String,

	/// The order of the model (window length in characters).
	n: usize,

	/// Corpus family, governs prompt selection and output trimming.
	corpus_type: CorpusType,

	/// Conditional next-character probabilities per n-gram key.
	/// Example: { "th" => { 'e' => 0.8, 'a' => 0.2 } }
	transition_table: HashMap<String, HashMap<char, f64>>,

	/// Qualified corpus segments, in order of appearance. The first `n`
	/// characters of a randomly chosen entry seed generation.
	start_prompts: Vec<String>,
}

impl MarkovModel {
	/// Trains a model on a raw corpus, or adopts a previously saved one.
	///
	/// # Parameters
	/// - `model_name`: Identifier used for artifact naming.
	/// - `corpus`: Full raw corpus text.
	/// - `n`: N-gram order (window length), must be >= 1.
	/// - `corpus_type`: Corpus family.
	/// - `retrain`: When false, a saved artifact for `(model_name, n)` is
	///   loaded instead of training if one exists.
	/// - `save`: Whether to persist the trained model under `models_dir`.
	///
	/// # Behavior
	/// - The corpus is made circular by appending its own first `n`
	///   characters, so every position has a defined successor and
	///   generation never runs off the end of known data.
	/// - Keys observed `<= 3` times are reported in the debug log as a
	///   sparsity percentage; they are never filtered out.
	///
	/// # Errors
	/// - Propagates persistence errors from the load/save paths. A missing
	///   artifact with `retrain == false` falls through to training.
	pub fn fit(
		model_name: &str,
		corpus: &str,
		n: usize,
		corpus_type: CorpusType,
		retrain: bool,
		save: bool,
		models_dir: &Path,
	) -> Result<Self, Error> {
		if !retrain {
			match Self::load(models_dir, model_name, n) {
				Ok(model) => {
					info!("adopted saved {n}-gram model for '{model_name}', skipping training");
					return Ok(model);
				}
				Err(Error::ModelNotFound { .. }) => (),
				Err(e) => return Err(e),
			}
		}

		// Make the text circular so the chain never gets stuck at the end
		let prefix: String = corpus.chars().take(n).collect();
		let circular = format!("{corpus}{prefix}");

		let encoded = encoder::encode(&circular);

		let start_prompts = Self::generate_start_prompts(&encoded, corpus_type);

		// Count character occurrences following every n-gram instance
		let chars: Vec<char> = encoded.chars().collect();
		let mut counts: HashMap<String, HashMap<char, usize>> = HashMap::new();
		if chars.len() > n {
			for window in chars.windows(n + 1) {
				let key: String = window[..n].iter().collect();
				*counts.entry(key).or_default().entry(window[n]).or_insert(0) += 1;
			}
		}

		// Normalize counts into conditional probabilities
		let mut sparse_keys = 0usize;
		let mut transition_table = HashMap::with_capacity(counts.len());
		for (key, next_counts) in counts {
			let total: usize = next_counts.values().sum();
			if total <= SPARSE_KEY_THRESHOLD {
				sparse_keys += 1;
			}
			let distribution = next_counts
				.into_iter()
				.map(|(next_char, occurrences)| (next_char, occurrences as f64 / total as f64))
				.collect();
			transition_table.insert(key, distribution);
		}

		if !transition_table.is_empty() {
			debug!(
				"'{model_name}': {:.1}% of {} n-gram keys are sparse (observed <= {SPARSE_KEY_THRESHOLD} times)",
				100.0 * sparse_keys as f64 / transition_table.len() as f64,
				transition_table.len(),
			);
		}

		let model = Self {
			model_name: model_name.to_owned(),
			n,
			corpus_type,
			transition_table,
			start_prompts,
		};

		if save {
			model.save(models_dir)?;
		}

		Ok(model)
	}

	/// Collects segments of the encoded corpus whose prefixes will seed
	/// generation.
	///
	/// Segments are scanned in order of appearance and kept when they reach
	/// the family's minimum length, until 100 are collected or the corpus
	/// is exhausted. Short corpora legitimately yield fewer than 100.
	fn generate_start_prompts(encoded: &str, corpus_type: CorpusType) -> Vec<String> {
		encoded
			.split(corpus_type.prompt_separator())
			.filter(|segment| segment.chars().count() >= corpus_type.min_prompt_len())
			.take(MAX_START_PROMPTS)
			.map(str::to_owned)
			.collect()
	}

	/// Generates one validated tweet-length text.
	///
	/// # Parameters
	/// - `seq_len`: Raw buffer length to generate before trimming; the
	///   returned text is usually shorter once incomplete structure is
	///   dropped.
	///
	/// # Behavior
	/// - Seeds from the first `n` characters of a randomly chosen start
	///   prompt, then repeatedly samples the next character from the
	///   distribution of the last `n` characters. Unknown windows fall
	///   back to a single space so generation stays alive.
	/// - Candidates that fail validation are discarded and regenerated,
	///   up to a fixed attempt cap.
	///
	/// # Errors
	/// - `NoStartPrompts` if the model's seed pool is empty.
	/// - `RetriesExhausted` if no attempt produces a valid candidate.
	pub fn generate(&self, seq_len: usize) -> Result<String, Error> {
		let mut rng = rand::rng();

		for _ in 0..MAX_GENERATION_ATTEMPTS {
			let raw = self.generate_raw(seq_len, &mut rng)?;
			let trimmed = trimmer::trim(&raw, self.corpus_type);
			if validator::is_valid(&trimmed) {
				return Ok(encoder::decode(&trimmed));
			}
			debug!("'{}': discarded invalid candidate, regenerating", self.model_name);
		}

		Err(Error::RetriesExhausted(MAX_GENERATION_ATTEMPTS))
	}

	/// Walks the transition table until the buffer reaches `seq_len`
	/// characters.
	fn generate_raw<R: Rng>(&self, seq_len: usize, rng: &mut R) -> Result<String, Error> {
		let prompt = self.start_prompts.choose(rng).ok_or(Error::NoStartPrompts)?;
		let mut buffer: Vec<char> = prompt.chars().take(self.n).collect();

		while buffer.len() < seq_len {
			let key: String = buffer[buffer.len().saturating_sub(self.n)..].iter().collect();
			let next_char = match self.transition_table.get(&key) {
				Some(distribution) => Self::sample(distribution, rng),
				// Unknown window (corpus boundary); keep generation alive
				None => ' ',
			};
			buffer.push(next_char);
		}

		Ok(buffer.into_iter().collect())
	}

	/// Samples the next character from a probability distribution.
	///
	/// Walks the distribution subtracting weights from a uniform draw.
	/// The trailing fallback covers floating-point underflow at the tail;
	/// it should not otherwise be reached since weights sum to 1.0.
	fn sample<R: Rng>(distribution: &HashMap<char, f64>, rng: &mut R) -> char {
		let mut draw: f64 = rng.random();

		let mut fallback = ' ';
		for (&next_char, &probability) in distribution {
			if draw < probability {
				return next_char;
			}
			draw -= probability;
			fallback = next_char;
		}

		fallback
	}

	/// Persists the model under `{models_dir}/{model_name}/`.
	///
	/// The artifact carries exactly the model's fields, postcard-encoded.
	/// The write is blocking with no partial-write protection; artifacts
	/// are regenerable from the corpus.
	pub fn save(&self, models_dir: &Path) -> Result<(), Error> {
		let dir = models_dir.join(&self.model_name);
		fs::create_dir_all(&dir)?;

		let bytes = postcard::to_stdvec(self)?;
		let path = dir.join(Self::artifact_name(&self.model_name, self.n));
		fs::write(&path, bytes)?;

		info!("saved model artifact {}", path.display());
		Ok(())
	}

	/// Loads a saved model for a `(model_name, n)` pair.
	///
	/// # Errors
	/// `ModelNotFound` if no artifact was saved under that name and order.
	pub fn load(models_dir: &Path, model_name: &str, n: usize) -> Result<Self, Error> {
		let path = models_dir
			.join(model_name)
			.join(Self::artifact_name(model_name, n));

		if !path.is_file() {
			return Err(Error::ModelNotFound { model_name: model_name.to_owned(), n });
		}

		let bytes = fs::read(path)?;
		Ok(postcard::from_bytes(&bytes)?)
	}

	/// Loads the production model for `model_name`.
	///
	/// The model directory must contain exactly one artifact; zero or
	/// several make the production choice ambiguous and fail fast.
	pub fn load_production(models_dir: &Path, model_name: &str) -> Result<Self, Error> {
		let dir = models_dir.join(model_name);
		let artifacts = io::list_files(&dir, "bin")?;

		if artifacts.len() != 1 {
			return Err(Error::AmbiguousProduction { dir, count: artifacts.len() });
		}

		let bytes = fs::read(dir.join(&artifacts[0]))?;
		let model: Self = postcard::from_bytes(&bytes)?;
		info!("loaded production model '{}' ({}-grams)", model.model_name, model.n);
		Ok(model)
	}

	fn artifact_name(model_name: &str, n: usize) -> String {
		format!("{model_name}_{n}-ngrams.bin")
	}

	pub fn model_name(&self) -> &str {
		&self.model_name
	}

	pub fn n(&self) -> usize {
		self.n
	}

	pub fn corpus_type(&self) -> CorpusType {
		self.corpus_type
	}

	pub fn transition_table(&self) -> &HashMap<String, HashMap<char, f64>> {
		&self.transition_table
	}

	pub fn start_prompts(&self) -> &[String] {
		&self.start_prompts
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	fn temp_models_dir(tag: &str) -> PathBuf {
		let dir = std::env::temp_dir().join(format!("tweet-gen-{tag}-{}", std::process::id()));
		let _ = fs::remove_dir_all(&dir);
		fs::create_dir_all(&dir).unwrap();
		dir
	}

	fn train(corpus: &str, n: usize, corpus_type: CorpusType) -> MarkovModel {
		MarkovModel::fit("test", corpus, n, corpus_type, true, false, Path::new("unused")).unwrap()
	}

	/// A line whose characters are all distinct, so every trigram of the
	/// encoded corpus has exactly one successor and generation is
	/// deterministic.
	const DISTINCT_LINE: &str = "abcdefghijklmnopqrstuvwxyz0123456789+-*=";

	#[test]
	fn transition_counts_on_circularized_corpus() {
		let model = train("ab.ab.ab.", 2, CorpusType::Book);

		// Circularized and encoded text is "ab.ab.ab.ab": three windows
		// each for "ab", "b." and ".a", all with a single successor.
		let table = model.transition_table();
		assert_eq!(table.len(), 3);
		assert_eq!(table["ab"], HashMap::from([('.', 1.0)]));
		assert_eq!(table["b."], HashMap::from([('a', 1.0)]));
		assert_eq!(table[".a"], HashMap::from([('b', 1.0)]));
	}

	#[test]
	fn distributions_are_normalized_and_keys_have_length_n() {
		let corpus = "It was a dark and stormy night. The rain fell in torrents. \
			The wind howled across the moor and the rain kept falling. \
			It was, after all, a night like any other night on the moor.";
		let model = train(corpus, 2, CorpusType::Book);

		assert!(!model.transition_table().is_empty());
		for (key, distribution) in model.transition_table() {
			assert_eq!(key.chars().count(), 2);
			assert!(!distribution.is_empty());
			let sum: f64 = distribution.values().sum();
			assert!((sum - 1.0).abs() < 1e-9, "distribution for {key:?} sums to {sum}");
			assert!(distribution.values().all(|p| *p > 0.0 && *p <= 1.0));
		}
	}

	#[test]
	fn empty_corpus_trains_to_a_degenerate_model() {
		let model = train("", 2, CorpusType::Tweet);
		assert!(model.transition_table().is_empty());
		assert!(model.start_prompts().is_empty());
		assert!(matches!(model.generate(80), Err(Error::NoStartPrompts)));
	}

	#[test]
	fn short_book_segments_leave_the_prompt_pool_empty() {
		// Book prompts require 100 characters per sentence; "ab" never
		// qualifies, so generation has nothing to seed from.
		let model = train("ab.ab.ab.", 2, CorpusType::Book);
		assert!(model.start_prompts().is_empty());
		assert!(matches!(model.generate(80), Err(Error::NoStartPrompts)));
	}

	#[test]
	fn prompt_pool_smaller_than_the_cap_is_returned_as_is() {
		// Five qualifying lyric lines (>= 30 chars), plus short ones that
		// must be skipped without padding or erroring.
		let long_lines: Vec<String> =
			(0..5).map(|i| format!("{i}{}", " la le lu li lo".repeat(2))).collect();
		let corpus = format!("ooh\n{}\nyeah\n", long_lines.join("\nnah\n"));

		let model = train(&corpus, 2, CorpusType::Lyric);
		assert_eq!(model.start_prompts().to_vec(), long_lines);
	}

	#[test]
	fn prompt_at_exactly_the_minimum_length_qualifies() {
		let line = "x".repeat(30);
		let corpus = format!("{line}\nshort\n");
		let model = train(&corpus, 2, CorpusType::Tweet);
		assert_eq!(model.start_prompts().to_vec(), vec![line]);
	}

	#[test]
	fn generates_valid_text_from_a_deterministic_chain() {
		let corpus = format!("{DISTINCT_LINE}\n").repeat(30);
		let model = train(&corpus, 3, CorpusType::Tweet);

		let tweet = model.generate(120).unwrap();

		// Two complete lines survive trimming, each capitalized and
		// terminated; the partial third line is dropped.
		let expected_line = {
			let mut line = DISTINCT_LINE.to_owned();
			line.replace_range(0..1, "A");
			line
		};
		assert_eq!(tweet, format!("{expected_line}. {expected_line}. "));
	}

	#[test]
	fn generated_text_is_never_fragmented_or_short() {
		let corpus = format!("{DISTINCT_LINE}\n").repeat(30);
		let model = train(&corpus, 3, CorpusType::Tweet);

		for _ in 0..10 {
			let tweet = model.generate(120).unwrap();
			assert!(tweet.matches('\n').count() < 3);
			assert!(tweet.chars().count() >= 60);
		}
	}

	#[test]
	fn save_then_load_reproduces_the_model() {
		let models_dir = temp_models_dir("roundtrip");
		let corpus = format!("{DISTINCT_LINE}\n").repeat(10);

		let trained =
			MarkovModel::fit("roundtrip", &corpus, 3, CorpusType::Tweet, true, true, &models_dir)
				.unwrap();
		let loaded = MarkovModel::load(&models_dir, "roundtrip", 3).unwrap();

		assert_eq!(loaded.model_name(), trained.model_name());
		assert_eq!(loaded.n(), trained.n());
		assert_eq!(loaded.corpus_type(), trained.corpus_type());
		assert_eq!(loaded.transition_table(), trained.transition_table());
		assert_eq!(loaded.start_prompts(), trained.start_prompts());
	}

	#[test]
	fn fit_without_retrain_adopts_the_saved_artifact() {
		let models_dir = temp_models_dir("adopt");
		let first = format!("{DISTINCT_LINE}\n").repeat(10);
		MarkovModel::fit("adopt", &first, 3, CorpusType::Tweet, true, true, &models_dir).unwrap();

		// A different corpus must be ignored: the saved artifact wins.
		let second = "something else entirely\n".repeat(10);
		let adopted =
			MarkovModel::fit("adopt", &second, 3, CorpusType::Tweet, false, false, &models_dir)
				.unwrap();
		let saved = MarkovModel::load(&models_dir, "adopt", 3).unwrap();
		assert_eq!(adopted.transition_table(), saved.transition_table());
	}

	#[test]
	fn loading_a_missing_model_reports_not_found() {
		let models_dir = temp_models_dir("missing");
		let err = MarkovModel::load(&models_dir, "nowhere", 2).unwrap_err();
		assert!(matches!(err, Error::ModelNotFound { model_name, n: 2 } if model_name == "nowhere"));
	}

	#[test]
	fn production_lookup_requires_exactly_one_artifact() {
		let models_dir = temp_models_dir("production");
		let corpus = format!("{DISTINCT_LINE}\n").repeat(10);

		// Zero artifacts: ambiguous.
		let err = MarkovModel::load_production(&models_dir, "prod").unwrap_err();
		assert!(matches!(err, Error::AmbiguousProduction { count: 0, .. }));

		// Exactly one: loads.
		MarkovModel::fit("prod", &corpus, 3, CorpusType::Tweet, true, true, &models_dir).unwrap();
		let model = MarkovModel::load_production(&models_dir, "prod").unwrap();
		assert_eq!(model.n(), 3);

		// Two artifacts with different orders: ambiguous again.
		MarkovModel::fit("prod", &corpus, 4, CorpusType::Tweet, true, true, &models_dir).unwrap();
		let err = MarkovModel::load_production(&models_dir, "prod").unwrap_err();
		assert!(matches!(err, Error::AmbiguousProduction { count: 2, .. }));
	}
}
