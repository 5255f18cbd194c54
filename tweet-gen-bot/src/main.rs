//! Process entry point: picks a model at random, generates one tweet from
//! its production artifact and publishes it.
//!
//! A missing production artifact is not fatal: the model is retrained from
//! its corpus and promoted. Every other configuration error aborts the run.

use std::path::Path;

use log::info;
use rand::Rng;

use tweet_gen_core::error::Error;
use tweet_gen_core::model::corpus_type::CorpusType;
use tweet_gen_core::model::markov_model::MarkovModel;

use crate::corpus::Corpus;
use crate::error::BotError;
use crate::twitter::{Credentials, TwitterClient};

mod corpus;
mod error;
mod twitter;

/// Per-model training and tweet formatting configuration.
struct TweetFormat {
	corpus_type: CorpusType,

	/// N-gram order used when the model has to be (re)trained.
	n: usize,

	/// Raw buffer length to generate; the published text is usually
	/// shorter once trimmed.
	seq_len: usize,

	introduction: &'static str,
	hashtags: &'static str,
}

/// The models the bot can post from, with their formatting.
const TWEET_FORMATTING: &[(&str, TweetFormat)] = &[
	(
		"taylor-swift",
		TweetFormat {
			corpus_type: CorpusType::Lyric,
			n: 3,
			seq_len: 180,
			introduction: "Taylor Swifts new lyrics:\n",
			hashtags: " #TaylorSwift",
		},
	),
	(
		"arthur-conan-doyle",
		TweetFormat {
			corpus_type: CorpusType::Book,
			n: 3,
			seq_len: 240,
			introduction: "From Arthur Conan Doyle: ",
			hashtags: " #SherlockHolmes",
		},
	),
	(
		"trump-tweets",
		TweetFormat {
			corpus_type: CorpusType::Tweet,
			n: 3,
			seq_len: 180,
			introduction: "Trump Tweeting - ",
			hashtags: " #Trump",
		},
	),
];

const MODELS_DIR: &str = "models/markov-models";
const CORPORA_DIR: &str = "data/raw/corpuses";

fn main() -> Result<(), BotError> {
	env_logger::init();
	info!("starting to generate tweet..");

	let index = rand::rng().random_range(0..TWEET_FORMATTING.len());
	let (model_name, format) = &TWEET_FORMATTING[index];

	let model = load_or_train(model_name, format)?;
	let tweet = model.generate(format.seq_len)?;
	info!("{}{}{}", format.introduction, tweet, format.hashtags);

	let bot = TwitterClient::new(Credentials::from_env()?);
	bot.authenticate()?;
	bot.publish(&format!("{}{}", format.introduction, tweet))?;

	info!("tweet successfully sent, shutting down..");
	Ok(())
}

/// Loads the production model, retraining it from its corpus when no
/// artifact has been promoted yet.
///
/// Several candidate artifacts stay fatal: the production choice is
/// ambiguous and must be resolved by hand.
fn load_or_train(model_name: &str, format: &TweetFormat) -> Result<MarkovModel, BotError> {
	let models_dir = Path::new(MODELS_DIR);

	match MarkovModel::load_production(models_dir, model_name) {
		Ok(model) => Ok(model),
		Err(Error::AmbiguousProduction { count: 0, .. }) => {
			info!("no production model for '{model_name}', training from corpus");
			let corpus = Corpus::load(Path::new(CORPORA_DIR), model_name)?;
			let model = MarkovModel::fit(
				corpus.name(),
				corpus.raw_text(),
				format.n,
				format.corpus_type,
				true,
				true,
				models_dir,
			)?;
			Ok(model)
		}
		Err(e) => Err(e.into()),
	}
}
