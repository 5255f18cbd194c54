use thiserror::Error;

/// Errors raised by the bot's I/O collaborators.
///
/// Configuration and authentication failures are fatal: they propagate to
/// `main` and abort the run. Nothing here is retried.
#[derive(Debug, Error)]
pub enum BotError {
	#[error("no corpus named '{0}' under the corpora directory")]
	CorpusNotFound(String),

	#[error("missing credential: environment variable {0} is not set")]
	MissingCredential(&'static str),

	#[error("twitter credential verification failed with status {0}")]
	AuthenticationFailed(reqwest::StatusCode),

	#[error("tweet rejected with status {0}")]
	PublishFailed(reqwest::StatusCode),

	#[error(transparent)]
	Http(#[from] reqwest::Error),

	#[error(transparent)]
	Model(#[from] tweet_gen_core::error::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}
