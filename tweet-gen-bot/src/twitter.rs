use std::env;

use log::{error, info};
use reqwest::blocking::Client;

use crate::error::BotError;

/// Environment variable holding the Twitter API user access token.
const ACCESS_TOKEN_VAR: &str = "TWITTER_ACCESS_TOKEN";

const DEFAULT_API_BASE: &str = "https://api.twitter.com";

/// Credentials for the Twitter API, resolved by the process entry point
/// and passed in at client construction.
pub struct Credentials {
	access_token: String,
}

impl Credentials {
	/// Reads the access token from the environment.
	///
	/// # Errors
	/// `MissingCredential` if the variable is unset.
	pub fn from_env() -> Result<Self, BotError> {
		Self::from_lookup(env::var(ACCESS_TOKEN_VAR).ok())
	}

	fn from_lookup(access_token: Option<String>) -> Result<Self, BotError> {
		match access_token {
			Some(token) if !token.is_empty() => Ok(Self { access_token: token }),
			_ => Err(BotError::MissingCredential("TWITTER_ACCESS_TOKEN")),
		}
	}
}

/// A Twitter client that posts generated text.
///
/// # Responsibilities
/// - Verify the configured credentials before any posting happens
/// - Publish one tweet per invocation, propagating rejection to the caller
#[derive(Debug)]
pub struct TwitterClient {
	http: Client,
	api_base: String,
	access_token: String,
}

impl TwitterClient {
	pub fn new(credentials: Credentials) -> Self {
		Self::with_api_base(credentials, DEFAULT_API_BASE)
	}

	/// Creates a client against a non-default API base URL.
	pub fn with_api_base(credentials: Credentials, api_base: &str) -> Self {
		Self {
			http: Client::new(),
			api_base: api_base.trim_end_matches('/').to_owned(),
			access_token: credentials.access_token,
		}
	}

	/// Verifies the credentials against the API.
	///
	/// # Errors
	/// `AuthenticationFailed` on any non-success status. Fatal: the bot
	/// never posts with unverified credentials.
	pub fn authenticate(&self) -> Result<(), BotError> {
		let response = self
			.http
			.get(format!("{}/2/users/me", self.api_base))
			.bearer_auth(&self.access_token)
			.send()?;

		if !response.status().is_success() {
			error!("credential verification rejected: {}", response.status());
			return Err(BotError::AuthenticationFailed(response.status()));
		}

		info!("twitter credentials verified");
		Ok(())
	}

	/// Publishes `text` as a tweet.
	///
	/// # Errors
	/// `PublishFailed` on any non-success status; failures propagate, they
	/// are never swallowed.
	pub fn publish(&self, text: &str) -> Result<bool, BotError> {
		let response = self
			.http
			.post(format!("{}/2/tweets", self.api_base))
			.bearer_auth(&self.access_token)
			.json(&serde_json::json!({ "text": text }))
			.send()?;

		if !response.status().is_success() {
			error!("tweet rejected: {}", response.status());
			return Err(BotError::PublishFailed(response.status()));
		}

		info!("tweet sent");
		Ok(true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn present_token_builds_credentials() {
		let credentials = Credentials::from_lookup(Some("token".to_owned())).unwrap();
		assert_eq!(credentials.access_token, "token");
	}

	#[test]
	fn absent_or_empty_token_is_a_missing_credential() {
		assert!(matches!(
			Credentials::from_lookup(None),
			Err(BotError::MissingCredential("TWITTER_ACCESS_TOKEN"))
		));
		assert!(matches!(
			Credentials::from_lookup(Some(String::new())),
			Err(BotError::MissingCredential(_))
		));
	}

	#[test]
	fn api_base_is_normalized() {
		let credentials = Credentials::from_lookup(Some("token".to_owned())).unwrap();
		let client = TwitterClient::with_api_base(credentials, "http://localhost:9/");
		assert_eq!(client.api_base, "http://localhost:9");
	}
}
