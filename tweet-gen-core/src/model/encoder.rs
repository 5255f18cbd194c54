//! Corpus normalization into the model's symbol alphabet.
//!
//! Encoding is pure and deterministic. It is also deliberately lossy:
//! lower-casing and whitespace collapsing are permanent, only the
//! line-break substitution is reversed by [`decode`]. Generated text keeps
//! the corpus styling without the model having to learn case variants.

/// Reserved sentinel standing in for a line break in encoded text.
///
/// Must not otherwise occur in normal corpus text.
pub const LINE_BREAK: char = '@';

/// Normalizes raw corpus text into the symbol alphabet used for n-gram
/// counting.
///
/// # Behavior
/// - Lower-cases all characters.
/// - Substitutes every line break with the [`LINE_BREAK`] sentinel.
/// - Strips the doubled-straight-quote scrape artifact (`""` -> `"`) and
///   the HTML entity artifact (`&amp` -> `&`).
/// - Collapses every whitespace run into a single space via a
///   split/rejoin on whitespace.
pub fn encode(text: &str) -> String {
	let substituted = text
		.to_lowercase()
		.replace('\n', "@")
		.replace("\"\"", "\"")
		.replace("&amp", "&");

	substituted.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Restores line breaks in generated text.
///
/// Only the [`LINE_BREAK`] substitution is inverted; case and spacing
/// normalization are not recoverable.
pub fn decode(text: &str) -> String {
	text.replace(LINE_BREAK, "\n")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lowercases_and_collapses_whitespace() {
		assert_eq!(encode("Hello   World"), "hello world");
		assert_eq!(encode("  Tabs\t and \t spaces  "), "tabs and spaces");
	}

	#[test]
	fn substitutes_line_breaks() {
		assert_eq!(encode("one\ntwo"), "one@two");
		assert_eq!(encode("one \n two"), "one @ two");
	}

	#[test]
	fn strips_scrape_artifacts() {
		assert_eq!(encode("she said \"\"hi\"\""), "she said \"hi\"");
		assert_eq!(encode("you &amp me"), "you & me");
	}

	#[test]
	fn encode_is_deterministic() {
		let input = "Some\nMixed   Case text";
		assert_eq!(encode(input), encode(input));
	}

	#[test]
	fn decode_inverts_only_the_sentinel() {
		assert_eq!(decode("a@b"), "a\nb");
		// Line-break substitution in isolation round-trips.
		assert_eq!(decode(&encode("one\ntwo")), "one\ntwo");
		// The full transform does not: case and spacing stay normalized.
		let lossy = "Mixed  Case\nText";
		assert_ne!(decode(&encode(lossy)), lossy);
	}
}
