//! Cleanup of raw generated text before validation.
//!
//! Generation stops at an arbitrary character, so the tail of the buffer
//! is almost always an incomplete line or sentence. Each corpus family
//! gets its own trimming pass; all of them operate on the encoded text
//! (line breaks are still the sentinel character).

use crate::model::corpus_type::CorpusType;
use crate::model::encoder::LINE_BREAK;

/// Trims trailing incomplete structure from a raw generated buffer and
/// applies light formatting, according to the corpus family.
///
/// The first character of the result is always capitalized.
pub(crate) fn trim(raw: &str, corpus_type: CorpusType) -> String {
	let trimmed = match corpus_type {
		CorpusType::Book => trim_book(raw),
		CorpusType::Tweet => trim_tweet(raw),
		CorpusType::Lyric => trim_lyric(raw),
	};
	capitalize(&trimmed)
}

/// Book trimming: drop the unfinished last line, then drop the unfinished
/// trailing sentence of every remaining line. Surviving sentences are
/// stripped of leading whitespace, capitalized and terminated with `". "`.
fn trim_book(raw: &str) -> String {
	let mut lines: Vec<&str> = raw.split(LINE_BREAK).collect();
	if lines.len() > 1 {
		lines.pop();
	}

	let mut out = String::new();
	for line in lines {
		let mut sentences: Vec<&str> = line.split('.').collect();
		sentences.pop();
		for sentence in sentences {
			out.push_str(&capitalize(sentence.trim_start()));
			out.push_str(". ");
		}
	}

	strip_curly_quotes(&out)
}

/// Tweet trimming: same line-drop policy as books, but single-sentence
/// lines pass through untruncated. An empty reconstructed sentence marks
/// a line boundary and is restored as the line-break sentinel.
///
/// An odd number of straight double quotes means a quote was opened and
/// never closed; in that case all straight quotes are dropped.
fn trim_tweet(raw: &str) -> String {
	let mut lines: Vec<&str> = raw.split(LINE_BREAK).collect();
	if lines.len() > 1 {
		lines.pop();
	}

	let mut out = String::new();
	for line in lines {
		let mut sentences: Vec<&str> = line.split('.').collect();
		if sentences.len() > 1 {
			sentences.pop();
		}
		for sentence in sentences {
			if sentence.is_empty() {
				out.push(LINE_BREAK);
			} else {
				out.push_str(&capitalize(sentence.trim_start()));
				out.push_str(". ");
			}
		}
	}

	let out = strip_curly_quotes(&out);
	if out.matches('"').count() % 2 == 1 {
		return out.replace('"', "");
	}
	out
}

/// Lyric trimming: drop the unfinished final line, capitalize the rest and
/// keep the line structure.
fn trim_lyric(raw: &str) -> String {
	let mut lines: Vec<&str> = raw.split(LINE_BREAK).collect();
	lines.pop();

	let joined = lines
		.iter()
		.map(|line| capitalize(line))
		.collect::<Vec<_>>()
		.join(&LINE_BREAK.to_string());

	strip_curly_quotes(&joined)
}

/// Upper-cases the first character, leaving the rest untouched.
fn capitalize(text: &str) -> String {
	let mut chars = text.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

fn strip_curly_quotes(text: &str) -> String {
	text.replace(['\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}'], "")
}
