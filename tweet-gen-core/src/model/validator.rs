//! Accept/reject gate applied to trimmed candidates before decoding.

use crate::model::encoder::LINE_BREAK;

/// Maximum number of line breaks a readable short text can carry.
const MAX_LINE_BREAKS: usize = 3;

/// Minimum length of a meaningful post, in symbols.
const MIN_LENGTH: usize = 60;

/// Decides whether a trimmed candidate reads as a coherent short text.
///
/// Rejects candidates that are too fragmented (three or more line breaks)
/// or too short to be a meaningful post. Pure predicate, no side effects.
pub(crate) fn is_valid(text: &str) -> bool {
	if text.matches(LINE_BREAK).count() >= MAX_LINE_BREAKS {
		return false;
	}
	text.chars().count() >= MIN_LENGTH
}
