/// `{{!--`
pub const COMMENT_OPEN: &str = "{{!--";
/// `--}}`
pub const COMMENT_CLOSE: &str = "--}}";

/// Check whether `text` is wrapped in a block comment. Both markers must be
/// present without sharing characters, so `{{!--}}` is not wrapped.
pub fn is_wrapped(text: &str) -> bool {
	text.len() >= COMMENT_OPEN.len() + COMMENT_CLOSE.len()
		&& text.starts_with(COMMENT_OPEN)
		&& text.ends_with(COMMENT_CLOSE)
}

/// Wrap `text` in a block comment.
pub fn wrap(text: &str) -> String {
	format!("{COMMENT_OPEN} {text} {COMMENT_CLOSE}")
}

/// Remove the comment markers from `text` and trim what is left. Text that
/// isn't wrapped is returned unchanged.
pub fn unwrap(text: &str) -> String {
	if !is_wrapped(text) {
		return text.to_string();
	}

	text[COMMENT_OPEN.len()..text.len() - COMMENT_CLOSE.len()]
		.trim()
		.to_string()
}

/// Unwrap `text` when it is a comment, wrap it otherwise.
pub fn toggle(text: &str) -> String {
	if is_wrapped(text) {
		unwrap(text)
	} else {
		wrap(text)
	}
}
