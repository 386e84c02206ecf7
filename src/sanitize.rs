//! Plain-text sanitization for free-text input

/// Elements whose contents never render as text and are dropped wholesale
const NON_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Strip all markup from the input, leaving plain text
///
/// Tags and their attributes are removed, comments and doctype-style
/// declarations are skipped, and the contents of non-text elements
/// (`<script>`, `<style>`) are dropped entirely. A `<` that does not open a
/// tag is kept as ordinary text.
#[must_use]
pub fn strip_markup(input: &str) -> String {
	let mut output = String::with_capacity(input.len());
	let mut rest = input;

	while let Some(idx) = rest.find('<') {
		output.push_str(&rest[..idx]);
		rest = &rest[idx..];

		if let Some(comment) = rest.strip_prefix("<!--") {
			rest = match comment.find("-->") {
				Some(end) => &comment[end + 3..],
				None => "",
			};
			continue;
		}

		// Declarations (`<!doctype>`) and processing instructions (`<?xml?>`)
		if rest.starts_with("<!") || rest.starts_with("<?") {
			rest = skip_past_tag_end(rest);
			continue;
		}

		let Some((name, closing)) = tag_name(rest) else {
			output.push('<');
			rest = &rest[1..];
			continue;
		};

		if !closing && NON_TEXT_ELEMENTS.contains(&name.as_str()) {
			let close = format!("</{name}");

			rest = match rest.to_ascii_lowercase().find(&close) {
				Some(end) => skip_past_tag_end(&rest[end..]),
				None => "",
			};
			continue;
		}

		rest = skip_past_tag_end(rest);
	}

	output.push_str(rest);

	output
}

/// Skip past the `>` ending the tag at the start of the input
fn skip_past_tag_end(rest: &str) -> &str {
	match rest.find('>') {
		Some(end) => &rest[end + 1..],
		None => "",
	}
}

/// Parse the (lowercased) element name of the tag at the start of the input,
/// and whether it is a closing tag
///
/// Returns [`None`] if the input does not start a tag
fn tag_name(rest: &str) -> Option<(String, bool)> {
	let mut chars = rest.chars();

	// Consume the '<'
	chars.next();

	let mut closing = false;
	let mut lookahead = chars.clone();

	if lookahead.next() == Some('/') {
		closing = true;
		chars = lookahead;
	}

	let name: String = chars
		.take_while(|c| c.is_ascii_alphanumeric())
		.map(|c| c.to_ascii_lowercase())
		.collect();

	if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphabetic())
	{
		return None;
	}

	Some((name, closing))
}
