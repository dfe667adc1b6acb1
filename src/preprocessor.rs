/// One non-blank program line, tabs already expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
	/// 1-based line number in the text as the user wrote it.
	pub number: usize,
	pub text: String,
}

impl SourceLine {
	pub fn indent(&self) -> usize {
		self.text.chars().take_while(|c| *c == ' ').count()
	}
}

/// Normalize line endings, expand tabs to `tab_width` spaces and drop blank lines.
pub fn preprocess(src: &str, tab_width: usize) -> Vec<SourceLine> {
	let normalized = src.replace("\r\n", "\n").replace('\r', "\n");
	let tab = " ".repeat(tab_width);

	let mut out = Vec::new();
	for (lineno, line) in normalized.split('\n').enumerate() {
		if line.trim().is_empty() {
			continue;
		}
		out.push(SourceLine {
			number: lineno + 1,
			text: line.replace('\t', &tab),
		});
	}
	out
}
