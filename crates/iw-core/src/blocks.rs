//! Edit-block parser.
//!
//! A model response carries its proposed change as one or more blocks of the
//! form
//!
//! ```text
//! <<<<<<< SEARCH
//! text to find, verbatim
//! =======
//! text to put in its place
//! >>>>>>> REPLACE
//! ```
//!
//! Anything outside a block (explanations, code fences) is ignored. A block
//! that is never closed, or whose search text is empty, is dropped; parsing
//! itself never fails.

use serde::{Deserialize, Serialize};

pub const SEARCH_MARKER: &str = "<<<<<<< SEARCH";
pub const DIVIDER: &str = "=======";
pub const REPLACE_MARKER: &str = ">>>>>>> REPLACE";

/// One search/replace instruction extracted from a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditBlock {
  pub search:  String,
  pub replace: String,
}

impl EditBlock {
  pub fn new(search: impl Into<String>, replace: impl Into<String>) -> Self {
    Self { search: search.into(), replace: replace.into() }
  }
}

enum State {
  Prose,
  Search(String),
  Replace(String, String),
}

/// Extract every well-formed block from `text`, in order of appearance.
///
/// Block text is kept byte-for-byte, including `\r\n` line endings; only the
/// terminator of the last line before a marker is dropped.
pub fn parse_edit_blocks(text: &str) -> Vec<EditBlock> {
  let mut blocks = Vec::new();
  let mut state = State::Prose;

  for line in text.split_inclusive('\n') {
    let marker = line.trim_end();

    state = match state {
      // A start marker always opens a fresh block; an unfinished one is lost.
      _ if marker == SEARCH_MARKER => State::Search(String::new()),
      State::Prose => State::Prose,
      State::Search(search) if marker == DIVIDER => {
        State::Replace(search, String::new())
      }
      State::Search(mut search) => {
        search.push_str(line);
        State::Search(search)
      }
      State::Replace(search, replace) if marker == REPLACE_MARKER => {
        let search = strip_terminator(search);
        if !search.is_empty() {
          blocks.push(EditBlock { search, replace: strip_terminator(replace) });
        }
        State::Prose
      }
      State::Replace(search, mut replace) => {
        replace.push_str(line);
        State::Replace(search, replace)
      }
    };
  }

  blocks
}

/// Drop one trailing `\n` or `\r\n`.
fn strip_terminator(mut s: String) -> String {
  if s.ends_with('\n') {
    s.pop();
    if s.ends_with('\r') {
      s.pop();
    }
  }
  s
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn no_blocks_yields_empty() {
    assert!(parse_edit_blocks("").is_empty());
    assert!(parse_edit_blocks("Sure! I made the heading bold.").is_empty());
  }

  #[test]
  fn single_block() {
    let text = "<<<<<<< SEARCH\nA\n=======\n<b>A</b>\n>>>>>>> REPLACE\n";
    assert_eq!(parse_edit_blocks(text), vec![EditBlock::new("A", "<b>A</b>")]);
  }

  #[test]
  fn blocks_in_prose_keep_source_order() {
    let text = "\
I'll change the title first.

<<<<<<< SEARCH
<title>Old</title>
=======
<title>New</title>
>>>>>>> REPLACE

Then the footer, which also mentions the title.

<<<<<<< SEARCH
<footer>Old</footer>
=======
<footer>New</footer>
>>>>>>> REPLACE

Let me know if you want anything else.";

    let blocks = parse_edit_blocks(text);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0], EditBlock::new("<title>Old</title>", "<title>New</title>"));
    assert_eq!(blocks[1], EditBlock::new("<footer>Old</footer>", "<footer>New</footer>"));
  }

  #[test]
  fn multi_line_text_is_verbatim() {
    let text = "\
<<<<<<< SEARCH
  <ul>
    <li>one</li>
  </ul>
=======
  <ol>
    <li>one</li>

  </ol>
>>>>>>> REPLACE";

    let blocks = parse_edit_blocks(text);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].search, "  <ul>\n    <li>one</li>\n  </ul>");
    assert_eq!(blocks[0].replace, "  <ol>\n    <li>one</li>\n\n  </ol>");
  }

  #[test]
  fn code_fences_around_blocks_are_ignored() {
    let text = "```html\n<<<<<<< SEARCH\nx\n=======\ny\n>>>>>>> REPLACE\n```";
    assert_eq!(parse_edit_blocks(text), vec![EditBlock::new("x", "y")]);
  }

  #[test]
  fn unterminated_trailing_block_is_dropped() {
    let text = "\
<<<<<<< SEARCH
a
=======
b
>>>>>>> REPLACE
<<<<<<< SEARCH
c
=======
d";
    assert_eq!(parse_edit_blocks(text), vec![EditBlock::new("a", "b")]);
  }

  #[test]
  fn block_without_divider_is_dropped() {
    let text = "<<<<<<< SEARCH\na\n>>>>>>> REPLACE\nprose";
    assert!(parse_edit_blocks(text).is_empty());
  }

  #[test]
  fn new_start_marker_abandons_open_block() {
    let text = "\
<<<<<<< SEARCH
lost
<<<<<<< SEARCH
kept
=======
new
>>>>>>> REPLACE";
    assert_eq!(parse_edit_blocks(text), vec![EditBlock::new("kept", "new")]);
  }

  #[test]
  fn empty_search_is_dropped_but_empty_replace_is_kept() {
    let text = "\
<<<<<<< SEARCH
=======
x
>>>>>>> REPLACE
<<<<<<< SEARCH
<hr>
=======
>>>>>>> REPLACE";
    assert_eq!(parse_edit_blocks(text), vec![EditBlock::new("<hr>", "")]);
  }

  #[test]
  fn crlf_line_endings_are_kept() {
    let text = "<<<<<<< SEARCH\r\na\r\nb\r\n=======\r\nc\r\n>>>>>>> REPLACE\r\n";
    assert_eq!(parse_edit_blocks(text), vec![EditBlock::new("a\r\nb", "c")]);
  }

  #[test]
  fn crlf_block_patches_crlf_document() {
    let document = "<ul>\r\n  <li>a</li>\r\n</ul>\r\n";
    let response = "<<<<<<< SEARCH\r\n  <li>a</li>\r\n</ul>\r\n=======\r\n  <li>a</li>\r\n  <li>b</li>\r\n</ul>\r\n>>>>>>> REPLACE\r\n";

    let blocks = parse_edit_blocks(response);
    assert_eq!(blocks[0].search, "  <li>a</li>\r\n</ul>");
    assert_eq!(
      crate::patch::apply_edits(document, &blocks),
      "<ul>\r\n  <li>a</li>\r\n  <li>b</li>\r\n</ul>\r\n"
    );
  }

  #[test]
  fn last_line_without_newline() {
    let text = "<<<<<<< SEARCH\nx\n=======\ny\n>>>>>>> REPLACE";
    assert_eq!(parse_edit_blocks(text), vec![EditBlock::new("x", "y")]);
  }

  #[test]
  fn markers_must_match_exactly() {
    let text = "<<<<<< SEARCH\na\n=======\nb\n>>>>>>> REPLACE";
    assert!(parse_edit_blocks(text).is_empty());
  }
}
