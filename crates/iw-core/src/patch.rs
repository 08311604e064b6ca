//! Applying edit blocks to a document.
//!
//! Blocks are applied in order, each against the document as left by the
//! blocks before it. A block replaces only the first occurrence of its search
//! text. A block whose search text is not present is skipped: the model often
//! refers to text an earlier block already rewrote, and the rest of the edit
//! is still worth keeping.

use crate::blocks::EditBlock;

/// The result of [`apply_edits_with_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
  pub content: String,
  /// Indices (into the input slice) of blocks that changed the document.
  pub applied: Vec<usize>,
  /// Indices of blocks whose search text was not found.
  pub skipped: Vec<usize>,
}

/// Apply `edits` to `source` and return the new document.
pub fn apply_edits(source: &str, edits: &[EditBlock]) -> String {
  apply_edits_with_report(source, edits).content
}

/// Like [`apply_edits`], but also reports which blocks matched.
pub fn apply_edits_with_report(source: &str, edits: &[EditBlock]) -> PatchOutcome {
  let mut content = source.to_owned();
  let mut applied = Vec::new();
  let mut skipped = Vec::new();

  for (i, edit) in edits.iter().enumerate() {
    match replace_first(&content, &edit.search, &edit.replace) {
      Some(next) => {
        content = next;
        applied.push(i);
      }
      None => skipped.push(i),
    }
  }

  PatchOutcome { content, applied, skipped }
}

/// Replace the first literal occurrence of `search` in `haystack`.
/// An empty `search` never matches.
fn replace_first(haystack: &str, search: &str, replace: &str) -> Option<String> {
  if search.is_empty() {
    return None;
  }
  let start = haystack.find(search)?;
  let end = start + search.len();

  let mut out = String::with_capacity(haystack.len() - search.len() + replace.len());
  out.push_str(&haystack[..start]);
  out.push_str(replace);
  out.push_str(&haystack[end..]);
  Some(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_sequence_is_identity() {
    assert_eq!(apply_edits("<html>A</html>", &[]), "<html>A</html>");
    assert_eq!(apply_edits("", &[]), "");
  }

  #[test]
  fn replaces_first_occurrence_only() {
    let edits = [EditBlock::new("ab", "X")];
    assert_eq!(apply_edits("ababab", &edits), "Xabab");
  }

  #[test]
  fn later_blocks_see_earlier_results() {
    let edits = [EditBlock::new("foo", "bar"), EditBlock::new("bar", "baz")];
    assert_eq!(apply_edits("foo", &edits), "baz");
  }

  #[test]
  fn missing_search_is_skipped_and_later_blocks_still_apply() {
    let edits = [
      EditBlock::new("absent", "nope"),
      EditBlock::new("<p>", "<p class=\"lead\">"),
    ];
    let outcome = apply_edits_with_report("<p>hi</p>", &edits);
    assert_eq!(outcome.content, "<p class=\"lead\">hi</p>");
    assert_eq!(outcome.applied, vec![1]);
    assert_eq!(outcome.skipped, vec![0]);
  }

  #[test]
  fn block_invalidated_by_earlier_block_is_skipped() {
    let edits = [EditBlock::new("red", "blue"), EditBlock::new("red", "green")];
    let outcome = apply_edits_with_report("color: red;", &edits);
    assert_eq!(outcome.content, "color: blue;");
    assert_eq!(outcome.skipped, vec![1]);
  }

  #[test]
  fn search_is_literal_not_a_pattern() {
    let edits = [EditBlock::new("a.c", "X"), EditBlock::new("$1", "Y")];
    assert_eq!(apply_edits("abc a.c $1", &edits), "abc X Y");
  }

  #[test]
  fn empty_replace_deletes() {
    let edits = [EditBlock::new("<hr>\n", "")];
    assert_eq!(apply_edits("<p>a</p>\n<hr>\n<p>b</p>", &edits), "<p>a</p>\n<p>b</p>");
  }

  #[test]
  fn multibyte_text() {
    let edits = [EditBlock::new("café", "thé")];
    assert_eq!(apply_edits("un café ☕", &edits), "un thé ☕");
  }

  #[test]
  fn is_deterministic() {
    let edits = [EditBlock::new("a", "b"), EditBlock::new("b", "c")];
    assert_eq!(apply_edits("aab", &edits), apply_edits("aab", &edits));
  }
}
