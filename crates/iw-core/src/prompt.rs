//! The request text sent to the completion service for one edit.

use std::fmt::Write as _;

use crate::blocks::{DIVIDER, REPLACE_MARKER, SEARCH_MARKER};

/// Render the completion prompt for editing `document` according to
/// `instruction`. `asset_urls` lists files the user uploaded with the request;
/// the model may reference them in the new markup.
pub fn build_edit_prompt(document: &str, instruction: &str, asset_urls: &[String]) -> String {
  let mut out = String::new();

  out.push_str(
    "You are an expert web developer. Modify the following HTML according to \
     this request: ",
  );
  out.push_str(instruction);
  out.push_str("\n\nHere is the current HTML:\n");
  out.push_str(document);
  out.push_str("\n\n");

  if !asset_urls.is_empty() {
    out.push_str("The user uploaded these files, which you may use in the page:\n");
    for url in asset_urls {
      let _ = writeln!(out, "- {url}");
    }
    out.push('\n');
  }

  let _ = write!(
    out,
    "Describe your change as one or more edit blocks. Each block has this \
     exact form:\n\
     \n\
     {SEARCH_MARKER}\n\
     lines copied exactly from the current HTML\n\
     {DIVIDER}\n\
     the lines that replace them\n\
     {REPLACE_MARKER}\n\
     \n\
     The search lines must match the current HTML character for character, \
     including indentation, and should be just long enough to be unique. \
     Blocks are applied in order and each replaces only the first match. \
     Leave existing <script> tags in place; one of them loads the page editor."
  );

  out
}
