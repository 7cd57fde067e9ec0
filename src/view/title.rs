//! Title side channel
//!
//! Rendered markup may carry one `<title>` element. Its text becomes the
//! document title and the element is stripped from what gets mounted.

use super::{Markup, ViewError, ViewResult};

/// Split the first `<title>` element out of `markup`.
///
/// Returns the trimmed title text (if any) and the markup without it.
pub fn extract_title(markup: &Markup) -> ViewResult<(Option<String>, Markup)> {
    let re = regex::Regex::new(r"(?is)<title(?:\s[^>]*)?>(.*?)</title\s*>")
        .map_err(|e| ViewError::Render(format!("title pattern: {}", e)))?;

    let source = markup.as_str();
    let Some(caps) = re.captures(source) else {
        return Ok((None, markup.clone()));
    };

    let (Some(whole), Some(text)) = (caps.get(0), caps.get(1)) else {
        return Ok((None, markup.clone()));
    };

    let mut stripped = String::with_capacity(source.len());
    stripped.push_str(&source[..whole.start()]);
    stripped.push_str(&source[whole.end()..]);

    Ok((Some(text.as_str().trim().to_string()), Markup::from(stripped)))
}
