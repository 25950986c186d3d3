//! Configuration constants and validation for the fragmentizer.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{FragmentizeError, Result};

/// Default maximum fragment length in bytes.
pub const DEFAULT_MAX_LEN: usize = 4096;

/// Default set of block tags the splitter may descend into.
pub const DEFAULT_BLOCK_TAGS: &[&str] = &["p", "b", "strong", "i", "ul", "ol", "div", "span"];

/// Tag name pattern: a letter followed by letters, digits or hyphens.
static TAG_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // pattern is a compile-time constant
    Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").unwrap()
});

/// Validate a block tag name.
///
/// # Arguments
/// * `tag` - The tag name to validate (e.g., "p", "div", "custom-block")
///
/// # Examples
/// ```
/// use fragmentize::config::validate_block_tag;
///
/// assert!(validate_block_tag("div").is_ok());
/// assert!(validate_block_tag("custom-block").is_ok());
/// assert!(validate_block_tag("1bad").is_err());
/// ```
pub fn validate_block_tag(tag: &str) -> Result<()> {
    if TAG_NAME_PATTERN.is_match(tag) {
        Ok(())
    } else {
        Err(FragmentizeError::InvalidBlockTag(tag.to_string()))
    }
}

/// Parse a comma-separated block-tag override (e.g. "p,div,section").
///
/// Whitespace around tag names is ignored; every name is validated.
pub fn parse_block_tags(list: &str) -> Result<Vec<String>> {
    let mut tags = Vec::new();
    for tag in list.split(',') {
        let tag = tag.trim();
        validate_block_tag(tag)?;
        tags.push(tag.to_string());
    }
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_block_tag_accepts_defaults() {
        for tag in DEFAULT_BLOCK_TAGS {
            assert!(validate_block_tag(tag).is_ok(), "default tag {tag} rejected");
        }
    }

    #[test]
    fn test_validate_block_tag_rejects_malformed() {
        assert!(validate_block_tag("").is_err());
        assert!(validate_block_tag("1p").is_err());
        assert!(validate_block_tag("di v").is_err());
        assert!(validate_block_tag("<div>").is_err());
    }

    #[test]
    fn test_parse_block_tags() {
        let tags = parse_block_tags("p, div,section").expect("valid list");
        assert_eq!(tags, vec!["p", "div", "section"]);
    }

    #[test]
    fn test_parse_block_tags_rejects_empty_entry() {
        assert!(parse_block_tags("p,,div").is_err());
    }
}
