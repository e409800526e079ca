//! Reformats directive expressions and splices them back into the document.
//!
//! A single-line result replaces the expression in place. A multi-line result
//! is moved onto its own lines, each indented to the column where the directive
//! starts, and the closing quote goes on a line of its own at that same column:
//!
//! ```text
//! <body>
//!     <div x-data='{"open":false,"count":0}'>
//! ```
//!
//! becomes
//!
//! ```text
//! <body>
//!     <div x-data='
//!          {
//!              "open": false,
//!              "count": 0
//!          }
//!          '>
//! ```
//!
//! A directive on the document's first line has no preceding newline, so its
//! lines get no indentation.

use crate::beautifier::{Beautifier, BeautifyError};
use crate::directive::{DirectiveMatch, find_directives, has_directive_markers};

/// Errors that abort formatting of a document.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The beautifier rejected an expression.
    #[error("Failed to format `{directive}` expression at byte {offset}: {source}")]
    MalformedExpression {
        directive: String,
        offset: usize,
        #[source]
        source: BeautifyError,
    },

    /// The regex engine reported an error while scanning for directives.
    #[error("Failed to scan for directives: {0}")]
    Scan(#[from] fancy_regex::Error),
}

/// Number of characters between the start of the line and `start`.
///
/// `start` is a byte offset and must lie on a character boundary.
pub fn indentation_level(content: &str, start: usize) -> usize {
    let before = &content[..start];
    match before.rfind('\n') {
        Some(newline) => before[newline + 1..].chars().count(),
        None => 0,
    }
}

/// Build the replacement text for one directive.
pub fn format_directive(
    content: &str,
    found: &DirectiveMatch<'_>,
    beautifier: &dyn Beautifier,
) -> Result<String, FormatError> {
    let formatted = beautifier
        .beautify(found.expression.trim())
        .map_err(|source| FormatError::MalformedExpression {
            directive: found.directive.to_string(),
            offset: found.start,
            source,
        })?;

    let directive = found.directive;
    let quote = found.quote;

    if !formatted.contains('\n') {
        return Ok(format!("{directive}={quote}{formatted}{quote}"));
    }

    let indentation = " ".repeat(indentation_level(content, found.start));
    let mut body = String::with_capacity(formatted.len() + (indentation.len() + 1) * 8);
    for line in formatted.split('\n') {
        body.push('\n');
        body.push_str(&indentation);
        body.push_str(line);
    }

    Ok(format!("{directive}={quote}{body}\n{indentation}{quote}"))
}

/// Format every directive expression in `content`.
///
/// Text outside the directives is copied unchanged. The first failure aborts
/// the whole document and nothing is returned for it.
pub fn format_alpine(content: &str, beautifier: &dyn Beautifier) -> Result<String, FormatError> {
    if !has_directive_markers(content) {
        return Ok(content.to_string());
    }

    let mut result = String::with_capacity(content.len());
    let mut last_end = 0;
    let mut count = 0usize;

    for found in find_directives(content) {
        let found = found?;
        let replacement = format_directive(content, &found, beautifier)?;

        result.push_str(&content[last_end..found.start]);
        result.push_str(&replacement);
        last_end = found.end;
        count += 1;
    }

    result.push_str(&content[last_end..]);
    log::debug!("[alpinefmt] Formatted {count} directive expressions");

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Collapses runs of spaces on each line and breaks statements onto their own lines.
    fn statements(code: &str) -> Result<String, BeautifyError> {
        let lines: Vec<String> = code
            .split([';', '\n'])
            .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|line| !line.is_empty())
            .collect();
        Ok(lines.join("\n"))
    }

    fn identity(code: &str) -> Result<String, BeautifyError> {
        Ok(code.to_string())
    }

    fn reject(code: &str) -> Result<String, BeautifyError> {
        Err(BeautifyError::Rejected(format!("Unexpected token in `{code}`")))
    }

    #[test]
    fn test_indentation_level() {
        let content = "<div>\n    <span x-data=\"{}\">";
        let start = content.find("x-data").unwrap();
        assert_eq!(indentation_level(content, start), 10);
    }

    #[test]
    fn test_indentation_level_first_line() {
        let content = "<div x-data=\"{}\">";
        assert_eq!(indentation_level(content, 5), 0);
    }

    #[test]
    fn test_indentation_counts_characters_not_bytes() {
        let content = "\n<p title=\"é\" x-text=\"a\">";
        let start = content.find("x-text").unwrap();
        assert_eq!(indentation_level(content, start), 13);
    }

    #[test]
    fn test_single_line_replacement() {
        let content = r#"<div x-show = " open  &&  ready ">"#;
        let result = format_alpine(content, &statements).unwrap();
        assert_eq!(result, r#"<div x-show="open && ready">"#);
    }

    #[test]
    fn test_multi_line_replacement() {
        let content = "<div>\n    <button @click=\"open = true; count++\">\n</div>";
        let result = format_alpine(content, &statements).unwrap();
        assert_eq!(
            result,
            "<div>\n    <button @click=\"\n            open = true\n            count++\n            \">\n</div>"
        );
    }

    #[test]
    fn test_multi_line_on_first_line_has_no_indentation() {
        let content = "<div x-init=\"a(); b()\">";
        let result = format_alpine(content, &statements).unwrap();
        assert_eq!(result, "<div x-init=\"\na()\nb()\n\">");
    }

    #[test]
    fn test_every_line_gets_the_indentation() {
        let content = "<body>\n  <div x-data='a;b;c'>";
        let result = format_alpine(content, &statements).unwrap();
        let indentation = " ".repeat(7);
        for line in result.lines().skip(2) {
            assert!(line.starts_with(&indentation), "line not indented: {line:?}");
        }
        assert!(result.ends_with(&format!("\n{indentation}'>")));
    }

    #[test]
    fn test_quote_character_is_preserved() {
        let content = r#"<span :class='{ "a": b }'>"#;
        let result = format_alpine(content, &identity).unwrap();
        assert_eq!(result, content);
    }

    #[test]
    fn test_shorthand_directive_name_is_preserved() {
        let content = r#"<a @Click.Prevent="go()">"#;
        let result = format_alpine(content, &identity).unwrap();
        assert_eq!(result, content);
    }

    #[test]
    fn test_expression_is_trimmed_before_beautifying() {
        let seen = std::sync::Mutex::new(Vec::new());
        let recorder = |code: &str| -> Result<String, BeautifyError> {
            seen.lock().unwrap().push(code.to_string());
            Ok(code.to_string())
        };
        format_alpine("<div x-text=\"\n   title  \n\">", &recorder).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["title".to_string()]);
    }

    #[test]
    fn test_pass_through_without_directives() {
        let content = "<div class=\"a\" data-x=\"b\">\n  <p>no directives: here</p>\n</div>\n";
        assert_eq!(format_alpine(content, &reject).unwrap(), content);
    }

    #[test]
    fn test_text_between_directives_is_untouched() {
        let content = "<div  x-show=\"a\"   class=\"x  y\"\tx-text=\"b\" >\r\n";
        let result = format_alpine(content, &statements).unwrap();
        assert_eq!(result, content);
    }

    #[test]
    fn test_beautifier_failure_aborts_document() {
        let content = "<div x-data=\"{}\" x-init=\"{ broken\">";
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let picky = |code: &str| -> Result<String, BeautifyError> {
            calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if code.contains("broken") {
                Err(BeautifyError::Rejected("Unexpected end of input".to_string()))
            } else {
                Ok(code.to_string())
            }
        };

        match format_alpine(content, &picky) {
            Err(FormatError::MalformedExpression { directive, offset, .. }) => {
                assert_eq!(directive, "x-init");
                assert_eq!(offset, content.find("x-init").unwrap());
            }
            other => panic!("expected MalformedExpression, got {other:?}"),
        }
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn test_idempotent() {
        let content = "<div>\n  <form x-data=\"a = 1; b = 2\" @submit.prevent=\"save()\">\n  </form>\n</div>\n";
        let once = format_alpine(content, &statements).unwrap();
        let twice = format_alpine(&once, &statements).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unclosed_quote_in_large_document_is_left_alone() {
        let mut content = String::from("<div x-data='{ open: false }\">\n");
        content.push_str(&"<p>some text here</p>\n".repeat(300_000));
        assert_eq!(format_alpine(&content, &reject).unwrap(), content);
    }

    #[test]
    fn test_unclosed_quote_is_left_alone() {
        let content = "<div x-data='{ open: false }\">\n<p>text</p>";
        assert_eq!(format_alpine(content, &reject).unwrap(), content);
    }
}
