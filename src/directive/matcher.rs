use super::grammar::directive_pattern;
use fancy_regex::Regex;
use std::sync::LazyLock;

static DIRECTIVE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&directive_pattern()).expect("directive grammar compiles"));

/// One `directive="expression"` occurrence.
///
/// Offsets are byte offsets into the scanned document and cover the whole
/// attribute, from the first character of the directive name through the
/// closing quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveMatch<'t> {
    /// The directive as written, e.g. `@click.prevent` or `X-DATA`.
    pub directive: &'t str,
    /// `'` or `"`.
    pub quote: char,
    /// Text between the quotes, untouched.
    pub expression: &'t str,
    pub start: usize,
    pub end: usize,
}

impl DirectiveMatch<'_> {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Lazy iterator over the directives in a document, in document order.
pub struct DirectiveMatches<'t> {
    content: &'t str,
    pos: usize,
    done: bool,
}

impl<'t> Iterator for DirectiveMatches<'t> {
    type Item = Result<DirectiveMatch<'t>, fancy_regex::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let content = self.content;

        while !self.done && self.pos <= content.len() {
            let captures = match DIRECTIVE_REGEX.captures_from_pos(content, self.pos) {
                Ok(Some(captures)) => captures,
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };

            // All groups are mandatory in the pattern, so a successful match always has them.
            let head = captures.get(0)?;
            let directive = captures.name("directive")?;
            let quote = *captures.name("quote")?.as_str().as_bytes().first()?;
            let start = head.start();

            if !preceded_by_whitespace(content, start) {
                self.pos = start + content[start..].chars().next().map_or(1, char::len_utf8);
                continue;
            }

            match closing_quote(content, quote, head.end()) {
                Some(close) => {
                    self.pos = close + 1;
                    return Some(Ok(DirectiveMatch {
                        directive: directive.as_str(),
                        quote: char::from(quote),
                        expression: &content[head.end()..close],
                        start,
                        end: close + 1,
                    }));
                }
                // Unclosed: not a directive, keep scanning after the opening quote
                None => self.pos = head.end(),
            }
        }

        None
    }
}

/// Offset of the first `quote` at or after `from` that is not preceded by a backslash.
///
/// `from` follows the opening quote, so `candidate - 1` is always in bounds.
fn closing_quote(content: &str, quote: u8, from: usize) -> Option<usize> {
    let bytes = content.as_bytes();
    let mut search = from;
    while let Some(offset) = bytes[search..].iter().position(|&b| b == quote) {
        let candidate = search + offset;
        if bytes[candidate - 1] != b'\\' {
            return Some(candidate);
        }
        search = candidate + 1;
    }
    None
}

fn preceded_by_whitespace(content: &str, offset: usize) -> bool {
    content[..offset].chars().next_back().is_some_and(char::is_whitespace)
}

/// Scan `content` for directive attributes.
///
/// The returned iterator is cheap to create, so callers that need a second
/// pass simply call this again. Scanning is linear in the document size.
pub fn find_directives(content: &str) -> DirectiveMatches<'_> {
    DirectiveMatches {
        content,
        pos: 0,
        done: false,
    }
}

/// Quick check before running the full pattern.
///
/// Every directive spelling contains `x-` (any case), `@` or `:`.
pub fn has_directive_markers(content: &str) -> bool {
    content.contains('@')
        || content.contains(':')
        || content
            .as_bytes()
            .windows(2)
            .any(|w| w[0].eq_ignore_ascii_case(&b'x') && w[1] == b'-')
}
