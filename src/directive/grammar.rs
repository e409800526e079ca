//! The fixed table of recognized Alpine.js directives.
//!
//! Each directive is described by a [`DirectiveSpec`]. The combined
//! recognition pattern is assembled from the table once, on first use.

/// Characters allowed in a directive argument (`x-on:click`) or a modifier (`.prevent`).
const TOKEN: &str = "[a-zA-Z0-9-]+";

/// Whether a directive takes a colon-qualified argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument {
    /// `x-data`, `x-init`, ...
    None,
    /// `x-on:click`, `x-bind:class`
    Required,
}

/// Describes how one directive may be spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveSpec {
    pub name: &'static str,
    pub argument: Argument,
    /// Symbol that stands in for the full name (and its colon, when an argument is required).
    pub shorthand: Option<char>,
    /// Whether `.modifier` segments may follow the name or argument.
    pub modifiers: bool,
}

impl DirectiveSpec {
    const fn plain(name: &'static str) -> Self {
        Self {
            name,
            argument: Argument::None,
            shorthand: None,
            modifiers: false,
        }
    }

    const fn with_modifiers(name: &'static str) -> Self {
        Self {
            name,
            argument: Argument::None,
            shorthand: None,
            modifiers: true,
        }
    }

    /// Pattern source for this directive, without any surrounding boundary checks.
    pub fn pattern(&self) -> String {
        let name = escape(self.name);

        let mut pattern = match (self.argument, self.shorthand) {
            (Argument::Required, Some(symbol)) => {
                format!("(?:{name}:|{}){TOKEN}", escape(&symbol.to_string()))
            }
            (Argument::Required, None) => format!("{name}:{TOKEN}"),
            (Argument::None, Some(symbol)) => format!("(?:{name}|{})", escape(&symbol.to_string())),
            (Argument::None, None) => name,
        };

        if self.modifiers {
            pattern.push_str(&format!(r"(?:\.{TOKEN})*"));
        }

        pattern
    }
}

/// Directives whose values are script expressions.
///
/// `x-ignore` and `x-cloak` never carry a value. `x-transition` and
/// `x-teleport` take CSS classes and selectors, so they are left alone.
pub static DIRECTIVES: &[DirectiveSpec] = &[
    DirectiveSpec::plain("x-data"),
    DirectiveSpec::plain("x-init"),
    DirectiveSpec::with_modifiers("x-show"),
    DirectiveSpec {
        name: "x-bind",
        argument: Argument::Required,
        shorthand: Some(':'),
        modifiers: false,
    },
    DirectiveSpec {
        name: "x-on",
        argument: Argument::Required,
        shorthand: Some('@'),
        modifiers: true,
    },
    DirectiveSpec::plain("x-text"),
    DirectiveSpec::plain("x-html"),
    DirectiveSpec::with_modifiers("x-model"),
    DirectiveSpec::plain("x-modelable"),
    DirectiveSpec::plain("x-for"),
    DirectiveSpec::plain("x-effect"),
    DirectiveSpec::plain("x-ref"),
    DirectiveSpec::plain("x-if"),
    DirectiveSpec::plain("x-id"),
];

/// Build the pattern for a directive attribute up to and including its opening quote.
///
/// Named groups: `directive` and `quote`. The boundary before the name and the
/// closing quote are checked by the matcher, so the pattern stays free of
/// lookaround and backreferences and runs in linear time.
///
/// `\s*=\s*` rejects names followed by anything other than `=`.
pub fn directive_pattern() -> String {
    let alternatives: Vec<String> = DIRECTIVES.iter().map(DirectiveSpec::pattern).collect();

    format!(r#"(?i)(?P<directive>{})\s*=\s*(?P<quote>['"])"#, alternatives.join("|"))
}

fn escape(s: &str) -> String {
    let special_chars = ['.', '+', '*', '?', '^', '$', '(', ')', '[', ']', '{', '}', '|', '\\'];
    let mut result = String::with_capacity(s.len() * 2);

    for c in s.chars() {
        if special_chars.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}
