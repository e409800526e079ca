//! Recognition of Alpine.js directive attributes in template markup.
//!
//! A directive is recognized only when it is preceded by whitespace, carries an
//! explicit quoted value, and is spelled according to the [`grammar`] table:
//!
//! - `x-data="..."`, `x-init="..."`, `x-text="..."`, ...
//! - `x-on:click.prevent="..."` or its shorthand `@click.prevent="..."`
//! - `x-bind:class="..."` or its shorthand `:class="..."`
//! - `x-show.important="..."`, `x-model.lazy="..."`
//!
//! The expression runs to the first unescaped copy of the opening quote and may
//! span several lines. An expression with no closing quote is not a match.

pub mod grammar;
pub mod matcher;

pub use grammar::{Argument, DIRECTIVES, DirectiveSpec, directive_pattern};
pub use matcher::{DirectiveMatch, DirectiveMatches, find_directives, has_directive_markers};
