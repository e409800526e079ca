use alpinefmt_lib::{BeautifyError, format_alpine};
use proptest::prelude::*;

fn reject(code: &str) -> Result<String, BeautifyError> {
    Err(BeautifyError::Rejected(format!("unexpected call with `{code}`")))
}

fn identity(code: &str) -> Result<String, BeautifyError> {
    Ok(code.to_string())
}

fn one_statement_per_line(code: &str) -> Result<String, BeautifyError> {
    Ok(code.split(';').map(str::trim).collect::<Vec<_>>().join("\n"))
}

/// Lays out `{k:v,...}` one entry per line, collapses whitespace in anything else.
fn object_layout(code: &str) -> Result<String, BeautifyError> {
    match code.strip_prefix('{').and_then(|c| c.strip_suffix('}')) {
        Some(body) => {
            let entries: Vec<String> = body
                .split(',')
                .map(|entry| {
                    let (key, value) = entry.split_once(':').unwrap_or((entry, ""));
                    format!("    {}: {}", key.trim(), value.trim())
                })
                .collect();
            Ok(format!("{{\n{}\n}}", entries.join(",\n")))
        }
        None => Ok(code.split_whitespace().collect::<Vec<_>>().join(" ")),
    }
}

#[test]
fn object_expression_is_laid_out_at_directive_column() {
    let content = "<body>\n       <div x-data='{\"hide\":false}' :class=\"hide  &&  'hidden'\">\n</body>\n";
    let expected = concat!(
        "<body>\n",
        "       <div x-data='\n",
        "            {\n",
        "                \"hide\": false\n",
        "            }\n",
        "            ' :class=\"hide && 'hidden'\">\n",
        "</body>\n",
    );

    let result = format_alpine(content, &object_layout).unwrap();
    pretty_assertions::assert_eq!(result, expected);
}

proptest! {
    #[test]
    fn text_without_directive_markers_is_unchanged(content in "[a-wyzA-WYZ0-9 <>/=\"'\n\t.;_-]{0,200}") {
        prop_assert_eq!(format_alpine(&content, &reject).unwrap(), content);
    }

    #[test]
    fn text_without_quotes_is_unchanged(content in "[a-zA-Z0-9 <>/=@:\n\t.;_-]{0,200}") {
        prop_assert_eq!(format_alpine(&content, &reject).unwrap(), content);
    }

    #[test]
    fn identity_beautifier_keeps_trimmed_single_line_expressions(
        indent in 0usize..16,
        directive in "(x-text|x-show|x-on:click|@click\\.prevent|:class|x-model\\.lazy)",
        expression in "[a-z0-9]([a-z0-9 +*&|!()]{0,28}[a-z0-9])?",
    ) {
        let content = format!("<ul>\n{}<li {directive}=\"{expression}\">\n</ul>\n", " ".repeat(indent));
        prop_assert_eq!(format_alpine(&content, &identity).unwrap(), content);
    }

    #[test]
    fn multi_line_output_is_indented_to_directive_column(
        indent in 0usize..40,
        statements in prop::collection::vec("[a-z]{1,8}", 2..5),
    ) {
        let content = format!("<p>\n{}<b x-init=\"{}\">", " ".repeat(indent), statements.join("; "));
        let column = " ".repeat(indent + 3);

        let mut expected = format!("<p>\n{}<b x-init=\"", " ".repeat(indent));
        for statement in &statements {
            expected.push('\n');
            expected.push_str(&column);
            expected.push_str(statement);
        }
        expected.push('\n');
        expected.push_str(&column);
        expected.push_str("\">");

        prop_assert_eq!(format_alpine(&content, &one_statement_per_line).unwrap(), expected);
    }

    #[test]
    fn multi_line_output_on_first_line_is_not_indented(
        indent in 0usize..40,
        statements in prop::collection::vec("[a-z]{1,8}", 2..5),
    ) {
        let content = format!("{}<b x-init=\"{}\">", " ".repeat(indent), statements.join("; "));
        let expected = format!("{}<b x-init=\"\n{}\n\">", " ".repeat(indent), statements.join("\n"));

        prop_assert_eq!(format_alpine(&content, &one_statement_per_line).unwrap(), expected);
    }
}
