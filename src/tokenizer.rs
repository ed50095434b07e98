//! Shell-like splitting of curl command strings.

/// Split a curl command line into arguments.
///
/// A single left-to-right scan honoring single quotes, double quotes and
/// backslash escapes: a backslash appends the following character literally,
/// quotes of one kind are literal inside quotes of the other, and whitespace
/// outside quotes separates tokens. An unterminated quote is tolerated — the
/// buffered remainder becomes the final token.
///
/// ```
/// let tokens = rcurl::tokenize("curl -H 'X-Name: a b' https://example.com");
/// assert_eq!(tokens, ["curl", "-H", "X-Name: a b", "https://example.com"]);
/// ```
pub fn tokenize(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut escape_next = false;

    for ch in command.chars() {
        if escape_next {
            current.push(ch);
            escape_next = false;
            continue;
        }
        match ch {
            '\\' => escape_next = true,
            '\'' if !in_double_quote => in_single_quote = !in_single_quote,
            '"' if !in_single_quote => in_double_quote = !in_double_quote,
            ch if ch.is_whitespace() && !in_single_quote && !in_double_quote => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            ch => current.push(ch),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_are_consumed_and_inner_spaces_preserved() {
        assert_eq!(
            tokenize("curl -X POST 'https://a.b/c' -H \"X: 1 2\""),
            ["curl", "-X", "POST", "https://a.b/c", "-H", "X: 1 2"]
        );
    }

    #[test]
    fn backslash_escapes_the_next_character() {
        assert_eq!(tokenize(r#"a\ b c"#), ["a b", "c"]);
        assert_eq!(tokenize(r#"say \"hi\""#), ["say", "\"hi\""]);
    }

    #[test]
    fn quote_of_one_kind_is_literal_inside_the_other() {
        assert_eq!(tokenize(r#"'it"s' "don't""#), [r#"it"s"#, "don't"]);
    }

    #[test]
    fn runs_of_whitespace_collapse() {
        assert_eq!(tokenize("  a \t b\n c  "), ["a", "b", "c"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn unterminated_quote_keeps_the_remainder() {
        assert_eq!(tokenize("curl 'https://a.b/c d"), ["curl", "https://a.b/c d"]);
    }

    #[test]
    fn json_body_survives_single_quoting() {
        assert_eq!(
            tokenize(r#"curl -d '{"a":1}' https://a.b"#),
            ["curl", "-d", r#"{"a":1}"#, "https://a.b"]
        );
    }
}
