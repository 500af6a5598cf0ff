//! The Rule Command Parser: per-token ninja escaping plus `@NAME@`
//! placeholder substitution.

pub const RESERVED_VARIABLES: &[&str] = &["in", "out"];
pub const BUILTIN_VARIABLES: &[&str] = &["depfile"];

/// Escapes a single command token for the executor's textual grammar: `$`
/// doubles, spaces and newlines get a `$` prefix. Applied per-token (not to
/// the already-joined command line) so a single token that itself contains a
/// literal space — e.g. one array element standing for one shell argument —
/// still reads back as one token to the executor.
pub fn ninja_escape(token: &str) -> String {
    token.replace('$', "$$").replace(' ', "$ ").replace('\n', "$\n")
}

/// Escapes every token, joins them with a single plain space, then replaces
/// every `@NAME@` placeholder (case-insensitive, matched to the nearest
/// following `@`) with its substituted form. Reserved (`in`, `out`) and
/// built-in (`depfile`) names substitute to `$name`; anything else is
/// recorded (lower-cased, deduplicated) into `declared` and substitutes to
/// `$fabvar_name`.
pub fn parse_command(tokens: &[String], declared: &mut Vec<String>) -> String {
    let escaped = tokens.iter().map(|t| ninja_escape(t)).collect::<Vec<_>>().join(" ");
    substitute_placeholders(&escaped, declared)
}

/// Parses a rule's `description` field with the same placeholder grammar as
/// `parse_command`: the whole string is escaped as a single token (so a
/// literal `$` still doubles) before `@NAME@` substitution runs.
pub fn parse_description(description: &str, declared: &mut Vec<String>) -> String {
    substitute_placeholders(&ninja_escape(description), declared)
}

fn substitute_placeholders(input: &str, declared: &mut Vec<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(at) = rest.find('@') {
        let (before, after_at) = rest.split_at(at);
        out.push_str(before);
        let after_at = &after_at[1..]; // drop the leading '@'

        match after_at.find('@') {
            Some(end) if end > 0 => {
                let name = after_at[..end].to_lowercase();
                if RESERVED_VARIABLES.contains(&name.as_str()) || BUILTIN_VARIABLES.contains(&name.as_str()) {
                    out.push('$');
                    out.push_str(&name);
                } else {
                    if !declared.contains(&name) {
                        declared.push(name.clone());
                    }
                    out.push_str("$fabvar_");
                    out.push_str(&name);
                }
                rest = &after_at[end + 1..];
            }
            _ => {
                // Lone '@' (empty or unterminated placeholder): emit verbatim.
                out.push('@');
                rest = after_at;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_token_embedded_space_gets_escaped_not_split() {
        // A command sequence element stands for one argument, so an internal
        // space is escaped, not treated as a token boundary.
        let tokens = vec!["echo".to_string(), "a b$c".to_string()];
        let mut declared = Vec::new();
        assert_eq!(parse_command(&tokens, &mut declared), "echo a$ b$$c");
        assert!(declared.is_empty());
    }

    #[test]
    fn reserved_and_builtin_substitute_without_prefix() {
        let tokens = vec!["cc".to_string(), "-o".to_string(), "@OUT@".to_string(), "@IN@".to_string()];
        let mut declared = Vec::new();
        assert_eq!(parse_command(&tokens, &mut declared), "cc -o $out $in");
        assert!(declared.is_empty());
    }

    #[test]
    fn user_variables_are_recorded_and_prefixed() {
        let tokens = vec!["@CC@".to_string(), "@flags@".to_string(), "@FLAGS@".to_string()];
        let mut declared = Vec::new();
        assert_eq!(parse_command(&tokens, &mut declared), "$fabvar_cc $fabvar_flags $fabvar_flags");
        assert_eq!(declared, vec!["cc".to_string(), "flags".to_string()]);
    }
}
