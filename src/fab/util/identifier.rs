//! Identifier validation: `[A-Za-z._-]+`, not prefixed with `fab_`.

use crate::util::errors::FabError;

/// Names reserved for the host: rule names, option names, and dependency
/// names all share this character class and reserved-prefix rule.
pub const RESERVED_PREFIX: &str = "fab_";

/// Validates `s` as an identifier. Returns the identifier back on success so
/// call sites can write `check_identifier(s)?` inline.
pub fn check_identifier(s: &str) -> Result<&str, FabError> {
    if s.starts_with(RESERVED_PREFIX) {
        return Err(FabError::InvalidIdentifier {
            name: s.to_string(),
            reason: "cannot begin with the reserved prefix `fab_`",
        });
    }

    if s.is_empty() || !s.chars().all(is_identifier_char) {
        return Err(FabError::InvalidIdentifier {
            name: s.to_string(),
            reason: "must be non-empty and contain only letters, '.', '_', or '-'",
        });
    }

    Ok(s)
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || matches!(ch, '-' | '_' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert!(check_identifier("mode").is_ok());
        assert!(check_identifier("my-rule.name_x").is_ok());
    }

    #[test]
    fn rejects_reserved_prefix() {
        assert!(matches!(
            check_identifier("fab_internal"),
            Err(FabError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn rejects_bad_characters() {
        assert!(check_identifier("has space").is_err());
        assert!(check_identifier("has/slash").is_err());
        assert!(check_identifier("").is_err());
    }
}
