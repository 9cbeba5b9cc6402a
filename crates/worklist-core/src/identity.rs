//! Patient identity normalization.
//!
//! The two source spreadsheets format names independently, so matching runs
//! on a canonical `LAST,FIRST` key. This is deliberately approximate:
//! middle names are dropped, and there is no fuzzy matching or handling of
//! suffixes beyond literal token splitting. Two different patients can
//! normalize to the same key; the merge engine documents that as accepted
//! last-write-wins behavior.

/// Canonicalize a free-form "Last, First Middle..." name into an
/// equality-matching key. Never displayed, never fails.
///
/// No comma means the whole string is treated as one token: uppercased with
/// all spaces removed.
pub fn normalize_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let upper = name.to_uppercase();
    let mut parts = upper.split(',');
    let last = parts.next().unwrap_or("").trim();
    match parts.next() {
        None => upper.replace(' ', ""),
        Some(first_part) => {
            let first = first_part.trim().split(' ').next().unwrap_or("");
            format!("{last},{first}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_middle_names_dropped() {
        assert_eq!(normalize_name("Smith, John Q"), "SMITH,JOHN");
        assert_eq!(normalize_name("Smith, John Robert"), "SMITH,JOHN");
        assert_eq!(normalize_name("SMITH,JOHN"), "SMITH,JOHN");
    }

    #[test]
    fn test_case_and_whitespace() {
        assert_eq!(normalize_name("doe ,  jane"), "DOE,JANE");
        assert_eq!(normalize_name("DOE,JANE"), normalize_name("Doe, Jane"));
    }

    #[test]
    fn test_no_comma_fallback() {
        assert_eq!(normalize_name("Madonna"), "MADONNA");
        assert_eq!(normalize_name("Jane Doe"), "JANEDOE");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn test_idempotent_on_canonical_form() {
        for name in ["SMITH,JOHN", "DOE,JANE", "MADONNA"] {
            assert_eq!(normalize_name(&normalize_name(name)), normalize_name(name));
        }
    }
}
