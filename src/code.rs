//! Access-code validation and generation
//!
//! Codes look like `T00010-8AB`: a one-letter prefix (A-Z), a 5-digit index,
//! and a 3-hex-char checksum derived from `hash(index + salt)`. The checksum
//! is a low-security obfuscation check only; the backend remains the final
//! authority on whether a code grants access.

use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix letter + 5 digits, dash, 3 hex chars
static CODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[A-Z]\d{5}-[0-9A-F]{3}$").expect("code pattern is valid")
});

/// Maximum length of a well-formed code (`T00010-8AB`)
pub const CODE_LENGTH: usize = 10;

/// Check whether a code matches the expected format, case-insensitively
pub fn verify_format(code: &str) -> bool {
    CODE_PATTERN.is_match(code)
}

/// Extract the index part (e.g. `T00010`) from a format-valid code
pub fn extract_index(code: &str) -> Option<&str> {
    if !verify_format(code) {
        return None;
    }
    code.split_once('-').map(|(index, _)| index)
}

/// Compute the 3-hex-char checksum for an index and salt
///
/// Rolling hash over the UTF-16 code units of `index + salt`:
/// `h = (h << 5) - h + unit`, folded into a 32-bit signed integer on every
/// step. The absolute value is rendered as lowercase hex, truncated to 3
/// characters, left-padded with `0`, and uppercased. Deterministic and
/// reproducible across implementations; not cryptographic.
pub fn compute_checksum(index: &str, salt: &str) -> String {
    let mut hash: i32 = 0;
    for unit in index.encode_utf16().chain(salt.encode_utf16()) {
        hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(i32::from(unit));
    }

    let hex = format!("{:x}", hash.unsigned_abs());
    let truncated = &hex[..hex.len().min(3)];
    format!("{:0>3}", truncated).to_uppercase()
}

/// Verify that a code's checksum matches its index
///
/// The format check short-circuits first, so malformed input never reaches
/// the hash. The index is hashed exactly as written (case preserved), which
/// means a lowercased copy of a valid code will not verify.
pub fn verify_checksum(code: &str, salt: &str) -> bool {
    if !verify_format(code) {
        return false;
    }

    let Some((index, given)) = code.split_once('-') else {
        return false;
    };

    given.to_uppercase() == compute_checksum(index, salt)
}

/// Build a valid code for an index number; distribution tooling only
pub fn generate(prefix: char, index: u32, salt: &str) -> String {
    let index_part = format!("{}{:05}", prefix, index);
    let checksum = compute_checksum(&index_part, salt);
    format!("{}-{}", index_part, checksum)
}

/// Normalize raw user input towards the code format
///
/// Uppercases, strips everything but `A-Z`, `0-9` and `-`, and truncates to
/// the maximum code length. Mirrors what the entry form does as the user
/// types; the result still has to pass [`verify_format`].
pub fn normalize_input(raw: &str) -> String {
    raw.chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == '-')
        .take(CODE_LENGTH)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const SALT: &str = "default-salt-key";

    #[test]
    fn format_accepts_canonical_codes() {
        assert!(verify_format("T00010-8AB"));
        assert!(verify_format("A99999-000"));
        assert!(verify_format("Z00000-FFF"));
    }

    #[test]
    fn format_is_case_insensitive() {
        assert!(verify_format("t00010-8ab"));
    }

    #[test]
    fn format_rejects_malformed_codes() {
        assert!(!verify_format(""));
        assert!(!verify_format("T00010"));
        assert!(!verify_format("T00010-8ABC"));
        assert!(!verify_format("T0010-8AB"));
        assert!(!verify_format("00010T-8AB"));
        assert!(!verify_format("T00010-8AG"));
        assert!(!verify_format(" T00010-8AB"));
    }

    #[test]
    fn checksum_is_deterministic() {
        let a = compute_checksum("T00010", SALT);
        let b = compute_checksum("T00010", SALT);
        assert_eq!(a, b);
    }

    #[test]
    fn checksum_is_three_uppercase_hex_chars() {
        for input in ["T00000", "A12345", "Z99999", ""] {
            let sum = compute_checksum(input, SALT);
            assert_eq!(sum.len(), 3, "checksum for {:?} was {:?}", input, sum);
            assert!(sum.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn checksum_depends_on_index() {
        let base = compute_checksum("T00010", SALT);
        assert_ne!(base, compute_checksum("T00011", SALT));
        assert_ne!(base, compute_checksum("T00100", SALT));
        assert_ne!(base, compute_checksum("A00010", SALT));
    }

    #[test]
    fn checksum_depends_on_salt() {
        assert_ne!(compute_checksum("T00010", SALT), compute_checksum("T00010", "other-salt"));
    }

    #[test]
    fn verify_checksum_rejects_malformed_without_hashing() {
        assert!(!verify_checksum("not-a-code", SALT));
        assert!(!verify_checksum("T00010", SALT));
        assert!(!verify_checksum("", SALT));
    }

    #[test]
    fn verify_checksum_rejects_wrong_suffix() {
        let code = generate('T', 10, SALT);
        let (index, checksum) = code.split_once('-').unwrap();
        let wrong = if checksum == "000" { "001" } else { "000" };
        assert!(!verify_checksum(&format!("{}-{}", index, wrong), SALT));
    }

    #[test]
    fn extract_index_requires_valid_format() {
        assert_eq!(extract_index("T00010-8AB"), Some("T00010"));
        assert_eq!(extract_index("T00010"), None);
        assert_eq!(extract_index("T00010-8ABC"), None);
    }

    #[test]
    fn generate_pads_index_to_five_digits() {
        let code = generate('T', 7, SALT);
        assert!(code.starts_with("T00007-"));
        assert_eq!(code.len(), CODE_LENGTH);
    }

    #[test]
    fn normalize_input_cleans_user_typing() {
        assert_eq!(normalize_input("t00010-8ab"), "T00010-8AB");
        assert_eq!(normalize_input("  T 000?10-8AB!!"), "T00010-8AB");
        assert_eq!(normalize_input("T00010-8AB-EXTRA"), "T00010-8AB");
    }

    proptest! {
        #[test]
        fn generated_codes_verify(prefix in proptest::char::range('A', 'Z'), index in 0u32..=99_999) {
            let code = generate(prefix, index, SALT);
            prop_assert!(verify_format(&code));
            prop_assert!(verify_checksum(&code, SALT));
        }

        #[test]
        fn random_strings_do_not_verify(s in "[A-Z0-9-]{0,12}") {
            // Anything that fails the format check must also fail verification.
            if !verify_format(&s) {
                prop_assert!(!verify_checksum(&s, SALT));
            }
        }
    }
}
