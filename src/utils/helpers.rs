//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use std::sync::OnceLock;
use regex::Regex;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// Canonical form used when comparing institute identifiers
pub fn normalize_institute_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Canonical form of an email address
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Basic shape check for email addresses
pub fn is_valid_email(email: &str) -> bool {
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    });
    re.is_match(email.trim())
}

/// Case-insensitive substring match; an empty needle matches everything
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// File extension of an uploaded file name, lower-cased and without the dot
pub fn file_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_institute_id() {
        assert_eq!(normalize_institute_id("  MIT-001 "), "mit-001");
        assert_eq!(normalize_institute_id("mit-001"), normalize_institute_id("MIT-001"));
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("jane@school.edu"));
        assert!(is_valid_email(" jane@school.edu "));
        assert!(!is_valid_email("jane@school"));
        assert!(!is_valid_email("jane school@edu.org"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Jane Student", "jane"));
        assert!(contains_ignore_case("Jane Student", "STUD"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("Jane", "john"));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("report.PDF"), Some("pdf".to_string()));
        assert_eq!(file_extension("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(file_extension("README"), None);
        assert_eq!(file_extension(".bashrc"), None);
    }

    proptest! {
        #[test]
        fn normalized_ids_ignore_case_and_padding(id in "[A-Za-z0-9-]{1,16}", pad in 0usize..4) {
            let padded = format!("{}{}{}", " ".repeat(pad), id.to_uppercase(), " ".repeat(pad));
            prop_assert_eq!(normalize_institute_id(&padded), normalize_institute_id(&id));
        }

        #[test]
        fn search_is_case_insensitive(name in "[a-zA-Z ]{1,20}") {
            prop_assert!(contains_ignore_case(&name, &name.to_uppercase()));
            prop_assert!(contains_ignore_case(&name.to_lowercase(), &name));
        }
    }
}
