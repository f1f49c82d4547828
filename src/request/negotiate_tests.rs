//! Tests for content negotiation.

use super::negotiate::{is_json_mime, select_accept, select_content_type};

mod json_mime {
    use super::*;

    #[test]
    fn plain_json_matches() {
        assert!(is_json_mime("application/json"));
    }

    #[test]
    fn json_with_parameters_matches() {
        assert!(is_json_mime("application/json; charset=utf-8"));
        assert!(is_json_mime("application/json;charset=UTF-8"));
    }

    #[test]
    fn match_is_case_insensitive() {
        assert!(is_json_mime("Application/JSON"));
    }

    #[test]
    fn structured_suffix_matches() {
        assert!(is_json_mime("application/vnd.api+json"));
        assert!(is_json_mime("application/problem+json; charset=utf-8"));
        assert!(is_json_mime("application/json-patch+json"));
    }

    #[test]
    fn non_json_types_do_not_match() {
        assert!(!is_json_mime("text/plain"));
        assert!(!is_json_mime("application/xml"));
        assert!(!is_json_mime("application/jsonx"));
        assert!(!is_json_mime("text/json+xml"));
    }

    #[test]
    fn empty_or_blank_does_not_match() {
        assert!(!is_json_mime(""));
        assert!(!is_json_mime("   "));
    }
}

mod content_type {
    use super::*;

    #[test]
    fn first_json_type_wins() {
        let types = ["text/plain", "application/vnd.api+json", "application/json"];
        assert_eq!(select_content_type(&types), Some("application/vnd.api+json"));
    }

    #[test]
    fn falls_back_to_first_declared_type() {
        let types = ["text/plain", "application/xml"];
        assert_eq!(select_content_type(&types), Some("text/plain"));
    }

    #[test]
    fn empty_list_selects_nothing() {
        assert_eq!(select_content_type(&[]), None);
    }
}

mod accept {
    use super::*;

    #[test]
    fn prefers_application_json() {
        let accepts = ["text/plain", "application/json"];
        assert_eq!(select_accept(&accepts).as_deref(), Some("application/json"));
    }

    #[test]
    fn json_preference_ignores_case() {
        let accepts = ["text/plain", "APPLICATION/JSON"];
        assert_eq!(select_accept(&accepts).as_deref(), Some("application/json"));
    }

    #[test]
    fn lists_all_types_without_json() {
        let accepts = ["text/plain", "application/xml"];
        assert_eq!(
            select_accept(&accepts).as_deref(),
            Some("text/plain,application/xml")
        );
    }

    #[test]
    fn empty_list_selects_nothing() {
        assert_eq!(select_accept(&[]), None);
    }
}
