//! Property tests for core values.

use proptest::prelude::*;
use vireo_core::{resolve_location, CoreError, Method, StatusCode, Url};

proptest! {
    /// Looking up a code twice gives equal values; unknown codes always fail.
    #[test]
    fn status_lookup_is_stable(code in 0_u16..1000) {
        match (StatusCode::new(code), StatusCode::new(code)) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a, b);
                prop_assert_eq!(a.to_string(), format!("{} {}", code, a.description()));
                prop_assert!((100..=511).contains(&code));
            }
            (Err(a), Err(b)) => {
                prop_assert_eq!(a, CoreError::InvalidStatusCode(code));
                prop_assert_eq!(b, CoreError::InvalidStatusCode(code));
            }
            _ => prop_assert!(false, "lookup of {} was not stable", code),
        }
    }

    /// Alphanumeric verbs are accepted verbatim.
    #[test]
    fn alphanumeric_methods_accepted(verb in "[A-Za-z0-9]{1,12}") {
        let method = Method::new(verb.clone()).unwrap();
        prop_assert_eq!(method.as_str(), verb.as_str());
    }

    /// Resolved locations never leave the base origin for path-only targets.
    #[test]
    fn relative_locations_keep_origin(
        segments in prop::collection::vec("[a-z]{1,5}", 0..4),
    ) {
        let base = Url::parse("https://example.com/a/b/c").unwrap();
        let target = segments.join("/");
        let resolved = resolve_location(&base, &target).unwrap();
        prop_assert_eq!(resolved.origin(), base.origin());
        prop_assert!(resolved.path().starts_with("/a/b/"));
    }
}
