//! Property-based tests for identity derivation and fingerprinting.
//!
//! These verify the invariants the lifecycle relies on for arbitrary
//! inputs: derived uids are always valid Grafana uids, derivation is
//! deterministic, and fingerprints depend only on document content, not
//! on its textual rendering.

use proptest::prelude::*;
use serde_json::json;

use grafana_sync_handler::{derive_uid, fingerprint, fingerprint_document, normalize, normalize_slice};

/// Strategy for logical names a template author might plausibly write.
fn logical_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z][a-zA-Z0-9 _\\-]{0,60}",
        // Names with punctuation and unicode that must map to safe uids.
        "[a-zA-Z][a-zA-Z0-9 /()%.:!]{0,60}",
    ]
}

proptest! {
    #[test]
    fn test_derive_uid_is_deterministic(name in logical_name_strategy()) {
        prop_assert_eq!(derive_uid(&name).ok(), derive_uid(&name).ok());
    }

    #[test]
    fn test_derived_uid_is_grafana_safe(name in logical_name_strategy()) {
        if let Ok(uid) = derive_uid(&name) {
            prop_assert!(!uid.is_empty());
            prop_assert!(uid.len() <= 40);
            prop_assert!(uid.chars().all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-')));
            prop_assert!(!uid.starts_with('-'));
            prop_assert!(!uid.ends_with('-'));
            prop_assert!(!uid.contains("--"));
        }
    }

    #[test]
    fn test_derive_uid_ignores_case(name in "[a-zA-Z][a-zA-Z0-9 ]{0,40}") {
        prop_assert_eq!(
            derive_uid(&name).unwrap(),
            derive_uid(&name.to_ascii_lowercase()).unwrap()
        );
    }

    #[test]
    fn test_slug_names_pass_through(name in "[a-z0-9_]{1,40}") {
        // Already-safe names survive derivation unchanged.
        prop_assert_eq!(derive_uid(&name).unwrap(), name);
    }

    #[test]
    fn test_fingerprint_is_lowercase_hex(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let digest = fingerprint(&bytes);
        prop_assert_eq!(digest.len(), 64);
        prop_assert!(digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_fingerprint_ignores_rendering(
        title in "[a-zA-Z ]{1,20}",
        panel_ids in proptest::collection::vec(0i64..1000, 0..5),
    ) {
        let panels: Vec<_> = panel_ids
            .iter()
            .map(|id| json!({"id": id, "type": "timeseries"}))
            .collect();
        let document = json!({"description": title, "panels": panels});

        // Compact and pretty renderings of the same document must
        // fingerprint identically once parsed and normalized.
        let compact = serde_json::to_vec(&document).unwrap();
        let pretty = serde_json::to_vec_pretty(&document).unwrap();

        let a = normalize_slice(&compact, "Prop Dashboard").unwrap();
        let b = normalize_slice(&pretty, "Prop Dashboard").unwrap();
        prop_assert_eq!(
            fingerprint_document(&a.document).unwrap(),
            fingerprint_document(&b.document).unwrap()
        );
    }

    #[test]
    fn test_normalize_is_idempotent(name in "[a-zA-Z][a-zA-Z0-9 ]{0,30}") {
        let document = json!({
            "uid": "stale",
            "id": 9,
            "version": 4,
            "panels": [{"type": "stat"}]
        });

        let once = normalize(document, &name).unwrap();
        let twice = normalize(once.document.clone(), &name).unwrap();
        prop_assert_eq!(&once.document, &twice.document);
        prop_assert_eq!(once.uid, twice.uid);
    }
}
