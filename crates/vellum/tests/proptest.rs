//! Property-based tests for URL joining and data merging.

use proptest::prelude::*;
use vellum::{join_url, merge_data, GlobalData, RenderData, TemplateManager};

fn global_strategy() -> impl Strategy<Value = GlobalData> {
    prop::collection::btree_map("[a-e]{1,3}", "[a-z]{0,5}", 0..8)
}

fn per_call_strategy() -> impl Strategy<Value = RenderData> {
    prop::collection::btree_map("[a-e]{1,3}", any::<i32>(), 0..8).prop_map(|map| {
        map.into_iter()
            .map(|(k, v)| (k, serde_json::Value::from(v)))
            .collect()
    })
}

proptest! {
    /// Relative paths get exactly one separator.
    #[test]
    fn relative_uri_is_joined_with_slash(base in "[a-z:/.]{0,20}", uri in "[a-z][a-z/.]{0,20}") {
        prop_assert_eq!(join_url(&base, &uri), format!("{}/{}", base, uri));
    }

    /// Absolute paths are appended verbatim.
    #[test]
    fn absolute_uri_is_concatenated(base in "[a-z:/.]{0,20}", rest in "[a-z/.]{0,20}") {
        let uri = format!("/{}", rest);
        prop_assert_eq!(join_url(&base, &uri), format!("{}{}", base, uri));
    }

    /// The manager's URL methods follow the same law.
    #[test]
    fn manager_urls_follow_join_law(uri in "/?[a-z]{0,10}") {
        let manager = TemplateManager::new(".", "https://example.com", "https://cdn.example.com");
        prop_assert_eq!(manager.base_url(&uri), join_url("https://example.com", &uri));
        prop_assert_eq!(manager.static_url(&uri), join_url("https://cdn.example.com", &uri));
    }

    /// Every key present in the per-call data holds the per-call value.
    #[test]
    fn merge_is_right_biased(global in global_strategy(), per_call in per_call_strategy()) {
        let merged = merge_data(&global, &per_call);
        for (key, value) in &per_call {
            prop_assert_eq!(&merged[key], value);
        }
        for (key, value) in &global {
            if !per_call.contains_key(key) {
                prop_assert_eq!(&merged[key], &serde_json::Value::from(value.as_str()));
            }
        }
        prop_assert!(merged.len() <= global.len() + per_call.len());
    }

    /// Merging never changes its inputs.
    #[test]
    fn merge_does_not_mutate(global in global_strategy(), per_call in per_call_strategy()) {
        let (global_before, per_call_before) = (global.clone(), per_call.clone());
        for _ in 0..3 {
            merge_data(&global, &per_call);
        }
        prop_assert_eq!(global, global_before);
        prop_assert_eq!(per_call, per_call_before);
    }
}
