//! Property tests for output path resolution.

use proptest::prelude::*;
use rulesync_projection::{resolve, sanitize_name, EntityKind, TargetRegistry};
use std::path::Component;

fn kind() -> impl Strategy<Value = EntityKind> {
    prop_oneof![Just(EntityKind::Rule), Just(EntityKind::Subagent)]
}

proptest! {
    #[test]
    fn resolution_is_deterministic(name in "[a-zA-Z0-9_./-]{1,24}", kind in kind()) {
        let registry = TargetRegistry::builtin().unwrap();
        for target in registry.ids() {
            let first = resolve(&registry, kind, &name, target);
            let second = resolve(&registry, kind, &name, target);
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn distinct_clean_names_never_share_a_path(
        a in "[a-z][a-z0-9-]{0,15}",
        b in "[a-z][a-z0-9-]{0,15}",
        kind in kind(),
    ) {
        prop_assume!(a != b);
        let registry = TargetRegistry::builtin().unwrap();
        for target in registry.ids() {
            let pa = resolve(&registry, kind, &a, target).unwrap();
            let pb = resolve(&registry, kind, &b, target).unwrap();
            prop_assert_ne!(pa, pb);
        }
    }

    #[test]
    fn resolved_paths_stay_relative(name in "\\PC{1,32}", kind in kind()) {
        let registry = TargetRegistry::builtin().unwrap();
        if let Ok(path) = resolve(&registry, kind, &name, "claudecode") {
            prop_assert!(path
                .components()
                .all(|c| matches!(c, Component::Normal(_))));
        }
    }

    #[test]
    fn sanitizing_is_idempotent(name in "\\PC{0,32}") {
        let once = sanitize_name(&name);
        prop_assert_eq!(sanitize_name(&once), once);
    }
}
