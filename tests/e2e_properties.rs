//! Property-based tests for path algebra and view semantics.

use proptest::prelude::*;
use proptree::model::path::{is_simple, join, split_first, strip_scope};
use proptree::PropTree;

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,6}"
}

fn dotted() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..4).prop_map(|segs| segs.join("."))
}

proptest! {
    // ========================================================================
    // Path algebra
    // ========================================================================

    #[test]
    fn join_is_associative(a in dotted(), b in dotted(), c in dotted()) {
        prop_assert_eq!(join(&join(&a, &b), &c), join(&a, &join(&b, &c)));
    }

    #[test]
    fn empty_is_identity_for_join(a in "[a-z.]{0,8}") {
        prop_assert_eq!(join("", &a), a.clone());
        prop_assert_eq!(join(&a, ""), a);
    }

    #[test]
    fn split_first_of_join_is_first_segment(a in segment(), rest in dotted()) {
        prop_assert!(is_simple(&a));
        let full = join(&a, &rest);
        prop_assert_eq!(split_first(&full), a.as_str());
    }

    #[test]
    fn strip_scope_inverts_join(scope in dotted(), rel in dotted()) {
        let full = join(&scope, &rel);
        prop_assert_eq!(strip_scope(&scope, &full), Some(rel.as_str()));
    }

    // ========================================================================
    // Views
    // ========================================================================

    #[test]
    fn i64_round_trip(path in dotted(), v in any::<i64>()) {
        let root = PropTree::new().root("prop");
        root.set(&path, v);
        prop_assert_eq!(root.get::<i64>(&path).unwrap(), v);
    }

    #[test]
    fn f64_round_trip(path in dotted(), v in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let root = PropTree::new().root("prop");
        root.set(&path, v);
        prop_assert_eq!(root.get::<f64>(&path).unwrap(), v);
    }

    #[test]
    fn string_round_trip(path in dotted(), v in ".*") {
        let root = PropTree::new().root("prop");
        root.set(&path, v.as_str());
        prop_assert_eq!(root.get::<String>(&path).unwrap(), v);
    }

    #[test]
    fn sibling_subtrees_are_isolated(x in segment(), y in segment(), rel in dotted(), v in any::<u32>()) {
        prop_assume!(x != y);
        let root = PropTree::new().root("prop");
        root.subtree(&x).set(&rel, v);
        prop_assert_eq!(root.subtree(&y).get_optional::<u32>(&rel), None);
        prop_assert_eq!(root.subtree(&x).get_optional::<u32>(&rel), Some(v));
    }

    #[test]
    fn reidfy_keeps_addressing(scope in dotted(), id in segment(), rel in dotted(), v in any::<i32>()) {
        let a = PropTree::new().root("prop").subtree(&scope);
        let b = a.reidfy(&id);
        prop_assert_eq!(b.path(), a.path());
        b.set(&rel, v);
        prop_assert_eq!(a.get::<i32>(&rel).unwrap(), v);
    }

    #[test]
    fn recursive_listing_reports_every_set_key(scope in dotted(), rels in prop::collection::btree_set(dotted(), 1..8)) {
        let root = PropTree::new().root("prop");
        let view = root.subtree(&scope);
        for rel in &rels {
            view.set(rel, 1);
        }
        let listed = view.list_keys_recursive(false);
        let expected: Vec<String> = rels.iter().cloned().collect();
        prop_assert_eq!(listed, expected);
    }
}
