use std::sync::{Arc, OnceLock};

use proptest::prelude::*;

use ukmec::{Category, EligibilityTable, Intent, Method, ReferenceTable, Resolver, Selection};

static TABLE: OnceLock<Arc<ReferenceTable>> = OnceLock::new();

fn table() -> Arc<ReferenceTable> {
    Arc::clone(TABLE.get_or_init(|| Arc::new(ReferenceTable::builtin().unwrap())))
}

fn resolver() -> Resolver {
    Resolver::new(table())
}

fn known_ids() -> Vec<String> {
    table().conditions().map(|c| c.id.to_string()).collect()
}

fn method() -> impl Strategy<Value = Method> {
    prop::sample::select(Method::ALL.to_vec())
}

fn intent() -> impl Strategy<Value = Intent> {
    prop_oneof![Just(Intent::Initiation), Just(Intent::Continuation)]
}

fn conditions() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(known_ids()), 0..16)
}

fn unknown_id() -> impl Strategy<Value = String> {
    prop_oneof![
        "ZZ_UNKNOWN_[A-Z0-9]{1,8}",
        Just(String::new()),
        " {1,4}",
        "[A-Z_]{129,200}",
    ]
}

fn select(method: Method, intent: Intent, conditions: &[String]) -> Selection {
    Selection::builder()
        .method(method)
        .intent(intent)
        .conditions(conditions.iter().cloned())
        .build()
        .unwrap()
}

/// Independent reference computation: maximum over applicable halves.
fn expected(method: Method, intent: Intent, conditions: &[String]) -> Category {
    let t = table();
    conditions
        .iter()
        .filter_map(|id| t.pair(id, method))
        .filter_map(|pair| pair.for_intent(intent).category())
        .max()
        .unwrap_or(Category::One)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn resolution_is_deterministic(m in method(), i in intent(), ids in conditions()) {
        let r = resolver();
        let s = select(m, i, &ids);
        prop_assert_eq!(r.resolve(&s), r.resolve(&s));
        prop_assert_eq!(r.resolve(&s), resolver().resolve(&s));
    }

    #[test]
    fn resolution_matches_independent_maximum(m in method(), i in intent(), ids in conditions()) {
        let s = select(m, i, &ids);
        prop_assert_eq!(resolver().resolve(&s), expected(m, i, &ids));
    }

    #[test]
    fn adding_a_condition_never_lowers_the_category(
        m in method(),
        i in intent(),
        ids in conditions(),
        extra in prop::sample::select(known_ids()),
    ) {
        let r = resolver();
        let before = r.resolve(&select(m, i, &ids));
        let mut more = ids.clone();
        more.push(extra);
        let after = r.resolve(&select(m, i, &more));
        prop_assert!(after >= before);
    }

    #[test]
    fn unknown_identifiers_do_not_change_the_result(
        m in method(),
        i in intent(),
        ids in conditions(),
        unknown in unknown_id(),
    ) {
        let r = resolver();
        let base = r.resolve(&select(m, i, &ids));
        let mut with_unknown = ids.clone();
        with_unknown.push(unknown);
        prop_assert_eq!(r.resolve(&select(m, i, &with_unknown)), base);
        prop_assert_eq!(r.category(m, i, with_unknown.iter().map(String::as_str)), base);
    }

    #[test]
    fn order_does_not_matter(m in method(), i in intent(), ids in conditions()) {
        let r = resolver();
        let forward = r.category(m, i, ids.iter().map(String::as_str));
        let backward = r.category(m, i, ids.iter().rev().map(String::as_str));
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn detailed_agrees_with_plain(m in method(), i in intent(), ids in conditions()) {
        let r = resolver();
        let s = select(m, i, &ids);
        let detailed = r.resolve_detailed(&s);
        prop_assert_eq!(detailed.category, r.resolve(&s));
        prop_assert_eq!(
            detailed.contributions.len() + detailed.not_applicable.len() + detailed.unknown.len(),
            s.len()
        );
        let at_final: Vec<&String> = detailed
            .contributions
            .iter()
            .filter(|c| c.category == detailed.category)
            .map(|c| &c.condition)
            .collect();
        prop_assert_eq!(detailed.drivers.iter().collect::<Vec<_>>(), at_final);
    }
}

#[test]
fn not_applicable_pairs_never_contribute() {
    let t = table();
    let r = resolver();
    for method in Method::ALL {
        let inapplicable: Vec<String> = t
            .records()
            .filter(|rec| rec.pair(method).is_inapplicable())
            .map(|rec| rec.id().to_string())
            .collect();
        for intent in Intent::ALL {
            let s = select(method, intent, &inapplicable);
            assert_eq!(r.resolve(&s), Category::One, "{method}/{intent}");
        }
    }
}
