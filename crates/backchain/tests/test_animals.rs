//! Animal classification: rules chaining through other rules

use backchain::{KnowledgeBase, Term};

fn animals() -> KnowledgeBase {
    let mut kb = KnowledgeBase::new();
    kb.add_fact("has_feathers", ["tweety"]).unwrap();
    kb.add_fact("can_fly", ["tweety"]).unwrap();
    kb.add_fact("has_fur", ["fido"]).unwrap();
    kb.add_fact("barks", ["fido"]).unwrap();
    kb.add_fact("has_scales", ["nemo"]).unwrap();
    kb.add_fact("swims", ["nemo"]).unwrap();

    kb.add_rule("bird", ["X"], [("has_feathers", ["X"]), ("can_fly", ["X"])]).unwrap();
    kb.add_rule("mammal", ["X"], [("has_fur", ["X"])]).unwrap();
    kb.add_rule("dog", ["X"], [("mammal", ["X"]), ("barks", ["X"])]).unwrap();
    kb.add_rule("fish", ["X"], [("has_scales", ["X"]), ("swims", ["X"])]).unwrap();
    kb.add_rule("warm_blooded", ["X"], [("bird", ["X"])]).unwrap();
    kb.add_rule("warm_blooded", ["X"], [("mammal", ["X"])]).unwrap();
    kb.add_rule("can_move", ["X"], [("bird", ["X"])]).unwrap();
    kb.add_rule("can_move", ["X"], [("mammal", ["X"])]).unwrap();
    kb.add_rule("can_move", ["X"], [("fish", ["X"])]).unwrap();
    kb
}

#[test]
fn test_classification_queries() {
    let kb = animals();
    for (predicate, animal) in [
        ("bird", "tweety"),
        ("dog", "fido"),
        ("fish", "nemo"),
        ("warm_blooded", "tweety"),
        ("warm_blooded", "fido"),
        ("can_move", "nemo"),
    ] {
        let result = kb.query(predicate, [animal]).unwrap();
        assert!(result.is_proven(), "{}({}) should be proven", predicate, animal);
    }

    assert!(!kb.query("warm_blooded", ["nemo"]).unwrap().is_proven());
    assert!(!kb.query("dog", ["tweety"]).unwrap().is_proven());
}

#[test]
fn test_alternative_rules_contribute_in_order() {
    let kb = animals();
    let result = kb.query("can_move", ["What"]).unwrap();
    assert_eq!(
        result.values_of("What"),
        vec![&Term::from("tweety"), &Term::from("fido"), &Term::from("nemo")]
    );
}
