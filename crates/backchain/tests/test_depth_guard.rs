//! Termination: the depth ceiling bounds runaway recursion

use backchain::{EngineConfig, KnowledgeBase, ProofEngine, TraceEvent};

fn chain() -> KnowledgeBase {
    let mut kb = KnowledgeBase::new();
    kb.add_fact("parent", ["a", "b"]).unwrap();
    kb.add_fact("parent", ["b", "c"]).unwrap();
    kb.add_fact("parent", ["c", "d"]).unwrap();
    kb.add_rule("ancestor", ["X", "Y"], [("parent", ["X", "Y"])]).unwrap();
    kb.add_rule("ancestor", ["X", "Y"], [("parent", ["X", "Z"]), ("ancestor", ["Z", "Y"])])
        .unwrap();
    kb
}

fn depth_exceeded(events: &backchain::Trace) -> usize {
    events
        .iter()
        .filter(|e| matches!(e.event, TraceEvent::DepthExceeded { .. }))
        .count()
}

#[test]
fn test_recursive_rule_terminates_well_under_ceiling() {
    let kb = chain();
    let result = kb.query("ancestor", ["a", "d"]).unwrap();
    assert_eq!(result.solutions.len(), 1);
    assert_eq!(depth_exceeded(&result.trace), 0);

    let deepest = result.trace.iter().map(|e| e.depth).max().unwrap();
    assert!(deepest < 10, "search went {} frames deep", deepest);
}

#[test]
fn test_reverse_query_fails_with_only_failures() {
    let kb = chain();
    let result = kb.query("ancestor", ["d", "a"]).unwrap();
    assert!(!result.is_proven());
    assert!(result.trace.iter().all(|e| !e.event.is_success()));
    assert_eq!(depth_exceeded(&result.trace), 0);
    assert_eq!(
        result.trace.lines().last().unwrap(),
        "✗ Cannot prove: ancestor(d, a)"
    );
}

#[test]
fn test_cyclic_rule_stops_at_ceiling() {
    let mut kb = KnowledgeBase::new();
    kb.add_rule("loop", ["X"], [("loop", ["X"])]).unwrap();

    let mut engine = ProofEngine::with_config(&kb, EngineConfig::default().with_max_depth(20));
    let result = engine.query("loop", ["a"]).unwrap();
    assert!(!result.is_proven());
    assert_eq!(result.trace.clause_attempts(), 20);
    assert_eq!(depth_exceeded(&result.trace), 1);
}

#[test]
fn test_cyclic_rule_with_default_ceiling() {
    let mut kb = KnowledgeBase::new();
    kb.add_rule("loop", ["X"], [("loop", ["X"])]).unwrap();

    let result = kb.query("loop", ["a"]).unwrap();
    assert!(!result.is_proven());
    assert_eq!(result.trace.clause_attempts(), backchain::DEFAULT_MAX_DEPTH);
    assert_eq!(depth_exceeded(&result.trace), 1);
}

#[test]
fn test_default_ceiling_on_spawned_thread() {
    let attempts = std::thread::spawn(|| {
        let mut kb = KnowledgeBase::new();
        kb.add_rule("loop", ["X"], [("loop", ["X"])]).unwrap();
        kb.query("loop", ["Y"]).unwrap().trace.clause_attempts()
    })
    .join()
    .unwrap();
    assert_eq!(attempts, backchain::DEFAULT_MAX_DEPTH);
}

#[test]
fn test_sibling_branches_complete_after_overrun() {
    // The looping clause comes first; the fact after it must still be found
    let mut kb = KnowledgeBase::new();
    kb.add_rule("p", ["X"], [("p", ["X"])]).unwrap();
    kb.add_fact("p", ["a"]).unwrap();

    let config = EngineConfig::default().with_max_depth(5);
    let mut engine = ProofEngine::with_config(&kb, config.clone());
    let result = engine.query("p", ["Y"]).unwrap();
    assert_eq!(result.values_of("Y").len(), 1);
    assert_eq!(depth_exceeded(&result.trace), 1);

    // One copy of the fact's answer per frame level before deduplication
    let mut engine = ProofEngine::with_config(&kb, config.with_deduplicate(false));
    let result = engine.query("p", ["Y"]).unwrap();
    assert_eq!(result.solutions.len(), 5);
}

#[test]
fn test_left_recursion_is_bounded() {
    let mut kb = KnowledgeBase::new();
    kb.add_fact("edge", ["a", "b"]).unwrap();
    kb.add_rule("path", ["X", "Y"], [("path", ["X", "Z"]), ("edge", ["Z", "Y"])]).unwrap();
    kb.add_rule("path", ["X", "Y"], [("edge", ["X", "Y"])]).unwrap();

    let mut engine = ProofEngine::with_config(&kb, EngineConfig::default().with_max_depth(8));
    let result = engine.query("path", ["a", "b"]).unwrap();
    assert!(result.is_proven());
    assert!(depth_exceeded(&result.trace) >= 1);
}
