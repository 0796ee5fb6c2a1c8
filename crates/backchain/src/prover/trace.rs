//! Search trace: an append-only, depth-annotated log of proof attempts.
//!
//! The trace is a side record of the search. Entries are appended in
//! depth-first order and never read back by the engine.

use crate::logic::{Clause, Term};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of matching a goal against one candidate clause head
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    Unified,
    Failed { reason: String },
}

/// A single step of the search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceEvent {
    GoalEntered { goal: Term },
    ClauseTried { clause: Clause, outcome: MatchOutcome },
    FactProven { goal: Term },
    BodyEntered { conditions: usize },
    SubgoalEntered { index: usize, total: usize, goal: Term },
    SubgoalExited { index: usize, total: usize, solutions: usize },
    GoalProven { goal: Term, solutions: usize },
    GoalFailed { goal: Term },
    DepthExceeded { goal: Term, limit: usize },
    GoalNotCallable { goal: Term },
    /// The goal could not be dereferenced under the current bindings
    GoalUnresolvable { goal: Term, reason: String },
    /// A complete solution was dropped while projecting query bindings
    ProjectionFailed { reason: String },
}

impl TraceEvent {
    pub fn is_clause_attempt(&self) -> bool {
        matches!(self, TraceEvent::ClauseTried { .. })
    }

    /// True for events that report a failure of some kind
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TraceEvent::ClauseTried {
                outcome: MatchOutcome::Failed { .. },
                ..
            } | TraceEvent::GoalFailed { .. }
                | TraceEvent::DepthExceeded { .. }
                | TraceEvent::GoalNotCallable { .. }
                | TraceEvent::GoalUnresolvable { .. }
                | TraceEvent::ProjectionFailed { .. }
        )
    }

    /// True for events that report a proven goal
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            TraceEvent::FactProven { .. } | TraceEvent::GoalProven { .. }
        )
    }
}

/// A trace event at its search depth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub depth: usize,
    pub event: TraceEvent,
}

/// Ordered record of a query's search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Trace::default()
    }

    pub fn push(&mut self, depth: usize, event: TraceEvent) {
        self.entries.push(TraceEntry { depth, event });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceEntry> {
        self.entries.iter()
    }

    /// Number of clause heads the search tried to unify with
    pub fn clause_attempts(&self) -> usize {
        self.entries.iter().filter(|e| e.event.is_clause_attempt()).count()
    }

    /// Rendered, indented lines in search order
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.to_string()).collect()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a TraceEntry;
    type IntoIter = std::slice::Iter<'a, TraceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::GoalEntered { goal } => write!(f, "Trying to prove: {}", goal),
            TraceEvent::ClauseTried {
                clause,
                outcome: MatchOutcome::Unified,
            } => write!(f, "Unified with: {}", clause),
            TraceEvent::ClauseTried {
                clause,
                outcome: MatchOutcome::Failed { reason },
            } => write!(f, "No match with: {} ({})", clause, reason),
            TraceEvent::FactProven { goal } => write!(f, "✓ Fact proven: {}", goal),
            TraceEvent::BodyEntered { conditions } => {
                write!(f, "Proving {} body condition(s)...", conditions)
            }
            TraceEvent::SubgoalEntered { index, total, goal } => {
                write!(f, "Subgoal {}/{}: {}", index, total, goal)
            }
            TraceEvent::SubgoalExited {
                index,
                total,
                solutions,
            } => write!(f, "Subgoal {}/{} yielded {} solution(s)", index, total, solutions),
            TraceEvent::GoalProven { goal, solutions } => {
                write!(f, "✓ Proven: {} ({} solution(s))", goal, solutions)
            }
            TraceEvent::GoalFailed { goal } => write!(f, "✗ Cannot prove: {}", goal),
            TraceEvent::DepthExceeded { goal, limit } => {
                write!(f, "✗ Depth limit {} reached at: {}", limit, goal)
            }
            TraceEvent::GoalNotCallable { goal } => write!(f, "✗ Not a callable goal: {}", goal),
            TraceEvent::GoalUnresolvable { goal, reason } => {
                write!(f, "✗ Cannot resolve goal {}: {}", goal, reason)
            }
            TraceEvent::ProjectionFailed { reason } => {
                write!(f, "✗ Solution dropped: {}", reason)
            }
        }
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", "  ".repeat(self.depth), self.event)
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indented_lines() {
        let mut trace = Trace::new();
        let goal = Term::compound("male", vec!["tom".into()]);
        trace.push(0, TraceEvent::GoalEntered { goal: goal.clone() });
        trace.push(
            1,
            TraceEvent::ClauseTried {
                clause: Clause::fact(goal.clone()),
                outcome: MatchOutcome::Unified,
            },
        );
        trace.push(1, TraceEvent::FactProven { goal });
        assert_eq!(
            trace.lines(),
            vec![
                "Trying to prove: male(tom)",
                "  Unified with: male(tom)",
                "  ✓ Fact proven: male(tom)",
            ]
        );
        assert_eq!(trace.clause_attempts(), 1);
    }

    #[test]
    fn test_failure_classification() {
        let goal = Term::compound("p", vec![]);
        assert!(TraceEvent::GoalFailed { goal: goal.clone() }.is_failure());
        assert!(TraceEvent::DepthExceeded { goal: goal.clone(), limit: 3 }.is_failure());
        assert!(!TraceEvent::GoalEntered { goal: goal.clone() }.is_failure());
        assert!(TraceEvent::GoalProven { goal, solutions: 1 }.is_success());
    }
}
