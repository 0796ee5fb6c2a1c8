//! Backward-chaining proof search.
//!
//! ## Algorithm
//!
//! `prove(goal, subst, depth)` is a depth-first search that collects every
//! solution rather than stopping at the first:
//!
//! 1. Resolve the goal under `subst`. A frame at depth `max_depth` or deeper
//!    fails immediately; this ceiling is the only recursion bound.
//! 2. Retrieve candidate clauses by predicate name and arity, in insertion
//!    order.
//! 3. For each candidate, alpha-rename it with a fresh generation and unify
//!    the goal with its head. A failed match moves on to the next candidate.
//! 4. A unified fact is one solution. A unified rule proves its body left to
//!    right: every solution of condition `i` seeds the proof of condition
//!    `i + 1` one level deeper, and whatever survives the last condition is a
//!    solution of the goal.
//!
//! Substitutions are values, so backtracking to the next candidate simply
//! reuses the substitution the frame was entered with.
//!
//! The search keeps its open goals in `GoalFrame`s on a heap-allocated stack
//! rather than recursing, so a deep ceiling does not need a deep native stack.

mod solution;
mod trace;

pub use solution::{QueryResult, Solution};
pub use trace::{MatchOutcome, Trace, TraceEntry, TraceEvent};

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::knowledge_base::{validate_predicate, KnowledgeBase};
use crate::logic::{unify, Clause, Substitution, SubstitutionError, Term, UnificationError};
use std::collections::HashSet;
use tracing::{debug, info, trace, warn};

/// Backward-chaining engine over a borrowed knowledge base.
///
/// The shared borrow keeps the knowledge base read-only for as long as the
/// engine exists.
pub struct ProofEngine<'kb> {
    kb: &'kb KnowledgeBase,
    config: EngineConfig,
    trace: Trace,
    /// Next generation handed to a renamed clause; 0 is reserved for source variables
    next_generation: u32,
}

impl<'kb> ProofEngine<'kb> {
    pub fn new(kb: &'kb KnowledgeBase) -> Self {
        Self::with_config(kb, EngineConfig::default())
    }

    pub fn with_config(kb: &'kb KnowledgeBase, config: EngineConfig) -> Self {
        ProofEngine {
            kb,
            config,
            trace: Trace::new(),
            next_generation: 1,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Trace accumulated since the last query or `take_trace`
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn take_trace(&mut self) -> Trace {
        std::mem::take(&mut self.trace)
    }

    /// Build `predicate(args)` and prove it from an empty substitution.
    ///
    /// String arguments follow the naming convention, so `"X"` asks for a
    /// binding and `"john"` is a constant.
    pub fn query<I>(&mut self, predicate: &str, args: I) -> Result<QueryResult>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        validate_predicate(predicate)?;
        let goal = Term::compound(predicate, args.into_iter().map(Into::into).collect());
        self.query_goal(&goal)
    }

    /// Prove an already-built goal and project each solution onto the goal's
    /// variables.
    pub fn query_goal(&mut self, goal: &Term) -> Result<QueryResult> {
        self.config.validate()?;
        self.trace = Trace::new();
        self.next_generation = 1;

        debug!(goal = %goal, max_depth = self.config.max_depth, "starting query");

        let query_vars = goal.variables();
        let proofs = self.prove(goal, &Substitution::new(), 0)?;

        let mut solutions: Vec<Solution> = Vec::new();
        let mut seen: HashSet<Vec<Term>> = HashSet::new();
        for subst in &proofs {
            match Solution::project(&query_vars, subst) {
                Ok(solution) => {
                    if self.config.deduplicate {
                        // Every solution binds the same names in the same order
                        let values = solution.iter().map(|(_, term)| term.clone()).collect();
                        if !seen.insert(values) {
                            continue;
                        }
                    }
                    solutions.push(solution);
                }
                Err(e) => {
                    warn!(goal = %goal, error = %e, "dropping solution with unresolvable bindings");
                    self.record(0, TraceEvent::ProjectionFailed { reason: e.to_string() });
                }
            }
        }

        info!(
            goal = %goal,
            proofs = proofs.len(),
            solutions = solutions.len(),
            trace_entries = self.trace.len(),
            "query finished"
        );

        Ok(QueryResult {
            solutions,
            trace: self.take_trace(),
        })
    }

    /// Find every substitution extending `subst` under which `goal` holds.
    ///
    /// Unprovable goals, depth overruns, and cyclic bindings yield an empty
    /// result and a trace record. `Err` is reserved for broken substitution
    /// invariants and an exhausted generation counter.
    ///
    /// Open goals live on an explicit frame stack, so the search depth is
    /// bounded by `max_depth` alone and not by the native call stack.
    pub fn prove(
        &mut self,
        goal: &Term,
        subst: &Substitution,
        depth: usize,
    ) -> Result<Vec<Substitution>> {
        let mut current = match self.enter_goal(goal, subst, depth)? {
            Entered::Done(solutions) => return Ok(solutions),
            Entered::Open(frame) => frame,
        };
        let mut parents: Vec<GoalFrame<'kb>> = Vec::new();

        loop {
            match self.advance(&mut current)? {
                Step::Call { goal, subst, depth } => match self.enter_goal(&goal, &subst, depth)? {
                    Entered::Open(child) => parents.push(std::mem::replace(&mut current, child)),
                    Entered::Done(solutions) => self.resume(&mut current, solutions),
                },
                Step::Return(solutions) => match parents.pop() {
                    Some(parent) => {
                        current = parent;
                        self.resume(&mut current, solutions);
                    }
                    None => return Ok(solutions),
                },
            }
        }
    }

    /// Resolve a goal and open a frame for it, unless it fails outright
    fn enter_goal(
        &mut self,
        goal: &Term,
        subst: &Substitution,
        depth: usize,
    ) -> Result<Entered<'kb>> {
        let goal = match subst.apply(goal) {
            Ok(resolved) => resolved,
            Err(e) => return self.fail_on_binding(goal, e, depth),
        };

        if depth >= self.config.max_depth {
            warn!(goal = %goal, depth, "depth limit reached");
            self.record(
                depth,
                TraceEvent::DepthExceeded {
                    goal,
                    limit: self.config.max_depth,
                },
            );
            return Ok(Entered::Done(Vec::new()));
        }

        self.record(depth, TraceEvent::GoalEntered { goal: goal.clone() });

        if !goal.is_compound() {
            self.record(depth, TraceEvent::GoalNotCallable { goal });
            return Ok(Entered::Done(Vec::new()));
        }

        let kb = self.kb;
        let candidates: Vec<&'kb Clause> = kb.matching_clauses(&goal).collect();
        Ok(Entered::Open(GoalFrame {
            goal,
            subst: subst.clone(),
            depth,
            candidates: candidates.into_iter(),
            solutions: Vec::new(),
            body: None,
        }))
    }

    /// Run `frame` until it needs a subgoal proven or has no candidates left
    fn advance(&mut self, frame: &mut GoalFrame<'kb>) -> Result<Step> {
        loop {
            if let Some(body) = frame.body.as_mut() {
                if let Some(call) = self.next_subgoal(body, &mut frame.solutions) {
                    return Ok(call);
                }
                frame.body = None;
            }

            let Some(clause) = frame.candidates.next() else {
                return Ok(Step::Return(self.close(frame)));
            };
            let generation = self.fresh_generation()?;
            let renamed = clause.rename(generation);
            let depth = frame.depth;
            let goal = &frame.goal;

            let unified = match unify(goal, &renamed.head, &frame.subst) {
                Ok(unified) => unified,
                Err(UnificationError::Substitution(
                    e @ SubstitutionError::InconsistentBinding { .. },
                )) => {
                    return Err(Error::Internal(e));
                }
                Err(e) => {
                    if matches!(e, UnificationError::Substitution(_)) {
                        warn!(
                            goal = %goal,
                            clause = %renamed,
                            error = %e,
                            "cyclic binding during unification"
                        );
                    } else {
                        trace!(
                            goal = %goal,
                            clause = %renamed,
                            error = %e,
                            "clause head does not match"
                        );
                    }
                    self.record(
                        depth,
                        TraceEvent::ClauseTried {
                            clause: renamed,
                            outcome: MatchOutcome::Failed {
                                reason: e.to_string(),
                            },
                        },
                    );
                    continue;
                }
            };

            trace!(goal = %goal, clause = %renamed, "clause head unified");

            if renamed.is_fact() {
                let goal = goal.clone();
                self.record(
                    depth,
                    TraceEvent::ClauseTried {
                        clause: renamed,
                        outcome: MatchOutcome::Unified,
                    },
                );
                self.record(depth, TraceEvent::FactProven { goal });
                frame.solutions.push(unified);
                continue;
            }

            self.record(
                depth,
                TraceEvent::ClauseTried {
                    clause: renamed.clone(),
                    outcome: MatchOutcome::Unified,
                },
            );
            self.record(
                depth,
                TraceEvent::BodyEntered {
                    conditions: renamed.body.len(),
                },
            );
            let mut body = BodyState {
                conditions: renamed.body,
                depth: depth + 1,
                pending: Vec::new(),
            };
            let call = self.enter_condition(&mut body, unified, &mut frame.solutions);
            frame.body = Some(body);
            if let Some(call) = call {
                return Ok(call);
            }
        }
    }

    /// Next body condition to prove, taking partial solutions depth-first.
    /// `None` once every partial solution has been carried through the body.
    fn next_subgoal(
        &mut self,
        body: &mut BodyState,
        solutions: &mut Vec<Substitution>,
    ) -> Option<Step> {
        while let Some(partials) = body.pending.last_mut() {
            match partials.next() {
                Some(subst) => {
                    if let Some(call) = self.enter_condition(body, subst, solutions) {
                        return Some(call);
                    }
                }
                None => {
                    body.pending.pop();
                }
            }
        }
        None
    }

    /// Start condition `body.pending.len()` under `subst`; past the last
    /// condition `subst` is a solution of the rule.
    fn enter_condition(
        &mut self,
        body: &mut BodyState,
        subst: Substitution,
        solutions: &mut Vec<Substitution>,
    ) -> Option<Step> {
        let position = body.pending.len();
        let Some(goal) = body.conditions.get(position) else {
            solutions.push(subst);
            return None;
        };

        if self.config.record_trace {
            let shown = subst.apply(goal).unwrap_or_else(|_| goal.clone());
            self.record(
                body.depth,
                TraceEvent::SubgoalEntered {
                    index: position + 1,
                    total: body.conditions.len(),
                    goal: shown,
                },
            );
        }

        Some(Step::Call {
            goal: goal.clone(),
            subst,
            depth: body.depth,
        })
    }

    /// Hand a finished subgoal's solutions back to the frame that asked for it
    fn resume(&mut self, frame: &mut GoalFrame<'kb>, partial: Vec<Substitution>) {
        let Some(body) = frame.body.as_mut() else {
            return;
        };
        self.record(
            body.depth,
            TraceEvent::SubgoalExited {
                index: body.pending.len() + 1,
                total: body.conditions.len(),
                solutions: partial.len(),
            },
        );
        body.pending.push(partial.into_iter());
    }

    fn close(&mut self, frame: &mut GoalFrame<'kb>) -> Vec<Substitution> {
        let solutions = std::mem::take(&mut frame.solutions);
        let goal = frame.goal.clone();
        if solutions.is_empty() {
            self.record(frame.depth, TraceEvent::GoalFailed { goal });
        } else {
            self.record(
                frame.depth,
                TraceEvent::GoalProven {
                    goal,
                    solutions: solutions.len(),
                },
            );
        }
        solutions
    }

    fn fail_on_binding(
        &mut self,
        goal: &Term,
        error: SubstitutionError,
        depth: usize,
    ) -> Result<Entered<'kb>> {
        match error {
            SubstitutionError::InconsistentBinding { .. } => Err(Error::Internal(error)),
            SubstitutionError::CyclicBinding { .. } => {
                warn!(goal = %goal, error = %error, "cyclic binding while resolving goal");
                self.record(
                    depth,
                    TraceEvent::GoalUnresolvable {
                        goal: goal.clone(),
                        reason: error.to_string(),
                    },
                );
                Ok(Entered::Done(Vec::new()))
            }
        }
    }

    fn fresh_generation(&mut self) -> Result<u32> {
        let generation = self.next_generation;
        self.next_generation = generation
            .checked_add(1)
            .ok_or(Error::GenerationOverflow)?;
        Ok(generation)
    }

    fn record(&mut self, depth: usize, event: TraceEvent) {
        if self.config.record_trace {
            self.trace.push(depth, event);
        }
    }
}

/// Outcome of entering a goal
enum Entered<'kb> {
    Done(Vec<Substitution>),
    Open(GoalFrame<'kb>),
}

/// What an open frame needs next
enum Step {
    Call {
        goal: Term,
        subst: Substitution,
        depth: usize,
    },
    Return(Vec<Substitution>),
}

/// A goal whose candidate clauses are still being tried
struct GoalFrame<'kb> {
    goal: Term,
    /// Substitution the goal was entered with; every candidate starts from it
    subst: Substitution,
    depth: usize,
    candidates: std::vec::IntoIter<&'kb Clause>,
    solutions: Vec<Substitution>,
    /// Body of the rule currently being proven
    body: Option<BodyState>,
}

/// Conjunction in progress. `pending[i]` holds the not yet continued
/// solutions of condition `i`.
struct BodyState {
    conditions: Vec<Term>,
    depth: usize,
    pending: Vec<std::vec::IntoIter<Substitution>>,
}
