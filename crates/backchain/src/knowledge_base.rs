//! Clause storage indexed by predicate name and arity.
//!
//! Clauses are kept in insertion order. The index maps each
//! `PredicateKey` to the positions of its clauses, so retrieval preserves
//! first-defined, first-tried order and the search trace is reproducible.

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::logic::{is_variable_name, Clause, PredicateKey, Term};
use crate::prover::{ProofEngine, QueryResult};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;

/// An ordered collection of facts and rules
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    clauses: Vec<Clause>,
    /// Clause positions per predicate, keys in first-insertion order
    index: IndexMap<PredicateKey, Vec<usize>>,
    /// Ground facts for membership checks
    ground_facts: HashSet<Term>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        KnowledgeBase::default()
    }

    /// Add a fact. String arguments follow the naming convention, so an
    /// uppercase name makes the fact hold for any value in that position.
    pub fn add_fact<I>(&mut self, predicate: &str, args: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        let head = Term::compound(predicate, args.into_iter().map(Into::into).collect());
        self.add_clause(Clause::fact(head))
    }

    /// Add a rule `predicate(head_args) :- body`.
    ///
    /// Each body condition is a `(predicate, args)` pair. Variable names are
    /// shared across the head and body of this rule only.
    pub fn add_rule<H, B, P, A>(&mut self, predicate: &str, head_args: H, body: B) -> Result<()>
    where
        H: IntoIterator,
        H::Item: Into<Term>,
        B: IntoIterator<Item = (P, A)>,
        P: AsRef<str>,
        A: IntoIterator,
        A::Item: Into<Term>,
    {
        let head = Term::compound(predicate, head_args.into_iter().map(Into::into).collect());
        let body: Vec<Term> = body
            .into_iter()
            .map(|(p, args)| Term::compound(p.as_ref(), args.into_iter().map(Into::into).collect()))
            .collect();
        if body.is_empty() {
            return Err(Error::MalformedClause(format!(
                "rule {} has no body conditions; add it as a fact",
                head
            )));
        }
        self.add_clause(Clause::rule(head, body))
    }

    /// Add a prebuilt clause, e.g. one with nested compound arguments
    pub fn add_clause(&mut self, clause: Clause) -> Result<()> {
        let key = match &clause.head {
            Term::Compound(c) => {
                validate_predicate(&c.functor)?;
                c.key()
            }
            other => {
                return Err(Error::MalformedClause(format!(
                    "clause head {} is not a predicate",
                    other
                )))
            }
        };
        for condition in &clause.body {
            match condition {
                Term::Compound(c) => validate_predicate(&c.functor)?,
                other => {
                    return Err(Error::MalformedClause(format!(
                        "body condition {} of {} is not a predicate",
                        other, clause.head
                    )))
                }
            }
        }

        if clause.is_fact() && clause.head.is_ground() {
            self.ground_facts.insert(clause.head.clone());
        }
        self.index.entry(key).or_default().push(self.clauses.len());
        self.clauses.push(clause);
        Ok(())
    }

    /// Every clause whose head has the goal's predicate name and arity, in
    /// insertion order. Full unification is left to the caller.
    pub fn matching_clauses<'a>(&'a self, goal: &Term) -> impl Iterator<Item = &'a Clause> + 'a {
        let positions: &'a [usize] = goal
            .predicate_key()
            .and_then(|key| self.index.get(&key))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        positions.iter().map(move |&i| &self.clauses[i])
    }

    /// True if `fact` was stored verbatim as a ground fact
    pub fn contains_fact(&self, fact: &Term) -> bool {
        self.ground_facts.contains(fact)
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn facts(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter().filter(|c| c.is_fact())
    }

    pub fn rules(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter().filter(|c| c.is_rule())
    }

    /// Stored predicates in order of first definition
    pub fn predicates(&self) -> impl Iterator<Item = &PredicateKey> {
        self.index.keys()
    }

    /// Run a query with the default engine configuration
    pub fn query<I>(&self, predicate: &str, args: I) -> Result<QueryResult>
    where
        I: IntoIterator,
        I::Item: Into<Term>,
    {
        ProofEngine::with_config(self, EngineConfig::default()).query(predicate, args)
    }
}

/// Predicate names must be non-empty and must not look like variables
pub(crate) fn validate_predicate(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidPredicate(name.to_string(), "name is empty"));
    }
    if is_variable_name(name) {
        return Err(Error::InvalidPredicate(
            name.to_string(),
            "name is variable-shaped",
        ));
    }
    Ok(())
}

impl fmt::Display for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Facts:")?;
        for clause in self.facts() {
            writeln!(f, "  {}", clause)?;
        }
        writeln!(f, "Rules:")?;
        for clause in self.rules() {
            writeln!(f, "  {}", clause)?;
        }
        Ok(())
    }
}
