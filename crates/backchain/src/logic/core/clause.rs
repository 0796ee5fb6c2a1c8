//! Clauses: facts and rules

use super::term::{Term, Variable};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Predicate name and arity, the retrieval key for clauses
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PredicateKey {
    pub name: String,
    pub arity: usize,
}

impl PredicateKey {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        PredicateKey {
            name: name.into(),
            arity,
        }
    }
}

/// A Horn clause: `head :- body`.
///
/// A fact is a clause with an empty body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub head: Term,
    pub body: Vec<Term>,
}

impl Clause {
    /// Create an unconditional clause
    pub fn fact(head: Term) -> Self {
        Clause {
            head,
            body: Vec::new(),
        }
    }

    /// Create a clause with a conjunctive body
    pub fn rule(head: Term, body: Vec<Term>) -> Self {
        Clause { head, body }
    }

    pub fn is_fact(&self) -> bool {
        self.body.is_empty()
    }

    pub fn is_rule(&self) -> bool {
        !self.body.is_empty()
    }

    pub fn key(&self) -> Option<PredicateKey> {
        self.head.predicate_key()
    }

    /// All variables of the clause, head first, in order of first occurrence
    pub fn variables(&self) -> Vec<Variable> {
        let mut vars = IndexSet::new();
        self.head.collect_variables(&mut vars);
        for condition in &self.body {
            condition.collect_variables(&mut vars);
        }
        vars.into_iter().collect()
    }

    /// Alpha-rename: stamp every variable with `generation`.
    ///
    /// Variables shared between head and body stay shared because they are
    /// renamed to the same fresh identity.
    pub fn rename(&self, generation: u32) -> Clause {
        Clause {
            head: self.head.renamed(generation),
            body: self.body.iter().map(|t| t.renamed(generation)).collect(),
        }
    }
}

impl fmt::Display for PredicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        if self.body.is_empty() {
            return Ok(());
        }
        write!(f, " :- ")?;
        for (i, condition) in self.body.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", condition)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grandparent() -> Clause {
        Clause::rule(
            Term::compound("grandparent", vec!["X".into(), "Z".into()]),
            vec![
                Term::compound("parent", vec!["X".into(), "Y".into()]),
                Term::compound("parent", vec!["Y".into(), "Z".into()]),
            ],
        )
    }

    #[test]
    fn test_fact_and_rule() {
        let fact = Clause::fact(Term::compound("male", vec!["tom".into()]));
        assert!(fact.is_fact());
        assert!(!fact.is_rule());
        assert!(grandparent().is_rule());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            grandparent().to_string(),
            "grandparent(X, Z) :- parent(X, Y), parent(Y, Z)"
        );
        let fact = Clause::fact(Term::compound("parent", vec!["john".into(), "mary".into()]));
        assert_eq!(fact.to_string(), "parent(john, mary)");
    }

    #[test]
    fn test_rename_keeps_sharing() {
        let renamed = grandparent().rename(3);
        let names: Vec<String> = renamed.variables().iter().map(|v| v.to_string()).collect();
        assert_eq!(names, vec!["X_3", "Z_3", "Y_3"]);
        // Y links the two body conditions in the renamed copy as well
        assert_eq!(renamed.body[0].args()[1], renamed.body[1].args()[0]);
    }

    #[test]
    fn test_key() {
        assert_eq!(grandparent().key(), Some(PredicateKey::new("grandparent", 2)));
        assert_eq!(PredicateKey::new("parent", 2).to_string(), "parent/2");
    }
}
