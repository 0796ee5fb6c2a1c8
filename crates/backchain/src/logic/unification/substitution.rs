//! Variable substitutions
//!
//! Bindings are stored in triangular form: a variable may be bound to a term
//! that mentions other bound variables, and `apply` chases those chains to a
//! fixed point. Substitutions are values: extending one yields a new
//! substitution and leaves the original untouched, so backtracking needs no
//! undo log.

use crate::logic::core::term::{Compound, Term, Variable};
use indexmap::IndexMap;
use std::fmt;
use thiserror::Error;

/// Errors raised while building or dereferencing a substitution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstitutionError {
    /// Chain-following revisited a variable; only reachable without an occurs check
    #[error("cyclic binding while dereferencing {variable}")]
    CyclicBinding { variable: Variable },
    /// The variable is already bound to something else
    #[error("{variable} is already bound to {existing}, cannot bind it to {proposed}")]
    InconsistentBinding {
        variable: Variable,
        existing: Term,
        proposed: Term,
    },
}

/// A substitution mapping variables to terms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    map: IndexMap<Variable, Term>,
}

impl Substitution {
    /// The identity substitution
    pub fn new() -> Self {
        Substitution {
            map: IndexMap::new(),
        }
    }

    /// The identity substitution
    pub fn empty() -> Self {
        Self::new()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Direct binding of `var`, without chasing chains
    pub fn get(&self, var: &Variable) -> Option<&Term> {
        self.map.get(var)
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.map.contains_key(var)
    }

    /// Bindings in the order they were made
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.map.iter()
    }

    /// Return a new substitution extending this one with `var -> term`.
    ///
    /// Rebinding a variable to the identical term is a no-op; rebinding it to
    /// anything else is an `InconsistentBinding`.
    pub fn bind(&self, var: Variable, term: Term) -> Result<Substitution, SubstitutionError> {
        let mut extended = self.clone();
        extended.insert(var, term)?;
        Ok(extended)
    }

    /// In-place counterpart of `bind`, used on private working copies
    pub(crate) fn insert(&mut self, var: Variable, term: Term) -> Result<(), SubstitutionError> {
        if let Some(existing) = self.map.get(&var) {
            if *existing == term {
                return Ok(());
            }
            return Err(SubstitutionError::InconsistentBinding {
                variable: var,
                existing: existing.clone(),
                proposed: term,
            });
        }
        self.map.insert(var, term);
        Ok(())
    }

    /// Apply this substitution to `term`, following chained bindings until no
    /// bound variable remains.
    ///
    /// Nested dereferences along one path are bounded by the number of bound
    /// variables; exceeding that means the path revisited a variable.
    pub fn apply(&self, term: &Term) -> Result<Term, SubstitutionError> {
        self.apply_within(term, self.map.len())
    }

    fn apply_within(&self, term: &Term, mut budget: usize) -> Result<Term, SubstitutionError> {
        // Variable chains are followed in a loop; only compound arguments recurse
        let mut current = term;
        while let Term::Variable(v) = current {
            match self.map.get(v) {
                None => return Ok(current.clone()),
                Some(_) if budget == 0 => {
                    return Err(SubstitutionError::CyclicBinding {
                        variable: v.clone(),
                    })
                }
                Some(bound) => {
                    current = bound;
                    budget -= 1;
                }
            }
        }

        match current {
            Term::Compound(c) => {
                let args = c
                    .args
                    .iter()
                    .map(|arg| self.apply_within(arg, budget))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Term::Compound(Compound {
                    functor: c.functor.clone(),
                    args,
                }))
            }
            _ => Ok(current.clone()),
        }
    }

    /// Compose left-to-right: applying the result equals applying `self`
    /// and then `other`.
    pub fn compose(&self, other: &Substitution) -> Result<Substitution, SubstitutionError> {
        let mut result = Substitution::new();

        // Resolve self's own chains first, then push the result through other
        for var in self.map.keys() {
            let resolved = self.apply(&Term::Variable(var.clone()))?;
            result.map.insert(var.clone(), other.apply(&resolved)?);
        }

        for (var, term) in &other.map {
            if !self.map.contains_key(var) {
                result.map.insert(var.clone(), term.clone());
            }
        }

        Ok(result)
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, term)) in self.map.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", var, term)?;
        }
        write!(f, "}}")
    }
}
