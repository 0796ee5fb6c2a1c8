//! Query answers projected onto the caller's variables

use super::trace::Trace;
use crate::logic::{Substitution, SubstitutionError, Term, Variable};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bindings of the query's variables for one proof, in order of first
/// occurrence in the query. Empty for a fully ground query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solution {
    bindings: IndexMap<String, Term>,
}

impl Solution {
    /// Restrict `subst` to `query_vars`, fully resolving each binding
    pub(crate) fn project(
        query_vars: &[Variable],
        subst: &Substitution,
    ) -> Result<Self, SubstitutionError> {
        let mut bindings = IndexMap::new();
        for var in query_vars {
            let value = subst.apply(&Term::Variable(var.clone()))?;
            bindings.insert(var.to_string(), value);
        }
        Ok(Solution { bindings })
    }

    pub fn get(&self, name: &str) -> Option<&Term> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_bindings(self) -> IndexMap<String, Term> {
        self.bindings
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bindings.is_empty() {
            return write!(f, "True");
        }
        write!(f, "{{")?;
        for (i, (name, term)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, term)?;
        }
        write!(f, "}}")
    }
}

/// Answer to a query: every distinct solution plus the search trace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub solutions: Vec<Solution>,
    pub trace: Trace,
}

impl QueryResult {
    pub fn is_proven(&self) -> bool {
        !self.solutions.is_empty()
    }

    /// Values bound to `name` across all solutions, in solution order
    pub fn values_of(&self, name: &str) -> Vec<&Term> {
        self.solutions.iter().filter_map(|s| s.get(name)).collect()
    }
}
