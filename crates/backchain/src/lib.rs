//! Backchain: goal-directed inference over first-order Horn clauses
//!
//! A knowledge base of facts and rules is built through structured calls and
//! queried by backward chaining. A query returns every distinct set of
//! bindings for its variables together with a readable trace of the search.
//!
//! ```
//! use backchain::KnowledgeBase;
//!
//! let mut kb = KnowledgeBase::new();
//! kb.add_fact("parent", ["john", "mary"]).unwrap();
//! kb.add_fact("parent", ["mary", "alice"]).unwrap();
//! kb.add_rule(
//!     "grandparent",
//!     ["X", "Z"],
//!     [("parent", ["X", "Y"]), ("parent", ["Y", "Z"])],
//! )
//! .unwrap();
//!
//! let result = kb.query("grandparent", ["john", "Who"]).unwrap();
//! assert_eq!(result.solutions[0].to_string(), "{Who: alice}");
//! ```

pub mod config;
pub mod error;
pub mod json;
pub mod knowledge_base;
pub mod logic;
pub mod prover;

pub use config::{EngineConfig, DEFAULT_MAX_DEPTH};
pub use error::{Error, Result};
pub use json::{QueryResultJson, TermJson};
pub use knowledge_base::KnowledgeBase;

// Re-export commonly used types from logic
pub use logic::{
    is_variable_name, unify, Clause, Compound, PredicateKey, Substitution, SubstitutionError,
    Term, UnificationError, UnificationResult, Value, Variable,
};

pub use prover::{MatchOutcome, ProofEngine, QueryResult, Solution, Trace, TraceEntry, TraceEvent};
