//! JSON serialization types for query results

use crate::error::Result;
use crate::logic::{Term, Value};
use crate::prover::QueryResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// JSON representation of a term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TermJson {
    Variable { name: String },
    Constant { value: Value },
    Compound { functor: String, args: Vec<TermJson> },
}

impl TermJson {
    pub fn from_term(term: &Term) -> Self {
        match term {
            Term::Variable(v) => TermJson::Variable {
                name: v.to_string(),
            },
            Term::Constant(c) => TermJson::Constant { value: c.clone() },
            Term::Compound(c) => TermJson::Compound {
                functor: c.functor.clone(),
                args: c.args.iter().map(TermJson::from_term).collect(),
            },
        }
    }
}

/// JSON representation of a query answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResultJson {
    pub proven: bool,
    pub solutions: Vec<IndexMap<String, TermJson>>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub trace: Vec<String>,
}

impl QueryResult {
    /// Convert to JSON representation
    pub fn to_json(&self) -> QueryResultJson {
        QueryResultJson {
            proven: self.is_proven(),
            solutions: self
                .solutions
                .iter()
                .map(|s| {
                    s.iter()
                        .map(|(name, term)| (name.to_string(), TermJson::from_term(term)))
                        .collect()
                })
                .collect(),
            trace: self.trace.lines(),
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_json_shape() {
        let term = Term::compound("age", vec!["alice".into(), 30.into(), "X".into()]);
        let json = serde_json::to_value(TermJson::from_term(&term)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "Compound",
                "functor": "age",
                "args": [
                    { "type": "Constant", "value": "alice" },
                    { "type": "Constant", "value": 30 },
                    { "type": "Variable", "name": "X" }
                ]
            })
        );
    }

    #[test]
    fn test_term_json_round_trip() {
        let term = Term::compound("flag", vec![true.into()]);
        let json = serde_json::to_string(&TermJson::from_term(&term)).unwrap();
        let back: TermJson = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TermJson::from_term(&term));
    }
}
