//! Terms: constants, variables, and compound expressions

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::clause::PredicateKey;

/// Returns true if `name` is variable-shaped (leading uppercase letter).
pub fn is_variable_name(name: &str) -> bool {
    name.chars().next().map_or(false, char::is_uppercase)
}

/// A primitive constant value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl Value {
    /// The string payload, if this is a string constant
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// A logical variable.
///
/// `generation` 0 is reserved for variables written by the caller (query
/// arguments and clauses as stored). Every clause instantiation during search
/// receives a fresh generation, so two uses of the same rule never share
/// variables even though their names are spelled identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub generation: u32,
}

impl Variable {
    /// Create a source variable (generation 0)
    pub fn new(name: impl Into<String>) -> Self {
        Variable {
            name: name.into(),
            generation: 0,
        }
    }

    /// The same variable stamped with another generation
    pub fn renamed(&self, generation: u32) -> Self {
        Variable {
            name: self.name.clone(),
            generation,
        }
    }

    /// True for variables that came from the caller rather than a renaming
    pub fn is_source(&self) -> bool {
        self.generation == 0
    }
}

/// A functor applied to an ordered argument list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Compound {
    pub functor: String,
    pub args: Vec<Term>,
}

impl Compound {
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn key(&self) -> PredicateKey {
        PredicateKey::new(self.functor.clone(), self.args.len())
    }
}

/// A term in the logic
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    Constant(Value),
    Variable(Variable),
    Compound(Compound),
}

impl Term {
    pub fn constant(value: impl Into<Value>) -> Self {
        Term::Constant(value.into())
    }

    /// Build a variable. The name is taken as-is; use `Term::from(&str)` to
    /// classify by the naming convention instead.
    pub fn var(name: impl Into<String>) -> Self {
        Term::Variable(Variable::new(name))
    }

    pub fn compound(functor: impl Into<String>, args: Vec<Term>) -> Self {
        Term::Compound(Compound {
            functor: functor.into(),
            args,
        })
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Term::Constant(_))
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, Term::Compound(_))
    }

    /// Functor name of a compound term
    pub fn functor(&self) -> Option<&str> {
        match self {
            Term::Compound(c) => Some(&c.functor),
            _ => None,
        }
    }

    /// Number of arguments (0 for constants and variables)
    pub fn arity(&self) -> usize {
        match self {
            Term::Compound(c) => c.arity(),
            _ => 0,
        }
    }

    pub fn args(&self) -> &[Term] {
        match self {
            Term::Compound(c) => &c.args,
            _ => &[],
        }
    }

    /// Index key of a compound term; `None` for anything that cannot be a goal
    pub fn predicate_key(&self) -> Option<PredicateKey> {
        match self {
            Term::Compound(c) => Some(c.key()),
            _ => None,
        }
    }

    /// All variables in this term, in order of first occurrence
    pub fn variables(&self) -> Vec<Variable> {
        let mut vars = IndexSet::new();
        self.collect_variables(&mut vars);
        vars.into_iter().collect()
    }

    /// Collect all variables in this term
    pub fn collect_variables(&self, vars: &mut IndexSet<Variable>) {
        match self {
            Term::Variable(v) => {
                vars.insert(v.clone());
            }
            Term::Constant(_) => {}
            Term::Compound(c) => {
                for arg in &c.args {
                    arg.collect_variables(vars);
                }
            }
        }
    }

    /// True if no variable occurs in the term
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Constant(_) => true,
            Term::Compound(c) => c.args.iter().all(Term::is_ground),
        }
    }

    /// Copy of this term with every variable stamped with `generation`
    pub fn renamed(&self, generation: u32) -> Term {
        match self {
            Term::Variable(v) => Term::Variable(v.renamed(generation)),
            Term::Constant(_) => self.clone(),
            Term::Compound(c) => Term::Compound(Compound {
                functor: c.functor.clone(),
                args: c.args.iter().map(|arg| arg.renamed(generation)).collect(),
            }),
        }
    }
}

/// Classifies by the naming convention: a leading uppercase letter makes a
/// variable, anything else a string constant.
impl From<&str> for Term {
    fn from(name: &str) -> Self {
        if is_variable_name(name) {
            Term::var(name)
        } else {
            Term::Constant(Value::from(name))
        }
    }
}

impl From<String> for Term {
    fn from(name: String) -> Self {
        if is_variable_name(&name) {
            Term::var(name)
        } else {
            Term::Constant(Value::Str(name))
        }
    }
}

impl From<&String> for Term {
    fn from(name: &String) -> Self {
        Term::from(name.as_str())
    }
}

impl From<i64> for Term {
    fn from(n: i64) -> Self {
        Term::Constant(Value::Int(n))
    }
}

impl From<i32> for Term {
    fn from(n: i32) -> Self {
        Term::Constant(Value::from(n))
    }
}

impl From<bool> for Term {
    fn from(b: bool) -> Self {
        Term::Constant(Value::Bool(b))
    }
}

impl From<Value> for Term {
    fn from(value: Value) -> Self {
        Term::Constant(value)
    }
}

impl From<Variable> for Term {
    fn from(var: Variable) -> Self {
        Term::Variable(var)
    }
}

impl From<Compound> for Term {
    fn from(compound: Compound) -> Self {
        Term::Compound(compound)
    }
}

// Display implementations for pretty printing

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}_{}", self.name, self.generation)
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            return write!(f, "{}", self.functor);
        }
        write!(f, "{}(", self.functor)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(c) => write!(f, "{}", c),
            Term::Variable(v) => write!(f, "{}", v),
            Term::Compound(c) => write!(f, "{}", c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_by_name() {
        assert!(Term::from("X").is_variable());
        assert!(Term::from("Who").is_variable());
        assert!(Term::from("john").is_constant());
        assert!(Term::from("_x").is_constant());
        assert!(Term::from("").is_constant());
        assert!(Term::from(42).is_constant());
        assert!(Term::from(true).is_constant());
    }

    #[test]
    fn test_compound_arity_and_key() {
        let t = Term::compound("parent", vec!["john".into(), "X".into()]);
        assert_eq!(t.arity(), 2);
        assert_eq!(t.functor(), Some("parent"));
        assert_eq!(t.predicate_key(), Some(PredicateKey::new("parent", 2)));
        assert_eq!(Term::from("a").predicate_key(), None);
    }

    #[test]
    fn test_variables_first_occurrence_order() {
        let t = Term::compound(
            "f",
            vec![
                "Y".into(),
                Term::compound("g", vec!["X".into(), "Y".into()]),
                "a".into(),
            ],
        );
        let names: Vec<_> = t.variables().into_iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["Y", "X"]);
        assert!(!t.is_ground());
    }

    #[test]
    fn test_renamed_stamps_every_variable() {
        let t = Term::compound("f", vec!["X".into(), Term::compound("g", vec!["Y".into()])]);
        let r = t.renamed(7);
        assert!(r.variables().iter().all(|v| v.generation == 7));
        assert_ne!(t, r);
        assert_eq!(r.to_string(), "f(X_7, g(Y_7))");
    }

    #[test]
    fn test_display() {
        let t = Term::compound("age", vec!["alice".into(), 30.into()]);
        assert_eq!(t.to_string(), "age(alice, 30)");
        assert_eq!(Term::compound("sunny", vec![]).to_string(), "sunny");
    }

    #[test]
    fn test_same_name_different_arity_are_distinct() {
        let a = Term::compound("p", vec!["a".into()]);
        let b = Term::compound("p", vec!["a".into(), "b".into()]);
        assert_ne!(a.predicate_key(), b.predicate_key());
    }
}
