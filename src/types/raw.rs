use crate::types::Arg;
use std::rc::Rc;

/// Shallow tree produced by the reader: names, literals, groups and
/// whitespace spines, plus the resolved forms the operator parser builds
/// in place of a spine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Raw {
  Name(String),
  Lit(u64),
  Paren(Rc<Raw>),
  Braces(Rc<Raw>),
  /// Whitespace juxtaposition, two or more children, not yet resolved.
  Spine(Vec<Rc<Raw>>),
  App(Rc<Raw>, Arg<Rc<Raw>>),
  Op(Vec<String>, Vec<Rc<Raw>>),
}

impl Raw {
  pub fn name(s: &str) -> Rc<Self> {
    Rc::new(Raw::Name(s.to_string()))
  }
  pub fn lit(n: u64) -> Rc<Self> {
    Rc::new(Raw::Lit(n))
  }
  pub fn paren(r: &Rc<Raw>) -> Rc<Self> {
    Rc::new(Raw::Paren(r.clone()))
  }
  pub fn braces(r: &Rc<Raw>) -> Rc<Self> {
    Rc::new(Raw::Braces(r.clone()))
  }
  pub fn spine(rs: Vec<Rc<Raw>>) -> Rc<Self> {
    Rc::new(Raw::Spine(rs))
  }
}
