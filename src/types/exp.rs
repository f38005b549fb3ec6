use crate::types::{Arg, Hiding};

/// Fully resolved expression, handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exp {
  Id(String),
  Lit(u64),
  App(Box<Exp>, Arg<Box<Exp>>),
  Op(Vec<String>, Vec<Exp>),
}

impl Exp {
  pub fn id(s: &str) -> Self {
    Exp::Id(s.to_string())
  }
  pub fn lit(n: u64) -> Self {
    Exp::Lit(n)
  }
  pub fn app(f: Exp, h: Hiding, x: Exp) -> Self {
    Exp::App(Box::new(f), Arg(h, Box::new(x)))
  }
  pub fn op(parts: &[&str], args: Vec<Exp>) -> Self {
    Exp::Op(parts.iter().map(|s| s.to_string()).collect(), args)
  }
}
