use crate::combinator::choice;
use crate::expr::{self, ExprParser, LevelFn};
use std::collections::HashSet;
use std::rc::Rc;

fn own_ops(ops: &[&[&str]]) -> Vec<Vec<String>> {
  ops
    .iter()
    .map(|parts| parts.iter().map(|s| s.to_string()).collect())
    .collect()
}

fn op_choice(top: &ExprParser, ops: &[Vec<String>]) -> ExprParser {
  let ps: Vec<ExprParser> = ops
    .iter()
    .map(|parts| {
      let parts: Vec<&str> = parts.iter().map(|s| s.as_str()).collect();
      expr::op(top, &parts)
    })
    .collect();
  choice(&ps)
}

/// Level table for an operator grammar, loosest level first. Each method
/// pushes one level; `build` ties them into a parser.
pub struct Grammar {
  levels: Vec<LevelFn>,
}

impl Grammar {
  pub fn new() -> Self {
    Grammar { levels: Vec::new() }
  }

  fn level(&mut self, l: impl Fn(&ExprParser, &ExprParser) -> ExprParser + 'static) -> &mut Self {
    self.levels.push(Rc::new(l));
    self
  }

  pub fn prefix(&mut self, ops: &[&[&str]]) -> &mut Self {
    let ops = own_ops(ops);
    self.level(move |p, top| expr::prefix(&op_choice(top, &ops), p))
  }

  pub fn postfix(&mut self, ops: &[&[&str]]) -> &mut Self {
    let ops = own_ops(ops);
    self.level(move |p, top| expr::postfix(&op_choice(top, &ops), p))
  }

  pub fn infixl(&mut self, ops: &[&[&str]]) -> &mut Self {
    let ops = own_ops(ops);
    self.level(move |p, top| expr::infixl(&op_choice(top, &ops), p))
  }

  pub fn infixr(&mut self, ops: &[&[&str]]) -> &mut Self {
    let ops = own_ops(ops);
    self.level(move |p, top| expr::infixr(&op_choice(top, &ops), p))
  }

  pub fn infixn(&mut self, ops: &[&[&str]]) -> &mut Self {
    let ops = own_ops(ops);
    self.level(move |p, top| expr::infixn(&op_choice(top, &ops), p))
  }

  pub fn nonfix(&mut self, ops: &[&[&str]]) -> &mut Self {
    let ops = own_ops(ops);
    self.level(move |p, top| expr::nonfix(&op_choice(top, &ops), p))
  }

  pub fn app(&mut self) -> &mut Self {
    self.level(|p, _top| expr::app(p))
  }

  /// Terminal level: identifiers from `names`, plus any non-name atom.
  pub fn atoms(&mut self, names: &[&str]) -> &mut Self {
    let set: HashSet<String> = names.iter().map(|s| s.to_string()).collect();
    self.level(move |_p, _top| expr::ident(&set).alt(&expr::atom_other()))
  }

  pub fn build(&self) -> ExprParser {
    expr::recursive(&self.levels)
  }
}

/// The stock arithmetic grammar: conditionals loosest, then additive,
/// unary minus, multiplicative, factorial, application, brackets, atoms.
pub fn default_grammar(idents: &[&str]) -> ExprParser {
  let mut g = Grammar::new();
  g.prefix(&[&["if", "then"]]);
  g.prefix(&[&["if", "then", "else"]]);
  g.infixl(&[&["+"], &["-"]]);
  g.prefix(&[&["-"]]);
  g.infixl(&[&["*"], &["/"]]);
  g.postfix(&[&["!"]]);
  g.app();
  g.nonfix(&[&["[", "]"]]);
  g.atoms(idents);
  g.build()
}

#[cfg(test)]
#[test]
fn grammar_builds() {
  let g = default_grammar(&["x"]);
  let input = vec![crate::types::raw::Raw::name("x")];
  assert_eq!(g.parse(&input).unwrap(), vec![crate::types::raw::Raw::name("x")]);
}
