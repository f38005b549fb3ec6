use crate::expr::{parse_exp, ExprParser};
use crate::read::parse_raw;
use crate::types::error::ParseError;
use crate::types::exp::Exp;

/// Reads and resolves a source string in one step.
pub fn parse(grammar: &ExprParser, code: &str) -> Result<Exp, ParseError> {
  let raw = parse_raw(code)?;
  parse_exp(grammar, &raw)
}

#[cfg(test)]
#[test]
fn test() {
  use crate::builtin::default_grammar;
  let g = default_grammar(&["x", "y"]);
  assert!(parse(&g, "x + y").is_ok());
  assert_eq!(parse(&g, "x +"), Err(ParseError::NoParse));
}
