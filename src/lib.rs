pub mod builtin;
pub mod combinator;
pub mod expr;
pub mod parse;
pub mod pretty;
pub mod read;
pub mod types;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn arithmetic_smoke() {
    let g = builtin::default_grammar(&["x", "y", "z"]);
    let e = parse::parse(&g, "x + y * z").unwrap();
    assert_eq!(e.to_string(), "x + (y * z)");
  }
}
