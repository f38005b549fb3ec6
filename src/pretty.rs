use crate::types::exp::Exp;
use crate::types::raw::Raw;
use crate::types::{Arg, Hiding};
use std::fmt;

/// Canonical rendering of an expression, with just enough parentheses to
/// read back unambiguously. Used for diagnostics and ambiguity reports.
pub fn show_exp(e: &Exp) -> String {
  let mut out = String::new();
  exp_prec(e, 0, &mut out);
  out
}

fn exp_prec(e: &Exp, prec: u8, out: &mut String) {
  match e {
    Exp::Id(s) => out.push_str(s),
    Exp::Lit(n) => out.push_str(&n.to_string()),
    Exp::App(f, Arg(h, x)) => {
      let parens = prec > 1;
      if parens {
        out.push('(');
      }
      exp_prec(f, 1, out);
      out.push(' ');
      match h {
        Hiding::Hidden => {
          out.push('{');
          exp_prec(x, 0, out);
          out.push('}');
        }
        Hiding::NotHidden => exp_prec(x, 2, out),
      }
      if parens {
        out.push(')');
      }
    }
    Exp::Op(parts, args) => {
      let n = parts.len();
      let m = args.len();
      // closed templates carry their own delimiters
      let parens = prec > 0 && n <= m;
      if parens {
        out.push('(');
      }
      let mut words = Vec::with_capacity(n + m);
      if n >= m {
        for i in 0..n {
          words.push(parts[i].clone());
          if i < m {
            words.push(arg_str(&args[i]));
          }
        }
      } else {
        for i in 0..m {
          words.push(arg_str(&args[i]));
          if i < n {
            words.push(parts[i].clone());
          }
        }
      }
      out.push_str(&words.join(" "));
      if parens {
        out.push(')');
      }
    }
  }
}

fn arg_str(e: &Exp) -> String {
  let mut s = String::new();
  exp_prec(e, 1, &mut s);
  s
}

/// Plain rendering of a raw tree with canonical spacing.
pub fn show_raw(r: &Raw) -> String {
  let mut out = String::new();
  raw_str(r, &mut out);
  out
}

fn raw_str(r: &Raw, out: &mut String) {
  match r {
    Raw::Name(s) => out.push_str(s),
    Raw::Lit(n) => out.push_str(&n.to_string()),
    Raw::Paren(inner) => {
      out.push('(');
      raw_str(inner, out);
      out.push(')');
    }
    Raw::Braces(inner) => {
      out.push('{');
      raw_str(inner, out);
      out.push('}');
    }
    Raw::Spine(rs) => {
      let words: Vec<String> = rs.iter().map(|r| show_raw(r)).collect();
      out.push_str(&words.join(" "));
    }
    Raw::App(f, Arg(h, x)) => {
      raw_str(f, out);
      out.push(' ');
      match h {
        Hiding::Hidden => {
          out.push('{');
          raw_str(x, out);
          out.push('}');
        }
        Hiding::NotHidden => raw_str(x, out),
      }
    }
    Raw::Op(parts, args) => {
      let n = parts.len();
      let m = args.len();
      let mut words = Vec::with_capacity(n + m);
      if n >= m {
        for i in 0..n {
          words.push(parts[i].clone());
          if i < m {
            words.push(show_raw(&args[i]));
          }
        }
      } else {
        for i in 0..m {
          words.push(show_raw(&args[i]));
          if i < n {
            words.push(parts[i].clone());
          }
        }
      }
      out.push_str(&words.join(" "));
    }
  }
}

impl fmt::Display for Exp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", show_exp(self))
  }
}

impl fmt::Display for Raw {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", show_raw(self))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::Hiding::{Hidden, NotHidden};

  #[test]
  fn infix_renders_argument_first() {
    let e = Exp::op(
      &["+"],
      vec![Exp::id("x"), Exp::op(&["*"], vec![Exp::id("y"), Exp::id("z")])],
    );
    assert_eq!(show_exp(&e), "x + (y * z)");
  }

  #[test]
  fn left_nest_keeps_parens_on_the_left() {
    let e = Exp::op(
      &["+"],
      vec![Exp::op(&["+"], vec![Exp::id("x"), Exp::id("y")]), Exp::id("z")],
    );
    assert_eq!(show_exp(&e), "(x + y) + z");
  }

  #[test]
  fn closed_operators_never_take_parens() {
    let inner = Exp::op(&["[", "]"], vec![Exp::id("y")]);
    assert_eq!(show_exp(&inner), "[ y ]");
    let e = Exp::app(Exp::id("x"), NotHidden, inner);
    assert_eq!(show_exp(&e), "x [ y ]");
  }

  #[test]
  fn application_is_left_associative() {
    let e = Exp::app(
      Exp::app(Exp::id("f"), NotHidden, Exp::id("x")),
      Hidden,
      Exp::id("y"),
    );
    assert_eq!(show_exp(&e), "f x {y}");
    let nested = Exp::app(Exp::id("f"), NotHidden, Exp::app(Exp::id("g"), NotHidden, Exp::id("x")));
    assert_eq!(show_exp(&nested), "f (g x)");
  }

  #[test]
  fn prefix_chain_renders_fragment_first() {
    let e = Exp::op(&["-"], vec![Exp::op(&["!"], vec![Exp::id("x")])]);
    assert_eq!(show_exp(&e), "- (! x)");
  }
}
