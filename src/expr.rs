use crate::combinator::{chainl1, chainr1, many, Combine, Parser};
use crate::pretty::{show_exp, show_raw};
use crate::types::error::ParseError;
use crate::types::exp::Exp;
use crate::types::raw::Raw;
use crate::types::{Arg, Hiding};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, trace};

/// Parser over the children of a spine; tokens and results are both `Raw`.
pub type ExprParser = Parser<Rc<Raw>, Rc<Raw>>;

/// One precedence level: receives the parser of the next tighter level and
/// the whole-grammar parser, returns its own.
pub type LevelFn = Rc<dyn Fn(&ExprParser, &ExprParser) -> ExprParser>;

fn name_token(s: &str) -> ExprParser {
  let s = s.to_string();
  Parser::sat(move |t: &Rc<Raw>| matches!(&**t, Raw::Name(n) if *n == s))
}

/// One mixfix operator occurrence: the name fragments in order, a hole
/// between each consecutive pair parsed by `top`. Yields the operator with
/// its internal arguments only.
pub fn op(top: &ExprParser, parts: &[&str]) -> ExprParser {
  let names: Vec<String> = parts.iter().map(|s| s.to_string()).collect();
  if names.is_empty() {
    return Parser::raise(ParseError::EmptyOperator);
  }
  let mut q: Parser<Rc<Raw>, Vec<Rc<Raw>>> = name_token(&names[0]).map(|_| Vec::new());
  for part in &names[1..] {
    let hole = top.clone();
    let tok = name_token(part);
    q = q.bind(move |args| {
      let tok = tok.clone();
      hole.bind(move |e| {
        let mut args = args.clone();
        args.push(e);
        tok.map(move |_| args.clone())
      })
    });
  }
  q.map(move |args| Rc::new(Raw::Op(names.clone(), args)))
}

/// An identifier drawn from the caller-supplied name set.
pub fn ident(names: &HashSet<String>) -> ExprParser {
  let names = names.clone();
  Parser::sat(move |t: &Rc<Raw>| matches!(&**t, Raw::Name(n) if names.contains(n)))
}

/// Any non-name token: a literal or a group, passed through untouched.
pub fn atom_other() -> ExprParser {
  Parser::sat(|t: &Rc<Raw>| !matches!(&**t, Raw::Name(_)))
}

fn append_arg(o: &Rc<Raw>, e: Rc<Raw>) -> Rc<Raw> {
  match &**o {
    Raw::Op(parts, args) => {
      let mut args = args.clone();
      args.push(e);
      Rc::new(Raw::Op(parts.clone(), args))
    }
    _ => panic!(),
  }
}

fn prepend_arg(o: &Rc<Raw>, e: Rc<Raw>) -> Rc<Raw> {
  match &**o {
    Raw::Op(parts, args) => {
      let mut all = Vec::with_capacity(args.len() + 1);
      all.push(e);
      all.extend(args.iter().cloned());
      Rc::new(Raw::Op(parts.clone(), all))
    }
    _ => panic!(),
  }
}

fn binop(opp: &ExprParser) -> Parser<Rc<Raw>, Combine<Rc<Raw>>> {
  opp.map(|o| {
    let f: Combine<Rc<Raw>> = Rc::new(move |x, y| match &*o {
      Raw::Op(parts, inner) => {
        let mut args = Vec::with_capacity(inner.len() + 2);
        args.push(x);
        args.extend(inner.iter().cloned());
        args.push(y);
        Rc::new(Raw::Op(parts.clone(), args))
      }
      _ => panic!(),
    });
    f
  })
}

/// `(op)* p`, folding to the right; each operator takes the rest as its
/// trailing argument.
pub fn prefix(opp: &ExprParser, p: &ExprParser) -> ExprParser {
  let heads = many(opp);
  let p = p.clone();
  heads.bind(move |os| {
    p.map(move |e| {
      let mut e = e;
      for o in os.iter().rev() {
        e = append_arg(o, e);
      }
      e
    })
  })
}

/// `p (op)*`, folding to the left; each operator takes what came before as
/// its leading argument.
pub fn postfix(opp: &ExprParser, p: &ExprParser) -> ExprParser {
  let tails = many(opp);
  p.bind(move |e| {
    tails.map(move |os| {
      let mut acc = e.clone();
      for o in &os {
        acc = prepend_arg(o, acc);
      }
      acc
    })
  })
}

/// Left-associative binary level.
pub fn infixl(opp: &ExprParser, p: &ExprParser) -> ExprParser {
  chainl1(p, &binop(opp))
}

/// Right-associative binary level.
pub fn infixr(opp: &ExprParser, p: &ExprParser) -> ExprParser {
  chainr1(p, &binop(opp))
}

/// Non-associative binary level: at most one operator occurrence.
pub fn infixn(opp: &ExprParser, p: &ExprParser) -> ExprParser {
  let bin = binop(opp);
  let operand = p.clone();
  p.bind(move |x| {
    let once = {
      let x = x.clone();
      let operand = operand.clone();
      bin.bind(move |f| {
        let x = x.clone();
        operand.map(move |y| f(x.clone(), y))
      })
    };
    once.alt(&Parser::pure(x))
  })
}

/// Closed operators: the template alone, or fall through to `p`.
pub fn nonfix(opp: &ExprParser, p: &ExprParser) -> ExprParser {
  opp.alt(p)
}

/// Juxtaposition application: one head, then argument atoms. A braced token
/// becomes a hidden argument (one layer unwrapped); everything else from `p`
/// is a visible argument, and must not itself be a braced group.
pub fn app(p: &ExprParser) -> ExprParser {
  let visible = p
    .filter(|e: &Rc<Raw>| !matches!(&**e, Raw::Braces(_)))
    .map(|e| Arg(Hiding::NotHidden, e));
  let hidden = Parser::sat(|t: &Rc<Raw>| matches!(&**t, Raw::Braces(_))).map(|t| match &*t {
    Raw::Braces(inner) => Arg(Hiding::Hidden, inner.clone()),
    _ => unreachable!(),
  });
  let args = many(&visible.alt(&hidden));
  let head = p.clone();
  head.bind(move |f| {
    args.map(move |xs| {
      let mut e = f.clone();
      for a in xs {
        e = Rc::new(Raw::App(e, a));
      }
      e
    })
  })
}

/// Ties the levels into one grammar: each level falls through to the next,
/// and the whole stack is reachable again from template holes and from
/// parenthesized groups. The shared cell is written once, before any run.
pub fn recursive(levels: &[LevelFn]) -> ExprParser {
  if levels.is_empty() {
    return Parser::fail();
  }
  let cell: Rc<RefCell<Option<ExprParser>>> = Rc::new(RefCell::new(None));
  let top = {
    let cell = cell.clone();
    Parser::new(move |input, pos| {
      let p = cell.borrow().as_ref().unwrap().clone();
      p.run(input, pos)
    })
  };
  let mut p = top.clone();
  for l in levels.iter().rev() {
    p = l(&p, &top);
  }
  *cell.borrow_mut() = Some(p.clone());
  p
}

/// Resolves a `Raw` tree into an expression, running the operator grammar
/// over every spine. A spine must have exactly one whole-input parse;
/// none is a failure, several are reported with every candidate rendered.
pub fn parse_exp(p: &ExprParser, raw: &Raw) -> Result<Exp, ParseError> {
  match raw {
    Raw::Name(s) => Ok(Exp::Id(s.clone())),
    Raw::Lit(n) => Ok(Exp::Lit(*n)),
    Raw::Paren(inner) => parse_exp(p, inner),
    Raw::Braces(_) => Err(ParseError::BadHiddenApp),
    Raw::Spine(rs) => {
      let res = p.parse(rs)?;
      let mut distinct: Vec<Rc<Raw>> = Vec::new();
      for r in res {
        if !distinct.contains(&r) {
          distinct.push(r);
        }
      }
      trace!("spine of {}: {} complete parse(s)", rs.len(), distinct.len());
      match distinct.len() {
        0 => Err(ParseError::NoParse),
        1 => parse_exp(p, &distinct[0]),
        _ => {
          let cands: Vec<String> = distinct
            .iter()
            .map(|c| match parse_exp(p, c) {
              Ok(e) => show_exp(&e),
              Err(_) => show_raw(c),
            })
            .collect();
          debug!("ambiguous spine: {:?}", cands);
          Err(ParseError::Ambiguous(cands))
        }
      }
    }
    Raw::App(f, Arg(h, x)) => {
      let f = parse_exp(p, f)?;
      let x = parse_exp(p, x)?;
      Ok(Exp::App(Box::new(f), Arg(*h, Box::new(x))))
    }
    Raw::Op(parts, args) => {
      let es = args
        .iter()
        .map(|a| parse_exp(p, a))
        .collect::<Result<Vec<_>, _>>()?;
      Ok(Exp::Op(parts.clone(), es))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::raw::Raw;

  fn toks(names: &[&str]) -> Vec<Rc<Raw>> {
    names.iter().map(|s| Raw::name(s)).collect()
  }

  #[test]
  fn op_template_fills_internal_holes() {
    let atom = atom_any();
    let p = op(&atom, &["if", "then", "else"]);
    let input = toks(&["if", "a", "then", "b", "else"]);
    let res = p.parse(&input).unwrap();
    assert_eq!(
      res,
      vec![Rc::new(Raw::Op(
        vec!["if".to_string(), "then".to_string(), "else".to_string()],
        vec![Raw::name("a"), Raw::name("b")],
      ))]
    );
  }

  fn atom_any() -> ExprParser {
    Parser::sat(|_: &Rc<Raw>| true)
  }

  #[test]
  fn empty_template_poisons_the_parse() {
    let p = op(&atom_any(), &[]);
    assert_eq!(p.parse(&toks(&["x"])), Err(ParseError::EmptyOperator));
  }

  #[test]
  fn prefix_folds_right() {
    let atom = atom_any();
    let minus = op(&atom, &["-"]);
    let p = prefix(&minus, &atom);
    let res = p.parse(&toks(&["-", "-", "x"])).unwrap();
    assert_eq!(
      res,
      vec![Rc::new(Raw::Op(
        vec!["-".to_string()],
        vec![Rc::new(Raw::Op(vec!["-".to_string()], vec![Raw::name("x")]))],
      ))]
    );
  }

  #[test]
  fn postfix_folds_left() {
    let atom = atom_any();
    let bang = op(&atom, &["!"]);
    let p = postfix(&bang, &atom);
    let res = p.parse(&toks(&["x", "!", "!"])).unwrap();
    assert_eq!(
      res,
      vec![Rc::new(Raw::Op(
        vec!["!".to_string()],
        vec![Rc::new(Raw::Op(vec!["!".to_string()], vec![Raw::name("x")]))],
      ))]
    );
  }

  #[test]
  fn infixn_takes_one_occurrence_only() {
    let names: HashSet<String> = ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
    let atoms = ident(&names);
    let eq = op(&atoms, &["=="]);
    let p = infixn(&eq, &atoms);
    assert_eq!(p.parse(&toks(&["x", "==", "y"])).unwrap().len(), 1);
    assert_eq!(p.parse(&toks(&["x", "==", "y", "==", "z"])).unwrap().len(), 0);
  }

  #[test]
  fn app_tags_hidden_arguments() {
    let names: HashSet<String> = ["f", "x"].iter().map(|s| s.to_string()).collect();
    let atoms = ident(&names).alt(&atom_other());
    let p = app(&atoms);
    let input = vec![
      Raw::name("f"),
      Raw::braces(&Raw::name("x")),
      Raw::name("x"),
    ];
    let res = p.parse(&input).unwrap();
    assert_eq!(
      res,
      vec![Rc::new(Raw::App(
        Rc::new(Raw::App(
          Raw::name("f"),
          Arg(Hiding::Hidden, Raw::name("x")),
        )),
        Arg(Hiding::NotHidden, Raw::name("x")),
      ))]
    );
  }

  #[test]
  fn braces_outside_an_argument_fail() {
    let names: HashSet<String> = ["x"].iter().map(|s| s.to_string()).collect();
    let app_level: LevelFn = Rc::new(|p: &ExprParser, _top: &ExprParser| app(p));
    let atom_level: LevelFn =
      Rc::new(move |_p: &ExprParser, _top: &ExprParser| ident(&names).alt(&atom_other()));
    let g = recursive(&[app_level, atom_level]);
    let braces = Raw::braces(&Raw::name("x"));
    assert_eq!(parse_exp(&g, &braces), Err(ParseError::BadHiddenApp));
  }
}
