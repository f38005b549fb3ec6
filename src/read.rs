use crate::combinator::{choice, many, many1, Parser};
use crate::pretty::show_raw;
use crate::types::error::ParseError;
use crate::types::raw::Raw;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;

type CharParser = Parser<char, Rc<Raw>>;

fn is_reserved(c: char) -> bool {
  matches!(c, '(' | ')' | '{' | '}')
}

fn is_name_char(c: char) -> bool {
  !c.is_whitespace() && !is_reserved(c)
}

fn ws1() -> Parser<char, ()> {
  many1(&Parser::sat(|c: &char| c.is_whitespace())).map(|_| ())
}

fn nat() -> CharParser {
  many1(&Parser::sat(|c: &char| c.is_ascii_digit())).bind(|ds| {
    let mut n: u64 = 0;
    for d in ds {
      let d = d.to_digit(10).unwrap() as u64;
      n = match n.checked_mul(10).and_then(|m| m.checked_add(d)) {
        Some(m) => m,
        None => return Parser::fail(),
      };
    }
    Parser::pure(Raw::lit(n))
  })
}

fn name() -> CharParser {
  let head = Parser::sat(|c: &char| is_name_char(*c) && !c.is_ascii_digit());
  let rest = many(&Parser::sat(|c: &char| is_name_char(*c)));
  head.bind(move |c0| {
    rest.map(move |cs| {
      let mut s = String::new();
      s.push(c0);
      s.extend(cs);
      Raw::name(&s)
    })
  })
}

fn group(open: char, close: char, p0: &CharParser, hidden: bool) -> CharParser {
  let p0 = p0.clone();
  Parser::sat(move |c: &char| *c == open).bind(move |_| {
    p0.bind(move |r| {
      Parser::sat(move |c: &char| *c == close).map(move |_| {
        if hidden {
          Raw::braces(&r)
        } else {
          Raw::paren(&r)
        }
      })
    })
  })
}

// p1 (WS+ p1)*
fn juxt(p1: &CharParser) -> CharParser {
  let item = p1.clone();
  let tail = ws1().bind(move |_| item.clone());
  let tails = many(&tail);
  let head = p1.clone();
  head.bind(move |first| {
    tails.map(move |rest| {
      if rest.is_empty() {
        first.clone()
      } else {
        let mut rs = Vec::with_capacity(rest.len() + 1);
        rs.push(first.clone());
        rs.extend(rest);
        Raw::spine(rs)
      }
    })
  })
}

fn raw_parser() -> CharParser {
  let cell: Rc<RefCell<Option<CharParser>>> = Rc::new(RefCell::new(None));
  let knot = {
    let cell = cell.clone();
    Parser::new(move |input, pos| {
      let p = cell.borrow().as_ref().unwrap().clone();
      p.run(input, pos)
    })
  };
  let p1 = choice(&[
    group('(', ')', &knot, false),
    group('{', '}', &knot, true),
    nat(),
    name(),
  ]);
  let p0 = juxt(&p1);
  *cell.borrow_mut() = Some(p0.clone());
  p0
}

/// Reads a source string into the shallow `Raw` tree: whitespace-separated
/// atoms, parenthesized and braced groups, decimal literals, names.
pub fn parse_raw(code: &str) -> Result<Rc<Raw>, ParseError> {
  let chars: Vec<char> = code.trim().chars().collect();
  let res = raw_parser().parse(&chars)?;
  let mut distinct: Vec<Rc<Raw>> = Vec::new();
  for r in res {
    if !distinct.contains(&r) {
      distinct.push(r);
    }
  }
  trace!("raw: {} complete parse(s)", distinct.len());
  match distinct.len() {
    0 => Err(ParseError::RawNoParse),
    1 => Ok(distinct.pop().unwrap()),
    _ => Err(ParseError::RawAmbiguous(
      distinct.iter().map(|r| show_raw(r)).collect(),
    )),
  }
}
