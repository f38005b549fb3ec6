use crate::types::error::ParseError;
use std::rc::Rc;

/// All successes of one parser step: the produced value and the position of
/// the remaining input. An empty vec is an ordinary failure; `Err` poisons
/// the whole parse (used for grammars that are invalid by construction).
pub type Step<A> = Result<Vec<(A, usize)>, ParseError>;

/// Left-and-right combiner used by the operator chain parsers.
pub type Combine<A> = Rc<dyn Fn(A, A) -> A>;

/// A nondeterministic parser over tokens of type `T`, producing an `A`.
/// Parsers are values; composing them builds new values sharing the old.
pub struct Parser<T, A>(Rc<dyn Fn(&[T], usize) -> Step<A>>);

impl<T, A> Clone for Parser<T, A> {
  fn clone(&self) -> Self {
    Parser(self.0.clone())
  }
}

impl<T: 'static, A: Clone + 'static> Parser<T, A> {
  pub fn new(f: impl Fn(&[T], usize) -> Step<A> + 'static) -> Self {
    Parser(Rc::new(f))
  }

  pub fn run(&self, input: &[T], pos: usize) -> Step<A> {
    (self.0)(input, pos)
  }

  /// Succeeds with `x`, consuming nothing.
  pub fn pure(x: A) -> Self {
    Parser::new(move |_, pos| Ok(vec![(x.clone(), pos)]))
  }

  /// Yields no successes at all.
  pub fn fail() -> Self {
    Parser::new(|_, _| Ok(Vec::new()))
  }

  /// Fails the whole parse with `e`, regardless of surrounding alternatives.
  pub fn raise(e: ParseError) -> Self {
    Parser::new(move |_, _| Err(e.clone()))
  }

  pub fn bind<B: Clone + 'static>(
    &self,
    f: impl Fn(A) -> Parser<T, B> + 'static,
  ) -> Parser<T, B> {
    let p = self.clone();
    Parser::new(move |input, pos| {
      let mut res = Vec::new();
      for (x, next) in p.run(input, pos)? {
        res.extend(f(x).run(input, next)?);
      }
      Ok(res)
    })
  }

  pub fn map<B: Clone + 'static>(&self, f: impl Fn(A) -> B + 'static) -> Parser<T, B> {
    let p = self.clone();
    Parser::new(move |input, pos| {
      let res = p.run(input, pos)?;
      Ok(res.into_iter().map(|(x, next)| (f(x), next)).collect())
    })
  }

  /// Union of the successes of both parsers on the same input. Symmetric;
  /// keeps every alternative alive so ambiguity stays observable.
  pub fn alt(&self, other: &Self) -> Self {
    let p = self.clone();
    let q = other.clone();
    Parser::new(move |input, pos| {
      let mut res = p.run(input, pos)?;
      res.extend(q.run(input, pos)?);
      Ok(res)
    })
  }

  pub fn filter(&self, pred: impl Fn(&A) -> bool + 'static) -> Self {
    let p = self.clone();
    Parser::new(move |input, pos| {
      let res = p.run(input, pos)?;
      Ok(res.into_iter().filter(|(x, _)| pred(x)).collect())
    })
  }

  /// Runs the parser and keeps the results that consumed the entire input.
  pub fn parse(&self, input: &[T]) -> Result<Vec<A>, ParseError> {
    let res = self.run(input, 0)?;
    Ok(
      res
        .into_iter()
        .filter(|(_, pos)| *pos == input.len())
        .map(|(x, _)| x)
        .collect(),
    )
  }
}

impl<T: Clone + 'static> Parser<T, T> {
  /// Consumes one token satisfying `pred`.
  pub fn sat(pred: impl Fn(&T) -> bool + 'static) -> Self {
    Parser::new(move |input: &[T], pos| match input.get(pos) {
      Some(t) if pred(t) => Ok(vec![(t.clone(), pos + 1)]),
      _ => Ok(Vec::new()),
    })
  }
}

/// Zero or more `p`, every repetition count kept as an alternative.
pub fn many<T: 'static, A: Clone + 'static>(p: &Parser<T, A>) -> Parser<T, Vec<A>> {
  let p = p.clone();
  Parser::new(move |input, pos| {
    let mut res = vec![(Vec::new(), pos)];
    let mut frontier = vec![(Vec::<A>::new(), pos)];
    while !frontier.is_empty() {
      let mut next = Vec::new();
      for (xs, i) in frontier {
        for (x, j) in p.run(input, i)? {
          if j == i {
            // a zero-width element would repeat forever
            continue;
          }
          let mut ys = xs.clone();
          ys.push(x);
          res.push((ys.clone(), j));
          next.push((ys, j));
        }
      }
      frontier = next;
    }
    Ok(res)
  })
}

pub fn many1<T: 'static, A: Clone + 'static>(p: &Parser<T, A>) -> Parser<T, Vec<A>> {
  let rest = many(p);
  p.bind(move |x| {
    rest.map(move |mut xs| {
      xs.insert(0, x.clone());
      xs
    })
  })
}

/// N-ary `alt`.
pub fn choice<T: 'static, A: Clone + 'static>(ps: &[Parser<T, A>]) -> Parser<T, A> {
  let mut it = ps.iter();
  let mut res = match it.next() {
    Some(p) => p.clone(),
    None => return Parser::fail(),
  };
  for p in it {
    res = res.alt(p);
  }
  res
}

fn op_chain<T: 'static, A: Clone + 'static>(
  p: &Parser<T, A>,
  op: &Parser<T, Combine<A>>,
) -> Parser<T, Vec<(Combine<A>, A)>> {
  let operand = p.clone();
  let tail = op.bind(move |f| operand.map(move |y| (f.clone(), y)));
  many(&tail)
}

/// `p (op p)*`, combined to the left.
pub fn chainl1<T: 'static, A: Clone + 'static>(
  p: &Parser<T, A>,
  op: &Parser<T, Combine<A>>,
) -> Parser<T, A> {
  let tails = op_chain(p, op);
  p.bind(move |x| {
    tails.map(move |ts| {
      let mut acc = x.clone();
      for (f, y) in ts {
        acc = f(acc, y);
      }
      acc
    })
  })
}

/// `p (op p)*`, combined to the right.
pub fn chainr1<T: 'static, A: Clone + 'static>(
  p: &Parser<T, A>,
  op: &Parser<T, Combine<A>>,
) -> Parser<T, A> {
  let tails = op_chain(p, op);
  p.bind(move |x| {
    tails.map(move |ts| {
      // x0 (f1 y1) (f2 y2) folds to f1(x0, f2(y1, y2))
      let mut it = ts.into_iter().rev();
      let (mut f_right, mut acc) = match it.next() {
        Some(t) => t,
        None => return x.clone(),
      };
      for (f, y) in it {
        acc = f_right(y, acc);
        f_right = f;
      }
      f_right(x.clone(), acc)
    })
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn digit() -> Parser<char, char> {
    Parser::sat(|c: &char| c.is_ascii_digit())
  }

  fn plus() -> Parser<char, Combine<String>> {
    Parser::sat(|c: &char| *c == '+').map(|_| {
      let f: Combine<String> = Rc::new(|x, y| format!("({}+{})", x, y));
      f
    })
  }

  fn input(s: &str) -> Vec<char> {
    s.chars().collect()
  }

  #[test]
  fn many_keeps_every_prefix() {
    let cs = input("12");
    let res = many(&digit()).run(&cs, 0).unwrap();
    let lens: Vec<usize> = res.iter().map(|(xs, _)| xs.len()).collect();
    assert!(lens.contains(&0) && lens.contains(&1) && lens.contains(&2));
    assert_eq!(res.len(), 3);
  }

  #[test]
  fn many1_requires_one() {
    let cs = input("x");
    assert!(many1(&digit()).run(&cs, 0).unwrap().is_empty());
  }

  #[test]
  fn alt_is_a_union() {
    let cs = input("1");
    let p = digit().alt(&digit());
    assert_eq!(p.run(&cs, 0).unwrap().len(), 2);
  }

  #[test]
  fn parse_keeps_whole_input_only() {
    let cs = input("12");
    let res = many(&digit()).parse(&cs).unwrap();
    assert_eq!(res, vec![vec!['1', '2']]);
  }

  #[test]
  fn chainl1_associates_left() {
    let cs = input("1+2+3");
    let p = chainl1(&digit().map(|c| c.to_string()), &plus());
    let res = p.parse(&cs).unwrap();
    assert_eq!(res, vec!["((1+2)+3)".to_string()]);
  }

  #[test]
  fn chainr1_associates_right() {
    let cs = input("1+2+3");
    let p = chainr1(&digit().map(|c| c.to_string()), &plus());
    let res = p.parse(&cs).unwrap();
    assert_eq!(res, vec!["(1+(2+3))".to_string()]);
  }

  #[test]
  fn raise_poisons_alternatives() {
    let cs = input("1");
    let p = digit().alt(&Parser::raise(ParseError::EmptyOperator));
    assert_eq!(p.run(&cs, 0), Err(ParseError::EmptyOperator));
  }
}
