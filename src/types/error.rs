use thiserror::Error;

/// Every failure the reader and the expression parser can report. There is
/// no partial result on failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error("no parse")]
  NoParse,
  #[error("ambiguous parse: {}", .0.join(", "))]
  Ambiguous(Vec<String>),
  #[error("bad hidden app")]
  BadHiddenApp,
  #[error("empty mixfix operator")]
  EmptyOperator,
  #[error("parseRaw: no parse")]
  RawNoParse,
  #[error("parseRaw: ambiguous parse: {}", .0.join(", "))]
  RawAmbiguous(Vec<String>),
}
