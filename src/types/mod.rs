pub mod error;
pub mod exp;
pub mod raw;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hiding {
  Hidden,
  NotHidden,
}

/// An application argument together with its visibility tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg<E>(pub Hiding, pub E);
