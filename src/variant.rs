use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

/// A build configuration applied to a test program before it is simulated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize)]
pub enum Variant {
  #[value(name = "O1")]
  #[serde(rename = "O1")]
  O1,
  /// `-O1` plus the SLP vectorizer pass.
  #[value(name = "O1_w_slp")]
  #[serde(rename = "O1_w_slp")]
  O1WithSlp,
  #[value(name = "O2")]
  #[serde(rename = "O2")]
  O2,
}

impl Variant {
  pub const ALL: [Variant; 3] = [Variant::O1, Variant::O1WithSlp, Variant::O2];

  pub fn name(self) -> &'static str {
    match self {
      Variant::O1 => "O1",
      Variant::O1WithSlp => "O1_w_slp",
      Variant::O2 => "O2",
    }
  }

  /// Suffix the Makefile appends to the test name for this variant's binary.
  pub fn suffix(self) -> &'static str {
    match self {
      Variant::O1 => ".1.out",
      Variant::O1WithSlp => ".slp.out",
      Variant::O2 => ".2.out",
    }
  }
}

impl fmt::Display for Variant {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn names_parse_back() {
    for variant in Variant::ALL {
      assert_eq!(Variant::from_str(variant.name(), false), Ok(variant));
    }
  }

  #[test]
  fn suffixes_are_distinct() {
    assert_eq!(Variant::O1.suffix(), ".1.out");
    assert_eq!(Variant::O1WithSlp.suffix(), ".slp.out");
    assert_eq!(Variant::O2.suffix(), ".2.out");
  }

  #[test]
  fn orders_like_declaration() {
    let mut shuffled = vec![Variant::O2, Variant::O1, Variant::O1WithSlp];
    shuffled.sort();
    assert_eq!(shuffled, Variant::ALL);
  }
}
