use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::variant::Variant;

/// The cycle count reported by gem5, unparsed.
pub type Ticks = String;

/// What a single simulation of one test variant measured.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Measurement {
  pub tick_count: Ticks,
  /// Size of the simulated binary in bytes.
  pub code_size: u64,
}

impl Default for Measurement {
  fn default() -> Self {
    Self {
      tick_count: "0".to_string(),
      code_size: 0,
    }
  }
}

/// Measurements for every configured test and variant. The set of entries is
/// fixed at construction; only their values change afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Results {
  tests: BTreeMap<String, BTreeMap<Variant, Measurement>>,
}

impl Results {
  pub fn new<'a, I: IntoIterator<Item = &'a str>>(tests: I, variants: &[Variant]) -> Self {
    let tests = tests
      .into_iter()
      .map(|test| {
        let variants = variants.iter().map(|&variant| (variant, Measurement::default())).collect();
        (test.to_string(), variants)
      })
      .collect();

    Self { tests }
  }

  pub fn get(&self, test: &str, variant: Variant) -> Option<&Measurement> {
    self.tests.get(test)?.get(&variant)
  }

  /// Overwrites the entry for `test` and `variant`. Fails if the pair was not
  /// part of the table when it was created.
  pub fn record(&mut self, test: &str, variant: Variant, measurement: Measurement) -> Result<()> {
    let entry = self
      .tests
      .get_mut(test)
      .and_then(|variants| variants.get_mut(&variant))
      .with_context(|| format!("no entry for {test} {variant}"))?;

    *entry = measurement;

    Ok(())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<Variant, Measurement>)> {
    self.tests.iter().map(|(test, variants)| (test.as_str(), variants))
  }

  /// Number of (test, variant) entries.
  pub fn len(&self) -> usize {
    self.tests.values().map(BTreeMap::len).sum()
  }
}
