//! Round-robin distribution of submodels over parallel endpoint lists.

/// A counter shared by every submodel of a run. Each submodel reads the
/// current slot, then the counter advances; it is never reset between records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRobin {
  next: usize,
}

impl Default for RoundRobin {
  fn default() -> Self {
    Self::starting_at(1)
  }
}

impl RoundRobin {
  pub fn starting_at(next: usize) -> Self {
    Self { next }
  }

  /// Claim the current slot and advance.
  pub fn claim(&mut self) -> Slot {
    let slot = Slot(self.next);
    self.next += 1;
    slot
  }

  pub fn peek(&self) -> usize {
    self.next
  }
}

/// A claimed position; selects `index mod len` from any list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot(pub usize);

impl Slot {
  /// # Panics
  /// If `items` is empty. Validated configs never hold an empty list that is
  /// consulted.
  pub fn pick<'a, T>(self, items: &'a [T]) -> &'a T {
    &items[self.0 % items.len()]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn starts_at_one() {
    let mut rr = RoundRobin::default();
    let lists = ["a", "b", "c"];
    assert_eq!(*rr.claim().pick(&lists), "b");
    assert_eq!(*rr.claim().pick(&lists), "c");
    assert_eq!(*rr.claim().pick(&lists), "a");
    assert_eq!(rr.peek(), 4);
  }

  #[test]
  fn kth_claim_selects_start_plus_k() {
    let items: Vec<usize> = (0..5).collect();
    for start in [0, 3, 17] {
      let mut rr = RoundRobin::starting_at(start);
      for k in 0..12 {
        assert_eq!(*rr.claim().pick(&items), (start + k) % items.len());
      }
      assert_eq!(rr.peek(), start + 12);
    }
  }
}
