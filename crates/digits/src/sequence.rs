use serde::Serialize;

/// Advance `digits` by one odometer tick.
///
/// Position `i` counts up while it is strictly below its more-significant
/// neighbour at `i + 1`; otherwise it resets to zero and the carry moves on.
/// The most-significant position always counts up. Empty input is a no-op.
pub fn increment_score(digits: &mut [i32]) {
    let last = digits.len().saturating_sub(1);
    for i in 0..digits.len() {
        if i == last || digits[i] < digits[i + 1] {
            digits[i] = digits[i].saturating_add(1);
            return;
        }
        digits[i] = 0;
    }
}

/// Fixed-length sequence of displayed digits, least-significant first.
///
/// Values are signed so the UI can hold an out-of-range edit until the next
/// [`DigitSequence::clamp`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigitSequence {
    digits: Vec<i32>,
}

impl DigitSequence {
    /// All-zero sequence of `len` positions.
    pub fn new(len: usize) -> Self {
        Self {
            digits: vec![0; len],
        }
    }

    pub fn from_slice(digits: &[i32]) -> Self {
        Self {
            digits: digits.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<i32> {
        self.digits.get(position).copied()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.digits
    }

    /// Mutable view for in-place edits. The length stays fixed.
    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.digits
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = i32> + ExactSizeIterator + '_ {
        self.digits.iter().copied()
    }

    /// One odometer tick. See [`increment_score`].
    pub fn increment(&mut self) {
        increment_score(&mut self.digits);
        tracing::trace!(digits = ?self.digits, "odometer tick");
    }

    /// Coerce every position into `[0, max]`. Returns how many positions changed.
    pub fn clamp(&mut self, max: i32) -> usize {
        let max = max.max(0);
        let mut changed = 0;
        for digit in &mut self.digits {
            let clamped = (*digit).clamp(0, max);
            if clamped != *digit {
                *digit = clamped;
                changed += 1;
            }
        }
        if changed > 0 {
            tracing::debug!(changed, max, "clamped out-of-range digits");
        }
        changed
    }

    /// Reset every position to zero.
    pub fn reset(&mut self) {
        self.digits.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(digits: &[i32]) -> Vec<i32> {
        let mut seq = DigitSequence::from_slice(digits);
        seq.increment();
        seq.as_slice().to_vec()
    }

    #[test]
    fn zero_sequence_carries_to_most_significant() {
        // 0 < 0 is false at every position below the top, so all of them
        // reset and the carry lands on the most-significant position.
        assert_eq!(tick(&[0, 0, 0]), vec![0, 0, 1]);
    }

    #[test]
    fn digit_below_neighbour_increments() {
        assert_eq!(tick(&[0, 1, 0]), vec![1, 1, 0]);
    }

    #[test]
    fn equal_neighbours_carry_to_most_significant() {
        assert_eq!(tick(&[1, 1, 0]), vec![0, 0, 1]);
    }

    #[test]
    fn top_position_counts_without_a_neighbour() {
        assert_eq!(tick(&[0, 0, 5]), vec![0, 1, 5]);
        assert_eq!(tick(&[0, 0]), vec![0, 1]);
        assert_eq!(tick(&[7]), vec![8]);
    }

    #[test]
    fn carry_stops_at_first_smaller_digit() {
        // position 0 resets (2 !< 2), position 1 increments (2 < 3)
        assert_eq!(tick(&[2, 2, 3]), vec![0, 3, 3]);
    }

    #[test]
    fn not_fixed_base_arithmetic() {
        // A base-10 counter would give [0, 1, 0] here.
        assert_eq!(tick(&[9, 0, 0]), vec![0, 0, 1]);
    }

    #[test]
    fn sequence_of_ticks() {
        let mut seq = DigitSequence::new(3);
        let mut seen = Vec::new();
        for _ in 0..5 {
            seq.increment();
            seen.push(seq.as_slice().to_vec());
        }
        assert_eq!(
            seen,
            vec![
                vec![0, 0, 1],
                vec![0, 1, 1],
                vec![1, 1, 1],
                vec![0, 0, 2],
                vec![0, 1, 2],
            ]
        );
    }

    #[test]
    fn empty_sequence_is_noop() {
        let mut empty: [i32; 0] = [];
        increment_score(&mut empty);
        let mut seq = DigitSequence::new(0);
        seq.increment();
        assert!(seq.is_empty());
    }

    #[test]
    fn out_of_range_input_does_not_fail() {
        assert_eq!(tick(&[-3, 40, 2]), vec![-2, 40, 2]);
        assert_eq!(tick(&[i32::MAX]), vec![i32::MAX]);
    }

    #[test]
    fn clamp_coerces_into_range() {
        let mut seq = DigitSequence::from_slice(&[-1, 0, 2, 3, 99]);
        assert_eq!(seq.clamp(2), 3);
        assert_eq!(seq.as_slice(), &[0, 0, 2, 2, 2]);
        assert_eq!(seq.clamp(2), 0);
    }

    #[test]
    fn increment_then_clamp_stays_in_bounds() {
        let bound = 2;
        for len in 1..=8 {
            let mut seq = DigitSequence::from_slice(&vec![bound; len]);
            for _ in 0..500 {
                seq.increment();
                seq.clamp(bound);
                assert!(seq.iter().all(|d| (0..=bound).contains(&d)), "{seq:?}");
            }
        }
    }

    #[test]
    fn reset_zeroes_every_position() {
        let mut seq = DigitSequence::from_slice(&[1, 2, 3]);
        seq.reset();
        assert_eq!(seq, DigitSequence::new(3));
    }

    #[test]
    fn serializes_as_digit_list() {
        let seq = DigitSequence::from_slice(&[1, 0, 2]);
        let json = serde_json::to_string(&seq).unwrap();
        assert_eq!(json, r#"{"digits":[1,0,2]}"#);
    }
}
