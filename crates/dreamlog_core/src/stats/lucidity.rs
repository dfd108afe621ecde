//! Lucidity aggregation.

use super::breakdown::round2;
use serde::{Deserialize, Serialize};

/// Sum of lucidity ratings and the number of dreams it covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuciditySum {
    pub sum: i64,
    pub count: u64,
}

impl LuciditySum {
    /// Mean rating rounded to two decimals; `None` when there are no dreams.
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(round2(self.sum as f64 / self.count as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::LuciditySum;

    #[test]
    fn average_of_one_to_four_is_two_and_a_half() {
        let sum = LuciditySum { sum: 10, count: 4 };
        assert_eq!(sum.average(), Some(2.5));
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        let sum = LuciditySum { sum: 2, count: 3 };
        assert_eq!(sum.average(), Some(0.67));
    }

    #[test]
    fn average_without_dreams_is_none() {
        assert_eq!(LuciditySum::default().average(), None);
    }
}
