use std::collections::VecDeque;

/// Weighted percentile over recent values.
pub trait PercentileTracker: Send {
    fn add_sample(&mut self, weight: u32, value: f64);

    /// Value at percentile `p` in `[0, 1]`, or `NaN` when empty.
    fn percentile(&self, p: f64) -> f64;
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct WeightedValue {
    weight: u32,
    value: f64,
}

/// Sliding-window weighted percentile.
///
/// Samples are kept in arrival order and the total weight never exceeds
/// `max_weight`: the oldest sample is removed (or has its weight reduced)
/// when a new one pushes the total over the limit.
#[derive(Clone, Debug)]
pub struct SlidingPercentile {
    max_weight: u64,
    total_weight: u64,
    samples: VecDeque<WeightedValue>,
}

impl SlidingPercentile {
    #[must_use]
    pub fn new(max_weight: u32) -> Self {
        Self {
            max_weight: u64::from(max_weight),
            total_weight: 0,
            samples: VecDeque::new(),
        }
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn trim(&mut self) {
        while self.total_weight > self.max_weight {
            let excess = self.total_weight - self.max_weight;
            let Some(oldest) = self.samples.front_mut() else {
                break;
            };
            let weight = u64::from(oldest.weight);
            if weight <= excess {
                self.total_weight -= weight;
                self.samples.pop_front();
            } else {
                // excess < weight, so it fits u32
                oldest.weight -= u32::try_from(excess).unwrap_or(oldest.weight);
                self.total_weight -= excess;
            }
        }
    }
}

impl PercentileTracker for SlidingPercentile {
    fn add_sample(&mut self, weight: u32, value: f64) {
        self.samples.push_back(WeightedValue { weight, value });
        self.total_weight += u64::from(weight);
        self.trim();
    }

    fn percentile(&self, p: f64) -> f64 {
        let mut by_value: Vec<WeightedValue> = self.samples.iter().copied().collect();
        by_value.sort_by(|a, b| a.value.total_cmp(&b.value));

        #[expect(clippy::cast_precision_loss, reason = "weights are bounded by max_weight")]
        let desired = p * self.total_weight as f64;
        let mut accumulated = 0.0;
        for sample in &by_value {
            accumulated += f64::from(sample.weight);
            if accumulated >= desired {
                return sample.value;
            }
        }
        // Rounding may leave `desired` above the total; fall back to the max.
        by_value.last().map_or(f64::NAN, |s| s.value)
    }
}
