//! Centered-rank fitness shaping.
//!
//! Raw episodic rewards can have any scale and heavy tails, ranking them makes the gradient
//! estimate invariant to both.

/// The summed rewards of the positive and negative rollouts of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RewardPair {
    pub positive: f64,
    pub negative: f64,
}

impl RewardPair {
    pub fn new(positive: f64, negative: f64) -> Self {
        Self { positive, negative }
    }
}

/// Maps every value to its ascending rank scaled into `[-0.5, 0.5]`: `rank / (n - 1) - 0.5`.
///
/// Values that compare equal share the mean of the ranks they span, so equal rewards always
/// get equal fitness.
///
/// # Arguments
/// * `x` - The raw values.
///
/// # Returns
/// The centered rank of each value, in the same positions as `x`.
pub fn centered_ranks(x: &[f64]) -> Vec<f64> {
    let n = x.len();
    if n <= 1 {
        return vec![0.; n];
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| x[a].total_cmp(&x[b]));

    let scale = (n - 1) as f64;
    let mut ranks = vec![0.; n];
    let mut lo = 0;

    while lo < n {
        let mut hi = lo + 1;
        while hi < n && x[order[hi]].total_cmp(&x[order[lo]]).is_eq() {
            hi += 1;
        }

        let rank = (lo + hi - 1) as f64 / 2.;
        for &i in &order[lo..hi] {
            ranks[i] = rank / scale - 0.5;
        }

        lo = hi;
    }

    ranks
}

/// Shapes the reward pairs of all workers into one fitness difference per worker.
///
/// # Arguments
/// * `pairs` - One pair per worker, ordered by worker index.
///
/// # Returns
/// `centered(positive) - centered(negative)` per worker, in the same order as `pairs`.
pub fn fitness_differences(pairs: &[RewardPair]) -> Vec<f64> {
    let flat: Vec<f64> = pairs
        .iter()
        .flat_map(|p| [p.positive, p.negative])
        .collect();

    centered_ranks(&flat)
        .chunks_exact(2)
        .map(|c| c[0] - c[1])
        .collect()
}
