//! Bounded combination search.
//!
//! Subsets are produced in lexicographic index order and generation stops once
//! `limit` subsets exist. Since the pool is sorted best-first before search,
//! early subsets favour strong candidates, but the cap means later (possibly
//! better-scoring as a team) subsets are never seen. Results are heuristic,
//! not optimal.

/// Default cap on generated subsets
pub const MAX_COMBINATIONS: usize = 100;

/// Generate up to `limit` distinct `size`-subsets of `0..pool_size` as index lists
pub fn index_combinations(pool_size: usize, size: usize, limit: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if size == 0 || size > pool_size || limit == 0 {
        return out;
    }

    let mut current = Vec::with_capacity(size);
    extend(0, pool_size, size, limit, &mut current, &mut out);
    out
}

fn extend(
    start: usize,
    pool_size: usize,
    size: usize,
    limit: usize,
    current: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if out.len() >= limit {
        return;
    }
    if current.len() == size {
        out.push(current.clone());
        return;
    }

    let remaining = size - current.len();
    // Stop early once too few elements are left to finish the subset
    for i in start..=(pool_size - remaining) {
        current.push(i);
        extend(i + 1, pool_size, size, limit, current, out);
        current.pop();
        if out.len() >= limit {
            return;
        }
    }
}

/// Generate up to `limit` `size`-subsets of `pool`, preserving pool order
pub fn combinations<'a, T>(pool: &'a [T], size: usize, limit: usize) -> Vec<Vec<&'a T>> {
    index_combinations(pool.len(), size, limit)
        .into_iter()
        .map(|indices| indices.into_iter().map(|i| &pool[i]).collect())
        .collect()
}

/// C(n, k), saturating on overflow
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: usize = 1;
    for i in 0..k {
        result = match result.checked_mul(n - i) {
            Some(v) => v / (i + 1),
            None => return usize::MAX,
        };
    }
    result
}
