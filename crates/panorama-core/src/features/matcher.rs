use ndarray::Array2;
use rayon::prelude::*;
use tracing::debug;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

use super::{Descriptor, Match};

/// Euclidean distance between two descriptors.
#[inline]
pub fn l2_distance(a: &Descriptor, b: &Descriptor) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Brute-force L2 matching with cross-check.
///
/// For each query descriptor the nearest train descriptor is found; the pair
/// is kept only if that query descriptor is in turn the nearest to the train
/// descriptor. Results are sorted by ascending distance, ties broken by
/// `(query_idx, train_idx)`, so identical inputs always give the identical
/// list. Nothing is truncated here.
pub fn match_descriptors(train: &[Descriptor], query: &[Descriptor]) -> Vec<Match> {
    let (nq, nt) = (query.len(), train.len());
    if nq == 0 || nt == 0 {
        return Vec::new();
    }

    let distances = distance_matrix(query, train);

    // Nearest train index per query row; first index wins ties.
    let forward: Vec<usize> = distances
        .rows()
        .into_iter()
        .map(|row| argmin(row.iter().copied()))
        .collect();
    // Nearest query index per train column.
    let reverse: Vec<usize> = distances
        .columns()
        .into_iter()
        .map(|col| argmin(col.iter().copied()))
        .collect();

    let mut matches: Vec<Match> = forward
        .iter()
        .enumerate()
        .filter(|&(q, &t)| reverse[t] == q)
        .map(|(q, &t)| Match {
            query_idx: q,
            train_idx: t,
            distance: distances[[q, t]],
        })
        .collect();

    matches.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.query_idx.cmp(&b.query_idx))
            .then_with(|| a.train_idx.cmp(&b.train_idx))
    });

    debug!(
        query = nq,
        train = nt,
        matches = matches.len(),
        "Cross-checked descriptor matching"
    );
    matches
}

/// Pairwise distances, shape = (query, train).
fn distance_matrix(query: &[Descriptor], train: &[Descriptor]) -> Array2<f32> {
    let mut distances = Array2::<f32>::zeros((query.len(), train.len()));
    let fill_row = |(q, mut row): (usize, ndarray::ArrayViewMut1<f32>)| {
        for (t, d) in row.iter_mut().enumerate() {
            *d = l2_distance(&query[q], &train[t]);
        }
    };

    if query.len() * train.len() >= PARALLEL_PIXEL_THRESHOLD {
        distances
            .outer_iter_mut()
            .into_par_iter()
            .enumerate()
            .for_each(fill_row);
    } else {
        distances.outer_iter_mut().enumerate().for_each(fill_row);
    }
    distances
}

fn argmin(values: impl Iterator<Item = f32>) -> usize {
    let mut best = (0usize, f32::INFINITY);
    for (i, v) in values.enumerate() {
        if v < best.1 {
            best = (i, v);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DESCRIPTOR_LENGTH;

    fn unit(i: usize) -> Descriptor {
        let mut d = [0.0; DESCRIPTOR_LENGTH];
        d[i] = 1.0;
        d
    }

    #[test]
    fn identical_sets_match_one_to_one() {
        let set: Vec<Descriptor> = (0..5).map(unit).collect();
        let matches = match_descriptors(&set, &set);
        assert_eq!(matches.len(), 5);
        for m in &matches {
            assert_eq!(m.query_idx, m.train_idx);
            assert_eq!(m.distance, 0.0);
        }
    }

    #[test]
    fn cross_check_rejects_one_sided_nearest() {
        // Both queries are nearest to train 0, but train 0 is nearest to query 0 only.
        let train = vec![unit(0)];
        let mut q1 = unit(0);
        q1[1] = 0.5;
        let query = vec![unit(0), q1];
        let matches = match_descriptors(&train, &query);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].query_idx, 0);
    }

    #[test]
    fn empty_side_gives_no_matches() {
        let set: Vec<Descriptor> = (0..3).map(unit).collect();
        assert!(match_descriptors(&[], &set).is_empty());
        assert!(match_descriptors(&set, &[]).is_empty());
    }
}
