/// Greedy nearest-centroid assignment between tracks and detections
///
/// This is deliberately not an optimal bipartite matching. Rows (tracks) are
/// visited in order of their closest detection, and each row takes its own
/// nearest column if that column is still free. Ties and crossings resolve by
/// that row priority, which keeps track identities stable in the way callers
/// of this tracker expect.
use crate::bbox::centroid_distance;
use crate::error::Result;
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

/// Result of a greedy assignment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    /// Committed (row, col) pairs in the order they were made
    pub matches: Vec<(usize, usize)>,
    /// Rows that were not matched, ascending
    pub unmatched_rows: Vec<usize>,
    /// Columns that were not matched, ascending
    pub unmatched_cols: Vec<usize>,
}

/// Pairwise Euclidean distances between track and detection centroids.
/// Returns: (n_tracks, n_detections) matrix
pub fn centroid_distances(
    track_centroids: &[(i32, i32)],
    detection_centroids: &[(i32, i32)],
) -> Result<Array2<f64>> {
    let n_tracks = track_centroids.len();
    let n_dets = detection_centroids.len();

    if n_tracks == 0 || n_dets == 0 {
        return Ok(Array2::zeros((n_tracks, n_dets)));
    }

    let data: Vec<f64> = track_centroids
        .par_iter()
        .flat_map_iter(|&t| {
            detection_centroids
                .iter()
                .map(move |&d| centroid_distance(t, d))
        })
        .collect();

    Ok(Array2::from_shape_vec((n_tracks, n_dets), data)?)
}

/// First index of the smallest value in `row`, with that value
fn row_argmin(row: ndarray::ArrayView1<f64>) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (col, &d) in row.iter().enumerate() {
        if d < best.1 {
            best = (col, d);
        }
    }
    best
}

/// Greedily match rows to columns of a distance matrix.
///
/// Rows are ordered by ascending row minimum (stable, so equal minima keep
/// their original order). Each row proposes its nearest column; the pair is
/// committed only if neither side has been used yet. No row and no column is
/// ever matched twice.
pub fn greedy_assign(distances: ArrayView2<f64>) -> Assignment {
    let (n_rows, n_cols) = distances.dim();

    if n_rows == 0 || n_cols == 0 {
        return Assignment {
            matches: Vec::new(),
            unmatched_rows: (0..n_rows).collect(),
            unmatched_cols: (0..n_cols).collect(),
        };
    }

    let nearest: Vec<(usize, f64)> = distances.rows().into_iter().map(row_argmin).collect();

    let mut order: Vec<usize> = (0..n_rows).collect();
    order.sort_by(|&a, &b| nearest[a].1.total_cmp(&nearest[b].1));

    let mut used_rows = vec![false; n_rows];
    let mut used_cols = vec![false; n_cols];
    let mut matches = Vec::with_capacity(n_rows.min(n_cols));

    for row in order {
        let col = nearest[row].0;
        if used_rows[row] || used_cols[col] {
            continue;
        }
        used_rows[row] = true;
        used_cols[col] = true;
        matches.push((row, col));
    }

    Assignment {
        matches,
        unmatched_rows: (0..n_rows).filter(|&r| !used_rows[r]).collect(),
        unmatched_cols: (0..n_cols).filter(|&c| !used_cols[c]).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_distance_matrix_shape() {
        let d = centroid_distances(&[(0, 0), (10, 0)], &[(0, 0), (3, 4), (10, 10)]).unwrap();
        assert_eq!(d.dim(), (2, 3));
        assert_abs_diff_eq!(d[(0, 1)], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d[(1, 2)], 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_distance_matrix_empty() {
        let d = centroid_distances(&[], &[(1, 1)]).unwrap();
        assert_eq!(d.dim(), (0, 1));
    }

    #[test]
    fn test_simple_assignment() {
        let d = array![[1.0, 50.0], [60.0, 2.0]];
        let a = greedy_assign(d.view());
        assert_eq!(a.matches, vec![(0, 0), (1, 1)]);
        assert!(a.unmatched_rows.is_empty());
        assert!(a.unmatched_cols.is_empty());
    }

    #[test]
    fn test_row_priority_wins_conflicts() {
        // Both rows prefer column 0; row 1 is closer so it is served first.
        let d = array![[5.0, 6.0], [1.0, 100.0]];
        let a = greedy_assign(d.view());
        assert_eq!(a.matches, vec![(1, 0)]);
        // row 0 does not fall back to its second choice
        assert_eq!(a.unmatched_rows, vec![0]);
        assert_eq!(a.unmatched_cols, vec![1]);
    }

    #[test]
    fn test_greedy_is_not_optimal() {
        // Optimal total cost is 2 + 2 = 4 via (0,1),(1,0); greedy takes (0,0) first.
        let d = array![[1.0, 2.0], [2.0, 100.0]];
        let a = greedy_assign(d.view());
        assert_eq!(a.matches, vec![(0, 0)]);
        assert_eq!(a.unmatched_rows, vec![1]);
    }

    #[test]
    fn test_equal_minima_keep_row_order() {
        let d = array![[3.0, 9.0], [3.0, 9.0], [3.0, 1.0]];
        let a = greedy_assign(d.view());
        // row 2 (min 1.0) first, then rows 0 and 1 in original order
        assert_eq!(a.matches, vec![(2, 1), (0, 0)]);
        assert_eq!(a.unmatched_rows, vec![1]);
    }

    #[test]
    fn test_first_argmin_on_ties() {
        let d = array![[4.0, 4.0, 4.0]];
        let a = greedy_assign(d.view());
        assert_eq!(a.matches, vec![(0, 0)]);
        assert_eq!(a.unmatched_cols, vec![1, 2]);
    }

    #[test]
    fn test_no_double_matches() {
        let d = array![
            [1.0, 1.0, 9.0, 9.0],
            [1.0, 2.0, 9.0, 9.0],
            [9.0, 9.0, 1.0, 1.0],
            [9.0, 9.0, 1.0, 3.0],
            [0.5, 9.0, 9.0, 9.0],
        ];
        let a = greedy_assign(d.view());
        let mut rows: Vec<usize> = a.matches.iter().map(|m| m.0).collect();
        let mut cols: Vec<usize> = a.matches.iter().map(|m| m.1).collect();
        rows.sort_unstable();
        cols.sort_unstable();
        rows.dedup();
        cols.dedup();
        assert_eq!(rows.len(), a.matches.len());
        assert_eq!(cols.len(), a.matches.len());
        assert_eq!(a.matches.len() + a.unmatched_rows.len(), 5);
        assert_eq!(a.matches.len() + a.unmatched_cols.len(), 4);
    }

    #[test]
    fn test_empty_matrix() {
        let d = Array2::<f64>::zeros((0, 3));
        let a = greedy_assign(d.view());
        assert!(a.matches.is_empty());
        assert_eq!(a.unmatched_cols, vec![0, 1, 2]);
    }
}
