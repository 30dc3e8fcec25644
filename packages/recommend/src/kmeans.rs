//! Seeded k-means clustering over two-dimensional points.
//!
//! Centroids are initialised with k-means++ from a [`StdRng`] seeded by
//! the caller, then refined with Lloyd iterations until assignments stop
//! changing. The same points in the same order with the same seed always
//! produce the same labels.

use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng as _};

/// A point in feature space.
pub type Point = [f64; 2];

/// Upper bound on Lloyd iterations.
pub const MAX_ITERATIONS: usize = 300;

/// A fitted clustering.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// Cluster index for each input point, in input order.
    pub labels: Vec<usize>,
    /// Final centroid of each cluster.
    pub centroids: Vec<Point>,
    /// Lloyd iterations run before convergence.
    pub iterations: usize,
}

impl Clustering {
    /// Number of clusters.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.centroids.len()
    }
}

fn squared_distance(a: &Point, b: &Point) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx.mul_add(dx, dy * dy)
}

/// Index of the nearest centroid. Ties go to the lowest index.
fn nearest(point: &Point, centroids: &[Point]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let d = squared_distance(point, centroid);
        if d < best_distance {
            best = idx;
            best_distance = d;
        }
    }
    best
}

/// k-means++ seeding.
///
/// When every remaining point already coincides with a chosen centroid
/// (duplicate input), the remaining centroids repeat the first one.
fn init_centroids(points: &[Point], k: usize, rng: &mut StdRng) -> Vec<Point> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())]);

    let mut min_distances: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = min_distances.iter().sum();

        let next = if total > 0.0 {
            let mut threshold = rng.r#gen::<f64>() * total;
            let mut chosen = points.len() - 1;
            for (idx, d) in min_distances.iter().enumerate() {
                if *d <= 0.0 {
                    continue;
                }
                if threshold < *d {
                    chosen = idx;
                    break;
                }
                threshold -= d;
            }
            // Rounding can leave `chosen` on a point that is already a centroid.
            if min_distances[chosen] <= 0.0 {
                chosen = min_distances
                    .iter()
                    .rposition(|d| *d > 0.0)
                    .unwrap_or(chosen);
            }
            points[chosen]
        } else {
            centroids[0]
        };

        for (idx, p) in points.iter().enumerate() {
            let d = squared_distance(p, &next);
            if d < min_distances[idx] {
                min_distances[idx] = d;
            }
        }
        centroids.push(next);
    }

    centroids
}

/// Clusters `points` into `k` groups.
///
/// `k` is capped at `points.len()`; an empty input or `k == 0` yields an
/// empty clustering.
#[must_use]
pub fn fit(points: &[Point], k: usize, seed: u64) -> Clustering {
    let k = k.min(points.len());
    if k == 0 {
        return Clustering {
            labels: Vec::new(),
            centroids: Vec::new(),
            iterations: 0,
        };
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut centroids = init_centroids(points, k, &mut rng);
    let mut labels: Vec<usize> = points.iter().map(|p| nearest(p, &centroids)).collect();
    let mut iterations = 0;

    while iterations < MAX_ITERATIONS {
        iterations += 1;

        let mut sums = vec![[0.0_f64; 2]; k];
        let mut counts = vec![0_usize; k];
        for (point, &label) in points.iter().zip(&labels) {
            sums[label][0] += point[0];
            sums[label][1] += point[1];
            counts[label] += 1;
        }

        for (idx, centroid) in centroids.iter_mut().enumerate() {
            // Empty clusters keep their previous centroid.
            if counts[idx] > 0 {
                #[allow(clippy::cast_precision_loss)]
                let n = counts[idx] as f64;
                *centroid = [sums[idx][0] / n, sums[idx][1] / n];
            }
        }

        let next_labels: Vec<usize> = points.iter().map(|p| nearest(p, &centroids)).collect();
        if next_labels == labels {
            break;
        }
        labels = next_labels;
    }

    log::trace!("k-means converged after {iterations} iteration(s) with k={k}");

    Clustering {
        labels,
        centroids,
        iterations,
    }
}

/// Rescales each coordinate to zero mean and unit variance.
///
/// A coordinate with zero variance becomes `0.0` for every point.
#[must_use]
pub fn standardize(points: &[Point]) -> Vec<Point> {
    if points.is_empty() {
        return Vec::new();
    }

    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let mut scaled = points.to_vec();

    for axis in 0..2 {
        let mean = points.iter().map(|p| p[axis]).sum::<f64>() / n;
        let variance = points
            .iter()
            .map(|p| (p[axis] - mean).powi(2))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();

        for p in &mut scaled {
            p[axis] = if std_dev > 0.0 {
                (p[axis] - mean) / std_dev
            } else {
                0.0
            };
        }
    }

    scaled
}
