use crate::grid::Grid2;
use rayon::prelude::*;
use std::ops::Range;
use std::sync::OnceLock;

const PAR_THRESHOLD_DEFAULT: usize = 16_384;
const PAR_MIN_WORK_PER_THREAD: usize = 2048;

fn parallel_threshold() -> usize {
    static THRESHOLD: OnceLock<usize> = OnceLock::new();
    *THRESHOLD.get_or_init(|| {
        std::env::var("CAVITY_PAR_THRESHOLD")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(PAR_THRESHOLD_DEFAULT)
    })
}

pub(crate) fn should_parallel(len: usize) -> bool {
    if len < parallel_threshold() {
        return false;
    }
    let threads = rayon::current_num_threads().max(1);
    len / threads >= PAR_MIN_WORK_PER_THREAD
}

/// Partial sums run over fixed blocks and are added in block order, so a
/// reduction gives the same bits on any thread count and on either path.
const REDUCE_BLOCK: usize = 4096;

fn blocked_sum(len: usize, block_total: impl Fn(Range<usize>) -> f64 + Sync) -> f64 {
    let blocks = len.div_ceil(REDUCE_BLOCK);
    let block = |b: usize| b * REDUCE_BLOCK..((b + 1) * REDUCE_BLOCK).min(len);
    let partials: Vec<f64> = if should_parallel(len) {
        (0..blocks)
            .into_par_iter()
            .map(|b| block_total(block(b)))
            .collect()
    } else {
        (0..blocks).map(|b| block_total(block(b))).collect()
    };
    partials.iter().sum()
}

/// Row-major `f64` samples over a [`Grid2`]. Row index is y.
#[derive(Clone, Debug, PartialEq)]
pub struct Field2 {
    grid: Grid2,
    data: Vec<f64>,
}

impl Field2 {
    pub fn new(grid: Grid2, fill: f64) -> Self {
        let data = vec![fill; grid.size()];
        Self { grid, data }
    }

    pub fn from_fn(grid: Grid2, f: impl Fn(usize, usize) -> f64 + Sync) -> Self {
        let mut field = Self::new(grid, 0.0);
        field.fill_with_index(f);
        field
    }

    pub fn grid(&self) -> Grid2 {
        self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[self.grid.idx(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        let i = self.grid.idx(x, y);
        self.data[i] = value;
    }

    pub fn sample_clamped(&self, x: i64, y: i64) -> f64 {
        let (cx, cy) = self.grid.clamp_coord(x, y);
        self.get(cx, cy)
    }

    pub fn row(&self, y: usize) -> &[f64] {
        let width = self.grid.width();
        &self.data[y * width..(y + 1) * width]
    }

    pub fn column(&self, x: usize) -> Vec<f64> {
        (0..self.grid.height()).map(|y| self.get(x, y)).collect()
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    pub fn fill_row(&mut self, y: usize, value: f64) {
        let width = self.grid.width();
        self.data[y * width..(y + 1) * width].fill(value);
    }

    pub fn fill_column(&mut self, x: usize, value: f64) {
        for y in 0..self.grid.height() {
            self.set(x, y, value);
        }
    }

    pub fn fill_with_index(&mut self, f: impl Fn(usize, usize) -> f64 + Sync) {
        let width = self.grid.width();
        if should_parallel(self.data.len()) {
            self.data
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, value) in row.iter_mut().enumerate() {
                        *value = f(x, y);
                    }
                });
        } else {
            for (y, row) in self.data.chunks_mut(width).enumerate() {
                for (x, value) in row.iter_mut().enumerate() {
                    *value = f(x, y);
                }
            }
        }
    }

    pub fn update_with_index(&mut self, f: impl Fn(usize, usize, f64) -> f64 + Sync) {
        let width = self.grid.width();
        if should_parallel(self.data.len()) {
            self.data
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, value) in row.iter_mut().enumerate() {
                        *value = f(x, y, *value);
                    }
                });
        } else {
            for (y, row) in self.data.chunks_mut(width).enumerate() {
                for (x, value) in row.iter_mut().enumerate() {
                    *value = f(x, y, *value);
                }
            }
        }
    }

    pub fn clone_from(&mut self, other: &Self) {
        self.assert_same_grid(other);
        self.data.clone_from(&other.data);
    }

    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64 + Sync) -> Self {
        self.assert_same_grid(other);
        let mut data = vec![0.0; self.data.len()];
        if should_parallel(data.len()) {
            data.par_iter_mut()
                .zip(self.data.par_iter())
                .zip(other.data.par_iter())
                .for_each(|((out, left), right)| {
                    *out = f(*left, *right);
                });
        } else {
            for ((out, left), right) in data
                .iter_mut()
                .zip(self.data.iter())
                .zip(other.data.iter())
            {
                *out = f(*left, *right);
            }
        }
        Self {
            grid: self.grid,
            data,
        }
    }

    pub fn shift_in_place(&mut self, offset: f64) {
        if should_parallel(self.data.len()) {
            self.data.par_iter_mut().for_each(|value| *value += offset);
        } else {
            for value in &mut self.data {
                *value += offset;
            }
        }
    }

    /// Gauge fix: remove the arithmetic mean so the samples sum to zero.
    pub fn subtract_mean(&mut self) {
        let mean = self.mean();
        self.shift_in_place(-mean);
    }

    pub fn sum(&self) -> f64 {
        blocked_sum(self.data.len(), |range| self.data[range].iter().sum())
    }

    pub fn mean(&self) -> f64 {
        self.sum() / self.data.len() as f64
    }

    pub fn max_abs(&self) -> f64 {
        if should_parallel(self.data.len()) {
            self.data
                .par_iter()
                .map(|value| value.abs())
                .reduce(|| 0.0_f64, f64::max)
        } else {
            self.data
                .iter()
                .map(|value| value.abs())
                .fold(0.0_f64, f64::max)
        }
    }

    pub fn sum_squares(&self) -> f64 {
        blocked_sum(self.data.len(), |range| {
            self.data[range].iter().map(|value| value * value).sum()
        })
    }

    /// Euclidean (Frobenius) norm of all samples.
    pub fn norm(&self) -> f64 {
        self.sum_squares().sqrt()
    }

    /// Frobenius norm of `self - other`.
    pub fn distance(&self, other: &Self) -> f64 {
        self.assert_same_grid(other);
        let sum = blocked_sum(self.data.len(), |range| {
            self.data[range.clone()]
                .iter()
                .zip(&other.data[range])
                .map(|(a, b)| (a - b) * (a - b))
                .sum()
        });
        sum.sqrt()
    }

    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.assert_same_grid(other);
        if should_parallel(self.data.len()) {
            self.data
                .par_iter()
                .zip(other.data.par_iter())
                .map(|(a, b)| (a - b).abs())
                .reduce(|| 0.0_f64, f64::max)
        } else {
            self.data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| (a - b).abs())
                .fold(0.0_f64, f64::max)
        }
    }

    pub fn min_max(&self) -> (f64, f64) {
        let mut iter = self.data.iter().filter(|value| value.is_finite());
        let Some(first) = iter.next() else {
            return (0.0, 0.0);
        };
        let mut min_value = *first;
        let mut max_value = *first;
        for value in iter {
            if *value < min_value {
                min_value = *value;
            }
            if *value > max_value {
                max_value = *value;
            }
        }
        (min_value, max_value)
    }

    pub fn all_finite(&self) -> bool {
        self.data.iter().all(|value| value.is_finite())
    }

    fn assert_same_grid(&self, other: &Self) {
        assert_eq!(self.grid, other.grid, "field grid mismatch");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    fn unit_grid(width: usize, height: usize) -> Grid2 {
        Grid2::new(width, height, 1.0, 1.0, (0.0, 0.0))
    }

    #[test]
    fn from_fn_maps_coords() {
        let field = Field2::from_fn(unit_grid(3, 2), |x, y| (x + y * 10) as f64);
        assert_close(field.get(2, 1), 12.0, 1e-12);
        assert_eq!(field.row(1), &[10.0, 11.0, 12.0]);
        assert_eq!(field.column(1), vec![1.0, 11.0]);
    }

    #[test]
    fn subtract_mean_zeroes_mean() {
        let mut field = Field2::from_fn(unit_grid(5, 4), |x, y| (x * x + 3 * y) as f64);
        field.subtract_mean();
        assert_close(field.mean(), 0.0, 1e-12);
    }

    #[test]
    fn distance_and_max_abs_diff() {
        let a = Field2::new(unit_grid(2, 2), 1.0);
        let b = Field2::from_fn(unit_grid(2, 2), |x, y| if x == 1 && y == 1 { 3.0 } else { 1.0 });
        assert_close(a.distance(&b), 2.0, 1e-12);
        assert_close(a.max_abs_diff(&b), 2.0, 1e-12);
        assert_close(b.norm(), 12.0_f64.sqrt(), 1e-12);
    }

    #[test]
    fn fill_row_and_column() {
        let mut field = Field2::new(unit_grid(3, 3), 0.0);
        field.fill_row(2, 1.0);
        field.fill_column(0, -1.0);
        assert_eq!(field.get(1, 2), 1.0);
        assert_eq!(field.get(0, 2), -1.0);
        assert_eq!(field.get(1, 1), 0.0);
    }

    #[test]
    fn min_max_skips_non_finite() {
        let mut field = Field2::from_fn(unit_grid(2, 2), |x, y| (x + y * 2) as f64 - 1.0);
        field.set(0, 0, f64::NAN);
        assert_eq!(field.min_max(), (0.0, 2.0));
        assert!(!field.all_finite());
    }

    #[test]
    fn parallel_and_serial_fill_agree() {
        let grid = unit_grid(300, 300);
        let field = Field2::from_fn(grid, |x, y| (x as f64).sin() + (y as f64).cos());
        for y in [0, 150, 299] {
            for x in [0, 7, 299] {
                assert_eq!(field.get(x, y), (x as f64).sin() + (y as f64).cos());
            }
        }
    }

    #[test]
    fn sums_do_not_depend_on_thread_count() {
        // mixed magnitudes so any change of summation order shows up in the bits
        let field = Field2::from_fn(unit_grid(400, 300), |x, y| {
            let i = x + y * 400;
            if i % 3 == 0 {
                1.0e8 + i as f64
            } else {
                ((i * 7919) % 1000) as f64 * 1.0e-3
            }
        });
        let other = Field2::new(field.grid(), 0.25);
        let serial: f64 = field
            .as_slice()
            .chunks(REDUCE_BLOCK)
            .map(|block| block.iter().sum::<f64>())
            .sum();
        for threads in [1, 3, 8] {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap();
            let (sum, squares, distance) =
                pool.install(|| (field.sum(), field.sum_squares(), field.distance(&other)));
            assert_eq!(sum.to_bits(), serial.to_bits(), "{threads} threads");
            let (sum_ref, squares_ref, distance_ref) =
                (field.sum(), field.sum_squares(), field.distance(&other));
            assert_eq!(sum.to_bits(), sum_ref.to_bits());
            assert_eq!(squares.to_bits(), squares_ref.to_bits());
            assert_eq!(distance.to_bits(), distance_ref.to_bits());
        }
    }
}
