/// Shape and placement of one 2D array.
///
/// Cell-centred pressure and the two face-staggered velocity components all
/// use this type; they differ only in `width`/`height` and `origin`, which is
/// the physical position of sample `(0, 0)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid2 {
    width: usize,
    height: usize,
    dx: f64,
    dy: f64,
    origin: (f64, f64),
}

impl Grid2 {
    pub fn new(width: usize, height: usize, dx: f64, dy: f64, origin: (f64, f64)) -> Self {
        assert!(width > 0, "width must be > 0");
        assert!(height > 0, "height must be > 0");
        assert!(dx > 0.0, "dx must be > 0");
        assert!(dy > 0.0, "dy must be > 0");
        Self {
            width,
            height,
            dx,
            dy,
            origin,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    pub fn size(&self) -> usize {
        self.width * self.height
    }

    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    pub fn clamp_coord(&self, x: i64, y: i64) -> (usize, usize) {
        let max_x = (self.width - 1) as i64;
        let max_y = (self.height - 1) as i64;
        let cx = x.clamp(0, max_x) as usize;
        let cy = y.clamp(0, max_y) as usize;
        (cx, cy)
    }

    pub fn position(&self, x: usize, y: usize) -> (f64, f64) {
        (
            self.origin.0 + x as f64 * self.dx,
            self.origin.1 + y as f64 * self.dy,
        )
    }

    /// Physical x coordinate of every column.
    pub fn x_coords(&self) -> Vec<f64> {
        (0..self.width)
            .map(|x| self.origin.0 + x as f64 * self.dx)
            .collect()
    }

    /// Physical y coordinate of every row.
    pub fn y_coords(&self) -> Vec<f64> {
        (0..self.height)
            .map(|y| self.origin.1 + y as f64 * self.dy)
            .collect()
    }

    /// Column whose x coordinate is closest to `x`; ties go to the lower index.
    pub fn nearest_column(&self, x: f64) -> usize {
        nearest_index(self.width, |i| self.origin.0 + i as f64 * self.dx, x)
    }

    /// Row whose y coordinate is closest to `y`; ties go to the lower index.
    pub fn nearest_row(&self, y: f64) -> usize {
        nearest_index(self.height, |j| self.origin.1 + j as f64 * self.dy, y)
    }
}

fn nearest_index(len: usize, coord: impl Fn(usize) -> f64, target: f64) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for i in 0..len {
        let dist = (coord(i) - target).abs();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idx_is_row_major() {
        let grid = Grid2::new(4, 3, 1.0, 1.0, (0.0, 0.0));
        assert_eq!(grid.idx(0, 0), 0);
        assert_eq!(grid.idx(3, 0), 3);
        assert_eq!(grid.idx(0, 1), 4);
        assert_eq!(grid.idx(3, 2), 11);
    }

    #[test]
    fn clamp_coord_stays_inside() {
        let grid = Grid2::new(4, 3, 1.0, 1.0, (0.0, 0.0));
        assert_eq!(grid.clamp_coord(-1, -5), (0, 0));
        assert_eq!(grid.clamp_coord(4, 3), (3, 2));
        assert_eq!(grid.clamp_coord(2, 1), (2, 1));
    }

    #[test]
    fn position_applies_origin_and_spacing() {
        let grid = Grid2::new(5, 4, 0.25, 0.5, (0.0, 0.25));
        assert_eq!(grid.position(0, 0), (0.0, 0.25));
        assert_eq!(grid.position(2, 1), (0.5, 0.75));
    }

    #[test]
    fn nearest_column_prefers_lower_on_tie() {
        let grid = Grid2::new(4, 1, 0.25, 1.0, (0.125, 0.0));
        // columns at 0.125, 0.375, 0.625, 0.875: 0.5 is equidistant
        assert_eq!(grid.nearest_column(0.5), 1);
        let faces = Grid2::new(5, 1, 0.25, 1.0, (0.0, 0.0));
        assert_eq!(faces.nearest_column(0.5), 2);
    }
}
