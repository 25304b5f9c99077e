use crate::grid::Grid;

/// For each pooled cell, which cell of its block held the maximum
///
/// Indices are flat and local to the `window × window` block, in row-major
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgmaxCache {
    window: usize,
    pooled_cols: usize,
    local: Vec<usize>,
}
impl ArgmaxCache {
    pub fn new(window: usize, pooled_rows: usize, pooled_cols: usize) -> Self {
        assert!(window != 0);
        Self {
            window,
            pooled_cols,
            local: vec![0; pooled_rows * pooled_cols],
        }
    }

    pub fn len(&self) -> usize {
        self.local.len()
    }
    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }

    /// Flat block-local index of the maximum of pooled cell `cell`
    pub fn local_index(&self, cell: usize) -> usize {
        self.local[cell]
    }

    /// Absolute `(row, col)` in the feature map of the maximum of pooled cell
    /// `cell`
    pub fn source(&self, cell: usize) -> (usize, usize) {
        let block_row = cell / self.pooled_cols;
        let block_col = cell % self.pooled_cols;
        let local = self.local[cell];
        let row = block_row * self.window + local / self.window;
        let col = block_col * self.window + local % self.window;
        (row, col)
    }

    pub fn sources(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.len()).map(|cell| self.source(cell))
    }
}

/// Non-overlapping `window × window` max pooling
pub fn max_pool(map: &Grid, window: usize) -> (Grid, ArgmaxCache) {
    let (rows, cols) = pooled_shape(map, window);
    let mut pooled = Grid::zeros(rows, cols);
    let mut cache = ArgmaxCache::new(window, rows, cols);
    max_pool_into(map, &mut pooled, &mut cache);
    (pooled, cache)
}

/// [`max_pool`] writing into preallocated outputs
///
/// Ties resolve to the first maximum in row-major order within the block.
pub fn max_pool_into(map: &Grid, pooled: &mut Grid, cache: &mut ArgmaxCache) {
    let window = cache.window;
    assert_eq!(pooled.shape(), pooled_shape(map, window));
    assert_eq!(cache.len(), pooled.rows() * pooled.cols());
    for block_row in 0..pooled.rows() {
        for block_col in 0..pooled.cols() {
            let mut max = f64::NEG_INFINITY;
            let mut max_i = 0;
            for i in 0..window {
                let row = map.row(block_row * window + i);
                let block = &row[block_col * window..(block_col + 1) * window];
                for (j, x) in block.iter().copied().enumerate() {
                    if (i == 0 && j == 0) || max < x {
                        max = x;
                        max_i = i * window + j;
                    }
                }
            }
            *pooled.at_mut(block_row, block_col) = max;
            cache.local[block_row * pooled.cols() + block_col] = max_i;
        }
    }
}

/// Route `gradient` (one value per pooled cell) to the cells that held the
/// maxima
///
/// Every other cell of `out` is left as is.
pub fn scatter_to_argmax(cache: &ArgmaxCache, gradient: &[f64], out: &mut Grid) {
    assert_eq!(cache.len(), gradient.len());
    for (cell, g) in gradient.iter().copied().enumerate() {
        let (row, col) = cache.source(cell);
        *out.at_mut(row, col) = g;
    }
}

/// Zero the cells written by [`scatter_to_argmax`]
pub fn clear_argmax(cache: &ArgmaxCache, out: &mut Grid) {
    for (row, col) in cache.sources() {
        *out.at_mut(row, col) = 0.;
    }
}

fn pooled_shape(map: &Grid, window: usize) -> (usize, usize) {
    assert!(window != 0);
    assert_eq!(map.rows() % window, 0);
    assert_eq!(map.cols() % window, 0);
    (map.rows() / window, map.cols() / window)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(data: &[i32], cols: usize) -> Grid {
        let data = data.iter().copied().map(|x| x as f64).collect();
        Grid::new(data, cols).unwrap()
    }

    #[test]
    fn test_max_pooling() {
        let image = grid(
            &[
                2, 2, 7, 3, //
                9, 4, 6, 1, //
                8, 5, 2, 4, //
                3, 1, 2, 6, //
            ],
            4,
        );
        let (pooled, cache) = max_pool(&image, 2);
        assert_eq!(
            pooled.as_slice(),
            [
                9., 7., //
                8., 6., //
            ]
        );
        assert_eq!(cache.local_index(0), 2);
        assert_eq!(cache.local_index(1), 0);
        assert_eq!(cache.local_index(2), 0);
        assert_eq!(cache.local_index(3), 3);
        assert_eq!(
            cache.sources().collect::<Vec<_>>(),
            [(1, 0), (0, 2), (2, 0), (3, 3)]
        );
    }

    #[test]
    fn window_of_three_unravels_with_three() {
        let mut map = Grid::zeros(6, 6);
        // block (0, 1) max at local (2, 1); block (1, 0) max at local (1, 2)
        *map.at_mut(2, 4) = 5.;
        *map.at_mut(4, 2) = 3.;
        let (pooled, cache) = max_pool(&map, 3);
        assert_eq!(pooled.as_slice(), [0., 5., 3., 0.]);
        assert_eq!(cache.local_index(1), 7);
        assert_eq!(cache.source(1), (2, 4));
        assert_eq!(cache.local_index(2), 5);
        assert_eq!(cache.source(2), (4, 2));
    }

    #[test]
    fn ties_resolve_to_first_in_row_major_order() {
        let map = grid(
            &[
                1, 4, //
                4, 4, //
            ],
            2,
        );
        let (_, cache) = max_pool(&map, 2);
        assert_eq!(cache.local_index(0), 1);

        let (_, cache) = max_pool(&Grid::filled(2, 2, -1.), 2);
        assert_eq!(cache.local_index(0), 0);
    }

    #[test]
    fn unit_window_is_identity() {
        let map = grid(
            &[
                0, 3, 1, //
                2, 0, 5, //
            ],
            3,
        );
        let (pooled, cache) = max_pool(&map, 1);
        assert_eq!(pooled, map);
        for (cell, (row, col)) in cache.sources().enumerate() {
            assert_eq!(cell, row * 3 + col);
        }
    }

    #[test]
    fn scatter_then_clear_restores_zeros() {
        let map = grid(
            &[
                2, 2, 7, 3, //
                9, 4, 6, 1, //
                8, 5, 2, 4, //
                3, 1, 2, 6, //
            ],
            4,
        );
        let (_, cache) = max_pool(&map, 2);
        let mut out = Grid::zeros(4, 4);
        scatter_to_argmax(&cache, &[1., 2., 3., 4.], &mut out);
        let expected = [
            0., 0., 2., 0., //
            1., 0., 0., 0., //
            3., 0., 0., 0., //
            0., 0., 0., 4., //
        ];
        assert_eq!(out.as_slice(), expected);
        clear_argmax(&cache, &mut out);
        assert!(out.as_slice().iter().all(|&x| x == 0.));
    }
}
