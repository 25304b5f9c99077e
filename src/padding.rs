use crate::grid::Grid;

/// An image embedded in a zero border of `kernel_size / 2` cells on each side
///
/// The border is never written after construction, so it stays zero no matter
/// how many images are embedded into the same buffer.
#[derive(Debug, Clone)]
pub struct PaddedImage {
    buf: Grid,
    image_rows: usize,
    image_cols: usize,
    offset: usize,
}
impl PaddedImage {
    fn check_rep(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        let (rows, cols) = self.buf.shape();
        assert_eq!(rows, self.image_rows + 2 * self.offset);
        assert_eq!(cols, self.image_cols + 2 * self.offset);
        for row in 0..rows {
            for col in 0..cols {
                if self.is_border(row, col) {
                    assert_eq!(self.buf.at(row, col), 0.);
                }
            }
        }
    }

    /// `kernel_size` is expected to be odd
    pub fn new(image_rows: usize, image_cols: usize, kernel_size: usize) -> Self {
        assert!(kernel_size % 2 == 1);
        let offset = kernel_size / 2;
        let buf = Grid::zeros(image_rows + kernel_size - 1, image_cols + kernel_size - 1);
        let this = Self {
            buf,
            image_rows,
            image_cols,
            offset,
        };
        this.check_rep();
        this
    }

    /// Build a fresh buffer holding `image`
    pub fn from_image(image: &Grid, kernel_size: usize) -> Self {
        let mut this = Self::new(image.rows(), image.cols(), kernel_size);
        this.embed(image);
        this
    }

    /// Overwrite the interior with `image`
    pub fn embed(&mut self, image: &Grid) {
        assert_eq!(image.shape(), (self.image_rows, self.image_cols));
        let offset = self.offset;
        for row in 0..self.image_rows {
            let dst = &mut self.buf.row_mut(row + offset)[offset..offset + self.image_cols];
            dst.copy_from_slice(image.row(row));
        }
        self.check_rep();
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
    pub fn image_shape(&self) -> (usize, usize) {
        (self.image_rows, self.image_cols)
    }
    pub fn grid(&self) -> &Grid {
        &self.buf
    }

    /// Padded cell at `(row, col)` in padded coordinates
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.buf.at(row, col)
    }

    fn is_border(&self, row: usize, col: usize) -> bool {
        row < self.offset
            || col < self.offset
            || self.offset + self.image_rows <= row
            || self.offset + self.image_cols <= col
    }
}
