use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Row-major 2D buffer of `f64`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

/// Unchecked wire form of [`Grid`]
#[derive(Deserialize)]
struct RawGrid {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{len} values do not fill a {rows} x {cols} grid")]
pub struct GridShapeError {
    pub len: usize,
    pub rows: usize,
    pub cols: usize,
}

impl TryFrom<RawGrid> for Grid {
    type Error = GridShapeError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let RawGrid { data, rows, cols } = raw;
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(GridShapeError {
                len: data.len(),
                rows,
                cols,
            });
        }
        Ok(Self { data, rows, cols })
    }
}
impl Grid {
    fn check_rep(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        assert_eq!(self.data.len(), self.rows * self.cols);
    }

    pub fn new(data: Vec<f64>, cols: usize) -> Option<Self> {
        if cols == 0 {
            if !data.is_empty() {
                return None;
            }
            return Some(Self::zeros(0, 0));
        }
        if data.len() % cols != 0 {
            return None;
        }
        let rows = data.len() / cols;
        let this = Self { data, rows, cols };
        this.check_rep();
        Some(this)
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(f(row, col));
            }
        }
        Self { data, rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Panics if out of bounds
    pub fn at(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols);
        self.data[self.pos(row, col)]
    }
    /// Panics if out of bounds
    pub fn at_mut(&mut self, row: usize, col: usize) -> &mut f64 {
        assert!(row < self.rows && col < self.cols);
        let pos = self.pos(row, col);
        &mut self.data[pos]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = self.cols * row;
        &self.data[start..start + self.cols]
    }
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = self.cols * row;
        &mut self.data[start..start + self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// `self -= step_size * other`
    pub fn descend(&mut self, other: &Grid, step_size: f64) {
        assert_eq!(self.shape(), other.shape());
        descend(&mut self.data, &other.data, step_size);
    }

    fn pos(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }
}

/// `params -= step_size * gradient`
pub fn descend(params: &mut [f64], gradient: &[f64], step_size: f64) {
    assert_eq!(params.len(), gradient.len());
    params
        .iter_mut()
        .zip(gradient.iter().copied())
        .for_each(|(p, g)| *p -= step_size * g);
}

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter()
        .copied()
        .zip(b.iter().copied())
        .map(|(a, b)| a * b)
        .sum()
}
