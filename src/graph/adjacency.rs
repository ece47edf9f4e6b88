use hashbrown::HashMap;
use crate::error::{GraphError, Result};

/// Weighted sparse matrix in compressed sparse row form.
///
/// Rows are kept in canonical form: column indices ascending, duplicate
/// entries summed, zero-valued entries dropped. The column-compressed view
/// of a matrix is represented as the CSR form of its transpose.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    n_rows: usize,
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl CsrMatrix {
    /// Build from coordinate triplets, summing duplicates
    pub fn from_triplets(
        n_rows: usize,
        n_cols: usize,
        rows: &[usize],
        cols: &[usize],
        values: &[f64],
    ) -> Result<Self> {
        if rows.len() != cols.len() || rows.len() != values.len() {
            return Err(GraphError::graph_construction(format!(
                "Triplet arrays differ in length: rows={}, cols={}, values={}",
                rows.len(),
                cols.len(),
                values.len()
            )));
        }

        let mut per_row: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n_rows];
        for ((&r, &c), &v) in rows.iter().zip(cols).zip(values) {
            if r >= n_rows || c >= n_cols {
                return Err(GraphError::graph_construction(format!(
                    "Entry ({}, {}) out of bounds for {}x{} matrix",
                    r, c, n_rows, n_cols
                )));
            }
            per_row[r].push((c, v));
        }

        Ok(Self::from_rows(n_cols, per_row))
    }

    /// Assemble from per-row entry lists, canonicalizing each row
    fn from_rows(n_cols: usize, rows: Vec<Vec<(usize, f64)>>) -> Self {
        let n_rows = rows.len();
        let mut indptr = Vec::with_capacity(n_rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);

        for mut row in rows {
            row.sort_by_key(|&(c, _)| c);
            let mut merged: Vec<(usize, f64)> = Vec::with_capacity(row.len());
            for (c, v) in row {
                match merged.last_mut() {
                    Some((last, acc)) if *last == c => *acc += v,
                    _ => merged.push((c, v)),
                }
            }
            for (c, v) in merged {
                if v != 0.0 {
                    indices.push(c);
                    data.push(v);
                }
            }
            indptr.push(indices.len());
        }

        CsrMatrix { n_rows, n_cols, indptr, indices, data }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Number of stored (non-zero) entries
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Column indices of the non-zero entries in row `row`; empty past the last row
    pub fn row_indices(&self, row: usize) -> &[usize] {
        if row >= self.n_rows {
            return &[];
        }
        &self.indices[self.indptr[row]..self.indptr[row + 1]]
    }

    /// Values of the non-zero entries in row `row`, aligned with `row_indices`
    pub fn row_values(&self, row: usize) -> &[f64] {
        if row >= self.n_rows {
            return &[];
        }
        &self.data[self.indptr[row]..self.indptr[row + 1]]
    }

    /// Value at `(row, col)`, zero when the entry is not stored
    pub fn get(&self, row: usize, col: usize) -> f64 {
        let cols = self.row_indices(row);
        match cols.binary_search(&col) {
            Ok(pos) => self.row_values(row)[pos],
            Err(_) => 0.0,
        }
    }

    pub fn transpose(&self) -> CsrMatrix {
        let mut rows: Vec<Vec<(usize, f64)>> = vec![Vec::new(); self.n_cols];
        for r in 0..self.n_rows {
            for (&c, &v) in self.row_indices(r).iter().zip(self.row_values(r)) {
                rows[c].push((r, v));
            }
        }
        Self::from_rows(self.n_rows, rows)
    }

    /// Induced submatrix `A[nodes, :][:, nodes]`.
    ///
    /// Local index `i` of the result corresponds to `nodes[i]`. `nodes` must
    /// not contain duplicates.
    pub fn submatrix(&self, nodes: &[usize]) -> Result<CsrMatrix> {
        let mut local: HashMap<usize, usize> = HashMap::with_capacity(nodes.len());
        for (i, &node) in nodes.iter().enumerate() {
            if node >= self.n_rows || node >= self.n_cols {
                return Err(GraphError::node_not_found(node.to_string()));
            }
            if local.insert(node, i).is_some() {
                return Err(GraphError::invalid_parameter(format!(
                    "Duplicate node {} in submatrix selection",
                    node
                )));
            }
        }

        let rows = nodes
            .iter()
            .map(|&g| {
                self.row_indices(g)
                    .iter()
                    .zip(self.row_values(g))
                    .filter_map(|(c, &v)| local.get(c).map(|&lc| (lc, v)))
                    .collect()
            })
            .collect();

        Ok(Self::from_rows(nodes.len(), rows))
    }

    /// Drop the entries `(u, v)` and `(v, u)` if present
    pub fn remove_link(&mut self, u: usize, v: usize) {
        let mut rows: Vec<Vec<(usize, f64)>> = Vec::with_capacity(self.n_rows);
        for r in 0..self.n_rows {
            rows.push(
                self.row_indices(r)
                    .iter()
                    .zip(self.row_values(r))
                    .filter(|&(&c, _)| !((r == u && c == v) || (r == v && c == u)))
                    .map(|(&c, &w)| (c, w))
                    .collect(),
            );
        }
        *self = Self::from_rows(self.n_cols, rows);
    }

    /// Row-major `(row, col, value)` triplets of the stored entries
    pub fn triplets(&self) -> (Vec<usize>, Vec<usize>, Vec<f64>) {
        let mut rows = Vec::with_capacity(self.nnz());
        for r in 0..self.n_rows {
            rows.extend(std::iter::repeat(r).take(self.indptr[r + 1] - self.indptr[r]));
        }
        (rows, self.indices.clone(), self.data.clone())
    }

    /// Sum of each column (weighted in-degree for an adjacency matrix)
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.n_cols];
        for (&c, &v) in self.indices.iter().zip(&self.data) {
            sums[c] += v;
        }
        sums
    }

    /// Sum of each row (weighted out-degree for an adjacency matrix)
    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.n_rows)
            .map(|r| self.row_values(r).iter().sum())
            .collect()
    }

    pub fn is_symmetric(&self) -> bool {
        self.n_rows == self.n_cols && *self == self.transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::CsrMatrix;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_duplicates_are_summed_and_sorted() {
        let m = CsrMatrix::from_triplets(
            2, 3,
            &[0, 0, 0, 1],
            &[2, 0, 2, 1],
            &[1.0, 1.0, 2.0, 4.0],
        ).unwrap();

        assert_eq!(m.row_indices(0), &[0, 2]);
        assert_eq!(m.row_values(0), &[1.0, 3.0]);
        assert_eq!(m.get(1, 1), 4.0);
        assert_eq!(m.get(1, 0), 0.0);
        assert_eq!(m.nnz(), 3);
    }

    #[test]
    fn test_out_of_bounds_triplet_rejected() {
        let result = CsrMatrix::from_triplets(2, 2, &[0], &[2], &[1.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_transpose_swaps_entries() {
        let m = CsrMatrix::from_triplets(3, 3, &[0, 1], &[1, 2], &[1.0, 5.0]).unwrap();
        let t = m.transpose();
        assert_eq!(t.get(1, 0), 1.0);
        assert_eq!(t.get(2, 1), 5.0);
        assert_eq!(t.get(0, 1), 0.0);
        assert!(!m.is_symmetric());
    }

    #[test]
    fn test_rows_past_the_end_are_empty() {
        let m = CsrMatrix::from_triplets(2, 2, &[0], &[1], &[1.0]).unwrap();
        assert!(m.row_indices(2).is_empty());
        assert!(m.row_values(7).is_empty());
        assert_eq!(m.get(5, 0), 0.0);
    }

    #[test]
    fn test_submatrix_follows_selection_order() {
        // 0 - 1 - 2 - 3
        let m = CsrMatrix::from_triplets(
            4, 4,
            &[0, 1, 1, 2, 2, 3],
            &[1, 0, 2, 1, 3, 2],
            &[1.0; 6],
        ).unwrap();

        let sub = m.submatrix(&[2, 1, 3]).unwrap();
        assert_eq!(sub.shape(), (3, 3));
        assert_eq!(sub.get(0, 1), 1.0); // 2-1
        assert_eq!(sub.get(0, 2), 1.0); // 2-3
        assert_eq!(sub.get(1, 2), 0.0); // 1-3
        assert!(m.submatrix(&[1, 1]).is_err());
    }

    #[test]
    fn test_remove_link_and_triplets() {
        let mut m = CsrMatrix::from_triplets(
            3, 3,
            &[0, 1, 1, 2],
            &[1, 0, 2, 1],
            &[2.0, 2.0, 1.0, 1.0],
        ).unwrap();
        m.remove_link(0, 1);

        let (rows, cols, vals) = m.triplets();
        assert_eq!(rows, vec![1, 2]);
        assert_eq!(cols, vec![2, 1]);
        assert_eq!(vals, vec![1.0, 1.0]);
        assert_eq!(m.column_sums(), vec![0.0, 1.0, 1.0]);
        assert_eq!(m.row_sums(), vec![0.0, 1.0, 1.0]);
    }
}
