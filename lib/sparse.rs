//! Compressed sparse row (CSR) storage for complex matrices.
//!
//! Only the arithmetic needed by quantum-object manipulation is provided:
//! elementwise sums, products, Kronecker products, (conjugate) transposes and
//! row-major reshapes. Column indices within a row are always kept sorted and
//! free of duplicates, and exact zeros produced by arithmetic are dropped.

use ndarray as nd;
use num_complex::Complex64 as C64;
use num_traits::{ One, Zero };
use rustc_hash::FxHashMap as HashMap;

/// Sparse complex matrix in compressed sparse row format.
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix {
    nrows: usize,
    ncols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<C64>,
}

impl CsrMatrix {
    /// Create an all-zero matrix.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            indptr: vec![0; nrows + 1],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Create the `n × n` identity.
    pub fn eye(n: usize) -> Self {
        Self {
            nrows: n,
            ncols: n,
            indptr: (0..=n).collect(),
            indices: (0..n).collect(),
            data: vec![C64::one(); n],
        }
    }

    /// Create a matrix from `(row, col, value)` triplets.
    ///
    /// Duplicate entries are summed, and entries summing to exactly zero are
    /// dropped.
    ///
    /// *Panics* if any index lies outside of the given shape.
    pub fn from_triplets<I>(nrows: usize, ncols: usize, triplets: I) -> Self
    where I: IntoIterator<Item = (usize, usize, C64)>
    {
        let mut trips: Vec<(usize, usize, C64)>
            = triplets.into_iter().collect();
        if let Some((i, j, _))
            = trips.iter().find(|(i, j, _)| *i >= nrows || *j >= ncols)
        {
            panic!(
                "CsrMatrix::from_triplets: index ({}, {}) out of bounds for \
                shape ({}, {})",
                i, j, nrows, ncols,
            );
        }
        trips.sort_by_key(|(i, j, _)| (*i, *j));
        let mut merged: Vec<(usize, usize, C64)>
            = Vec::with_capacity(trips.len());
        for (i, j, v) in trips.into_iter() {
            match merged.last_mut() {
                Some((li, lj, lv)) if *li == i && *lj == j => { *lv += v; },
                _ => { merged.push((i, j, v)); },
            }
        }
        Self::from_sorted(
            nrows,
            ncols,
            merged.into_iter().filter(|(_, _, v)| !v.is_zero()),
        )
    }

    // triplets must already be sorted by (row, col) with no duplicates
    fn from_sorted<I>(nrows: usize, ncols: usize, triplets: I) -> Self
    where I: IntoIterator<Item = (usize, usize, C64)>
    {
        let mut indptr: Vec<usize> = vec![0; nrows + 1];
        let mut indices: Vec<usize> = Vec::new();
        let mut data: Vec<C64> = Vec::new();
        for (i, j, v) in triplets.into_iter() {
            indptr[i + 1] += 1;
            indices.push(j);
            data.push(v);
        }
        for k in 0..nrows {
            indptr[k + 1] += indptr[k];
        }
        Self { nrows, ncols, indptr, indices, data }
    }

    /// Convert from a dense array, keeping only non-zero elements.
    pub fn from_dense<S>(a: &nd::ArrayBase<S, nd::Ix2>) -> Self
    where S: nd::Data<Elem = C64>
    {
        let (nrows, ncols) = a.dim();
        Self::from_sorted(
            nrows,
            ncols,
            a.indexed_iter()
                .filter(|(_, v)| !v.is_zero())
                .map(|((i, j), v)| (i, j, *v)),
        )
    }

    /// Convert to a dense array.
    pub fn to_dense(&self) -> nd::Array2<C64> {
        let mut a: nd::Array2<C64> = nd::Array2::zeros((self.nrows, self.ncols));
        self.iter().for_each(|(i, j, v)| { a[[i, j]] = v; });
        a
    }

    /// Return the `(rows, cols)` shape.
    pub fn shape(&self) -> (usize, usize) { (self.nrows, self.ncols) }

    /// Return the number of rows.
    pub fn nrows(&self) -> usize { self.nrows }

    /// Return the number of columns.
    pub fn ncols(&self) -> usize { self.ncols }

    /// Return the number of stored elements.
    pub fn nnz(&self) -> usize { self.data.len() }

    /// Return the column indices and values stored in row `i`.
    pub fn row(&self, i: usize) -> (&[usize], &[C64]) {
        let (a, b) = (self.indptr[i], self.indptr[i + 1]);
        (&self.indices[a..b], &self.data[a..b])
    }

    /// Get a single element, returning zero for elements not stored.
    ///
    /// *Panics* if `(i, j)` is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> C64 {
        assert!(
            i < self.nrows && j < self.ncols,
            "CsrMatrix::get: index out of bounds",
        );
        let (cols, vals) = self.row(i);
        cols.binary_search(&j)
            .map(|k| vals[k])
            .unwrap_or_else(|_| C64::zero())
    }

    /// Iterate over all stored `(row, col, value)` triplets in row-major
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, C64)> + '_ {
        (0..self.nrows)
            .flat_map(move |i| {
                let (cols, vals) = self.row(i);
                cols.iter().zip(vals).map(move |(j, v)| (i, *j, *v))
            })
    }

    fn map_values<F>(&self, f: F) -> Self
    where F: Fn(C64) -> C64
    {
        Self {
            nrows: self.nrows,
            ncols: self.ncols,
            indptr: self.indptr.clone(),
            indices: self.indices.clone(),
            data: self.data.iter().map(|v| f(*v)).collect(),
        }
    }

    /// Return the elementwise complex conjugate.
    pub fn conj(&self) -> Self { self.map_values(|v| v.conj()) }

    // counting sort on the column index, optionally conjugating the values
    fn do_transpose(&self, conjugate: bool) -> Self {
        let mut indptr: Vec<usize> = vec![0; self.ncols + 1];
        self.indices.iter().for_each(|j| { indptr[j + 1] += 1; });
        for k in 0..self.ncols {
            indptr[k + 1] += indptr[k];
        }
        let mut next: Vec<usize> = indptr[..self.ncols].to_vec();
        let mut indices: Vec<usize> = vec![0; self.nnz()];
        let mut data: Vec<C64> = vec![C64::zero(); self.nnz()];
        for (i, j, v) in self.iter() {
            let k = next[j];
            indices[k] = i;
            data[k] = if conjugate { v.conj() } else { v };
            next[j] += 1;
        }
        Self { nrows: self.ncols, ncols: self.nrows, indptr, indices, data }
    }

    /// Return the transpose.
    pub fn transpose(&self) -> Self { self.do_transpose(false) }

    /// Return the conjugate transpose.
    pub fn adjoint(&self) -> Self { self.do_transpose(true) }

    /// Multiply every element by a scalar.
    pub fn scale(&self, c: C64) -> Self {
        if c.is_zero() {
            Self::zeros(self.nrows, self.ncols)
        } else {
            self.map_values(|v| v * c)
        }
    }

    // merge the sorted rows of two equal-shape matrices as `self + c * other`
    fn axpy(&self, c: C64, other: &Self) -> Self {
        assert_eq!(
            self.shape(), other.shape(),
            "CsrMatrix: incompatible shapes for addition",
        );
        let mut trips: Vec<(usize, usize, C64)>
            = Vec::with_capacity(self.nnz() + other.nnz());
        for i in 0..self.nrows {
            let (ca, va) = self.row(i);
            let (cb, vb) = other.row(i);
            let (mut a, mut b) = (0, 0);
            while a < ca.len() || b < cb.len() {
                let (j, v)
                    = if b >= cb.len() || (a < ca.len() && ca[a] < cb[b]) {
                        a += 1;
                        (ca[a - 1], va[a - 1])
                    } else if a >= ca.len() || cb[b] < ca[a] {
                        b += 1;
                        (cb[b - 1], c * vb[b - 1])
                    } else {
                        a += 1;
                        b += 1;
                        (ca[a - 1], va[a - 1] + c * vb[b - 1])
                    };
                if !v.is_zero() { trips.push((i, j, v)); }
            }
        }
        Self::from_sorted(self.nrows, self.ncols, trips)
    }

    /// Elementwise sum.
    ///
    /// *Panics* if the shapes differ.
    pub fn add(&self, other: &Self) -> Self { self.axpy(C64::one(), other) }

    /// Elementwise difference.
    ///
    /// *Panics* if the shapes differ.
    pub fn sub(&self, other: &Self) -> Self { self.axpy(-C64::one(), other) }

    /// Matrix product `self · other`.
    ///
    /// Each output row is accumulated in a hash map and then sorted; the order
    /// of floating-point accumulation within an element depends only on the
    /// storage order of the operands, so repeated products are bit-identical.
    ///
    /// *Panics* if the inner dimensions differ.
    pub fn matmul(&self, other: &Self) -> Self {
        assert_eq!(
            self.ncols, other.nrows,
            "CsrMatrix::matmul: incompatible inner dimensions",
        );
        let mut trips: Vec<(usize, usize, C64)> = Vec::new();
        let mut acc: HashMap<usize, C64> = HashMap::default();
        let mut row: Vec<(usize, C64)>;
        for i in 0..self.nrows {
            acc.clear();
            let (ca, va) = self.row(i);
            for (k, a) in ca.iter().zip(va) {
                let (cb, vb) = other.row(*k);
                for (j, b) in cb.iter().zip(vb) {
                    *acc.entry(*j).or_insert_with(C64::zero) += *a * *b;
                }
            }
            row = acc.iter()
                .filter(|(_, v)| !v.is_zero())
                .map(|(j, v)| (*j, *v))
                .collect();
            row.sort_by_key(|(j, _)| *j);
            trips.extend(row.into_iter().map(|(j, v)| (i, j, v)));
        }
        Self::from_sorted(self.nrows, other.ncols, trips)
    }

    /// Product with a dense matrix, `self · other`.
    ///
    /// *Panics* if the inner dimensions differ.
    pub fn dot_dense<S>(&self, other: &nd::ArrayBase<S, nd::Ix2>)
        -> nd::Array2<C64>
    where S: nd::Data<Elem = C64>
    {
        assert_eq!(
            self.ncols, other.nrows(),
            "CsrMatrix::dot_dense: incompatible inner dimensions",
        );
        let mut out: nd::Array2<C64>
            = nd::Array2::zeros((self.nrows, other.ncols()));
        for (i, k, a) in self.iter() {
            out.row_mut(i).scaled_add(a, &other.row(k));
        }
        out
    }

    /// Kronecker product `self ⊗ other`.
    pub fn kron(&self, other: &Self) -> Self {
        let (ar, ac) = self.shape();
        let (br, bc) = other.shape();
        let mut trips: Vec<(usize, usize, C64)>
            = Vec::with_capacity(self.nnz() * other.nnz());
        for ia in 0..ar {
            let (ca, va) = self.row(ia);
            for ib in 0..br {
                let (cb, vb) = other.row(ib);
                for (ja, a) in ca.iter().zip(va) {
                    for (jb, b) in cb.iter().zip(vb) {
                        trips.push((ia * br + ib, ja * bc + jb, *a * *b));
                    }
                }
            }
        }
        Self::from_sorted(ar * br, ac * bc, trips)
    }

    /// Reshape in row-major (C) order: the element at `(i, j)` is moved to
    /// flat index `i * ncols + j` of the new shape.
    ///
    /// *Panics* if the total number of elements changes.
    pub fn reshape(&self, nrows: usize, ncols: usize) -> Self {
        assert_eq!(
            self.nrows * self.ncols, nrows * ncols,
            "CsrMatrix::reshape: element count must be preserved",
        );
        // row-major traversal gives ascending flat indices, which are already
        // sorted in the new layout
        let trips: Vec<(usize, usize, C64)>
            = self.iter()
            .map(|(i, j, v)| {
                let flat = i * self.ncols + j;
                (flat / ncols, flat % ncols, v)
            })
            .collect();
        Self::from_sorted(nrows, ncols, trips)
    }

    /// Sum of the main diagonal.
    pub fn trace(&self) -> C64 {
        self.iter()
            .filter(|(i, j, _)| i == j)
            .map(|(_, _, v)| v)
            .sum()
    }

    /// Maximum absolute column sum.
    pub fn one_norm(&self) -> f64 {
        let mut colsums: Vec<f64> = vec![0.0; self.ncols];
        self.iter().for_each(|(_, j, v)| { colsums[j] += v.norm(); });
        colsums.into_iter().fold(0.0, f64::max)
    }

    /// Zero out real and imaginary parts with magnitude below `atol` and drop
    /// the elements that become zero.
    pub fn tidyup(&self, atol: f64) -> Self {
        let trips: Vec<(usize, usize, C64)>
            = self.iter()
            .map(|(i, j, v)| (i, j, tidy_value(v, atol)))
            .filter(|(_, _, v)| !v.is_zero())
            .collect();
        Self::from_sorted(self.nrows, self.ncols, trips)
    }

    /// Return `true` if `self` equals its conjugate transpose to within `tol`
    /// elementwise.
    pub fn is_hermitian(&self, tol: f64) -> bool {
        self.nrows == self.ncols
            && self.sub(&self.adjoint()).data.iter().all(|v| v.norm() <= tol)
    }
}

pub(crate) fn tidy_value(v: C64, atol: f64) -> C64 {
    C64::new(
        if v.re.abs() < atol { 0.0 } else { v.re },
        if v.im.abs() < atol { 0.0 } else { v.im },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64, im: f64) -> C64 { C64::new(re, im) }

    fn lowering() -> CsrMatrix {
        CsrMatrix::from_triplets(2, 2, [(0, 1, c(1.0, 0.0))])
    }

    #[test]
    fn triplets_merge_and_drop_zeros() {
        let m = CsrMatrix::from_triplets(
            2, 3,
            [
                (1, 2, c(1.0, 0.0)),
                (0, 0, c(2.0, 0.0)),
                (1, 2, c(0.0, 1.0)),
                (0, 1, c(1.0, 0.0)),
                (0, 1, c(-1.0, 0.0)),
            ],
        );
        assert_eq!(m.nnz(), 2);
        assert_eq!(m.get(0, 0), c(2.0, 0.0));
        assert_eq!(m.get(1, 2), c(1.0, 1.0));
        assert_eq!(m.get(0, 1), C64::zero());
    }

    #[test]
    #[should_panic]
    fn triplets_out_of_bounds() {
        CsrMatrix::from_triplets(2, 2, [(2, 0, c(1.0, 0.0))]);
    }

    #[test]
    fn dense_conversion() {
        let a = array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 2.0), c(3.0, 0.0)]];
        let m = CsrMatrix::from_dense(&a);
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.to_dense(), a);
    }

    #[test]
    fn transpose_and_adjoint() {
        let a = array![
            [c(1.0, 1.0), c(2.0, 0.0), c(0.0, 0.0)],
            [c(0.0, 0.0), c(0.0, -3.0), c(4.0, 0.0)],
        ];
        let m = CsrMatrix::from_dense(&a);
        assert_eq!(m.transpose().to_dense(), a.t().to_owned());
        assert_eq!(m.adjoint().to_dense(), a.t().mapv(|v| v.conj()));
        assert_eq!(m.adjoint().shape(), (3, 2));
    }

    #[test]
    fn sums_cancel_to_empty() {
        let m = lowering();
        let z = m.sub(&m);
        assert_eq!(z.nnz(), 0);
        assert_eq!(z.shape(), (2, 2));
        let two = m.add(&m);
        assert_eq!(two.get(0, 1), c(2.0, 0.0));
    }

    #[test]
    fn product_matches_dense() {
        let a = array![
            [c(1.0, 0.0), c(0.0, 1.0), c(0.0, 0.0)],
            [c(0.0, 0.0), c(2.0, 0.0), c(1.0, -1.0)],
        ];
        let b = array![
            [c(0.0, 0.0), c(1.0, 0.0)],
            [c(3.0, 0.0), c(0.0, 0.0)],
            [c(1.0, 1.0), c(0.0, 2.0)],
        ];
        let ma = CsrMatrix::from_dense(&a);
        let mb = CsrMatrix::from_dense(&b);
        assert_eq!(ma.matmul(&mb).to_dense(), a.dot(&b));
        assert_eq!(ma.dot_dense(&b), a.dot(&b));
    }

    #[test]
    fn number_operator_from_ladder() {
        let sm = lowering();
        let n = sm.adjoint().matmul(&sm);
        assert_eq!(n.nnz(), 1);
        assert_eq!(n.get(1, 1), C64::one());
    }

    #[test]
    fn kron_matches_ndarray() {
        let a = array![[c(1.0, 0.0), c(2.0, 0.0)], [c(0.0, 0.0), c(0.0, 1.0)]];
        let b = array![
            [c(0.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)],
            [c(5.0, 0.0), c(0.0, 0.0), c(-1.0, 0.0)],
        ];
        let mk = CsrMatrix::from_dense(&a).kron(&CsrMatrix::from_dense(&b));
        assert_eq!(mk.shape(), (4, 6));
        assert_eq!(mk.to_dense(), nd::linalg::kron(&a, &b));
    }

    #[test]
    fn reshape_row_major() {
        let a = array![
            [c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0)],
            [c(4.0, 0.0), c(5.0, 0.0), c(6.0, 0.0)],
        ];
        let m = CsrMatrix::from_dense(&a).reshape(6, 1);
        let col: Vec<f64> = (0..6).map(|k| m.get(k, 0).re).collect();
        assert_eq!(col, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let back = m.reshape(2, 3);
        assert_eq!(back.to_dense(), a);
    }

    #[test]
    fn trace_and_norm() {
        let m = CsrMatrix::eye(3).scale(c(0.0, 2.0));
        assert_eq!(m.trace(), c(0.0, 6.0));
        assert_eq!(m.one_norm(), 2.0);
        assert_eq!(CsrMatrix::zeros(2, 2).one_norm(), 0.0);
    }

    #[test]
    fn tidyup_removes_residue() {
        let m = CsrMatrix::from_triplets(
            2, 2, [(0, 0, c(1.0, 1e-15)), (1, 0, c(1e-14, -1e-16))]);
        let t = m.tidyup(1e-12);
        assert_eq!(t.nnz(), 1);
        assert_eq!(t.get(0, 0), c(1.0, 0.0));
    }

    #[test]
    fn hermiticity_check() {
        let sm = lowering();
        assert!(!sm.is_hermitian(1e-12));
        let sx = sm.add(&sm.adjoint());
        assert!(sx.is_hermitian(1e-12));
        let sy = sm.scale(c(0.0, 1.0)).add(&sm.adjoint().scale(c(0.0, -1.0)));
        assert!(sy.is_hermitian(1e-12));
    }
}
