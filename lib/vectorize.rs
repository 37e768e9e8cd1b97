//! Conversion between operators and their vectorized (column) form.
//!
//! The convention used everywhere in this crate is **row-major stacking**:
//! element `(i, j)` of an `r × c` operator is placed at index `i * c + j` of
//! the vector. Equivalently, the vector is the flattening of the transposed
//! matrix read column by column. [`spre`][crate::superoperator::spre] and
//! [`spost`][crate::superoperator::spost] are built for this layout, so that
//!
//! ```text
//! spre(A)  · vec(ρ) = vec(A ρ)
//! spost(A) · vec(ρ) = vec(ρ A)
//! ```
//!
//! Vectorized operators record the dims of the operator they came from, which
//! is what allows [`from_vector`] to restore rectangular shapes.

use ndarray as nd;
use crate::{
    error::{ QError, QResult },
    qobj::{ Dims, QType, Qobj, Space },
};

/// Return `Some(k)` if `n == k * k`.
pub(crate) fn perfect_sqrt(n: usize) -> Option<usize> {
    let k = (n as f64).sqrt().round() as usize;
    (k * k == n).then_some(k)
}

/// Vectorize an operator.
///
/// Any object on plain (non-operator) spaces is accepted, so kets and bras
/// are vectorized as `n × 1` and `1 × n` operators. The result is an
/// operator-ket with dims `[op.dims, [1]]`. Sparse input stays sparse with
/// the same number of stored elements.
pub fn to_vector(op: &Qobj) -> QResult<Qobj> {
    if !matches!(op.qtype(), QType::Oper | QType::Ket | QType::Bra) {
        return Err(QError::type_err(format!(
            "to_vector: input is not a quantum operator (got {})", op.qtype())));
    }
    let (r, c) = op.shape();
    let data = op.data().reshape(r * c, 1)?;
    Qobj::new(data, Dims::operket(op.dims()))
}

/// Restore an operator from its vectorized form.
///
/// The target shape is taken from the operator dims recorded in the row space
/// of `vec`.
pub fn from_vector(vec: &Qobj) -> QResult<Qobj> {
    let inner: &Dims
        = match (vec.qtype(), &vec.dims().rows) {
            (QType::OperKet, Space::Oper(inner)) => inner.as_ref(),
            (qtype, _) => {
                return Err(QError::type_err(format!(
                    "from_vector: input is not a vectorized operator (got {})",
                    qtype,
                )));
            },
        };
    let n = vec.shape().0;
    let (r, c) = inner.shape();
    if n != r * c {
        return Err(QError::shape_err(format!(
            "from_vector: {} entries cannot fill dims {}", n, inner)));
    }
    let data = vec.data().reshape(r, c)?;
    Qobj::new(data, inner.clone())
}

/// Flatten a matrix into a single column, row-major.
pub fn mat2vec<A>(mat: &nd::Array2<A>) -> nd::Array2<A>
where A: Clone
{
    mat.iter().cloned()
        .collect::<nd::Array1<A>>()
        .insert_axis(nd::Axis(1))
}

/// Inverse of [`mat2vec`] for square matrices.
///
/// Fails if `vec` is not a single column or its length is not a perfect
/// square.
pub fn vec2mat<A>(vec: &nd::Array2<A>) -> QResult<nd::Array2<A>>
where A: Clone
{
    let (n, m) = vec.dim();
    if m != 1 {
        return Err(QError::shape_err(format!(
            "vec2mat: expected a single column, got {} columns", m)));
    }
    let k = perfect_sqrt(n)
        .ok_or_else(|| QError::shape_err(format!(
            "vec2mat: length {} is not a perfect square", n)))?;
    nd::Array2::from_shape_vec((k, k), vec.iter().cloned().collect())
        .map_err(|e| QError::shape_err(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use num_complex::Complex64 as C64;
    use rand::{ SeedableRng, rngs::StdRng };
    use crate::{
        random::{ rand_oper, rand_sparse_oper },
        sparse::CsrMatrix,
    };

    fn c(re: f64) -> C64 { C64::from(re) }

    #[test]
    fn row_major_layout() {
        let a = Qobj::new(
            array![[c(1.0), c(2.0), c(3.0)], [c(4.0), c(5.0), c(6.0)]],
            Dims::rect(vec![2], vec![3]),
        )
        .unwrap();
        let v = to_vector(&a).unwrap();
        assert_eq!(v.qtype(), QType::OperKet);
        assert_eq!(v.shape(), (6, 1));
        assert_eq!(v.dims(), &Dims::operket(a.dims()));
        let entries: Vec<f64> = (0..6).map(|k| v.get(k, 0).re).collect();
        assert_eq!(entries, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn round_trip_dense() {
        let mut rng = StdRng::seed_from_u64(10546);
        for (r, c) in [(1, 1), (2, 2), (3, 3), (2, 5), (4, 1), (1, 3), (6, 4)] {
            let a = rand_oper(r, c, &mut rng);
            let back = from_vector(&to_vector(&a).unwrap()).unwrap();
            assert_eq!(back, a);
        }
    }

    #[test]
    fn round_trip_sparse() {
        let mut rng = StdRng::seed_from_u64(2718);
        for (r, c) in [(1, 1), (3, 3), (5, 2), (8, 8)] {
            let a = rand_sparse_oper(r, c, 0.4, &mut rng);
            let v = to_vector(&a).unwrap();
            assert!(v.is_sparse());
            assert_eq!(v.data().nnz(), a.data().nnz());
            assert_eq!(from_vector(&v).unwrap(), a);
        }
    }

    #[test]
    fn composite_dims_survive() {
        let a = Qobj::eye(vec![2, 3]);
        let v = to_vector(&a).unwrap();
        assert_eq!(v.shape(), (36, 1));
        let back = from_vector(&v).unwrap();
        assert_eq!(back.dims(), &Dims::oper(vec![2, 3]));
        assert!(back.approx_eq(&a, 0.0));
    }

    #[test]
    fn kets_and_bras_vectorize() {
        let ket = Qobj::new(
            CsrMatrix::from_triplets(4, 1, [(1, 0, c(2.0)), (3, 0, c(-1.0))]),
            Dims::ket(vec![2, 2]),
        )
        .unwrap();
        let v = to_vector(&ket).unwrap();
        assert_eq!(v.qtype(), QType::OperKet);
        assert_eq!(v.shape(), (4, 1));
        assert_eq!(v.get(3, 0), c(-1.0));
        let back = from_vector(&v).unwrap();
        assert_eq!(back.qtype(), QType::Ket);
        assert_eq!(back, ket);

        let bra = ket.dag();
        let v = to_vector(&bra).unwrap();
        assert_eq!(v.shape(), (4, 1));
        let back = from_vector(&v).unwrap();
        assert_eq!(back.dims(), &Dims::rect(vec![1], vec![2, 2]));
        assert_eq!(back.shape(), (1, 4));
        assert_eq!(back.get(0, 1), c(2.0));
    }

    #[test]
    fn wrong_kinds_rejected() {
        let ket = Qobj::new(CsrMatrix::zeros(3, 1), Dims::ket(vec![3]))
            .unwrap();
        assert!(matches!(from_vector(&ket), Err(QError::Type(_))));

        let op = Qobj::eye(vec![2]);
        assert!(matches!(from_vector(&op), Err(QError::Type(_))));

        let sup = Qobj::zeros(Dims::superop(op.dims()));
        assert!(matches!(to_vector(&sup), Err(QError::Type(_))));
    }

    #[test]
    fn raw_helpers() {
        let a = array![[1, 2], [3, 4]];
        let v = mat2vec(&a);
        assert_eq!(v, array![[1], [2], [3], [4]]);
        assert_eq!(vec2mat(&v).unwrap(), a);

        let bad = array![[1], [2], [3]];
        assert!(matches!(vec2mat(&bad), Err(QError::Shape(_))));
        let wide = array![[1, 2], [3, 4]];
        assert!(matches!(vec2mat(&wide), Err(QError::Shape(_))));
    }

    #[test]
    fn perfect_squares() {
        assert_eq!(perfect_sqrt(0), Some(0));
        assert_eq!(perfect_sqrt(1), Some(1));
        assert_eq!(perfect_sqrt(49), Some(7));
        assert_eq!(perfect_sqrt(50), None);
    }
}
