//! Random operators and density matrices, mostly for testing.
//!
//! All generators draw from a caller-supplied [`Rng`], so seeded generators
//! give reproducible objects.

use itertools::Itertools;
use ndarray as nd;
use num_complex::Complex64 as C64;
use rand::Rng;
use crate::{
    qobj::Qobj,
    sparse::CsrMatrix,
};

fn rand_c64<R>(rng: &mut R) -> C64
where R: Rng + ?Sized
{
    C64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
}

/// Dense `n × m` operator with elements drawn uniformly from the unit square
/// of the complex plane.
pub fn rand_oper<R>(n: usize, m: usize, rng: &mut R) -> Qobj
where R: Rng + ?Sized
{
    let data: nd::Array2<C64>
        = nd::Array2::from_shape_simple_fn((n, m), || rand_c64(rng));
    Qobj::from_matrix(data)
}

/// Sparse `n × m` operator in which each element is non-zero with
/// probability `density`.
pub fn rand_sparse_oper<R>(n: usize, m: usize, density: f64, rng: &mut R)
    -> Qobj
where R: Rng + ?Sized
{
    let trips: Vec<(usize, usize, C64)>
        = (0..n).cartesian_product(0..m)
        .filter_map(|(i, j)| {
            if rng.gen::<f64>() < density {
                Some((i, j, rand_c64(rng)))
            } else {
                None
            }
        })
        .collect();
    Qobj::from_matrix(CsrMatrix::from_triplets(n, m, trips))
}

/// Sparse `n × n` Hermitian operator, `(A + A†) / 2` for a random `A` of the
/// given density.
pub fn rand_herm<R>(n: usize, density: f64, rng: &mut R) -> Qobj
where R: Rng + ?Sized
{
    let A = rand_sparse_oper(n, n, density, rng).into_data().to_sparse();
    let H = A.add(&A.adjoint()).scale(C64::from(0.5));
    Qobj::from_matrix(H).with_isherm(Some(true))
}

/// Dense `n × n` density matrix: Hermitian, positive semidefinite and of unit
/// trace.
pub fn rand_dm<R>(n: usize, rng: &mut R) -> Qobj
where R: Rng + ?Sized
{
    let A: nd::Array2<C64>
        = nd::Array2::from_shape_simple_fn((n, n), || rand_c64(rng));
    let rho: nd::Array2<C64> = A.dot(&A.t().mapv(|a| a.conj()));
    let tr: f64 = rho.diag().iter().map(|r| r.re).sum();
    Qobj::from_matrix(rho.mapv(|r| r / tr)).with_isherm(Some(true))
}
