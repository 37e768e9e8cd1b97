//! Matrix exponentials of square quantum objects.
//!
//! Two methods are offered:
//! - [`ExpmMethod::Dense`]: scaling and squaring with the degree-13 Padé
//!   approximant (Higham 2005), with the final rational step solved through
//!   `ndarray-linalg`;
//! - [`ExpmMethod::Sparse`]: scaling and squaring of a truncated Taylor series
//!   carried out entirely in CSR arithmetic, so that the result stays sparse.

use std::str::FromStr;
use ndarray as nd;
use ndarray_linalg::InverseInto;
use num_complex::Complex64 as C64;
use tracing::debug;
use crate::{
    config::Settings,
    error::{ QError, QResult },
    qobj::{ Data, Qobj },
    sparse::CsrMatrix,
};

/// Algorithm used by [`Qobj::expm`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ExpmMethod {
    Dense,
    #[default]
    Sparse,
}

impl FromStr for ExpmMethod {
    type Err = QError;

    fn from_str(s: &str) -> QResult<Self> {
        match s {
            "dense" => Ok(Self::Dense),
            "sparse" => Ok(Self::Sparse),
            _ => Err(QError::Method(s.to_string())),
        }
    }
}

/* Dense: Padé(13) ************************************************************/

// largest 1-norm for which the unscaled Padé(13) approximant is accurate to
// double precision
const THETA_13: f64 = 5.371920351148152;

const PADE_13: [f64; 14] = [
    64764752532480000.0,
    32382376266240000.0,
    7771770303897600.0,
    1187353796428800.0,
    129060195264000.0,
    10559470521600.0,
    670442572800.0,
    33522128640.0,
    1323241920.0,
    40840800.0,
    960960.0,
    16380.0,
    182.0,
    1.0,
];

fn c(x: f64) -> C64 { C64::from(x) }

fn dense_one_norm(A: &nd::Array2<C64>) -> f64 {
    A.columns().into_iter()
        .map(|col| col.iter().map(|v| v.norm()).sum::<f64>())
        .fold(0.0, f64::max)
}

/// Number of halvings needed to bring a 1-norm below `theta`.
fn scaling_power(norm: f64, theta: f64) -> u32 {
    if norm > theta { (norm / theta).log2().ceil() as u32 } else { 0 }
}

/// Compute `exp(A)` for a dense square matrix.
///
/// *Panics* if `A` is not square.
pub fn expm_dense(A: &nd::Array2<C64>) -> QResult<nd::Array2<C64>> {
    let (n, m) = A.dim();
    assert_eq!(n, m, "expm_dense: matrix must be square");
    if n == 0 { return Ok(nd::Array2::zeros((0, 0))); }

    let s = scaling_power(dense_one_norm(A), THETA_13);
    debug!(n, s, "dense expm scaling");
    let As: nd::Array2<C64> = A.mapv(|a| a * c(0.5_f64.powi(s as i32)));

    let b = &PADE_13;
    let I: nd::Array2<C64> = nd::Array2::eye(n);
    let A2 = As.dot(&As);
    let A4 = A2.dot(&A2);
    let A6 = A4.dot(&A2);
    let W: nd::Array2<C64>
        = A6.dot(&(&A6 * c(b[13]) + &A4 * c(b[11]) + &A2 * c(b[9])))
        + &A6 * c(b[7]) + &A4 * c(b[5]) + &A2 * c(b[3]) + &I * c(b[1]);
    let U: nd::Array2<C64> = As.dot(&W);
    let V: nd::Array2<C64>
        = A6.dot(&(&A6 * c(b[12]) + &A4 * c(b[10]) + &A2 * c(b[8])))
        + &A6 * c(b[6]) + &A4 * c(b[4]) + &A2 * c(b[2]) + &I * c(b[0]);

    let P: nd::Array2<C64> = &V + &U;
    let Q: nd::Array2<C64> = &V - &U;
    let mut E: nd::Array2<C64> = Q.inv_into()?.dot(&P);
    for _ in 0..s {
        E = E.dot(&E);
    }
    Ok(E)
}

/* Sparse: Taylor *************************************************************/

// 1-norm bound after scaling; the series then converges in ~20 terms
const TAYLOR_THETA: f64 = 0.5;
const TAYLOR_MAX_TERMS: usize = 60;

/// Compute `exp(A)` for a sparse square matrix.
///
/// *Panics* if `A` is not square.
pub fn expm_sparse(A: &CsrMatrix) -> CsrMatrix {
    let (n, m) = A.shape();
    assert_eq!(n, m, "expm_sparse: matrix must be square");

    let s = scaling_power(A.one_norm(), TAYLOR_THETA);
    debug!(n, nnz = A.nnz(), s, "sparse expm scaling");
    let As = A.scale(c(0.5_f64.powi(s as i32)));

    let mut E = CsrMatrix::eye(n);
    let mut term = CsrMatrix::eye(n);
    for k in 1..=TAYLOR_MAX_TERMS {
        term = term.matmul(&As).scale(c(1.0 / k as f64));
        if term.nnz() == 0 { break; }
        E = E.add(&term);
        if term.one_norm() <= f64::EPSILON * E.one_norm() { break; }
    }
    for _ in 0..s {
        E = E.matmul(&E);
    }
    E
}

/* Quantum objects ************************************************************/

impl Qobj {
    /// Matrix exponential.
    ///
    /// Requires identical row and column dims (an operator or superoperator
    /// acting on a single space). The result keeps the dims of `self` and is
    /// tidied according to `settings`.
    pub fn expm(&self, method: ExpmMethod, settings: &Settings)
        -> QResult<Qobj>
    {
        if !self.dims().is_square() {
            return Err(QError::type_err(format!(
                "invalid operand for matrix exponential: dims {}",
                self.dims(),
            )));
        }
        let mut data: Data
            = match method {
                ExpmMethod::Dense
                    => Data::Dense(expm_dense(&self.data().to_dense())?),
                ExpmMethod::Sparse
                    => Data::Sparse(expm_sparse(&self.data().to_sparse())),
            };
        if settings.auto_tidyup {
            data = data.tidyup(settings.atol);
        }
        let isherm = (self.isherm_flag() == Some(true)).then_some(true);
        Ok(
            Qobj::new(data, self.dims().clone())?
                .with_isherm(isherm)
                .with_superrep(self.superrep())
        )
    }
}

/// Matrix exponential of a quantum object; see [`Qobj::expm`].
pub fn expm(q: &Qobj, method: ExpmMethod, settings: &Settings)
    -> QResult<Qobj>
{
    q.expm(method, settings)
}
