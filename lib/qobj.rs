//! Quantum objects: complex matrices tagged with tensor-product structure.
//!
//! A [`Qobj`] pairs a matrix ([`Data`], dense or sparse) with a [`Dims`]
//! descriptor recording the subsystem dimensions of its row and column
//! spaces. Each side of a `Dims` is a [`Space`], which is either a plain list
//! of subsystem dimensions or the space of operators with some inner `Dims`;
//! the latter is what distinguishes superoperators and vectorized operators
//! from ordinary operators of the same matrix shape. The kind of object is
//! read off the dims as a [`QType`].
//!
//! All operations borrow their inputs and return fresh objects.

use std::{ fmt, ops::{ Mul, Neg } };
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    error::{ QError, QResult },
    sparse::{ CsrMatrix, tidy_value },
};

/// Tolerance used when Hermiticity has to be computed rather than read from
/// the stored flag.
pub const HERM_TOL: f64 = 1e-12;

/* Dimensions *****************************************************************/

/// One side (rows or columns) of a [`Dims`] descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Space {
    /// A composite Hilbert space, given as a list of subsystem dimensions.
    Leaf(Vec<usize>),
    /// The space of operators with the given dims.
    Oper(Box<Dims>),
}

impl Space {
    /// Total dimension of the space.
    pub fn size(&self) -> usize {
        match self {
            Self::Leaf(d) => d.iter().product(),
            Self::Oper(dims) => dims.rows.size() * dims.cols.size(),
        }
    }

    /// Return `true` if `self` is a plain (non-operator) space of total
    /// dimension 1.
    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Leaf(d) if d.iter().all(|k| *k == 1))
    }

    /// Return `true` if `self` is a plain list of subsystem dimensions.
    pub fn is_leaf(&self) -> bool { matches!(self, Self::Leaf(_)) }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(d) => write!(f, "{:?}", d),
            Self::Oper(dims) => dims.fmt(f),
        }
    }
}

/// Row and column structure of a quantum object.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dims {
    pub rows: Space,
    pub cols: Space,
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.rows, self.cols)
    }
}

impl Dims {
    pub fn new(rows: Space, cols: Space) -> Self { Self { rows, cols } }

    /// Dims of an operator acting on a single composite space.
    pub fn oper(d: Vec<usize>) -> Self {
        Self { rows: Space::Leaf(d.clone()), cols: Space::Leaf(d) }
    }

    /// Dims of a (possibly rectangular) operator between two composite
    /// spaces.
    pub fn rect(rows: Vec<usize>, cols: Vec<usize>) -> Self {
        Self { rows: Space::Leaf(rows), cols: Space::Leaf(cols) }
    }

    /// Dims of a column vector in a composite space.
    pub fn ket(d: Vec<usize>) -> Self {
        Self { rows: Space::Leaf(d), cols: Space::Leaf(vec![1]) }
    }

    /// Dims of a superoperator acting on operators with dims `inner`.
    pub fn superop(inner: &Dims) -> Self {
        Self {
            rows: Space::Oper(Box::new(inner.clone())),
            cols: Space::Oper(Box::new(inner.clone())),
        }
    }

    /// Dims of the vectorized form of an operator with dims `inner`.
    pub fn operket(inner: &Dims) -> Self {
        Self {
            rows: Space::Oper(Box::new(inner.clone())),
            cols: Space::Leaf(vec![1]),
        }
    }

    /// Matrix shape implied by the dims.
    pub fn shape(&self) -> (usize, usize) { (self.rows.size(), self.cols.size()) }

    /// Return `true` if row and column spaces are identical.
    pub fn is_square(&self) -> bool { self.rows == self.cols }

    /// Swap row and column spaces.
    pub fn swapped(&self) -> Self {
        Self { rows: self.cols.clone(), cols: self.rows.clone() }
    }

    /// Classify the object described by these dims.
    pub fn qtype(&self) -> QType {
        use Space::*;
        match (&self.rows, &self.cols) {
            (Leaf(_), Leaf(_)) => {
                match (self.rows.is_unit(), self.cols.is_unit()) {
                    (true, true) | (false, false) => QType::Oper,
                    (false, true) => QType::Ket,
                    (true, false) => QType::Bra,
                }
            },
            (Oper(_), c) if c.is_unit() => QType::OperKet,
            (Oper(_), Oper(_)) => QType::Super,
            _ => QType::Other,
        }
    }
}

/// Kind of quantum object, determined by its dims.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum QType {
    Ket,
    Bra,
    Oper,
    OperKet,
    Super,
    Other,
}

impl fmt::Display for QType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ket => write!(f, "ket"),
            Self::Bra => write!(f, "bra"),
            Self::Oper => write!(f, "oper"),
            Self::OperKet => write!(f, "operator-ket"),
            Self::Super => write!(f, "super"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Representation marker carried by superoperators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SuperRep {
    /// Acts by matrix multiplication on row-major vectorized operators.
    Super,
}

/* Matrix data ****************************************************************/

/// Backing matrix of a [`Qobj`].
///
/// Binary operations between two sparse matrices stay sparse; anything
/// involving a dense operand produces a dense result.
#[derive(Clone, Debug, PartialEq)]
pub enum Data {
    Dense(nd::Array2<C64>),
    Sparse(CsrMatrix),
}

impl From<nd::Array2<C64>> for Data {
    fn from(a: nd::Array2<C64>) -> Self { Self::Dense(a) }
}

impl From<CsrMatrix> for Data {
    fn from(m: CsrMatrix) -> Self { Self::Sparse(m) }
}

impl Data {
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Self::Dense(a) => a.dim(),
            Self::Sparse(m) => m.shape(),
        }
    }

    pub fn is_sparse(&self) -> bool { matches!(self, Self::Sparse(_)) }

    /// Number of stored elements; all of them for dense data.
    pub fn nnz(&self) -> usize {
        match self {
            Self::Dense(a) => a.len(),
            Self::Sparse(m) => m.nnz(),
        }
    }

    pub fn get(&self, i: usize, j: usize) -> C64 {
        match self {
            Self::Dense(a) => a[[i, j]],
            Self::Sparse(m) => m.get(i, j),
        }
    }

    pub fn to_dense(&self) -> nd::Array2<C64> {
        match self {
            Self::Dense(a) => a.clone(),
            Self::Sparse(m) => m.to_dense(),
        }
    }

    pub fn to_sparse(&self) -> CsrMatrix {
        match self {
            Self::Dense(a) => CsrMatrix::from_dense(a),
            Self::Sparse(m) => m.clone(),
        }
    }

    pub fn conj(&self) -> Self {
        match self {
            Self::Dense(a) => Self::Dense(a.mapv(|v| v.conj())),
            Self::Sparse(m) => Self::Sparse(m.conj()),
        }
    }

    pub fn transpose(&self) -> Self {
        match self {
            Self::Dense(a) => Self::Dense(a.t().to_owned()),
            Self::Sparse(m) => Self::Sparse(m.transpose()),
        }
    }

    pub fn adjoint(&self) -> Self {
        match self {
            Self::Dense(a) => Self::Dense(a.t().mapv(|v| v.conj())),
            Self::Sparse(m) => Self::Sparse(m.adjoint()),
        }
    }

    pub fn scale(&self, c: C64) -> Self {
        match self {
            Self::Dense(a) => Self::Dense(a.mapv(|v| v * c)),
            Self::Sparse(m) => Self::Sparse(m.scale(c)),
        }
    }

    /// Elementwise sum; shapes must already agree.
    pub fn add(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            (Self::Sparse(a), Self::Sparse(b)) => Self::Sparse(a.add(b)),
            (Self::Dense(a), Self::Dense(b)) => Self::Dense(a + b),
            (Self::Dense(a), Self::Sparse(b))
                | (Self::Sparse(b), Self::Dense(a))
                => Self::Dense(a + &b.to_dense()),
        }
    }

    /// Elementwise difference; shapes must already agree.
    pub fn sub(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            (Self::Sparse(a), Self::Sparse(b)) => Self::Sparse(a.sub(b)),
            (Self::Dense(a), Self::Dense(b)) => Self::Dense(a - b),
            (Self::Dense(a), Self::Sparse(b)) => Self::Dense(a - &b.to_dense()),
            (Self::Sparse(a), Self::Dense(b)) => Self::Dense(&a.to_dense() - b),
        }
    }

    /// Matrix product; inner dimensions must already agree.
    pub fn matmul(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            (Self::Sparse(a), Self::Sparse(b)) => Self::Sparse(a.matmul(b)),
            (Self::Dense(a), Self::Dense(b)) => Self::Dense(a.dot(b)),
            (Self::Sparse(a), Self::Dense(b)) => Self::Dense(a.dot_dense(b)),
            (Self::Dense(a), Self::Sparse(b)) => Self::Dense(a.dot(&b.to_dense())),
        }
    }

    /// Kronecker product `self ⊗ rhs`.
    pub fn kron(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            (Self::Sparse(a), Self::Sparse(b)) => Self::Sparse(a.kron(b)),
            (Self::Dense(a), Self::Dense(b)) => Self::Dense(nd::linalg::kron(a, b)),
            (Self::Dense(a), Self::Sparse(b))
                => Self::Dense(nd::linalg::kron(a, &b.to_dense())),
            (Self::Sparse(a), Self::Dense(b))
                => Self::Dense(nd::linalg::kron(&a.to_dense(), b)),
        }
    }

    /// Reshape in row-major order.
    pub fn reshape(&self, nrows: usize, ncols: usize) -> QResult<Self> {
        let (r, c) = self.shape();
        if r * c != nrows * ncols {
            return Err(QError::shape_err(format!(
                "cannot reshape ({}, {}) into ({}, {})", r, c, nrows, ncols)));
        }
        match self {
            Self::Dense(a) => {
                // logical iteration order is row-major regardless of layout
                nd::Array2::from_shape_vec(
                    (nrows, ncols), a.iter().copied().collect())
                    .map(Self::Dense)
                    .map_err(|e| QError::shape_err(e.to_string()))
            },
            Self::Sparse(m) => Ok(Self::Sparse(m.reshape(nrows, ncols))),
        }
    }

    pub fn trace(&self) -> C64 {
        match self {
            Self::Dense(a) => a.diag().sum(),
            Self::Sparse(m) => m.trace(),
        }
    }

    /// Maximum absolute column sum.
    pub fn one_norm(&self) -> f64 {
        match self {
            Self::Dense(a) => {
                a.columns().into_iter()
                    .map(|col| col.iter().map(|v| v.norm()).sum::<f64>())
                    .fold(0.0, f64::max)
            },
            Self::Sparse(m) => m.one_norm(),
        }
    }

    /// Zero out real and imaginary parts below `atol`.
    pub fn tidyup(&self, atol: f64) -> Self {
        match self {
            Self::Dense(a) => Self::Dense(a.mapv(|v| tidy_value(v, atol))),
            Self::Sparse(m) => Self::Sparse(m.tidyup(atol)),
        }
    }

    pub fn is_hermitian(&self, tol: f64) -> bool {
        match self {
            Self::Dense(a) => {
                let (r, c) = a.dim();
                r == c
                    && a.indexed_iter()
                        .all(|((i, j), v)| (*v - a[[j, i]].conj()).norm() <= tol)
            },
            Self::Sparse(m) => m.is_hermitian(tol),
        }
    }

    /// Largest elementwise modulus.
    pub fn max_abs(&self) -> f64 {
        match self {
            Self::Dense(a) => a.iter().map(|v| v.norm()).fold(0.0, f64::max),
            Self::Sparse(m) => m.iter().map(|(_, _, v)| v.norm()).fold(0.0, f64::max),
        }
    }
}

/* Quantum objects ************************************************************/

/// A matrix together with its tensor-product structure and bookkeeping flags.
#[derive(Clone, PartialEq)]
pub struct Qobj {
    dims: Dims,
    data: Data,
    isherm: Option<bool>,
    superrep: Option<SuperRep>,
}

impl fmt::Debug for Qobj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Qobj")
            .field("type", &self.qtype())
            .field("dims", &format_args!("{}", self.dims))
            .field("shape", &self.shape())
            .field("isherm", &self.isherm)
            .field("superrep", &self.superrep)
            .field("data", &self.data)
            .finish()
    }
}

impl Qobj {
    /// Create a new quantum object, checking that the matrix shape matches
    /// the dims.
    pub fn new<D>(data: D, dims: Dims) -> QResult<Self>
    where D: Into<Data>
    {
        let data: Data = data.into();
        if data.shape() != dims.shape() {
            return Err(QError::shape_err(format!(
                "data shape {:?} is inconsistent with dims {} (shape {:?})",
                data.shape(), dims, dims.shape(),
            )));
        }
        let superrep = (dims.qtype() == QType::Super).then_some(SuperRep::Super);
        Ok(Self { dims, data, isherm: None, superrep })
    }

    /// Wrap a bare matrix, taking single-subsystem dims from its shape.
    pub fn from_matrix<D>(data: D) -> Self
    where D: Into<Data>
    {
        let data: Data = data.into();
        let (r, c) = data.shape();
        Self {
            dims: Dims::rect(vec![r], vec![c]),
            data,
            isherm: None,
            superrep: None,
        }
    }

    /// Sparse identity operator on the space with subsystem dims `d`.
    pub fn eye(d: Vec<usize>) -> Self {
        let n: usize = d.iter().product();
        Self {
            dims: Dims::oper(d),
            data: Data::Sparse(CsrMatrix::eye(n)),
            isherm: Some(true),
            superrep: None,
        }
    }

    /// Sparse all-zero object with the given dims.
    pub fn zeros(dims: Dims) -> Self {
        let (r, c) = dims.shape();
        let superrep = (dims.qtype() == QType::Super).then_some(SuperRep::Super);
        let isherm = Some(r == c);
        Self { dims, data: Data::Sparse(CsrMatrix::zeros(r, c)), isherm, superrep }
    }

    /// Set the Hermiticity flag.
    pub fn with_isherm(mut self, isherm: Option<bool>) -> Self {
        self.isherm = isherm;
        self
    }

    /// Set the representation marker.
    pub fn with_superrep(mut self, superrep: Option<SuperRep>) -> Self {
        self.superrep = superrep;
        self
    }

    pub fn dims(&self) -> &Dims { &self.dims }

    pub fn shape(&self) -> (usize, usize) { self.data.shape() }

    pub fn data(&self) -> &Data { &self.data }

    pub fn into_data(self) -> Data { self.data }

    pub fn qtype(&self) -> QType { self.dims.qtype() }

    pub fn superrep(&self) -> Option<SuperRep> { self.superrep }

    /// Stored Hermiticity flag, `None` if unknown.
    pub fn isherm_flag(&self) -> Option<bool> { self.isherm }

    pub fn is_sparse(&self) -> bool { self.data.is_sparse() }

    pub fn is_oper(&self) -> bool { self.qtype() == QType::Oper }

    pub fn is_super(&self) -> bool { self.qtype() == QType::Super }

    pub fn is_operket(&self) -> bool { self.qtype() == QType::OperKet }

    /// Return `true` if `self` is Hermitian, computing the answer if the
    /// stored flag is unknown.
    pub fn is_herm(&self) -> bool {
        self.isherm
            .unwrap_or_else(|| {
                self.dims.is_square() && self.data.is_hermitian(HERM_TOL)
            })
    }

    /// Get a single matrix element.
    pub fn get(&self, i: usize, j: usize) -> C64 { self.data.get(i, j) }

    /// Conjugate transpose.
    pub fn dag(&self) -> Self {
        Self {
            dims: self.dims.swapped(),
            data: self.data.adjoint(),
            isherm: self.isherm,
            superrep: self.superrep,
        }
    }

    /// Transpose.
    pub fn trans(&self) -> Self {
        Self {
            dims: self.dims.swapped(),
            data: self.data.transpose(),
            isherm: self.isherm,
            superrep: self.superrep,
        }
    }

    /// Elementwise complex conjugate.
    pub fn conj(&self) -> Self {
        Self {
            dims: self.dims.clone(),
            data: self.data.conj(),
            isherm: self.isherm,
            superrep: self.superrep,
        }
    }

    /// Trace of the matrix.
    pub fn tr(&self) -> C64 { self.data.trace() }

    /// Matrix product `self · rhs`.
    ///
    /// Fails if the column space of `self` differs from the row space of
    /// `rhs`.
    pub fn checked_mul(&self, rhs: &Self) -> QResult<Self> {
        if self.dims.cols != rhs.dims.rows {
            return Err(QError::shape_err(format!(
                "incompatible dims for product: {} · {}", self.dims, rhs.dims)));
        }
        let dims = Dims::new(self.dims.rows.clone(), rhs.dims.cols.clone());
        let superrep
            = (dims.qtype() == QType::Super)
            .then(|| self.superrep.or(rhs.superrep))
            .flatten();
        Ok(Self {
            dims,
            data: self.data.matmul(&rhs.data),
            isherm: None,
            superrep,
        })
    }

    fn check_same_dims(&self, rhs: &Self, op: &str) -> QResult<()> {
        if self.dims != rhs.dims {
            return Err(QError::shape_err(format!(
                "incompatible dims for {}: {} and {}", op, self.dims, rhs.dims)));
        }
        Ok(())
    }

    /// Elementwise sum; dims must be identical.
    pub fn checked_add(&self, rhs: &Self) -> QResult<Self> {
        self.check_same_dims(rhs, "addition")?;
        Ok(Self {
            dims: self.dims.clone(),
            data: self.data.add(&rhs.data),
            isherm: (self.isherm == Some(true) && rhs.isherm == Some(true))
                .then_some(true),
            superrep: self.superrep.or(rhs.superrep),
        })
    }

    /// Elementwise difference; dims must be identical.
    pub fn checked_sub(&self, rhs: &Self) -> QResult<Self> {
        self.check_same_dims(rhs, "subtraction")?;
        Ok(Self {
            dims: self.dims.clone(),
            data: self.data.sub(&rhs.data),
            isherm: (self.isherm == Some(true) && rhs.isherm == Some(true))
                .then_some(true),
            superrep: self.superrep.or(rhs.superrep),
        })
    }

    /// Sum a list of objects with identical dims.
    ///
    /// Fails with a type error if `terms` is empty, since there is then no
    /// space to place the result in.
    pub fn checked_sum(terms: &[Self]) -> QResult<Self> {
        let (first, rest)
            = terms.split_first()
            .ok_or_else(|| QError::type_err("checked_sum: no terms to sum"))?;
        rest.iter().try_fold(first.clone(), |acc, term| acc.checked_add(term))
    }

    /// Multiply by a complex scalar.
    pub fn scale(&self, c: C64) -> Self {
        Self {
            dims: self.dims.clone(),
            data: self.data.scale(c),
            isherm: (c.im == 0.0 && c.re != 0.0)
                .then_some(self.isherm)
                .flatten(),
            superrep: self.superrep,
        }
    }

    /// Convert to dense storage.
    pub fn to_dense(&self) -> Self {
        Self { data: Data::Dense(self.data.to_dense()), ..self.clone() }
    }

    /// Convert to sparse storage.
    pub fn to_sparse(&self) -> Self {
        Self { data: Data::Sparse(self.data.to_sparse()), ..self.clone() }
    }

    /// Zero out real and imaginary parts of matrix elements with magnitude
    /// below `atol`.
    pub fn tidyup(&self, atol: f64) -> Self {
        Self { data: self.data.tidyup(atol), ..self.clone() }
    }

    /// Return `true` if `self` and `other` have identical dims and all matrix
    /// elements agree to within `tol` in modulus.
    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.dims == other.dims
            && self.data.sub(&other.data).max_abs() <= tol
    }
}

impl Mul<C64> for &Qobj {
    type Output = Qobj;

    fn mul(self, c: C64) -> Qobj { self.scale(c) }
}

impl Mul<C64> for Qobj {
    type Output = Qobj;

    fn mul(self, c: C64) -> Qobj { self.scale(c) }
}

impl Mul<f64> for &Qobj {
    type Output = Qobj;

    fn mul(self, c: f64) -> Qobj { self.scale(C64::from(c)) }
}

impl Mul<f64> for Qobj {
    type Output = Qobj;

    fn mul(self, c: f64) -> Qobj { self.scale(C64::from(c)) }
}

impl Neg for &Qobj {
    type Output = Qobj;

    fn neg(self) -> Qobj { self.scale(-C64::from(1.0)) }
}

impl Neg for Qobj {
    type Output = Qobj;

    fn neg(self) -> Qobj { (&self).neg() }
}
