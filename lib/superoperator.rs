//! Superoperators and Lindblad master-equation generators.
//!
//! Superoperators act on operators vectorized with the row-major convention
//! of [`vectorize`][crate::vectorize]. For an operator `A` acting on an
//! `n`-dimensional space,
//!
//! ```text
//! spre(A)  = A ⊗ 1ₙ      spre(A)  · vec(ρ) = vec(A ρ)
//! spost(A) = 1ₙ ⊗ Aᵀ     spost(A) · vec(ρ) = vec(ρ A)
//! ```
//!
//! and the master-equation generator for a Hamiltonian `H` and collapse
//! operators `cₖ` is
//!
//! ```text
//! L = -i (spre(H) - spost(H)) + Σₖ D[cₖ]
//! D[a] = spre(a) spost(a†) - ½ spre(a†a) - ½ spost(a†a)
//! ```
//!
//! so that `vec(dρ/dt) = L · vec(ρ)`.

use num_complex::Complex64 as C64;
use tracing::debug;
use crate::{
    error::{ QError, QResult },
    qobj::{ Data, Dims, QType, Qobj, SuperRep },
    sparse::CsrMatrix,
};

// spre/spost accept only square plain operators
fn check_oper(A: &Qobj, fname: &str) -> QResult<()> {
    if A.qtype() != QType::Oper {
        return Err(QError::type_err(format!(
            "{}: input is not a quantum operator (got {})", fname, A.qtype())));
    }
    let (r, c) = A.shape();
    if r != c {
        return Err(QError::type_err(format!(
            "{}: operator must be square, got dims {}", fname, A.dims())));
    }
    Ok(())
}

fn make_super(data: Data, A: &Qobj) -> QResult<Qobj> {
    Ok(
        Qobj::new(data, Dims::superop(A.dims()))?
            .with_isherm(A.isherm_flag())
            .with_superrep(Some(SuperRep::Super))
    )
}

/// Superoperator for left multiplication, `ρ ↦ A ρ`.
///
/// Fails with a type error unless `A` is a square operator. Its row and column
/// spaces may be factored differently as long as their sizes agree.
pub fn spre(A: &Qobj) -> QResult<Qobj> {
    check_oper(A, "spre")?;
    let n = A.shape().1;
    let eye = Data::Sparse(CsrMatrix::eye(n));
    make_super(A.data().kron(&eye), A)
}

/// Superoperator for right multiplication, `ρ ↦ ρ A`.
///
/// Fails with a type error unless `A` is a square operator. Its row and column
/// spaces may be factored differently as long as their sizes agree.
pub fn spost(A: &Qobj) -> QResult<Qobj> {
    check_oper(A, "spost")?;
    let n = A.shape().0;
    let eye = Data::Sparse(CsrMatrix::eye(n));
    make_super(eye.kron(&A.data().transpose()), A)
}

/// Lindblad dissipator
/// `D[a, b] ρ = a ρ b† - ½ a†b ρ - ½ ρ a†b`.
///
/// `b` defaults to `a`, giving the usual single-channel dissipator. The
/// result is trace-annihilating for every `ρ` when `b` is `None`.
pub fn lindblad_dissipator(a: &Qobj, b: Option<&Qobj>) -> QResult<Qobj> {
    let b = b.unwrap_or(a);
    let sa = spre(a)?;
    let ad_b = a.dag().checked_mul(b)?;
    let D
        = sa.checked_mul(&spost(&b.dag())?)?.scale(C64::from(2.0))
        .checked_sub(&spre(&ad_b)?)?
        .checked_sub(&spost(&ad_b)?)?
        .scale(C64::from(0.5));
    Ok(D.with_isherm(None).with_superrep(Some(SuperRep::Super)))
}

/// Liouvillian superoperator generating Lindblad master-equation dynamics.
///
/// `H` may be omitted for a purely dissipative generator, in which case the
/// space is taken from the first collapse operator. Collapse operators are
/// accumulated in the given order, so repeated calls with the same inputs
/// give bit-identical results.
///
/// Fails with a type error if neither `H` nor any collapse operator is given,
/// and with a shape error if the collapse operators do not act on the same
/// space as `H`.
pub fn liouvillian(H: Option<&Qobj>, c_ops: &[Qobj]) -> QResult<Qobj> {
    let mut L: Qobj
        = match H {
            Some(H) => {
                spre(H)?
                    .checked_sub(&spost(H)?)?
                    .scale(-C64::i())
            },
            None => {
                let c0: &Qobj
                    = c_ops.first()
                    .ok_or_else(|| {
                        QError::type_err(
                            "liouvillian: either H or c_ops must be given")
                    })?;
                check_oper(c0, "liouvillian")?;
                Qobj::zeros(Dims::superop(c0.dims()))
            },
        };
    for c in c_ops.iter() {
        L = L.checked_add(&lindblad_dissipator(c, None)?)?;
    }
    debug!(
        dims = %L.dims(),
        n_collapse = c_ops.len(),
        nnz = L.data().nnz(),
        "assembled liouvillian",
    );
    Ok(L.with_isherm(None).with_superrep(Some(SuperRep::Super)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::{ SeedableRng, rngs::StdRng };
    use crate::{
        random::{ rand_dm, rand_herm, rand_oper, rand_sparse_oper },
        vectorize::{ from_vector, to_vector },
    };

    fn c(re: f64, im: f64) -> C64 { C64::new(re, im) }

    fn apply(S: &Qobj, rho: &Qobj) -> Qobj {
        from_vector(&S.checked_mul(&to_vector(rho).unwrap()).unwrap()).unwrap()
    }

    fn sigma_minus() -> Qobj {
        Qobj::new(
            CsrMatrix::from_triplets(2, 2, [(0, 1, c(1.0, 0.0))]),
            Dims::oper(vec![2]),
        )
        .unwrap()
        .with_isherm(Some(false))
    }

    #[test]
    fn super_dims_and_flags() {
        let a = sigma_minus();
        let s = spre(&a).unwrap();
        assert_eq!(s.qtype(), QType::Super);
        assert_eq!(s.shape(), (4, 4));
        assert_eq!(s.dims(), &Dims::superop(a.dims()));
        assert_eq!(s.superrep(), Some(SuperRep::Super));
        assert_eq!(s.isherm_flag(), Some(false));
        assert!(s.is_sparse());
        let p = spost(&Qobj::eye(vec![2, 3])).unwrap();
        assert_eq!(p.shape(), (36, 36));
        assert_eq!(p.isherm_flag(), Some(true));
        assert_eq!(p.data().to_dense(), ndarray::Array2::<C64>::eye(36));
    }

    #[test]
    fn kron_layout() {
        let a = Qobj::new(
            array![[c(1.0, 0.0), c(2.0, 1.0)], [c(3.0, 0.0), c(4.0, -1.0)]],
            Dims::oper(vec![2]),
        )
        .unwrap();
        let pre = spre(&a).unwrap();
        assert_eq!(pre.get(0, 2), c(2.0, 1.0));
        assert_eq!(pre.get(1, 3), c(2.0, 1.0));
        assert_eq!(pre.get(0, 1), c(0.0, 0.0));
        let post = spost(&a).unwrap();
        // 1 ⊗ Aᵀ
        assert_eq!(post.get(0, 1), c(3.0, 0.0));
        assert_eq!(post.get(1, 0), c(2.0, 1.0));
        assert_eq!(post.get(3, 2), c(2.0, 1.0));
        assert_eq!(post.get(0, 2), c(0.0, 0.0));
    }

    #[test]
    fn action_laws() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in [1, 2, 3, 5] {
            let rho = rand_dm(n, &mut rng);
            // generic complex, non-Hermitian operators
            let a = rand_oper(n, n, &mut rng);
            let sa = rand_sparse_oper(n, n, 0.5, &mut rng);
            for op in [&a, &sa] {
                let lhs = op.checked_mul(&rho).unwrap();
                let rhs = rho.checked_mul(op).unwrap();
                assert!(apply(&spre(op).unwrap(), &rho).approx_eq(&lhs, 1e-13));
                assert!(apply(&spost(op).unwrap(), &rho).approx_eq(&rhs, 1e-13));
            }
        }
    }

    #[test]
    fn linearity() {
        let mut rng = StdRng::seed_from_u64(11);
        let A = rand_oper(3, 3, &mut rng);
        let B = rand_sparse_oper(3, 3, 0.5, &mut rng);
        let (x, y) = (c(0.5, -1.5), c(2.0, 0.25));
        let comb = A.scale(x).checked_add(&B.scale(y)).unwrap();
        for f in [spre, spost] {
            let lhs = f(&comb).unwrap();
            let rhs = f(&A).unwrap().scale(x)
                .checked_add(&f(&B).unwrap().scale(y)).unwrap();
            assert!(lhs.approx_eq(&rhs, 1e-14));
        }
    }

    #[test]
    fn wrong_kinds_rejected() {
        let op = Qobj::eye(vec![2]);
        let sup = spre(&op).unwrap();
        assert!(matches!(spre(&sup), Err(QError::Type(_))));
        assert!(matches!(spost(&sup), Err(QError::Type(_))));

        let vec = to_vector(&op).unwrap();
        assert!(matches!(spre(&vec), Err(QError::Type(_))));

        let ket = Qobj::new(CsrMatrix::zeros(2, 1), Dims::ket(vec![2])).unwrap();
        assert!(matches!(spost(&ket), Err(QError::Type(_))));

        let rect = Qobj::from_matrix(CsrMatrix::zeros(2, 3));
        assert!(matches!(spre(&rect), Err(QError::Type(_))));
        assert!(matches!(spost(&rect), Err(QError::Type(_))));
    }

    #[test]
    fn differently_factored_spaces() {
        let mut rng = StdRng::seed_from_u64(404);
        let dims = Dims::rect(vec![2, 2], vec![4]);
        let A = Qobj::new(rand_oper(4, 4, &mut rng).into_data(), dims.clone())
            .unwrap();
        let rho = Qobj::new(rand_oper(4, 4, &mut rng).into_data(), dims.clone())
            .unwrap();
        let lhs = Qobj::new(A.data().matmul(rho.data()), dims.clone()).unwrap();
        let rhs = Qobj::new(rho.data().matmul(A.data()), dims.clone()).unwrap();

        let pre = spre(&A).unwrap();
        let post = spost(&A).unwrap();
        assert_eq!(pre.shape(), (16, 16));
        assert_eq!(pre.dims(), &Dims::superop(&dims));
        assert_eq!(post.dims(), &Dims::superop(&dims));
        assert!(apply(&pre, &rho).approx_eq(&lhs, 1e-13));
        assert!(apply(&post, &rho).approx_eq(&rhs, 1e-13));
    }

    #[test]
    fn dissipator_anticommutator_form() {
        let mut rng = StdRng::seed_from_u64(13);
        let a = rand_oper(3, 3, &mut rng);
        let rho = rand_dm(3, &mut rng);
        let D = lindblad_dissipator(&a, None).unwrap();
        assert_eq!(D.superrep(), Some(SuperRep::Super));
        assert_eq!(D.isherm_flag(), None);
        let ad = a.dag();
        let ada = ad.checked_mul(&a).unwrap();
        let expected
            = a.checked_mul(&rho).unwrap().checked_mul(&ad).unwrap()
            .checked_sub(
                &ada.checked_mul(&rho).unwrap()
                    .checked_add(&rho.checked_mul(&ada).unwrap()).unwrap()
                    .scale(c(0.5, 0.0))
            )
            .unwrap();
        assert!(apply(&D, &rho).approx_eq(&expected, 1e-13));
    }

    #[test]
    fn dissipator_is_traceless() {
        let mut rng = StdRng::seed_from_u64(17);
        for n in [2, 4, 6] {
            let cop = rand_sparse_oper(n, n, 0.5, &mut rng);
            let D = lindblad_dissipator(&cop, None).unwrap();
            let rho = rand_dm(n, &mut rng);
            let tr = apply(&D, &rho).tr();
            assert_abs_diff_eq!(tr.re, 0.0, epsilon = 1e-13);
            assert_abs_diff_eq!(tr.im, 0.0, epsilon = 1e-13);
        }
    }

    #[test]
    fn two_operator_dissipator() {
        let mut rng = StdRng::seed_from_u64(19);
        let a = rand_oper(2, 2, &mut rng);
        let b = rand_oper(2, 2, &mut rng);
        let rho = rand_dm(2, &mut rng);
        let D = lindblad_dissipator(&a, Some(&b)).unwrap();
        let adb = a.dag().checked_mul(&b).unwrap();
        let expected
            = a.checked_mul(&rho).unwrap().checked_mul(&b.dag()).unwrap()
            .checked_sub(
                &adb.checked_mul(&rho).unwrap()
                    .checked_add(&rho.checked_mul(&adb).unwrap()).unwrap()
                    .scale(c(0.5, 0.0))
            )
            .unwrap();
        assert!(apply(&D, &rho).approx_eq(&expected, 1e-13));

        let wrong = Qobj::eye(vec![3]);
        assert!(matches!(
            lindblad_dissipator(&a, Some(&wrong)),
            Err(QError::Shape(_)),
        ));
    }

    #[test]
    fn unitary_limit() {
        let H = Qobj::new(
            array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-1.0, 0.0)]],
            Dims::oper(vec![2]),
        )
        .unwrap();
        let rho = Qobj::new(
            array![[c(0.5, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(0.5, 0.0)]],
            Dims::oper(vec![2]),
        )
        .unwrap();
        let L = liouvillian(Some(&H), &[]).unwrap();
        assert_eq!(L.superrep(), Some(SuperRep::Super));
        let drho = apply(&L, &rho);
        assert!(drho.approx_eq(&Qobj::zeros(Dims::oper(vec![2])), 0.0));

        // -i[H, ρ] for ρ = |+⟩⟨+|: off-diagonals -i and +i
        let plus = Qobj::new(
            array![[c(0.5, 0.0), c(0.5, 0.0)], [c(0.5, 0.0), c(0.5, 0.0)]],
            Dims::oper(vec![2]),
        )
        .unwrap();
        let drho = apply(&L, &plus);
        let expected = Qobj::new(
            array![[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]],
            Dims::oper(vec![2]),
        )
        .unwrap();
        assert!(drho.approx_eq(&expected, 1e-15));
    }

    #[test]
    fn unitary_limit_random() {
        let mut rng = StdRng::seed_from_u64(23);
        let H = rand_herm(4, 0.7, &mut rng);
        let rho = rand_dm(4, &mut rng);
        let L = liouvillian(Some(&H), &[]).unwrap();
        let comm = H.checked_mul(&rho).unwrap()
            .checked_sub(&rho.checked_mul(&H).unwrap()).unwrap()
            .scale(c(0.0, -1.0));
        assert!(apply(&L, &rho).approx_eq(&comm, 1e-13));
    }

    #[test]
    fn purely_dissipative() {
        let sm = sigma_minus();
        let L = liouvillian(None, &[sm.clone()]).unwrap();
        let D = lindblad_dissipator(&sm, None).unwrap();
        assert!(L.approx_eq(&D, 0.0));
        assert_eq!(L.dims(), &Dims::superop(sm.dims()));

        assert!(matches!(liouvillian(None, &[]), Err(QError::Type(_))));
    }

    #[test]
    fn collapse_dims_must_match() {
        let H = Qobj::eye(vec![2]);
        let c_ops = [Qobj::eye(vec![3])];
        assert!(matches!(liouvillian(Some(&H), &c_ops), Err(QError::Shape(_))));
        let sup = spre(&H).unwrap();
        assert!(matches!(liouvillian(Some(&sup), &[]), Err(QError::Type(_))));
    }

    #[test]
    fn deterministic_assembly() {
        let mut rng = StdRng::seed_from_u64(29);
        let H = rand_herm(5, 0.5, &mut rng);
        let c_ops: Vec<Qobj>
            = (0..4).map(|_| rand_sparse_oper(5, 5, 0.4, &mut rng)).collect();
        let L1 = liouvillian(Some(&H), &c_ops).unwrap();
        let L2 = liouvillian(Some(&H), &c_ops).unwrap();
        assert_eq!(L1, L2);
    }

    #[test]
    fn trace_preserving_generator() {
        let mut rng = StdRng::seed_from_u64(31);
        let H = rand_herm(4, 0.6, &mut rng);
        let c_ops: Vec<Qobj>
            = (0..3).map(|_| rand_oper(4, 4, &mut rng)).collect();
        let L = liouvillian(Some(&H), &c_ops).unwrap();
        let rho = rand_dm(4, &mut rng);
        let drho = apply(&L, &rho);
        assert_abs_diff_eq!(drho.tr().re, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(drho.tr().im, 0.0, epsilon = 1e-12);
        assert!(drho.data().is_hermitian(1e-12));
    }
}
