//! Basis and operators for a single two-level atom in a single-mode cavity
//! (the Jaynes-Cummings model), truncated by total excitation number.
//!
//! A state `|α, m⟩` holds the atomic level `α ∈ {0, 1}` and the photon number
//! `m`. The matrix elements of the lowering operators are
//!
//! ```text
//! ⟨α, m| a |β, n⟩ = √n δ(α, β) δ(m, n - 1)
//! ⟨α, m| σ |β, n⟩ = δ(α, 0) δ(β, 1) δ(m, n)
//! ```

use crate::{
    hilbert::{ Basis, BasisState },
    qobj::Qobj,
    tensor::kron_delta_f,
};

/// Atom-cavity basis state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct JCState {
    /// Atomic level, `0` (ground) or `1` (excited).
    pub atom: usize,
    /// Number of cavity photons.
    pub photons: usize,
}

impl BasisState for JCState {
    fn excitations(&self) -> usize { self.atom + self.photons }
}

impl From<(usize, usize)> for JCState {
    fn from(am: (usize, usize)) -> Self {
        let (atom, photons) = am;
        Self { atom, photons }
    }
}

/// Enumerate all states with at most `N` excitations and fewer than `N`
/// photons, ordered by excitation number, then photon number, then atomic
/// level.
pub fn states(N: usize) -> Basis<JCState> {
    (0..=N)
        .flat_map(|n| {
            (0..N).flat_map(move |j| {
                (0..2_usize)
                    .filter(move |i| i + j == n)
                    .map(move |i| JCState { atom: i, photons: j })
            })
        })
        .collect()
}

/// Photon lowering operator `a`.
pub fn destroy_a(basis: &Basis<JCState>) -> Qobj {
    basis.operator(|s, t| {
        (t.photons as f64).sqrt()
            * kron_delta_f(s.atom, t.atom)
            * kron_delta_f(s.photons + 1, t.photons)
    })
    .with_isherm(Some(false))
}

/// Atomic lowering operator `σ`.
pub fn destroy_x(basis: &Basis<JCState>) -> Qobj {
    basis.operator(|s, t| {
        kron_delta_f(s.atom, 0)
            * kron_delta_f(t.atom, 1)
            * kron_delta_f(s.photons, t.photons)
    })
    .with_isherm(Some(false))
}

/// Photon raising operator `a†`.
pub fn create_a(basis: &Basis<JCState>) -> Qobj { destroy_a(basis).dag() }

/// Atomic raising operator `σ†`.
pub fn create_x(basis: &Basis<JCState>) -> Qobj { destroy_x(basis).dag() }

// a†a for a lowering operator built over a basis; the product of sparse
// operators on the same basis cannot fail
pub(crate) fn number_of(a: &Qobj) -> Qobj {
    let a = a.data().to_sparse();
    Qobj::from_matrix(a.adjoint().matmul(&a)).with_isherm(Some(true))
}

/// Photon number operator `a†a`.
pub fn num_a(basis: &Basis<JCState>) -> Qobj { number_of(&destroy_a(basis)) }

/// Atomic excitation number operator `σ†σ`.
pub fn num_x(basis: &Basis<JCState>) -> Qobj { number_of(&destroy_x(basis)) }
