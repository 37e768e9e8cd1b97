//! Basis and operators for two coupled cavities, each containing one
//! two-level atom, truncated by total excitation number.
//!
//! A state `|α, m, β, n⟩` holds the atomic level `α` and photon number `m` of
//! the first site and `β`, `n` for the second.

use crate::{
    atom_cavity::number_of,
    hilbert::{ Basis, BasisState },
    qobj::Qobj,
    tensor::kron_delta_f,
};

/// Selects one of the two atom-cavity sites.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Site {
    One,
    Two,
}

/// Two-site basis state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CCState {
    pub atom1: usize,
    pub photons1: usize,
    pub atom2: usize,
    pub photons2: usize,
}

impl BasisState for CCState {
    fn excitations(&self) -> usize {
        self.atom1 + self.photons1 + self.atom2 + self.photons2
    }
}

impl From<(usize, usize, usize, usize)> for CCState {
    fn from(s: (usize, usize, usize, usize)) -> Self {
        let (atom1, photons1, atom2, photons2) = s;
        Self { atom1, photons1, atom2, photons2 }
    }
}

impl CCState {
    fn site(&self, site: Site) -> (usize, usize) {
        match site {
            Site::One => (self.atom1, self.photons1),
            Site::Two => (self.atom2, self.photons2),
        }
    }

    fn other(&self, site: Site) -> (usize, usize) {
        match site {
            Site::One => self.site(Site::Two),
            Site::Two => self.site(Site::One),
        }
    }
}

/// Enumerate all states with at most `N` excitations.
///
/// Within each excitation manifold `k`, states are ordered by the photon
/// number of site two, then the atom of site two, then the photon number of
/// site one, then the atom of site one.
pub fn states(N: usize) -> Basis<CCState> {
    let mut basis: Vec<CCState> = Vec::new();
    for k in 0..=N {
        for n in 0..=k {
            for beta in 0..2 {
                for m in 0..=k {
                    for alpha in 0..2 {
                        if alpha + m + beta + n == k {
                            basis.push((alpha, m, beta, n).into());
                        }
                    }
                }
            }
        }
    }
    basis.into_iter().collect()
}

/// Photon lowering operator for one site.
pub fn destroy_a(basis: &Basis<CCState>, site: Site) -> Qobj {
    basis.operator(|s, t| {
        let (a, m) = s.site(site);
        let (ap, mp) = t.site(site);
        (mp as f64).sqrt()
            * kron_delta_f(a, ap)
            * kron_delta_f(m + 1, mp)
            * kron_delta_f(s.other(site), t.other(site))
    })
    .with_isherm(Some(false))
}

/// Atomic lowering operator for one site.
pub fn destroy_x(basis: &Basis<CCState>, site: Site) -> Qobj {
    basis.operator(|s, t| {
        let (a, m) = s.site(site);
        let (ap, mp) = t.site(site);
        kron_delta_f(a, 0)
            * kron_delta_f(ap, 1)
            * kron_delta_f(m, mp)
            * kron_delta_f(s.other(site), t.other(site))
    })
    .with_isherm(Some(false))
}

/// Photon raising operator for one site.
pub fn create_a(basis: &Basis<CCState>, site: Site) -> Qobj {
    destroy_a(basis, site).dag()
}

/// Atomic raising operator for one site.
pub fn create_x(basis: &Basis<CCState>, site: Site) -> Qobj {
    destroy_x(basis, site).dag()
}

/// Photon number operator for one site.
pub fn num_a(basis: &Basis<CCState>, site: Site) -> Qobj {
    number_of(&destroy_a(basis, site))
}

/// Atomic excitation number operator for one site.
pub fn num_x(basis: &Basis<CCState>, site: Site) -> Qobj {
    number_of(&destroy_x(basis, site))
}
