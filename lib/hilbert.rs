//! Definitions to describe basis states and ordered collections of them.

use std::{ hash::Hash, ops::Deref };
use indexmap::IndexSet;
use itertools::Itertools;
use num_complex::Complex64 as C64;
use num_traits::One;
use crate::{
    qobj::{ Dims, Qobj },
    sparse::CsrMatrix,
};

/* States *********************************************************************/

/// A single basis state.
pub trait BasisState: Clone + PartialEq + Eq + Hash + std::fmt::Debug {
    /// Total number of (atomic and photonic) excitations in the state.
    fn excitations(&self) -> usize;
}

/* Bases **********************************************************************/

/// An ordered collection of unique [`BasisState`]s.
///
/// The position of a state in the collection is its index in every matrix or
/// vector built over the basis. This collection is backed by a single
/// [`IndexSet`], which can be accessed via [`AsRef`] and [`Deref`].
#[derive(Clone, Debug, PartialEq)]
pub struct Basis<S>
where S: BasisState
{
    states: IndexSet<S>,
}

impl<S> AsRef<IndexSet<S>> for Basis<S>
where S: BasisState
{
    fn as_ref(&self) -> &IndexSet<S> { &self.states }
}

impl<S> Deref for Basis<S>
where S: BasisState
{
    type Target = IndexSet<S>;

    fn deref(&self) -> &Self::Target { &self.states }
}

impl<S> Default for Basis<S>
where S: BasisState
{
    fn default() -> Self { Self { states: IndexSet::default() } }
}

impl<S> FromIterator<S> for Basis<S>
where S: BasisState
{
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = S>
    {
        Self { states: iter.into_iter().collect() }
    }
}

impl<S> Basis<S>
where S: BasisState
{
    /// Create a new, empty basis.
    pub fn new() -> Self { Self::default() }

    /// Return the number of states.
    pub fn num_states(&self) -> usize { self.states.len() }

    /// Return the index of a state, if present.
    pub fn index_of(&self, state: &S) -> Option<usize> {
        self.states.get_index_of(state)
    }

    /// Get a state by index.
    pub fn get_state(&self, index: usize) -> Option<&S> {
        self.states.get_index(index)
    }

    /// Iterate over the labels of all density-matrix elements, row-major: the
    /// `k`-th item labels element `(k / n, k % n)`.
    pub fn elements(&self) -> impl Iterator<Item = (&S, &S)> + '_ {
        self.states.iter().cartesian_product(self.states.iter())
    }

    /// Get the column vector for a particular basis state.
    pub fn get_vector(&self, state: &S) -> Option<Qobj> {
        self.index_of(state).map(|k| self.unit_ket(k))
    }

    /// Get the projector onto a particular basis state.
    pub fn get_density(&self, state: &S) -> Option<Qobj> {
        self.index_of(state)
            .map(|k| {
                let n = self.num_states();
                Qobj::from_matrix(
                    CsrMatrix::from_triplets(n, n, [(k, k, C64::one())]))
                    .with_isherm(Some(true))
            })
    }

    fn unit_ket(&self, k: usize) -> Qobj {
        let n = self.num_states();
        // dims are consistent with the data by construction
        Qobj::from_matrix(CsrMatrix::from_triplets(n, 1, [(k, 0, C64::one())]))
    }

    /// Get the column vectors for all basis states, in order.
    pub fn kets(&self) -> Vec<Qobj> {
        (0..self.num_states()).map(|k| self.unit_ket(k)).collect()
    }

    /// Dims of operators acting on the span of the basis.
    pub fn oper_dims(&self) -> Dims { Dims::oper(vec![self.num_states()]) }

    /// Build a sparse operator over the basis from a function giving the
    /// matrix element `⟨row|A|col⟩`; zero elements are not stored.
    pub fn operator<F>(&self, elem: F) -> Qobj
    where F: Fn(&S, &S) -> f64
    {
        let n = self.num_states();
        let trips: Vec<(usize, usize, C64)>
            = self.elements()
            .enumerate()
            .filter_map(|(k, (row, col))| {
                let x = elem(row, col);
                (x != 0.0).then(|| (k / n, k % n, C64::from(x)))
            })
            .collect();
        Qobj::from_matrix(CsrMatrix::from_triplets(n, n, trips))
    }

    /// Return the states grouped by excitation number, in order of first
    /// appearance.
    pub fn manifolds(&self) -> Vec<(usize, Vec<&S>)> {
        let groups = self.states.iter().group_by(|s| s.excitations());
        let manifolds: Vec<(usize, Vec<&S>)>
            = groups.into_iter()
            .map(|(k, group)| (k, group.collect()))
            .collect();
        manifolds
    }
}
