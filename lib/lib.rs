#![allow(dead_code, non_snake_case, non_upper_case_globals)]

//! Operators and Lindblad superoperators for open quantum-optical systems.
//!
//! The central entry point is [`liouvillian`], which turns a Hamiltonian and a
//! list of collapse operators into the superoperator `L` satisfying
//! `vec(dρ/dt) = L · vec(ρ)` under the row-major vectorization described in
//! [`vectorize`].

pub mod utils;
pub mod error;
pub mod config;
pub mod sparse;
pub mod qobj;
pub mod expm;
pub mod tensor;
pub mod vectorize;
pub mod superoperator;
pub mod hilbert;
pub mod atom_cavity;
pub mod coupled_cavities;
pub mod random;

pub use crate::{
    config::Settings,
    error::{ QError, QResult },
    expm::{ ExpmMethod, expm },
    qobj::{ Data, Dims, QType, Qobj, Space, SuperRep },
    superoperator::{ liouvillian, lindblad_dissipator, spost, spre },
    vectorize::{ from_vector, to_vector },
};
