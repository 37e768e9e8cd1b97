#![allow(dead_code, non_snake_case, non_upper_case_globals)]

//! Damped Jaynes-Cummings dynamics: a two-level atom, initially excited,
//! exchanging an excitation with a leaky cavity mode.
//!
//! An optional first argument names a TOML file with numerical [`Settings`].

use std::path::PathBuf;
use anyhow::anyhow;
use ndarray as nd;
use tracing::info;
use tracing_subscriber::EnvFilter;
use quantum::{
    mkdir,
    write_npz,
    atom_cavity::{ self as ac, JCState },
    hilbert::Basis,
    ExpmMethod,
    QResult,
    Qobj,
    Settings,
    from_vector,
    liouvillian,
    to_vector,
};

const NMAX: usize = 4; // maximum excitation number
const OMEGA_C: f64 = 1.0; // cavity frequency
const OMEGA_X: f64 = 1.0; // atomic frequency
const G: f64 = 0.1; // atom-cavity coupling
const KAPPA: f64 = 0.02; // cavity loss rate
const GAMMA: f64 = 0.005; // atomic decay rate

const T_TOTAL: f64 = 200.0;
const NSTEPS: usize = 2000;

fn hamiltonian(basis: &Basis<JCState>) -> QResult<Qobj> {
    let a = ac::destroy_a(basis);
    let sm = ac::destroy_x(basis);
    let exchange
        = a.dag().checked_mul(&sm)?
        .checked_add(&sm.dag().checked_mul(&a)?)?;
    Qobj::checked_sum(&[
        ac::num_a(basis) * OMEGA_C,
        ac::num_x(basis) * OMEGA_X,
        exchange * G,
    ])
}

struct Data {
    time: nd::Array1<f64>,
    pops: nd::Array2<f64>,
    photons: nd::Array1<f64>,
}

fn doit(settings: &Settings) -> anyhow::Result<Data> {
    let basis = ac::states(NMAX);
    info!(n_states = basis.num_states(), "built atom-cavity basis");

    let H = hamiltonian(&basis)?;
    let c_ops = [
        ac::destroy_a(&basis) * KAPPA.sqrt(),
        ac::destroy_x(&basis) * GAMMA.sqrt(),
    ];
    let L = liouvillian(Some(&H), &c_ops)?;

    let time: nd::Array1<f64> = nd::Array1::linspace(0.0, T_TOTAL, NSTEPS);
    let dt = time[1] - time[0];
    let U = (&L * dt).expm(ExpmMethod::Sparse, settings)?;
    info!(nnz = U.data().nnz(), dt, "built one-step propagator");

    let excited = JCState { atom: 1, photons: 0 };
    let rho0 = basis.get_density(&excited)
        .ok_or_else(|| anyhow!("initial state {:?} not in basis", excited))?;
    let n_a = ac::num_a(&basis);

    let n = basis.num_states();
    let mut pops: nd::Array2<f64> = nd::Array2::zeros((NSTEPS, n));
    let mut photons: nd::Array1<f64> = nd::Array1::zeros(NSTEPS);
    let mut vec = to_vector(&rho0)?;
    for t in 0..NSTEPS {
        if t > 0 { vec = U.checked_mul(&vec)?; }
        let rho = from_vector(&vec)?;
        pops.row_mut(t).iter_mut().enumerate()
            .for_each(|(k, p)| { *p = rho.get(k, k).re; });
        photons[t] = n_a.checked_mul(&rho)?.tr().re;
    }
    Ok(Data { time, pops, photons })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let settings: Settings
        = match std::env::args().nth(1) {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

    let outdir = PathBuf::from("output/jaynes_cummings");
    mkdir!(outdir);

    let Data { time, pops, photons } = doit(&settings)?;
    let trace_err: f64
        = pops.rows().into_iter()
        .map(|row| (row.sum() - 1.0).abs())
        .fold(0.0, f64::max);
    info!(trace_err, "finished propagation");

    write_npz!(
        outdir.join("data.npz"),
        arrays: {
            "time" => &time,
            "pops" => &pops,
            "photons" => &photons,
        }
    );
    info!(outdir = %outdir.display(), "wrote output");
    Ok(())
}
