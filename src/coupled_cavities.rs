#![allow(dead_code, non_snake_case, non_upper_case_globals)]

//! Two photon-coupled atom-cavity sites: an excitation starting on the first
//! atom hops to the second site while leaking out of both cavities.
//!
//! An optional first argument names a TOML file with numerical [`Settings`].

use std::path::PathBuf;
use anyhow::anyhow;
use ndarray as nd;
use tracing::{ debug, info };
use tracing_subscriber::EnvFilter;
use quantum::{
    mkdir,
    write_npz,
    coupled_cavities::{ self as cc, CCState, Site },
    hilbert::Basis,
    ExpmMethod,
    QResult,
    Qobj,
    Settings,
    from_vector,
    liouvillian,
    to_vector,
};

const NMAX: usize = 2; // maximum excitation number
const OMEGA_C: f64 = 1.0; // cavity frequencies
const OMEGA_X: f64 = 1.0; // atomic frequencies
const G: f64 = 0.1; // atom-cavity coupling on each site
const J: f64 = 0.05; // photon hopping between cavities
const KAPPA: f64 = 0.01; // cavity loss rate
const GAMMA: f64 = 0.002; // atomic decay rate

const T_TOTAL: f64 = 300.0;
const NSTEPS: usize = 3000;

// a†b + b†a
fn exchange(a: &Qobj, b: &Qobj) -> QResult<Qobj> {
    a.dag().checked_mul(b)?.checked_add(&b.dag().checked_mul(a)?)
}

fn hamiltonian(basis: &Basis<CCState>) -> QResult<Qobj> {
    let mut terms: Vec<Qobj> = Vec::new();
    for site in [Site::One, Site::Two] {
        let a = cc::destroy_a(basis, site);
        let sm = cc::destroy_x(basis, site);
        terms.push(cc::num_a(basis, site) * OMEGA_C);
        terms.push(cc::num_x(basis, site) * OMEGA_X);
        terms.push(exchange(&a, &sm)? * G);
    }
    let a1 = cc::destroy_a(basis, Site::One);
    let a2 = cc::destroy_a(basis, Site::Two);
    terms.push(exchange(&a1, &a2)? * J);
    Qobj::checked_sum(&terms)
}

fn collapse_ops(basis: &Basis<CCState>) -> Vec<Qobj> {
    [Site::One, Site::Two].into_iter()
        .flat_map(|site| {
            [
                cc::destroy_a(basis, site) * KAPPA.sqrt(),
                cc::destroy_x(basis, site) * GAMMA.sqrt(),
            ]
        })
        .collect()
}

struct Data {
    time: nd::Array1<f64>,
    pops: nd::Array2<f64>,
    atoms: nd::Array2<f64>,
}

fn doit(settings: &Settings) -> anyhow::Result<Data> {
    let basis = cc::states(NMAX);
    info!(n_states = basis.num_states(), "built two-site basis");
    for (k, manifold) in basis.manifolds() {
        debug!(excitations = k, n_states = manifold.len(), "manifold");
    }

    let H = hamiltonian(&basis)?;
    let L = liouvillian(Some(&H), &collapse_ops(&basis))?;

    let time: nd::Array1<f64> = nd::Array1::linspace(0.0, T_TOTAL, NSTEPS);
    let dt = time[1] - time[0];
    let U = (&L * dt).expm(ExpmMethod::Sparse, settings)?;
    info!(nnz = U.data().nnz(), dt, "built one-step propagator");

    let init = CCState { atom1: 1, photons1: 0, atom2: 0, photons2: 0 };
    let rho0 = basis.get_density(&init)
        .ok_or_else(|| anyhow!("initial state {:?} not in basis", init))?;
    let n_x = [cc::num_x(&basis, Site::One), cc::num_x(&basis, Site::Two)];

    let n = basis.num_states();
    let mut pops: nd::Array2<f64> = nd::Array2::zeros((NSTEPS, n));
    let mut atoms: nd::Array2<f64> = nd::Array2::zeros((NSTEPS, 2));
    let mut vec = to_vector(&rho0)?;
    for t in 0..NSTEPS {
        if t > 0 { vec = U.checked_mul(&vec)?; }
        let rho = from_vector(&vec)?;
        pops.row_mut(t).iter_mut().enumerate()
            .for_each(|(k, p)| { *p = rho.get(k, k).re; });
        for (j, nx) in n_x.iter().enumerate() {
            atoms[[t, j]] = nx.checked_mul(&rho)?.tr().re;
        }
    }
    Ok(Data { time, pops, atoms })
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

    let outdir = PathBuf::from("output/coupled_cavities");
    mkdir!(outdir);

    let Data { time, pops, atoms } = doit(&settings)?;
    info!(
        final_atom1 = atoms[[NSTEPS - 1, 0]],
        final_atom2 = atoms[[NSTEPS - 1, 1]],
        "finished propagation",
    );

    write_npz!(
        outdir.join("data.npz"),
        arrays: {
            "time" => &time,
            "pops" => &pops,
            "atoms" => &atoms,
        }
    );
    info!(outdir = %outdir.display(), "wrote output");
    Ok(())
}
