//! Graph generators.
//!
//! Structural builders are deterministic. Randomized models and the
//! [`reconnect`] primitive take the random source explicitly, so a seeded
//! generator such as `rand::rngs::SmallRng` reproduces the same graph.

mod models;
mod rewire;
mod structural;


pub use models::{barabasi_albert, erdos_renyi, watts_strogatz};
pub use rewire::{RewireMode, reconnect};
pub use structural::{
    DEFAULT_LATTICE_DIM, DEFAULT_ODD_DEGREE, DEFAULT_RING_DEGREE, full_connect, lattice,
    odd_regular, ring,
};
