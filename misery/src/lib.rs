//! # Hill misery
//!
//! `misery` models how unpleasant it is to cycle a slope.
//!
//! A rider has an available power envelope (walking at low speeds,
//! riding above the dismount threshold). For a given slope and wind
//! the rider settles at the highest speed the envelope sustains, and
//! the energy per distance at that speed, averaged over both
//! directions and a range of winds, is the cost of the slope. The
//! misery index is that cost relative to flat ground.

mod error;
mod math;
mod model;
mod params;
mod table;

pub use crate::{
    error::MiseryError,
    math::{arange, interp},
    model::{Direction, Equilibrium, MiseryModel},
    params::{Params, PowerCurve},
    table::{MiseryTable, TableEntry},
};
