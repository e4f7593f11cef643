#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time grid renderer
//!
//! Every cell of a fixed-size grid is mapped onto the complex plane
//! and iterated as `z = z * z + c` until it escapes or runs out of
//! iterations; whatever is left of `z` becomes that cell's gray
//! level.  The arithmetic is the easy part.  What this crate is
//! really about is the five ways the same per-cell work can be
//! handed out to threads:
//!
//! * sequentially, on the calling thread;
//! * one task per cell;
//! * one task per row;
//! * a fixed pool of workers draining a queue of cells;
//! * a fixed pool of workers draining a queue of rows.
//!
//! Whichever strategy runs, the buffer is partitioned into disjoint
//! slots before anything is dispatched, each task owns its slots
//! outright, and the caller only sees the buffer once a completion
//! barrier has released.  All five produce identical images.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;
extern crate rayon;

pub mod cell;
pub mod config;
pub mod driver;
pub mod error;
pub mod grid;
pub mod output;
pub mod pool;
pub mod strategy;

pub use cell::{CellFunction, EscapeTime};
pub use config::Config;
pub use error::RenderError;
pub use grid::{Coordinate, GridDimensions, ImageBuffer, Intensity};
pub use pool::Tally;
pub use strategy::{Rendered, Strategy};
