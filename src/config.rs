// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Run configuration.  Everything the renderer needs is passed in
//! here rather than baked in, so the same code renders a 1x1 test
//! grid and a full-size image.

use std::path::PathBuf;
use std::str::FromStr;

use cell::EscapeTime;
use grid::GridDimensions;
use strategy::Strategy;

/// Splits `s` at the first `separator` and parses both halves.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    let mut halves = s.splitn(2, separator);
    let first = halves.next()?.parse().ok()?;
    let second = halves.next()?.parse().ok()?;
    Some((first, second))
}

/// One render: what to compute, how to schedule it, where to put it.
#[derive(Clone, Debug)]
pub struct Config {
    /// Size of the grid.
    pub dimensions: GridDimensions,
    /// Worker count for the pooled strategies.
    pub workers: usize,
    /// Squared-magnitude bound for the escape-time iteration.
    pub complexity: f64,
    /// Iteration cap per cell.
    pub max_iterations: usize,
    /// The scheduling strategy.
    pub strategy: Strategy,
    /// Where the image is written.
    pub output: PathBuf,
}

impl Config {
    /// Default pool size.
    pub const WORKERS: usize = 8;
    /// Default output file.
    pub const OUTPUT: &'static str = "out.png";

    /// The cell function this configuration describes.
    pub fn escape_time(&self) -> EscapeTime {
        EscapeTime::new(self.complexity, self.max_iterations)
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            dimensions: GridDimensions::default(),
            workers: Config::WORKERS,
            complexity: EscapeTime::COMPLEXITY,
            max_iterations: EscapeTime::MAX_ITERATIONS,
            strategy: Strategy::RowPool,
            output: PathBuf::from(Config::OUTPUT),
        }
    }
}
