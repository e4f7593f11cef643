// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The single error type shared by the renderer, its worker pool, and
//! the image sink.

use std::io;

/// Everything that can stop a render from producing an image.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// A grid needs at least one row and one column.
    #[fail(display = "grid dimensions must be positive, got {}x{}", _0, _1)]
    EmptyGrid(usize, usize),

    /// The grid has more cells than memory can address, or is too
    /// wide or tall for the image format.
    #[fail(display = "grid dimensions {}x{} are too large", _0, _1)]
    TooLarge(usize, usize),

    /// Dimensions given as text were not of the form WIDTHxHEIGHT.
    #[fail(display = "could not parse grid dimensions from {:?}", _0)]
    BadDimensions(String),

    /// A write was addressed to a cell that is not on the grid.
    #[fail(display = "coordinate ({}, {}) lies outside the grid", _0, _1)]
    OutOfBounds(usize, usize),

    /// A worker pool was asked to run with no workers.
    #[fail(display = "a worker pool needs at least one worker")]
    EmptyPool,

    /// The shared queue refused a task unit while it was being filled.
    #[fail(display = "the task queue closed before it was filled")]
    QueueClosed,

    /// A task or worker panicked before reporting done.
    #[fail(display = "a scheduled task panicked before completing")]
    TaskPanicked,

    /// A command-line value could not be parsed.
    #[fail(display = "invalid value {:?} for --{}", _1, _0)]
    BadArgument(String, String),

    /// The named strategy does not exist.
    #[fail(display = "unknown strategy {:?}", _0)]
    UnknownStrategy(String),

    /// The image could not be written.
    #[fail(display = "could not write image: {}", _0)]
    Io(#[cause] io::Error),
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> RenderError {
        RenderError::Io(err)
    }
}
