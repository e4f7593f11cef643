// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Five ways of getting the same cells computed.
//!
//! All five fill an `ImageBuffer` with the same `CellFunction` and
//! must agree bit for bit.  They differ only in how the work is cut
//! up and handed to threads:
//!
//! * `sequential` walks the grid on the calling thread.
//! * `per_cell` spawns one task per cell.
//! * `per_row` spawns one task per row.
//! * `cell_pool` queues every cell for a fixed pool of workers.
//! * `row_pool` queues every row for a fixed pool of workers.
//!
//! A row here is the task unit indexed by x: the grid has `width` of
//! them, each covering `height` cells.
//!
//! The spawning strategies put their tasks on rayon's pool and wait on
//! a `WaitGroup` cloned once per task; the pooled ones wait on one
//! clone per worker inside `pool::drain`.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;

use crossbeam::sync::WaitGroup;
use itertools::iproduct;
use rayon;

use cell::CellFunction;
use error::RenderError;
use grid::{Coordinate, GridDimensions, ImageBuffer, Row, Slot, Transposed};
use pool::{self, Tally};

/// A completed buffer, along with how the work was distributed.
#[derive(Debug)]
pub struct Rendered {
    /// Every cell written exactly once.
    pub buffer: ImageBuffer,
    /// The schedule that produced it.
    pub tally: Tally,
}

/// The single-threaded baseline.  Row-major, written straight into
/// the buffer.
pub fn sequential<C>(dimensions: GridDimensions, cell: &C) -> Result<Rendered, RenderError>
where
    C: CellFunction + ?Sized,
{
    let mut buffer = ImageBuffer::new(dimensions);
    for (y, x) in iproduct!(0..dimensions.height(), 0..dimensions.width()) {
        let coordinate = Coordinate(x, y);
        buffer.set(coordinate, cell.intensity(coordinate, dimensions))?;
    }
    Ok(Rendered {
        buffer,
        tally: Tally::sequential(dimensions.area()),
    })
}

/// Spawns one rayon task per unit and blocks until a `WaitGroup`
/// cloned once per task has been released.  The scope runs on the
/// calling thread, so the wait never occupies one of the pool's
/// threads.  Must not be called from inside rayon's pool.
fn spawn_each<I, T, F>(tasks: I, work: F) -> Result<usize, RenderError>
where
    I: IntoIterator<Item = T>,
    T: Send,
    F: Fn(T) + Sync,
{
    let work = &work;
    let barrier = WaitGroup::new();
    panic::catch_unwind(AssertUnwindSafe(move || {
        rayon::in_place_scope(move |scope| {
            let mut spawned = 0;
            for task in tasks {
                let done = barrier.clone();
                scope.spawn(move |_| {
                    work(task);
                    drop(done);
                });
                spawned += 1;
            }
            debug!("spawned {} tasks", spawned);
            barrier.wait();
            spawned
        })
    }))
    .map_err(|_| RenderError::TaskPanicked)
}

/// One task per cell, with no bound on how many are queued at once.
/// This is the expensive end of the scale on purpose.
pub fn per_cell<C>(dimensions: GridDimensions, cell: &C) -> Result<Rendered, RenderError>
where
    C: CellFunction + ?Sized,
{
    let mut buffer = ImageBuffer::new(dimensions);
    let spawned = spawn_each(buffer.cells_mut(), |slot: Slot| {
        slot.render(cell, dimensions)
    })?;
    Ok(Rendered {
        buffer,
        tally: Tally::spawned(spawned),
    })
}

/// One task per row; each renders its `height` cells in turn.
pub fn per_row<C>(dimensions: GridDimensions, cell: &C) -> Result<Rendered, RenderError>
where
    C: CellFunction + ?Sized,
{
    let mut scratch = Transposed::new(dimensions);
    let spawned = spawn_each(scratch.rows_mut(), |row: Row| row.render(cell, dimensions))?;
    Ok(Rendered {
        buffer: scratch.into_buffer(),
        tally: Tally::spawned(spawned),
    })
}

/// A fixed pool of `workers` threads pulling single cells off a
/// shared queue.
pub fn cell_pool<C>(
    dimensions: GridDimensions,
    workers: usize,
    cell: &C,
) -> Result<Rendered, RenderError>
where
    C: CellFunction + ?Sized,
{
    let mut buffer = ImageBuffer::new(dimensions);
    let tally = pool::drain(buffer.cells_mut(), workers, |slot: Slot| {
        slot.render(cell, dimensions)
    })?;
    Ok(Rendered { buffer, tally })
}

/// A fixed pool of `workers` threads pulling whole rows off a shared
/// queue.
pub fn row_pool<C>(
    dimensions: GridDimensions,
    workers: usize,
    cell: &C,
) -> Result<Rendered, RenderError>
where
    C: CellFunction + ?Sized,
{
    let mut scratch = Transposed::new(dimensions);
    let tally = pool::drain(scratch.rows_mut(), workers, |row: Row| {
        trace!("rendering row {}", row.index());
        row.render(cell, dimensions)
    })?;
    Ok(Rendered {
        buffer: scratch.into_buffer(),
        tally,
    })
}

/// Which of the five strategies to run.  Exactly one runs per render.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Nested loops on the calling thread.
    Sequential,
    /// One task per cell.
    PerCell,
    /// One task per row.
    PerRow,
    /// A worker pool fed with cells.
    CellPool,
    /// A worker pool fed with rows.
    RowPool,
}

static STRATEGIES: [Strategy; 5] = [
    Strategy::Sequential,
    Strategy::PerCell,
    Strategy::PerRow,
    Strategy::CellPool,
    Strategy::RowPool,
];

impl Strategy {
    /// Every strategy, cheapest-to-explain first.
    pub fn all() -> &'static [Strategy] {
        &STRATEGIES
    }

    /// The name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::PerCell => "per-cell",
            Strategy::PerRow => "per-row",
            Strategy::CellPool => "cell-pool",
            Strategy::RowPool => "row-pool",
        }
    }

    /// Fills a buffer of the given dimensions.  `workers` is only
    /// consulted by the pooled strategies.
    pub fn run<C>(
        self,
        dimensions: GridDimensions,
        workers: usize,
        cell: &C,
    ) -> Result<Rendered, RenderError>
    where
        C: CellFunction + ?Sized,
    {
        debug!("{}: filling a {} grid", self, dimensions);
        let rendered = match self {
            Strategy::Sequential => sequential(dimensions, cell),
            Strategy::PerCell => per_cell(dimensions, cell),
            Strategy::PerRow => per_row(dimensions, cell),
            Strategy::CellPool => cell_pool(dimensions, workers, cell),
            Strategy::RowPool => row_pool(dimensions, workers, cell),
        }?;
        debug!("{}: complete, {:?}", self, rendered.tally);
        Ok(rendered)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STRATEGIES
            .iter()
            .cloned()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| RenderError::UnknownStrategy(s.to_string()))
    }
}
