// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The integral plane being rendered, and the buffer that collects
//! one intensity per cell of it.
//!
//! Concurrent strategies never index into the buffer themselves.
//! Instead the buffer is carved up before any work is dispatched:
//! `cells_mut()` hands out one `Slot` per coordinate.  Row tasks are
//! indexed by x and cover the `height` cells of that x, which are
//! strided in a row-major buffer, so they render into a `Transposed`
//! scratch where each of those runs is contiguous and then transpose
//! it back.  Every slot and row is a disjoint mutable borrow of the
//! backing storage, so two tasks can never write the same cell and
//! no locking is needed while they run.

use std::fmt;
use std::str::FromStr;

use cell::CellFunction;
use config::parse_pair;
use error::RenderError;

/// A single grayscale sample.
pub type Intensity = u8;

/// The x, y of one cell of the grid.  x is the column, y the row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate(pub usize, pub usize);

/// The width and height of the grid.  Both are always positive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridDimensions {
    width: usize,
    height: usize,
}

impl GridDimensions {
    /// Fails if either side is zero, or if the grid has more cells
    /// than can be addressed.
    pub fn new(width: usize, height: usize) -> Result<GridDimensions, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyGrid(width, height));
        }
        match width.checked_mul(height) {
            Some(_) => Ok(GridDimensions { width, height }),
            None => Err(RenderError::TooLarge(width, height)),
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The total number of cells in the grid.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// The row-major offset of a coordinate, if it is on the grid.
    pub fn offset(&self, coordinate: Coordinate) -> Option<usize> {
        let Coordinate(x, y) = coordinate;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }
}

impl Default for GridDimensions {
    /// The full-size 2048x2048 render.
    fn default() -> GridDimensions {
        GridDimensions {
            width: 2048,
            height: 2048,
        }
    }
}

impl fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for GridDimensions {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_pair::<usize>(s, 'x') {
            Some((width, height)) => GridDimensions::new(width, height),
            None => Err(RenderError::BadDimensions(s.to_string())),
        }
    }
}

/// A dense, row-major grid of intensities, zeroed on creation.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBuffer {
    dimensions: GridDimensions,
    pixels: Vec<Intensity>,
}

impl ImageBuffer {
    /// Allocates one zeroed slot per cell.
    pub fn new(dimensions: GridDimensions) -> ImageBuffer {
        ImageBuffer {
            dimensions,
            pixels: vec![0 as Intensity; dimensions.area()],
        }
    }

    /// The dimensions this buffer was allocated for.
    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// The number of cells in the buffer.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Never true for a buffer built from valid dimensions.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Reads one cell.
    pub fn get(&self, coordinate: Coordinate) -> Option<Intensity> {
        self.dimensions
            .offset(coordinate)
            .map(|offset| self.pixels[offset])
    }

    /// Writes one cell.  Only the sequential strategy writes through
    /// here; everything concurrent goes through a `Slot`.
    pub fn set(&mut self, coordinate: Coordinate, value: Intensity) -> Result<(), RenderError> {
        match self.dimensions.offset(coordinate) {
            Some(offset) => {
                self.pixels[offset] = value;
                Ok(())
            }
            None => Err(RenderError::OutOfBounds(coordinate.0, coordinate.1)),
        }
    }

    /// The whole grid, row-major, as the encoder wants it.
    pub fn as_raw(&self) -> &[Intensity] {
        &self.pixels
    }

    /// Gives up the backing storage.
    pub fn into_raw(self) -> Vec<Intensity> {
        self.pixels
    }

    /// Partitions the buffer into one writable slot per cell, in
    /// row-major order.
    pub fn cells_mut<'a>(&'a mut self) -> impl ExactSizeIterator<Item = Slot<'a>> + 'a {
        let width = self.dimensions.width;
        self.pixels
            .iter_mut()
            .enumerate()
            .map(move |(offset, pixel)| Slot {
                coordinate: Coordinate(offset % width, offset / width),
                pixel,
            })
    }
}

/// Scratch storage for row tasks, laid out with x as the major
/// index so that the cells of one row task are contiguous.
#[derive(Debug)]
pub struct Transposed {
    dimensions: GridDimensions,
    pixels: Vec<Intensity>,
}

impl Transposed {
    /// Allocates one zeroed slot per cell.
    pub fn new(dimensions: GridDimensions) -> Transposed {
        Transposed {
            dimensions,
            pixels: vec![0 as Intensity; dimensions.area()],
        }
    }

    /// Partitions the scratch into one writable row per x, `width`
    /// rows of `height` cells each.
    pub fn rows_mut<'a>(&'a mut self) -> impl ExactSizeIterator<Item = Row<'a>> + 'a {
        self.pixels
            .chunks_mut(self.dimensions.height)
            .enumerate()
            .map(|(index, pixels)| Row { index, pixels })
    }

    /// Lays the cells back out row-major.
    pub fn into_buffer(self) -> ImageBuffer {
        let (width, height) = (self.dimensions.width, self.dimensions.height);
        let mut pixels = vec![0 as Intensity; self.pixels.len()];
        for (x, run) in self.pixels.chunks(height).enumerate() {
            for (y, &value) in run.iter().enumerate() {
                pixels[y * width + x] = value;
            }
        }
        ImageBuffer {
            dimensions: self.dimensions,
            pixels,
        }
    }
}

/// Exclusive access to exactly one cell of an `ImageBuffer`.
#[derive(Debug)]
pub struct Slot<'a> {
    coordinate: Coordinate,
    pixel: &'a mut Intensity,
}

impl<'a> Slot<'a> {
    /// The cell this slot writes to.
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Stores a value.  Consumes the slot, so a cell is written once.
    pub fn set(self, value: Intensity) {
        *self.pixel = value;
    }

    /// Computes this cell's intensity and stores it.
    pub fn render<C: CellFunction + ?Sized>(self, cell: &C, dimensions: GridDimensions) {
        let value = cell.intensity(self.coordinate, dimensions);
        self.set(value);
    }
}

/// Exclusive access to the cells of one row task: every cell
/// sharing one x, from the top of the grid down.
#[derive(Debug)]
pub struct Row<'a> {
    index: usize,
    pixels: &'a mut [Intensity],
}

impl<'a> Row<'a> {
    /// The x this row task covers.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Splits the row into its cells, in increasing y.
    pub fn into_slots(self) -> impl Iterator<Item = Slot<'a>> {
        let x = self.index;
        self.pixels
            .iter_mut()
            .enumerate()
            .map(move |(y, pixel)| Slot {
                coordinate: Coordinate(x, y),
                pixel,
            })
    }

    /// Renders every cell of the row, one after another.
    pub fn render<C: CellFunction + ?Sized>(self, cell: &C, dimensions: GridDimensions) {
        for slot in self.into_slots() {
            slot.render(cell, dimensions);
        }
    }
}
