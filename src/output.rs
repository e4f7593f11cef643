// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Hands a finished buffer to an image encoder.

use std::convert::TryFrom;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::png::PNGEncoder;
use image::pnm::{PNMEncoder, PNMSubtype, SampleEncoding};
use image::ColorType;

use error::RenderError;
use grid::{GridDimensions, ImageBuffer};

/// The image header's width and height.  Both have to fit in 32 bits.
pub fn encoded_size(dimensions: GridDimensions) -> Result<(u32, u32), RenderError> {
    let (width, height) = (dimensions.width(), dimensions.height());
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(RenderError::TooLarge(width, height)),
    }
}

/// Writes the buffer as an 8-bit grayscale image.  Files ending in
/// `.pnm` or `.pgm` get a binary graymap; everything else is PNG.
pub fn write_image(path: &Path, buffer: &ImageBuffer) -> Result<(), RenderError> {
    let (width, height) = encoded_size(buffer.dimensions())?;
    let mut output = BufWriter::new(File::create(path)?);
    let graymap = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pnm") || ext.eq_ignore_ascii_case("pgm"))
        .unwrap_or(false);

    if graymap {
        let mut encoder =
            PNMEncoder::new(&mut output).with_subtype(PNMSubtype::Graymap(SampleEncoding::Binary));
        encoder.encode(buffer.as_raw(), width, height, ColorType::Gray(8))?;
    } else {
        PNGEncoder::new(&mut output).encode(buffer.as_raw(), width, height, ColorType::Gray(8))?;
    }
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate tempfile;

    use super::*;
    use grid::Coordinate;
    use std::fs;

    fn gradient() -> ImageBuffer {
        let mut buffer = ImageBuffer::new(GridDimensions::new(4, 2).unwrap());
        for slot in buffer.cells_mut() {
            let Coordinate(x, y) = slot.coordinate();
            slot.set((x * 60 + y) as u8);
        }
        buffer
    }

    #[test]
    fn png_files_carry_the_png_signature() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        write_image(&path, &gradient()).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn pgm_files_are_binary_graymaps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pgm");
        write_image(&path, &gradient()).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"P5");
        assert_eq!(&bytes[bytes.len() - 8..], gradient().as_raw());
    }

    #[test]
    fn encoded_size_passes_ordinary_grids_through() {
        let dims = GridDimensions::new(640, 480).unwrap();
        assert_eq!(encoded_size(dims).unwrap(), (640, 480));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn encoded_size_refuses_sides_wider_than_32_bits() {
        let dims = GridDimensions::new(1 << 33, 1).unwrap();
        match encoded_size(dims) {
            Err(RenderError::TooLarge(w, 1)) => assert_eq!(w, 1 << 33),
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    #[test]
    fn unwritable_paths_are_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        match write_image(&path, &gradient()) {
            Err(RenderError::Io(_)) => (),
            other => panic!("expected an Io error, got {:?}", other),
        }
    }
}
