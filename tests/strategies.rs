extern crate escapegrid;

use escapegrid::strategy::row_pool;
use escapegrid::{Coordinate, EscapeTime, GridDimensions, Intensity, Strategy};
use std::sync::atomic::{AtomicUsize, Ordering};

const WORKERS: usize = 8;

fn dims(width: usize, height: usize) -> GridDimensions {
    GridDimensions::new(width, height).unwrap()
}

/// A cell function that counts how often each coordinate is computed.
struct Counting {
    dimensions: GridDimensions,
    calls: Vec<AtomicUsize>,
}

impl Counting {
    fn new(dimensions: GridDimensions) -> Counting {
        Counting {
            dimensions,
            calls: (0..dimensions.area()).map(|_| AtomicUsize::new(0)).collect(),
        }
    }

    fn value(coordinate: Coordinate) -> Intensity {
        (coordinate.0 * 7 + coordinate.1 * 13 + 1) as Intensity
    }

    fn total(&self) -> usize {
        self.calls.iter().map(|n| n.load(Ordering::SeqCst)).sum()
    }

    fn each_once(&self) -> bool {
        self.calls.iter().all(|n| n.load(Ordering::SeqCst) == 1)
    }
}

impl escapegrid::CellFunction for Counting {
    fn intensity(&self, coordinate: Coordinate, dimensions: GridDimensions) -> Intensity {
        assert_eq!(dimensions, self.dimensions);
        let offset = dimensions.offset(coordinate).expect("coordinate on the grid");
        self.calls[offset].fetch_add(1, Ordering::SeqCst);
        Counting::value(coordinate)
    }
}

#[test]
fn every_strategy_matches_the_sequential_baseline() {
    let f = EscapeTime::new(EscapeTime::COMPLEXITY, 200);
    for &(w, h) in &[(1, 1), (16, 16), (17, 5), (5, 17), (33, 2)] {
        let d = dims(w, h);
        let baseline = Strategy::Sequential.run(d, WORKERS, &f).unwrap().buffer;
        for strategy in Strategy::all() {
            let rendered = strategy.run(d, WORKERS, &f).unwrap();
            assert_eq!(rendered.buffer, baseline, "{} differs on {}", strategy, d);
        }
    }
}

#[test]
fn every_strategy_computes_each_cell_exactly_once() {
    for strategy in Strategy::all() {
        let d = dims(13, 7);
        let f = Counting::new(d);
        let rendered = strategy.run(d, WORKERS, &f).unwrap();
        assert!(f.each_once(), "{} skipped or repeated a cell", strategy);
        assert_eq!(f.total(), d.area());
        for x in 0..13 {
            for y in 0..7 {
                let c = Coordinate(x, y);
                assert_eq!(rendered.buffer.get(c), Some(Counting::value(c)));
            }
        }
    }
}

#[test]
fn degenerate_grids_terminate() {
    for &(w, h) in &[(1, 1), (1, 9), (9, 1), (3, 1), (1, 3), (3, 3)] {
        for strategy in Strategy::all() {
            let d = dims(w, h);
            let f = Counting::new(d);
            let rendered = strategy.run(d, WORKERS, &f).unwrap();
            assert_eq!(rendered.buffer.len(), w * h);
            assert!(f.each_once(), "{} on {}", strategy, d);
        }
    }
}

#[test]
fn pooled_workers_all_report_done() {
    let d = dims(3, 3);
    let f = Counting::new(d);
    for &strategy in &[Strategy::CellPool, Strategy::RowPool] {
        let tally = strategy.run(d, WORKERS, &f).unwrap().tally;
        assert_eq!(tally.workers, WORKERS);
    }
}

#[test]
fn row_pool_with_more_workers_than_rows() {
    let d = dims(4, 4);
    let f = EscapeTime::default();
    let rendered = row_pool(d, WORKERS, &f).unwrap();
    assert_eq!(rendered.tally.units, 4);
    assert_eq!(rendered.tally.workers, 8);
    assert!(rendered.tally.active() <= 4);
    assert!(rendered.tally.idle >= 4);

    let baseline = Strategy::Sequential.run(d, WORKERS, &f).unwrap().buffer;
    assert_eq!(rendered.buffer, baseline);
}

#[test]
fn a_single_cell_is_computed_once_by_every_strategy() {
    for strategy in Strategy::all() {
        let d = dims(1, 1);
        let f = Counting::new(d);
        let rendered = strategy.run(d, WORKERS, &f).unwrap();
        assert_eq!(f.total(), 1);
        assert_eq!(rendered.buffer.as_raw(), &[Counting::value(Coordinate(0, 0))]);
    }
}

#[test]
fn pooled_strategies_refuse_an_empty_pool() {
    let d = dims(4, 4);
    let f = EscapeTime::default();
    assert!(Strategy::CellPool.run(d, 0, &f).is_err());
    assert!(Strategy::RowPool.run(d, 0, &f).is_err());
}

#[test]
fn spawning_strategies_finish_a_full_size_grid() {
    let d = dims(512, 512);
    let f = EscapeTime::new(EscapeTime::COMPLEXITY, 10);
    let baseline = Strategy::Sequential.run(d, WORKERS, &f).unwrap().buffer;

    let cells = Strategy::PerCell.run(d, WORKERS, &f).unwrap();
    assert_eq!(cells.tally.units, 512 * 512);
    assert_eq!(cells.buffer, baseline);

    let rows = Strategy::PerRow.run(d, WORKERS, &f).unwrap();
    assert_eq!(rows.tally.units, 512);
    assert_eq!(rows.buffer, baseline);
}

#[test]
fn row_strategies_dispatch_one_unit_per_column() {
    let d = dims(7, 3);
    let f = Counting::new(d);
    let spawned = Strategy::PerRow.run(d, WORKERS, &f).unwrap().tally;
    assert_eq!(spawned.units, 7);
    assert_eq!(spawned.workers, 7);
    let pooled = Strategy::RowPool.run(d, WORKERS, &f).unwrap().tally;
    assert_eq!(pooled.units, 7);
    assert_eq!(pooled.workers, WORKERS);
}
