// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A fixed-size pool of workers draining a shared queue.
//!
//! The queue is a crossbeam channel sized to hold every task unit.
//! It is filled completely and its sending side dropped before the
//! first worker starts, so a worker's receive loop ends exactly when
//! the queue is empty.  The channel guarantees that each unit is
//! received by one worker only.  Completion is a `WaitGroup` holding
//! one clone per worker, not one per task.

use crossbeam;
use crossbeam::channel;
use crossbeam::sync::WaitGroup;

use error::RenderError;

/// What a scheduling run did: how many task units were consumed, how
/// many workers reported done, and how many of those never received
/// a unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tally {
    /// Task units consumed, across all workers.
    pub units: usize,
    /// Workers (or spawned tasks) that reported done.
    pub workers: usize,
    /// Workers that found the queue already empty.
    pub idle: usize,
}

impl Tally {
    /// One thread of control did everything.
    pub fn sequential(units: usize) -> Tally {
        Tally {
            units,
            workers: 1,
            idle: 0,
        }
    }

    /// One task was spawned per unit.
    pub fn spawned(units: usize) -> Tally {
        Tally {
            units,
            workers: units,
            idle: 0,
        }
    }

    /// Workers that consumed at least one unit.
    pub fn active(&self) -> usize {
        self.workers - self.idle
    }
}

/// Runs `work` once for every task unit, on a pool of `workers`
/// threads.  Blocks until every worker has seen the queue run dry.
pub fn drain<I, T, F>(tasks: I, workers: usize, work: F) -> Result<Tally, RenderError>
where
    I: IntoIterator<Item = T>,
    I::IntoIter: ExactSizeIterator,
    T: Send,
    F: Fn(T) + Sync,
{
    if workers == 0 {
        return Err(RenderError::EmptyPool);
    }

    let tasks = tasks.into_iter();
    let (sender, receiver) = channel::bounded(tasks.len().max(1));
    let mut queued = 0;
    for task in tasks {
        sender.send(task).map_err(|_| RenderError::QueueClosed)?;
        queued += 1;
    }
    drop(sender);
    debug!("queued {} task units for {} workers", queued, workers);

    let work = &work;
    let receiver = &receiver;
    let barrier = WaitGroup::new();
    let consumed = crossbeam::scope(move |scope| {
        let handles: Vec<_> = (0..workers)
            .map(|id| {
                let receiver = receiver.clone();
                let done = barrier.clone();
                scope.spawn(move |_| {
                    let mut consumed = 0;
                    for task in receiver.iter() {
                        work(task);
                        consumed += 1;
                    }
                    trace!("worker {} done after {} task units", id, consumed);
                    drop(done);
                    consumed
                })
            })
            .collect();
        barrier.wait();
        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<Result<Vec<usize>, _>>()
    })
    .map_err(|_| RenderError::TaskPanicked)?
    .map_err(|_| RenderError::TaskPanicked)?;

    Ok(Tally {
        units: consumed.iter().sum(),
        workers: consumed.len(),
        idle: consumed.iter().filter(|&&n| n == 0).count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn every_unit_is_delivered_exactly_once() {
        let seen: Vec<AtomicUsize> = (0..500).map(|_| AtomicUsize::new(0)).collect();
        let tally = drain(0..500usize, 8, |i: usize| {
            seen[i].fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        assert_eq!(tally.units, 500);
        assert_eq!(tally.workers, 8);
        assert!(seen.iter().all(|n| n.load(Ordering::SeqCst) == 1));
    }

    #[test]
    fn surplus_workers_find_the_queue_empty() {
        let tally = drain(0..3usize, 8, |_: usize| {}).unwrap();
        assert_eq!(tally.units, 3);
        assert_eq!(tally.workers, 8);
        assert!(tally.active() <= 3);
        assert!(tally.idle >= 5);
    }

    #[test]
    fn an_empty_queue_still_releases_every_worker() {
        let tally = drain(Vec::<usize>::new(), 4, |_: usize| {}).unwrap();
        assert_eq!(tally, Tally { units: 0, workers: 4, idle: 4 });
    }

    #[test]
    fn a_single_worker_drains_in_queue_order() {
        let order = Mutex::new(Vec::<usize>::new());
        drain(0..10usize, 1, |i: usize| order.lock().unwrap().push(i)).unwrap();
        assert_eq!(*order.lock().unwrap(), (0..10).collect::<Vec<usize>>());
    }

    #[test]
    fn pools_need_workers() {
        match drain(0..3usize, 0, |_: usize| {}) {
            Err(RenderError::EmptyPool) => (),
            other => panic!("expected EmptyPool, got {:?}", other),
        }
    }

    #[test]
    fn a_panicking_worker_does_not_hang_the_barrier() {
        let result = drain(0..4usize, 2, |i: usize| {
            if i == 2 {
                panic!("boom");
            }
        });
        match result {
            Err(RenderError::TaskPanicked) => (),
            other => panic!("expected TaskPanicked, got {:?}", other),
        }
    }
}
