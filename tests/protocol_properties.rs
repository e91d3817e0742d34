//! Handshake properties over arbitrary dispatch sequences: generations
//! advance by exactly one per dispatch, every worker serves every
//! generation once, and only valid slots reach the reducer.

#![cfg(feature = "std")]

mod common;

use proptest::prelude::*;

use offrect::candidate::CandidatePairs;
use offrect::edges::EdgeSet;
use offrect::protocol::{Dispatcher, Fabric, SlotPhase, Worker};
use offrect::queue::OffloadQueue;
use offrect::sync::spin_then_yield;

use common::{boundary, L_SHAPE};

const POOL: usize = 4;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_generation_steps_by_one(fills in prop::collection::vec(0usize..=POOL, 1..24)) {
        let shape = boundary(&L_SHAPE);
        let edges = EdgeSet::from_boundary(&shape).unwrap();
        let candidates: Vec<_> = CandidatePairs::new(&shape).map(|(_, c)| c).collect();

        let fabric = Fabric::<POOL>::new();
        let mut dispatcher = Dispatcher::new();
        let mut workers: [Worker; POOL] = core::array::from_fn(Worker::new);
        let mut queue = OffloadQueue::<POOL>::new();

        for (round, &fill) in fills.iter().enumerate() {
            let generation = round as u32 + 1;
            for k in 0..fill {
                queue.push(&fabric, candidates[(round + k) % candidates.len()]).unwrap();
            }

            let mut batch = dispatcher.arm(&fabric, queue.len());
            prop_assert_eq!(batch.generation(), generation);
            for (slot, worker) in fabric.slots().iter().zip(&workers) {
                prop_assert_eq!(slot.generation(), generation);
                prop_assert_eq!(worker.expected(), generation);
                prop_assert_eq!(worker.phase(&fabric), SlotPhase::Running);
            }

            batch.wait(|| {
                for worker in workers.iter_mut() {
                    worker.step(&fabric, &edges);
                }
            });
            prop_assert_eq!(batch.results().count(), fill);
            drop(batch);
            queue.clear();

            for worker in &workers {
                prop_assert_eq!(worker.completed(), generation);
                prop_assert_eq!(worker.phase(&fabric), SlotPhase::Idle);
            }
        }
        prop_assert_eq!(dispatcher.issued() as usize, fills.len());
    }
}

#[test]
fn test_threaded_workers_never_skip_a_generation() {
    const ROUNDS: u32 = 200;

    let shape = boundary(&L_SHAPE);
    let edges = EdgeSet::from_boundary(&shape).unwrap();
    let candidates: Vec<_> = CandidatePairs::new(&shape).map(|(_, c)| c).collect();
    let fabric = Fabric::<POOL>::new();
    let mut dispatcher = Dispatcher::new();
    let mut queue = OffloadQueue::<POOL>::new();

    let completed = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..POOL)
            .map(|slot| {
                let (fabric, edges) = (&fabric, &edges);
                scope.spawn(move || {
                    let mut worker = Worker::new(slot);
                    worker.run(fabric, edges, || spin_then_yield(64));
                    worker.completed()
                })
            })
            .collect();

        for round in 0..ROUNDS as usize {
            for k in 0..(round % (POOL + 1)) {
                queue.push(&fabric, candidates[(round + k) % candidates.len()]).unwrap();
            }
            let mut batch = dispatcher.arm(&fabric, queue.len());
            batch.wait(spin_then_yield(64));
            assert_eq!(batch.results().count(), queue.len());
            drop(batch);
            queue.clear();
        }
        fabric.halt();

        handles.into_iter().map(|h| h.join().unwrap()).collect::<Vec<_>>()
    });

    assert_eq!(completed, vec![ROUNDS; POOL]);
}
