use proptest::prelude::*;
use queen_race::{
    AggregatedView, Phase, PoolConfig, RunController, SearchEngine, SnapshotAggregator,
    WorkerOutcome, WorkerPool,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Independent oracle: does any full placement keep a queen at (row, 0)?
fn solvable_with_anchor(n: usize, row: usize) -> bool {
    fn place(n: usize, col: usize, rows: &mut Vec<usize>) -> bool {
        if col == n {
            return true;
        }
        for r in 0..n {
            let safe = rows
                .iter()
                .enumerate()
                .all(|(c, &pr)| pr != r && pr.abs_diff(r) != c.abs_diff(col));
            if safe {
                rows.push(r);
                if place(n, col + 1, rows) {
                    return true;
                }
                rows.pop();
            }
        }
        false
    }
    place(n, 1, &mut vec![row])
}

fn recording_controller(
    config: PoolConfig,
) -> (
    Arc<Mutex<Vec<AggregatedView>>>,
    RunController<impl queen_race::RenderSink>,
) {
    let views = Arc::new(Mutex::new(Vec::new()));
    let sink_views = Arc::clone(&views);
    let controller = RunController::new(config, move |view: AggregatedView| {
        sink_views.lock().unwrap().push(view)
    });
    (views, controller)
}

proptest! {
    #[test]
    fn prop_engine_ends_with_exactly_one_terminal(
        (n, row) in (1usize..=9).prop_flat_map(|n| (Just(n), 0..n))
    ) {
        let snapshots = SearchEngine::new(row, row, n).unwrap().run_to_completion();

        let terminal: Vec<_> = snapshots.iter().filter(|s| s.phase().is_terminal()).collect();
        prop_assert_eq!(terminal.len(), 1);
        prop_assert!(snapshots.last().unwrap().phase().is_terminal());
        prop_assert_eq!(snapshots.first().unwrap().phase(), Phase::Initial);

        let expected = if solvable_with_anchor(n, row) { Phase::Solution } else { Phase::Terminated };
        prop_assert_eq!(terminal[0].phase(), expected);
    }

    #[test]
    fn prop_every_snapshot_is_non_attacking_and_keeps_anchor(
        (n, row) in (1usize..=8).prop_flat_map(|n| (Just(n), 0..n))
    ) {
        for snapshot in SearchEngine::new(row, row, n).unwrap().run_to_completion() {
            prop_assert!(snapshot.is_consistent());
            prop_assert_eq!(snapshot.board().column_of(row), Some(0));
        }
    }
}

#[test]
fn test_four_queens_scenarios() {
    let mut exhausted = SearchEngine::new(0, 0, 4).unwrap();
    while !exhausted.is_finished() {
        exhausted.step();
    }
    assert_eq!(exhausted.phase(), Phase::Terminated);

    let mut solved = SearchEngine::new(2, 2, 4).unwrap();
    while !solved.is_finished() {
        solved.step();
    }
    assert_eq!(solved.phase(), Phase::Solution);
    assert_eq!(solved.column(), 4);
    assert!(solved.board().is_complete());
}

#[test]
fn test_stalled_consumer_does_not_block_producers() {
    let config = PoolConfig::default().with_step_delay(Duration::ZERO);
    let mut pool = WorkerPool::new(config);
    pool.start(8).unwrap();
    let capacity = pool.capacity().unwrap();
    assert_eq!(capacity, 8);

    // nobody is reading the channel
    assert!(pool.wait_timeout(Duration::from_secs(30)));
    let receiver = pool.snapshots().unwrap();
    assert!(receiver.len() <= capacity);

    let stats = pool.wait();
    assert_eq!(stats.len(), 8);
    assert!(stats.iter().all(|s| s.outcome == WorkerOutcome::Solved));
    assert!(stats.iter().map(|s| s.dropped).sum::<u64>() > 0);
    pool.stop();
}

#[test]
fn test_aggregated_timestamps_never_go_backwards() {
    let config = PoolConfig::default()
        .with_step_delay(Duration::from_millis(1))
        .with_channel_capacity(2);
    let (views, mut controller) = recording_controller(config);

    controller.start_run(6).unwrap();
    let summary = controller.finish_run(Some(Duration::from_secs(30))).unwrap();
    assert!(!summary.timed_out);

    let views = views.lock().unwrap();
    assert!(!views.is_empty());
    let mut last_seen: BTreeMap<usize, (u64, Duration)> = BTreeMap::new();
    for view in views.iter() {
        for (&id, snapshot) in &view.states {
            let ts = snapshot.timestamp();
            if let Some(prev) = last_seen.insert(id, ts) {
                assert!(prev <= ts, "worker {} went from {:?} to {:?}", id, prev, ts);
            }
            assert!(snapshot.is_consistent());
        }
    }
}

#[test]
fn test_stop_run_twice_leaves_everything_empty() {
    let config = PoolConfig::default().with_step_delay(Duration::from_millis(20));
    let (_views, mut controller) = recording_controller(config);

    controller.start_run(8).unwrap();
    std::thread::sleep(Duration::from_millis(50));

    let first = controller.stop_run();
    assert_eq!(first.len(), 8);
    assert!(controller.pool().snapshots().is_none());

    let second = controller.stop_run();
    assert!(second.is_empty());
    assert!(controller.pool().snapshots().is_none());
    assert!(!controller.is_running());
}

#[test]
fn test_restart_after_stop() {
    let config = PoolConfig::default()
        .with_step_delay(Duration::ZERO)
        .with_channel_capacity(4096);
    let (views, mut controller) = recording_controller(config);

    controller.start_run(8).unwrap();
    controller.stop_run();
    views.lock().unwrap().clear();

    let colors = controller.start_run(4).unwrap();
    assert_eq!(colors.len(), 4);
    let summary = controller.finish_run(None).unwrap();
    assert_eq!(summary.view.states.len(), 4);

    // nothing from the 8-worker run leaks into the new run's views
    let views = views.lock().unwrap();
    assert!(views.iter().all(|v| v.states.keys().all(|&id| id < 4)));
    assert!(views.iter().all(|v| v.colors.len() == 4));
}

#[test]
fn test_invalid_sizes_are_rejected() {
    let (views, mut controller) = recording_controller(PoolConfig::default());
    for n in [0, -3] {
        let err = controller.start_run(n).unwrap_err();
        assert!(err.is_configuration());
    }
    assert!(!controller.is_running());
    assert!(views.lock().unwrap().is_empty());
}

#[test]
fn test_aggregator_with_pool_channel() {
    let mut pool = WorkerPool::new(
        PoolConfig::default()
            .with_step_delay(Duration::ZERO)
            .with_channel_capacity(4096),
    );
    let colors = pool.start(5).unwrap().clone();

    let latest = Arc::new(Mutex::new(AggregatedView::default()));
    let sink_latest = Arc::clone(&latest);
    let mut aggregator =
        SnapshotAggregator::new(move |view: AggregatedView| *sink_latest.lock().unwrap() = view);
    aggregator.start(pool.snapshots().unwrap(), colors).unwrap();

    pool.wait();
    let summary = aggregator.wait().unwrap();
    pool.release();

    assert!(summary.view.all_terminal());
    assert_eq!(summary.view.solved().count(), 5);
    assert_eq!(*latest.lock().unwrap(), summary.view);
}
