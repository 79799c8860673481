use alphapoly2d::mask::BitMask;
use alphapoly2d::pipeline::{
    decompose, decompose_with_cancellation, CancellationToken, DecompositionError,
    DecompositionParameters, DecompositionTask, Stage,
};

fn disk(size: u32) -> BitMask {
    let center = size as f64 / 2.0;
    let radius = center - 2.0;
    BitMask::from_fn(size, size, |x, y| {
        let dx = x as f64 + 0.5 - center;
        let dy = y as f64 + 0.5 - center;
        dx * dx + dy * dy <= radius * radius
    })
}

#[test]
fn background_task_matches_direct_call() {
    let mask = disk(40);
    let params = DecompositionParameters::default();
    let expected = decompose(&mask, &params).unwrap();

    let task = DecompositionTask::spawn(mask, params);
    while !task.is_finished() {
        std::thread::yield_now();
    }
    assert_eq!(task.join(), Ok(expected));
}

#[test]
fn cancelled_before_start() {
    let token = CancellationToken::new();
    let observer = token.clone();
    observer.cancel();
    assert!(token.is_cancelled());

    let result = decompose_with_cancellation(&disk(20), &DecompositionParameters::default(), &token);
    assert_eq!(result, Err(DecompositionError::Cancelled(Stage::Trace)));
    assert!(result.unwrap_err().is_recoverable());
}

#[test]
fn cancelled_task_stops_or_completes() {
    let task = DecompositionTask::spawn(disk(400), DecompositionParameters::default());
    task.cancel();

    // The task may have finished before noticing the cancellation.
    match task.join() {
        Ok(polygons) => assert!(!polygons.is_empty()),
        Err(DecompositionError::Cancelled(_)) => {}
        Err(err) => panic!("unexpected error: {err}"),
    }
}

#[test]
fn independent_tasks_run_concurrently() {
    let tasks: Vec<_> = (0..4)
        .map(|i| DecompositionTask::spawn(disk(24 + i * 8), DecompositionParameters::default()))
        .collect();

    for task in tasks {
        let token = task.cancellation_token();
        let polygons = task.join().unwrap();
        assert!(!polygons.is_empty());
        assert!(!token.is_cancelled());
    }
}

#[cfg(feature = "parallel")]
#[test]
fn batch_decomposition_keeps_the_order() {
    use alphapoly2d::pipeline::decompose_batch;

    let masks = vec![disk(20), BitMask::new(8, 8), disk(32)];
    let params = DecompositionParameters::default();
    let results = decompose_batch(&masks, &params);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0], decompose(&masks[0], &params));
    assert_eq!(results[1].as_ref().map_err(|e| e.stage()), Err(Stage::Trace));
    assert_eq!(results[2], decompose(&masks[2], &params));
}
