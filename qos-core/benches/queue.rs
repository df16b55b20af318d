use criterion::{Criterion, black_box, criterion_group, criterion_main};
use qos_core::{
    ReleaseInterval, SimTime,
    queue::{PriorityReleaseQueue, QueueMode},
};
use std::time::Duration;

const DEPTH: u64 = 1_024;
const FRAME: Duration = Duration::from_millis(16);

fn filled(mode: QueueMode) -> PriorityReleaseQueue<u64> {
    let mut queue = PriorityReleaseQueue::builder()
        .set_mode(mode)
        .set_release_interval(ReleaseInterval::ZERO)
        .build();
    for value in 0..DEPTH {
        queue.enqueue(value, (value % 4) as i64, SimTime::ZERO);
    }
    queue
}

fn enqueue(c: &mut Criterion) {
    let mut priority = filled(QueueMode::Priority);
    let mut fifo = filled(QueueMode::Fifo);
    let mut now = SimTime::ZERO;

    // each iteration enqueues one item and releases one, the depth stays put
    c.bench_function("enqueue_priority", |b| {
        b.iter(|| {
            now = now + FRAME;
            priority.enqueue(black_box(0), black_box(2), now);
            priority.try_release(now)
        })
    });

    c.bench_function("enqueue_fifo", |b| {
        b.iter(|| {
            now = now + FRAME;
            fifo.enqueue(black_box(0), black_box(2), now);
            fifo.try_release(now)
        })
    });
}

fn try_release(c: &mut Criterion) {
    let mut queue = filled(QueueMode::Priority);
    let mut now = SimTime::ZERO;

    c.bench_function("try_release_too_early", |b| {
        b.iter(|| queue.try_release(black_box(SimTime::ZERO)))
    });

    c.bench_function("try_release_refill", |b| {
        b.iter(|| {
            now = now + FRAME;
            if let Some(item) = queue.try_release(black_box(now)) {
                let priority = item.priority();
                queue.enqueue(item.into_inner(), priority, now);
            }
        })
    });
}

criterion_group!(benches, enqueue, try_release);
criterion_main!(benches);
