//! End-to-end operator pipelines under a manual clock.
//!
//! These mirror realistic wiring: paced re-emission feeding truncation
//! operators, concatenated paced sources, and event-driven pipelines with
//! explicit disposal.

use std::time::Duration;

use rill::{
    Deferred, EventEmitter, Observable, from, from_event, interval, take, take_until, take_while,
};
use rill_harness::{Emission, ManualTimers, Recorder};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn take_while_over_take_over_interval() {
    // Ten values paced at one-second steps; keep five, and of those only
    // the prefix below seven.
    let clock = ManualTimers::new();
    let timers = clock.service();
    let paced = interval(ms(1000), &timers, &from(vec![5, 6, 7, 2, 8, 9, 10, 11, 12, 13]));
    let pipeline = take_while(|v| *v < 7, &take(5, &paced));

    let recorder = Recorder::new();
    let _sub = recorder.subscribe_to(&pipeline);

    clock.advance(ms(1000));
    assert_eq!(recorder.values(), vec![5]);
    clock.advance(ms(1000));
    assert_eq!(recorder.values(), vec![5, 6]);
    assert_eq!(recorder.completions(), 0);

    // Third value (7) fails the predicate: latch plus completion.
    clock.advance(ms(1000));
    assert_eq!(recorder.values(), vec![5, 6]);
    assert_eq!(recorder.completions(), 1);

    // Later values (2 would pass the predicate) stay suppressed.
    clock.advance(ms(10_000));
    assert_eq!(recorder.values(), vec![5, 6]);
    assert_eq!(recorder.completions(), 1);
    assert!(!recorder.saw_next_after_completion());
}

#[test]
fn take_over_concat_of_paced_sources() {
    let clock = ManualTimers::new();
    let timers = clock.service();

    let a1 = interval(ms(300), &timers, &from(vec![1, 2, 3, 4]));
    let a2 = interval(ms(500), &timers, &from(vec![5, 6, 7, 8]));
    let a3 = interval(ms(200), &timers, &from(vec![9, 10, 11, 12]));
    let pipeline = take(11, &Observable::concat(vec![a1, a2, a3]));

    let recorder = Recorder::new();
    let _sub = recorder.subscribe_to(&pipeline);

    // Strict sequencing: nothing from a2 before a1 drains.
    clock.advance(ms(1100));
    assert_eq!(recorder.values(), vec![1, 2, 3]);

    clock.advance(ms(10_000));
    assert_eq!(recorder.values(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
    assert_eq!(recorder.completions(), 1);
    assert!(!recorder.saw_next_after_completion());
}

#[test]
fn event_pipeline_with_map_and_disposal() {
    // The mouse-move demo, terminal style: positions in, coordinates
    // summed, listener removed on dispose.
    let pointer: EventEmitter<(i32, i32)> = EventEmitter::new();
    let positions = from_event(&pointer, "move").map(|(x, y)| x + y);

    let recorder = Recorder::new();
    let sub = recorder.subscribe_to(&positions).unwrap();

    pointer.emit("move", (10, 5));
    pointer.emit("move", (1, 2));
    assert_eq!(recorder.values(), vec![15, 3]);
    assert_eq!(recorder.completions(), 0);

    sub.dispose();
    assert_eq!(pointer.listener_count("move"), 0);
    pointer.emit("move", (7, 7));
    assert_eq!(recorder.values(), vec![15, 3]);
}

#[test]
fn stop_event_gates_a_paced_stream() {
    let clock = ManualTimers::new();
    let timers = clock.service();
    let stop: EventEmitter<()> = EventEmitter::new();

    let paced = interval(ms(100), &timers, &from(vec![1, 2, 3, 4, 5]));
    let gated = take_until(&from_event(&stop, "stop"), &paced);

    let recorder = Recorder::new();
    let _sub = recorder.subscribe_to(&gated);

    clock.advance(ms(250));
    assert_eq!(recorder.values(), vec![1, 2]);

    stop.emit("stop", ());
    assert_eq!(recorder.completions(), 1);

    clock.advance(ms(10_000));
    assert_eq!(recorder.values(), vec![1, 2]);
    assert!(!recorder.saw_next_after_completion());
}

#[test]
fn deferred_source_concatenated_after_a_sequence() {
    let pending: Deferred<i32> = Deferred::new();
    let pipeline = Observable::concat(vec![from(vec![1, 2]), from(pending.clone())]);

    let recorder = Recorder::new();
    let _sub = recorder.subscribe_to(&pipeline);

    // First source drained; chain waits on the deferred.
    assert_eq!(recorder.values(), vec![1, 2]);
    assert_eq!(recorder.completions(), 0);

    pending.resolve(3).unwrap();
    assert_eq!(
        recorder.emissions(),
        vec![
            Emission::Next(1),
            Emission::Next(2),
            Emission::Next(3),
            Emission::Completed,
        ]
    );
}

#[test]
fn character_mapping_pipeline() {
    // from("JAMIE") with a two-stage map, as in classic marble demos.
    let pipeline = from("JAMIE")
        .map(|c| (c, (c as u8 + 1) as char))
        .map(|(original, bumped)| format!("{original}{bumped}"));

    let recorder = Recorder::new();
    let _sub = recorder.subscribe_to(&pipeline);
    let expected: Vec<String> = ["JK", "AB", "MN", "IJ", "EF"]
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(recorder.values(), expected);
    assert_eq!(recorder.completions(), 1);
}
