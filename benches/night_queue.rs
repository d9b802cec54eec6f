//! Night queue construction on a full table.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use clocktower_engine::core::{RoleId, Seat, SeatId};
use clocktower_engine::roles::RoleRegistry;
use clocktower_engine::schedule::build_queue;

const TABLE: [&str; 15] = [
    "washerwoman", "librarian", "investigator", "chef", "empath", "fortune_teller",
    "undertaker", "monk", "ravenkeeper", "butler", "drunk", "poisoner", "spy",
    "scarlet_woman", "imp",
];

fn fifteen_seats() -> Vec<Seat> {
    TABLE
        .iter()
        .enumerate()
        .map(|(i, role)| {
            let seat = Seat::new(SeatId::new(i as u8));
            if *role == "drunk" {
                seat.with_role(RoleId::new(role)).with_displayed_role(RoleId::new("soldier"))
            } else {
                seat.with_role(RoleId::new(role))
            }
        })
        .collect()
}

fn bench_build_queue(c: &mut Criterion) {
    let registry = RoleRegistry::standard();
    let seats = fifteen_seats();

    c.bench_function("build_queue_first_night_15", |b| {
        b.iter(|| build_queue(black_box(&seats), &registry, true))
    });
    c.bench_function("build_queue_other_night_15", |b| {
        b.iter(|| build_queue(black_box(&seats), &registry, false))
    });
}

criterion_group!(benches, bench_build_queue);
criterion_main!(benches);
