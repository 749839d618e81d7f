#[macro_use]
extern crate criterion;
extern crate ordered_cursor;
extern crate rand;

use criterion::Criterion;
use ordered_cursor::{drain, find_in_order, find_predecessor, DrainSignal, OrderedMap};

const DEFAULT_SIZE: u32 = 1000;

fn generate_sequence(size: u32) -> OrderedMap<u32, u32> {
    (0..size).map(|key| (key, key * 2)).collect()
}

// Each key k < size / 2 depends on 2k + 1, so draining from the first half
// pulls in the second half one entry at a time.
fn generate_dependencies(size: u32) -> Vec<Option<u32>> {
    (0..size)
        .map(|key| {
            let dependency = 2 * key + 1;
            if dependency < size {
                Some(dependency)
            } else {
                None
            }
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    use rand::distributions::{Distribution, Uniform};

    c.bench_function("insert", |b| {
        b.iter(|| generate_sequence(DEFAULT_SIZE));
    });

    c.bench_function("clone", |b| {
        let map = generate_sequence(DEFAULT_SIZE);

        b.iter(|| map.clone());
    });

    c.bench_function("remove_middle", |b| {
        let map = generate_sequence(DEFAULT_SIZE);

        b.iter(|| map.clone().remove(&(DEFAULT_SIZE / 2)));
    });

    c.bench_function("sort_by_value_descending", |b| {
        let map = generate_sequence(DEFAULT_SIZE);

        b.iter(|| {
            let mut map = map.clone();
            map.sort_by(|_, a, _, b| b.cmp(a));
        });
    });

    c.bench_function("drain_growing_worklist", |b| {
        let dependencies = generate_dependencies(DEFAULT_SIZE);

        b.iter(|| {
            let mut worklist = (0..DEFAULT_SIZE / 4).map(|key| (key, ())).collect::<OrderedMap<_, _>>();

            drain(&mut worklist, |&key, worklist| {
                if let Some(dependency) = dependencies[key as usize] {
                    worklist.insert(dependency, ());
                }
                DrainSignal::Continue
            })
            .unwrap();

            worklist
        });
    });

    c.bench_function("drain_removing_self", |b| {
        let map = generate_sequence(DEFAULT_SIZE);

        b.iter(|| {
            let mut worklist = map.clone();

            drain(&mut worklist, |_, worklist| {
                worklist.remove_current();
                DrainSignal::Continue
            })
            .unwrap();

            worklist
        });
    });

    c.bench_function("find_in_order", |b| {
        let map = generate_sequence(DEFAULT_SIZE);
        let mut rng = rand::thread_rng();
        let dist = Uniform::new(0, DEFAULT_SIZE);

        b.iter(|| {
            let target = dist.sample(&mut rng);
            let _ = find_in_order(&map, &target);
        });
    });

    c.bench_function("find_predecessor", |b| {
        let map = generate_sequence(DEFAULT_SIZE);
        let mut rng = rand::thread_rng();
        let dist = Uniform::new(0, DEFAULT_SIZE);

        b.iter(|| {
            let target = dist.sample(&mut rng);
            let _ = find_predecessor(&map, &target);
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
