use std::{collections::HashSet, num::NonZeroUsize, sync::Arc, thread};

use rand::{SeedableRng, rngs::StdRng};
use rulegen::{
    config::{EngineConfig, Workers},
    error::{Error, RuntimeError},
    generate_with_bootstrap,
    interpreter::{
        evaluator::{
            core::Context,
            unique::{UniqueKey, UniquenessPool},
        },
        parser::statement::parse_program,
        value::core::Value,
    },
};

fn candidates(n: i64) -> Vec<Value> {
    (0..n).map(Value::Integer).collect()
}

fn run(src: &str, config: EngineConfig) -> Result<Vec<String>, Error> {
    generate_with_bootstrap(src, config, None)
}

fn seeded(seed: u64) -> EngineConfig {
    EngineConfig { seed: Some(seed),
                   ..EngineConfig::default() }
}

fn partitioned(workers: usize, threshold: usize) -> EngineConfig {
    EngineConfig { workers: Workers::Fixed(NonZeroUsize::new(workers).unwrap()),
                   parallel_threshold: threshold,
                   ..seeded(21) }
}

#[test]
fn draws_are_distinct_until_exhausted() {
    let pool = UniquenessPool::new();
    let key = UniqueKey::new(Some("id"), &candidates(5));
    let mut rng = StdRng::seed_from_u64(8);

    let drawn: HashSet<Value> = (0..5).map(|_| pool.draw_unique(&key, &mut rng, 1).unwrap()).collect();

    assert_eq!(drawn, candidates(5).into_iter().collect());
    assert_eq!(pool.remaining(&key), Some(0));
    assert!(matches!(pool.draw_unique(&key, &mut rng, 3),
                     Err(RuntimeError::UniquePoolExhausted { line: 3 })));
}

#[test]
fn duplicate_candidates_count_once() {
    let pool = UniquenessPool::new();
    let key = UniqueKey::new(None, &[Value::from("a"), Value::from("a"), Value::from("b")]);
    let mut rng = StdRng::seed_from_u64(1);

    assert_eq!(pool.draw_unique_many(&key, 2, &mut rng, 1).unwrap().len(), 2);
    assert_eq!(pool.remaining(&key), Some(0));
}

#[test]
fn insufficient_batch_leaves_pool_untouched() {
    let pool = UniquenessPool::new();
    let key = UniqueKey::new(Some("r"), &candidates(3));
    let mut rng = StdRng::seed_from_u64(2);

    pool.draw_unique(&key, &mut rng, 1).unwrap();

    assert!(matches!(pool.draw_unique_many(&key, 3, &mut rng, 1),
                     Err(RuntimeError::UniquePoolInsufficient { requested: 3,
                                                                remaining: 2,
                                                                .. })));
    assert_eq!(pool.remaining(&key), Some(2));
    assert_eq!(pool.draw_unique_many(&key, 2, &mut rng, 1).unwrap().len(), 2);
}

#[test]
fn keys_are_independent() {
    let pool = UniquenessPool::new();
    let list = candidates(2);
    let first = UniqueKey::new(Some("a"), &list);
    let second = UniqueKey::new(Some("b"), &list);
    let mut rng = StdRng::seed_from_u64(3);

    pool.draw_unique_many(&first, 2, &mut rng, 1).unwrap();

    assert_eq!(pool.remaining(&second), None);
    assert_eq!(pool.draw_unique_many(&second, 2, &mut rng, 1).unwrap().len(), 2);
}

#[test]
fn concurrent_draws_never_repeat() {
    let pool = Arc::new(UniquenessPool::new());
    let key = UniqueKey::new(Some("ticket"), &candidates(4000));

    let handles: Vec<_> = (0..8u64).map(|seed| {
                                       let pool = Arc::clone(&pool);
                                       let key = key.clone();
                                       thread::spawn(move || {
                                           let mut rng = StdRng::seed_from_u64(seed);
                                           (0..500).map(|_| pool.draw_unique(&key, &mut rng, 1).unwrap())
                                                   .collect::<Vec<_>>()
                                       })
                                   })
                                   .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for value in handle.join().unwrap() {
            assert!(seen.insert(value), "value drawn twice");
        }
    }

    assert_eq!(seen.len(), 4000);
    assert_eq!(pool.remaining(&key), Some(0));
}

#[test]
fn unique_rule_across_prints() {
    let src = "color = one_of_unique([\"red\", \"green\", \"blue\"])\nprint(2, color)\nprint(1, color)";
    let lines = run(src, seeded(4)).unwrap();

    let distinct: HashSet<&String> = lines.iter().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(distinct.len(), 3);

    let exhausted = run(&format!("{src}\nprint(1, color)"), seeded(4));
    assert!(matches!(exhausted, Err(Error::Runtime(RuntimeError::UniquePoolExhausted { .. }))));
}

#[test]
fn oversized_print_is_rejected() {
    let res = run("c = one_of_unique([1, 2, 3])\nprint(4, c)", seeded(1));
    assert!(matches!(res,
                     Err(Error::Runtime(RuntimeError::UniquePoolInsufficient { requested: 4,
                                                                               remaining: 3,
                                                                               .. }))));
}

#[test]
fn rules_with_identical_candidates_have_separate_pools() {
    let src = "a = one_of_unique([1, 2])\nb = one_of_unique([1, 2])\nprint(2, a)\nprint(2, b)";
    let lines = run(src, seeded(6)).unwrap();

    assert_eq!(lines.len(), 4);
}

#[test]
fn nested_unique_is_keyed_by_innermost_rule() {
    let src = "id = one_of_unique([\"x\", \"y\"])\nlabel = append(\"#\", id)\nprint(1, label)\nprint(1, id)";
    let lines = run(src, seeded(7)).unwrap();

    assert_eq!(lines.len(), 2);
    assert_ne!(lines[0].trim_start_matches('#'), lines[1]);
}

#[test]
fn partitioned_print_is_globally_unique() {
    let list = (0..2000).map(|i| format!("\"v{i}\"")).collect::<Vec<_>>().join(", ");
    let src = format!("id = one_of_unique([{list}])\nprint(2000, id)");

    let lines = run(&src, partitioned(4, 100)).unwrap();
    let distinct: HashSet<&String> = lines.iter().collect();

    assert_eq!(lines.len(), 2000);
    assert_eq!(distinct.len(), 2000);
}

#[test]
fn partitioned_output_matches_request() {
    let lines = run("d = number.between(1, 6)\nprint(1001, d)", partitioned(3, 10)).unwrap();

    assert_eq!(lines.len(), 1001);
    assert!(lines.iter().all(|l| (1..=6).contains(&l.parse::<i64>().unwrap())));
}

#[test]
fn partitioned_runs_are_reproducible() {
    let src = "w = append(one_of([\"a\", \"b\"]), number.upto(9))\nprint(500, w)";

    assert_eq!(run(src, partitioned(4, 50)).unwrap(), run(src, partitioned(4, 50)).unwrap());
}

#[test]
fn partitioned_fault_produces_no_output() {
    let res = run("c = one_of_unique([1, 2, 3])\nprint(400, c)", partitioned(4, 10));
    assert!(matches!(res, Err(Error::Runtime(_))));
}

#[test]
fn failed_partitioned_print_leaves_pool_untouched() {
    let list = (0..100).map(|i| i.to_string()).collect::<Vec<_>>().join(", ");
    let program = parse_program(&format!("id = one_of_unique([{list}])\nprint(120, id)\nprint(100, id)")).unwrap();
    let key = UniqueKey::new(Some("id"), &candidates(100));
    let mut ctx = Context::new(partitioned(4, 10));

    ctx.process_statement(&program[0]).unwrap();
    assert!(matches!(ctx.process_statement(&program[1]),
                     Err(RuntimeError::UniquePoolInsufficient { requested: 120,
                                                                remaining: 100,
                                                                .. })));
    assert_eq!(ctx.pool().remaining(&key), Some(100));

    let lines = ctx.process_statement(&program[2]).unwrap().unwrap();
    let distinct: HashSet<&String> = lines.iter().collect();
    assert_eq!(distinct.len(), 100);
    assert_eq!(ctx.pool().remaining(&key), Some(0));
}

#[test]
fn restore_undoes_draws_and_new_entries() {
    let pool = UniquenessPool::new();
    let old = UniqueKey::new(Some("old"), &candidates(4));
    let new = UniqueKey::new(Some("new"), &candidates(4));
    let mut rng = StdRng::seed_from_u64(9);

    pool.draw_unique(&old, &mut rng, 1).unwrap();
    let checkpoint = pool.checkpoint();

    pool.draw_unique_many(&old, 3, &mut rng, 1).unwrap();
    pool.draw_unique(&new, &mut rng, 1).unwrap();
    pool.restore(checkpoint);

    assert_eq!(pool.remaining(&old), Some(3));
    assert_eq!(pool.remaining(&new), None);
}

#[test]
fn partitioned_unique_print_covers_the_pool() {
    let list = (0..80).map(|i| i.to_string()).collect::<Vec<_>>().join(", ");
    let src = format!("id = one_of_unique([{list}])\nprint(80, id)");

    let expected: HashSet<String> = (0..80).map(|i| i.to_string()).collect();
    for _ in 0..5 {
        let lines: HashSet<String> = run(&src, partitioned(4, 10)).unwrap().into_iter().collect();
        assert_eq!(lines, expected);
    }
}
