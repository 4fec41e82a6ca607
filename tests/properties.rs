use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};
use rulegen::{
    ast::{Expr, LiteralValue},
    interpreter::{
        evaluator::{core::Evaluator, grammar::Grammar, partition::chunk_sizes, unique::UniquenessPool},
        value::core::Value,
    },
};

fn int(n: i64) -> Expr {
    Expr::Literal { value: LiteralValue::Integer(n),
                    line:  1, }
}

fn numeric(method: &str, arguments: Vec<Expr>) -> Expr {
    Expr::FunctionCall { name: method.to_string(),
                         receiver: Some(Box::new(Expr::Variable { name: "number".to_string(),
                                                                  line: 1, })),
                         arguments,
                         line: 1 }
}

fn eval_integers(expr: &Expr, times: usize, seed: u64) -> Vec<i64> {
    let grammar = Grammar::new();
    let pool = UniquenessPool::new();
    Evaluator::new(&grammar, &pool, StdRng::seed_from_u64(seed)).evaluate(expr, times)
                                                                  .unwrap()
                                                                  .into_values()
                                                                  .into_iter()
                                                                  .map(|v| match v {
                                                                      Value::Integer(n) => n,
                                                                      other => panic!("not an integer: {other:?}"),
                                                                  })
                                                                  .collect()
}

proptest! {
    #[test]
    fn chunk_sizes_cover_the_total(total in 1usize..100_000, workers in 1usize..64) {
        let sizes = chunk_sizes(total, workers);

        prop_assert_eq!(sizes.len(), workers);
        prop_assert_eq!(sizes.iter().sum::<usize>(), total);
        prop_assert!(sizes[..workers - 1].iter().all(|&s| s == total / workers));
    }

    #[test]
    fn constant_expressions_repeat(text in "[a-z ]{0,12}", n in any::<i64>(), times in 0usize..500) {
        let grammar = Grammar::new();
        let pool = UniquenessPool::new();
        let mut evaluator = Evaluator::new(&grammar, &pool, StdRng::seed_from_u64(0));
        let expr = Expr::FunctionCall { name:      "append".to_string(),
                                        receiver:  None,
                                        arguments: vec![Expr::Literal { value: LiteralValue::from(text.as_str()),
                                                                        line:  1, },
                                                        int(n)],
                                        line:      1, };

        let batch = evaluator.evaluate(&expr, times).unwrap();
        let expected = format!("{text}{n}");

        prop_assert!(batch.is_constant());
        prop_assert_eq!(batch.len(), times);
        prop_assert!(batch.iter().all(|v| v.to_string() == expected));
    }

    #[test]
    fn upto_stays_in_range(upper in 0i64..1_000, times in 0usize..300, seed in any::<u64>()) {
        let values = eval_integers(&numeric("upto", vec![int(upper)]), times, seed);

        prop_assert_eq!(values.len(), times);
        prop_assert!(values.iter().all(|v| (0..=upper).contains(v)));
    }

    #[test]
    fn between_stays_in_range(low in -1_000i64..1_000,
                              span in 0i64..1_000,
                              times in 0usize..300,
                              seed in any::<u64>()) {
        let high = low + span;
        let values = eval_integers(&numeric("between", vec![int(low), int(high)]), times, seed);

        prop_assert_eq!(values.len(), times);
        prop_assert!(values.iter().all(|v| (low..=high).contains(v)));
    }
}
