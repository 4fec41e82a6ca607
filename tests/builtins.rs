use std::collections::HashSet;

use rand::{SeedableRng, rngs::StdRng};
use rulegen::{
    ast::{Expr, LiteralValue},
    config::EngineConfig,
    error::RuntimeError,
    generate_with_bootstrap,
    interpreter::{
        evaluator::{
            core::Evaluator,
            function::{
                core::{Arity, BUILTIN_FUNCTIONS, Builtin, CallSite},
                number, text,
            },
            grammar::Grammar,
            unique::UniquenessPool,
        },
        value::{
            batch::Batch,
            core::{Value, ValueCategory},
        },
    },
};

fn int(n: i64) -> Expr {
    Expr::Literal { value: LiteralValue::Integer(n),
                    line:  1, }
}

fn text(s: &str) -> Expr {
    Expr::Literal { value: LiteralValue::from(s),
                    line:  1, }
}

fn call(name: &str, arguments: Vec<Expr>) -> Expr {
    Expr::FunctionCall { name: name.to_string(),
                         receiver: None,
                         arguments,
                         line: 1 }
}

fn method(receiver: Expr, name: &str, arguments: Vec<Expr>) -> Expr {
    Expr::FunctionCall { name: name.to_string(),
                         receiver: Some(Box::new(receiver)),
                         arguments,
                         line: 1 }
}

fn number() -> Expr {
    Expr::Variable { name: "number".to_string(),
                     line: 1, }
}

fn list(elements: Vec<Expr>) -> Expr {
    Expr::List { elements,
                 line: 1 }
}

fn eval(expr: &Expr, times: usize) -> Result<Batch, RuntimeError> {
    let grammar = Grammar::new();
    let pool = UniquenessPool::new();
    Evaluator::new(&grammar, &pool, StdRng::seed_from_u64(11)).evaluate(expr, times)
}

fn integers(batch: Batch) -> Vec<i64> {
    batch.into_values()
         .into_iter()
         .map(|v| match v {
             Value::Integer(n) => n,
             other => panic!("expected an integer, got {other:?}"),
         })
         .collect()
}

fn lines(src: &str) -> Vec<String> {
    generate_with_bootstrap(src,
                            EngineConfig { seed: Some(4),
                                           ..EngineConfig::default() },
                            None).unwrap_or_else(|e| panic!("Script failed: {e}"))
}

#[test]
fn registry_lists_every_builtin() {
    assert_eq!(BUILTIN_FUNCTIONS,
               &["append", "lower", "one_of", "one_of_unique", "number.between", "number.upto"]);

    for name in BUILTIN_FUNCTIONS {
        let builtin = Builtin::lookup(name).unwrap();
        assert_eq!(builtin.name(), *name);
    }
}

#[test]
fn arities() {
    assert_eq!(Builtin::Between.arity(), Arity::Exact(2));
    assert_eq!(Builtin::Upto.arity(), Arity::Exact(1));
    assert_eq!(Builtin::Lower.arity(), Arity::Exact(1));
    assert_eq!(Builtin::OneOf.arity(), Arity::AtLeast(1));
    assert!(Builtin::Append.arity().check(0));
    assert!(Builtin::Append.arity().check(7));
    assert!(Builtin::check_arity(Builtin::Upto, 2, 4).is_err());
}

#[test]
fn method_tables() {
    assert_eq!(Builtin::for_method(ValueCategory::Numeric, "between"), Some(Builtin::Between));
    assert_eq!(Builtin::for_method(ValueCategory::Numeric, "append"), Some(Builtin::Append));
    assert_eq!(Builtin::for_method(ValueCategory::Text, "one_of_unique"), Some(Builtin::OneOfUnique));
    assert_eq!(Builtin::for_method(ValueCategory::Text, "upto"), None);

    assert!(matches!(Builtin::resolve_method(ValueCategory::Text, "upto", 9),
                     Err(RuntimeError::InvalidOperandCategory { expected: ValueCategory::Numeric,
                                                                found: ValueCategory::Text,
                                                                line: 9,
                                                                .. })));
    assert!(matches!(Builtin::resolve_method(ValueCategory::Numeric, "nope", 2),
                     Err(RuntimeError::UnknownFunction { .. })));
}

#[test]
fn append_of_constants_is_constant() {
    let batch = eval(&call("append", vec![text("a"), int(1), text("b")]), 4).unwrap();

    assert!(batch.is_constant());
    assert_eq!(batch.len(), 4);
    assert_eq!(batch.to_lines(), vec!["a1b"; 4]);
}

#[test]
fn append_without_arguments_is_empty_text() {
    assert_eq!(eval(&call("append", vec![]), 2).unwrap().to_lines(), vec![""; 2]);
}

#[test]
fn append_over_random_arguments_is_per_row() {
    let coin = call("one_of", vec![text("h"), text("t")]);
    let batch = eval(&call("append", vec![text("flip:"), coin]), 40).unwrap();

    assert!(!batch.is_constant());
    assert_eq!(batch.len(), 40);
    assert!(batch.iter().all(|v| *v == Value::from("flip:h") || *v == Value::from("flip:t")));
}

#[test]
fn lower_handles_text_and_numbers() {
    assert_eq!(eval(&call("lower", vec![text("ÄbC")]), 1).unwrap().to_lines(), vec!["äbc"]);
    assert_eq!(eval(&method(int(12), "lower", vec![]), 1).unwrap().to_lines(), vec!["12"]);
}

#[test]
fn one_of_stays_within_candidates() {
    let batch = eval(&call("one_of", vec![list(vec![text("x"), text("y"), text("z")])]),
                     300).unwrap();

    let seen: HashSet<String> = batch.to_lines().into_iter().collect();
    assert_eq!(seen, HashSet::from(["x".to_string(), "y".to_string(), "z".to_string()]));
}

#[test]
fn one_of_with_non_constant_list_elements() {
    let digit = method(number(), "upto", vec![int(9)]);
    let batch = eval(&call("one_of", vec![list(vec![digit, text("-")])]), 100).unwrap();

    assert!(batch.to_lines()
                 .iter()
                 .all(|l| l == "-" || (l.len() == 1 && l.chars().all(|c| c.is_ascii_digit()))));
}

#[test]
fn one_of_needs_candidates() {
    assert!(matches!(eval(&call("one_of", vec![list(vec![])]), 1),
                     Err(RuntimeError::EmptyChoice { .. })));
    assert!(matches!(eval(&call("one_of", vec![]), 1), Err(RuntimeError::ArityMismatch { .. })));
}

#[test]
fn between_is_inclusive() {
    let values = integers(eval(&method(number(), "between", vec![int(-2), int(2)]), 500).unwrap());

    assert!(values.iter().all(|n| (-2..=2).contains(n)));
    let seen: HashSet<i64> = values.into_iter().collect();
    assert_eq!(seen.len(), 5);
}

#[test]
fn upto_reaches_every_value() {
    let values = integers(eval(&call("number.upto", vec![int(4)]), 500).unwrap());

    assert!(values.iter().all(|n| (0..=4).contains(n)));
    let seen: HashSet<i64> = values.into_iter().collect();
    assert_eq!(seen.len(), 5);
}

#[test]
fn upto_zero_and_degenerate_between() {
    assert_eq!(integers(eval(&call("number.upto", vec![int(0)]), 3).unwrap()), vec![0, 0, 0]);
    assert_eq!(integers(eval(&call("number.between", vec![int(7), int(7)]), 2).unwrap()),
               vec![7, 7]);
}

#[test]
fn numeric_methods_reject_text() {
    assert!(matches!(eval(&call("number.between", vec![text("1"), int(2)]), 1),
                     Err(RuntimeError::InvalidOperandCategory { .. })));
    assert!(matches!(eval(&method(text("3"), "upto", vec![]), 1),
                     Err(RuntimeError::InvalidOperandCategory { .. })));
}

#[test]
fn scalar_path_with_random_bounds() {
    let low = call("one_of", vec![int(1), int(2)]);
    let values = integers(eval(&method(number(), "between", vec![low, int(5)]), 200).unwrap());

    assert!(values.iter().all(|n| (1..=5).contains(n)));
}

#[test]
fn zero_repetitions() {
    assert!(eval(&call("one_of", vec![text("a")]), 0).unwrap().is_empty());
    assert!(eval(&call("append", vec![text("a")]), 0).unwrap().is_empty());
    assert!(eval(&method(call("one_of", vec![int(1)]), "upto", vec![]), 0).unwrap().is_empty());
}

#[test]
fn builtins_through_scripts() {
    assert_eq!(lines("print(1, append(\"a\", \"b\", 3))"), vec!["ab3"]);
    assert_eq!(lines("word = \"LOUD\"\nprint(1, word.lower())"), vec!["loud"]);
    assert_eq!(lines("print(2, number.between(3, 3).append(\"!\"))"), vec!["3!", "3!"]);
}

#[test]
fn direct_calls_check_their_arguments() {
    let pool = UniquenessPool::new();
    let mut rng = StdRng::seed_from_u64(5);
    let mut site = CallSite { rng:  &mut rng,
                              pool: &pool,
                              rule: None,
                              line: 6, };

    assert!(matches!(Builtin::Between.call_scalar(&[], &mut site),
                     Err(RuntimeError::ArityMismatch { name: "number.between",
                                                       found: 0,
                                                       line: 6,
                                                       .. })));
    assert!(matches!(Builtin::Lower.call_times(&[], 3, &mut site),
                     Err(RuntimeError::ArityMismatch { .. })));
    assert!(matches!(number::upto(&[], &mut site), Err(RuntimeError::ArityMismatch { .. })));
    assert!(matches!(text::lower_times(&[Value::from("a"), Value::from("b")], 2, &mut site),
                     Err(RuntimeError::ArityMismatch { found: 2, .. })));
    assert_eq!(Builtin::Upto.call_times(&[Value::Integer(0)], 2, &mut site).unwrap().to_lines(),
               vec!["0", "0"]);
}
