//! Property-based tests for the value model and the evaluator.
//!
//! Operator laws are checked directly on `Value`, then a few of them again end to end through
//! generated Lox source.

use proptest::prelude::*;

use treelox::value::{self, Value};
use treelox::Interpreter;

// -- Strategies --

fn number_strategy() -> impl Strategy<Value = f64> {
    -1.0e9f64..1.0e9f64
}

fn string_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z ]{0,12}").expect("valid regex")
}

/// Any non-callable value.
fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        number_strategy().prop_map(Value::Number),
        string_strategy().prop_map(|s| Value::from(s.as_str())),
    ]
}

fn identifier_strategy() -> impl Strategy<Value = String> {
    // Upper case initial keeps clear of every keyword.
    prop::string::string_regex("[A-Z][a-z0-9_]{0,8}").expect("valid regex")
}

fn run(src: &str) -> String {
    let mut out: Vec<u8> = Vec::new();
    let mut interp = Interpreter::new(&mut out);
    interp.eval(src).expect("interpreter error");
    drop(interp);
    String::from_utf8(out).expect("output is not utf-8")
}

proptest! {
    #[test]
    fn number_addition_commutes(a in number_strategy(), b in number_strategy()) {
        let l = value::add(&Value::Number(a), &Value::Number(b)).expect("numbers add");
        let r = value::add(&Value::Number(b), &Value::Number(a)).expect("numbers add");
        prop_assert_eq!(l, r);
    }

    #[test]
    fn concatenation_preserves_both_sides(a in string_strategy(), b in string_strategy()) {
        let joined = value::add(&Value::from(a.as_str()), &Value::from(b.as_str()))
            .expect("strings add");
        prop_assert_eq!(joined.to_string(), format!("{}{}", a, b));
    }

    #[test]
    fn equality_is_symmetric(a in value_strategy(), b in value_strategy()) {
        prop_assert_eq!(value::eq(&a, &b), value::eq(&b, &a));
        prop_assert_eq!(value::ne(&a, &b), value::not(&value::eq(&a, &b)));
    }

    #[test]
    fn different_kinds_never_compare_equal(a in value_strategy(), b in value_strategy()) {
        prop_assume!(a.type_name() != b.type_name());
        prop_assert_eq!(value::eq(&a, &b), Value::Bool(false));
    }

    #[test]
    fn only_nil_and_false_are_falsy(v in value_strategy()) {
        let falsy = matches!(v, Value::Nil | Value::Bool(false));
        prop_assert_eq!(v.is_truthy(), !falsy);
    }

    #[test]
    fn integral_numbers_print_without_fraction(n in -1_000_000i64..1_000_000i64) {
        prop_assert_eq!(Value::Number(n as f64).to_string(), n.to_string());
    }

    #[test]
    fn printed_sum_matches_host_sum(a in -10_000i64..10_000i64, b in 0i64..10_000i64) {
        prop_assert_eq!(run(&format!("print {} + {};", a, b)), format!("{}\n", a + b));
    }

    #[test]
    fn closures_remember_their_argument(name in identifier_strategy(), n in 0i64..1000i64) {
        let src = format!(
            "fun make(x) {{ fun {name}() {{ return x; }} return {name}; }} print make({n})();",
            name = name,
            n = n
        );
        prop_assert_eq!(run(&src), format!("{}\n", n));
    }
}
