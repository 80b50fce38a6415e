//! Property-based tests for ruleguard-validator.

use futures::executor::block_on;
use proptest::prelude::*;
use ruleguard_validator::prelude::*;
use ruleguard_validator::rules::BooleanRule;

fn validator() -> Validator {
    let validator = Validator::default();
    validator.ensure_rules_registered().unwrap();
    validator
}

fn any_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Undefined),
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<f64>().prop_map(Value::Number),
        prop_oneof![Just(0.0), Just(-0.0), Just(1.0)].prop_map(Value::Number),
        ".{0,8}".prop_map(Value::String),
        prop_oneof![Just("0"), Just("1"), Just("TrUe"), Just("false")]
            .prop_map(Value::from),
    ];
    leaf.prop_recursive(2, 8, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Value::Array)
    })
}

fn any_rules() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(
        prop_oneof![
            Just("Boolean"),
            Just("String"),
            Just("Number"),
            Just("Required"),
        ],
        0..6,
    )
}

// ============================================================================
// BOOLEAN: total, and failures always name the rule
// ============================================================================

proptest! {
    #[test]
    fn boolean_is_total(value in any_value()) {
        let validator = validator();
        let result = block_on(validator.validate(value.clone(), [is_boolean()])).unwrap();

        prop_assert_eq!(result.is_success(), BooleanRule::accepts(&value));
        if let Some(error) = result.error() {
            prop_assert!(error.message.contains("Boolean"));
        }
    }

    #[test]
    fn padded_strings_never_pass(s in "[01]|true|false|TRUE|False") {
        prop_assert!(BooleanRule::accepts(&Value::from(s.as_str())));
        let leading = format!(" {s}");
        let trailing = format!("{s}\t");
        prop_assert!(!BooleanRule::accepts(&Value::from(leading)));
        prop_assert!(!BooleanRule::accepts(&Value::from(trailing)));
    }
}

// ============================================================================
// IDEMPOTENCY: validate(x) == validate(x)
// ============================================================================

proptest! {
    #[test]
    fn validation_is_idempotent(value in any_value(), rules in any_rules()) {
        let validator = validator();
        let once = block_on(validator.validate_all(value.clone(), rules.clone())).unwrap();
        let twice = block_on(validator.validate_all(value, rules)).unwrap();
        prop_assert_eq!(once.is_success(), twice.is_success());
        prop_assert_eq!(once.errors().len(), twice.errors().len());
        for (a, b) in once.errors().iter().zip(twice.errors()) {
            prop_assert_eq!(&a.rule_name, &b.rule_name);
            prop_assert_eq!(&a.message, &b.message);
            prop_assert_eq!(a.value.to_string(), b.value.to_string());
        }
    }

    #[test]
    fn fail_fast_validation_is_idempotent(value in any_value(), rules in any_rules()) {
        let validator = validator();
        let once = block_on(validator.validate(value.clone(), rules.clone())).unwrap();
        let twice = block_on(validator.validate(value, rules)).unwrap();
        prop_assert_eq!(once.is_success(), twice.is_success());
        let failure = |result: &ValidationResult| {
            result.error().map(|e| (e.rule_name.clone(), e.message.clone()))
        };
        prop_assert_eq!(failure(&once), failure(&twice));
    }
}

// ============================================================================
// MODES: fail-fast reports the first collect-all failure
// ============================================================================

proptest! {
    #[test]
    fn fail_fast_is_a_prefix_of_collect_all(value in any_value(), rules in any_rules()) {
        let validator = validator();
        let first = block_on(
            validator.validate_with(value.clone(), rules.clone(), ValidationMode::FailFast),
        )
        .unwrap();
        let all = block_on(validator.validate_all(value, rules)).unwrap();

        prop_assert!(first.errors().len() <= 1);
        prop_assert_eq!(first.is_success(), all.is_success());
        if let (Some(head), Some(expected)) = (first.errors().first(), all.errors().first()) {
            prop_assert_eq!(&head.rule_name, &expected.rule_name);
            prop_assert_eq!(&head.message, &expected.message);
        }
    }
}
