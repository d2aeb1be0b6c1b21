//! Tests for the severity predicate algebra.

use super::*;
use itertools::iproduct;
use proptest::prelude::*;
use rstest::rstest;

const RELATIONS: [Relation; 6] = [
    Relation::Eq,
    Relation::Ne,
    Relation::Lt,
    Relation::Gt,
    Relation::Le,
    Relation::Ge,
];

fn any_severity() -> impl Strategy<Value = Severity> {
    proptest::sample::select(Severity::ALL.to_vec())
}

fn any_relation() -> impl Strategy<Value = Relation> {
    proptest::sample::select(RELATIONS.to_vec())
}

fn any_predicate() -> impl Strategy<Value = Predicate> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Predicate::Const),
        (any_relation(), any_severity()).prop_map(|(relation, threshold)| Predicate::Dynamic {
            relation,
            threshold
        }),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a & b),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a | b),
            inner.prop_map(|p| !p),
        ]
    })
}

#[test]
fn placeholder_on_the_left_tests_against_threshold() {
    for (relation, threshold, s) in iproduct!(RELATIONS, Severity::ALL, Severity::ALL) {
        let predicate = compare(Placeholder, relation, threshold).expect("one concrete operand");
        assert_eq!(predicate.evaluate(s), relation.holds(s, threshold));
    }
}

#[test]
fn placeholder_on_the_right_is_mirrored() {
    for (relation, threshold, s) in iproduct!(RELATIONS, Severity::ALL, Severity::ALL) {
        let predicate = compare(threshold, relation, Placeholder).expect("one concrete operand");
        assert_eq!(
            predicate.evaluate(s),
            relation.holds(threshold, s),
            "{threshold} {relation} {s}"
        );
    }
}

#[test]
fn two_concrete_levels_fold_to_a_constant() {
    for (relation, lhs, rhs) in iproduct!(RELATIONS, Severity::ALL, Severity::ALL) {
        let predicate = compare(lhs, relation, rhs).expect("both concrete");
        assert_eq!(predicate, Predicate::Const(relation.holds(lhs, rhs)));
        assert!(predicate.is_constant());
        assert_eq!(predicate, lhs.compare(relation, rhs));
    }
}

#[test]
fn two_placeholders_are_rejected() {
    let err = compare(Placeholder, Relation::Ge, Placeholder).expect_err("no concrete operand");
    assert!(matches!(err, ConfigError::NoConcreteOperand));
}

#[test]
fn constant_true_can_always_be_evaluated() {
    let predicate = Severity::Error.compare(Relation::Gt, Severity::Info);
    assert_eq!(predicate, Predicate::ALWAYS);
    assert!(Severity::ALL.iter().all(|s| predicate.evaluate(*s)));
}

#[rstest]
#[case(Severity::Trace, false)]
#[case(Severity::Info, true)]
#[case(Severity::Throw, true)]
#[case(Severity::Failure, true)]
fn default_filter_is_at_least_info(#[case] severity: Severity, #[case] expected: bool) {
    assert_eq!(Predicate::default().evaluate(severity), expected);
}

#[test]
fn not_severity_is_not_equal() {
    let predicate = !Severity::Debug;
    assert_eq!(predicate, Placeholder.not_equal_to(Severity::Debug));
    assert_eq!(
        predicate.accepted(),
        Severity::ALL
            .into_iter()
            .filter(|s| *s != Severity::Debug)
            .collect::<Vec<_>>()
    );
}

#[test]
fn negating_a_dynamic_predicate_flips_the_relation() {
    assert_eq!(
        !Placeholder.at_least(Severity::Warning),
        Placeholder.less_than(Severity::Warning)
    );
    assert_eq!(
        !Placeholder.greater_than(Severity::Info),
        Placeholder.at_most(Severity::Info)
    );
}

#[test]
fn debug_or_info_accepts_exactly_those() {
    let predicate = Predicate::from(Severity::Debug) | Predicate::from(Severity::Info);
    assert_eq!(predicate.accepted(), vec![Severity::Debug, Severity::Info]);
}

#[test]
fn constants_simplify_composition() {
    let warning = Placeholder.at_least(Severity::Warning);
    assert_eq!(Predicate::ALWAYS & warning.clone(), warning);
    assert_eq!(Predicate::NEVER | warning.clone(), warning);
    assert_eq!(Predicate::NEVER & warning.clone(), Predicate::NEVER);
    assert_eq!(Predicate::ALWAYS | warning, Predicate::ALWAYS);
}

#[rstest]
#[case(Placeholder.less_than(Severity::Trace), false)]
#[case(Placeholder.equal_to(Severity::Trace) & Placeholder.equal_to(Severity::Debug), false)]
#[case(Predicate::NEVER, false)]
#[case(Placeholder.greater_than(Severity::Error), true)]
#[case(Predicate::ALWAYS, true)]
fn satisfiability(#[case] predicate: Predicate, #[case] expected: bool) {
    assert_eq!(predicate.is_satisfiable(), expected);
}

#[test]
fn only_folded_predicates_are_constant() {
    assert!(Predicate::NEVER.is_constant());
    assert!((Placeholder.at_least(Severity::Info) | Predicate::ALWAYS).is_constant());
    assert!(!Placeholder.at_least(Severity::Info).is_constant());
}

#[rstest]
#[case(">= warning", Placeholder.at_least(Severity::Warning))]
#[case("debug | info", Predicate::from(Severity::Debug) | Predicate::from(Severity::Info))]
#[case("!trace", !Severity::Trace)]
#[case("> debug && != error", Placeholder.greater_than(Severity::Debug) & !Severity::Error)]
#[case("true", Predicate::ALWAYS)]
#[case("FALSE", Predicate::NEVER)]
#[case("(info || wrn) & <= error", (Predicate::from(Severity::Info) | Predicate::from(Severity::Warning)) & Placeholder.at_most(Severity::Error))]
fn parses_filter_expressions(#[case] input: &str, #[case] expected: Predicate) {
    assert_eq!(input.parse::<Predicate>().expect("valid expression"), expected);
}

#[rstest]
#[case("")]
#[case(">=")]
#[case("(info")]
#[case("info)")]
#[case("verbose")]
#[case("info ^ debug")]
#[case(&format!("{}info{}", "(".repeat(200_000), ")".repeat(200_000)))]
#[case(&format!("{}info", "!".repeat(200_000)))]
fn rejects_malformed_expressions(#[case] input: &str) {
    let err = input.parse::<Predicate>().expect_err("malformed");
    assert!(matches!(err, ConfigError::InvalidFilter { .. }), "{err}");
}

#[test]
fn nesting_up_to_the_limit_parses() {
    let depth = 64;
    let nested = format!("{}info{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(
        nested.parse::<Predicate>().expect("within nesting limit"),
        Predicate::from(Severity::Info)
    );
    let too_deep = format!("{}info{}", "(".repeat(depth + 1), ")".repeat(depth + 1));
    let err = too_deep.parse::<Predicate>().expect_err("over nesting limit");
    assert!(err.to_string().contains("nested too deeply"), "{err}");
}

#[test]
fn display_output_parses_back() {
    let predicate = (Placeholder.at_least(Severity::Info) & !Severity::Throw)
        | Predicate::from(Severity::Trace);
    let text = predicate.to_string();
    assert_eq!(text, "(>= INFO & != THROW) | = TRACE");
    assert_eq!(text.parse::<Predicate>().expect("round trip"), predicate);
}

proptest! {
    #[test]
    fn and_matches_boolean_and(a in any_predicate(), b in any_predicate(), s in any_severity()) {
        let expected = a.evaluate(s) && b.evaluate(s);
        prop_assert_eq!((a & b).evaluate(s), expected);
    }

    #[test]
    fn or_matches_boolean_or(a in any_predicate(), b in any_predicate(), s in any_severity()) {
        let expected = a.evaluate(s) || b.evaluate(s);
        prop_assert_eq!((a | b).evaluate(s), expected);
    }

    #[test]
    fn not_matches_boolean_not(p in any_predicate(), s in any_severity()) {
        let expected = !p.evaluate(s);
        prop_assert_eq!((!p).evaluate(s), expected);
    }

    #[test]
    fn displayed_predicates_parse_to_equivalent_filters(p in any_predicate()) {
        let parsed: Predicate = p.to_string().parse().expect("display output parses");
        prop_assert_eq!(parsed.accepted(), p.accepted());
    }
}
