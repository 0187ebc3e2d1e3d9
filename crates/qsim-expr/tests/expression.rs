//! Tests for expression parsing and evaluation.

use proptest::prelude::*;
use qsim_expr::{EvalError, Expression, ParseErrorKind, StatisticsContext, calc};
use qsim_stats::{LookupError, StatisticsDocument};

const STATISTICS: &str = r#"
<Statistics>
  <ClientsWaitingTimes>
    <ClientsWaitingTime Type="Calls" Mean="12.5" Share="25%">0;1;2;1</ClientsWaitingTime>
    <ClientsWaitingTime Type="Callbacks" Mean="0:01:30.5">0;0</ClientsWaitingTime>
  </ClientsWaitingTimes>
  <Model><ModelVersion>5.2.0</ModelVersion></Model>
</Statistics>
"#;

fn eval_with_statistics(text: &str) -> Result<f64, EvalError> {
    let doc = StatisticsDocument::from_xml_str(STATISTICS).unwrap();
    let ctx = StatisticsContext::new(&doc);
    Expression::parse(text).unwrap().eval(&ctx)
}

#[test]
fn constants_and_separators() {
    assert_eq!(calc("1,5+0.5"), Some(2.0));
    assert_eq!(calc("PI"), Some(std::f64::consts::PI));
    assert_eq!(calc("e"), Some(std::f64::consts::E));
}

#[test]
fn scientific_notation_literals() {
    assert_eq!(calc("1e3"), Some(1000.0));
    assert_eq!(calc("2,5E-1"), Some(0.25));
    assert_eq!(calc("1E+2/4"), Some(25.0));
    assert_eq!(calc("2e"), Some(2.0 * std::f64::consts::E));
}

#[test]
fn postfix_operators() {
    assert_eq!(calc("50%"), Some(0.5));
    assert_eq!(calc("3²"), Some(9.0));
    assert_eq!(calc("2³"), Some(8.0));
    assert_eq!(calc("4!"), Some(24.0));
}

#[test]
fn brackets_and_absolute_value() {
    assert_eq!(calc("{2*[1+(3-1)]}"), Some(6.0));
    assert_eq!(calc("|2-5|"), Some(3.0));
    assert_eq!(calc("||-2|-5|"), Some(3.0));
}

#[test]
fn aggregates_take_semicolon_lists() {
    assert_eq!(calc("min(3;1;2)"), Some(1.0));
    assert_eq!(calc("max(3;1,5;2)"), Some(3.0));
    assert_eq!(calc("sum(1;2;3)"), Some(6.0));
    assert_eq!(calc("mean(1;2;3;6)"), Some(3.0));
}

#[test]
fn evaluation_failures() {
    let eval = |text: &str| Expression::parse(text).unwrap().eval(&());
    assert_eq!(eval("1/0"), Err(EvalError::DivisionByZero));
    assert_eq!(eval("1:(2-2)"), Err(EvalError::DivisionByZero));
    assert_eq!(eval("sqrt(-4)"), Err(EvalError::Domain("sqrt")));
    assert_eq!(eval("ln(0)"), Err(EvalError::Domain("ln")));
    assert_eq!(eval("10^400"), Err(EvalError::NonFinite));
    assert_eq!(
        eval("xml('Model->ModelVersion')"),
        Err(EvalError::Lookup(LookupError::NoStatistics))
    );
}

#[test]
fn parse_errors_report_character_offsets() {
    let err = Expression::parse("2*(3+4").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Expected(')'));
    assert_eq!(err.position, 6);
    assert_eq!(err.display_position(), 7);

    let err = Expression::parse("2*(3+4]").unwrap_err();
    assert_eq!((err.position, err.kind), (6, ParseErrorKind::Expected(')')));

    let err = Expression::parse("1+2)").unwrap_err();
    assert_eq!(err.position, 3);

    let err = Expression::parse("   ").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::Empty);

    let err = Expression::parse("sqrt(1;2)").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::ArgumentCount { function: "sqrt" });

    let err = Expression::parse("xml(Model)").unwrap_err();
    assert_eq!(err.position, 4);
    assert_eq!(err.kind, ParseErrorKind::ExpectedSelector { function: "xml" });
}

#[test]
fn error_message_uses_one_based_position() {
    let err = Expression::parse("1+*2").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unexpected '*' at position 3");
}

#[test]
fn xml_lookups_read_numbers_times_and_percentages() {
    assert_eq!(
        eval_with_statistics(r#"xml('ClientsWaitingTimes->ClientsWaitingTime[Type="Calls"]->[Mean]')*2"#),
        Ok(25.0)
    );
    assert_eq!(
        eval_with_statistics(r#"xml('ClientsWaitingTimes->ClientsWaitingTime[Type="Callbacks"]->[Mean]')"#),
        Ok(90.5)
    );
    assert_eq!(
        eval_with_statistics(r#"xml("ClientsWaitingTimes->ClientsWaitingTime->[Share]")"#),
        Ok(0.25)
    );
}

#[test]
fn distribution_aggregates() {
    let selector = r#"'ClientsWaitingTimes->ClientsWaitingTime[Type="Calls"]'"#;
    assert_eq!(eval_with_statistics(&format!("xmlsum({selector})")), Ok(4.0));
    assert_eq!(eval_with_statistics(&format!("xmlmean({selector})")), Ok(2.0));
    let sd = eval_with_statistics(&format!("xmlsd({selector})")).unwrap();
    assert!((sd - 0.5f64.sqrt()).abs() < 1e-12);
    let cv = eval_with_statistics(&format!("XMLCV({selector})")).unwrap();
    assert!((cv - sd / 2.0).abs() < 1e-12);
    assert_eq!(
        eval_with_statistics(r#"xmlcv('ClientsWaitingTimes->ClientsWaitingTime[2]')"#),
        Ok(0.0)
    );
}

#[test]
fn lookup_failures_surface_as_eval_errors() {
    assert_eq!(
        eval_with_statistics("xml('Model->ModelVersion')"),
        Err(EvalError::NotANumber("Model->ModelVersion".into()))
    );
    assert_eq!(
        eval_with_statistics("xml('Model->Missing')"),
        Err(EvalError::Lookup(LookupError::NoMatchingElement("Missing".into())))
    );
}

proptest! {
    #[test]
    fn parsing_never_panics(text in "\\PC{0,24}") {
        let _ = Expression::parse(&text).map(|expr| expr.eval(&()));
    }

    #[test]
    fn integer_arithmetic_matches_native(a in -1000i32..1000, b in 1i32..1000) {
        let expected = f64::from(a) * f64::from(b) - f64::from(a) / f64::from(b);
        let actual = calc(&format!("{a}*{b}-{a}/{b}")).unwrap();
        prop_assert!((actual - expected).abs() < 1e-9);
    }
}
