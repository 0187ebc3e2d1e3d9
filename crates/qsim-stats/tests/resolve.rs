//! Tests for selector resolution against a statistics document.

use proptest::prelude::*;
use qsim_stats::{
    LookupError, NoStatistics, Selector, SelectorBuilder, StatisticsDocument, StatisticsSource,
};

fn document() -> StatisticsDocument {
    StatisticsDocument::from_xml_str(include_str!("data/statistics.xml")).unwrap()
}

#[test]
fn resolves_text_content() {
    let doc = document();
    let resolved = doc.resolve("Model->ModelName").unwrap();
    assert_eq!(resolved.value, "Call center");
    assert_eq!(resolved.path, ["Statistics", "Model", "ModelName"]);
}

#[test]
fn resolves_attribute_of_filtered_element() {
    let doc = document();
    let resolved = doc
        .resolve(r#"ClientsWaitingTimes->ClientsWaitingTime[Type="Callbacks"]->[Mean]"#)
        .unwrap();
    assert_eq!(resolved.value, "1:05:00");
    assert_eq!(
        resolved.path,
        ["Statistics", "ClientsWaitingTimes", "ClientsWaitingTime", "Mean"]
    );
}

#[test]
fn tag_and_value_matching_ignores_case() {
    let doc = document();
    let resolved = doc
        .resolve(r#"clientswaitingtimes->CLIENTSWAITINGTIME[type="calls"]"#)
        .unwrap();
    assert_eq!(resolved.value, "0;3;5;2");
}

#[test]
fn trailing_attribute_component_reads_first_match() {
    let doc = document();
    assert_eq!(doc.resolve("Utilization->Resource[Mean]").unwrap().value, "0.8125");
    assert_eq!(doc.resolve("Simulation->RunTime[Seconds]").unwrap().value, "1.42");
}

#[test]
fn index_selects_among_siblings() {
    let doc = document();
    assert_eq!(doc.resolve("Utilization->Resource[2]->[Name]").unwrap().value, "Supervisors");
    assert_eq!(
        doc.resolve("Utilization->Resource[4]"),
        Err(LookupError::NoMatchingElement("Resource[4]".to_string()))
    );
}

#[test]
fn empty_value_matches_missing_attribute() {
    let doc = document();
    let resolved = doc.resolve(r#"Utilization->Resource[Name=""]->[2]"#);
    assert!(resolved.is_err());
    let resolved = doc.resolve(r#"Utilization->Resource[Name=""]->[Mean]"#).unwrap();
    assert_eq!(resolved.value, "0.25");
    assert_eq!(resolved.path, ["Statistics", "Utilization", "Resource", "Mean"]);
}

#[test]
fn missing_attribute_is_reported() {
    let doc = document();
    assert_eq!(
        doc.resolve("Model->[Version]"),
        Err(LookupError::MissingAttribute {
            element: "Model".to_string(),
            attribute: "Version".to_string(),
        })
    );
}

#[test]
fn unknown_element_is_reported() {
    let doc = document();
    assert!(matches!(
        doc.resolve("Model->Stations"),
        Err(LookupError::NoMatchingElement(component)) if component == "Stations"
    ));
}

#[test]
fn no_statistics_source_always_fails() {
    assert_eq!(NoStatistics.resolve("Model->ModelName"), Err(LookupError::NoStatistics));
}

#[test]
fn builder_output_resolves_to_selected_node() {
    let doc = document();
    // Utilization -> second Resource
    let builder = SelectorBuilder::for_node(doc.root(), &[3, 1]).unwrap();
    let selector = builder.attribute("Mean").build().unwrap();
    assert_eq!(selector.to_string(), r#"Utilization->Resource[Name="Supervisors"]->[Mean]"#);
    assert_eq!(doc.resolve(&selector.to_string()).unwrap().value, "0.25");

    // third Resource shares its only attribute value with the second
    let selector = SelectorBuilder::for_node(doc.root(), &[3, 2])
        .unwrap()
        .attribute("Mean")
        .build()
        .unwrap();
    assert_eq!(selector.to_string(), "Utilization->Resource[3]->[Mean]");
    let resolved = doc.resolve(&selector.to_string()).unwrap();
    assert_eq!(resolved.value, "0.25");

    assert!(SelectorBuilder::for_node(doc.root(), &[9]).is_none());
}

#[test]
fn selector_display_is_canonical() {
    let selector = Selector::parse(r#" Utilization -> Resource[ Name = "Operators" ] -> [Mean] "#)
        .unwrap();
    assert_eq!(selector.to_string(), r#"Utilization->Resource[Name="Operators"]->[Mean]"#);
    assert_eq!(Selector::parse(&selector.to_string()).unwrap(), selector);
}

#[test]
fn every_indicator_resolves_to_its_value() {
    let doc = document();
    let indicators = doc.indicators();
    assert!(indicators.len() > 20);
    for indicator in &indicators {
        let resolved = doc.resolve(&indicator.selector).unwrap();
        assert_eq!(resolved.value, indicator.value, "selector {}", indicator.selector);
    }
}

#[test]
fn indicators_snapshot_prefix() {
    let doc = document();
    let listing = doc
        .indicators()
        .iter()
        .take(4)
        .map(|indicator| format!("{} = {}", indicator.selector, indicator.value))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(listing, @r"
    Model->ModelName = Call center
    Model->ModelVersion = 5.2.0
    Model->ModelDescription = Two client types, one shared operator group.
    Simulation->RunDate = 2024.03.11 14:02:33
    ");
}

#[test]
fn loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("statistics.xml");
    std::fs::write(&path, include_str!("data/statistics.xml")).unwrap();
    let doc = StatisticsDocument::from_path(&path).unwrap();
    assert_eq!(doc, document());

    let missing = StatisticsDocument::from_path(&dir.path().join("missing.xml"));
    assert!(matches!(missing, Err(qsim_stats::StatisticsError::Io { .. })));
}

proptest! {
    #[test]
    fn arbitrary_selectors_never_panic(text in "[A-Za-z\\[\\]=\"0-9 >-]{0,40}") {
        let doc = document();
        let _ = Selector::parse(&text);
        let _ = doc.resolve(&text);
    }
}
