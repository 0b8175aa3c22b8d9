use taxon_engine::prelude::*;

const APPLIANCE_PROBLEMS: &str = "\
[Motor Efficiency] description: Motor efficiency, downsizing, cost, speed, and cooling improvements.,
[Usability] description: Simpler operation, easier maintenance, attachment handling, control layout.,
[Dust Separation] description: Cyclone separation efficiency, filter clogging, dust re-entrainment.";

#[test]
fn parse_completeness_over_definition_blocks() {
    let cases: &[(&str, Vec<&str>)] = &[
        (
            APPLIANCE_PROBLEMS,
            vec!["Motor Efficiency", "Usability", "Dust Separation"],
        ),
        ("[Single] m: only one entry", vec!["Single"]),
        (
            "[A] m: first, [B] m: second, [C] m: third",
            vec!["A", "B", "C"],
        ),
    ];
    for (raw, expected) in cases {
        let set = CategorySet::parse(Taxonomy::Problem, raw).unwrap();
        assert_eq!(&set.names(), expected);

        // Re-rendering and re-parsing yields the same ordered name sequence.
        let rendered = set.render();
        let reparsed = CategorySet::parse(Taxonomy::Problem, &rendered).unwrap();
        assert_eq!(set.names(), reparsed.names());
    }
}

#[test]
fn malformed_blocks_never_produce_a_set() {
    for raw in ["", "   \n  ", "no brackets at all", "[Unclosed m: text"] {
        assert!(
            CategorySet::parse(Taxonomy::Solution, raw).is_err(),
            "expected parse failure for {raw:?}"
        );
    }
}
