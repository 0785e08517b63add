//! Class-balanced reweighting must keep the minority class alive.
//!
//! Trains on a 95/5 corpus and checks that fresh minority-class texts are
//! still predicted as the minority class, rather than collapsing into a
//! majority-only classifier.

use complaint_triage::classifier::{DisasterClassifier, Label, LabeledComplaint, TrainingConfig};

fn imbalanced_corpus() -> Vec<LabeledComplaint> {
    let streets = [
        "elm", "oak", "maple", "pine", "cedar", "birch", "walnut", "spruce", "ash", "willow",
    ];
    let issues = [
        "street light not working on",
        "pothole needs repair on",
        "graffiti on the wall near",
        "litter collecting along",
        "parking violation reported on",
        "broken bench in the park off",
        "missing bus stop sign on",
        "noise complaint from a party on",
        "overgrown grass along",
        "cracked sidewalk on",
    ];

    let mut examples = Vec::new();
    // 100 majority examples.
    for issue in &issues {
        for street in &streets {
            examples.push(LabeledComplaint::new(
                format!("{issue} {street} street"),
                Label::NotVerified,
            ));
        }
    }
    // 5 minority examples (~5%).
    for text in [
        "flood water rising rapidly near the river, evacuation needed",
        "flash flood submerged the bridge, people trapped and need rescue",
        "severe flooding in the valley, urgent evacuation assistance required",
        "storm surge flooding homes along the coast, emergency help needed",
        "heavy rain caused flooding downtown, residents stranded on rooftops",
    ] {
        examples.push(LabeledComplaint::new(text, Label::Verified));
    }
    examples
}

#[test]
fn minority_class_is_not_starved() {
    let (classifier, report) =
        DisasterClassifier::train(&imbalanced_corpus(), &TrainingConfig::default()).unwrap();
    assert!(report.train_size > 90);

    // Unseen minority-style complaints must still be reachable.
    let minority_probes = [
        "flood water rising fast near the river, send rescue teams",
        "flooding after the storm, urgent evacuation of trapped residents",
    ];
    for text in minority_probes {
        let prediction = classifier.predict(text).unwrap();
        assert_eq!(
            prediction.label,
            Label::Verified,
            "minority probe predicted {} at {:.3}",
            prediction.label,
            prediction.confidence
        );
    }

    // And the majority class still wins where it should.
    let prediction = classifier
        .predict("street light not working on cedar street")
        .unwrap();
    assert_eq!(prediction.label, Label::NotVerified);
}
