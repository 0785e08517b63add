//! Training dataset boundary.
//!
//! The classifier core only ever sees a pre-materialized sequence of
//! [`LabeledComplaint`] values. This module produces that sequence, either
//! from a CSV file with `text` and `label` columns (1 = disaster, 0 =
//! non-disaster) or from the built-in sample corpus used as a fallback and
//! by tests. Malformed datasets are fatal to training and surfaced as
//! [`TriageError::Dataset`].

use std::path::Path;

use csv::ReaderBuilder;

use crate::classifier::types::{Label, LabeledComplaint};
use crate::error::{Result, TriageError};

/// Per-label counts for a loaded corpus, reported by the train command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusStats {
    /// Total examples.
    pub total: usize,
    /// Examples labeled `verified`.
    pub verified: usize,
    /// Examples labeled `not_verified`.
    pub not_verified: usize,
}

/// Count labels in a corpus.
pub fn corpus_stats(examples: &[LabeledComplaint]) -> CorpusStats {
    let verified = examples
        .iter()
        .filter(|e| e.label == Label::Verified)
        .count();
    CorpusStats {
        total: examples.len(),
        verified,
        not_verified: examples.len() - verified,
    }
}

/// Load a labeled corpus from a CSV file.
///
/// The header must contain `text` and `label` columns; labels are `1`
/// (disaster, verified) or `0` (non-disaster, not_verified). Any missing
/// column, empty text or unparseable label aborts the load.
pub fn load_csv(path: &Path) -> Result<Vec<LabeledComplaint>> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| TriageError::dataset(format!("cannot open {}: {e}", path.display())))?;

    let headers = reader
        .headers()
        .map_err(|e| TriageError::dataset(format!("cannot read header: {e}")))?
        .clone();
    let text_column = headers
        .iter()
        .position(|h| h == "text")
        .ok_or_else(|| TriageError::dataset("missing required column: text"))?;
    let label_column = headers
        .iter()
        .position(|h| h == "label")
        .ok_or_else(|| TriageError::dataset("missing required column: label"))?;

    let mut examples = Vec::new();
    for (row_number, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| TriageError::dataset(format!("row {}: {e}", row_number + 2)))?;

        let text = record.get(text_column).unwrap_or("").to_string();
        if text.is_empty() {
            return Err(TriageError::dataset(format!(
                "row {}: empty text",
                row_number + 2
            )));
        }

        let label = match record.get(label_column) {
            Some("1") => Label::Verified,
            Some("0") => Label::NotVerified,
            other => {
                return Err(TriageError::dataset(format!(
                    "row {}: label must be 0 or 1, found {:?}",
                    row_number + 2,
                    other.unwrap_or("")
                )));
            }
        };

        examples.push(LabeledComplaint::new(text, label));
    }

    if examples.is_empty() {
        return Err(TriageError::dataset("dataset contains no rows"));
    }
    Ok(examples)
}

/// Built-in sample corpus: twenty disaster and twenty non-disaster
/// complaints. Used when no dataset file is supplied and by the test suite.
pub fn sample_corpus() -> Vec<LabeledComplaint> {
    const DISASTER: &[&str] = &[
        "Severe flooding in downtown area, need immediate evacuation assistance",
        "Earthquake damaged our building, people trapped inside, send help",
        "Wildfire approaching residential area, urgent evacuation needed",
        "Bridge collapsed due to heavy rain, road completely blocked",
        "Power lines down after storm, dangerous electrical hazard",
        "Landslide blocked highway, multiple vehicles stuck",
        "Gas leak in apartment building, residents need evacuation",
        "Tornado warning issued, seeking shelter information",
        "Flash flood warning, water rising rapidly in our area",
        "Building collapse after earthquake, people missing",
        "Hurricane damage assessment needed, infrastructure destroyed",
        "Emergency medical assistance needed after accident",
        "Fire spreading rapidly, firefighters required immediately",
        "Tsunami alert, coastal evacuation required",
        "Avalanche risk high, mountain roads closed",
        "Drought conditions severe, water shortage critical",
        "Chemical spill on highway, hazmat team needed",
        "Sinkhole opened on main street, traffic diverted",
        "Hailstorm damage to vehicles and property",
        "Mudslide after heavy rainfall, homes at risk",
    ];

    const NON_DISASTER: &[&str] = &[
        "Street light not working on main road",
        "Pothole needs repair on elm street",
        "Noise complaint from neighbor's party",
        "Parking violation in residential area",
        "Graffiti on public building wall",
        "Broken bench in city park",
        "Dog barking continuously at night",
        "Litter problem in downtown area",
        "Traffic light timing needs adjustment",
        "Public restroom needs cleaning",
        "Sidewalk crack needs minor repair",
        "Bus stop sign is missing",
        "Park maintenance required for grass cutting",
        "Street sweeping schedule inquiry",
        "Permit application for event",
        "General information about city services",
        "Complaint about slow internet service",
        "Request for additional garbage pickup",
        "Question about property tax assessment",
        "Suggestion for new bike lane installation",
    ];

    DISASTER
        .iter()
        .map(|t| LabeledComplaint::new(*t, Label::Verified))
        .chain(
            NON_DISASTER
                .iter()
                .map(|t| LabeledComplaint::new(*t, Label::NotVerified)),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_sample_corpus_is_balanced() {
        let stats = corpus_stats(&sample_corpus());
        assert_eq!(stats.total, 40);
        assert_eq!(stats.verified, 20);
        assert_eq!(stats.not_verified, 20);
    }

    #[test]
    fn test_load_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("complaints.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "text,label").unwrap();
        writeln!(file, "flood water rising fast,1").unwrap();
        writeln!(file, "pothole on elm street,0").unwrap();
        drop(file);

        let examples = load_csv(&path).unwrap();
        assert_eq!(examples.len(), 2);
        assert_eq!(examples[0].label, Label::Verified);
        assert_eq!(examples[1].label, Label::NotVerified);
    }

    #[test]
    fn test_load_csv_missing_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "body,label\nhello,1\n").unwrap();

        assert!(matches!(load_csv(&path), Err(TriageError::Dataset(_))));
    }

    #[test]
    fn test_load_csv_bad_label_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "text,label\nhello there,maybe\n").unwrap();

        assert!(matches!(load_csv(&path), Err(TriageError::Dataset(_))));
    }
}
