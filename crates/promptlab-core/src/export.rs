//! Experiment export rendering: a JSON document and a flat CSV table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ExperimentRecord, ResponseRecord};

/// Canonical JSON export document for one experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentDocument {
    pub id: Uuid,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub responses: Vec<ResponseRecord>,
}

/// Build the JSON export document.
pub fn render_experiment_document(
    experiment: &ExperimentRecord,
    responses: &[ResponseRecord],
) -> ExperimentDocument {
    ExperimentDocument {
        id: experiment.id,
        prompt: experiment.prompt.clone(),
        created_at: experiment.created_at,
        updated_at: experiment.updated_at,
        responses: responses.to_vec(),
    }
}

const CSV_HEADERS: [&str; 11] = [
    "Response ID",
    "Temperature",
    "Top P",
    "Top K",
    "Max Tokens",
    "Content",
    "Structure Score",
    "Linguistic Score",
    "Relevance Score",
    "Overall Score",
    "Created At",
];

/// Render responses as a CSV table.
///
/// Content cells are quoted with embedded quotes doubled; absent optional
/// parameters and the relevance score of promptless metrics serialize as
/// empty cells.
pub fn render_experiment_csv(responses: &[ResponseRecord]) -> String {
    let mut rows = Vec::with_capacity(responses.len() + 1);
    rows.push(CSV_HEADERS.join(","));

    for record in responses {
        let row = [
            record.id.to_string(),
            record.parameters.temperature.to_string(),
            record.parameters.top_p.to_string(),
            record
                .parameters
                .top_k
                .map(|k| k.to_string())
                .unwrap_or_default(),
            record
                .parameters
                .max_output_tokens
                .map(|m| m.to_string())
                .unwrap_or_default(),
            csv_quote(&record.content),
            record.metrics.structural.structure_score.to_string(),
            record.metrics.linguistic.linguistic_score.to_string(),
            record
                .metrics
                .relevance
                .as_ref()
                .map(|r| r.relevance_score.to_string())
                .unwrap_or_default(),
            record.metrics.overall_score.to_string(),
            record.created_at.to_rfc3339(),
        ];
        rows.push(row.join(","));
    }

    rows.join("\n")
}

fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
