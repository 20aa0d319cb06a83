//! Canned "AI" responses.
//!
//! There is no model behind the demo: every answer comes from a small fixed
//! pool. Each entry quotes the question back and carries a 3×3 table.

use rand::Rng;

use crate::models::{Attachment, Cell, TablePayload};

/// The text and optional table of one reply, before it is stamped as a message.
#[derive(Debug, Clone, PartialEq)]
pub struct CannedResponse {
    pub text: String,
    pub table: Option<TablePayload>,
}

impl CannedResponse {
    /// The table wrapped as a message attachment.
    pub fn attachment(&self) -> Option<Attachment> {
        self.table.clone().map(Attachment::Table)
    }
}

/// Chooses the reply for a question.
pub trait ResponseSource: Send + Sync {
    fn respond(&self, question: &str) -> CannedResponse;
}

fn row(cells: [&str; 3]) -> Vec<Cell> {
    cells.into_iter().map(Cell::from).collect()
}

/// The full response pool with `question` interpolated.
pub fn canned_responses(question: &str) -> Vec<CannedResponse> {
    vec![
        CannedResponse {
            text: format!(
                "I analyzed your question: \"{question}\". Here are the key metrics from the analysis:"
            ),
            table: Some(TablePayload::new(
                ["Metric", "Value", "Status"],
                [
                    row(["Processing Time", "145ms", "Normal"]),
                    row(["Confidence Score", "0.92", "High"]),
                    row(["Response Type", "Analytical", "Valid"]),
                ],
            )),
        },
        CannedResponse {
            text: format!(
                "Based on your input: \"{question}\", the system has processed and categorized the request. See details below:"
            ),
            table: Some(TablePayload::new(
                ["Category", "Count", "Impact"],
                [
                    row(["Keywords Detected", "5", "Significant"]),
                    row(["Query Complexity", "Medium", "Manageable"]),
                    row(["Response Time", "120ms", "Optimal"]),
                ],
            )),
        },
    ]
}

/// Picks uniformly at random from the pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomResponses;

impl ResponseSource for RandomResponses {
    fn respond(&self, question: &str) -> CannedResponse {
        let mut pool = canned_responses(question);
        let idx = rand::rng().random_range(0..pool.len());
        pool.swap_remove(idx)
    }
}

/// Always picks the same pool entry (modulo the pool size).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedResponse(pub usize);

impl ResponseSource for FixedResponse {
    fn respond(&self, question: &str) -> CannedResponse {
        let mut pool = canned_responses(question);
        let idx = self.0 % pool.len();
        pool.swap_remove(idx)
    }
}
