//! Chart error type.

use thiserror::Error;

use super::model::PersonId;

/// Failures surfaced by the chart core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
	/// The dataset could not be fetched or parsed.
	#[error("failed to load family data: {0}")]
	DataLoad(String),

	/// The dataset parsed but holds no people.
	#[error("family data contains no members")]
	EmptyDataset,

	/// No generation-1 person exists, so no hierarchy can be rooted.
	#[error("no first-generation member found to root the tree")]
	NoRootFound,

	/// A person id did not resolve against the dataset or the current layout.
	#[error("member {0} not found")]
	NodeNotFound(PersonId),
}

impl ChartError {
	/// Whether the error should abort initialization rather than a single pass.
	pub fn is_fatal(&self) -> bool {
		matches!(self, Self::DataLoad(_) | Self::EmptyDataset)
	}
}

impl From<serde_json::Error> for ChartError {
	fn from(err: serde_json::Error) -> Self {
		Self::DataLoad(err.to_string())
	}
}

/// Result alias used throughout the chart core.
pub type Result<T> = std::result::Result<T, ChartError>;
