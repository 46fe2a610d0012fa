//! Error types for bqsanity operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BqsanityError>;

#[derive(Error, Debug)]
pub enum BqsanityError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid project ID: {id}")]
    InvalidProject { id: u8 },

    #[error("Date out of range: {message}")]
    DateOutOfRange { message: String },

    #[error("Malformed query result: {message}")]
    MalformedResult { message: String },

    #[error("Failed to execute bq command line utility. Is bq installed? \
             https://cloud.google.com/bigquery/bq-command-line-tool")]
    BqNotInstalled,

    #[error("bq failed when attempting to execute query:\n{query}")]
    BqFailed { query: String },

    #[error("String conversion error: {0}")]
    StringConversion(#[from] std::string::FromUtf8Error),

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl BqsanityError {
    pub fn invalid_project(id: u8) -> Self {
        Self::InvalidProject { id }
    }

    pub fn date_out_of_range(msg: impl Into<String>) -> Self {
        Self::DateOutOfRange {
            message: msg.into(),
        }
    }

    pub fn malformed_result(msg: impl Into<String>) -> Self {
        Self::MalformedResult {
            message: msg.into(),
        }
    }

    pub fn bq_failed(query: impl Into<String>) -> Self {
        Self::BqFailed {
            query: query.into(),
        }
    }
}
