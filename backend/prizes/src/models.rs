//! Prize proposal entity and request DTOs.

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};

/// Longest accepted proposal title, in characters.
pub const MAX_TITLE_CHARS: usize = 120;

/// Approval state of a proposal. Only ever moves `Pending -> Approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ProposalStatus {
    Pending,
    Approved,
}

/// A row of the `prize_proposals` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PrizeProposal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub is_automatic: bool,
    pub submission_time: i64,
    pub voting_time: i64,
    pub status: ProposalStatus,
    pub created_at: i64,
    pub approved_at: Option<i64>,
}

/// Body of `POST /prizes/proposals`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrizeProposal {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub is_automatic: bool,
    /// Days the prize accepts submissions once started.
    pub submission_time: i64,
    /// Days voting stays open after submissions close.
    pub voting_time: i64,
}

impl CreatePrizeProposal {
    /// Check field constraints, returning a trimmed copy on success.
    pub fn validated(&self) -> Result<Self> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("title must not be empty".to_string()));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(AppError::Validation(format!(
                "title must be at most {MAX_TITLE_CHARS} characters"
            )));
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(AppError::Validation(
                "description must not be empty".to_string(),
            ));
        }
        if self.submission_time <= 0 {
            return Err(AppError::Validation(
                "submissionTime must be a positive number of days".to_string(),
            ));
        }
        if self.voting_time <= 0 {
            return Err(AppError::Validation(
                "votingTime must be a positive number of days".to_string(),
            ));
        }

        Ok(Self {
            title: title.to_string(),
            description: description.to_string(),
            is_automatic: self.is_automatic,
            submission_time: self.submission_time,
            voting_time: self.voting_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CreatePrizeProposal {
        CreatePrizeProposal {
            title: "  Best open-source wallet  ".to_string(),
            description: "Reward the most useful wallet tooling".to_string(),
            is_automatic: false,
            submission_time: 14,
            voting_time: 7,
        }
    }

    #[test]
    fn validated_trims_text_fields() {
        let ok = input().validated().unwrap();
        assert_eq!(ok.title, "Best open-source wallet");
        assert_eq!(ok.submission_time, 14);
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut bad = input();
        bad.title = "   ".to_string();
        assert!(matches!(bad.validated(), Err(AppError::Validation(_))));
    }

    #[test]
    fn overlong_title_is_rejected() {
        let mut bad = input();
        bad.title = "x".repeat(MAX_TITLE_CHARS + 1);
        assert!(matches!(bad.validated(), Err(AppError::Validation(_))));
    }

    #[test]
    fn non_positive_durations_are_rejected() {
        let mut bad = input();
        bad.voting_time = 0;
        assert!(matches!(bad.validated(), Err(AppError::Validation(_))));

        let mut bad = input();
        bad.submission_time = -3;
        assert!(matches!(bad.validated(), Err(AppError::Validation(_))));
    }

    #[test]
    fn payload_uses_camel_case_and_defaults_is_automatic() {
        let parsed: CreatePrizeProposal = serde_json::from_value(serde_json::json!({
            "title": "Bridge bounty",
            "description": "Cross-chain bridge audit",
            "submissionTime": 10,
            "votingTime": 3
        }))
        .unwrap();
        assert!(!parsed.is_automatic);
        assert_eq!(parsed.voting_time, 3);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ProposalStatus::Approved).unwrap(),
            serde_json::json!("approved")
        );
        let parsed: ProposalStatus = serde_json::from_value(serde_json::json!("pending")).unwrap();
        assert_eq!(parsed, ProposalStatus::Pending);
    }
}
