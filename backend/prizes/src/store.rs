//! Proposal store — create, look up and approve prize proposals.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{CreatePrizeProposal, PrizeProposal, ProposalStatus};
use crate::pagination::PageOptions;

const PROPOSAL_COLUMNS: &str = "id, user_id, title, description, is_automatic, \
     submission_time, voting_time, status, created_at, approved_at";

#[derive(Clone)]
pub struct ProposalStore {
    pool: SqlitePool,
}

impl ProposalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ─────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────

    /// Persist a new pending proposal owned by `owner_id`.
    pub async fn create(&self, input: &CreatePrizeProposal, owner_id: &str) -> Result<PrizeProposal> {
        let input = input.validated()?;
        let proposal = PrizeProposal {
            id: Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            title: input.title,
            description: input.description,
            is_automatic: input.is_automatic,
            submission_time: input.submission_time,
            voting_time: input.voting_time,
            status: ProposalStatus::Pending,
            created_at: Utc::now().timestamp(),
            approved_at: None,
        };

        sqlx::query(
            r#"
            INSERT INTO prize_proposals
                (id, user_id, title, description, is_automatic,
                 submission_time, voting_time, status, created_at, approved_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&proposal.id)
        .bind(&proposal.user_id)
        .bind(&proposal.title)
        .bind(&proposal.description)
        .bind(proposal.is_automatic)
        .bind(proposal.submission_time)
        .bind(proposal.voting_time)
        .bind(proposal.status)
        .bind(proposal.created_at)
        .bind(proposal.approved_at)
        .execute(&self.pool)
        .await?;

        info!(proposal_id = %proposal.id, owner = %owner_id, "Prize proposal created");
        Ok(proposal)
    }

    /// Mark a proposal approved. Approving an approved proposal is a no-op.
    ///
    /// The transition is a single conditional update, so concurrent approvals
    /// of the same id settle in the database without extra locking.
    pub async fn approve(&self, id: &str) -> Result<PrizeProposal> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE prize_proposals
            SET    status = ?1, approved_at = ?2
            WHERE  id = ?3 AND status = ?4
            "#,
        )
        .bind(ProposalStatus::Approved)
        .bind(Utc::now().timestamp())
        .bind(id)
        .bind(ProposalStatus::Pending)
        .execute(&self.pool)
        .await?
        .rows_affected();

        let proposal = self.find_one(id).await?;
        if rows_affected > 0 {
            info!(proposal_id = %id, "Prize proposal approved");
        } else {
            debug!(proposal_id = %id, "Prize proposal already approved");
        }
        Ok(proposal)
    }

    // ─────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────

    pub async fn find_one(&self, id: &str) -> Result<PrizeProposal> {
        let sql = format!("SELECT {PROPOSAL_COLUMNS} FROM prize_proposals WHERE id = ?1");
        sqlx::query_as::<_, PrizeProposal>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("prize proposal {id}")))
    }

    /// One page of the proposals owned by `user_id`, oldest first.
    pub async fn find_by_user_with_pagination(
        &self,
        options: PageOptions,
        user_id: &str,
    ) -> Result<Vec<PrizeProposal>> {
        let sql = format!(
            r#"
            SELECT {PROPOSAL_COLUMNS}
            FROM   prize_proposals
            WHERE  user_id = ?1
            ORDER  BY created_at ASC, rowid ASC
            LIMIT  ?2 OFFSET ?3
            "#
        );
        let rows = sqlx::query_as::<_, PrizeProposal>(&sql)
            .bind(user_id)
            .bind(options.limit)
            .bind(options.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// One page of all proposals, optionally restricted to one status.
    pub async fn list_with_pagination(
        &self,
        options: PageOptions,
        status: Option<ProposalStatus>,
    ) -> Result<Vec<PrizeProposal>> {
        let sql = format!(
            r#"
            SELECT {PROPOSAL_COLUMNS}
            FROM   prize_proposals
            WHERE  ?1 IS NULL OR status = ?1
            ORDER  BY created_at ASC, rowid ASC
            LIMIT  ?2 OFFSET ?3
            "#
        );
        let rows = sqlx::query_as::<_, PrizeProposal>(&sql)
            .bind(status)
            .bind(options.limit)
            .bind(options.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
