//! Batch vote submission with the duplicate-submission guard.
//!
//! The check-then-delete-then-insert sequence is not wrapped in a
//! transaction: two concurrent submissions for the same (judge, team) pair
//! can race. This window is an accepted limitation.

use std::collections::HashMap;

use axum::{Json, extract::State};
use chrono::Utc;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    criteria::Criterion,
    judges::Judge,
    mailer::{VoteConfirmation, VoteLine},
    schema::{criteria, votes},
    state::AppState,
    teams::Team,
    util_resp::{ApiError, ApiResult, DuplicateVotes, bad_request, not_found},
};

use super::{Vote, check_score_is_binary, votes_of_judge_for_team};

#[derive(Deserialize, Debug, Default)]
pub struct SubmitVotes {
    #[serde(default)]
    pub judge_id: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub votes: Vec<VoteEntry>,
    #[serde(default)]
    pub overwrite_existing: bool,
}

#[derive(Deserialize, Debug)]
pub struct VoteEntry {
    pub criteria_id: String,
    pub score: i64,
    #[serde(default)]
    pub comments: String,
}

#[derive(Serialize, Debug)]
pub struct SubmitOutcome {
    pub message: &'static str,
    pub votes_count: usize,
    pub email_sent: bool,
    pub judge_email: String,
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwritten_votes: Option<usize>,
}

pub async fn submit_votes(
    State(state): State<AppState>,
    Json(form): Json<SubmitVotes>,
) -> ApiResult<SubmitOutcome> {
    if form.judge_id.is_empty()
        || form.team_id.is_empty()
        || form.votes.is_empty()
    {
        return Err(bad_request(
            "Judge ID, Team ID, and votes data are required",
        ));
    }
    for entry in &form.votes {
        check_score_is_binary(entry.score)?;
    }

    let overwrite = form.overwrite_existing;
    let (judge, team, lines, overwritten) = state
        .run(move |conn| {
            let existing =
                votes_of_judge_for_team(&form.judge_id, &form.team_id, conn)?;

            if !existing.is_empty() && !overwrite {
                return Err(ApiError::Conflict(DuplicateVotes::new(
                    existing.len(),
                    existing.first().map(|v| v.created_at),
                )));
            }

            let judge = Judge::fetch(&form.judge_id, conn)?;
            let team = Team::fetch(&form.team_id, conn)?;
            let (judge, team) = match (judge, team) {
                (Some(judge), Some(team)) => (judge, team),
                _ => return Err(not_found("Judge or team not found")),
            };

            let overwritten = if existing.is_empty() {
                0
            } else {
                diesel::delete(
                    votes::table
                        .filter(votes::judge_id.eq(&form.judge_id))
                        .filter(votes::team_id.eq(&form.team_id)),
                )
                .execute(conn)?
            };

            let criteria_by_id: HashMap<String, Criterion> = criteria::table
                .load::<Criterion>(conn)?
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect();

            let now = Utc::now().naive_utc();
            let new_votes: Vec<Vote> = form
                .votes
                .iter()
                .map(|entry| Vote {
                    id: Uuid::now_v7().to_string(),
                    judge_id: form.judge_id.clone(),
                    team_id: form.team_id.clone(),
                    criteria_id: entry.criteria_id.clone(),
                    score: entry.score,
                    comments: entry.comments.clone(),
                    created_at: now,
                })
                .collect();

            diesel::insert_into(votes::table)
                .values(&new_votes)
                .execute(conn)?;

            let lines: Vec<VoteLine> = form
                .votes
                .iter()
                .map(|entry| VoteLine {
                    criteria_name: criteria_by_id
                        .get(&entry.criteria_id)
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| "Unknown Criteria".to_string()),
                    score: entry.score,
                    comments: entry.comments.clone(),
                })
                .collect();

            Ok((judge, team, lines, overwritten))
        })
        .await?;

    let votes_count = lines.len();
    let confirmation = VoteConfirmation {
        judge_name: judge.name,
        judge_email: judge.email.clone(),
        team_name: team.name,
        lines,
    };
    let email_sent = state.mailer.send_vote_confirmation(&confirmation);

    Ok(Json(SubmitOutcome {
        message: "Votes submitted successfully",
        votes_count,
        email_sent,
        judge_email: judge.email,
        action: if overwritten > 0 { "overwrite" } else { "new" },
        overwritten_votes: (overwritten > 0).then_some(overwritten),
    }))
}
