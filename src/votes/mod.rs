//! Vote records. A vote is a fact: it is never updated in place. Overwriting
//! a judge's votes for a team means deleting the old records and inserting a
//! fresh batch (see `submit`).

use std::collections::HashMap;

use axum::{Json, extract::State};
use chrono::Utc;
use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    criteria::Criterion,
    judges::Judge,
    schema::{criteria, judges, teams, votes},
    state::AppState,
    teams::Team,
    util_resp::{ApiError, ApiResult, bad_request},
};

pub mod submit;

#[derive(Serialize, Deserialize, Queryable, Insertable, Clone, Debug)]
#[diesel(table_name = votes)]
pub struct Vote {
    pub id: String,
    pub judge_id: String,
    pub team_id: String,
    pub criteria_id: String,
    pub score: i64,
    pub comments: String,
    pub created_at: chrono::NaiveDateTime,
}

/// Existing votes a judge has cast for a team, earliest first.
pub fn votes_of_judge_for_team(
    judge_id: &str,
    team_id: &str,
    conn: &mut impl LoadConnection<Backend = Sqlite>,
) -> Result<Vec<Vote>, ApiError> {
    Ok(votes::table
        .filter(votes::judge_id.eq(judge_id))
        .filter(votes::team_id.eq(team_id))
        .order_by(votes::created_at.asc())
        .load::<Vote>(conn)?)
}

fn check_score_is_binary(score: i64) -> Result<(), ApiError> {
    match score {
        0 | 1 => Ok(()),
        _ => Err(bad_request("Score must be 0 (no) or 1 (yes)")),
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct CastVote {
    #[serde(default)]
    pub judge_id: String,
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub criteria_id: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub comments: String,
}

#[derive(Serialize, Debug)]
pub struct VoteAccepted {
    pub message: &'static str,
    pub judge_id: String,
    pub team_id: String,
    pub criteria_id: String,
    pub score: i64,
}

pub async fn cast_vote(
    State(state): State<AppState>,
    Json(form): Json<CastVote>,
) -> ApiResult<VoteAccepted> {
    if form.judge_id.is_empty()
        || form.team_id.is_empty()
        || form.criteria_id.is_empty()
    {
        return Err(bad_request(
            "Judge ID, Team ID, and Criteria ID are required",
        ));
    }
    check_score_is_binary(form.score)?;

    let vote = Vote {
        id: Uuid::now_v7().to_string(),
        judge_id: form.judge_id,
        team_id: form.team_id,
        criteria_id: form.criteria_id,
        score: form.score,
        comments: form.comments,
        created_at: Utc::now().naive_utc(),
    };

    let accepted = state
        .run(move |conn| {
            diesel::insert_into(votes::table)
                .values(&vote)
                .execute(conn)?;

            Ok(VoteAccepted {
                message: "Vote submitted successfully",
                judge_id: vote.judge_id.clone(),
                team_id: vote.team_id.clone(),
                criteria_id: vote.criteria_id.clone(),
                score: vote.score,
            })
        })
        .await?;

    Ok(Json(accepted))
}

/// A vote joined up with the names of its judge, team, and criterion. Missing
/// referents degrade to "Unknown ..." rather than failing the listing.
#[derive(Serialize, Debug)]
pub struct EnrichedVote {
    #[serde(flatten)]
    pub vote: Vote,
    pub team_name: String,
    pub judge_name: String,
    pub criteria_name: String,
    pub max_score: i64,
}

pub async fn list_votes(
    State(state): State<AppState>,
) -> ApiResult<Vec<EnrichedVote>> {
    let enriched = state
        .run(|conn| {
            let all_votes = votes::table.load::<Vote>(conn)?;

            let teams_by_id: HashMap<String, Team> = teams::table
                .load::<Team>(conn)?
                .into_iter()
                .map(|t| (t.id.clone(), t))
                .collect();
            let judges_by_id: HashMap<String, Judge> = judges::table
                .load::<Judge>(conn)?
                .into_iter()
                .map(|j| (j.id.clone(), j))
                .collect();
            let criteria_by_id: HashMap<String, Criterion> = criteria::table
                .load::<Criterion>(conn)?
                .into_iter()
                .map(|c| (c.id.clone(), c))
                .collect();

            Ok(all_votes
                .into_iter()
                .map(|vote| {
                    let team_name = teams_by_id
                        .get(&vote.team_id)
                        .map(|t| t.name.clone())
                        .unwrap_or_else(|| "Unknown Team".to_string());
                    let judge_name = judges_by_id
                        .get(&vote.judge_id)
                        .map(|j| j.name.clone())
                        .unwrap_or_else(|| "Unknown Judge".to_string());
                    let criterion = criteria_by_id.get(&vote.criteria_id);
                    let criteria_name = criterion
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| "Unknown Criteria".to_string());
                    let max_score = criterion.map(|c| c.max_score).unwrap_or(1);

                    EnrichedVote {
                        vote,
                        team_name,
                        judge_name,
                        criteria_name,
                        max_score,
                    }
                })
                .collect())
        })
        .await?;

    Ok(Json(enriched))
}
