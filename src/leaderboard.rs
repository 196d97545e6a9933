//! Vote aggregation. Teams are ranked by the share of yes votes out of the
//! total possible across every judge who scored them.
//!
//! Criterion weights are *not* part of this formula: each of the seven
//! questions counts equally. The weights shown next to criteria are display
//! metadata only.

use axum::{Json, extract::State};
use itertools::Itertools;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Serialize;

use crate::{
    schema::votes, state::AppState, teams::Team, util_resp::ApiResult,
    votes::Vote,
};

/// Number of yes/no criteria each judge answers per team.
pub const CRITERIA_PER_JUDGE: i64 = 7;

#[derive(Serialize, Clone, Debug)]
pub struct TeamStanding {
    pub id: String,
    pub team_name: String,
    pub problem_statement: String,
    pub total_yes_votes: i64,
    pub total_possible_yes: i64,
    pub final_percentage: f64,
    pub vote_count: i64,
    pub judge_count: i64,
}

/// Share of yes votes out of the total possible, as a percentage rounded to
/// two decimal places. Zero when no judge has voted.
pub fn yes_percentage(total_yes: i64, total_possible: i64) -> f64 {
    if total_possible == 0 {
        return 0.0;
    }
    (Decimal::from(total_yes) * Decimal::ONE_HUNDRED
        / Decimal::from(total_possible))
    .round_dp(2)
    .to_f64()
    .unwrap_or(0.0)
}

/// Ranks every team, including those nobody has voted for (they sink to the
/// bottom with all-zero metrics).
pub fn compute_leaderboard(
    teams: &[Team],
    votes: &[Vote],
) -> Vec<TeamStanding> {
    let mut standings: Vec<TeamStanding> = teams
        .iter()
        .map(|team| {
            let team_votes: Vec<&Vote> =
                votes.iter().filter(|v| v.team_id == team.id).collect();

            let total_yes_votes =
                team_votes.iter().filter(|v| v.score == 1).count() as i64;
            let judge_count = team_votes
                .iter()
                .map(|v| v.judge_id.as_str())
                .unique()
                .count() as i64;
            let total_possible_yes = CRITERIA_PER_JUDGE * judge_count;

            TeamStanding {
                id: team.id.clone(),
                team_name: team.name.clone(),
                problem_statement: team.problem_statement.clone(),
                total_yes_votes,
                total_possible_yes,
                final_percentage: yes_percentage(
                    total_yes_votes,
                    total_possible_yes,
                ),
                vote_count: team_votes.len() as i64,
                judge_count,
            }
        })
        .collect();

    standings.sort_by(|a, b| {
        b.final_percentage
            .partial_cmp(&a.final_percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    standings
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
) -> ApiResult<Vec<TeamStanding>> {
    use diesel::prelude::*;

    let standings = state
        .run(|conn| {
            let teams = Team::all(conn)?;
            let all_votes = votes::table.load::<Vote>(conn)?;
            Ok(compute_leaderboard(&teams, &all_votes))
        })
        .await?;

    Ok(Json(standings))
}
