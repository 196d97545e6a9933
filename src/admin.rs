//! Full-reset and diagnostics endpoints.

use axum::{Json, extract::State};
use chrono::Utc;
use diesel::prelude::*;
use serde::Serialize;

use crate::{
    criteria::seed_default_criteria,
    schema::{criteria, judges, settings, teams, votes},
    state::AppState,
    util_resp::ApiResult,
};

#[derive(Serialize, Debug)]
pub struct ClearOutcome {
    pub message: &'static str,
    pub deleted_teams: usize,
    pub deleted_judges: usize,
    pub deleted_votes: usize,
    pub reset_counters: bool,
}

/// Wipes every table. Criteria are wiped too and immediately re-seeded so
/// the defaults come back with the correct weights.
pub async fn clear_all_data(
    State(state): State<AppState>,
) -> ApiResult<ClearOutcome> {
    let outcome = state
        .run(|conn| {
            let deleted_votes = diesel::delete(votes::table).execute(conn)?;
            let deleted_teams = diesel::delete(teams::table).execute(conn)?;
            let deleted_judges =
                diesel::delete(judges::table).execute(conn)?;
            diesel::delete(criteria::table).execute(conn)?;

            let cleared_at = Utc::now().naive_utc().to_string();
            let flags = [
                ("sample_data_cleared", "true".to_string()),
                ("data_cleared_at", cleared_at),
                ("user_managed", "true".to_string()),
            ];
            for (key, value) in flags {
                diesel::replace_into(settings::table)
                    .values((settings::key.eq(key), settings::value.eq(value)))
                    .execute(conn)?;
            }

            seed_default_criteria(conn)?;

            Ok(ClearOutcome {
                message: "All data cleared successfully - criteria re-initialized with default weights",
                deleted_teams,
                deleted_judges,
                deleted_votes,
                reset_counters: true,
            })
        })
        .await?;

    Ok(Json(outcome))
}

#[derive(Serialize, Debug)]
pub struct DebugDump {
    pub database_state: DatabaseState,
    pub counts: Counts,
}

#[derive(Serialize, Debug)]
pub struct DatabaseState {
    pub teams: Vec<IdName>,
    pub judges: Vec<IdName>,
    pub votes: Vec<VoteRow>,
    pub criteria: Vec<CriterionRow>,
    pub settings: Vec<SettingRow>,
}

#[derive(Serialize, Debug)]
pub struct Counts {
    pub teams: usize,
    pub judges: usize,
    pub votes: usize,
    pub criteria: usize,
}

#[derive(Serialize, Debug)]
pub struct IdName {
    pub id: String,
    pub name: String,
}

#[derive(Serialize, Debug)]
pub struct VoteRow {
    pub id: String,
    pub judge_id: String,
    pub team_id: String,
    pub criteria_id: String,
    pub score: f64,
}

#[derive(Serialize, Debug)]
pub struct CriterionRow {
    pub id: String,
    pub name: String,
    pub weight: f64,
}

#[derive(Serialize, Debug)]
pub struct SettingRow {
    pub key: String,
    pub value: String,
}

/// Dumps lean projections of every table, plus row counts.
pub async fn debug_db(State(state): State<AppState>) -> ApiResult<DebugDump> {
    let dump = state
        .run(|conn| {
            let teams = teams::table
                .select((teams::id, teams::name))
                .load::<(String, String)>(conn)?
                .into_iter()
                .map(|(id, name)| IdName { id, name })
                .collect::<Vec<_>>();

            let judges = judges::table
                .select((judges::id, judges::name))
                .load::<(String, String)>(conn)?
                .into_iter()
                .map(|(id, name)| IdName { id, name })
                .collect::<Vec<_>>();

            let votes = votes::table
                .select((
                    votes::id,
                    votes::judge_id,
                    votes::team_id,
                    votes::criteria_id,
                    votes::score,
                ))
                .load::<(String, String, String, String, i64)>(conn)?
                .into_iter()
                .map(|(id, judge_id, team_id, criteria_id, score)| VoteRow {
                    id,
                    judge_id,
                    team_id,
                    criteria_id,
                    score: score as f64,
                })
                .collect::<Vec<_>>();

            let criteria = criteria::table
                .select((criteria::id, criteria::name, criteria::weight))
                .load::<(String, String, f64)>(conn)?
                .into_iter()
                .map(|(id, name, weight)| CriterionRow { id, name, weight })
                .collect::<Vec<_>>();

            let settings = settings::table
                .load::<(String, String)>(conn)?
                .into_iter()
                .map(|(key, value)| SettingRow { key, value })
                .collect::<Vec<_>>();

            Ok(DebugDump {
                counts: Counts {
                    teams: teams.len(),
                    judges: judges.len(),
                    votes: votes.len(),
                    criteria: criteria.len(),
                },
                database_state: DatabaseState {
                    teams,
                    judges,
                    votes,
                    criteria,
                    settings,
                },
            })
        })
        .await?;

    Ok(Json(dump))
}
