use axum::{Json, extract::State};
use chrono::Utc;
use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    schema::teams,
    state::AppState,
    util_resp::{ApiError, ApiResult, bad_request},
};

#[derive(Serialize, Deserialize, Queryable, Insertable, Clone, Debug)]
#[diesel(table_name = teams)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub problem_statement: String,
    pub success_criteria: String,
    pub created_at: chrono::NaiveDateTime,
}

impl Team {
    pub fn fetch(
        team_id: &str,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> Result<Option<Team>, ApiError> {
        Ok(teams::table
            .filter(teams::id.eq(team_id))
            .first::<Team>(conn)
            .optional()?)
    }

    pub fn all(
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> Result<Vec<Team>, ApiError> {
        Ok(teams::table.load::<Team>(conn)?)
    }
}

pub async fn list_teams(
    State(state): State<AppState>,
) -> ApiResult<Vec<Team>> {
    let teams = state.run(|conn| Team::all(conn)).await?;
    Ok(Json(teams))
}

#[derive(Deserialize, Debug, Default)]
pub struct CreateTeam {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub problem_statement: String,
    #[serde(default)]
    pub success_criteria: String,
}

#[derive(Serialize, Debug)]
pub struct TeamCreated {
    pub id: String,
    pub name: String,
    pub message: &'static str,
}

pub async fn create_team(
    State(state): State<AppState>,
    Json(form): Json<CreateTeam>,
) -> ApiResult<TeamCreated> {
    let name = form.name.trim().to_string();
    if name.is_empty() {
        return Err(bad_request("Team name is required"));
    }

    let team = Team {
        id: Uuid::now_v7().to_string(),
        name,
        problem_statement: form.problem_statement.trim().to_string(),
        success_criteria: form.success_criteria.trim().to_string(),
        created_at: Utc::now().naive_utc(),
    };

    let created = state
        .run(move |conn| {
            diesel::insert_into(teams::table)
                .values(&team)
                .execute(conn)?;

            Ok(TeamCreated {
                id: team.id.clone(),
                name: team.name.clone(),
                message: "Team added successfully",
            })
        })
        .await?;

    Ok(Json(created))
}
