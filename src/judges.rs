use axum::{Json, extract::State};
use chrono::Utc;
use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    schema::judges,
    state::AppState,
    util_resp::{ApiError, ApiResult, bad_request},
    validation::is_valid_email,
};

#[derive(Serialize, Deserialize, Queryable, Insertable, Clone, Debug)]
#[diesel(table_name = judges)]
pub struct Judge {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: chrono::NaiveDateTime,
}

impl Judge {
    pub fn fetch(
        judge_id: &str,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> Result<Option<Judge>, ApiError> {
        Ok(judges::table
            .filter(judges::id.eq(judge_id))
            .first::<Judge>(conn)
            .optional()?)
    }
}

pub async fn list_judges(
    State(state): State<AppState>,
) -> ApiResult<Vec<Judge>> {
    let judges = state
        .run(|conn| Ok(judges::table.load::<Judge>(conn)?))
        .await?;
    Ok(Json(judges))
}

#[derive(Deserialize, Debug, Default)]
pub struct CreateJudge {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Serialize, Debug)]
pub struct JudgeCreated {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub message: &'static str,
}

pub async fn create_judge(
    State(state): State<AppState>,
    Json(form): Json<CreateJudge>,
) -> ApiResult<JudgeCreated> {
    let name = form.name.trim().to_string();
    let email = form.email.trim().to_string();

    if name.is_empty() || email.is_empty() {
        return Err(bad_request("Name and email are required"));
    }
    if is_valid_email(&email).is_err() {
        return Err(bad_request("Invalid email address"));
    }

    let judge = Judge {
        id: Uuid::now_v7().to_string(),
        name,
        email,
        role: form.role.trim().to_string(),
        created_at: Utc::now().naive_utc(),
    };

    let created = state
        .run(move |conn| {
            diesel::insert_into(judges::table)
                .values(&judge)
                .execute(conn)?;

            Ok(JudgeCreated {
                id: judge.id.clone(),
                name: judge.name.clone(),
                email: judge.email.clone(),
                role: judge.role.clone(),
                message: "Judge added successfully",
            })
        })
        .await?;

    Ok(Json(created))
}
