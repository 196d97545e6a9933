//! The seven yes/no questions judges answer for each team.
//!
//! Weights are displayed to judges but deliberately play no part in the
//! leaderboard arithmetic; see the leaderboard module.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    schema::{criteria, votes},
    state::AppState,
    util_resp::{ApiResult, bad_request, not_found},
};

#[derive(Serialize, Deserialize, Queryable, Insertable, Clone, Debug)]
#[diesel(table_name = criteria)]
pub struct Criterion {
    pub id: String,
    pub name: String,
    pub weight: f64,
    pub max_score: i64,
    pub description: String,
    pub created_at: chrono::NaiveDateTime,
}

/// The default criteria set. Weights sum to 100; every criterion is a yes/no
/// question, so `max_score` is always 1.
const DEFAULT_CRITERIA: [(&str, &str, f64, &str); 7] = [
    (
        "1",
        "Problem Understanding",
        15.0,
        "Did the team demonstrate deep understanding of the customer's problem?",
    ),
    (
        "2",
        "Success Criteria Definition",
        15.0,
        "Did the team determine success criteria collaboratively with the customer?",
    ),
    (
        "3",
        "Demo Relevance",
        15.0,
        "Did the team present a demo that directly addresses the customer problem?",
    ),
    (
        "4",
        "Service Correlation",
        15.0,
        "Did the team effectively correlate the demo with the services planned for the proof of concept?",
    ),
    (
        "5",
        "GenAI Services Usage",
        15.0,
        "Did the team leverage generative AI services appropriately?",
    ),
    (
        "6",
        "Team Collaboration",
        10.0,
        "Did the team demonstrate effective collaboration during the presentation?",
    ),
    (
        "7",
        "Notes of Unanswered Questions",
        15.0,
        "Did the team take notes of the unanswered questions to address later?",
    ),
];

/// Inserts the default criteria if the table is empty. Returns the number of
/// rows seeded (0 when the table was already populated).
pub fn seed_default_criteria(
    conn: &mut impl LoadConnection<Backend = Sqlite>,
) -> QueryResult<usize> {
    let existing: i64 = criteria::table.count().get_result(conn)?;
    if existing > 0 {
        return Ok(0);
    }

    let now = Utc::now().naive_utc();
    let rows: Vec<Criterion> = DEFAULT_CRITERIA
        .iter()
        .map(|(id, name, weight, description)| Criterion {
            id: id.to_string(),
            name: name.to_string(),
            weight: *weight,
            max_score: 1,
            description: description.to_string(),
            created_at: now,
        })
        .collect();

    let seeded = diesel::insert_into(criteria::table)
        .values(&rows)
        .execute(conn)?;
    info!("seeded {seeded} default criteria");

    Ok(seeded)
}

/// Criteria keep small numeric ids ("1", "2", ...); the next id is one past
/// the largest. Non-numeric ids are ignored.
fn next_numeric_id(ids: &[String]) -> String {
    let max = ids
        .iter()
        .filter_map(|id| id.parse::<i64>().ok())
        .max()
        .unwrap_or(0);
    (max + 1).to_string()
}

pub async fn list_criteria(
    State(state): State<AppState>,
) -> ApiResult<Vec<Criterion>> {
    let criteria = state
        .run(|conn| Ok(criteria::table.load::<Criterion>(conn)?))
        .await?;
    Ok(Json(criteria))
}

#[derive(Deserialize, Debug, Default)]
pub struct CreateCriterion {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Debug)]
pub struct CriterionCreated {
    pub id: String,
    pub name: String,
    pub weight: f64,
    pub description: String,
    pub message: &'static str,
}

pub async fn create_criterion(
    State(state): State<AppState>,
    Json(form): Json<CreateCriterion>,
) -> ApiResult<CriterionCreated> {
    let name = form.name.trim().to_string();
    if name.is_empty() || form.weight == 0.0 {
        return Err(bad_request("Criteria name and weight are required"));
    }

    let created = state
        .run(move |conn| {
            let ids: Vec<String> =
                criteria::table.select(criteria::id).load(conn)?;

            let criterion = Criterion {
                id: next_numeric_id(&ids),
                name,
                weight: form.weight,
                max_score: 1,
                description: form.description.trim().to_string(),
                created_at: Utc::now().naive_utc(),
            };

            diesel::insert_into(criteria::table)
                .values(&criterion)
                .execute(conn)?;

            Ok(CriterionCreated {
                id: criterion.id.clone(),
                name: criterion.name.clone(),
                weight: criterion.weight,
                description: criterion.description.clone(),
                message: "Criteria added successfully",
            })
        })
        .await?;

    Ok(Json(created))
}

#[derive(Serialize, Debug)]
pub struct CriterionDeleted {
    pub message: &'static str,
    pub criteria_id: String,
    pub deleted_votes: usize,
}

/// Deletes a criterion. Votes referencing it are cascade-deleted first and
/// the count is reported back.
pub async fn delete_criterion(
    State(state): State<AppState>,
    Path(criteria_id): Path<String>,
) -> ApiResult<CriterionDeleted> {
    let deleted = state
        .run(move |conn| {
            let exists: i64 = criteria::table
                .filter(criteria::id.eq(&criteria_id))
                .count()
                .get_result(conn)?;
            if exists == 0 {
                return Err(not_found("Criteria not found"));
            }

            let deleted_votes = diesel::delete(
                votes::table.filter(votes::criteria_id.eq(&criteria_id)),
            )
            .execute(conn)?;

            diesel::delete(criteria::table.filter(criteria::id.eq(&criteria_id)))
                .execute(conn)?;

            Ok(CriterionDeleted {
                message: "Criteria deleted successfully",
                criteria_id,
                deleted_votes,
            })
        })
        .await?;

    Ok(Json(deleted))
}
