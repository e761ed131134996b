use crate::{
    api::internal_error,
    db::DbPool,
    models::Schedule,
    schema::{schedules, users},
};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Deserialize)]
pub struct UpsertScheduleRequest {
    pub date: NaiveDate, // Format: YYYY-MM-DD
    pub department: String,
    pub staff_name: String,
    pub status: String,
    pub added_by: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteScheduleRequest {
    pub date: NaiveDate,
    pub department: String,
    pub staff_name: String,
    pub added_by: Option<String>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct ScheduleCell {
    pub status: String,
    #[serde(rename = "addedBy")]
    pub added_by: String,
    #[serde(rename = "addedAt")]
    pub added_at: String,
}

/// date -> department -> staff_name -> cell, sorted ascending at every level.
pub type ScheduleBoard = BTreeMap<String, BTreeMap<String, BTreeMap<String, ScheduleCell>>>;

/// Fold flat joined rows into the nested board shape. The joined nickname is
/// None when `added_by` is null or names a user that no longer exists.
fn build_board(rows: Vec<(Schedule, Option<String>)>) -> ScheduleBoard {
    let mut board = ScheduleBoard::new();
    for (row, nickname) in rows {
        board
            .entry(row.date.to_string())
            .or_default()
            .entry(row.department)
            .or_default()
            .insert(
                row.staff_name,
                ScheduleCell {
                    status: row.status,
                    added_by: nickname.unwrap_or_else(|| "unknown".to_string()),
                    added_at: row.added_at.to_string(),
                },
            );
    }
    board
}

// ============================================================================
// Endpoints
// ============================================================================

/// List all schedule entries as a nested date/department/staff mapping
#[get("")]
pub async fn list_schedules(pool: web::Data<DbPool>) -> impl Responder {
    let mut conn = match pool.get() {
        Ok(c) => c,
        Err(e) => return internal_error(e),
    };

    let rows: Vec<(Schedule, Option<String>)> = match schedules::table
        .left_join(users::table.on(schedules::added_by.eq(users::nickname.nullable())))
        .select((Schedule::as_select(), users::nickname.nullable()))
        .order((
            schedules::date.desc(),
            schedules::department.asc(),
            schedules::staff_name.asc(),
        ))
        .load(&mut conn)
    {
        Ok(r) => r,
        Err(e) => {
            log::error!("Error fetching schedules: {}", e);
            return internal_error(e);
        }
    };

    HttpResponse::Ok().json(build_board(rows))
}

/// Upsert a schedule entry keyed by (date, department, staff_name)
#[post("")]
pub async fn upsert_schedule(
    pool: web::Data<DbPool>,
    body: web::Json<UpsertScheduleRequest>,
) -> impl Responder {
    let mut conn = match pool.get() {
        Ok(c) => c,
        Err(e) => return internal_error(e),
    };
    let body = body.into_inner();

    // Ensure the author exists, then write the entry, as one unit
    let result = conn.transaction::<i32, diesel::result::Error, _>(|conn| {
        if let Some(nickname) = body.added_by.as_deref() {
            diesel::insert_into(users::table)
                .values(users::nickname.eq(nickname))
                .on_conflict(users::nickname)
                .do_nothing()
                .execute(conn)?;
        }

        // DO UPDATE rather than REPLACE keeps added_at at its creation value
        diesel::insert_into(schedules::table)
            .values((
                schedules::date.eq(body.date),
                schedules::department.eq(&body.department),
                schedules::staff_name.eq(&body.staff_name),
                schedules::status.eq(&body.status),
                schedules::added_by.eq(body.added_by.as_deref()),
            ))
            .on_conflict((
                schedules::date,
                schedules::department,
                schedules::staff_name,
            ))
            .do_update()
            .set((
                schedules::status.eq(&body.status),
                schedules::added_by.eq(body.added_by.as_deref()),
                schedules::updated_at.eq(diesel::dsl::now),
            ))
            .returning(schedules::id)
            .get_result(conn)
    });

    match result {
        Ok(id) => HttpResponse::Ok().json(serde_json::json!({"success": true, "id": id})),
        Err(e) => {
            log::error!("Error upserting schedule: {}", e);
            internal_error(e)
        }
    }
}

/// Delete a schedule entry matching all four fields exactly
#[delete("")]
pub async fn delete_schedule(
    pool: web::Data<DbPool>,
    body: web::Json<DeleteScheduleRequest>,
) -> impl Responder {
    let mut conn = match pool.get() {
        Ok(c) => c,
        Err(e) => return internal_error(e),
    };

    // `added_by = NULL` never matches, so authorless rows stay undeletable here
    let deleted = diesel::delete(
        schedules::table
            .filter(schedules::date.eq(body.date))
            .filter(schedules::department.eq(&body.department))
            .filter(schedules::staff_name.eq(&body.staff_name))
            .filter(schedules::added_by.eq(body.added_by.as_deref())),
    )
    .execute(&mut conn);

    match deleted {
        Ok(count) => {
            HttpResponse::Ok().json(serde_json::json!({"success": true, "deleted": count > 0}))
        }
        Err(e) => {
            log::error!("Error deleting schedule: {}", e);
            internal_error(e)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn row(
        date: &str,
        department: &str,
        staff_name: &str,
        status: &str,
        added_by: Option<&str>,
    ) -> Schedule {
        let added_at: NaiveDateTime = "2024-01-01T09:30:00".parse().unwrap();
        Schedule {
            id: 1,
            date: date.parse().unwrap(),
            department: department.to_string(),
            staff_name: staff_name.to_string(),
            status: status.to_string(),
            added_by: added_by.map(str::to_string),
            added_at,
            updated_at: added_at,
        }
    }

    #[test]
    fn test_upsert_request_deserialization() {
        let json = r#"{
            "date": "2024-01-01",
            "department": "Sales",
            "staff_name": "Alice",
            "status": "on",
            "added_by": "bob"
        }"#;
        let request: UpsertScheduleRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.date.to_string(), "2024-01-01");
        assert_eq!(request.department, "Sales");
        assert_eq!(request.staff_name, "Alice");
        assert_eq!(request.status, "on");
        assert_eq!(request.added_by.as_deref(), Some("bob"));
    }

    #[test]
    fn test_upsert_request_missing_added_by_is_null() {
        let json = r#"{"date": "2024-01-01", "department": "Sales", "staff_name": "Alice", "status": "on"}"#;
        let request: UpsertScheduleRequest = serde_json::from_str(json).unwrap();
        assert!(request.added_by.is_none());
    }

    #[test]
    fn test_upsert_request_bad_date_fails() {
        let json = r#"{"date": "01/01/2024", "department": "Sales", "staff_name": "Alice", "status": "on"}"#;
        let result: Result<UpsertScheduleRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_request_missing_staff_name_fails() {
        let json = r#"{"date": "2024-01-01", "department": "Sales", "added_by": "bob"}"#;
        let result: Result<DeleteScheduleRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_board_nests_by_date_department_staff() {
        let rows = vec![
            (row("2024-01-02", "Sales", "Alice", "on", Some("bob")), Some("bob".to_string())),
            (row("2024-01-02", "Sales", "Carol", "off", Some("bob")), Some("bob".to_string())),
            (row("2024-01-02", "Support", "Dan", "on", Some("bob")), Some("bob".to_string())),
            (row("2024-01-01", "Sales", "Alice", "off", Some("eve")), Some("eve".to_string())),
        ];

        let board = build_board(rows);

        assert_eq!(board.len(), 2);
        assert_eq!(board["2024-01-02"].len(), 2);
        assert_eq!(board["2024-01-02"]["Sales"].len(), 2);
        assert_eq!(board["2024-01-02"]["Sales"]["Alice"].status, "on");
        assert_eq!(board["2024-01-02"]["Support"]["Dan"].added_by, "bob");
        assert_eq!(board["2024-01-01"]["Sales"]["Alice"].added_by, "eve");
    }

    #[test]
    fn test_build_board_unknown_author_fallback() {
        // Null added_by and dangling nicknames both arrive as a missed join
        let rows = vec![
            (row("2024-01-01", "Sales", "Alice", "on", None), None),
            (row("2024-01-01", "Sales", "Carol", "on", Some("ghost")), None),
        ];

        let board = build_board(rows);

        assert_eq!(board["2024-01-01"]["Sales"]["Alice"].added_by, "unknown");
        assert_eq!(board["2024-01-01"]["Sales"]["Carol"].added_by, "unknown");
    }

    #[test]
    fn test_board_serializes_with_camel_case_cell_keys() {
        let rows = vec![(
            row("2024-01-01", "Sales", "Alice", "on", Some("bob")),
            Some("bob".to_string()),
        )];

        let value = serde_json::to_value(build_board(rows)).unwrap();
        let cell = &value["2024-01-01"]["Sales"]["Alice"];

        assert_eq!(cell["status"], "on");
        assert_eq!(cell["addedBy"], "bob");
        assert_eq!(cell["addedAt"], "2024-01-01 09:30:00");
    }

    #[test]
    fn test_board_keys_sort_ascending() {
        let rows = vec![
            (row("2024-02-01", "Sales", "Alice", "on", None), None),
            (row("2024-01-15", "Sales", "Alice", "on", None), None),
            (row("2024-01-02", "Sales", "Alice", "on", None), None),
        ];

        let dates: Vec<String> = build_board(rows).into_keys().collect();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-15", "2024-02-01"]);
    }
}
