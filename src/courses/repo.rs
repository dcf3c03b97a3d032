use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::CourseInput;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub img_url: String,
    pub description: String,
    pub learning_outcomes: Vec<String>,
    pub total_hours: String,
    pub duration: String,
    pub calendar_length: String,
    pub class_days: String,
    pub certification: String,
    pub kits_included: bool,
    pub price: i64,
    pub start_date: String,
    pub end_date: String,
    pub available_seats: i32,
    pub created_by: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const COURSE_COLUMNS: &str = r#"
    id, title, img_url, description, learning_outcomes, total_hours, duration,
    calendar_length, class_days, certification, kits_included, price,
    start_date, end_date, available_seats, created_by, created_at, updated_at
"#;

impl Course {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Course>> {
        let rows = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Course>> {
        let course =
            sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
                .bind(id)
                .fetch_optional(db)
                .await?;
        Ok(course)
    }

    pub async fn create(db: &PgPool, input: &CourseInput, created_by: Uuid) -> anyhow::Result<Course> {
        let course = sqlx::query_as::<_, Course>(&format!(
            r#"
            INSERT INTO courses (
                title, img_url, description, learning_outcomes, total_hours,
                duration, calendar_length, class_days, certification,
                kits_included, price, start_date, end_date, available_seats,
                created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(&input.title)
        .bind(&input.img_url)
        .bind(&input.description)
        .bind(&input.learning_outcomes)
        .bind(&input.total_hours)
        .bind(&input.duration)
        .bind(&input.calendar_length)
        .bind(&input.class_days)
        .bind(&input.certification)
        .bind(input.kits_included)
        .bind(input.price)
        .bind(&input.start_date)
        .bind(&input.end_date)
        .bind(input.available_seats)
        .bind(created_by)
        .fetch_one(db)
        .await?;
        Ok(course)
    }

    pub async fn update(db: &PgPool, id: Uuid, input: &CourseInput) -> anyhow::Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(&format!(
            r#"
            UPDATE courses SET
                title = $2, img_url = $3, description = $4,
                learning_outcomes = $5, total_hours = $6, duration = $7,
                calendar_length = $8, class_days = $9, certification = $10,
                kits_included = $11, price = $12, start_date = $13,
                end_date = $14, available_seats = $15, updated_at = now()
            WHERE id = $1
            RETURNING {COURSE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.img_url)
        .bind(&input.description)
        .bind(&input.learning_outcomes)
        .bind(&input.total_hours)
        .bind(&input.duration)
        .bind(&input.calendar_length)
        .bind(&input.class_days)
        .bind(&input.certification)
        .bind(input.kits_included)
        .bind(input.price)
        .bind(&input.start_date)
        .bind(&input.end_date)
        .bind(input.available_seats)
        .fetch_optional(db)
        .await?;
        Ok(course)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<DeleteOutcome> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await;
        match result {
            Ok(r) if r.rows_affected() > 0 => Ok(DeleteOutcome::Deleted),
            Ok(_) => Ok(DeleteOutcome::NotFound),
            // 23503: enrollments or purchases still reference the course.
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some("23503") => {
                Ok(DeleteOutcome::InUse)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    InUse,
}

#[cfg(test)]
mod delete_tests {
    use super::*;

    async fn seed_user(db: &PgPool) -> Uuid {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO users (email, username, contact, password_hash, role)
            VALUES ($1, $2, '+1 555 0100', 'x', 'user')
            RETURNING id
            "#,
        )
        .bind(format!("{}@example.com", Uuid::new_v4()))
        .bind(Uuid::new_v4().to_string())
        .fetch_one(db)
        .await
        .expect("seed user");
        id
    }

    async fn seed_course(db: &PgPool, created_by: Uuid) -> Uuid {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO courses (
                title, img_url, description, learning_outcomes, total_hours,
                duration, calendar_length, class_days, certification,
                kits_included, price, start_date, end_date, available_seats,
                created_by
            )
            VALUES ('Welding', 'https://cdn.example/w.png', 'Intro',
                    ARRAY['Weld'], '40 Hours', '8 Weeks', '8 weeks',
                    'Weekends', 'Certificate of Completion', FALSE, 100,
                    '2026-09-01', '2026-10-27', 25, $1)
            RETURNING id
            "#,
        )
        .bind(created_by)
        .fetch_one(db)
        .await
        .expect("seed course");
        id
    }

    #[sqlx::test]
    async fn delete_removes_unreferenced_course(pool: PgPool) {
        let user = seed_user(&pool).await;
        let course = seed_course(&pool, user).await;

        assert_eq!(
            Course::delete(&pool, course).await.expect("delete"),
            DeleteOutcome::Deleted
        );
        assert_eq!(
            Course::delete(&pool, course).await.expect("delete again"),
            DeleteOutcome::NotFound
        );
    }

    #[sqlx::test]
    async fn delete_reports_in_use_when_enrollments_exist(pool: PgPool) {
        let user = seed_user(&pool).await;
        let course = seed_course(&pool, user).await;
        sqlx::query("INSERT INTO enrollments (user_id, course_id) VALUES ($1, $2)")
            .bind(user)
            .bind(course)
            .execute(&pool)
            .await
            .expect("enroll");

        assert_eq!(
            Course::delete(&pool, course).await.expect("delete"),
            DeleteOutcome::InUse
        );
        // The course survives the rejected delete.
        assert!(Course::find_by_id(&pool, course)
            .await
            .expect("find")
            .is_some());
    }
}
