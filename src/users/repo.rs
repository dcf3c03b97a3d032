use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// One user row joined with at most one enrollment; folded into per-user
/// listings by the handlers.
#[derive(Debug, FromRow)]
pub struct UserEnrollmentRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub contact: String,
    pub role: String,
    pub course_id: Option<Uuid>,
    pub course_title: Option<String>,
    pub purchased_at: Option<OffsetDateTime>,
}

/// A purchased course with the display fields the profile page needs.
#[derive(Debug, FromRow)]
pub struct PurchasedCourseRow {
    pub course_id: Uuid,
    pub title: String,
    pub img_url: String,
    pub description: String,
    pub price: i64,
    pub purchased_at: OffsetDateTime,
}

pub async fn list_with_enrollments(db: &PgPool) -> anyhow::Result<Vec<UserEnrollmentRow>> {
    let rows = sqlx::query_as::<_, UserEnrollmentRow>(
        r#"
        SELECT u.id, u.email, u.username, u.contact, u.role,
               e.course_id, c.title AS course_title, e.purchased_at
        FROM users u
        LEFT JOIN enrollments e ON e.user_id = u.id
        LEFT JOIN courses c ON c.id = e.course_id
        ORDER BY u.created_at DESC, u.id, e.purchased_at ASC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn purchased_courses(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<PurchasedCourseRow>> {
    let rows = sqlx::query_as::<_, PurchasedCourseRow>(
        r#"
        SELECT e.course_id, c.title, c.img_url, c.description, c.price, e.purchased_at
        FROM enrollments e
        JOIN courses c ON c.id = e.course_id
        WHERE e.user_id = $1
        ORDER BY e.purchased_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn delete(db: &PgPool, user_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
