use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::PaymentError;

/// A gateway order awaiting verification, keyed by the external order id.
#[derive(Debug, Clone, FromRow)]
pub struct PendingPayment {
    pub order_id: String,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub amount: i64,
    pub status: String,
    pub created_at: OffsetDateTime,
}

/// Append-only ledger entry for a completed transaction.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Purchase {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub amount: i64,
    pub payment_id: String,
    pub status: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct PaymentRow {
    pub id: Uuid,
    pub amount: i64,
    pub payment_id: String,
    pub status: String,
    pub created_at: OffsetDateTime,
    pub username: String,
    pub contact: String,
    pub course_title: String,
}

pub async fn insert_pending(
    db: &PgPool,
    order_id: &str,
    user_id: Uuid,
    course_id: Uuid,
    amount: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO pending_payments (order_id, user_id, course_id, amount)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(order_id)
    .bind(user_id)
    .bind(course_id)
    .bind(amount)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn find_pending(
    db: &PgPool,
    order_id: &str,
) -> Result<Option<PendingPayment>, sqlx::Error> {
    sqlx::query_as::<_, PendingPayment>(
        r#"
        SELECT order_id, user_id, course_id, amount, status, created_at
        FROM pending_payments
        WHERE order_id = $1
        "#,
    )
    .bind(order_id)
    .fetch_optional(db)
    .await
}

pub async fn course_price(db: &PgPool, course_id: Uuid) -> Result<Option<i64>, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as(r#"SELECT price FROM courses WHERE id = $1"#)
        .bind(course_id)
        .fetch_optional(db)
        .await?;
    Ok(row.map(|(price,)| price))
}

pub async fn user_exists(db: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let row: Option<(Uuid,)> = sqlx::query_as(r#"SELECT id FROM users WHERE id = $1"#)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    Ok(row.is_some())
}

pub async fn is_enrolled(db: &PgPool, user_id: Uuid, course_id: Uuid) -> Result<bool, sqlx::Error> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"SELECT user_id FROM enrollments WHERE user_id = $1 AND course_id = $2"#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(db)
    .await?;
    Ok(row.is_some())
}

/// Records a verified payment: enrollment, ledger entry and pending-payment
/// completion as one transaction, so a failure part-way leaves no partial
/// state. The enrollment primary key turns a concurrent duplicate into
/// `AlreadyEnrolled` instead of a second ledger entry.
pub async fn complete(db: &PgPool, pending: &PendingPayment) -> Result<Purchase, PaymentError> {
    let mut tx = db.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO enrollments (user_id, course_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, course_id) DO NOTHING
        "#,
    )
    .bind(pending.user_id)
    .bind(pending.course_id)
    .execute(&mut *tx)
    .await?;

    if inserted.rows_affected() == 0 {
        // Dropped transaction rolls back.
        return Err(PaymentError::AlreadyEnrolled);
    }

    let purchase = sqlx::query_as::<_, Purchase>(
        r#"
        INSERT INTO purchases (user_id, course_id, amount, payment_id, status)
        VALUES ($1, $2, $3, $4, 'completed')
        RETURNING id, user_id, course_id, amount, payment_id, status, created_at
        "#,
    )
    .bind(pending.user_id)
    .bind(pending.course_id)
    .bind(pending.amount)
    .bind(&pending.order_id)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(r#"UPDATE pending_payments SET status = 'completed' WHERE order_id = $1"#)
        .bind(&pending.order_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(purchase)
}

pub async fn list_all(db: &PgPool) -> Result<Vec<PaymentRow>, sqlx::Error> {
    sqlx::query_as::<_, PaymentRow>(
        r#"
        SELECT p.id, p.amount, p.payment_id, p.status, p.created_at,
               u.username, u.contact, c.title AS course_title
        FROM purchases p
        JOIN users u ON u.id = p.user_id
        JOIN courses c ON c.id = p.course_id
        ORDER BY p.created_at DESC
        "#,
    )
    .fetch_all(db)
    .await
}
