use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub is_read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ContactMessage {
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        phone: &str,
        message: &str,
    ) -> anyhow::Result<ContactMessage> {
        let row = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, phone, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, phone, message, is_read, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(message)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<ContactMessage>> {
        let rows = sqlx::query_as::<_, ContactMessage>(
            r#"
            SELECT id, name, email, phone, message, is_read, created_at
            FROM contact_messages
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn mark_read(db: &PgPool, id: Uuid) -> anyhow::Result<Option<ContactMessage>> {
        let row = sqlx::query_as::<_, ContactMessage>(
            r#"
            UPDATE contact_messages
            SET is_read = TRUE
            WHERE id = $1
            RETURNING id, name, email, phone, message, is_read, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }
}
