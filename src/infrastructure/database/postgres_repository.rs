use anyhow::Result;
use sqlx::PgPool;

use crate::domain::{Credential, NewValentine, Repository, Valentine};

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: i64,
    password: String,
}

#[derive(sqlx::FromRow)]
struct ValentineRow {
    id: i64,
    text: String,
    track_link: String,
    recipient_id: i64,
    sender: Option<String>,
}

impl From<CredentialRow> for Credential {
    fn from(r: CredentialRow) -> Self {
        // ---
        Credential {
            id: r.id,
            password: r.password,
        }
    }
}

impl From<ValentineRow> for Valentine {
    fn from(r: ValentineRow) -> Self {
        // ---
        Valentine {
            id: r.id,
            text: r.text,
            track_link: r.track_link,
            recipient_id: r.recipient_id,
            sender: r.sender,
        }
    }
}

pub fn create_postgres_repository(pool: PgPool) -> crate::domain::RepositoryPtr {
    // ---
    std::sync::Arc::new(PostgresRepository::new(pool))
}

pub struct PostgresRepository {
    // ---
    pool: PgPool,
}

impl PostgresRepository {
    // ---
    pub fn new(pool: PgPool) -> Self {
        // ---
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Repository for PostgresRepository {
    // ---
    async fn get_credential(&self, id: i64) -> Result<Option<Credential>> {
        // ---
        let row =
            sqlx::query_as::<_, CredentialRow>("SELECT id, password FROM credentials WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Credential::from))
    }

    async fn count_credentials(&self) -> Result<i64> {
        // ---
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM credentials")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn insert_credentials(&self, credentials: &[Credential]) -> Result<u64> {
        // ---
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for credential in credentials {
            let result = sqlx::query(
                "INSERT INTO credentials (id, password) VALUES ($1, $2)
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(credential.id)
            .bind(&credential.password)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn create_valentine(&self, valentine: NewValentine) -> Result<Option<Valentine>> {
        // ---
        let mut tx = self.pool.begin().await?;

        let recipient: Option<i64> = sqlx::query_scalar("SELECT id FROM credentials WHERE id = $1")
            .bind(valentine.recipient_id)
            .fetch_optional(&mut *tx)
            .await?;

        if recipient.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query_as::<_, ValentineRow>(
            "INSERT INTO valentines (text, track_link, recipient_id, sender)
             VALUES ($1, $2, $3, $4)
             RETURNING id, text, track_link, recipient_id, sender",
        )
        .bind(&valentine.text)
        .bind(&valentine.track_link)
        .bind(valentine.recipient_id)
        .bind(&valentine.sender)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(row.into()))
    }

    async fn get_valentine(&self, id: i64) -> Result<Option<Valentine>> {
        // ---
        let row = sqlx::query_as::<_, ValentineRow>(
            "SELECT id, text, track_link, recipient_id, sender
             FROM valentines WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Valentine::from))
    }

    async fn list_valentines_by_recipient(&self, recipient_id: i64) -> Result<Vec<Valentine>> {
        // ---
        let rows = sqlx::query_as::<_, ValentineRow>(
            "SELECT id, text, track_link, recipient_id, sender
             FROM valentines WHERE recipient_id = $1
             ORDER BY id ASC",
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Valentine::from).collect())
    }

    async fn ping(&self) -> Result<()> {
        // ---
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
