use super::{Database, OutboxMessage};

impl Database {
    pub async fn insert_outbox(
        &self,
        sender: &str,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<OutboxMessage, sqlx::Error> {
        sqlx::query_as::<_, OutboxMessage>(
            "INSERT INTO outbox (sender, recipient, subject, body) VALUES (?, ?, ?, ?) \
             RETURNING id, sender, recipient, subject, body, created_at",
        )
        .bind(sender)
        .bind(recipient)
        .bind(subject)
        .bind(body)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn list_outbox(&self) -> Result<Vec<OutboxMessage>, sqlx::Error> {
        sqlx::query_as::<_, OutboxMessage>(
            "SELECT id, sender, recipient, subject, body, created_at FROM outbox ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_support::*;

    #[tokio::test]
    async fn test_outbox_keeps_order() {
        let db = test_db().await;
        db.insert_outbox("noreply", "a@x.com", "hi", "body").await.unwrap();
        db.insert_outbox("noreply", "b@x.com", "hi", "body").await.unwrap();
        let all = db.list_outbox().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].recipient, "b@x.com");
    }
}
