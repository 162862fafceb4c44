use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::{Store, StoreError};
use crate::models::{Friendship, Message, UserId};

fn message_from_row(row: &SqliteRow) -> Result<Message, sqlx::Error> {
    Ok(Message {
        id: row.try_get("id")?,
        sender_id: row.try_get("sender_id")?,
        receiver_id: row.try_get("receiver_id")?,
        message: row.try_get("message")?,
        created_at: row.try_get("created_at")?,
    })
}

impl Store {
    pub async fn create_friendship(
        &self,
        from: UserId,
        to: UserId,
    ) -> Result<Friendship, StoreError> {
        if from == to {
            return Err(StoreError::InvalidInput(
                "You can't add yourself as a friend".to_string(),
            ));
        }

        if self.find_friendship(from, to).await?.is_some() {
            return Err(StoreError::Conflict("Friendship already exists".to_string()));
        }

        let from_user = self.get_user(from).await?;
        let to_user = self.get_user(to).await?;

        let result = sqlx::query("INSERT INTO friendships (from_id, to_id) VALUES (?, ?)")
            .bind(from)
            .bind(to)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::on_unique(e, "Friendship already exists"))?;

        Ok(Friendship {
            id: result.last_insert_rowid(),
            from,
            to,
            from_user: Some(from_user),
            to_user: Some(to_user),
        })
    }

    /// All friendships, or those involving `user_id` on either side
    pub async fn list_friendships(
        &self,
        user_id: Option<UserId>,
    ) -> Result<Vec<Friendship>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, from_id, to_id
            FROM friendships
            WHERE (? IS NULL OR from_id = ? OR to_id = ?)
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut friendships = Vec::with_capacity(rows.len());
        for row in &rows {
            friendships.push(self.friendship_from_row(row).await?);
        }

        Ok(friendships)
    }

    /// The friendship between two users, whichever side asked
    pub async fn find_friendship(
        &self,
        a: UserId,
        b: UserId,
    ) -> Result<Option<Friendship>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, from_id, to_id
            FROM friendships
            WHERE (from_id = ? AND to_id = ?) OR (from_id = ? AND to_id = ?)
            "#,
        )
        .bind(a)
        .bind(b)
        .bind(b)
        .bind(a)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.friendship_from_row(&row).await?)),
            None => Ok(None),
        }
    }

    async fn friendship_from_row(&self, row: &SqliteRow) -> Result<Friendship, StoreError> {
        let from: UserId = row.try_get("from_id")?;
        let to: UserId = row.try_get("to_id")?;

        Ok(Friendship {
            id: row.try_get("id")?,
            from,
            to,
            from_user: Some(self.get_user(from).await?),
            to_user: Some(self.get_user(to).await?),
        })
    }

    /// Sending a message to oneself is allowed
    pub async fn create_message(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        text: &str,
    ) -> Result<Message, StoreError> {
        if text.is_empty() {
            return Err(StoreError::InvalidInput("Message can't be empty".to_string()));
        }

        self.get_user(sender_id).await?;
        self.get_user(receiver_id).await?;

        let created_at = chrono::Utc::now();
        let result = sqlx::query(
            "INSERT INTO messages (sender_id, receiver_id, message, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(sender_id)
        .bind(receiver_id)
        .bind(text)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Message {
            id: result.last_insert_rowid(),
            sender_id,
            receiver_id,
            message: text.to_string(),
            created_at,
        })
    }

    pub async fn list_messages(&self) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, sender_id, receiver_id, message, created_at FROM messages ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| message_from_row(row).map_err(StoreError::from))
            .collect()
    }

    /// Messages exchanged between two users, both directions
    pub async fn conversation(&self, a: UserId, b: UserId) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender_id, receiver_id, message, created_at
            FROM messages
            WHERE (sender_id = ? AND receiver_id = ?) OR (sender_id = ? AND receiver_id = ?)
            ORDER BY id
            "#,
        )
        .bind(a)
        .bind(b)
        .bind(b)
        .bind(a)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| message_from_row(row).map_err(StoreError::from))
            .collect()
    }

    /// Every message sent or received by `user_id`
    pub async fn messages_of_user(&self, user_id: UserId) -> Result<Vec<Message>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, sender_id, receiver_id, message, created_at
            FROM messages
            WHERE sender_id = ? OR receiver_id = ?
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| message_from_row(row).map_err(StoreError::from))
            .collect()
    }
}
