use std::collections::HashMap;

use super::Database;
use crate::search::{diff_words, intersect, score_query, set_of_words, SearchKind};

fn entity_table(kind: SearchKind) -> &'static str {
    match kind {
        SearchKind::Team => "teams",
        SearchKind::Tournament => "tournaments",
        SearchKind::User => "users",
    }
}

impl Database {
    // ── Inverted index ────────────────────────────────────────────────

    async fn add_word(&self, kind: SearchKind, word: &str, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT OR IGNORE INTO search_words (kind, word, entity_id) VALUES (?, ?, ?)")
            .bind(kind.as_str())
            .bind(word)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_word(&self, kind: SearchKind, word: &str, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM search_words WHERE kind = ? AND word = ? AND entity_id = ?")
            .bind(kind.as_str())
            .bind(word)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Add `id` to the posting list of every word of `name`.
    pub async fn index_words(&self, kind: SearchKind, id: i64, name: &str) -> Result<(), sqlx::Error> {
        for word in set_of_words(name) {
            self.add_word(kind, &word, id).await?;
        }
        Ok(())
    }

    /// Move `id` from the words only in `old` to the words only in `new`.
    pub async fn reindex_words(
        &self,
        kind: SearchKind,
        id: i64,
        old: &str,
        new: &str,
    ) -> Result<(), sqlx::Error> {
        let diff = diff_words(old, new);
        for word in &diff.removed {
            self.remove_word(kind, word, id).await?;
        }
        for word in &diff.added {
            self.add_word(kind, word, id).await?;
        }
        Ok(())
    }

    pub async fn unindex_words(&self, kind: SearchKind, id: i64, name: &str) -> Result<(), sqlx::Error> {
        for word in set_of_words(name) {
            self.remove_word(kind, &word, id).await?;
        }
        Ok(())
    }

    /// Number of distinct words indexed for a kind.
    pub async fn word_count(&self, kind: SearchKind) -> Result<usize, sqlx::Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT word) FROM search_words WHERE kind = ?")
                .bind(kind.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(count as usize)
    }

    pub async fn word_postings(&self, kind: SearchKind, word: &str) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT entity_id FROM search_words WHERE kind = ? AND word = ? ORDER BY entity_id",
        )
        .bind(kind.as_str())
        .bind(word)
        .fetch_all(&self.pool)
        .await
    }

    /// Ids matching every word of `query`, best tf-idf match first.
    pub async fn search_ids(&self, kind: SearchKind, query: &str) -> Result<Vec<i64>, sqlx::Error> {
        let words = set_of_words(query);
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let mut postings = Vec::with_capacity(words.len());
        let mut doc_freq = HashMap::new();
        for word in &words {
            let ids = self.word_postings(kind, word).await?;
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            doc_freq.insert(word.clone(), ids.len());
            postings.push(ids);
        }

        let ids = intersect(&postings);
        let sql = format!("SELECT keyname FROM {} WHERE id = ?", entity_table(kind));
        let mut candidates = Vec::with_capacity(ids.len());
        for id in ids {
            let name: Option<String> = sqlx::query_scalar(&sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            if let Some(name) = name {
                candidates.push((id, name));
            }
        }

        let word_count = self.word_count(kind).await?;
        Ok(score_query(query, &candidates, word_count, &doc_freq))
    }
}
