//! Typed wrappers for the non-chat endpoints the desktop app calls.

use gemmatalk_types::{
    ChatError, Memory, MemoryDelete, MemoryUpdate, ModelList, Mood, MoodEntry, MoodRequest,
    MoodSummary, NO_SUMMARY_MESSAGE, SPECIAL_MEMORIES_TABLE,
};
use serde::de::DeserializeOwned;

use crate::client::ChatClient;
use crate::error::{check_status, map_reqwest_error};

impl ChatClient {
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ChatError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        let text = response.text().await.map_err(map_reqwest_error)?;
        serde_json::from_str(&text).map_err(|e| ChatError::Decode(format!("{path}: {e}")))
    }

    /// Model identifiers the backend can serve.
    pub async fn available_models(&self) -> Result<Vec<String>, ChatError> {
        let list: ModelList = self.get_json("/models").await?;
        Ok(list.available_models)
    }

    /// Log a mood for today's graph.
    pub async fn log_mood(&self, mood: Mood) -> Result<(), ChatError> {
        let url = self.url("/mood");
        let body = MoodRequest {
            graph: mood.graph_value(),
        };
        tracing::debug!(url = %url, graph = body.graph, "logging mood");
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(response).await?;
        Ok(())
    }

    /// Every logged mood, oldest first.
    pub async fn moods(&self) -> Result<Vec<MoodEntry>, ChatError> {
        self.get_json("/mood").await
    }

    /// Today's mood summary, or a fixed fallback when the backend has none.
    pub async fn mood_summary(&self) -> Result<String, ChatError> {
        let entries: Option<Vec<MoodSummary>> = self.get_json("/mood_summary").await?;
        Ok(entries
            .and_then(|entries| entries.into_iter().next())
            .map_or_else(|| NO_SUMMARY_MESSAGE.to_string(), |entry| entry.summary))
    }

    /// Stored special memories.
    pub async fn special_memories(&self) -> Result<Vec<Memory>, ChatError> {
        self.get_json("/special_memory").await
    }

    /// Save an edited memory.
    pub async fn update_memory(&self, update: &MemoryUpdate) -> Result<(), ChatError> {
        let url = self.url("/special_memory");
        tracing::debug!(url = %url, id = update.id, "updating memory");
        let response = self
            .client
            .put(&url)
            .json(update)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(response).await?;
        Ok(())
    }

    /// Delete a special memory.
    pub async fn delete_memory(&self, id: i64) -> Result<(), ChatError> {
        let url = self.url("/memory");
        let body = MemoryDelete {
            id,
            table: SPECIAL_MEMORIES_TABLE.into(),
        };
        tracing::debug!(url = %url, id, "deleting memory");
        let response = self
            .client
            .delete(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        check_status(response).await?;
        Ok(())
    }
}
