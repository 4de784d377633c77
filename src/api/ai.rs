use crate::client::KnowbaseClient;
use crate::Result;
use serde_json::{json, Value};

pub struct AiApi<'a> {
    client: &'a KnowbaseClient,
}

impl<'a> AiApi<'a> {
    pub(crate) fn new(client: &'a KnowbaseClient) -> Self {
        Self { client }
    }

    /// Chat with retrieval over the user's knowledge base. Model settings
    /// the caller omits come from [`crate::config::AiDefaults`].
    pub async fn chat(&self, mut data: Value) -> Result<Value> {
        self.client.config.ai.apply_to(&mut data);
        Ok(self.client.transport.post("/api/ai/chat", data).await?.into_data())
    }

    pub async fn summarize(&self, content: &str) -> Result<Value> {
        self.content_call("/api/ai/summarize", content).await
    }

    pub async fn generate_tags(&self, content: &str) -> Result<Value> {
        self.content_call("/api/ai/generate-tags", content).await
    }

    pub async fn organize(&self, content: &str) -> Result<Value> {
        self.content_call("/api/ai/organize", content).await
    }

    pub async fn search(&self, query: &str) -> Result<Value> {
        Ok(self
            .client
            .transport
            .post("/api/ai/search", json!({ "query": query }))
            .await?
            .into_data())
    }

    async fn content_call(&self, path: &str, content: &str) -> Result<Value> {
        Ok(self
            .client
            .transport
            .post(path, json!({ "content": content }))
            .await?
            .into_data())
    }
}
