use crate::client::KnowbaseClient;
use crate::transport::RequestSpec;
use crate::Result;
use serde_json::{json, Value};

pub struct ChatApi<'a> {
    client: &'a KnowbaseClient,
}

impl<'a> ChatApi<'a> {
    pub(crate) fn new(client: &'a KnowbaseClient) -> Self {
        Self { client }
    }

    pub async fn conversations(&self) -> Result<Value> {
        Ok(self.client.transport.get("/api/chat/conversations").await?.into_data())
    }

    pub async fn create_conversation(&self, data: Value) -> Result<Value> {
        Ok(self
            .client
            .transport
            .post("/api/chat/conversations", data)
            .await?
            .into_data())
    }

    pub async fn delete_conversation(&self, id: i64) -> Result<Value> {
        let path = format!("/api/chat/conversations/{}", id);
        Ok(self.client.transport.delete(path).await?.into_data())
    }

    pub async fn messages(&self, conversation_id: i64, params: Option<Value>) -> Result<Value> {
        let path = format!("/api/chat/conversations/{}/messages", conversation_id);
        let params = params.unwrap_or_else(|| json!({}));
        Ok(self.client.transport.get_with(path, params).await?.into_data())
    }

    /// Send a chat message. The server may fetch linked pages before it
    /// answers, so this uses the long deadline.
    pub async fn send_message(&self, data: Value) -> Result<Value> {
        let spec = RequestSpec::post("/api/chat")
            .payload(data)
            .timeout(self.client.config.long_request_timeout);
        Ok(self.client.transport.dispatch(spec).await?.into_data())
    }

    pub async fn delete_message(&self, message_id: i64) -> Result<Value> {
        let path = format!("/api/chat/messages/{}", message_id);
        Ok(self.client.transport.delete(path).await?.into_data())
    }

    /// Point a message at its uploaded file. `file_type` defaults to `image`.
    pub async fn update_message_file(
        &self,
        message_id: i64,
        file_url: &str,
        file_type: Option<&str>,
    ) -> Result<Value> {
        let path = format!("/api/chat/messages/{}/file", message_id);
        let payload = json!({
            "fileUrl": file_url,
            "fileType": file_type.unwrap_or("image"),
        });
        Ok(self.client.transport.put(path, payload).await?.into_data())
    }

    pub async fn save_to_knowledge(&self, data: Value) -> Result<Value> {
        Ok(self
            .client
            .transport
            .post("/api/knowledge/from-chat", data)
            .await?
            .into_data())
    }
}
