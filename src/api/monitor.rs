use crate::client::KnowbaseClient;
use crate::Result;
use serde_json::{json, Value};

pub struct MonitorApi<'a> {
    client: &'a KnowbaseClient,
}

impl<'a> MonitorApi<'a> {
    pub(crate) fn new(client: &'a KnowbaseClient) -> Self {
        Self { client }
    }

    pub async fn messages(&self) -> Result<Value> {
        Ok(self.client.transport.get("/api/monitor/messages").await?.into_data())
    }

    pub async fn add_message(&self, data: Value) -> Result<Value> {
        Ok(self.client.transport.post("/api/monitor/messages", data).await?.into_data())
    }

    pub async fn update_message(&self, id: i64, data: Value) -> Result<Value> {
        let path = format!("/api/monitor/messages/{}", id);
        Ok(self.client.transport.put(path, data).await?.into_data())
    }

    pub async fn clear_messages(&self) -> Result<Value> {
        Ok(self
            .client
            .transport
            .post("/api/monitor/messages/clear", json!({}))
            .await?
            .into_data())
    }
}
