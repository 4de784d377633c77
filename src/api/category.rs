use crate::client::KnowbaseClient;
use crate::Result;
use serde_json::Value;

pub struct CategoryApi<'a> {
    client: &'a KnowbaseClient,
}

impl<'a> CategoryApi<'a> {
    pub(crate) fn new(client: &'a KnowbaseClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Value> {
        Ok(self.client.transport.get("/api/categories").await?.into_data())
    }

    pub async fn create(&self, data: Value) -> Result<Value> {
        Ok(self.client.transport.post("/api/categories", data).await?.into_data())
    }

    pub async fn update(&self, id: i64, data: Value) -> Result<Value> {
        let path = format!("/api/categories/{}", id);
        Ok(self.client.transport.put(path, data).await?.into_data())
    }

    pub async fn delete(&self, id: i64) -> Result<Value> {
        let path = format!("/api/categories/{}", id);
        Ok(self.client.transport.delete(path).await?.into_data())
    }
}
