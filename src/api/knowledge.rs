use crate::client::KnowbaseClient;
use crate::Result;
use serde_json::Value;

pub struct KnowledgeApi<'a> {
    client: &'a KnowbaseClient,
}

impl<'a> KnowledgeApi<'a> {
    pub(crate) fn new(client: &'a KnowbaseClient) -> Self {
        Self { client }
    }

    /// Paged listing; `params` fields (page, category_id, ...) go into the query string.
    pub async fn list(&self, params: Value) -> Result<Value> {
        Ok(self.client.transport.get_with("/api/knowledge", params).await?.into_data())
    }

    pub async fn detail(&self, id: i64) -> Result<Value> {
        let path = format!("/api/knowledge/{}", id);
        Ok(self.client.transport.get(path).await?.into_data())
    }

    pub async fn create(&self, data: Value) -> Result<Value> {
        Ok(self.client.transport.post("/api/knowledge", data).await?.into_data())
    }

    pub async fn update(&self, id: i64, data: Value) -> Result<Value> {
        let path = format!("/api/knowledge/{}", id);
        Ok(self.client.transport.put(path, data).await?.into_data())
    }

    pub async fn delete(&self, id: i64) -> Result<Value> {
        let path = format!("/api/knowledge/{}", id);
        Ok(self.client.transport.delete(path).await?.into_data())
    }

    /// Semantic or keyword search, chosen server-side from `params`.
    pub async fn search(&self, params: Value) -> Result<Value> {
        Ok(self.client.transport.post("/api/knowledge/search", params).await?.into_data())
    }
}
