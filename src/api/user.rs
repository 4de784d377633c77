use crate::auth::Credentials;
use crate::client::KnowbaseClient;
use crate::envelope::ResponseEnvelope;
use crate::Result;
use serde_json::Value;

pub struct UserApi<'a> {
    client: &'a KnowbaseClient,
}

impl<'a> UserApi<'a> {
    pub(crate) fn new(client: &'a KnowbaseClient) -> Self {
        Self { client }
    }

    /// Log in and persist the returned token and user profile.
    pub async fn login(&self, credentials: &Credentials) -> Result<ResponseEnvelope> {
        self.client
            .auth
            .login_and_store(&self.client.transport, credentials)
            .await
    }

    /// Forget the local session.
    pub fn logout(&self) {
        self.client.auth.clear_session();
    }

    pub async fn register(&self, data: Value) -> Result<Value> {
        Ok(self.client.transport.post("/api/user/register", data).await?.into_data())
    }

    pub async fn info(&self) -> Result<Value> {
        Ok(self.client.transport.get("/api/user/info").await?.into_data())
    }

    pub async fn stats(&self) -> Result<Value> {
        Ok(self.client.transport.get("/api/user/stats").await?.into_data())
    }

    pub async fn update_settings(&self, data: Value) -> Result<Value> {
        Ok(self.client.transport.post("/api/user/settings", data).await?.into_data())
    }

    pub async fn save_ai_config(&self, data: Value) -> Result<Value> {
        Ok(self.client.transport.post("/api/user/ai-config", data).await?.into_data())
    }

    pub async fn ai_config(&self) -> Result<Value> {
        Ok(self.client.transport.get("/api/user/ai-config").await?.into_data())
    }

    /// AI usage over the last `days` days.
    pub async fn ai_usage(&self, days: u32) -> Result<Value> {
        let path = format!("/api/user/ai-usage?days={}", days);
        Ok(self.client.transport.get(path).await?.into_data())
    }

    /// Nickname and avatar.
    pub async fn update_profile(&self, data: Value) -> Result<Value> {
        Ok(self.client.transport.post("/api/user/profile", data).await?.into_data())
    }

    pub async fn change_password(&self, data: Value) -> Result<Value> {
        Ok(self.client.transport.post("/api/user/password", data).await?.into_data())
    }
}
