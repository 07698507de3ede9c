use std::time::Duration;

use cardapio_shared::{
    DateRange, format_date,
    mealplan::{
        ActiveMealPlan, CopyWeekRequest, GenerateRequest, MealPlanEntry, MealPlanEntryPatch,
        NewMealPlanEntry, WeeklyPlanSummary,
    },
    suggestion::{MealSuggestion, SuggestionRequest},
    user::MealPlanPreferences,
};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder};
use serde::{Deserialize, de::DeserializeOwned};
use time::Date;
use url::Url;

use crate::{ApiError, MealPlanApi, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize, Clone)]
pub struct HttpApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl HttpApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

/// JSON-over-HTTP client for the meal-plan resource API.
#[derive(Clone, Debug)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &HttpApiConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        // Url::join drops the last path segment unless the base ends with '/'
        let mut base_url = config.base_url.trim().to_owned();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            client,
            base_url: Url::parse(&base_url)?,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<Option<String>>) -> Self {
        self.token = token.into();
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        let builder = self.client.request(method, url);

        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let bytes = self.execute(builder).await?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Vec<u8>> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();

        tracing::debug!(%method, %url, "sending api request");

        let response = self.client.execute(request).await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            return Ok(bytes.to_vec());
        }

        let message = extract_message(&bytes);
        tracing::warn!(
            %method,
            %url,
            status = status.as_u16(),
            message = message.as_deref().unwrap_or_default(),
            "api request rejected"
        );

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

/// Best-effort extraction of a human readable message from an error body.
///
/// Servers answer with `{"message": "..."}` or `{"error": "..."}`; plain text
/// bodies are used as is when short enough to be displayed.
pub fn extract_message(body: &[u8]) -> Option<String> {
    if body.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        return ["message", "error"]
            .iter()
            .find_map(|field| value.get(field).and_then(|v| v.as_str()))
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_owned);
    }

    let text = std::str::from_utf8(body).ok()?.trim();
    if text.is_empty() || text.len() > 200 || text.starts_with('<') {
        return None;
    }

    Some(text.to_owned())
}

#[async_trait::async_trait]
impl MealPlanApi for HttpApi {
    async fn list_entries(&self, user_id: &str, range: DateRange) -> Result<Vec<MealPlanEntry>> {
        let builder = self.request(Method::GET, "meal-plans")?.query(&[
            ("userId", user_id.to_owned()),
            ("startDate", format_date(range.start)),
            ("endDate", format_date(range.end)),
        ]);

        self.send(builder).await
    }

    async fn active_plan(&self, user_id: &str) -> Result<Option<ActiveMealPlan>> {
        let builder = self
            .request(Method::GET, "meal-plans/active")?
            .query(&[("userId", user_id)]);

        match self.send(builder).await {
            Err(err) if err.is_not_found() => Ok(None),
            res => res,
        }
    }

    async fn create_entry(&self, input: &NewMealPlanEntry) -> Result<MealPlanEntry> {
        let builder = self.request(Method::POST, "meal-plans")?.json(input);

        self.send(builder).await
    }

    async fn update_entry(&self, id: &str, patch: &MealPlanEntryPatch) -> Result<MealPlanEntry> {
        let builder = self
            .request(Method::PATCH, &format!("meal-plans/{id}"))?
            .json(patch);

        self.send(builder).await
    }

    async fn delete_entry(&self, id: &str) -> Result<()> {
        let builder = self.request(Method::DELETE, &format!("meal-plans/{id}"))?;
        self.execute(builder).await?;

        Ok(())
    }

    async fn generate(&self, input: &GenerateRequest) -> Result<Vec<MealPlanEntry>> {
        let builder = self
            .request(Method::POST, "meal-plans/generate")?
            .json(input);

        self.send(builder).await
    }

    async fn copy_week(&self, input: &CopyWeekRequest) -> Result<Vec<MealPlanEntry>> {
        let builder = self.request(Method::POST, "meal-plans/copy")?.json(input);

        self.send(builder).await
    }

    async fn weekly_summary(&self, user_id: &str, week_start: Date) -> Result<WeeklyPlanSummary> {
        let builder = self
            .request(Method::GET, "meal-plans/weekly")?
            .query(&[
                ("userId", user_id.to_owned()),
                ("weekStart", format_date(week_start)),
            ]);

        self.send(builder).await
    }

    async fn suggestions(&self, input: &SuggestionRequest) -> Result<Vec<MealSuggestion>> {
        let builder = self
            .request(Method::GET, "meal-plans/suggestions")?
            .query(&[
                ("userId", input.user_id.to_owned()),
                ("date", format_date(input.date)),
                ("mealType", input.meal_type.to_string()),
                ("limit", input.limit.to_string()),
            ]);

        self.send(builder).await
    }

    async fn preferences(&self, user_id: &str) -> Result<MealPlanPreferences> {
        let builder = self.request(
            Method::GET,
            &format!("users/{user_id}/meal-plan-preferences"),
        )?;

        self.send(builder).await
    }

    async fn save_preferences(
        &self,
        user_id: &str,
        preferences: &MealPlanPreferences,
    ) -> Result<MealPlanPreferences> {
        let builder = self
            .request(
                Method::PUT,
                &format!("users/{user_id}/meal-plan-preferences"),
            )?
            .json(preferences);

        self.send(builder).await
    }
}
