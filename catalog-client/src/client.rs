use crate::config::ClientConfig;
use async_trait::async_trait;
use lessoncraft_catalog_filter::CatalogSearch;
use lessoncraft_catalog_filter::ConfigError;
use lessoncraft_catalog_filter::QueryParams;
use lessoncraft_catalog_filter::SearchError;
use lessoncraft_catalog_protocol::Card;
use lessoncraft_catalog_protocol::CardId;
use lessoncraft_catalog_protocol::CardsResponse;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Talks to `GET {base}/cards/` and `GET {base}/cards/{id}/`.
#[derive(Clone, Debug)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpCatalogClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let base_url = config.parsed_base_url()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| ConfigError::Invalid(format!("http client: {err}")))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn list_cards(&self, params: &QueryParams) -> Result<Vec<Card>, SearchError> {
        let url = self.endpoint("cards/")?;
        let query: Vec<(&str, &str)> = params.iter().collect();
        debug!(%url, query = %params, "listing cards");
        let response: CardsResponse = self.get_json(self.http.get(url).query(&query)).await?;
        Ok(response.into_cards())
    }

    pub async fn get_card(&self, id: CardId) -> Result<Card, SearchError> {
        let url = self.endpoint(&format!("cards/{id}/"))?;
        debug!(%url, "fetching card");
        self.get_json(self.http.get(url)).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, SearchError> {
        self.base_url
            .join(path)
            .map_err(|err| SearchError::Transport(format!("bad endpoint `{path}`: {err}")))
    }

    async fn get_json<T>(&self, request: reqwest::RequestBuilder) -> Result<T, SearchError>
    where
        T: DeserializeOwned,
    {
        let resp = request
            .send()
            .await
            .map_err(|err| SearchError::Transport(err.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchError::Status { status, body });
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|err| SearchError::Transport(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| SearchError::Decode(err.to_string()))
    }
}

#[async_trait]
impl CatalogSearch for HttpCatalogClient {
    async fn search(&self, params: &QueryParams) -> Result<Vec<Card>, SearchError> {
        self.list_cards(params).await
    }
}
