use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Hero, HeroId, NewHero},
    error::ApiError,
    protocol::{UpdateAck, HEROES_PATH},
};
use tracing::debug;
use url::Url;

use crate::{error::HeroApiError, HeroApi};

const JSON_CONTENT_TYPE: &str = "application/json";

/// [`HeroApi`] over HTTP against the `/api/heroes` collection.
#[derive(Clone)]
pub struct HttpHeroApi {
    http: Client,
    collection: Url,
}

impl HttpHeroApi {
    pub fn new(server_url: &str) -> Result<Self, HeroApiError> {
        Self::with_client(server_url, Client::new())
    }

    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self, HeroApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Self::with_client(server_url, http)
    }

    pub fn with_client(server_url: &str, http: Client) -> Result<Self, HeroApiError> {
        let mut base = Url::parse(server_url.trim())?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let collection = base.join(HEROES_PATH.trim_start_matches('/'))?;
        Ok(Self { http, collection })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    fn item_url(&self, id: HeroId) -> Url {
        let mut url = self.collection.clone();
        let path = format!("{}/{id}", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url
    }

    fn search_url(&self, term: &str) -> Url {
        // Mirrors `api/heroes/?name=term`.
        let mut url = self.collection.clone();
        let path = format!("{}/", url.path().trim_end_matches('/'));
        url.set_path(&path);
        url.query_pairs_mut().append_pair("name", term);
        url
    }
}

#[async_trait]
impl HeroApi for HttpHeroApi {
    async fn list(&self, name: Option<&str>) -> Result<Vec<Hero>, HeroApiError> {
        let url = match name {
            Some(term) => self.search_url(term),
            None => self.collection.clone(),
        };
        debug!(%url, "GET heroes");
        let res = self.http.get(url).send().await?;
        read_json(res).await
    }

    async fn get(&self, id: HeroId) -> Result<Hero, HeroApiError> {
        let url = self.item_url(id);
        debug!(%url, "GET hero");
        let res = self.http.get(url).send().await?;
        read_json(res).await
    }

    async fn create(&self, hero: &NewHero) -> Result<Hero, HeroApiError> {
        let res = self
            .http
            .post(self.collection.clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(hero)
            .send()
            .await?;
        read_json(res).await
    }

    async fn update(&self, hero: &Hero) -> Result<UpdateAck, HeroApiError> {
        let res = self
            .http
            .put(self.collection.clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .json(hero)
            .send()
            .await?;
        Ok(read_optional_json(res).await?.unwrap_or_else(UpdateAck::empty))
    }

    async fn delete(&self, id: HeroId) -> Result<Option<Hero>, HeroApiError> {
        let res = self
            .http
            .delete(self.item_url(id))
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .send()
            .await?;
        read_optional_json(res).await
    }
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, HeroApiError> {
    let body = checked_body(res).await?;
    Ok(serde_json::from_slice(&body)?)
}

async fn read_optional_json<T: DeserializeOwned>(
    res: Response,
) -> Result<Option<T>, HeroApiError> {
    let body = checked_body(res).await?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(Some(serde_json::from_slice(&body)?))
}

async fn checked_body(res: Response) -> Result<Vec<u8>, HeroApiError> {
    let status = res.status();
    let body = res.bytes().await?.to_vec();
    if status.is_success() {
        return Ok(body);
    }

    let message = match serde_json::from_slice::<ApiError>(&body) {
        Ok(api_error) => api_error.message,
        Err(_) => String::from_utf8_lossy(&body).trim().to_string(),
    };
    Err(HeroApiError::Status { status, message })
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
