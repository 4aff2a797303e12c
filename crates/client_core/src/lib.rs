use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{Hero, HeroId, NewHero},
    protocol::UpdateAck,
};
use tracing::{error, info};

pub mod error;
pub mod messages;
pub mod search;
pub mod transport;

pub use error::HeroApiError;
pub use messages::{MessageService, MessageSink, StatusMessage};
pub use search::{HeroSearch, SearchResults, SearchTerms, SEARCH_DEBOUNCE};
pub use transport::HttpHeroApi;

/// Number of heroes shown on the dashboard, after skipping the first one.
pub const DASHBOARD_SIZE: usize = 4;

/// Remote hero collection. Implementations report every failure; the
/// service decides what the caller sees.
#[async_trait]
pub trait HeroApi: Send + Sync {
    /// Lists the collection, optionally filtered by a name substring.
    async fn list(&self, name: Option<&str>) -> Result<Vec<Hero>, HeroApiError>;
    async fn get(&self, id: HeroId) -> Result<Hero, HeroApiError>;
    async fn create(&self, hero: &NewHero) -> Result<Hero, HeroApiError>;
    async fn update(&self, hero: &Hero) -> Result<UpdateAck, HeroApiError>;
    /// Deletes by id. The server may echo the removed record or answer empty.
    async fn delete(&self, id: HeroId) -> Result<Option<Hero>, HeroApiError>;
}

pub struct MissingHeroApi;

#[async_trait]
impl HeroApi for MissingHeroApi {
    async fn list(&self, _name: Option<&str>) -> Result<Vec<Hero>, HeroApiError> {
        Err(HeroApiError::Unavailable("no hero api configured".into()))
    }

    async fn get(&self, id: HeroId) -> Result<Hero, HeroApiError> {
        Err(HeroApiError::Unavailable(format!(
            "no hero api configured for hero {id}"
        )))
    }

    async fn create(&self, _hero: &NewHero) -> Result<Hero, HeroApiError> {
        Err(HeroApiError::Unavailable("no hero api configured".into()))
    }

    async fn update(&self, hero: &Hero) -> Result<UpdateAck, HeroApiError> {
        Err(HeroApiError::Unavailable(format!(
            "no hero api configured for hero {}",
            hero.id
        )))
    }

    async fn delete(&self, id: HeroId) -> Result<Option<Hero>, HeroApiError> {
        Err(HeroApiError::Unavailable(format!(
            "no hero api configured for hero {id}"
        )))
    }
}

/// Data access for heroes.
///
/// No operation here can fail from the caller's point of view. A failed
/// remote call is logged, reported to the message sink, and replaced by the
/// operation's fallback value (empty list or `None`). Every call reports
/// exactly one status message.
#[derive(Clone)]
pub struct HeroService {
    api: Arc<dyn HeroApi>,
    messages: Arc<dyn MessageSink>,
}

impl HeroService {
    pub fn new(api: Arc<dyn HeroApi>, messages: Arc<dyn MessageSink>) -> Self {
        Self { api, messages }
    }

    pub fn new_http(
        server_url: &str,
        messages: Arc<dyn MessageSink>,
    ) -> Result<Self, HeroApiError> {
        Ok(Self::new(Arc::new(HttpHeroApi::new(server_url)?), messages))
    }

    pub async fn get_heroes(&self) -> Vec<Hero> {
        let result = self.api.list(None).await;
        self.settle("get_heroes", result, Vec::new(), |_| {
            "fetched heroes".to_string()
        })
    }

    /// Heroes for the dashboard: positions `1..=count` of the full list.
    pub async fn top_heroes(&self, count: usize) -> Vec<Hero> {
        self.get_heroes()
            .await
            .into_iter()
            .skip(1)
            .take(count)
            .collect()
    }

    pub async fn get_hero(&self, id: HeroId) -> Option<Hero> {
        let result = self.api.get(id).await.map(Some);
        self.settle(&format!("get_hero id={id}"), result, None, |_| {
            format!("fetched hero id={id}")
        })
    }

    pub async fn add_hero(&self, hero: NewHero) -> Option<Hero> {
        let result = self.api.create(&hero).await.map(Some);
        self.settle("add_hero", result, None, |created| match created {
            Some(created) => format!("added hero w/ id={}", created.id),
            None => "added hero".to_string(),
        })
    }

    pub async fn update_hero(&self, hero: &Hero) -> Option<UpdateAck> {
        let id = hero.id;
        let result = self.api.update(hero).await.map(Some);
        self.settle("update_hero", result, None, |_| {
            format!("updated hero id={id}")
        })
    }

    /// Accepts a hero or a bare id; both resolve to a delete by id.
    pub async fn delete_hero(&self, hero: impl Into<HeroId>) -> Option<Hero> {
        let id = hero.into();
        let result = self.api.delete(id).await;
        self.settle("delete_hero", result, None, |_| {
            format!("deleted hero id={id}")
        })
    }

    /// Heroes whose name contains `term`. A blank term answers empty without
    /// contacting the server.
    pub async fn search_heroes(&self, term: &str) -> Vec<Hero> {
        if term.trim().is_empty() {
            self.log("skipped search for blank term");
            return Vec::new();
        }

        let result = self.api.list(Some(term)).await;
        self.settle("search_heroes", result, Vec::new(), |heroes| {
            if heroes.is_empty() {
                format!("no heroes matching \"{term}\"")
            } else {
                format!("found heroes matching \"{term}\"")
            }
        })
    }

    fn settle<T>(
        &self,
        operation: &str,
        result: Result<T, HeroApiError>,
        fallback: T,
        describe: impl FnOnce(&T) -> String,
    ) -> T {
        match result {
            Ok(value) => {
                let message = describe(&value);
                info!(operation, "{message}");
                self.log(message);
                value
            }
            Err(error) => {
                error!(operation, %error, "hero api call failed; using fallback");
                self.log(format!("{operation} failed: {error}"));
                fallback
            }
        }
    }

    fn log(&self, message: impl AsRef<str>) {
        self.messages.add(format!("HeroService: {}", message.as_ref()));
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
