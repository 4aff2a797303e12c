//! In-memory [`HeroApi`] used by the service and pipeline tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::{Hero, HeroId, NewHero},
    protocol::UpdateAck,
};

use crate::{HeroApi, HeroApiError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ApiCall {
    List(Option<String>),
    Get(HeroId),
    Create(String),
    Update(Hero),
    Delete(HeroId),
}

pub(crate) fn seed_heroes() -> Vec<Hero> {
    [
        (11, "Dr Nice"),
        (12, "Narco"),
        (13, "Bombasto"),
        (14, "Celeritas"),
        (15, "Magneta"),
        (16, "RubberMan"),
        (17, "Dynama"),
        (18, "Dr IQ"),
        (19, "Magma"),
        (20, "Tornado"),
    ]
    .into_iter()
    .map(|(id, name)| Hero::new(id, name))
    .collect()
}

#[derive(Clone)]
pub(crate) struct FakeHeroApi {
    heroes: Vec<Hero>,
    fail_with: Option<String>,
    search_delays: HashMap<String, Duration>,
    calls: Arc<Mutex<Vec<ApiCall>>>,
}

impl FakeHeroApi {
    pub(crate) fn seeded() -> Self {
        Self {
            heroes: seed_heroes(),
            fail_with: None,
            search_delays: HashMap::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn failing(err: impl Into<String>) -> Self {
        Self {
            fail_with: Some(err.into()),
            ..Self::seeded()
        }
    }

    /// Makes the lookup for `term` take `delay` before answering.
    pub(crate) fn with_search_delay(mut self, term: &str, delay: Duration) -> Self {
        self.search_delays.insert(term.to_string(), delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().expect("calls").clone()
    }

    pub(crate) fn search_terms(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ApiCall::List(Some(term)) => Some(term),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) -> Result<(), HeroApiError> {
        self.calls.lock().expect("calls").push(call);
        match &self.fail_with {
            Some(err) => Err(HeroApiError::Unavailable(err.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl HeroApi for FakeHeroApi {
    async fn list(&self, name: Option<&str>) -> Result<Vec<Hero>, HeroApiError> {
        self.record(ApiCall::List(name.map(str::to_string)))?;
        let Some(term) = name else {
            return Ok(self.heroes.clone());
        };

        if let Some(delay) = self.search_delays.get(term) {
            tokio::time::sleep(*delay).await;
        }
        let needle = term.to_lowercase();
        Ok(self
            .heroes
            .iter()
            .filter(|hero| hero.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn get(&self, id: HeroId) -> Result<Hero, HeroApiError> {
        self.record(ApiCall::Get(id))?;
        self.heroes
            .iter()
            .find(|hero| hero.id == id)
            .cloned()
            .ok_or_else(|| HeroApiError::Unavailable(format!("hero {id} not found")))
    }

    async fn create(&self, hero: &NewHero) -> Result<Hero, HeroApiError> {
        self.record(ApiCall::Create(hero.name.clone()))?;
        let next = self.heroes.iter().map(|h| h.id.0).max().unwrap_or(10) + 1;
        Ok(Hero::new(next, hero.name.clone()))
    }

    async fn update(&self, hero: &Hero) -> Result<UpdateAck, HeroApiError> {
        self.record(ApiCall::Update(hero.clone()))?;
        Ok(UpdateAck::empty())
    }

    async fn delete(&self, id: HeroId) -> Result<Option<Hero>, HeroApiError> {
        self.record(ApiCall::Delete(id))?;
        Ok(self.heroes.iter().find(|hero| hero.id == id).cloned())
    }
}
