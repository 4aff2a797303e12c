use shared::{
    domain::{Hero, HeroId, NewHero},
    error::ApiError,
    protocol::HeroQuery,
};

use crate::store::HeroStore;

/// Longest name accepted for a hero.
pub const MAX_NAME_CHARS: usize = 64;

#[derive(Clone)]
pub struct ApiContext {
    pub store: HeroStore,
}

pub async fn list_heroes(ctx: &ApiContext, query: &HeroQuery) -> Vec<Hero> {
    ctx.store.list(query.name.as_deref()).await
}

pub async fn get_hero(ctx: &ApiContext, id: HeroId) -> Result<Hero, ApiError> {
    ctx.store.get(id).await.ok_or_else(|| hero_not_found(id))
}

pub async fn create_hero(ctx: &ApiContext, new_hero: NewHero) -> Result<Hero, ApiError> {
    let name = validate_name(&new_hero.name)?;
    Ok(ctx.store.insert(NewHero { name }).await)
}

pub async fn update_hero(ctx: &ApiContext, hero: Hero) -> Result<(), ApiError> {
    let name = validate_name(&hero.name)?;
    let id = hero.id;
    if ctx.store.replace(Hero { id, name }).await {
        Ok(())
    } else {
        Err(hero_not_found(id))
    }
}

pub async fn delete_hero(ctx: &ApiContext, id: HeroId) -> Result<Hero, ApiError> {
    ctx.store.remove(id).await.ok_or_else(|| hero_not_found(id))
}

fn validate_name(raw: &str) -> Result<String, ApiError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ApiError::validation("hero name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(ApiError::validation(format!(
            "hero name exceeds {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(name.to_string())
}

fn hero_not_found(id: HeroId) -> ApiError {
    ApiError::not_found(format!("hero {id} not found"))
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
