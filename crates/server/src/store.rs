use std::sync::Arc;

use shared::domain::{Hero, HeroId, NewHero};
use tokio::sync::RwLock;

/// First id handed out by an empty collection.
const FIRST_HERO_ID: i64 = 11;

const SEED_HEROES: [(i64, &str); 10] = [
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
];

pub fn seed_heroes() -> Vec<Hero> {
    SEED_HEROES
        .iter()
        .map(|(id, name)| Hero::new(*id, *name))
        .collect()
}

/// Next id for a new hero: one past the highest id, or 11 for an empty collection.
pub fn gen_id(heroes: &[Hero]) -> HeroId {
    heroes
        .iter()
        .map(|hero| hero.id.0 + 1)
        .max()
        .map(HeroId)
        .unwrap_or(HeroId(FIRST_HERO_ID))
}

/// In-memory hero collection shared by all request handlers.
#[derive(Clone, Default)]
pub struct HeroStore {
    heroes: Arc<RwLock<Vec<Hero>>>,
}

impl HeroStore {
    pub fn new(heroes: Vec<Hero>) -> Self {
        Self {
            heroes: Arc::new(RwLock::new(heroes)),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_heroes())
    }

    /// All heroes, or those whose name contains `name` ignoring case.
    pub async fn list(&self, name: Option<&str>) -> Vec<Hero> {
        let heroes = self.heroes.read().await;
        let Some(needle) = name.map(str::to_lowercase).filter(|n| !n.trim().is_empty()) else {
            return heroes.clone();
        };
        heroes
            .iter()
            .filter(|hero| hero.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: HeroId) -> Option<Hero> {
        self.heroes
            .read()
            .await
            .iter()
            .find(|hero| hero.id == id)
            .cloned()
    }

    pub async fn insert(&self, new_hero: NewHero) -> Hero {
        let mut heroes = self.heroes.write().await;
        let hero = Hero {
            id: gen_id(&heroes),
            name: new_hero.name,
        };
        heroes.push(hero.clone());
        hero
    }

    /// Replaces the stored hero with the same id. Returns `false` when unknown.
    pub async fn replace(&self, hero: Hero) -> bool {
        let mut heroes = self.heroes.write().await;
        match heroes.iter_mut().find(|stored| stored.id == hero.id) {
            Some(stored) => {
                *stored = hero;
                true
            }
            None => false,
        }
    }

    pub async fn remove(&self, id: HeroId) -> Option<Hero> {
        let mut heroes = self.heroes.write().await;
        let index = heroes.iter().position(|hero| hero.id == id)?;
        Some(heroes.remove(index))
    }

    pub async fn len(&self) -> usize {
        self.heroes.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gen_id_starts_at_eleven_and_follows_max() {
        assert_eq!(gen_id(&[]), HeroId(11));
        assert_eq!(gen_id(&seed_heroes()), HeroId(21));
        assert_eq!(
            gen_id(&[Hero::new(40, "a"), Hero::new(12, "b")]),
            HeroId(41)
        );
    }

    #[tokio::test]
    async fn list_filters_by_case_insensitive_substring() {
        let store = HeroStore::seeded();

        let names: Vec<String> = store
            .list(Some("DR"))
            .await
            .into_iter()
            .map(|hero| hero.name)
            .collect();
        assert_eq!(names, vec!["Dr Nice", "Dr IQ"]);

        assert_eq!(store.list(Some("  ")).await.len(), 10);
        assert_eq!(store.list(None).await.len(), 10);
    }

    #[tokio::test]
    async fn insert_replace_remove_cycle() {
        let store = HeroStore::new(Vec::new());

        let hero = store.insert(NewHero::new("Windstorm")).await;
        assert_eq!(hero, Hero::new(11, "Windstorm"));

        assert!(store.replace(hero.renamed("Whirlwind")).await);
        assert!(!store.replace(Hero::new(99, "Ghost")).await);
        assert_eq!(
            store.get(HeroId(11)).await.map(|hero| hero.name),
            Some("Whirlwind".to_string())
        );

        assert_eq!(
            store.remove(HeroId(11)).await,
            Some(Hero::new(11, "Whirlwind"))
        );
        assert_eq!(store.remove(HeroId(11)).await, None);
        assert_eq!(store.len().await, 0);
    }
}
