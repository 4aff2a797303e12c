use crate::{
    domain::{Hero, HeroId, NewHero},
    error::{ApiError, ErrorCode},
    protocol::UpdateAck,
};

#[test]
fn hero_serializes_with_bare_integer_id() {
    let hero = Hero::new(11, "Dr Nice");
    let json = serde_json::to_value(&hero).expect("json");
    assert_eq!(json, serde_json::json!({ "id": 11, "name": "Dr Nice" }));

    let back: Hero = serde_json::from_value(json).expect("hero");
    assert_eq!(back, hero);
}

#[test]
fn hero_and_bare_id_resolve_to_same_hero_id() {
    let hero = Hero::new(42, "X");
    assert_eq!(HeroId::from(&hero), HeroId(42));
    assert_eq!(HeroId::from(hero), HeroId::from(42));
}

#[test]
fn renamed_keeps_identifier() {
    let hero = Hero::new(13, "Bombasto");
    let renamed = hero.renamed("Bombastic");
    assert_eq!(renamed.id, hero.id);
    assert_eq!(renamed.name, "Bombastic");
}

#[test]
fn new_hero_has_no_id_field() {
    let json = serde_json::to_value(NewHero::new("Celeritas")).expect("json");
    assert_eq!(json, serde_json::json!({ "name": "Celeritas" }));
}

#[test]
fn update_ack_is_transparent_json() {
    let ack: UpdateAck = serde_json::from_str(r#"{"ok":true}"#).expect("ack");
    assert!(!ack.is_empty());
    assert!(UpdateAck::empty().is_empty());
}

#[test]
fn api_error_code_uses_snake_case() {
    let err = ApiError::not_found("hero 99 not found");
    let json = serde_json::to_value(&err).expect("json");
    assert_eq!(json["code"], "not_found");

    let back: ApiError = serde_json::from_value(json).expect("api error");
    assert_eq!(back.code, ErrorCode::NotFound);
    assert_eq!(back.to_string(), "NotFound: hero 99 not found");
}

#[test]
fn error_codes_cover_only_rejections_the_api_makes() {
    let code: ErrorCode = serde_json::from_str(r#""validation""#).expect("code");
    assert_eq!(code, ErrorCode::Validation);
    assert!(serde_json::from_str::<ErrorCode>(r#""internal""#).is_err());
}
