//! Story: as a lark owner I want a parking space for my car so that I can
//! park my lark.

use parkyourlark_core::{
    AdminService, AdminServiceError, DataAccess, InMemoryDataAccess, Level, LevelSpace,
    ParseError,
};

struct Scenario {
    service: AdminService<InMemoryDataAccess>,
    outcome: Option<Result<bool, AdminServiceError>>,
}

impl Scenario {
    fn new() -> Self {
        Self {
            service: AdminService::new(InMemoryDataAccess::new()),
            outcome: None,
        }
    }

    fn given_level_does_not_exist(self, level_id: &str) -> Self {
        let levels = self.service.levels().unwrap();
        assert!(levels.iter().all(|level| level.id != level_id));
        self
    }

    fn given_level_exists(self, level_id: &str) -> Self {
        self.service.store().add(&Level::new(level_id)).unwrap();
        self
    }

    fn when_the_administrator_adds_space_to_level(mut self, space: &str, level: &str) -> Self {
        let body = serde_json::json!({ "Space": space, "Level": level }).to_string();
        self.outcome = Some(
            self.service
                .register_space(body.as_bytes())
                .map(|registration| registration.level_created),
        );
        self
    }

    fn when_the_administrator_sends(mut self, body: &str) -> Self {
        self.outcome = Some(
            self.service
                .register_space(body.as_bytes())
                .map(|registration| registration.level_created),
        );
        self
    }

    fn then_level_exists_once(self, level_id: &str) -> Self {
        let matching = self
            .service
            .levels()
            .unwrap()
            .into_iter()
            .filter(|level| level.id == level_id)
            .count();
        assert_eq!(matching, 1, "level {level_id} should be stored exactly once");
        self
    }

    fn then_space_on_level_exists(self, space: &str, level_id: &str, times: usize) -> Self {
        let expected = LevelSpace::new(Level::new(level_id), space);
        let matching = self
            .service
            .level_spaces()
            .unwrap()
            .into_iter()
            .filter(|level_space| *level_space == expected)
            .count();
        assert_eq!(matching, times);
        self
    }

    fn then_level_was_created(self, created: bool) -> Self {
        match &self.outcome {
            Some(Ok(level_created)) => assert_eq!(*level_created, created),
            other => panic!("expected a successful registration, got {other:?}"),
        }
        self
    }

    fn then_parsing_failed(self) -> Self {
        assert!(matches!(
            self.outcome,
            Some(Err(AdminServiceError::Parse(ParseError::Shape(_))))
        ));
        self
    }

    fn then_store_is_empty(self) {
        assert!(self.service.levels().unwrap().is_empty());
        assert!(self.service.level_spaces().unwrap().is_empty());
    }
}

#[test]
fn level_is_created_if_it_does_not_exist() {
    Scenario::new()
        .given_level_does_not_exist("L1")
        .when_the_administrator_adds_space_to_level("S1", "L1")
        .then_level_was_created(true)
        .then_level_exists_once("L1")
        .then_space_on_level_exists("S1", "L1", 1);
}

#[test]
fn existing_level_is_not_created_again() {
    Scenario::new()
        .given_level_exists("L1")
        .when_the_administrator_adds_space_to_level("S1", "L1")
        .then_level_was_created(false)
        .then_level_exists_once("L1")
        .then_space_on_level_exists("S1", "L1", 1);
}

#[test]
fn registering_the_same_space_twice_stores_two_associations() {
    Scenario::new()
        .given_level_does_not_exist("L1")
        .when_the_administrator_adds_space_to_level("S1", "L1")
        .when_the_administrator_adds_space_to_level("S1", "L1")
        .then_level_was_created(false)
        .then_level_exists_once("L1")
        .then_space_on_level_exists("S1", "L1", 2);
}

#[test]
fn empty_space_identifier_is_accepted() {
    Scenario::new()
        .when_the_administrator_adds_space_to_level("", "L1")
        .then_level_was_created(true)
        .then_space_on_level_exists("", "L1", 1);
}

#[test]
fn malformed_payload_does_not_touch_the_store() {
    Scenario::new()
        .when_the_administrator_sends(r#"{"Space":"S1"}"#)
        .then_parsing_failed()
        .then_store_is_empty();
}

#[test]
fn many_levels_and_spaces_are_counted_per_call() {
    let service = AdminService::new(InMemoryDataAccess::new());
    let pairs = [("S1", "L1"), ("S2", "L1"), ("S1", "L2"), ("S3", "L1")];

    let created = pairs
        .iter()
        .map(|(space, level)| {
            let body = serde_json::json!({ "Space": space, "Level": level }).to_string();
            service.register_space(body.as_bytes()).unwrap().level_created
        })
        .collect::<Vec<_>>();

    assert_eq!(created, vec![true, false, true, false]);
    assert_eq!(
        service.levels().unwrap(),
        vec![Level::new("L1"), Level::new("L2")]
    );
    assert_eq!(service.level_spaces().unwrap().len(), pairs.len());
    assert_eq!(service.spaces_on_level("L1").unwrap().len(), 3);
}
