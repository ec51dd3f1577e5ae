//! Parking administration use-case service.
//!
//! # Responsibility
//! - Register a space on a level, creating the level on first use.
//! - Expose read access to registered levels and spaces.
//!
//! # Invariants
//! - Each registration inserts zero or one `Level` and exactly one `LevelSpace`.
//! - A level id is stored at most once, even under concurrent registrations.
//! - A failed registration stores nothing, not even a newly seen level.
//! - Registrations are not deduplicated: the same pair twice is stored twice.
//! - A payload that fails to parse never reaches the store.

use crate::model::level::{Level, LevelSpace};
use crate::parser::request_parser::{JsonRequestParser, ParseError, RequestParser};
use crate::repo::data_access::{DataAccess, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for admin use cases.
#[derive(Debug)]
pub enum AdminServiceError {
    /// Request payload could not be decoded.
    Parse(ParseError),
    /// Store failure, passed through unchanged.
    Store(StoreError),
}

impl Display for AdminServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AdminServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ParseError> for AdminServiceError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<StoreError> for AdminServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Outcome of one space registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// The association that was stored.
    pub level_space: LevelSpace,
    /// Whether this call inserted the level record.
    pub level_created: bool,
}

/// Admin service over injected store and parser implementations.
pub struct AdminService<D: DataAccess, P: RequestParser = JsonRequestParser> {
    store: D,
    parser: P,
}

impl<D: DataAccess> AdminService<D> {
    /// Creates a service that decodes JSON request bodies.
    pub fn new(store: D) -> Self {
        Self::with_parser(store, JsonRequestParser)
    }
}

impl<D: DataAccess, P: RequestParser> AdminService<D, P> {
    pub fn with_parser(store: D, parser: P) -> Self {
        Self { store, parser }
    }

    /// Returns the injected store.
    pub fn store(&self) -> &D {
        &self.store
    }

    /// Registers the space described by a raw request payload.
    ///
    /// # Contract
    /// - Parses the payload exactly once.
    /// - Inserts the level only if no level with the same id is stored.
    /// - Always inserts the level-space association.
    ///
    /// # Errors
    /// - `Parse` for malformed payloads; the store is not touched.
    /// - `Store` when the store write fails; neither record is kept.
    pub fn register_space(&self, payload: &[u8]) -> Result<Registration, AdminServiceError> {
        let level_space = match self.parser.parse(payload) {
            Ok(level_space) => level_space,
            Err(err) => {
                warn!("event=register_space module=service status=error error_code=parse_failed error={err}");
                return Err(err.into());
            }
        };

        self.register_level_space(level_space)
    }

    /// Registers an already decoded level-space pair.
    ///
    /// The level (if new) and the association are written as one unit.
    pub fn register_level_space(
        &self,
        level_space: LevelSpace,
    ) -> Result<Registration, AdminServiceError> {
        let level_created = self
            .store
            .add_with_parent(&level_space.level, &level_space)?;

        info!(
            "event=register_space module=service status=ok level_id={} space={} level_created={}",
            level_space.level_id(),
            level_space.space,
            level_created
        );

        Ok(Registration {
            level_space,
            level_created,
        })
    }

    /// Lists every registered level in insertion order.
    pub fn levels(&self) -> Result<Vec<Level>, AdminServiceError> {
        Ok(self.store.get::<Level>()?)
    }

    /// Lists every registered level-space association in insertion order.
    pub fn level_spaces(&self) -> Result<Vec<LevelSpace>, AdminServiceError> {
        Ok(self.store.get::<LevelSpace>()?)
    }

    /// Lists associations registered on `level_id`.
    pub fn spaces_on_level(&self, level_id: &str) -> Result<Vec<LevelSpace>, AdminServiceError> {
        let mut spaces = self.level_spaces()?;
        spaces.retain(|level_space| level_space.level_id() == level_id);
        Ok(spaces)
    }
}

#[cfg(test)]
mod tests {
    use super::{AdminService, AdminServiceError};
    use crate::model::level::{Level, LevelSpace};
    use crate::parser::request_parser::{ParseError, RequestParser};
    use crate::repo::memory::InMemoryDataAccess;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Parser stub that ignores the payload and counts invocations.
    struct FixedParser {
        result: LevelSpace,
        calls: Arc<AtomicUsize>,
    }

    impl RequestParser for FixedParser {
        fn parse(&self, _payload: &[u8]) -> Result<LevelSpace, ParseError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result.clone())
        }
    }

    fn service_with_fixed_parser(
        level: &str,
        space: &str,
    ) -> (AdminService<InMemoryDataAccess, FixedParser>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let parser = FixedParser {
            result: LevelSpace::new(Level::new(level), space),
            calls: Arc::clone(&calls),
        };
        (
            AdminService::with_parser(InMemoryDataAccess::new(), parser),
            calls,
        )
    }

    #[test]
    fn extracts_ids_from_input_once() {
        let (service, calls) = service_with_fixed_parser("L1", "S1");

        service
            .register_space(br#"{"Space":"S1","Level":"L1"}"#)
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn creates_level_if_it_does_not_exist() {
        let (service, _) = service_with_fixed_parser("L1", "S1");

        let registration = service.register_space(b"").unwrap();

        assert!(registration.level_created);
        assert_eq!(service.levels().unwrap(), vec![Level::new("L1")]);
    }

    #[test]
    fn creates_level_space() {
        let (service, _) = service_with_fixed_parser("L1", "S1");

        service.register_space(b"").unwrap();

        assert_eq!(
            service.level_spaces().unwrap(),
            vec![LevelSpace::new(Level::new("L1"), "S1")]
        );
    }

    #[test]
    fn spaces_on_level_filters_by_level_id() {
        let service = AdminService::new(InMemoryDataAccess::new());
        service
            .register_level_space(LevelSpace::new(Level::new("L1"), "S1"))
            .unwrap();
        service
            .register_level_space(LevelSpace::new(Level::new("L2"), "S2"))
            .unwrap();

        let on_l2 = service.spaces_on_level("L2").unwrap();
        assert_eq!(on_l2, vec![LevelSpace::new(Level::new("L2"), "S2")]);
        assert!(service.spaces_on_level("L3").unwrap().is_empty());
    }

    #[test]
    fn store_failure_is_passed_through() {
        let service = AdminService::new(InMemoryDataAccess::new());
        service.store().set_unavailable(true);

        let err = service
            .register_space(br#"{"Space":"S1","Level":"L1"}"#)
            .unwrap_err();
        assert!(matches!(err, AdminServiceError::Store(_)));
    }
}
