//! Registry of independent tables, one [`Engine`] per session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use thiserror::Error;
use uuid::Uuid;

use crate::config::{ConfigError, TableConfig};
use crate::engine::Engine;
use crate::errors::GameError;
use crate::player::PlayerAction;
use crate::report::{ShowdownReport, TableSnapshot};

pub type SessionId = String;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    #[error("Session storage poisoned")]
    StoragePoisoned,
    #[error("Invalid table configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Sessions sit behind a read-write lock and each engine behind its own
/// mutex, so actions on one table never wait on another.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<Engine>>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_session(&self, config: TableConfig) -> Result<SessionId, SessionError> {
        let id = Uuid::new_v4().to_string();
        tracing::info!(
            session_id = %id,
            starting_stack = config.starting_stack,
            big_blind = config.big_blind,
            "creating table session"
        );
        let engine = Engine::new(config)?;
        let mut guard = self
            .sessions
            .write()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard.insert(id.clone(), Arc::new(Mutex::new(engine)));
        Ok(id)
    }

    pub fn start_hand(&self, id: &SessionId) -> Result<TableSnapshot, SessionError> {
        let session = self.get_session(id)?;
        let mut engine = lock(&session)?;
        let snapshot = engine.start_hand()?;
        tracing::debug!(session_id = %id, hand_id = ?snapshot.hand_id, "hand started");
        Ok(snapshot)
    }

    pub fn submit_action(
        &self,
        id: &SessionId,
        action: PlayerAction,
    ) -> Result<TableSnapshot, SessionError> {
        let session = self.get_session(id)?;
        let mut engine = lock(&session)?;
        Ok(engine.submit_action(action)?)
    }

    /// Forced action for a player who ran out of time.
    pub fn force_fold(&self, id: &SessionId) -> Result<TableSnapshot, SessionError> {
        let session = self.get_session(id)?;
        let mut engine = lock(&session)?;
        Ok(engine.force_fold()?)
    }

    pub fn state(&self, id: &SessionId) -> Result<TableSnapshot, SessionError> {
        let session = self.get_session(id)?;
        let engine = lock(&session)?;
        Ok(engine.state())
    }

    pub fn showdown_report(&self, id: &SessionId) -> Result<ShowdownReport, SessionError> {
        let session = self.get_session(id)?;
        let engine = lock(&session)?;
        Ok(engine.showdown_report()?.clone())
    }

    pub fn delete_session(&self, id: &SessionId) -> Result<(), SessionError> {
        let removed = self
            .sessions
            .write()
            .map_err(|_| SessionError::StoragePoisoned)?
            .remove(id);
        match removed {
            Some(_) => {
                tracing::info!(session_id = %id, "session deleted");
                Ok(())
            }
            None => Err(SessionError::NotFound(id.clone())),
        }
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        match self.sessions.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map_or(0, |guard| guard.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_session(&self, id: &SessionId) -> Result<Arc<Mutex<Engine>>, SessionError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }
}

fn lock(session: &Mutex<Engine>) -> Result<MutexGuard<'_, Engine>, SessionError> {
    session.lock().map_err(|_| SessionError::StoragePoisoned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> TableConfig {
        TableConfig {
            seed: Some(seed),
            ..TableConfig::default()
        }
    }

    #[test]
    fn unknown_session_is_not_found() {
        let manager = SessionManager::new();
        let err = manager.state(&"missing".to_string()).unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }

    #[test]
    fn create_and_delete() {
        let manager = SessionManager::new();
        let id = manager.create_session(seeded(1)).unwrap();
        assert_eq!(manager.len(), 1);
        manager.delete_session(&id).unwrap();
        assert!(manager.is_empty());
        assert!(matches!(
            manager.delete_session(&id),
            Err(SessionError::NotFound(_))
        ));
    }

    #[test]
    fn engine_errors_pass_through() {
        let manager = SessionManager::new();
        let id = manager.create_session(seeded(2)).unwrap();
        let err = manager.submit_action(&id, PlayerAction::Call).unwrap_err();
        assert!(matches!(err, SessionError::Game(GameError::NoHandInProgress)));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let manager = SessionManager::new();
        let config = TableConfig {
            small_blind: 0,
            ..TableConfig::default()
        };
        assert!(matches!(
            manager.create_session(config),
            Err(SessionError::Config(_))
        ));
        assert!(manager.is_empty());
    }
}
