use std::sync::Arc;

use dashmap::DashMap;
use quiz_core::model::{Language, Session, SessionPhase, SessionStateError, UserId};
use tokio::sync::{Mutex, OwnedMutexGuard};

type Slot = Arc<Mutex<Option<Session>>>;

/// Registry holding at most one session per user.
///
/// Each user has its own async lock, so events for one user run in order
/// while different users never wait on each other. The map itself is
/// sharded and only touched long enough to clone a slot handle.
#[derive(Default)]
pub struct SessionStore {
    slots: DashMap<UserId, Slot>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Lock the user's slot for exclusive use, waiting behind earlier events.
    ///
    /// The slot is pruned from the registry when the guard drops empty.
    pub async fn lock(&self, user_id: UserId) -> SessionGuard<'_> {
        let slot = Arc::clone(&self.slots.entry(user_id).or_default());
        let guard = slot.lock_owned().await;
        SessionGuard {
            store: self,
            user_id,
            guard,
        }
    }

    /// Start a session for `user_id` with the chosen language.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::UnexpectedEvent` if the user already has a session.
    pub async fn create(&self, user_id: UserId, lang: Language) -> Result<Session, SessionStateError> {
        let mut guard = self.lock(user_id).await;
        if let Some(existing) = guard.session() {
            return Err(SessionStateError::UnexpectedEvent {
                event: "choose_language",
                phase: existing.phase(),
            });
        }
        Ok(guard.insert(Session::new(user_id, lang)).clone())
    }

    /// Snapshot of the user's session.
    pub async fn get(&self, user_id: UserId) -> Option<Session> {
        let slot = self.slots.get(&user_id).map(|s| Arc::clone(&s))?;
        let guard = slot.lock().await;
        guard.clone()
    }

    /// Apply `mutation` to the user's session, if there is one.
    pub async fn update<R>(
        &self,
        user_id: UserId,
        mutation: impl FnOnce(&mut Session) -> R,
    ) -> Option<R> {
        if !self.slots.contains_key(&user_id) {
            return None;
        }
        let mut guard = self.lock(user_id).await;
        guard.session_mut().map(mutation)
    }

    /// Remove and return the user's session.
    pub async fn delete(&self, user_id: UserId) -> Option<Session> {
        if !self.slots.contains_key(&user_id) {
            return None;
        }
        self.lock(user_id).await.take()
    }

    /// Phase of the user's session, `Idle` when there is none.
    pub async fn phase(&self, user_id: UserId) -> SessionPhase {
        self.get(user_id)
            .await
            .map_or(SessionPhase::Idle, |s| s.phase())
    }

    /// Number of users with a live slot. Includes slots currently locked.
    #[must_use]
    pub fn tracked_users(&self) -> usize {
        self.slots.len()
    }
}

/// Exclusive access to one user's slot.
pub struct SessionGuard<'a> {
    store: &'a SessionStore,
    user_id: UserId,
    guard: OwnedMutexGuard<Option<Session>>,
}

impl SessionGuard<'_> {
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        (*self.guard).as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        (*self.guard).as_mut()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session().map_or(SessionPhase::Idle, Session::phase)
    }

    /// Store `session`, replacing any existing one.
    pub fn insert(&mut self, session: Session) -> &mut Session {
        (*self.guard).insert(session)
    }

    pub fn take(&mut self) -> Option<Session> {
        (*self.guard).take()
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        if (*self.guard).is_some() {
            return;
        }
        // The map and this guard are the only holders when the count is two.
        // Nobody can clone the slot while the shard lock is held.
        let held = OwnedMutexGuard::mutex(&self.guard);
        self.store.slots.remove_if(&self.user_id, |_, slot| {
            Arc::ptr_eq(slot, held) && Arc::strong_count(slot) == 2
        });
    }
}
