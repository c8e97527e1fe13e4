//! One-time notices shown on the next rendered page.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "backoffice_session";

/// Opaque browser-session key carried by the session cookie.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

/// Sessions holding undelivered flashes before the oldest is dropped.
pub const MAX_PENDING_SESSIONS: usize = 10_000;
/// Undelivered flashes older than this are dropped.
pub const FLASH_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug)]
struct Bag {
    flashes: Vec<Flash>,
    touched: Instant,
}

/// Pending flashes per session.
///
/// Clients that never send the session cookie back never read their bag, so
/// bags expire after [`FLASH_TTL`] and the store holds at most
/// `max_sessions` of them.
#[derive(Debug)]
pub struct FlashStore {
    pending: Mutex<HashMap<SessionId, Bag>>,
    max_sessions: usize,
    ttl: Duration,
}

impl Default for FlashStore {
    fn default() -> Self {
        Self::with_limits(MAX_PENDING_SESSIONS, FLASH_TTL)
    }
}

impl FlashStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(max_sessions: usize, ttl: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Bag>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, session: SessionId, kind: FlashKind, message: impl Into<String>) {
        self.add_at(session, Flash { kind, message: message.into() }, Instant::now());
    }

    fn add_at(&self, session: SessionId, flash: Flash, now: Instant) {
        let mut pending = self.lock();
        if !pending.contains_key(&session) {
            let ttl = self.ttl;
            pending.retain(|_, bag| now.saturating_duration_since(bag.touched) < ttl);
            while pending.len() >= self.max_sessions {
                let Some(oldest) = pending
                    .iter()
                    .min_by_key(|(_, bag)| bag.touched)
                    .map(|(id, _)| *id)
                else {
                    break;
                };
                pending.remove(&oldest);
            }
        }
        let bag = pending.entry(session).or_insert_with(|| Bag {
            flashes: Vec::new(),
            touched: now,
        });
        bag.touched = now;
        bag.flashes.push(flash);
    }

    pub fn success(&self, session: SessionId, message: impl Into<String>) {
        self.add(session, FlashKind::Success, message);
    }

    pub fn error(&self, session: SessionId, message: impl Into<String>) {
        self.add(session, FlashKind::Error, message);
    }

    /// Remove and return the session's pending flashes.
    pub fn take(&self, session: SessionId) -> Vec<Flash> {
        self.lock()
            .remove(&session)
            .map(|bag| bag.flashes)
            .unwrap_or_default()
    }

    pub fn peek(&self, session: SessionId) -> Vec<Flash> {
        self.lock()
            .get(&session)
            .map(|bag| bag.flashes.clone())
            .unwrap_or_default()
    }

    /// Number of sessions with undelivered flashes.
    pub fn pending_sessions(&self) -> usize {
        self.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_consumes_only_own_session() {
        let store = FlashStore::new();
        let (a, b) = (SessionId::new(), SessionId::new());
        store.success(a, "Successful deletion");
        store.error(b, "Access denied.");

        assert_eq!(store.peek(a).len(), 1);
        let taken = store.take(a);
        assert_eq!(
            taken,
            vec![Flash {
                kind: FlashKind::Success,
                message: "Successful deletion".into()
            }]
        );
        assert!(store.take(a).is_empty());
        assert_eq!(store.take(b)[0].kind, FlashKind::Error);
    }

    #[test]
    fn session_ids_round_trip_through_cookie_text() {
        let id = SessionId::new();
        assert_eq!(SessionId::parse(&id.to_string()), Some(id));
        assert_eq!(SessionId::parse("nope"), None);
    }

    fn flash(message: &str) -> Flash {
        Flash {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    #[test]
    fn unread_sessions_are_capped() {
        let store = FlashStore::with_limits(8, FLASH_TTL);
        let start = Instant::now();
        let sessions: Vec<SessionId> = (0..50).map(|_| SessionId::new()).collect();
        for (i, session) in sessions.iter().enumerate() {
            store.add_at(
                *session,
                flash("The object cannot be loaded (or found)."),
                start + Duration::from_millis(i as u64),
            );
        }

        assert_eq!(store.pending_sessions(), 8);
        assert_eq!(store.peek(sessions[49]).len(), 1);
        assert!(store.peek(sessions[0]).is_empty());
    }

    #[test]
    fn stale_bags_expire_when_a_new_session_flashes() {
        let store = FlashStore::with_limits(100, Duration::from_secs(60));
        let start = Instant::now();
        let (stale, fresh) = (SessionId::new(), SessionId::new());
        store.add_at(stale, flash("old"), start);
        store.add_at(fresh, flash("new"), start + Duration::from_secs(61));

        assert_eq!(store.pending_sessions(), 1);
        assert!(store.peek(stale).is_empty());
    }

    #[test]
    fn existing_session_keeps_accumulating() {
        let store = FlashStore::with_limits(1, FLASH_TTL);
        let session = SessionId::new();
        store.success(session, "Successful deletion");
        store.error(session, "Could not delete #5");
        assert_eq!(store.take(session).len(), 2);
    }

    #[test]
    fn poisoned_lock_still_records_flashes() {
        let store = std::sync::Arc::new(FlashStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.pending.lock();
            panic!("poison the flash store");
        })
        .join();

        let session = SessionId::new();
        store.success(session, "Update successful");
        assert_eq!(store.take(session).len(), 1);
    }
}
