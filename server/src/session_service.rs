use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::RngCore;
use uuid::Uuid;

use cirrus_shared::clock::get_time;
use cirrus_shared::tier::SubscriptionTier;

use crate::schema::Account;
use crate::ServerState;

/// A token-addressed record of an authenticated identity with sliding
/// expiration. Process-memory only; a restart invalidates every session.
#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub tier: SubscriptionTier,
    pub created_at: u64,
    pub expires_at: u64,
}

/// Owned by [crate::ServerState] and injected into every handler. All
/// mutations are serialized by the internal mutex; callers never see a lock.
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, sessions: Mutex::new(HashMap::new()) }
    }

    pub fn create(&self, account: &Account) -> String {
        let token = generate_token();
        let now = get_time();
        let session = Session {
            token: token.clone(),
            user_id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            tier: account.tier,
            created_at: now,
            expires_at: now + self.ttl.as_millis() as u64,
        };
        self.sessions
            .lock()
            .expect("session map poisoned")
            .insert(token.clone(), session);
        token
    }

    /// Fails open to `None` for a missing, unknown, or expired token; an
    /// absent session is an auth failure upstream, never an exception here.
    pub fn get(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.lock().expect("session map poisoned");
        let session = sessions.get(token)?;
        if session.expires_at <= get_time() {
            return None;
        }
        Some(session.clone())
    }

    /// Slide the expiry forward by the full TTL. Invoked on every
    /// authenticated request so an active session never lapses.
    pub fn touch(&self, token: &str) {
        let mut sessions = self.sessions.lock().expect("session map poisoned");
        if let Some(session) = sessions.get_mut(token) {
            session.expires_at = get_time() + self.ttl.as_millis() as u64;
        }
    }

    pub fn revoke(&self, token: &str) {
        self.sessions
            .lock()
            .expect("session map poisoned")
            .remove(token);
    }

    /// Drop everything past its expiry. Driven by the hourly sweeper task.
    pub fn sweep(&self) {
        let now = get_time();
        let mut sessions = self.sessions.lock().expect("session map poisoned");
        let before = sessions.len();
        sessions.retain(|_, session| session.expires_at > now);
        let cleaned = before - sessions.len();
        info!("cleaned up {cleaned} expired sessions");
    }

    /// Propagate an account change into every live session for that user,
    /// e.g. a display-name change or a webhook-driven tier upgrade.
    pub fn update_sessions(&self, user_id: Uuid, update: impl Fn(&mut Session)) {
        let mut sessions = self.sessions.lock().expect("session map poisoned");
        for session in sessions.values_mut() {
            if session.user_id == user_id {
                update(session);
            }
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().fold(String::with_capacity(64), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

pub fn spawn_sweeper(server_state: &Arc<ServerState>) {
    let state = server_state.clone();
    tokio::spawn(async move {
        let period = Duration::from_secs(state.config.server.session_sweep_secs);
        let mut interval = tokio::time::interval(period);
        interval.tick().await; // the first tick fires immediately
        loop {
            interval.tick().await;
            state.sessions.sweep();
        }
    });
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn account() -> Account {
        Account {
            id: Uuid::new_v4(),
            name: "probe".to_string(),
            email: "probe@example.com".to_string(),
            password_hash: "hash".to_string(),
            tier: SubscriptionTier::Free,
            stripe_customer_id: None,
            created_at: get_time(),
        }
    }

    #[test]
    fn create_then_get_round_trips() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(&account());
        let session = store.get(&token).unwrap();
        assert_eq!(session.tier, SubscriptionTier::Free);
        assert!(session.expires_at > session.created_at);
    }

    #[test]
    fn unknown_and_expired_tokens_fail_open() {
        let store = SessionStore::new(Duration::from_millis(0));
        assert!(store.get("nonsense").is_none());

        let token = store.create(&account());
        assert!(store.get(&token).is_none());
    }

    #[test]
    fn touch_slides_expiry_forward() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(&account());
        let before = store.get(&token).unwrap().expires_at;
        std::thread::sleep(Duration::from_millis(5));
        store.touch(&token);
        let after = store.get(&token).unwrap().expires_at;
        assert!(after > before);
    }

    #[test]
    fn revoke_removes_the_record() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(&account());
        store.revoke(&token);
        assert!(store.get(&token).is_none());
    }

    #[test]
    fn sweep_deletes_only_expired_records() {
        let expired = SessionStore::new(Duration::from_millis(0));
        let token = expired.create(&account());
        expired.sweep();
        assert!(expired
            .sessions
            .lock()
            .unwrap()
            .get(&token)
            .is_none());

        let live = SessionStore::new(Duration::from_secs(60));
        let token = live.create(&account());
        live.sweep();
        assert!(live.get(&token).is_some());
    }

    #[test]
    fn tokens_are_unique_and_opaque() {
        let store = SessionStore::new(Duration::from_secs(60));
        let a = store.create(&account());
        let b = store.create(&account());
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }
}
