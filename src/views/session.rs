use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::chat::ChatTranscript;
use super::logs::QueryLogView;
use super::route::Route;
use super::search::SearchView;
use super::CitationSurface;

/// Sessions are per user per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub channel_id: u64,
    pub user_id: u64,
}

/// Everything one user sees in one channel. Transient; nothing is persisted.
#[derive(Debug, Default)]
pub struct ViewSession {
    pub route: Route,
    pub chat: ChatTranscript,
    pub search: SearchView,
    pub logs: QueryLogView,
}

impl ViewSession {
    pub fn navigate(&mut self, route: Route) {
        if self.route != route {
            debug!(from = ?self.route, to = ?route, "navigate");
            self.route = route;
        }
    }

    pub fn surface_mut(&mut self, route: Route) -> Option<&mut dyn CitationSurface> {
        match route {
            Route::Chat => Some(&mut self.chat),
            Route::Search => Some(&mut self.search),
            Route::QueryLogs => Some(&mut self.logs),
            Route::Dashboard => None,
        }
    }

    /// Collapse whatever is expanded on the current page.
    pub fn reset_current(&mut self) {
        if let Some(surface) = self.surface_mut(self.route) {
            surface.selector_mut().reset();
        }
    }
}

#[derive(Default)]
pub struct ViewRegistry {
    sessions: RwLock<HashMap<SessionKey, Arc<Mutex<ViewSession>>>>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch or lazily create the session for `key`.
    pub async fn session(&self, key: SessionKey) -> Arc<Mutex<ViewSession>> {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(&key) {
                return session.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(key)
            .or_insert_with(|| {
                debug!(?key, "view session created");
                Arc::new(Mutex::new(ViewSession::default()))
            })
            .clone()
    }

    /// Drop a session entirely. Returns whether one existed.
    pub async fn discard(&self, key: SessionKey) -> bool {
        self.sessions.write().await.remove(&key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::doc;

    const KEY: SessionKey = SessionKey {
        channel_id: 1,
        user_id: 2,
    };

    fn other_key() -> SessionKey {
        SessionKey {
            channel_id: 1,
            user_id: 3,
        }
    }

    #[tokio::test]
    async fn test_registry_reuses_sessions() {
        let registry = ViewRegistry::new();
        let a = registry.session(KEY).await;
        let b = registry.session(KEY).await;
        assert!(Arc::ptr_eq(&a, &b));

        let other = registry.session(other_key()).await;
        assert!(!Arc::ptr_eq(&a, &other));
        assert!(Arc::ptr_eq(&other, &registry.session(other_key()).await));
    }

    #[tokio::test]
    async fn test_discard() {
        let registry = ViewRegistry::new();
        registry.session(KEY).await.lock().await.navigate(Route::Chat);
        assert!(registry.discard(KEY).await);
        assert!(!registry.discard(KEY).await);
        assert_eq!(registry.session(KEY).await.lock().await.route, Route::Dashboard);
    }

    #[test]
    fn test_reset_current_only_touches_active_page() {
        let mut session = ViewSession::default();
        session.search.replace_results("q".to_string(), vec![doc("a.md", "", 0.5)]);
        session.search.selector_mut().select(0);
        session.navigate(Route::Chat);
        session.reset_current();
        assert_eq!(session.search.selector().selected(), Some(&0));

        session.navigate(Route::Search);
        session.reset_current();
        assert_eq!(session.search.selector().selected(), None);
        assert!(session.surface_mut(Route::Dashboard).is_none());
    }
}
