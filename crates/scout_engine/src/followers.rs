use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures_util::future::join_all;
use scout_core::RequestError;
use scout_logging::{scout_debug, scout_warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{Renderer, Transport, UiEvent};

/// Contributors past this rank keep their card without a follower count.
pub const FOLLOWER_BACKFILL_LIMIT: usize = 10;

/// Fills in follower counts for a freshly rendered contributor list.
///
/// Profiles are fetched one per contributor, the n-th one delayed by
/// `n * stagger`. Starting a new backfill cancels the running one, and a
/// failed lookup reports 0 followers.
pub struct FollowerBackfill {
    stagger: Duration,
    running: Mutex<Option<CancellationToken>>,
}

impl FollowerBackfill {
    pub fn new(stagger: Duration) -> Self {
        Self {
            stagger,
            running: Mutex::new(None),
        }
    }

    /// Must be called from within a Tokio runtime.
    pub fn start(
        &self,
        transport: Arc<dyn Transport>,
        renderer: Arc<dyn Renderer>,
        usernames: Vec<String>,
        parent: &CancellationToken,
    ) -> JoinHandle<()> {
        let token = parent.child_token();
        if let Some(previous) = self.replace(Some(token.clone())) {
            previous.cancel();
        }
        let stagger = self.stagger;
        tokio::spawn(async move {
            let fetches = usernames
                .into_iter()
                .take(FOLLOWER_BACKFILL_LIMIT)
                .enumerate()
                .map(|(index, username)| {
                    let delay = stagger.saturating_mul(index as u32);
                    backfill_one(&*transport, &*renderer, username, delay, &token)
                });
            join_all(fetches).await;
        })
    }

    /// Cancels the running backfill. Returns whether one was still running.
    pub fn cancel(&self) -> bool {
        match self.replace(None) {
            Some(token) => {
                let was_live = !token.is_cancelled();
                token.cancel();
                was_live
            }
            None => false,
        }
    }

    fn replace(&self, next: Option<CancellationToken>) -> Option<CancellationToken> {
        let mut slot = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, next)
    }
}

async fn backfill_one(
    transport: &dyn Transport,
    renderer: &dyn Renderer,
    username: String,
    delay: Duration,
    cancel: &CancellationToken,
) {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => return,
        _ = tokio::time::sleep(delay) => {}
    }
    let followers = match transport.profile(&username, cancel).await {
        Ok(profile) => profile.followers,
        Err(RequestError::Cancelled) => return,
        Err(err) => {
            scout_warn!("follower count for {} unavailable: {}", username, err);
            0
        }
    };
    if cancel.is_cancelled() {
        return;
    }
    scout_debug!("{} has {} followers", username, followers);
    renderer.emit(UiEvent::FollowersUpdated {
        username,
        followers,
    });
}
