//! Time-expiring cache of provider content.
//!
//! Each provider gets its own refresh task that fetches once on start and then
//! again every time its expiration interval elapses. Tasks publish into one
//! shared [`State`] behind a reader-writer lock; readers take a copy of it.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, oneshot, watch};
use tokio::task::JoinHandle;

use super::Cacher;
use super::state::{State, share};
use crate::content::Provider;
use crate::error::Error;
use crate::provider::{FetchParams, ProviderClient};

/// How one provider is fetched and how long its content stays fresh.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Interval between the end of one refresh and the start of the next.
    pub expiration: Duration,
    /// Parameters handed to the client; `count` also caps the cached list.
    pub params: FetchParams,
    pub client: Arc<dyn ProviderClient>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("expiration", &self.expiration)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

enum Lifecycle {
    Idle,
    Running(Vec<JoinHandle<()>>),
    Stopped,
}

/// Cache that keeps every configured provider's content fresh in the background.
///
/// Dropping a running cache without calling [`stop`](Self::stop) closes the
/// shutdown channel, so its tasks still exit at their next scheduling decision.
pub struct ExpiringCache {
    providers: HashMap<Provider, ProviderConfig>,
    state: Arc<RwLock<State>>,
    shutdown: watch::Sender<bool>,
    lifecycle: Mutex<Lifecycle>,
}

impl ExpiringCache {
    /// Create a cache for the given providers. Nothing is fetched until [`start`](Self::start).
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if any provider has a zero expiration.
    pub fn new(providers: HashMap<Provider, ProviderConfig>) -> Result<Self, Error> {
        if let Some((provider, _)) = providers.iter().find(|(_, config)| config.expiration.is_zero()) {
            return Err(Error::InvalidInput(format!("provider {provider}: expiration must be greater than 0")));
        }

        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            providers,
            state: Arc::new(RwLock::new(State::new())),
            shutdown,
            lifecycle: Mutex::new(Lifecycle::Idle),
        })
    }

    /// Fetch every provider once, then keep refreshing each on its own schedule.
    ///
    /// Returns after every provider's first fetch attempt has finished, whether
    /// it succeeded or not.
    ///
    /// # Errors
    ///
    /// Returns `Error::AlreadyStarted` if the cache was started before.
    pub async fn start(&self) -> Result<(), Error> {
        let mut lifecycle = self.lifecycle.lock().await;
        if !matches!(*lifecycle, Lifecycle::Idle) {
            return Err(Error::AlreadyStarted);
        }

        let mut handles = Vec::with_capacity(self.providers.len());
        let mut primed = Vec::with_capacity(self.providers.len());

        for (provider, config) in &self.providers {
            let (primed_tx, primed_rx) = oneshot::channel();
            let refresher =
                Refresher { provider: provider.clone(), config: config.clone(), state: Arc::clone(&self.state) };

            handles.push(tokio::spawn(refresher.run(self.shutdown.subscribe(), primed_tx)));
            primed.push(primed_rx);
        }

        // Tracked before waiting, so an abandoned start still leaves the tasks stoppable.
        *lifecycle = Lifecycle::Running(handles);

        // A dropped sender means the task died before signalling; there is nothing left to wait for.
        for primed_rx in primed {
            let _ = primed_rx.await;
        }

        tracing::info!(providers = self.providers.len(), "cache refresh tasks started");

        Ok(())
    }

    /// Signal every refresh task to exit and wait until all of them have.
    ///
    /// A fetch already in flight is allowed to finish and publish. Stopping a
    /// cache that is not running does nothing.
    pub async fn stop(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        let handles = match std::mem::replace(&mut *lifecycle, Lifecycle::Stopped) {
            Lifecycle::Running(handles) => handles,
            other => {
                *lifecycle = other;
                return;
            }
        };

        self.shutdown.send_replace(true);

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "cache refresh task ended abnormally");
            }
        }

        tracing::info!("cache refresh tasks stopped");
    }
}

impl Cacher for ExpiringCache {
    fn state(&self) -> State {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Refresh loop for a single provider.
struct Refresher {
    provider: Provider,
    config: ProviderConfig,
    state: Arc<RwLock<State>>,
}

impl Refresher {
    async fn run(self, mut shutdown: watch::Receiver<bool>, primed: oneshot::Sender<()>) {
        self.refresh().await;
        let _ = primed.send(());

        loop {
            tokio::select! {
                biased;
                // Also fires with an error once the cache itself is gone.
                _ = shutdown.changed() => break,
                _ = tokio::time::sleep(self.config.expiration) => self.refresh().await,
            }
        }

        tracing::debug!(provider = %self.provider, "refresh task exiting");
    }

    /// Fetch once and publish the outcome. The lock is only taken after the fetch returns.
    async fn refresh(&self) {
        let result = self.config.client.fetch(&self.config.params).await;
        let now = Utc::now();

        match result {
            Ok(mut items) => {
                items.truncate(self.config.params.count);
                let count = items.len();
                let items = share(items);
                {
                    let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
                    state.entry_mut(self.provider.clone()).record_success(items, now);
                }
                tracing::debug!(provider = %self.provider, items = count, "provider refreshed");
            }
            Err(e) => {
                {
                    let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
                    state.entry_mut(self.provider.clone()).record_failure(now);
                }
                tracing::warn!(provider = %self.provider, error = %e, "provider fetch failed, keeping stale content");
            }
        }
    }
}
