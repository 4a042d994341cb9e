//! Coalescing writes for settings that change at UI-drag frequency
//!
//! A [`DebouncedWriter`] owns one pending value for one key. Each
//! [`update`](DebouncedWriter::update) replaces that value and restarts the
//! quiet-period timer; only when the timer runs out is the value written to
//! the store. A burst of updates therefore costs a single write, carrying the
//! last value of the burst.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::error::Result;
use crate::keys::{Key, SettingType};
use crate::store::SettingsStore;

/// Quiet period before a debounced value is committed
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Whether a writer has a value waiting for its timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Idle,
    Pending,
}

struct Slot<T> {
    /// Bumped on every update/flush/cancel; a timer only commits if the
    /// version it was started with is still current.
    version: u64,
    pending: Option<T>,
    timer: Option<JoinHandle<()>>,
}

struct Shared<T> {
    slot: Mutex<Slot<T>>,
    // Held for the whole of a store write so `flush` can wait out a
    // commit the timer has already started.
    commit: tokio::sync::Mutex<()>,
}

impl<T> Shared<T> {
    fn slot(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Single-slot, last-writer-wins write scheduler for one setting
pub struct DebouncedWriter<S, T> {
    store: Arc<S>,
    key: Key<T>,
    delay: Duration,
    shared: Arc<Shared<T>>,
}

impl<S: SettingsStore, T: SettingType> DebouncedWriter<S, T> {
    pub fn new(store: Arc<S>, key: Key<T>, delay: Duration) -> Self {
        Self {
            store,
            key,
            delay,
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot {
                    version: 0,
                    pending: None,
                    timer: None,
                }),
                commit: tokio::sync::Mutex::new(()),
            }),
        }
    }

    pub const fn key(&self) -> &Key<T> {
        &self.key
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> WriterState {
        if self.shared.slot().pending.is_some() {
            WriterState::Pending
        } else {
            WriterState::Idle
        }
    }

    /// Value that the running timer will commit, if any
    pub fn pending_value(&self) -> Option<T> {
        self.shared.slot().pending.clone()
    }

    /// Record `value` and restart the quiet-period timer.
    ///
    /// Nothing is written until `delay` passes without another call. A
    /// previously pending value is discarded.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn update(&self, value: T) {
        let mut slot = self.shared.slot();
        slot.version = slot.version.wrapping_add(1);
        slot.pending = Some(value);
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }

        let version = slot.version;
        let delay = self.delay;
        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        let shared = Arc::clone(&self.shared);

        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let _commit = shared.commit.lock().await;
            let value = {
                let mut slot = shared.slot();
                if slot.version != version {
                    return;
                }
                // Past this point the write can no longer be aborted.
                slot.timer = None;
                slot.pending.take()
            };

            if let Some(value) = value {
                if let Err(error) = write(&*store, &key, value).await {
                    tracing::error!(
                        group = key.group(),
                        key = key.name(),
                        %error,
                        "Debounced setting write failed"
                    );
                }
            }
        }));

        tracing::trace!(
            group = self.key.group(),
            key = self.key.name(),
            version,
            "Debounced write scheduled"
        );
    }

    /// Commit the pending value now instead of waiting for the timer.
    ///
    /// Also waits for a timer commit that is already in progress, so once
    /// this returns nothing from earlier updates is left unwritten.
    pub async fn flush(&self) -> Result<()> {
        let _commit = self.shared.commit.lock().await;
        let value = {
            let mut slot = self.shared.slot();
            slot.version = slot.version.wrapping_add(1);
            if let Some(timer) = slot.timer.take() {
                timer.abort();
            }
            slot.pending.take()
        };

        match value {
            Some(value) => {
                tracing::debug!(
                    group = self.key.group(),
                    key = self.key.name(),
                    "Flushing debounced setting"
                );
                write(&*self.store, &self.key, value).await
            }
            None => Ok(()),
        }
    }

    /// Drop the pending value without writing it.
    ///
    /// Waits for a timer commit that is already in progress, so a store
    /// change made after this returns is not overwritten by it.
    pub async fn cancel(&self) {
        let _commit = self.shared.commit.lock().await;
        let mut slot = self.shared.slot();
        slot.version = slot.version.wrapping_add(1);
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.pending = None;
    }
}

impl<S, T> Drop for DebouncedWriter<S, T> {
    fn drop(&mut self) {
        if self.shared.slot().pending.is_some() {
            tracing::warn!(
                group = self.key.group(),
                key = self.key.name(),
                "Debounced writer dropped with an unflushed value"
            );
        }
    }
}

async fn write<S: SettingsStore, T: SettingType>(store: &S, key: &Key<T>, value: T) -> Result<()> {
    store
        .set(key.group(), key.name(), value.into_value())
        .await?;
    tracing::debug!(group = key.group(), key = key.name(), "Committed debounced setting");
    Ok(())
}
