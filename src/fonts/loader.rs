//! De-duplicating web font loader.
//!
//! Each font has two independent tiers: `Preview` (weights 400 and 700, used
//! by dropdowns and hover previews) and `Full` (every declared weight, used
//! once a font is selected). A request joins an in-flight load of the same or
//! a greater tier instead of issuing a new fetch, so redundant calls are free.
//! A failed tier returns to the requestable state and the next call retries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use thiserror::Error;

use super::catalog::FontCatalog;

pub const PREVIEW_WEIGHTS: [u16; 2] = [400, 700];
pub const DEFAULT_BATCH_SIZE: usize = 6;
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(150);

const STYLESHEET_ENDPOINT: &str = "https://fonts.googleapis.com/css2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontFidelity {
    Preview,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontLoadState {
    Unrequested,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FontLoadError {
    #[error("font stylesheet request failed for {family}: {message}")]
    Asset { family: String, message: String },
}

/// One stylesheet fetch: a family and the weights to pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRequest {
    pub family: String,
    pub weights: Vec<u16>,
}

impl FontRequest {
    pub fn stylesheet_url(&self) -> String {
        let family = self.family.trim().replace(' ', "+");
        let mut weights = self.weights.clone();
        weights.sort_unstable();
        weights.dedup();
        let weights = weights
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(";");
        format!("{STYLESHEET_ENDPOINT}?family={family}:wght@{weights}&display=swap")
    }
}

/// Resolves a font request to a loaded stylesheet.
#[async_trait]
pub trait FontAssetService: Send + Sync {
    async fn load_stylesheet(&self, request: &FontRequest) -> Result<(), FontLoadError>;
}

type LoadFuture = Shared<BoxFuture<'static, Result<(), FontLoadError>>>;

#[derive(Clone, Default)]
enum TierState {
    #[default]
    Unrequested,
    Loading {
        generation: u64,
        future: LoadFuture,
    },
    Loaded,
    Failed,
}

impl TierState {
    fn load_state(&self) -> FontLoadState {
        match self {
            Self::Unrequested => FontLoadState::Unrequested,
            Self::Loading { .. } => FontLoadState::Loading,
            Self::Loaded => FontLoadState::Loaded,
            Self::Failed => FontLoadState::Failed,
        }
    }

    fn in_flight(&self) -> Option<(u64, LoadFuture)> {
        match self {
            Self::Loading { generation, future } => Some((*generation, future.clone())),
            _ => None,
        }
    }
}

#[derive(Default)]
struct FontSlot {
    preview: TierState,
    full: TierState,
}

impl FontSlot {
    fn tier_mut(&mut self, fidelity: FontFidelity) -> &mut TierState {
        match fidelity {
            FontFidelity::Preview => &mut self.preview,
            FontFidelity::Full => &mut self.full,
        }
    }
}

#[derive(Default)]
struct LoaderState {
    fonts: HashMap<String, FontSlot>,
    next_generation: u64,
}

enum Claim {
    Ready(FontLoadState),
    Wait {
        fidelity: FontFidelity,
        generation: u64,
        future: LoadFuture,
    },
}

/// Cheap to clone; clones share the same cache.
#[derive(Clone)]
pub struct FontLoader {
    service: Arc<dyn FontAssetService>,
    catalog: Arc<FontCatalog>,
    state: Arc<Mutex<LoaderState>>,
    batch_size: usize,
    batch_delay: Duration,
}

impl FontLoader {
    pub fn new(service: Arc<dyn FontAssetService>, catalog: Arc<FontCatalog>) -> Self {
        Self {
            service,
            catalog,
            state: Arc::new(Mutex::new(LoaderState::default())),
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }

    pub fn with_batching(mut self, batch_size: usize, batch_delay: Duration) -> Self {
        self.batch_size = batch_size.max(1);
        self.batch_delay = batch_delay;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn batch_delay(&self) -> Duration {
        self.batch_delay
    }

    /// Loads `family` at `fidelity` unless an equal or greater tier is already
    /// loaded or in flight, in which case it joins that load.
    pub async fn ensure_loaded(&self, family: &str, fidelity: FontFidelity) -> FontLoadState {
        let (fidelity, generation, future) = match self.claim(family, fidelity) {
            Claim::Ready(state) => return state,
            Claim::Wait {
                fidelity,
                generation,
                future,
            } => (fidelity, generation, future),
        };

        let outcome = future.await;
        self.settle(family, fidelity, generation, &outcome);
        match outcome {
            Ok(()) => FontLoadState::Loaded,
            Err(_) => FontLoadState::Failed,
        }
    }

    /// A font the user picked: full weights, issued immediately and never
    /// queued behind a batch.
    pub async fn load_selected(&self, family: &str) -> FontLoadState {
        self.ensure_loaded(family, FontFidelity::Full).await
    }

    /// Loads many fonts in fixed-size batches with a pause between batches.
    /// Fonts already loaded at `fidelity` are skipped.
    pub async fn preload_batch<I, S>(
        &self,
        families: I,
        fidelity: FontFidelity,
    ) -> Vec<(String, FontLoadState)>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pending: Vec<String> = families
            .into_iter()
            .map(Into::into)
            .filter(|family| !self.is_loaded(family, fidelity))
            .collect();

        let mut results = Vec::with_capacity(pending.len());
        for (index, batch) in pending.chunks(self.batch_size).enumerate() {
            if index > 0 {
                tokio::time::sleep(self.batch_delay).await;
            }
            tracing::debug!(batch = index, fonts = batch.len(), "loading font batch");
            let states = join_all(
                batch
                    .iter()
                    .map(|family| self.ensure_loaded(family, fidelity)),
            )
            .await;
            results.extend(batch.iter().cloned().zip(states));
        }
        results
    }

    /// Best state across both tiers.
    pub fn state(&self, family: &str) -> FontLoadState {
        let state = self.lock();
        let Some(slot) = state.fonts.get(&font_key(family)) else {
            return FontLoadState::Unrequested;
        };
        let tiers = [slot.full.load_state(), slot.preview.load_state()];
        [
            FontLoadState::Loaded,
            FontLoadState::Loading,
            FontLoadState::Failed,
        ]
        .into_iter()
        .find(|candidate| tiers.contains(candidate))
        .unwrap_or(FontLoadState::Unrequested)
    }

    pub fn is_loaded(&self, family: &str, fidelity: FontFidelity) -> bool {
        let state = self.lock();
        state.fonts.get(&font_key(family)).is_some_and(|slot| {
            matches!(slot.full, TierState::Loaded)
                || (fidelity == FontFidelity::Preview && matches!(slot.preview, TierState::Loaded))
        })
    }

    pub fn request_for(&self, family: &str, fidelity: FontFidelity) -> FontRequest {
        let entry = self.catalog.get(family);
        let family = entry.map_or_else(|| family.trim().to_string(), |entry| entry.name.clone());
        let weights = match (fidelity, entry) {
            (FontFidelity::Full, Some(entry)) if !entry.weights.is_empty() => entry.weights.clone(),
            _ => PREVIEW_WEIGHTS.to_vec(),
        };
        FontRequest { family, weights }
    }

    fn claim(&self, family: &str, fidelity: FontFidelity) -> Claim {
        let mut guard = self.lock();
        let state = &mut *guard;
        let slot = state.fonts.entry(font_key(family)).or_default();

        if matches!(slot.full, TierState::Loaded) {
            return Claim::Ready(FontLoadState::Loaded);
        }
        if let Some((generation, future)) = slot.full.in_flight() {
            return Claim::Wait {
                fidelity: FontFidelity::Full,
                generation,
                future,
            };
        }
        if fidelity == FontFidelity::Preview {
            if matches!(slot.preview, TierState::Loaded) {
                return Claim::Ready(FontLoadState::Loaded);
            }
            if let Some((generation, future)) = slot.preview.in_flight() {
                return Claim::Wait {
                    fidelity,
                    generation,
                    future,
                };
            }
        }

        let generation = state.next_generation;
        state.next_generation += 1;
        let request = self.request_for(family, fidelity);
        tracing::debug!(
            font = %request.family,
            ?fidelity,
            weights = ?request.weights,
            "requesting font stylesheet"
        );
        let service = Arc::clone(&self.service);
        let future = async move { service.load_stylesheet(&request).await }
            .boxed()
            .shared();
        *slot.tier_mut(fidelity) = TierState::Loading {
            generation,
            future: future.clone(),
        };

        Claim::Wait {
            fidelity,
            generation,
            future,
        }
    }

    fn settle(
        &self,
        family: &str,
        fidelity: FontFidelity,
        generation: u64,
        outcome: &Result<(), FontLoadError>,
    ) {
        let mut state = self.lock();
        let Some(slot) = state.fonts.get_mut(&font_key(family)) else {
            return;
        };
        let tier = slot.tier_mut(fidelity);
        let current = matches!(tier, TierState::Loading { generation: g, .. } if *g == generation);
        if !current {
            return;
        }
        *tier = match outcome {
            Ok(()) => TierState::Loaded,
            Err(err) => {
                tracing::warn!(
                    font = %family,
                    ?fidelity,
                    %err,
                    "font load failed; preview keeps system font"
                );
                TierState::Failed
            }
        };
    }

    fn lock(&self) -> MutexGuard<'_, LoaderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn font_key(family: &str) -> String {
    family.trim().to_lowercase()
}
