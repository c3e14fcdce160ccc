use tracing::{debug, info};

use crate::embedding::Embedding;
use crate::registry::{Registry, RegistryError};

/// Euclidean distance below which a probe counts as the enrolled person.
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.8;

/// External face detector + embedding model.
///
/// Returns one embedding per face found in `frame`, possibly none.
pub trait Recognizer<F: ?Sized> {
    fn recognize(&mut self, frame: &F) -> Vec<Embedding>;
}

impl<F: ?Sized, R: Recognizer<F> + ?Sized> Recognizer<F> for &mut R {
    fn recognize(&mut self, frame: &F) -> Vec<Embedding> { (**self).recognize(frame) }
}

/// Closed until the designated person is recognised once, then open for
/// good.
#[derive(Debug)]
pub struct IdentityGate {
    registry:  Registry,
    target:    String,
    threshold: f32,
    opened_by: Option<f32>,
    calls:     u64,
}

impl IdentityGate {
    /// `target` must be enrolled in `registry`.
    pub fn new(registry: Registry, target: &str, threshold: f32) -> Result<Self, RegistryError> {
        if !registry.contains(target) {
            return Err(RegistryError::Missing(target.to_string()));
        }
        Ok(IdentityGate {
            registry,
            target: target.to_string(),
            threshold,
            opened_by: None,
            calls: 0,
        })
    }

    /// Run one frame through the gate; `true` once it is open.
    ///
    /// After the first match the recognizer is never consulted again.
    pub fn check<F, R>(&mut self, recognizer: &mut R, frame: &F) -> bool
    where
        F: ?Sized,
        R: Recognizer<F> + ?Sized,
    {
        if self.is_open() {
            return true;
        }
        self.calls += 1;
        for probe in recognizer.recognize(frame) {
            let Some(hit) = self.registry.nearest(&probe, self.threshold) else {
                debug!("face not recognised");
                continue;
            };
            if hit.name == self.target {
                info!(name = %hit.name, distance = hit.distance, "identity confirmed, gesture control enabled");
                self.opened_by = Some(hit.distance);
                return true;
            }
            debug!(name = %hit.name, distance = hit.distance, "recognised someone else");
        }
        false
    }

    pub fn is_open(&self) -> bool { self.opened_by.is_some() }

    /// Distance of the match that opened the gate.
    pub fn opened_by(&self) -> Option<f32> { self.opened_by }

    pub fn recognizer_calls(&self) -> u64 { self.calls }

    pub fn target(&self) -> &str { &self.target }

    pub fn threshold(&self) -> f32 { self.threshold }

    pub fn registry(&self) -> &Registry { &self.registry }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
