//! Generation Orchestrator: one optimization pass over a profile.
//!
//! Flow: build_prompt → provider.generate (exactly one call) → normalize.
//!
//! Best-effort by contract: provider failures and malformed output degrade to the
//! local simple-optimize result instead of failing the caller. The degraded path is
//! explicit in `GenerationOutcome` so callers can tell the two apart.

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::generation::normalizer::{
    fallback_suggestions, normalize, simple_optimize, ResponseOrigin,
};
use crate::generation::prompt_builder::build_prompt;
use crate::llm_client::{ProviderError, ProviderId, ProviderSet};
use crate::models::resume::{OptimizedResumePayload, ResumeProfile};

/// The content produced by one orchestration pass.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub payload: OptimizedResumePayload,
    pub suggestions: Vec<String>,
    pub provider: ProviderId,
}

/// Why a result was produced locally rather than by the provider.
#[derive(Debug, Error)]
pub enum DegradeReason {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("provider returned a response that is not a JSON object")]
    MalformedResponse,
}

#[derive(Debug)]
pub enum GenerationOutcome {
    /// The provider's output was used (gaps may have been filled from the input).
    Optimized(GenerationResult),
    /// No usable provider output; the result is the local simple-optimize fallback.
    Degraded {
        result: GenerationResult,
        reason: DegradeReason,
    },
}

impl GenerationOutcome {
    pub fn into_result(self) -> GenerationResult {
        match self {
            GenerationOutcome::Optimized(result) => result,
            GenerationOutcome::Degraded { result, .. } => result,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, GenerationOutcome::Degraded { .. })
    }
}

/// Coordinates prompt building, the provider call and normalization.
/// Holds no per-request state; one instance is shared by all requests.
#[derive(Clone)]
pub struct GenerationOrchestrator {
    providers: ProviderSet,
}

impl GenerationOrchestrator {
    pub fn new(providers: ProviderSet) -> Self {
        Self { providers }
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    /// Runs one optimization pass. Never fails.
    pub async fn run(
        &self,
        profile: &ResumeProfile,
        instruction: &str,
        provider: ProviderId,
    ) -> GenerationOutcome {
        let prompt = build_prompt(profile, instruction);
        let adapter = self.providers.get(provider);

        info!("Requesting optimization from {provider}");

        match adapter.generate(&prompt).await {
            Ok(raw) => {
                let normalized = normalize(&raw, profile);
                let result = GenerationResult {
                    payload: normalized.payload,
                    suggestions: normalized.suggestions,
                    provider,
                };
                match normalized.origin {
                    ResponseOrigin::Provider => GenerationOutcome::Optimized(result),
                    ResponseOrigin::SimpleOptimize => GenerationOutcome::Degraded {
                        result,
                        reason: DegradeReason::MalformedResponse,
                    },
                }
            }
            Err(err) => {
                warn!("Optimization via {provider} degraded to local fallback: {err}");
                GenerationOutcome::Degraded {
                    result: GenerationResult {
                        payload: simple_optimize(profile),
                        suggestions: fallback_suggestions(profile),
                        provider,
                    },
                    reason: err.into(),
                }
            }
        }
    }
}
