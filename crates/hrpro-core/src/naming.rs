// Naming collaborator contract: generated team names and congratulations.
//
// Implementations never fail at this boundary. Any transport, credential, or
// parsing problem is absorbed and replaced by the deterministic fallbacks
// from `Locale`.

use async_trait::async_trait;

use crate::labels::Locale;

#[async_trait]
pub trait Namer: Send + Sync {
    /// Up to `count` team names, in order. Callers fill any gap themselves.
    async fn generate_team_names(&self, count: usize) -> Vec<String>;

    /// A short congratulation for `name`.
    async fn generate_congratulation(&self, name: &str) -> String;
}

/// Namer that only ever returns the local fallbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackNamer {
    locale: Locale,
}

impl FallbackNamer {
    pub fn new(locale: Locale) -> Self {
        FallbackNamer { locale }
    }
}

#[async_trait]
impl Namer for FallbackNamer {
    async fn generate_team_names(&self, count: usize) -> Vec<String> {
        (0..count)
            .map(|i| self.locale.fallback_group_name(i))
            .collect()
    }

    async fn generate_congratulation(&self, name: &str) -> String {
        self.locale.fallback_congratulation(name)
    }
}
