//! Renderer configuration.

use crate::normalize::WrapPolicy;

/// Locale used when none is configured.
pub const DEFAULT_LOCALE: &str = "en";
/// Root identifier handed to the diff engine.
pub const DEFAULT_ROOT_ID: &str = "root";

/// Settings shared by every render pass of a [`Renderer`](crate::render::Renderer).
#[derive(Debug, Clone)]
pub struct RenderConfig {
    locale: String,
    root_id: String,
    wrap_policy: WrapPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_owned(),
            root_id: DEFAULT_ROOT_ID.to_owned(),
            wrap_policy: WrapPolicy::default(),
        }
    }

    /// Overrides the locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Overrides the root identifier.
    #[must_use]
    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = root_id.into();
        self
    }

    /// Overrides the wrap policy for component output.
    #[must_use]
    pub fn with_wrap_policy(mut self, policy: WrapPolicy) -> Self {
        self.wrap_policy = policy;
        self
    }

    /// The configured locale.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The configured root identifier.
    #[must_use]
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// The configured wrap policy.
    #[must_use]
    pub const fn wrap_policy(&self) -> &WrapPolicy {
        &self.wrap_policy
    }
}
