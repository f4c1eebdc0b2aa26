//! Runtime configuration shared by every context created from a provider

use dprov_api::UnknownParamPolicy;

/// Settings fixed for the lifetime of the contexts created with them.
///
/// ```
/// use dprov_api::UnknownParamPolicy;
/// use dprov_core::ProviderContext;
///
/// let lenient = ProviderContext::default()
///     .with_unknown_params(UnknownParamPolicy::Ignore)
///     .with_tls_records(false);
/// assert!(!lenient.tls_records);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderContext {
    /// Handling of names missing from the settable schema in
    /// `set_ctx_params`; gets are always strict
    pub unknown_params: UnknownParamPolicy,
    /// Whether `tlsivfixed` / `tlsaad` may switch a context into TLS record
    /// mode
    pub tls_records: bool,
}

impl Default for ProviderContext {
    fn default() -> Self {
        Self {
            unknown_params: UnknownParamPolicy::Reject,
            tls_records: true,
        }
    }
}

impl ProviderContext {
    pub fn with_unknown_params(mut self, policy: UnknownParamPolicy) -> Self {
        self.unknown_params = policy;
        self
    }

    pub fn with_tls_records(mut self, enabled: bool) -> Self {
        self.tls_records = enabled;
        self
    }
}
