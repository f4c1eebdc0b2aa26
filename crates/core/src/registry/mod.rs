//! Algorithm registry
//!
//! Providers are wrapped in an [`AlgorithmDescriptor`] when they register.
//! Registration is the only place the dispatch table is inspected: the
//! declared function identifiers are turned into [`Capabilities`] and an
//! incoherent table is refused, so later calls only test flags.

use core::fmt;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::context::CipherContext;
use crate::provctx::ProviderContext;
use dprov_api::{
    derive_capabilities, Capabilities, CipherProvider, CipherShape, Error, ParamRequest,
    ParamSchema, Result,
};

/// Process-wide, read-only description of one registered algorithm
pub struct AlgorithmDescriptor {
    capabilities: Capabilities,
    provider: Box<dyn CipherProvider>,
}

impl AlgorithmDescriptor {
    /// Wraps a provider, deriving its capabilities from the functions it
    /// declares
    pub fn new<P>(provider: P) -> Result<Self>
    where
        P: CipherProvider + 'static,
    {
        Self::from_boxed(Box::new(provider))
    }

    pub fn from_boxed(provider: Box<dyn CipherProvider>) -> Result<Self> {
        let capabilities =
            derive_capabilities(provider.functions()).map_err(|defect| Error::Registration {
                name: provider.name().to_string(),
                reason: defect.reason(),
            })?;
        Ok(Self {
            capabilities,
            provider,
        })
    }

    pub fn name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        self.provider.aliases()
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn shape(&self) -> CipherShape {
        self.provider.shape()
    }

    pub fn provider(&self) -> &dyn CipherProvider {
        self.provider.as_ref()
    }

    /// Algorithm-level parameter query, no context needed
    pub fn get_params(&self, requests: &mut [ParamRequest<'_>]) -> Result<()> {
        if !self.capabilities.contains(Capabilities::GET_PARAMS) {
            return Err(Error::Unsupported {
                operation: "get_params",
            });
        }
        self.gettable_params().check_get(requests)?;
        self.provider.get_params(requests)
    }

    pub fn gettable_params(&self) -> ParamSchema {
        self.schema(Capabilities::GET_PARAMS, || self.provider.gettable_params())
    }

    pub fn gettable_ctx_params(&self) -> ParamSchema {
        self.schema(Capabilities::GET_CTX_PARAMS, || {
            self.provider.gettable_ctx_params()
        })
    }

    pub fn settable_ctx_params(&self) -> ParamSchema {
        self.schema(Capabilities::SET_CTX_PARAMS, || {
            self.provider.settable_ctx_params()
        })
    }

    fn schema(&self, cap: Capabilities, query: impl FnOnce() -> ParamSchema) -> ParamSchema {
        if self.capabilities.contains(cap) {
            query()
        } else {
            ParamSchema::EMPTY
        }
    }

    fn names(&self) -> impl Iterator<Item = &'static str> {
        core::iter::once(self.name()).chain(self.aliases().iter().copied())
    }
}

impl fmt::Debug for AlgorithmDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmDescriptor")
            .field("name", &self.name())
            .field("aliases", &self.aliases())
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

/// Immutable name → descriptor map
#[derive(Default)]
pub struct Registry {
    by_name: HashMap<String, Arc<AlgorithmDescriptor>>,
    ordered: Vec<Arc<AlgorithmDescriptor>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Looks an algorithm up by name or alias, ignoring ASCII case
    pub fn fetch(&self, name: &str) -> Result<Arc<AlgorithmDescriptor>> {
        self.by_name
            .get(&name.to_ascii_uppercase())
            .cloned()
            .ok_or_else(|| Error::AlgorithmNotFound {
                name: name.to_string(),
            })
    }

    /// Fetches `name` and creates a context for it
    pub fn new_ctx(&self, name: &str, config: &ProviderContext) -> Result<CipherContext> {
        CipherContext::new(&self.fetch(name)?, config)
    }

    /// Descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<AlgorithmDescriptor>> {
        self.ordered.iter()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.ordered.iter().map(|d| d.name()))
            .finish()
    }
}

/// Collects descriptors; names must be unique across names and aliases
#[derive(Default)]
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    /// Registers a provider
    pub fn register<P>(self, provider: P) -> Result<Self>
    where
        P: CipherProvider + 'static,
    {
        self.register_descriptor(AlgorithmDescriptor::new(provider)?)
    }

    pub fn register_descriptor(mut self, descriptor: AlgorithmDescriptor) -> Result<Self> {
        let descriptor = Arc::new(descriptor);
        let keys: Vec<String> = descriptor.names().map(str::to_ascii_uppercase).collect();

        for (i, key) in keys.iter().enumerate() {
            if self.registry.by_name.contains_key(key) || keys[..i].contains(key) {
                return Err(Error::Registration {
                    name: descriptor.name().to_string(),
                    reason: "name or alias already registered",
                });
            }
        }

        debug!(
            algorithm = descriptor.name(),
            capabilities = ?descriptor.capabilities(),
            "algorithm registered"
        );
        for key in keys {
            self.registry.by_name.insert(key, Arc::clone(&descriptor));
        }
        self.registry.ordered.push(descriptor);
        Ok(self)
    }

    pub fn build(self) -> Registry {
        debug!(algorithms = self.registry.len(), "registry built");
        self.registry
    }
}
