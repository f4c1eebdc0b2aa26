//! Engine-side cipher context handle
//!
//! Every call an engine makes goes through [`CipherContext`]. The handle
//! checks the algorithm's capabilities and the streaming state machine before
//! the provider is entered, and validates parameter sets against the
//! provider's schemas once, at the boundary.

use core::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::provctx::ProviderContext;
use crate::registry::AlgorithmDescriptor;
use dprov_api::{
    Capabilities, Direction, Error, InOut, Param, ParamRequest, ProviderCipherContext, Result,
    UnknownParamPolicy,
};
use dprov_params::names;

/// Position of a context in the streaming state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Uninitialized,
    Initialized(Direction),
    /// At least one `update` went through
    Accumulating(Direction),
    /// Terminal until the next init
    Finalized(Direction),
}

impl StreamState {
    pub fn direction(self) -> Option<Direction> {
        match self {
            StreamState::Uninitialized => None,
            StreamState::Initialized(d) | StreamState::Accumulating(d) | StreamState::Finalized(d) => {
                Some(d)
            }
        }
    }

    fn label(self) -> &'static str {
        match self {
            StreamState::Uninitialized => "uninitialized",
            StreamState::Initialized(_) => "initialized",
            StreamState::Accumulating(_) => "accumulating",
            StreamState::Finalized(_) => "finalized",
        }
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction() {
            Some(d) => write!(f, "{} ({})", self.label(), d),
            None => f.write_str(self.label()),
        }
    }
}

/// Exclusive handle to one cipher operation.
///
/// Dropping the handle destroys the provider context, which zeroizes its
/// sensitive state.
pub struct CipherContext {
    descriptor: Arc<AlgorithmDescriptor>,
    config: ProviderContext,
    state: StreamState,
    inner: Box<dyn ProviderCipherContext>,
}

impl CipherContext {
    /// Creates an uninitialized context for `descriptor`
    pub fn new(descriptor: &Arc<AlgorithmDescriptor>, config: &ProviderContext) -> Result<Self> {
        let inner = descriptor.provider().new_ctx()?;
        debug!(algorithm = descriptor.name(), "cipher context created");
        Ok(Self {
            descriptor: Arc::clone(descriptor),
            config: *config,
            state: StreamState::Uninitialized,
            inner,
        })
    }

    /// Destroys a context. A `None` handle is accepted and ignored.
    pub fn destroy(ctx: Option<CipherContext>) {
        if let Some(ctx) = ctx {
            debug!(algorithm = ctx.descriptor.name(), state = %ctx.state, "cipher context destroyed");
            drop(ctx);
        }
    }

    pub fn descriptor(&self) -> &Arc<AlgorithmDescriptor> {
        &self.descriptor
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name()
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn config(&self) -> &ProviderContext {
        &self.config
    }

    /// Independent deep copy, state machine position included
    pub fn duplicate(&self) -> Result<Self> {
        self.require(Capabilities::DUPLICATE, "dupctx")?;
        let inner = self.inner.duplicate()?;
        debug!(algorithm = self.name(), state = %self.state, "cipher context duplicated");
        Ok(Self {
            descriptor: Arc::clone(&self.descriptor),
            config: self.config,
            state: self.state,
            inner,
        })
    }

    /// Keys the context for encryption and applies `params` afterwards.
    ///
    /// `None` for the key or IV keeps the value from a previous init.
    pub fn encrypt_init(
        &mut self,
        key: Option<&[u8]>,
        iv: Option<&[u8]>,
        params: &[Param<'_>],
    ) -> Result<()> {
        self.init(Direction::Encrypt, key, iv, params)
    }

    /// Keys the context for decryption and applies `params` afterwards
    pub fn decrypt_init(
        &mut self,
        key: Option<&[u8]>,
        iv: Option<&[u8]>,
        params: &[Param<'_>],
    ) -> Result<()> {
        self.init(Direction::Decrypt, key, iv, params)
    }

    fn init(
        &mut self,
        direction: Direction,
        key: Option<&[u8]>,
        iv: Option<&[u8]>,
        params: &[Param<'_>],
    ) -> Result<()> {
        let (cap, operation) = match direction {
            Direction::Encrypt => (Capabilities::ENCRYPT, "encrypt_init"),
            Direction::Decrypt => (Capabilities::DECRYPT, "decrypt_init"),
        };
        self.require(cap, operation)?;
        if !params.is_empty() {
            self.check_settable(params)?;
        }

        let result = match direction {
            Direction::Encrypt => self.inner.encrypt_init(key, iv),
            Direction::Decrypt => self.inner.decrypt_init(key, iv),
        };
        if let Err(err) = result {
            self.state = StreamState::Uninitialized;
            return Err(err);
        }
        self.state = StreamState::Initialized(direction);
        debug!(
            algorithm = self.name(),
            %direction,
            rekeyed = key.is_some(),
            new_iv = iv.is_some(),
            "cipher context initialized"
        );

        if !params.is_empty() {
            self.apply_params(params)?;
        }
        Ok(())
    }

    /// Processes a chunk and returns the number of bytes written
    pub fn update(&mut self, data: InOut<'_>) -> Result<usize> {
        self.require(Capabilities::STREAM, "update")?;
        let direction = self.active("update")?;
        let input_len = data.input_len();
        let written = self.inner.update(data)?;
        self.state = StreamState::Accumulating(direction);
        trace!(algorithm = self.name(), input_len, written, "update");
        Ok(written)
    }

    /// Feeds additional authenticated data; only AEAD algorithms accept it
    pub fn update_aad(&mut self, aad: &[u8]) -> Result<()> {
        self.require(Capabilities::AAD, "update_aad")?;
        self.active("update_aad")?;
        self.inner.update_aad(aad)?;
        trace!(algorithm = self.name(), aad_len = aad.len(), "update_aad");
        Ok(())
    }

    /// Completes the operation.
    ///
    /// A failure other than [`Error::BufferTooSmall`] ends the operation;
    /// everything it produced must be discarded.
    pub fn finalize(&mut self, out: &mut [u8]) -> Result<usize> {
        self.require(Capabilities::STREAM, "final")?;
        let direction = self.active("final")?;
        match self.inner.finalize(out) {
            Ok(written) => {
                self.state = StreamState::Finalized(direction);
                debug!(algorithm = self.name(), %direction, written, "cipher context finalized");
                Ok(written)
            }
            Err(err @ Error::BufferTooSmall { .. }) => Err(err),
            Err(err) => {
                self.state = StreamState::Finalized(direction);
                self.report_failure("final", &err);
                Err(err)
            }
        }
    }

    /// Single-shot processing; the state machine position is left unchanged
    pub fn cipher(&mut self, data: InOut<'_>) -> Result<usize> {
        self.require(Capabilities::RAW, "cipher")?;
        self.active("cipher")?;
        let input_len = data.input_len();
        match self.inner.cipher(data) {
            Ok(written) => {
                trace!(algorithm = self.name(), input_len, written, "cipher");
                Ok(written)
            }
            Err(err) => {
                self.report_failure("cipher", &err);
                Err(err)
            }
        }
    }

    /// Reads context parameters into caller-provided slots
    pub fn get_ctx_params<'a>(&'a self, requests: &mut [ParamRequest<'a>]) -> Result<()> {
        self.require(Capabilities::GET_CTX_PARAMS, "get_ctx_params")?;
        self.descriptor.gettable_ctx_params().check_get(requests)?;
        self.inner.get_ctx_params(requests)
    }

    /// Validates the whole set, then applies it in order
    pub fn set_ctx_params(&mut self, params: &[Param<'_>]) -> Result<()> {
        self.check_settable(params)?;
        self.apply_params(params)
    }

    fn check_settable(&self, params: &[Param<'_>]) -> Result<()> {
        self.require(Capabilities::SET_CTX_PARAMS, "set_ctx_params")?;
        self.descriptor
            .settable_ctx_params()
            .check_set(params, self.config.unknown_params)?;
        if !self.config.tls_records
            && params
                .iter()
                .any(|p| p.key == names::TLS_AAD || p.key == names::TLS_IV_FIXED)
        {
            return Err(Error::Unsupported {
                operation: "tls record mode",
            });
        }
        Ok(())
    }

    fn apply_params(&mut self, params: &[Param<'_>]) -> Result<()> {
        let schema = self.descriptor.settable_ctx_params();
        if self.config.unknown_params == UnknownParamPolicy::Ignore
            && params.iter().any(|p| !schema.contains(p.key))
        {
            let known: Vec<Param<'_>> = params
                .iter()
                .filter(|p| schema.contains(p.key))
                .copied()
                .collect();
            return self.inner.set_ctx_params(&known);
        }
        self.inner.set_ctx_params(params)
    }

    fn require(&self, cap: Capabilities, operation: &'static str) -> Result<()> {
        if !self.descriptor.capabilities().contains(cap) {
            return Err(Error::Unsupported { operation });
        }
        Ok(())
    }

    fn active(&self, operation: &'static str) -> Result<Direction> {
        match self.state {
            StreamState::Initialized(d) | StreamState::Accumulating(d) => Ok(d),
            other => Err(Error::InvalidState {
                operation,
                state: other.label(),
            }),
        }
    }

    fn report_failure(&self, operation: &'static str, err: &Error) {
        if err.is_integrity_failure() {
            warn!(algorithm = self.name(), operation, error = %err, "integrity check failed");
        }
    }
}

impl fmt::Debug for CipherContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherContext")
            .field("algorithm", &self.name())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
