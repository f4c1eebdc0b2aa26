// File: crates/api/src/traits/provider.rs

//! Algorithm-level provider trait

use crate::dispatch::FunctionId;
use crate::error::{Error, Result};
use crate::params::{ParamDescriptor, ParamRequest, ParamSchema};
use crate::traits::ProviderCipherContext;
use crate::types::CipherShape;
use dprov_params::names;

/// Algorithm-level parameters every provider can answer from its shape
pub const SHAPE_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor::uint(names::MODE),
    ParamDescriptor::uint(names::KEYLEN),
    ParamDescriptor::uint(names::IVLEN),
    ParamDescriptor::uint(names::BLOCK_SIZE),
    ParamDescriptor::uint(names::FLAGS),
];

/// One algorithm implementation, registered once and shared by every context
/// created from it.
///
/// Implementations are immutable after construction and may be used from any
/// thread.
pub trait CipherProvider: Send + Sync {
    /// Canonical algorithm name, e.g. `AES-128-CBC`
    fn name(&self) -> &'static str;

    /// Additional names the algorithm may be looked up by
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Dispatch-table entries this provider implements
    fn functions(&self) -> &'static [FunctionId];

    /// Mode, sizes and behavior flags
    fn shape(&self) -> CipherShape;

    /// Creates a fresh, uninitialized context
    fn new_ctx(&self) -> Result<Box<dyn ProviderCipherContext>>;

    /// Answers algorithm-level parameters without a context.
    ///
    /// The default answers the [`SHAPE_PARAMS`] from [`shape`](Self::shape).
    fn get_params(&self, requests: &mut [ParamRequest<'_>]) -> Result<()> {
        let shape = self.shape();
        for request in requests.iter_mut() {
            if !answer_shape_param(&shape, request)? {
                return Err(Error::unsupported_param(request.key()));
            }
        }
        Ok(())
    }

    fn gettable_params(&self) -> ParamSchema {
        ParamSchema::new(SHAPE_PARAMS)
    }

    fn gettable_ctx_params(&self) -> ParamSchema {
        ParamSchema::EMPTY
    }

    fn settable_ctx_params(&self) -> ParamSchema {
        ParamSchema::EMPTY
    }
}

/// Writes one of the [`SHAPE_PARAMS`] into `request`.
///
/// Returns `Ok(false)` when the name is not a shape parameter so callers can
/// fall through to their own table.
pub fn answer_shape_param(shape: &CipherShape, request: &mut ParamRequest<'_>) -> Result<bool> {
    let value = match request.key() {
        names::MODE => u64::from(shape.mode.id()),
        names::KEYLEN => shape.key_len as u64,
        names::IVLEN => shape.iv_len as u64,
        names::BLOCK_SIZE => shape.block_size as u64,
        names::FLAGS => shape.flags.bits(),
        _ => return Ok(false),
    };
    request.set_uint(value)?;
    Ok(true)
}
