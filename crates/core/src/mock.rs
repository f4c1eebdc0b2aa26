//! Toy provider used by the unit tests of this crate

use crate::block::{BlockBuffer, BlockTransform};
use dprov_api::dispatch::FunctionId::{self, *};
use dprov_api::error::validate;
use dprov_api::{
    AlgorithmFlags, CipherMode, CipherProvider, CipherShape, Error, InOut, Param, ParamDescriptor,
    ParamRequest, ParamSchema, ProviderCipherContext, Result,
};
use dprov_params::names;

const BS: usize = 8;

const GETTABLE: &[ParamDescriptor] = &[
    ParamDescriptor::uint(names::PADDING),
    ParamDescriptor::uint(names::KEYLEN),
    ParamDescriptor::uint(names::ROUNDS),
    ParamDescriptor::octet_string(names::IV, BS),
];

const SETTABLE: &[ParamDescriptor] = &[
    ParamDescriptor::uint(names::PADDING),
    ParamDescriptor::uint(names::ROUNDS),
];

/// Xors every byte with a key byte; `functions` is configurable so tests can
/// build partial dispatch tables
pub struct XorProvider {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub functions: &'static [FunctionId],
}

pub const ALL_FUNCTIONS: &[FunctionId] = &[
    NewCtx, FreeCtx, DupCtx, EncryptInit, DecryptInit, Update, Final, Cipher, GetParams,
    GettableParams, GetCtxParams, GettableCtxParams, SetCtxParams, SettableCtxParams,
];

impl XorProvider {
    pub fn full(name: &'static str) -> Self {
        Self {
            name,
            aliases: &[],
            functions: ALL_FUNCTIONS,
        }
    }
}

impl CipherProvider for XorProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    fn functions(&self) -> &'static [FunctionId] {
        self.functions
    }

    fn shape(&self) -> CipherShape {
        CipherShape {
            mode: CipherMode::Ecb,
            key_len: 1,
            iv_len: 0,
            block_size: BS,
            flags: AlgorithmFlags::empty(),
        }
    }

    fn new_ctx(&self) -> Result<Box<dyn ProviderCipherContext>> {
        Ok(Box::new(XorCtx {
            key: Xor(0),
            buffer: BlockBuffer::new(BS)?,
            rounds: 1,
        }))
    }

    fn gettable_ctx_params(&self) -> ParamSchema {
        ParamSchema::new(GETTABLE)
    }

    fn settable_ctx_params(&self) -> ParamSchema {
        ParamSchema::new(SETTABLE)
    }
}

struct Xor(u8);

impl BlockTransform for Xor {
    fn process_blocks(&mut self, blocks: &mut [u8]) {
        for b in blocks {
            *b ^= self.0;
        }
    }
}

struct XorCtx {
    key: Xor,
    buffer: BlockBuffer,
    rounds: u64,
}

impl XorCtx {
    fn init(&mut self, key: Option<&[u8]>, decrypting: bool) -> Result<()> {
        if let Some(key) = key {
            validate::key_length(key.len(), 1)?;
            self.key = Xor(key[0]);
        }
        self.buffer.reset(decrypting);
        Ok(())
    }
}

impl ProviderCipherContext for XorCtx {
    fn encrypt_init(&mut self, key: Option<&[u8]>, _iv: Option<&[u8]>) -> Result<()> {
        self.init(key, false)
    }

    fn decrypt_init(&mut self, key: Option<&[u8]>, _iv: Option<&[u8]>) -> Result<()> {
        self.init(key, true)
    }

    fn update(&mut self, data: InOut<'_>) -> Result<usize> {
        self.buffer.update(&mut self.key, data)
    }

    fn finalize(&mut self, out: &mut [u8]) -> Result<usize> {
        self.buffer.finalize(&mut self.key, out)
    }

    fn cipher(&mut self, mut data: InOut<'_>) -> Result<usize> {
        let len = data.input_len();
        validate::block_multiple("cipher", len, BS)?;
        let out = data.stage(len)?;
        self.key.process_blocks(out);
        Ok(len)
    }

    fn get_ctx_params<'a>(&'a self, requests: &mut [ParamRequest<'a>]) -> Result<()> {
        for request in requests.iter_mut() {
            match request.key() {
                names::PADDING => request.set_uint(self.buffer.padding() as u64)?,
                names::KEYLEN => request.set_uint(1)?,
                names::ROUNDS => request.set_uint(self.rounds)?,
                names::IV => request.set_octets(&[])?,
                _ => return Err(Error::unsupported_param(request.key())),
            }
        }
        Ok(())
    }

    fn set_ctx_params(&mut self, params: &[Param<'_>]) -> Result<()> {
        for p in params {
            match p.key {
                names::PADDING => self.buffer.set_padding(p.as_uint()? != 0),
                names::ROUNDS => self.rounds = p.as_uint()?,
                _ => {}
            }
        }
        Ok(())
    }

    fn duplicate(&self) -> Result<Box<dyn ProviderCipherContext>> {
        Ok(Box::new(XorCtx {
            key: Xor(self.key.0),
            buffer: self.buffer.try_clone()?,
            rounds: self.rounds,
        }))
    }
}
