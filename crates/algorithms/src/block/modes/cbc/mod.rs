//! ECB and CBC providers
//!
//! Both modes follow NIST SP 800-38A. ECB is handled as CBC without the
//! chaining step, so the two share one context type.

use zeroize::Zeroizing;

use crate::block::AesKey;
use crate::common::{check_iv_len, check_key_len, CIPHER_FUNCTIONS};
use crate::keygen::answer_random_key;
use dprov_api::dispatch::FunctionId;
use dprov_api::error::{validate, Error, Result};
use dprov_api::{
    AlgorithmFlags, CipherMode, CipherProvider, CipherShape, Direction, InOut, Param,
    ParamDescriptor, ParamRequest, ParamSchema, ProviderCipherContext,
};
use dprov_core::block::{BlockBuffer, BlockTransform};
use dprov_params::names;
use dprov_params::symmetric::{
    AES128_KEY_SIZE, AES192_KEY_SIZE, AES256_KEY_SIZE, AES_BLOCK_SIZE, AES_IV_SIZE,
};

/// How consecutive blocks are linked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chaining {
    Ecb,
    Cbc,
}

impl Chaining {
    fn iv_len(self) -> usize {
        match self {
            Chaining::Ecb => 0,
            Chaining::Cbc => AES_IV_SIZE,
        }
    }

    fn mode(self) -> CipherMode {
        match self {
            Chaining::Ecb => CipherMode::Ecb,
            Chaining::Cbc => CipherMode::Cbc,
        }
    }
}

const ECB_GETTABLE: &[ParamDescriptor] = &[
    ParamDescriptor::uint(names::PADDING),
    ParamDescriptor::uint(names::KEYLEN),
    ParamDescriptor::uint(names::IVLEN),
    ParamDescriptor::octet_string(names::RANDOM_KEY, AES256_KEY_SIZE),
];

const CBC_GETTABLE: &[ParamDescriptor] = &[
    ParamDescriptor::uint(names::PADDING),
    ParamDescriptor::uint(names::KEYLEN),
    ParamDescriptor::uint(names::IVLEN),
    ParamDescriptor::octet_string(names::IV, AES_IV_SIZE),
    ParamDescriptor::octet_string(names::RANDOM_KEY, AES256_KEY_SIZE),
];

const SETTABLE: &[ParamDescriptor] = &[
    ParamDescriptor::uint(names::PADDING),
    ParamDescriptor::uint(names::KEYLEN),
    ParamDescriptor::uint(names::IVLEN),
];

/// AES in ECB or CBC mode with one fixed key size
#[derive(Debug, Clone, Copy)]
pub struct AesBlockMode {
    name: &'static str,
    key_len: usize,
    chaining: Chaining,
}

impl AesBlockMode {
    pub const fn new(name: &'static str, key_len: usize, chaining: Chaining) -> Self {
        Self {
            name,
            key_len,
            chaining,
        }
    }
}

/// Every ECB and CBC variant
pub fn providers() -> [AesBlockMode; 6] {
    [
        AesBlockMode::new("AES-128-ECB", AES128_KEY_SIZE, Chaining::Ecb),
        AesBlockMode::new("AES-192-ECB", AES192_KEY_SIZE, Chaining::Ecb),
        AesBlockMode::new("AES-256-ECB", AES256_KEY_SIZE, Chaining::Ecb),
        AesBlockMode::new("AES-128-CBC", AES128_KEY_SIZE, Chaining::Cbc),
        AesBlockMode::new("AES-192-CBC", AES192_KEY_SIZE, Chaining::Cbc),
        AesBlockMode::new("AES-256-CBC", AES256_KEY_SIZE, Chaining::Cbc),
    ]
}

impl CipherProvider for AesBlockMode {
    fn name(&self) -> &'static str {
        self.name
    }

    fn functions(&self) -> &'static [FunctionId] {
        CIPHER_FUNCTIONS
    }

    fn shape(&self) -> CipherShape {
        CipherShape {
            mode: self.chaining.mode(),
            key_len: self.key_len,
            iv_len: self.chaining.iv_len(),
            block_size: AES_BLOCK_SIZE,
            flags: AlgorithmFlags::RAND_KEY,
        }
    }

    fn new_ctx(&self) -> Result<Box<dyn ProviderCipherContext>> {
        Ok(Box::new(BlockModeCtx {
            key: None,
            key_len: self.key_len,
            chaining: self.chaining,
            iv: Zeroizing::new([0u8; AES_IV_SIZE]),
            iv_set: false,
            buffer: BlockBuffer::new(AES_BLOCK_SIZE)?,
            direction: None,
        }))
    }

    fn gettable_ctx_params(&self) -> ParamSchema {
        match self.chaining {
            Chaining::Ecb => ParamSchema::new(ECB_GETTABLE),
            Chaining::Cbc => ParamSchema::new(CBC_GETTABLE),
        }
    }

    fn settable_ctx_params(&self) -> ParamSchema {
        ParamSchema::new(SETTABLE)
    }
}

/// Block function plus chaining state for one call
struct Chain<'a> {
    key: &'a AesKey,
    chaining: Chaining,
    iv: &'a mut [u8; AES_IV_SIZE],
    decrypt: bool,
}

impl BlockTransform for Chain<'_> {
    fn process_blocks(&mut self, blocks: &mut [u8]) {
        for block in blocks.chunks_exact_mut(AES_BLOCK_SIZE) {
            match (self.chaining, self.decrypt) {
                (Chaining::Ecb, false) => self.key.encrypt_block(block),
                (Chaining::Ecb, true) => self.key.decrypt_block(block),
                (Chaining::Cbc, false) => {
                    xor_in_place(block, &self.iv[..]);
                    self.key.encrypt_block(block);
                    self.iv.copy_from_slice(block);
                }
                (Chaining::Cbc, true) => {
                    let mut next = [0u8; AES_BLOCK_SIZE];
                    next.copy_from_slice(block);
                    self.key.decrypt_block(block);
                    xor_in_place(block, &self.iv[..]);
                    *self.iv = next;
                }
            }
        }
    }
}

fn xor_in_place(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

struct BlockModeCtx {
    key: Option<AesKey>,
    key_len: usize,
    chaining: Chaining,
    iv: Zeroizing<[u8; AES_IV_SIZE]>,
    iv_set: bool,
    buffer: BlockBuffer,
    direction: Option<Direction>,
}

impl BlockModeCtx {
    fn init(&mut self, direction: Direction, key: Option<&[u8]>, iv: Option<&[u8]>) -> Result<()> {
        // ECB has no IV; one passed anyway is ignored
        let iv = iv.filter(|_| self.chaining == Chaining::Cbc);
        if let Some(iv) = iv {
            validate::iv_length(iv.len(), AES_IV_SIZE)?;
        }
        if let Some(key) = key {
            self.key = Some(AesKey::new(key, self.key_len)?);
        }
        if let Some(iv) = iv {
            self.iv.copy_from_slice(iv);
            self.iv_set = true;
        }
        self.direction = Some(direction);
        self.buffer.reset(direction == Direction::Decrypt);
        Ok(())
    }

    /// Borrows the pieces a transform needs, failing if the context cannot
    /// process data yet
    fn chain(&mut self, operation: &'static str) -> Result<(Chain<'_>, &mut BlockBuffer)> {
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| Error::protocol(operation, "no key has been set"))?;
        if self.chaining == Chaining::Cbc && !self.iv_set {
            return Err(Error::protocol(operation, "no IV has been set"));
        }
        let chain = Chain {
            key,
            chaining: self.chaining,
            iv: &mut self.iv,
            decrypt: self.direction == Some(Direction::Decrypt),
        };
        Ok((chain, &mut self.buffer))
    }
}

impl ProviderCipherContext for BlockModeCtx {
    fn encrypt_init(&mut self, key: Option<&[u8]>, iv: Option<&[u8]>) -> Result<()> {
        self.init(Direction::Encrypt, key, iv)
    }

    fn decrypt_init(&mut self, key: Option<&[u8]>, iv: Option<&[u8]>) -> Result<()> {
        self.init(Direction::Decrypt, key, iv)
    }

    fn update(&mut self, data: InOut<'_>) -> Result<usize> {
        let (mut chain, buffer) = self.chain("update")?;
        buffer.update(&mut chain, data)
    }

    fn finalize(&mut self, out: &mut [u8]) -> Result<usize> {
        let (mut chain, buffer) = self.chain("final")?;
        buffer.finalize(&mut chain, out)
    }

    fn cipher(&mut self, mut data: InOut<'_>) -> Result<usize> {
        let len = data.input_len();
        validate::block_multiple("cipher input", len, AES_BLOCK_SIZE)?;
        let (mut chain, _) = self.chain("cipher")?;
        let out = data.stage(len)?;
        chain.process_blocks(out);
        Ok(len)
    }

    fn get_ctx_params<'a>(&'a self, requests: &mut [ParamRequest<'a>]) -> Result<()> {
        for request in requests.iter_mut() {
            match request.key() {
                names::PADDING => request.set_uint(u64::from(self.buffer.padding()))?,
                names::KEYLEN => request.set_usize(self.key_len)?,
                names::IVLEN => request.set_usize(self.chaining.iv_len())?,
                names::IV => request.set_octets_or_ptr(&self.iv[..self.chaining.iv_len()])?,
                names::RANDOM_KEY => answer_random_key(request, self.key_len)?,
                other => return Err(Error::unsupported_param(other)),
            }
        }
        Ok(())
    }

    fn set_ctx_params(&mut self, params: &[Param<'_>]) -> Result<()> {
        for param in params {
            match param.key {
                names::PADDING => self.buffer.set_padding(param.as_uint()? != 0),
                names::KEYLEN => check_key_len(param, self.key_len)?,
                names::IVLEN => check_iv_len(param, self.chaining.iv_len())?,
                other => return Err(Error::unsupported_param(other)),
            }
        }
        Ok(())
    }

    fn duplicate(&self) -> Result<Box<dyn ProviderCipherContext>> {
        Ok(Box::new(BlockModeCtx {
            key: self.key.clone(),
            key_len: self.key_len,
            chaining: self.chaining,
            iv: self.iv.clone(),
            iv_set: self.iv_set,
            buffer: self.buffer.try_clone()?,
            direction: self.direction,
        }))
    }
}
