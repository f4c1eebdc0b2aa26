//! Counter (CTR) mode provider
//!
//! Counter mode turns the block function into a keystream: successive values
//! of a 128-bit big-endian counter are encrypted and XORed with the data
//! (NIST SP 800-38A). The logical block size is one, so any chunking works
//! and `final` never produces output.
//!
//! The `iv` parameter reports the counter block currently in use and `num`
//! the offset into its keystream, so the pair fully describes the position
//! and can be carried over to another context.

use zeroize::Zeroizing;

use crate::block::AesKey;
use crate::common::{check_iv_len, check_key_len, CIPHER_FUNCTIONS};
use crate::keygen::answer_random_key;
use dprov_api::dispatch::FunctionId;
use dprov_api::error::{validate, Error, Result};
use dprov_api::{
    AlgorithmFlags, CipherMode, CipherProvider, CipherShape, InOut, Param, ParamDescriptor,
    ParamRequest, ParamSchema, ProviderCipherContext,
};
use dprov_internal::endian::increment_be;
use dprov_params::names;
use dprov_params::symmetric::{
    AES128_KEY_SIZE, AES192_KEY_SIZE, AES256_KEY_SIZE, AES_BLOCK_SIZE, AES_IV_SIZE,
};

const GETTABLE: &[ParamDescriptor] = &[
    ParamDescriptor::uint(names::KEYLEN),
    ParamDescriptor::uint(names::IVLEN),
    ParamDescriptor::octet_string(names::IV, AES_IV_SIZE),
    ParamDescriptor::uint(names::NUM),
    ParamDescriptor::octet_string(names::RANDOM_KEY, AES256_KEY_SIZE),
];

const SETTABLE: &[ParamDescriptor] = &[
    ParamDescriptor::uint(names::KEYLEN),
    ParamDescriptor::uint(names::IVLEN),
    ParamDescriptor::uint(names::NUM),
];

/// AES-CTR with one fixed key size
#[derive(Debug, Clone, Copy)]
pub struct AesCtr {
    name: &'static str,
    key_len: usize,
}

impl AesCtr {
    pub const fn new(name: &'static str, key_len: usize) -> Self {
        Self { name, key_len }
    }
}

/// Every CTR variant
pub fn providers() -> [AesCtr; 3] {
    [
        AesCtr::new("AES-128-CTR", AES128_KEY_SIZE),
        AesCtr::new("AES-192-CTR", AES192_KEY_SIZE),
        AesCtr::new("AES-256-CTR", AES256_KEY_SIZE),
    ]
}

impl CipherProvider for AesCtr {
    fn name(&self) -> &'static str {
        self.name
    }

    fn functions(&self) -> &'static [FunctionId] {
        CIPHER_FUNCTIONS
    }

    fn shape(&self) -> CipherShape {
        CipherShape {
            mode: CipherMode::Ctr,
            key_len: self.key_len,
            iv_len: AES_IV_SIZE,
            block_size: 1,
            flags: AlgorithmFlags::RAND_KEY,
        }
    }

    fn new_ctx(&self) -> Result<Box<dyn ProviderCipherContext>> {
        Ok(Box::new(CtrCtx {
            key: None,
            key_len: self.key_len,
            counter: Zeroizing::new([0u8; AES_BLOCK_SIZE]),
            keystream: Zeroizing::new([0u8; AES_BLOCK_SIZE]),
            keystream_valid: false,
            num: 0,
            iv_set: false,
        }))
    }

    fn gettable_ctx_params(&self) -> ParamSchema {
        ParamSchema::new(GETTABLE)
    }

    fn settable_ctx_params(&self) -> ParamSchema {
        ParamSchema::new(SETTABLE)
    }
}

#[derive(Clone)]
struct CtrCtx {
    key: Option<AesKey>,
    key_len: usize,
    /// Counter block whose keystream is being consumed
    counter: Zeroizing<[u8; AES_BLOCK_SIZE]>,
    keystream: Zeroizing<[u8; AES_BLOCK_SIZE]>,
    keystream_valid: bool,
    /// Offset into the keystream of `counter`, always below the block size
    num: usize,
    iv_set: bool,
}

impl CtrCtx {
    fn init(&mut self, key: Option<&[u8]>, iv: Option<&[u8]>) -> Result<()> {
        if let Some(iv) = iv {
            validate::iv_length(iv.len(), AES_IV_SIZE)?;
        }
        if let Some(key) = key {
            self.key = Some(AesKey::new(key, self.key_len)?);
            self.keystream_valid = false;
        }
        if let Some(iv) = iv {
            self.counter.copy_from_slice(iv);
            self.iv_set = true;
            self.keystream_valid = false;
            self.num = 0;
        }
        Ok(())
    }

    fn check_ready(&self, operation: &'static str) -> Result<()> {
        if self.key.is_none() {
            return Err(Error::protocol(operation, "no key has been set"));
        }
        if !self.iv_set {
            return Err(Error::protocol(operation, "no IV has been set"));
        }
        Ok(())
    }

    fn apply_keystream(&mut self, data: &mut [u8], operation: &'static str) -> Result<()> {
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| Error::protocol(operation, "no key has been set"))?;
        for byte in data.iter_mut() {
            if !self.keystream_valid {
                self.keystream.copy_from_slice(&self.counter[..]);
                key.encrypt_block(&mut self.keystream[..]);
                self.keystream_valid = true;
            }
            *byte ^= self.keystream[self.num];
            self.num += 1;
            if self.num == AES_BLOCK_SIZE {
                self.num = 0;
                increment_be(&mut self.counter[..]);
                self.keystream_valid = false;
            }
        }
        Ok(())
    }

    fn process(&mut self, mut data: InOut<'_>, operation: &'static str) -> Result<usize> {
        // Nothing may reach the output before the key and IV are known
        self.check_ready(operation)?;
        let len = data.input_len();
        let out = data.stage(len)?;
        self.apply_keystream(out, operation)?;
        Ok(len)
    }
}

impl ProviderCipherContext for CtrCtx {
    fn encrypt_init(&mut self, key: Option<&[u8]>, iv: Option<&[u8]>) -> Result<()> {
        self.init(key, iv)
    }

    fn decrypt_init(&mut self, key: Option<&[u8]>, iv: Option<&[u8]>) -> Result<()> {
        self.init(key, iv)
    }

    fn update(&mut self, data: InOut<'_>) -> Result<usize> {
        self.process(data, "update")
    }

    fn finalize(&mut self, _out: &mut [u8]) -> Result<usize> {
        Ok(0)
    }

    fn cipher(&mut self, data: InOut<'_>) -> Result<usize> {
        self.process(data, "cipher")
    }

    fn get_ctx_params<'a>(&'a self, requests: &mut [ParamRequest<'a>]) -> Result<()> {
        for request in requests.iter_mut() {
            match request.key() {
                names::KEYLEN => request.set_usize(self.key_len)?,
                names::IVLEN => request.set_usize(AES_IV_SIZE)?,
                names::IV => request.set_octets_or_ptr(&self.counter[..])?,
                names::NUM => request.set_usize(self.num)?,
                names::RANDOM_KEY => answer_random_key(request, self.key_len)?,
                other => return Err(Error::unsupported_param(other)),
            }
        }
        Ok(())
    }

    fn set_ctx_params(&mut self, params: &[Param<'_>]) -> Result<()> {
        for param in params {
            match param.key {
                names::KEYLEN => check_key_len(param, self.key_len)?,
                names::IVLEN => check_iv_len(param, AES_IV_SIZE)?,
                names::NUM => {
                    let num = param.as_usize()?;
                    if num >= AES_BLOCK_SIZE {
                        return Err(Error::invalid_param(
                            param.key,
                            "offset must be below the block size",
                        ));
                    }
                    self.num = num;
                    self.keystream_valid = false;
                }
                other => return Err(Error::unsupported_param(other)),
            }
        }
        Ok(())
    }

    fn duplicate(&self) -> Result<Box<dyn ProviderCipherContext>> {
        Ok(Box::new(self.clone()))
    }
}
