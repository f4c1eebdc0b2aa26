//! AES-GCM provider (NIST SP 800-38D)
//!
//! The context streams AAD and payload in chunks of any size. GHASH input is
//! buffered to whole blocks here; the GHASH multiplication itself comes from
//! the `ghash` crate. Setting `tlsivfixed` switches the context into TLS
//! record mode.

use ghash::universal_hash::{KeyInit, UniversalHash};
use ghash::GHash;
use zeroize::Zeroizing;

use crate::block::AesKey;
use crate::common::{check_key_len, AEAD_FUNCTIONS};
use crate::keygen::answer_random_key;
use dprov_api::dispatch::FunctionId;
use dprov_api::error::{validate, Error, Result};
use dprov_api::{
    AlgorithmFlags, CipherMode, CipherProvider, CipherShape, Direction, InOut, Param,
    ParamDescriptor, ParamRequest, ParamSchema, ProviderCipherContext,
};
use dprov_internal::constant_time::ct_eq;
use dprov_internal::endian::increment_be32;
use dprov_params::names;
use dprov_params::symmetric::{
    AES128_KEY_SIZE, AES256_KEY_SIZE, AES_BLOCK_SIZE, GCM_DEFAULT_IV_SIZE, GCM_MAX_IV_SIZE,
    GCM_MIN_TAG_SIZE, GCM_TAG_SIZE,
};
use dprov_params::tls::{TLS_AAD_LEN, TLS_TAG_LEN};

mod tls;

use tls::TlsState;

/// Longest payload one key/IV pair may protect: 2^39 - 256 bits
const MAX_PAYLOAD_LEN: u64 = (1 << 36) - 32;

const GETTABLE: &[ParamDescriptor] = &[
    ParamDescriptor::uint(names::KEYLEN),
    ParamDescriptor::uint(names::IVLEN),
    ParamDescriptor::octet_string(names::IV, GCM_MAX_IV_SIZE),
    ParamDescriptor::uint(names::TAGLEN),
    ParamDescriptor::octet_string(names::TAG, GCM_TAG_SIZE),
    ParamDescriptor::uint(names::TLS_AAD_PAD),
    ParamDescriptor::octet_string(names::RANDOM_KEY, AES256_KEY_SIZE),
];

const SETTABLE: &[ParamDescriptor] = &[
    ParamDescriptor::uint(names::KEYLEN),
    ParamDescriptor::uint(names::IVLEN),
    ParamDescriptor::octet_string(names::TAG, GCM_TAG_SIZE),
    ParamDescriptor::octet_string(names::TLS_AAD, TLS_AAD_LEN),
    ParamDescriptor::octet_string(names::TLS_IV_FIXED, GCM_MAX_IV_SIZE),
];

/// AES-GCM with one fixed key size
#[derive(Debug, Clone, Copy)]
pub struct AesGcm {
    name: &'static str,
    aliases: &'static [&'static str],
    key_len: usize,
}

impl AesGcm {
    pub const fn new(name: &'static str, aliases: &'static [&'static str], key_len: usize) -> Self {
        Self {
            name,
            aliases,
            key_len,
        }
    }
}

/// Every GCM variant
pub fn providers() -> [AesGcm; 2] {
    [
        AesGcm::new("AES-128-GCM", &["id-aes128-GCM"], AES128_KEY_SIZE),
        AesGcm::new("AES-256-GCM", &["id-aes256-GCM"], AES256_KEY_SIZE),
    ]
}

impl CipherProvider for AesGcm {
    fn name(&self) -> &'static str {
        self.name
    }

    fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    fn functions(&self) -> &'static [FunctionId] {
        AEAD_FUNCTIONS
    }

    fn shape(&self) -> CipherShape {
        CipherShape {
            mode: CipherMode::Gcm,
            key_len: self.key_len,
            iv_len: GCM_DEFAULT_IV_SIZE,
            block_size: 1,
            flags: AlgorithmFlags::AEAD
                | AlgorithmFlags::CUSTOM_IV
                | AlgorithmFlags::RAND_KEY
                | AlgorithmFlags::TLS_RECORD,
        }
    }

    fn new_ctx(&self) -> Result<Box<dyn ProviderCipherContext>> {
        Ok(Box::new(GcmCtx {
            key: None,
            key_len: self.key_len,
            hash_key: Zeroizing::new([0u8; AES_BLOCK_SIZE]),
            iv: Zeroizing::new([0u8; GCM_MAX_IV_SIZE]),
            iv_len: GCM_DEFAULT_IV_SIZE,
            iv_set: false,
            iv_spent: false,
            direction: None,
            stream: None,
            tag: Zeroizing::new([0u8; GCM_TAG_SIZE]),
            tag_len: GCM_TAG_SIZE,
            tag_state: TagState::Empty,
            tls: TlsState::default(),
        }))
    }

    fn gettable_ctx_params(&self) -> ParamSchema {
        ParamSchema::new(GETTABLE)
    }

    fn settable_ctx_params(&self) -> ParamSchema {
        ParamSchema::new(SETTABLE)
    }
}

/// One GCM computation under a fixed key and IV
#[derive(Clone)]
pub(crate) struct GcmStream {
    j0: Zeroizing<[u8; AES_BLOCK_SIZE]>,
    counter: Zeroizing<[u8; AES_BLOCK_SIZE]>,
    keystream: Zeroizing<[u8; AES_BLOCK_SIZE]>,
    keystream_pos: usize,
    ghash: GHash,
    partial: [u8; AES_BLOCK_SIZE],
    partial_len: usize,
    aad_len: u64,
    payload_len: u64,
    in_payload: bool,
}

impl GcmStream {
    pub(crate) fn start(hash_key: &[u8; AES_BLOCK_SIZE], iv: &[u8]) -> Self {
        let ghash_key = ghash::Key::from(*hash_key);
        let mut j0 = Zeroizing::new([0u8; AES_BLOCK_SIZE]);
        if iv.len() == GCM_DEFAULT_IV_SIZE {
            j0[..GCM_DEFAULT_IV_SIZE].copy_from_slice(iv);
            j0[AES_BLOCK_SIZE - 1] = 1;
        } else {
            // J0 = GHASH(IV || 0-pad || [0]_64 || [len(IV)]_64)
            let mut hash = GHash::new(&ghash_key);
            hash.update_padded(iv);
            let mut lengths = [0u8; AES_BLOCK_SIZE];
            lengths[8..].copy_from_slice(&((iv.len() as u64) * 8).to_be_bytes());
            hash.update_padded(&lengths);
            j0.copy_from_slice(&hash.finalize());
        }

        let mut counter = j0.clone();
        increment_be32(&mut counter);
        Self {
            j0,
            counter,
            keystream: Zeroizing::new([0u8; AES_BLOCK_SIZE]),
            keystream_pos: AES_BLOCK_SIZE,
            ghash: GHash::new(&ghash_key),
            partial: [0u8; AES_BLOCK_SIZE],
            partial_len: 0,
            aad_len: 0,
            payload_len: 0,
            in_payload: false,
        }
    }

    /// Feeds GHASH, keeping an incomplete block for the next call
    fn absorb(&mut self, mut data: &[u8]) {
        if self.partial_len > 0 {
            let take = data.len().min(AES_BLOCK_SIZE - self.partial_len);
            self.partial[self.partial_len..self.partial_len + take].copy_from_slice(&data[..take]);
            self.partial_len += take;
            data = &data[take..];
            if self.partial_len < AES_BLOCK_SIZE {
                return;
            }
            self.ghash.update_padded(&self.partial);
            self.partial_len = 0;
        }
        let whole = data.len() - data.len() % AES_BLOCK_SIZE;
        if whole > 0 {
            self.ghash.update_padded(&data[..whole]);
        }
        let rest = &data[whole..];
        self.partial[..rest.len()].copy_from_slice(rest);
        self.partial_len = rest.len();
    }

    /// Zero-pads and hashes a pending incomplete block
    fn flush(&mut self) {
        if self.partial_len > 0 {
            self.ghash.update_padded(&self.partial[..self.partial_len]);
            self.partial_len = 0;
        }
    }

    pub(crate) fn aad(&mut self, aad: &[u8]) -> Result<()> {
        if self.in_payload {
            return Err(Error::protocol("update_aad", "AAD must precede the payload"));
        }
        self.aad_len += aad.len() as u64;
        self.absorb(aad);
        Ok(())
    }

    /// Checks that `len` more payload bytes stay within the GCM limit
    pub(crate) fn reserve(&self, len: usize) -> Result<()> {
        let total = self.payload_len.checked_add(len as u64);
        match total {
            Some(total) if total <= MAX_PAYLOAD_LEN => Ok(()),
            _ => Err(Error::protocol("update", "GCM payload length limit exceeded")),
        }
    }

    /// Encrypts or decrypts `data` in place. Call [`reserve`](Self::reserve)
    /// first.
    pub(crate) fn payload(&mut self, key: &AesKey, data: &mut [u8], decrypt: bool) {
        if !self.in_payload {
            self.flush();
            self.in_payload = true;
        }
        if decrypt {
            self.absorb(data);
        }
        for byte in data.iter_mut() {
            if self.keystream_pos == AES_BLOCK_SIZE {
                self.keystream.copy_from_slice(&self.counter[..]);
                key.encrypt_block(&mut self.keystream[..]);
                increment_be32(&mut self.counter);
                self.keystream_pos = 0;
            }
            *byte ^= self.keystream[self.keystream_pos];
            self.keystream_pos += 1;
        }
        if !decrypt {
            self.absorb(data);
        }
        self.payload_len += data.len() as u64;
    }

    /// Computes the full-length tag
    pub(crate) fn finish(&mut self, key: &AesKey) -> Zeroizing<[u8; GCM_TAG_SIZE]> {
        self.flush();
        let mut lengths = [0u8; AES_BLOCK_SIZE];
        lengths[..8].copy_from_slice(&(self.aad_len * 8).to_be_bytes());
        lengths[8..].copy_from_slice(&(self.payload_len * 8).to_be_bytes());
        self.ghash.update_padded(&lengths);
        let s = self.ghash.clone().finalize();

        let mut tag = Zeroizing::new(*self.j0);
        key.encrypt_block(&mut tag[..]);
        for (t, x) in tag.iter_mut().zip(s.iter()) {
            *t ^= x;
        }
        tag
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagState {
    Empty,
    /// Produced by an encrypt final
    Computed,
    /// Set by the caller ahead of a decrypt final
    Expected,
}

#[derive(Clone)]
pub(crate) struct GcmCtx {
    key: Option<AesKey>,
    key_len: usize,
    /// E(K, 0^128)
    hash_key: Zeroizing<[u8; AES_BLOCK_SIZE]>,
    iv: Zeroizing<[u8; GCM_MAX_IV_SIZE]>,
    iv_len: usize,
    iv_set: bool,
    /// An encryption was finalized under the current IV
    iv_spent: bool,
    direction: Option<Direction>,
    stream: Option<GcmStream>,
    tag: Zeroizing<[u8; GCM_TAG_SIZE]>,
    tag_len: usize,
    tag_state: TagState,
    tls: TlsState,
}

impl GcmCtx {
    fn init(&mut self, direction: Direction, key: Option<&[u8]>, iv: Option<&[u8]>) -> Result<()> {
        if let Some(iv) = iv {
            validate::iv_length(iv.len(), self.iv_len)?;
        }
        if let Some(key) = key {
            let expanded = AesKey::new(key, self.key_len)?;
            let mut h = [0u8; AES_BLOCK_SIZE];
            expanded.encrypt_block(&mut h);
            self.hash_key.copy_from_slice(&h);
            self.key = Some(expanded);
            self.tls.records = 0;
        }
        if let Some(iv) = iv {
            self.iv[..iv.len()].copy_from_slice(iv);
            self.iv_set = true;
            self.iv_spent = false;
            self.tls.fixed_len = None;
        }
        self.direction = Some(direction);
        self.stream = None;
        self.tag_state = TagState::Empty;
        self.tag_len = GCM_TAG_SIZE;
        self.tls.aad = None;
        Ok(())
    }

    fn decrypting(&self) -> bool {
        self.direction == Some(Direction::Decrypt)
    }

    /// The running computation, started on first use
    fn stream(&mut self, operation: &'static str) -> Result<(&AesKey, &mut GcmStream)> {
        if self.tls.enabled() {
            return Err(Error::protocol(operation, "TLS record mode only supports cipher"));
        }
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| Error::protocol(operation, "no key has been set"))?;
        if !self.iv_set {
            return Err(Error::protocol(operation, "no IV has been set"));
        }
        if self.iv_spent && !self.decrypting() {
            return Err(Error::protocol(operation, "IV already used for an encryption"));
        }
        let stream = self
            .stream
            .get_or_insert_with(|| GcmStream::start(&self.hash_key, &self.iv[..self.iv_len]));
        Ok((key, stream))
    }

    fn process(&mut self, mut data: InOut<'_>, operation: &'static str) -> Result<usize> {
        let decrypt = self.decrypting();
        let len = data.input_len();
        let (key, stream) = self.stream(operation)?;
        stream.reserve(len)?;
        let out = data.stage(len)?;
        stream.payload(key, out, decrypt);
        Ok(len)
    }

    fn set_iv_len(&mut self, param: &Param<'_>) -> Result<()> {
        let len = param.as_usize()?;
        if !(1..=GCM_MAX_IV_SIZE).contains(&len) {
            return Err(Error::InvalidIvLength {
                expected: GCM_DEFAULT_IV_SIZE,
                actual: len,
            });
        }
        if len != self.iv_len {
            self.iv_len = len;
            self.iv_set = false;
            self.stream = None;
        }
        Ok(())
    }

    fn set_tag(&mut self, param: &Param<'_>) -> Result<()> {
        if !self.decrypting() {
            return Err(Error::protocol("set tag", "a tag can only be set for decryption"));
        }
        let tag = param.as_octets()?;
        validate::parameter(
            (GCM_MIN_TAG_SIZE..=GCM_TAG_SIZE).contains(&tag.len()),
            names::TAG,
            "tag length out of range",
        )?;
        self.tag[..tag.len()].copy_from_slice(tag);
        self.tag_len = tag.len();
        self.tag_state = TagState::Expected;
        Ok(())
    }
}

impl ProviderCipherContext for GcmCtx {
    fn encrypt_init(&mut self, key: Option<&[u8]>, iv: Option<&[u8]>) -> Result<()> {
        self.init(Direction::Encrypt, key, iv)
    }

    fn decrypt_init(&mut self, key: Option<&[u8]>, iv: Option<&[u8]>) -> Result<()> {
        self.init(Direction::Decrypt, key, iv)
    }

    fn update(&mut self, data: InOut<'_>) -> Result<usize> {
        self.process(data, "update")
    }

    fn update_aad(&mut self, aad: &[u8]) -> Result<()> {
        let (_, stream) = self.stream("update_aad")?;
        stream.aad(aad)
    }

    fn finalize(&mut self, _out: &mut [u8]) -> Result<usize> {
        let decrypt = self.decrypting();
        if decrypt && self.tag_state != TagState::Expected {
            return Err(Error::protocol("final", "expected tag has not been set"));
        }
        let (key, stream) = self.stream("final")?;
        let computed = stream.finish(key);
        self.stream = None;

        if decrypt {
            let len = self.tag_len;
            self.tag_state = TagState::Empty;
            if !ct_eq(&computed[..len], &self.tag[..len]) {
                return Err(Error::AeadTagMismatch);
            }
        } else {
            self.tag.copy_from_slice(&computed[..]);
            self.tag_len = GCM_TAG_SIZE;
            self.tag_state = TagState::Computed;
            self.iv_spent = true;
        }
        Ok(0)
    }

    fn cipher(&mut self, data: InOut<'_>) -> Result<usize> {
        if self.tls.enabled() {
            return self.tls_record(data);
        }
        self.process(data, "cipher")
    }

    fn get_ctx_params<'a>(&'a self, requests: &mut [ParamRequest<'a>]) -> Result<()> {
        for request in requests.iter_mut() {
            match request.key() {
                names::KEYLEN => request.set_usize(self.key_len)?,
                names::IVLEN => request.set_usize(self.iv_len)?,
                names::IV => request.set_octets_or_ptr(&self.iv[..self.iv_len])?,
                names::TAGLEN => request.set_usize(self.tag_len)?,
                names::TAG => {
                    if self.tag_state != TagState::Computed {
                        return Err(Error::protocol(
                            "get tag",
                            "no tag until an encryption has been finalized",
                        ));
                    }
                    request.set_octets_or_ptr(&self.tag[..self.tag_len])?;
                }
                names::TLS_AAD_PAD => request.set_usize(TLS_TAG_LEN)?,
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
                names::IVLEN => self.set_iv_len(param)?,
                names::TAG => self.set_tag(param)?,
                names::TLS_AAD => self.set_tls_aad(param.as_octets()?)?,
                names::TLS_IV_FIXED => self.set_tls_iv_fixed(param.as_octets()?)?,
                other => return Err(Error::unsupported_param(other)),
            }
        }
        Ok(())
    }

    fn duplicate(&self) -> Result<Box<dyn ProviderCipherContext>> {
        Ok(Box::new(self.clone()))
    }
}
