//! TLS record mode for AES-GCM (RFC 5288)
//!
//! Setting `tlsivfixed` puts the context into record mode. Every record is
//! then handled by one in-place `cipher` call over
//! `[explicit IV | payload | tag]`, after `tlsaad` has been set for it.
//!
//! The nonce is the fixed part followed by an 8-byte explicit part. On
//! encrypt the explicit part starts random and is incremented as a
//! big-endian counter after each record; on decrypt it is read from the
//! record.

use super::{GcmCtx, GcmStream};
use crate::keygen::fill_random;
use dprov_api::error::{Error, Result};
use dprov_api::{Direction, InOut};
use dprov_internal::constant_time::{ct_clear_if, ct_eq_choice};
use dprov_internal::endian::increment_be;
use dprov_params::names;
use dprov_params::tls::{
    TLS_AAD_LEN, TLS_AAD_LENGTH_OFFSET, TLS_EXPLICIT_IV_LEN, TLS_FIXED_IV_LEN, TLS_TAG_LEN,
};

const RECORD_OVERHEAD: usize = TLS_EXPLICIT_IV_LEN + TLS_TAG_LEN;

#[derive(Debug, Clone, Default)]
pub(crate) struct TlsState {
    /// Length of the fixed IV part; `Some` means record mode is on
    pub(crate) fixed_len: Option<usize>,
    /// AAD for the next record, length field already corrected
    pub(crate) aad: Option<[u8; TLS_AAD_LEN]>,
    /// Records encrypted under the current key
    pub(crate) records: u64,
}

impl TlsState {
    pub(crate) fn enabled(&self) -> bool {
        self.fixed_len.is_some()
    }
}

impl GcmCtx {
    fn tls_direction(&self, operation: &'static str) -> Result<Direction> {
        self.direction
            .ok_or_else(|| Error::protocol(operation, "context must be initialized first"))
    }

    pub(super) fn set_tls_iv_fixed(&mut self, fixed: &[u8]) -> Result<()> {
        let direction = self.tls_direction("set tlsivfixed")?;
        let len = fixed.len();
        if len < TLS_FIXED_IV_LEN || self.iv_len < len + TLS_EXPLICIT_IV_LEN {
            return Err(Error::invalid_param(
                names::TLS_IV_FIXED,
                "fixed part must leave room for an 8-byte explicit IV",
            ));
        }
        self.iv[..len].copy_from_slice(fixed);
        if direction.is_encrypt() {
            fill_random(&mut self.iv[len..self.iv_len])?;
        }
        self.iv_set = true;
        self.iv_spent = false;
        self.stream = None;
        self.tls.fixed_len = Some(len);
        Ok(())
    }

    pub(super) fn set_tls_aad(&mut self, aad: &[u8]) -> Result<()> {
        let direction = self.tls_direction("set tlsaad")?;
        let mut record_aad: [u8; TLS_AAD_LEN] = aad
            .try_into()
            .map_err(|_| Error::invalid_param(names::TLS_AAD, "TLS AAD must be 13 bytes"))?;

        let at = TLS_AAD_LENGTH_OFFSET;
        let mut len = usize::from(u16::from_be_bytes([record_aad[at], record_aad[at + 1]]));
        len = len
            .checked_sub(TLS_EXPLICIT_IV_LEN)
            .ok_or_else(|| Error::invalid_param(names::TLS_AAD, "record shorter than explicit IV"))?;
        if !direction.is_encrypt() {
            len = len
                .checked_sub(TLS_TAG_LEN)
                .ok_or_else(|| Error::invalid_param(names::TLS_AAD, "record shorter than tag"))?;
        }
        record_aad[at..].copy_from_slice(&(len as u16).to_be_bytes());

        self.tls.aad = Some(record_aad);
        Ok(())
    }

    /// Encrypts or decrypts one whole record in place and returns the
    /// payload length
    pub(super) fn tls_record(&mut self, data: InOut<'_>) -> Result<usize> {
        let InOut::InPlace { buf, len } = data else {
            return Err(Error::protocol("tls record", "records are processed in place"));
        };
        let direction = self.tls_direction("tls record")?;
        if len < RECORD_OVERHEAD {
            return Err(Error::InvalidLength {
                context: "tls record",
                expected: RECORD_OVERHEAD,
                actual: len,
            });
        }
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| Error::protocol("tls record", "no key has been set"))?;
        let aad = self
            .tls
            .aad
            .take()
            .ok_or_else(|| Error::protocol("tls record", "tlsaad must be set for every record"))?;

        let (explicit_iv, rest) = buf[..len].split_at_mut(TLS_EXPLICIT_IV_LEN);
        let (payload, tag) = rest.split_at_mut(len - RECORD_OVERHEAD);
        let explicit = self.iv_len - TLS_EXPLICIT_IV_LEN..self.iv_len;

        if direction.is_encrypt() {
            self.tls.records = self
                .tls
                .records
                .checked_add(1)
                .ok_or_else(|| Error::protocol("tls record", "record limit reached for this key"))?;
            explicit_iv.copy_from_slice(&self.iv[explicit.clone()]);

            let mut stream = GcmStream::start(&self.hash_key, &self.iv[..self.iv_len]);
            stream.aad(&aad)?;
            stream.reserve(payload.len())?;
            stream.payload(key, payload, false);
            tag.copy_from_slice(&stream.finish(key)[..]);

            increment_be(&mut self.iv[explicit]);
        } else {
            self.iv[explicit].copy_from_slice(explicit_iv);

            let mut stream = GcmStream::start(&self.hash_key, &self.iv[..self.iv_len]);
            stream.aad(&aad)?;
            stream.reserve(payload.len())?;
            stream.payload(key, payload, true);
            let computed = stream.finish(key);
            let mismatch = !ct_eq_choice(&computed[..], &*tag);
            ct_clear_if(payload, mismatch);
            if bool::from(mismatch) {
                return Err(Error::AeadTagMismatch);
            }
        }

        Ok(len - RECORD_OVERHEAD)
    }
}
