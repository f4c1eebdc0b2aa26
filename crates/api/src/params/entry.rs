//! Parameter values exchanged between engine and provider

use core::fmt;

use super::ParamType;
use crate::error::{validate, Error, Result};
use dprov_params::symmetric::MAX_UINT_SIZE;

/// Value carried by a set entry
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ParamValue<'a> {
    Uint(u64),
    OctetString(&'a [u8]),
    OctetPtr(&'a [u8]),
}

impl<'a> ParamValue<'a> {
    pub fn data_type(&self) -> ParamType {
        match self {
            ParamValue::Uint(_) => ParamType::UnsignedInteger,
            ParamValue::OctetString(_) => ParamType::OctetString,
            ParamValue::OctetPtr(_) => ParamType::OctetPtr,
        }
    }

    /// Size of the carried data in bytes
    pub fn size(&self) -> usize {
        match self {
            ParamValue::Uint(_) => MAX_UINT_SIZE,
            ParamValue::OctetString(data) | ParamValue::OctetPtr(data) => data.len(),
        }
    }
}

/// One entry of a `set_ctx_params` payload
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Param<'a> {
    pub key: &'a str,
    pub value: ParamValue<'a>,
}

impl<'a> Param<'a> {
    pub fn uint(key: &'a str, value: u64) -> Self {
        Self {
            key,
            value: ParamValue::Uint(value),
        }
    }

    pub fn octet_string(key: &'a str, data: &'a [u8]) -> Self {
        Self {
            key,
            value: ParamValue::OctetString(data),
        }
    }

    pub fn octet_ptr(key: &'a str, data: &'a [u8]) -> Self {
        Self {
            key,
            value: ParamValue::OctetPtr(data),
        }
    }

    /// Reads an unsigned integer value
    pub fn as_uint(&self) -> Result<u64> {
        match self.value {
            ParamValue::Uint(v) => Ok(v),
            _ => Err(Error::invalid_param(self.key, "expected an unsigned integer")),
        }
    }

    /// Reads an unsigned integer value that must fit a `usize`
    pub fn as_usize(&self) -> Result<usize> {
        usize::try_from(self.as_uint()?)
            .map_err(|_| Error::invalid_param(self.key, "value does not fit a size"))
    }

    /// Reads an octet value, copied or borrowed
    pub fn as_octets(&self) -> Result<&'a [u8]> {
        match self.value {
            ParamValue::OctetString(data) | ParamValue::OctetPtr(data) => Ok(data),
            ParamValue::Uint(_) => Err(Error::invalid_param(self.key, "expected an octet string")),
        }
    }
}

// Octet values may hold keys or tags; only their length is printed
impl fmt::Debug for Param<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            ParamValue::Uint(v) => write!(f, "Param({} = {})", self.key, v),
            ParamValue::OctetString(d) => write!(f, "Param({} = <{} octets>)", self.key, d.len()),
            ParamValue::OctetPtr(d) => write!(f, "Param({} = <{} octets, borrowed>)", self.key, d.len()),
        }
    }
}

/// Caller-provided destination of a get entry
pub enum ParamSlot<'a> {
    /// Integer of `width` bytes (1..=8)
    Uint { width: usize, value: Option<u64> },
    /// Caller buffer; `written` records the returned size
    OctetString { buf: &'a mut [u8], written: Option<usize> },
    /// Filled with a view into the callee's data
    OctetPtr(Option<&'a [u8]>),
}

/// One entry of a `get_params` / `get_ctx_params` payload
pub struct ParamRequest<'a> {
    key: &'a str,
    slot: ParamSlot<'a>,
}

impl<'a> ParamRequest<'a> {
    /// 8-byte unsigned integer request
    pub fn uint(key: &'a str) -> Self {
        Self::uint_with_width(key, MAX_UINT_SIZE)
    }

    /// 4-byte unsigned integer request
    pub fn uint32(key: &'a str) -> Self {
        Self::uint_with_width(key, 4)
    }

    fn uint_with_width(key: &'a str, width: usize) -> Self {
        Self {
            key,
            slot: ParamSlot::Uint { width, value: None },
        }
    }

    /// Octet-string request writing into `buf`; `buf.len()` is the capacity
    pub fn octet_string(key: &'a str, buf: &'a mut [u8]) -> Self {
        Self {
            key,
            slot: ParamSlot::OctetString { buf, written: None },
        }
    }

    /// Borrowed octet request
    pub fn octet_ptr(key: &'a str) -> Self {
        Self {
            key,
            slot: ParamSlot::OctetPtr(None),
        }
    }

    pub fn key(&self) -> &'a str {
        self.key
    }

    pub fn data_type(&self) -> ParamType {
        match self.slot {
            ParamSlot::Uint { .. } => ParamType::UnsignedInteger,
            ParamSlot::OctetString { .. } => ParamType::OctetString,
            ParamSlot::OctetPtr(_) => ParamType::OctetPtr,
        }
    }

    /// True once the callee wrote a value
    pub fn is_filled(&self) -> bool {
        match &self.slot {
            ParamSlot::Uint { value, .. } => value.is_some(),
            ParamSlot::OctetString { written, .. } => written.is_some(),
            ParamSlot::OctetPtr(view) => view.is_some(),
        }
    }

    /// Integer written by the callee
    pub fn value_uint(&self) -> Option<u64> {
        match self.slot {
            ParamSlot::Uint { value, .. } => value,
            _ => None,
        }
    }

    /// Octets written or borrowed by the callee
    pub fn value_octets(&self) -> Option<&[u8]> {
        match &self.slot {
            ParamSlot::OctetString { buf, written } => written.map(|n| &buf[..n]),
            ParamSlot::OctetPtr(view) => *view,
            ParamSlot::Uint { .. } => None,
        }
    }

    /// Stores an unsigned integer; fails if it does not fit the slot width
    pub fn set_uint(&mut self, v: u64) -> Result<()> {
        match &mut self.slot {
            ParamSlot::Uint { width, value } => {
                let needed = (u64::BITS - v.leading_zeros()).div_ceil(8) as usize;
                validate::capacity(needed, *width)?;
                *value = Some(v);
                Ok(())
            }
            _ => Err(Error::invalid_param(self.key, "expected an unsigned integer slot")),
        }
    }

    /// Stores a `usize`
    pub fn set_usize(&mut self, v: usize) -> Result<()> {
        self.set_uint(v as u64)
    }

    /// Copies `data` into an octet-string slot.
    ///
    /// Nothing is written when the caller capacity is too small.
    pub fn set_octets(&mut self, data: &[u8]) -> Result<()> {
        match &mut self.slot {
            ParamSlot::OctetString { buf, written } => {
                validate::capacity(data.len(), buf.len())?;
                buf[..data.len()].copy_from_slice(data);
                *written = Some(data.len());
                Ok(())
            }
            ParamSlot::OctetPtr(_) => Err(Error::invalid_param(
                self.key,
                "value cannot be borrowed, request an octet string",
            )),
            ParamSlot::Uint { .. } => Err(Error::invalid_param(self.key, "expected an octet slot")),
        }
    }

    /// Copies into an octet-string slot or lends `data` to an octet-pointer slot
    pub fn set_octets_or_ptr(&mut self, data: &'a [u8]) -> Result<()> {
        match &mut self.slot {
            ParamSlot::OctetPtr(view) => {
                *view = Some(data);
                Ok(())
            }
            _ => self.set_octets(data),
        }
    }
}

impl fmt::Debug for ParamRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamRequest")
            .field("key", &self.key)
            .field("type", &self.data_type())
            .field("filled", &self.is_filled())
            .finish()
    }
}
