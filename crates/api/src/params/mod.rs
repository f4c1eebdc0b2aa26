//! Self-describing parameter schema
//!
//! A [`ParamSchema`] tells an engine which knobs exist without carrying any
//! values: for each parameter its name, semantic type and maximum size. The
//! same shape is used for the values exchanged through `get_*params` and
//! `set_ctx_params` (see [`Param`] and [`ParamRequest`]).
//!
//! Parameter sets are plain slices. The end of the slice is the terminator;
//! no count is carried separately and nothing past the end is read.

use core::fmt;

use crate::error::{Error, Result};
use dprov_params::symmetric::MAX_UINT_SIZE;

pub mod entry;

pub use entry::{Param, ParamRequest, ParamSlot, ParamValue};

/// Semantic type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Unsigned integer of at most 8 bytes
    UnsignedInteger,
    /// Octet string copied into or out of the callee
    OctetString,
    /// Borrowed octet view; no copy is made
    OctetPtr,
}

impl ParamType {
    /// Octet strings and octet pointers carry the same data and may stand in
    /// for each other; integers only match integers.
    pub fn is_compatible(self, other: ParamType) -> bool {
        match (self, other) {
            (ParamType::UnsignedInteger, ParamType::UnsignedInteger) => true,
            (ParamType::UnsignedInteger, _) | (_, ParamType::UnsignedInteger) => false,
            _ => true,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ParamType::UnsignedInteger => "uint",
            ParamType::OctetString => "octet-string",
            ParamType::OctetPtr => "octet-ptr",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maximum size marker for parameters without an upper bound
pub const UNBOUNDED: usize = usize::MAX;

/// Static description of one parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub name: &'static str,
    pub data_type: ParamType,
    pub max_size: usize,
}

impl ParamDescriptor {
    /// Unsigned integer parameter
    pub const fn uint(name: &'static str) -> Self {
        Self {
            name,
            data_type: ParamType::UnsignedInteger,
            max_size: MAX_UINT_SIZE,
        }
    }

    /// Octet-string parameter of at most `max_size` bytes
    pub const fn octet_string(name: &'static str, max_size: usize) -> Self {
        Self {
            name,
            data_type: ParamType::OctetString,
            max_size,
        }
    }
}

/// What to do with a parameter name the settable schema does not list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownParamPolicy {
    /// Fail the whole set with [`Error::UnsupportedParameter`]
    #[default]
    Reject,
    /// Skip the entry and apply the rest
    Ignore,
}

/// Ordered, immutable list of parameter descriptors
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ParamSchema {
    entries: &'static [ParamDescriptor],
}

impl ParamSchema {
    /// Schema without any parameter
    pub const EMPTY: ParamSchema = ParamSchema { entries: &[] };

    /// Wraps a static descriptor table
    pub const fn new(entries: &'static [ParamDescriptor]) -> Self {
        Self { entries }
    }

    /// Descriptors in declaration order
    pub fn iter(&self) -> core::slice::Iter<'static, ParamDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the descriptor for `name`
    pub fn find(&self, name: &str) -> Option<&'static ParamDescriptor> {
        self.entries.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Validates a set payload once, before any entry is applied.
    ///
    /// Checks name (under `policy`), type tag compatibility and size against
    /// the declared maximum.
    pub fn check_set(&self, params: &[Param<'_>], policy: UnknownParamPolicy) -> Result<()> {
        for param in params {
            let Some(desc) = self.find(param.key) else {
                match policy {
                    UnknownParamPolicy::Reject => return Err(Error::unsupported_param(param.key)),
                    UnknownParamPolicy::Ignore => continue,
                }
            };
            let value_type = param.value.data_type();
            if !desc.data_type.is_compatible(value_type) {
                return Err(Error::invalid_param(param.key, "type tag does not match schema"));
            }
            if param.value.size() > desc.max_size {
                return Err(Error::invalid_param(param.key, "value exceeds declared maximum size"));
            }
        }
        Ok(())
    }

    /// Validates a get payload: every name must be known and every slot must
    /// have a compatible type.
    pub fn check_get(&self, requests: &[ParamRequest<'_>]) -> Result<()> {
        for request in requests {
            let desc = self
                .find(request.key())
                .ok_or_else(|| Error::unsupported_param(request.key()))?;
            if !desc.data_type.is_compatible(request.data_type()) {
                return Err(Error::invalid_param(request.key(), "type tag does not match schema"));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ParamSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

/// One line per parameter, for tooling that lists every supported knob
impl fmt::Display for ParamSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for desc in self.entries {
            if desc.max_size == UNBOUNDED {
                writeln!(f, "{:<14} {}", desc.name, desc.data_type)?;
            } else {
                writeln!(f, "{:<14} {} (max {} bytes)", desc.name, desc.data_type, desc.max_size)?;
            }
        }
        Ok(())
    }
}

impl<'s> IntoIterator for &'s ParamSchema {
    type Item = &'static ParamDescriptor;
    type IntoIter = core::slice::Iter<'static, ParamDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
