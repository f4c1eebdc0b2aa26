//! Function identifiers and capability derivation
//!
//! Every operation of the provider contract has a stable numeric identifier.
//! A provider declares the identifiers it implements; the registry derives the
//! algorithm's [`Capabilities`] from that list once, at registration time, so
//! callers never probe for missing entries at call time.
//!
//! Identifiers are append-only: new operations get new numbers and existing
//! numbers are never reused or reassigned.

use core::fmt;

/// Stable identifier of one dispatch-table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum FunctionId {
    NewCtx = 1,
    EncryptInit = 2,
    DecryptInit = 3,
    Update = 4,
    Final = 5,
    Cipher = 6,
    FreeCtx = 7,
    DupCtx = 8,
    GetParams = 9,
    GetCtxParams = 10,
    SetCtxParams = 11,
    GettableParams = 12,
    GettableCtxParams = 13,
    SettableCtxParams = 14,
    UpdateAad = 15,
}

impl FunctionId {
    /// Every identifier in numeric order
    pub const ALL: [FunctionId; 15] = [
        FunctionId::NewCtx,
        FunctionId::EncryptInit,
        FunctionId::DecryptInit,
        FunctionId::Update,
        FunctionId::Final,
        FunctionId::Cipher,
        FunctionId::FreeCtx,
        FunctionId::DupCtx,
        FunctionId::GetParams,
        FunctionId::GetCtxParams,
        FunctionId::SetCtxParams,
        FunctionId::GettableParams,
        FunctionId::GettableCtxParams,
        FunctionId::SettableCtxParams,
        FunctionId::UpdateAad,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_u32(id: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            FunctionId::NewCtx => "newctx",
            FunctionId::EncryptInit => "encrypt_init",
            FunctionId::DecryptInit => "decrypt_init",
            FunctionId::Update => "update",
            FunctionId::Final => "final",
            FunctionId::Cipher => "cipher",
            FunctionId::FreeCtx => "freectx",
            FunctionId::DupCtx => "dupctx",
            FunctionId::GetParams => "get_params",
            FunctionId::GetCtxParams => "get_ctx_params",
            FunctionId::SetCtxParams => "set_ctx_params",
            FunctionId::GettableParams => "gettable_params",
            FunctionId::GettableCtxParams => "gettable_ctx_params",
            FunctionId::SettableCtxParams => "settable_ctx_params",
            FunctionId::UpdateAad => "update_aad",
        }
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.id())
    }
}

bitflags::bitflags! {
    /// Operations an algorithm supports, derived from its dispatch table
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// `encrypt_init` plus a way to process data
        const ENCRYPT = 1 << 0;
        /// `decrypt_init` plus a way to process data
        const DECRYPT = 1 << 1;
        /// `update` + `final`
        const STREAM = 1 << 2;
        /// single-shot `cipher`
        const RAW = 1 << 3;
        /// `dupctx`
        const DUPLICATE = 1 << 4;
        /// `get_params` with its schema
        const GET_PARAMS = 1 << 5;
        /// `get_ctx_params` with its schema
        const GET_CTX_PARAMS = 1 << 6;
        /// `set_ctx_params` with its schema
        const SET_CTX_PARAMS = 1 << 7;
        /// `update_aad`
        const AAD = 1 << 8;
    }
}

/// Capability subset an engine can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    /// Encrypt and decrypt, streaming and raw
    Full,
    EncryptOnly,
    DecryptOnly,
    /// Only the raw `cipher` path, in both directions
    RawOnly,
    /// Any other coherent combination
    Partial,
}

impl Capabilities {
    /// Classifies the set into the subsets engines usually care about
    pub fn kind(self) -> CapabilityKind {
        let both = Capabilities::ENCRYPT | Capabilities::DECRYPT;
        let paths = Capabilities::STREAM | Capabilities::RAW;
        if self.contains(both | paths) {
            CapabilityKind::Full
        } else if self.contains(both | Capabilities::RAW) && !self.contains(Capabilities::STREAM) {
            CapabilityKind::RawOnly
        } else if self.contains(Capabilities::ENCRYPT) && !self.contains(Capabilities::DECRYPT) {
            CapabilityKind::EncryptOnly
        } else if self.contains(Capabilities::DECRYPT) && !self.contains(Capabilities::ENCRYPT) {
            CapabilityKind::DecryptOnly
        } else {
            CapabilityKind::Partial
        }
    }
}

/// Why a dispatch table was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchDefect {
    MissingConstructor,
    MissingDestructor,
    NoDataPath,
    InitWithoutDataPath,
    UpdateWithoutFinal,
    SchemaWithoutAccessor,
    AccessorWithoutSchema,
}

impl DispatchDefect {
    pub fn reason(self) -> &'static str {
        match self {
            DispatchDefect::MissingConstructor => "dispatch table lacks newctx",
            DispatchDefect::MissingDestructor => "dispatch table lacks freectx",
            DispatchDefect::NoDataPath => "dispatch table has no init function",
            DispatchDefect::InitWithoutDataPath => "init present without update/final or cipher",
            DispatchDefect::UpdateWithoutFinal => "update and final must be provided together",
            DispatchDefect::SchemaWithoutAccessor => "schema query without matching get/set function",
            DispatchDefect::AccessorWithoutSchema => "get/set function without matching schema query",
        }
    }
}

/// Derives capabilities from the identifiers a provider implements.
///
/// Mirrors the coherence rules an engine applies when it loads a provider:
/// a constructor and destructor are mandatory, at least one init function must
/// exist, every init must reach a data path, `update` and `final` come as a
/// pair, and each parameter accessor comes with its schema query.
pub fn derive_capabilities(functions: &[FunctionId]) -> Result<Capabilities, DispatchDefect> {
    let has = |f: FunctionId| functions.contains(&f);

    if !has(FunctionId::NewCtx) {
        return Err(DispatchDefect::MissingConstructor);
    }
    if !has(FunctionId::FreeCtx) {
        return Err(DispatchDefect::MissingDestructor);
    }
    if has(FunctionId::Update) != has(FunctionId::Final) {
        return Err(DispatchDefect::UpdateWithoutFinal);
    }

    let stream = has(FunctionId::Update) && has(FunctionId::Final);
    let raw = has(FunctionId::Cipher);
    let encrypt = has(FunctionId::EncryptInit);
    let decrypt = has(FunctionId::DecryptInit);

    if !encrypt && !decrypt {
        return Err(DispatchDefect::NoDataPath);
    }
    if !stream && !raw {
        return Err(DispatchDefect::InitWithoutDataPath);
    }

    let pairs = [
        (FunctionId::GetParams, FunctionId::GettableParams, Capabilities::GET_PARAMS),
        (FunctionId::GetCtxParams, FunctionId::GettableCtxParams, Capabilities::GET_CTX_PARAMS),
        (FunctionId::SetCtxParams, FunctionId::SettableCtxParams, Capabilities::SET_CTX_PARAMS),
    ];

    let mut caps = Capabilities::empty();
    for (accessor, schema, flag) in pairs {
        match (has(accessor), has(schema)) {
            (true, true) => caps |= flag,
            (true, false) => return Err(DispatchDefect::AccessorWithoutSchema),
            (false, true) => return Err(DispatchDefect::SchemaWithoutAccessor),
            (false, false) => {}
        }
    }

    caps.set(Capabilities::ENCRYPT, encrypt);
    caps.set(Capabilities::DECRYPT, decrypt);
    caps.set(Capabilities::STREAM, stream);
    caps.set(Capabilities::RAW, raw);
    caps.set(Capabilities::DUPLICATE, has(FunctionId::DupCtx));
    caps.set(Capabilities::AAD, has(FunctionId::UpdateAad));
    Ok(caps)
}
