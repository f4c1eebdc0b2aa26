//! Cross-crate tests driving the reference providers through the default
//! registry

use dprov::prelude::*;
use dprov_api::{AlgorithmFlags, CapabilityKind, CipherMode};
use dprov_tests::drive::{seeded_bytes, stream, stream_in_place};

const BLOCK_NAMES: [&str; 6] = [
    "AES-128-ECB",
    "AES-192-ECB",
    "AES-256-ECB",
    "AES-128-CBC",
    "AES-192-CBC",
    "AES-256-CBC",
];
const CTR_NAMES: [&str; 3] = ["AES-128-CTR", "AES-192-CTR", "AES-256-CTR"];
const GCM_NAMES: [&str; 2] = ["AES-128-GCM", "AES-256-GCM"];

fn context(name: &str) -> CipherContext {
    dprov::default_registry()
        .unwrap()
        .new_ctx(name, &ProviderContext::default())
        .unwrap()
}

fn key_and_iv(ctx: &CipherContext, seed: u64) -> (Vec<u8>, Option<Vec<u8>>) {
    let shape = ctx.descriptor().shape();
    let key = seeded_bytes(seed, shape.key_len);
    let iv = (shape.iv_len > 0).then(|| seeded_bytes(seed + 1, shape.iv_len));
    (key, iv)
}

fn padding(enabled: bool) -> [Param<'static>; 1] {
    [Param::uint(names::PADDING, enabled as u64)]
}

#[test]
fn test_default_registry_contents() {
    let registry = dprov::default_registry().unwrap();
    assert_eq!(registry.len(), 11);
    for name in BLOCK_NAMES.iter().chain(&CTR_NAMES).chain(&GCM_NAMES) {
        let desc = registry.fetch(name).unwrap();
        assert_eq!(desc.name(), *name);
        assert_eq!(desc.capabilities().kind(), CapabilityKind::Full, "{}", name);
    }
    assert_eq!(registry.fetch("aes-128-gcm").unwrap().name(), "AES-128-GCM");
    assert_eq!(registry.fetch("ID-AES256-GCM").unwrap().name(), "AES-256-GCM");
    assert!(matches!(
        registry.fetch("AES-128-OCB"),
        Err(Error::AlgorithmNotFound { .. })
    ));
}

#[test]
fn test_algorithm_params_match_reference_table() {
    let registry = dprov::default_registry().unwrap();
    let expected: [(&str, CipherMode, u64, u64, u64); 5] = [
        ("AES-192-ECB", CipherMode::Ecb, 24, 0, 16),
        ("AES-128-CBC", CipherMode::Cbc, 16, 16, 16),
        ("AES-256-CTR", CipherMode::Ctr, 32, 16, 1),
        ("AES-128-GCM", CipherMode::Gcm, 16, 12, 1),
        ("AES-256-GCM", CipherMode::Gcm, 32, 12, 1),
    ];
    for (name, mode, keylen, ivlen, blocksize) in expected {
        let desc = registry.fetch(name).unwrap();
        let mut reqs = [
            ParamRequest::uint(names::MODE),
            ParamRequest::uint(names::KEYLEN),
            ParamRequest::uint(names::IVLEN),
            ParamRequest::uint(names::BLOCK_SIZE),
            ParamRequest::uint(names::FLAGS),
        ];
        desc.get_params(&mut reqs).unwrap();
        assert_eq!(reqs[0].value_uint(), Some(mode.id() as u64), "{}", name);
        assert_eq!(reqs[1].value_uint(), Some(keylen), "{}", name);
        assert_eq!(reqs[2].value_uint(), Some(ivlen), "{}", name);
        assert_eq!(reqs[3].value_uint(), Some(blocksize), "{}", name);

        let flags = AlgorithmFlags::from_bits_truncate(reqs[4].value_uint().unwrap());
        assert!(flags.contains(AlgorithmFlags::RAND_KEY));
        assert_eq!(flags.contains(AlgorithmFlags::AEAD), mode == CipherMode::Gcm);
        assert_eq!(flags.contains(AlgorithmFlags::TLS_RECORD), mode == CipherMode::Gcm);
    }
}

#[test]
fn test_block_round_trip_lengths() {
    for name in BLOCK_NAMES {
        for len in [0usize, 1, 15, 16, 17, 48] {
            let pt = seeded_bytes(len as u64, len);
            let mut enc = context(name);
            let (key, iv) = key_and_iv(&enc, 7);
            enc.encrypt_init(Some(&key), iv.as_deref(), &[]).unwrap();
            let ct = stream(&mut enc, &pt, &[]).unwrap();
            // Padding always adds between one and sixteen bytes
            assert_eq!(ct.len(), (len / 16 + 1) * 16, "{} len {}", name, len);

            let mut dec = context(name);
            dec.decrypt_init(Some(&key), iv.as_deref(), &[]).unwrap();
            assert_eq!(stream(&mut dec, &ct, &[]).unwrap(), pt, "{} len {}", name, len);
        }
    }
}

#[test]
fn test_block_round_trip_without_padding() {
    for name in BLOCK_NAMES {
        let pt = seeded_bytes(3, 64);
        let mut enc = context(name);
        let (key, iv) = key_and_iv(&enc, 11);
        enc.encrypt_init(Some(&key), iv.as_deref(), &padding(false)).unwrap();
        let ct = stream(&mut enc, &pt, &[5, 21]).unwrap();
        assert_eq!(ct.len(), 64);

        let mut dec = context(name);
        dec.decrypt_init(Some(&key), iv.as_deref(), &padding(false)).unwrap();
        assert_eq!(stream(&mut dec, &ct, &[40]).unwrap(), pt);

        // A partial trailing block cannot be finalized without padding
        let mut enc = context(name);
        enc.encrypt_init(Some(&key), iv.as_deref(), &padding(false)).unwrap();
        assert!(stream(&mut enc, &pt[..17], &[]).is_err());
    }
}

#[test]
fn test_in_place_matches_split_buffers() {
    for name in BLOCK_NAMES.iter().chain(&CTR_NAMES) {
        let pt = seeded_bytes(5, 75);
        let mut a = context(name);
        let (key, iv) = key_and_iv(&a, 13);
        a.encrypt_init(Some(&key), iv.as_deref(), &[]).unwrap();
        let expected = stream(&mut a, &pt, &[]).unwrap();

        for chunk in [1usize, 7, 16, 33] {
            let mut b = context(name);
            b.encrypt_init(Some(&key), iv.as_deref(), &[]).unwrap();
            assert_eq!(stream_in_place(&mut b, &pt, chunk).unwrap(), expected, "{}", name);
        }
    }
}

#[test]
fn test_ctr_and_gcm_are_length_preserving() {
    for name in CTR_NAMES {
        for len in [0usize, 1, 16, 17, 100] {
            let pt = seeded_bytes(len as u64, len);
            let mut enc = context(name);
            let (key, iv) = key_and_iv(&enc, 17);
            enc.encrypt_init(Some(&key), iv.as_deref(), &[]).unwrap();
            let ct = stream(&mut enc, &pt, &[3]).unwrap();
            assert_eq!(ct.len(), len);

            let mut dec = context(name);
            dec.decrypt_init(Some(&key), iv.as_deref(), &[]).unwrap();
            assert_eq!(stream(&mut dec, &ct, &[]).unwrap(), pt);
        }
    }

    for name in GCM_NAMES {
        let pt = seeded_bytes(19, 70);
        let mut enc = context(name);
        let (key, iv) = key_and_iv(&enc, 23);
        enc.encrypt_init(Some(&key), iv.as_deref(), &[]).unwrap();
        enc.update_aad(b"header").unwrap();
        let ct = stream(&mut enc, &pt, &[10, 50]).unwrap();
        assert_eq!(ct.len(), pt.len());

        let mut tag = [0u8; 16];
        let mut reqs = [ParamRequest::octet_string(names::TAG, &mut tag)];
        enc.get_ctx_params(&mut reqs).unwrap();
        drop(reqs);

        let mut dec = context(name);
        let expected_tag = [Param::octet_string(names::TAG, &tag)];
        dec.decrypt_init(Some(&key), iv.as_deref(), &[]).unwrap();
        dec.update_aad(b"header").unwrap();
        dec.set_ctx_params(&expected_tag).unwrap();
        assert_eq!(stream(&mut dec, &ct, &[33]).unwrap(), pt);
    }
}

#[test]
fn test_capacity_one_byte_short_writes_nothing() {
    let mut ctx = context("AES-128-CBC");
    let (key, iv) = key_and_iv(&ctx, 29);
    ctx.encrypt_init(Some(&key), iv.as_deref(), &[]).unwrap();

    let input = [0x11u8; 32];
    let mut out = [0xaau8; 31];
    assert!(matches!(
        ctx.update(InOut::split(&input, &mut out)),
        Err(Error::BufferTooSmall { required: 32, available: 31 })
    ));
    assert!(out.iter().all(|&b| b == 0xaa));

    // The failed call consumed nothing; the operation still completes
    let mut out = [0u8; 32];
    assert_eq!(ctx.update(InOut::split(&input, &mut out)).unwrap(), 32);
    let mut last = [0xaau8; 15];
    assert!(matches!(
        ctx.finalize(&mut last),
        Err(Error::BufferTooSmall { required: 16, available: 15 })
    ));
    assert!(last.iter().all(|&b| b == 0xaa));
    let mut last = [0u8; 16];
    assert_eq!(ctx.finalize(&mut last).unwrap(), 16);
    assert!(matches!(ctx.state(), StreamState::Finalized(Direction::Encrypt)));
}

#[test]
fn test_malformed_padding_rejected() {
    let mut ctx = context("AES-256-CBC");
    let (key, iv) = key_and_iv(&ctx, 31);

    // Encrypt a block whose last byte is not a valid pad without padding,
    // then decrypt it with padding enabled
    let mut raw = [0x41u8; 16];
    raw[15] = 0x00;
    ctx.encrypt_init(Some(&key), iv.as_deref(), &padding(false)).unwrap();
    let ct = stream(&mut ctx, &raw, &[]).unwrap();

    let mut dec = context("AES-256-CBC");
    dec.decrypt_init(Some(&key), iv.as_deref(), &[]).unwrap();
    assert_eq!(stream(&mut dec, &ct, &[]), Err(Error::InvalidPadding));
    assert!(matches!(dec.state(), StreamState::Finalized(Direction::Decrypt)));
    assert!(matches!(
        dec.update(InOut::split(&ct, &mut [0u8; 32])),
        Err(Error::InvalidState { .. })
    ));
}

#[test]
fn test_parameter_round_trip() {
    let mut cbc = context("AES-192-CBC");
    let (key, iv) = key_and_iv(&cbc, 37);
    cbc.encrypt_init(Some(&key), iv.as_deref(), &[]).unwrap();
    cbc.set_ctx_params(&[Param::uint(names::PADDING, 0), Param::uint(names::KEYLEN, 24)])
        .unwrap();
    let mut reqs = [ParamRequest::uint(names::PADDING), ParamRequest::uint(names::KEYLEN)];
    cbc.get_ctx_params(&mut reqs).unwrap();
    assert_eq!(reqs[0].value_uint(), Some(0));
    assert_eq!(reqs[1].value_uint(), Some(24));

    let mut ctr = context("AES-128-CTR");
    let (key, iv) = key_and_iv(&ctr, 41);
    ctr.encrypt_init(Some(&key), iv.as_deref(), &[]).unwrap();
    ctr.set_ctx_params(&[Param::uint(names::NUM, 9)]).unwrap();
    let mut reqs = [ParamRequest::uint(names::NUM)];
    ctr.get_ctx_params(&mut reqs).unwrap();
    assert_eq!(reqs[0].value_uint(), Some(9));

    let mut gcm = context("AES-128-GCM");
    gcm.encrypt_init(Some(&[0u8; 16]), None, &[Param::uint(names::IVLEN, 16)]).unwrap();
    let mut reqs = [ParamRequest::uint(names::IVLEN)];
    gcm.get_ctx_params(&mut reqs).unwrap();
    assert_eq!(reqs[0].value_uint(), Some(16));
}

#[test]
fn test_octet_pointer_borrows_iv() {
    let mut ctx = context("AES-128-CBC");
    let (key, iv) = key_and_iv(&ctx, 43);
    ctx.encrypt_init(Some(&key), iv.as_deref(), &[]).unwrap();
    let mut reqs = [ParamRequest::octet_ptr(names::IV)];
    ctx.get_ctx_params(&mut reqs).unwrap();
    assert_eq!(reqs[0].value_octets(), iv.as_deref());
}

#[test]
fn test_randkey_fits_the_algorithm() {
    for name in ["AES-192-ECB", "AES-256-CTR", "AES-128-GCM"] {
        let ctx = context(name);
        let key_len = ctx.descriptor().shape().key_len;
        let mut buf = [0u8; 32];
        let mut reqs = [ParamRequest::octet_string(names::RANDOM_KEY, &mut buf)];
        ctx.get_ctx_params(&mut reqs).unwrap();
        let key = reqs[0].value_octets().unwrap().to_vec();
        drop(reqs);
        assert_eq!(key.len(), key_len);

        let mut fresh = context(name);
        let (_, iv) = key_and_iv(&fresh, 47);
        fresh.encrypt_init(Some(&key), iv.as_deref(), &[]).unwrap();
    }
}

#[test]
fn test_unknown_parameter_policy() {
    let registry = dprov::default_registry().unwrap();
    let params = [Param::uint(names::PADDING, 0), Param::uint(names::ROUNDS, 12)];

    let mut strict = registry.new_ctx("AES-128-ECB", &ProviderContext::default()).unwrap();
    strict.encrypt_init(Some(&[0u8; 16]), None, &[]).unwrap();
    assert!(matches!(
        strict.set_ctx_params(&params),
        Err(Error::UnsupportedParameter { .. })
    ));
    // Nothing from the rejected set was applied
    let mut reqs = [ParamRequest::uint(names::PADDING)];
    strict.get_ctx_params(&mut reqs).unwrap();
    assert_eq!(reqs[0].value_uint(), Some(1));

    let lenient = ProviderContext::default().with_unknown_params(UnknownParamPolicy::Ignore);
    let mut ctx = registry.new_ctx("AES-128-ECB", &lenient).unwrap();
    ctx.encrypt_init(Some(&[0u8; 16]), None, &[]).unwrap();
    ctx.set_ctx_params(&params).unwrap();
    let mut reqs = [ParamRequest::uint(names::PADDING)];
    ctx.get_ctx_params(&mut reqs).unwrap();
    assert_eq!(reqs[0].value_uint(), Some(0));

    // Gets stay strict under either policy
    let mut reqs = [ParamRequest::uint(names::ROUNDS)];
    assert!(matches!(
        ctx.get_ctx_params(&mut reqs),
        Err(Error::UnsupportedParameter { .. })
    ));
}

#[test]
fn test_tls_records_through_registry() {
    let key = seeded_bytes(53, 32);
    let fixed = [Param::octet_string(names::TLS_IV_FIXED, &[9, 8, 7, 6])];
    let mut enc = context("AES-256-GCM");
    enc.encrypt_init(Some(&key), None, &fixed).unwrap();
    let mut dec = context("AES-256-GCM");
    dec.decrypt_init(Some(&key), None, &fixed).unwrap();

    for payload_len in [0usize, 1, 100] {
        let payload = seeded_bytes(payload_len as u64, payload_len);
        let mut record = vec![0u8; payload_len + 24];
        record[8..8 + payload_len].copy_from_slice(&payload);

        let mut aad = [0u8; 13];
        aad[8] = 23;
        aad[11..].copy_from_slice(&((payload_len + 8) as u16).to_be_bytes());
        enc.set_ctx_params(&[Param::octet_string(names::TLS_AAD, &aad)]).unwrap();
        let len = record.len();
        let n = enc.cipher(InOut::in_place(&mut record, len).unwrap()).unwrap();
        assert_eq!(n, payload_len);

        aad[11..].copy_from_slice(&(len as u16).to_be_bytes());
        dec.set_ctx_params(&[Param::octet_string(names::TLS_AAD, &aad)]).unwrap();
        let n = dec.cipher(InOut::in_place(&mut record, len).unwrap()).unwrap();
        assert_eq!(n, payload_len);
        assert_eq!(&record[8..8 + n], &payload[..]);
    }
}

#[test]
fn test_partial_overlap_detected() {
    let mut buf = [0u8; 64];
    assert!(matches!(
        InOut::within(&mut buf, 0..32, 4..36),
        Err(Error::PartialOverlap)
    ));

    let mut ctx = context("AES-128-CTR");
    let (key, iv) = key_and_iv(&ctx, 59);
    ctx.encrypt_init(Some(&key), iv.as_deref(), &[]).unwrap();
    buf[..16].copy_from_slice(&[3u8; 16]);
    let n = ctx.update(InOut::within(&mut buf, 0..16, 32..48).unwrap()).unwrap();
    assert_eq!(n, 16);
    assert_ne!(buf[32..48], [3u8; 16]);
}

#[test]
fn test_schemas_render_for_tooling() {
    let registry = dprov::default_registry().unwrap();
    let desc = registry.fetch("AES-128-GCM").unwrap();
    let listing = desc.settable_ctx_params().to_string();
    assert!(listing.lines().any(|l| l.starts_with("tlsaad")));
    assert!(listing.lines().any(|l| l.starts_with("tlsivfixed")));
    assert_eq!(listing.lines().count(), desc.settable_ctx_params().len());
}

#[test]
fn test_contexts_are_send_and_registry_is_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Send + Sync>() {}
    assert_send::<CipherContext>();
    assert_sync::<Registry>();

    let registry = dprov::default_registry().unwrap();
    let handles: Vec<_> = (0..4u8)
        .map(|i| {
            let mut ctx = registry.new_ctx("AES-128-CTR", &ProviderContext::default()).unwrap();
            std::thread::spawn(move || {
                ctx.encrypt_init(Some(&[i; 16]), Some(&[0u8; 16]), &[]).unwrap();
                stream(&mut ctx, &[0u8; 40], &[]).unwrap()
            })
        })
        .collect();
    let outputs: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_ne!(outputs[0], outputs[1]);
}
