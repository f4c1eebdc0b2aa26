//! Property-based tests for the streaming contract

use dprov::prelude::*;
use dprov_tests::drive::stream;
use proptest::prelude::*;

fn context(name: &str) -> CipherContext {
    dprov::default_registry()
        .unwrap()
        .new_ctx(name, &ProviderContext::default())
        .unwrap()
}

fn init(ctx: &mut CipherContext, encrypt: bool, key: &[u8], iv: &[u8]) {
    let shape = ctx.descriptor().shape();
    let iv = (shape.iv_len > 0).then(|| &iv[..shape.iv_len]);
    let key = &key[..shape.key_len];
    if encrypt {
        ctx.encrypt_init(Some(key), iv, &[]).unwrap();
    } else {
        ctx.decrypt_init(Some(key), iv, &[]).unwrap();
    }
}

/// Sorted cut points inside `0..=len`
fn cuts(max_len: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..=max_len, 0..6).prop_map(|mut v| {
        v.sort_unstable();
        v
    })
}

fn streaming_algorithm() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("AES-128-ECB"),
        Just("AES-256-ECB"),
        Just("AES-128-CBC"),
        Just("AES-192-CBC"),
        Just("AES-256-CBC"),
        Just("AES-128-CTR"),
        Just("AES-256-CTR"),
    ]
}

proptest! {
    #[test]
    fn streaming_is_partition_invariant(
        name in streaming_algorithm(),
        key in any::<[u8; 32]>(),
        iv in any::<[u8; 16]>(),
        data in prop::collection::vec(any::<u8>(), 0..200),
        cut_points in cuts(200),
    ) {
        let mut whole = context(name);
        init(&mut whole, true, &key, &iv);
        let expected = stream(&mut whole, &data, &[]).unwrap();

        let mut parts = context(name);
        init(&mut parts, true, &key, &iv);
        prop_assert_eq!(stream(&mut parts, &data, &cut_points).unwrap(), expected.clone());

        // Decryption is partition invariant too, including the held-back block
        let mut dec = context(name);
        init(&mut dec, false, &key, &iv);
        prop_assert_eq!(stream(&mut dec, &expected, &cut_points).unwrap(), data);
    }

    #[test]
    fn duplicate_diverges_independently(
        name in streaming_algorithm(),
        key in any::<[u8; 32]>(),
        iv in any::<[u8; 16]>(),
        prefix in prop::collection::vec(any::<u8>(), 0..40),
        tail_a in prop::collection::vec(any::<u8>(), 0..40),
        tail_b in prop::collection::vec(any::<u8>(), 0..40),
    ) {
        let mut original = context(name);
        init(&mut original, true, &key, &iv);
        let mut head = vec![0u8; prefix.len() + 16];
        let n = original.update(InOut::split(&prefix, &mut head)).unwrap();
        head.truncate(n);

        let mut copy = original.duplicate().unwrap();
        let rest_a = stream(&mut original, &tail_a, &[]).unwrap();
        let rest_b = stream(&mut copy, &tail_b, &[]).unwrap();

        for (tail, rest) in [(&tail_a, rest_a), (&tail_b, rest_b)] {
            let mut fresh = context(name);
            init(&mut fresh, true, &key, &iv);
            let mut joined = prefix.clone();
            joined.extend_from_slice(tail);
            let mut expected_out = head.clone();
            expected_out.extend_from_slice(&rest);
            prop_assert_eq!(stream(&mut fresh, &joined, &[]).unwrap(), expected_out);
        }
    }

    #[test]
    fn gcm_round_trip_with_any_chunking(
        key in any::<[u8; 32]>(),
        iv in any::<[u8; 12]>(),
        aad in prop::collection::vec(any::<u8>(), 0..40),
        data in prop::collection::vec(any::<u8>(), 0..150),
        cut_points in cuts(150),
    ) {
        let mut enc = context("AES-256-GCM");
        init(&mut enc, true, &key, &iv);
        enc.update_aad(&aad).unwrap();
        let ct = stream(&mut enc, &data, &cut_points).unwrap();
        prop_assert_eq!(ct.len(), data.len());

        let mut tag = [0u8; 16];
        let mut reqs = [ParamRequest::octet_string(names::TAG, &mut tag)];
        enc.get_ctx_params(&mut reqs).unwrap();
        drop(reqs);

        let mut dec = context("AES-256-GCM");
        init(&mut dec, false, &key, &iv);
        dec.set_ctx_params(&[Param::octet_string(names::TAG, &tag)]).unwrap();
        for piece in aad.chunks(7) {
            dec.update_aad(piece).unwrap();
        }
        prop_assert_eq!(stream(&mut dec, &ct, &[]).unwrap(), data);
    }

    #[test]
    fn capacity_shortfall_never_writes(
        key in any::<[u8; 16]>(),
        iv in any::<[u8; 16]>(),
        blocks in 1usize..6,
    ) {
        let mut ctx = context("AES-128-CBC");
        init(&mut ctx, true, &key, &iv);
        let input = vec![0x5au8; blocks * 16];
        let mut out = vec![0xeeu8; blocks * 16 - 1];
        let result = ctx.update(InOut::split(&input, &mut out));
        let is_too_small = matches!(result, Err(Error::BufferTooSmall { .. }));
        prop_assert!(is_too_small);
        prop_assert!(out.iter().all(|&b| b == 0xee));
    }
}
