//! Property-based checks for the Reed-Solomon codec.

use proptest::prelude::*;
use qrstitch::codec::RsCodec;

proptest! {
    /// Encoding then decoding an undamaged codeword recovers the
    /// message for any parity count the pipeline would configure.
    #[test]
    fn prop_clean_round_trip(
        message in prop::collection::vec(any::<u8>(), 1..150),
        fec_len in 0usize..=16,
    ) {
        let codec = RsCodec::new(fec_len);
        let codeword = codec.encode(&message);
        prop_assert_eq!(codeword.len(), message.len() + fec_len);
        prop_assert_eq!(codec.decode(&codeword)?, message);
    }

    /// Up to floor(k/2) byte errors at distinct positions are always
    /// corrected, wherever they land in the codeword.
    #[test]
    fn prop_errors_within_bound_are_corrected(
        (message, fec_len, corruptions) in
            (prop::collection::vec(any::<u8>(), 1..100), 2usize..=16)
                .prop_flat_map(|(message, fec_len)| {
                    let n = message.len() + fec_len;
                    let max_errors = fec_len / 2;
                    let positions = prop::collection::hash_map(
                        0..n,
                        1u8..=255,
                        1..=max_errors,
                    );
                    (Just(message), Just(fec_len), positions)
                }),
    ) {
        let codec = RsCodec::new(fec_len);
        let mut codeword = codec.encode(&message);
        for (&position, &flip) in &corruptions {
            codeword[position] ^= flip;
        }
        prop_assert_eq!(codec.decode(&codeword)?, message);
    }

    /// Parity symbols are a pure function of the message.
    #[test]
    fn prop_encoding_is_deterministic(
        message in prop::collection::vec(any::<u8>(), 0..120),
        fec_len in 0usize..=16,
    ) {
        let codec = RsCodec::new(fec_len);
        prop_assert_eq!(codec.encode(&message), codec.encode(&message));
    }
}
