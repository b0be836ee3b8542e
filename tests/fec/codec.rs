//! Reed-Solomon codec behaviour tests, including the reference
//! scenarios for the chunk pipeline.

use qrstitch::codec::{CodecError, RsCodec};

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn test_scenario_clean_run_37_bytes_k10() {
    let codec = RsCodec::new(10);
    let message: Vec<u8> = (0..37u8).map(|i| i.wrapping_mul(7)).collect();

    let codeword = codec.encode(&message);
    assert_eq!(codeword.len(), 47);

    let decoded = codec.decode(&codeword).unwrap();
    assert_eq!(decoded, message);
}

#[test]
fn test_scenario_single_byte_flip_at_position_5() {
    let codec = RsCodec::new(10);
    let message: Vec<u8> = (0..37u8).map(|i| i.wrapping_mul(7)).collect();
    let clean = codec.encode(&message);

    // Any different value at position 5 must be corrected.
    for flip in [0x01u8, 0x80, 0xFF] {
        let mut corrupted = clean.clone();
        corrupted[5] ^= flip;
        assert_eq!(codec.decode(&corrupted).unwrap(), message, "flip {flip:#x}");
    }
}

// ============================================================================
// Correction bounds
// ============================================================================

#[test]
fn test_corrects_exactly_floor_k_over_2() {
    let codec = RsCodec::new(12);
    let message: Vec<u8> = (0..80u8).collect();
    let mut codeword = codec.encode(&message);

    for (i, &pos) in [2usize, 15, 31, 50, 70, 88].iter().enumerate() {
        codeword[pos] ^= (i as u8) + 1;
    }
    assert_eq!(codec.decode(&codeword).unwrap(), message);
}

#[test]
fn test_adjacent_errors_corrected() {
    let codec = RsCodec::new(8);
    let message = b"burst damage hits neighbours".to_vec();
    let mut codeword = codec.encode(&message);

    codeword[10] ^= 0x11;
    codeword[11] ^= 0x22;
    codeword[12] ^= 0x33;
    codeword[13] ^= 0x44;
    assert_eq!(codec.decode(&codeword).unwrap(), message);
}

#[test]
fn test_first_and_last_positions_corrected() {
    let codec = RsCodec::new(6);
    let message = b"edges of the codeword".to_vec();
    let mut codeword = codec.encode(&message);

    codeword[0] ^= 0xAA;
    let last = codeword.len() - 1;
    codeword[last] ^= 0x55;
    assert_eq!(codec.decode(&codeword).unwrap(), message);
}

#[test]
fn test_overload_is_flagged_not_silent() {
    let codec = RsCodec::new(6);
    let message: Vec<u8> = (100..160u8).collect();
    let clean = codec.encode(&message);

    let mut corrupted = clean.clone();
    for pos in 0..10 {
        corrupted[pos * 5] ^= 0xB7;
    }

    match codec.decode(&corrupted) {
        // The usual outcome: the decoder notices it cannot fix this.
        Err(CodecError::UncorrectableErrors(_)) => {}
        // Permitted alternative: the correction landed on a valid
        // codeword (zero post-syndrome); correctness of the message is
        // not guaranteed and not asserted.
        Ok(_) => {}
        Err(other) => panic!("unexpected error kind: {other}"),
    }
}

// ============================================================================
// Shape and configuration
// ============================================================================

#[test]
fn test_various_parity_counts_round_trip() {
    let message = b"parity sweep".to_vec();
    for k in [0usize, 1, 2, 5, 16, 32] {
        let codec = RsCodec::new(k);
        let codeword = codec.encode(&message);
        assert_eq!(codeword.len(), message.len() + k);
        assert_eq!(codec.decode(&codeword).unwrap(), message, "k = {k}");
    }
}

#[test]
fn test_empty_message_round_trip() {
    let codec = RsCodec::new(4);
    let codeword = codec.encode(&[]);
    assert_eq!(codeword.len(), 4);
    assert_eq!(codec.decode(&codeword).unwrap(), Vec::<u8>::new());
}

#[test]
fn test_max_length_codeword() {
    let codec = RsCodec::new(15);
    let message = vec![0xEEu8; 240];
    let mut codeword = codec.encode(&message);
    assert_eq!(codeword.len(), 255);

    codeword[100] ^= 0x01;
    assert_eq!(codec.decode(&codeword).unwrap(), message);
}

#[test]
fn test_single_parity_symbol_never_accepts_damage_as_original() {
    // k = 1 gives distance 2: a single error is either detected or
    // miscorrected onto a neighbouring codeword. What can never happen
    // is the damaged word decoding back to the original message.
    let codec = RsCodec::new(1);
    let message = b"detect only".to_vec();
    let mut codeword = codec.encode(&message);
    codeword[3] ^= 0x40;

    match codec.decode(&codeword) {
        Err(_) => {}
        Ok(decoded) => assert_ne!(decoded, message),
    }
}
