//! Property-based and adversarial tests for the transaction JSON codec
//!
//! These tests verify invariants hold under random inputs and tampered documents.

use proptest::prelude::*;
use rh_visor::crypto::{hash_bytes, Hash, PrivateKey, Signature};
use rh_visor::validation::{Transaction, TransactionError, TransactionOutput};
use rh_visor::visor::{
    decode_transaction, encode_transaction, CodecError, TransactionJson, TransactionStatus,
};
use rh_visor::wallet::Address;

fn key(seed: u64) -> PrivateKey {
    PrivateKey::from_bytes(&hash_bytes(&seed.to_le_bytes()).0).unwrap()
}

fn address(seed: u64) -> Address {
    Address::from_public_key(&key(seed).public_key())
}

fn signed_transaction(n_inputs: usize, outputs: &[(u64, u64)]) -> Transaction {
    let inputs: Vec<Hash> = (0..n_inputs as u64)
        .map(|i| hash_bytes(&i.to_be_bytes()))
        .collect();
    let outputs = outputs
        .iter()
        .enumerate()
        .map(|(i, &(coins, hours))| TransactionOutput::new(address(i as u64), coins, hours))
        .collect();
    let keys: Vec<PrivateKey> = (0..n_inputs as u64).map(|i| key(1_000 + i)).collect();

    let mut tx = Transaction::new(inputs, outputs);
    tx.sign_inputs(&keys).unwrap();
    tx
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Encode then decode reproduces the transaction exactly
    #[test]
    fn prop_codec_roundtrip(
        n_inputs in 1usize..4,
        outputs in prop::collection::vec((1u64..1_000_000, 0u64..1_000_000), 1..5)
    ) {
        let tx = signed_transaction(n_inputs, &outputs);
        let decoded = decode_transaction(&encode_transaction(&tx).unwrap()).unwrap();

        prop_assert_eq!(&decoded, &tx);
        prop_assert_eq!(decoded.hash(), tx.hash());
        prop_assert!(decoded.verify().is_ok());
    }

    /// Output order survives the round trip
    #[test]
    fn prop_output_order_preserved(
        outputs in prop::collection::vec((1u64..1_000, 0u64..1_000), 1..6)
    ) {
        let tx = signed_transaction(1, &outputs);
        let decoded = decode_transaction(&encode_transaction(&tx).unwrap()).unwrap();

        let coins: Vec<(u64, u64)> = decoded.outputs.iter().map(|o| (o.coins, o.hours)).collect();
        prop_assert_eq!(coins, outputs);
    }

    /// A non-hex character in any input is reported at that input's index
    #[test]
    fn prop_corrupt_input_reported_at_index(
        n_inputs in 1usize..4,
        pick in 0usize..4,
        position in 0usize..64
    ) {
        let target = pick % n_inputs;
        let tx = signed_transaction(n_inputs, &[(10, 1)]);
        let mut doc = TransactionJson::try_from(&tx).unwrap();
        doc.inputs[target].replace_range(position..position + 1, "z");

        let is_expected = matches!(
            doc.to_transaction(),
            Err(CodecError::InvalidInputEncoding { index, .. }) if index == target
        );
        prop_assert!(is_expected);
    }

    /// Truncated signatures are rejected at their index
    #[test]
    fn prop_short_signature_rejected(n_inputs in 1usize..4, keep in 0usize..65) {
        let tx = signed_transaction(n_inputs, &[(10, 1)]);
        let mut doc = TransactionJson::try_from(&tx).unwrap();
        let last = n_inputs - 1;
        doc.sigs[last].truncate(keep * 2);

        let is_expected = matches!(
            doc.to_transaction(),
            Err(CodecError::InvalidSignatureEncoding { index, .. }) if index == last
        );
        prop_assert!(is_expected);
    }

    /// Changing a character of an address breaks its checksum or encoding
    #[test]
    fn prop_corrupt_address_rejected(position in 2usize..20) {
        let tx = signed_transaction(1, &[(10, 1), (20, 2)]);
        let mut doc = TransactionJson::try_from(&tx).unwrap();

        let original = doc.outputs[1].address.clone();
        let replacement = if &original[position..position + 1] == "2" { "3" } else { "2" };
        doc.outputs[1].address.replace_range(position..position + 1, replacement);

        let is_expected = matches!(
            doc.to_transaction(),
            Err(CodecError::InvalidAddressEncoding { index: 1, .. })
        );
        prop_assert!(is_expected);
    }

    /// Confirmed status exposes exactly one flag and its height
    #[test]
    fn prop_confirmed_status_flags(height in 1u64..u64::MAX) {
        let status = TransactionStatus::confirmed(height).unwrap();
        prop_assert!(status.is_confirmed());
        prop_assert!(!status.is_unconfirmed());
        prop_assert!(!status.is_unknown());
        prop_assert_eq!(status.height(), height);

        let json = serde_json::to_string(&status).unwrap();
        let parsed: TransactionStatus = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, status);
    }
}

// ============================================================================
// ADVERSARIAL TESTS
// ============================================================================

/// Test: Encoding refuses a transaction carrying an unrecoverable signature
#[test]
fn test_encode_fails_closed_on_bad_signature() {
    let mut tx = signed_transaction(2, &[(10, 1)]);
    tx.sigs[1] = Signature::from_bytes(&[0u8; 65]);

    assert!(matches!(
        encode_transaction(&tx),
        Err(CodecError::VerificationFailed(TransactionError::InvalidSignature(1)))
    ));
}

/// Test: Encoding refuses a transaction that spends nothing
#[test]
fn test_encode_fails_closed_on_zero_inputs() {
    let tx = Transaction::new(vec![], vec![TransactionOutput::new(address(0), 10, 1)]);

    assert!(matches!(
        encode_transaction(&tx),
        Err(CodecError::VerificationFailed(TransactionError::NoInputs))
    ));
}

/// Test: Encoding refuses a transaction spending the same output twice
#[test]
fn test_encode_fails_closed_on_duplicate_input() {
    let input = hash_bytes(b"spent twice");
    let mut tx = Transaction::new(vec![input, input], vec![TransactionOutput::new(address(0), 10, 1)]);
    tx.sign_inputs(&[key(1), key(2)]).unwrap();

    assert!(matches!(
        encode_transaction(&tx),
        Err(CodecError::VerificationFailed(TransactionError::DuplicateInput(1)))
    ));
}

/// Test: Encoding refuses a transaction whose header was tampered with
#[test]
fn test_encode_fails_closed_on_stale_header() {
    let mut tx = signed_transaction(1, &[(10, 1)]);
    tx.outputs[0].coins = 11;

    assert!(encode_transaction(&tx).is_err());
}

/// Test: Confirmed height of zero is unrepresentable
#[test]
fn test_confirmed_height_zero_rejected() {
    assert!(TransactionStatus::confirmed(0).is_err());
    assert!(serde_json::from_str::<TransactionStatus>(
        r#"{"unconfirmed":false,"unknown":false,"confirmed":true,"height":0}"#
    )
    .is_err());
}

/// Test: Extra fields in a document are tolerated, missing ones are not
#[test]
fn test_decode_document_fields() {
    let tx = signed_transaction(1, &[(10, 1)]);
    let mut value: serde_json::Value =
        serde_json::from_str(&encode_transaction(&tx).unwrap()).unwrap();

    value["comment"] = serde_json::json!("ignored");
    assert_eq!(decode_transaction(&value.to_string()).unwrap(), tx);

    value.as_object_mut().unwrap().remove("out");
    assert!(matches!(
        decode_transaction(&value.to_string()),
        Err(CodecError::MalformedDocument(_))
    ));
}

/// Test: Negative or fractional amounts are rejected as malformed
#[test]
fn test_decode_rejects_non_integer_amounts() {
    let tx = signed_transaction(1, &[(10, 1)]);
    let mut value: serde_json::Value =
        serde_json::from_str(&encode_transaction(&tx).unwrap()).unwrap();

    value["out"][0]["coins"] = serde_json::json!(-1);
    assert!(matches!(
        decode_transaction(&value.to_string()),
        Err(CodecError::MalformedDocument(_))
    ));

    value["out"][0]["coins"] = serde_json::json!(1.5);
    assert!(matches!(
        decode_transaction(&value.to_string()),
        Err(CodecError::MalformedDocument(_))
    ));
}
