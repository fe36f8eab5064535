//! End-to-end signing pipeline:
//! build transaction → append signers → sign with several keys → verify.
//!
//! Covers solo and multisig slots in one transaction, co-signing across
//! serialization boundaries, and domain separation between chains.

use oasis_crypto::{ChainContext, Ed25519Signer, Secp256k1Signer, Signer, Sr25519Signer};
use oasis_transactions::{
    AuthProof, Call, ErrorKind, Transaction, TransactionError, UnverifiedTransaction,
};
use oasis_types::{
    BaseUnits, MultisigConfig, MultisigError, MultisigSigner, Namespace, SignatureAddressSpec,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const CHAIN: &str = "643fb06848be7e970af3b5b2d772eb8cfb30499c8162bc18ac03df2f5e22520e";

fn context() -> ChainContext {
    ChainContext::for_runtime(&Namespace::new([0x80; 32]), CHAIN)
}

fn ed(seed: u8) -> Ed25519Signer {
    Ed25519Signer::from_seed(&[seed; 32])
}

fn spec(signer: &dyn Signer) -> SignatureAddressSpec {
    SignatureAddressSpec::from_public_key(&signer.public_key())
}

fn two_of_two(a: &dyn Signer, b: &dyn Signer) -> MultisigConfig {
    MultisigConfig::new(
        vec![
            MultisigSigner::new(a.public_key(), 1),
            MultisigSigner::new(b.public_key(), 1),
        ],
        2,
    )
}

fn hello_world() -> Transaction {
    let mut tx = Transaction::new(Call::new("hello.World", &"hi").expect("call"));
    tx.set_fee_amount(BaseUnits::native(0));
    tx.set_fee_gas(1000);
    tx
}

// ---------------------------------------------------------------------------
// 1. Mixed solo and multisig signers
// ---------------------------------------------------------------------------

#[test]
fn solo_and_multisig_signers_verify() {
    let alice = ed(1);
    let bob = Secp256k1Signer::from_bytes(&[2u8; 32]).expect("secp256k1 key");
    let carol = Sr25519Signer::from_seed(&[3u8; 32]).expect("sr25519 key");
    let dave = ed(4);

    let mut tx = hello_world();
    tx.append_auth_signature(spec(&alice), 42);
    tx.append_auth_signature(spec(&bob), 43);
    tx.append_auth_multisig(two_of_two(&carol, &dave), 44);

    let mut signer = tx.clone().prepare_for_signing().expect("prepare");
    for key in [&alice as &dyn Signer, &bob, &carol, &dave] {
        signer.append_sign(&context(), key).expect("sign");
    }
    let ut = signer.finalize().expect("finalize");
    assert_eq!(ut.auth_proofs().len(), 3);

    let decoded = UnverifiedTransaction::from_slice(&ut.to_vec().expect("encode")).expect("decode");
    let verified = decoded.verify(&context()).expect("verify");
    assert_eq!(verified, tx);
}

#[test]
fn one_key_fills_every_matching_slot() {
    let alice = ed(1);
    let bob = ed(2);

    let mut tx = hello_world();
    tx.append_auth_signature(spec(&alice), 1);
    tx.append_auth_multisig(
        MultisigConfig::new(
            vec![
                MultisigSigner::new(alice.public_key(), 1),
                MultisigSigner::new(bob.public_key(), 1),
            ],
            1,
        ),
        2,
    );

    let mut signer = tx.prepare_for_signing().expect("prepare");
    signer.append_sign(&context(), &alice).expect("sign");
    let ut = signer.finalize().expect("finalize");

    match &ut.auth_proofs()[1] {
        AuthProof::Multisig(sigs) => {
            assert!(sigs[0].is_some());
            assert!(sigs[1].is_none());
        }
        other => panic!("expected multisig proof, got {other:?}"),
    }
    ut.verify(&context()).expect("threshold 1 met by alice alone");
}

// ---------------------------------------------------------------------------
// 2. Co-signing across machines
// ---------------------------------------------------------------------------

#[test]
fn partially_signed_multisig_can_be_completed_elsewhere() {
    let carol = ed(3);
    let dave = ed(4);

    let mut tx = hello_world();
    tx.append_auth_multisig(two_of_two(&carol, &dave), 0);

    let mut first = tx.prepare_for_signing().expect("prepare");
    first.append_sign(&context(), &carol).expect("carol signs");
    let partial = first.finalize().expect("finalize partial");

    let err = partial.verify(&context()).unwrap_err();
    assert!(matches!(
        err,
        TransactionError::Multisig {
            slot: 0,
            source: MultisigError::InsufficientWeight { have: 1, need: 2 }
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Proof);

    let wire = partial.to_vec().expect("encode");
    let mut second = oasis_transactions::TransactionSigner::from_unverified(
        UnverifiedTransaction::from_slice(&wire).expect("decode"),
    )
    .expect("resume");
    second.append_sign(&context(), &dave).expect("dave signs");
    second
        .finalize()
        .expect("finalize")
        .verify(&context())
        .expect("both signatures present");
}

// ---------------------------------------------------------------------------
// 3. Failures
// ---------------------------------------------------------------------------

#[test]
fn signature_bound_to_chain_context() {
    let alice = ed(1);
    let mut tx = hello_world();
    tx.append_auth_signature(spec(&alice), 0);

    let mut signer = tx.prepare_for_signing().expect("prepare");
    signer.append_sign(&context(), &alice).expect("sign");
    let ut = signer.finalize().expect("finalize");

    let other_runtime = ChainContext::for_runtime(&Namespace::new([0x81; 32]), CHAIN);
    let err = ut.verify(&other_runtime).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CryptoVerification);

    let other_chain = ChainContext::for_runtime(
        &Namespace::new([0x80; 32]),
        "0000000000000000000000000000000000000000000000000000000000000000",
    );
    assert!(ut.verify(&other_chain).is_err());
}

#[test]
fn invalid_signature_reports_origin() {
    let alice = ed(1);
    let carol = ed(3);
    let dave = ed(4);

    let mut tx = hello_world();
    tx.append_auth_signature(spec(&alice), 0);
    tx.append_auth_multisig(two_of_two(&carol, &dave), 0);

    let mut signer = tx.prepare_for_signing().expect("prepare");
    for key in [&alice, &carol, &dave] {
        signer.append_sign(&context(), key).expect("sign");
    }
    let mut ut = signer.finalize().expect("finalize");

    // Swap dave's signature for alice's.
    let alice_sig = match &ut.1[0] {
        AuthProof::Signature(sig) => sig.clone(),
        other => panic!("expected signature proof, got {other:?}"),
    };
    if let AuthProof::Multisig(sigs) = &mut ut.1[1] {
        sigs[1] = Some(alice_sig);
    }

    match ut.verify(&context()).unwrap_err() {
        TransactionError::SignatureInvalid { index, origin, .. } => {
            assert_eq!(index, 2);
            assert_eq!(origin.slot, 1);
            assert_eq!(origin.sub_slot, Some(1));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_signer_rejected() {
    let alice = ed(1);
    let mut tx = hello_world();
    tx.append_auth_signature(spec(&alice), 0);

    let mut signer = tx.prepare_for_signing().expect("prepare");
    let err = signer.append_sign(&context(), &ed(9)).unwrap_err();
    assert!(matches!(err, TransactionError::SignerNotFound));
    assert!(matches!(
        signer.finalize(),
        Err(TransactionError::ProofMissing { slot: 0 })
    ));
}

#[test]
fn proof_count_must_match_signers() {
    let alice = ed(1);
    let mut tx = hello_world();
    tx.append_auth_signature(spec(&alice), 0);
    tx.append_auth_signature(spec(&ed(2)), 0);

    let mut signer = tx.prepare_for_signing().expect("prepare");
    signer.append_sign(&context(), &alice).expect("sign");
    signer.append_sign(&context(), &ed(2)).expect("sign");
    let mut ut = signer.finalize().expect("finalize");
    ut.1.pop();

    assert!(matches!(
        ut.verify(&context()),
        Err(TransactionError::ProofCountMismatch { expected: 2, actual: 1 })
    ));
}

#[test]
fn unsigned_transaction_rejected() {
    let ut = UnverifiedTransaction(hello_world().to_vec().expect("encode"), vec![]);
    assert!(matches!(
        ut.verify(&context()),
        Err(TransactionError::NoSigners)
    ));
}
