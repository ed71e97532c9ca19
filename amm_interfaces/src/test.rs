#![cfg(test)]
extern crate std;

use crate::pool_id::{
    creation_params_hash, decode_fee, decode_params_bits, decode_pool_type, encode,
    is_valid_pool_type, PoolIdError,
};
use crate::types::PoolCreationDetails;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{Address, Bytes, BytesN, Env};

fn pool_type_key(e: &Env, tail: u8) -> BytesN<20> {
    let mut key = [0u8; 20];
    key[6..].copy_from_slice(&[tail; 14]);
    BytesN::from_array(e, &key)
}

#[test]
fn test_encode_decode() {
    let e = Env::default();
    let pool_type = pool_type_key(&e, 0xab);
    let hash = BytesN::from_array(&e, &[7u8; 32]);

    for fee in [0u32, 30, 10_000, u16::MAX as u32] {
        let id = encode(&e, &pool_type, &hash, fee).unwrap();
        assert_eq!(decode_fee(&id) as u32, fee);
        assert_eq!(decode_pool_type(&e, &id), pool_type);
        assert_eq!(decode_params_bits(&id), [7u8; 16]);
    }
}

#[test]
fn test_layout() {
    let e = Env::default();
    let mut key = [0u8; 20];
    key[19] = 0x01;
    let mut hash = [0u8; 32];
    hash[13] = 0xff; // outside of the carried bits
    hash[14] = 0x11;
    hash[29] = 0x22;
    hash[30] = 0xff; // outside of the carried bits

    let id = encode(
        &e,
        &BytesN::from_array(&e, &key),
        &BytesN::from_array(&e, &hash),
        0x0102,
    )
    .unwrap()
    .to_array();

    let mut expected = [0u8; 32];
    expected[13] = 0x01;
    expected[14] = 0x11;
    expected[29] = 0x22;
    expected[30] = 0x01;
    expected[31] = 0x02;
    assert_eq!(id, expected);
}

#[test]
fn test_pool_type_without_zero_prefix() {
    let e = Env::default();
    let mut key = [0u8; 20];
    key[5] = 1;
    let key = BytesN::from_array(&e, &key);
    assert!(!is_valid_pool_type(&key));
    assert_eq!(
        encode(&e, &key, &BytesN::from_array(&e, &[0u8; 32]), 30),
        Err(PoolIdError::InvalidPoolType)
    );
}

#[test]
fn test_fee_out_of_range() {
    let e = Env::default();
    assert_eq!(
        encode(
            &e,
            &pool_type_key(&e, 1),
            &BytesN::from_array(&e, &[0u8; 32]),
            u16::MAX as u32 + 1
        ),
        Err(PoolIdError::InvalidPoolFee)
    );
}

#[test]
fn test_creation_hash_depends_on_details() {
    let e = Env::default();
    let details = PoolCreationDetails {
        pool_type: pool_type_key(&e, 1),
        fee: 30,
        token0: Address::generate(&e),
        token1: Address::generate(&e),
        pool_hook: None,
        pool_params: Bytes::new(&e),
    };
    let mut other = details.clone();
    other.fee = 31;

    assert_eq!(
        creation_params_hash(&e, &details),
        creation_params_hash(&e, &details.clone())
    );
    assert_ne!(
        creation_params_hash(&e, &details),
        creation_params_hash(&e, &other)
    );
}
