//! Pool identifier codec.
//!
//! A pool id is 32 bytes, big-endian:
//!
//! | bytes    | content                                            |
//! |----------|----------------------------------------------------|
//! | `0..14`  | pool type key, the low 14 bytes of a 20-byte key   |
//! | `14..30` | bytes 14..30 of the creation parameters hash       |
//! | `30..32` | pool fee, u16                                      |
//!
//! Only keys whose 6 leading bytes are zero fit, so decoding always reproduces the key and fee
//! used at creation.

use crate::types::PoolCreationDetails;
use soroban_sdk::xdr::ToXdr;
use soroban_sdk::{contracterror, BytesN, Env};

pub const POOL_TYPE_KEY_BYTES: usize = 20;
pub const POOL_TYPE_ZERO_PREFIX_BYTES: usize = 6;

const POOL_TYPE_BYTES: usize = POOL_TYPE_KEY_BYTES - POOL_TYPE_ZERO_PREFIX_BYTES;
const PARAMS_START: usize = POOL_TYPE_BYTES;
const FEE_START: usize = 30;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PoolIdError {
    InvalidPoolType = 601,
    InvalidPoolFee = 602,
}

pub fn is_valid_pool_type(pool_type: &BytesN<20>) -> bool {
    pool_type.to_array()[..POOL_TYPE_ZERO_PREFIX_BYTES]
        .iter()
        .all(|byte| *byte == 0)
}

pub fn encode(
    e: &Env,
    pool_type: &BytesN<20>,
    params_hash: &BytesN<32>,
    fee: u32,
) -> Result<BytesN<32>, PoolIdError> {
    if !is_valid_pool_type(pool_type) {
        return Err(PoolIdError::InvalidPoolType);
    }
    let fee = u16::try_from(fee).map_err(|_| PoolIdError::InvalidPoolFee)?;

    let pool_type = pool_type.to_array();
    let params_hash = params_hash.to_array();

    let mut id = [0u8; 32];
    id[..PARAMS_START].copy_from_slice(&pool_type[POOL_TYPE_ZERO_PREFIX_BYTES..]);
    id[PARAMS_START..FEE_START].copy_from_slice(&params_hash[PARAMS_START..FEE_START]);
    id[FEE_START..].copy_from_slice(&fee.to_be_bytes());
    Ok(BytesN::from_array(e, &id))
}

pub fn decode_pool_type(e: &Env, pool_id: &BytesN<32>) -> BytesN<20> {
    let id = pool_id.to_array();
    let mut pool_type = [0u8; POOL_TYPE_KEY_BYTES];
    pool_type[POOL_TYPE_ZERO_PREFIX_BYTES..].copy_from_slice(&id[..PARAMS_START]);
    BytesN::from_array(e, &pool_type)
}

pub fn decode_fee(pool_id: &BytesN<32>) -> u16 {
    let id = pool_id.to_array();
    u16::from_be_bytes([id[FEE_START], id[FEE_START + 1]])
}

// the 16 hash bytes carried by the id
pub fn decode_params_bits(pool_id: &BytesN<32>) -> [u8; 16] {
    let mut bits = [0u8; 16];
    bits.copy_from_slice(&pool_id.to_array()[PARAMS_START..FEE_START]);
    bits
}

pub fn creation_params_hash(e: &Env, details: &PoolCreationDetails) -> BytesN<32> {
    e.crypto().sha256(&details.clone().to_xdr(e)).to_bytes()
}
