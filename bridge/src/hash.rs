//! Deterministic keys for the provider ledger and the transfer chain.
//!
//! Every field is encoded into a 32-byte slot and the slots are hashed with
//! keccak256. Strings (addresses, token ids) are encoded as the keccak256 of
//! their UTF-8 bytes so that both domains derive the same key from the same
//! parameters, whatever the address format of either domain.
//!
//! # ProviderKey layout (128 bytes)
//! - Bytes 0-31:   remote chain id (u64, big-endian, left-padded)
//! - Bytes 32-63:  keccak256(provider)
//! - Bytes 64-95:  keccak256(source token)
//! - Bytes 96-127: keccak256(target token)
//!
//! # TransferId layout (288 bytes)
//! - Bytes 0-31:    source chain id
//! - Bytes 32-63:   target chain id
//! - Bytes 64-95:   previous transfer id
//! - Bytes 96-127:  keccak256(provider)
//! - Bytes 128-159: keccak256(source token)
//! - Bytes 160-191: keccak256(target token)
//! - Bytes 192-223: keccak256(receiver)
//! - Bytes 224-255: amount (u128, big-endian, left-padded)
//! - Bytes 256-287: timestamp (u64, big-endian, left-padded)

use cosmwasm_std::Binary;
use tiny_keccak::{Hasher, Keccak};

use crate::error::ContractError;
use crate::msg::TransferParams;

/// Compute keccak256 hash of arbitrary data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Encode a string field as a 32-byte slot
pub fn encode_string(value: &str) -> [u8; 32] {
    keccak256(value.as_bytes())
}

fn put_u64(slot: &mut [u8], value: u64) {
    slot[24..32].copy_from_slice(&value.to_be_bytes());
}

fn put_u128(slot: &mut [u8], value: u128) {
    slot[16..32].copy_from_slice(&value.to_be_bytes());
}

/// Compute the key of a provider ledger entry
pub fn compute_provider_key(
    remote_chain_id: u64,
    provider: &str,
    source_token: &str,
    target_token: &str,
) -> [u8; 32] {
    let mut data = [0u8; 128];
    put_u64(&mut data[0..32], remote_chain_id);
    data[32..64].copy_from_slice(&encode_string(provider));
    data[64..96].copy_from_slice(&encode_string(source_token));
    data[96..128].copy_from_slice(&encode_string(target_token));
    keccak256(&data)
}

/// Compute the id of a transfer chained after `previous_transfer_id`
#[allow(clippy::too_many_arguments)]
pub fn compute_transfer_id(
    source_chain_id: u64,
    target_chain_id: u64,
    previous_transfer_id: &[u8; 32],
    provider: &str,
    source_token: &str,
    target_token: &str,
    receiver: &str,
    amount: u128,
    timestamp: u64,
) -> [u8; 32] {
    let mut data = [0u8; 288];
    put_u64(&mut data[0..32], source_chain_id);
    put_u64(&mut data[32..64], target_chain_id);
    data[64..96].copy_from_slice(previous_transfer_id);
    data[96..128].copy_from_slice(&encode_string(provider));
    data[128..160].copy_from_slice(&encode_string(source_token));
    data[160..192].copy_from_slice(&encode_string(target_token));
    data[192..224].copy_from_slice(&encode_string(receiver));
    put_u128(&mut data[224..256], amount);
    put_u64(&mut data[256..288], timestamp);
    keccak256(&data)
}

/// Compute the id described by a full set of transfer params
pub fn transfer_id_of(params: &TransferParams) -> Result<[u8; 32], ContractError> {
    let previous = parse_bytes32(&params.previous_transfer_id)?;
    Ok(compute_transfer_id(
        params.source_chain_id,
        params.target_chain_id,
        &previous,
        &params.provider,
        &params.source_token,
        &params.target_token,
        &params.receiver,
        params.amount.u128(),
        params.timestamp,
    ))
}

/// Parse a 32-byte id from Binary input
pub fn parse_bytes32(value: &Binary) -> Result<[u8; 32], ContractError> {
    value
        .to_vec()
        .try_into()
        .map_err(|_| ContractError::InvalidHashLength { got: value.len() })
}

/// Convert 32-byte hash to hex string (for attributes/logging)
pub fn bytes32_to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}
