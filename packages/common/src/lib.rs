//! Common - Shared Types for the Liquidity Bridge Contracts
//!
//! This package provides the asset types and the messager wire interface
//! shared by the bridge and messager contracts.

pub mod asset;
pub mod messager;

pub use asset::AssetInfo;
pub use messager::{MessageExtra, MessagerExecuteMsg, ReceiverExecuteMsg};
