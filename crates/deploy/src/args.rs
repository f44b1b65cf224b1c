//! Constructor arguments for the Raffle contract.

use alloy_core::{
    primitives::{Address, B256, Bytes, U256},
    sol_types::SolValue,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Reject `value` if it does not fit the `uint96` ABI type.
pub(crate) fn ensure_uint96(value: U256, what: &str) -> Result<()> {
    if value.bit_len() > 96 {
        anyhow::bail!("{what} {value} does not fit in uint96");
    }
    Ok(())
}

/// A single constructor argument, tagged with its ABI type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ConstructorArg {
    Address(Address),
    Uint96(U256),
    Uint256(U256),
    Bytes32(B256),
    Uint64(u64),
    Uint32(u32),
}

impl std::fmt::Display for ConstructorArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Address(a) => write!(f, "{a}"),
            Self::Uint96(v) => write!(f, "{v}"),
            Self::Uint256(v) => write!(f, "{v}"),
            Self::Bytes32(b) => write!(f, "{b}"),
            Self::Uint64(v) => write!(f, "{v}"),
            Self::Uint32(v) => write!(f, "{v}"),
        }
    }
}

/// Arguments of `Raffle(address vrfCoordinatorV2, uint256 entranceFee, bytes32 gasLane,
/// uint64 subscriptionId, uint32 callbackGasLimit, uint256 interval)`.
///
/// Every field is required; the struct cannot be built with a hole in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaffleArgs {
    pub vrf_coordinator: Address,
    pub entrance_fee: U256,
    pub gas_lane: B256,
    pub subscription_id: u64,
    pub callback_gas_limit: u32,
    pub interval: U256,
}

impl RaffleArgs {
    /// Arguments in constructor order.
    pub fn to_vec(&self) -> Vec<ConstructorArg> {
        vec![
            ConstructorArg::Address(self.vrf_coordinator),
            ConstructorArg::Uint256(self.entrance_fee),
            ConstructorArg::Bytes32(self.gas_lane),
            ConstructorArg::Uint64(self.subscription_id),
            ConstructorArg::Uint32(self.callback_gas_limit),
            ConstructorArg::Uint256(self.interval),
        ]
    }

    /// ABI-encode the arguments, ready to be appended to the creation bytecode.
    pub fn abi_encode(&self) -> Bytes {
        (
            self.vrf_coordinator,
            self.entrance_fee,
            self.gas_lane,
            self.subscription_id,
            self.callback_gas_limit,
            self.interval,
        )
            .abi_encode_params()
            .into()
    }
}

/// Ordered constructor arguments passed to the deploy capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorArgs {
    args: Vec<ConstructorArg>,
    encoded: Bytes,
}

impl ConstructorArgs {
    /// Arguments of the `VRFCoordinatorV2Mock(uint96 baseFee, uint96 gasPriceLink)` constructor.
    ///
    /// Fails if either fee is wider than 96 bits.
    pub fn mock_coordinator(base_fee: U256, gas_price_link: U256) -> Result<Self> {
        ensure_uint96(base_fee, "Mock base fee")?;
        ensure_uint96(gas_price_link, "Mock gas price link")?;

        Ok(Self {
            args: vec![
                ConstructorArg::Uint96(base_fee),
                ConstructorArg::Uint96(gas_price_link),
            ],
            encoded: (base_fee, gas_price_link).abi_encode_params().into(),
        })
    }

    pub fn as_slice(&self) -> &[ConstructorArg] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// The ABI encoding of the arguments.
    pub fn encoded(&self) -> &Bytes {
        &self.encoded
    }

    /// Hex encoding without `0x`, the form block explorers expect.
    pub fn encoded_hex(&self) -> String {
        hex::encode(&self.encoded)
    }
}

impl From<RaffleArgs> for ConstructorArgs {
    fn from(args: RaffleArgs) -> Self {
        Self {
            args: args.to_vec(),
            encoded: args.abi_encode(),
        }
    }
}

impl std::fmt::Display for ConstructorArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RaffleArgs {
        RaffleArgs {
            vrf_coordinator: Address::repeat_byte(0xaa),
            entrance_fee: U256::from(10_000_000_000_000_000u64),
            gas_lane: B256::repeat_byte(0x04),
            subscription_id: 1,
            callback_gas_limit: 500_000,
            interval: U256::from(30),
        }
    }

    #[test]
    fn test_argument_order() {
        let args = sample().to_vec();
        assert_eq!(args.len(), 6);
        assert!(matches!(args[0], ConstructorArg::Address(_)));
        assert_eq!(args[1], ConstructorArg::Uint256(sample().entrance_fee));
        assert!(matches!(args[2], ConstructorArg::Bytes32(_)));
        assert_eq!(args[3], ConstructorArg::Uint64(1));
        assert_eq!(args[4], ConstructorArg::Uint32(500_000));
        assert_eq!(args[5], ConstructorArg::Uint256(U256::from(30)));
    }

    #[test]
    fn test_abi_encoding_layout() {
        let encoded = sample().abi_encode();

        // Six static words.
        assert_eq!(encoded.len(), 6 * 32);
        // Address is left-padded in the first word.
        assert_eq!(&encoded[..12], &[0u8; 12]);
        assert_eq!(&encoded[12..32], &[0xaa; 20]);
        // Gas lane fills the third word.
        assert_eq!(&encoded[64..96], &[0x04; 32]);
        // Subscription ID sits at the end of the fourth word.
        assert_eq!(encoded[127], 1);
        // Interval is the last word.
        assert_eq!(encoded[191], 30);
    }

    #[test]
    fn test_mock_coordinator_args() {
        let args = ConstructorArgs::mock_coordinator(U256::from(250), U256::from(1_000_000_000))
            .unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args.as_slice()[0], ConstructorArg::Uint96(U256::from(250)));
        assert_eq!(args.encoded().len(), 64);
        assert_eq!(args.encoded()[31], 250);
    }

    #[test]
    fn test_mock_coordinator_rejects_wide_fees() {
        let max = (U256::from(1) << 96) - U256::from(1);
        assert!(ConstructorArgs::mock_coordinator(max, U256::from(1)).is_ok());

        let err =
            ConstructorArgs::mock_coordinator(U256::from(1) << 96, U256::from(1)).unwrap_err();
        assert!(err.to_string().contains("uint96"));
        assert!(ConstructorArgs::mock_coordinator(U256::from(1), U256::MAX).is_err());
    }

    #[test]
    fn test_display_lists_args_in_order() {
        let args = ConstructorArgs::from(sample());
        let rendered = args.to_string();
        assert!(rendered.starts_with("[0x"));
        assert!(rendered.contains(", 10000000000000000, "));
        assert!(rendered.ends_with(", 1, 500000, 30]"));
    }

    #[test]
    fn test_encoded_hex_has_no_prefix() {
        let args = ConstructorArgs::from(sample());
        let hex = args.encoded_hex();
        assert!(!hex.starts_with("0x"));
        assert_eq!(hex.len(), 6 * 64);
    }
}
