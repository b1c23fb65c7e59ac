use crate::address::Address;
use crate::canonical_json::to_canonical_json;
use crate::canonical_json::CanonicalJsonError;
use crate::coin::Coin;
use crate::msg_builder::MsgKind;
use num256::Uint256;
use rust_decimal::Decimal;

/// Commission rates travel as decimal strings with exactly 18 fractional
/// digits, `0.100000000000000000`
mod decimal_18 {
    use rust_decimal::Decimal;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:.18}", value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let s = String::deserialize(deserializer)?;
        Decimal::from_str(&s).map_err(D::Error::custom)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct SendMsg {
    pub from_address: Address,
    pub to_address: Address,
    pub amount: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct Description {
    pub moniker: String,
    pub identity: String,
    pub website: String,
    pub details: String,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct CommissionRates {
    #[serde(with = "decimal_18")]
    pub rate: Decimal,
    #[serde(with = "decimal_18")]
    pub max_rate: Decimal,
    #[serde(with = "decimal_18")]
    pub max_change_rate: Decimal,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct CreateValidatorMsg {
    pub description: Description,
    pub commission: CommissionRates,
    pub min_self_delegation: Uint256,
    pub delegator_address: Address,
    pub validator_address: Address,
    /// bech32 consensus public key of the validator node
    pub pubkey: String,
    pub value: Coin,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct EditValidatorMsg {
    pub description: Description,
    pub address: Address,
    pub commission: CommissionRates,
    pub min_self_delegation: Uint256,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct DelegateMsg {
    pub delegator_address: Address,
    pub validator_address: Address,
    pub amount: Coin,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct BeginRedelegateMsg {
    pub delegator_address: Address,
    pub validator_src_address: Address,
    pub validator_dst_address: Address,
    pub amount: Coin,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct UndelegateMsg {
    pub delegator_address: Address,
    pub validator_address: Address,
    pub amount: Coin,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct UnjailMsg {
    pub address: Address,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct WithdrawDelegationRewardMsg {
    pub delegator_address: Address,
    pub validator_address: Address,
}

/// Withdraws the rewards of every delegation of `delegator_address`
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct WithdrawDelegationRewardsAllMsg {
    pub delegator_address: Address,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct ModifyWithdrawAddressMsg {
    pub delegator_address: Address,
    pub withdraw_address: Address,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct SubmitProposalMsg {
    pub title: String,
    pub description: String,
    /// `Text`, `SoftwareUpgrade` and friends
    pub proposal_type: String,
    pub proposer: Address,
    pub initial_deposit: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct DepositMsg {
    pub proposal_id: Uint256,
    pub depositor: Address,
    pub amount: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum VoteOption {
    Yes,
    Abstain,
    No,
    NoWithVeto,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct VoteMsg {
    pub proposal_id: Uint256,
    pub voter: Address,
    pub option: VoteOption,
}

/// Switches that permanently disable operations on an issued token
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
pub struct IssueFeatures {
    pub burn_owner_disabled: bool,
    pub burn_holder_disabled: bool,
    pub burn_from_disabled: bool,
    pub mint_disabled: bool,
    pub freeze_disabled: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct IssueParams {
    pub denom: String,
    pub symbol: String,
    pub total_supply: Uint256,
    pub decimals: Uint256,
    pub description: String,
    pub features: IssueFeatures,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct IssueCreateMsg {
    pub owner: Address,
    pub issuer: Address,
    pub params: IssueParams,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct MintMsg {
    pub minter: Address,
    pub to_address: Address,
    pub amount: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct BurnMsg {
    pub burner: Address,
    pub amount: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct BurnFromMsg {
    pub burner: Address,
    pub from_address: Address,
    pub amount: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct TransferMsg {
    pub from_address: Address,
    pub to_address: Address,
    pub amount: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct TransferFromMsg {
    /// the spender moving funds out of `from_address`
    pub sender: Address,
    pub from_address: Address,
    pub to_address: Address,
    pub amount: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct TransferOwnershipMsg {
    pub owner: Address,
    pub to_address: Address,
    pub denom: String,
}

/// Body of both `issue/MsgFreeze` and `issue/MsgUnfreeze`
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct FreezeMsg {
    pub freezer: Address,
    pub holder: Address,
    pub denom: String,
    /// `in`, `out` or `in-out`
    pub op: String,
}

/// Body of both allowance messages
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct AllowanceMsg {
    pub owner: Address,
    pub spender: Address,
    pub amount: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct DescriptionMsg {
    pub owner: Address,
    pub denom: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct FeaturesMsg {
    pub owner: Address,
    pub denom: String,
    pub features: IssueFeatures,
}

/// Any message the chain accepts, serialized as `{"type", "value"}`
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq, Hash)]
#[serde(tag = "type", content = "value")]
pub enum Msg {
    #[serde(rename = "cosmos-sdk/MsgSend")]
    SendMsg(SendMsg),
    #[serde(rename = "cosmos-sdk/MsgCreateValidator")]
    CreateValidatorMsg(CreateValidatorMsg),
    #[serde(rename = "cosmos-sdk/MsgEditValidator")]
    EditValidatorMsg(EditValidatorMsg),
    #[serde(rename = "cosmos-sdk/MsgDelegate")]
    DelegateMsg(DelegateMsg),
    #[serde(rename = "cosmos-sdk/MsgBeginRedelegate")]
    BeginRedelegateMsg(BeginRedelegateMsg),
    #[serde(rename = "cosmos-sdk/MsgUndelegate")]
    UndelegateMsg(UndelegateMsg),
    #[serde(rename = "cosmos-sdk/MsgUnjail")]
    UnjailMsg(UnjailMsg),
    #[serde(rename = "cosmos-sdk/MsgWithdrawDelegationReward")]
    WithdrawDelegationRewardMsg(WithdrawDelegationRewardMsg),
    #[serde(rename = "cosmos-sdk/MsgWithdrawDelegationRewardsAll")]
    WithdrawDelegationRewardsAllMsg(WithdrawDelegationRewardsAllMsg),
    #[serde(rename = "cosmos-sdk/MsgModifyWithdrawAddress")]
    ModifyWithdrawAddressMsg(ModifyWithdrawAddressMsg),
    #[serde(rename = "cosmos-sdk/MsgSubmitProposal")]
    SubmitProposalMsg(SubmitProposalMsg),
    #[serde(rename = "cosmos-sdk/MsgDeposit")]
    DepositMsg(DepositMsg),
    #[serde(rename = "cosmos-sdk/MsgVote")]
    VoteMsg(VoteMsg),
    #[serde(rename = "issue/MsgIssueCreate")]
    IssueCreateMsg(IssueCreateMsg),
    #[serde(rename = "issue/MsgMint")]
    MintMsg(MintMsg),
    #[serde(rename = "issue/MsgBurn")]
    BurnMsg(BurnMsg),
    #[serde(rename = "issue/MsgBurnFrom")]
    BurnFromMsg(BurnFromMsg),
    #[serde(rename = "issue/MsgTransfer")]
    TransferMsg(TransferMsg),
    #[serde(rename = "issue/MsgTransferFrom")]
    TransferFromMsg(TransferFromMsg),
    #[serde(rename = "issue/MsgTransferOwnership")]
    TransferOwnershipMsg(TransferOwnershipMsg),
    #[serde(rename = "issue/MsgFreeze")]
    FreezeMsg(FreezeMsg),
    #[serde(rename = "issue/MsgUnfreeze")]
    UnfreezeMsg(FreezeMsg),
    #[serde(rename = "issue/MsgIncreaseAllowance")]
    IncreaseAllowanceMsg(AllowanceMsg),
    #[serde(rename = "issue/MsgDecreaseAllowance")]
    DecreaseAllowanceMsg(AllowanceMsg),
    #[serde(rename = "issue/MsgDescription")]
    DescriptionMsg(DescriptionMsg),
    #[serde(rename = "issue/MsgFeatures")]
    FeaturesMsg(FeaturesMsg),
}

impl Msg {
    pub fn to_sign_bytes(&self) -> Result<Vec<u8>, CanonicalJsonError> {
        Ok(to_canonical_json(self)?)
    }

    pub fn kind(&self) -> MsgKind {
        match self {
            Msg::SendMsg(_) => MsgKind::Send,
            Msg::CreateValidatorMsg(_) => MsgKind::CreateValidator,
            Msg::EditValidatorMsg(_) => MsgKind::EditValidator,
            Msg::DelegateMsg(_) => MsgKind::Delegate,
            Msg::BeginRedelegateMsg(_) => MsgKind::BeginRedelegate,
            Msg::UndelegateMsg(_) => MsgKind::Undelegate,
            Msg::UnjailMsg(_) => MsgKind::Unjail,
            Msg::WithdrawDelegationRewardMsg(_) => MsgKind::WithdrawDelegationReward,
            Msg::WithdrawDelegationRewardsAllMsg(_) => MsgKind::WithdrawDelegationRewardsAll,
            Msg::ModifyWithdrawAddressMsg(_) => MsgKind::ModifyWithdrawAddress,
            Msg::SubmitProposalMsg(_) => MsgKind::SubmitProposal,
            Msg::DepositMsg(_) => MsgKind::Deposit,
            Msg::VoteMsg(_) => MsgKind::Vote,
            Msg::IssueCreateMsg(_) => MsgKind::IssueCreate,
            Msg::MintMsg(_) => MsgKind::Mint,
            Msg::BurnMsg(_) => MsgKind::Burn,
            Msg::BurnFromMsg(_) => MsgKind::BurnFrom,
            Msg::TransferMsg(_) => MsgKind::Transfer,
            Msg::TransferFromMsg(_) => MsgKind::TransferFrom,
            Msg::TransferOwnershipMsg(_) => MsgKind::TransferOwnership,
            Msg::FreezeMsg(_) => MsgKind::Freeze,
            Msg::UnfreezeMsg(_) => MsgKind::Unfreeze,
            Msg::IncreaseAllowanceMsg(_) => MsgKind::IncreaseAllowance,
            Msg::DecreaseAllowanceMsg(_) => MsgKind::DecreaseAllowance,
            Msg::DescriptionMsg(_) => MsgKind::Description,
            Msg::FeaturesMsg(_) => MsgKind::Features,
        }
    }
}
