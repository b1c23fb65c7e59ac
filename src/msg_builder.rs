//! Typed builders for every [`Msg`] the chain accepts.
//!
//! Callers describe a message with a [`MsgInput`], whose fields use the
//! camelCase names wallets and REST clients send, and a [`MsgRegistry`]
//! turns it into the wire [`Msg`] after checking that its kind is enabled
//! and its contents are usable.
use crate::address::Address;
use crate::coin::Coin;
use crate::error::TxError;
use crate::msg::*;
use num256::Uint256;
use num_traits::Zero;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// The closed set of message kinds, one per [`Msg`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MsgKind {
    Send,
    CreateValidator,
    EditValidator,
    Delegate,
    BeginRedelegate,
    Undelegate,
    Unjail,
    WithdrawDelegationReward,
    WithdrawDelegationRewardsAll,
    ModifyWithdrawAddress,
    SubmitProposal,
    Deposit,
    Vote,
    IssueCreate,
    Mint,
    Burn,
    BurnFrom,
    Transfer,
    TransferFrom,
    TransferOwnership,
    Freeze,
    Unfreeze,
    IncreaseAllowance,
    DecreaseAllowance,
    Description,
    Features,
}

impl MsgKind {
    pub const ALL: [MsgKind; 26] = [
        MsgKind::Send,
        MsgKind::CreateValidator,
        MsgKind::EditValidator,
        MsgKind::Delegate,
        MsgKind::BeginRedelegate,
        MsgKind::Undelegate,
        MsgKind::Unjail,
        MsgKind::WithdrawDelegationReward,
        MsgKind::WithdrawDelegationRewardsAll,
        MsgKind::ModifyWithdrawAddress,
        MsgKind::SubmitProposal,
        MsgKind::Deposit,
        MsgKind::Vote,
        MsgKind::IssueCreate,
        MsgKind::Mint,
        MsgKind::Burn,
        MsgKind::BurnFrom,
        MsgKind::Transfer,
        MsgKind::TransferFrom,
        MsgKind::TransferOwnership,
        MsgKind::Freeze,
        MsgKind::Unfreeze,
        MsgKind::IncreaseAllowance,
        MsgKind::DecreaseAllowance,
        MsgKind::Description,
        MsgKind::Features,
    ];

    /// The amino JSON `type` of messages of this kind
    pub fn type_tag(&self) -> &'static str {
        match self {
            MsgKind::Send => "cosmos-sdk/MsgSend",
            MsgKind::CreateValidator => "cosmos-sdk/MsgCreateValidator",
            MsgKind::EditValidator => "cosmos-sdk/MsgEditValidator",
            MsgKind::Delegate => "cosmos-sdk/MsgDelegate",
            MsgKind::BeginRedelegate => "cosmos-sdk/MsgBeginRedelegate",
            MsgKind::Undelegate => "cosmos-sdk/MsgUndelegate",
            MsgKind::Unjail => "cosmos-sdk/MsgUnjail",
            MsgKind::WithdrawDelegationReward => "cosmos-sdk/MsgWithdrawDelegationReward",
            MsgKind::WithdrawDelegationRewardsAll => {
                "cosmos-sdk/MsgWithdrawDelegationRewardsAll"
            }
            MsgKind::ModifyWithdrawAddress => "cosmos-sdk/MsgModifyWithdrawAddress",
            MsgKind::SubmitProposal => "cosmos-sdk/MsgSubmitProposal",
            MsgKind::Deposit => "cosmos-sdk/MsgDeposit",
            MsgKind::Vote => "cosmos-sdk/MsgVote",
            MsgKind::IssueCreate => "issue/MsgIssueCreate",
            MsgKind::Mint => "issue/MsgMint",
            MsgKind::Burn => "issue/MsgBurn",
            MsgKind::BurnFrom => "issue/MsgBurnFrom",
            MsgKind::Transfer => "issue/MsgTransfer",
            MsgKind::TransferFrom => "issue/MsgTransferFrom",
            MsgKind::TransferOwnership => "issue/MsgTransferOwnership",
            MsgKind::Freeze => "issue/MsgFreeze",
            MsgKind::Unfreeze => "issue/MsgUnfreeze",
            MsgKind::IncreaseAllowance => "issue/MsgIncreaseAllowance",
            MsgKind::DecreaseAllowance => "issue/MsgDecreaseAllowance",
            MsgKind::Description => "issue/MsgDescription",
            MsgKind::Features => "issue/MsgFeatures",
        }
    }

    pub fn from_tag(tag: &str) -> Option<MsgKind> {
        MsgKind::ALL.iter().copied().find(|k| k.type_tag() == tag)
    }

    /// Kinds of the standard cosmos modules, bank, staking, slashing,
    /// distribution and gov
    pub fn cosmos() -> impl Iterator<Item = MsgKind> {
        MsgKind::ALL
            .iter()
            .copied()
            .filter(|k| k.type_tag().starts_with("cosmos-sdk/"))
    }
}

impl fmt::Display for MsgKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.type_tag())
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SendInput {
    pub from: Address,
    pub to: Address,
    pub amount: Coin,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateValidatorInput {
    pub value: Coin,
    pub delegator_addr: Address,
    pub validator_addr: Address,
    pub pubkey: String,
    pub min_self_delegation: Uint256,
    pub commission: CommissionRates,
    pub description: Description,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EditValidatorInput {
    pub validator_addr: Address,
    pub description: Description,
    pub commission: CommissionRates,
    pub min_self_delegation: Uint256,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DelegateInput {
    pub delegator_addr: Address,
    pub validator_addr: Address,
    pub amount: Coin,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BeginRedelegateInput {
    pub delegator_addr: Address,
    pub validator_src_addr: Address,
    pub validator_dst_addr: Address,
    pub amount: Coin,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UnjailInput {
    pub validator_addr: Address,
}

/// Shared by withdraw reward and undelegate, the latter requires `amount`
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorInput {
    pub delegator_addr: Address,
    pub validator_addr: Address,
    #[serde(default)]
    pub amount: Option<Coin>,
}

/// Withdraws from every validator the delegator is bonded to. The
/// delegator must be an account address, not a `…valoper` one.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DelegatorInput {
    pub delegator_addr: Address,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModifyWithdrawAddressInput {
    pub delegator_addr: Address,
    pub withdraw_addr: Address,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitProposalInput {
    pub title: String,
    pub description: String,
    #[serde(default = "default_proposal_type")]
    pub proposal_type: String,
    pub proposer: Address,
    pub initial_deposit: Coin,
}

fn default_proposal_type() -> String {
    "Text".to_string()
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DepositInput {
    pub depositor_addr: Address,
    pub proposal_id: u64,
    pub amount: Coin,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteInput {
    pub voter_addr: Address,
    pub proposal_id: u64,
    pub option: VoteOption,
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureInput {
    #[serde(default)]
    pub burn_owner_disabled: bool,
    #[serde(default)]
    pub burn_holder_disabled: bool,
    #[serde(default)]
    pub burn_from_disabled: bool,
    #[serde(default)]
    pub mint_disabled: bool,
    #[serde(default)]
    pub freeze_disabled: bool,
}

impl From<FeatureInput> for IssueFeatures {
    fn from(input: FeatureInput) -> Self {
        IssueFeatures {
            burn_owner_disabled: input.burn_owner_disabled,
            burn_holder_disabled: input.burn_holder_disabled,
            burn_from_disabled: input.burn_from_disabled,
            mint_disabled: input.mint_disabled,
            freeze_disabled: input.freeze_disabled,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IssueCreateInput {
    pub issuer_addr: Address,
    pub denom: String,
    pub symbol: String,
    pub total_supply: Uint256,
    pub decimals: u8,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub features: FeatureInput,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MintInput {
    pub minter_addr: Address,
    pub to_addr: Address,
    pub amount: Vec<Coin>,
}

/// Burns from the burner's own balance, or from `from_addr` when set
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BurnInput {
    pub burner_addr: Address,
    #[serde(default)]
    pub from_addr: Option<Address>,
    pub amount: Vec<Coin>,
}

/// A plain transfer, or a spend of an allowance when `spender_addr` is set
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransferInput {
    #[serde(default)]
    pub spender_addr: Option<Address>,
    pub from_addr: Address,
    pub to_addr: Address,
    pub amount: Vec<Coin>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransferOwnershipInput {
    pub owner_addr: Address,
    pub to_addr: Address,
    pub denom: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FreezeInput {
    pub freezer_addr: Address,
    pub holder_addr: Address,
    pub denom: String,
    pub op: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceInput {
    pub owner_addr: Address,
    pub spender_addr: Address,
    pub amount: Vec<Coin>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionInput {
    pub owner_addr: Address,
    pub denom: String,
    pub description: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesInput {
    pub owner_addr: Address,
    pub denom: String,
    #[serde(flatten)]
    pub features: FeatureInput,
}

/// Builder input for one message, tagged with the kind it builds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MsgInput {
    Send(SendInput),
    CreateValidator(CreateValidatorInput),
    EditValidator(EditValidatorInput),
    Delegate(DelegateInput),
    BeginRedelegate(BeginRedelegateInput),
    Undelegate(ValidatorInput),
    Unjail(UnjailInput),
    WithdrawDelegationReward(ValidatorInput),
    WithdrawDelegationRewardsAll(DelegatorInput),
    ModifyWithdrawAddress(ModifyWithdrawAddressInput),
    SubmitProposal(SubmitProposalInput),
    Deposit(DepositInput),
    Vote(VoteInput),
    IssueCreate(IssueCreateInput),
    Mint(MintInput),
    Burn(BurnInput),
    BurnFrom(BurnInput),
    Transfer(TransferInput),
    TransferFrom(TransferInput),
    TransferOwnership(TransferOwnershipInput),
    Freeze(FreezeInput),
    Unfreeze(FreezeInput),
    IncreaseAllowance(AllowanceInput),
    DecreaseAllowance(AllowanceInput),
    Description(DescriptionInput),
    Features(FeaturesInput),
}

impl MsgInput {
    pub fn kind(&self) -> MsgKind {
        match self {
            MsgInput::Send(_) => MsgKind::Send,
            MsgInput::CreateValidator(_) => MsgKind::CreateValidator,
            MsgInput::EditValidator(_) => MsgKind::EditValidator,
            MsgInput::Delegate(_) => MsgKind::Delegate,
            MsgInput::BeginRedelegate(_) => MsgKind::BeginRedelegate,
            MsgInput::Undelegate(_) => MsgKind::Undelegate,
            MsgInput::Unjail(_) => MsgKind::Unjail,
            MsgInput::WithdrawDelegationReward(_) => MsgKind::WithdrawDelegationReward,
            MsgInput::WithdrawDelegationRewardsAll(_) => MsgKind::WithdrawDelegationRewardsAll,
            MsgInput::ModifyWithdrawAddress(_) => MsgKind::ModifyWithdrawAddress,
            MsgInput::SubmitProposal(_) => MsgKind::SubmitProposal,
            MsgInput::Deposit(_) => MsgKind::Deposit,
            MsgInput::Vote(_) => MsgKind::Vote,
            MsgInput::IssueCreate(_) => MsgKind::IssueCreate,
            MsgInput::Mint(_) => MsgKind::Mint,
            MsgInput::Burn(_) => MsgKind::Burn,
            MsgInput::BurnFrom(_) => MsgKind::BurnFrom,
            MsgInput::Transfer(_) => MsgKind::Transfer,
            MsgInput::TransferFrom(_) => MsgKind::TransferFrom,
            MsgInput::TransferOwnership(_) => MsgKind::TransferOwnership,
            MsgInput::Freeze(_) => MsgKind::Freeze,
            MsgInput::Unfreeze(_) => MsgKind::Unfreeze,
            MsgInput::IncreaseAllowance(_) => MsgKind::IncreaseAllowance,
            MsgInput::DecreaseAllowance(_) => MsgKind::DecreaseAllowance,
            MsgInput::Description(_) => MsgKind::Description,
            MsgInput::Features(_) => MsgKind::Features,
        }
    }

    /// Deserializes the input of `kind` from its camelCase JSON form
    pub fn from_json(kind: MsgKind, input: Value) -> Result<MsgInput, serde_json::Error> {
        use serde_json::from_value;
        Ok(match kind {
            MsgKind::Send => MsgInput::Send(from_value(input)?),
            MsgKind::CreateValidator => MsgInput::CreateValidator(from_value(input)?),
            MsgKind::EditValidator => MsgInput::EditValidator(from_value(input)?),
            MsgKind::Delegate => MsgInput::Delegate(from_value(input)?),
            MsgKind::BeginRedelegate => MsgInput::BeginRedelegate(from_value(input)?),
            MsgKind::Undelegate => MsgInput::Undelegate(from_value(input)?),
            MsgKind::Unjail => MsgInput::Unjail(from_value(input)?),
            MsgKind::WithdrawDelegationReward => {
                MsgInput::WithdrawDelegationReward(from_value(input)?)
            }
            MsgKind::WithdrawDelegationRewardsAll => {
                MsgInput::WithdrawDelegationRewardsAll(from_value(input)?)
            }
            MsgKind::ModifyWithdrawAddress => MsgInput::ModifyWithdrawAddress(from_value(input)?),
            MsgKind::SubmitProposal => MsgInput::SubmitProposal(from_value(input)?),
            MsgKind::Deposit => MsgInput::Deposit(from_value(input)?),
            MsgKind::Vote => MsgInput::Vote(from_value(input)?),
            MsgKind::IssueCreate => MsgInput::IssueCreate(from_value(input)?),
            MsgKind::Mint => MsgInput::Mint(from_value(input)?),
            MsgKind::Burn => MsgInput::Burn(from_value(input)?),
            MsgKind::BurnFrom => MsgInput::BurnFrom(from_value(input)?),
            MsgKind::Transfer => MsgInput::Transfer(from_value(input)?),
            MsgKind::TransferFrom => MsgInput::TransferFrom(from_value(input)?),
            MsgKind::TransferOwnership => MsgInput::TransferOwnership(from_value(input)?),
            MsgKind::Freeze => MsgInput::Freeze(from_value(input)?),
            MsgKind::Unfreeze => MsgInput::Unfreeze(from_value(input)?),
            MsgKind::IncreaseAllowance => MsgInput::IncreaseAllowance(from_value(input)?),
            MsgKind::DecreaseAllowance => MsgInput::DecreaseAllowance(from_value(input)?),
            MsgKind::Description => MsgInput::Description(from_value(input)?),
            MsgKind::Features => MsgInput::Features(from_value(input)?),
        })
    }

    /// Validates the input and produces the wire message
    pub fn build(self) -> Result<Msg, TxError> {
        Ok(match self {
            MsgInput::Send(i) => Msg::SendMsg(SendMsg {
                from_address: i.from,
                to_address: i.to,
                amount: vec![positive(i.amount)?],
            }),
            MsgInput::CreateValidator(i) => Msg::CreateValidatorMsg(CreateValidatorMsg {
                description: described(i.description)?,
                commission: i.commission,
                min_self_delegation: i.min_self_delegation,
                delegator_address: i.delegator_addr,
                validator_address: i.validator_addr,
                pubkey: required("pubkey", i.pubkey)?,
                value: positive(i.value)?,
            }),
            MsgInput::EditValidator(i) => Msg::EditValidatorMsg(EditValidatorMsg {
                description: i.description,
                address: i.validator_addr,
                commission: i.commission,
                min_self_delegation: i.min_self_delegation,
            }),
            MsgInput::Delegate(i) => Msg::DelegateMsg(DelegateMsg {
                delegator_address: i.delegator_addr,
                validator_address: i.validator_addr,
                amount: positive(i.amount)?,
            }),
            MsgInput::BeginRedelegate(i) => Msg::BeginRedelegateMsg(BeginRedelegateMsg {
                delegator_address: i.delegator_addr,
                validator_src_address: i.validator_src_addr,
                validator_dst_address: i.validator_dst_addr,
                amount: positive(i.amount)?,
            }),
            MsgInput::Undelegate(i) => Msg::UndelegateMsg(UndelegateMsg {
                delegator_address: i.delegator_addr,
                validator_address: i.validator_addr,
                amount: positive(i.amount.ok_or(TxError::MissingField("amount"))?)?,
            }),
            MsgInput::Unjail(i) => Msg::UnjailMsg(UnjailMsg {
                address: i.validator_addr,
            }),
            MsgInput::WithdrawDelegationReward(i) => {
                Msg::WithdrawDelegationRewardMsg(WithdrawDelegationRewardMsg {
                    delegator_address: i.delegator_addr,
                    validator_address: i.validator_addr,
                })
            }
            MsgInput::WithdrawDelegationRewardsAll(i) => {
                Msg::WithdrawDelegationRewardsAllMsg(WithdrawDelegationRewardsAllMsg {
                    delegator_address: account_address(i.delegator_addr)?,
                })
            }
            MsgInput::ModifyWithdrawAddress(i) => {
                Msg::ModifyWithdrawAddressMsg(ModifyWithdrawAddressMsg {
                    delegator_address: i.delegator_addr,
                    withdraw_address: i.withdraw_addr,
                })
            }
            MsgInput::SubmitProposal(i) => Msg::SubmitProposalMsg(SubmitProposalMsg {
                title: required("title", i.title)?,
                description: required("description", i.description)?,
                proposal_type: required("proposal_type", i.proposal_type)?,
                proposer: i.proposer,
                initial_deposit: vec![positive(i.initial_deposit)?],
            }),
            MsgInput::Deposit(i) => Msg::DepositMsg(DepositMsg {
                proposal_id: i.proposal_id.into(),
                depositor: i.depositor_addr,
                amount: vec![positive(i.amount)?],
            }),
            MsgInput::Vote(i) => Msg::VoteMsg(VoteMsg {
                proposal_id: i.proposal_id.into(),
                voter: i.voter_addr,
                option: i.option,
            }),
            MsgInput::IssueCreate(i) => Msg::IssueCreateMsg(IssueCreateMsg {
                owner: i.issuer_addr,
                issuer: i.issuer_addr,
                params: IssueParams {
                    denom: required("denom", i.denom)?,
                    symbol: required("symbol", i.symbol)?,
                    total_supply: nonzero("total_supply", i.total_supply)?,
                    decimals: i.decimals.into(),
                    description: i.description,
                    features: i.features.into(),
                },
            }),
            MsgInput::Mint(i) => Msg::MintMsg(MintMsg {
                minter: i.minter_addr,
                to_address: i.to_addr,
                amount: positive_list(i.amount)?,
            }),
            MsgInput::Burn(i) => Msg::BurnMsg(BurnMsg {
                burner: i.burner_addr,
                amount: positive_list(i.amount)?,
            }),
            MsgInput::BurnFrom(i) => Msg::BurnFromMsg(BurnFromMsg {
                burner: i.burner_addr,
                from_address: i.from_addr.ok_or(TxError::MissingField("fromAddr"))?,
                amount: positive_list(i.amount)?,
            }),
            MsgInput::Transfer(i) => Msg::TransferMsg(TransferMsg {
                from_address: i.from_addr,
                to_address: i.to_addr,
                amount: positive_list(i.amount)?,
            }),
            MsgInput::TransferFrom(i) => Msg::TransferFromMsg(TransferFromMsg {
                sender: i.spender_addr.ok_or(TxError::MissingField("spenderAddr"))?,
                from_address: i.from_addr,
                to_address: i.to_addr,
                amount: positive_list(i.amount)?,
            }),
            MsgInput::TransferOwnership(i) => Msg::TransferOwnershipMsg(TransferOwnershipMsg {
                owner: i.owner_addr,
                to_address: i.to_addr,
                denom: required("denom", i.denom)?,
            }),
            MsgInput::Freeze(i) => Msg::FreezeMsg(freeze(i)?),
            MsgInput::Unfreeze(i) => Msg::UnfreezeMsg(freeze(i)?),
            MsgInput::IncreaseAllowance(i) => Msg::IncreaseAllowanceMsg(allowance(i)?),
            MsgInput::DecreaseAllowance(i) => Msg::DecreaseAllowanceMsg(allowance(i)?),
            MsgInput::Description(i) => Msg::DescriptionMsg(DescriptionMsg {
                owner: i.owner_addr,
                denom: required("denom", i.denom)?,
                description: i.description,
            }),
            MsgInput::Features(i) => Msg::FeaturesMsg(FeaturesMsg {
                owner: i.owner_addr,
                denom: required("denom", i.denom)?,
                features: i.features.into(),
            }),
        })
    }
}

fn required(field: &'static str, value: String) -> Result<String, TxError> {
    if value.trim().is_empty() {
        return Err(TxError::MissingField(field));
    }
    Ok(value)
}

fn nonzero(field: &'static str, value: Uint256) -> Result<Uint256, TxError> {
    if value.is_zero() {
        return Err(TxError::InvalidInput(format!("{} must not be zero", field)));
    }
    Ok(value)
}

fn positive(coin: Coin) -> Result<Coin, TxError> {
    if coin.denom.is_empty() {
        return Err(TxError::MissingField("denom"));
    }
    if coin.is_zero() {
        return Err(TxError::InvalidInput(format!("zero amount of {}", coin.denom)));
    }
    Ok(coin)
}

fn positive_list(coins: Vec<Coin>) -> Result<Vec<Coin>, TxError> {
    if coins.is_empty() {
        return Err(TxError::MissingField("amount"));
    }
    coins.into_iter().map(positive).collect()
}

fn described(description: Description) -> Result<Description, TxError> {
    required("moniker", description.moniker.clone())?;
    Ok(description)
}

fn freeze(i: FreezeInput) -> Result<FreezeMsg, TxError> {
    Ok(FreezeMsg {
        freezer: i.freezer_addr,
        holder: i.holder_addr,
        denom: required("denom", i.denom)?,
        op: required("op", i.op)?,
    })
}

fn account_address(address: Address) -> Result<Address, TxError> {
    if address.get_prefix().ends_with("valoper") {
        return Err(TxError::InvalidInput(format!(
            "{} is a validator operator address",
            address
        )));
    }
    Ok(address)
}

fn allowance(i: AllowanceInput) -> Result<AllowanceMsg, TxError> {
    Ok(AllowanceMsg {
        owner: i.owner_addr,
        spender: i.spender_addr,
        amount: positive_list(i.amount)?,
    })
}

/// The set of message kinds a client is willing to build. Constructed once
/// and handed to whoever builds transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgRegistry {
    kinds: BTreeSet<MsgKind>,
}

impl Default for MsgRegistry {
    fn default() -> Self {
        MsgRegistry::standard()
    }
}

impl MsgRegistry {
    /// Every known kind, cosmos modules and the issue module
    pub fn standard() -> Self {
        MsgRegistry::with_kinds(MsgKind::ALL.iter().copied())
    }

    pub fn with_kinds<I: IntoIterator<Item = MsgKind>>(kinds: I) -> Self {
        MsgRegistry {
            kinds: kinds.into_iter().collect(),
        }
    }

    pub fn contains(&self, kind: MsgKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &MsgKind> {
        self.kinds.iter()
    }

    /// Resolves a registered `type` tag
    pub fn resolve(&self, type_tag: &str) -> Result<MsgKind, TxError> {
        match MsgKind::from_tag(type_tag) {
            Some(kind) if self.contains(kind) => Ok(kind),
            _ => Err(TxError::UnregisteredMessageType(type_tag.to_string())),
        }
    }

    pub fn build(&self, input: MsgInput) -> Result<Msg, TxError> {
        let kind = input.kind();
        if !self.contains(kind) {
            return Err(TxError::UnregisteredMessageType(kind.type_tag().to_string()));
        }
        debug!("Building {} message", kind);
        input.build()
    }

    /// Builds a message from its `type` tag and camelCase JSON input
    pub fn build_json(&self, type_tag: &str, input: Value) -> Result<Msg, TxError> {
        let kind = self.resolve(type_tag)?;
        let input = MsgInput::from_json(kind, input)
            .map_err(|e| TxError::InvalidInput(format!("{} input {}", kind, e)))?;
        self.build(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20], "darc").unwrap()
    }

    fn darc(amount: u32) -> Coin {
        Coin::new(amount.into(), "darc".to_string())
    }

    #[test]
    fn tags_round_trip() {
        for kind in MsgKind::ALL.iter() {
            assert_eq!(MsgKind::from_tag(kind.type_tag()), Some(*kind));
        }
        assert_eq!(MsgKind::from_tag("cosmos-sdk/MsgNope"), None);
        assert_eq!(MsgKind::cosmos().count(), 13);
    }

    #[test]
    fn build_send() {
        let registry = MsgRegistry::standard();
        let msg = registry
            .build(MsgInput::Send(SendInput {
                from: addr(1),
                to: addr(2),
                amount: darc(100),
            }))
            .unwrap();
        assert_eq!(
            msg,
            Msg::SendMsg(SendMsg {
                from_address: addr(1),
                to_address: addr(2),
                amount: vec![darc(100)],
            })
        );
        assert_eq!(msg.kind(), MsgKind::Send);
    }

    #[test]
    fn zero_amounts_are_rejected() {
        let registry = MsgRegistry::standard();
        let res = registry.build(MsgInput::Delegate(DelegateInput {
            delegator_addr: addr(1),
            validator_addr: addr(2),
            amount: darc(0),
        }));
        match res {
            Err(TxError::InvalidInput(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
        let res = registry.build(MsgInput::Mint(MintInput {
            minter_addr: addr(1),
            to_addr: addr(2),
            amount: vec![],
        }));
        match res {
            Err(TxError::MissingField("amount")) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn disabled_kinds_are_unregistered() {
        let registry = MsgRegistry::with_kinds(MsgKind::cosmos());
        assert!(!registry.contains(MsgKind::Mint));
        let res = registry.build(MsgInput::Burn(BurnInput {
            burner_addr: addr(1),
            from_addr: None,
            amount: vec![darc(1)],
        }));
        match res {
            Err(TxError::UnregisteredMessageType(tag)) => assert_eq!(tag, "issue/MsgBurn"),
            other => panic!("unexpected {:?}", other),
        }
        match registry.build_json("issue/MsgMint", json!({})) {
            Err(TxError::UnregisteredMessageType(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
        match registry.build_json("bogus/Msg", json!({})) {
            Err(TxError::UnregisteredMessageType(tag)) => assert_eq!(tag, "bogus/Msg"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn build_from_json_input() {
        let registry = MsgRegistry::standard();
        let msg = registry
            .build_json(
                "cosmos-sdk/MsgBeginRedelegate",
                json!({
                    "delegatorAddr": addr(1).to_string(),
                    "validatorSrcAddr": addr(2).to_string(),
                    "validatorDstAddr": addr(3).to_string(),
                    "amount": {"amount": "10", "denom": "darc"},
                }),
            )
            .unwrap();
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["type"], json!("cosmos-sdk/MsgBeginRedelegate"));
        assert_eq!(v["value"]["validator_src_address"], json!(addr(2).to_string()));
        assert_eq!(v["value"]["amount"], json!({"amount": "10", "denom": "darc"}));

        let msg = registry
            .build_json(
                "cosmos-sdk/MsgVote",
                json!({"voterAddr": addr(4).to_string(), "proposalId": 12, "option": "Yes"}),
            )
            .unwrap();
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["value"]["proposal_id"], json!("12"));

        match registry.build_json("cosmos-sdk/MsgVote", json!({"proposalId": 12})) {
            Err(TxError::InvalidInput(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn issue_create_sets_owner_and_features() {
        let registry = MsgRegistry::standard();
        let msg = registry
            .build_json(
                "issue/MsgIssueCreate",
                json!({
                    "issuerAddr": addr(9).to_string(),
                    "denom": "coin",
                    "symbol": "CN",
                    "totalSupply": "1000000",
                    "decimals": 6,
                    "mintDisabled": true,
                }),
            )
            .unwrap();
        let v = serde_json::to_value(&msg).unwrap();
        assert_eq!(v["value"]["owner"], v["value"]["issuer"]);
        assert_eq!(v["value"]["params"]["total_supply"], json!("1000000"));
        assert_eq!(v["value"]["params"]["decimals"], json!("6"));
        assert_eq!(v["value"]["params"]["features"]["mint_disabled"], json!(true));
        assert_eq!(v["value"]["params"]["features"]["freeze_disabled"], json!(false));
    }

    #[test]
    fn withdraw_all_rewards() {
        let registry = MsgRegistry::standard();
        let msg = registry
            .build_json(
                "cosmos-sdk/MsgWithdrawDelegationRewardsAll",
                json!({"delegatorAddr": addr(5).to_string()}),
            )
            .unwrap();
        assert_eq!(msg.kind(), MsgKind::WithdrawDelegationRewardsAll);
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "type": "cosmos-sdk/MsgWithdrawDelegationRewardsAll",
                "value": {"delegator_address": addr(5).to_string()},
            })
        );

        match registry.build_json("cosmos-sdk/MsgWithdrawDelegationRewardsAll", json!({})) {
            Err(TxError::InvalidInput(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
        let operator = Address::from_bytes([5; 20], "darcvaloper").unwrap();
        match registry.build(MsgInput::WithdrawDelegationRewardsAll(DelegatorInput {
            delegator_addr: operator,
        })) {
            Err(TxError::InvalidInput(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
        let without = MsgRegistry::with_kinds(vec![MsgKind::WithdrawDelegationReward]);
        match without.build_json(
            "cosmos-sdk/MsgWithdrawDelegationRewardsAll",
            json!({"delegatorAddr": addr(5).to_string()}),
        ) {
            Err(TxError::UnregisteredMessageType(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn transfer_from_requires_spender() {
        let input = TransferInput {
            spender_addr: None,
            from_addr: addr(1),
            to_addr: addr(2),
            amount: vec![darc(5)],
        };
        match MsgInput::TransferFrom(input.clone()).build() {
            Err(TxError::MissingField("spenderAddr")) => {}
            other => panic!("unexpected {:?}", other),
        }
        let msg = MsgInput::Transfer(input).build().unwrap();
        assert_eq!(msg.kind(), MsgKind::Transfer);
    }
}
