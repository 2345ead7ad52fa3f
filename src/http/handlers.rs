//! Token API handlers.
//!
//! Handlers parse and validate input, call one `Token` entry point and
//! shape the result. No handler touches ledger state directly.

use alloy::primitives::{Address, B256};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::http::middleware::CallerContext;
use crate::http::response::{ApiError, Quantity};
use crate::http::server::AppState;
use crate::recovery::types::RecoverySignature;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
    pub domain_separator: B256,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub address: Address,
    pub balance: String,
    pub backup: Option<Address>,
    pub blacklisted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AllowanceResponse {
    pub owner: Address,
    pub spender: Address,
    pub allowance: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransferRequest {
    pub to: Address,
    pub amount: Quantity,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApproveRequest {
    pub spender: Address,
    pub amount: Quantity,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransferFromRequest {
    pub from: Address,
    pub to: Address,
    pub amount: Quantity,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BackupRequest {
    pub backup: Address,
}

/// Relayed recovery authorization.
///
/// The signature is given either as a 65-byte hex `signature` or as
/// separate `v`, `r`, `s` components.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EmergencyTransferBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<B256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<B256>,
    pub from: Address,
    pub to: Address,
    pub deadline: Quantity,
}

impl EmergencyTransferBody {
    fn recovery_signature(&self) -> Result<RecoverySignature, ApiError> {
        match (&self.signature, self.v, self.r, self.s) {
            (Some(hex), None, None, None) => Ok(hex.parse::<RecoverySignature>()?),
            (None, Some(v), Some(r), Some(s)) => Ok(RecoverySignature::new(v, r, s)),
            _ => Err(ApiError::BadRequest(
                "provide either 'signature' or all of 'v', 'r', 's'".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmergencyTransferResponse {
    pub from: Address,
    pub to: Address,
    pub amount: String,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

fn address(raw: &str) -> Result<Address, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid address '{}'", raw)))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn token_info(State(state): State<AppState>) -> Json<TokenInfo> {
    let token = &state.token;
    let metadata = token.metadata();
    Json(TokenInfo {
        name: metadata.name.clone(),
        symbol: metadata.symbol.clone(),
        decimals: metadata.decimals,
        total_supply: token.total_supply().to_string(),
        chain_id: token.verifier().chain_id(),
        verifying_contract: token.verifier().verifying_contract(),
        domain_separator: token.domain_separator(),
    })
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let view = state.token.account(address(&raw)?);
    Ok(Json(AccountResponse {
        address: view.address,
        balance: view.balance.to_string(),
        backup: view.backup,
        blacklisted: view.blacklisted,
    }))
}

pub async fn get_allowance(
    State(state): State<AppState>,
    Path((owner, spender)): Path<(String, String)>,
) -> Result<Json<AllowanceResponse>, ApiError> {
    let owner = address(&owner)?;
    let spender = address(&spender)?;
    Ok(Json(AllowanceResponse {
        owner,
        spender,
        allowance: state.token.allowance(owner, spender).to_string(),
    }))
}

pub async fn transfer(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    let req = body(payload)?;
    state
        .token
        .transfer(caller.address, req.to, req.amount.parse()?)?;
    Ok(Json(OkResponse { ok: true }))
}

pub async fn approve(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    payload: Result<Json<ApproveRequest>, JsonRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    let req = body(payload)?;
    state
        .token
        .approve(caller.address, req.spender, req.amount.parse()?)?;
    Ok(Json(OkResponse { ok: true }))
}

pub async fn transfer_from(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    payload: Result<Json<TransferFromRequest>, JsonRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    let req = body(payload)?;
    state
        .token
        .transfer_from(caller.address, req.from, req.to, req.amount.parse()?)?;
    Ok(Json(OkResponse { ok: true }))
}

pub async fn set_backup(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerContext>,
    payload: Result<Json<BackupRequest>, JsonRejection>,
) -> Result<Json<OkResponse>, ApiError> {
    let req = body(payload)?;
    state.token.set_backup(caller.address, req.backup)?;
    Ok(Json(OkResponse { ok: true }))
}

pub async fn emergency_transfer(
    State(state): State<AppState>,
    payload: Result<Json<EmergencyTransferBody>, JsonRejection>,
) -> Result<Json<EmergencyTransferResponse>, ApiError> {
    let req = body(payload)?;
    let signature = req.recovery_signature()?;
    let deadline = req.deadline.parse()?;

    let amount = state
        .token
        .emergency_transfer(signature, req.from, req.to, deadline)?;

    Ok(Json(EmergencyTransferResponse {
        from: req.from,
        to: req.to,
        amount: amount.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_forms_are_exclusive() {
        let mut req = EmergencyTransferBody {
            from: Address::repeat_byte(1),
            to: Address::repeat_byte(2),
            deadline: Quantity::Number(1),
            ..Default::default()
        };
        assert!(req.recovery_signature().is_err());

        req.v = Some(27);
        req.r = Some(B256::repeat_byte(1));
        req.s = Some(B256::repeat_byte(2));
        assert_eq!(req.recovery_signature().unwrap().v, 27);

        req.signature = Some("0x00".to_string());
        assert!(req.recovery_signature().is_err());
    }

    #[test]
    fn test_bad_address_is_bad_request() {
        assert!(matches!(address("0x1234"), Err(ApiError::BadRequest(_))));
        assert!(address("0x70997970C51812dc3A010C7d01b50e0d17dc79C8").is_ok());
    }
}
