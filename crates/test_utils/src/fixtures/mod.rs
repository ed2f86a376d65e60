//! Named accounts and amounts shared by the service and scenario tests

use dwork_types::app::AccountId;

/// One whole token or currency unit at 18 decimals.
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// Deterministic account for a test role. Distinct tags give distinct accounts.
pub fn account(tag: u8) -> AccountId {
    let mut bytes = [tag; 32];
    if let Some(first) = bytes.first_mut() {
        *first = 0xa0;
    }
    AccountId(bytes)
}

/// The deployer: factory owner, dividends owner and first board maintainer.
pub fn owner() -> AccountId {
    account(1)
}

/// A workspace manager.
pub fn manager() -> AccountId {
    account(2)
}

/// A client registered in the workspace.
pub fn client() -> AccountId {
    account(3)
}

/// A worker registered in the workspace.
pub fn worker() -> AccountId {
    account(4)
}

/// An address with no role anywhere.
pub fn stranger() -> AccountId {
    account(5)
}

/// A token holder, numbered from 0.
pub fn holder(n: u8) -> AccountId {
    account(0x10u8.wrapping_add(n))
}

/// Decodes a `0x`-prefixed or bare hex account, for fixtures written as text.
pub fn account_from_hex(s: &str) -> Option<AccountId> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(stripped).ok()?;
    let arr: [u8; 32] = bytes.try_into().ok()?;
    Some(AccountId(arr))
}
