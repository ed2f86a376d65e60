// Path: crates/types/src/app/link.rs
//! Public address-link registry entries.

use crate::app::AccountId;
use parity_scale_codec::{Decode, Encode};

/// The current link set of an owner.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkRecord {
    /// Addresses currently linked.
    pub links: Vec<AccountId>,
    /// Number of link updates so far; also the last history index.
    pub counter: u64,
}
