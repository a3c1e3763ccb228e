//! One-Time Code Records

use jiff::Timestamp;

use crate::{
    domain::{accounts::records::AccountId, two_factor::OneTimeCode},
    ids::TypedId,
};

/// One-Time Code Id
pub type OneTimeCodeId = TypedId<OneTimeCodeRecord>;

/// One-Time Code Record
#[derive(Debug, Clone, PartialEq)]
pub struct OneTimeCodeRecord {
    pub id: OneTimeCodeId,
    pub account: Option<AccountId>,
    pub code: OneTimeCode,
    pub issued_at: Timestamp,
}
