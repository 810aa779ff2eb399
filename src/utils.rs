//! Identifier helpers shared by every collection

use bech32::Bech32m;
use uuid7::uuid7;

use crate::error::LedgerError;

// construct a unique record id then encode using bech32
pub fn new_uuid_to_bech32(hrp: &str) -> Result<String, LedgerError> {
    let hrp = bech32::Hrp::parse(hrp).map_err(|err| LedgerError::Codec(err.to_string()))?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())
        .map_err(|err| LedgerError::Codec(err.to_string()))?;
    Ok(encode)
}
