//! # Email Proof Arguments
//!
//! The email proof takes exactly four named string arguments. Callers
//! normally build [`EmailProofArgs`] directly. Tooling that receives an
//! argument bag as JSON goes through [`EmailProofArgs::from_json`], which
//! accepts the `{"name": {"argumentType": "String", "value": "..."}}` shape
//! and rejects anything outside the closed field set.

use serde::Deserialize;
use serde_json::Value;
use zeroize::Zeroizing;

use crate::error::ArgumentError;

const PRIVATE_KEY: &str = "privateKey";
const ID: &str = "id";
const EMAIL_ADDRESS: &str = "emailAddress";
const SEMAPHORE_ID: &str = "semaphoreId";
const FIELDS: [&str; 4] = [PRIVATE_KEY, ID, EMAIL_ADDRESS, SEMAPHORE_ID];

/// Arguments for [`EmailPcd::prove`](crate::EmailPcd::prove).
pub struct EmailProofArgs {
    /// Issuer's Ed25519 seed, hex. Zeroized on drop.
    pub private_key: Zeroizing<String>,
    /// Proof id.
    pub id: String,
    /// Address being attested.
    pub email_address: String,
    /// Identity commitment the address is bound to, hex.
    pub semaphore_id: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct StringArgument {
    argument_type: String,
    value: String,
}

impl EmailProofArgs {
    /// Parse a JSON argument bag.
    pub fn from_json(bag: &Value) -> Result<Self, ArgumentError> {
        let map = bag.as_object().ok_or(ArgumentError::NotAnObject)?;
        if let Some(unknown) = map.keys().find(|k| !FIELDS.contains(&k.as_str())) {
            return Err(ArgumentError::Unknown(unknown.clone()));
        }
        let field = |name: &'static str| -> Result<String, ArgumentError> {
            let raw = map.get(name).ok_or(ArgumentError::Missing(name))?;
            let arg = StringArgument::deserialize(raw).map_err(|e| ArgumentError::Malformed {
                name,
                reason: e.to_string(),
            })?;
            if arg.argument_type != "String" {
                return Err(ArgumentError::Malformed {
                    name,
                    reason: format!("expected argumentType \"String\", got {:?}", arg.argument_type),
                });
            }
            Ok(arg.value)
        };
        Ok(Self {
            private_key: Zeroizing::new(field(PRIVATE_KEY)?),
            id: field(ID)?,
            email_address: field(EMAIL_ADDRESS)?,
            semaphore_id: field(SEMAPHORE_ID)?,
        })
    }
}

impl std::fmt::Debug for EmailProofArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailProofArgs")
            .field("private_key", &"[REDACTED]")
            .field("id", &self.id)
            .field("email_address", &self.email_address)
            .field("semaphore_id", &self.semaphore_id)
            .finish()
    }
}
