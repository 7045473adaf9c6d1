//! Caller authorization and the operational switch.
//!
//! Guards are explicit functions returning typed errors and are composed at
//! the start of every mutating operation.

use crate::account::AccountId;
use crate::error::SuretyError;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessControl {
    owner: AccountId,
    operational: bool,
    authorized_callers: BTreeSet<AccountId>,
}

impl AccessControl {
    pub fn new(owner: AccountId) -> Self {
        AccessControl {
            owner,
            operational: true,
            authorized_callers: BTreeSet::new(),
        }
    }

    pub fn owner(&self) -> AccountId {
        self.owner
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    /// The owner is implicitly authorized for privileged mutators.
    pub fn is_authorized(&self, caller: &AccountId) -> bool {
        *caller == self.owner || self.authorized_callers.contains(caller)
    }

    /// Owner-only: flip the operational switch.
    pub fn set_operating_status(
        &mut self,
        caller: AccountId,
        operational: bool,
    ) -> Result<(), SuretyError> {
        self.require_owner(&caller)?;
        self.operational = operational;
        info!("operational status set to {}", operational);
        Ok(())
    }

    /// Owner-only: whitelist a contract identity for privileged mutators.
    pub fn authorize_caller(
        &mut self,
        caller: AccountId,
        target: AccountId,
    ) -> Result<(), SuretyError> {
        self.require_owner(&caller)?;
        self.authorized_callers.insert(target);
        info!("caller {} authorized", target);
        Ok(())
    }

    /// Owner-only: remove a contract identity from the whitelist.
    pub fn deauthorize_caller(
        &mut self,
        caller: AccountId,
        target: AccountId,
    ) -> Result<(), SuretyError> {
        self.require_owner(&caller)?;
        self.authorized_callers.remove(&target);
        info!("caller {} deauthorized", target);
        Ok(())
    }

    pub fn require_owner(&self, caller: &AccountId) -> Result<(), SuretyError> {
        if *caller != self.owner {
            return Err(SuretyError::Unauthorized);
        }
        Ok(())
    }

    pub fn require_operational(&self) -> Result<(), SuretyError> {
        if !self.operational {
            return Err(SuretyError::NotOperational);
        }
        Ok(())
    }

    pub fn require_authorized(&self, caller: &AccountId) -> Result<(), SuretyError> {
        if !self.is_authorized(caller) {
            return Err(SuretyError::Unauthorized);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (AccessControl, AccountId, AccountId) {
        let owner = AccountId::from_seed("owner");
        let app = AccountId::from_seed("app");
        (AccessControl::new(owner), owner, app)
    }

    #[test]
    fn test_owner_is_implicitly_authorized() {
        let (access, owner, app) = setup();
        assert!(access.is_authorized(&owner));
        assert!(!access.is_authorized(&app));
    }

    #[test]
    fn test_only_owner_can_authorize() {
        let (mut access, owner, app) = setup();
        let stranger = AccountId::from_seed("stranger");
        assert_eq!(
            access.authorize_caller(stranger, app),
            Err(SuretyError::Unauthorized)
        );
        access.authorize_caller(owner, app).unwrap();
        assert!(access.is_authorized(&app));
    }

    #[test]
    fn test_deauthorize_revokes_access() {
        let (mut access, owner, app) = setup();
        access.authorize_caller(owner, app).unwrap();
        access.deauthorize_caller(owner, app).unwrap();
        assert!(!access.is_authorized(&app));
        assert_eq!(
            access.require_authorized(&app),
            Err(SuretyError::Unauthorized)
        );
    }

    #[test]
    fn test_operational_toggle_is_owner_only() {
        let (mut access, owner, app) = setup();
        assert!(access.is_operational());
        assert_eq!(
            access.set_operating_status(app, false),
            Err(SuretyError::Unauthorized)
        );
        access.set_operating_status(owner, false).unwrap();
        assert_eq!(
            access.require_operational(),
            Err(SuretyError::NotOperational)
        );
    }
}
