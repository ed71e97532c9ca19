use crate::role::Role;
use soroban_sdk::contracttype;

#[derive(Clone)]
#[contracttype]
pub(crate) enum DataKey {
    Admin,
    FeeManager,
    OperationsAdmin,
    ProtocolFeeReceiver,
}

impl From<Role> for DataKey {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => DataKey::Admin,
            Role::FeeManager => DataKey::FeeManager,
            Role::OperationsAdmin => DataKey::OperationsAdmin,
            Role::ProtocolFeeReceiver => DataKey::ProtocolFeeReceiver,
        }
    }
}
