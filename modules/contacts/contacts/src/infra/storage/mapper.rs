use contacts_sdk::{Account, Company};

use crate::infra::storage::entity::{account, company};

/// Convert a database entity to a contract model
impl From<account::Model> for Account {
    fn from(e: account::Model) -> Self {
        Self {
            id: e.id,
            first_name: e.first_name,
            last_name: e.last_name,
            email: e.email,
            company_id: e.company_id,
            position: e.position,
            phone_1: e.phone_1,
            phone_2: e.phone_2,
            phone_3: e.phone_3,
            deleted_at: e.deleted_at,
        }
    }
}

impl From<company::Model> for Company {
    fn from(e: company::Model) -> Self {
        Self {
            id: e.id,
            name: e.name,
            address: e.address,
        }
    }
}
