use serde::{Deserialize, Serialize};
use service_core::entity::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
}

impl Entity for User {
    const NAME: &'static str = "User";
    type Create = UserCreate;

    fn from_create(id: u64, input: UserCreate) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
        }
    }

    fn id(&self) -> u64 {
        self.id
    }
}
