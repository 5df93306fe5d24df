//! User Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use mesh_app::rpc::users::UserMessage;

    pub(super) fn ann() -> Value {
        json!({
            "name": "Ann",
            "email": "ann@example.com",
            "password": "secret1",
            "phone": "+15551234567",
        })
    }

    pub(super) fn make_user(id: &str) -> UserMessage {
        UserMessage {
            id: id.to_string(),
            name: "Ann".to_string(),
            email: "ann@example.com".to_string(),
            phone: String::new(),
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
        }
    }
}
