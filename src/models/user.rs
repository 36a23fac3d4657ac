use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User record as stored. The id is assigned by the caller, never generated.
///
/// Serialized field names (`id`, `email`, `fullName`, `password`) are also the
/// member names a JSON Patch addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub password: String, // plaintext, hashing is out of scope
}

/// Request/response body for the users resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    /// Required on create, overridden by the path on replace
    #[serde(default)]
    pub id: Option<i32>,
    pub email: String,
    pub full_name: String,
    pub password: String,
}

impl UserDto {
    pub fn into_user(self, id: i32) -> User {
        User {
            id,
            email: self.email,
            full_name: self.full_name,
            password: self.password,
        }
    }
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        UserDto {
            id: Some(u.id),
            email: u.email,
            full_name: u.full_name,
            password: u.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dto_uses_camel_case_and_optional_id() {
        let dto: UserDto = serde_json::from_value(json!({
            "email": "a@x.com",
            "fullName": "John",
            "password": "p"
        }))
        .unwrap();
        assert_eq!(dto.id, None);

        let user = dto.into_user(9);
        assert_eq!(user.id, 9);
        assert_eq!(user.full_name, "John");

        let back = serde_json::to_value(UserDto::from(user)).unwrap();
        assert_eq!(
            back,
            json!({"id": 9, "email": "a@x.com", "fullName": "John", "password": "p"})
        );
    }
}
