use async_graphql::{InputObject, SimpleObject, ID};
use serde::{Deserialize, Serialize};
use taskly_store::User;

/// Input for `signUp`
#[derive(InputObject)]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub name: String,
    pub avatar: Option<String>,
}

/// Input for `signIn`
#[derive(InputObject)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Public view of a user; the password hash has no field here
#[derive(Debug, Clone, PartialEq, SimpleObject)]
#[graphql(name = "User")]
pub struct UserObject {
    pub id: ID,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl From<User> for UserObject {
    fn from(user: User) -> Self {
        Self {
            id: ID(user.id.to_string()),
            name: user.name,
            email: user.email,
            avatar: user.avatar,
        }
    }
}

/// Result of `signUp` / `signIn`
#[derive(Debug, Clone, SimpleObject)]
pub struct AuthUser {
    pub user: UserObject,
    pub token: String,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct TaskList {
    pub id: ID,
    pub created_at: String,
    pub title: String,
    pub progress: f64,
    pub users: Vec<UserObject>,
    pub todos: Option<Vec<ToDo>>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct ToDo {
    pub id: ID,
    pub content: String,
    pub is_completed: bool,
    pub task_list: Box<TaskList>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
