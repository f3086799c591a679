use serde::{Deserialize, Serialize};

use crate::domain::{Comment, CommentId};

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const COMMENTS_COLLECTION: &str = "comments";

/// Body of `POST /comments`. The server assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub name: String,
    pub email: String,
    pub body: String,
}

impl From<&Comment> for CreateCommentRequest {
    fn from(draft: &Comment) -> Self {
        Self {
            name: draft.name.clone(),
            email: draft.email.clone(),
            body: draft.body.clone(),
        }
    }
}

/// Body of `PUT /comments/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceCommentRequest {
    pub id: CommentId,
    pub name: String,
    pub email: String,
    pub body: String,
}

impl ReplaceCommentRequest {
    pub fn new(id: CommentId, draft: &Comment) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            email: draft.email.clone(),
            body: draft.body.clone(),
        }
    }
}
