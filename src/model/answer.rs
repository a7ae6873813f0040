//! Submitted data. Read-only from the core's point of view; it is only
//! counted to decide whether structural deletions are safe.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: Uuid,
    pub form_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: Uuid,
    pub response_id: Uuid,
    pub questioning_id: Uuid,
    /// Chosen option for select questions
    pub option_id: Option<Uuid>,
    pub value: Option<String>,
}
