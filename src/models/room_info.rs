use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A live room as seen from the HTTP API. The buffer itself is not exposed.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RoomInfoResponse {
    pub room_id: String,
    pub members: Vec<String>,
    pub typing: Vec<String>,
    pub code_length: usize,
}
