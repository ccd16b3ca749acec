//! Entry-function payload: a structured call into an on-chain program.

use serde::{Deserialize, Serialize};

pub const ENTRY_FUNCTION_PAYLOAD: &str = "entry_function_payload";

/// A call into an on-chain entry function, ready to be signed and relayed by
/// a wallet.
///
/// Names the fully-qualified function, its type arguments (e.g. the reward
/// coin type), and the ordered argument list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFunctionPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<serde_json::Value>,
}

impl EntryFunctionPayload {
    pub fn new(
        function: impl Into<String>,
        type_arguments: Vec<String>,
        arguments: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            payload_type: ENTRY_FUNCTION_PAYLOAD.to_string(),
            function: function.into(),
            type_arguments,
            arguments,
        }
    }
}
