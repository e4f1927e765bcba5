use serde::{Deserialize, Serialize};

pub mod receive_webhook {
    use super::*;

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub message: String,
        /// Log entries turned into events. Entries that failed to process are
        /// counted in `total_logs` but not here.
        pub processed: usize,
        pub total_logs: usize,
    }
}
