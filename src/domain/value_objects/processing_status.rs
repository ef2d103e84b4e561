use serde::{Deserialize, Serialize};

/// Uploads that fail are rolled back, so a stored document never ends in a failed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProcessingStatus {
    #[default]
    Pending,
    Processing,
    Completed,
}

impl ProcessingStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, ProcessingStatus::Completed)
    }

    pub fn can_transition_to(&self, new_status: &ProcessingStatus) -> bool {
        matches!(
            (self, new_status),
            (ProcessingStatus::Pending, ProcessingStatus::Processing)
                | (ProcessingStatus::Processing, ProcessingStatus::Completed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Pending => "pending",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Completed => "completed",
        }
    }

    pub fn parse(status: &str) -> Result<Self, String> {
        match status {
            "pending" => Ok(ProcessingStatus::Pending),
            "processing" => Ok(ProcessingStatus::Processing),
            "completed" => Ok(ProcessingStatus::Completed),
            other => Err(format!("Invalid processing status: {}", other)),
        }
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
