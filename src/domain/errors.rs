use std::fmt;

// Failures reported by a battle API adapter. Application-level rejections
// (`success: false`) are not errors; they travel inside the response envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    Transport(String),
    Upstream { status: u16, message: Option<String> },
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(err) => write!(f, "battle api transport error: {err}"),
            ApiError::Upstream { status, message } => {
                if let Some(message) = message {
                    write!(f, "battle api upstream error {status}: {message}")
                } else {
                    write!(f, "battle api upstream error {status}")
                }
            }
            ApiError::Decode(err) => write!(f, "battle api response decode error: {err}"),
        }
    }
}

impl std::error::Error for ApiError {}

// Errors propagated out of battle use cases.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleError {
    Api(ApiError),
    // A resync was attempted but the server did not return a snapshot.
    SyncRejected {
        code: Option<String>,
        message: Option<String>,
    },
}

impl fmt::Display for BattleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleError::Api(err) => write!(f, "{err}"),
            BattleError::SyncRejected { code, message } => write!(
                f,
                "battle state sync rejected (code: {}, message: {})",
                code.as_deref().unwrap_or("none"),
                message.as_deref().unwrap_or("none")
            ),
        }
    }
}

impl std::error::Error for BattleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BattleError::Api(err) => Some(err),
            BattleError::SyncRejected { .. } => None,
        }
    }
}

impl From<ApiError> for BattleError {
    fn from(err: ApiError) -> Self {
        BattleError::Api(err)
    }
}
