//! Generic execution configuration

use serde::{Deserialize, Serialize};

/// Console directives recognised when none are configured.
///
/// These are client-side commands of the engine's interactive console; they
/// configure the console itself and are never sent to the server.
pub const DEFAULT_DIRECTIVES: &[&str] = &[
    "ACCEPT", "BREAK", "BTITLE", "CLEAR", "COL", "COLUMN", "COMPUTE", "DEFINE", "DESC",
    "DESCRIBE", "EXIT", "HOST", "PAUSE", "PROMPT", "QUIT", "REM", "REMARK", "SET", "SHOW",
    "SPOOL", "TIMING", "TTITLE", "UNDEFINE", "VARIABLE", "WHENEVER",
];

/// Execution engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Leading keywords that mark a line as a console directive
    pub directive_keywords: Vec<String>,
    /// Text reported for statements that complete without a result set
    pub success_message: String,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            directive_keywords: DEFAULT_DIRECTIVES.iter().map(|d| d.to_string()).collect(),
            success_message: "Statement executed successfully".to_string(),
        }
    }
}
