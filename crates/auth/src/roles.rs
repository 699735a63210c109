use serde::{Deserialize, Serialize};

use crate::Capability;

/// Coarse capability tier assigned to each identity.
///
/// Serialized with the spellings used in configuration files: `"read"` and
/// `"read/write"`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "read")]
    Read,
    #[serde(rename = "read/write")]
    ReadWrite,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Read => "read",
            Role::ReadWrite => "read/write",
        }
    }

    /// Role matrix: reads are open to every role, writes only to `ReadWrite`.
    pub fn grants(&self, required: Capability) -> bool {
        match required {
            Capability::Read => matches!(self, Role::Read | Role::ReadWrite),
            Capability::Write => matches!(self, Role::ReadWrite),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
