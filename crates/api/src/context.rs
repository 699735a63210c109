/// Principal context for a request: the username a verified bearer token was issued to.
///
/// Role checks happen in the directory service, not here; a token only proves
/// who the caller is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    username: String,
}

impl PrincipalContext {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
