use serde::{Deserialize, Serialize};

/// Request descriptor built by a transfer handler and passed to the store.
///
/// `authorization` is the raw credential string from the request (e.g. the
/// `Authorization` header value). The store hands it to its authenticator
/// verbatim and never inspects it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestVars {
    pub oid: String,
    pub size: u64,
    #[serde(default)]
    pub authorization: String,
}

impl RequestVars {
    pub fn new(oid: impl Into<String>, size: u64) -> Self {
        Self {
            oid: oid.into(),
            size,
            authorization: String::new(),
        }
    }

    /// Attach a credential.
    pub fn with_authorization(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = authorization.into();
        self
    }
}
