/// Credential check consumed by the store.
///
/// The store passes the request's raw credential string and only looks at
/// the verdict. Any closure `Fn(&str) -> bool` qualifies.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, credential: &str) -> bool;
}

impl<F> Authenticator for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn authenticate(&self, credential: &str) -> bool {
        self(credential)
    }
}

/// Accepts every credential. Used for public servers and local admin tools.
pub struct AllowAll;

impl Authenticator for AllowAll {
    fn authenticate(&self, _credential: &str) -> bool {
        true
    }
}

/// Rejects every credential.
pub struct DenyAll;

impl Authenticator for DenyAll {
    fn authenticate(&self, _credential: &str) -> bool {
        false
    }
}
