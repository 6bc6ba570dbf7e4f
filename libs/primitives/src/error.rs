/// The error taxonomy shared by every evaluator, the mana accountant, and the
/// write pipeline. Variants group by *kind*, not by call site, matching
/// `spec.md` §7: callers pattern-match on the kind to decide how to surface
/// the failure (JSON-RPC `error` field vs. an aborted `accept_*` call).
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChainError {
    /// A precondition failed: unknown account, duplicate symbol, invalid
    /// zone type, NAI check digit mismatch, decimals out of range, negative
    /// balance, exceeded connectivity, missing ABI entry.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A required signing key was absent, or the caller is not authorized
    /// for the action it attempted (e.g. transferring an NFA it doesn't
    /// own).
    #[error("authority error: {0}")]
    Authority(String),

    /// Insufficient mana for a required charge on a *create* path, or an
    /// oversize contract/account data blob.
    #[error("resource error: {0}")]
    Resource(String),

    /// A referenced entity (symbol, zone, contract, NFA...) does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The script VM raised or exhausted its execution budget. During an
    /// NFA tick this is caught and degraded (`spec.md` §4.4); elsewhere it
    /// aborts the enclosing transaction.
    #[error("vm error: {0}")]
    Vm(String),

    /// The block/transaction ingress pipeline rejected the request: too far
    /// in the future, no block generator registered, or a duplicate
    /// transaction id.
    #[error("ingress error: {0}")]
    Ingress(String),
}

impl ChainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn authority(msg: impl Into<String>) -> Self {
        Self::Authority(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn vm(msg: impl Into<String>) -> Self {
        Self::Vm(msg.into())
    }

    pub fn ingress(msg: impl Into<String>) -> Self {
        Self::Ingress(msg.into())
    }
}

pub type ChainResult<T> = Result<T, ChainError>;
