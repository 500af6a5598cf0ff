//! The closed error taxonomy surfaced through the script interpreter.

/// Every way a configure run can fail, short of `std::io::Error` bubbling up
/// from somewhere the taxonomy doesn't name explicitly.
#[derive(thiserror::Error, Debug)]
pub enum FabError {
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid identifier `{name}`: {reason}")]
    InvalidIdentifier { name: String, reason: &'static str },

    #[error("rule `{0}` is already defined")]
    DuplicateRule(String),

    #[error("a build with output `{0}` already exists")]
    DuplicateOutput(String),

    #[error("option `{0}` was queried more than once")]
    DuplicateOption(String),

    #[error("install destination `{0}` is already used")]
    DuplicateInstall(String),

    #[error("dependency `{0}` already exists")]
    DuplicateDependency(String),

    #[error("unknown variable `{variable}` for rule `{rule}`")]
    UnknownVariable { rule: String, variable: String },

    #[error("variable `{0}` is reserved and cannot be bound")]
    ReservedVariable(String),

    #[error("bad argument: {0}")]
    BadArgument(String),

    #[error("could not resolve revision `{revision}` for dependency `{name}`")]
    UnresolvedRevision { name: String, revision: String },

    #[error("invocation of `{program}` failed: {reason}")]
    InvokeFailed { program: String, reason: String },

    #[error("`{0}` is not a valid number")]
    InvalidNumber(String),

    #[error("value `{0}` is not in the allowed combination")]
    NotInCombo(String),

    #[error("missing required option `{0}`")]
    MissingOption(String),

    #[error("io failure: {0}")]
    IoFailure(#[from] std::io::Error),
}

pub type FabResult<T> = Result<T, FabError>;

/// Lifts a [`FabError`] into an `mlua::Error` so it can cross the Lua
/// callback boundary and unwind the script with a readable message.
impl From<FabError> for mlua::Error {
    fn from(err: FabError) -> mlua::Error {
        mlua::Error::external(err)
    }
}
