use std::path::PathBuf;

use mlua::Value;

use crate::util::errors::FabError;

use super::context::Ctx;
use super::executable::LuaExecutable;
use super::output::LuaOutput;
use super::source::LuaSource;

/// Resolves a script value accepted as a Build input or implicit (a Source
/// or an Output) to the absolute filesystem path it denotes.
pub fn value_to_path(ctx: &Ctx, value: &Value) -> Result<PathBuf, FabError> {
    if let Value::UserData(ud) = value {
        if let Ok(source) = ud.borrow::<LuaSource>() {
            return Ok(source.inner.path().to_path_buf());
        }
        if let Ok(output) = ud.borrow::<LuaOutput>() {
            return Ok(ctx.build_dir().join(output.inner.relative_path()));
        }
    }
    Err(FabError::BadArgument("expected a Source or Output".to_string()))
}

/// Resolves a script value accepted as a command token: a plain string, or
/// an Executable contributing its absolute path.
pub fn value_to_token(value: &Value) -> Result<String, FabError> {
    match value {
        Value::String(s) => Ok(s.to_str().map_err(|e| FabError::BadArgument(e.to_string()))?.to_string()),
        Value::UserData(ud) => ud
            .borrow::<LuaExecutable>()
            .map(|exe| exe.inner.path().to_string_lossy().into_owned())
            .map_err(|_| FabError::BadArgument("expected a string or Executable".to_string())),
        _ => Err(FabError::BadArgument("expected a string or Executable".to_string())),
    }
}
