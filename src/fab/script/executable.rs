use mlua::{UserData, UserDataFields, UserDataMethods};

use crate::core::Executable;

/// The script-facing handle returned by `fab.find_executable`,
/// `fab.get_executable`, and as a command-token contributor in `fab.rule`.
#[derive(Clone)]
pub struct LuaExecutable {
    pub inner: Executable,
}

impl UserData for LuaExecutable {
    fn add_fields<'lua, F: UserDataFields<'lua, Self>>(fields: &mut F) {
        fields.add_field_method_get("path", |_, this| Ok(this.inner.path().to_string_lossy().into_owned()));
        fields.add_field_method_get("name", |_, this| Ok(this.inner.name()));
    }

    fn add_methods<'lua, M: UserDataMethods<'lua, Self>>(methods: &mut M) {
        methods.add_method("invoke", |_, this, args: mlua::Variadic<String>| {
            this.inner.invoke(&args).map_err(mlua::Error::from)
        });
    }
}
