use mlua::{UserData, UserDataFields, UserDataMethods};

use crate::core::Output;

use super::context::Ctx;

/// The script-facing handle returned by `Rule.build`, usable as a later
/// Build's input/implicit and installable via `Output.install`.
#[derive(Clone)]
pub struct LuaOutput {
    pub ctx: Ctx,
    pub inner: Output,
}

impl UserData for LuaOutput {
    fn add_fields<'lua, F: UserDataFields<'lua, Self>>(fields: &mut F) {
        fields.add_field_method_get("path", |_, this| Ok(this.inner.relative_path().to_string_lossy().into_owned()));
        fields.add_field_method_get("name", |_, this| Ok(this.inner.name()));
    }

    fn add_methods<'lua, M: UserDataMethods<'lua, Self>>(methods: &mut M) {
        methods.add_method("install", |_, this, destination: String| {
            this.ctx
                .accumulator
                .borrow_mut()
                .add_install(destination, this.inner.relative_path().to_path_buf())
                .map_err(mlua::Error::from)
        });
    }
}
