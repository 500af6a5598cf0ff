use mlua::{UserData, UserDataFields};

use crate::core::Source;

/// The script-facing handle returned by `fab.source`.
#[derive(Clone)]
pub struct LuaSource {
    pub inner: Source,
}

impl UserData for LuaSource {
    fn add_fields<'lua, F: UserDataFields<'lua, Self>>(fields: &mut F) {
        fields.add_field_method_get("path", |_, this| Ok(this.inner.path().to_string_lossy().into_owned()));
        fields.add_field_method_get("name", |_, this| Ok(this.inner.name()));
    }
}
