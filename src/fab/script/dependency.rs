use mlua::{UserData, UserDataFields, UserDataMethods, Variadic};

use crate::core::Dependency;
use crate::util::errors::FabError;
use crate::util::glob;

/// The script-facing handle returned by `fab.dependency`.
#[derive(Clone)]
pub struct LuaDependency {
    pub inner: Dependency,
}

impl UserData for LuaDependency {
    fn add_fields<'lua, F: UserDataFields<'lua, Self>>(fields: &mut F) {
        fields.add_field_method_get("name", |_, this| Ok(this.inner.name.clone()));
        fields.add_field_method_get("url", |_, this| Ok(this.inner.url.clone()));
        fields.add_field_method_get("revision", |_, this| Ok(this.inner.revision.clone()));
        fields.add_field_method_get("path", |_, this| Ok(this.inner.path.to_string_lossy().into_owned()));
    }

    fn add_methods<'lua, M: UserDataMethods<'lua, Self>>(methods: &mut M) {
        methods.add_method("glob", |_, this, args: Variadic<String>| {
            let args: Vec<String> = args.iter().cloned().collect();
            let (pattern, ignores) = args
                .split_first()
                .ok_or_else(|| FabError::BadArgument("glob requires a pattern argument".to_string()))?;

            let matches = glob::glob(&this.inner.path, pattern, ignores).map_err(mlua::Error::from)?;
            Ok(matches
                .into_iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect::<Vec<String>>())
        });
    }
}
