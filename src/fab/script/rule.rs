use std::collections::BTreeMap;
use std::path::PathBuf;

use mlua::{Table, UserData, UserDataFields, UserDataMethods, Value};

use crate::core::{Build, Output, Rule, BUILTIN_VARIABLES, DEPFILES_DIRNAME, OUTPUT_DIRNAME, RESERVED_VARIABLES};
use crate::util::errors::FabError;
use crate::util::paths;

use super::context::Ctx;
use super::convert::value_to_path;
use super::output::LuaOutput;

/// The script-facing handle returned by `fab.rule`.
#[derive(Clone)]
pub struct LuaRule {
    pub ctx: Ctx,
    pub inner: Rule,
}

impl UserData for LuaRule {
    fn add_fields<'lua, F: UserDataFields<'lua, Self>>(fields: &mut F) {
        fields.add_field_method_get("name", |_, this| Ok(this.inner.name.clone()));
    }

    fn add_methods<'lua, M: UserDataMethods<'lua, Self>>(methods: &mut M) {
        methods.add_method(
            "build",
            |_, this, (out, inputs, variables, implicits): (String, Table, Table, Option<Table>)| {
                let ctx = &this.ctx;

                let cleaned = paths::clean_relative(&out).ok_or_else(|| FabError::InvalidPath(out.clone()))?;
                let flattened = paths::flatten(&cleaned);
                let output = Output::new(PathBuf::from(OUTPUT_DIRNAME).join(flattened));

                let mut input_paths = Vec::new();
                for value in inputs.sequence_values::<Value>() {
                    input_paths.push(value_to_path(ctx, &value?)?);
                }

                let mut implicit_paths = Vec::new();
                if let Some(implicits) = implicits {
                    for value in implicits.sequence_values::<Value>() {
                        implicit_paths.push(value_to_path(ctx, &value?)?);
                    }
                }

                let mut bound = BTreeMap::new();
                for pair in variables.pairs::<String, String>() {
                    let (key, value) = pair?;
                    if RESERVED_VARIABLES.contains(&key.as_str()) {
                        return Err(FabError::ReservedVariable(key).into());
                    }
                    if BUILTIN_VARIABLES.contains(&key.as_str()) {
                        let cleaned_value = paths::clean_relative(&value).ok_or_else(|| FabError::InvalidPath(value.clone()))?;
                        let flattened_value = paths::flatten(&cleaned_value);
                        bound.insert(key, format!("{DEPFILES_DIRNAME}/{flattened_value}"));
                    } else if this.inner.variables.contains(&key) {
                        bound.insert(format!("fabvar_{key}"), value);
                    } else {
                        return Err(FabError::UnknownVariable {
                            rule: this.inner.name.clone(),
                            variable: key,
                        }
                        .into());
                    }
                }

                let build = Build {
                    rule: this.inner.name.clone(),
                    inputs: input_paths,
                    implicits: implicit_paths,
                    output: output.clone(),
                    variables: bound,
                };

                ctx.accumulator.borrow_mut().add_build(build).map_err(mlua::Error::from)?;

                Ok(LuaOutput { ctx: ctx.clone(), inner: output })
            },
        );
    }
}
