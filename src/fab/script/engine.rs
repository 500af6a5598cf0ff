use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use mlua::{Lua, Table, Value, Variadic};

use crate::core::{Accumulator, Cache, Executable, Rule, Source};
use crate::sources;
use crate::util::errors::FabError;
use crate::util::{escape, glob, identifier, paths};

use super::context::{Ctx, ScriptContext};
use super::convert::value_to_token;
use super::dependency::LuaDependency;
use super::executable::LuaExecutable;
use super::output::LuaOutput;
use super::rule::LuaRule;
use super::source::LuaSource;

/// Evaluates the configuration script at `config_path` against a fresh Lua
/// 5.4 interpreter, mutating and returning the accumulator it fills in.
pub fn run(
    config_path: &Path,
    accumulator: Accumulator,
    cache: Cache,
    overrides: BTreeMap<String, PathBuf>,
    options: BTreeMap<String, String>,
) -> anyhow::Result<Accumulator> {
    let ctx: Ctx = Rc::new(ScriptContext {
        accumulator: RefCell::new(accumulator),
        cache,
        overrides,
        options,
    });

    let lua = Lua::new();
    install_globals(&lua, ctx.clone())?;

    let source = std::fs::read_to_string(config_path)
        .map_err(|e| anyhow::anyhow!("reading {}: {e}", config_path.display()))?;

    lua.load(&source)
        .set_name(&config_path.display().to_string())
        .exec()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    drop(lua);

    Rc::try_unwrap(ctx)
        .map_err(|_| anyhow::anyhow!("script state outlived the interpreter"))
        .map(|ctx| ctx.accumulator.into_inner())
}

fn install_globals(lua: &Lua, ctx: Ctx) -> mlua::Result<()> {
    let fab = lua.create_table()?;

    {
        let ctx = ctx.clone();
        fab.set(
            "glob",
            lua.create_function(move |_, args: Variadic<String>| {
                let args: Vec<String> = args.iter().cloned().collect();
                let (pattern, ignores) = args
                    .split_first()
                    .ok_or_else(|| FabError::BadArgument("glob requires a pattern argument".to_string()))?;
                let matches = glob::glob(&ctx.project_root(), pattern, ignores).map_err(mlua::Error::from)?;
                Ok(matches
                    .into_iter()
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect::<Vec<String>>())
            })?,
        )?;
    }

    fab.set(
        "path_join",
        lua.create_function(|_, parts: Variadic<String>| {
            let mut joined = PathBuf::new();
            for part in parts.iter() {
                joined.push(part);
            }
            Ok(joined.to_string_lossy().into_owned())
        })?,
    )?;

    {
        let ctx = ctx.clone();
        fab.set(
            "path_abs",
            lua.create_function(move |_, p: String| Ok(resolve_against(&ctx.project_root(), &p).to_string_lossy().into_owned()))?,
        )?;
    }

    {
        let ctx = ctx.clone();
        fab.set(
            "path_rel",
            lua.create_function(move |_, p: String| {
                let target = resolve_against(&ctx.project_root(), &p);
                let relative = pathdiff::diff_paths(&target, ctx.build_dir())
                    .ok_or_else(|| FabError::InvalidPath(p.clone()))?;
                Ok(relative.to_string_lossy().into_owned())
            })?,
        )?;
    }

    fab.set(
        "string_split",
        lua.create_function(|_, (s, sep, n): (String, String, Option<i64>)| {
            let pieces: Vec<String> = match n {
                Some(limit) if limit > 0 => s.splitn(limit as usize, sep.as_str()).map(str::to_string).collect(),
                _ => s.split(sep.as_str()).map(str::to_string).collect(),
            };
            Ok(pieces)
        })?,
    )?;

    {
        let ctx = ctx.clone();
        fab.set(
            "project_root",
            lua.create_function(move |_, ()| Ok(ctx.project_root().to_string_lossy().into_owned()))?,
        )?;
    }

    {
        let ctx = ctx.clone();
        fab.set(
            "build_directory",
            lua.create_function(move |_, ()| Ok(ctx.build_dir().to_string_lossy().into_owned()))?,
        )?;
    }

    fab.set(
        "find_executable",
        lua.create_function(|_, name: String| {
            Ok(paths::find_on_path(&name).map(|path| LuaExecutable { inner: Executable::new(path) }))
        })?,
    )?;

    {
        let ctx = ctx.clone();
        fab.set(
            "get_executable",
            lua.create_function(move |_, value: Value| {
                let path = match &value {
                    Value::String(s) => {
                        let s = s.to_str().map_err(|e| FabError::BadArgument(e.to_string()))?;
                        resolve_against(&ctx.project_root(), s)
                    }
                    Value::UserData(ud) => {
                        let output = ud
                            .borrow::<LuaOutput>()
                            .map_err(|_| FabError::BadArgument("expected a path string or Output".to_string()))?;
                        ctx.build_dir().join(output.inner.relative_path())
                    }
                    _ => return Err(FabError::BadArgument("expected a path string or Output".to_string()).into()),
                };

                if !path.is_file() {
                    return Err(FabError::InvalidPath(format!("{} is not a file", path.display())).into());
                }

                Ok(LuaExecutable { inner: Executable::new(path) })
            })?,
        )?;
    }

    {
        let ctx = ctx.clone();
        fab.set(
            "option",
            lua.create_function(move |lua, (name, kind, required): (String, Value, Option<bool>)| {
                option_impl(lua, &ctx, &name, &kind, required.unwrap_or(false))
            })?,
        )?;
    }

    {
        let ctx = ctx.clone();
        fab.set(
            "source",
            lua.create_function(move |_, path: String| {
                let absolute = resolve_against(&ctx.project_root(), &path);

                let inside_allowed = paths::is_inside(&absolute, &ctx.project_root())
                    || paths::is_inside(&absolute, &ctx.dependency_dir())
                    || ctx.overrides.values().any(|dir| paths::is_inside(&absolute, dir));

                if !inside_allowed {
                    return Err(FabError::InvalidPath(format!(
                        "{} is outside the project root, dependency root, and any overridden dependency directory",
                        absolute.display()
                    ))
                    .into());
                }

                Ok(LuaSource { inner: Source::new(absolute) })
            })?,
        )?;
    }

    {
        let ctx = ctx.clone();
        fab.set("rule", lua.create_function(move |_, spec: Table| rule_impl(&ctx, spec))?)?;
    }

    {
        let ctx = ctx.clone();
        fab.set(
            "dependency",
            lua.create_function(move |_, (name, url, revision): (String, String, String)| {
                identifier::check_identifier(&name).map_err(mlua::Error::from)?;

                let dependency_dir = ctx.dependency_dir();
                let dependency =
                    sources::resolve_dependency(&name, &url, &revision, &dependency_dir, &ctx.cache, &ctx.overrides)
                        .map_err(mlua::Error::from)?;

                ctx.accumulator
                    .borrow_mut()
                    .add_dependency(dependency.clone())
                    .map_err(mlua::Error::from)?;

                Ok(LuaDependency { inner: dependency })
            })?,
        )?;
    }

    lua.globals().set("fab", fab)
}

fn resolve_against(root: &Path, p: &str) -> PathBuf {
    let candidate = Path::new(p);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        root.join(candidate)
    }
}

fn option_impl(lua: &Lua, ctx: &Ctx, name: &str, kind: &Value, required: bool) -> mlua::Result<Value> {
    ctx.accumulator.borrow_mut().mark_option_queried(name).map_err(mlua::Error::from)?;

    let supplied = ctx.options.get(name).cloned();

    match kind {
        Value::String(k) => {
            let k = k.to_str().map_err(|e| FabError::BadArgument(e.to_string()))?.to_string();
            match k.as_str() {
                "string" => match supplied {
                    Some(v) => Ok(Value::String(lua.create_string(&v)?)),
                    None if required => Err(FabError::MissingOption(name.to_string()).into()),
                    None => Ok(Value::Nil),
                },
                "number" => match supplied {
                    Some(v) => {
                        let parsed: f64 = v.parse().map_err(|_| FabError::InvalidNumber(v.clone()))?;
                        Ok(Value::Number(parsed))
                    }
                    None if required => Err(FabError::MissingOption(name.to_string()).into()),
                    None => Ok(Value::Nil),
                },
                other => Err(FabError::BadArgument(format!("unknown option kind `{other}`")).into()),
            }
        }
        Value::Table(choices) => {
            let allowed: Vec<String> = choices.sequence_values::<String>().collect::<mlua::Result<_>>()?;
            match supplied {
                Some(v) if allowed.contains(&v) => Ok(Value::String(lua.create_string(&v)?)),
                Some(v) => Err(FabError::NotInCombo(v).into()),
                None if required => Err(FabError::MissingOption(name.to_string()).into()),
                None => Ok(Value::Nil),
            }
        }
        _ => Err(FabError::BadArgument("option kind must be \"string\", \"number\", or a sequence of strings".to_string()).into()),
    }
}

fn rule_impl(ctx: &Ctx, spec: Table) -> mlua::Result<LuaRule> {
    let name: String = spec
        .get("name")
        .map_err(|_| FabError::BadArgument("rule requires a `name`".to_string()))?;
    identifier::check_identifier(&name).map_err(mlua::Error::from)?;

    let command_value: Value = spec
        .get("command")
        .map_err(|_| FabError::BadArgument("rule requires a `command`".to_string()))?;
    let tokens = command_tokens(&command_value)?;

    let mut declared = Vec::new();
    let command = escape::parse_command(&tokens, &mut declared);

    let description: Option<String> = spec.get("description").ok();
    let description = description.map(|d| escape::parse_description(&d, &mut declared));

    let dep_style_name: Option<String> = spec.get("depstyle").ok();
    let dep_style = match dep_style_name {
        Some(s) => {
            crate::core::DepStyle::parse(&s).ok_or_else(|| FabError::BadArgument(format!("unknown depstyle `{s}`")))?
        }
        None => crate::core::DepStyle::Normal,
    };

    let compdb: bool = spec.get("compdb").unwrap_or(false);

    let rule = Rule {
        name,
        description,
        command,
        variables: declared,
        dep_style,
        compdb,
    };

    ctx.accumulator.borrow_mut().add_rule(rule.clone()).map_err(mlua::Error::from)?;

    Ok(LuaRule { ctx: ctx.clone(), inner: rule })
}

fn command_tokens(value: &Value) -> Result<Vec<String>, FabError> {
    match value {
        Value::String(s) => {
            let s = s.to_str().map_err(|e| FabError::BadArgument(e.to_string()))?;
            Ok(s.split_whitespace().map(str::to_string).collect())
        }
        Value::Table(table) => {
            let mut tokens = Vec::new();
            for value in table.sequence_values::<Value>() {
                tokens.push(value_to_token(&value?)?);
            }
            Ok(tokens)
        }
        _ => Err(FabError::BadArgument("command must be a string or a sequence".to_string())),
    }
}
