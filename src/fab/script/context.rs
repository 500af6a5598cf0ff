use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use crate::core::{Accumulator, Cache, DEPENDENCY_DIRNAME};

/// Shared state reachable from every Lua callback registered for one
/// configure run. Held behind `Rc` so callback closures, which `mlua`
/// requires to be `'static`, can each hold a cheap clone instead of
/// borrowing `Accumulator` directly.
pub struct ScriptContext {
    pub accumulator: RefCell<Accumulator>,
    pub cache: Cache,
    pub overrides: BTreeMap<String, PathBuf>,
    pub options: BTreeMap<String, String>,
}

pub type Ctx = Rc<ScriptContext>;

impl ScriptContext {
    pub fn project_root(&self) -> PathBuf {
        self.accumulator.borrow().project_root.clone()
    }

    pub fn build_dir(&self) -> PathBuf {
        self.accumulator.borrow().build_dir.clone()
    }

    pub fn dependency_dir(&self) -> PathBuf {
        self.build_dir().join(DEPENDENCY_DIRNAME)
    }
}
