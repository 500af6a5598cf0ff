/// How the executor should parse compiler-emitted dependency metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepStyle {
    Normal,
    Gcc,
    Msvc,
}

impl DepStyle {
    /// Parses the `depstyle` field of `fab.rule{..}`; `"gcc"` and `"clang"`
    /// are aliases for the same executor dependency style.
    pub fn parse(s: &str) -> Option<DepStyle> {
        match s {
            "normal" => Some(DepStyle::Normal),
            "gcc" | "clang" => Some(DepStyle::Gcc),
            "msvc" => Some(DepStyle::Msvc),
            _ => None,
        }
    }

    /// The value of the executor's `deps` build-graph field, or `None` when
    /// it should be omitted entirely (the `normal` style).
    pub fn ninja_value(self) -> Option<&'static str> {
        match self {
            DepStyle::Normal => None,
            DepStyle::Gcc => Some("gcc"),
            DepStyle::Msvc => Some("msvc"),
        }
    }
}

/// A named command template with declared variables, registered once per
/// configure run. Rule names are unique process-wide.
#[derive(Clone, Debug)]
pub struct Rule {
    pub name: String,
    pub description: Option<String>,
    pub command: String,
    pub variables: Vec<String>,
    pub dep_style: DepStyle,
    pub compdb: bool,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rule({})", self.name)
    }
}
