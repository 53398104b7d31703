//! The command tree a host hands to the compiler.
//!
//! This is a read-only view: the host (an argument parser, or
//! `compdef-decl`) builds it once per run and the compiler only borrows it.

use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicU32, Ordering},
};

use crate::{Error, Result};

/// A command: the program itself or one of its subcommands.
#[derive(Debug, Clone)]
pub struct Cmd {
    pub name: String,
    pub flags: Vec<Flag>,
    pub args: Vec<Arg>,
    pub subcommands: Vec<Subcommand>,
}

/// Named child of a [`Cmd`], with the description shown when completing
/// the subcommand name.
#[derive(Debug, Clone)]
pub struct Subcommand {
    pub name: String,
    pub doc: Option<String>,
    pub cmd: Cmd,
}

/// Opaque identity of a [`Flag`]. Clones share it, nothing else does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagId(u32);

impl FlagId {
    fn fresh() -> FlagId {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        FlagId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A named option, known under one or more aliases (`-f`, `--foo`).
#[derive(Debug, Clone)]
pub struct Flag {
    id: FlagId,
    aliases: Vec<String>,
    pub repeatable: bool,
    pub help: Option<String>,
    pub val: Option<Val>,
}

/// The value a flag takes.
#[derive(Debug, Clone, Default)]
pub struct Val {
    /// Explicit display name; derived from the flag's aliases when absent.
    pub metavar: Option<String>,
    pub ty: Ty,
    pub choices: Vec<String>,
    pub default: Option<String>,
}

/// A positional argument.
#[derive(Debug, Clone)]
pub struct Arg {
    pub name: String,
    pub help: Option<String>,
    pub arity: Arity,
    pub ty: Ty,
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Ty {
    #[default]
    Text,
    Integer,
    Float,
    FilePath,
    DirPath,
    /// Name of a completion function, used verbatim.
    Custom(String),
}

/// How many values a positional argument consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    ExactlyOne,
    ZeroOrOne,
    ZeroOrMore,
    OneOrMore,
    FixedCount(usize),
}

impl Cmd {
    pub fn new(name: impl Into<String>) -> Cmd {
        Cmd { name: name.into(), flags: Vec::new(), args: Vec::new(), subcommands: Vec::new() }
    }

    pub fn flag(mut self, flag: Flag) -> Cmd {
        self.flags.push(flag);
        self
    }

    pub fn arg(mut self, arg: Arg) -> Cmd {
        self.args.push(arg);
        self
    }

    pub fn subcommand(mut self, doc: Option<&str>, cmd: Cmd) -> Cmd {
        let name = cmd.name.clone();
        self.subcommands.push(Subcommand { name, doc: doc.map(String::from), cmd });
        self
    }

    pub fn has_subcommands(&self) -> bool {
        !self.subcommands.is_empty()
    }
}

impl Flag {
    pub fn new(alias: impl Into<String>) -> Flag {
        Flag {
            id: FlagId::fresh(),
            aliases: vec![alias.into()],
            repeatable: false,
            help: None,
            val: None,
        }
    }

    pub fn id(&self) -> FlagId {
        self.id
    }

    /// Never empty.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Flag {
        self.aliases.push(alias.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Flag {
        self.help = Some(help.into());
        self
    }

    pub fn repeatable(mut self) -> Flag {
        self.repeatable = true;
        self
    }

    pub fn val(mut self, val: Val) -> Flag {
        self.val = Some(val);
        self
    }

    pub fn takes_value(&self) -> bool {
        self.val.is_some()
    }

    /// `LOG_FILE` for `-l, --log-file`, unless a metavar is given.
    pub fn display_name(&self) -> String {
        if let Some(metavar) = self.val.as_ref().and_then(|it| it.metavar.as_ref()) {
            return metavar.clone();
        }
        let alias = self
            .aliases
            .iter()
            .find(|it| is_long(it))
            .unwrap_or(&self.aliases[0]);
        alias.trim_start_matches('-').replace('-', "_").to_uppercase()
    }
}

pub(crate) fn is_long(alias: &str) -> bool {
    alias.starts_with("--")
}

impl Val {
    pub fn new(ty: Ty) -> Val {
        Val { ty, ..Val::default() }
    }

    pub fn metavar(mut self, metavar: impl Into<String>) -> Val {
        self.metavar = Some(metavar.into());
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Val
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Val {
        self.default = Some(default.into());
        self
    }
}

impl Arg {
    pub fn new(name: impl Into<String>, arity: Arity) -> Arg {
        Arg { name: name.into(), help: None, arity, ty: Ty::Text, choices: Vec::new() }
    }

    pub fn help(mut self, help: impl Into<String>) -> Arg {
        self.help = Some(help.into());
        self
    }

    pub fn ty(mut self, ty: Ty) -> Arg {
        self.ty = ty;
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Arg
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::ExactlyOne => f.write_str("exactly one value"),
            Arity::ZeroOrOne => f.write_str("zero or one value"),
            Arity::ZeroOrMore => f.write_str("zero or more values"),
            Arity::OneOrMore => f.write_str("one or more values"),
            Arity::FixedCount(n) => write!(f, "exactly {n} values"),
        }
    }
}

/// Parses `nargs` notation: empty, `?`, `*`, `+` or a count.
impl FromStr for Arity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Arity> {
        let res = match s {
            "" => Arity::ExactlyOne,
            "?" => Arity::ZeroOrOne,
            "*" => Arity::ZeroOrMore,
            "+" => Arity::OneOrMore,
            _ => match s.parse::<usize>() {
                Ok(n) => Arity::FixedCount(n),
                Err(_) => bail!("unsupported arity: `{s}`"),
            },
        };
        Ok(res)
    }
}
