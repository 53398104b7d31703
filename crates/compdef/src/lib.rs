//! Compiles a command line interface description into a zsh completion
//! script.
//!
//! ```
//! use compdef::{Cmd, Config, Flag, Ty, Val};
//!
//! let cmd = Cmd::new("hello")
//!     .flag(Flag::new("-n").alias("--name").help("who to greet").val(Val::new(Ty::Text)));
//! let script = compdef::generate(&cmd, &Config::default().wrap(false)).unwrap();
//! assert_eq!(
//!     script,
//!     "#compdef hello\n_arguments -s -S '(-n --name)-n+[who to greet]:NAME:' '(-n --name)--name=[who to greet]:NAME:'\n",
//! );
//! ```
use std::{env, fmt};

macro_rules! format_err {
    ($($tt:tt)*) => {
        $crate::Error { msg: format!($($tt)*) }
    };
}

macro_rules! bail {
    ($($tt:tt)*) => {
        return Err(format_err!($($tt)*))
    };
}

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

mod ast;
mod escape;
mod encode;
mod compile;
mod reindent;
mod emit;
mod rt;

pub use crate::{
    ast::{Arg, Arity, Cmd, Flag, FlagId, Subcommand, Ty, Val},
    compile::{compile, Compiled, Compiler, Unit},
    emit::assemble,
    reindent::{fix_indent, render},
    rt::{augment, Completion},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub struct Error {
    msg: String,
}

impl Error {
    /// Prints the error and exits the process with status 2.
    pub fn exit(self) -> ! {
        eprintln!("{self}");
        std::process::exit(2)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.msg, f)
    }
}

impl std::error::Error for Error {}

/// Knobs of the generated script.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) trigger: String,
    pub(crate) wrap: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config { trigger: "--zsh-completion".to_string(), wrap: true }
    }
}

impl Config {
    /// Defaults, overridden by `COMPDEF_TRIGGER` and `COMPDEF_WRAP=0|1`.
    pub fn from_env() -> Config {
        let mut res = Config::default();
        if let Ok(trigger) = env::var("COMPDEF_TRIGGER") {
            res.trigger = trigger;
        }
        if let Ok(wrap) = env::var("COMPDEF_WRAP") {
            res.wrap = wrap != "0";
        }
        res
    }

    /// The flag [`augment`] injects to request the script.
    pub fn trigger(mut self, flag: impl Into<String>) -> Config {
        self.trigger = flag.into();
        self
    }

    /// Put every `_arguments` field on its own line.
    pub fn wrap(mut self, yes: bool) -> Config {
        self.wrap = yes;
        self
    }
}

/// Compiles `cmd` and lays the units out as a complete `#compdef` file.
pub fn generate(cmd: &Cmd, config: &Config) -> Result<String> {
    let compiled = compile(cmd, config)?;
    assemble(&compiled)
}
