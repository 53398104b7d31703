//! Hooking script generation into a program's own argument handling.
//!
//! ```no_run
//! use compdef::{Cmd, Config, Flag};
//!
//! let cmd = Cmd::new("hello").flag(Flag::new("--verbose"));
//! let completion = compdef::augment(cmd, Config::from_env());
//! // Prints the script and exits when invoked as `hello --zsh-completion`.
//! completion.exit_if_requested();
//! ```
use std::{
    ffi::{OsStr, OsString},
    io::{self, Write},
};

use crate::{compile::Compiler, emit, Cmd, Config, Flag, FlagId, Result};

/// A command with the trigger flag added to its root.
#[derive(Debug)]
pub struct Completion {
    cmd: Cmd,
    trigger: FlagId,
    config: Config,
}

/// Adds the trigger flag (see [`Config::trigger`]) to `cmd`.
///
/// The flag is told apart from user flags by identity, so a user flag with
/// the same spelling still shows up in the script.
pub fn augment(mut cmd: Cmd, config: Config) -> Completion {
    let flag = Flag::new(config.trigger.clone()).help("Print the zsh completion script and exit.");
    let trigger = flag.id();
    cmd.flags.push(flag);
    Completion { cmd, trigger, config }
}

impl Completion {
    /// The augmented command, trigger flag included.
    pub fn cmd(&self) -> &Cmd {
        &self.cmd
    }

    pub fn trigger(&self) -> FlagId {
        self.trigger
    }

    /// Whether the trigger flag appears in `args` before any `--`.
    pub fn requested<I>(&self, args: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
    {
        args.into_iter()
            .map(|it| it.as_ref().to_owned())
            .take_while(|it| it != "--")
            .any(|it| it == self.config.trigger.as_str())
    }

    /// The complete script, without the trigger flag.
    pub fn script(&self) -> Result<String> {
        let compiled = Compiler::new(&self.config).skip(self.trigger).compile(&self.cmd)?;
        emit::assemble(&compiled)
    }

    /// Writes the script to `out` if `args` (program name excluded) ask for
    /// it. Nothing is written when generation fails.
    pub fn intercept<I, W>(&self, args: I, out: &mut W) -> Result<bool>
    where
        I: IntoIterator,
        I::Item: AsRef<OsStr>,
        W: Write,
    {
        if !self.requested(args) {
            return Ok(false);
        }
        tracing::debug!(program = %self.cmd.name, "completion script requested");
        let script = self.script()?;
        out.write_all(script.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|err| format_err!("can't write completion script: {err}"))?;
        Ok(true)
    }

    /// Checks the process arguments; on request prints the script to stdout
    /// and exits with status 0. Errors exit with status 2.
    pub fn exit_if_requested(&self) {
        let args = std::env::args_os().skip(1).collect::<Vec<OsString>>();
        let stdout = io::stdout();
        match self.intercept(args, &mut stdout.lock()) {
            Ok(true) => std::process::exit(0),
            Ok(false) => (),
            Err(err) => err.exit(),
        }
    }
}
