//! Turns a command tree into one completion function per command.
use std::{collections::HashSet, fmt::Write};

use crate::{ast, encode, escape, reindent, Config, FlagId, Result};

/// Completion function body for one command of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub name: String,
    pub body: String,
}

/// Output of [`compile`]: every subcommand's unit, children before their
/// parent, and the root unit.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub(crate) program: String,
    pub children: Vec<Unit>,
    pub root: Unit,
}

impl Compiled {
    pub fn program(&self) -> &str {
        &self.program
    }

    /// All units in definition order, root last.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.children.iter().chain(Some(&self.root))
    }
}

pub fn compile(cmd: &ast::Cmd, config: &Config) -> Result<Compiled> {
    Compiler::new(config).compile(cmd)
}

const DISPATCH: &str = "\
local context state state_descr line
typeset -A opt_args
{arguments}
case $state in
\tdispatch)
\t\tcase $line[{index}] in
\t\t\t{cases}
\t\tesac
\t\t;;
esac";

pub struct Compiler<'a> {
    config: &'a Config,
    skip: Option<FlagId>,
    names: HashSet<String>,
}

impl<'a> Compiler<'a> {
    pub fn new(config: &'a Config) -> Compiler<'a> {
        Compiler { config, skip: None, names: HashSet::new() }
    }

    /// Leaves the flag with this identity out of every unit.
    pub fn skip(mut self, id: FlagId) -> Compiler<'a> {
        self.skip = Some(id);
        self
    }

    pub fn compile(mut self, cmd: &ast::Cmd) -> Result<Compiled> {
        let mut children = Vec::new();
        let name = self.unit_name(format!("_{}", function_part(&cmd.name)));
        let root = self.compile_rec(&mut children, name, cmd)?;
        Ok(Compiled { program: cmd.name.clone(), children, root })
    }

    fn compile_rec(&mut self, units: &mut Vec<Unit>, name: String, cmd: &ast::Cmd) -> Result<Unit> {
        let mut fields = vec!["_arguments".to_string(), "-s".to_string(), "-S".to_string()];
        if cmd.has_subcommands() {
            fields.push("-C".to_string());
        }
        for flag in &cmd.flags {
            if Some(flag.id()) == self.skip {
                continue;
            }
            fields.extend(encode::flag(flag));
        }
        for arg in &cmd.args {
            fields.extend(encode::arg(arg)?);
        }

        if !cmd.has_subcommands() {
            let body = self.join(&fields);
            tracing::debug!(unit = %name, fields = fields.len() - 3, "compiled");
            return Ok(Unit { name, body });
        }

        fields.push(select_field(cmd));
        fields.push("*::arg:->dispatch".to_string());

        let mut cases = String::new();
        for sub in &cmd.subcommands {
            let child = self.unit_name(format!("{name}__{}", function_part(&sub.name)));
            let unit = self.compile_rec(units, child, &sub.cmd)?;
            if !cases.is_empty() {
                cases.push('\n');
            }
            w!(cases, "{}) {} ;;", escape::quote(&sub.name), unit.name);
            units.push(unit);
        }

        let index = command_index(cmd).to_string();
        let arguments = self.join(&fields);
        let body = reindent::render(
            DISPATCH,
            &[
                ("arguments", arguments.as_str()),
                ("index", index.as_str()),
                ("cases", cases.as_str()),
            ],
        )?;
        tracing::debug!(unit = %name, subcommands = cmd.subcommands.len(), "compiled dispatcher");
        Ok(Unit { name, body })
    }

    fn join(&self, fields: &[String]) -> String {
        let sep = if self.config.wrap { " \\\n\t" } else { " " };
        fields.iter().map(|it| escape::quote(it)).collect::<Vec<_>>().join(sep)
    }

    fn unit_name(&mut self, base: String) -> String {
        let mut res = base.clone();
        let mut n = 1;
        while self.names.contains(&res) {
            n += 1;
            res = format!("{base}_{n}");
        }
        self.names.insert(res.clone());
        res
    }
}

/// `:command:((name\:description ...))`.
fn select_field(cmd: &ast::Cmd) -> String {
    let entries = cmd
        .subcommands
        .iter()
        .map(|sub| {
            let mut entry = escape::escape(&sub.name, escape::CHOICE);
            if let Some(doc) = &sub.doc {
                w!(entry, "\\:{}", escape::escape(doc, escape::CHOICE));
            }
            entry
        })
        .collect::<Vec<_>>();
    format!(":command:(({}))", entries.join(" "))
}

/// `name` as a piece of a zsh function name.
fn function_part(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect()
}

/// Position of the subcommand name in `$line`.
fn command_index(cmd: &ast::Cmd) -> usize {
    let before: usize = cmd.args.iter().filter_map(encode::fixed_slots).sum();
    before + 1
}
