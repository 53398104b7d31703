//! Encodes flags and positional arguments as `_arguments` specs.
//!
//! A flag with a value looks like `(-f --foo)--foo=[help]:FOO:generator`,
//! a positional like `:display:generator`.

use std::fmt::Write;

use crate::{
    ast::{self, Arity, Ty},
    escape::{self, escape, quote},
    Result,
};

/// One spec per alias, in alias order.
pub(crate) fn flag(flag: &ast::Flag) -> Vec<String> {
    let aliases = flag.aliases();
    let suffix = flag.val.as_ref().map(|val| {
        let display = escape(&flag.display_name(), escape::DISPLAY);
        let hint = flag.display_name().to_lowercase();
        let generator = generator(&val.ty, &val.choices, val.default.as_deref(), &hint);
        format!("{display}:{generator}")
    });

    let group = if !flag.repeatable && aliases.len() > 1 {
        let all = aliases.iter().map(|it| escape(it, escape::ALIAS)).collect::<Vec<_>>();
        Some(format!("({})", all.join(" ")))
    } else {
        None
    };

    let mut res = Vec::with_capacity(aliases.len());
    for alias in aliases {
        let mut buf = String::new();
        if flag.repeatable {
            buf.push('*');
        } else if let Some(group) = &group {
            buf.push_str(group);
        }
        buf.push_str(&escape(alias, escape::ALIAS));
        if flag.takes_value() {
            buf.push(if ast::is_long(alias) { '=' } else { '+' });
        }
        if let Some(help) = &flag.help {
            w!(buf, "[{}]", escape(help, escape::HELP));
        }
        if let Some(suffix) = &suffix {
            w!(buf, ":{suffix}");
        }
        tracing::trace!(spec = %buf, "encoded flag");
        res.push(buf);
    }
    res
}

/// Specs for the slots a positional argument occupies.
pub(crate) fn arg(arg: &ast::Arg) -> Result<Vec<String>> {
    let display = escape(arg.help.as_deref().unwrap_or(&arg.name), escape::DISPLAY);
    let generator = generator(&arg.ty, &arg.choices, None, &arg.name.to_lowercase());
    let field = format!(":{display}:{generator}");

    let res = match arg.arity {
        Arity::ExactlyOne => vec![field],
        Arity::ZeroOrOne => vec![format!(":{field}")],
        Arity::ZeroOrMore => vec![format!("*{field}")],
        Arity::OneOrMore => vec![field.clone(), format!("*{field}")],
        Arity::FixedCount(0) => {
            bail!("unsupported arity for `{}`: {}", arg.name, arg.arity)
        }
        Arity::FixedCount(n) => vec![field; n],
    };
    tracing::trace!(arg = %arg.name, slots = res.len(), "encoded positional");
    Ok(res)
}

/// Number of `line` entries an argument fills before a subcommand name, if
/// that number is fixed.
pub(crate) fn fixed_slots(arg: &ast::Arg) -> Option<usize> {
    match arg.arity {
        Arity::ExactlyOne | Arity::ZeroOrOne => Some(1),
        Arity::FixedCount(n) => Some(n),
        Arity::ZeroOrMore | Arity::OneOrMore => None,
    }
}

/// The action part of a spec. `hint` is the lowercased value name, consulted
/// only for untyped values.
fn generator(ty: &Ty, choices: &[String], default: Option<&str>, hint: &str) -> String {
    if !choices.is_empty() {
        let choices = choices.iter().map(|it| escape(it, escape::CHOICE)).collect::<Vec<_>>();
        return format!("({})", choices.join(" "));
    }
    match ty {
        Ty::Integer | Ty::Float => {
            let mut buf = "_numbers".to_string();
            if let Some(default) = default {
                w!(buf, " -d {}", quote(&default.replace(['\n', '\r'], " ")));
            }
            if *ty == Ty::Float {
                buf.push_str(" -f");
            }
            buf
        }
        Ty::FilePath => "_files".to_string(),
        Ty::DirPath => "_files -/".to_string(),
        Ty::Custom(name) => name.clone(),
        Ty::Text if hint.contains("file") => "_files".to_string(),
        Ty::Text if hint.contains("dir") => "_files -/".to_string(),
        Ty::Text => String::new(),
    }
}
