use std::mem;

use compdef::{Arg, Arity, Cmd, Flag, Ty, Val};
use proc_macro2::{Delimiter, TokenStream, TokenTree};

use crate::Result;

pub(crate) fn decl(ts: TokenStream) -> Result<Cmd> {
    let p = &mut Parser::new(ts);
    let _doc = opt_doc(p)?;
    let mut cmd = cmd(p)?;
    if !p.end() {
        bail!("unexpected tokens after `{}`", cmd.name)
    }
    add_help(&mut cmd);
    Ok(cmd)
}

/// Every command level accepts `-h, --help`.
fn add_help(cmd: &mut Cmd) {
    let help = Flag::new("-h").alias("--help").help("Prints help information.");
    cmd.flags.push(help);
    for sub in &mut cmd.subcommands {
        add_help(&mut sub.cmd);
    }
}

/// Arity keywords as written; what they mean depends on flag vs argument.
#[derive(Debug, Clone, Copy)]
enum Kw {
    Optional,
    Required,
    Counted(usize),
    Repeated,
    RepeatedNonEmpty,
}

fn cmd(p: &mut Parser) -> Result<Cmd> {
    p.expect_keyword("cmd")?;
    let name = cmd_name(p)?;
    let mut res = Cmd::new(name);

    p.enter_delim(Delimiter::Brace)?;
    while !p.end() {
        let doc = opt_doc(p)?;
        if p.at_keyword("cmd") {
            let sub = cmd(p)?;
            res = res.subcommand(doc.as_deref(), sub);
            continue;
        }
        let kw = arity(p)?;
        let is_val = p.lookahead_punct(':', 1);
        let name = p.expect_name()?;
        if name.starts_with('-') {
            let mut flag = flag(p, name)?;
            flag.help = doc;
            flag.repeatable = match kw {
                Kw::Optional | Kw::Required => false,
                Kw::Repeated | Kw::RepeatedNonEmpty => true,
                Kw::Counted(_) => bail!("counted arity is only allowed for arguments"),
            };
            res.flags.push(flag);
        } else if is_val {
            p.expect_punct(':')?;
            let ty = ty(p, &name)?;
            let arity = match kw {
                Kw::Optional => Arity::ZeroOrOne,
                Kw::Required => Arity::ExactlyOne,
                Kw::Counted(n) => Arity::FixedCount(n),
                Kw::Repeated => Arity::ZeroOrMore,
                Kw::RepeatedNonEmpty => Arity::OneOrMore,
            };
            let mut arg = Arg::new(name, arity).ty(ty).choices(opt_choices(p)?);
            arg.help = doc;
            res.args.push(arg);
        } else {
            bail!("expected `--flag` or `arg: Type`")
        }
    }
    p.exit_delim()?;
    Ok(res)
}

fn flag(p: &mut Parser, name: String) -> Result<Flag> {
    let mut res = Flag::new(name);
    while p.eat_punct(',') {
        res = res.alias(flag_name(p)?);
    }
    if res.aliases().iter().any(|it| it == "--help" || it == "-h") {
        bail!("`-h, --help` flag is generated automatically")
    }
    res.val = opt_val(p)?;
    Ok(res)
}

fn opt_val(p: &mut Parser) -> Result<Option<Val>> {
    if !p.lookahead_punct(':', 1) {
        return Ok(None);
    }

    let name = p.expect_name()?;
    p.expect_punct(':')?;
    let ty = ty(p, &name)?;
    let mut res = Val::new(ty).metavar(name).choices(opt_choices(p)?);
    if p.eat_punct('=') {
        res.default = Some(default_value(p)?);
    }
    Ok(Some(res))
}

fn arity(p: &mut Parser) -> Result<Kw> {
    if p.eat_keyword("optional") {
        return Ok(Kw::Optional);
    }
    if p.eat_keyword("required") {
        if p.at_delim(Delimiter::Bracket) {
            p.enter_delim(Delimiter::Bracket)?;
            let n = p.expect_int()?;
            p.exit_delim()?;
            return Ok(Kw::Counted(n));
        }
        return Ok(Kw::Required);
    }
    if p.eat_keyword("repeated") {
        if p.eat_punct('+') {
            return Ok(Kw::RepeatedNonEmpty);
        }
        return Ok(Kw::Repeated);
    }
    if let Some(name) = p.eat_name() {
        bail!("expected one of `optional`, `required`, `repeated`, got `{name}`")
    }
    bail!("expected one of `optional`, `required`, `repeated`, got {:?}", p.ts.pop())
}

/// Rust type names map onto completion kinds; `_name` is a zsh completion
/// function.
fn ty(p: &mut Parser, val: &str) -> Result<Ty> {
    let name = p.expect_name()?;
    let res = match name.as_str() {
        "PathBuf" if val.contains("dir") => Ty::DirPath,
        "PathBuf" => Ty::FilePath,
        "u8" | "u16" | "u32" | "u64" | "u128" | "usize" | "i8" | "i16" | "i32" | "i64"
        | "i128" | "isize" => Ty::Integer,
        "f32" | "f64" => Ty::Float,
        _ if name.starts_with('_') => Ty::Custom(name),
        _ => Ty::Text,
    };
    Ok(res)
}

/// `in ["a", "b"]`
fn opt_choices(p: &mut Parser) -> Result<Vec<String>> {
    let mut res = Vec::new();
    if !p.eat_keyword("in") {
        return Ok(res);
    }
    p.enter_delim(Delimiter::Bracket)?;
    while !p.end() {
        res.push(p.expect_string()?);
        if !p.eat_punct(',') {
            break;
        }
    }
    p.exit_delim()?;
    if res.is_empty() {
        bail!("expected at least one choice")
    }
    Ok(res)
}

fn default_value(p: &mut Parser) -> Result<String> {
    let neg = p.eat_punct('-');
    let res = match p.ts.pop() {
        Some(TokenTree::Literal(lit)) => {
            let text = lit.to_string();
            if text.starts_with('"') || text.starts_with('r') {
                str_lit_value(&text)
            } else {
                text
            }
        }
        Some(TokenTree::Ident(ident)) => ident.to_string(),
        _ => bail!("expected a default value"),
    };
    Ok(if neg { format!("-{res}") } else { res })
}

fn opt_single_doc(p: &mut Parser) -> Result<Option<String>> {
    if !p.eat_punct('#') {
        return Ok(None);
    }
    p.enter_delim(Delimiter::Bracket)?;
    p.expect_keyword("doc")?;
    p.expect_punct('=')?;
    let res = p.expect_string()?;
    p.exit_delim()?;
    Ok(Some(res.trim().to_string()))
}

/// Doc comment lines, joined into one line of help.
fn opt_doc(p: &mut Parser) -> Result<Option<String>> {
    let lines =
        core::iter::from_fn(|| opt_single_doc(p).transpose()).collect::<Result<Vec<String>>>()?;
    let lines = lines.into_iter().filter(|it| !it.is_empty()).collect::<Vec<_>>().join(" ");

    if lines.is_empty() {
        Ok(None)
    } else {
        Ok(Some(lines))
    }
}

fn cmd_name(p: &mut Parser) -> Result<String> {
    let name = p.expect_name()?;
    if name.starts_with('-') {
        bail!("command name can't begin with `-`: `{name}`");
    }
    Ok(name)
}

fn flag_name(p: &mut Parser) -> Result<String> {
    let name = p.expect_name()?;
    if !name.starts_with('-') {
        bail!("flag name should begin with `-`: `{name}`");
    }
    Ok(name)
}

struct Parser {
    stack: Vec<Vec<TokenTree>>,
    ts: Vec<TokenTree>,
}

impl Parser {
    fn new(ts: TokenStream) -> Self {
        let mut ts = ts.into_iter().collect::<Vec<_>>();
        ts.reverse();
        Self { stack: Vec::new(), ts }
    }

    fn at_delim(&self, delimiter: Delimiter) -> bool {
        matches!(self.ts.last(), Some(TokenTree::Group(g)) if g.delimiter() == delimiter)
    }
    fn enter_delim(&mut self, delimiter: Delimiter) -> Result<()> {
        match self.ts.pop() {
            Some(TokenTree::Group(g)) if g.delimiter() == delimiter => {
                let mut ts = g.stream().into_iter().collect::<Vec<_>>();
                ts.reverse();
                let ts = mem::replace(&mut self.ts, ts);
                self.stack.push(ts);
            }
            _ => bail!("expected `{}`", open(delimiter)),
        }
        Ok(())
    }
    fn exit_delim(&mut self) -> Result<()> {
        if !self.end() {
            let next = self.ts.last().map(|it| it.to_string()).unwrap_or_default();
            bail!("unexpected `{next}`")
        }
        match self.stack.pop() {
            Some(ts) => self.ts = ts,
            None => bail!("unbalanced delimiters"),
        }
        Ok(())
    }
    fn end(&mut self) -> bool {
        self.ts.last().is_none()
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<()> {
        if !self.eat_keyword(kw) {
            bail!("expected `{kw}`")
        }
        Ok(())
    }
    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.ts.pop();
            true
        } else {
            false
        }
    }
    fn at_keyword(&mut self, kw: &str) -> bool {
        match self.ts.last() {
            Some(TokenTree::Ident(ident)) => ident.to_string() == kw,
            _ => false,
        }
    }

    fn expect_name(&mut self) -> Result<String> {
        self.eat_name().ok_or_else(|| {
            let next = self.ts.pop().map(|it| it.to_string()).unwrap_or_default();
            format_err!("expected a name, got: `{next}`")
        })
    }
    fn eat_name(&mut self) -> Option<String> {
        let mut buf = String::new();
        let mut prev_ident = false;
        loop {
            match self.ts.last() {
                Some(TokenTree::Punct(p)) if p.as_char() == '-' => {
                    prev_ident = false;
                    buf.push('-');
                }
                Some(TokenTree::Ident(ident)) if !prev_ident => {
                    prev_ident = true;
                    buf.push_str(&ident.to_string());
                }
                _ => break,
            }
            self.ts.pop();
        }
        if buf.is_empty() {
            None
        } else {
            Some(buf)
        }
    }

    fn expect_punct(&mut self, punct: char) -> Result<()> {
        if !self.eat_punct(punct) {
            bail!("expected `{punct}`")
        }
        Ok(())
    }
    fn eat_punct(&mut self, punct: char) -> bool {
        match self.ts.last() {
            Some(TokenTree::Punct(p)) if p.as_char() == punct => {
                self.ts.pop();
                true
            }
            _ => false,
        }
    }
    fn lookahead_punct(&mut self, punct: char, n: usize) -> bool {
        match self.ts.iter().rev().nth(n) {
            Some(TokenTree::Punct(p)) => p.as_char() == punct,
            _ => false,
        }
    }

    fn expect_string(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Literal(lit)) => {
                let text = lit.to_string();
                if !(text.starts_with('"') || text.starts_with("r\"") || text.starts_with("r#")) {
                    bail!("expected a string, got `{text}`")
                }
                Ok(str_lit_value(&text))
            }
            _ => bail!("expected a string"),
        }
    }

    fn expect_int(&mut self) -> Result<usize> {
        match self.ts.pop() {
            Some(TokenTree::Literal(lit)) => {
                let text = lit.to_string();
                text.parse::<usize>().map_err(|_| format_err!("expected a count, got `{text}`"))
            }
            _ => bail!("expected a count"),
        }
    }
}

fn open(delimiter: Delimiter) -> &'static str {
    match delimiter {
        Delimiter::Parenthesis => "(",
        Delimiter::Brace => "{",
        Delimiter::Bracket => "[",
        Delimiter::None => "group",
    }
}

/// The value of a string literal token, raw or not.
fn str_lit_value(lit: &str) -> String {
    if let Some(raw) = lit.strip_prefix('r') {
        let hashes = raw.len() - raw.trim_start_matches('#').len();
        let body = &raw[hashes..raw.len() - hashes];
        let body = body.strip_prefix('"').and_then(|it| it.strip_suffix('"')).unwrap_or(body);
        return body.to_string();
    }
    let body = lit.strip_prefix('"').and_then(|it| it.strip_suffix('"')).unwrap_or(lit);
    let mut res = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            res.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => res.push('\n'),
            Some('t') => res.push('\t'),
            Some('r') => res.push('\r'),
            Some('0') => res.push('\0'),
            Some('x') => {
                let hex = chars.by_ref().take(2).collect::<String>();
                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) if byte.is_ascii() => res.push(char::from(byte)),
                    _ => res.push_str(&format!("\\x{hex}")),
                }
            }
            Some('u') => {
                let mut esc = String::new();
                for c in chars.by_ref() {
                    esc.push(c);
                    if c == '}' {
                        break;
                    }
                }
                let code = esc.trim_start_matches('{').trim_end_matches('}').replace('_', "");
                match u32::from_str_radix(&code, 16).ok().and_then(char::from_u32) {
                    Some(c) => res.push(c),
                    None => res.push_str(&format!("\\u{esc}")),
                }
            }
            // Line continuation.
            Some('\n') => {
                while chars.next_if(|it| it.is_whitespace()).is_some() {}
            }
            Some(other) => res.push(other),
            None => res.push('\\'),
        }
    }
    res
}
