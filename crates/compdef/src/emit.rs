use std::fmt::Write;

use crate::{compile::Compiled, reindent, Result};

const FUNCTION: &str = "{name}() {\n\t{body}\n}";

/// Lays out compiled units as a `#compdef` file.
pub fn assemble(compiled: &Compiled) -> Result<String> {
    let mut buf = String::new();
    let root = &compiled.root;

    if compiled.children.is_empty() {
        w!(buf, "#compdef {}\n", compiled.program());
        w!(buf, "{}\n", root.body);
        return Ok(buf);
    }

    w!(buf, "#compdef {} {}\n", root.name, compiled.program());
    for unit in compiled.units() {
        blank_line(&mut buf);
        let function = reindent::render(
            FUNCTION,
            &[("name", unit.name.as_str()), ("body", unit.body.as_str())],
        )?;
        w!(buf, "{function}\n");
    }
    blank_line(&mut buf);
    w!(buf, "{} \"$@\"\n", root.name);
    Ok(buf)
}

fn blank_line(buf: &mut String) {
    w!(buf, "\n");
}
