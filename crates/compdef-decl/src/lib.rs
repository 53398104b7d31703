//! Command declarations in the xflags syntax, read into a [`compdef::Cmd`].
//!
//! ```
//! let src = r#"
//!     cmd hello {
//!         /// Whom to greet.
//!         optional -n, --name name: String
//!         repeated -v, --verbose
//!         /// Language of the greeting.
//!         optional --lang lang: String in ["en", "fr"] = "en"
//!         required file: PathBuf
//!     }
//! "#;
//! let cmd = compdef_decl::parse(src).unwrap();
//! assert_eq!(cmd.name, "hello");
//! assert_eq!(cmd.flags.len(), 4);
//! assert!(cmd.flags[1].repeatable);
//! ```
//!
//! On top of the xflags grammar, values may list their choices
//! (`in ["a", "b"]`) and flags a default (`= 92`). `required[N]` declares an
//! argument taking exactly `N` values and `repeated+` one taking at least one.
use std::fmt;

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

mod parse;

use proc_macro2::TokenStream;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub struct Error {
    msg: String,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.msg, f)
    }
}

impl From<compdef::Error> for Error {
    fn from(err: compdef::Error) -> Error {
        Error { msg: err.to_string() }
    }
}

/// Reads one `cmd name { ... }` declaration. A `-h, --help` flag is added to
/// every command.
pub fn parse(src: &str) -> Result<compdef::Cmd> {
    let ts = src.parse::<TokenStream>().map_err(|err| format_err!("invalid tokens: {err}"))?;
    parse::decl(ts)
}

/// Declaration source straight to a completion script.
pub fn generate(src: &str, config: &compdef::Config) -> Result<String> {
    let cmd = parse(src)?;
    Ok(compdef::generate(&cmd, config)?)
}
