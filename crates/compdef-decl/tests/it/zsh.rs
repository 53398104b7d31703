use std::{
    fs,
    io::Write,
    path::Path,
    process::{Command, Stdio},
};

use compdef::Config;

/// Feeds every generated fixture script to `zsh -n`. Needs zsh, so it only
/// runs on request (`cargo xtask` does when zsh is installed).
#[test]
#[ignore]
fn generated_scripts_parse() {
    let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data");
    let mut entries = fs::read_dir(&data).unwrap().map(|it| it.unwrap().path()).collect::<Vec<_>>();
    entries.sort();

    for path in entries {
        let src = fs::read_to_string(&path).unwrap();
        for wrap in [true, false] {
            let script = compdef_decl::generate(&src, &Config::default().wrap(wrap)).unwrap();

            let mut zsh = Command::new("zsh")
                .arg("-n")
                .stdin(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
                .unwrap();
            let mut stdin = zsh.stdin.take().unwrap();
            stdin.write_all(script.as_bytes()).unwrap();
            drop(stdin);
            let out = zsh.wait_with_output().unwrap();
            assert!(
                out.status.success(),
                "{}: {}\n{script}",
                path.display(),
                String::from_utf8_lossy(&out.stderr)
            );
        }
    }
}
