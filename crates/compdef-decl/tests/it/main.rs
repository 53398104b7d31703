mod zsh;

use compdef::Config;
use expect_test::{expect, Expect};

fn check(src: &str, config: Config, expect: Expect) {
    let actual = match compdef_decl::generate(src, &config) {
        Ok(script) => script,
        Err(err) => err.to_string(),
    };
    expect.assert_eq(&actual);
}

fn flat() -> Config {
    Config::default().wrap(false)
}

#[test]
fn smoke() {
    check(
        include_str!("../data/smoke.decl"),
        Config::default(),
        expect![[r#"
            #compdef rust-analyzer
            _arguments -s -S \
            	'--log-file=[Path to log file. By default, logs go to stderr.]:path:_files' \
            	'*-v' \
            	'*--verbose' \
            	'(-n --number)-n+:n:_numbers -d 92' \
            	'(-n --number)--number=:n:_numbers -d 92' \
            	'*--data=:value:' \
            	--emoji \
            	'(-h --help)-h[Prints help information.]' \
            	'(-h --help)--help[Prints help information.]' \
            	':Path to the workspace.:_files' \
            	'::Number of concurrent jobs.:_numbers'
        "#]],
    );
}

#[test]
fn subcommands() {
    check(
        include_str!("../data/subcommands.decl"),
        Config::default(),
        expect![[r#"
            #compdef _rust-analyzer rust-analyzer

            _rust-analyzer__server__launch() {
            	_arguments -s -S \
            		--log \
            		'(-h --help)-h[Prints help information.]' \
            		'(-h --help)--help[Prints help information.]'
            }

            _rust-analyzer__server__watch() {
            	_arguments -s -S \
            		'(-h --help)-h[Prints help information.]' \
            		'(-h --help)--help[Prints help information.]'
            }

            _rust-analyzer__server() {
            	local context state state_descr line
            	typeset -A opt_args
            	_arguments -s -S -C \
            		'--dir=:dir:_files -/' \
            		'(-h --help)-h[Prints help information.]' \
            		'(-h --help)--help[Prints help information.]' \
            		':command:((launch\:Launch\ in\ the\ foreground. watch))' \
            		'*::arg:->dispatch'
            	case $state in
            		dispatch)
            			case $line[1] in
            				launch) _rust-analyzer__server__launch ;;
            				watch) _rust-analyzer__server__watch ;;
            			esac
            			;;
            	esac
            }

            _rust-analyzer__analysis-stats() {
            	_arguments -s -S \
            		--parallel \
            		'(-h --help)-h[Prints help information.]' \
            		'(-h --help)--help[Prints help information.]' \
            		:path:_files
            }

            _rust-analyzer() {
            	local context state state_descr line
            	typeset -A opt_args
            	_arguments -s -S -C \
            		'*-v' \
            		'*--verbose' \
            		'(-h --help)-h[Prints help information.]' \
            		'(-h --help)--help[Prints help information.]' \
            		':command:((server\:Start\ the\ language\ server. analysis-stats\:Batch\ typecheck\ a\ project.))' \
            		'*::arg:->dispatch'
            	case $state in
            		dispatch)
            			case $line[1] in
            				server) _rust-analyzer__server ;;
            				analysis-stats) _rust-analyzer__analysis-stats ;;
            			esac
            			;;
            	esac
            }

            _rust-analyzer "$@"
        "#]],
    );
}

#[test]
fn values() {
    check(
        include_str!("../data/values.decl"),
        flat(),
        expect![[r#"
            #compdef plot
            _arguments -s -S '(-f --format)-f+[Output format.]:fmt:(png svg pdf\ \(vector\))' '(-f --format)--format=[Output format.]:fmt:(png svg pdf\ \(vector\))' '--scale=:factor:_numbers -d 1.5 -f' '--offset=:n:_numbers -d -3' --host=:host:_hosts '--out=:dir:_files -/' '(-h --help)-h[Prints help information.]' '(-h --help)--help[Prints help information.]' ':point:_numbers -f' ':point:_numbers -f' :series:_files '*:series:_files'
        "#]],
    );
}

#[test]
fn escaping() {
    check(
        r#"
        cmd esc {
            /// Pattern like [a-z]: "quoted" \ done.
            optional --pattern re: String in ["a b", "c:d", "e\\f"]
        }
        "#,
        flat(),
        expect![[r#"
            #compdef esc
            _arguments -s -S '--pattern=[Pattern like \[a-z\]\: "quoted" \\ done.]:re:(a\ b c\:d e\\f)' '(-h --help)-h[Prints help information.]' '(-h --help)--help[Prints help information.]'
        "#]],
    );
}

#[test]
fn single_quotes_in_help() {
    check(
        r#"
        cmd q {
            /// Don't panic.
            optional --calm
        }
        "#,
        flat(),
        expect![[r#"
            #compdef q
            _arguments -s -S '--calm[Don'"'"'t panic.]' '(-h --help)-h[Prints help information.]' '(-h --help)--help[Prints help information.]'
        "#]],
    );
}

#[test]
fn string_literal_choices() {
    check(
        r##"
        cmd pick {
            optional --mode m: String in [r#"say "hi""#, "\u{41}"]
        }
        "##,
        flat(),
        expect![[r#"
            #compdef pick
            _arguments -s -S '--mode=:m:(say\ "hi" A)' '(-h --help)-h[Prints help information.]' '(-h --help)--help[Prints help information.]'
        "#]],
    );
}

#[test]
fn multi_line_docs_become_one_line() {
    let cmd = compdef_decl::parse(
        r#"
        cmd doc {
            /// First line,
            /// second line.
            optional --flag
        }
        "#,
    )
    .unwrap();
    assert_eq!(cmd.flags[0].help.as_deref(), Some("First line, second line."));
}

#[test]
fn trigger_flag_on_declared_command() {
    let cmd = compdef_decl::parse("cmd tool { optional --zsh-completion }").unwrap();
    let completion = compdef::augment(cmd, flat());
    let mut out = Vec::new();
    assert!(completion.intercept(["--zsh-completion"], &mut out).unwrap());
    expect![[r#"
        #compdef tool
        _arguments -s -S --zsh-completion '(-h --help)-h[Prints help information.]' '(-h --help)--help[Prints help information.]'
    "#]]
    .assert_eq(&String::from_utf8(out).unwrap());
}

#[test]
fn errors() {
    check(
        "cmd x { optional --help }",
        flat(),
        expect![[r#"`-h, --help` flag is generated automatically"#]],
    );
    check(
        "cmd x { cmd y { optional -h } }",
        flat(),
        expect![[r#"`-h, --help` flag is generated automatically"#]],
    );
    check(
        "cmd x { required[0] none: String }",
        flat(),
        expect![[r#"unsupported arity for `none`: exactly 0 values"#]],
    );
    check(
        "cmd x { maybe foo: String }",
        flat(),
        expect![[r#"expected one of `optional`, `required`, `repeated`, got `maybe`"#]],
    );
    check("cmd x { optional foo }", flat(), expect![[r#"expected `--flag` or `arg: Type`"#]]);
    check(
        "cmd x { required[2] --foo }",
        flat(),
        expect![[r#"counted arity is only allowed for arguments"#]],
    );
    check(
        "cmd x { optional --c c: String in [] }",
        flat(),
        expect![[r#"expected at least one choice"#]],
    );
    check("cmd x { } cmd y { }", flat(), expect![[r#"unexpected tokens after `x`"#]]);
    check("cmd -x { }", flat(), expect![[r#"command name can't begin with `-`: `-x`"#]]);
}
