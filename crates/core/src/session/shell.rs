//! Shell integration: rendering a [`Session`] as a script and generating the
//! wrapper function that evaluates it.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use super::Session;

/// Shells git-id can integrate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl Shell {
    /// Script that makes the caller's environment match `session`: set
    /// variables are exported, the rest are unset.
    pub fn render(self, session: &Session) -> String {
        let mut script = String::new();
        for (var, value) in session.entries() {
            let name = var.env_name();
            // Writing to a String cannot fail.
            let _ = match (self, value) {
                (Shell::Fish, Some(value)) => {
                    writeln!(script, "set -gx {} {};", name, fish_quote(value))
                }
                (Shell::Fish, None) => writeln!(script, "set -e {};", name),
                (_, Some(value)) => writeln!(script, "export {}={};", name, posix_quote(value)),
                (_, None) => writeln!(script, "unset {};", name),
            };
        }
        script
    }

    /// Wrapper function for the user's shell rc file.
    ///
    /// `use` and `reset` are routed through `git-id hook`, whose stdout is
    /// evaluated in the shell itself; every other verb runs `exe` directly.
    pub fn init_script(self, exe: &str) -> String {
        match self {
            Shell::Bash | Shell::Zsh => {
                let exe = posix_quote(exe);
                let shell = self;
                format!(
                    r#"git-id() {{
    case "$1" in
        use|reset)
            local __git_id_script __git_id_status
            __git_id_script="$(command {exe} hook --shell {shell} "$@")"
            __git_id_status=$?
            eval "$__git_id_script"
            return $__git_id_status
            ;;
        *)
            command {exe} "$@"
            ;;
    esac
}}
"#
                )
            }
            Shell::Fish => {
                let exe = fish_quote(exe);
                format!(
                    r#"function git-id
    switch "$argv[1]"
        case use reset
            set -l __git_id_script (command {exe} hook --shell fish $argv)
            set -l __git_id_status $status
            eval (string join \n -- $__git_id_script)
            return $__git_id_status
        case '*'
            command {exe} $argv
    end
end
"#
                )
            }
        }
    }
}

impl FromStr for Shell {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bash" => Ok(Shell::Bash),
            "zsh" => Ok(Shell::Zsh),
            "fish" => Ok(Shell::Fish),
            other => Err(format!("unsupported shell '{}': use bash, zsh or fish", other)),
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shell::Bash => f.write_str("bash"),
            Shell::Zsh => f.write_str("zsh"),
            Shell::Fish => f.write_str("fish"),
        }
    }
}

/// Single-quote `value` for POSIX shells.
fn posix_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Single-quote `value` for fish, where `\` and `'` are escapable inside
/// single quotes.
fn fish_quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', r"\\").replace('\'', r"\'"))
}
