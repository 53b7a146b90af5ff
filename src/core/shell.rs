//! Shell wrappers that turn `locstack goto` output into a real `cd`.
//!
//! A child process cannot change its parent's directory, so `goto` prints
//! the target and the wrapper function performs the `cd`. Each wrapper also
//! points `LOCSTACK_SESSION` at a per-shell file, giving every interactive
//! shell its own live stack.

use crate::core::error::LocstackError;
use crate::core::ident;
use clap::ValueEnum;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

const POSIX_TEMPLATE: &str = r#"# locstack shell integration
export LOCSTACK_SESSION="${LOCSTACK_SESSION:-${TMPDIR:-/tmp}/locstack-session-$$.json}"
__CMD__() {
    if [ "$1" = "goto" ] || [ "$1" = "switch" ]; then
        shift
        __locstack_dir="$(command locstack goto "$@")" || return $?
        [ -n "$__locstack_dir" ] && builtin cd -- "$__locstack_dir"
        unset __locstack_dir
    else
        command locstack "$@"
    fi
}
"#;

const FISH_TEMPLATE: &str = r#"# locstack shell integration
if not set -q LOCSTACK_SESSION
    set -gx LOCSTACK_SESSION /tmp/locstack-session-$fish_pid.json
end
function __CMD__
    if test (count $argv) -gt 0; and contains -- $argv[1] goto switch
        set -l dir (command locstack goto $argv[2..-1]); or return $status
        test -n "$dir"; and builtin cd -- $dir
    else
        command locstack $argv
    end
end
"#;

pub fn init_script(shell: Shell, cmd: &str) -> Result<String, LocstackError> {
    if !ident::is_valid_id(cmd) {
        return Err(LocstackError::Usage(format!(
            "'{}' is not a usable function name",
            cmd
        )));
    }
    let template = match shell {
        Shell::Bash | Shell::Zsh => POSIX_TEMPLATE,
        Shell::Fish => FISH_TEMPLATE,
    };
    Ok(template.replace("__CMD__", cmd))
}
