//! completion command - Output shell completion scripts

use crate::cli::args::{Cli, Shell};
use crate::engine::Context;
use anyhow::{Context as _, Result};
use clap::CommandFactory;
use clap_complete::{generate, shells};

/// Stands for the invocation name in the embedded templates.
pub const PLACEHOLDER: &str = "__GITGUM_CMD__";

const BASH_TEMPLATE: &str = include_str!("../../../completions/gitgum.bash");
const FISH_TEMPLATE: &str = include_str!("../../../completions/gitgum.fish");
const ZSH_TEMPLATE: &str = include_str!("../../../completions/gitgum.zsh");

/// The completion script for `shell`, completing `program`.
///
/// bash, fish and zsh come from the hand-written templates; PowerShell is
/// generated from the argument model.
pub fn completion_script(shell: Shell, program: &str) -> Result<String> {
    let template = match shell {
        Shell::Bash => BASH_TEMPLATE,
        Shell::Fish => FISH_TEMPLATE,
        Shell::Zsh => ZSH_TEMPLATE,
        Shell::PowerShell => {
            let mut cmd = Cli::command();
            let mut buf = Vec::new();
            generate(shells::PowerShell, &mut cmd, program, &mut buf);
            return String::from_utf8(buf).context("generated completion is not UTF-8");
        }
    };
    Ok(template.replace(PLACEHOLDER, program))
}

/// Print the completion script for `shell`.
pub fn completion(ctx: &Context, shell: Shell) -> Result<()> {
    let program = if ctx.program.is_empty() {
        "gitgum"
    } else {
        ctx.program.as_str()
    };
    print!("{}", completion_script(shell, program)?);
    Ok(())
}
