//! Command line parsing, help rendering and command dispatch.

use clap::Parser;

pub mod dispatcher;
pub mod handlers;

/// Builds the color-aware help string at runtime.
fn build_help_string() -> &'static str {
    // Replaces the semantic tags of the template (`<title>`, `<cmd>`, ...)
    // with ANSI styles, or with nothing when colors are off.
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let template = t!("cli.help.template");

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let hl = if use_colors { "\x1b[1;36m" } else { "" }; // Bold Cyan
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let err = if use_colors { "\x1b[91m" } else { "" }; // Bright Red
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<err>", err)
        .replace("</err>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// envp: environment variable profiles for your shell sessions and commands.
///
/// Only the part of the command line before the first `--` is parsed here;
/// everything after it is the command to run and is handed to the
/// dispatcher untouched.
#[derive(Parser, Debug)]
#[command(
    name = "envp",
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// Path of the profile store. Defaults to `~/.config/envp/config.yaml`.
    #[arg(long, value_name = "PATH", env = "ENVP_CONFIG")]
    pub config: Option<String>,

    /// The command name (or profile name) and its arguments.
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Splits a raw command line at the first `--`.
///
/// Returns the part clap should parse and, if a `--` was present, the
/// command that follows it.
pub fn split_command_line(argv: Vec<String>) -> (Vec<String>, Option<Vec<String>>) {
    match argv.iter().position(|arg| arg == "--") {
        Some(dash) => {
            let mut head = argv;
            let command = head.split_off(dash).into_iter().skip(1).collect();
            (head, Some(command))
        }
        None => (argv, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_split_command_line() {
        let (head, command) = split_command_line(argv(&["envp", "p1", "--", "kubectl", "--", "x"]));
        assert_eq!(head, argv(&["envp", "p1"]));
        assert_eq!(command, Some(argv(&["kubectl", "--", "x"])));

        let (head, command) = split_command_line(argv(&["envp", "list"]));
        assert_eq!(head, argv(&["envp", "list"]));
        assert_eq!(command, None);

        let (head, command) = split_command_line(argv(&["envp", "--"]));
        assert_eq!(head, argv(&["envp"]));
        assert_eq!(command, Some(Vec::new()));
    }

    #[test]
    fn test_cli_parses_global_config_flag() {
        let cli = Cli::try_parse_from(argv(&["envp", "--config", "/tmp/envp.yaml", "show", "--export"]))
            .unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/envp.yaml"));
        assert_eq!(cli.args, argv(&["show", "--export"]));
    }
}
