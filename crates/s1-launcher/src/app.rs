use clap::{Arg, ArgAction, Command, value_parser};

use s1_launcher_core::WindowHandle;

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .help("Config file applied after ~/.s1-launcher and ./.s1-launcher (must exist)")
        .value_parser(value_parser!(std::path::PathBuf))
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Output in JSON format")
        .action(ArgAction::SetTrue)
}

fn parse_handle(input: &str) -> Result<WindowHandle, String> {
    WindowHandle::parse(input)
        .ok_or_else(|| format!("'{}' is not a window handle (use 0x1a2b or 6699)", input))
}

pub fn build_cli() -> Command {
    Command::new("s1-launcher")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Start Studio One minimized and dismiss its security prompt")
        .long_about(
            "s1-launcher terminates stale Studio One instances, starts the program minimized, \
             waits for its main window and closes the \"Studio One 安全\" trust prompt if it \
             appears, relaunching the program once when it does.",
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Restore the project and launch Studio One under supervision")
                .arg(config_arg())
                .arg(
                    Arg::new("program")
                        .long("program")
                        .short('p')
                        .help("Path to the Studio One executable (overrides config)")
                        .value_parser(value_parser!(std::path::PathBuf))
                )
                .arg(
                    Arg::new("project-folder")
                        .long("project-folder")
                        .help("Folder holding the project to restore (overrides config)")
                        .value_parser(value_parser!(std::path::PathBuf))
                )
                .arg(
                    Arg::new("auto-save")
                        .long("auto-save")
                        .help("Move the project's autosave over the project file before launch")
                        .action(ArgAction::SetTrue)
                )
                .arg(json_arg())
        )
        .subcommand(
            Command::new("find-window")
                .about("Find a top-level window by title substring, owning PID and class")
                .arg(
                    Arg::new("title")
                        .long("title")
                        .short('t')
                        .help("Substring of the window title (case-sensitive)")
                        .required(true)
                )
                .arg(
                    Arg::new("pid")
                        .long("pid")
                        .help("Process id owning the window")
                        .required(true)
                        .value_parser(value_parser!(u32))
                )
                .arg(
                    Arg::new("class")
                        .long("class")
                        .help("Exact window class name")
                        .required(true)
                )
                .arg(json_arg())
        )
        .subcommand(
            Command::new("close-window")
                .about("Ask a window to close and wait for it to go away")
                .arg(
                    Arg::new("handle")
                        .help("Window handle, hex (0x1a2b) or decimal")
                        .required(true)
                        .index(1)
                        .value_parser(parse_handle)
                )
                .arg(
                    Arg::new("timeout-ms")
                        .long("timeout-ms")
                        .help("How long to wait for the window to disappear")
                        .default_value("5000")
                        .value_parser(value_parser!(u64).range(1..))
                )
                .arg(
                    Arg::new("kill-if-hung")
                        .long("kill-if-hung")
                        .help("Terminate the owner if the window is hung or will not close")
                        .action(ArgAction::SetTrue)
                )
                .arg(json_arg())
        )
        .subcommand(
            Command::new("config")
                .about("Print the resolved configuration")
                .arg(config_arg())
                .arg(json_arg())
        )
}
