//! Command line front end: flag parsing, taskfile loading and dispatch

use crate::config::{load_env_file, discover_config, parse_config_file, Config, TaskEntry};
use crate::error::Result;
use crate::runner::{register_config, Engine, Params};
use crate::ui::{ConsoleLogger, Logger, Verbosity};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Task run when no `--task` is given
pub const DEFAULT_TASK: &str = "default";

/// CLI application
pub struct App {
    /// Parsed taskfile
    config: Config,
    /// Taskfile path
    config_path: PathBuf,
}

impl App {
    /// Create a new app by discovering the taskfile
    pub fn new() -> Result<Self> {
        let (config, config_path) = discover_config()?;
        Ok(App {
            config,
            config_path,
        })
    }

    /// Create app with a specific taskfile
    pub fn with_config_file(path: PathBuf) -> Result<Self> {
        let config = parse_config_file(&path)?;
        Ok(App {
            config,
            config_path: path,
        })
    }

    /// Directory the taskfile lives in
    pub fn base_dir(&self) -> PathBuf {
        self.config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    }

    /// Build an engine with every taskfile task registered
    pub fn engine(&self, logger: Rc<dyn Logger>) -> Result<Engine> {
        let mut engine = Engine::new().with_logger(logger);
        register_config(&mut engine, &self.config, &self.base_dir())?;
        Ok(engine)
    }

    /// Run the application with parsed command line arguments
    pub fn run(self, matches: &ArgMatches) -> Result<()> {
        let verbosity = get_verbosity(matches);

        load_env_file(&self.base_dir())?;

        let mut engine = self.engine(Rc::new(ConsoleLogger::new(verbosity)))?;

        if matches.get_flag("list") {
            for line in task_listing(&self.config) {
                println!("{}", line);
            }
            return Ok(());
        }

        let params = parse_params(matches.get_many::<String>("param").into_iter().flatten())?;
        let tasks = parse_task_list(matches.get_one::<String>("task").map(String::as_str));

        for id in &tasks {
            engine.run(id, &params, false)?;
        }

        let done = engine.done_ids().join(", ");
        engine.logger().debug("ontask", &["Completed:", done.as_str()]);

        Ok(())
    }
}

/// Build the clap command
pub fn build_command() -> Command {
    Command::new("ontask")
        .version(crate::VERSION)
        .about("A minimal task orchestration engine for build scripts")
        .arg(
            Arg::new("task")
                .short('t')
                .long("task")
                .visible_alias("tasks")
                .value_name("TASKS")
                .help("Run task(s), separated by commas [default: default]"),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Path to ontask.yml taskfile"),
        )
        .arg(
            Arg::new("param")
                .short('p')
                .long("param")
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Parameter passed to the top-level tasks"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .short_alias('s')
                .aliases(["silent"])
                .help("Silent mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('d')
                .long("debug")
                .short_aliases(['g', 'v'])
                .aliases(["verbose"])
                .help("Verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List the tasks in the taskfile")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .value_parser(value_parser!(Shell))
                .help("Print a shell completion script"),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Split a `--task` value into ids, falling back to the default task
pub fn parse_task_list(raw: Option<&str>) -> Vec<String> {
    let tasks: Vec<String> = raw
        .unwrap_or(DEFAULT_TASK)
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    if tasks.is_empty() {
        vec![DEFAULT_TASK.to_string()]
    } else {
        tasks
    }
}

/// Collect `KEY=VALUE` pairs
pub fn parse_params<'a, I>(raw: I) -> Result<Params>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut params = Params::new();
    for assignment in raw {
        let (key, value) = Params::parse_assignment(assignment)?;
        params.insert(key, value);
    }
    Ok(params)
}

/// A `name: usage` header when the taskfile has a name, then one line per
/// public task with aliases shown by their target
pub fn task_listing(config: &Config) -> Vec<String> {
    let width = config.tasks.keys().map(String::len).max().unwrap_or(0);

    let header = config.name.as_ref().map(|name| match &config.usage {
        Some(usage) => format!("{}: {}", name, usage),
        None => name.clone(),
    });

    let tasks = config
        .tasks
        .iter()
        .filter_map(|(name, entry)| match entry {
            TaskEntry::Alias(target) => Some(format!("{:width$}  -> {}", name, target)),
            TaskEntry::Body(task) if task.private => None,
            TaskEntry::Body(task) => Some(
                format!("{:width$}  {}", name, task.usage.as_deref().unwrap_or(""))
                    .trim_end()
                    .to_string(),
            ),
        });

    header.into_iter().chain(tasks).collect()
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<()> {
    run_from(std::env::args_os())
}

/// Run the CLI application with provided arguments
pub fn run_from<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut command = build_command();
    let matches = command.clone().get_matches_from(args);

    if let Some(shell) = matches.get_one::<Shell>("completions") {
        clap_complete::generate(*shell, &mut command, "ontask", &mut io::stdout());
        return Ok(());
    }

    let app = match matches.get_one::<PathBuf>("file") {
        Some(path) => App::with_config_file(path.clone())?,
        None => App::new()?,
    };

    app.run(&matches)
}
