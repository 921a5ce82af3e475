//! Running one taskfile shell command through the task's interpreter.

use crate::error::{ExecutionError, Result};
use crate::runner::{interpolate, Command, Context};
use crate::ui::Logger;
use std::process::{Command as StdCommand, Stdio};

/// Echo, then run `cmd` to completion; a non-zero exit is an error
pub fn execute_command(cmd: &Command, ctx: &Context, logger: &dyn Logger) -> Result<()> {
    let exec_str = interpolate(cmd.exec(), &ctx.vars)?;

    if !cmd.is_quiet() {
        let print_str =
            interpolate(cmd.print(), &ctx.vars).unwrap_or_else(|_| cmd.print().to_string());
        logger.log(&ctx.task, &["$", print_str.as_str()]);
    }

    let working_dir = match cmd.dir() {
        Some(dir) => ctx.working_dir.join(interpolate(dir, &ctx.vars)?),
        None => ctx.working_dir.clone(),
    };

    let (program, interpreter_args) = match ctx.interpreter.split_first() {
        Some(split) => split,
        None => {
            return Err(ExecutionError::Spawn {
                program: String::new(),
                error: "empty interpreter".to_string(),
            }
            .into())
        }
    };

    let mut command = StdCommand::new(program);
    command.args(interpreter_args);
    command.arg(&exec_str);
    command.current_dir(&working_dir);

    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    for (key, value) in &ctx.vars {
        command.env(key, value);
    }

    let status = command.status().map_err(|e| ExecutionError::Spawn {
        program: program.clone(),
        error: e.to_string(),
    })?;

    if !status.success() {
        return Err(ExecutionError::CommandFailed {
            task: ctx.task.clone(),
            code: status.code(),
        }
        .into());
    }

    Ok(())
}
