//! Synchronous spawn with inherited stdio.

use crate::domain::{CommandSpec, EnvMapping};
use crate::error::{Error, Result};
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

/// Run `spec` to completion and return the exit code to propagate.
///
/// With `inherit` the child starts from this process's environment (so
/// variables that are not valid UTF-8 survive) and `env` is layered on top;
/// otherwise the child sees exactly `env`. Spawn failures are not retried.
pub fn run_command(spec: &CommandSpec, env: &EnvMapping, inherit: bool) -> Result<i32> {
    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    if !inherit {
        command.env_clear();
    }
    command.envs(env.iter());

    debug!("Spawning {} with {} args", spec.program, spec.args.len());
    let status = command
        .status()
        .map_err(|source| Error::Spawn { program: spec.program.clone(), source })?;
    debug!("Child exited with {status}");

    Ok(exit_code(status))
}

/// Exit code for a finished child. A Unix signal death maps to `128 + signal`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    fn sh(script: &str) -> CommandSpec {
        CommandSpec { program: "sh".to_string(), args: vec!["-c".to_string(), script.to_string()] }
    }

    #[test]
    fn test_exit_code_propagates() {
        let code = run_command(&sh("exit 7"), &EnvMapping::new(), true).expect("run");
        assert_eq!(code, 7);
    }

    #[test]
    fn test_env_reaches_child() {
        let env: EnvMapping = [("WITH_ENV_TEST", "yes")].into_iter().collect();
        let code = run_command(&sh(r#"test "$WITH_ENV_TEST" = yes"#), &env, true).expect("run");
        assert_eq!(code, 0);
    }

    #[test]
    fn test_cleared_env_hides_parent_variables() {
        let env: EnvMapping = [("PATH", "/usr/bin:/bin")].into_iter().collect();
        let code = run_command(&sh(r#"test -z "$HOME""#), &env, false).expect("run");
        assert_eq!(code, 0);
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let spec = CommandSpec { program: "definitely-not-a-real-binary-xyz".to_string(), args: vec![] };
        match run_command(&spec, &EnvMapping::new(), true) {
            Err(err @ Error::Spawn { .. }) => assert_eq!(err.exit_code(), 127),
            other => panic!("expected spawn error, got {other:?}"),
        }
    }

    #[test]
    fn test_signal_exit_code() {
        assert_eq!(exit_code(ExitStatus::from_raw(9)), 137);
        assert_eq!(exit_code(ExitStatus::from_raw(3 << 8)), 3);
    }
}
