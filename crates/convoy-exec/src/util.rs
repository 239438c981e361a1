use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use tokio::process::{Child, Command};
use tracing::debug;

/// How long a child gets between SIGTERM and SIGKILL.
const KILL_GRACE: Duration = Duration::from_secs(2);

pub fn cmd_program(program: &str, args: &[String]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args.iter().map(|s| s.as_str()));
    cmd
}

/// Working directory for a task: relative `cwd` is taken from the project root.
pub fn resolve_cwd(cwd: Option<&Path>, root: Option<&Path>) -> Option<PathBuf> {
    match (cwd, root) {
        (Some(cwd), Some(root)) if cwd.is_relative() => Some(root.join(cwd)),
        (Some(cwd), _) => Some(cwd.to_path_buf()),
        (None, root) => root.map(Path::to_path_buf),
    }
}

#[cfg(unix)]
pub async fn kill_graceful(child: &mut Child) -> std::io::Result<()> {
    if let Some(id) = child.id() {
        // SAFETY: kill(2) has no memory-safety preconditions.
        let rc = unsafe { libc::kill(id as libc::pid_t, libc::SIGTERM) };
        if rc == 0 {
            if let Ok(status) = tokio::time::timeout(KILL_GRACE, child.wait()).await {
                debug!(status = ?status.ok(), "child exited after SIGTERM");
                return Ok(());
            }
        }
    }
    child.kill().await
}

#[cfg(not(unix))]
pub async fn kill_graceful(child: &mut Child) -> std::io::Result<()> {
    debug!(grace = ?KILL_GRACE, "no SIGTERM on this platform; killing child");
    child.kill().await
}
