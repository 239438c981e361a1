//! POSIX rlimits for spawned build processes.
//!
//! On Unix the limits are applied in a `pre_exec` hook, i.e. in the child after `fork()` and right
//! before `execve()`, so the command never runs unrestricted.
//! Elsewhere a non-empty request is logged and ignored.
use serde::Deserialize;
use tokio::process::Command;

/// The `limits` option of process builders.
///
/// ```json
/// { "maxOpenFiles": 1024, "maxFileSizeBytes": 10485760, "disableCoreDumps": true }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ProcLimits {
    /// `RLIMIT_NOFILE`.
    pub max_open_files: Option<u64>,

    /// `RLIMIT_FSIZE`. Growing a file past it typically ends the process with `SIGXFSZ`.
    pub max_file_size_bytes: Option<u64>,

    /// Set `RLIMIT_CORE` to zero.
    pub disable_core_dumps: bool,
}

impl ProcLimits {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max_open_files.is_none()
            && !self.disable_core_dumps
            && self.max_file_size_bytes.is_none()
    }
}

/// Install `limits` on `cmd`.
pub fn attach_rlimits(cmd: &mut Command, limits: &ProcLimits) {
    if limits.is_empty() {
        return;
    }

    cfg_if::cfg_if! {
        if #[cfg(unix)] {
            unix_impl::attach_rlimits(cmd, limits);
        } else {
            let _ = cmd;
            tracing::warn!(?limits, "process limits requested on a non-Unix OS; ignored");
        }
    }
}

#[cfg(unix)]
mod unix_impl {
    use std::io;

    use tokio::process::Command;

    use super::ProcLimits;

    pub fn attach_rlimits(cmd: &mut Command, limits: &ProcLimits) {
        let ProcLimits {
            max_open_files,
            max_file_size_bytes,
            disable_core_dumps,
        } = limits.clone();

        // SAFETY: the hook only calls setrlimit(2), which is async-signal-safe.
        unsafe {
            cmd.pre_exec(move || {
                if let Some(nofile) = max_open_files {
                    apply_rlimit(libc::RLIMIT_NOFILE, nofile)?;
                }
                if let Some(fsize) = max_file_size_bytes {
                    apply_rlimit(libc::RLIMIT_FSIZE, fsize)?;
                }
                if disable_core_dumps {
                    apply_rlimit(libc::RLIMIT_CORE, 0)?;
                }
                Ok(())
            });
        }
    }

    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    type Resource = libc::__rlimit_resource_t;
    #[cfg(not(all(target_os = "linux", target_env = "gnu")))]
    type Resource = libc::c_int;

    fn apply_rlimit(resource: Resource, value: u64) -> io::Result<()> {
        let rlim = libc::rlimit {
            rlim_cur: value as libc::rlim_t,
            rlim_max: value as libc::rlim_t,
        };

        let rc = unsafe { libc::setrlimit(resource, &rlim) };
        if rc != 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_empty() {
        let limits = ProcLimits::default();
        assert!(limits.is_empty());

        let mut cmd = Command::new("sh");
        attach_rlimits(&mut cmd, &limits);
    }

    #[test]
    fn reads_camel_case_json() {
        let limits: ProcLimits =
            serde_json::from_str(r#"{"maxOpenFiles": 256, "disableCoreDumps": true}"#).unwrap();
        assert_eq!(limits.max_open_files, Some(256));
        assert_eq!(limits.max_file_size_bytes, None);
        assert!(limits.disable_core_dumps);
        assert!(!limits.is_empty());
    }

    #[test]
    fn unknown_limit_is_rejected() {
        let res = serde_json::from_str::<ProcLimits>(r#"{"maxThreads": 4}"#);
        assert!(res.is_err());
    }
}
