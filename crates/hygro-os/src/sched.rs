//! Best-effort real-time scheduling for the sampling window.
//!
//! The busy-polling sampler loses bits whenever the process is preempted
//! mid-sample, so the reader runs under maximum `SCHED_FIFO` priority
//! while it works. The request is best-effort: without the privilege
//! (`CAP_SYS_NICE` or root) acquisition continues at normal priority,
//! which merely lowers the odds of a clean capture per attempt.

use std::io;

use tracing::{debug, warn};

/// A scoped elevation to maximum `SCHED_FIFO` priority.
///
/// Dropping the guard restores the scheduling policy and priority that
/// were in place when it was acquired, on every exit path.
#[derive(Debug)]
pub struct RealtimeGuard {
    previous_policy: libc::c_int,
    previous_param: libc::sched_param,
    elevated: bool,
}

impl RealtimeGuard {
    /// Requests maximum `SCHED_FIFO` priority for the calling process.
    ///
    /// Failure to obtain the priority is logged and tolerated.
    #[must_use]
    pub fn acquire() -> Self {
        // SAFETY: plain syscalls on the calling process; the param struct
        // is a valid out-pointer.
        let (previous_policy, previous_param) = unsafe {
            let policy = libc::sched_getscheduler(0);
            let mut param = libc::sched_param { sched_priority: 0 };
            let _ = libc::sched_getparam(0, &mut param);
            (policy, param)
        };

        // SAFETY: the param struct outlives the call.
        let elevated = unsafe {
            let priority = libc::sched_get_priority_max(libc::SCHED_FIFO);
            let param = libc::sched_param {
                sched_priority: priority,
            };
            libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) == 0
        };

        if elevated {
            debug!("acquired SCHED_FIFO priority");
        } else {
            warn!(
                error = %io::Error::last_os_error(),
                "couldn't set SCHED_FIFO, sampling at normal priority"
            );
        }

        Self {
            previous_policy,
            previous_param,
            elevated,
        }
    }

    /// Whether the elevation actually took effect.
    #[must_use]
    pub const fn elevated(&self) -> bool {
        self.elevated
    }
}

impl Drop for RealtimeGuard {
    fn drop(&mut self) {
        if !self.elevated {
            return;
        }

        // SAFETY: restores previously observed scheduling parameters for
        // the calling process.
        let restored = unsafe {
            libc::sched_setscheduler(0, self.previous_policy, &self.previous_param) == 0
        };
        if !restored {
            warn!(
                error = %io::Error::last_os_error(),
                "couldn't restore the previous scheduling policy"
            );
        }
    }
}
