use std::fs;
use std::io;
use std::mem;
use std::process::Command;

use libc::cpu_set_t;

use crate::ProcessorId;
use crate::pal::Platform;

const LSCPU: &str = "lscpu";

// Socket/core/processor triples using physical IDs, one processor per line.
const LSCPU_ARGS: [&str; 2] = ["-p=socket,core,cpu", "-y"];

const ONLINE_PROCESSORS_PATH: &str = "/sys/devices/system/cpu/online";

/// The real operating system that the build is targeting.
///
/// You would only use a different platform in unit tests that need to use a mock platform.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetPlatform;

/// Singleton instance of `BuildTargetPlatform`, used by public API types
/// to hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform;

// Real OS bindings are excluded from coverage measurement because:
// 1. They are tested via integration tests running on actual Linux.
// 2. Error paths require OS-level failures that are impractical to trigger in tests.
#[cfg_attr(coverage_nightly, coverage(off))]
impl Platform for BuildTargetPlatform {
    fn topology_enumeration(&self) -> io::Result<String> {
        let output = Command::new(LSCPU).args(LSCPU_ARGS).output()?;

        if !output.status.success() {
            return Err(io::Error::other(format!(
                "{LSCPU} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn online_processor_list(&self) -> io::Result<String> {
        fs::read_to_string(ONLINE_PROCESSORS_PATH)
    }

    fn online_processor_count(&self) -> io::Result<usize> {
        // SAFETY: No safety requirements.
        let count = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) };

        match usize::try_from(count) {
            Ok(count) if count > 0 => Ok(count),
            _ => Err(io::Error::last_os_error()),
        }
    }

    fn current_thread_processors(&self) -> io::Result<Vec<ProcessorId>> {
        // SAFETY: All zeroes is a valid cpu_set_t.
        let mut cpuset: cpu_set_t = unsafe { mem::zeroed() };

        // 0 means current thread.
        // SAFETY: No safety requirements beyond passing valid arguments.
        let result = unsafe { libc::sched_getaffinity(0, size_of::<cpu_set_t>(), &raw mut cpuset) };

        if result != 0 {
            return Err(io::Error::last_os_error());
        }

        Ok((0..cpu_set_capacity())
            // SAFETY: The index is within the capacity of the set.
            .filter(|&index| unsafe { libc::CPU_ISSET(index, &cpuset) })
            .filter_map(|index| ProcessorId::try_from(index).ok())
            .collect())
    }

    fn pin_current_thread_to(&self, processor_id: ProcessorId) -> io::Result<()> {
        let capacity = cpu_set_capacity();

        let index = usize::try_from(processor_id)
            .ok()
            .filter(|&index| index < capacity)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("processor {processor_id} is beyond the affinity mask size {capacity}"),
                )
            })?;

        // SAFETY: All zeroes is a valid cpu_set_t.
        let mut cpuset: cpu_set_t = unsafe { mem::zeroed() };

        // SAFETY: The index was checked against the capacity of the set above.
        unsafe { libc::CPU_SET(index, &mut cpuset) };

        // 0 means current thread.
        // SAFETY: No safety requirements beyond passing valid arguments.
        let result =
            unsafe { libc::sched_setaffinity(0, size_of::<cpu_set_t>(), &raw const cpuset) };

        if result == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

fn cpu_set_capacity() -> usize {
    usize::try_from(libc::CPU_SETSIZE).unwrap_or(0)
}
