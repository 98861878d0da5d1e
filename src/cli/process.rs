use std::{env, path::Path, path::PathBuf};

use anyhow::Result;
use sysinfo::{get_current_pid, Signal, System};

use super::daemon_path::to_daemon_path;

pub fn kill_previous_daemons(name: &Path) {
    let system = System::new_all();
    let current_id = get_current_pid().unwrap();
    for (pid, process) in system.processes().iter() {
        if *pid == current_id {
            continue;
        }
        if matches!(process.parent(), Some(p) if p == current_id) {
            continue;
        }

        if process
            .exe()
            .filter(|v| v.exists())
            .filter(|v| name == *v)
            .is_some()
        {
            // This will forcefully terminate the process on Windows. Anything better will require a
            // lot more work.
            if process.kill_with(Signal::Term).is_none() {
                process.kill();
            }
            process.wait();
        }
    }
}

/// Shuts down a previously started daemon and starts a new one. The daemon binary detaches
/// itself, so this only has to spawn it and wait for the foreground parent to finish.
pub fn restart_daemon(dir: Option<PathBuf>) -> Result<()> {
    // The program uses an executable path derived from the current one. It's not the best option
    // but it will do the job in most cases.
    let cli_path = env::current_exe().expect("Can't operate without an executable");
    let daemon_path = to_daemon_path(cli_path);
    kill_previous_daemons(&daemon_path);

    let mut command = std::process::Command::new(daemon_path);
    if let Some(dir) = dir {
        command.arg("--dir");
        command.arg(dir);
    }

    println!("Spawning reminder daemon");
    command.spawn()?.wait()?;
    println!("Success");
    Ok(())
}
