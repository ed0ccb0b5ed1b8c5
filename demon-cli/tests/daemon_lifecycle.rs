//! Drives a real `demon start` process through reload, takeover and stop.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};

use tempfile::TempDir;

fn demon_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("demon")
}

struct DaemonProcess {
    child: Child,
}

impl DaemonProcess {
    fn start(config: &Path, pid_file: &Path) -> Self {
        let child = Command::new(demon_bin())
            .arg("start")
            .arg("--config")
            .arg(config)
            .arg("--pid-file")
            .arg(pid_file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn daemon");
        Self { child }
    }

    fn pid(&self) -> u32 {
        self.child.id()
    }

    fn wait_exit(&mut self, timeout: Duration) -> Option<ExitStatus> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(Some(status)) = self.child.try_wait() {
                return Some(status);
            }
            sleep(Duration::from_millis(50));
        }
        None
    }
}

impl Drop for DaemonProcess {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        sleep(Duration::from_millis(50));
    }
    false
}

fn marker_names(pid_file: &Path, pid: u32) -> bool {
    fs::read_to_string(pid_file)
        .map(|content| content == format!("{pid}\n"))
        .unwrap_or(false)
}

fn control(command: &str, pid_file: &Path) -> std::process::Output {
    Command::new(demon_bin())
        .arg(command)
        .arg("--pid-file")
        .arg(pid_file)
        .output()
        .expect("run control command")
}

struct Workspace {
    _root: TempDir,
    src: PathBuf,
    dst: PathBuf,
    config: PathBuf,
    pid_file: PathBuf,
}

fn workspace() -> Workspace {
    let root = TempDir::new().expect("root");
    let src = root.path().join("src");
    let dst = root.path().join("dst");
    fs::create_dir_all(&src).expect("mkdir src");
    fs::create_dir_all(&dst).expect("mkdir dst");
    let config = root.path().join("config.cfg");
    fs::write(&config, format!("{} {} .log\n", src.display(), dst.display()))
        .expect("write config");
    let pid_file = root.path().join("demon.pid");
    Workspace {
        src,
        dst,
        config,
        pid_file,
        _root: root,
    }
}

#[test]
fn reload_resyncs_and_stop_exits_cleanly() {
    let ws = workspace();
    fs::write(ws.src.join("first.log"), "1").expect("write");
    fs::write(ws.dst.join("stale.log"), "old").expect("write");

    let mut daemon = DaemonProcess::start(&ws.config, &ws.pid_file);
    assert!(
        wait_until(Duration::from_secs(5), || marker_names(&ws.pid_file, daemon.pid())
            && ws.dst.join("first.log").exists()),
        "daemon did not take over and sync in time",
    );
    assert!(!ws.dst.join("stale.log").exists());

    fs::write(ws.src.join("second.log"), "2").expect("write");
    let reload = control("reload", &ws.pid_file);
    assert!(reload.status.success(), "{}", String::from_utf8_lossy(&reload.stderr));
    assert!(
        wait_until(Duration::from_secs(5), || ws.dst.join("second.log").exists()),
        "reload did not resync",
    );

    let stop = control("stop", &ws.pid_file);
    assert!(stop.status.success());
    let status = daemon.wait_exit(Duration::from_secs(5)).expect("daemon exited");
    assert_eq!(status.code(), Some(0));
    assert!(ws.pid_file.exists(), "marker is left behind on terminate");
}

#[test]
fn broken_config_on_reload_exits_with_failure() {
    let ws = workspace();
    let mut daemon = DaemonProcess::start(&ws.config, &ws.pid_file);
    assert!(
        wait_until(Duration::from_secs(5), || marker_names(&ws.pid_file, daemon.pid())),
        "daemon did not take over in time",
    );

    fs::write(&ws.config, "/only /two\n").expect("break config");
    assert!(control("reload", &ws.pid_file).status.success());

    let status = daemon.wait_exit(Duration::from_secs(5)).expect("daemon exited");
    assert_eq!(status.code(), Some(1));
}

#[test]
fn second_instance_displaces_the_first() {
    let ws = workspace();
    let mut first = DaemonProcess::start(&ws.config, &ws.pid_file);
    assert!(
        wait_until(Duration::from_secs(5), || marker_names(&ws.pid_file, first.pid())),
        "first daemon did not take over in time",
    );

    let mut second = DaemonProcess::start(&ws.config, &ws.pid_file);
    let first_status = first
        .wait_exit(Duration::from_secs(5))
        .expect("first instance terminated");
    assert_eq!(first_status.code(), Some(0));
    assert!(
        wait_until(Duration::from_secs(5), || marker_names(&ws.pid_file, second.pid())),
        "second daemon did not record its pid",
    );

    assert!(control("stop", &ws.pid_file).status.success());
    assert_eq!(
        second.wait_exit(Duration::from_secs(5)).and_then(|s| s.code()),
        Some(0)
    );
}
