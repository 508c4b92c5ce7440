//! NODE_PATH isolation around JavaScript/TypeScript invocations
//!
//! Node is replaced by /bin/sh running a wrapper script that records what the
//! runtime would have seen, then sources the program as shell.

use polyhost::{Dispatcher, EngineSettings, EngineType, ExecutionContext, ExitCode, HostConfig, HostError};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

// Every test here reads and writes NODE_PATH.
static NODE_PATH_LOCK: Mutex<()> = Mutex::new(());

const FAKE_NODE: &str = r#"for last; do :; done
printf '%s' "${NODE_PATH-<unset>}" > node_path.seen
printf '%s\n' "$@" > argv.seen
. "$last"
"#;

fn scratch_dir(label: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("polyhost-{}-{}", label, uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn node_context(engine: EngineType, workdir: &Path, program_body: &str) -> ExecutionContext {
    let wrapper = workdir.join("fake_node.sh");
    fs::write(&wrapper, FAKE_NODE).unwrap();
    let program = workdir.join("main.js");
    fs::write(&program, program_body).unwrap();

    let mut settings = EngineSettings::with_executable("/bin/sh");
    settings.launcher_args = vec![wrapper.to_string_lossy().into_owned()];
    let mut config = HostConfig::default();
    config.set_engine(engine, settings);

    let context = ExecutionContext::with_dispatcher(engine, Arc::new(Dispatcher::from_config(&config)));
    context.set_workdir(workdir);
    context.set_program(&program);
    context
}

fn lock() -> std::sync::MutexGuard<'static, ()> {
    NODE_PATH_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

#[test]
fn test_node_path_is_workdir_during_run_and_restored_after() {
    let _lock = lock();
    env::set_var("NODE_PATH", "/usr/lib/node_modules");

    let workdir = scratch_dir("node-set");
    let context = node_context(EngineType::Javascript, &workdir, "exit 0\n");
    assert_eq!(context.exec().unwrap(), ExitCode(0));

    let seen = fs::read_to_string(workdir.join("node_path.seen")).unwrap();
    assert_eq!(seen, workdir.to_string_lossy());
    assert_eq!(env::var_os("NODE_PATH"), Some(OsString::from("/usr/lib/node_modules")));

    env::remove_var("NODE_PATH");
    fs::remove_dir_all(&workdir).ok();
}

#[test]
fn test_absent_node_path_stays_absent_after_failure() {
    let _lock = lock();
    env::remove_var("NODE_PATH");

    let workdir = scratch_dir("node-unset");
    let context = node_context(EngineType::Javascript, &workdir, "exit 5\n");
    assert_eq!(context.exec().unwrap(), ExitCode(5));
    assert_eq!(env::var_os("NODE_PATH"), None);

    fs::remove_dir_all(&workdir).ok();
}

#[test]
fn test_node_path_restored_when_runtime_cannot_start() {
    let _lock = lock();
    env::set_var("NODE_PATH", "/opt/shared");

    let workdir = scratch_dir("node-missing");
    let program = workdir.join("main.js");
    fs::write(&program, "exit 0\n").unwrap();

    let mut config = HostConfig::default();
    config.set_engine(
        EngineType::Javascript,
        EngineSettings::with_executable("/nonexistent/bin/node"),
    );
    let context = ExecutionContext::with_dispatcher(
        EngineType::Javascript,
        Arc::new(Dispatcher::from_config(&config)),
    );
    context.set_workdir(&workdir);
    context.set_program(&program);

    assert!(matches!(context.exec(), Err(HostError::EngineStart { .. })));
    assert_eq!(env::var_os("NODE_PATH"), Some(OsString::from("/opt/shared")));

    env::remove_var("NODE_PATH");
    fs::remove_dir_all(&workdir).ok();
}

#[test]
fn test_typescript_passes_transpile_hook() {
    let _lock = lock();
    env::remove_var("NODE_PATH");

    let workdir = scratch_dir("node-ts");
    let context = node_context(EngineType::Typescript, &workdir, "exit 0\n");
    assert!(context.exec().unwrap().is_success());

    let argv = fs::read_to_string(workdir.join("argv.seen")).unwrap();
    let args: Vec<&str> = argv.lines().collect();
    assert!(args.contains(&"--no-addons"));
    let hook = args.iter().position(|a| *a == "--require").expect("--require flag");
    assert_eq!(args[hook + 1], "ts-node/register/transpile-only");
    assert!(args.last().unwrap().ends_with("main.js"));
    assert_eq!(env::var_os("NODE_PATH"), None);

    fs::remove_dir_all(&workdir).ok();
}

#[test]
fn test_other_runtimes_never_inherit_node_path() {
    let _lock = lock();
    env::remove_var("NODE_PATH");

    let node_dir = scratch_dir("node-long");
    let node = node_context(EngineType::Javascript, &node_dir, "sleep 0.5\nexit 0\n");

    let lua_dir = scratch_dir("lua-during-node");
    let lua_program = lua_dir.join("record.script");
    fs::write(&lua_program, "printf '%s' \"${NODE_PATH-<unset>}\" > node_path.seen\n").unwrap();
    let mut config = HostConfig::default();
    config.set_engine(EngineType::Lua, EngineSettings::with_executable("/bin/sh"));
    let lua = ExecutionContext::with_dispatcher(EngineType::Lua, Arc::new(Dispatcher::from_config(&config)));
    lua.set_workdir(&lua_dir);
    lua.set_program(&lua_program);

    let node_run = thread::spawn(move || node.exec());
    thread::sleep(Duration::from_millis(150));
    assert!(lua.exec().unwrap().is_success());
    assert!(node_run.join().unwrap().unwrap().is_success());

    let seen = fs::read_to_string(lua_dir.join("node_path.seen")).unwrap();
    assert_eq!(seen, "<unset>");
    assert_eq!(fs::read_to_string(node_dir.join("node_path.seen")).unwrap(), node_dir.to_string_lossy());
    assert_eq!(env::var_os("NODE_PATH"), None);

    for dir in [node_dir, lua_dir] {
        fs::remove_dir_all(dir).ok();
    }
}
