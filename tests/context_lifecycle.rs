//! Integration tests for the execution context lifecycle
//!
//! Runtimes are replaced with /bin/sh through engine settings, so program
//! files are shell scripts and no language toolchain is needed.

use polyhost::{
    Dispatcher, EngineSettings, EngineType, ExecutionContext, ExitCode, HostConfig, HostError,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("polyhost-{}-{}", label, uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn shell_dispatcher(engine: EngineType) -> Arc<Dispatcher> {
    let mut config = HostConfig::default();
    config.set_engine(engine, EngineSettings::with_executable("/bin/sh"));
    Arc::new(Dispatcher::from_config(&config))
}

#[test]
fn test_scripting_engine_reports_script_exit_codes() {
    let workdir = scratch_dir("scripting");
    let program = workdir.join("ok.script");
    fs::write(&program, "exit 0\n").unwrap();

    let context = ExecutionContext::with_dispatcher(EngineType::Lua, shell_dispatcher(EngineType::Lua));
    context.set_workdir(&workdir);
    context.set_program(&program);
    assert_eq!(context.exec().unwrap(), ExitCode(0));

    // Same context, new file contents.
    fs::write(&program, "exit 3\n").unwrap();
    assert_eq!(context.exec().unwrap(), ExitCode(3));

    fs::remove_dir_all(&workdir).ok();
}

#[test]
fn test_exec_without_program_is_invalid_state() {
    let context = ExecutionContext::with_dispatcher(EngineType::Lua, shell_dispatcher(EngineType::Lua));
    context.set_workdir(std::env::temp_dir());

    match context.exec() {
        Err(HostError::InvalidState(message)) => assert!(message.contains("set_program")),
        other => panic!("expected InvalidState, got {other:?}"),
    }
}

#[test]
fn test_exec_without_workdir_is_invalid_state() {
    let context = ExecutionContext::with_dispatcher(EngineType::Lua, shell_dispatcher(EngineType::Lua));
    context.set_program("/nonexistent/ok.script");

    assert!(matches!(context.exec(), Err(HostError::InvalidState(_))));
}

#[test]
fn test_sequential_execs_observe_their_own_workdir() {
    let first = scratch_dir("workdir-a");
    let second = scratch_dir("workdir-b");
    let programs = scratch_dir("programs");
    let program = programs.join("record_cwd.script");
    fs::write(&program, "pwd -P > cwd.seen\nprintf '%s' \"$LUA_PATH\" > lua_path.seen\n").unwrap();

    let context = ExecutionContext::with_dispatcher(EngineType::Lua, shell_dispatcher(EngineType::Lua));
    context.set_program(&program);

    for workdir in [&first, &second] {
        context.set_workdir(workdir);
        assert!(context.exec().unwrap().is_success());

        let seen = fs::read_to_string(workdir.join("cwd.seen")).unwrap();
        assert_eq!(PathBuf::from(seen.trim()), fs::canonicalize(workdir).unwrap());

        let lua_path = fs::read_to_string(workdir.join("lua_path.seen")).unwrap();
        assert!(lua_path.starts_with(&format!("{}/?.lua;", workdir.display())));
    }

    for dir in [first, second, programs] {
        fs::remove_dir_all(dir).ok();
    }
}

#[test]
fn test_relative_workdir_modules_are_found() {
    // Relative to the test process cwd.
    let relative = PathBuf::from(format!("polyhost-rel-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&relative).unwrap();
    fs::write(relative.join("mod.lua"), "return 1\n").unwrap();
    let program = relative.join("check_module.script");
    fs::write(&program, "[ -f \"${LUA_PATH%%\\?.lua*}mod.lua\" ] || exit 9\n").unwrap();

    let context = ExecutionContext::with_dispatcher(EngineType::Lua, shell_dispatcher(EngineType::Lua));
    context.set_workdir(&relative);
    context.set_program(&program);

    let dispatched = context.exec_recorded().unwrap();
    assert_eq!(dispatched.result.unwrap(), ExitCode(0));
    assert!(dispatched.record.workdir.is_absolute());

    fs::remove_dir_all(&relative).ok();
}

#[test]
fn test_disabled_engine_is_unsupported_not_success() {
    let mut config = HostConfig::default();
    config.set_engine(
        EngineType::Ruby,
        EngineSettings {
            enabled: false,
            ..EngineSettings::with_executable("/bin/sh")
        },
    );
    let dispatcher = Arc::new(Dispatcher::from_config(&config));

    let workdir = scratch_dir("disabled");
    let program = workdir.join("main.rb");
    fs::write(&program, "exit 0\n").unwrap();

    let context = ExecutionContext::with_dispatcher(EngineType::Ruby, dispatcher);
    context.set_workdir(&workdir);
    context.set_program(&program);

    let result = context.exec();
    assert!(matches!(result, Err(HostError::UnsupportedEngine(EngineType::Ruby))));

    fs::remove_dir_all(&workdir).ok();
}

#[test]
fn test_missing_runtime_is_engine_start_not_script_failure() {
    let mut config = HostConfig::default();
    config.set_engine(
        EngineType::Python,
        EngineSettings::with_executable("/nonexistent/bin/python3"),
    );
    let dispatcher = Arc::new(Dispatcher::from_config(&config));

    let workdir = scratch_dir("no-runtime");
    let program = workdir.join("main.py");
    fs::write(&program, "raise SystemExit(0)\n").unwrap();

    let context = ExecutionContext::with_dispatcher(EngineType::Python, dispatcher);
    context.set_workdir(&workdir);
    context.set_program(&program);

    let dispatched = context.exec_recorded().unwrap();
    assert!(matches!(
        dispatched.result,
        Err(HostError::EngineStart { engine: EngineType::Python, .. })
    ));
    let json: serde_json::Value = serde_json::from_str(&dispatched.record.to_json()).unwrap();
    assert_eq!(json["outcome"]["kind"], "EngineStart");

    fs::remove_dir_all(&workdir).ok();
}

#[test]
fn test_concurrent_execs_on_one_context_do_not_overlap() {
    let workdir = scratch_dir("concurrent");
    let program = workdir.join("slow.script");
    fs::write(&program, "sleep 0.2\nexit 4\n").unwrap();

    let context = Arc::new(ExecutionContext::with_dispatcher(
        EngineType::Go,
        shell_dispatcher(EngineType::Go),
    ));
    context.set_workdir(&workdir);
    context.set_program(&program);

    let started = Instant::now();
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let context = Arc::clone(&context);
            thread::spawn(move || context.exec().unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), ExitCode(4));
    }
    assert!(started.elapsed() >= Duration::from_millis(400));

    fs::remove_dir_all(&workdir).ok();
}
