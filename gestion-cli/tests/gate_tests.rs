mod common;

use common::{code_for, manager};
use gestion_cli::gate::{GateOutcome, run_gate};
use std::io::Cursor;
use tempfile::TempDir;

fn run(manager: &gestion_license::LicenseManager, input: &str) -> (GateOutcome, String) {
    let mut out = Vec::new();
    let outcome = run_gate(manager, &mut Cursor::new(input.to_string()), &mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

#[test]
fn activation_with_valid_code() {
    let dir = TempDir::new().unwrap();
    let manager = manager(dir.path(), "till-1");
    let code = code_for(&manager);

    let (outcome, text) = run(&manager, &format!("{code}\n"));

    assert!(matches!(outcome, GateOutcome::Activated(_)));
    assert!(outcome.may_proceed());
    assert!(text.contains("La aplicación no está activada"));
    assert!(text.contains(&manager.get_formatted_hwid()));
    assert!(text.contains("Licencia activada correctamente"));
    assert!(manager.is_activated());
}

#[test]
fn already_activated_skips_prompt() {
    let dir = TempDir::new().unwrap();
    let manager = manager(dir.path(), "till-1");
    manager.activate(&code_for(&manager)).unwrap();

    let (outcome, text) = run(&manager, "");
    assert_eq!(outcome, GateOutcome::AlreadyValid);
    assert!(text.contains("Licencia válida"));
    assert!(!text.contains("HWID"));
}

#[test]
fn retries_after_bad_code() {
    let dir = TempDir::new().unwrap();
    let manager = manager(dir.path(), "till-1");
    let other = common::manager(dir.path(), "till-2");
    let input = format!("ABC\n{}\n{}\n", code_for(&other), code_for(&manager));

    let (outcome, text) = run(&manager, &input);

    assert!(matches!(outcome, GateOutcome::Activated(_)));
    assert!(text.contains("Código de licencia inválido"));
    assert!(text.contains("no es válido para este equipo"));
}

#[test]
fn end_of_input_cancels() {
    let dir = TempDir::new().unwrap();
    let manager = manager(dir.path(), "till-1");

    let (outcome, _) = run(&manager, "WRONG-CODE-12345\n");
    assert_eq!(outcome, GateOutcome::Cancelled);
    assert!(!outcome.may_proceed());
    assert!(!manager.store().exists());
}

#[test]
fn empty_code_asks_before_leaving() {
    let dir = TempDir::new().unwrap();
    let manager = manager(dir.path(), "till-1");

    let (outcome, text) = run(&manager, "\nn\n\ns\n");
    assert_eq!(outcome, GateOutcome::Cancelled);
    assert_eq!(text.matches("¿Está seguro").count(), 2);

    let code = code_for(&manager);
    let (outcome, _) = run(&manager, &format!("\nno\n{code}\n"));
    assert!(matches!(outcome, GateOutcome::Activated(_)));
}

#[test]
fn wrong_machine_record_prompts_again() {
    let dir = TempDir::new().unwrap();
    let first = manager(dir.path(), "till-1");
    first.activate(&code_for(&first)).unwrap();

    let moved = manager(dir.path(), "till-2");
    let (outcome, text) = run(&moved, "");
    assert_eq!(outcome, GateOutcome::Cancelled);
    assert!(text.contains("Esta licencia está vinculada a otro equipo"));
}
