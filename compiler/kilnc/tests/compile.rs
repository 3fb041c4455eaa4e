#![allow(clippy::unwrap_used, clippy::expect_used)]
//! End-to-end runs of the driver over small packages.

use kilnc::{compile_package, compile_unit, CompileError, CompileOptions, Package};
use kiln_diagnostic::{ErrorCode, Severity};
use kiln_ir::{
    FunctionIr, ObjectArena, Reflection, Statement, StatementKind, TypeRegistry, UnitIr, Value,
    ValueType,
};
use pretty_assertions::assert_eq;

/// `Hero` (class), `Mood` (enum) and `Stats` (struct) with empty bodies.
fn package() -> Package {
    let mut registry = TypeRegistry::new();
    let core = registry.register_core();
    registry.set_package("/Game/Heroes");
    let hero = registry.add_class("Hero", Some(core.actor));
    let mood = registry.add_enum("Mood", &["Calm", "Angry"]);
    let stats = registry.add_struct("Stats");
    registry.add_field(stats, "Level", ValueType::int());
    registry.add_field(hero, "Stats", ValueType::structure(stats));

    let mut package = Package::new(registry, ObjectArena::new());
    package.units = vec![UnitIr::new(hero), UnitIr::new(mood), UnitIr::new(stats)];
    package
}

/// Add a `Hero` function whose single statement is `kind`.
fn add_function(package: &mut Package, name: &str, kind: StatementKind) {
    let hero = package.units[0].ty;
    let id = package.registry.add_function(hero, name);
    let mut ir = FunctionIr::new(package.registry.intern(name), id);
    ir.push_stmt(Statement::new(kind));
    package.units[0].functions.push(ir);
}

#[test]
fn every_unit_produces_its_files() {
    let compiled = compile_package(&package(), &CompileOptions::default()).unwrap();
    assert_eq!(compiled.error_count(), 0);
    let names: Vec<String> = compiled.files().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["Hero.h", "Hero.cpp", "Mood.h", "Stats.h"]);

    let hero = compiled.unit("Hero").unwrap();
    assert!(hero.output.declaration.contains("#include \"Stats.h\""));
    assert!(hero.output.declaration.contains("\tFStats Stats;"));
    assert!(hero
        .output
        .implementation
        .as_deref()
        .is_some_and(|text| text.starts_with("#include \"Hero.h\"\n")));
}

#[test]
fn options_reach_the_emitters() {
    let mut package = package();
    add_function(&mut package, "Note", StatementKind::Comment(String::from("hello")));

    let with = compile_unit(&package, "Hero", &CompileOptions::new().indent("  ")).unwrap();
    let text = with.output.implementation.unwrap_or_default();
    assert!(text.contains("\n  // hello\n"));

    let without = compile_unit(&package, "Hero", &CompileOptions::new().emit_comments(false))
        .unwrap();
    assert!(!without.output.implementation.unwrap_or_default().contains("hello"));
}

#[test]
fn unknown_unit_is_an_error() {
    let err = compile_unit(&package(), "Villain", &CompileOptions::default()).unwrap_err();
    assert_eq!(
        err,
        CompileError::UnknownUnit {
            name: String::from("Villain")
        }
    );
    assert_eq!(err.to_string(), "unknown unit `Villain`");
}

#[test]
fn lowering_problems_are_collected_per_unit() {
    let mut package = package();
    add_function(&mut package, "Bad", StatementKind::Return);

    let compiled = compile_package(&package, &CompileOptions::default()).unwrap();
    assert_eq!(compiled.error_count(), 1);
    let hero = compiled.unit("Hero").unwrap();
    assert_eq!(hero.diagnostics.len(), 1);
    let diagnostic = &hero.diagnostics[0];
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.code, ErrorCode::E5001);
    assert_eq!(diagnostic.origin.unit.as_deref(), Some("Hero"));
    assert_eq!(diagnostic.origin.function.as_deref(), Some("Bad"));
    // The other units are unaffected.
    assert!(compiled.unit("Mood").unwrap().diagnostics.is_empty());
}

#[test]
fn error_limit_stops_the_run() {
    let mut package = package();
    add_function(&mut package, "Bad", StatementKind::Return);
    add_function(&mut package, "Worse", StatementKind::Return);

    let err = compile_package(&package, &CompileOptions::new().error_limit(1)).unwrap_err();
    assert_eq!(err, CompileError::ErrorLimitReached { limit: 1, errors: 2 });
    assert!(compile_package(&package, &CompileOptions::new().error_limit(2)).is_ok());
}

#[test]
fn fatal_unit_keeps_its_output_and_the_rest_still_compile() {
    let mut package = package();
    add_function(
        &mut package,
        "Broken",
        StatementKind::CompileError(String::from("pin not connected")),
    );

    let compiled = compile_package(&package, &CompileOptions::default()).unwrap();
    assert!(compiled.has_fatal());
    let names: Vec<String> = compiled.files().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["Hero.h", "Hero.cpp", "Mood.h", "Stats.h"]);

    let hero = compiled.unit("Hero").unwrap();
    assert!(hero.has_fatal());
    assert!(hero
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Fatal && d.message() == "compile error: pin not connected"));
    assert!(hero
        .output
        .implementation
        .as_deref()
        .is_some_and(|text| text.contains("static_assert(false, \"pin not connected\");")));

    for other in ["Mood", "Stats"] {
        let unit = compiled.unit(other).unwrap();
        assert!(!unit.has_fatal());
        assert!(!unit.output.declaration.is_empty());
    }
}

#[test]
fn fatal_markers_abort_the_package_when_opted_in() {
    let mut package = package();
    add_function(
        &mut package,
        "Broken",
        StatementKind::CompileError(String::from("pin not connected")),
    );

    let err = compile_package(&package, &CompileOptions::new().fail_on_fatal(true)).unwrap_err();
    assert_eq!(
        err,
        CompileError::Fatal {
            unit: String::from("Hero"),
            message: String::from("compile error: pin not connected"),
        }
    );
}

#[test]
fn literal_bodies_survive_the_round_trip_through_the_driver() {
    let mut package = package();
    let hero = package.units[0].ty;
    let score = package.registry.add_field(hero, "Score", ValueType::int());
    let id = package.registry.add_function(hero, "Reset");
    let mut ir = FunctionIr::new(package.registry.intern("Reset"), id);
    let desc = package.registry.field(score);
    let dest = ir.field_ref(score, desc.name, desc.ty, None);
    let zero = ir.literal(ValueType::int(), Value::Int(0));
    ir.push_stmt(Statement::new(StatementKind::Assign).lhs(dest).rhs([zero]));
    package.units[0].functions.push(ir);

    let compiled = compile_unit(&package, "Hero", &CompileOptions::default()).unwrap();
    assert_eq!(compiled.error_count(), 0);
    let text = compiled.output.implementation.unwrap_or_default();
    assert!(text.contains("void AHero::Reset()\n{\n\tScore = 0;\n}\n"));
}
