//! Behaviour-driven step definitions driving both commands end to end.

use super::helpers::{ProjectRoot, geocoder_answering_second_query, write_utf8};
use super::*;
use bangalore_core::test_support::ScriptedGeocoder;
use bangalore_data::read_boundary;
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

/// Aggregates command scenario state so each step only needs a single world
/// argument.
struct CommandWorld {
    root: ProjectRoot,
    root_override: RefCell<Option<Utf8PathBuf>>,
    geocoder: RefCell<ScriptedGeocoder>,
    result: RefCell<Option<Result<Utf8PathBuf, CliError>>>,
}

impl CommandWorld {
    fn new() -> Self {
        Self {
            root: ProjectRoot::new(),
            root_override: RefCell::new(None),
            geocoder: RefCell::new(ScriptedGeocoder::default()),
            result: RefCell::new(None),
        }
    }

    fn root_path(&self) -> Utf8PathBuf {
        self.root_override
            .borrow()
            .clone()
            .unwrap_or_else(|| self.root.path().to_path_buf())
    }

    fn boundary_path(&self) -> Utf8PathBuf {
        self.root.path().join(fetch::BOUNDARY_FILE)
    }
}

#[fixture]
fn world() -> CommandWorld {
    CommandWorld::new()
}

#[given("an empty project root")]
fn empty_root(#[from(world)] world: &CommandWorld) {
    assert!(world.root.path().is_dir());
}

#[given("a project root that is a file")]
fn file_root(#[from(world)] world: &CommandWorld) {
    let path = world.root.path().join("root-file");
    write_utf8(&path, b"not a directory");
    *world.root_override.borrow_mut() = Some(path);
}

#[given("a geocoder that only knows the second query")]
fn second_query_geocoder(#[from(world)] world: &CommandWorld) {
    *world.geocoder.borrow_mut() = geocoder_answering_second_query();
}

#[given("a geocoder with no results")]
fn empty_geocoder(#[from(world)] world: &CommandWorld) {
    *world.geocoder.borrow_mut() = ScriptedGeocoder::default();
}

#[given("a processed GeoPackage with the city boundary")]
fn processed_gpkg(#[from(world)] world: &CommandWorld) {
    world.root.write_boundary_gpkg();
}

#[when("I fetch the boundary")]
fn fetch_boundary(#[from(world)] world: &CommandWorld) {
    let config = fetch::FetchConfig::from(fetch::FetchArgs {
        root: Some(world.root_path()),
        ..fetch::FetchArgs::default()
    });
    let geocoder = world.geocoder.borrow();
    *world.result.borrow_mut() = Some(fetch::run_with(&config, &*geocoder));
}

#[when("I build the project")]
fn build_project(#[from(world)] world: &CommandWorld) {
    let config = build::BuildConfig::from(build::BuildArgs {
        root: Some(world.root_path()),
        ..build::BuildArgs::default()
    });
    let result = build::run_with(&config).map(|_| config.output.clone());
    *world.result.borrow_mut() = Some(result);
}

#[then("the command succeeds")]
fn succeeds(#[from(world)] world: &CommandWorld) {
    let result = world.result.borrow();
    match result.as_ref().expect("command should have run") {
        Ok(_) => {}
        Err(err) => panic!("expected success, found {err:?}"),
    }
}

#[then("the command fails with exit code {code}")]
fn fails_with(code: u8, #[from(world)] world: &CommandWorld) {
    let result = world.result.borrow();
    match result.as_ref().expect("command should have run") {
        Ok(path) => panic!("expected failure, wrote {path}"),
        Err(err) => assert_eq!(err.exit_code(), code),
    }
}

#[then("the boundary file holds one feature")]
fn boundary_written(#[from(world)] world: &CommandWorld) {
    let boundary = read_boundary(&world.boundary_path()).expect("boundary readable");
    assert_eq!(boundary.features.len(), 1);
    assert!(boundary.has_geometry());
}

#[then("no boundary file is written")]
fn no_boundary(#[from(world)] world: &CommandWorld) {
    assert!(!world.boundary_path().exists());
}

#[then("the project file exists")]
fn project_exists(#[from(world)] world: &CommandWorld) {
    assert!(world.root.path().join(build::PROJECT_FILE).is_file());
}

macro_rules! register_command_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/commands.feature", name = $scenario_title)]
        fn $fn_name(world: CommandWorld) {
            let _ = world;
        }
    };
}

register_command_scenario!(
    fetch_saves_boundary,
    "fetching saves the first boundary found"
);
register_command_scenario!(
    fetch_without_results_fails,
    "fetching with no results fails with exit code 2"
);
register_command_scenario!(
    build_writes_project,
    "building from a GeoPackage writes the project"
);
register_command_scenario!(
    build_under_file_root_fails,
    "building under a file root fails with exit code 1"
);
