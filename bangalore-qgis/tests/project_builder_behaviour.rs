#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for building and writing the project.

use std::cell::RefCell;
use std::fs::File;

use bangalore_core::{BuildStep, PropertyValue};
use bangalore_data::geopackage::test_support::{
    GeoPackageBuilder, gpkg, line_string, multi, rectangle,
};
use bangalore_qgis::{
    BASEMAP_PROPERTY, BuildOptions, BuildOutcome, build_and_write, read_project_document,
};
use camino::Utf8PathBuf;
use geo::{Coord, Rect};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

const CITY_MIN: Coord<f64> = Coord { x: 77.46, y: 12.83 };
const CITY_MAX: Coord<f64> = Coord { x: 77.78, y: 13.14 };
const WARD_MIN: Coord<f64> = Coord { x: 77.55, y: 12.95 };
const WARD_MAX: Coord<f64> = Coord { x: 77.62, y: 13.01 };

type OutcomeCell = RefCell<Option<BuildOutcome>>;

#[fixture]
fn workspace() -> TempDir {
    TempDir::new().expect("create temporary directory")
}

#[fixture]
fn output() -> RefCell<Option<Utf8PathBuf>> {
    RefCell::new(None)
}

#[fixture]
fn outcome() -> OutcomeCell {
    RefCell::new(None)
}

fn gpkg_path(workspace: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(workspace.path().join("bangalore.gpkg")).expect("utf-8 path")
}

fn write_fixture(workspace: &TempDir, with_buildings: bool, corrupt_boundary_feature: bool) {
    let polygon = |min, max| vec![gpkg(&multi(6, &[rectangle(min, max)]))];
    let line = |min, max| vec![gpkg(&line_string(&[min, max]))];
    let mut boundary = polygon(CITY_MIN, CITY_MAX);
    if corrupt_boundary_feature {
        boundary.push(b"junk".to_vec());
    }
    let builder = GeoPackageBuilder::create(gpkg_path(workspace).as_std_path())
        .and_then(|b| b.feature_table("bangalore_boundary", "MULTIPOLYGON", &boundary))
        .and_then(|b| b.feature_table("bbmp_wards", "MULTIPOLYGON", &polygon(WARD_MIN, WARD_MAX)))
        .and_then(|b| b.feature_table("roads", "LINESTRING", &line(WARD_MIN, CITY_MAX)))
        .and_then(|b| b.feature_table("waterways", "LINESTRING", &line(CITY_MIN, WARD_MAX)))
        .and_then(|b| b.feature_table("landuse", "MULTIPOLYGON", &polygon(WARD_MIN, WARD_MAX)));
    if with_buildings {
        builder
            .and_then(|b| b.feature_table("buildings", "MULTIPOLYGON", &polygon(WARD_MIN, WARD_MAX)))
            .expect("write fixture");
    } else {
        builder.expect("write fixture");
    }
}

#[given("a GeoPackage holding every catalogue table")]
fn full_geopackage(#[from(workspace)] workspace: &TempDir) {
    write_fixture(workspace, true, false);
}

#[given("a GeoPackage without a buildings table")]
fn partial_geopackage(#[from(workspace)] workspace: &TempDir) {
    write_fixture(workspace, false, false);
}

#[given("a GeoPackage whose boundary table holds one corrupt feature")]
fn corrupt_boundary_geopackage(#[from(workspace)] workspace: &TempDir) {
    write_fixture(workspace, true, true);
}

#[given("no GeoPackage")]
fn no_geopackage(#[from(workspace)] workspace: &TempDir) {
    assert!(!gpkg_path(workspace).exists());
}

#[when("I build the project into {name}")]
fn build(
    name: String,
    #[from(workspace)] workspace: &TempDir,
    #[from(output)] output: &RefCell<Option<Utf8PathBuf>>,
    #[from(outcome)] outcome: &OutcomeCell,
) {
    let target = Utf8PathBuf::from_path_buf(workspace.path().join(name.trim_matches('"')))
        .expect("utf-8 path");
    let built = build_and_write(&gpkg_path(workspace), &target, &BuildOptions::default())
        .expect("project written");
    *output.borrow_mut() = Some(target);
    *outcome.borrow_mut() = Some(built);
}

#[then("the project has {count} layers")]
fn layer_count(count: usize, #[from(outcome)] outcome: &OutcomeCell) {
    let borrowed = outcome.borrow();
    let built = borrowed.as_ref().expect("build should have run");
    assert_eq!(built.project.layers().len(), count);
}

#[then("the bottom {count} layers are flagged as basemaps")]
fn basemaps_at_bottom(count: usize, #[from(outcome)] outcome: &OutcomeCell) {
    let borrowed = outcome.borrow();
    let built = borrowed.as_ref().expect("build should have run");
    let flags: Vec<bool> = built
        .project
        .layer_tree()
        .nodes()
        .iter()
        .map(|node| node.custom_property(BASEMAP_PROPERTY) == Some(&PropertyValue::Bool(true)))
        .collect();
    let flagged = flags.iter().rev().take_while(|flag| **flag).count();
    assert_eq!(flagged, count);
    assert_eq!(flags.iter().filter(|flag| **flag).count(), count);
}

#[then("the project has exactly one bookmark covering the boundary")]
fn boundary_bookmark(#[from(outcome)] outcome: &OutcomeCell) {
    let borrowed = outcome.borrow();
    let built = borrowed.as_ref().expect("build should have run");
    let bookmarks = built.project.bookmarks();
    assert_eq!(bookmarks.len(), 1);
    let bookmark = bookmarks.first().expect("one bookmark");
    assert_eq!(bookmark.name(), "Bangalore");
    assert_eq!(bookmark.extent(), Rect::new(CITY_MIN, CITY_MAX));
}

#[then("the project has no bookmarks")]
fn no_bookmarks(#[from(outcome)] outcome: &OutcomeCell) {
    let borrowed = outcome.borrow();
    let built = borrowed.as_ref().expect("build should have run");
    assert!(built.project.bookmarks().is_empty());
}

#[then("the {title} layer is reported as skipped")]
fn layer_skipped(title: String, #[from(outcome)] outcome: &OutcomeCell) {
    let borrowed = outcome.borrow();
    let built = borrowed.as_ref().expect("build should have run");
    let subject = title.trim_matches('"');
    assert!(
        built
            .report
            .skipped_records()
            .any(|record| record.step == BuildStep::LoadLayer && record.subject == subject),
        "expected {subject} to be skipped: {:?}",
        built.report
    );
}

#[then("the archive contains {member}")]
fn archive_member(member: String, #[from(output)] output: &RefCell<Option<Utf8PathBuf>>) {
    let borrowed = output.borrow();
    let path = borrowed.as_ref().expect("build should have run");
    let archive =
        zip::ZipArchive::new(File::open(path).expect("open archive")).expect("valid archive");
    let names: Vec<&str> = archive.file_names().collect();
    assert_eq!(names, vec![member.trim_matches('"')]);
}

#[then("the document lists the {title} layer")]
fn document_lists(title: String, #[from(output)] output: &RefCell<Option<Utf8PathBuf>>) {
    let borrowed = output.borrow();
    let path = borrowed.as_ref().expect("build should have run");
    let document = read_project_document(path).expect("read project");
    let expected = format!("<layername>{}</layername>", title.trim_matches('"'));
    assert!(document.contains(&expected));
}

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/project_builder.feature", name = $title)]
        fn $fn_name(
            workspace: TempDir,
            output: RefCell<Option<Utf8PathBuf>>,
            outcome: OutcomeCell,
        ) {
            let _ = (workspace, output, outcome);
        }
    };
}

register_scenario!(
    loads_every_table,
    "every catalogue table is loaded above the basemaps"
);
register_scenario!(bookmarks_boundary, "the boundary extent is bookmarked");
register_scenario!(tolerates_missing_table, "a missing table does not fail the build");
register_scenario!(tolerates_missing_geopackage, "a missing GeoPackage still yields basemaps");
register_scenario!(
    tolerates_corrupt_feature,
    "a corrupt boundary feature still yields the bookmark"
);
register_scenario!(writes_qgz_archive, "a qgz archive holds the project document");
