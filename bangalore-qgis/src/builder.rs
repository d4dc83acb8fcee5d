//! Project build pipeline.
//!
//! The build runs a fixed sequence of steps over an owned [`Project`]:
//! load the catalogue's vector layers, style them, register basemaps, add
//! the boundary bookmark and set the initial view. Every step is optional:
//! a failure is recorded in the [`BuildReport`] and the build carries on.
//! Only writing the result can fail the build.

use std::path::PathBuf;

use bangalore_core::{
    Bookmark, BookmarkError, BuildReport, BuildStep, Crs, GeometryKind, LayerId, LayerSource,
    MapLayer, Project, RasterLayer, VectorLayer, VectorSource, XyzSource,
};
use bangalore_data::GeoPackageSource;
use bangalore_fs::file_is_file;
use camino::Utf8Path;
use log::{info, warn};

use crate::catalogue::{
    BASEMAPS, BOOKMARK_NAME, BOUNDARY_TITLE, PROJECT_TITLE, VECTOR_LAYERS, default_style,
};
use crate::writer::{ProjectWriteError, write_project};

/// Custom layer-tree property marking basemap layers.
pub const BASEMAP_PROPERTY: &str = "isBasemap";

/// Settings applied when creating the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Project title.
    pub title: String,
    /// Project CRS.
    pub crs: Crs,
    /// Home path relative layer paths resolve against.
    pub home_path: Option<PathBuf>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            title: PROJECT_TITLE.to_owned(),
            crs: Crs::WGS84,
            home_path: None,
        }
    }
}

/// A built project and the record of how it was built.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutcome {
    /// The assembled project.
    pub project: Project,
    /// One record per optional step.
    pub report: BuildReport,
}

/// Build the project from `source`, or without vector layers when `None`.
///
/// # Examples
///
/// ```
/// use bangalore_data::GeoPackageSource;
/// use bangalore_qgis::{BuildOptions, build_project};
///
/// let outcome = build_project(None::<&GeoPackageSource>, &BuildOptions::default());
///
/// // Basemaps are always registered.
/// assert_eq!(outcome.project.layers().len(), 3);
/// assert!(outcome.project.bookmarks().is_empty());
/// ```
#[must_use]
pub fn build_project<S>(source: Option<&S>, options: &BuildOptions) -> BuildOutcome
where
    S: LayerSource + ?Sized,
{
    assemble(source, options, BuildReport::default())
}

/// Build from the GeoPackage at `gpkg` when it exists.
///
/// A missing or unreadable GeoPackage skips every vector layer, recording
/// why, and still yields a project with basemaps.
#[must_use]
pub fn build_from_geopackage(gpkg: &Utf8Path, options: &BuildOptions) -> BuildOutcome {
    let source = match file_is_file(gpkg) {
        Ok(true) => GeoPackageSource::open(gpkg.as_std_path()).map_err(|err| err.to_string()),
        Ok(false) => Err(format!("{gpkg} is not a file")),
        Err(err) => Err(format!("{gpkg} not found: {err}")),
    };
    match source {
        Ok(layers) => build_project(Some(&layers), options),
        Err(reason) => {
            info!("skipping vector layers: {reason}");
            let mut report = BuildReport::default();
            for entry in VECTOR_LAYERS {
                record(&mut report, BuildStep::LoadLayer, entry.title, Err(reason.clone()));
            }
            assemble(None::<&GeoPackageSource>, options, report)
        }
    }
}

/// Build from `gpkg` and write the project to `output`.
///
/// # Errors
///
/// Returns [`ProjectWriteError`] when the project cannot be written.
pub fn build_and_write(
    gpkg: &Utf8Path,
    output: &Utf8Path,
    options: &BuildOptions,
) -> Result<BuildOutcome, ProjectWriteError> {
    let outcome = build_from_geopackage(gpkg, options);
    write_project(&outcome.project, output)?;
    Ok(outcome)
}

fn assemble<S>(source: Option<&S>, options: &BuildOptions, mut report: BuildReport) -> BuildOutcome
where
    S: LayerSource + ?Sized,
{
    let mut project = Project::new(options.title.as_str());
    project.set_crs(options.crs);
    if let Some(home) = &options.home_path {
        project.set_home_path(home.clone());
    }

    if let Some(layers) = source {
        load_vector_layers(&mut project, &mut report, layers);
    }
    apply_default_styles(&mut project, &mut report);
    add_basemaps(&mut project, &mut report);
    add_boundary_bookmark(&mut project, &mut report);
    zoom_to_full_extent(&mut project, &mut report);

    BuildOutcome { project, report }
}

fn load_vector_layers<S>(project: &mut Project, report: &mut BuildReport, source: &S)
where
    S: LayerSource + ?Sized,
{
    for entry in VECTOR_LAYERS {
        let loaded = source.load_layer(entry.table).map_err(|err| err.to_string());
        let result = loaded.and_then(|data| {
            let layer = VectorLayer {
                id: project.next_layer_id(entry.title),
                name: entry.title.to_owned(),
                source: VectorSource {
                    path: source.location().to_path_buf(),
                    table: entry.table.to_owned(),
                },
                data,
                symbol: None,
            };
            project
                .add_map_layer(layer)
                .map(drop)
                .map_err(|err| err.to_string())
        });
        record(report, BuildStep::LoadLayer, entry.title, result);
    }
}

fn apply_default_styles(project: &mut Project, report: &mut BuildReport) {
    let targets: Vec<(LayerId, String, GeometryKind)> = project
        .layers()
        .iter()
        .filter_map(MapLayer::as_vector)
        .map(|layer| (layer.id.clone(), layer.name.clone(), layer.data.geometry))
        .collect();

    for (id, name, kind) in targets {
        let result = default_style(&name)
            .ok_or_else(|| "no default style".to_owned())
            .and_then(|style| style.symbol_for(kind).map_err(|err| err.to_string()))
            .and_then(|symbol| match project.layer_mut(&id) {
                Some(MapLayer::Vector(layer)) => {
                    layer.symbol = Some(symbol);
                    Ok(())
                }
                _ => Err(format!("layer {id} disappeared")),
            });
        record(report, BuildStep::Style, &name, result);
    }
}

fn add_basemaps(project: &mut Project, report: &mut BuildReport) {
    for entry in BASEMAPS {
        let source = XyzSource::new(entry.url_template);
        let validity = source.validate().map_err(|err| err.to_string());
        let layer = RasterLayer {
            id: project.next_layer_id(entry.name),
            name: entry.name.to_owned(),
            source,
        };
        let result = project
            .add_map_layer(layer)
            .map_err(|err| err.to_string())
            .and_then(|id| {
                validity?;
                project
                    .layer_tree_mut()
                    .find_layer_mut(&id)
                    .map(|node| node.set_custom_property(BASEMAP_PROPERTY, true))
                    .ok_or_else(|| format!("layer tree has no node for {id}"))
            });
        record(report, BuildStep::Basemap, entry.name, result);
    }
}

fn add_boundary_bookmark(project: &mut Project, report: &mut BuildReport) {
    let Some(boundary) = project.find_layer_by_name(BOUNDARY_TITLE) else {
        record(
            report,
            BuildStep::Bookmark,
            BOOKMARK_NAME,
            Err(format!("layer {BOUNDARY_TITLE:?} not loaded")),
        );
        return;
    };
    let extent = boundary.extent();
    project.set_dirty(true);

    let result = extent
        .ok_or_else(|| BookmarkError::MissingExtent {
            layer: BOUNDARY_TITLE.to_owned(),
        })
        .and_then(|rect| Bookmark::new(BOOKMARK_NAME, rect, project.crs()))
        .and_then(|bookmark| project.add_bookmark(bookmark))
        .map_err(|err| err.to_string());
    record(report, BuildStep::Bookmark, BOOKMARK_NAME, result);
}

fn zoom_to_full_extent(project: &mut Project, report: &mut BuildReport) {
    let result = project
        .full_extent()
        .map(|extent| project.set_view_extent(extent))
        .ok_or_else(|| "no layer has an extent".to_owned());
    record(report, BuildStep::ViewExtent, project.title().to_owned(), result);
}

fn record(
    report: &mut BuildReport,
    step: BuildStep,
    subject: impl Into<String>,
    result: Result<(), String>,
) {
    let subject_text = subject.into();
    match result {
        Ok(()) => {
            info!("{step} {subject_text:?}: applied");
            report.applied(step, subject_text);
        }
        Err(reason) => {
            warn!("{step} {subject_text:?}: skipped ({reason})");
            report.skipped(step, subject_text, reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bangalore_core::test_support::{MemoryLayerSource, layer_data};
    use bangalore_core::{PropertyValue, StepOutcome, Symbol};
    use geo::{Rect, coord};
    use rstest::{fixture, rstest};

    fn rect(min: (f64, f64), max: (f64, f64)) -> Rect<f64> {
        Rect::new(coord! { x: min.0, y: min.1 }, coord! { x: max.0, y: max.1 })
    }

    #[fixture]
    fn full_source() -> MemoryLayerSource {
        let polygon = |r| layer_data(GeometryKind::Polygon, Some(r));
        let line = |r| layer_data(GeometryKind::Line, Some(r));
        MemoryLayerSource::new("/data/bangalore.gpkg")
            .with_table("bangalore_boundary", polygon(rect((77.46, 12.83), (77.78, 13.14))))
            .with_table("bbmp_wards", polygon(rect((77.46, 12.83), (77.78, 13.14))))
            .with_table("roads", line(rect((77.3, 12.7), (77.9, 13.2))))
            .with_table("waterways", line(rect((77.4, 12.8), (77.8, 13.1))))
            .with_table("landuse", polygon(rect((77.4, 12.8), (77.8, 13.1))))
            .with_table("buildings", polygon(rect((77.5, 12.9), (77.7, 13.0))))
    }

    fn names(project: &Project) -> Vec<&str> {
        project
            .layer_tree()
            .nodes()
            .iter()
            .map(|node| node.name.as_str())
            .collect()
    }

    #[rstest]
    fn full_source_loads_every_layer_above_basemaps(full_source: MemoryLayerSource) {
        let outcome = build_project(Some(&full_source), &BuildOptions::default());

        assert_eq!(
            names(&outcome.project),
            vec![
                "Bangalore Boundary",
                "BBMP Wards",
                "Roads",
                "Waterways",
                "Landuse",
                "Buildings",
                "OpenStreetMap",
                "ESRI Satellite",
                "Carto Light",
            ]
        );
        assert_eq!(outcome.report.skipped_records().count(), 0);
        assert_eq!(outcome.project.crs(), Crs::WGS84);
    }

    #[rstest]
    fn vector_sources_point_at_the_container(full_source: MemoryLayerSource) {
        let outcome = build_project(Some(&full_source), &BuildOptions::default());

        let roads = outcome
            .project
            .find_layer_by_name("Roads")
            .and_then(MapLayer::as_vector)
            .expect("roads loaded");
        assert_eq!(roads.source.uri(), "/data/bangalore.gpkg|layername=roads");
    }

    #[rstest]
    fn missing_tables_are_skipped() {
        let source = MemoryLayerSource::new("partial.gpkg").with_table(
            "roads",
            layer_data(GeometryKind::Line, Some(rect((0.0, 0.0), (1.0, 1.0)))),
        );

        let outcome = build_project(Some(&source), &BuildOptions::default());

        assert!(outcome.project.find_layer_by_name("Roads").is_some());
        assert!(outcome.project.find_layer_by_name("Buildings").is_none());
        let skipped_loads = outcome
            .report
            .skipped_records()
            .filter(|r| r.step == BuildStep::LoadLayer)
            .count();
        assert_eq!(skipped_loads, 5);
    }

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "test compares line widths with a tolerance"
    )]
    fn lines_get_configured_width(full_source: MemoryLayerSource) {
        let outcome = build_project(Some(&full_source), &BuildOptions::default());

        let roads = outcome
            .project
            .find_layer_by_name("Roads")
            .and_then(MapLayer::as_vector)
            .expect("roads loaded");
        assert!(matches!(
            roads.symbol,
            Some(Symbol::Line { width, .. }) if (width - 0.8).abs() < f64::EPSILON
        ));
    }

    #[rstest]
    fn point_layers_are_left_unstyled() {
        let source = MemoryLayerSource::new("points.gpkg").with_table(
            "buildings",
            layer_data(GeometryKind::Point, Some(rect((0.0, 0.0), (0.0, 0.0)))),
        );

        let outcome = build_project(Some(&source), &BuildOptions::default());

        let buildings = outcome
            .project
            .find_layer_by_name("Buildings")
            .and_then(MapLayer::as_vector)
            .expect("buildings loaded");
        assert!(buildings.symbol.is_none());
        assert!(
            outcome
                .report
                .skipped_records()
                .any(|r| r.step == BuildStep::Style && r.subject == "Buildings")
        );
    }

    #[rstest]
    fn basemaps_are_flagged(full_source: MemoryLayerSource) {
        let outcome = build_project(Some(&full_source), &BuildOptions::default());
        let tree = outcome.project.layer_tree();

        let flagged: Vec<&str> = tree
            .nodes()
            .iter()
            .filter(|node| {
                node.custom_property(BASEMAP_PROPERTY) == Some(&PropertyValue::Bool(true))
            })
            .map(|node| node.name.as_str())
            .collect();

        assert_eq!(flagged, vec!["OpenStreetMap", "ESRI Satellite", "Carto Light"]);
    }

    #[rstest]
    fn bookmark_covers_boundary_extent(full_source: MemoryLayerSource) {
        let outcome = build_project(Some(&full_source), &BuildOptions::default());

        let bookmarks = outcome.project.bookmarks();
        assert_eq!(bookmarks.len(), 1);
        let bookmark = bookmarks.first().expect("one bookmark");
        assert_eq!(bookmark.name(), "Bangalore");
        assert_eq!(bookmark.extent(), rect((77.46, 12.83), (77.78, 13.14)));
        assert_eq!(bookmark.crs(), Crs::WGS84);
        assert!(outcome.project.is_dirty());
    }

    #[rstest]
    fn boundary_without_extent_skips_bookmark() {
        let source = MemoryLayerSource::new("empty.gpkg")
            .with_table("bangalore_boundary", layer_data(GeometryKind::Polygon, None));

        let outcome = build_project(Some(&source), &BuildOptions::default());

        assert!(outcome.project.bookmarks().is_empty());
        assert!(outcome.project.is_dirty());
        let record = outcome
            .report
            .records()
            .iter()
            .find(|r| r.step == BuildStep::Bookmark)
            .expect("bookmark step recorded");
        assert!(matches!(record.outcome, StepOutcome::Skipped { .. }));
    }

    #[rstest]
    fn view_extent_is_union_of_layers(full_source: MemoryLayerSource) {
        let outcome = build_project(Some(&full_source), &BuildOptions::default());

        assert_eq!(
            outcome.project.view_extent(),
            Some(rect((77.3, 12.7), (77.9, 13.2)))
        );
    }

    #[rstest]
    fn without_source_only_basemaps_remain() {
        let outcome = build_project(None::<&MemoryLayerSource>, &BuildOptions::default());

        assert_eq!(
            names(&outcome.project),
            vec!["OpenStreetMap", "ESRI Satellite", "Carto Light"]
        );
        assert!(!outcome.project.is_dirty());
        assert!(outcome.project.view_extent().is_none());
    }

    #[rstest]
    fn missing_geopackage_records_every_layer() {
        let dir = tempfile::tempdir().expect("temp dir");
        let gpkg = camino::Utf8PathBuf::from_path_buf(dir.path().join("absent.gpkg"))
            .expect("utf-8 path");

        let outcome = build_from_geopackage(&gpkg, &BuildOptions::default());

        let first = outcome.report.records().first().expect("records");
        assert_eq!(first.step, BuildStep::LoadLayer);
        assert_eq!(first.subject, "Bangalore Boundary");
        assert_eq!(
            outcome
                .report
                .skipped_records()
                .filter(|r| r.step == BuildStep::LoadLayer)
                .count(),
            6
        );
        assert_eq!(outcome.project.layers().len(), 3);
    }
}
