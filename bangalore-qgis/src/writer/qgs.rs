//! QGIS project XML.

use std::io::Write;
use std::path::Path;

use bangalore_core::{
    Bookmark, Crs, LayerTreeNode, MapLayer, Project, PropertyValue, RasterLayer, Symbol,
    VectorLayer,
};
use geo::Rect;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::ProjectWriteError;

/// Version string written in the root element.
const QGIS_VERSION: &str = "3.34.0-Prizren";

const OUTLINE_COLOR: &str = "35,35,35,255";
const OUTLINE_WIDTH: &str = "0.26";

/// Write the complete project document to `out`.
pub(super) fn write_document<W: Write>(project: &Project, out: W) -> Result<(), ProjectWriteError> {
    let mut doc = Document {
        xml: Writer::new_with_indent(out, b' ', 2),
    };
    doc.xml
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    doc.open(
        "qgis",
        &[("projectname", project.title()), ("version", QGIS_VERSION)],
    )?;

    let home = project
        .home_path()
        .map(|path| path.display().to_string())
        .unwrap_or_default();
    doc.empty("homePath", &[("path", home.as_str())])?;
    doc.text("title", project.title())?;
    doc.open("projectCrs", &[])?;
    doc.spatial_ref(project.crs())?;
    doc.close("projectCrs")?;

    doc.layer_tree(project)?;
    doc.map_canvas(project)?;

    doc.open("projectlayers", &[])?;
    for layer in project.layers() {
        match layer {
            MapLayer::Vector(vector) => doc.vector_layer(project, vector)?,
            MapLayer::Raster(raster) => doc.raster_layer(project.crs(), raster)?,
        }
    }
    doc.close("projectlayers")?;

    doc.open("layerorder", &[])?;
    for node in project.layer_tree().nodes() {
        doc.empty("layer", &[("id", node.layer_id.as_str())])?;
    }
    doc.close("layerorder")?;

    doc.open("properties", &[])?;
    doc.open("Paths", &[])?;
    doc.typed_text("Absolute", "bool", "false")?;
    doc.close("Paths")?;
    doc.close("properties")?;

    doc.open("Bookmarks", &[])?;
    for (index, bookmark) in project.bookmarks().iter().enumerate() {
        doc.bookmark(index, bookmark)?;
    }
    doc.close("Bookmarks")?;

    doc.close("qgis")?;
    doc.xml.into_inner().flush()?;
    Ok(())
}

struct Document<W: Write> {
    xml: Writer<W>,
}

impl<W: Write> Document<W> {
    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), ProjectWriteError> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.xml.write_event(Event::Start(start))?;
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<(), ProjectWriteError> {
        self.xml.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), ProjectWriteError> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.xml.write_event(Event::Empty(start))?;
        Ok(())
    }

    fn text(&mut self, name: &str, text: &str) -> Result<(), ProjectWriteError> {
        self.open(name, &[])?;
        self.xml.write_event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    fn typed_text(&mut self, name: &str, kind: &str, text: &str) -> Result<(), ProjectWriteError> {
        self.open(name, &[("type", kind)])?;
        self.xml.write_event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    fn option(&mut self, name: &str, kind: &str, value: &str) -> Result<(), ProjectWriteError> {
        self.empty("Option", &[("name", name), ("type", kind), ("value", value)])
    }

    fn spatial_ref(&mut self, crs: Crs) -> Result<(), ProjectWriteError> {
        self.open("spatialrefsys", &[("nativeFormat", "Wkt")])?;
        self.text("authid", &crs.auth_id())?;
        self.text("srid", &crs.epsg().to_string())?;
        self.text("geographicflag", bool_text(crs.is_geographic()))?;
        self.close("spatialrefsys")
    }

    fn extent(&mut self, name: &str, rect: Rect<f64>) -> Result<(), ProjectWriteError> {
        self.open(name, &[])?;
        self.text("xmin", &rect.min().x.to_string())?;
        self.text("ymin", &rect.min().y.to_string())?;
        self.text("xmax", &rect.max().x.to_string())?;
        self.text("ymax", &rect.max().y.to_string())?;
        self.close(name)
    }

    fn layer_tree(&mut self, project: &Project) -> Result<(), ProjectWriteError> {
        self.open("layer-tree-group", &[])?;
        self.empty("customproperties", &[])?;
        for node in project.layer_tree().nodes() {
            let provider = match project.layer(&node.layer_id) {
                Some(MapLayer::Raster(_)) => "wms",
                _ => "ogr",
            };
            self.tree_node(node, provider)?;
        }
        self.close("layer-tree-group")
    }

    fn tree_node(&mut self, node: &LayerTreeNode, provider: &str) -> Result<(), ProjectWriteError> {
        let checked = if node.visible {
            "Qt::Checked"
        } else {
            "Qt::Unchecked"
        };
        self.open(
            "layer-tree-layer",
            &[
                ("id", node.layer_id.as_str()),
                ("name", node.name.as_str()),
                ("checked", checked),
                ("expanded", "1"),
                ("providerKey", provider),
            ],
        )?;
        if node.custom_properties.is_empty() {
            self.empty("customproperties", &[])?;
        } else {
            self.open("customproperties", &[])?;
            self.open("Option", &[("type", "Map")])?;
            for (key, value) in &node.custom_properties {
                match value {
                    PropertyValue::Bool(flag) => self.option(key, "bool", bool_text(*flag))?,
                    PropertyValue::Text(text) => self.option(key, "QString", text)?,
                }
            }
            self.close("Option")?;
            self.close("customproperties")?;
        }
        self.close("layer-tree-layer")
    }

    fn map_canvas(&mut self, project: &Project) -> Result<(), ProjectWriteError> {
        let units = if project.crs().is_geographic() {
            "degrees"
        } else {
            "meters"
        };
        self.open("mapcanvas", &[("name", "theMapCanvas"), ("annotationsVisible", "1")])?;
        self.text("units", units)?;
        if let Some(extent) = project.view_extent() {
            self.extent("extent", extent)?;
        }
        self.open("destinationsrs", &[])?;
        self.spatial_ref(project.crs())?;
        self.close("destinationsrs")?;
        self.close("mapcanvas")
    }

    fn vector_layer(&mut self, project: &Project, layer: &VectorLayer) -> Result<(), ProjectWriteError> {
        let geometry = layer.data.geometry.qgis_name();
        self.open(
            "maplayer",
            &[("type", "vector"), ("geometry", geometry), ("autoRefreshMode", "Disabled")],
        )?;
        if let Some(extent) = layer.data.extent {
            self.extent("extent", extent)?;
        }
        self.text("id", layer.id.as_str())?;
        let datasource = format!(
            "{}|layername={}",
            datasource_path(project.home_path(), &layer.source.path),
            layer.source.table
        );
        self.text("datasource", &datasource)?;
        self.text("layername", &layer.name)?;
        self.open("srs", &[])?;
        self.spatial_ref(layer_crs(layer))?;
        self.close("srs")?;
        self.open("provider", &[("encoding", "UTF-8")])?;
        self.xml.write_event(Event::Text(BytesText::new("ogr")))?;
        self.close("provider")?;
        self.text("featureCount", &layer.data.feature_count.to_string())?;
        if let Some(symbol) = &layer.symbol {
            self.renderer(symbol)?;
        }
        self.close("maplayer")
    }

    fn renderer(&mut self, symbol: &Symbol) -> Result<(), ProjectWriteError> {
        let (symbol_type, class) = match symbol {
            Symbol::Fill { .. } => ("fill", "SimpleFill"),
            Symbol::Line { .. } => ("line", "SimpleLine"),
        };
        self.open("renderer-v2", &[("type", "singleSymbol"), ("symbollevels", "0")])?;
        self.open("symbols", &[])?;
        self.open(
            "symbol",
            &[("type", symbol_type), ("name", "0"), ("alpha", "1"), ("clip_to_extent", "1")],
        )?;
        self.open("layer", &[("class", class), ("enabled", "1"), ("locked", "0")])?;
        self.open("Option", &[("type", "Map")])?;
        match symbol {
            Symbol::Fill { color } => {
                self.option("color", "QString", &color.to_qgis())?;
                self.option("outline_color", "QString", OUTLINE_COLOR)?;
                self.option("outline_style", "QString", "solid")?;
                self.option("outline_width", "QString", OUTLINE_WIDTH)?;
                self.option("style", "QString", "solid")?;
            }
            Symbol::Line { color, width } => {
                self.option("line_color", "QString", &color.to_qgis())?;
                self.option("line_style", "QString", "solid")?;
                self.option("line_width", "QString", &width.to_string())?;
                self.option("line_width_unit", "QString", "MM")?;
            }
        }
        self.close("Option")?;
        self.close("layer")?;
        self.close("symbol")?;
        self.close("symbols")?;
        self.close("renderer-v2")
    }

    fn raster_layer(&mut self, crs: Crs, layer: &RasterLayer) -> Result<(), ProjectWriteError> {
        self.open("maplayer", &[("type", "raster"), ("autoRefreshMode", "Disabled")])?;
        self.text("id", layer.id.as_str())?;
        self.text("datasource", &layer.source.uri())?;
        self.text("layername", &layer.name)?;
        self.open("srs", &[])?;
        self.spatial_ref(crs)?;
        self.close("srs")?;
        self.open("provider", &[("encoding", "")])?;
        self.xml.write_event(Event::Text(BytesText::new("wms")))?;
        self.close("provider")?;
        self.close("maplayer")
    }

    fn bookmark(&mut self, index: usize, bookmark: &Bookmark) -> Result<(), ProjectWriteError> {
        let id = format!("bookmark_{index}");
        let extent = bookmark.extent();
        let (xmin, ymin) = (extent.min().x.to_string(), extent.min().y.to_string());
        let (xmax, ymax) = (extent.max().x.to_string(), extent.max().y.to_string());
        self.open(
            "Bookmark",
            &[
                ("id", id.as_str()),
                ("name", bookmark.name()),
                ("group", ""),
                ("xMin", xmin.as_str()),
                ("yMin", ymin.as_str()),
                ("xMax", xmax.as_str()),
                ("yMax", ymax.as_str()),
            ],
        )?;
        self.spatial_ref(bookmark.crs())?;
        self.close("Bookmark")
    }
}

const fn bool_text(flag: bool) -> &'static str {
    if flag { "true" } else { "false" }
}

fn layer_crs(layer: &VectorLayer) -> Crs {
    u32::try_from(layer.data.srs_id)
        .ok()
        .filter(|code| *code > 0)
        .map_or(Crs::WGS84, Crs::from_epsg)
}

/// Datasource path, relative to `home` with a `./` prefix when inside it.
fn datasource_path(home: Option<&Path>, path: &Path) -> String {
    home.and_then(|dir| path.strip_prefix(dir).ok())
        .filter(|relative| !relative.as_os_str().is_empty())
        .map_or_else(
            || path.display().to_string(),
            |relative| format!("./{}", relative.display()),
        )
}
