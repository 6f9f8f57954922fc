// src/loader/json_loader.rs
use crate::config::MapConfig;
use crate::error::MapError;
use crate::map::*;
use macroquad::prelude::*;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(default)]
    data: Vec<u32>,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    objects: Vec<JsonObject>,
}

#[derive(Deserialize)]
struct JsonMap {
    #[serde(default)]
    width: Option<usize>,
    #[serde(default)]
    height: Option<usize>,
    layers: Vec<JsonLayer>,
}

#[derive(Deserialize)]
struct JsonObject {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    class: String,
    x: f32,
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
}

fn object_from_json(obj: JsonObject) -> MapObject {
    let class_name = if !obj.class.is_empty() {
        obj.class
    } else {
        obj.kind
    };

    MapObject {
        id: obj.id,
        name: obj.name,
        class_name,
        rect: Rect::new(obj.x, obj.y, obj.width, obj.height),
    }
}

pub(crate) fn decode_map_file(p: &Path, dims: &MapConfig) -> Result<MapDocument, MapError> {
    match p.extension().and_then(|e| e.to_str()) {
        Some("json") | Some("tmj") => {}
        _ => return Err(MapError::UnsupportedFormat(p.display().to_string())),
    }

    let txt = std::fs::read_to_string(p).map_err(|source| MapError::Io {
        path: p.to_path_buf(),
        source,
    })?;
    decode_map_str(&txt, p, dims)
}

pub(crate) fn decode_map_str(
    txt: &str,
    origin: impl AsRef<Path>,
    dims: &MapConfig,
) -> Result<MapDocument, MapError> {
    let origin = origin.as_ref();
    let j: JsonMap = serde_json::from_str(txt).map_err(|source| MapError::json(origin, source))?;

    if let (Some(w), Some(h)) = (j.width, j.height) {
        if w != dims.width || h != dims.height {
            warn!(
                map = %origin.display(),
                declared_width = w,
                declared_height = h,
                width = dims.width,
                height = dims.height,
                "map declares different dimensions than configured"
            );
        }
    }

    // Every record needs a discriminator before anything is built.
    for (index, l) in j.layers.iter().enumerate() {
        if l.kind.is_none() {
            return Err(MapError::MissingLayerType { index });
        }
    }

    let tile_layer_count = j
        .layers
        .iter()
        .filter(|l| l.kind.as_deref() == Some("tilelayer"))
        .count();

    let mut tile_layers = Vec::with_capacity(tile_layer_count);
    let mut object_layers = Vec::new();
    for l in j.layers {
        match l.kind.as_deref() {
            Some("tilelayer") => {
                debug!(layer = %l.name, cells = l.data.len(), "tile layer");
                tile_layers.push(TileLayer::from_cells(
                    l.name,
                    dims.width,
                    dims.height,
                    l.data,
                )?);
            }
            Some("objectgroup") => {
                debug!(layer = %l.name, objects = l.objects.len(), "object layer");
                object_layers.push(ObjectLayer {
                    name: l.name,
                    objects: l.objects.into_iter().map(object_from_json).collect(),
                });
            }
            other => {
                debug!(layer = %l.name, kind = ?other, "skipping unsupported layer type");
            }
        }
    }

    let doc = MapDocument::new(*dims, tile_layers, object_layers);
    info!(
        map = %origin.display(),
        tile_layers = doc.tile_layers().len(),
        object_layers = doc.object_layers().len(),
        objects = doc.objects().count(),
        occupied_cells = doc.tile_layers().iter().map(|l| l.occupied().count()).sum::<usize>(),
        "map loaded"
    );

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> MapConfig {
        MapConfig {
            width: 2,
            height: 2,
            tile_size: 32,
        }
    }

    #[test]
    fn classifies_layers_by_type() {
        let json = r#"{
          "layers": [
            { "type":"tilelayer", "name":"ground", "data":[1,0,0,2] },
            { "type":"imagelayer", "name":"sky", "image":"sky.png" },
            { "type":"objectgroup", "name":"Object Layer 1",
              "objects":[ {"id":4,"name":"rock","class":"solid","x":8,"y":16,"width":32,"height":8} ] },
            { "type":"tilelayer", "name":"deco", "data":[0,0,3,0] }
          ]
        }"#;
        let doc = decode_map_str(json, "<test>", &tiny()).expect("decode");

        assert_eq!(doc.tile_layers().len(), 2);
        assert_eq!(doc.tile_layers()[0].name(), "ground");
        assert_eq!(doc.tile_layers()[1].get(1, 0), Some(3));
        assert_eq!(doc.object_layers().len(), 1);

        let obj = &doc.object_layer("Object Layer 1").unwrap().objects[0];
        assert_eq!(obj.id, 4);
        assert_eq!(obj.class_name, "solid");
        assert_eq!(obj.rect, Rect::new(8.0, 16.0, 32.0, 8.0));
    }

    #[test]
    fn legacy_type_field_fills_class_name() {
        let json = r#"{ "layers": [ { "type":"objectgroup", "name":"o",
            "objects":[ {"type":"door","x":0,"y":0} ] } ] }"#;
        let doc = decode_map_str(json, "<test>", &tiny()).unwrap();
        let obj = &doc.object_layers()[0].objects[0];
        assert_eq!(obj.class_name, "door");
        assert_eq!(obj.rect.w, 0.0);
    }

    #[test]
    fn missing_layers_is_a_json_error() {
        let err = decode_map_str(r#"{ "width": 2 }"#, "<test>", &tiny()).unwrap_err();
        assert!(matches!(err, MapError::Json { .. }));
    }

    #[test]
    fn non_numeric_tile_ids_are_rejected() {
        let json = r#"{ "layers": [ { "type":"tilelayer", "name":"g", "data":[1,"x",0,0] } ] }"#;
        let err = decode_map_str(json, "<test>", &tiny()).unwrap_err();
        assert!(matches!(err, MapError::Json { .. }));
    }

    #[test]
    fn negative_tile_ids_are_rejected() {
        let json = r#"{ "layers": [ { "type":"tilelayer", "name":"g", "data":[1,-1,0,0] } ] }"#;
        let err = decode_map_str(json, "<test>", &tiny()).unwrap_err();
        assert!(matches!(err, MapError::Json { .. }));
    }

    #[test]
    fn too_many_cells_are_rejected() {
        let json = r#"{ "layers": [ { "type":"tilelayer", "name":"big", "data":[0,0,0,0,0] } ] }"#;
        let err = decode_map_str(json, "<test>", &tiny()).unwrap_err();
        assert!(matches!(
            err,
            MapError::InvalidLayerSize { expected: 4, actual: 5, .. }
        ));
    }

    #[test]
    fn layer_without_type_is_rejected() {
        let json = r#"{ "layers": [ { "name":"g", "data":[0,0,0,0] } ] }"#;
        let err = decode_map_str(json, "<test>", &tiny()).unwrap_err();
        assert!(matches!(err, MapError::MissingLayerType { index: 0 }));
    }

    #[test]
    fn object_without_position_is_rejected() {
        let json = r#"{ "layers": [ { "type":"objectgroup", "name":"o",
            "objects":[ {"width":4,"height":4} ] } ] }"#;
        let err = decode_map_str(json, "<test>", &tiny()).unwrap_err();
        assert!(matches!(err, MapError::Json { .. }));
    }

    #[test]
    fn ignores_extra_fields() {
        let json = r#"{
          "width":2, "height":2, "tilewidth":32, "dummyField":"ignored",
          "layers": [ { "type":"tilelayer", "name":"L", "data":[0,0,0,0], "opacity":0.5 } ]
        }"#;
        let doc = decode_map_str(json, "<test>", &tiny()).unwrap();
        assert_eq!(doc.tile_layers()[0].name(), "L");
    }

    #[test]
    fn unsupported_extension() {
        let err = decode_map_file(Path::new("level.tmx"), &tiny()).unwrap_err();
        assert!(matches!(err, MapError::UnsupportedFormat(ext) if ext == "level.tmx"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = decode_map_file(Path::new("nonexistent.tmj"), &tiny()).unwrap_err();
        assert!(matches!(err, MapError::Io { .. }));
    }
}
