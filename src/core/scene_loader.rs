// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::core::bsdf::Material;
use crate::core::integrator::IntegratorKind;
use crate::core::scene::Scene;
use crate::emitters::background::BackgroundEmitter;
use crate::emitters::point::PointEmitter;
use crate::materials::mirror::MirrorBSDF;
use crate::materials::phong::PhongBSDF;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use crate::sensors::perspective::PerspectiveCamera;
use crate::shapes::cylinder::Cylinder;
use crate::shapes::sphere::Sphere;
use crate::shapes::triangle::Triangle;

#[derive(Debug)]
pub enum SceneLoadError {
    Io(std::io::Error),
    Parse(String),
    MissingField(&'static str),
}

impl From<std::io::Error> for SceneLoadError {
    fn from(err: std::io::Error) -> Self {
        SceneLoadError::Io(err)
    }
}

impl From<quick_xml::Error> for SceneLoadError {
    fn from(err: quick_xml::Error) -> Self {
        SceneLoadError::Parse(err.to_string())
    }
}

impl fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneLoadError::Io(err) => write!(f, "I/O error: {}", err),
            SceneLoadError::Parse(msg) => write!(f, "parse error: {}", msg),
            SceneLoadError::MissingField(field) => write!(f, "missing field: {}", field),
        }
    }
}

impl std::error::Error for SceneLoadError {}

/// Scene plus the render settings found in its `<integrator>` element.
pub struct SceneLoadResult {
    pub scene: Scene,
    pub integrator: Option<IntegratorKind>,
    pub iterations: Option<usize>,
    pub max_path_length: Option<usize>,
    pub seed: Option<u64>,
}

pub fn load_scene_with_settings<P: AsRef<Path>>(path: P) -> Result<SceneLoadResult, SceneLoadError> {
    let path = path.as_ref();
    log::info!("Loading scene from {}.", path.display());
    let xml = fs::read_to_string(path)?;
    parse_scene(&xml)
}

type Attributes = HashMap<String, String>;

pub fn parse_scene(xml: &str) -> Result<SceneLoadResult, SceneLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut defaults: HashMap<String, String> = HashMap::new();
    let mut integrator: Option<Attributes> = None;
    let mut sensor: Option<Attributes> = None;
    let mut bsdfs: Vec<Attributes> = Vec::new();
    let mut shapes: Vec<Attributes> = Vec::new();
    let mut emitters: Vec<Attributes> = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                match e.name().as_ref() {
                    b"scene" => {}
                    b"default" => {
                        let attrs = collect_attributes(&e, &defaults)?;
                        let name = required(&attrs, "default.name")?.to_string();
                        let value = required(&attrs, "default.value")?.to_string();
                        defaults.insert(name, value);
                    }
                    b"integrator" => integrator = Some(collect_attributes(&e, &defaults)?),
                    b"sensor" => sensor = Some(collect_attributes(&e, &defaults)?),
                    b"bsdf" => bsdfs.push(collect_attributes(&e, &defaults)?),
                    b"shape" => shapes.push(collect_attributes(&e, &defaults)?),
                    b"emitter" => emitters.push(collect_attributes(&e, &defaults)?),
                    other => {
                        return Err(SceneLoadError::Parse(
                            format!("unknown element <{}>", String::from_utf8_lossy(other))));
                    }
                }
            }
            Err(e) => {
                return Err(SceneLoadError::Parse(e.to_string()));
            }
            _ => {}
        }

        buf.clear();
    }

    let sensor = sensor.ok_or(SceneLoadError::MissingField("sensor"))?;
    let mut scene = Scene::new(Box::new(build_camera(&sensor)?));

    let mut material_ids: HashMap<String, usize> = HashMap::new();
    for attrs in &bsdfs {
        let id = required(attrs, "bsdf.id")?.to_string();
        let material_id = scene.add_material(build_material(attrs)?);
        material_ids.insert(id, material_id);
    }

    for attrs in &shapes {
        let bsdf = required(attrs, "shape.bsdf")?;
        let material_id = *material_ids.get(bsdf)
            .ok_or_else(|| SceneLoadError::Parse(format!("missing bsdf ref: {}", bsdf)))?;
        let shape_type = required(attrs, "shape.type")?;
        match shape_type {
            "triangle" => {
                let p0 = parse_vec3(required(attrs, "shape.p0")?)?;
                let p1 = parse_vec3(required(attrs, "shape.p1")?)?;
                let p2 = parse_vec3(required(attrs, "shape.p2")?)?;
                scene.add_shape(Box::new(Triangle::new(p0, p1, p2, material_id)));
            }
            "sphere" => {
                let center = parse_vec3(required(attrs, "shape.center")?)?;
                let radius = parse_float(required(attrs, "shape.radius")?)?;
                scene.add_shape(Box::new(Sphere::new(center, radius, material_id)));
            }
            "cylinder" => {
                let bottom = parse_vec3(required(attrs, "shape.bottom")?)?;
                let top = parse_vec3(required(attrs, "shape.top")?)?;
                let outer = parse_float(required(attrs, "shape.outer_radius")?)?;
                let inner = optional_float(attrs, "inner_radius", 0.0)?;
                scene.add_shape(Box::new(Cylinder::new(bottom, top, outer, inner, material_id)));
            }
            other => return Err(SceneLoadError::Parse(format!("unsupported shape: {}", other))),
        }
    }

    for attrs in &emitters {
        match required(attrs, "emitter.type")? {
            "area" => {
                let p0 = parse_vec3(required(attrs, "emitter.p0")?)?;
                let p1 = parse_vec3(required(attrs, "emitter.p1")?)?;
                let p2 = parse_vec3(required(attrs, "emitter.p2")?)?;
                let radiance = parse_vec3_spectrum(required(attrs, "emitter.radiance")?)?;
                scene.add_area_light(p0, p1, p2, radiance);
            }
            "point" => {
                let position = parse_vec3(required(attrs, "emitter.position")?)?;
                let intensity = parse_vec3_spectrum(required(attrs, "emitter.intensity")?)?;
                scene.add_light(PointEmitter::new(position, intensity).into());
            }
            "background" => {
                let radiance = parse_vec3_spectrum(required(attrs, "emitter.radiance")?)?;
                scene.add_light(BackgroundEmitter::new(radiance).into());
            }
            other => return Err(SceneLoadError::Parse(format!("unsupported emitter: {}", other))),
        }
    }

    let mut result = SceneLoadResult {
        scene,
        integrator: None,
        iterations: None,
        max_path_length: None,
        seed: None,
    };
    if let Some(attrs) = integrator {
        if let Some(kind) = attrs.get("type") {
            result.integrator = Some(kind.parse::<IntegratorKind>().map_err(SceneLoadError::Parse)?);
        }
        if let Some(value) = attrs.get("iterations") {
            result.iterations = Some(parse_usize(value)?);
        }
        if let Some(value) = attrs.get("max_path_length") {
            result.max_path_length = Some(parse_usize(value)?);
        }
        if let Some(value) = attrs.get("seed") {
            result.seed = Some(parse_u64(value)?);
        }
    }

    log::info!("Scene loaded: {} shapes, {} materials, {} lights.",
               result.scene.shape_count(), result.scene.material_count(), result.scene.light_count());
    Ok(result)
}

fn collect_attributes(e: &BytesStart, defaults: &HashMap<String, String>) -> Result<Attributes, SceneLoadError> {
    let mut attrs = Attributes::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| SceneLoadError::Parse(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = resolve_value(&attr.unescape_value()?, defaults);
        attrs.insert(key, value);
    }
    Ok(attrs)
}

// Fields are named `element.attribute`; the lookup uses the attribute part.
fn required<'a>(attrs: &'a Attributes, field: &'static str) -> Result<&'a str, SceneLoadError> {
    let key = field.rsplit('.').next().unwrap_or(field);
    attrs.get(key).map(|v| v.as_str()).ok_or(SceneLoadError::MissingField(field))
}

fn optional_float(attrs: &Attributes, key: &str, default: Float) -> Result<Float, SceneLoadError> {
    match attrs.get(key) {
        Some(value) => parse_float(value),
        None => Ok(default),
    }
}

fn build_camera(attrs: &Attributes) -> Result<PerspectiveCamera, SceneLoadError> {
    let fov_deg = optional_float(attrs, "fov", 45.0)?;
    let width = match attrs.get("width") { Some(v) => parse_usize(v)?, None => 256 };
    let height = match attrs.get("height") { Some(v) => parse_usize(v)?, None => 256 };
    let origin = parse_vec3(required(attrs, "sensor.origin")?)?;
    let target = parse_vec3(required(attrs, "sensor.target")?)?;
    let up = match attrs.get("up") { Some(v) => parse_vec3(v)?, None => Vector3f::new(0.0, 1.0, 0.0) };
    if width == 0 || height == 0 {
        return Err(SceneLoadError::Parse(format!("invalid film size {}x{}", width, height)));
    }

    Ok(PerspectiveCamera::new(origin, target, up, fov_deg.to_radians(), width, height))
}

fn build_material(attrs: &Attributes) -> Result<Material, SceneLoadError> {
    match required(attrs, "bsdf.type")? {
        "phong" | "diffuse" => {
            let diffuse = match attrs.get("diffuse") {
                Some(v) => parse_vec3_spectrum(v)?,
                None => RGBSpectrum::new(0.5, 0.5, 0.5),
            };
            let glossy = match attrs.get("glossy") {
                Some(v) => parse_vec3_spectrum(v)?,
                None => RGBSpectrum::zeros(),
            };
            let exponent = optional_float(attrs, "exponent", 1.0)?;
            Ok(PhongBSDF::new(diffuse, glossy, exponent).into())
        }
        "mirror" => {
            let reflectance = match attrs.get("reflectance") {
                Some(v) => parse_vec3_spectrum(v)?,
                None => RGBSpectrum::new(1.0, 1.0, 1.0),
            };
            Ok(MirrorBSDF::new(reflectance).into())
        }
        other => Err(SceneLoadError::Parse(format!("unsupported bsdf: {}", other))),
    }
}

fn resolve_value(raw: &str, defaults: &HashMap<String, String>) -> String {
    let mut out = raw.to_string();
    for (k, v) in defaults {
        out = out.replace(&format!("${}", k), v);
    }
    out
}

fn parse_float(value: &str) -> Result<Float, SceneLoadError> {
    value.trim().parse::<Float>().map_err(|_| SceneLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_u64(value: &str) -> Result<u64, SceneLoadError> {
    value.trim().parse::<u64>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_usize(value: &str) -> Result<usize, SceneLoadError> {
    value.trim().parse::<usize>().map_err(|_| SceneLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_vec3(value: &str) -> Result<Vector3f, SceneLoadError> {
    let mut parts = value.split(',').map(|s| s.trim()).filter(|s| !s.is_empty());
    let x = parts.next().ok_or_else(|| SceneLoadError::Parse(format!("invalid vec3: {}", value)))?;
    let y = parts.next().ok_or_else(|| SceneLoadError::Parse(format!("invalid vec3: {}", value)))?;
    let z = parts.next().ok_or_else(|| SceneLoadError::Parse(format!("invalid vec3: {}", value)))?;
    if parts.next().is_some() {
        return Err(SceneLoadError::Parse(format!("invalid vec3: {}", value)));
    }
    Ok(Vector3f::new(parse_float(x)?, parse_float(y)?, parse_float(z)?))
}

fn parse_vec3_spectrum(value: &str) -> Result<RGBSpectrum, SceneLoadError> {
    let v = parse_vec3(value)?;
    Ok(RGBSpectrum::new(v.x, v.y, v.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ray::Ray3f;

    const SCENE: &str = r#"
        <scene>
          <default name="white" value="0.8,0.8,0.8"/>
          <integrator type="mis" iterations="8" max_path_length="6" seed="42"/>
          <sensor fov="45" width="32" height="16" origin="0,0,5" target="0,0,0" up="0,1,0"/>
          <bsdf id="white" type="phong" diffuse="$white" glossy="0,0,0" exponent="1"/>
          <bsdf id="chrome" type="mirror" reflectance="0.9,0.9,0.9"/>
          <shape type="triangle" bsdf="white" p0="-1,-1,0" p1="1,-1,0" p2="0,1,0"/>
          <shape type="sphere" bsdf="chrome" center="0,0,-3" radius="0.5"/>
          <shape type="cylinder" bsdf="white" bottom="2,0,0" top="2,1,0" outer_radius="0.3" inner_radius="0.2"/>
          <emitter type="area" p0="-1,3,-1" p1="1,3,-1" p2="0,3,1" radiance="5,5,5"/>
          <emitter type="point" position="0,2,2" intensity="1,1,1"/>
          <emitter type="background" radiance="0.1,0.1,0.1"/>
        </scene>
    "#;

    #[test]
    fn test_parse_full_scene() {
        let result = parse_scene(SCENE).expect("scene should parse");
        assert_eq!(result.integrator, Some(IntegratorKind::Mis));
        assert_eq!(result.iterations, Some(8));
        assert_eq!(result.max_path_length, Some(6));
        assert_eq!(result.seed, Some(42));

        let scene = &result.scene;
        // Three declared shapes plus the area light triangle.
        assert_eq!(scene.shape_count(), 4);
        assert_eq!(scene.light_count(), 3);
        assert!(scene.has_background());
        assert_eq!(scene.sensor().resolution(), (32, 16));

        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        let hit = scene.ray_intersection(&ray).expect("triangle hit");
        assert!((hit.t() - 5.0).abs() < 1e-4);
        match scene.material(hit.material_id()) {
            Material::Phong(phong) => assert!((phong.diffuse().x - 0.8).abs() < 1e-6),
            _ => panic!("expected the substituted phong material"),
        }
    }

    #[test]
    fn test_missing_sensor() {
        let err = parse_scene("<scene><bsdf id=\"a\" type=\"phong\"/></scene>").err();
        assert!(matches!(err, Some(SceneLoadError::MissingField("sensor"))));
    }

    #[test]
    fn test_bad_values() {
        let bad_float = r#"<scene><sensor origin="0,0,x" target="0,0,0"/></scene>"#;
        assert!(matches!(parse_scene(bad_float).err(), Some(SceneLoadError::Parse(_))));

        let bad_ref = r#"<scene><sensor origin="0,0,1" target="0,0,0"/>
                         <shape type="sphere" bsdf="nope" center="0,0,0" radius="1"/></scene>"#;
        assert!(matches!(parse_scene(bad_ref).err(), Some(SceneLoadError::Parse(_))));

        let missing_radius = r#"<scene><sensor origin="0,0,1" target="0,0,0"/>
                                <bsdf id="a" type="phong"/>
                                <shape type="sphere" bsdf="a" center="0,0,0"/></scene>"#;
        assert!(matches!(parse_scene(missing_radius).err(),
                         Some(SceneLoadError::MissingField("shape.radius"))));

        let bad_integrator = r#"<scene><integrator type="bdpt"/><sensor origin="0,0,1" target="0,0,0"/></scene>"#;
        assert!(matches!(parse_scene(bad_integrator).err(), Some(SceneLoadError::Parse(_))));
    }

    #[test]
    fn test_load_bundled_cornell_box() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/scenes/cornell_box.xml");
        let result = load_scene_with_settings(path).expect("bundled scene");
        assert_eq!(result.integrator, Some(IntegratorKind::Mis));
        assert_eq!(result.iterations, Some(64));
        assert_eq!(result.scene.light_count(), 2);
        assert_eq!(result.scene.shape_count(), 15);
        assert_eq!(result.scene.material_count(), 6);
    }

    #[test]
    fn test_missing_file() {
        let err = load_scene_with_settings("/nonexistent/lightpath/scene.xml").err();
        assert!(matches!(err, Some(SceneLoadError::Io(_))));
        assert!(err.map(|e| e.to_string().starts_with("I/O error")).unwrap_or(false));
    }
}
