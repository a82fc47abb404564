/// A camera component the simulation tool knows how to import.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraModel {
    pub name: &'static str,
    /// Component file the external tool expects to find in its library.
    pub component_file: &'static str,
    pub width_mm: f64,
    pub height_mm: f64,
}

pub static CAMERA_MODELS: [CameraModel; 2] = [
    CameraModel {
        name: "MD15342X1",
        component_file: "MD15342X1.a3dcomp",
        width_mm: 14.81,
        height_mm: 12.21,
    },
    CameraModel {
        name: "WLF01",
        component_file: "WLF01.a3dcomp",
        width_mm: 10.96,
        height_mm: 10.96,
    },
];

pub fn catalog() -> &'static [CameraModel] {
    &CAMERA_MODELS
}

pub fn default_model() -> &'static CameraModel {
    &CAMERA_MODELS[0]
}

pub fn find_model(name: &str) -> Option<&'static CameraModel> {
    CAMERA_MODELS.iter().find(|model| model.name == name)
}
