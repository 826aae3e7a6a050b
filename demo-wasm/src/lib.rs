use drape::{ClothConfig, ClothPrefab, ClothSimulation, ClothVertex, Mat4, Vec3};
use wasm_bindgen::prelude::*;

fn to_js(e: drape::ClothError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// ---- Banner Demo ----

#[wasm_bindgen]
pub struct BannerDemo {
    cloth: ClothSimulation<f32>,
    vertices: Vec<ClothVertex>,
    pole_angle: f32,
    pole_height: f32,
}

#[wasm_bindgen]
impl BannerDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(width: usize, height: usize, flag: bool) -> Result<BannerDemo, JsValue> {
        let prefab = if flag { ClothPrefab::Flag } else { ClothPrefab::Banner };
        // Browsers stall requestAnimationFrame in background tabs; drop that time.
        let config = ClothConfig::new().with_max_frame_delta(0.25);
        let cloth = ClothSimulation::new(width, height, prefab, config).map_err(to_js)?;
        let vertices = cloth.vertices().to_vec();
        Ok(BannerDemo {
            cloth,
            vertices,
            pole_angle: 0.0,
            pole_height: 0.0,
        })
    }

    /// Swing the anchors around the vertical axis and lift them.
    pub fn move_pole(&mut self, angle: f32, height: f32) {
        self.pole_angle = angle;
        self.pole_height = height;
    }

    pub fn toggle_wind(&mut self, x: f32, y: f32, z: f32, magnitude: f32, fancy: bool) {
        self.cloth.set_wind(Vec3::new(x, y, z), magnitude, fancy);
    }

    pub fn update(&mut self, dt: f32) -> Result<(), JsValue> {
        let transform = Mat4::from_translation(Vec3::new(0.0, self.pole_height, 0.0))
            * Mat4::from_rotation_y(self.pole_angle);
        let vertices = &mut self.vertices;
        self.cloth
            .update(&transform, dt, |fresh| vertices.copy_from_slice(fresh))
            .map_err(to_js)?;
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), JsValue> {
        self.cloth.reset().map_err(to_js)?;
        self.vertices.copy_from_slice(self.cloth.vertices());
        Ok(())
    }

    /// Returns flat [x0, y0, z0, x1, y1, z1, ...] in particle order
    pub fn positions(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.position).collect()
    }

    /// Returns flat [nx0, ny0, nz0, ...] in particle order
    pub fn normals(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.normal).collect()
    }

    /// Triangle list to draw the cloth with.
    pub fn indices(&self) -> Vec<u32> {
        self.cloth.drawable_indices().to_vec()
    }

    pub fn width(&self) -> usize {
        self.cloth.width()
    }

    pub fn height(&self) -> usize {
        self.cloth.height()
    }
}
