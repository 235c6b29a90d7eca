use cgmath::Vector3;

use super::state::{Attenuation, LightColors, LightState};
use crate::gfx::rendering::{RenderBackend, ShaderHandle};

/// Pushes [`LightState`] to every registered shader
///
/// Lit shaders receive the full light block. Gizmo shaders only get the
/// view-projection and a flat tint derived from the point light colours.
#[derive(Debug, Clone, Default)]
pub struct LightManager {
    pub state: LightState,
    lit_shaders: Vec<ShaderHandle>,
    gizmo_shaders: Vec<ShaderHandle>,
}

impl LightManager {
    pub fn new(state: LightState) -> Self {
        Self {
            state,
            lit_shaders: Vec::new(),
            gizmo_shaders: Vec::new(),
        }
    }

    /// Registers a shader that reads the light block. Duplicates are ignored.
    pub fn add_shader(&mut self, shader: ShaderHandle) {
        if !self.lit_shaders.contains(&shader) {
            self.lit_shaders.push(shader);
        }
    }

    /// Registers an unlit gizmo shader
    pub fn add_gizmo_shader(&mut self, shader: ShaderHandle) {
        if !self.gizmo_shaders.contains(&shader) {
            self.gizmo_shaders.push(shader);
        }
    }

    pub fn shaders(&self) -> &[ShaderHandle] {
        &self.lit_shaders
    }

    /// Uploads the current state to every registered shader
    pub fn update(&self, backend: &mut impl RenderBackend) {
        let state = &self.state;

        for &shader in &self.lit_shaders {
            backend.use_program(shader);
            backend.set_mat4(shader, "VP", &state.view_projection);
            backend.set_vec3(shader, "viewPos", state.view_position);

            backend.set_float(shader, "shininess", state.shininess);
            backend.set_vec3(shader, "offset", state.offset);
            backend.set_int(shader, "chosenInstance", state.chosen_instance);

            let dir = &state.dir_light;
            backend.set_bool(shader, "dirLight.isActive", dir.active);
            backend.set_vec3(shader, "dirLight.direction", dir.direction);
            set_colors(backend, shader, "dirLight", &dir.colors);

            let point = &state.point_light;
            backend.set_bool(shader, "pointLights[0].isActive", point.active);
            backend.set_vec3(shader, "pointLights[0].position", point.position);
            set_attenuation(backend, shader, "pointLights[0]", &point.attenuation);
            set_colors(backend, shader, "pointLights[0]", &point.colors);

            for (i, spot) in state.spot_lights.iter().enumerate() {
                let prefix = format!("spotLights[{}]", i);
                let (cut_off, outer_cut_off) = spot.cut_off_cosines();

                backend.set_bool(shader, &format!("{}.isActive", prefix), spot.active);
                backend.set_vec3(shader, &format!("{}.position", prefix), spot.position);
                backend.set_vec3(shader, &format!("{}.direction", prefix), spot.direction);
                set_attenuation(backend, shader, &prefix, &spot.attenuation);
                set_colors(backend, shader, &prefix, &spot.colors);
                backend.set_float(shader, &format!("{}.cutOff", prefix), cut_off);
                backend.set_float(shader, &format!("{}.outerCutOff", prefix), outer_cut_off);
            }
        }

        let tint = state.point_light.colors.tint();
        for &shader in &self.gizmo_shaders {
            backend.use_program(shader);
            backend.set_mat4(shader, "VP", &state.view_projection);
            backend.set_vec3(shader, "diffuse", tint);
        }
    }

    /// Moves the point light, typically to follow its gizmo
    pub fn set_point_light_position(&mut self, position: Vector3<f32>) {
        self.state.point_light.position = position;
    }
}

fn set_colors(
    backend: &mut impl RenderBackend,
    shader: ShaderHandle,
    prefix: &str,
    colors: &LightColors,
) {
    backend.set_vec3(shader, &format!("{}.colors.ambient", prefix), colors.ambient);
    backend.set_vec3(shader, &format!("{}.colors.diffuse", prefix), colors.diffuse);
    backend.set_vec3(shader, &format!("{}.colors.specular", prefix), colors.specular);
}

fn set_attenuation(
    backend: &mut impl RenderBackend,
    shader: ShaderHandle,
    prefix: &str,
    attenuation: &Attenuation,
) {
    backend.set_float(shader, &format!("{}.att.constant", prefix), attenuation.constant);
    backend.set_float(shader, &format!("{}.att.linear", prefix), attenuation.linear);
    backend.set_float(shader, &format!("{}.att.quadratic", prefix), attenuation.quadratic);
}
