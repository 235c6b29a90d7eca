//! Light parameters shared by every lit shader

use cgmath::{Matrix4, SquareMatrix, Vector3};

/// Ambient / diffuse / specular colour triple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightColors {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl LightColors {
    pub fn uniform(value: f32) -> Self {
        Self {
            ambient: Vector3::new(value, value, value),
            diffuse: Vector3::new(value, value, value),
            specular: Vector3::new(value, value, value),
        }
    }

    /// Component-wise product of the three colours, used to tint gizmos
    pub fn tint(&self) -> Vector3<f32> {
        Vector3::new(
            self.ambient.x * self.diffuse.x * self.specular.x,
            self.ambient.y * self.diffuse.y * self.specular.y,
            self.ambient.z * self.diffuse.z * self.specular.z,
        )
    }
}

impl Default for LightColors {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// Distance falloff: `1 / (constant + linear * d + quadratic * d^2)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for Attenuation {
    fn default() -> Self {
        Self {
            constant: 1.0,
            linear: 0.7,
            quadratic: 1.8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirLight {
    pub active: bool,
    pub direction: Vector3<f32>,
    pub colors: LightColors,
}

impl Default for DirLight {
    fn default() -> Self {
        Self {
            active: true,
            direction: Vector3::new(0.0, 0.0, 0.0),
            colors: LightColors {
                ambient: Vector3::new(0.19, 0.19, 0.19),
                diffuse: Vector3::new(0.0, 0.0, 0.0),
                specular: Vector3::new(0.0, 0.0, 0.0),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub active: bool,
    pub position: Vector3<f32>,
    pub colors: LightColors,
    pub attenuation: Attenuation,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            active: false,
            position: Vector3::new(0.0, 0.0, 0.0),
            colors: LightColors::default(),
            attenuation: Attenuation::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub active: bool,
    pub position: Vector3<f32>,
    /// Also drives the gizmo's Euler rotation
    pub direction: Vector3<f32>,
    pub colors: LightColors,
    pub attenuation: Attenuation,
    /// Inner cone half-angle in degrees
    pub cut_off: f32,
    /// Outer cone half-angle in degrees
    pub outer_cut_off: f32,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            active: false,
            position: Vector3::new(0.0, 0.0, 0.0),
            direction: Vector3::new(0.0, 0.0, 0.0),
            colors: LightColors::default(),
            attenuation: Attenuation::default(),
            cut_off: 12.5,
            outer_cut_off: 17.5,
        }
    }
}

impl SpotLight {
    /// Cosines of the inner and outer cut-off angles, as the shaders expect
    pub fn cut_off_cosines(&self) -> (f32, f32) {
        (
            self.cut_off.to_radians().cos(),
            self.outer_cut_off.to_radians().cos(),
        )
    }
}

/// Addresses one light in [`LightState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightSlot {
    Directional,
    Point,
    Spot(usize),
}

/// Number of spot lights the shaders declare
pub const SPOT_LIGHT_COUNT: usize = 2;

/// Everything the lit shaders read each frame
#[derive(Debug, Clone, PartialEq)]
pub struct LightState {
    pub view_projection: Matrix4<f32>,
    pub view_position: Vector3<f32>,
    pub shininess: f32,
    /// Extra offset the light shader applies to the chosen instance
    pub offset: Vector3<f32>,
    pub chosen_instance: i32,
    pub dir_light: DirLight,
    pub point_light: PointLight,
    pub spot_lights: [SpotLight; SPOT_LIGHT_COUNT],
}

impl Default for LightState {
    fn default() -> Self {
        Self {
            view_projection: Matrix4::identity(),
            view_position: Vector3::new(0.0, 0.0, 0.0),
            shininess: 2.0,
            offset: Vector3::new(0.0, 0.0, 0.0),
            chosen_instance: 0,
            dir_light: DirLight::default(),
            point_light: PointLight::default(),
            spot_lights: [SpotLight::default(); SPOT_LIGHT_COUNT],
        }
    }
}

impl LightState {
    /// Whether the light in `slot` is switched on. Unknown spot slots are off.
    pub fn is_active(&self, slot: LightSlot) -> bool {
        match slot {
            LightSlot::Directional => self.dir_light.active,
            LightSlot::Point => self.point_light.active,
            LightSlot::Spot(i) => self.spot_lights.get(i).is_some_and(|s| s.active),
        }
    }

    /// Switches the light in `slot` on or off
    pub fn set_active(&mut self, slot: LightSlot, active: bool) {
        match slot {
            LightSlot::Directional => self.dir_light.active = active,
            LightSlot::Point => self.point_light.active = active,
            LightSlot::Spot(i) => match self.spot_lights.get_mut(i) {
                Some(spot) => spot.active = active,
                None => log::warn!("no spot light in slot {}", i),
            },
        }
    }

    pub fn colors(&self, slot: LightSlot) -> Option<&LightColors> {
        match slot {
            LightSlot::Directional => Some(&self.dir_light.colors),
            LightSlot::Point => Some(&self.point_light.colors),
            LightSlot::Spot(i) => self.spot_lights.get(i).map(|s| &s.colors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = LightState::default();
        assert_eq!(state.shininess, 2.0);
        assert!(state.is_active(LightSlot::Directional));
        assert!(!state.is_active(LightSlot::Point));
        assert_eq!(state.dir_light.colors.ambient, Vector3::new(0.19, 0.19, 0.19));
        assert_eq!(state.point_light.attenuation.linear, 0.7);
        assert_eq!(state.spot_lights[1].outer_cut_off, 17.5);
    }

    #[test]
    fn test_cut_off_cosines() {
        let spot = SpotLight {
            cut_off: 60.0,
            outer_cut_off: 90.0,
            ..SpotLight::default()
        };
        let (inner, outer) = spot.cut_off_cosines();
        assert!((inner - 0.5).abs() < 1e-6);
        assert!(outer.abs() < 1e-6);
    }

    #[test]
    fn test_slots() {
        let mut state = LightState::default();
        state.set_active(LightSlot::Spot(1), true);
        assert!(state.is_active(LightSlot::Spot(1)));
        assert!(!state.is_active(LightSlot::Spot(0)));

        state.set_active(LightSlot::Spot(7), true);
        assert!(!state.is_active(LightSlot::Spot(7)));
        assert!(state.colors(LightSlot::Spot(7)).is_none());
    }

    #[test]
    fn test_tint() {
        let colors = LightColors {
            ambient: Vector3::new(0.5, 1.0, 1.0),
            diffuse: Vector3::new(1.0, 0.5, 1.0),
            specular: Vector3::new(1.0, 1.0, 0.5),
        };
        assert_eq!(colors.tint(), Vector3::new(0.5, 0.5, 0.5));
    }
}
