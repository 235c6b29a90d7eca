//! Demo configuration
//!
//! Plain settings structs with defaults matching the neighbourhood demo.
//! Everything can be adjusted with the `with_*` builders before the scene is
//! built; nothing here is read again once the frame loop runs.

use cgmath::Vector3;

use crate::gun::RecoilCurve;

/// Layout of the instanced house grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub rows: u32,
    pub columns: u32,
    /// Distance between neighbouring houses along both axes
    pub spacing: f32,
    /// World position the first row starts from
    pub origin: Vector3<f32>,
    /// Lift applied to every house so it sits on the ground plane
    pub house_height: f32,
    /// Roof position relative to its house
    pub roof_offset: Vector3<f32>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 200,
            columns: 200,
            spacing: 3.0,
            origin: Vector3::new(-400.0, 0.0, -400.0),
            house_height: 1.5,
            roof_offset: Vector3::new(0.0, 2.0, 0.0),
        }
    }
}

impl GridConfig {
    pub fn with_size(mut self, rows: u32, columns: u32) -> Self {
        self.rows = rows;
        self.columns = columns;
        self
    }

    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_origin(mut self, origin: Vector3<f32>) -> Self {
        self.origin = origin;
        self
    }

    /// Total number of houses (and roofs)
    pub fn house_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }
}

/// Weapon defaults
#[derive(Debug, Clone, PartialEq)]
pub struct GunConfig {
    /// Rounds restored by a reload
    pub capacity: u32,
    /// Resting pose relative to the camera
    pub rest_position: Vector3<f32>,
    pub rest_rotation: Vector3<f32>,
    /// Pose the weapon snaps to when inspected
    pub inspect_position: Vector3<f32>,
    pub recoil: RecoilCurve,
}

impl Default for GunConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            rest_position: Vector3::new(0.0, -0.8, -1.5),
            rest_rotation: Vector3::new(0.0, 90.0, 0.0),
            inspect_position: Vector3::new(0.0, -0.5, -1.0),
            recoil: RecoilCurve::default(),
        }
    }
}

impl GunConfig {
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_recoil(mut self, recoil: RecoilCurve) -> Self {
        self.recoil = recoil;
        self
    }
}

/// Top-level settings for [`NeighbourhoodApp`](crate::app::NeighbourhoodApp)
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub grid: GridConfig,
    pub gun: GunConfig,
    /// Uniform scale of the light gizmo meshes
    pub gizmo_scale: f32,
    /// Degrees per second the point light gizmo spins about X and Y
    pub gizmo_spin: f32,
    /// Radius of the point light orbit
    pub orbit_radius: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            gun: GunConfig::default(),
            gizmo_scale: 0.2,
            gizmo_spin: 15.0,
            orbit_radius: 10.0,
        }
    }
}

impl DemoConfig {
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_gun(mut self, gun: GunConfig) -> Self {
        self.gun = gun;
        self
    }
}
