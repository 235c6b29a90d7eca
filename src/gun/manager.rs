//! # Gun Manager
//!
//! Owns the weapon entries, the chosen weapon, per-weapon ammo and the recoil
//! animation. Weapons are scene objects; the manager only keeps their ids.
//!
//! Only the chosen weapon is ever animated or drawn. Switching away freezes a
//! weapon in whatever pose and phase it had.

use cgmath::Vector3;

use super::recoil::{RecoilCurve, RecoilPhase};
use crate::config::GunConfig;
use crate::error::GunError;
use crate::gfx::rendering::RenderBackend;
use crate::gfx::scene::{Axis, ObjectId, Scene};

/// One registered weapon
#[derive(Debug, Clone)]
pub struct Gun {
    object: ObjectId,
    ammo: u32,
    capacity: u32,
    recoil: RecoilCurve,
    phase: RecoilPhase,
}

impl Gun {
    pub fn object(&self) -> ObjectId {
        self.object
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn recoil(&self) -> &RecoilCurve {
        &self.recoil
    }

    pub fn phase(&self) -> RecoilPhase {
        self.phase
    }
}

/// Weapon selection, ammo and recoil state machine
#[derive(Debug, Clone)]
pub struct GunManager {
    guns: Vec<Gun>,
    chosen: usize,
    inspect_position: Vector3<f32>,
}

impl GunManager {
    /// Creates an empty manager that inspects weapons at `inspect_position`
    pub fn new(inspect_position: Vector3<f32>) -> Self {
        Self {
            guns: Vec::new(),
            chosen: 0,
            inspect_position,
        }
    }

    pub fn from_config(config: &GunConfig) -> Self {
        Self::new(config.inspect_position)
    }

    /// Registers `object` as a weapon with a full magazine and selects it.
    ///
    /// Returns the weapon's index.
    pub fn add_gun(
        &mut self,
        scene: &Scene,
        object: ObjectId,
        capacity: u32,
        recoil: RecoilCurve,
    ) -> Result<usize, GunError> {
        if scene.object(object).is_none() {
            return Err(GunError::UnknownObject(object));
        }
        if capacity == 0 {
            return Err(GunError::ZeroCapacity);
        }
        recoil.validate()?;

        self.guns.push(Gun {
            object,
            ammo: capacity,
            capacity,
            recoil,
            phase: RecoilPhase::Idle,
        });
        self.chosen = self.guns.len() - 1;

        log::debug!("registered weapon {} ({:?})", self.chosen, object);
        Ok(self.chosen)
    }

    pub fn gun_count(&self) -> usize {
        self.guns.len()
    }

    pub fn gun(&self, index: usize) -> Option<&Gun> {
        self.guns.get(index)
    }

    /// Index of the chosen weapon; `None` until a weapon is registered
    pub fn chosen(&self) -> Option<usize> {
        (!self.guns.is_empty()).then_some(self.chosen)
    }

    pub fn chosen_gun(&self) -> Option<&Gun> {
        self.guns.get(self.chosen)
    }

    /// Rounds left in the chosen weapon
    pub fn ammo(&self) -> Option<u32> {
        self.chosen_gun().map(Gun::ammo)
    }

    pub fn capacity(&self) -> Option<u32> {
        self.chosen_gun().map(Gun::capacity)
    }

    pub fn phase(&self) -> Option<RecoilPhase> {
        self.chosen_gun().map(Gun::phase)
    }

    /// Selects weapon `index`, clamped to the registered range.
    ///
    /// Neither weapon's ammo or animation is touched.
    pub fn switch_gun(&mut self, index: i64) {
        if self.guns.is_empty() {
            return;
        }
        let last = self.guns.len() as i64 - 1;
        let clamped = index.clamp(0, last) as usize;
        if clamped != self.chosen {
            log::debug!("switching weapon {} -> {}", self.chosen, clamped);
        }
        self.chosen = clamped;
    }

    /// Fires the chosen weapon.
    ///
    /// Does nothing when the magazine is empty or a recoil cycle is already
    /// running; shots are never queued.
    pub fn shoot(&mut self) {
        let Some(gun) = self.guns.get_mut(self.chosen) else {
            return;
        };
        if gun.ammo == 0 || gun.phase.in_animation() {
            return;
        }

        gun.ammo -= 1;
        gun.phase = RecoilPhase::Recoiling;
        log::debug!("weapon {} fired, {} rounds left", self.chosen, gun.ammo);
    }

    /// Refills the chosen weapon
    pub fn reload(&mut self) {
        if let Some(gun) = self.guns.get_mut(self.chosen) {
            gun.ammo = gun.capacity;
        }
    }

    /// Snaps the chosen weapon to the inspection pose.
    ///
    /// The recoil phase is left as it was, so a running animation resumes
    /// from the inspection pose on the next update.
    pub fn inspect(&mut self, scene: &mut Scene) {
        let Some(gun) = self.guns.get(self.chosen) else {
            return;
        };

        let transform = scene.transform_mut(gun.object);
        transform.set_local_rotation(Vector3::new(0.0, 0.0, 0.0));
        transform.set_local_position(self.inspect_position);
    }

    /// Advances the chosen weapon's recoil and refreshes its transform
    pub fn update(&mut self, scene: &mut Scene, delta_time: f32) {
        let Some(gun) = self.guns.get_mut(self.chosen) else {
            return;
        };

        if gun.phase.in_animation() {
            let angle = scene.transform(gun.object).local_rotation().z;
            let (next, phase) = gun.recoil.advance(gun.phase, angle, delta_time);

            if phase != gun.phase {
                log::debug!("weapon {} recoil {:?} -> {:?}", self.chosen, gun.phase, phase);
            }
            gun.phase = phase;
            scene
                .transform_mut(gun.object)
                .set_local_rotation_axis(Axis::Z, next);
        }

        let transform = scene[gun.object].transform_id();
        scene.graph_mut().update(transform, false);
    }

    /// Draws the chosen weapon; returns the number of draw calls
    pub fn draw(&self, scene: &Scene, backend: &mut impl RenderBackend) -> u32 {
        match self.guns.get(self.chosen) {
            Some(gun) => scene.draw(gun.object, backend),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rendering::recording::{Call, RecordingBackend};
    use crate::gfx::rendering::{MeshHandle, ShaderHandle};
    use crate::gfx::scene::Renderable;
    use crate::gun::RecoilStep;

    fn setup(count: usize) -> (Scene, GunManager) {
        let mut scene = Scene::new();
        let mut guns = GunManager::from_config(&GunConfig::default());
        for i in 0..count {
            let object = scene.add_object(
                &format!("gun_{}", i),
                Some(Renderable::new(MeshHandle(i as u32), ShaderHandle(0))),
            );
            guns.add_gun(&scene, object, 10, RecoilCurve::default())
                .unwrap();
        }
        (scene, guns)
    }

    fn run_until_idle(scene: &mut Scene, guns: &mut GunManager) -> usize {
        let mut ticks = 0;
        while guns.phase() != Some(RecoilPhase::Idle) {
            guns.update(scene, 1.0 / 60.0);
            ticks += 1;
            assert!(ticks < 1000);
        }
        ticks
    }

    #[test]
    fn test_add_gun_selects_latest() {
        let (_, guns) = setup(3);
        assert_eq!(guns.gun_count(), 3);
        assert_eq!(guns.chosen(), Some(2));
        assert_eq!(guns.ammo(), Some(10));
    }

    #[test]
    fn test_add_gun_validation() {
        let (scene, mut guns) = setup(1);
        assert_eq!(
            guns.add_gun(&scene, ObjectId(50), 10, RecoilCurve::default()),
            Err(GunError::UnknownObject(ObjectId(50)))
        );
        assert_eq!(
            guns.add_gun(&scene, ObjectId(0), 0, RecoilCurve::default()),
            Err(GunError::ZeroCapacity)
        );

        let stuck = RecoilCurve::default().with_step(RecoilStep::PerTick(-1.0));
        assert!(matches!(
            guns.add_gun(&scene, ObjectId(0), 10, stuck),
            Err(GunError::InvalidRecoil(_))
        ));
        assert_eq!(guns.gun_count(), 1);
    }

    #[test]
    fn test_recoil_cycle() {
        let (mut scene, mut guns) = setup(1);
        let object = guns.chosen_gun().unwrap().object();

        guns.shoot();
        assert_eq!(guns.ammo(), Some(9));
        assert_eq!(guns.phase(), Some(RecoilPhase::Recoiling));

        for _ in 0..10 {
            guns.update(&mut scene, 1.0 / 60.0);
        }
        assert_eq!(scene.transform(object).local_rotation().z, 10.0);
        assert_eq!(guns.phase(), Some(RecoilPhase::Returning));

        for _ in 0..10 {
            guns.update(&mut scene, 1.0 / 60.0);
        }
        assert_eq!(scene.transform(object).local_rotation().z, 0.0);
        assert_eq!(guns.phase(), Some(RecoilPhase::Idle));
        assert!(!scene.transform(object).is_dirty());
    }

    #[test]
    fn test_shoot_while_animating_is_dropped() {
        let (mut scene, mut guns) = setup(1);
        guns.shoot();
        guns.update(&mut scene, 0.0);
        guns.shoot();
        guns.shoot();
        assert_eq!(guns.ammo(), Some(9));

        run_until_idle(&mut scene, &mut guns);
        guns.shoot();
        assert_eq!(guns.ammo(), Some(8));
    }

    #[test]
    fn test_ammo_stays_in_bounds() {
        let (mut scene, mut guns) = setup(1);

        for round in 0..25 {
            guns.shoot();
            run_until_idle(&mut scene, &mut guns);
            let ammo = guns.ammo().unwrap();
            assert!(ammo <= 10);
            if round == 5 {
                guns.reload();
                assert_eq!(guns.ammo(), Some(10));
            }
        }

        // Empty magazine: no ammo change, no animation
        assert_eq!(guns.ammo(), Some(0));
        guns.shoot();
        assert_eq!(guns.ammo(), Some(0));
        assert_eq!(guns.phase(), Some(RecoilPhase::Idle));
    }

    #[test]
    fn test_switch_gun_clamps() {
        let (_, mut guns) = setup(2);

        guns.switch_gun(-5);
        assert_eq!(guns.chosen(), Some(0));
        guns.switch_gun(1000);
        assert_eq!(guns.chosen(), Some(1));
        guns.switch_gun(1);
        assert_eq!(guns.chosen(), Some(1));
    }

    #[test]
    fn test_switch_freezes_previous_weapon() {
        let (mut scene, mut guns) = setup(2);
        guns.switch_gun(0);
        guns.shoot();
        guns.update(&mut scene, 0.0);
        guns.update(&mut scene, 0.0);

        guns.switch_gun(1);
        for _ in 0..30 {
            guns.update(&mut scene, 0.0);
        }

        let frozen = guns.gun(0).unwrap();
        assert_eq!(frozen.phase(), RecoilPhase::Recoiling);
        assert_eq!(frozen.ammo(), 9);
        assert_eq!(scene.transform(frozen.object()).local_rotation().z, 2.0);
        assert_eq!(guns.ammo(), Some(10));
    }

    #[test]
    fn test_reload_only_touches_chosen() {
        let (mut scene, mut guns) = setup(2);
        guns.shoot();
        run_until_idle(&mut scene, &mut guns);
        guns.switch_gun(0);
        guns.shoot();
        run_until_idle(&mut scene, &mut guns);

        guns.reload();
        assert_eq!(guns.gun(0).unwrap().ammo(), 10);
        assert_eq!(guns.gun(1).unwrap().ammo(), 9);
    }

    #[test]
    fn test_inspect_overrides_pose_but_keeps_phase() {
        let (mut scene, mut guns) = setup(1);
        let object = guns.chosen_gun().unwrap().object();
        guns.shoot();
        for _ in 0..3 {
            guns.update(&mut scene, 0.0);
        }

        guns.inspect(&mut scene);
        let transform = scene.transform(object);
        assert_eq!(transform.local_rotation(), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(transform.local_position(), GunConfig::default().inspect_position);
        assert_eq!(guns.phase(), Some(RecoilPhase::Recoiling));

        // Animation resumes from the inspection pose
        guns.update(&mut scene, 0.0);
        assert_eq!(scene.transform(object).local_rotation().z, 1.0);
    }

    #[test]
    fn test_per_second_recoil() {
        let mut scene = Scene::new();
        let mut guns = GunManager::new(Vector3::new(0.0, 0.0, -1.0));
        let object = scene.add_object("rifle", None);
        let curve = RecoilCurve::new(10.0, 10.0, RecoilStep::PerSecond(100.0));
        guns.add_gun(&scene, object, 5, curve).unwrap();

        guns.shoot();
        // 0.2s at 100 deg/s covers the whole rise and fall
        guns.update(&mut scene, 0.1);
        assert_eq!(guns.phase(), Some(RecoilPhase::Returning));
        guns.update(&mut scene, 0.1);
        assert_eq!(guns.phase(), Some(RecoilPhase::Idle));
    }

    #[test]
    fn test_draw_only_chosen() {
        let (mut scene, mut guns) = setup(2);
        guns.switch_gun(0);
        guns.update(&mut scene, 0.0);

        let mut backend = RecordingBackend::new();
        assert_eq!(guns.draw(&scene, &mut backend), 1);
        assert_eq!(backend.draws(), vec![&Call::Draw(MeshHandle(0), ShaderHandle(0))]);
    }

    #[test]
    fn test_empty_manager_is_inert() {
        let mut scene = Scene::new();
        let mut guns = GunManager::new(Vector3::new(0.0, 0.0, 0.0));
        guns.switch_gun(3);
        guns.shoot();
        guns.reload();
        guns.inspect(&mut scene);
        guns.update(&mut scene, 0.1);

        let mut backend = RecordingBackend::new();
        assert_eq!(guns.draw(&scene, &mut backend), 0);
        assert_eq!(guns.chosen(), None);
        assert_eq!(guns.ammo(), None);
    }
}
