//! Camera state, motion, and primary-ray generation.

use helio_math::{Quat, Ray, Vec2, Vec3};
use rand::Rng;

/// Speed applied while a movement key is held, in world units per solve.
const MOVE_SPEED: f32 = 0.1;
/// Rotation applied per solve while a turn key is held, in degrees.
const TURN_DEGREES: f32 = 1.0;
/// |look . worldUp| beyond which a rotation is rejected, keeping the view
/// away from straight up or straight down.
const VERTICAL_LOCK: f32 = 0.9;
/// The world is Z-up.
const WORLD_UP: Vec3 = Vec3::Z;

/// Frustum descriptor; only the image-plane size is derived from it.
#[derive(Debug, Clone, Copy)]
pub struct Perspective {
    /// Horizontal field of view in degrees.
    pub h_fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Perspective {
    pub fn new(h_fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            h_fov,
            aspect,
            near,
            far,
        }
    }

    /// Image-plane extent at unit distance: width = 2 tan(hFov / 2),
    /// height = width / aspect.
    pub fn frustum_size(&self) -> (f32, f32) {
        let width = 2.0 * (self.h_fov.to_radians() / 2.0).tan();
        (width, width / self.aspect)
    }
}

/// Discrete motion inputs the camera consumes.
///
/// The windowing layer maps key events onto these; the camera itself
/// never sees keyboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKey {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    YawLeft,
    YawRight,
    PitchUp,
    PitchDown,
}

/// Viewer position and orientation plus the velocities driven by held
/// keys. `solve` integrates one step; `ray_grid` snapshots the current
/// basis into a primary-ray generator.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    look: Vec3,
    up: Vec3,
    strafe: Vec3,
    /// x: forward speed, y: strafe speed.
    velocity: Vec2,
    rotation: Quat,
    pub perspective: Perspective,
}

impl Camera {
    pub fn new(position: Vec3, up: Vec3, look: Vec3, perspective: Perspective) -> Self {
        let look = look.normalize();
        let up = up.normalize();
        Self {
            position,
            look,
            up,
            strafe: look.cross(up),
            velocity: Vec2::ZERO,
            rotation: Quat::IDENTITY,
            perspective,
        }
    }

    pub fn look(&self) -> Vec3 {
        self.look
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn strafe(&self) -> Vec3 {
        self.strafe
    }

    /// Begin the motion a key maps to.
    pub fn press(&mut self, key: MotionKey) {
        match key {
            MotionKey::Forward => self.velocity.x = MOVE_SPEED,
            MotionKey::Back => self.velocity.x = -MOVE_SPEED,
            MotionKey::StrafeLeft => self.velocity.y = -MOVE_SPEED,
            MotionKey::StrafeRight => self.velocity.y = MOVE_SPEED,
            MotionKey::YawLeft => {
                self.rotation = Quat::from_axis_angle(WORLD_UP, TURN_DEGREES.to_radians())
            }
            MotionKey::YawRight => {
                self.rotation = Quat::from_axis_angle(WORLD_UP, -TURN_DEGREES.to_radians())
            }
            MotionKey::PitchUp => {
                self.rotation = Quat::from_axis_angle(self.strafe, TURN_DEGREES.to_radians())
            }
            MotionKey::PitchDown => {
                self.rotation = Quat::from_axis_angle(self.strafe, -TURN_DEGREES.to_radians())
            }
        }
    }

    /// End the motion a key maps to.
    pub fn release(&mut self, key: MotionKey) {
        match key {
            MotionKey::Forward | MotionKey::Back => self.velocity.x = 0.0,
            MotionKey::StrafeLeft | MotionKey::StrafeRight => self.velocity.y = 0.0,
            MotionKey::YawLeft | MotionKey::YawRight | MotionKey::PitchUp | MotionKey::PitchDown => {
                self.rotation = Quat::IDENTITY
            }
        }
    }

    /// Integrate one step of motion.
    ///
    /// Position moves along the look/strafe axes; the held rotation is
    /// applied to look and up (rotation is per-solve, not timestep
    /// scaled). A rotation that would carry the look direction within the
    /// vertical lock of straight up/down is undone for look alone; up and
    /// strafe keep their rotated values.
    pub fn solve(&mut self, timestep: f32) {
        let world_velocity = self.look * self.velocity.x
            + self.look.cross(self.up).normalize() * self.velocity.y;
        self.position += world_velocity * timestep;

        let previous_look = self.look;
        self.look = (self.rotation * self.look).normalize();
        self.up = (self.rotation * self.up).normalize();
        self.strafe = self.look.cross(self.up).normalize();

        let cos = self.look.dot(WORLD_UP);
        if cos > VERTICAL_LOCK || cos < -VERTICAL_LOCK {
            self.look = previous_look;
        }
    }

    /// Snapshot a primary-ray generator for an image of the given size.
    pub fn ray_grid(&self, x_count: u32, y_count: u32) -> RayGrid {
        let (frustum_width, frustum_height) = self.perspective.frustum_size();
        RayGrid {
            origin: self.position,
            look: self.look,
            up: self.up,
            strafe: self.strafe,
            dx: frustum_width / (x_count - 1) as f32,
            dy: frustum_height / (y_count - 1) as f32,
            x_count,
            y_count,
            cursor: 0,
        }
    }
}

/// A primary ray paired with the pixel it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct PixelRay {
    pub x: u32,
    pub y: u32,
    pub ray: Ray,
}

/// Finite, strictly ordered sequence of primary rays.
///
/// Scan order is rows bottom to top, columns right to left; one grid is
/// consumed exactly once per trace and a fresh one is snapshotted for the
/// next. [`RayGrid::ray_at`] exposes the same rays by pixel for the
/// parallel path.
#[derive(Debug, Clone)]
pub struct RayGrid {
    origin: Vec3,
    look: Vec3,
    up: Vec3,
    strafe: Vec3,
    dx: f32,
    dy: f32,
    x_count: u32,
    y_count: u32,
    cursor: u64,
}

impl RayGrid {
    /// The primary ray through pixel (x, y).
    ///
    /// Integer offsets are centered so columns span (-xCount/2, xCount/2]
    /// and rows the symmetric range; directions are not normalized.
    pub fn ray_at(&self, x: u32, y: u32) -> Ray {
        let i = x as f32 - ((self.x_count - 1) / 2) as f32;
        let j = y as f32 - ((self.y_count - 1) / 2) as f32;
        let direction = self.look + self.strafe * (self.dx * i) + self.up * (self.dy * j);
        Ray::new(self.origin, direction)
    }

    /// A sub-ray on the AA x AA grid anchored at `base`'s direction.
    ///
    /// `a` and `b` index the sub-cell along strafe and up; with jitter
    /// nonzero the sub-ray is perturbed by up to half a jittered sub-cell
    /// in each axis. With antialias 1 and jitter 0 this returns `base`
    /// unchanged.
    pub fn subsample(
        &self,
        base: &Ray,
        antialias: u32,
        a: u32,
        b: u32,
        jitter: f32,
        rng: &mut impl Rng,
    ) -> Ray {
        let cell_x = self.dx / antialias as f32;
        let cell_y = self.dy / antialias as f32;
        let mut along_strafe = cell_x * a as f32;
        let mut along_up = cell_y * b as f32;
        if jitter > 0.0 {
            along_strafe += cell_x * jitter * (rng.gen::<f32>() - 0.5);
            along_up += cell_y * jitter * (rng.gen::<f32>() - 0.5);
        }
        Ray::new(
            base.origin,
            base.direction + self.strafe * along_strafe + self.up * along_up,
        )
    }

    pub fn width(&self) -> u32 {
        self.x_count
    }

    pub fn height(&self) -> u32 {
        self.y_count
    }
}

impl Iterator for RayGrid {
    type Item = PixelRay;

    fn next(&mut self) -> Option<PixelRay> {
        if self.cursor >= self.x_count as u64 * self.y_count as u64 {
            return None;
        }
        let y = (self.cursor / self.x_count as u64) as u32;
        let x = self.x_count - 1 - (self.cursor % self.x_count as u64) as u32;
        self.cursor += 1;
        Some(PixelRay {
            x,
            y,
            ray: self.ray_at(x, y),
        })
    }
}
