use glam::{vec3, EulerRot, Mat4, Quat, Vec3};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn rotation_quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.position)
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Rotation about the viewing axis, in radians.
    pub roll: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: vec3(0., 0., 10.),
            target: Vec3::ZERO,
            roll: 0.,
            fov: 60.,
            aspect_ratio: 16. / 9.,
            near: 0.1,
            far: 1000.,
        }
    }
}

impl Camera {
    pub fn view_projection(&self) -> Mat4 {
        let p_mat = Mat4::perspective_rh(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        );

        let v_mat = {
            let forward = (self.target - self.position).normalize_or_zero();
            let up = if forward == Vec3::ZERO {
                Vec3::Y
            } else {
                Quat::from_axis_angle(forward, self.roll) * Vec3::Y
            };
            Mat4::look_at_rh(self.position, self.target, up)
        };

        p_mat * v_mat
    }
}

/// What a drawable looks like. Geometry is always the renderer's unit cube.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Visual {
    pub color: Vec3,
}

impl Default for Visual {
    fn default() -> Self {
        Self { color: Vec3::ONE }
    }
}

impl Visual {
    pub fn from_hex(rgb: u32) -> Self {
        Self {
            color: hex_color(rgb),
        }
    }
}

pub fn hex_color(rgb: u32) -> Vec3 {
    vec3(
        ((rgb >> 16) & 0xff) as f32 / 255.,
        ((rgb >> 8) & 0xff) as f32 / 255.,
        (rgb & 0xff) as f32 / 255.,
    )
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn hex_color_splits_channels() {
        let c = hex_color(0xff8000);
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 128. / 255.);
        assert_relative_eq!(c.z, 0.0);
    }

    #[test]
    fn default_transform_is_identity() {
        assert_eq!(Transform::default().to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn transform_matrix_translates() {
        let t = Transform {
            position: vec3(1., 2., 3.),
            ..Default::default()
        };
        let p = t.to_matrix().transform_point3(Vec3::ZERO);
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 2.0);
        assert_relative_eq!(p.z, 3.0);
    }
}
