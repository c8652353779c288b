//! Per-frame render output.
//!
//! The core does not draw anything. After each step a host hands the system
//! to [`project`], which feeds a [`RenderBackend`] with:
//!
//! - one batch of [`InstanceTransform`]s for an instanced sphere mesh,
//! - one [`CurveVertex`] list per particle for a line-mesh renderer, plus the
//!   current [`LineStyle`].
//!
//! Both vertex types are `Pod`, so a GPU backend can upload the slices with
//! `bytemuck::cast_slice` without copying.

use crate::curve::CurveVertex;
use crate::params::ParameterStore;
use crate::system::ParticleSystem;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Position and uniform scale of one sphere instance.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct InstanceTransform {
    pub position: [f32; 3],
    pub scale: f32,
}

impl InstanceTransform {
    /// Column-major model matrix for renderers that want one.
    pub fn to_matrix(&self) -> glam::Mat4 {
        glam::Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            glam::Quat::IDENTITY,
            Vec3::from_array(self.position),
        )
    }
}

/// Curve material values, re-read from the parameters every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Vec3,
    pub width: f32,
    pub opacity: f32,
}

impl LineStyle {
    pub fn from_params(params: &ParameterStore) -> Self {
        Self {
            color: params.line_color,
            width: params.line_width,
            opacity: params.line_opacity,
        }
    }
}

/// Receiver of one frame of render output.
pub trait RenderBackend {
    /// All `N` sphere instances, indexed by particle slot.
    fn draw_instances(&mut self, instances: &[InstanceTransform], color: Vec3);

    /// The shaped curve of particle `index`. Empty until its first reshape.
    fn draw_curve(&mut self, index: usize, vertices: &[CurveVertex], style: &LineStyle);
}

/// Emit the current frame of `system` into `backend`.
pub fn project<B: RenderBackend + ?Sized>(
    system: &ParticleSystem,
    params: &ParameterStore,
    backend: &mut B,
) {
    backend.draw_instances(system.transforms(), params.ball_color);

    let style = LineStyle::from_params(params);
    for (index, particle) in system.particles().iter().enumerate() {
        backend.draw_curve(index, particle.curve().vertices(), &style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<InstanceTransform>(), 16);
        assert_eq!(std::mem::size_of::<CurveVertex>(), 20);

        let instances = [InstanceTransform {
            position: [1.0, 2.0, 3.0],
            scale: 0.5,
        }];
        let floats: &[f32] = bytemuck::cast_slice(&instances);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 0.5]);
    }

    #[test]
    fn test_to_matrix() {
        let t = InstanceTransform {
            position: [1.0, 2.0, 3.0],
            scale: 2.0,
        };
        let p = t.to_matrix().transform_point3(Vec3::ONE);
        assert_eq!(p, Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_line_style_from_params() {
        let params = ParameterStore::basic_flow();
        let style = LineStyle::from_params(&params);
        assert_eq!(style.width, 0.2);
        assert_eq!(style.opacity, 1.0);
        assert_eq!(style.color, params.line_color);
    }
}
