//! A render backend that only keeps statistics.

use flowline::{CurveVertex, InstanceTransform, LineStyle, RenderBackend};
use glam::Vec3;

/// Summary of one projected frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameRecord {
    pub instances: usize,
    /// Curves with at least one shaped vertex.
    pub curves: usize,
    pub vertices: usize,
    pub max_scale: f32,
    /// Axis-aligned bounds of all instance positions.
    pub min: Vec3,
    pub max: Vec3,
}

/// Counts what a real renderer would have drawn.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    frames: u64,
    current: FrameRecord,
    total_vertices: u64,
    ball_color: Vec3,
    line_style: Option<LineStyle>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames projected so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Record of the most recent frame.
    pub fn last_frame(&self) -> &FrameRecord {
        &self.current
    }

    /// Curve vertices received over all frames.
    pub fn total_vertices(&self) -> u64 {
        self.total_vertices
    }

    pub fn ball_color(&self) -> Vec3 {
        self.ball_color
    }

    pub fn line_style(&self) -> Option<&LineStyle> {
        self.line_style.as_ref()
    }
}

impl RenderBackend for RecordingBackend {
    fn draw_instances(&mut self, instances: &[InstanceTransform], color: Vec3) {
        // Instances arrive first, once per frame.
        self.frames += 1;
        self.ball_color = color;

        let mut record = FrameRecord {
            instances: instances.len(),
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
            ..FrameRecord::default()
        };
        for instance in instances {
            let p = Vec3::from_array(instance.position);
            record.min = record.min.min(p);
            record.max = record.max.max(p);
            record.max_scale = record.max_scale.max(instance.scale);
        }
        if instances.is_empty() {
            record.min = Vec3::ZERO;
            record.max = Vec3::ZERO;
        }
        self.current = record;
    }

    fn draw_curve(&mut self, _index: usize, vertices: &[CurveVertex], style: &LineStyle) {
        if !vertices.is_empty() {
            self.current.curves += 1;
        }
        self.current.vertices += vertices.len();
        self.total_vertices += vertices.len() as u64;
        self.line_style = Some(*style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowline::{project, ParameterStore, ParticleSystem, SystemConfig};

    #[test]
    fn test_records_projected_frame() {
        let params = ParameterStore::default();
        let config = SystemConfig::default()
            .with_particle_count(5)
            .with_curve_length(4)
            .with_spawn_seed(9);
        let mut system = ParticleSystem::new(config, &params).unwrap();
        let mut backend = RecordingBackend::new();

        // Before any step the curves have no shaped vertices.
        project(&system, &params, &mut backend);
        assert_eq!(backend.last_frame().instances, 5);
        assert_eq!(backend.last_frame().curves, 0);

        system.step(0.5, 0.5, &params);
        project(&system, &params, &mut backend);
        let frame = backend.last_frame();
        assert_eq!(backend.frames(), 2);
        assert_eq!(frame.curves, 5);
        assert_eq!(frame.vertices, 20);
        assert!(frame.max_scale > 0.0);
        assert!(frame.min.cmple(frame.max).all());
        assert_eq!(backend.ball_color(), params.ball_color);
        assert_eq!(backend.line_style().map(|s| s.width), Some(params.line_width));
    }
}
