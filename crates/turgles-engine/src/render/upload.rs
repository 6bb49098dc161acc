use std::collections::HashMap;

use crate::buffer::{BufferManager, ShapeBuffer};

/// Smallest GPU-side capacity, in instances.
const MIN_INSTANCE_CAPACITY: usize = 64;

/// GPU instance buffers for one shape.
pub struct ShapeInstances {
    model_vbo: wgpu::Buffer,
    color_vbo: wgpu::Buffer,
    capacity: usize,
    count: u32,
}

impl ShapeInstances {
    #[inline]
    pub fn model_buffer(&self) -> &wgpu::Buffer {
        &self.model_vbo
    }

    #[inline]
    pub fn color_buffer(&self) -> &wgpu::Buffer {
        &self.color_vbo
    }

    /// Instances written by the last upload; the draw call's instance range.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn allocate(device: &wgpu::Device, shape: &ShapeBuffer, required: usize) -> Self {
        let capacity = instance_capacity(required);
        log::debug!(
            "InstanceUploader: '{}' instance buffers -> {} instances",
            shape.shape(),
            capacity
        );

        Self {
            model_vbo: create_instance_buffer(
                device,
                &format!("turgles {} model vbo", shape.shape()),
                capacity * shape.model().chunk_size(),
            ),
            color_vbo: create_instance_buffer(
                device,
                &format!("turgles {} color vbo", shape.shape()),
                capacity * shape.color().chunk_size(),
            ),
            capacity,
            count: 0,
        }
    }
}

/// Streams every shape's live records to the GPU, one write per buffer.
///
/// The CPU buffers are already laid out as instance arrays, so an upload is a
/// plain `write_buffer` of each shape's live prefix. GPU buffers are recreated
/// (never shrunk) when a shape outgrows them.
#[derive(Default)]
pub struct InstanceUploader {
    shapes: HashMap<String, ShapeInstances>,
}

impl InstanceUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads all shapes of `manager`. Returns the number of bytes written.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        manager: &BufferManager,
    ) -> usize {
        manager
            .shapes()
            .map(|shape| self.upload_shape(device, queue, shape))
            .sum()
    }

    /// Uploads one shape. Returns the number of bytes written.
    pub fn upload_shape(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        shape: &ShapeBuffer,
    ) -> usize {
        let count = shape.count();
        let instances = self.ensure_capacity(device, shape, count);
        instances.count = draw_count(shape.shape(), count);

        if count == 0 {
            return 0;
        }

        queue.write_buffer(&instances.model_vbo, 0, shape.model_bytes());
        queue.write_buffer(&instances.color_vbo, 0, shape.color_bytes());
        upload_len(shape)
    }

    /// GPU buffers for `shape`, if it has been uploaded at least once.
    #[inline]
    pub fn instances(&self, shape: &str) -> Option<&ShapeInstances> {
        self.shapes.get(shape)
    }

    fn ensure_capacity(
        &mut self,
        device: &wgpu::Device,
        shape: &ShapeBuffer,
        required: usize,
    ) -> &mut ShapeInstances {
        let instances = self
            .shapes
            .entry(shape.shape().to_owned())
            .or_insert_with(|| ShapeInstances::allocate(device, shape, required));
        if required > instances.capacity {
            *instances = ShapeInstances::allocate(device, shape, required);
        }
        instances
    }
}

/// Bytes one upload of `shape` writes: its live model and color prefixes.
pub fn upload_len(shape: &ShapeBuffer) -> usize {
    shape.model_bytes().len() + shape.color_bytes().len()
}

/// Instance count for a draw call. wgpu instance ranges are `u32`, so larger
/// shapes are clamped and only the first `u32::MAX` instances are drawn.
fn draw_count(shape: &str, count: usize) -> u32 {
    u32::try_from(count).unwrap_or_else(|_| {
        log::warn!("InstanceUploader: '{shape}' has {count} instances, drawing {}", u32::MAX);
        u32::MAX
    })
}

/// GPU capacity for `required` instances: next power of two, at least 64.
pub fn instance_capacity(required: usize) -> usize {
    required.next_power_of_two().max(MIN_INSTANCE_CAPACITY)
}

fn create_instance_buffer(device: &wgpu::Device, label: &str, floats: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (floats * std::mem::size_of::<f32>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{BufferConfig, BufferManager, TurtleId};
    use crate::{TurtleColor, TurtleModel};

    // ── sizing ────────────────────────────────────────────────────────────

    #[test]
    fn capacity_has_a_floor() {
        assert_eq!(instance_capacity(0), 64);
        assert_eq!(instance_capacity(1), 64);
        assert_eq!(instance_capacity(64), 64);
    }

    #[test]
    fn capacity_rounds_up_to_power_of_two() {
        assert_eq!(instance_capacity(65), 128);
        assert_eq!(instance_capacity(1000), 1024);
        assert_eq!(instance_capacity(1024), 1024);
    }

    #[test]
    fn draw_count_passes_small_counts_through() {
        assert_eq!(draw_count("classic", 0), 0);
        assert_eq!(draw_count("classic", 1000), 1000);
        assert_eq!(draw_count("classic", u32::MAX as usize), u32::MAX);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn draw_count_clamps_oversized_shapes() {
        assert_eq!(draw_count("classic", u32::MAX as usize + 1), u32::MAX);
        assert_eq!(draw_count("classic", usize::MAX), u32::MAX);
    }

    // ── upload size ───────────────────────────────────────────────────────

    #[test]
    fn upload_len_covers_live_prefix_only() {
        let mut m = BufferManager::new(BufferConfig::default().with_initial_capacity(8)).unwrap();
        for _ in 0..3 {
            m.spawn("classic", &TurtleModel::default(), &TurtleColor::default())
                .unwrap();
        }
        m.destroy_turtle(TurtleId(1)).unwrap();

        let shape = m.buffer("classic").unwrap();
        assert_eq!(upload_len(shape), 2 * (16 + 9) * 4);
        assert_eq!(
            upload_len(shape),
            shape.model_bytes().len() + shape.color_bytes().len()
        );
    }

    #[test]
    fn upload_len_of_empty_shape_is_zero() {
        let mut m = BufferManager::new(BufferConfig::default()).unwrap();
        assert_eq!(upload_len(m.get_buffer("square").unwrap()), 0);
    }
}
