use bytemuck::{Pod, Zeroable};

/// Floats per model chunk.
pub const MODEL_CHUNK_SIZE: usize = 16;

/// Per-turtle transform data.
///
/// The heading's sine and cosine are cached next to `degrees` so the vertex
/// shader can build the rotation without trig per vertex. Keep them in sync
/// through [`set_heading`](Self::set_heading) rather than writing `degrees`
/// directly.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TurtleModel {
    pub position: [f32; 2],
    /// Stretch along (width, length).
    pub scale: [f32; 2],
    pub degrees: f32,
    pub speed: f32,
    pub sin: f32,
    pub cos: f32,
    pub _unused: [f32; 8],
}

const _: () = assert!(std::mem::size_of::<TurtleModel>() == MODEL_CHUNK_SIZE * 4);

impl Default for TurtleModel {
    fn default() -> Self {
        Self {
            position: [0.0; 2],
            scale: [1.0; 2],
            degrees: 0.0,
            speed: 0.0,
            sin: 0.0,
            cos: 1.0,
            _unused: [0.0; 8],
        }
    }
}

impl TurtleModel {
    pub fn new(x: f32, y: f32, degrees: f32) -> Self {
        let mut model = Self {
            position: [x, y],
            ..Self::default()
        };
        model.set_heading(degrees);
        model
    }

    /// Sets the heading in degrees and refreshes the cached sine/cosine.
    pub fn set_heading(&mut self, degrees: f32) {
        let degrees = degrees.rem_euclid(360.0);
        let (sin, cos) = degrees.to_radians().sin_cos();
        self.degrees = degrees;
        self.sin = sin;
        self.cos = cos;
    }

    /// Rotates counter-clockwise by `degrees`.
    #[inline]
    pub fn turn(&mut self, degrees: f32) {
        self.set_heading(self.degrees + degrees);
    }

    /// Moves `distance` units along the current heading.
    #[inline]
    pub fn forward(&mut self, distance: f32) {
        self.position[0] += self.cos * distance;
        self.position[1] += self.sin * distance;
    }

    #[inline]
    pub fn as_chunk(&self) -> &[f32] {
        bytemuck::cast_ref::<Self, [f32; MODEL_CHUNK_SIZE]>(self)
    }

    /// Reinterprets a model chunk. `None` if it is not exactly one record long.
    #[inline]
    pub fn from_chunk(chunk: &[f32]) -> Option<&Self> {
        bytemuck::try_from_bytes(bytemuck::cast_slice(chunk)).ok()
    }

    #[inline]
    pub fn from_chunk_mut(chunk: &mut [f32]) -> Option<&mut Self> {
        bytemuck::try_from_bytes_mut(bytemuck::cast_slice_mut(chunk)).ok()
    }
}
