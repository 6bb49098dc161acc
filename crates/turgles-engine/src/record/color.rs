use bytemuck::{Pod, Zeroable};

/// Floats per color chunk.
pub const COLOR_CHUNK_SIZE: usize = 9;

/// Per-turtle fill and pen colors (linear RGBA) plus pen width.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TurtleColor {
    pub fill: [f32; 4],
    pub pen: [f32; 4],
    pub pen_width: f32,
}

const _: () = assert!(std::mem::size_of::<TurtleColor>() == COLOR_CHUNK_SIZE * 4);

impl Default for TurtleColor {
    fn default() -> Self {
        Self::solid([0.0, 0.0, 0.0, 1.0])
    }
}

impl TurtleColor {
    pub fn new(fill: [f32; 4], pen: [f32; 4], pen_width: f32) -> Self {
        Self {
            fill,
            pen,
            pen_width,
        }
    }

    /// Same color for fill and pen, unit pen width.
    pub fn solid(rgba: [f32; 4]) -> Self {
        Self::new(rgba, rgba, 1.0)
    }

    #[inline]
    pub fn as_chunk(&self) -> &[f32] {
        bytemuck::cast_ref::<Self, [f32; COLOR_CHUNK_SIZE]>(self)
    }

    #[inline]
    pub fn from_chunk(chunk: &[f32]) -> Option<&Self> {
        bytemuck::try_from_bytes(bytemuck::cast_slice(chunk)).ok()
    }

    #[inline]
    pub fn from_chunk_mut(chunk: &mut [f32]) -> Option<&mut Self> {
        bytemuck::try_from_bytes_mut(bytemuck::cast_slice_mut(chunk)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_layout_matches_fields() {
        let c = TurtleColor::new([0.1, 0.2, 0.3, 1.0], [0.4, 0.5, 0.6, 0.5], 2.0);
        assert_eq!(
            c.as_chunk(),
            &[0.1f32, 0.2, 0.3, 1.0, 0.4, 0.5, 0.6, 0.5, 2.0][..]
        );
    }

    #[test]
    fn default_is_opaque_black() {
        let c = TurtleColor::default();
        assert_eq!(c.fill, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(c.pen, c.fill);
        assert_eq!(c.pen_width, 1.0);
    }

    #[test]
    fn from_chunk_mut_writes_through() {
        let mut chunk = [0.0f32; COLOR_CHUNK_SIZE];
        TurtleColor::from_chunk_mut(&mut chunk).unwrap().pen_width = 4.0;
        assert_eq!(chunk[8], 4.0);
        assert!(TurtleColor::from_chunk(&chunk[..8]).is_none());
    }
}
