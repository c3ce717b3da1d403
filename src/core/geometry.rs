use nalgebra::{Point3, Vector2, Vector3};

/// A single vertex in object space: position, normal and texture coordinate.
///
/// The eight components match the flat `(x, y, z, nx, ny, nz, s, t)` layout scene
/// geometry is authored in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub texcoord: Vector2<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, texcoord: Vector2<f32>) -> Self {
        Self {
            position,
            normal,
            texcoord,
        }
    }

    /// A vertex with only a position; normal and texcoord are zero.
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self::new(Point3::new(x, y, z), Vector3::zeros(), Vector2::zeros())
    }

    /// Component-wise interpolation of all eight attributes.
    /// Used by the clipper to synthesize vertices on frustum planes.
    pub fn lerp(&self, other: &Vertex, t: f32) -> Vertex {
        Vertex {
            position: self.position + (other.position - self.position) * t,
            normal: self.normal + (other.normal - self.normal) * t,
            texcoord: self.texcoord + (other.texcoord - self.texcoord) * t,
        }
    }

    pub fn to_array(&self) -> [f32; 8] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.normal.x,
            self.normal.y,
            self.normal.z,
            self.texcoord.x,
            self.texcoord.y,
        ]
    }
}

impl From<[f32; 8]> for Vertex {
    fn from(v: [f32; 8]) -> Self {
        Vertex::new(
            Point3::new(v[0], v[1], v[2]),
            Vector3::new(v[3], v[4], v[5]),
            Vector2::new(v[6], v[7]),
        )
    }
}

/// A shaded vertex after the perspective divide and viewport transform.
#[derive(Debug, Clone, Copy)]
pub struct ScreenVertex<V> {
    /// Window coordinates: x, y in pixels, z in depth-buffer units.
    pub position: Vector3<f32>,
    pub varying: V,
}

impl<V> ScreenVertex<V> {
    pub fn new(position: Vector3<f32>, varying: V) -> Self {
        Self { position, varying }
    }

    /// Integer pixel coordinates (truncating), as the Bresenham walks use them.
    #[inline]
    pub fn pixel(&self) -> [i32; 2] {
        [self.position.x as i32, self.position.y as i32]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octuple_round_trip() {
        let raw = [1.0, 2.0, 3.0, 0.0, 1.0, 0.0, 0.25, 0.75];
        assert_eq!(Vertex::from(raw).to_array(), raw);
    }

    #[test]
    fn lerp_interpolates_every_attribute() {
        let a = Vertex::from([0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        let b = Vertex::from([2.0, 4.0, -2.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
        let m = a.lerp(&b, 0.5);
        assert_eq!(m.to_array(), [1.0, 2.0, -1.0, 0.5, 0.5, 0.0, 0.5, 0.5]);
    }
}
