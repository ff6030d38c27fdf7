use fish_shared::Position;

/// A 2D vector used for position, velocity and steering forces.
///
/// Values are `Copy` and every operation returns a new vector, so a
/// temporary built from an agent's velocity never aliases the agent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Unit vector pointing along `angle` radians
    pub fn from_angle(angle: f64) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction, or the zero vector when the
    /// magnitude is zero.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    /// Clamp the magnitude to `max`, keeping the direction
    pub fn limit(&self, max: f64) -> Self {
        let mag = self.magnitude();
        if mag > max {
            self.normalize() * max
        } else {
            *self
        }
    }

    /// Same direction, magnitude `len`
    pub fn with_magnitude(&self, len: f64) -> Self {
        self.normalize() * len
    }

    /// Angle of the vector in radians, `atan2(y, x)`
    pub fn heading(&self) -> f64 {
        self.y.atan2(self.x)
    }

    pub fn distance(&self, other: &Vector2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Position> for Vector2D {
    fn from(p: Position) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<Vector2D> for Position {
    fn from(v: Vector2D) -> Self {
        Position::new(v.x, v.y)
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// Division by zero leaves the vector unchanged.
impl core::ops::Div<f64> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f64) -> Self {
        if scalar == 0.0 {
            return self;
        }
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl core::ops::SubAssign for Vector2D {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_vector2d_new() {
        let v = Vector2D::new(3.0, 4.0);
        assert_eq!(v.x, 3.0);
        assert_eq!(v.y, 4.0);
    }

    #[test]
    fn test_vector2d_magnitude() {
        let v = Vector2D::new(3.0, 4.0);
        assert_eq!(v.magnitude(), 5.0);
    }

    #[test]
    fn test_vector2d_normalize() {
        let v = Vector2D::new(3.0, 4.0);
        let normalized = v.normalize();
        assert!((normalized.magnitude() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        let n = Vector2D::zero().normalize();
        assert_eq!(n, Vector2D::zero());
        assert!(n.is_finite());
    }

    #[test]
    fn test_divide_by_zero_is_noop() {
        let v = Vector2D::new(2.0, -3.0);
        assert_eq!(v / 0.0, v);
        assert_eq!(Vector2D::zero() / 0.0, Vector2D::zero());
    }

    #[test]
    fn test_vector2d_operations() {
        let v1 = Vector2D::new(1.0, 2.0);
        let v2 = Vector2D::new(3.0, 4.0);

        let sum = v1 + v2;
        assert_eq!(sum, Vector2D::new(4.0, 6.0));

        let diff = v2 - v1;
        assert_eq!(diff, Vector2D::new(2.0, 2.0));

        let scaled = v1 * 2.0;
        assert_eq!(scaled, Vector2D::new(2.0, 4.0));

        let halved = v2 / 2.0;
        assert_eq!(halved, Vector2D::new(1.5, 2.0));

        let mut acc = v1;
        acc += v2;
        acc -= v1;
        assert_eq!(acc, v2);
    }

    #[test]
    fn test_limit_preserves_direction() {
        let v = Vector2D::new(30.0, 40.0).limit(5.0);
        assert!((v.magnitude() - 5.0).abs() < 1e-12);
        assert!((v.x - 3.0).abs() < 1e-12);
        assert!((v.y - 4.0).abs() < 1e-12);

        let short = Vector2D::new(0.3, 0.4);
        assert_eq!(short.limit(5.0), short);
    }

    #[test]
    fn test_heading() {
        assert_eq!(Vector2D::new(1.0, 0.0).heading(), 0.0);
        assert!((Vector2D::new(0.0, 1.0).heading() - FRAC_PI_2).abs() < 1e-12);
        assert!((Vector2D::new(-1.0, 0.0).heading() - PI).abs() < 1e-12);
    }

    #[test]
    fn test_copies_do_not_alias() {
        let original = Vector2D::new(1.0, 1.0);
        let mut copy = original;
        copy += Vector2D::new(5.0, 5.0);
        assert_eq!(original, Vector2D::new(1.0, 1.0));
    }
}
